//! The `utils` module provides the pieces shared across `pollsub`: the
//! crate-wide error type and logging setup.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
