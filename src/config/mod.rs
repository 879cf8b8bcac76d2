mod settings;

use ::config::{Config, Environment, File};
use tracing::debug;

use crate::utils::error::Result;
use settings::PartialSettings;

pub use settings::{BrokerSettings, LoggingSettings, ServerSettings, Settings};

/// Default configuration file, looked up with any supported extension.
pub const DEFAULT_CONFIG_FILE: &str = "config/default";

/// Prefix of environment variables that override the configuration,
/// e.g. `POLLSUB_SERVER__PORT=4000`.
pub const ENV_PREFIX: &str = "POLLSUB";

/// Loads the configuration from the default file and environment variables
/// and merges it over the default values.
pub fn load_config() -> Result<Settings> {
    load_config_from(DEFAULT_CONFIG_FILE)
}

/// Like [`load_config`], reading the optional file at `path` instead.
pub fn load_config_from(path: &str) -> Result<Settings> {
    let builder = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;
    let settings = Settings::merged(partial);
    settings.validate()?;
    debug!(?settings, "configuration loaded");

    Ok(settings)
}
