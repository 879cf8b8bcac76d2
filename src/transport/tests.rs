use serde_json::json;

use crate::broker::SubscriptionService;
use crate::transport::handler::{handle_client_message, handle_text};
use crate::transport::message::{ClientMessage, ServerMessage};

fn subscribe(topic: &str, user: &str) -> ClientMessage {
    ClientMessage::Subscribe {
        topic: topic.to_string(),
        user: user.to_string(),
    }
}

fn unsubscribe(topic: &str, user: &str) -> ClientMessage {
    ClientMessage::Unsubscribe {
        topic: topic.to_string(),
        user: user.to_string(),
    }
}

fn publish(topic: &str, payload: &str) -> ClientMessage {
    ClientMessage::Publish {
        topic: topic.to_string(),
        payload: payload.as_bytes().to_vec(),
    }
}

fn poll(topic: &str, user: &str) -> ClientMessage {
    ClientMessage::Poll {
        topic: topic.to_string(),
        user: user.to_string(),
    }
}

#[test]
fn test_handle_subscribe() {
    let service = SubscriptionService::new();

    let reply = handle_client_message(&service, subscribe("news", "alice"));
    assert_eq!(
        reply,
        ServerMessage::Subscribed {
            topic: "news".to_string(),
            user: "alice".to_string(),
        }
    );
    assert!(service.poll_next("news", "alice").is_subscribed());
}

#[test]
fn test_handle_unsubscribe() {
    let service = SubscriptionService::new();
    service.subscribe("news", "alice");

    let reply = handle_client_message(&service, unsubscribe("news", "alice"));
    assert!(matches!(reply, ServerMessage::Unsubscribed { .. }));

    let reply = handle_client_message(&service, unsubscribe("news", "alice"));
    assert!(matches!(reply, ServerMessage::NotFound { .. }));
}

#[test]
fn test_handle_publish_reports_fan_out() {
    let service = SubscriptionService::new();

    let reply = handle_client_message(&service, publish("news", "nobody listens"));
    assert_eq!(
        reply,
        ServerMessage::Published {
            topic: "news".to_string(),
            delivered: 0,
        }
    );

    service.subscribe("news", "alice");
    service.subscribe("news", "bob");
    let reply = handle_client_message(&service, publish("news", "hello"));
    assert!(matches!(reply, ServerMessage::Published { delivered: 2, .. }));
}

#[test]
fn test_handle_poll_status_mapping() {
    let service = SubscriptionService::new();

    let reply = handle_client_message(&service, poll("news", "alice"));
    assert!(matches!(reply, ServerMessage::NotFound { .. }));

    handle_client_message(&service, subscribe("news", "alice"));
    let reply = handle_client_message(&service, poll("news", "alice"));
    assert!(matches!(reply, ServerMessage::NoContent { .. }));

    handle_client_message(&service, publish("news", "hello"));
    match handle_client_message(&service, poll("news", "alice")) {
        ServerMessage::Message {
            topic,
            user,
            payload,
            timestamp,
        } => {
            assert_eq!(topic, "news");
            assert_eq!(user, "alice");
            assert_eq!(payload, b"hello");
            assert!(timestamp > 0);
        }
        other => panic!("Expected a message, got {:?}", other),
    }
}

#[test]
fn test_handle_rejects_empty_names() {
    let service = SubscriptionService::new();

    let reply = handle_client_message(&service, subscribe("", "alice"));
    assert_eq!(reply, ServerMessage::error("topic must not be empty"));

    let reply = handle_client_message(&service, poll("news", ""));
    assert_eq!(reply, ServerMessage::error("user must not be empty"));

    let reply = handle_client_message(&service, publish("", "x"));
    assert!(matches!(reply, ServerMessage::Error { .. }));

    service.with_registry(|registry| {
        assert_eq!(registry.topic_count(), 0);
        assert_eq!(registry.user_count(), 0);
    });
}

#[test]
fn test_handle_text_parses_protocol_json() {
    let service = SubscriptionService::new();

    let msg = json!({
        "type": "subscribe",
        "topic": "news",
        "user": "alice"
    })
    .to_string();
    assert!(matches!(
        handle_text(&service, &msg),
        ServerMessage::Subscribed { .. }
    ));

    let msg = json!({
        "type": "publish",
        "topic": "news",
        "payload": "aGVsbG8="
    })
    .to_string();
    handle_text(&service, &msg);

    let msg = json!({
        "type": "poll",
        "topic": "news",
        "user": "alice"
    })
    .to_string();
    let reply = serde_json::to_value(handle_text(&service, &msg)).unwrap();
    assert_eq!(reply["type"], "message");
    assert_eq!(reply["payload"], "aGVsbG8=");
}

#[test]
fn test_handle_text_rejects_invalid_json() {
    let service = SubscriptionService::new();

    match handle_text(&service, "{not json") {
        ServerMessage::Error { message } => assert!(message.starts_with("invalid request")),
        other => panic!("Expected Error, got {:?}", other),
    }

    let missing_user = json!({ "type": "subscribe", "topic": "news" }).to_string();
    assert!(matches!(
        handle_text(&service, &missing_user),
        ServerMessage::Error { .. }
    ));
}

#[test]
fn test_binary_payload_survives_the_protocol() {
    let service = SubscriptionService::new();
    service.subscribe("bin", "alice");
    service.publish("bin", vec![0xff, 0x00, 0xfe]);

    let msg = json!({ "type": "poll", "topic": "bin", "user": "alice" }).to_string();
    let reply = handle_text(&service, &msg);
    let wire = serde_json::to_string(&reply).unwrap();
    let wire_json: serde_json::Value = serde_json::from_str(&wire).unwrap();
    assert_eq!(wire_json["payload"], "/wD+");

    match serde_json::from_str::<ServerMessage>(&wire).unwrap() {
        ServerMessage::Message { payload, .. } => assert_eq!(payload, vec![0xff, 0x00, 0xfe]),
        other => panic!("Expected a message, got {:?}", other),
    }
}

#[test]
fn test_publish_decodes_binary_payload() {
    let service = SubscriptionService::new();
    service.subscribe("bin", "alice");

    let msg = json!({ "type": "publish", "topic": "bin", "payload": "/wD+" }).to_string();
    assert!(matches!(
        handle_text(&service, &msg),
        ServerMessage::Published { delivered: 1, .. }
    ));

    let message = service.poll_next("bin", "alice").into_message().unwrap();
    assert_eq!(message.payload, vec![0xff, 0x00, 0xfe]);
}

#[test]
fn test_publish_rejects_malformed_base64() {
    let service = SubscriptionService::new();
    service.subscribe("bin", "alice");

    let msg = json!({ "type": "publish", "topic": "bin", "payload": "not base64!" }).to_string();
    assert!(matches!(
        handle_text(&service, &msg),
        ServerMessage::Error { .. }
    ));
    assert_eq!(service.poll_next("bin", "alice"), crate::broker::Poll::Empty);
}
