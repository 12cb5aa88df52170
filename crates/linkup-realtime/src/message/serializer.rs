//! JSON serialization for WebSocket frames.

use linkup_core::result::AppResult;

use super::types::{ClientEvent, OutboundEvent};

/// Serialize an outbound event into a text frame.
pub fn encode(event: &OutboundEvent) -> AppResult<String> {
    Ok(serde_json::to_string(event)?)
}

/// Deserialize a client text frame.
pub fn decode(text: &str) -> AppResult<ClientEvent> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::types::Notification;
    use linkup_core::types::Identity;
    use serde_json::{Value, json};

    fn encoded(event: &OutboundEvent) -> Value {
        serde_json::from_str(&encode(event).expect("encode")).expect("json")
    }

    #[test]
    fn test_decode_client_events() {
        assert_eq!(
            decode(r#"{"event":"addUser","data":"u1"}"#).expect("decode"),
            ClientEvent::AddUser(Identity::new("u1"))
        );

        let offer = decode(r#"{"event":"callUser","data":{"to":"b","from":"a","offer":{"sdp":"x"}}}"#)
            .expect("decode");
        assert_eq!(
            offer,
            ClientEvent::CallUser {
                to: Identity::new("b"),
                from: Identity::new("a"),
                offer: json!({"sdp": "x"}),
            }
        );

        assert_eq!(
            decode(r#"{"event":"endCall","data":{"to":"b"}}"#).expect("decode"),
            ClientEvent::EndCall {
                to: Identity::new("b")
            }
        );
    }

    #[test]
    fn test_decode_rejects_unknown_and_incomplete() {
        assert!(decode(r#"{"event":"subscribe","data":{}}"#).is_err());
        assert!(decode(r#"{"event":"callUser","data":{"to":"b"}}"#).is_err());
        assert!(decode("not json").is_err());
    }

    #[test]
    fn test_encode_wire_shapes() {
        assert_eq!(encoded(&OutboundEvent::CallEnded), json!({"event": "callEnded"}));
        assert_eq!(
            encoded(&OutboundEvent::GetOnlineUsers(vec![
                Identity::new("a"),
                Identity::new("b")
            ])),
            json!({"event": "getOnlineUsers", "data": ["a", "b"]})
        );
        assert_eq!(
            encoded(&OutboundEvent::call_error("User is offline")),
            json!({"event": "callError", "data": {"message": "User is offline"}})
        );
        assert_eq!(
            encoded(&OutboundEvent::UserFollowed {
                follower_id: Identity::new("a"),
                user_id: Identity::new("b"),
            }),
            json!({"event": "userFollowed", "data": {"followerId": "a", "userId": "b"}})
        );
        assert_eq!(
            encoded(&OutboundEvent::Notification(Notification {
                kind: "follow".into(),
                message: "Al followed you".into(),
                from_user_id: Identity::new("a"),
            })),
            json!({
                "event": "notification",
                "data": {"type": "follow", "message": "Al followed you", "fromUserId": "a"}
            })
        );
    }
}
