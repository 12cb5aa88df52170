//! Decision logic for call signaling.
//!
//! [`SignalingRelay::handle`] maps `(state, event)` to the next state and the
//! effects to apply. It reads the presence registry and the account
//! directory but never mutates either; the connection manager applies the
//! returned effects.
//!
//! An offer is checked in order: claimed sender, target existence, target's
//! block list, target presence. Answers, ICE candidates, hang-ups and
//! rejections only check presence and are dropped silently when the target
//! is offline. Nothing is remembered between events.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use linkup_core::types::Identity;
use linkup_service::account::AccountDirectory;

use crate::connection::authenticator::WsAuthenticator;
use crate::message::types::{ClientEvent, OutboundEvent};
use crate::presence::PresenceRegistry;

use super::state::{ConnectionState, Effect, SessionEvent, Transition};

/// `callError` sent when `from` is not the bound identity.
pub const UNAUTHORIZED_CALLER: &str = "Unauthorized caller";
/// `callError` sent when the target account does not exist.
pub const USER_NOT_FOUND: &str = "User not found";
/// `callError` sent when the target blocked the caller.
pub const BLOCKED_BY_TARGET: &str = "You are blocked by this user";
/// `callError` sent when the target is not online.
pub const USER_OFFLINE: &str = "User is offline";
/// `callError` sent when the account lookup failed.
pub const CALL_FAILED: &str = "Failed to initiate call";

/// Per-connection signaling state machine.
#[derive(Clone)]
pub struct SignalingRelay {
    presence: Arc<PresenceRegistry>,
    directory: Arc<dyn AccountDirectory>,
    authenticator: WsAuthenticator,
}

impl std::fmt::Debug for SignalingRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalingRelay").finish_non_exhaustive()
    }
}

impl SignalingRelay {
    /// Creates a relay reading from `presence` and `directory`.
    pub fn new(
        presence: Arc<PresenceRegistry>,
        directory: Arc<dyn AccountDirectory>,
        authenticator: WsAuthenticator,
    ) -> Self {
        Self {
            presence,
            directory,
            authenticator,
        }
    }

    /// Single step of the state machine.
    pub async fn handle(&self, state: &ConnectionState, event: SessionEvent) -> Transition {
        match (state, event) {
            (ConnectionState::Connecting, SessionEvent::Handshake { credential }) => {
                self.authenticate(credential.as_deref())
            }
            (_, SessionEvent::Disconnect) => disconnect(state),
            (
                ConnectionState::Authenticated { identity }
                | ConnectionState::Registered { identity },
                SessionEvent::Inbound(event),
            ) => self.route(state, identity, event).await,
            (state, event) => {
                debug!(state = state.name(), ?event, "Event ignored in this state");
                Transition::stay(state)
            }
        }
    }

    fn authenticate(&self, credential: Option<&str>) -> Transition {
        match self.authenticator.authenticate(credential) {
            Ok(conn) => {
                info!(identity = %conn.identity, "Connection authenticated");
                Transition::to(ConnectionState::Authenticated {
                    identity: conn.identity,
                })
            }
            Err(e) => {
                warn!(reason = %e.message, "Connection refused");
                Transition::to(ConnectionState::Closed)
                    .with(Effect::Reply(OutboundEvent::auth_error(e.message)))
                    .with(Effect::Close)
            }
        }
    }

    async fn route(
        &self,
        state: &ConnectionState,
        identity: &Identity,
        event: ClientEvent,
    ) -> Transition {
        match event {
            ClientEvent::AddUser(claimed) => register(state, identity, claimed),
            ClientEvent::CallUser { to, from, offer } => {
                self.offer(state, identity, to, from, offer).await
            }
            ClientEvent::AnswerCall { to, answer } => {
                self.forward_if_online(state, to, OutboundEvent::CallAccepted { answer })
                    .await
            }
            ClientEvent::IceCandidate { to, candidate } => {
                self.forward_if_online(state, to, OutboundEvent::IceCandidate { candidate })
                    .await
            }
            ClientEvent::EndCall { to } => {
                self.forward_if_online(state, to, OutboundEvent::CallEnded)
                    .await
            }
            ClientEvent::RejectCall { to } => {
                self.forward_if_online(state, to, OutboundEvent::CallRejected)
                    .await
            }
        }
    }

    async fn offer(
        &self,
        state: &ConnectionState,
        identity: &Identity,
        to: Identity,
        from: Identity,
        offer: Value,
    ) -> Transition {
        if from != *identity {
            warn!(identity = %identity, claimed = %from, "Offer with spoofed sender");
            return Transition::reply(state, OutboundEvent::call_error(UNAUTHORIZED_CALLER));
        }

        let target = match self.directory.find(&to).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                debug!(from = %from, to = %to, "Offer to unknown account");
                return Transition::reply(state, OutboundEvent::call_error(USER_NOT_FOUND));
            }
            Err(e) => {
                error!(to = %to, error = %e, "Account lookup failed");
                return Transition::reply(state, OutboundEvent::call_error(CALL_FAILED));
            }
        };

        if target.has_blocked(&from) {
            debug!(from = %from, to = %to, "Offer blocked");
            return Transition::reply(state, OutboundEvent::call_error(BLOCKED_BY_TARGET));
        }

        if !self.presence.is_online(&to).await {
            debug!(from = %from, to = %to, "Offer to offline user");
            return Transition::reply(state, OutboundEvent::call_error(USER_OFFLINE));
        }

        debug!(from = %from, to = %to, "Offer forwarded");
        Transition::stay(state).with(Effect::Forward {
            to,
            event: OutboundEvent::CallUser { from, offer },
        })
    }

    async fn forward_if_online(
        &self,
        state: &ConnectionState,
        to: Identity,
        event: OutboundEvent,
    ) -> Transition {
        if !self.presence.is_online(&to).await {
            debug!(to = %to, event = event.name(), "Target offline, dropped");
            return Transition::stay(state);
        }
        debug!(to = %to, event = event.name(), "Forwarded");
        Transition::stay(state).with(Effect::Forward { to, event })
    }
}

fn register(state: &ConnectionState, identity: &Identity, claimed: Identity) -> Transition {
    if claimed != *identity {
        debug!(identity = %identity, claimed = %claimed, "addUser for another identity ignored");
        return Transition::stay(state);
    }
    Transition::to(ConnectionState::Registered {
        identity: identity.clone(),
    })
    .with(Effect::Register(claimed))
}

fn disconnect(state: &ConnectionState) -> Transition {
    match state {
        ConnectionState::Registered { identity } => {
            Transition::to(ConnectionState::Closed).with(Effect::Release(identity.clone()))
        }
        _ => Transition::to(ConnectionState::Closed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use linkup_auth::jwt::{JwtDecoder, JwtEncoder};
    use linkup_core::config::AuthConfig;
    use linkup_core::error::AppError;
    use linkup_core::result::AppResult;
    use linkup_entity::account::Account;
    use linkup_service::account::MemoryAccountDirectory;
    use serde_json::json;
    use uuid::Uuid;

    use crate::connection::pool::ConnectionPool;
    use crate::metrics::EngineMetrics;

    struct BrokenDirectory;

    #[async_trait]
    impl AccountDirectory for BrokenDirectory {
        async fn find(&self, _id: &Identity) -> AppResult<Option<Account>> {
            Err(AppError::internal("directory down"))
        }
        async fn save(&self, _account: Account) -> AppResult<()> {
            Err(AppError::internal("directory down"))
        }
        async fn list(&self) -> AppResult<Vec<Account>> {
            Err(AppError::internal("directory down"))
        }
    }

    fn id(s: &str) -> Identity {
        Identity::new(s)
    }

    fn setup_with(directory: Arc<dyn AccountDirectory>) -> (SignalingRelay, Arc<PresenceRegistry>) {
        let presence = Arc::new(PresenceRegistry::new(
            Arc::new(ConnectionPool::new()),
            Arc::new(EngineMetrics::new()),
        ));
        let decoder = Arc::new(JwtDecoder::new(&AuthConfig::default()));
        let relay = SignalingRelay::new(presence.clone(), directory, WsAuthenticator::new(decoder));
        (relay, presence)
    }

    fn setup() -> (SignalingRelay, Arc<PresenceRegistry>) {
        let mut b = Account::new(id("b"), "Bea");
        b.blocked_users.insert(id("c"));
        let directory = MemoryAccountDirectory::with_accounts([
            Account::new(id("a"), "Al"),
            b,
            Account::new(id("c"), "Cy"),
            Account::new(id("d"), "Di"),
        ]);
        setup_with(Arc::new(directory))
    }

    fn authed(s: &str) -> ConnectionState {
        ConnectionState::Authenticated { identity: id(s) }
    }

    fn offer(to: &str, from: &str) -> SessionEvent {
        SessionEvent::Inbound(ClientEvent::CallUser {
            to: id(to),
            from: id(from),
            offer: json!({"sdp": "v=0"}),
        })
    }

    fn call_error(state: &ConnectionState, message: &str) -> Transition {
        Transition::reply(state, OutboundEvent::call_error(message))
    }

    #[tokio::test]
    async fn test_handshake() {
        let (relay, _) = setup();
        let token = JwtEncoder::new(&AuthConfig::default())
            .issue(&id("a"), None)
            .expect("issue")
            .token;

        let ok = relay
            .handle(
                &ConnectionState::Connecting,
                SessionEvent::Handshake {
                    credential: Some(token),
                },
            )
            .await;
        assert_eq!(ok, Transition::to(authed("a")));

        let missing = relay
            .handle(
                &ConnectionState::Connecting,
                SessionEvent::Handshake { credential: None },
            )
            .await;
        assert_eq!(missing.state, ConnectionState::Closed);
        assert_eq!(
            missing.effects,
            vec![
                Effect::Reply(OutboundEvent::auth_error("Authentication required")),
                Effect::Close
            ]
        );

        let bad = relay
            .handle(
                &ConnectionState::Connecting,
                SessionEvent::Handshake {
                    credential: Some("forged".into()),
                },
            )
            .await;
        assert!(bad.closes());
        assert_eq!(
            bad.effects[0],
            Effect::Reply(OutboundEvent::auth_error("Invalid or expired token"))
        );
    }

    #[tokio::test]
    async fn test_add_user() {
        let (relay, _) = setup();
        let state = authed("a");

        let own = relay
            .handle(&state, SessionEvent::Inbound(ClientEvent::AddUser(id("a"))))
            .await;
        assert_eq!(own.state, ConnectionState::Registered { identity: id("a") });
        assert_eq!(own.effects, vec![Effect::Register(id("a"))]);

        let other = relay
            .handle(&state, SessionEvent::Inbound(ClientEvent::AddUser(id("b"))))
            .await;
        assert_eq!(other, Transition::stay(&state));
    }

    #[tokio::test]
    async fn test_unauthorized_caller_never_forwards() {
        let (relay, presence) = setup();
        presence.register(&id("b"), Uuid::new_v4()).await;
        let state = authed("a");

        let t = relay.handle(&state, offer("b", "c")).await;
        assert_eq!(t, call_error(&state, UNAUTHORIZED_CALLER));
    }

    #[tokio::test]
    async fn test_offer_checks_in_order() {
        let (relay, presence) = setup();
        presence.register(&id("b"), Uuid::new_v4()).await;

        let a = authed("a");
        assert_eq!(
            relay.handle(&a, offer("ghost", "a")).await,
            call_error(&a, USER_NOT_FOUND)
        );

        // blocked wins over presence
        let c = authed("c");
        assert_eq!(
            relay.handle(&c, offer("b", "c")).await,
            call_error(&c, BLOCKED_BY_TARGET)
        );

        assert_eq!(
            relay.handle(&a, offer("d", "a")).await,
            call_error(&a, USER_OFFLINE)
        );

        let ok = relay.handle(&a, offer("b", "a")).await;
        assert_eq!(
            ok.effects,
            vec![Effect::Forward {
                to: id("b"),
                event: OutboundEvent::CallUser {
                    from: id("a"),
                    offer: json!({"sdp": "v=0"}),
                },
            }]
        );
        assert_eq!(ok.state, a);
    }

    #[tokio::test]
    async fn test_lookup_failure_reports_generic_error() {
        let (relay, _) = setup_with(Arc::new(BrokenDirectory));
        let a = authed("a");
        assert_eq!(
            relay.handle(&a, offer("b", "a")).await,
            call_error(&a, CALL_FAILED)
        );
    }

    #[tokio::test]
    async fn test_follow_up_events_check_presence_only() {
        let (relay, presence) = setup();
        // c is blocked by b, but follow-up events are not block-checked
        let c = authed("c");
        presence.register(&id("b"), Uuid::new_v4()).await;

        let answered = relay
            .handle(
                &c,
                SessionEvent::Inbound(ClientEvent::AnswerCall {
                    to: id("b"),
                    answer: json!("sdp"),
                }),
            )
            .await;
        assert_eq!(
            answered.effects,
            vec![Effect::Forward {
                to: id("b"),
                event: OutboundEvent::CallAccepted {
                    answer: json!("sdp")
                },
            }]
        );

        for event in [
            ClientEvent::EndCall { to: id("d") },
            ClientEvent::RejectCall { to: id("d") },
            ClientEvent::IceCandidate {
                to: id("ghost"),
                candidate: json!({}),
            },
        ] {
            let t = relay.handle(&c, SessionEvent::Inbound(event)).await;
            assert_eq!(t, Transition::stay(&c));
        }

        let ended = relay
            .handle(&c, SessionEvent::Inbound(ClientEvent::EndCall { to: id("b") }))
            .await;
        assert_eq!(
            ended.effects,
            vec![Effect::Forward {
                to: id("b"),
                event: OutboundEvent::CallEnded
            }]
        );
    }

    #[tokio::test]
    async fn test_disconnect_paths() {
        let (relay, _) = setup();

        let registered = ConnectionState::Registered { identity: id("a") };
        assert_eq!(
            relay.handle(&registered, SessionEvent::Disconnect).await,
            Transition::to(ConnectionState::Closed).with(Effect::Release(id("a")))
        );

        for state in [authed("a"), ConnectionState::Connecting, ConnectionState::Closed] {
            assert_eq!(
                relay.handle(&state, SessionEvent::Disconnect).await,
                Transition::to(ConnectionState::Closed)
            );
        }
    }

    #[tokio::test]
    async fn test_inbound_before_auth_or_after_close_is_ignored() {
        let (relay, _) = setup();
        for state in [ConnectionState::Connecting, ConnectionState::Closed] {
            let t = relay.handle(&state, offer("b", "a")).await;
            assert_eq!(t, Transition::stay(&state));
        }
        // a second handshake on a live connection is ignored too
        let a = authed("a");
        let t = relay
            .handle(&a, SessionEvent::Handshake { credential: None })
            .await;
        assert_eq!(t, Transition::stay(&a));
    }
}
