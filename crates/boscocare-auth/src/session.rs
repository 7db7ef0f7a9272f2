//! Per-tab session store.
//!
//! The store owns the tab's current provider session and publishes every
//! transition on a `watch` channel. Subscribers see the current state as soon
//! as they subscribe and every later transition after that; dropping a
//! [`SessionSubscription`] unsubscribes it.

use std::sync::Arc;

use boscocare_backend::{AuthProvider, Identity, Session};
use chrono::Utc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub event: AuthEvent,
    pub session: Option<Session>,
}

pub struct SessionStore {
    provider: Arc<dyn AuthProvider>,
    state: watch::Sender<SessionState>,
    refresh_lock: Mutex<()>,
}

impl SessionStore {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        let (state, _) = watch::channel(SessionState {
            event: AuthEvent::InitialSession,
            session: None,
        });

        Self {
            provider,
            state,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            receiver: self.state.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.receiver_count()
    }

    /// The stored session as is, without checking expiry.
    pub fn current(&self) -> Option<Session> {
        self.state.borrow().session.clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().session.as_ref().and_then(|s| s.user.clone())
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.state.borrow().session.as_ref().and_then(|s| s.user_id())
    }

    pub fn access_token(&self) -> Option<String> {
        self.state
            .borrow()
            .session
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    pub fn set_session(&self, session: Session, event: AuthEvent) {
        self.state.send_replace(SessionState {
            event,
            session: Some(session),
        });
    }

    /// Drops the session. Subscribers are notified only if one was present.
    pub fn clear(&self) {
        self.state.send_if_modified(|state| {
            if state.session.is_none() {
                return false;
            }
            *state = SessionState {
                event: AuthEvent::SignedOut,
                session: None,
            };
            true
        });
    }

    /// The current session, refreshed first if it has expired.
    ///
    /// A refresh the provider rejects ends the session.
    pub async fn get_session(&self) -> Option<Session> {
        let session = self.current()?;
        if !session.is_expired(Utc::now()) {
            return Some(session);
        }

        let _guard = self.refresh_lock.lock().await;

        // Another caller may have refreshed while this one waited.
        let session = self.current()?;
        if !session.is_expired(Utc::now()) {
            return Some(session);
        }

        match self.provider.refresh_session(&session.refresh_token).await {
            Ok(mut refreshed) => {
                if refreshed.user.is_none() {
                    refreshed.user = session.user.clone();
                }
                debug!(user_id = ?refreshed.user_id(), "Session refreshed");
                self.set_session(refreshed.clone(), AuthEvent::TokenRefreshed);
                Some(refreshed)
            }
            Err(e) => {
                warn!(error = %e, "Session refresh failed, signing out");
                self.clear();
                None
            }
        }
    }
}

/// Observer handle returned by [`SessionStore::subscribe`].
pub struct SessionSubscription {
    receiver: watch::Receiver<SessionState>,
}

impl SessionSubscription {
    /// The state at the time of the call.
    pub fn current(&self) -> SessionState {
        self.receiver.borrow().clone()
    }

    /// Waits for the next transition. Returns `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<SessionState> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}
