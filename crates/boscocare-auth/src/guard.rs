//! Route guard state machine.
//!
//! `Loading` until the first observation, then `Authenticated` or
//! `Unauthenticated`. A provider error while reading the session counts as no
//! session.

use boscocare_backend::Session;

use crate::session::SessionStore;

/// Where unauthenticated requests are sent.
pub const SIGN_IN_PATH: &str = "/auth";

#[derive(Debug, Clone, PartialEq)]
pub enum GuardState {
    Loading,
    Authenticated(Session),
    Unauthenticated,
}

#[derive(Debug)]
pub struct RouteGuard {
    state: GuardState,
    transitions: usize,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteGuard {
    pub fn new() -> Self {
        Self {
            state: GuardState::Loading,
            transitions: 0,
        }
    }

    /// Resolves the guard for a tab. The replayed subscription state and a
    /// one-shot session read are taken concurrently and applied in that
    /// order, so the read (which may have refreshed the token) wins.
    pub async fn mount(store: &SessionStore) -> Self {
        let subscription = store.subscribe();
        let (replayed, fetched) = tokio::join!(
            async { subscription.current().session },
            store.get_session()
        );

        let mut guard = Self::new();
        guard.observe(replayed);
        guard.observe(fetched);
        guard
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    pub fn into_state(self) -> GuardState {
        self.state
    }

    /// Number of times the state actually changed.
    pub fn transitions(&self) -> usize {
        self.transitions
    }

    /// Applies one observation. Returns whether the state changed; seeing the
    /// same session again is a no-op.
    pub fn observe(&mut self, session: Option<Session>) -> bool {
        let next = match session {
            Some(session) => GuardState::Authenticated(session),
            None => GuardState::Unauthenticated,
        };
        if next == self.state {
            return false;
        }
        self.state = next;
        self.transitions += 1;
        true
    }

    /// A session transition was reported; wait for the next observation.
    pub fn reset(&mut self) {
        self.state = GuardState::Loading;
    }

    pub fn redirect(&self) -> Option<&'static str> {
        match self.state {
            GuardState::Unauthenticated => Some(SIGN_IN_PATH),
            _ => None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            GuardState::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}
