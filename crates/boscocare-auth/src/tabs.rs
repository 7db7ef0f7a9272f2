//! Tab contexts and the registry that owns them.
//!
//! A tab is one browser tab's server-side state: its session store, its dev
//! role override and the profile loaded for its identity. Tabs are created on
//! first contact, looked up by id on every request and dropped after
//! `ttl_secs` without a request.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use boscocare_backend::AuthProvider;
use boscocare_models::Profile;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::roles::DevRoleOverride;
use crate::session::{AuthEvent, SessionStore};

type ProfileSlot = Arc<Mutex<Option<(Uuid, Profile)>>>;

pub struct TabContext {
    pub id: Uuid,
    pub session: SessionStore,
    pub dev_override: DevRoleOverride,
    profile: ProfileSlot,
    last_seen: AtomicI64,
}

impl TabContext {
    /// Creates the tab and starts the observer that drops the cached profile
    /// when the session ends or changes hands. Must be called inside a Tokio
    /// runtime.
    pub fn new(id: Uuid, provider: Arc<dyn AuthProvider>) -> Self {
        let session = SessionStore::new(provider);
        let profile: ProfileSlot = Arc::new(Mutex::new(None));

        let mut subscription = session.subscribe();
        let slot = profile.clone();
        tokio::spawn(async move {
            while let Some(state) = subscription.changed().await {
                let user_id = state.session.as_ref().and_then(|s| s.user_id());
                let mut cached = slot.lock().unwrap_or_else(|p| p.into_inner());
                let stale = match (&*cached, user_id) {
                    (Some((owner, _)), Some(current)) => *owner != current,
                    (Some(_), None) => true,
                    (None, _) => false,
                };
                if stale || state.event == AuthEvent::SignedOut {
                    *cached = None;
                }
            }
        });

        Self {
            id,
            session,
            dev_override: DevRoleOverride::default(),
            profile,
            last_seen: AtomicI64::new(Utc::now().timestamp()),
        }
    }

    /// The cached profile, if it belongs to the current identity.
    pub fn cached_profile(&self) -> Option<Profile> {
        let user_id = self.session.user_id()?;
        let cached = self.profile.lock().unwrap_or_else(|p| p.into_inner());
        match &*cached {
            Some((owner, profile)) if *owner == user_id => Some(profile.clone()),
            _ => None,
        }
    }

    pub fn store_profile(&self, user_id: Uuid, profile: Option<Profile>) {
        *self.profile.lock().unwrap_or_else(|p| p.into_inner()) = profile.map(|p| (user_id, p));
    }

    pub fn clear_profile(&self) {
        *self.profile.lock().unwrap_or_else(|p| p.into_inner()) = None;
    }

    pub fn touch(&self) {
        self.last_seen.store(Utc::now().timestamp(), Ordering::Relaxed);
    }

    fn idle_for(&self, now: i64) -> i64 {
        now - self.last_seen.load(Ordering::Relaxed)
    }
}

/// Process-wide map from tab id to [`TabContext`].
pub struct TabRegistry {
    tabs: RwLock<HashMap<Uuid, Arc<TabContext>>>,
    provider: Arc<dyn AuthProvider>,
    ttl_secs: i64,
}

impl TabRegistry {
    pub fn new(provider: Arc<dyn AuthProvider>, ttl_secs: i64) -> Self {
        Self {
            tabs: RwLock::new(HashMap::new()),
            provider,
            ttl_secs,
        }
    }

    pub fn open(&self) -> Arc<TabContext> {
        self.insert(Uuid::new_v4())
    }

    /// A live tab, refreshing its idle timer.
    pub fn get(&self, id: Uuid) -> Option<Arc<TabContext>> {
        let now = Utc::now().timestamp();
        let tab = self
            .tabs
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .get(&id)
            .cloned()?;

        if tab.idle_for(now) > self.ttl_secs {
            self.close(id);
            return None;
        }
        tab.touch();
        Some(tab)
    }

    /// The tab with this id, recreating it empty if it expired or the
    /// process restarted since it was issued.
    pub fn get_or_open(&self, id: Uuid) -> Arc<TabContext> {
        match self.get(id) {
            Some(tab) => tab,
            None => self.insert(id),
        }
    }

    pub fn close(&self, id: Uuid) -> bool {
        self.tabs
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .remove(&id)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.tabs.read().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every tab idle for longer than the TTL.
    pub fn prune(&self) -> usize {
        let now = Utc::now().timestamp();
        let mut tabs = self.tabs.write().unwrap_or_else(|p| p.into_inner());
        let before = tabs.len();
        tabs.retain(|_, tab| tab.idle_for(now) <= self.ttl_secs);
        let removed = before - tabs.len();
        if removed > 0 {
            debug!(removed, remaining = tabs.len(), "Pruned idle tabs");
        }
        removed
    }

    fn insert(&self, id: Uuid) -> Arc<TabContext> {
        self.prune();
        let tab = Arc::new(TabContext::new(id, self.provider.clone()));
        self.tabs
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .insert(id, tab.clone());
        debug!(tab_id = %id, "Opened tab");
        tab
    }
}
