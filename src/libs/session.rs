//! Authenticated sessions and change notifications.
//!
//! `SessionContext` is the explicit carrier of "who is signed in" for one
//! auth provider. Observers register a callback with [`SessionContext::subscribe`]
//! and keep the returned [`Subscription`]; dropping it unregisters the
//! callback. Providers call [`SessionContext::publish`] whenever a session is
//! established, ended or found expired.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};
use uuid::Uuid;

/// The authentication subject a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: Identity,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

type Listener = Arc<dyn Fn(Option<&Session>) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: BTreeMap<u64, Listener>,
}

#[derive(Clone, Default)]
pub struct SessionContext {
    listeners: Arc<Mutex<Listeners>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Option<&Session>) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.lock();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.insert(id, Arc::new(callback));
        tracing::debug!(subscription = id, "session listener registered");

        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Notifies every registered listener. Callbacks run outside the lock so
    /// they may subscribe or drop subscriptions themselves.
    pub fn publish(&self, session: Option<&Session>) {
        let snapshot: Vec<Listener> = self.listeners.lock().entries.values().cloned().collect();
        tracing::debug!(listeners = snapshot.len(), signed_in = session.is_some(), "session change");
        for listener in snapshot {
            listener(session);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().entries.len()
    }
}

/// Registration handle returned by [`SessionContext::subscribe`].
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.lock().entries.remove(&self.id);
            tracing::debug!(subscription = self.id, "session listener removed");
        }
    }
}
