//! Process-wide auth session with explicit listener lifecycle.
//!
//! Screens subscribe for auth changes and hold on to the returned
//! [`Subscription`]; dropping it removes the listener.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock, Weak};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub user: AuthUser,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| at <= now).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

type Listener = Arc<dyn Fn(AuthEvent, Option<&Session>) + Send + Sync>;

#[derive(Default)]
struct Inner {
    current: RwLock<Option<Session>>,
    listeners: Mutex<BTreeMap<u64, Listener>>,
    next_id: AtomicU64,
}

#[derive(Clone, Default)]
pub struct SessionHolder {
    inner: Arc<Inner>,
}

impl SessionHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Session> {
        self.inner
            .current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.current().map(|s| s.access_token)
    }

    /// Auth subject of the signed-in user.
    pub fn subject(&self) -> Option<String> {
        self.current().map(|s| s.user.id)
    }

    pub fn is_signed_in(&self) -> bool {
        self.current().is_some()
    }

    /// Seed the holder with a session persisted elsewhere.
    pub fn restore(&self, session: Option<Session>) {
        self.set(AuthEvent::InitialSession, session);
    }

    /// Replace the session and notify every listener.
    pub fn set(&self, event: AuthEvent, session: Option<Session>) {
        {
            let mut current = self.inner.current.write().unwrap_or_else(|e| e.into_inner());
            *current = session.clone();
        }

        // Listeners may subscribe or unsubscribe from inside the callback,
        // so call them outside the lock.
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect();

        tracing::debug!(?event, listeners = listeners.len(), "auth state changed");
        for listener in listeners {
            listener(event, session.as_ref());
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(AuthEvent, Option<&Session>) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, Arc::new(listener));

        Subscription {
            id,
            holder: Arc::downgrade(&self.inner),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

/// Live registration of an auth listener. Unsubscribes on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    holder: Weak<Inner>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.holder.upgrade() {
            inner
                .listeners
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn session(sub: &str) -> Session {
        Session {
            access_token: "token".into(),
            refresh_token: "refresh".into(),
            expires_at: None,
            user: AuthUser {
                id: sub.into(),
                email: None,
                phone: None,
            },
        }
    }

    #[test]
    fn listeners_see_changes_until_unsubscribed() {
        let holder = SessionHolder::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        let sub = holder.subscribe(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        holder.set(AuthEvent::SignedIn, Some(session("a")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(holder.subject().as_deref(), Some("a"));

        sub.unsubscribe();
        assert_eq!(holder.listener_count(), 0);

        holder.set(AuthEvent::SignedOut, None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!holder.is_signed_in());
    }

    #[test]
    fn dropping_subscription_detaches() {
        let holder = SessionHolder::new();
        {
            let _sub = holder.subscribe(|_, _| {});
            assert_eq!(holder.listener_count(), 1);
        }
        assert_eq!(holder.listener_count(), 0);
    }

    #[test]
    fn listener_receives_event_and_session() {
        let holder = SessionHolder::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        let _sub = holder.subscribe(move |event, s| {
            log.lock().unwrap().push((event, s.map(|s| s.user.id.clone())));
        });

        holder.set(AuthEvent::SignedIn, Some(session("a")));
        holder.set(AuthEvent::SignedOut, None);

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                (AuthEvent::SignedIn, Some("a".to_string())),
                (AuthEvent::SignedOut, None),
            ]
        );
    }

    #[test]
    fn expiry_check() {
        let mut s = session("a");
        let now = Utc::now();
        assert!(!s.is_expired(now));
        s.expires_at = Some(now - chrono::Duration::seconds(1));
        assert!(s.is_expired(now));
    }
}
