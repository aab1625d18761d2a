//! Explicit auth/session state shared by every network-calling component.
//!
//! Lifecycle: [`SessionContext::hydrate`] reads the persisted token and user at
//! startup, [`SessionContext::establish`] stores them after login, and
//! [`SessionContext::logout`] / [`SessionContext::force_logout`] clear both.

pub mod loading;
pub mod store;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

use crate::models::user::User;
use store::{SessionStore, SessionStoreError, TOKEN_KEY, USER_KEY};

#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

pub struct SessionContext {
    store: Arc<dyn SessionStore>,
    state: RwLock<Option<AuthSession>>,
    teardowns: AtomicU64,
}

impl SessionContext {
    /// An empty session backed by `store`. Nothing is read from the store.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            state: RwLock::new(None),
            teardowns: AtomicU64::new(0),
        }
    }

    /// Restores a previous login from `store`.
    ///
    /// Both keys must be present. A cached user that no longer decodes is
    /// treated as a logged-out state and both keys are cleared.
    pub fn hydrate(store: Arc<dyn SessionStore>) -> Result<Self, SessionStoreError> {
        let ctx = Self::new(store);
        let token = ctx.store.get(TOKEN_KEY)?;
        let user = ctx.store.get(USER_KEY)?;

        if let (Some(token), Some(user)) = (token, user) {
            match serde_json::from_str::<User>(&user) {
                Ok(user) => {
                    info!("Restored session for {} ({})", user.email, user.role);
                    *ctx.write() = Some(AuthSession { token, user });
                }
                Err(e) => {
                    warn!("Discarding unreadable cached user: {e}");
                    ctx.clear_store();
                }
            }
        }
        Ok(ctx)
    }

    /// Persists and activates a fresh login.
    pub fn establish(&self, token: String, user: User) -> Result<(), SessionStoreError> {
        let user_json = serde_json::to_string(&user)?;
        self.store.set(TOKEN_KEY, &token)?;
        self.store.set(USER_KEY, &user_json)?;
        *self.write() = Some(AuthSession { token, user });
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    pub fn current_user(&self) -> Option<User> {
        self.read().as_ref().map(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    /// User-initiated logout. Returns `false` if there was no session.
    pub fn logout(&self) -> bool {
        let mut state = self.write();
        let had_session = state.take().is_some();
        self.clear_store();
        if had_session {
            self.teardowns.fetch_add(1, Ordering::AcqRel);
            info!("Logged out");
        }
        had_session
    }

    /// Tears the session down after an auth failure on a request sent with `token`.
    ///
    /// Only the session that issued the failing request is torn down, so any
    /// number of 401/403 responses for the same token produce one teardown.
    pub fn force_logout(&self, token: &str) -> bool {
        let mut state = self.write();
        match state.as_ref() {
            Some(current) if current.token == token => {
                let email = current.user.email.clone();
                *state = None;
                self.clear_store();
                self.teardowns.fetch_add(1, Ordering::AcqRel);
                warn!("Session for {email} rejected by the API; logged out");
                true
            }
            _ => false,
        }
    }

    /// Number of times a live session has been torn down.
    pub fn teardown_count(&self) -> u64 {
        self.teardowns.load(Ordering::Acquire)
    }

    fn clear_store(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.store.remove(key) {
                warn!("Failed to clear persisted '{key}': {e}");
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<AuthSession>> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<AuthSession>> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}
