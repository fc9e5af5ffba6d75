//! State shared between the session manager and the expiry interceptor.

use std::sync::Arc;

use confhub_core::navigation::Navigator;
use confhub_core::notice::Notifier;
use confhub_core::session::{AuthState, CredentialStore, Session, TOKEN_KEY, USER_KEY};
use confhub_interaction::CredentialSlot;
use tokio::sync::{Mutex, RwLock};

/// Handles to everything a session touches.
///
/// Cloning shares the same state; the manager and the interceptor each hold a
/// clone instead of referring to one another.
///
/// Every change that touches both the durable entries and the in-memory state
/// runs under `transition`, so the two never describe different sessions.
/// Lock order is `transition` before `state`.
#[derive(Clone)]
pub struct SessionContext {
    transition: Arc<Mutex<()>>,
    pub(crate) state: Arc<RwLock<AuthState>>,
    pub(crate) store: Arc<dyn CredentialStore>,
    pub(crate) credential: CredentialSlot,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) navigator: Arc<dyn Navigator>,
}

impl SessionContext {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        credential: CredentialSlot,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            transition: Arc::new(Mutex::new(())),
            state: Arc::new(RwLock::new(AuthState::Unknown)),
            store,
            credential,
            notifier,
            navigator,
        }
    }

    pub async fn state(&self) -> AuthState {
        self.state.read().await.clone()
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// Ends the current session, if any.
    ///
    /// The in-memory state becomes `Unauthenticated` and the credential slot
    /// and durable entries are cleared. Returns whether a session was active.
    pub(crate) async fn end_session(&self) -> bool {
        let _transition = self.transition.lock().await;
        let was_active = {
            let mut state = self.state.write().await;
            let was_active = state.is_authenticated();
            *state = AuthState::Unauthenticated;
            was_active
        };
        self.credential.clear().await;
        self.erase_entries().await;
        was_active
    }

    /// Ends the session only if one is active; a no-op otherwise.
    ///
    /// The check and the state change happen under one write lock, so
    /// concurrent callers see `true` at most once per session.
    pub(crate) async fn expire_session(&self) -> bool {
        let _transition = self.transition.lock().await;
        {
            let mut state = self.state.write().await;
            if !state.is_authenticated() {
                return false;
            }
            *state = AuthState::Unauthenticated;
        }
        self.credential.clear().await;
        self.erase_entries().await;
        true
    }

    /// Writes both durable entries, then publishes the session.
    pub(crate) async fn begin_session(&self, session: Session) -> confhub_core::Result<()> {
        let user_entry = session.user_entry()?;
        let _transition = self.transition.lock().await;
        if let Err(e) = self.write_entries(session.token(), &user_entry).await {
            self.erase_entries().await;
            return Err(e);
        }

        self.credential.install(session.token()).await;
        *self.state.write().await = AuthState::Authenticated(session);
        Ok(())
    }

    /// Holds off other session changes until the guard is dropped.
    pub(crate) async fn begin_transition(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.transition.lock().await
    }

    async fn write_entries(&self, token: &str, user_entry: &str) -> confhub_core::Result<()> {
        self.store.set(TOKEN_KEY, token).await?;
        self.store.set(USER_KEY, user_entry).await
    }

    pub(crate) async fn erase_entries(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.store.remove(key).await {
                tracing::warn!(key, error = %e, "failed to remove stored credential entry");
            }
        }
    }
}
