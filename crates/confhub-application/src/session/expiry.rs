//! Central reaction to failed backend calls.

use async_trait::async_trait;
use confhub_core::ConfhubError;
use confhub_core::error::SESSION_EXPIRED_MESSAGE;
use confhub_core::navigation::Route;
use confhub_core::notice::Notice;
use confhub_interaction::ResponseInterceptor;

use super::context::SessionContext;

const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// Interceptor installed on the API client.
///
/// A `401` while a session is active ends the session, shows the expiry
/// notice and sends the operator to the login view. Every other failure only
/// shows its notice.
pub struct SessionExpiryInterceptor {
    context: SessionContext,
}

impl SessionExpiryInterceptor {
    pub fn new(context: SessionContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl ResponseInterceptor for SessionExpiryInterceptor {
    async fn on_error(&self, error: &ConfhubError) {
        if error.is_session_expired() {
            if self.context.expire_session().await {
                tracing::info!("backend rejected the session credential; signing out");
                self.context
                    .notifier
                    .notify(Notice::error(SESSION_EXPIRED_MESSAGE));
                self.context.navigator.navigate(Route::Login);
            } else {
                tracing::debug!("401 with no active session; already handled");
            }
            return;
        }

        let message = error
            .notice_message()
            .unwrap_or_else(|| UNEXPECTED_ERROR_MESSAGE.to_string());
        self.context.notifier.notify(Notice::error(message));
    }
}
