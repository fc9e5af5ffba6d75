use std::sync::Arc;

use confhub_core::error::{ConfhubError, Result};
use confhub_core::navigation::{Navigator, Route, RouteDecision, guard};
use confhub_core::notice::{Notice, Notifier};
use confhub_core::session::{
    AuthState, CredentialStore, Session, TOKEN_KEY, USER_KEY, UserProfile,
};
use confhub_core::user::{FieldErrors, SignupField, SignupForm};
use confhub_interaction::{ApiClient, AuthService};

use super::context::SessionContext;
use super::expiry::SessionExpiryInterceptor;

const LOGIN_FAILED_MESSAGE: &str = "Login failed";
const NOT_RESTORED_MESSAGE: &str = "Stored session has not been restored yet";

/// Outcome of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginResult {
    Success(UserProfile),
    Failure { message: String },
}

impl LoginResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Converts a failure into [`ConfhubError::AuthFailure`].
    pub fn into_result(self) -> Result<UserProfile> {
        match self {
            Self::Success(user) => Ok(user),
            Self::Failure { message } => Err(ConfhubError::AuthFailure(message)),
        }
    }
}

/// Outcome of an account creation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupOutcome {
    Created,
    /// Inline errors to show next to the form fields.
    Invalid(FieldErrors),
    Failed { message: String },
}

/// Owns the authenticated session of the running client.
///
/// `SessionManager` is responsible for:
/// - Restoring persisted credentials on startup
/// - Logging in and out
/// - Creating accounts
/// - Answering route guard checks
///
/// The API client it hands out carries the expiry interceptor, so a `401` on
/// any call made through it ends the session.
pub struct SessionManager {
    context: SessionContext,
    client: ApiClient,
    auth: AuthService,
}

impl SessionManager {
    /// Creates a manager and installs the expiry interceptor on `client`.
    ///
    /// # Arguments
    ///
    /// * `client` - API client; its credential slot becomes the session credential
    /// * `store` - Durable storage for the token and user entries
    /// * `notifier` - Sink for user-facing notices
    /// * `navigator` - Moves the operator between views
    pub fn new(
        client: ApiClient,
        store: Arc<dyn CredentialStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let context = SessionContext::new(store, client.credential().clone(), notifier, navigator);
        let interceptor = Arc::new(SessionExpiryInterceptor::new(context.clone()));
        let client = client.with_interceptor(interceptor);
        // Auth endpoints report their own failures, so they bypass the interceptor.
        let auth = AuthService::new(client.without_interceptor());

        Self {
            context,
            client,
            auth,
        }
    }

    /// Client for protected calls, with the expiry interceptor installed.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub async fn state(&self) -> AuthState {
        self.context.state().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.context.state.read().await.is_authenticated()
    }

    pub async fn current_user(&self) -> Option<UserProfile> {
        self.context.state.read().await.user().cloned()
    }

    /// Loads the persisted session, if any.
    ///
    /// Runs once: later calls return the current state unchanged. Storage read
    /// errors count as absent entries. A token or user entry that cannot form
    /// a session is erased.
    pub async fn restore(&self) -> AuthState {
        let _transition = self.context.begin_transition().await;
        let mut state = self.context.state.write().await;
        if !state.is_unknown() {
            return state.clone();
        }

        let token = self.read_entry(TOKEN_KEY).await;
        let user = self.read_entry(USER_KEY).await;
        let had_entries = token.is_some() || user.is_some();

        *state = match Session::from_entries(token, user) {
            Some(session) => {
                self.context.credential.install(session.token()).await;
                tracing::info!(user = %session.user().email, "restored stored session");
                AuthState::Authenticated(session)
            }
            None => {
                if had_entries {
                    tracing::warn!("stored session is incomplete or malformed; erasing it");
                    self.context.erase_entries().await;
                }
                AuthState::Unauthenticated
            }
        };
        state.clone()
    }

    async fn read_entry(&self, key: &str) -> Option<String> {
        match self.context.store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read stored credential entry");
                None
            }
        }
    }

    /// Exchanges credentials for a session.
    ///
    /// Never fails: errors are folded into [`LoginResult::Failure`], carrying
    /// the server message or `"Login failed"`. Concurrent logins are not
    /// deduplicated; the last response to arrive wins.
    pub async fn login(&self, email: &str, password: &str) -> LoginResult {
        if self.context.state.read().await.is_unknown() {
            return LoginResult::Failure {
                message: NOT_RESTORED_MESSAGE.to_string(),
            };
        }

        let response = match self.auth.login(email, password).await {
            Ok(response) => response,
            Err(e) => {
                tracing::info!(error = %e, "login rejected");
                return LoginResult::Failure {
                    message: e.server_message().unwrap_or(LOGIN_FAILED_MESSAGE).to_string(),
                };
            }
        };

        let user = response.user.clone();
        match self
            .context
            .begin_session(Session::new(response.token, response.user))
            .await
        {
            Ok(()) => {
                tracing::info!(user = %user.email, "logged in");
                LoginResult::Success(user)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to persist session");
                LoginResult::Failure {
                    message: format!("Unable to save session: {e}"),
                }
            }
        }
    }

    /// Ends the session and returns to the login view. Safe to call repeatedly.
    pub async fn logout(&self) {
        if self.context.end_session().await {
            tracing::info!("logged out");
        }
        self.context.navigator.navigate(Route::Login);
    }

    /// Decides whether `route` may render now.
    pub async fn guard(&self, route: Route) -> RouteDecision {
        guard(route, &*self.context.state.read().await)
    }

    /// Validates the form and creates the account.
    ///
    /// On success the operator is sent to the login view. A taken email comes
    /// back as an inline error on the email field.
    pub async fn signup(&self, form: &SignupForm) -> SignupOutcome {
        let errors = form.validate();
        if !errors.is_empty() {
            self.context
                .notifier
                .notify(Notice::error("Please fix the errors in the form"));
            return SignupOutcome::Invalid(errors);
        }

        match self.auth.signup(&form.to_account()).await {
            Ok(()) => {
                self.context
                    .notifier
                    .notify(Notice::success("Account created successfully! Please login."));
                self.context.navigator.navigate(Route::Login);
                SignupOutcome::Created
            }
            Err(e) if e.is_conflict() => {
                self.context.notifier.notify(Notice::error(
                    "Email already registered. Please login instead.",
                ));
                let mut errors = FieldErrors::new();
                errors.insert(
                    SignupField::Email,
                    "This email is already registered".to_string(),
                );
                SignupOutcome::Invalid(errors)
            }
            Err(e) => {
                let message = e
                    .server_message()
                    .unwrap_or("Failed to create account. Please try again.")
                    .to_string();
                self.context.notifier.notify(Notice::error(message.clone()));
                SignupOutcome::Failed { message }
            }
        }
    }
}
