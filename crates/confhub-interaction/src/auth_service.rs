//! Authentication endpoints.

use confhub_core::Result;
use confhub_core::session::UserProfile;
use confhub_core::user::NewAccount;
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Successful login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Calls `/auth/*`.
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `POST /auth/login`
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        self.client
            .post_json(&["auth", "login"], &LoginRequest { email, password })
            .await
    }

    /// `POST /auth/saveUser`; a taken email comes back as `Conflict`.
    pub async fn signup(&self, account: &NewAccount) -> Result<()> {
        self.client
            .post_json_discard(&["auth", "saveUser"], account)
            .await
    }
}
