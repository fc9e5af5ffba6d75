//! In-process backend and recording sinks shared by the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use confhub_application::SessionManager;
use confhub_core::navigation::{Navigator, Route};
use confhub_core::notice::{Notice, NoticeLevel, Notifier};
use confhub_core::session::{CredentialStore, MemoryCredentialStore};
use confhub_interaction::ApiClient;
use serde_json::{Value, json};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "Secret123";

#[derive(Default)]
pub struct FakeBackend {
    pub configs: Mutex<Vec<Value>>,
    pub registered: Mutex<Vec<String>>,
    accepted_token: Mutex<Option<String>>,
    issued: Mutex<u32>,
    pub authorization: Mutex<Vec<Option<String>>>,
    pub uploads: Mutex<Vec<Vec<(String, String)>>>,
}

type Shared = Arc<FakeBackend>;

impl FakeBackend {
    /// Makes `token` the only credential protected endpoints accept.
    pub fn accept_token(&self, token: &str) {
        *self.accepted_token.lock().unwrap() = Some(token.to_string());
    }

    /// Rejects every credential from now on.
    pub fn revoke_tokens(&self) {
        *self.accepted_token.lock().unwrap() = None;
    }

    pub fn seed(&self, configs: Vec<Value>) {
        *self.configs.lock().unwrap() = configs;
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), Response> {
        let header = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.authorization.lock().unwrap().push(header.clone());

        let accepted = self.accepted_token.lock().unwrap().clone();
        match (header, accepted) {
            (Some(header), Some(token)) if header == format!("Bearer {token}") => Ok(()),
            _ => Err(error(StatusCode::UNAUTHORIZED, "Unauthorized")),
        }
    }

    fn find(&self, id: &str) -> Option<Value> {
        self.configs
            .lock()
            .unwrap()
            .iter()
            .find(|c| c["id"].to_string() == id)
            .cloned()
    }
}

pub fn config(id: i64, service: &str, env: &str, version: i64, active: bool, created_at: &str) -> Value {
    json!({
        "id": id,
        "serviceName": service,
        "environment": env,
        "version": version,
        "isActive": active,
        "createdAt": created_at,
        "createdBy": ADMIN_EMAIL,
        "configData": {"service": service, "version": version}
    })
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

async fn login(State(backend): State<Shared>, Json(body): Json<Value>) -> Response {
    if body["email"] == "silent@example.com" {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if body["email"] != ADMIN_EMAIL || body["password"] != ADMIN_PASSWORD {
        return error(StatusCode::UNAUTHORIZED, "Invalid email or password");
    }

    let token = {
        let mut issued = backend.issued.lock().unwrap();
        *issued += 1;
        format!("token-{issued}")
    };
    backend.accept_token(&token);
    Json(json!({
        "token": token,
        "user": {"id": 1, "name": "Admin User", "email": ADMIN_EMAIL}
    }))
    .into_response()
}

async fn save_user(State(backend): State<Shared>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let mut registered = backend.registered.lock().unwrap();
    if email == ADMIN_EMAIL || registered.contains(&email) {
        return error(StatusCode::CONFLICT, "Email already exists");
    }
    registered.push(email);
    StatusCode::CREATED.into_response()
}

async fn list_configs(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(rejection) = backend.authorize(&headers) {
        return rejection;
    }
    Json(Value::Array(backend.configs.lock().unwrap().clone())).into_response()
}

async fn config_by_id(
    State(backend): State<Shared>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = backend.authorize(&headers) {
        return rejection;
    }
    match backend.find(&key) {
        Some(config) => Json(config).into_response(),
        None => error(StatusCode::NOT_FOUND, "Config not found"),
    }
}

async fn stats(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(rejection) = backend.authorize(&headers) {
        return rejection;
    }
    let configs = backend.configs.lock().unwrap();
    let mut services: Vec<&Value> = configs.iter().map(|c| &c["serviceName"]).collect();
    services.sort_by_key(|name| name.to_string());
    services.dedup();
    let active = configs.iter().filter(|c| c["isActive"] == true).count();
    Json(json!({
        "totalServices": services.len(),
        "totalConfigs": configs.len(),
        "activeConfigs": active,
        "inactiveConfigs": configs.len() - active,
    }))
    .into_response()
}

async fn active_config(
    State(backend): State<Shared>,
    Path((key, env)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = backend.authorize(&headers) {
        return rejection;
    }
    let active = backend
        .configs
        .lock()
        .unwrap()
        .iter()
        .find(|c| {
            c["serviceName"] == key.as_str() && c["environment"] == env.as_str() && c["isActive"] == true
        })
        .cloned();
    match active {
        Some(config) => Json(config).into_response(),
        None => error(StatusCode::NOT_FOUND, "No active configuration"),
    }
}

async fn history(
    State(backend): State<Shared>,
    Path((key, env)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = backend.authorize(&headers) {
        return rejection;
    }
    let versions: Vec<Value> = backend
        .configs
        .lock()
        .unwrap()
        .iter()
        .filter(|c| c["serviceName"] == key.as_str() && c["environment"] == env.as_str())
        .cloned()
        .collect();
    Json(Value::Array(versions)).into_response()
}

async fn activate(
    State(backend): State<Shared>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = backend.authorize(&headers) {
        return rejection;
    }
    let Some(target) = backend.find(&key) else {
        return error(StatusCode::NOT_FOUND, "Config not found");
    };

    let mut configs = backend.configs.lock().unwrap();
    let mut activated = target.clone();
    for config in configs.iter_mut() {
        if config["serviceName"] == target["serviceName"]
            && config["environment"] == target["environment"]
        {
            let is_target = config["id"] == target["id"];
            config["isActive"] = Value::Bool(is_target);
            if is_target {
                activated = config.clone();
            }
        }
    }
    Json(activated).into_response()
}

async fn remove(
    State(backend): State<Shared>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = backend.authorize(&headers) {
        return rejection;
    }
    let mut configs = backend.configs.lock().unwrap();
    let before = configs.len();
    configs.retain(|c| c["id"].to_string() != key);
    if configs.len() == before {
        return error(StatusCode::NOT_FOUND, "Config not found");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn upload(State(backend): State<Shared>, headers: HeaderMap, mut multipart: Multipart) -> Response {
    if let Err(rejection) = backend.authorize(&headers) {
        return rejection;
    }

    let mut fields = Vec::new();
    let mut content = String::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return error(StatusCode::BAD_REQUEST, &e.to_string()),
        };
        let name = field.name().unwrap_or_default().to_string();
        let value = if name == "file" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            content = field.text().await.unwrap_or_default();
            file_name
        } else {
            field.text().await.unwrap_or_default()
        };
        fields.push((name, value));
    }

    let field = |key: &str| {
        fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.clone())
            .unwrap_or_default()
    };
    let service = field("serviceName");
    let env = field("environment");

    let mut configs = backend.configs.lock().unwrap();
    let id = configs.iter().filter_map(|c| c["id"].as_i64()).max().unwrap_or(0) + 1;
    let version = configs
        .iter()
        .filter(|c| c["serviceName"] == service.as_str() && c["environment"] == env.as_str())
        .count() as i64
        + 1;
    let mut created = config(id, &service, &env, version, false, "2025-02-01T12:00:00");
    created["createdBy"] = Value::String(field("createdBy"));
    created["configData"] = serde_json::from_str(&content).unwrap_or(Value::Null);
    configs.push(created.clone());
    drop(configs);

    backend.uploads.lock().unwrap().push(fields);
    Json(created).into_response()
}

/// Starts the backend on an ephemeral port and returns its API base URL.
pub async fn spawn_backend() -> (String, Shared) {
    let backend = Shared::default();
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/saveUser", post(save_user))
        .route("/api/configs", get(list_configs))
        .route("/api/configs/upload", post(upload))
        .route("/api/configs/stats", get(stats))
        .route("/api/configs/:key", get(config_by_id).delete(remove))
        .route("/api/configs/:key/activate", put(activate))
        .route("/api/configs/:key/:env", get(active_config))
        .route("/api/configs/:key/:env/history", get(history))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api"), backend)
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn messages(&self, level: NoticeLevel) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|n| n.level == level)
            .map(|n| n.message)
            .collect()
    }

    pub fn count(&self, message: &str) -> usize {
        self.notices().iter().filter(|n| n.message == message).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Route> {
        self.routes.lock().unwrap().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

/// A session manager wired to a fresh backend and recording sinks.
pub struct Harness {
    pub base_url: String,
    pub backend: Shared,
    pub store: Arc<dyn CredentialStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
    pub session: SessionManager,
}

impl Harness {
    pub async fn start() -> Self {
        Self::with_store(Arc::new(MemoryCredentialStore::new())).await
    }

    pub async fn with_store(store: Arc<dyn CredentialStore>) -> Self {
        let (base_url, backend) = spawn_backend().await;
        Self::connect(base_url, backend, store)
    }

    /// Builds a new manager against an existing backend, as a restarted process would.
    pub fn connect(base_url: String, backend: Shared, store: Arc<dyn CredentialStore>) -> Self {
        let notifier = Arc::new(RecordingNotifier::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let client = ApiClient::new(&base_url, Duration::from_secs(5)).unwrap();
        let session = SessionManager::new(
            client,
            store.clone(),
            notifier.clone(),
            navigator.clone(),
        );
        Self {
            base_url,
            backend,
            store,
            notifier,
            navigator,
            session,
        }
    }

    /// Restores (nothing stored) and logs in as the admin user.
    pub async fn logged_in() -> Self {
        let harness = Self::start().await;
        harness.session.restore().await;
        assert!(
            harness
                .session
                .login(ADMIN_EMAIL, ADMIN_PASSWORD)
                .await
                .is_success()
        );
        harness
    }
}
