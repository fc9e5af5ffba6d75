//! Config endpoints.

use confhub_core::config::{
    ConfigDetail, ConfigFile, ConfigSummary, DashboardStats, Environment, RecordId,
};
use confhub_core::{ConfhubError, Result};
use reqwest::multipart::{Form, Part};

use crate::client::ApiClient;

/// Fields of a config upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file: ConfigFile,
    pub service_name: String,
    pub environment: Environment,
    pub created_by: String,
}

impl UploadRequest {
    /// Builds the multipart body: `file`, `serviceName`, `environment`, `createdBy`.
    pub fn into_form(self) -> Result<Form> {
        let mime = mime_guess::from_path(self.file.name()).first_or_octet_stream();
        let part = Part::bytes(self.file.bytes().to_vec())
            .file_name(self.file.name().to_string())
            .mime_str(mime.essence_str())
            .map_err(|e| ConfhubError::internal(format!("invalid upload content type: {e}")))?;

        Ok(Form::new()
            .part("file", part)
            .text("serviceName", self.service_name)
            .text("environment", self.environment.to_string())
            .text("createdBy", self.created_by))
    }
}

/// Calls `/configs/*`.
#[derive(Clone)]
pub struct ConfigService {
    client: ApiClient,
}

impl ConfigService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `GET /configs`
    pub async fn get_all_configs(&self) -> Result<Vec<ConfigSummary>> {
        self.client.get_json(&["configs"]).await
    }

    /// Active version via `GET /configs/:service/:env`.
    pub async fn get_config(
        &self,
        service_name: &str,
        environment: Environment,
    ) -> Result<ConfigDetail> {
        self.client
            .get_json(&["configs", service_name, environment.as_str()])
            .await
    }

    /// `GET /configs/:service/:env/history`
    pub async fn get_config_history(
        &self,
        service_name: &str,
        environment: Environment,
    ) -> Result<Vec<ConfigSummary>> {
        self.client
            .get_json(&["configs", service_name, environment.as_str(), "history"])
            .await
    }

    /// `GET /configs/:id`
    pub async fn get_config_by_id(&self, id: &RecordId) -> Result<ConfigDetail> {
        let id = id.to_string();
        self.client.get_json(&["configs", &id]).await
    }

    /// `POST /configs/upload` (multipart)
    pub async fn upload_config(&self, request: UploadRequest) -> Result<ConfigDetail> {
        tracing::info!(
            service = %request.service_name,
            environment = %request.environment,
            file = request.file.name(),
            "uploading config"
        );
        let form = request.into_form()?;
        self.client.post_multipart(&["configs", "upload"], form).await
    }

    /// `PUT /configs/:id/activate`
    pub async fn activate_config(&self, id: &RecordId) -> Result<ConfigDetail> {
        let id = id.to_string();
        self.client.put_json(&["configs", &id, "activate"]).await
    }

    /// `DELETE /configs/:id`
    pub async fn delete_config(&self, id: &RecordId) -> Result<()> {
        let id = id.to_string();
        self.client.delete(&["configs", &id]).await
    }

    /// `GET /configs/stats`
    pub async fn get_dashboard_stats(&self) -> Result<DashboardStats> {
        self.client.get_json(&["configs", "stats"]).await
    }
}
