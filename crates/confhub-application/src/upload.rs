//! Selecting, checking and uploading a config file.

use confhub_core::config::{
    ConfigDetail, ConfigFile, Environment, ParsedConfig, Preview, ValidationOutcome,
    parse_config_file,
};
use confhub_core::navigation::Route;
use confhub_core::notice::Notice;
use confhub_core::{ConfhubError, Result};
use confhub_interaction::{ConfigService, UploadRequest};

use crate::session::{SessionContext, SessionManager};

/// Recorded as `createdBy` when no user is signed in.
pub const UNKNOWN_CREATOR: &str = "unknown";

#[derive(Debug, Clone)]
struct SelectedFile {
    file: ConfigFile,
    parsed: ParsedConfig,
    preview: Preview,
}

/// State of the upload form.
///
/// A file is kept only while it validates; selecting an invalid file drops
/// the previous selection and records the failure message instead.
pub struct UploadFlow {
    configs: ConfigService,
    context: SessionContext,
    selected: Option<SelectedFile>,
    error: Option<String>,
}

impl UploadFlow {
    pub fn new(session: &SessionManager) -> Self {
        Self {
            configs: ConfigService::new(session.client().clone()),
            context: session.context().clone(),
            selected: None,
            error: None,
        }
    }

    /// Validates `file` and keeps it when it parses.
    pub fn select_file(&mut self, file: ConfigFile) -> ValidationOutcome {
        let outcome = parse_config_file(&file);
        match &outcome {
            ValidationOutcome::Success(parsed) => {
                self.selected = Some(SelectedFile {
                    preview: Preview::render(&parsed.value),
                    parsed: parsed.clone(),
                    file,
                });
                self.error = None;
                self.context
                    .notifier()
                    .notify(Notice::success("File validated successfully!"));
            }
            ValidationOutcome::Failure(failure) => {
                self.selected = None;
                self.error = Some(failure.message());
                self.context.notifier().notify(Notice::error(failure.message()));
            }
        }
        outcome
    }

    pub fn file(&self) -> Option<&ConfigFile> {
        self.selected.as_ref().map(|s| &s.file)
    }

    pub fn parsed(&self) -> Option<&ParsedConfig> {
        self.selected.as_ref().map(|s| &s.parsed)
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.selected.as_ref().map(|s| &s.preview)
    }

    /// Failure message of the last rejected file.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Sends the selected file for `service_name` in `environment`.
    ///
    /// On success the selection is cleared and the operator is sent to the
    /// service list.
    pub async fn submit(
        &mut self,
        service_name: &str,
        environment: Environment,
    ) -> Result<ConfigDetail> {
        let Some(selected) = self.selected.as_ref() else {
            return Err(self.reject("Please select a file to upload"));
        };
        let service_name = service_name.trim();
        if service_name.is_empty() {
            return Err(self.reject("Please enter a service name"));
        }

        let created_by = self
            .context
            .state()
            .await
            .user()
            .map(|u| u.email.clone())
            .unwrap_or_else(|| UNKNOWN_CREATOR.to_string());

        let request = UploadRequest {
            file: selected.file.clone(),
            service_name: service_name.to_string(),
            environment,
            created_by,
        };

        match self.configs.upload_config(request).await {
            Ok(detail) => {
                tracing::info!(
                    service = %detail.service_name,
                    version = detail.version,
                    "config uploaded"
                );
                self.selected = None;
                self.context
                    .notifier()
                    .notify(Notice::success("Configuration uploaded successfully!"));
                self.context.navigator().navigate(Route::Services);
                Ok(detail)
            }
            Err(e) => {
                let message = e
                    .server_message()
                    .unwrap_or("Failed to upload configuration")
                    .to_string();
                self.context.notifier().notify(Notice::error(message));
                Err(e)
            }
        }
    }

    fn reject(&self, message: &str) -> ConfhubError {
        self.context.notifier().notify(Notice::error(message));
        ConfhubError::validation(message)
    }
}
