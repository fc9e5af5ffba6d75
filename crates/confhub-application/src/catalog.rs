//! Browsing and managing stored config versions.

use confhub_core::Result;
use confhub_core::config::{
    ConfigDetail, ConfigSummary, DEFAULT_PREVIEW_LINES, Environment, Preview, RecordId, Timestamp,
};
use confhub_core::navigation::Route;
use confhub_core::notice::Notice;
use confhub_interaction::ConfigService;

use crate::session::{SessionContext, SessionManager};

/// All versions of one service in one environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceGroup {
    pub service_name: String,
    pub environment: Environment,
    pub active_version: Option<i64>,
    pub total_versions: usize,
    /// `createdAt` of the first record listed for the group.
    pub last_updated: Timestamp,
    pub configs: Vec<ConfigSummary>,
}

/// Groups records by `(serviceName, environment)`, in order of first appearance.
pub fn group_services(configs: Vec<ConfigSummary>) -> Vec<ServiceGroup> {
    let mut groups: Vec<ServiceGroup> = Vec::new();
    for config in configs {
        let existing = groups.iter_mut().find(|g| {
            g.service_name == config.service_name && g.environment == config.environment
        });
        match existing {
            Some(group) => group.configs.push(config),
            None => groups.push(ServiceGroup {
                service_name: config.service_name.clone(),
                environment: config.environment,
                active_version: None,
                total_versions: 0,
                last_updated: config.created_at,
                configs: vec![config],
            }),
        }
    }

    for group in &mut groups {
        group.total_versions = group.configs.len();
        group.active_version = group.configs.iter().find(|c| c.is_active).map(|c| c.version);
    }
    groups
}

/// Search box and environment selector of the service list.
#[derive(Debug, Clone, Default)]
pub struct ServiceFilter {
    /// Case-insensitive substring of the service name.
    pub search: Option<String>,
    pub environment: Option<Environment>,
}

impl ServiceFilter {
    pub fn matches(&self, group: &ServiceGroup) -> bool {
        let name_matches = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => group
                .service_name
                .to_lowercase()
                .contains(&term.to_lowercase()),
            _ => true,
        };
        let env_matches = self.environment.is_none_or(|env| env == group.environment);
        name_matches && env_matches
    }
}

/// Filtered service list plus the unfiltered count.
#[derive(Debug, Clone)]
pub struct ServiceListing {
    pub groups: Vec<ServiceGroup>,
    pub total: usize,
}

/// One version prepared for display.
#[derive(Debug, Clone)]
pub struct ConfigView {
    pub detail: ConfigDetail,
    pub preview: Preview,
}

impl ConfigView {
    pub fn new(detail: ConfigDetail) -> Self {
        let preview = Preview::render(&detail.config_data);
        Self { detail, preview }
    }

    /// Full pretty-printed data, as copied or downloaded.
    pub fn text(&self) -> &str {
        self.preview.text()
    }

    pub fn download_file_name(&self) -> String {
        self.detail.download_file_name()
    }

    /// Preview cut to the display limit.
    pub fn truncated(&self, max_lines: usize) -> Preview {
        Preview::render_truncated(&self.detail.config_data, max_lines)
    }

    pub fn default_truncated(&self) -> Preview {
        self.truncated(DEFAULT_PREVIEW_LINES)
    }
}

/// Service list, version history and per-version actions.
pub struct ConfigCatalog {
    configs: ConfigService,
    context: SessionContext,
}

impl ConfigCatalog {
    pub fn new(session: &SessionManager) -> Self {
        Self {
            configs: ConfigService::new(session.client().clone()),
            context: session.context().clone(),
        }
    }

    fn notify_error(&self, message: &str) {
        self.context.notifier().notify(Notice::error(message));
    }

    /// Lists services matching `filter`.
    pub async fn list_services(&self, filter: &ServiceFilter) -> Result<ServiceListing> {
        let configs = self.configs.get_all_configs().await.inspect_err(|_| {
            self.notify_error("Failed to load services");
        })?;

        let groups = group_services(configs);
        let total = groups.len();
        let groups: Vec<ServiceGroup> = groups.into_iter().filter(|g| filter.matches(g)).collect();
        tracing::debug!(total, shown = groups.len(), "listed services");
        Ok(ServiceListing { groups, total })
    }

    /// Version history of one service, newest version first.
    pub async fn history(
        &self,
        service_name: &str,
        environment: Environment,
    ) -> Result<Vec<ConfigSummary>> {
        let mut versions = self
            .configs
            .get_config_history(service_name, environment)
            .await
            .inspect_err(|_| self.notify_error("Failed to load version history"))?;
        versions.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(versions)
    }

    /// The currently active version of a service.
    pub async fn active(&self, service_name: &str, environment: Environment) -> Result<ConfigView> {
        let detail = self.configs.get_config(service_name, environment).await?;
        Ok(ConfigView::new(detail))
    }

    pub async fn activate(&self, id: &RecordId) -> Result<ConfigDetail> {
        let detail = self
            .configs
            .activate_config(id)
            .await
            .inspect_err(|_| self.notify_error("Failed to activate configuration"))?;
        tracing::info!(%id, version = detail.version, "activated config");
        self.context
            .notifier()
            .notify(Notice::success("Configuration activated successfully!"));
        Ok(detail)
    }

    pub async fn delete(&self, id: &RecordId) -> Result<()> {
        self.configs
            .delete_config(id)
            .await
            .inspect_err(|_| self.notify_error("Failed to delete configuration"))?;
        tracing::info!(%id, "deleted config");
        self.context
            .notifier()
            .notify(Notice::success("Configuration deleted successfully!"));
        Ok(())
    }

    /// Loads one version for viewing. A failed lookup returns to the service list.
    pub async fn view(&self, id: &RecordId) -> Result<ConfigView> {
        match self.configs.get_config_by_id(id).await {
            Ok(detail) => Ok(ConfigView::new(detail)),
            Err(e) => {
                self.notify_error("Configuration not found");
                self.context.navigator().navigate(Route::Services);
                Err(e)
            }
        }
    }
}
