//! Dashboard figures.

use std::collections::HashSet;

use confhub_core::Result;
use confhub_core::config::{ConfigSummary, DashboardStats};
use confhub_core::notice::Notice;
use confhub_interaction::ConfigService;

use crate::session::{SessionContext, SessionManager};

/// Number of records in the "recent" list.
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct DashboardOverview {
    pub stats: DashboardStats,
    /// Newest records first.
    pub recent: Vec<ConfigSummary>,
}

/// Computes the overview from the full config listing.
pub fn summarize(configs: &[ConfigSummary]) -> DashboardOverview {
    let total_services = configs
        .iter()
        .map(|c| c.service_name.as_str())
        .collect::<HashSet<_>>()
        .len();
    let total_configs = configs.len();
    let active_configs = configs.iter().filter(|c| c.is_active).count();

    let mut recent = configs.to_vec();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(RECENT_LIMIT);

    DashboardOverview {
        stats: DashboardStats {
            total_services,
            total_configs,
            active_configs,
            inactive_configs: total_configs - active_configs,
        },
        recent,
    }
}

pub struct Dashboard {
    configs: ConfigService,
    context: SessionContext,
}

impl Dashboard {
    pub fn new(session: &SessionManager) -> Self {
        Self {
            configs: ConfigService::new(session.client().clone()),
            context: session.context().clone(),
        }
    }

    /// Loads all configs and summarizes them.
    pub async fn load(&self) -> Result<DashboardOverview> {
        let configs = self.configs.get_all_configs().await.inspect_err(|_| {
            self.context
                .notifier()
                .notify(Notice::error("Failed to load dashboard data"));
        })?;
        Ok(summarize(&configs))
    }

    /// Counts as computed by the backend.
    pub async fn server_stats(&self) -> Result<DashboardStats> {
        self.configs.get_dashboard_stats().await
    }
}
