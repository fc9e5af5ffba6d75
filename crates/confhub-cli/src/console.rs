//! Wiring of the terminal front end.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use colored::Colorize;
use confhub_application::SessionManager;
use confhub_core::navigation::{Navigator, Route, RouteDecision};
use confhub_core::notice::{Notice, NoticeLevel, Notifier};
use confhub_infrastructure::{AppConfig, ConfhubPaths, FileCredentialStore};
use confhub_interaction::ApiClient;

/// Prints notices to stderr.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        let line = match notice.level {
            NoticeLevel::Success => notice.message.green(),
            NoticeLevel::Info => notice.message.blue(),
            NoticeLevel::Error => notice.message.red(),
        };
        eprintln!("{line}");
    }
}

/// Turns navigation into a hint about the command to run next.
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        let hint = match &route {
            Route::Login => "run `confhub login` to sign in",
            Route::Signup => "run `confhub signup` to create an account",
            Route::Services => "run `confhub services` to browse configurations",
            Route::Dashboard => "run `confhub dashboard` for an overview",
            _ => {
                tracing::debug!(%route, "navigation ignored");
                return;
            }
        };
        eprintln!("{}", format!("-> {hint}").dimmed());
    }
}

/// Everything a command needs: resolved settings and the session.
pub struct Console {
    pub config: AppConfig,
    pub session: SessionManager,
}

impl Console {
    /// Loads settings and builds the session manager.
    ///
    /// The `--api-url` flag wins over `config.toml` and `CONFHUB_API_URL`.
    pub fn open(config_dir: Option<&Path>, api_url: Option<&str>) -> Result<Self> {
        let paths = ConfhubPaths::new(config_dir).context("Failed to resolve config directory")?;
        let mut config = AppConfig::load(&paths)?;
        if let Some(url) = api_url {
            config.api.base_url = url.to_string();
        }
        tracing::debug!(
            api = %config.api.base_url,
            dir = %paths.config_dir().display(),
            "console configured"
        );

        let client = ApiClient::new(&config.api.base_url, config.api.timeout())?;
        let session = SessionManager::new(
            client,
            Arc::new(FileCredentialStore::new(&paths)),
            Arc::new(TerminalNotifier),
            Arc::new(TerminalNavigator),
        );

        Ok(Self { config, session })
    }

    /// Restores the stored session and checks that `route` may be shown.
    pub async fn require(&self, route: Route) -> Result<()> {
        self.session.restore().await;
        match self.session.guard(route).await {
            RouteDecision::Render(_) => Ok(()),
            RouteDecision::RedirectToLogin | RouteDecision::Pending => {
                TerminalNavigator.navigate(Route::Login);
                bail!("Not logged in")
            }
        }
    }

    /// Line limit for previews, `None` when previews are shown in full.
    pub fn preview_limit(&self, full: bool) -> Option<usize> {
        let max = self.config.preview.max_lines;
        (!full && max > 0).then_some(max)
    }
}
