use std::path::Path;

use anyhow::{Result, bail};
use colored::Colorize;
use confhub_application::UploadFlow;
use confhub_core::config::{
    DEFAULT_PREVIEW_LINES, Environment, Preview, ValidationOutcome, parse_config_file,
};
use confhub_core::navigation::Route;
use confhub_infrastructure::read_config_file;

use crate::console::Console;
use crate::render;

/// Parses a local file and prints its preview.
pub async fn validate(path: &Path, full: bool) -> Result<()> {
    let file = read_config_file(path).await?;
    match parse_config_file(&file) {
        ValidationOutcome::Success(parsed) => {
            println!(
                "{} ({})",
                "File validated successfully!".green(),
                parsed.format
            );
            let preview = if full {
                Preview::render(&parsed.value)
            } else {
                Preview::render_truncated(&parsed.value, DEFAULT_PREVIEW_LINES)
            };
            render::print_preview(&preview);
            Ok(())
        }
        ValidationOutcome::Failure(failure) => bail!(failure.message()),
    }
}

pub async fn upload(
    console: &Console,
    path: &Path,
    service: &str,
    environment: Environment,
) -> Result<()> {
    console.require(Route::Upload).await?;
    let file = read_config_file(path).await?;

    let mut flow = UploadFlow::new(&console.session);
    if let Some(failure) = flow.select_file(file).failure() {
        bail!(failure.message());
    }
    if let Some(parsed) = flow.parsed() {
        let limit = console.preview_limit(false).unwrap_or(usize::MAX);
        render::print_preview(&Preview::render_truncated(&parsed.value, limit));
    }

    let detail = flow.submit(service, environment).await?;
    println!(
        "{} {} v{} (id {})",
        detail.service_name.bold(),
        render::env_badge(detail.environment),
        detail.version,
        detail.id
    );
    Ok(())
}
