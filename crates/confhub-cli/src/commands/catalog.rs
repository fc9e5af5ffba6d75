use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use confhub_application::{ConfigCatalog, ServiceFilter};
use confhub_core::config::{Environment, RecordId};
use confhub_core::navigation::Route;
use confhub_core::notice::{Notice, Notifier};

use crate::console::{Console, TerminalNotifier};
use crate::render;

pub async fn services(
    console: &Console,
    search: Option<String>,
    environment: Option<Environment>,
) -> Result<()> {
    console.require(Route::Services).await?;
    let catalog = ConfigCatalog::new(&console.session);
    let listing = catalog
        .list_services(&ServiceFilter {
            search,
            environment,
        })
        .await?;

    if listing.groups.is_empty() {
        println!("{}", "No services found".dimmed());
    }
    for group in &listing.groups {
        let active = group
            .active_version
            .map(|v| format!("v{v}"))
            .unwrap_or_else(|| "N/A".to_string());
        println!(
            "{:<32} {}  active {:<6} {:>3} versions  updated {}",
            group.service_name.bold(),
            render::env_badge(group.environment),
            active,
            group.total_versions,
            render::relative(&group.last_updated)
        );
    }
    println!(
        "{}",
        format!("Showing {} of {} services", listing.groups.len(), listing.total).dimmed()
    );
    Ok(())
}

pub async fn history(console: &Console, service: &str, environment: Environment) -> Result<()> {
    console
        .require(Route::Versions {
            service_name: service.to_string(),
            environment,
        })
        .await?;
    let versions = ConfigCatalog::new(&console.session)
        .history(service, environment)
        .await?;

    println!("{} {}", service.bold(), render::env_badge(environment));
    for version in &versions {
        println!("{}", render::version_line(version));
    }
    Ok(())
}

pub async fn active(console: &Console, service: &str, environment: Environment) -> Result<()> {
    console
        .require(Route::Versions {
            service_name: service.to_string(),
            environment,
        })
        .await?;
    let view = ConfigCatalog::new(&console.session)
        .active(service, environment)
        .await?;

    println!(
        "{} {} v{} {}",
        service.bold(),
        render::env_badge(environment),
        view.detail.version,
        render::active_marker(view.detail.is_active)
    );
    match console.preview_limit(false) {
        Some(limit) => render::print_preview(&view.truncated(limit)),
        None => render::print_preview(&view.preview),
    }
    Ok(())
}

pub async fn view(
    console: &Console,
    id: RecordId,
    full: bool,
    download: Option<PathBuf>,
) -> Result<()> {
    console.require(Route::ConfigView { id: id.clone() }).await?;
    let view = ConfigCatalog::new(&console.session).view(&id).await?;
    let detail = &view.detail;

    println!(
        "{} {} v{} {}",
        detail.service_name.bold(),
        render::env_badge(detail.environment),
        detail.version,
        render::active_marker(detail.is_active)
    );
    println!(
        "{}",
        format!(
            "uploaded by {} on {}",
            detail.created_by,
            render::date(&detail.created_at)
        )
        .dimmed()
    );

    match console.preview_limit(full) {
        Some(limit) => render::print_preview(&view.truncated(limit)),
        None => render::print_preview(&view.preview),
    }

    if let Some(dir) = download {
        let path = dir.join(view.download_file_name());
        tokio::fs::write(&path, view.text())
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        TerminalNotifier.notify(Notice::success("Configuration downloaded!"));
        println!("{}", path.display());
    }
    Ok(())
}

pub async fn activate(console: &Console, id: RecordId) -> Result<()> {
    console.require(Route::Services).await?;
    let detail = ConfigCatalog::new(&console.session).activate(&id).await?;
    println!(
        "{} {} v{} is now active",
        detail.service_name.bold(),
        render::env_badge(detail.environment),
        detail.version
    );
    Ok(())
}

pub async fn delete(console: &Console, id: RecordId) -> Result<()> {
    console.require(Route::Services).await?;
    ConfigCatalog::new(&console.session).delete(&id).await?;
    Ok(())
}
