use anyhow::Result;
use colored::Colorize;
use confhub_application::Dashboard;
use confhub_core::navigation::Route;

use crate::console::Console;
use crate::render;

pub async fn show(console: &Console, server: bool) -> Result<()> {
    console.require(Route::Dashboard).await?;
    let dashboard = Dashboard::new(&console.session);
    let overview = dashboard.load().await?;
    let stats = if server {
        dashboard.server_stats().await?
    } else {
        overview.stats.clone()
    };

    if let Some(user) = console.session.current_user().await {
        println!("Welcome back, {}", user.display_name().bold());
    }
    println!("Total services   {}", stats.total_services);
    println!("Total configs    {}", stats.total_configs);
    println!("Active configs   {}", stats.active_configs.to_string().green());
    println!("Inactive configs {}", stats.inactive_configs);

    println!();
    println!("{}", "Recent uploads".bold());
    if overview.recent.is_empty() {
        println!("{}", "No configurations yet".dimmed());
    }
    for config in &overview.recent {
        println!(
            "{:<28} {} {}",
            config.service_name,
            render::env_badge(config.environment),
            render::version_line(config)
        );
    }
    Ok(())
}
