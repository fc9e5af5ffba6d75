use anyhow::{Context, Result, bail};
use colored::Colorize;
use confhub_application::SignupOutcome;
use confhub_core::navigation::{Navigator, Route};
use confhub_core::notice::{Notice, Notifier};
use confhub_core::user::SignupForm;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::console::{Console, TerminalNavigator, TerminalNotifier};

async fn read_password() -> Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("Failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn login(console: &Console, email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => read_password().await?,
    };

    console.session.restore().await;
    let user = console
        .session
        .login(email.trim(), &password)
        .await
        .into_result()?;

    TerminalNotifier.notify(Notice::success("Welcome back!"));
    println!("Signed in as {} <{}>", user.display_name().bold(), user.email);
    TerminalNavigator.navigate(Route::Dashboard);
    Ok(())
}

pub async fn logout(console: &Console) {
    console.session.restore().await;
    console.session.logout().await;
}

pub async fn whoami(console: &Console) -> Result<()> {
    console.require(Route::Dashboard).await?;
    let Some(user) = console.session.current_user().await else {
        bail!("Not logged in");
    };
    println!("{} <{}>", user.display_name().bold(), user.email);
    if let Some(id) = &user.id {
        println!("id: {id}");
    }
    Ok(())
}

pub async fn signup(
    console: &Console,
    name: String,
    email: String,
    password: String,
    confirm_password: Option<String>,
) -> Result<()> {
    let form = SignupForm {
        name,
        email,
        confirm_password: confirm_password.unwrap_or_else(|| password.clone()),
        password,
    };

    match console.session.signup(&form).await {
        SignupOutcome::Created => Ok(()),
        SignupOutcome::Invalid(errors) => {
            for (field, message) in &errors {
                eprintln!("  {}: {}", field.to_string().bold(), message);
            }
            bail!("Signup failed")
        }
        SignupOutcome::Failed { message } => bail!(message),
    }
}
