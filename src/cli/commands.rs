//! CLI command implementations

use anyhow::Result;
use dialoguer::{Input, Password};
use serde::Serialize;
use std::fs;
use std::sync::Arc;

use crate::cli::{
    info, print_messages, print_navigation, print_profile, print_routes, print_session,
    print_users_table, success, warn, ConsoleNotifier, OutputFormat,
};
use crate::config::{self, loader::CONFIG_FILENAME};
use crate::context::AppContext;

/// Initialize a new campus.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new(CONFIG_FILENAME);

    if config_path.exists() {
        warn(&format!("{} already exists", CONFIG_FILENAME));
        return Ok(());
    }

    fs::write(config_path, config::loader::default_config_content())?;

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Run 'campus login' to start a session");

    Ok(())
}

/// Log in and persist the session
pub async fn login(username: Option<String>, password: Option<String>) -> Result<()> {
    let mut ctx = connect().await?;

    let username = match username {
        Some(username) => username,
        None => Input::<String>::new()
            .with_prompt("Username")
            .interact_text()?,
    };
    let password = match password {
        Some(password) => password,
        None => Password::new().with_prompt("Password").interact()?,
    };

    let result = ctx.api.sign_in(&username, &password).await;
    follow_navigation(&mut ctx).await;
    let profile = result?;

    success(&format!("Logged in as {}", profile.username));
    Ok(())
}

/// Log out and clear the stored session
pub async fn logout() -> Result<()> {
    let mut ctx = connect().await?;

    if !ctx.session.is_authenticated().await {
        info("No active session");
    }
    ctx.api.sign_out().await;
    follow_navigation(&mut ctx).await;

    success("Logged out");
    Ok(())
}

/// Fetch and store the current profile
pub async fn whoami() -> Result<()> {
    let mut ctx = connect().await?;

    let result = ctx.api.current_user().await;
    follow_navigation(&mut ctx).await;
    let profile = result?;

    ctx.session.set_user(profile.clone()).await;
    print_profile(&profile);
    Ok(())
}

/// Show the locally stored session
pub async fn status(format: OutputFormat) -> Result<()> {
    let ctx = connect().await?;

    let session = ctx.session.snapshot().await;
    let authenticated = ctx.session.is_authenticated().await;

    #[derive(Serialize)]
    struct Status<'a> {
        authenticated: bool,
        token_type: &'a str,
        expires_at: Option<chrono::DateTime<chrono::Utc>>,
        user: Option<&'a crate::auth::UserProfile>,
    }

    let view = Status {
        authenticated,
        token_type: &session.token_type,
        expires_at: session.expires_at_utc(),
        user: session.user.as_ref(),
    };

    match format {
        OutputFormat::Table => print_session(&session, authenticated),
        _ => print_structured(&view, format)?,
    }
    Ok(())
}

/// List all users
pub async fn users(format: OutputFormat) -> Result<()> {
    let mut ctx = connect().await?;

    let result = ctx.api.all_users().await;
    follow_navigation(&mut ctx).await;
    let users = result?;

    match format {
        OutputFormat::Table => print_users_table(&users),
        _ => print_structured(&users, format)?,
    }
    Ok(())
}

/// Register a new account
pub async fn register(username: &str, password: Option<String>) -> Result<()> {
    let mut ctx = connect().await?;

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Repeat password", "Passwords do not match")
            .interact()?,
    };

    let result = ctx.api.register(username, &password).await;
    follow_navigation(&mut ctx).await;
    result?;

    success(&format!("Registered {}", username));
    Ok(())
}

/// Show the conversation with another user
pub async fn messages(user_id: i64, format: OutputFormat) -> Result<()> {
    let mut ctx = connect().await?;

    let result = ctx.api.chat_messages(user_id).await;
    follow_navigation(&mut ctx).await;
    let messages = result?;

    match format {
        OutputFormat::Table => print_messages(user_id, &messages),
        _ => print_structured(&messages, format)?,
    }
    Ok(())
}

/// Navigate to a view through the guard
pub async fn open(path: &str) -> Result<()> {
    let mut ctx = connect().await?;
    let outcome = ctx.router.push(path).await;
    print_navigation(&outcome);
    Ok(())
}

/// Print the route table
pub async fn routes() -> Result<()> {
    let ctx = connect().await?;
    print_routes(ctx.router.table().routes());
    Ok(())
}

async fn connect() -> Result<AppContext> {
    let config = config::load_or_default()?;
    Ok(AppContext::bootstrap(config, Arc::new(ConsoleNotifier)).await?)
}

/// Apply navigation the pipeline requested during the last call
async fn follow_navigation(ctx: &mut AppContext) {
    for outcome in ctx.router.drain().await {
        print_navigation(&outcome);
    }
}

fn print_structured<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(value)?),
        _ => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}
