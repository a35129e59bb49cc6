//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::api::ChatMessage;
use crate::auth::{Session, UserProfile};
use crate::notice::{Notice, Notifier};
use crate::router::{NavigationOutcome, RouteDef};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Notices printed straight to the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        error(&notice.message);
    }
}

fn role_label(user: &UserProfile) -> String {
    user.role
        .map(|role| role.to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Print a table of users
pub fn print_users_table(users: &[UserProfile]) {
    if users.is_empty() {
        info("No users found");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(Color::Cyan),
            Cell::new("Username").fg(Color::Cyan),
            Cell::new("Role").fg(Color::Cyan),
            Cell::new("Email").fg(Color::Cyan),
        ]);

    for user in users {
        table.add_row(vec![
            Cell::new(user.id),
            Cell::new(&user.username),
            Cell::new(role_label(user)),
            Cell::new(user.email.as_deref().unwrap_or("-")),
        ]);
    }

    println!("{table}");
}

/// Print a conversation, marking messages sent by `peer`
pub fn print_messages(peer: i64, messages: &[ChatMessage]) {
    if messages.is_empty() {
        info("No messages yet");
        return;
    }

    for message in messages {
        let from = if message.from_user == peer {
            format!("user {}", peer).cyan()
        } else {
            "you".green()
        };
        let unread = if message.is_read { "" } else { " •" };
        println!("{:>10}: {}{}", from, message.content, unread.yellow());
    }
}

/// Print a user profile
pub fn print_profile(user: &UserProfile) {
    println!("  {} {}", "ID:".bold(), user.id);
    println!("  {} {}", "Username:".bold(), user.username);
    println!("  {} {}", "Role:".bold(), role_label(user));
    if let Some(email) = &user.email {
        println!("  {} {}", "Email:".bold(), email);
    }
}

/// Print the stored session, never the token itself
pub fn print_session(session: &Session, authenticated: bool) {
    println!("{}", "Session".bold().underline());
    println!();

    let state = if authenticated {
        "authenticated".green()
    } else {
        "anonymous".red()
    };
    println!("  {} {}", "State:".bold(), state);

    if !session.token.is_empty() {
        println!("  {} {}", "Scheme:".bold(), session.token_type);
    }
    if let Some(expires) = session.expires_at_utc() {
        println!(
            "  {} {}",
            "Expires:".bold(),
            expires.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    match &session.user {
        Some(user) => {
            println!();
            print_profile(user);
        }
        None => println!("  {} -", "User:".bold()),
    }
}

/// Print the route table
pub fn print_routes(routes: &[RouteDef]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Name").fg(Color::Cyan),
            Cell::new("Path").fg(Color::Cyan),
            Cell::new("Login required").fg(Color::Cyan),
        ]);

    for route in routes {
        let (label, color) = if route.requires_auth {
            ("yes", Color::Yellow)
        } else {
            ("no", Color::Green)
        };
        table.add_row(vec![
            Cell::new(&route.name),
            Cell::new(&route.path),
            Cell::new(label).fg(color),
        ]);
    }

    println!("{table}");
}

/// Report where a navigation ended up
pub fn print_navigation(outcome: &NavigationOutcome) {
    match outcome {
        NavigationOutcome::Arrived { path } => success(&format!("Opened {}", path)),
        NavigationOutcome::Redirected { from, to } => {
            warn(&format!("{} requires login, redirected to {}", from, to))
        }
        NavigationOutcome::NotFound { path } => error(&format!("No view at {}", path)),
    }
}
