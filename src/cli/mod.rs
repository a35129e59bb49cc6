//! CLI interface for Campus

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "campus")]
#[command(version)]
#[command(about = "Client for the campus learning platform", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default campus.toml in the current directory
    Init,

    /// Log in and store the session
    Login {
        /// Account name (prompted when omitted)
        #[arg(short, long, env = "CAMPUS_USERNAME")]
        username: Option<String>,

        /// Password (prompted when omitted)
        #[arg(long, env = "CAMPUS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Log out and forget the stored session
    Logout,

    /// Fetch the signed-in user's profile
    Whoami,

    /// Show the stored session without contacting the server
    Status {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// List every account (admin only)
    Users {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Create a new account
    Register {
        /// Account name
        username: String,

        /// Password (prompted when omitted)
        #[arg(long, env = "CAMPUS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Show the conversation with another user
    Messages {
        /// The other user's id
        user_id: i64,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Navigate to a view, subject to the login guard
    Open {
        /// View path, e.g. /homework/3
        path: String,
    },

    /// List the known views and whether they need a session
    Routes,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}
