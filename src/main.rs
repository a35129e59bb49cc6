use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campus=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => cli::commands::init().await,
        Commands::Login { username, password } => cli::commands::login(username, password).await,
        Commands::Logout => cli::commands::logout().await,
        Commands::Whoami => cli::commands::whoami().await,
        Commands::Status { format } => cli::commands::status(format).await,
        Commands::Users { format } => cli::commands::users(format).await,
        Commands::Register { username, password } => {
            cli::commands::register(&username, password).await
        }
        Commands::Messages { user_id, format } => cli::commands::messages(user_id, format).await,
        Commands::Open { path } => cli::commands::open(&path).await,
        Commands::Routes => cli::commands::routes().await,
    }
}
