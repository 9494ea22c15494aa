use anyhow::Context;
use clap::{Parser, Subcommand};
use huddle_api::{build_router, AppState};
use huddle_config::{load as load_config, AppConfig};
use huddle_database::{prepare_database, run_migrations};
use huddle_runtime::{telemetry, BackendServices};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "huddle-server")]
#[command(about = "Huddle chat group backend (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Create an account and print a session token for it
    IssueToken {
        #[arg(long)]
        display_name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing().context("failed to initialise tracing")?;
    let config = load_config().context("failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(config).await,
        Commands::Migrate => migrate(config).await,
        Commands::IssueToken { display_name } => issue_token(config, display_name).await,
    }
}

async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    info!("starting Huddle backend");

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let state = AppState::new(services.db_pool.clone(), config.auth.clone());
    let app = build_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(huddle_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    services.db_pool.close().await;
    info!("backend shut down");
    Ok(())
}

async fn migrate(config: AppConfig) -> anyhow::Result<()> {
    let pool = prepare_database(&config.database)
        .await
        .context("failed to open database")?;

    run_migrations(&pool)
        .await
        .context("database migrations failed")?;

    info!(url = %config.database.url, "database schema is up to date");
    pool.close().await;
    Ok(())
}

async fn issue_token(config: AppConfig, display_name: Option<String>) -> anyhow::Result<()> {
    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let account = services
        .authenticator
        .register_account(display_name)
        .await
        .context("failed to create account")?;
    let session = services
        .authenticator
        .issue_session(account.id)
        .await
        .context("failed to issue session")?;

    info!(account = %account.public_id, "issued session");

    println!("account_id: {}", account.id);
    println!("expires_at: {}", session.expires_at.to_rfc3339());
    println!("token:      {}", session.token);

    services.db_pool.close().await;
    Ok(())
}
