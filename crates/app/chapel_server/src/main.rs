//! Chapel API server binary.
//!
//! Prints `{"port": N}` to stdout once bound so wrappers can discover an
//! ephemeral port.

use std::sync::Arc;

use chapel_api::config::ApiConfig;
use chapel_core::auth::AuthError;
use chapel_core::auth::jwt::TokenKeys;
use chapel_core::auth::service::Authenticator;
use chapel_core::auth::store::PgCredentialStore;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "chapel_server", about = "Chapel API server")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on (0 = ephemeral).
    #[arg(long, env = "PORT", default_value_t = 8001)]
    port: u16,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/chapel"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Skip embedded migrations on start-up.
    #[arg(long, default_value_t = false)]
    no_migrate: bool,
}

/// Environment config with the command-line overrides applied.
fn load_config(args: &Args) -> Result<ApiConfig, AuthError> {
    let mut config = ApiConfig::from_env()?;
    config.bind_addr = format!("{}:{}", args.host, args.port);
    config.database_url = args.database_url.clone();
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Write logs to stderr so stdout is reserved for the JSON port message.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,chapel_api=debug,chapel_core=debug")
            }),
        )
        .init();

    let args = Args::parse();

    let config = load_config(&args)?;

    info!(
        bind_addr = %config.bind_addr,
        max_connections = args.max_connections,
        algorithm = ?config.auth.algorithm,
        token_lifetime_minutes = config.auth.token_lifetime_minutes,
        fallback_secret = config.auth.uses_fallback_secret(),
        "starting chapel_server"
    );

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&config.database_url)
        .await?;

    if args.no_migrate {
        info!("skipping database migrations");
    } else {
        info!("running database migrations");
        chapel_api::migrate(&pool).await?;
    }

    let auth = Authenticator::new(
        Arc::new(PgCredentialStore::new(pool.clone())),
        TokenKeys::new(&config.auth),
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;

    let state = chapel_api::AppState { pool, auth, config };
    let app = chapel_api::router(state);

    println!("{}", serde_json::json!({ "port": local_addr.port() }));
    info!(addr = %local_addr, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
            }
        })
        .await?;

    Ok(())
}
