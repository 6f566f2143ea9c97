//! Video platform API server.
//!
//! Serves the auth, session and engagement endpoints over PostgreSQL, or over an
//! in-process store with `--in-memory`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use pico_args::Arguments;
use tracing::info;
use vidshare::{
    Database, MemoryStore, Store,
    auth::AuthSettings,
    mail::{LogMailer, Mailer, ResendMailer},
};
use vs_server::{
    api::{self, cookies::CookieSettings},
    config::ServerConfig,
    logging, metrics,
};

const HELP: &str = "\
Run the vidshare API server

USAGE:
  vs_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8000]
  --db-url     URL         Database connection string  [default: env DATABASE_URL or postgres://postgres@localhost/vidshare]

FLAGS:
  --in-memory              Use the in-process store instead of PostgreSQL
  -h, --help               Print help information

ENVIRONMENT:
  JWT_SECRET               Access token signing secret (>= 32 chars)
  JWT_REFRESH_SECRET       Refresh token signing secret (>= 32 chars)
  PASSWORD_PEPPER          Password hashing pepper (>= 16 chars)
  APP_ORIGIN               Frontend origin for CORS and mail links
  APP_ENV                  `development` drops the Secure cookie attribute
  COOKIE_DOMAIN            Cookie domain
  RESEND_API_KEY           Resend API key; mail is only logged when unset
  MAIL_FROM                Sender address
  METRICS_BIND             Prometheus listener address
  (See .env.example for all configuration options)
";

struct Args {
    bind: Option<SocketAddr>,
    database_url: Option<String>,
    in_memory: bool,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        database_url: pargs.opt_value_from_str("--db-url")?,
        in_memory: pargs.contains("--in-memory"),
    };

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.database_url)?;
    config.validate()?;

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(|e| anyhow::anyhow!(e))?;
        info!("Prometheus metrics available at http://{}/metrics", addr);
    }

    let (store, database): (Arc<dyn Store>, Option<Database>) = if args.in_memory {
        info!("Using in-memory store; data is lost on shutdown");
        (Arc::new(MemoryStore::new()), None)
    } else {
        let db = Database::new(&config.database)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;
        db.migrate()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to apply schema: {}", e))?;
        info!("Database connected successfully");
        (Arc::new(db.store()), Some(db))
    };

    let mailer: Arc<dyn Mailer> = match &config.mail.resend_api_key {
        Some(key) => Arc::new(ResendMailer::new(key, config.mail.from.clone())),
        None => {
            info!("RESEND_API_KEY not set; outbound mail is logged only");
            Arc::new(LogMailer)
        }
    };

    let settings = AuthSettings {
        access_secret: config.security.jwt_secret.clone(),
        refresh_secret: config.security.jwt_refresh_secret.clone(),
        pepper: config.security.password_pepper.clone(),
        app_origin: config.app.origin.clone(),
    };
    let cookies = CookieSettings {
        secure: config.secure_cookies(),
        domain: config.app.cookie_domain.clone(),
    };

    let state = api::AppState::new(store, mailer, settings, cookies)?;
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");
    if let Some(db) = database {
        db.close().await;
    }

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install CTRL+C signal handler");
        std::future::pending::<()>().await;
    }
}
