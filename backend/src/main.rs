//! Blog entry-point: serves the site or runs a maintenance command.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use actix_web::web;
use clap::{Parser, Subcommand};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use blog::config::AppSettings;
use blog::domain::CredentialService;
use blog::domain::ports::CredentialStore;
use blog::inbound::http::health::HealthState;
use blog::inbound::http::session_config::{BuildMode, session_settings_from_env};
use blog::outbound::password::Argon2PasswordHasher;
use blog::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig, initialize_schema};
use blog::server::{ServerConfig, create_server};

/// `blog` command arguments.
#[derive(Debug, Parser)]
#[command(name = "blog", about = "Session-authenticated blog", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Drop and recreate every table. Destroys existing data.
    InitDb,
    /// Register an administrator account; the password comes from
    /// `BLOG_ADMINISTRATOR_PASSWORD`.
    InitAdministrator {
        #[arg(long, value_name = "name")]
        username: String,
    },
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::try_parse().map_err(io::Error::other)?;
    let settings = AppSettings::load_from_iter([OsString::from("blog")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let pool = open_database(&settings).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&settings, pool).await,
        Command::InitDb => {
            initialize_schema(&pool)
                .await
                .map_err(|error| io::Error::other(format!("initialise schema: {error}")))?;
            println!("Initialized the database.");
            Ok(())
        }
        Command::InitAdministrator { username } => {
            init_administrator(&settings, pool, &username).await
        }
    }
}

/// Create the instance folder if needed and open the pool.
async fn open_database(settings: &AppSettings) -> io::Result<DbPool> {
    let instance_dir = settings.instance_dir();
    if !instance_dir.as_os_str().is_empty() {
        std::fs::create_dir_all(&instance_dir)?;
    }
    let database_path = settings.database_path();
    let config = PoolConfig::new(database_path.to_string_lossy())
        .with_max_size(settings.pool_max_size());
    DbPool::new(config)
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))
}

async fn serve(settings: &AppSettings, pool: DbPool) -> io::Result<()> {
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|error| io::Error::other(format!("session configuration: {error}")))?;
    let bind_addr = settings.bind_addr();
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state,
        ServerConfig::new(session, bind_addr, pool),
    )?;
    info!(%bind_addr, "server listening");
    server.await
}

async fn init_administrator(settings: &AppSettings, pool: DbPool, username: &str) -> io::Result<()> {
    let password = settings.administrator_password.as_deref().ok_or_else(|| {
        io::Error::other("BLOG_ADMINISTRATOR_PASSWORD must be set for init-administrator")
    })?;
    let store = CredentialService::new(
        Arc::new(DieselUserRepository::new(pool)),
        Arc::new(Argon2PasswordHasher::default()),
    );
    store
        .register(username, password)
        .await
        .map_err(|error| io::Error::other(error.to_string()))?;
    println!("Initialized the administrator");
    Ok(())
}
