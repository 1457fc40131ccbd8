//! Climate API server entry point.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use climate_api::api::{create_router, AppState};
use climate_api::config::Config;
use climate_api::db;
use climate_api::metrics;
use climate_api::utils::shutdown_signal;

/// Read-only HTTP JSON API over the Hawaii climate dataset.
#[derive(Parser, Debug)]
#[command(name = "climate-api")]
#[command(about = "Serves canned aggregate queries over the Hawaii climate SQLite dataset")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to the SQLite dataset file.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Run {
        /// HTTP server port.
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the SQLite dataset file.
        #[arg(long)]
        db_path: Option<PathBuf>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Open the dataset, validate its schema, and print a summary.
    CheckDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("climate_api=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::CheckDb) => cmd_check_db().await,
        Some(Command::Run { port, db_path }) => cmd_run(port, db_path).await,
        None => cmd_run(args.port, args.db_path).await,
    }
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("CLIMATE API - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Database: {}", config.climate_db_path.display());
    println!("  Port: {}", config.port);
    println!("  Log Level: {}", config.rust_log);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Open the dataset, validate its schema, and print a summary.
async fn cmd_check_db() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("CLIMATE API - DATASET CHECK");
    println!("======================================================================");

    let config = Config::load()?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    println!("Database: {}", config.climate_db_path.display());

    print!("\n1. Opening read-only connection... ");
    let conn = db::open_read_only(&config.climate_db_path)?;
    println!("OK");

    print!("\n2. Validating schema... ");
    db::validate_schema(&conn)?;
    println!("OK");

    print!("\n3. Counting rows... ");
    let measurements: i64 =
        conn.query_row("SELECT COUNT(*) FROM measurement", [], |row| row.get(0))?;
    let stations: i64 = conn.query_row("SELECT COUNT(*) FROM station", [], |row| row.get(0))?;
    println!("OK");
    println!("   Measurements: {}", measurements);
    println!("   Stations: {}", stations);

    print!("\n4. Most-active station... ");
    match db::most_active_station(&conn)? {
        Some(station) => {
            println!("OK");
            println!("   Station: {}", station);
        }
        None => println!("NONE (measurement table is empty)"),
    }

    println!("\n======================================================================");
    println!("DATASET CHECK COMPLETED");
    println!("======================================================================");

    Ok(())
}

/// Run the HTTP server.
async fn cmd_run(port_override: Option<u16>, db_override: Option<PathBuf>) -> anyhow::Result<()> {
    // Load configuration
    info!("Loading configuration...");
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Override with CLI args if provided
    if let Some(port) = port_override {
        config.port = port;
    }
    if let Some(db_path) = db_override {
        config.climate_db_path = db_path;
    }

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    // Fail fast on a malformed dataset before binding the port.
    let conn = db::open_read_only(&config.climate_db_path)?;
    db::validate_schema(&conn)?;
    drop(conn);
    info!("Dataset schema validated: {}", config.climate_db_path.display());

    // Initialize metrics
    metrics::init_metrics();
    let metrics_handle = PrometheusBuilder::new().install_recorder()?;

    // Create app state
    let app_state =
        AppState::new(&config.climate_db_path).with_metrics_handle(metrics_handle);
    let router = create_router(app_state);

    // Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
