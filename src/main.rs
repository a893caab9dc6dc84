mod api;
mod cli;
mod config;
mod datasources;
mod db;
mod error;
mod logic;
mod models;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use db::Database;
use logic::{simulate_forecast, RecommendationEngine};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve);

    init_logging(cli.verbose, matches!(command, Commands::Serve));

    match command {
        Commands::Serve => serve(cli.config, cli.data_dir.as_ref()).await,
        Commands::Init => {
            Config::setup_interactive()?;
            Ok(())
        }
        Commands::Check => check(cli.config, cli.data_dir.as_ref()),
        Commands::Seed => seed(cli.config, cli.data_dir.as_ref()),
        Commands::Recommend { field_id } => {
            recommend(cli.config, cli.data_dir.as_ref(), field_id)
        }
        Commands::Forecast => forecast(),
    }
}

/// `RUST_LOG` wins; otherwise -v selects debug and -vv trace
fn init_logging(verbose: u8, serving: bool) {
    let default_level = match verbose {
        0 if serving => "info",
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn open_database(config: &Config, data_dir: Option<&PathBuf>) -> anyhow::Result<Database> {
    let db_path = config.db_path(data_dir)?;
    let db = Database::open(&db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;
    Ok(db)
}

async fn serve(config_path: Option<PathBuf>, data_dir: Option<&PathBuf>) -> anyhow::Result<()> {
    let config = Config::load_or_default(config_path)?;
    let db = open_database(&config, data_dir)?;

    if config.seed.on_startup {
        db::seed_mock_data(
            &db,
            &config.seed.field_id,
            chrono::Utc::now(),
            &mut rand::thread_rng(),
        )?;
    }

    let addr = config.server.bind_addr();
    let app = api::create_app(api::AppState::new(db, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

fn check(config_path: Option<PathBuf>, data_dir: Option<&PathBuf>) -> anyhow::Result<()> {
    let config = if Config::exists(config_path.as_ref()) {
        let config = Config::load(config_path)?;
        println!("Config: OK");
        config
    } else {
        println!("Config: not found, using defaults (run `agrocast init` to create one)");
        Config::load_or_default(None)?
    };

    println!("Server: {}", config.server.bind_addr());
    println!(
        "Rate limit: {}",
        if config.rate_limit.enabled {
            format!(
                "{} requests / {}s",
                config.rate_limit.requests, config.rate_limit.window_secs
            )
        } else {
            "disabled".to_string()
        }
    );

    let db = open_database(&config, data_dir)?;
    println!("Database: {}", db.path().display());
    println!("  Sensor readings: {}", db.count_readings()?);
    println!("  Yield records:   {}", db.count_yields()?);

    println!("Rules:");
    for (id, name) in RecommendationEngine::<Database>::list_rules() {
        println!("  {:<16} {}", id, name);
    }

    Ok(())
}

fn seed(config_path: Option<PathBuf>, data_dir: Option<&PathBuf>) -> anyhow::Result<()> {
    let config = Config::load_or_default(config_path)?;
    let db = open_database(&config, data_dir)?;

    let summary = db::seed_mock_data(
        &db,
        &config.seed.field_id,
        chrono::Utc::now(),
        &mut rand::thread_rng(),
    )?;

    if summary.is_empty() {
        println!("Database already contains sensor data; nothing seeded");
    } else {
        println!(
            "Seeded {} readings and {} yield records for {}",
            summary.readings, summary.yields, config.seed.field_id
        );
    }
    Ok(())
}

fn recommend(
    config_path: Option<PathBuf>,
    data_dir: Option<&PathBuf>,
    field_id: Option<String>,
) -> anyhow::Result<()> {
    let config = Config::load_or_default(config_path)?;
    let db = open_database(&config, data_dir)?;
    let field_id = field_id.unwrap_or_else(|| config.defaults.field_id.clone());

    let result = RecommendationEngine::new(&db).generate_recommendations(&field_id)?;
    if result.has_alerts() {
        for alert in &result.alerts {
            tracing::warn!(field_id = %field_id, "{}", alert);
        }
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn forecast() -> anyhow::Result<()> {
    let forecast = simulate_forecast(chrono::Utc::now(), &mut rand::thread_rng());
    tracing::debug!(
        total_rainfall = models::total_rainfall(&forecast),
        "Simulated forecast"
    );
    println!("{}", serde_json::to_string_pretty(&forecast)?);
    Ok(())
}
