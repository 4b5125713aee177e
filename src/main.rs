use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use veriscan::config::Config;
use veriscan::feedback::{FeedbackLog, JsonFileFeedbackLog};

/// veriscan: score images, uploads and text for AI-generated content.
///
/// Serves the detection API and dashboard, and keeps a local history of
/// every detection plus user feedback.
#[derive(Parser)]
#[command(name = "veriscan", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database and upload directory
    Init,

    /// Start the HTTP API and dashboard
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8000")]
        port: u16,

        /// Address to bind (use 0.0.0.0 to accept remote connections)
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },

    /// Show today's stats and the most recent detections
    Status {
        /// Number of recent detections to list
        #[arg(long, default_value = "5")]
        recent: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("veriscan=info,tower_http=info")
            }),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Init => {
            info!("Initializing veriscan database...");
            let db = veriscan::db::initialize_sqlite(&config.db_path)?;
            let table_count = db.table_count().await?;
            std::fs::create_dir_all(&config.upload_dir)?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("Upload directory: {}", config.upload_dir.display());
            println!("\nveriscan is ready. Next step: cargo run -- serve");
        }

        Commands::Serve { port, bind } => {
            config.require_scorer()?;
            // Serving always initializes, so a fresh checkout works without `init`
            let db = veriscan::db::initialize_sqlite(&config.db_path)?;
            let state = veriscan::web::AppState::from_config(config, db)?;
            veriscan::web::run_server(state, port, &bind).await?;
        }

        Commands::Status { recent } => {
            let db = veriscan::db::open_sqlite(&config.db_path)?;
            let feedback: Arc<dyn FeedbackLog> =
                Arc::new(JsonFileFeedbackLog::new(config.feedback_path.clone()));
            println!("{}", "veriscan status".bold());
            veriscan::status::show(&db, &feedback, &config.db_path, recent, config.threshold)
                .await?;
        }
    }

    Ok(())
}
