use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use dyass::app::CleanseService;
use dyass::config::Config;
use dyass::lexicon::Lexicon;
use dyass::pipeline::TextNormalizer;
use dyass::storage::{Collection, InMemoryRecordStore, RecordStore, SqliteDatabase};
use dyass::{logging, metrics, server};

#[derive(Parser)]
#[command(name = "dyass")]
#[command(about = "DYass (Data Yassification): cleanse informal Indonesian text")]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = dyass::constants::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
        /// Keep records in memory instead of the SQLite database
        #[arg(long)]
        in_memory: bool,
    },
    /// Clean a single text and store it
    Clean {
        text: String,
        /// Print the cleaned text without storing it
        #[arg(long)]
        dry_run: bool,
    },
    /// Clean the first column of a CSV file and store every row
    CleanFile { path: PathBuf },
    /// List stored records
    List {
        /// List rows from uploaded files instead of single texts
        #[arg(long)]
        files: bool,
    },
}

fn build_service(config: &Config, in_memory: bool) -> anyhow::Result<CleanseService> {
    let lexicon = Lexicon::load(&config.lexicon.informal_path, &config.lexicon.disallowed_path)
        .context("lookup tables must load before the pipeline is ready")?;
    let normalizer = Arc::new(TextNormalizer::new(Arc::new(lexicon)));

    let (texts, files): (Arc<dyn RecordStore>, Arc<dyn RecordStore>) = if in_memory {
        info!("Using in-memory record stores");
        (
            Arc::new(InMemoryRecordStore::new(Collection::Text)),
            Arc::new(InMemoryRecordStore::new(Collection::File)),
        )
    } else {
        let db = SqliteDatabase::open(&config.database.path)?;
        (
            Arc::new(db.store(Collection::Text)),
            Arc::new(db.store(Collection::File)),
        )
    };

    Ok(CleanseService::new(normalizer, texts, files))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::load_from(&cli.config)?;

    // Initialize logging
    let _log_guard = logging::init_logging(&config.logging.dir);

    if config.metrics.enabled {
        metrics::init_metrics(config.metrics.port);
    }

    match cli.command {
        Commands::Serve { port, in_memory } => {
            let service = build_service(&config, in_memory)?;
            let port = port.unwrap_or(config.server.port);
            println!("🚀 Serving DYass on http://{}:{}", config.server.host, port);
            server::start_server(server::AppState::new(service), &config.server.host, port).await?;
        }
        Commands::Clean { text, dry_run } => {
            let service = build_service(&config, dry_run)?;
            if dry_run {
                println!("{}", service.preview(&text));
            } else {
                let record = service.clean_text(&text).await?;
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
        }
        Commands::CleanFile { path } => {
            let service = build_service(&config, false)?;
            let bytes = std::fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            match service.clean_file(&bytes).await {
                Ok(records) => {
                    println!("✅ {} records in {}", records.len(), Collection::File);
                }
                Err(e) => {
                    // Rows cleaned before the failure stay stored
                    error!("Cleaning {} failed: {}", path.display(), e);
                    return Err(e.into());
                }
            }
        }
        Commands::List { files } => {
            let service = build_service(&config, false)?;
            let collection = if files { Collection::File } else { Collection::Text };
            let records = service.list(collection).await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }
    Ok(())
}
