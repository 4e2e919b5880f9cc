use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use creatordb_core::load_app_config_from_env;
use creatordb_engine::{Engine, EngineConfig, ErrorBody};
use creatordb_similarity::SimilarityService;

mod capture;

use capture::{CaptureAnalyzer, CaptureSource, RawCapture};

#[derive(Debug, Parser)]
#[command(name = "creatordb")]
#[command(about = "Creator intelligence engine CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run pending database migrations.
    Migrate,
    /// Evaluate an account from a scrape capture file and print the record.
    Evaluate {
        /// JSON capture: profile + posts + optional qualitative blob.
        #[arg(long)]
        input: PathBuf,
        /// Skip the analysis cache and force recomputation.
        #[arg(long)]
        no_cache: bool,
        /// Skip embedding generation (no TEI/Qdrant round trip).
        #[arg(long)]
        no_index: bool,
    },
    /// Find lookalike accounts for an analyzed identity.
    Lookalike {
        username: String,
        /// Minimum cosine similarity in [0, 1].
        #[arg(long, default_value_t = 0.8)]
        threshold: f32,
        /// Maximum number of results.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = load_app_config_from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let cli = Cli::parse();

    let pool = creatordb_db::connect_pool(
        &config.database_url,
        creatordb_db::PoolConfig::from_app_config(&config),
    )
    .await?;

    match cli.command {
        Commands::Migrate => {
            let applied = creatordb_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        Commands::Evaluate {
            input,
            no_cache,
            no_index,
        } => {
            let capture = RawCapture::load(&input)?;
            let username = capture.profile.username.clone();

            let mut engine_config = EngineConfig::from_app_config(&config);
            if no_cache {
                // A zero-width freshness window turns every lookup into a miss.
                engine_config.cache_freshness = Duration::ZERO;
            }

            let analyzer = CaptureAnalyzer::new(capture.qualitative.clone());
            let mut engine = Engine::new(
                CaptureSource::new(capture),
                analyzer,
                pool.clone(),
                engine_config,
            );
            if !no_index {
                engine = engine.with_similarity(SimilarityService::from_config(pool, &config));
            }

            match engine.evaluate(&username).await {
                Ok(evaluation) => {
                    tracing::info!(
                        username = %evaluation.record.username,
                        cache_hit = evaluation.cache_hit,
                        "evaluation complete"
                    );
                    let out = serde_json::json!({
                        "cache_hit": evaluation.cache_hit,
                        "record": evaluation.record,
                    });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                Err(e) => {
                    let body = ErrorBody::from(&e);
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&serde_json::json!({"error": body}))?
                    );
                    std::process::exit(1);
                }
            }
        }
        Commands::Lookalike {
            username,
            threshold,
            limit,
        } => {
            let service = SimilarityService::from_config(pool, &config);
            match service.find_similar(&username, threshold, limit).await {
                Ok(lookalikes) => {
                    let out = serde_json::json!({ "lookalikes": lookalikes });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                Err(e) => {
                    let body = ErrorBody::from(&e);
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&serde_json::json!({"error": body}))?
                    );
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
