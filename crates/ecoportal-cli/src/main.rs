mod recommend;
mod sync;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

const CATALOG_PATH: &str = "./config/catalog.yaml";

#[derive(Debug, Parser)]
#[command(name = "ecoportal-cli")]
#[command(about = "Ecosystem portal command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Run or probe the catalog sync against the configured database
    Sync {
        #[command(subcommand)]
        command: sync::SyncCommands,
    },
    /// Rank sectors for a user profile read from a JSON file
    Recommend {
        /// Sector catalog used to build the relationship graph
        #[arg(long, env = "ECOPORTAL_CATALOG_PATH", default_value = CATALOG_PATH)]
        catalog: PathBuf,
        /// Path to a JSON user profile; omit for an empty profile
        #[arg(long)]
        profile: Option<PathBuf>,
        /// Maximum number of recommendations to print
        #[arg(long, default_value_t = ecoportal_recommend::weights::DEFAULT_MAX_RESULTS)]
        max: usize,
        /// Print JSON instead of human-readable explanations
        #[arg(long)]
        json: bool,
    },
    /// Print the sector relationship graph built from the catalog
    Graph {
        #[arg(long, env = "ECOPORTAL_CATALOG_PATH", default_value = CATALOG_PATH)]
        catalog: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("ecoportal-cli ready; run with --help for commands");
        return Ok(());
    };

    match command {
        Commands::Db { command } => {
            let config = ecoportal_core::load_app_config()?;
            let pool = ecoportal_db::connect_pool_from_config(&config).await?;
            match command {
                DbCommands::Ping => {
                    ecoportal_db::health_check(&pool).await?;
                    println!("database ok");
                }
                DbCommands::Migrate => {
                    let applied = ecoportal_db::run_migrations(&pool).await?;
                    println!("applied {applied} migration(s)");
                }
            }
        }
        Commands::Sync { command } => {
            let config = ecoportal_core::load_app_config()?;
            let pool = ecoportal_db::connect_pool_from_config(&config).await?;
            sync::run(&command, pool).await?;
        }
        Commands::Recommend {
            catalog,
            profile,
            max,
            json,
        } => {
            recommend::run_recommend(&catalog, profile.as_deref(), max, json)?;
        }
        Commands::Graph { catalog } => recommend::run_graph(&catalog)?,
    }

    Ok(())
}
