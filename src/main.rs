use blinkrag::cli::handlers;
use blinkrag::cli::output::print_config;
use blinkrag::config::AppConfig;
use blinkrag::Result;
use clap::Parser;
use clap::Subcommand;
use tracing::info;

#[derive(Parser)]
#[command(name = "blinkrag")]
#[command(about = "Blinkit feedback assistant - retrieval-augmented answers over customer feedback")]
#[command(version)]
struct Cli {
    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single business question
    Ask {
        /// The question to answer
        question: String,
        /// Show the retrieved feedback behind the answer
        #[arg(long)]
        sources: bool,
    },
    /// Start an interactive chat session
    Chat {
        /// Show the retrieved feedback behind each answer
        #[arg(long)]
        sources: bool,
    },
    /// Retrieve feedback without generating an answer
    Search {
        /// Search query
        query: String,
        /// Maximum number of results
        #[arg(short, long, default_value = "5")]
        limit: usize,
        /// Minimum similarity score
        #[arg(long, default_value = "0.35")]
        min_score: f32,
    },
    /// Index commands
    #[command(subcommand)]
    Index(IndexCommands),
    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum IndexCommands {
    /// Embed a JSON export of feedback records and write the index artifacts
    Build {
        /// Path to the feedback export (JSON array of records)
        input: String,
    },
    /// Show the index's shape and embedding model
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        blinkrag::logging::init_logging_with_level("debug")?;
    } else {
        blinkrag::logging::init_logging()?;
    }

    // Load configuration
    let config = AppConfig::load()?;
    info!("Configuration loaded successfully");

    // Execute the requested command
    match cli.command {
        Commands::Ask { question, sources } => {
            handlers::handle_ask(&config, question, sources).await?;
        }
        Commands::Chat { sources } => {
            handlers::handle_chat(&config, sources).await?;
        }
        Commands::Search {
            query,
            limit,
            min_score,
        } => {
            handlers::handle_search(&config, query, limit, min_score).await?;
        }
        Commands::Index(index_command) => match index_command {
            IndexCommands::Build { input } => {
                handlers::handle_index_build(&config, input).await?;
            }
            IndexCommands::Info => {
                handlers::handle_index_info(&config)?;
            }
        },
        Commands::Config => {
            print_config(&config);
        }
    }

    Ok(())
}
