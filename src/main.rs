use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};

mod cli;

use cli::{
    cmd_augment, cmd_measure, cmd_metrics, init_logging, AugmentArgs, MeasureArgs, MetricsArgs,
    OutputFormat,
};

/// Responsive stretch RTD - ad slot geometry for bid requests
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Enable debug mode
    #[arg(short, long)]
    debug: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure ad slots on a page fixture
    Measure(MeasureArgs),

    /// Run a full augmentation cycle against a bid request
    Augment(AugmentArgs),

    /// Show geometry measurement counters
    Metrics(MetricsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.debug)?;
    info!("Starting stretch-rtd v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Measure(args) => cmd_measure(args, cli.output).await,
        Commands::Augment(args) => cmd_augment(args, cli.output).await,
        Commands::Metrics(args) => cmd_metrics(args, cli.output).await,
    };

    match result {
        Ok(()) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            std::process::exit(1);
        }
    }
}
