use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

mod commands;
mod config;
mod error;

use error::CliResult;

#[derive(Parser)]
#[command(name = "sponsor-raffle")]
#[command(about = "Sponsor Raffle CLI - Participation-weighted sponsor prize draws for race weekends")]
#[command(version)]
struct Cli {
    /// Log engine decisions at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw this weekend's sponsor prizes
    Draw {
        /// Raffle configuration file (YAML)
        #[arg(short, long)]
        config: PathBuf,

        /// Seed for a reproducible draw (overrides the config seed)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Directory for awards.json, awards.csv and history_rows.csv
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,
    },

    /// Convert a winners.csv history into a JSON award registry
    ConvertHistory {
        /// Winner history CSV file
        #[arg(long)]
        history: PathBuf,

        /// Name recorded as the registry's last editor
        #[arg(short, long)]
        user: String,

        /// Output JSON file
        #[arg(short, long, default_value = "awards-registry.json")]
        output: PathBuf,

        /// Raffle configuration supplying sponsor display names
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate a sample event directory to try the raffle on
    GenerateFixtures {
        /// Output directory for the generated files
        #[arg(short, long, default_value = "fixtures")]
        output_dir: PathBuf,

        /// Seed for deterministic generation
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Number of cars
        #[arg(long, default_value = "20")]
        cars: usize,

        /// Number of drivers (more drivers than cars means shared cars)
        #[arg(long, default_value = "24")]
        drivers: usize,

        /// Number of races in the weekend
        #[arg(long, default_value = "3")]
        races: u32,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Draw {
            config,
            seed,
            output_dir,
        } => commands::draw_raffle::execute(config, seed, output_dir),

        Commands::ConvertHistory {
            history,
            user,
            output,
            config,
        } => commands::convert_history::execute(history, user, output, config),

        Commands::GenerateFixtures {
            output_dir,
            seed,
            cars,
            drivers,
            races,
        } => commands::generate_fixtures::execute(output_dir, seed, cars, drivers, races),
    }
}
