mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process;

use commands::files::FilesCommand;
use commands::grid::GridArgs;
use commands::history::HistoryCommand;
use commands::share::ShareArgs;
use commands::simulate::{ScheduleArgs, SimulateArgs};

/// Mortgage (KPR) instalment simulation for property sales
#[derive(Parser)]
#[command(
    name = "kpr",
    version,
    about = "Mortgage (KPR) instalment simulation for property sales",
    long_about = "A CLI for simulating KPR mortgages with decimal precision. Computes \
                  discount, down payment and booking fee breakdowns, flat or annuity \
                  instalments with full schedules, rate x tenor comparisons, shareable \
                  summaries, saved simulation history and the sales file catalogue."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Directory holding the calculator state, history and saved links
    #[arg(long, default_value = ".kpr", global = true)]
    data_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a mortgage: price breakdown, instalment and totals
    Simulate(SimulateArgs),
    /// Print the month-by-month amortisation schedule
    Schedule(ScheduleArgs),
    /// Compare instalments across rates and tenors
    Grid(GridArgs),
    /// Print a chat-ready summary of a simulation
    Share(ShareArgs),
    /// Saved simulations
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
    /// Sales file catalogue
    Files {
        #[command(subcommand)]
        command: FilesCommand,
    },
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn fail(e: Box<dyn std::error::Error>) -> ! {
    eprintln!("{}: {}", "error".red().bold(), e);
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    let data_dir = cli.data_dir.as_path();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Simulate(args) => commands::simulate::run_simulate(args, data_dir),
        Commands::Schedule(args) => commands::simulate::run_schedule(args, data_dir),
        Commands::Grid(args) => commands::grid::run_grid(args, data_dir),
        Commands::Share(args) => match commands::share::run_share(args, data_dir) {
            Ok(text) => {
                println!("{}", text);
                return;
            }
            Err(e) => fail(e),
        },
        Commands::History { command } => commands::history::run_history(command, data_dir),
        Commands::Files { command } => commands::files::run_files(command, data_dir),
        Commands::Version => {
            println!("kpr {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => fail(e),
    }
}
