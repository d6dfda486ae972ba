use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use esoval::commands::{catalog_report, sweep_report, value_report};
use esoval::{OutputFormat, SESSION_FILE, SessionConfig, init_logging, parse_assignment};

#[derive(Parser, Debug)]
#[command(name = "esoval")]
#[command(about = "Employee stock option valuation and sensitivity sweeps")]
struct Args {
    /// Path to the data directory (default: ~/.esoval/)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Session file (default: {data_dir}/session.yaml)
    #[arg(short, long, global = true)]
    session: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Override an input in display units, e.g. `--set volatility=45`
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment, global = true)]
    overrides: Vec<(String, f64)>,

    /// Pricing oracle program (replaces the session's oracle)
    #[arg(long, global = true)]
    oracle: Option<String>,

    /// Argument passed to the oracle program (repeatable)
    #[arg(long = "oracle-arg", global = true, allow_hyphen_values = true)]
    oracle_args: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the tunable inputs
    Catalog,
    /// Value the baseline inputs
    Value,
    /// Vary one input across its range
    Sweep {
        /// Variable to sweep, e.g. `volatility`
        variable: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Worker threads (default: CPU count)
        #[arg(short, long)]
        workers: Option<usize>,
    },
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".esoval")
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);

    init_logging(&data_dir, &args.log_level)?;

    let session_path = args.session.unwrap_or_else(|| data_dir.join(SESSION_FILE));
    let mut session = SessionConfig::load_or_default(&session_path)
        .wrap_err_with(|| format!("failed to load session {}", session_path.display()))?;
    session.apply_overrides(&args.overrides);

    session.apply_oracle_override(args.oracle, args.oracle_args)?;

    let output = match args.command {
        Command::Catalog => catalog_report(&session),
        Command::Value => {
            let gateway = session.gateway()?;
            value_report(&session, &gateway)?
        }
        Command::Sweep {
            variable,
            format,
            workers,
        } => {
            if workers.is_some() {
                session.workers = workers;
            }
            let gateway = session.gateway()?;
            sweep_report(&session, &gateway, &variable, format)?
        }
    };

    println!("{output}");

    tracing::info!("esoval finished");
    Ok(())
}
