//! `kubediag`: wires loader -> engine -> renderer (§4.9). Exit code 0 on
//! success regardless of root cause found — diagnosis is not a failure;
//! nonzero only on input/load errors or registry construction failure.

mod commands;
mod config;
mod error;

use clap::{Parser, Subcommand};
use commands::{diagnose, rules};
use error::CliError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "kubediag", about = "Kubernetes diagnostic reasoning engine", version)]
struct Cli {
    /// Emit structured JSON logs instead of the default text format.
    #[arg(long, global = true)]
    json_logs: bool,

    /// Enable debug-level tracing (overridden by `RUST_LOG`/`KUBEDIAG_LOG`).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Diagnose a pod snapshot and print the resulting explanation.
    Diagnose(diagnose::DiagnoseArgs),
    /// Introspect the loaded rule registry.
    Rules {
        #[command(subcommand)]
        command: rules::RulesCommands,
    },
}

fn init_tracing(verbose: bool, json: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter = std::env::var("KUBEDIAG_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_filter.to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(&filter).unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().without_time()).init();
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    let result = match cli.command {
        Commands::Diagnose(args) => diagnose::run(args),
        Commands::Rules { command } => rules::run(command),
    };

    if let Err(err) = result {
        report_and_exit(err);
    }
}

fn report_and_exit(err: CliError) -> ! {
    eprintln!("error: {err}");
    std::process::exit(1);
}
