use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    match cli.command {
        Command::Run(args) => args.run(),
        Command::Plan(args) => args.run(),
        Command::Tween(args) => args.run(),
    }
}

/// Logs go to stderr so stdout carries only the animated values.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Parser)]
#[command(name = "rebound", about = "Decaying bounce animations on a timer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the bounce chain described by a configuration file.
    Run(cli::run::RunArgs),
    /// Print every pass of a bounce chain without running it.
    Plan(cli::plan::PlanArgs),
    /// Run a single linear sweep.
    Tween(cli::tween::TweenArgs),
}
