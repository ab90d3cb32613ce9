use args::Cli;
use clap::Parser;
use commands::process_args;
use tracing::Level;

pub mod args;
pub mod commands;
pub mod error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // verbosity is fixed at construction for the lifetime of the command
    let level = if args.verbose { Level::INFO } else { Level::WARN };
    let sub = tracing_subscriber::fmt().with_max_level(level).finish();
    tracing::subscriber::set_global_default(sub)?;

    process_args(&args).await
}
