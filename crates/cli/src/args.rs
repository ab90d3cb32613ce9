use clap::{Parser, Subcommand};

/// Set up the Qbs build environment
#[derive(Parser)]
#[command(name = "qbstrap", version)]
pub struct Cli {
    /// Be more verbose
    #[arg(long, short, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Install the missing SDK packages, then look for the Qbs executable
    Init {
        /// Remove the installed packages before reinstalling them
        #[arg(long, short)]
        force: bool,
    },
    /// Query and set the stored settings
    Config {
        /// List every stored section
        #[arg(long, short)]
        list: bool,
        /// Option to query or set, as `section.option`
        key: Option<String>,
        /// New value of the option
        value: Option<String>,
    },
}
