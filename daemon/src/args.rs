use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    /// Verbose logging
    #[arg(short, long, action(ArgAction::Count))]
    pub verbose: u8,
    /// Load and print a config
    #[arg(long, group = "action")]
    pub check_config: bool,
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Path to the sqlite database
    #[arg(long, env = "DEBILEWEB_DATABASE", default_value = "./debileweb.db")]
    pub database: PathBuf,
}
