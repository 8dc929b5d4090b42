use clap::{ArgAction, CommandFactory, Parser};
use clap_complete::Shell;
use debileweb_common::errors::*;
use debileweb_common::JobState;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    /// Verbose logging
    #[arg(short, long, global = true, action(ArgAction::Count))]
    pub verbose: u8,
    /// debileweb endpoint to talk to
    #[arg(short = 'H', long)]
    pub endpoint: Option<String>,
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Bypass tty detection and always use colors
    #[arg(short = 'C', long, global = true)]
    pub color: bool,
    #[command(subcommand)]
    pub subcommand: SubCommand,
}

#[derive(Debug, Parser)]
pub enum SubCommand {
    /// Show the farm dashboard
    Status,
    /// Source package related subcommands
    #[command(subcommand)]
    Sources(Sources),
    /// Job related subcommands
    #[command(subcommand)]
    Jobs(Jobs),
    /// Builder related subcommands
    #[command(subcommand)]
    Builders(Builders),
    /// Mirror a farm state file into the dashboard
    Import(Import),
    /// Generate shell completions
    Completions(Completions),
}

#[derive(Debug, Parser)]
pub enum Sources {
    /// List sources matching a filter
    Ls(SourcesList),
    /// Show one source with its jobs and binaries
    Show(SourcesShow),
}

#[derive(Debug, Parser)]
pub struct SourcesList {
    /// Named filter: recent, unfinished, queued, unbuilt, failed
    #[arg(long)]
    pub filter: Option<String>,
    /// Filter sources whose name starts with this prefix
    #[arg(long)]
    pub prefix: Option<String>,
    /// Filter sources by maintainer substring
    #[arg(long)]
    pub maintainer: Option<String>,
    /// Filter sources whose name starts with this search term
    #[arg(long)]
    pub name: Option<String>,
    /// Filter sources belonging to this group
    #[arg(long)]
    pub group: Option<String>,
    /// Page to fetch
    #[arg(long, default_value = "0")]
    pub page: i64,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct SourcesShow {
    pub group: String,
    pub name: String,
    /// Version to show, defaults to the latest
    #[arg(long)]
    pub version: Option<String>,
    /// Rebuild run to show, defaults to the latest
    #[arg(long)]
    pub run: Option<i32>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub enum Jobs {
    /// List jobs matching a filter
    Ls(JobsList),
    /// Show one job report
    Show(JobsShow),
    /// Access the build log of a job
    Log(JobsLog),
}

#[derive(Debug, Parser)]
pub struct JobsList {
    /// Filter jobs assigned to this builder
    #[arg(long)]
    pub builder: Option<String>,
    /// Filter jobs in this state
    #[arg(long)]
    pub state: Option<JobState>,
    /// Filter jobs of this check
    #[arg(long)]
    pub check: Option<String>,
    /// Page to fetch
    #[arg(long, default_value = "0")]
    pub page: i64,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct JobsShow {
    pub id: i32,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct JobsLog {
    pub id: i32,
}

#[derive(Debug, Parser)]
pub enum Builders {
    /// List known builders
    Ls(BuildersList),
    /// Show one builder with its active jobs
    Show(BuildersShow),
}

#[derive(Debug, Parser)]
pub struct BuildersList {
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct BuildersShow {
    pub name: String,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct Import {
    /// Path to a farm state file (json)
    pub file: PathBuf,
}

#[derive(Debug, Parser)]
pub struct Completions {
    pub shell: Shell,
}

pub fn gen_completions(args: &Completions) -> Result<()> {
    clap_complete::generate(args.shell, &mut Args::command(), "debilectl", &mut io::stdout());
    Ok(())
}
