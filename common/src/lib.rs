use crate::errors::*;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::str::FromStr;

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod http;
pub mod utils;

/// Lifecycle state of a job. This is always derived from the job row
/// (`finished_at`, assigned builder), never stored in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum JobState {
    #[serde(rename = "pending")]
    #[clap(name = "pending")]
    Pending,
    #[serde(rename = "running")]
    #[clap(name = "running")]
    Running,
    #[serde(rename = "finished")]
    #[clap(name = "finished")]
    Finished,
}

impl JobState {
    pub fn is_finished(&self) -> bool {
        matches!(self, JobState::Finished)
    }

    pub fn fancy(&self) -> String {
        match self {
            JobState::Pending => "pending ".yellow().to_string(),
            JobState::Running => "running ".blue().to_string(),
            JobState::Finished => "finished".green().to_string(),
        }
    }
}

impl Deref for JobState {
    type Target = str;

    fn deref(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Running => "running",
            JobState::Finished => "finished",
        }
    }
}

impl FromStr for JobState {
    type Err = Error;

    fn from_str(s: &str) -> Result<JobState> {
        match s {
            "pending" => Ok(JobState::Pending),
            "running" => Ok(JobState::Running),
            "finished" => Ok(JobState::Finished),
            _ => bail!("Unknown job state: {:?}", s),
        }
    }
}
