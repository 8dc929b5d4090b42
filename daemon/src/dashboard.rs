use crate::models::{Builder, Job};
use crate::status;
use chrono::prelude::*;
use debileweb_common::api::{DashboardResponse, GroupStats, JobItem};
use debileweb_common::errors::*;
use std::collections::HashMap;
use std::time::{Duration, Instant};

const DASHBOARD_UPDATE_INTERVAL: u64 = 1; // seconds

#[derive(Debug)]
pub struct DashboardState {
    response: Option<DashboardResponse>,
    last_update: Instant,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> DashboardState {
        DashboardState {
            response: None,
            last_update: Instant::now(),
        }
    }

    pub fn is_fresh(&self) -> bool {
        if self.response.is_some() {
            self.last_update.elapsed() < Duration::from_secs(DASHBOARD_UPDATE_INTERVAL)
        } else {
            false
        }
    }

    pub fn update(&mut self, connection: &mut diesel::SqliteConnection) -> Result<()> {
        Builder::mark_stale_offline(connection)?;

        let mut active_jobs = Vec::new();
        for (job, source, check, builder) in Job::active(connection)? {
            let item: JobItem = job.into_api_item(&source, &check, Some(&builder));
            active_jobs.push(item);
        }

        let pending_jobs = Job::pending_count(connection)?;

        let mut groups: HashMap<String, GroupStats> = HashMap::new();
        for (group, job) in Job::with_groups(connection)? {
            let stats = groups.entry(group).or_default();
            stats.total += 1;
            if !status::job_state(&job).is_finished() {
                stats.unfinished += 1;
            }
            if job.failed == Some(true) {
                stats.failed += 1;
            }
        }

        let now = Utc::now().naive_utc();
        self.response = Some(DashboardResponse {
            active_jobs,
            pending_jobs,
            groups,
            now,
        });
        self.last_update = Instant::now();
        Ok(())
    }

    pub fn get_response(&self) -> Result<&DashboardResponse> {
        if let Some(resp) = &self.response {
            Ok(resp)
        } else {
            bail!("No cached state")
        }
    }
}
