use crate::models::Job;
use debileweb_common::JobState;

/// Derives the lifecycle state of a single job from its row. A job is
/// finished iff `finished_at` is set, running iff a builder holds it but it
/// hasn't finished, and pending otherwise.
pub fn job_state(job: &Job) -> JobState {
    if job.finished_at.is_some() {
        JobState::Finished
    } else if job.builder_id.is_some() {
        JobState::Running
    } else {
        JobState::Pending
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct JobStatusSummary {
    pub total: usize,
    pub unfinished: usize,
    /// Per-job states, in the same order as the input sequence.
    pub states: Vec<JobState>,
}

/// Aggregates job states for a source. Pure: counts don't depend on input
/// order, `states` preserves it. Empty input yields an all-zero summary.
pub fn summarize<'a, I>(jobs: I) -> JobStatusSummary
where
    I: IntoIterator<Item = &'a Job>,
{
    let mut summary = JobStatusSummary::default();
    for job in jobs {
        let state = job_state(job);
        summary.total += 1;
        if !state.is_finished() {
            summary.unfinished += 1;
        }
        summary.states.push(state);
    }
    summary
}
