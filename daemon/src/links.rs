//! Canonical URL paths for farm entities. Every function is a pure mapping
//! from identity fields, so templates and API consumers agree on one link
//! per entity.

pub fn source_path(group: &str, name: &str, version: &str, run: i32) -> String {
    format!("/source/{}/{}/{}/{}", group, name, version, run)
}

pub fn group_path(name: &str, page: i64) -> String {
    format!("/group/{}/{}", name, page)
}

pub fn builder_path(name: &str) -> String {
    format!("/builder/{}", name)
}

pub fn maintainer_path(login: &str) -> String {
    format!("/maintainer/{}", login)
}

pub fn job_path(id: i32) -> String {
    format!("/job/{}", id)
}

pub fn job_log_path(id: i32) -> String {
    format!("/api/v0/jobs/{}/log", id)
}

pub fn job_firehose_path(id: i32) -> String {
    format!("/api/v0/jobs/{}/firehose", id)
}

/// Where a job's human-readable report lives. The static analyzer is the
/// odd one out: its report is a browsable scan-build directory instead of a
/// log page.
pub fn job_report_path(check: &str, id: i32) -> String {
    if check == "clanganalyzer" {
        format!("/static-job-reports/{}/scan-build/", id)
    } else {
        job_path(id)
    }
}
