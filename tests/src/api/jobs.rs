use crate::actions::*;
use crate::data;
use crate::fixtures::server::IsolatedServer;
use crate::fixtures::*;
use debileweb_common::api::ListJobs;
use debileweb_common::JobState;
use rstest::rstest;
use std::fs;

#[rstest]
#[tokio::test]
pub async fn jobs_filter_by_state(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_sample_farm(&client).await;

    let finished = client
        .list_jobs(&ListJobs {
            state: Some(JobState::Finished),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(finished.total, 1);
    assert_eq!(finished.jobs[0].check, "build");
    assert_eq!(finished.jobs[0].source, "lighttpd");

    let running = client
        .list_jobs(&ListJobs {
            state: Some(JobState::Running),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(running.total, 1);

    let pending = client
        .list_jobs(&ListJobs {
            state: Some(JobState::Pending),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(pending.total, 5);
}

#[rstest]
#[tokio::test]
pub async fn jobs_filter_by_builder_and_check(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_sample_farm(&client).await;

    let list = client
        .list_jobs(&ListJobs {
            builder: Some(data::OTHER_BUILDER.to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(list.total, 1);
    assert_eq!(list.jobs[0].check, "lintian");

    let list = client
        .list_jobs(&ListJobs {
            check: Some("build".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(list.total, 3);

    let list = client
        .list_jobs(&ListJobs {
            builder: Some("no-such-builder".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(list.total, 0);
}

#[rstest]
#[tokio::test]
pub async fn unknown_job_report_is_not_found(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_sample_farm(&client).await;

    assert!(client.get_job(9999).await.is_err());
}

#[rstest]
#[tokio::test]
pub async fn job_report_has_runtime_and_results(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_sample_farm(&client).await;

    let finished = client
        .list_jobs(&ListJobs {
            state: Some(JobState::Finished),
            ..Default::default()
        })
        .await
        .unwrap();
    let job_id = finished.jobs[0].id;

    let report = client.get_job(job_id).await.unwrap();

    assert_eq!(report.runtime.as_deref(), Some("1h 30m 00s"));
    assert_eq!(report.job.builder.as_deref(), Some(data::DUMMY_BUILDER));

    let kinds = report
        .results
        .iter()
        .map(|r| r.kind.as_str())
        .collect::<Vec<_>>();
    assert_eq!(kinds, vec!["log", "firehose"]);
    assert_eq!(report.log_path, format!("/api/v0/jobs/{}/log", job_id));
}

#[rstest]
#[tokio::test]
pub async fn pending_job_report_has_no_runtime(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_sample_farm(&client).await;

    let pending = client
        .list_jobs(&ListJobs {
            state: Some(JobState::Pending),
            ..Default::default()
        })
        .await
        .unwrap();

    let report = client.get_job(pending.jobs[0].id).await.unwrap();

    assert_eq!(report.runtime, None);
    assert!(report.results.is_empty());
}

#[rstest]
#[tokio::test]
pub async fn non_build_jobs_depend_on_the_build(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_sample_farm(&client).await;

    let running = client
        .list_jobs(&ListJobs {
            state: Some(JobState::Running),
            ..Default::default()
        })
        .await
        .unwrap();

    // the running lintian job waits for lighttpd's build
    let report = client.get_job(running.jobs[0].id).await.unwrap();
    assert_eq!(report.dependencies, vec!["build".to_string()]);
}

#[rstest]
#[tokio::test]
pub async fn job_log_is_not_found_before_the_farm_ships_it(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_sample_farm(&client).await;

    let finished = client
        .list_jobs(&ListJobs {
            state: Some(JobState::Finished),
            ..Default::default()
        })
        .await
        .unwrap();

    let result = client.fetch_log(finished.jobs[0].id).await;
    assert!(result.is_err());
}

#[rstest]
#[tokio::test]
pub async fn job_log_is_served_from_the_output_tree(isolated_server: IsolatedServer) {
    let client = isolated_server.client;
    let jobs_path = isolated_server.jobs_path;

    import_sample_farm(&client).await;

    let finished = client
        .list_jobs(&ListJobs {
            state: Some(JobState::Finished),
            ..Default::default()
        })
        .await
        .unwrap();
    let job_id = finished.jobs[0].id;

    let job_dir = jobs_path.join(job_id.to_string());
    fs::create_dir_all(&job_dir).unwrap();
    fs::write(job_dir.join("log.txt"), b"dpkg-buildpackage: info: done\n").unwrap();

    let log = client.fetch_log(job_id).await.unwrap();
    assert_eq!(log, b"dpkg-buildpackage: info: done\n");
}

#[rstest]
#[tokio::test]
pub async fn firehose_report_is_served_from_the_output_tree(isolated_server: IsolatedServer) {
    let client = isolated_server.client;
    let jobs_path = isolated_server.jobs_path;

    import_sample_farm(&client).await;

    let finished = client
        .list_jobs(&ListJobs {
            state: Some(JobState::Finished),
            ..Default::default()
        })
        .await
        .unwrap();
    let job_id = finished.jobs[0].id;

    assert!(client.fetch_firehose(job_id).await.is_err());

    let job_dir = jobs_path.join(job_id.to_string());
    fs::create_dir_all(&job_dir).unwrap();
    fs::write(job_dir.join("firehose.xml"), b"<analysis/>\n").unwrap();

    let firehose = client.fetch_firehose(job_id).await.unwrap();
    assert_eq!(firehose, b"<analysis/>\n");
}

#[rstest]
#[tokio::test]
pub async fn log_of_unknown_job_is_not_found(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    let result = client.fetch_log(12345).await;
    assert!(result.is_err());
}
