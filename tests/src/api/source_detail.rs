use crate::actions::*;
use crate::data;
use crate::fixtures::server::IsolatedServer;
use crate::fixtures::*;
use debileweb_common::api::SourceQuery;
use debileweb_common::JobState;
use rstest::rstest;

#[rstest]
#[tokio::test]
pub async fn unknown_source_is_not_found(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_sample_farm(&client).await;

    let result = client
        .get_source(data::DUMMY_GROUP, "no-such-package", &SourceQuery::default())
        .await;
    assert!(result.is_err());

    let result = client
        .get_source("no-such-group", "lighttpd", &SourceQuery::default())
        .await;
    assert!(result.is_err());
}

#[rstest]
#[tokio::test]
pub async fn source_detail_aggregates_job_states(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_sample_farm(&client).await;

    let detail = client
        .get_source(data::DUMMY_GROUP, "lighttpd", &SourceQuery::default())
        .await
        .unwrap();

    assert_eq!(detail.total, 3);
    assert_eq!(detail.unfinished, 2);

    // jobs come back ordered by check name
    let states = detail
        .source_jobs
        .iter()
        .chain(&detail.binary_jobs)
        .map(|j| (j.check.as_str(), j.state))
        .collect::<Vec<_>>();
    assert_eq!(
        states,
        vec![
            ("build", JobState::Finished),
            ("lintian", JobState::Running),
            ("piuparts", JobState::Pending),
        ]
    );
}

#[rstest]
#[tokio::test]
pub async fn source_detail_splits_source_and_binary_checks(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_sample_farm(&client).await;

    let detail = client
        .get_source(data::DUMMY_GROUP, "lighttpd", &SourceQuery::default())
        .await
        .unwrap();

    let source_checks = detail
        .source_jobs
        .iter()
        .map(|j| j.check.as_str())
        .collect::<Vec<_>>();
    let binary_checks = detail
        .binary_jobs
        .iter()
        .map(|j| j.check.as_str())
        .collect::<Vec<_>>();

    assert_eq!(source_checks, vec!["build", "lintian"]);
    assert_eq!(binary_checks, vec!["piuparts"]);
}

#[rstest]
#[tokio::test]
pub async fn latest_version_follows_debian_ordering(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    client
        .import(&data::import_of(vec![
            data::source("zsh", "1.0-2", 1, vec![data::pending_job("build")]),
            data::source("zsh", "1.0-10", 1, vec![data::pending_job("build")]),
        ]))
        .await
        .unwrap();

    let detail = client
        .get_source(data::DUMMY_GROUP, "zsh", &SourceQuery::default())
        .await
        .unwrap();

    // lexicographically "1.0-10" < "1.0-2", but not in Debian order
    assert_eq!(detail.latest_version, "1.0-10");
    assert_eq!(detail.source.version, "1.0-10");
    assert_eq!(detail.versions, vec!["1.0-2", "1.0-10"]);
}

#[rstest]
#[tokio::test]
pub async fn explicit_version_and_run_are_honored(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    client
        .import(&data::import_of(vec![
            data::source("zsh", "1.0-1", 1, vec![data::pending_job("build")]),
            data::source("zsh", "1.0-1", 2, vec![data::pending_job("build")]),
            data::source("zsh", "1.0-2", 1, vec![data::pending_job("build")]),
        ]))
        .await
        .unwrap();

    let detail = client
        .get_source(
            data::DUMMY_GROUP,
            "zsh",
            &SourceQuery {
                version: Some("1.0-1".to_string()),
                run: Some(1),
            },
        )
        .await
        .unwrap();

    assert_eq!(detail.source.version, "1.0-1");
    assert_eq!(detail.source.run, 1);
    assert_eq!(detail.runs, vec![1, 2]);
    assert_eq!(detail.latest_run, 2);
}

#[rstest]
#[tokio::test]
pub async fn latest_run_is_used_by_default(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    client
        .import(&data::import_of(vec![
            data::source("zsh", "1.0-1", 1, vec![data::pending_job("build")]),
            data::source("zsh", "1.0-1", 2, vec![data::pending_job("build")]),
        ]))
        .await
        .unwrap();

    let detail = client
        .get_source(data::DUMMY_GROUP, "zsh", &SourceQuery::default())
        .await
        .unwrap();

    assert_eq!(detail.source.run, 2);
}

#[rstest]
#[tokio::test]
pub async fn binaries_link_back_to_the_finished_build_job(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_sample_farm(&client).await;

    let detail = client
        .get_source(data::DUMMY_GROUP, "lighttpd", &SourceQuery::default())
        .await
        .unwrap();

    let build = detail
        .source_jobs
        .iter()
        .find(|j| j.check == "build")
        .unwrap();

    assert_eq!(detail.binaries.len(), 1);
    let binary = &detail.binaries[0];
    assert_eq!(binary.name, "lighttpd");
    assert_eq!(binary.architecture, "amd64");
    assert_eq!(binary.job_id, Some(build.id));
}
