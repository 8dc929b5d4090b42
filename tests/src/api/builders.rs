use crate::actions::*;
use crate::data;
use crate::fixtures::server::IsolatedServer;
use crate::fixtures::*;
use rstest::rstest;

#[rstest]
#[tokio::test]
pub async fn builders_are_listed_after_import(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_sample_farm(&client).await;

    let builders = client.list_builders().await.unwrap();
    let names = builders.iter().map(|b| b.name.as_str()).collect::<Vec<_>>();

    assert_eq!(names, vec![data::DUMMY_BUILDER, data::OTHER_BUILDER]);
    assert!(builders.iter().all(|b| b.online));
}

#[rstest]
#[tokio::test]
pub async fn builder_detail_shows_active_jobs(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_sample_farm(&client).await;

    let detail = client.get_builder(data::OTHER_BUILDER).await.unwrap();

    assert_eq!(detail.builder.address, "10.0.0.12");
    assert_eq!(detail.active_jobs.len(), 1);
    assert_eq!(detail.active_jobs[0].check, "lintian");
    assert_eq!(detail.active_jobs[0].source, "lighttpd");
}

#[rstest]
#[tokio::test]
pub async fn finished_jobs_are_not_active_on_their_builder(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_sample_farm(&client).await;

    // this builder only holds lighttpd's finished build
    let detail = client.get_builder(data::DUMMY_BUILDER).await.unwrap();

    assert!(detail.active_jobs.is_empty());
}

#[rstest]
#[tokio::test]
pub async fn unknown_builder_is_not_found(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_sample_farm(&client).await;

    assert!(client.get_builder("no-such-builder").await.is_err());
}

#[rstest]
#[tokio::test]
pub async fn group_detail_carries_maintainer_and_count(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_sample_farm(&client).await;

    let group = client.get_group(data::DUMMY_GROUP).await.unwrap();

    assert_eq!(group.name, data::DUMMY_GROUP);
    assert_eq!(group.maintainer.login, "sylvestre");
    assert_eq!(group.source_count, 3);
    assert_eq!(group.path, "/group/default/0");

    assert!(client.get_group("no-such-group").await.is_err());
}

#[rstest]
#[tokio::test]
pub async fn maintainer_detail_lists_recent_uploads(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_sample_farm(&client).await;

    let maintainer = client.get_maintainer("paultag").await.unwrap();

    assert_eq!(maintainer.maintainer.email, "paultag@example.com");
    assert_eq!(maintainer.maintainer.path, "/maintainer/paultag");
    assert_eq!(maintainer.sources.len(), 3);

    assert!(client.get_maintainer("no-such-login").await.is_err());
}
