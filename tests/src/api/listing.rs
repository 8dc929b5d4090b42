use crate::actions::*;
use crate::data;
use crate::fixtures::server::IsolatedServer;
use crate::fixtures::*;
use debileweb_common::api::ListSources;
use rstest::rstest;

fn page(n: i64) -> ListSources {
    ListSources {
        page: Some(n),
        ..Default::default()
    }
}

#[rstest]
#[tokio::test]
pub async fn forty_sources_paginate_in_fifteens(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_farm_with_sources(&client, 40).await;

    let first = client.list_sources(&page(0)).await.unwrap();
    assert_eq!(first.total, 40);
    assert_eq!(first.sources.len(), 15);
    assert!(!first.has_prev);
    assert!(first.has_next);

    let last = client.list_sources(&page(2)).await.unwrap();
    assert_eq!(last.total, 40);
    assert_eq!(last.sources.len(), 10);
    assert!(last.has_prev);
    assert!(!last.has_next);
}

#[rstest]
#[tokio::test]
pub async fn page_past_the_end_is_empty_but_valid(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_farm_with_sources(&client, 5).await;

    let list = client.list_sources(&page(3)).await.unwrap();
    assert_eq!(list.total, 5);
    assert!(list.sources.is_empty());
    assert!(list.has_prev);
    assert!(!list.has_next);
}

#[rstest]
#[tokio::test]
pub async fn negative_page_is_rejected(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_farm_with_sources(&client, 5).await;

    let result = client.list_sources(&page(-1)).await;
    assert!(result.is_err());
}

#[rstest]
#[tokio::test]
pub async fn recent_listing_returns_newest_first(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_farm_with_sources(&client, 3).await;

    let list = client.list_sources(&page(0)).await.unwrap();
    let names = list
        .sources
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>();

    assert_eq!(names, vec!["pkg-02", "pkg-01", "pkg-00"]);
}

#[rstest]
#[tokio::test]
pub async fn prefix_l_matches_lua_but_not_libfoo(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_sample_farm(&client).await;

    let list = client
        .list_sources(&ListSources {
            prefix: Some("l".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let names = list
        .sources
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>();

    // name ascending, lib* excluded
    assert_eq!(names, vec!["lighttpd", "lua5.4"]);
}

#[rstest]
#[tokio::test]
pub async fn prefix_lib_matches_the_lib_namespace(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_sample_farm(&client).await;

    let list = client
        .list_sources(&ListSources {
            prefix: Some("lib".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(list.total, 1);
    assert_eq!(list.sources[0].name, "libfoo");
}

#[rstest]
#[tokio::test]
pub async fn unknown_filter_key_falls_back_to_prefix_match(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_sample_farm(&client).await;

    let list = client
        .list_sources(&ListSources {
            filter: Some("lua".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(list.total, 1);
    assert_eq!(list.sources[0].name, "lua5.4");
}

#[rstest]
#[tokio::test]
pub async fn unfinished_filter_excludes_fully_built_sources(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    client
        .import(&data::import_of(vec![
            data::source(
                "done",
                "1.0-1",
                1,
                vec![data::finished_job("build", data::DUMMY_BUILDER, false)],
            ),
            data::source("fresh", "1.0-1", 1, vec![data::pending_job("build")]),
        ]))
        .await
        .unwrap();

    let list = client
        .list_sources(&ListSources {
            filter: Some("unfinished".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(list.total, 1);
    assert_eq!(list.sources[0].name, "fresh");
}

#[rstest]
#[tokio::test]
pub async fn failed_filter_matches_sources_with_failed_jobs(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    client
        .import(&data::import_of(vec![
            data::source(
                "broken",
                "1.0-1",
                1,
                vec![data::finished_job("build", data::DUMMY_BUILDER, true)],
            ),
            data::source("fine", "1.0-1", 1, vec![data::pending_job("build")]),
        ]))
        .await
        .unwrap();

    let list = client
        .list_sources(&ListSources {
            filter: Some("failed".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(list.total, 1);
    assert_eq!(list.sources[0].name, "broken");
}

#[rstest]
#[tokio::test]
pub async fn queued_filter_matches_sources_waiting_for_a_builder(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    client
        .import(&data::import_of(vec![
            data::source(
                "assigned",
                "1.0-1",
                1,
                vec![data::running_job("build", data::DUMMY_BUILDER)],
            ),
            data::source("waiting", "1.0-1", 1, vec![data::pending_job("build")]),
        ]))
        .await
        .unwrap();

    let list = client
        .list_sources(&ListSources {
            filter: Some("queued".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(list.total, 1);
    assert_eq!(list.sources[0].name, "waiting");
}

#[rstest]
#[tokio::test]
pub async fn unbuilt_filter_matches_sources_without_binaries(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_sample_farm(&client).await;

    let list = client
        .list_sources(&ListSources {
            filter: Some("unbuilt".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let names = list
        .sources
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>();

    // lighttpd shipped a binary, the other two didn't
    assert_eq!(list.total, 2);
    assert!(!names.contains(&"lighttpd"));
}

#[rstest]
#[tokio::test]
pub async fn group_listing_returns_oldest_first(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_farm_with_sources(&client, 3).await;

    let list = client
        .list_sources(&ListSources {
            group: Some(data::DUMMY_GROUP.to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let names = list
        .sources
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>();

    assert_eq!(names, vec!["pkg-00", "pkg-01", "pkg-02"]);
}

#[rstest]
#[tokio::test]
pub async fn maintainer_filter_matches_uploader_substring(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_sample_farm(&client).await;

    let list = client
        .list_sources(&ListSources {
            maintainer: Some("paultag".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(list.total, 3);

    let list = client
        .list_sources(&ListSources {
            maintainer: Some("nobody-here".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(list.total, 0);
}

#[rstest]
#[tokio::test]
pub async fn listing_decorates_sources_with_job_status(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_sample_farm(&client).await;

    let list = client
        .list_sources(&ListSources {
            name: Some("lighttpd".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let source = &list.sources[0];
    assert_eq!(source.total_jobs, 3);
    assert_eq!(source.unfinished_jobs, 2);
    assert_eq!(source.group, data::DUMMY_GROUP);
    assert_eq!(source.uploader, "paultag");
    assert_eq!(source.path, "/source/default/lighttpd/1.4.76-1/1");
}

#[rstest]
#[tokio::test]
pub async fn source_autocomplete_is_capped_and_distinct(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_farm_with_sources(&client, 15).await;

    let names = client.search_sources("pkg-").await.unwrap();
    assert_eq!(names.len(), 10);

    let names = client.search_sources("pkg-03").await.unwrap();
    assert_eq!(names, vec!["pkg-03".to_string()]);
}

#[rstest]
#[tokio::test]
pub async fn maintainer_autocomplete_returns_display_strings(isolated_server: IsolatedServer) {
    let client = isolated_server.client;

    import_sample_farm(&client).await;

    let maintainers = client.search_maintainers("paultag").await.unwrap();
    assert_eq!(
        maintainers,
        vec!["paultag of debile <paultag@example.com>".to_string()]
    );
}
