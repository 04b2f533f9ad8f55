//! Label group operations against a mock policy server.

use std::collections::BTreeSet;
use std::time::Duration;

use policy_client::label_groups::{LabelRef, SubGroup, Usage};
use policy_client::{ApiError, Href, LabelGroup};
use serde_json::{json, Value};

mod common;

use common::{start_programmable_backend, test_client, test_config, MockResponse};

const COLLECTION: &str = "/api/v2/orgs/1/sec_policy/draft/label_groups";

fn group_json(id: &str, labels: &[&str], subgroups: &[&str]) -> Value {
    json!({
        "href": format!("/orgs/1/sec_policy/draft/label_groups/{id}"),
        "name": format!("group-{id}"),
        "key": "role",
        "labels": labels.iter().map(|l| json!({"href": format!("/orgs/1/labels/{l}")})).collect::<Vec<_>>(),
        "sub_groups": subgroups
            .iter()
            .map(|s| json!({"href": format!("/orgs/1/sec_policy/draft/label_groups/{s}")}))
            .collect::<Vec<_>>(),
        "usage": {"label_group": true, "rule": false, "ruleset": false}
    })
}

fn lg_href(id: &str) -> Href {
    Href::new(format!("/orgs/1/sec_policy/draft/label_groups/{id}"))
}

fn label_set(ids: &[&str]) -> BTreeSet<Href> {
    ids.iter().map(|l| Href::new(format!("/orgs/1/labels/{l}"))).collect()
}

#[tokio::test]
async fn test_invalid_status_makes_no_request() {
    let backend = start_programmable_backend(|_, _| MockResponse::json(200, json!([]))).await;
    let (client, _) = test_client(test_config(backend.addr));

    let no_filter: &[(&str, &str)] = &[];
    let err = client.get_label_groups(no_filter, "staging").await.unwrap_err();

    assert!(matches!(err, ApiError::InvalidStatus(ref s) if s == "staging"), "{err:?}");
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn test_fetch_builds_table_and_expands_cycles() {
    let backend = start_programmable_backend(|req, _| match req.path() {
        "/api/v2/orgs/1/sec_policy/active/label_groups" => MockResponse::json(
            200,
            json!([
                group_json("a", &["1", "2"], &["b"]),
                group_json("b", &["3", "2"], &["a", "missing"]),
                group_json("c", &["4"], &[]),
            ]),
        ),
        _ => MockResponse::new(404, ""),
    })
    .await;
    let (client, _) = test_client(test_config(backend.addr));

    let filters = [("max_results", "1000")];
    let (table, response) = client.get_label_groups(&filters, "ACTIVE").await.unwrap();

    assert!(response.is_success());
    assert_eq!(table.len(), 3);
    assert_eq!(backend.requests()[0].target, "/api/v2/orgs/1/sec_policy/active/label_groups?max_results=1000");

    assert_eq!(client.expand_label_group(&lg_href("a")), label_set(&["1", "2", "3"]));
    assert_eq!(client.expand_label_group(&lg_href("c")), label_set(&["4"]));
    assert!(client.expand_label_group(&lg_href("zzz")).is_empty());
    assert_eq!(client.label_group_table().get_by_name("group-b").unwrap().href, Some(lg_href("b")));
}

#[tokio::test]
async fn test_fetch_replaces_table_wholesale() {
    let backend = start_programmable_backend(|_, idx| {
        if idx == 0 {
            MockResponse::json(200, json!([group_json("a", &["1"], &[]), group_json("b", &["2"], &[])]))
        } else {
            MockResponse::json(200, json!([group_json("c", &["3"], &[])]))
        }
    })
    .await;
    let (client, _) = test_client(test_config(backend.addr));
    let no_filter: &[(&str, &str)] = &[];

    let (first, _) = client.get_label_groups(no_filter, "draft").await.unwrap();
    let (second, _) = client.get_label_groups(no_filter, "draft").await.unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 1);
    assert!(client.label_group_table().get(&lg_href("a")).is_none());
    assert!(client.expand_label_group(&lg_href("a")).is_empty());
    assert_eq!(client.expand_label_group(&lg_href("c")), label_set(&["3"]));
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_table() {
    let backend = start_programmable_backend(|_, idx| {
        if idx == 0 {
            MockResponse::json(200, json!([group_json("a", &["1"], &[])]))
        } else {
            MockResponse::new(500, "internal error")
        }
    })
    .await;
    let (client, _) = test_client(test_config(backend.addr));
    let no_filter: &[(&str, &str)] = &[];

    client.get_label_groups(no_filter, "draft").await.unwrap();
    let err = client.get_label_groups(no_filter, "draft").await.unwrap_err();

    assert_eq!(err.response().unwrap().body, "internal error");
    assert_eq!(client.label_group_table().len(), 1);
}

#[tokio::test]
async fn test_page_ceiling_refetches_async() {
    let backend = start_programmable_backend(|req, _| {
        let is_async = req.header("prefer") == Some("respond-async");
        match (req.path(), is_async) {
            (COLLECTION, false) => {
                let page: Vec<Value> = (0..500).map(|i| group_json(&format!("p{i}"), &[], &[])).collect();
                MockResponse::json(200, Value::Array(page))
            }
            (COLLECTION, true) => MockResponse::new(202, "")
                .header("Location", "/orgs/1/jobs/lg")
                .header("Retry-After", "5"),
            ("/api/v2/orgs/1/jobs/lg", _) => MockResponse::json(
                200,
                json!({"href": "/orgs/1/jobs/lg", "status": "done", "result": {"href": "/orgs/1/datafiles/lg"}}),
            ),
            ("/api/v2/orgs/1/datafiles/lg", _) => {
                let all: Vec<Value> = (0..501).map(|i| group_json(&format!("g{i}"), &["1"], &[])).collect();
                MockResponse::json(200, Value::Array(all))
            }
            _ => MockResponse::new(404, ""),
        }
    })
    .await;
    let (client, sleeper) = test_client(test_config(backend.addr));

    let no_filter: &[(&str, &str)] = &[];
    let (table, response) = client.get_label_groups(no_filter, "draft").await.unwrap();

    assert_eq!(table.len(), 501);
    assert!(table.get(&lg_href("p0")).is_none());
    assert_eq!(response.url.path(), "/api/v2/orgs/1/datafiles/lg");
    assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(5)]);
    assert_eq!(backend.request_count(), 4);
}

#[tokio::test]
async fn test_small_collection_stays_synchronous() {
    let backend = start_programmable_backend(|_, _| {
        let page: Vec<Value> = (0..499).map(|i| group_json(&format!("p{i}"), &[], &[])).collect();
        MockResponse::json(200, Value::Array(page))
    })
    .await;
    let (client, _) = test_client(test_config(backend.addr));

    let no_filter: &[(&str, &str)] = &[];
    let (table, _) = client.get_label_groups(no_filter, "draft").await.unwrap();

    assert_eq!(table.len(), 499);
    assert_eq!(backend.request_count(), 1);
}

#[tokio::test]
async fn test_create_label_group() {
    let backend = start_programmable_backend(|req, _| {
        let mut created: Value = serde_json::from_str(&req.body).unwrap();
        created["href"] = json!("/orgs/1/sec_policy/draft/label_groups/new");
        MockResponse::json(201, created)
    })
    .await;
    let (client, _) = test_client(test_config(backend.addr));

    let new_group = LabelGroup {
        name: "Databases".into(),
        key: Some("role".into()),
        labels: Some(vec![LabelRef::new("/orgs/1/labels/7")]),
        ..Default::default()
    };
    let (created, response) = client.create_label_group(&new_group).await.unwrap();

    assert_eq!(response.status.as_u16(), 201);
    assert_eq!(created.href, Some(lg_href("new")));
    assert_eq!(created.name, "Databases");

    let seen = &backend.requests()[0];
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.path(), COLLECTION);
    assert_eq!(seen.header("content-type"), Some("application/json"));
    let body: Value = serde_json::from_str(&seen.body).unwrap();
    assert_eq!(body["key"], "role");
    assert_eq!(body["labels"][0]["href"], "/orgs/1/labels/7");
}

#[tokio::test]
async fn test_update_strips_server_fields() {
    let backend = start_programmable_backend(|_, _| MockResponse::new(204, "")).await;
    let (client, _) = test_client(test_config(backend.addr));

    let group = LabelGroup {
        href: Some(lg_href("a")),
        name: "Renamed".into(),
        key: Some("role".into()),
        sub_groups: Some(vec![SubGroup::new(lg_href("b"))]),
        usage: Some(Usage {
            label_group: true,
            ..Default::default()
        }),
        ..Default::default()
    };
    let response = client.update_label_group(&group).await.unwrap();
    assert_eq!(response.status.as_u16(), 204);

    let seen = &backend.requests()[0];
    assert_eq!(seen.method, "PUT");
    assert_eq!(seen.path(), "/api/v2/orgs/1/sec_policy/draft/label_groups/a");
    let body: Value = serde_json::from_str(&seen.body).unwrap();
    assert!(body.get("usage").is_none());
    assert!(body.get("key").is_none());
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["sub_groups"][0]["href"], "/orgs/1/sec_policy/draft/label_groups/b");
}

#[tokio::test]
async fn test_update_without_href_makes_no_request() {
    let backend = start_programmable_backend(|_, _| MockResponse::new(204, "")).await;
    let (client, _) = test_client(test_config(backend.addr));

    let err = client
        .update_label_group(&LabelGroup {
            name: "nameless".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::MissingHref));
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn test_get_single_label_group() {
    let backend = start_programmable_backend(|_, _| MockResponse::json(200, group_json("a", &["1"], &["b"]))).await;
    let (client, _) = test_client(test_config(backend.addr));

    let (group, _) = client.get_label_group(&lg_href("a")).await.unwrap();

    assert_eq!(group.name, "group-a");
    assert_eq!(group.subgroup_hrefs().next(), Some(&lg_href("b")));
    assert_eq!(backend.requests()[0].path(), "/api/v2/orgs/1/sec_policy/draft/label_groups/a");
    assert!(client.label_group_table().is_empty());
}

#[tokio::test]
async fn test_undecodable_collection_is_decode_error() {
    let backend = start_programmable_backend(|_, _| MockResponse::new(200, "<html>maintenance</html>")).await;
    let (client, _) = test_client(test_config(backend.addr));

    let no_filter: &[(&str, &str)] = &[];
    let err = client.get_label_groups(no_filter, "draft").await.unwrap_err();

    assert!(matches!(err, ApiError::Decode { .. }), "{err:?}");
    assert!(err.response().unwrap().body.contains("maintenance"));
}
