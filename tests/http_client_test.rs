mod common;

use std::time::Duration;

use common::mock_backend::{MockBackend, MockResponse};
use common::{group_row, user_rows};
use rbac_console::remote::{
    FetchOutcome, ListRequest, NewGroup, UserPatch, lookup_group,
};
use rbac_console::{FilterSet, FilterValue, HttpRbacApi, RbacApi};
use serde_json::json;

const OPS_UUID: &str = "8c4b8e62-2f1e-4a8e-9d0b-6a1f5d9b2c10";

fn client(backend: &MockBackend) -> HttpRbacApi {
    HttpRbacApi::new(
        &backend.base_url(),
        Some("secret-token".to_string()),
        Duration::from_secs(5),
    )
    .unwrap()
}

// ============================================================================
// List fetches
// ============================================================================

#[tokio::test]
async fn test_fetch_users_sends_window_sort_and_filters() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::page(user_rows(20..40), 45, 20, 20))
        .await;
    let api = client(&backend);

    let filters = FilterSet::new()
        .with("status", FilterValue::multi(["Active", "Inactive"]))
        .with("username", FilterValue::text("user"));
    let request = ListRequest::new(20, 20)
        .with_filters(filters)
        .with_order_by("-username");
    let page = api.fetch_users(&request).await.unwrap();

    assert_eq!(page.items.len(), 20);
    assert_eq!(page.items[0].username, "user20");
    assert_eq!(page.meta.count, 45);

    let requests = backend.captured_requests().await;
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.method, "GET");
    assert_eq!(req.path, "/api/rbac/v1/principals/");
    assert_eq!(req.query_param("limit").as_deref(), Some("20"));
    assert_eq!(req.query_param("offset").as_deref(), Some("20"));
    assert_eq!(req.query_param("order_by").as_deref(), Some("-username"));
    assert_eq!(req.query_param("status").as_deref(), Some("Active,Inactive"));
    assert_eq!(req.query_param("username").as_deref(), Some("user"));
    assert_eq!(req.header("authorization"), Some("Bearer secret-token"));
}

#[tokio::test]
async fn test_fetch_groups_matches_names_partially() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::page(
            json!([group_row(OPS_UUID, "ops", false)]),
            1,
            20,
            0,
        ))
        .await;
    let api = client(&backend);

    let request =
        ListRequest::new(20, 0).with_filters(FilterSet::new().with("name", FilterValue::text("op")));
    let page = api.fetch_groups(&request).await.unwrap();
    assert_eq!(page.items[0].name, "ops");

    let req = &backend.captured_requests().await[0];
    assert_eq!(req.path, "/api/rbac/v1/groups/");
    assert_eq!(req.query_param("name").as_deref(), Some("op"));
    assert_eq!(req.query_param("name_match").as_deref(), Some("partial"));
}

#[tokio::test]
async fn test_fetch_roles_without_meta_counts_items() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::json(json!({
            "data": [
                { "uuid": "r1", "name": "viewer" },
                { "uuid": "r2", "name": "editor" },
            ],
        })))
        .await;
    let api = client(&backend);

    let page = api
        .fetch_roles_for_group(OPS_UUID, false, &ListRequest::new(20, 0))
        .await
        .unwrap();
    assert_eq!(page.meta.count, 2);
    assert_eq!(page.meta.limit, 20);

    let req = &backend.captured_requests().await[0];
    assert_eq!(req.path, format!("/api/rbac/v1/groups/{OPS_UUID}/roles/"));
    assert_eq!(req.query_param("exclude").as_deref(), Some("false"));
}

#[tokio::test]
async fn test_default_group_lookup_asks_for_one_row() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::page(
            json!([group_row(OPS_UUID, "Default access", true)]),
            1,
            1,
            0,
        ))
        .await;
    let api = client(&backend);

    let group = api.fetch_system_group(Some("Default")).await.unwrap();
    assert!(group.unwrap().platform_default);

    let req = &backend.captured_requests().await[0];
    assert_eq!(req.query_param("limit").as_deref(), Some("1"));
    assert_eq!(req.query_param("platform_default").as_deref(), Some("true"));
    assert_eq!(req.query_param("name").as_deref(), Some("Default"));
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_error_body_is_parsed() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::error(
            400,
            "name",
            "A group with this name already exists.",
        ))
        .await;
    let api = client(&backend);

    let err = api.add_group(&NewGroup::new("ops")).await.unwrap_err();
    assert_eq!(err.status, Some(400));
    assert!(err.is_name_conflict());
    assert!(!err.is_bad_identifier());
    assert!(err.to_string().contains("already exists"));
}

#[tokio::test]
async fn test_bad_identifier_is_downgraded_by_lookup() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::error(
            400,
            "group uuid validation",
            "not a valid uuid",
        ))
        .await;
    let api = client(&backend);

    let outcome = lookup_group(&api, OPS_UUID).await.unwrap();
    assert_eq!(outcome, FetchOutcome::BadIdentifier);
}

#[tokio::test]
async fn test_malformed_uuid_never_reaches_the_backend() {
    let backend = MockBackend::start().await;
    let api = client(&backend);

    let outcome = lookup_group(&api, "not-a-uuid").await.unwrap();
    assert_eq!(outcome, FetchOutcome::BadIdentifier);
    assert!(backend.captured_requests().await.is_empty());
}

#[tokio::test]
async fn test_server_error_is_not_downgraded() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::error(500, "server", "boom"))
        .await;
    let api = client(&backend);

    let err = lookup_group(&api, OPS_UUID).await.unwrap_err();
    assert_eq!(err.status, Some(500));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::page(user_rows(0..1), 1, 20, 0).with_delay(1000))
        .await;
    let api = HttpRbacApi::new(&backend.base_url(), None, Duration::from_millis(100)).unwrap();

    let err = api
        .fetch_users(&ListRequest::new(20, 0))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("timed out"), "{err}");
}

// ============================================================================
// Mutations
// ============================================================================

#[tokio::test]
async fn test_update_users_patches_principals() {
    let backend = MockBackend::start().await;
    backend.enqueue_response(MockResponse::no_content()).await;
    let api = client(&backend);

    let patch = UserPatch {
        id: Some(7),
        username: "jdoe".to_string(),
        ..Default::default()
    }
    .active(false);
    api.update_users(&[patch]).await.unwrap();

    let req = &backend.captured_requests().await[0];
    assert_eq!(req.method, "PATCH");
    assert_eq!(req.path, "/api/rbac/v1/principals/");
    let body = req.json_body();
    assert_eq!(body["users"][0]["username"], "jdoe");
    assert_eq!(body["users"][0]["is_active"], false);
}

#[tokio::test]
async fn test_add_group_attaches_members_and_roles() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::json(group_row(OPS_UUID, "ops", false)))
        .await;
    backend.enqueue_response(MockResponse::no_content()).await;
    backend.enqueue_response(MockResponse::no_content()).await;
    let api = client(&backend);

    let group = NewGroup {
        name: "ops".to_string(),
        description: Some("Operations".to_string()),
        user_list: vec!["jdoe".to_string(), "asmith".to_string()],
        roles_list: vec!["r1".to_string()],
    };
    let created = api.add_group(&group).await.unwrap();
    assert_eq!(created.uuid, OPS_UUID);

    let requests = backend.captured_requests().await;
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].json_body()["description"], "Operations");
    assert_eq!(
        requests[1].path,
        format!("/api/rbac/v1/groups/{OPS_UUID}/principals/")
    );
    assert_eq!(
        requests[1].json_body()["principals"][1]["username"],
        "asmith"
    );
    assert_eq!(requests[2].json_body()["roles"], json!(["r1"]));
}

#[tokio::test]
async fn test_remove_members_and_roles_use_query_lists() {
    let backend = MockBackend::start().await;
    backend.enqueue_response(MockResponse::no_content()).await;
    backend.enqueue_response(MockResponse::no_content()).await;
    let api = client(&backend);

    api.remove_members_from_group(OPS_UUID, &["jdoe".to_string(), "asmith".to_string()])
        .await
        .unwrap();
    api.remove_roles_from_group(OPS_UUID, &["r1".to_string()])
        .await
        .unwrap();

    let requests = backend.captured_requests().await;
    assert_eq!(requests[0].method, "DELETE");
    assert_eq!(
        requests[0].query_param("usernames").as_deref(),
        Some("jdoe,asmith")
    );
    assert_eq!(requests[1].query_param("roles").as_deref(), Some("r1"));
}

#[tokio::test]
async fn test_remove_groups_deletes_each() {
    let backend = MockBackend::start().await;
    let other = "0f9e3c6a-1b2d-4c5e-8f70-9a1b2c3d4e5f";
    backend
        .respond_to(OPS_UUID, MockResponse::no_content())
        .await;
    backend.respond_to(other, MockResponse::no_content()).await;
    let api = client(&backend);

    api.remove_groups(&[OPS_UUID.to_string(), other.to_string()])
        .await
        .unwrap();

    let mut paths: Vec<_> = backend
        .captured_requests()
        .await
        .into_iter()
        .map(|r| (r.method, r.path))
        .collect();
    paths.sort();
    assert_eq!(
        paths,
        vec![
            (
                "DELETE".to_string(),
                format!("/api/rbac/v1/groups/{other}/")
            ),
            (
                "DELETE".to_string(),
                format!("/api/rbac/v1/groups/{OPS_UUID}/")
            ),
        ]
    );
}
