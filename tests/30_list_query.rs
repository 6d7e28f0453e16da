mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{ADMIN, MANAGER};

fn ids(page: &Value) -> Vec<i64> {
    page["items"]
        .as_array()
        .map(|items| items.iter().filter_map(|i| i["id"].as_i64()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn search_key_matches_related_object_title_case_insensitively() -> Result<()> {
    let server = common::spawn_app().await?;

    let res = server
        .search("/api/reservations/search", MANAGER, &[("searchKey", "Фрунзе"), ("page", "1"), ("rowsPerPage", "10")])
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let page: Value = res.json().await?;

    assert_eq!(page["total"], 3);
    assert_eq!(page["page"], 1);
    assert_eq!(page["rowsPerPage"], 10);
    for item in page["items"].as_array().into_iter().flatten() {
        let title = item["object_title"].as_str().unwrap_or_default().to_lowercase();
        assert!(title.contains("фрунзе"), "{title}");
    }
    // Default order is newest first; a guest named like the key does not match
    assert_eq!(ids(&page), vec![5, 3, 1]);
    Ok(())
}

#[tokio::test]
async fn malformed_sorting_falls_back_to_default_order() -> Result<()> {
    let server = common::spawn_app().await?;

    let res = server
        .search("/api/reservations/search", MANAGER, &[("sorting", "not-json-or-array")])
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let page: Value = res.json().await?;
    assert_eq!(ids(&page), vec![8, 7, 6, 5, 4, 3, 2, 1]);
    Ok(())
}

#[tokio::test]
async fn structured_and_encoded_sorting_agree() -> Result<()> {
    let server = common::spawn_app().await?;

    let structured: Value = server
        .search("/api/reservations/search", MANAGER, &[("sorting[date_from]", "asc")])
        .await?
        .json()
        .await?;
    let encoded: Value = server
        .search("/api/reservations/search", MANAGER, &[("sorting", r#"{"date_from":"asc"}"#)])
        .await?
        .json()
        .await?;

    assert_eq!(ids(&structured), vec![4, 1, 2, 6, 3, 5, 7, 8]);
    assert_eq!(structured, encoded);
    Ok(())
}

#[tokio::test]
async fn default_order_breaks_ties() -> Result<()> {
    let server = common::spawn_app().await?;

    let page: Value = server
        .search("/api/reservations/search", MANAGER, &[("sorting[object_title]", "asc")])
        .await?
        .json()
        .await?;
    // Equal titles fall back to id desc
    assert_eq!(ids(&page), vec![8, 6, 2, 3, 1, 5, 7, 4]);
    Ok(())
}

#[tokio::test]
async fn unknown_sort_column_is_ignored_or_rejected_per_listing() -> Result<()> {
    let server = common::spawn_app().await?;

    let res = server
        .search("/api/reservations/search", MANAGER, &[("sorting[password]", "asc")])
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server.search("/api/users/search", ADMIN, &[("sorting[password]", "asc")]).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({ "sorting": ["Sorting by 'password' is not supported."] }));
    Ok(())
}

#[tokio::test]
async fn malformed_typed_filter_is_a_field_error() -> Result<()> {
    let server = common::spawn_app().await?;

    let res = server.search("/api/users/search", ADMIN, &[("role_id", "abc")]).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({ "role_id": ["The role id field must be an integer."] }));

    let res = server.search("/api/reservations/search", MANAGER, &[("date_from", "July")]).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert!(body["date_from"].is_array());
    Ok(())
}

#[tokio::test]
async fn typed_filters_constrain_results() -> Result<()> {
    let server = common::spawn_app().await?;

    let page: Value = server.search("/api/users/search", ADMIN, &[("role_id", "1")]).await?.json().await?;
    assert_eq!(page["total"], 2);

    // Empty value imposes nothing
    let page: Value = server.search("/api/users/search", ADMIN, &[("role_id", "")]).await?.json().await?;
    assert_eq!(page["total"], 25);

    let page: Value = server
        .search(
            "/api/reservations/search",
            MANAGER,
            &[("date_from", "2024-07-01"), ("date_to", "2024-08-31"), ("status", "confirmed")],
        )
        .await?
        .json()
        .await?;
    assert_eq!(ids(&page), vec![3, 2]);

    let page: Value = server
        .search("/api/reservations/search", MANAGER, &[("object_id[]", "10"), ("object_id[]", "13")])
        .await?
        .json()
        .await?;
    assert_eq!(ids(&page), vec![5, 3, 1]);
    Ok(())
}

#[tokio::test]
async fn page_length_follows_total_and_window() -> Result<()> {
    let server = common::spawn_app().await?;

    for (page, rows, expected) in [(1u64, 10u64, 10usize), (3, 10, 5), (4, 10, 0), (2, 25, 0), (1, 25, 25)] {
        let (page_s, rows_s) = (page.to_string(), rows.to_string());
        let body: Value = server
            .search("/api/users/search", ADMIN, &[("page", page_s.as_str()), ("rowsPerPage", rows_s.as_str())])
            .await?
            .json()
            .await?;
        assert_eq!(body["total"], 25);
        assert_eq!(body["items"].as_array().map(Vec::len), Some(expected), "page={page} rows={rows}");
    }
    Ok(())
}

#[tokio::test]
async fn pagination_garbage_falls_back_to_defaults() -> Result<()> {
    let server = common::spawn_app().await?;

    let body: Value = server
        .search("/api/users/search", ADMIN, &[("page", "abc"), ("rowsPerPage", "-5")])
        .await?
        .json()
        .await?;
    assert_eq!(body["page"], 1);
    assert_eq!(body["rowsPerPage"], 20);
    assert_eq!(ids(&body).first(), Some(&1));

    let body: Value = server
        .search("/api/users/search", ADMIN, &[("rowsPerPage", "100000")])
        .await?
        .json()
        .await?;
    let max = sanatorium_api::config::config().list.max_rows_per_page;
    assert_eq!(body["rowsPerPage"], max);
    Ok(())
}

#[tokio::test]
async fn empty_listing_returns_empty_page() -> Result<()> {
    let server = common::spawn_app().await?;

    let body: Value = server.search("/api/faqs/search", MANAGER, &[("page", "1")]).await?.json().await?;
    assert_eq!(body, json!({ "page": 1, "rowsPerPage": 50, "total": 0, "items": [] }));
    Ok(())
}

#[tokio::test]
async fn repeated_query_is_idempotent() -> Result<()> {
    let server = common::spawn_app().await?;
    let query = [("searchKey", "рус"), ("sorting[date_to]", "desc"), ("rowsPerPage", "1"), ("page", "2")];

    let first: Value = server.search("/api/reservations/search", MANAGER, &query).await?.json().await?;
    let second: Value = server.search("/api/reservations/search", MANAGER, &query).await?.json().await?;
    assert_eq!(first, second);
    assert_eq!(first["total"], 3);
    assert_eq!(ids(&first), vec![6]);
    Ok(())
}

#[tokio::test]
async fn search_key_wildcards_match_literally() -> Result<()> {
    let server = common::spawn_app().await?;

    let body: Value = server.search("/api/reservations/search", MANAGER, &[("searchKey", "%")]).await?.json().await?;
    assert_eq!(body["total"], 0);

    let body: Value = server.search("/api/reservations/search", MANAGER, &[("searchKey", "   ")]).await?.json().await?;
    assert_eq!(body["total"], 8);
    Ok(())
}

#[tokio::test]
async fn roles_render_full_permission_map() -> Result<()> {
    let server = common::spawn_app().await?;

    let body: Value = server.search("/api/roles/search", ADMIN, &[("searchKey", "pat")]).await?.json().await?;
    assert_eq!(body["total"], 1);
    let permissions = &body["items"][0]["permissions"];
    assert_eq!(permissions.as_object().map(|m| m.len()), Some(13));
    assert_eq!(permissions["object_read"], true);
    assert_eq!(permissions["user_write"], false);

    // Legacy slugs on stored roles are dropped
    let body: Value = server.get("/api/roles/1", Some(ADMIN)).await?.json().await?;
    assert!(body["permissions"].get("legacy_export").is_none());
    assert_eq!(body["permissions"]["role_write"], true);
    Ok(())
}
