// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Links editor API tests.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt; // for oneshot

mod common;
use common::{body_json, create_test_app, create_test_app_offline_db, get, json_post, VALID_EMAIL, VALID_TOKEN};

#[tokio::test]
async fn test_platform_catalog() {
    let app = create_test_app();

    let response = app
        .router
        .oneshot(get("/dashboard/platforms", Some(VALID_TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "GitHub",
            "Facebook",
            "Twitter",
            "Codewars",
            "StackOverflow",
            "Instagram",
            "YouTube",
            "GitLab",
            "Dev"
        ]
    );
    assert_eq!(body[0]["icon"], "mdi:github");
}

#[tokio::test]
async fn test_save_valid_links() {
    let app = create_test_app();

    let response = app
        .router
        .oneshot(json_post(
            "/dashboard/links",
            json!({"links": [
                {"platform": "GitHub", "url": "https://github.com/ada"},
                {"platform": "YouTube", "url": "https://www.youtube.com/@ada"}
            ]}),
            Some(VALID_TOKEN),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Links saved successfully!");
    assert!(body["id"].is_string());
    assert_eq!(body["links"], json!([]));

    let lists = app.state.db.list_link_lists().await.unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].links.len(), 2);
    assert_eq!(lists[0].links[1].platform, "YouTube");
    assert_eq!(lists[0].owner.as_deref(), Some(VALID_EMAIL));
    assert!(!lists[0].created_at.is_empty());
}

#[tokio::test]
async fn test_url_not_matching_platform_is_rejected() {
    let app = create_test_app();

    let response = app
        .router
        .oneshot(json_post(
            "/dashboard/links",
            json!({"links": [{"platform": "GitHub", "url": "https://example.com"}]}),
            Some(VALID_TOKEN),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["links"][0]["error"], "Please check URL");
    assert_eq!(body["links"][0]["url"], "https://example.com");

    assert!(app.state.db.list_link_lists().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_blank_platform_is_rejected() {
    let app = create_test_app();

    let response = app
        .router
        .oneshot(json_post(
            "/dashboard/links",
            json!({"links": [
                {"platform": "GitHub", "url": "https://github.com/ada"},
                {"platform": "", "url": "https://github.com/ada"}
            ]}),
            Some(VALID_TOKEN),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["links"][0].get("error").is_none());
    assert_eq!(body["links"][1]["error"], "Can't be blank");

    // One bad row blocks the whole list
    assert!(app.state.db.list_link_lists().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_each_save_appends_a_document() {
    let app = create_test_app();

    for url in ["https://github.com/one", "https://github.com/two"] {
        let response = app
            .router
            .clone()
            .oneshot(json_post(
                "/dashboard/links",
                json!({"links": [{"platform": "GitHub", "url": url}]}),
                Some(VALID_TOKEN),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let lists = app.state.db.list_link_lists().await.unwrap();
    assert_eq!(lists.len(), 2);
}

#[tokio::test]
async fn test_store_failure_returns_generic_message() {
    let app = create_test_app_offline_db();

    let response = app
        .router
        .oneshot(json_post(
            "/dashboard/links",
            json!({"links": [{"platform": "GitHub", "url": "https://github.com/ada"}]}),
            Some(VALID_TOKEN),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Error saving links. Please try again.");
    assert_eq!(body["links"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_links_require_session() {
    let app = create_test_app();

    let response = app
        .router
        .oneshot(json_post(
            "/dashboard/links",
            json!({"links": [{"platform": "GitHub", "url": "https://github.com/ada"}]}),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(app.state.db.list_link_lists().await.unwrap().is_empty());
}
