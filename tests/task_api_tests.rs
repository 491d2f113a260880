// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Task API tests.

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{create_test_app, json_request, send};

#[tokio::test]
async fn test_create_then_list_round_trip() {
    let (app, _, _) = create_test_app();

    let (status, headers, body) = send(
        &app,
        json_request(
            "POST",
            "/task",
            None,
            Some(json!({ "name": "buy milk", "completed": false })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task created successfully");
    let request_id = headers
        .get("x-request-id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();

    let (status, _, body) = send(&app, json_request("GET", "/task", None, None)).await;
    assert_eq!(status, StatusCode::OK);

    let tasks = body.as_array().unwrap();
    let matching: Vec<_> = tasks.iter().filter(|t| t["name"] == "buy milk").collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0]["completed"], false);
    // The id is the invocation id of the creating request.
    assert_eq!(matching[0]["id"], request_id.as_str());
}

#[tokio::test]
async fn test_create_defaults_completed_to_false() {
    let (app, _, _) = create_test_app();

    let (status, _, _) = send(
        &app,
        json_request("POST", "/task", None, Some(json!({ "name": "walk dog" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, _, body) = send(&app, json_request("GET", "/task", None, None)).await;
    assert_eq!(body[0]["completed"], false);
}

#[tokio::test]
async fn test_each_create_gets_a_distinct_id() {
    let (app, _, _) = create_test_app();

    for _ in 0..3 {
        let (status, _, _) = send(
            &app,
            json_request("POST", "/task", None, Some(json!({ "name": "same name" }))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, _, body) = send(&app, json_request("GET", "/task", None, None)).await;
    let mut ids: Vec<String> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn test_create_requires_name() {
    let (app, _, _) = create_test_app();

    let (status, _, _) = send(
        &app,
        json_request("POST", "/task", None, Some(json!({ "completed": true }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(
        &app,
        json_request("POST", "/task", None, Some(json!({ "name": "   " }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, _, body) = send(&app, json_request("GET", "/task", None, None)).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_update_sets_supplied_fields() {
    let (app, _, _) = create_test_app();
    send(
        &app,
        json_request("POST", "/task", None, Some(json!({ "name": "draft" }))),
    )
    .await;
    let (_, _, list) = send(&app, json_request("GET", "/task", None, None)).await;
    let id = list[0]["id"].as_str().unwrap().to_string();

    let (status, _, body) = send(
        &app,
        json_request(
            "PATCH",
            "/task",
            None,
            Some(json!({ "id": id, "name": "final", "completed": true })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task updated successfully");
    assert_eq!(body["task"], json!({ "id": id, "name": "final", "completed": true }));
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let (app, _, _) = create_test_app();

    let (status, _, _) = send(
        &app,
        json_request(
            "PATCH",
            "/task",
            None,
            Some(json!({ "id": "missing", "name": "x", "completed": false })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, _, body) = send(&app, json_request("GET", "/task", None, None)).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_delete_returns_prior_values() {
    let (app, _, _) = create_test_app();
    send(
        &app,
        json_request(
            "POST",
            "/task",
            None,
            Some(json!({ "name": "done soon", "completed": true })),
        ),
    )
    .await;
    let (_, _, list) = send(&app, json_request("GET", "/task", None, None)).await;
    let id = list[0]["id"].as_str().unwrap().to_string();

    let (status, _, body) = send(
        &app,
        json_request("DELETE", "/task", None, Some(json!({ "id": id }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task deleted successfully");
    assert_eq!(body["task"]["name"], "done soon");
    assert_eq!(body["task"]["completed"], true);

    let (_, _, list) = send(&app, json_request("GET", "/task", None, None)).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_delete_nonexistent_is_success_without_task() {
    let (app, _, _) = create_test_app();

    let (status, _, body) = send(
        &app,
        json_request("DELETE", "/task", None, Some(json!({ "id": "never-existed" }))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task deleted successfully");
    assert!(body.get("task").is_none());
}

#[tokio::test]
async fn test_task_preflight_and_cors() {
    let (app, _, _) = create_test_app();

    let (status, headers, _) = send(&app, json_request("OPTIONS", "/task", None, None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(
        headers.get("access-control-allow-methods").unwrap(),
        "OPTIONS,GET,POST,PATCH,DELETE"
    );

    let (status, headers, body) = send(&app, json_request("PUT", "/task", None, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid request type");
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
}
