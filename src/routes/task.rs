// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Task routes over the shared task list.

use crate::error::Result;
use crate::middleware::InvocationId;
use crate::models::Task;
use crate::routes::{invalid_request_type, validated, MessageResponse};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Task routes (public).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/task",
        get(list_tasks)
            .post(create_task)
            .patch(update_task)
            .delete(delete_task)
            .fallback(invalid_request_type),
    )
}

#[derive(Debug, Deserialize, Validate)]
struct CreateTaskBody {
    #[validate(length(min = 1, max = 1024))]
    name: String,
    completed: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
struct UpdateTaskBody {
    #[validate(length(min = 1))]
    id: String,
    #[validate(length(min = 1, max = 1024))]
    name: String,
    completed: bool,
}

#[derive(Debug, Deserialize, Validate)]
struct DeleteTaskBody {
    #[validate(length(min = 1))]
    id: String,
}

/// Response for task mutations that return a record.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TaskResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<Task>,
}

async fn list_tasks(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Task>>> {
    Ok(Json(state.tasks.list().await?))
}

async fn create_task(
    State(state): State<Arc<AppState>>,
    Extension(invocation): Extension<InvocationId>,
    body: std::result::Result<Json<CreateTaskBody>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let body = validated(body)?;
    state
        .tasks
        .create(invocation.as_str(), &body.name, body.completed)
        .await?;
    Ok(MessageResponse::new("Task created successfully"))
}

async fn update_task(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<UpdateTaskBody>, JsonRejection>,
) -> Result<Json<TaskResponse>> {
    let body = validated(body)?;
    let task = state
        .tasks
        .update(Task {
            id: body.id,
            name: body.name,
            completed: body.completed,
        })
        .await?;

    Ok(Json(TaskResponse {
        message: "Task updated successfully".to_string(),
        task: Some(task),
    }))
}

async fn delete_task(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<DeleteTaskBody>, JsonRejection>,
) -> Result<Json<TaskResponse>> {
    let body = validated(body)?;
    let task = state.tasks.delete(&body.id).await?;
    Ok(Json(TaskResponse {
        message: "Task deleted successfully".to_string(),
        task,
    }))
}
