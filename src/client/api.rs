// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the profile and task APIs.

use crate::models::Task;
use reqwest::{header, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client-side failures, rendered to the user as a flat string.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Not signed in")]
    NotSignedIn,

    /// Non-success response; `body` is the raw response text.
    #[error("{status}: {body}")]
    Http { status: u16, body: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Profile as the client sees it. Every field is optional because the server
/// answers `{}` for a user without a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileSnapshot {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdated {
    pub message: String,
    pub profile: ProfileSnapshot,
}

#[derive(Debug, Deserialize)]
pub struct TaskChanged {
    pub message: String,
    #[serde(default)]
    pub task: Option<Task>,
}

/// Partial profile fields sent on create/update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Typed client. Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attach the identity token sent with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn sign_out(&mut self) {
        self.token = None;
    }

    pub async fn get_profile(&self) -> Result<ProfileSnapshot, ClientError> {
        self.send(Method::GET, "/profile", None, true).await
    }

    pub async fn create_profile(&self, input: &ProfileInput) -> Result<MessageBody, ClientError> {
        self.send(Method::POST, "/profile", Some(json!(input)), true)
            .await
    }

    pub async fn update_profile(&self, input: &ProfileInput) -> Result<ProfileUpdated, ClientError> {
        self.send(Method::PUT, "/profile", Some(json!(input)), true)
            .await
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        self.send(Method::GET, "/task", None, false).await
    }

    pub async fn create_task(&self, name: &str, completed: bool) -> Result<MessageBody, ClientError> {
        let body = json!({ "name": name, "completed": completed });
        self.send(Method::POST, "/task", Some(body), false).await
    }

    pub async fn update_task(&self, task: &Task) -> Result<TaskChanged, ClientError> {
        self.send(Method::PATCH, "/task", Some(json!(task)), false)
            .await
    }

    pub async fn delete_task(&self, id: &str) -> Result<TaskChanged, ClientError> {
        self.send(Method::DELETE, "/task", Some(json!({ "id": id })), false)
            .await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        requires_auth: bool,
    ) -> Result<T, ClientError> {
        if requires_auth && self.token.is_none() {
            return Err(ClientError::NotSignedIn);
        }

        let mut request = self
            .http
            .request(method.clone(), format!("{}{}", self.base_url, path))
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = &self.token {
            // Raw token, no scheme.
            request = request.header(header::AUTHORIZATION, token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%method, path, status = status.as_u16(), "API request failed");
            return Err(ClientError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}
