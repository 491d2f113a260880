// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-request invocation ids.
//!
//! Each request gets a fresh server-generated id. An `x-request-id` sent by
//! the client is ignored, so ids derived from it cannot be chosen by callers.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Instrument;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Unique id of the current invocation, available as a request extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationId(pub String);

impl InvocationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub async fn assign_invocation_id(mut req: Request, next: Next) -> Response {
    let id = uuid::Uuid::new_v4().to_string();
    req.extensions_mut().insert(InvocationId(id.clone()));

    let span = tracing::info_span!("invocation", request_id = %id);
    let mut response = next.run(req).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
