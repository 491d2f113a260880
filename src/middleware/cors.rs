// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Permissive cross-origin headers for the browser client.
//!
//! Every response carries the headers, errors included, and a pre-flight
//! `OPTIONS` request is answered here with 204 before routing or auth.

use axum::{
    extract::Request,
    http::{HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

const ALLOW_HEADERS: &str = "Content-Type,Authorization,X-Requested-With";

/// Methods advertised by the profile routes.
pub const PROFILE_METHODS: &str = "OPTIONS,GET,POST,PUT";
/// Methods advertised by the task routes.
pub const TASK_METHODS: &str = "OPTIONS,GET,POST,PATCH,DELETE";

pub async fn profile_cors(req: Request, next: Next) -> Response {
    apply_cors(PROFILE_METHODS, req, next).await
}

pub async fn task_cors(req: Request, next: Next) -> Response {
    apply_cors(TASK_METHODS, req, next).await
}

async fn apply_cors(methods: &'static str, req: Request, next: Next) -> Response {
    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    let headers = response.headers_mut();
    headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static(methods),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::{routing::get, Router};
    use tower::ServiceExt; // for oneshot

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { "Hello" }))
            .layer(axum::middleware::from_fn(task_cors))
    }

    #[tokio::test]
    async fn test_cors_headers_on_normal_response() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers.get("Access-Control-Allow-Origin").unwrap(), "*");
        assert_eq!(
            headers.get("Access-Control-Allow-Headers").unwrap(),
            ALLOW_HEADERS
        );
        assert_eq!(
            headers.get("Access-Control-Allow-Methods").unwrap(),
            TASK_METHODS
        );
    }

    #[tokio::test]
    async fn test_preflight_is_no_content() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers().get("Access-Control-Allow-Origin").unwrap(),
            "*"
        );
    }
}
