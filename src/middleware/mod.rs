// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (authentication, CORS, invocation ids).

pub mod auth;
pub mod cors;
pub mod request_id;

pub use auth::{require_auth, AuthUser};
pub use request_id::InvocationId;
