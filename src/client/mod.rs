// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client library for the single-page app: a typed HTTP client and the
//! view-models that keep local drafts in step with server state.

pub mod api;
pub mod view;

pub use api::{ApiClient, ClientError, ProfileInput, ProfileSnapshot};
pub use view::{ProfileDraft, ProfileView, TaskBoard};
