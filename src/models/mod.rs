// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod profile;
pub mod signup;
pub mod task;

pub use profile::{Profile, ProfileChanges};
pub use signup::SignupEvent;
pub use task::Task;
