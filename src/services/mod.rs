// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod identity;
pub mod profiles;
pub mod signup;
pub mod tasks;

pub use identity::{IdentityError, IdentityVerifier, VerifiedIdentity};
pub use profiles::{ProfileFields, ProfileService};
pub use signup::{SeedOutcome, SignupSeeder};
pub use tasks::TaskService;
