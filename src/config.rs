// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Every setting is resolved once at startup. Collection names follow a
//! fixed lookup order so the same binary works with both explicitly named
//! collections and provisioned storage bindings:
//!
//! 1. `PROFILES_COLLECTION`, then `STORAGE_PROFILES_NAME` (required)
//! 2. `TASKS_COLLECTION`, then `STORAGE_TASKS_NAME`, then `"tasks"`

use crate::db::collections;
use std::env;

/// Which store implementation backs the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Firestore,
    Memory,
}

/// How identity tokens are verified.
#[derive(Debug, Clone)]
pub enum IdentityConfig {
    /// RS256 ID tokens checked against the issuer's published key set.
    Jwks { issuer: String, audience: String },
    /// HS256 tokens signed with a shared secret (local development).
    SharedSecret { secret: Vec<u8> },
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// GCP project ID
    pub gcp_project_id: String,
    pub store_backend: StoreBackend,
    /// Collection holding profile records (keyed by user id)
    pub profiles_collection: String,
    /// Collection holding task records (keyed by task id)
    pub tasks_collection: String,
    pub identity: IdentityConfig,
    /// Path segment the identity provider must present to reach the signup hook
    pub hook_path_secret: String,
}

impl Config {
    /// Config for tests: in-memory store and shared-secret tokens.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            gcp_project_id: "test-project".to_string(),
            store_backend: StoreBackend::Memory,
            profiles_collection: "profiles-test".to_string(),
            tasks_collection: collections::TASKS.to_string(),
            identity: IdentityConfig::SharedSecret {
                secret: b"test_id_token_secret_32_bytes!!!".to_vec(),
            },
            hook_path_secret: "test-hook-secret".to_string(),
        }
    }

    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let profiles_collection = first_env(&["PROFILES_COLLECTION", "STORAGE_PROFILES_NAME"])
            .ok_or(ConfigError::Missing("PROFILES_COLLECTION"))?;

        let tasks_collection = first_env(&["TASKS_COLLECTION", "STORAGE_TASKS_NAME"])
            .unwrap_or_else(|| collections::TASKS.to_string());

        let store_backend = match env::var("STORE_BACKEND").as_deref() {
            Ok("memory") => StoreBackend::Memory,
            Ok("firestore") | Err(_) => StoreBackend::Firestore,
            Ok(other) => return Err(ConfigError::Invalid("STORE_BACKEND", other.to_string())),
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            store_backend,
            profiles_collection,
            tasks_collection,
            identity: identity_from_env()?,
            hook_path_secret: env::var("HOOK_PATH_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("HOOK_PATH_SECRET"))?,
        })
    }
}

fn identity_from_env() -> Result<IdentityConfig, ConfigError> {
    if let Some(issuer) = first_env(&["ID_TOKEN_ISSUER"]) {
        let audience =
            first_env(&["ID_TOKEN_AUDIENCE"]).ok_or(ConfigError::Missing("ID_TOKEN_AUDIENCE"))?;
        return Ok(IdentityConfig::Jwks {
            issuer: issuer.trim_end_matches('/').to_string(),
            audience,
        });
    }

    first_env(&["ID_TOKEN_SECRET"])
        .map(|secret| IdentityConfig::SharedSecret {
            secret: secret.into_bytes(),
        })
        .ok_or(ConfigError::Missing("ID_TOKEN_ISSUER"))
}

/// First non-empty value among `keys`, in order.
fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| env::var(key).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test touches the process environment so the cases cannot race.
    #[test]
    fn test_config_from_env_lookup_order() {
        env::set_var("HOOK_PATH_SECRET", "hook");
        env::set_var("ID_TOKEN_SECRET", "secret");
        env::remove_var("ID_TOKEN_ISSUER");
        env::remove_var("PROFILES_COLLECTION");
        env::remove_var("STORAGE_PROFILES_NAME");
        env::remove_var("TASKS_COLLECTION");
        env::remove_var("STORAGE_TASKS_NAME");
        env::remove_var("STORE_BACKEND");

        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Missing("PROFILES_COLLECTION"))
        ));

        env::set_var("STORAGE_PROFILES_NAME", "profiles-dev");
        let config = Config::from_env().expect("Config should load");
        assert_eq!(config.profiles_collection, "profiles-dev");
        assert_eq!(config.tasks_collection, "tasks");
        assert_eq!(config.store_backend, StoreBackend::Firestore);
        assert!(matches!(config.identity, IdentityConfig::SharedSecret { .. }));

        env::set_var("PROFILES_COLLECTION", "profiles-explicit");
        env::set_var("STORAGE_TASKS_NAME", "tasks-dev");
        env::set_var("STORE_BACKEND", "memory");
        let config = Config::from_env().expect("Config should load");
        assert_eq!(config.profiles_collection, "profiles-explicit");
        assert_eq!(config.tasks_collection, "tasks-dev");
        assert_eq!(config.store_backend, StoreBackend::Memory);

        env::set_var("ID_TOKEN_ISSUER", "https://issuer.example.com/pool/");
        env::remove_var("ID_TOKEN_AUDIENCE");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Missing("ID_TOKEN_AUDIENCE"))
        ));

        env::set_var("ID_TOKEN_AUDIENCE", "client-123");
        let config = Config::from_env().expect("Config should load");
        match config.identity {
            IdentityConfig::Jwks { issuer, audience } => {
                assert_eq!(issuer, "https://issuer.example.com/pool");
                assert_eq!(audience, "client-123");
            }
            other => panic!("expected JWKS identity config, got {other:?}"),
        }

        env::set_var("STORE_BACKEND", "dynamo");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("STORE_BACKEND", _))
        ));

        for key in [
            "HOOK_PATH_SECRET",
            "ID_TOKEN_SECRET",
            "ID_TOKEN_ISSUER",
            "ID_TOKEN_AUDIENCE",
            "PROFILES_COLLECTION",
            "STORAGE_PROFILES_NAME",
            "STORAGE_TASKS_NAME",
            "STORE_BACKEND",
        ] {
            env::remove_var(key);
        }
    }
}
