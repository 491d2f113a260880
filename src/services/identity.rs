// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity token verification for API callers.
//!
//! The identity provider hands the browser an ID token which the client sends
//! verbatim in `Authorization` (no scheme; a `Bearer ` prefix is tolerated).

use crate::config::IdentityConfig;
use anyhow::Context;
use axum::http::HeaderValue;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::header::CACHE_CONTROL;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);
const CLOCK_SKEW_SECS: u64 = 60;

/// Caller identity extracted from a valid ID token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// Subject claim; the profile key.
    pub user_id: String,
    pub email: Option<String>,
}

/// Verification error categories.
#[derive(Debug, Clone, thiserror::Error)]
pub enum IdentityError {
    #[error("missing identity token")]
    Missing,
    /// The token is malformed, expired, or its claims do not match.
    #[error("identity token rejected: {0}")]
    Rejected(String),
    /// The signing keys could not be fetched.
    #[error("identity verification unavailable: {0}")]
    Transient(String),
}

enum VerifierMode {
    Jwks {
        issuer: String,
        audience: String,
        jwks_url: String,
    },
    SharedSecret {
        decoding_key: Arc<DecodingKey>,
    },
}

#[derive(Clone)]
struct JwksCacheEntry {
    keys_by_kid: HashMap<String, Arc<DecodingKey>>,
    expires_at: Instant,
}

/// Verifier for identity-provider ID tokens.
pub struct IdentityVerifier {
    http_client: reqwest::Client,
    mode: VerifierMode,
    jwks_cache: RwLock<Option<JwksCacheEntry>>,
    refresh_lock: Mutex<()>,
}

impl IdentityVerifier {
    /// Build the verifier selected by configuration.
    pub fn from_config(config: &IdentityConfig) -> anyhow::Result<Self> {
        match config {
            IdentityConfig::Jwks { issuer, audience } => {
                let jwks_url = format!("{issuer}/.well-known/jwks.json");
                Self::with_jwks_url(issuer, audience, jwks_url)
            }
            IdentityConfig::SharedSecret { secret } => Self::shared_secret(secret),
        }
    }

    /// Verify RS256 tokens from `issuer` using the key set at `jwks_url`.
    pub fn with_jwks_url(
        issuer: impl Into<String>,
        audience: impl Into<String>,
        jwks_url: impl Into<String>,
    ) -> anyhow::Result<Self> {
        let issuer = issuer.into();
        let jwks_url = jwks_url.into();

        tracing::info!(issuer = %issuer, jwks_url = %jwks_url, "Initialized JWKS identity verifier");

        Self::build(VerifierMode::Jwks {
            issuer,
            audience: audience.into(),
            jwks_url,
        })
    }

    /// Verify HS256 tokens signed with `secret`.
    pub fn shared_secret(secret: &[u8]) -> anyhow::Result<Self> {
        if secret.is_empty() {
            anyhow::bail!("identity token secret must not be empty");
        }

        tracing::info!("Initialized shared-secret identity verifier");

        Self::build(VerifierMode::SharedSecret {
            decoding_key: Arc::new(DecodingKey::from_secret(secret)),
        })
    }

    fn build(mode: VerifierMode) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .context("failed building identity HTTP client")?;

        Ok(Self {
            http_client,
            mode,
            jwks_cache: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        })
    }

    /// Verify the token carried in an Authorization header.
    pub async fn verify(
        &self,
        auth_header: Option<&HeaderValue>,
    ) -> Result<VerifiedIdentity, IdentityError> {
        let token = extract_token(auth_header)?;

        let claims = match &self.mode {
            VerifierMode::SharedSecret { decoding_key } => {
                let mut validation = Validation::new(Algorithm::HS256);
                validation.set_required_spec_claims(&["exp", "sub"]);
                validation.validate_aud = false;
                validation.leeway = CLOCK_SKEW_SECS;

                decode::<IdTokenClaims>(token, decoding_key, &validation)
                    .map_err(|e| IdentityError::Rejected(format!("JWT validation failed: {e}")))?
                    .claims
            }
            VerifierMode::Jwks {
                issuer, audience, ..
            } => {
                let header = decode_header(token)
                    .map_err(|e| IdentityError::Rejected(format!("invalid JWT header: {e}")))?;

                if header.alg != Algorithm::RS256 {
                    return Err(IdentityError::Rejected(format!(
                        "unexpected JWT alg: {:?}",
                        header.alg
                    )));
                }

                let kid = header
                    .kid
                    .ok_or_else(|| IdentityError::Rejected("missing JWT kid".to_string()))?;
                let decoding_key = self.decoding_key_for_kid(&kid).await?;

                let mut validation = Validation::new(Algorithm::RS256);
                validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
                validation.set_issuer(&[issuer.as_str()]);
                validation.set_audience(&[audience.as_str()]);
                validation.leeway = CLOCK_SKEW_SECS;

                let claims = decode::<IdTokenClaims>(token, decoding_key.as_ref(), &validation)
                    .map_err(|e| IdentityError::Rejected(format!("JWT validation failed: {e}")))?
                    .claims;

                if claims.token_use.as_deref() != Some("id") {
                    return Err(IdentityError::Rejected(format!(
                        "unexpected token_use: {:?}",
                        claims.token_use
                    )));
                }

                claims
            }
        };

        if claims.sub.trim().is_empty() {
            return Err(IdentityError::Rejected("empty sub claim".to_string()));
        }

        Ok(VerifiedIdentity {
            user_id: claims.sub,
            email: claims.email,
        })
    }

    async fn decoding_key_for_kid(&self, kid: &str) -> Result<Arc<DecodingKey>, IdentityError> {
        if let Some(key) = self.lookup_cached_key(kid).await {
            return Ok(key);
        }

        for force_refresh in [false, true] {
            self.refresh_jwks(force_refresh).await?;
            if let Some(key) = self.lookup_cached_key(kid).await {
                return Ok(key);
            }
        }

        Err(IdentityError::Rejected(format!(
            "JWT kid not found in JWKS after refresh: {kid}"
        )))
    }

    async fn lookup_cached_key(&self, kid: &str) -> Option<Arc<DecodingKey>> {
        let cache = self.jwks_cache.read().await;
        let now = Instant::now();
        cache
            .as_ref()
            .filter(|entry| entry.expires_at > now)
            .and_then(|entry| entry.keys_by_kid.get(kid))
            .cloned()
    }

    async fn refresh_jwks(&self, force_refresh: bool) -> Result<(), IdentityError> {
        let VerifierMode::Jwks { jwks_url, .. } = &self.mode else {
            return Ok(());
        };

        let _guard = self.refresh_lock.lock().await;

        if !force_refresh {
            let cache = self.jwks_cache.read().await;
            if cache
                .as_ref()
                .is_some_and(|entry| entry.expires_at > Instant::now())
            {
                return Ok(());
            }
        }

        tracing::debug!(jwks_url = %jwks_url, "Refreshing JWKS cache");

        let response = self
            .http_client
            .get(jwks_url)
            .send()
            .await
            .map_err(|e| IdentityError::Transient(format!("JWKS request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(IdentityError::Transient(format!(
                "JWKS request returned status {}",
                response.status()
            )));
        }

        let ttl = cache_ttl_from_headers(response.headers(), DEFAULT_CACHE_TTL);

        let jwks: Jwks = response
            .json()
            .await
            .map_err(|e| IdentityError::Transient(format!("invalid JWKS JSON: {e}")))?;

        let keys_by_kid = usable_keys(jwks);

        if keys_by_kid.is_empty() {
            return Err(IdentityError::Transient(
                "JWKS response did not include any usable RSA keys".to_string(),
            ));
        }

        *self.jwks_cache.write().await = Some(JwksCacheEntry {
            keys_by_kid,
            expires_at: Instant::now() + ttl,
        });

        tracing::debug!(ttl_secs = ttl.as_secs(), "JWKS cache refreshed");
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct Jwks {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct Jwk {
    kid: String,
    kty: String,
    alg: Option<String>,
    n: String,
    e: String,
    #[serde(rename = "use")]
    use_: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    email: Option<String>,
    token_use: Option<String>,
}

/// RS256 signing keys from a key set, indexed by kid.
fn usable_keys(jwks: Jwks) -> HashMap<String, Arc<DecodingKey>> {
    let mut keys_by_kid = HashMap::new();

    for jwk in jwks.keys {
        if jwk.kty != "RSA" || jwk.kid.trim().is_empty() {
            continue;
        }
        if jwk.alg.as_deref().is_some_and(|alg| alg != "RS256") {
            continue;
        }
        if jwk.use_.as_deref().is_some_and(|use_| use_ != "sig") {
            continue;
        }

        match DecodingKey::from_rsa_components(&jwk.n, &jwk.e) {
            Ok(key) => {
                keys_by_kid.insert(jwk.kid, Arc::new(key));
            }
            Err(e) => {
                tracing::warn!(error = %e, kid = %jwk.kid, "Skipping invalid RSA JWKS key");
            }
        }
    }

    keys_by_kid
}

fn extract_token(auth_header: Option<&HeaderValue>) -> Result<&str, IdentityError> {
    let value = auth_header
        .ok_or(IdentityError::Missing)?
        .to_str()
        .map_err(|_| IdentityError::Rejected("invalid Authorization header".to_string()))?
        .trim();

    // A bare "Bearer" scheme with nothing after it carries no token.
    let token = match value.strip_prefix("Bearer") {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
        _ => value,
    };

    if token.is_empty() {
        return Err(IdentityError::Missing);
    }

    Ok(token)
}

fn cache_ttl_from_headers(headers: &reqwest::header::HeaderMap, fallback: Duration) -> Duration {
    headers
        .get(CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_cache_control_max_age)
        .map(Duration::from_secs)
        .unwrap_or(fallback)
}

fn parse_cache_control_max_age(value: &str) -> Option<u64> {
    value
        .split(',')
        .filter_map(|directive| directive.trim().strip_prefix("max-age="))
        .find_map(|raw| raw.trim_matches('"').parse::<u64>().ok())
}
