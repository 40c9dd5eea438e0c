use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use jsonwebtoken::{
    jwk::{Jwk, JwkSet, KeyAlgorithm, PublicKeyUse},
    Algorithm, DecodingKey,
};
use log::{debug, info, warn};
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use url::Url;

use crate::error::{AuthError, JwkError};

pub const DEFAULT_JWKS_CACHE_TTL: Duration = Duration::from_secs(12 * 60 * 60);
pub const DEFAULT_MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// A public key from the JWK set together with the algorithm it signs with.
#[derive(Clone)]
pub struct VerificationKey {
    pub algorithm: Algorithm,
    pub decoding_key: DecodingKey,
}

#[async_trait]
pub trait DecodingKeysProvider: Send + Sync {
    async fn get_decoding_key(&self, key_id: &str) -> Result<VerificationKey, AuthError>;
}

enum JwksSource {
    Remote { client: reqwest::Client, url: Url },
    Static,
}

/// JWK set with unparsed entries. Each key is parsed on its own and
/// unsupported ones are skipped.
#[derive(Deserialize)]
struct RawJwkSet {
    keys: Vec<serde_json::Value>,
}

struct CachedJwks {
    keys: HashMap<String, VerificationKey>,
    fetched_at: Instant,
}

/// Lazily fetched, time-bounded cache of the identity provider's JWK set.
///
/// The set is fetched on first use and kept for `ttl`. A key id that is
/// not in the cached set triggers an early refetch, at most once per
/// `min_refresh_interval`, so rotated keys are picked up. When a refetch
/// fails the previously fetched set keeps being served.
pub struct JwksCache {
    source: JwksSource,
    ttl: Duration,
    min_refresh_interval: Duration,
    state: RwLock<Option<CachedJwks>>,
    last_attempt: Mutex<Option<Instant>>,
}

impl JwksCache {
    pub fn new(
        client: reqwest::Client,
        url: Url,
        ttl: Duration,
        min_refresh_interval: Duration,
    ) -> Self {
        Self {
            source: JwksSource::Remote { client, url },
            ttl,
            min_refresh_interval,
            state: RwLock::new(None),
            last_attempt: Mutex::new(None),
        }
    }

    /// A cache that never fetches and always serves `jwks`.
    pub fn from_static(jwks: &JwkSet) -> Self {
        Self {
            source: JwksSource::Static,
            ttl: Duration::MAX,
            min_refresh_interval: Duration::MAX,
            state: RwLock::new(Some(CachedJwks {
                keys: index_keys(jwks.keys.iter().cloned()),
                fetched_at: Instant::now(),
            })),
            last_attempt: Mutex::new(None),
        }
    }

    fn is_expired(&self, cached: &CachedJwks) -> bool {
        match self.source {
            JwksSource::Static => false,
            JwksSource::Remote { .. } => cached.fetched_at.elapsed() >= self.ttl,
        }
    }

    async fn lookup(&self, key_id: &str) -> Option<VerificationKey> {
        let state = self.state.read().await;
        let cached = state.as_ref()?;
        if self.is_expired(cached) {
            return None;
        }
        cached.keys.get(key_id).cloned()
    }

    async fn refresh(&self, key_id: &str) -> Result<(), AuthError> {
        let JwksSource::Remote { client, url } = &self.source else {
            return Ok(());
        };

        // Held for the whole fetch so concurrent callers share one request.
        let mut last_attempt = self.last_attempt.lock().await;
        if let Some(cached) = self.state.read().await.as_ref() {
            if !self.is_expired(cached) && cached.keys.contains_key(key_id) {
                return Ok(());
            }
            let recently_attempted =
                (*last_attempt).is_some_and(|at| at.elapsed() < self.min_refresh_interval);
            if recently_attempted {
                debug!("Skipping JWK set refresh, last attempt was too recent");
                return Ok(());
            }
        }
        *last_attempt = Some(Instant::now());

        info!("Fetching JWKS from {}", url);
        match fetch_jwks(client, url).await {
            Ok(jwks) => {
                let keys = parse_jwks(jwks);
                info!("JWKS fetched and cached successfully ({} keys)", keys.len());
                *self.state.write().await = Some(CachedJwks {
                    keys,
                    fetched_at: Instant::now(),
                });
                Ok(())
            }
            Err(e) => {
                if self.state.read().await.is_some() {
                    warn!("Failed to refresh JWK set, serving cached keys: {}", e);
                    Ok(())
                } else {
                    warn!("Failed to fetch JWK set: {}", e);
                    Err(AuthError::JwksUnavailable(e))
                }
            }
        }
    }

    /// Serves a possibly expired key; only reached after a failed refresh.
    async fn lookup_any(&self, key_id: &str) -> Option<VerificationKey> {
        let state = self.state.read().await;
        state.as_ref()?.keys.get(key_id).cloned()
    }
}

#[async_trait]
impl DecodingKeysProvider for JwksCache {
    async fn get_decoding_key(&self, key_id: &str) -> Result<VerificationKey, AuthError> {
        if let Some(key) = self.lookup(key_id).await {
            return Ok(key);
        }
        self.refresh(key_id).await?;
        self.lookup_any(key_id)
            .await
            .ok_or_else(|| AuthError::InvalidKeyId(key_id.to_owned()))
    }
}

async fn fetch_jwks(client: &reqwest::Client, jwks_url: &Url) -> Result<RawJwkSet, JwkError> {
    let response = client
        .get(jwks_url.clone())
        .timeout(FETCH_TIMEOUT)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| JwkError::FetchFailed(e.to_string()))?;
    response
        .json::<RawJwkSet>()
        .await
        .map_err(|e| JwkError::ParseFailed(e.to_string()))
}

fn parse_jwks(jwks: RawJwkSet) -> HashMap<String, VerificationKey> {
    let jwks = jwks
        .keys
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Jwk>(value) {
            Ok(jwk) => Some(jwk),
            Err(e) => {
                warn!("Skipping unsupported JWK: {}", e);
                None
            }
        });
    index_keys(jwks)
}

fn index_keys(jwks: impl IntoIterator<Item = Jwk>) -> HashMap<String, VerificationKey> {
    jwks.into_iter()
        .filter_map(|jwk| match parse_jwk(&jwk) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping JWK: {}", e);
                None
            }
        })
        .collect()
}

fn parse_jwk(jwk: &Jwk) -> Result<Option<(String, VerificationKey)>, JwkError> {
    if jwk.common.public_key_use == Some(PublicKeyUse::Encryption) {
        return Ok(None);
    }
    let key_id = jwk.common.key_id.as_ref().ok_or(JwkError::MissingKeyId)?;
    let algorithm = match jwk.common.key_algorithm {
        None => Algorithm::RS256,
        Some(key_alg) => match parse_key_alg(key_alg) {
            Some(alg) => alg,
            None => {
                debug!("Ignoring JWK '{}' with algorithm {:?}", key_id, key_alg);
                return Ok(None);
            }
        },
    };
    let decoding_key = DecodingKey::from_jwk(jwk).map_err(|_| JwkError::DecodingFailed)?;
    Ok(Some((
        key_id.clone(),
        VerificationKey {
            algorithm,
            decoding_key,
        },
    )))
}

// Symmetric algorithms are left out, JWKS keys are public keys.
fn parse_key_alg(key_alg: KeyAlgorithm) -> Option<Algorithm> {
    match key_alg {
        KeyAlgorithm::ES256 => Some(Algorithm::ES256),
        KeyAlgorithm::ES384 => Some(Algorithm::ES384),
        KeyAlgorithm::RS256 => Some(Algorithm::RS256),
        KeyAlgorithm::RS384 => Some(Algorithm::RS384),
        KeyAlgorithm::RS512 => Some(Algorithm::RS512),
        KeyAlgorithm::PS256 => Some(Algorithm::PS256),
        KeyAlgorithm::PS384 => Some(Algorithm::PS384),
        KeyAlgorithm::PS512 => Some(Algorithm::PS512),
        KeyAlgorithm::EdDSA => Some(Algorithm::EdDSA),
        _ => None,
    }
}
