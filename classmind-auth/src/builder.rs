use std::{sync::Arc, time::Duration};

use jsonwebtoken::jwk::JwkSet;
use log::info;
use url::Url;

use crate::{
    authenticator::Authenticator,
    error::StartupError,
    jwks::{DecodingKeysProvider, JwksCache, DEFAULT_JWKS_CACHE_TTL, DEFAULT_MIN_REFRESH_INTERVAL},
    jwt_extract::{BearerTokenJwtExtractor, JwtExtractor},
    jwt_validate::OnlyJwtValidator,
    validation::ClaimsValidationSpec,
};

pub struct AuthenticatorBuilder {
    jwks_url: Option<String>,
    static_jwks: Option<JwkSet>,
    issuer: Option<String>,
    audiences: Option<Vec<String>>,
    jwks_cache_ttl: Duration,
    min_refresh_interval: Duration,
    http_client: Option<reqwest::Client>,
    jwt_extractor: Option<Arc<dyn JwtExtractor + Send + Sync>>,
}

impl Authenticator {
    pub fn builder() -> AuthenticatorBuilder {
        AuthenticatorBuilder::new()
    }
}

impl AuthenticatorBuilder {
    fn new() -> Self {
        AuthenticatorBuilder {
            jwks_url: None,
            static_jwks: None,
            issuer: None,
            audiences: None,
            jwks_cache_ttl: DEFAULT_JWKS_CACHE_TTL,
            min_refresh_interval: DEFAULT_MIN_REFRESH_INTERVAL,
            http_client: None,
            jwt_extractor: None,
        }
    }

    /// Set the URL the JWK set is fetched from,
    /// e.g. `https://<instance>.clerk.accounts.dev/.well-known/jwks.json`.
    ///
    /// Nothing is fetched until the first token has to be verified.
    pub fn jwks_url(mut self, jwks_url: impl Into<String>) -> Self {
        self.jwks_url = Some(jwks_url.into());
        self
    }

    /// Verify against a fixed JWK set instead of fetching one.
    pub fn static_jwks(mut self, jwks: JwkSet) -> Self {
        self.static_jwks = Some(jwks);
        self
    }

    /// Set the expected `iss` claim. Not validated when unset.
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Set the accepted audiences.
    ///
    /// Clerk tokens are issued for several audiences, so `aud`
    /// is not validated unless this is called.
    pub fn audiences(mut self, audiences: &[impl ToString]) -> Self {
        self.audiences = Some(audiences.iter().map(|aud| aud.to_string()).collect());
        self
    }

    /// How long a fetched JWK set is trusted before it is fetched again.
    ///
    /// Default value is 12 hours.
    pub fn jwks_cache_ttl(mut self, ttl: Duration) -> Self {
        self.jwks_cache_ttl = ttl;
        self
    }

    /// Lower bound between two fetches triggered by an unknown `kid`
    /// or a failing JWKS endpoint.
    ///
    /// Default value is `Duration::from_secs(60)`.
    pub fn min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn jwt_extractor(mut self, jwt_extractor: Arc<dyn JwtExtractor + Send + Sync>) -> Self {
        self.jwt_extractor = Some(jwt_extractor);
        self
    }

    /// Construct an Authenticator.
    ///
    /// Only validates the configuration; the identity provider
    /// does not have to be reachable at this point.
    pub fn build(self) -> Result<Authenticator, StartupError> {
        let keys_provider: Arc<dyn DecodingKeysProvider> = match (self.static_jwks, self.jwks_url)
        {
            (Some(jwks), _) => Arc::new(JwksCache::from_static(&jwks)),
            (None, Some(jwks_url)) => {
                let jwks_url = Url::parse(&jwks_url).map_err(|_| {
                    StartupError::InvalidParameter("Invalid jwks_url format".to_owned())
                })?;
                info!("JWKS client initialized with URL: {}", jwks_url);
                Arc::new(JwksCache::new(
                    self.http_client.unwrap_or_default(),
                    jwks_url,
                    self.jwks_cache_ttl,
                    self.min_refresh_interval,
                ))
            }
            (None, None) => {
                return Err(StartupError::InvalidParameter(
                    "jwks_url is required".to_owned(),
                ))
            }
        };

        let mut claims_validation = ClaimsValidationSpec::clerk(self.issuer.as_deref());
        if let Some(audiences) = &self.audiences {
            claims_validation = claims_validation.aud(audiences);
        }
        info!("Tokens will be validated with: {}", claims_validation);

        Ok(Authenticator::new(
            self.jwt_extractor
                .unwrap_or_else(|| Arc::new(BearerTokenJwtExtractor)),
            Arc::new(OnlyJwtValidator::new(keys_provider, claims_validation)),
        ))
    }
}

impl Default for AuthenticatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
