use core::fmt;
use std::sync::Arc;

use http::HeaderMap;
use log::{debug, info, warn};

use crate::{
    claims::{AuthenticatedUser, ClerkClaims},
    error::AuthError,
    error_handler::{DefaultErrorHandler, ErrorHandler},
    jwt_extract::JwtExtractor,
    jwt_validate::JwtValidator,
    layer::{AuthLayer, AuthMode},
};

/// Authenticator
///
/// Turns the bearer token of a request into an [AuthenticatedUser].
/// Cheap to clone; all clones share one JWKS cache.
#[derive(Clone)]
pub struct Authenticator {
    jwt_extractor: Arc<dyn JwtExtractor + Send + Sync>,
    jwt_validator: Arc<dyn JwtValidator<ClerkClaims>>,
}

impl Authenticator {
    pub(crate) fn new(
        jwt_extractor: Arc<dyn JwtExtractor + Send + Sync>,
        jwt_validator: Arc<dyn JwtValidator<ClerkClaims>>,
    ) -> Self {
        Self {
            jwt_extractor,
            jwt_validator,
        }
    }

    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthenticatedUser, AuthError> {
        let token = match self.jwt_extractor.extract_jwt(headers) {
            Ok(token) => token,
            Err(e) => {
                debug!("JWT extraction failed: {}", e);
                return Err(e);
            }
        };
        let result = self
            .jwt_validator
            .validate(&token)
            .await
            .and_then(|claims| {
                AuthenticatedUser::from_claims(&claims).ok_or(AuthError::MissingSubject)
            });
        match result {
            Ok(user) => {
                info!("User authenticated: {}", user.user_id);
                Ok(user)
            }
            Err(e) => {
                warn!(
                    "Authentication failed (unverified sub: {}): {}",
                    token
                        .unverified_subject()
                        .unwrap_or_else(|| "<none>".to_owned()),
                    e
                );
                Err(e)
            }
        }
    }

    /// Returns a [tower layer](https://docs.rs/tower/latest/tower/trait.Layer.html)
    /// that rejects requests without a valid token.
    pub fn required_layer<ResBody>(&self) -> AuthLayer<ResBody>
    where
        ResBody: From<String>,
    {
        AuthLayer::new(self.clone(), Arc::new(DefaultErrorHandler), AuthMode::Required)
    }

    /// Same as [required_layer](Authenticator::required_layer), with a custom [ErrorHandler].
    pub fn required_layer_with_error_handler<ResBody>(
        &self,
        error_handler: Arc<dyn ErrorHandler<ResBody>>,
    ) -> AuthLayer<ResBody> {
        AuthLayer::new(self.clone(), error_handler, AuthMode::Required)
    }

    /// Returns a layer that attaches the user when the token is valid
    /// and lets every request through.
    pub fn optional_layer<ResBody>(&self) -> AuthLayer<ResBody>
    where
        ResBody: From<String>,
    {
        AuthLayer::new(self.clone(), Arc::new(DefaultErrorHandler), AuthMode::Optional)
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator").finish()
    }
}
