use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header};
use log::debug;
use serde::de::DeserializeOwned;

use crate::{
    error::AuthError, jwks::DecodingKeysProvider, jwt_unverified::UnverifiedJwt,
    validation::ClaimsValidationSpec,
};

#[async_trait]
pub trait JwtValidator<Claims>: Send + Sync {
    async fn validate(&self, jwt: &UnverifiedJwt) -> Result<Claims, AuthError>;
}

/// Verifies the token signature against the key named by its `kid`,
/// then checks the registered claims.
pub struct OnlyJwtValidator {
    decoding_keys_provider: Arc<dyn DecodingKeysProvider>,
    claims_validation: ClaimsValidationSpec,
}

impl OnlyJwtValidator {
    pub fn new(
        decoding_keys_provider: Arc<dyn DecodingKeysProvider>,
        claims_validation: ClaimsValidationSpec,
    ) -> Self {
        Self {
            decoding_keys_provider,
            claims_validation,
        }
    }
}

#[async_trait]
impl<Claims> JwtValidator<Claims> for OnlyJwtValidator
where
    Claims: DeserializeOwned + Send,
{
    async fn validate(&self, token: &UnverifiedJwt) -> Result<Claims, AuthError> {
        let header = decode_header(token.as_str()).or(Err(AuthError::ParseJwtError))?;
        let key_id = header.kid.ok_or(AuthError::MissingKeyId)?;
        let key = self
            .decoding_keys_provider
            .get_decoding_key(&key_id)
            .await?;
        if header.alg != key.algorithm {
            return Err(AuthError::MismatchingAlgorithm(key.algorithm, header.alg));
        }

        let validation = self.claims_validation.to_validation(key.algorithm);
        match decode::<Claims>(token.as_str(), &key.decoding_key, &validation) {
            Ok(result) => {
                debug!("JWT signature verified with key '{}'", key_id);
                Ok(result.claims)
            }
            Err(e) => Err(AuthError::ValidationFailed {
                reason: e.into_kind(),
            }),
        }
    }
}
