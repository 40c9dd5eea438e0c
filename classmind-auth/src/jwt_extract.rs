use http::HeaderMap;

use crate::{error::AuthError, jwt_unverified::UnverifiedJwt};

pub trait JwtExtractor {
    fn extract_jwt(&self, headers: &HeaderMap) -> Result<UnverifiedJwt, AuthError>;
}

pub struct BearerTokenJwtExtractor;

impl JwtExtractor for BearerTokenJwtExtractor {
    fn extract_jwt(&self, headers: &HeaderMap) -> Result<UnverifiedJwt, AuthError> {
        let (scheme, token) = headers
            .get(http::header::AUTHORIZATION)
            .ok_or(AuthError::MissingAuthorizationHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthorizationHeader)?
            .split_once(' ')
            .ok_or(AuthError::InvalidAuthorizationHeader)?;
        // Auth schemes are case-insensitive.
        let token = token.trim();
        if !scheme.eq_ignore_ascii_case("Bearer") || token.is_empty() {
            return Err(AuthError::InvalidAuthorizationHeader);
        }
        Ok(UnverifiedJwt::new(token))
    }
}
