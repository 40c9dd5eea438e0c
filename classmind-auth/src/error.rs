use std::{error::Error, fmt::Display};

use jsonwebtoken::{errors::ErrorKind, Algorithm};

#[derive(Clone, Debug, PartialEq)]
pub enum StartupError {
    InvalidParameter(String),
}

impl Display for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartupError::InvalidParameter(reason) => write!(f, "Invalid parameter: {}", reason),
        }
    }
}
impl Error for StartupError {}

#[derive(Clone, Debug, PartialEq)]
pub enum JwkError {
    FetchFailed(String),
    ParseFailed(String),
    MissingKeyId,
    DecodingFailed,
}

impl Display for JwkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwkError::FetchFailed(reason) => write!(f, "failed to fetch JWK set: {}", reason),
            JwkError::ParseFailed(reason) => write!(f, "failed to parse JWK set: {}", reason),
            JwkError::MissingKeyId => write!(f, "JWK is missing 'kid'"),
            JwkError::DecodingFailed => write!(f, "JWK could not be turned into a decoding key"),
        }
    }
}
impl Error for JwkError {}

#[derive(Clone, Debug, PartialEq)]
pub enum AuthError {
    MissingAuthorizationHeader,
    InvalidAuthorizationHeader,
    ParseJwtError,
    MissingKeyId,
    InvalidKeyId(String),
    MismatchingAlgorithm(Algorithm, Algorithm),
    ValidationFailed {
        reason: jsonwebtoken::errors::ErrorKind,
    },
    MissingSubject,
    JwksUnavailable(JwkError),
}

impl AuthError {
    /// True when the request carried no usable bearer credentials at all.
    pub fn is_credentials_error(&self) -> bool {
        matches!(
            self,
            AuthError::MissingAuthorizationHeader | AuthError::InvalidAuthorizationHeader
        )
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthorizationHeader => write!(f, "Not authenticated"),
            AuthError::InvalidAuthorizationHeader => {
                write!(f, "Invalid authorization header, expected a Bearer token")
            }
            AuthError::ParseJwtError => write!(f, "Invalid JWT: malformed token"),
            AuthError::MissingKeyId => write!(f, "Token missing 'kid' in header"),
            AuthError::InvalidKeyId(kid) => write!(f, "No matching JWK found for kid: {}", kid),
            AuthError::MismatchingAlgorithm(expected, actual) => write!(
                f,
                "Invalid JWT: algorithm {:?} does not match key algorithm {:?}",
                actual, expected
            ),
            AuthError::ValidationFailed { reason } => {
                write!(f, "Invalid JWT: {}", describe_validation_failure(reason))
            }
            AuthError::MissingSubject => write!(f, "Token missing 'sub' claim"),
            AuthError::JwksUnavailable(e) => write!(f, "JWT verification error: {}", e),
        }
    }
}
impl Error for AuthError {}

fn describe_validation_failure(kind: &ErrorKind) -> String {
    match kind {
        ErrorKind::ExpiredSignature => "token has expired".to_owned(),
        ErrorKind::ImmatureSignature => "token is not valid yet".to_owned(),
        ErrorKind::InvalidSignature => "signature verification failed".to_owned(),
        ErrorKind::InvalidIssuer => "unexpected issuer".to_owned(),
        ErrorKind::InvalidAudience => "unexpected audience".to_owned(),
        ErrorKind::InvalidAlgorithm => "unexpected signing algorithm".to_owned(),
        ErrorKind::MissingRequiredClaim(claim) => format!("missing required claim '{}'", claim),
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
            "malformed token".to_owned()
        }
        other => format!("{:?}", other),
    }
}
