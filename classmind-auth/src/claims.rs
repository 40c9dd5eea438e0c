use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_with::{formats::PreferMany, serde_as, OneOrMany};

/// Claims carried by a Clerk session token.
///
/// Clerk may issue tokens with several audiences, or none at all,
/// so `aud` accepts a single string, a list, or nothing.
#[serde_as]
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ClerkClaims {
    pub iss: Option<String>,
    pub sub: Option<String>,
    pub email: Option<String>,
    pub sid: Option<String>,
    pub azp: Option<String>,
    #[serde_as(as = "OneOrMany<_, PreferMany>")]
    #[serde(default)]
    pub aud: Vec<String>,
    pub exp: Option<u64>,
    pub nbf: Option<u64>,
    pub iat: Option<u64>,
}

impl Display for ClerkClaims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The caller identity that handlers see once a token has been verified.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
}

impl AuthenticatedUser {
    /// Returns `None` when the token carries no usable subject.
    pub fn from_claims(claims: &ClerkClaims) -> Option<Self> {
        let user_id = claims.sub.as_deref().filter(|sub| !sub.is_empty())?;
        Some(AuthenticatedUser {
            user_id: user_id.to_owned(),
            email: claims.email.clone().unwrap_or_default(),
        })
    }
}
