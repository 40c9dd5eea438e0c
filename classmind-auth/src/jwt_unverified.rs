use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

/// A bearer token as it arrived, before any signature check.
#[derive(Debug, Clone, PartialEq)]
pub struct UnverifiedJwt {
    token: String,
}

impl UnverifiedJwt {
    pub fn new(raw_token: impl Into<String>) -> Self {
        UnverifiedJwt {
            token: raw_token.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Unverified claims, only meant for logging a rejected token's subject.
    pub fn unverified_subject(&self) -> Option<String> {
        let claims_b64 = self.token.split('.').nth(1)?;
        let claims_bytes = URL_SAFE_NO_PAD
            .decode(claims_b64.trim_end_matches('='))
            .ok()?;
        let claims: serde_json::Value = serde_json::from_slice(&claims_bytes).ok()?;
        claims.get("sub")?.as_str().map(str::to_owned)
    }
}
