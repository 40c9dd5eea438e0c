use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

use crate::common::{context::DEFAULT_KID, now_plus, rsa::rsa_key};

#[derive(Clone)]
pub struct JwtBuilder {
    kid: Option<String>,
    encoding_key: EncodingKey,
    iss: Option<String>,
    sub: Option<String>,
    email: Option<String>,
    aud: Option<String>,
    exp: Option<u64>,
}

impl JwtBuilder {
    pub fn new() -> Self {
        JwtBuilder::default()
    }

    pub fn kid<S: Into<String>>(mut self, kid: S) -> Self {
        self.kid = Some(kid.into());
        self
    }

    pub fn encoding_key(mut self, encoding_key: EncodingKey) -> Self {
        self.encoding_key = encoding_key;
        self
    }

    pub fn iss<S: Into<String>>(mut self, iss: S) -> Self {
        self.iss = Some(iss.into());
        self
    }

    pub fn sub<S: Into<String>>(mut self, sub: S) -> Self {
        self.sub = Some(sub.into());
        self
    }

    pub fn no_sub(mut self) -> Self {
        self.sub = None;
        self
    }

    pub fn email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn aud<S: Into<String>>(mut self, aud: S) -> Self {
        self.aud = Some(aud.into());
        self
    }

    pub fn exp(mut self, exp: u64) -> Self {
        self.exp = Some(exp);
        self
    }

    pub fn build(&self) -> String {
        let mut header = Header::new(jsonwebtoken::Algorithm::RS256);
        header.kid = self.kid.clone();

        let mut claims = json!({});
        if let Some(ref iss) = self.iss {
            claims["iss"] = json!(iss);
        }
        if let Some(ref sub) = self.sub {
            claims["sub"] = json!(sub);
        }
        if let Some(ref email) = self.email {
            claims["email"] = json!(email);
        }
        if let Some(ref aud) = self.aud {
            claims["aud"] = json!(aud);
        }
        if let Some(exp) = self.exp {
            claims["exp"] = json!(exp);
        }

        encode(&header, &claims, &self.encoding_key).unwrap()
    }
}

impl Default for JwtBuilder {
    fn default() -> Self {
        Self {
            kid: Some(DEFAULT_KID.to_owned()),
            encoding_key: rsa_key().encoding_key(),
            iss: None,
            sub: Some("user_2abc".to_owned()),
            email: None,
            aud: None,
            exp: Some(now_plus(60)),
        }
    }
}
