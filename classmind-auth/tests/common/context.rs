use std::time::Duration;

use classmind_auth::authenticator::Authenticator;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::common::{jwks, jwt::JwtBuilder, rsa::rsa_key};

pub const DEFAULT_ISSUER: &str = "https://clerk.classmind.test";
pub const DEFAULT_KID: &str = "default-kid";

pub struct TestContext {
    mock_server: MockServer,
    issuer: Option<String>,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_issuer(None).await
    }

    pub async fn with_issuer(issuer: Option<&str>) -> Self {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(jwks(&[(DEFAULT_KID, &rsa_key())])),
            )
            .mount(&mock_server)
            .await;
        Self {
            mock_server,
            issuer: issuer.map(str::to_owned),
        }
    }

    pub fn jwks_url(&self) -> String {
        format!("{}/.well-known/jwks.json", self.mock_server.uri())
    }

    pub fn authenticator(&self) -> Authenticator {
        let mut builder = Authenticator::builder()
            .jwks_url(self.jwks_url())
            .min_refresh_interval(Duration::ZERO);
        if let Some(issuer) = &self.issuer {
            builder = builder.issuer(issuer);
        }
        builder.build().expect("Failed to build Authenticator")
    }

    pub fn valid_jwt(&self) -> JwtBuilder {
        let builder = JwtBuilder::new();
        match &self.issuer {
            Some(issuer) => builder.iss(issuer),
            None => builder,
        }
    }

    pub async fn jwks_requests(&self) -> usize {
        self.mock_server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or_default()
    }
}
