use std::fmt::Display;

use jsonwebtoken::{Algorithm, Validation};

/// Which registered claims a token must carry and how they are checked.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClaimsValidationSpec {
    pub iss: Option<String>,
    pub exp: bool,
    pub nbf: bool,
    pub aud: Option<Vec<String>>,
}

impl ClaimsValidationSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clerk session tokens: `exp` is mandatory, audiences are not checked.
    pub fn clerk(issuer: Option<&str>) -> Self {
        let spec = Self::new().exp(true);
        match issuer {
            Some(issuer) => spec.iss(issuer),
            None => spec,
        }
    }

    pub fn iss(mut self, issuer: &str) -> Self {
        self.iss = Some(issuer.to_owned());
        self
    }

    pub fn exp(mut self, validate: bool) -> Self {
        self.exp = validate;
        self
    }

    pub fn nbf(mut self, validate: bool) -> Self {
        self.nbf = validate;
        self
    }

    pub fn aud(mut self, audiences: &[String]) -> Self {
        self.aud = Some(audiences.to_vec());
        self
    }

    pub(crate) fn to_validation(&self, alg: Algorithm) -> Validation {
        let mut validation = Validation::new(alg);
        let mut required_claims = Vec::<&'static str>::new();
        if let Some(iss) = &self.iss {
            required_claims.push("iss");
            validation.set_issuer(&[iss]);
        }
        validation.validate_exp = self.exp;
        if self.exp {
            required_claims.push("exp");
        }
        // nbf is still honoured when present
        validation.validate_nbf = true;
        if self.nbf {
            required_claims.push("nbf");
        }
        match &self.aud {
            Some(aud) => {
                required_claims.push("aud");
                validation.set_audience(aud);
            }
            None => validation.validate_aud = false,
        }
        validation.set_required_spec_claims(&required_claims);
        validation
    }
}

impl Display for ClaimsValidationSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
