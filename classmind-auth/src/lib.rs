//! Bearer token authentication for the ClassMind API.
//!
//! Tokens are issued by Clerk and verified against the public keys
//! Clerk publishes as a JWK set.

/// [Authenticator](crate::authenticator::Authenticator) verifies the bearer
/// token of a request and yields the [AuthenticatedUser](crate::claims::AuthenticatedUser).
///
/// Keep a single instance around and hand out clones; they share
/// one JWKS cache.
pub mod authenticator;

/// Builder used to construct an [Authenticator](crate::authenticator::Authenticator).
///
/// ```
/// use classmind_auth::authenticator::Authenticator;
///
/// let authenticator = Authenticator::builder()
///     .jwks_url("https://example.clerk.accounts.dev/.well-known/jwks.json")
///     .build()
///     .expect("Failed to build Authenticator");
/// ```
pub mod builder;

/// Claims of a Clerk session token and the user derived from them.
pub mod claims;

pub mod error;

/// Customize the response sent when a required authentication fails.
pub mod error_handler;

/// Fetching and caching of the identity provider's JWK set.
pub mod jwks;

pub mod jwt_extract;

pub mod jwt_unverified;

pub mod jwt_validate;

/// The tower middleware.
///
/// Obtained through [Authenticator::required_layer()](crate::authenticator::Authenticator::required_layer)
/// or [Authenticator::optional_layer()](crate::authenticator::Authenticator::optional_layer).
/// On success the [AuthenticatedUser](crate::claims::AuthenticatedUser) is
/// inserted into the request extensions.
pub mod layer;

/// [ClaimsValidationSpec](crate::validation::ClaimsValidationSpec) decides
/// which registered claims incoming tokens must carry.
pub mod validation;
