use std::fmt;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use super::{parse_bearer_header, AuthRejection};

/// Claim set carried by an admitted credential.
pub type Claims = serde_json::Map<String, serde_json::Value>;

/// Verifies HS256 bearer credentials against a single shared secret.
///
/// Verification is pure: the outcome depends only on the secret and the
/// token bytes. No revocation list is consulted.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// The only algorithm a credential may be signed with.
    pub const ALGORITHM: Algorithm = Algorithm::HS256;

    /// Creates a verifier that checks signatures, and `exp` when the token
    /// carries one. Tokens without `exp` are accepted.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Self::ALGORITHM);
        validation.required_spec_claims.clear();
        validation.validate_aud = false;

        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Requires an `exp` claim on every token.
    pub fn with_required_expiry(mut self) -> Self {
        self.validation.required_spec_claims.insert("exp".to_string());
        self
    }

    /// Returns true when tokens without `exp` are rejected.
    pub fn requires_expiry(&self) -> bool {
        self.validation.required_spec_claims.contains("exp")
    }

    /// Verifies a raw token. Every parse or signature error collapses to
    /// [`AuthRejection::InvalidCredential`].
    pub fn verify(&self, token: &str) -> Result<Claims, AuthRejection> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AuthRejection::InvalidCredential)
    }

    /// Admits or denies a request from its raw `Authorization` header value.
    ///
    /// Malformed headers are rejected before any signature work is done.
    pub fn authorize(&self, header: Option<&str>) -> Result<Claims, AuthRejection> {
        let token = parse_bearer_header(header)?;
        self.verify(token)
    }
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithm", &Self::ALGORITHM)
            .field("requires_expiry", &self.requires_expiry())
            .finish_non_exhaustive()
    }
}
