use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// How the shared signing secret is stored in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecretEncoding {
    /// Secret bytes are the UTF-8 bytes of the configured string.
    #[default]
    Raw,
    /// Secret is base64 encoded (keys shared with JJWT-style issuers).
    Base64,
}

// Errors returned by token verification. Callers outside this module only see
// the collapsed `TokenValidity`.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("token expired")]
    Expired,
    #[error("empty 'sub' claim")]
    EmptySubject,
}

#[derive(Debug, Clone, Deserialize)]
struct TokenClaims {
    #[serde(default)]
    sub: Option<String>,
    exp: u64,
}

/// Outcome of validating a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValidity {
    Valid { subject: String },
    Invalid,
}

impl TokenValidity {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    pub fn subject(&self) -> Option<&str> {
        match self {
            Self::Valid { subject } => Some(subject),
            Self::Invalid => None,
        }
    }
}

/// HMAC (HS256/HS384/HS512) verifier for the gateway's shared secret.
///
/// - Key material is intentionally not printable via Debug.
/// - Stateless: safe to share across request tasks behind an `Arc`.
#[derive(Clone)]
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("TokenValidator")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenValidator {
    pub fn new(secret: &str, encoding: SecretEncoding) -> Result<Self, TokenError> {
        let decoding_key = match encoding {
            SecretEncoding::Raw => DecodingKey::from_secret(secret.as_bytes()),
            SecretEncoding::Base64 => DecodingKey::from_base64_secret(secret)?,
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_aud = false;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Verify the signature and claims, returning the subject.
    ///
    /// `jsonwebtoken::Validation` checks the signature, algorithm and presence
    /// of `exp`. This method additionally rejects:
    /// - tokens whose `exp` is the current second (expiry is exclusive)
    /// - a missing or empty `sub`
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        // Leftovers of the literal "Bearer" strip (e.g. the separating space).
        let token = token.trim();

        let data =
            jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;

        if data.claims.exp <= jsonwebtoken::get_current_timestamp() {
            return Err(TokenError::Expired);
        }

        match data.claims.sub {
            Some(sub) if !sub.is_empty() => Ok(sub),
            _ => Err(TokenError::EmptySubject),
        }
    }

    /// Collapsed form of [`verify`](Self::verify): every failure is `Invalid`.
    pub fn validate(&self, token: &str) -> TokenValidity {
        match self.verify(token) {
            Ok(subject) => TokenValidity::Valid { subject },
            Err(err) => {
                tracing::debug!(error = %err, "token rejected");
                TokenValidity::Invalid
            }
        }
    }
}
