//! JWT token verification
//!
//! Tokens are issued by an external identity service; Registrar only
//! validates them. Claims carry the caller identity and role.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::roles::Role;
use crate::types::{RegistrarError, Result};

/// Secret used when dev mode is enabled and no JWT_SECRET is configured
const DEV_SECRET: &str = "dev-only-insecure-secret";

/// JWT claims for an authenticated caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Caller identifier (email or username)
    pub sub: String,
    /// Caller role
    pub role: Role,
    /// Issued-at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// Result of verifying a token
#[derive(Debug)]
pub struct TokenValidationResult {
    pub valid: bool,
    pub claims: Option<Claims>,
    pub error: Option<String>,
}

/// Verifies (and, for tests and tooling, mints) bearer tokens
#[derive(Clone)]
pub struct JwtValidator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_seconds: u64,
}

impl JwtValidator {
    /// Create a validator with the configured secret
    pub fn new(secret: String, expiry_seconds: u64) -> Result<Self> {
        if secret.is_empty() {
            return Err(RegistrarError::Auth("JWT secret must not be empty".into()));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_seconds,
        })
    }

    /// Create a validator with the well-known dev secret
    pub fn new_dev() -> Self {
        Self {
            encoding: EncodingKey::from_secret(DEV_SECRET.as_bytes()),
            decoding: DecodingKey::from_secret(DEV_SECRET.as_bytes()),
            expiry_seconds: 3600,
        }
    }

    /// Mint a token for the given subject and role
    pub fn generate_token(&self, subject: &str, role: Role) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            role,
            iat: now,
            exp: now + self.expiry_seconds as i64,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| RegistrarError::Auth(format!("Failed to encode token: {}", e)))
    }

    /// Verify a token, returning claims on success
    pub fn verify_token(&self, token: &str) -> TokenValidationResult {
        match decode::<Claims>(token, &self.decoding, &Validation::default()) {
            Ok(data) => TokenValidationResult {
                valid: true,
                claims: Some(data.claims),
                error: None,
            },
            Err(e) => TokenValidationResult {
                valid: false,
                claims: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Extract the bearer token from an Authorization header value
pub fn extract_token_from_header(header: Option<&str>) -> Option<&str> {
    header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
