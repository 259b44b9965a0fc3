//! HS256 JWT validation.
//!
//! Tokens are minted by the external identity provider with a shared secret;
//! this service only validates and decodes them. Token minting here exists
//! for tests.

use crate::auth::models::{JwtClaims, UserRole};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use unseal_core::AppError;
use uuid::Uuid;

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Validate and decode a bearer token.
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        let token_data =
            decode::<JwtClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                tracing::debug!("JWT validation failed: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::Unauthorized("Token has expired".to_string())
                    }
                    _ => AppError::Unauthorized(format!("Invalid token: {}", e)),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Mint a token for the given identity. Used by tests; production tokens
    /// come from the identity provider.
    pub fn mint_token(
        &self,
        user_id: Uuid,
        role: UserRole,
        ttl_secs: i64,
    ) -> Result<String, AppError> {
        let now = chrono::Utc::now().timestamp();
        let claims = JwtClaims {
            sub: user_id,
            role: role.to_string(),
            exp: now + ttl_secs,
            iat: now,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to mint token: {}", e)))
    }

    /// Parse the role claim.
    pub fn parse_role(role_str: &str) -> Result<UserRole, AppError> {
        match role_str {
            "user" => Ok(UserRole::User),
            "operator" => Ok(UserRole::Operator),
            _ => Err(AppError::Unauthorized("Invalid user role".to_string())),
        }
    }
}
