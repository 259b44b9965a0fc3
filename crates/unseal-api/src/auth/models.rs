use crate::error::ErrorResponse;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use unseal_core::AppError;
use utoipa::ToSchema;
use uuid::Uuid;

/// Caller role for authorization
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Operator,
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UserRole::User => write!(f, "user"),
            UserRole::Operator => write!(f, "operator"),
        }
    }
}

/// JWT claims structure (tokens are minted by the external identity provider)
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: Uuid,    // user_id
    pub role: String, // "user" or "operator"
    pub exp: i64,     // expiration timestamp
    pub iat: i64,     // issued at timestamp
}

/// Caller identity extracted from the JWT and stored in request extensions
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl AuthContext {
    pub fn is_operator(&self) -> bool {
        self.role == UserRole::Operator
    }

    /// Guard for operator-only routes.
    pub fn require_operator(&self) -> Result<(), AppError> {
        if self.is_operator() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Operator role required".to_string(),
            ))
        }
    }
}

// Implement FromRequestParts for AuthContext to work with Multipart.
// Extension cannot be used with Multipart, so we extract directly from
// request parts.
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse::new(
                        "Missing authentication context",
                        "MISSING_AUTH_CONTEXT",
                    )),
                )
            })
    }
}
