use crate::auth::jwt::JwtService;
use crate::auth::models::AuthContext;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use unseal_core::AppError;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<JwtService>,
}

/// Bearer-token middleware: validates the JWT and injects an [`AuthContext`]
/// into request extensions for downstream extractors.
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return HttpAppError(AppError::Unauthorized(
            "Invalid authorization header format".to_string(),
        ))
        .into_response();
    };

    let claims = match auth_state.jwt.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => return HttpAppError(e).into_response(),
    };

    let role = match JwtService::parse_role(&claims.role) {
        Ok(role) => role,
        Err(e) => return HttpAppError(e).into_response(),
    };

    request.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
        role,
    });
    next.run(request).await
}
