use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use crate::{
    server::{AppState, PathParam, ServerError},
    token::{Claims, verify_token},
};

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

/// Stores the verified [`Claims`] in the request extensions when a valid
/// bearer token is present. Never rejects by itself.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(&headers) {
        match verify_token(token, &state.secret_key) {
            Ok(claims) => {
                request.extensions_mut().insert(claims);
            }
            Err(_) => tracing::warn!("invalid bearer token ignored"),
        }
    }
    next.run(request).await
}

pub async fn ensure_admin(request: Request, next: Next) -> Result<Response, ServerError> {
    let is_admin = request
        .extensions()
        .get::<Claims>()
        .is_some_and(|claims| claims.is_admin);

    if !is_admin {
        tracing::warn!("admin required, access denied");
        return Err(ServerError::Unauthorized);
    }
    Ok(next.run(request).await)
}

/// Admins, or the user named by the `username` path segment.
pub async fn ensure_correct_user_or_admin(
    PathParam(params): PathParam<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let allowed = request.extensions().get::<Claims>().is_some_and(|claims| {
        claims.is_admin || params.get("username") == Some(&claims.username)
    });

    if !allowed {
        tracing::warn!("correct user or admin required, access denied");
        return Err(ServerError::Unauthorized);
    }
    Ok(next.run(request).await)
}
