use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use jobly_database::{
    UsersRepository,
    entities::users::{CreateUsersDAO, UsersBy},
    traits::EntityRepository,
};
use serde_json::{Value, json};

use crate::{
    common::{hash_password, verify_password},
    handlers::dto::{RegisterUserDTO, TokenRequestDTO},
    server::{AppState, JsonBody, ServerError},
    token::{Claims, create_token},
};

pub async fn token(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<TokenRequestDTO>,
) -> Result<Json<Value>, ServerError> {
    let mut tx = state.pool.begin().await?;

    let user = UsersRepository::try_get(&mut tx, UsersBy::Username(payload.username)).await?;

    tx.commit().await?;

    let Some(user) = user else {
        tracing::warn!("token requested for unknown user");
        return Err(ServerError::Unauthorized);
    };

    if !verify_password(&payload.password, &user.password)? {
        tracing::warn!(username = %user.username, "wrong password");
        return Err(ServerError::Unauthorized);
    }

    let token = create_token(&Claims::new(&user.username, user.is_admin), &state.secret_key)?;
    Ok(Json(json!({ "token": token })))
}

/// Self-service sign up. New users are never admins.
pub async fn register(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<RegisterUserDTO>,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    payload.validate()?;
    if payload.is_admin {
        return Err(ServerError::BadRequest(
            "isAdmin cannot be set on registration".to_string(),
        ));
    }

    let hash = hash_password(&payload.password)?;

    let mut tx = state.pool.begin().await?;

    let user = UsersRepository::insert(
        &mut tx,
        CreateUsersDAO {
            username: payload.username,
            password: hash,
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            is_admin: false,
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(username = %user.username, "user registered");
    let token = create_token(&Claims::new(&user.username, user.is_admin), &state.secret_key)?;
    Ok((StatusCode::CREATED, Json(json!({ "token": token }))))
}
