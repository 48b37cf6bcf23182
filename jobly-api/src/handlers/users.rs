use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use jobly_database::{
    ApplicationsRepository, UsersRepository,
    entities::{
        applications::{ApplicationsWhere, CreateApplicationsDAO},
        users::{CreateUsersDAO, UsersBy, UsersWhere},
    },
    traits::EntityRepository,
};
use serde_json::{Value, json};

use crate::{
    common::hash_password,
    handlers::dto::{RegisterUserDTO, UpdateUserDTO, UserDTO},
    server::{AppState, JsonBody, PathParam, ServerError},
    token::{Claims, create_token},
};

/// Admin-only creation; unlike registration it may create admins.
pub async fn create(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<RegisterUserDTO>,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    payload.validate()?;
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
            is_admin: payload.is_admin,
        },
    )
    .await?;
    tx.commit().await?;

    let token = create_token(&Claims::new(&user.username, user.is_admin), &state.secret_key)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "user": UserDTO::from(user), "token": token })),
    ))
}

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ServerError> {
    let mut tx = state.pool.begin().await?;
    let users = UsersRepository::get_all(&mut tx, UsersWhere::All).await?;
    tx.commit().await?;

    let users: Vec<UserDTO> = users.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "users": users })))
}

/// The user together with the ids of the jobs they applied to.
pub async fn get(
    State(state): State<Arc<AppState>>,
    PathParam(username): PathParam<String>,
) -> Result<Json<Value>, ServerError> {
    let mut tx = state.pool.begin().await?;
    let user = UsersRepository::get(&mut tx, UsersBy::Username(username.clone())).await?;
    let applications =
        ApplicationsRepository::get_all(&mut tx, ApplicationsWhere::Username(username)).await?;
    tx.commit().await?;

    let mut user = UserDTO::from(user);
    user.jobs = Some(applications.into_iter().map(|a| a.job_id).collect());
    Ok(Json(json!({ "user": user })))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    PathParam(username): PathParam<String>,
    JsonBody(payload): JsonBody<UpdateUserDTO>,
) -> Result<Json<Value>, ServerError> {
    payload.validate()?;
    let update = payload.into_dao()?;

    let mut tx = state.pool.begin().await?;
    let user = UsersRepository::update(&mut tx, UsersBy::Username(username), update).await?;
    tx.commit().await?;

    Ok(Json(json!({ "user": UserDTO::from(user) })))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    PathParam(username): PathParam<String>,
) -> Result<Json<Value>, ServerError> {
    let mut tx = state.pool.begin().await?;
    let user = UsersRepository::delete(&mut tx, UsersBy::Username(username)).await?;
    tx.commit().await?;

    tracing::info!(username = %user.username, "user deleted");
    Ok(Json(json!({ "deleted": user.username })))
}

pub async fn apply(
    State(state): State<Arc<AppState>>,
    PathParam((username, job_id)): PathParam<(String, i32)>,
) -> Result<Json<Value>, ServerError> {
    let mut tx = state.pool.begin().await?;
    let application =
        ApplicationsRepository::insert(&mut tx, CreateApplicationsDAO { username, job_id })
            .await?;
    tx.commit().await?;

    Ok(Json(json!({ "applied": application.job_id })))
}
