use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use jobly_database::{
    JobsRepository,
    entities::jobs::{JobFilter, JobsBy, JobsWhere},
    traits::EntityRepository,
};
use serde_json::{Value, json};

use crate::{
    handlers::dto::{CreateJobDTO, JobDTO, JobFilterDTO, UpdateJobDTO},
    server::{AppState, JsonBody, PathParam, QueryParams, ServerError},
};

pub async fn create(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<CreateJobDTO>,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    payload.validate()?;

    let mut tx = state.pool.begin().await?;
    let job = JobsRepository::insert(&mut tx, payload.into()).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(json!({ "job": JobDTO::from(job) }))))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<JobFilterDTO>,
) -> Result<Json<Value>, ServerError> {
    let filter = JobFilter::from(query);
    filter.validate()?;

    let mut tx = state.pool.begin().await?;
    let jobs = JobsRepository::get_all(&mut tx, JobsWhere::Filter(filter)).await?;
    tx.commit().await?;

    let jobs: Vec<JobDTO> = jobs.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "jobs": jobs })))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<i32>,
) -> Result<Json<Value>, ServerError> {
    let mut tx = state.pool.begin().await?;
    let job = JobsRepository::get(&mut tx, JobsBy::Id(id)).await?;
    tx.commit().await?;

    Ok(Json(json!({ "job": JobDTO::from(job) })))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<UpdateJobDTO>,
) -> Result<Json<Value>, ServerError> {
    payload.validate()?;

    let mut tx = state.pool.begin().await?;
    let job = JobsRepository::update(&mut tx, JobsBy::Id(id), payload.into()).await?;
    tx.commit().await?;

    Ok(Json(json!({ "job": JobDTO::from(job) })))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<i32>,
) -> Result<Json<Value>, ServerError> {
    let mut tx = state.pool.begin().await?;
    let job = JobsRepository::delete(&mut tx, JobsBy::Id(id)).await?;
    tx.commit().await?;

    tracing::info!(id = job.id, "job deleted");
    Ok(Json(json!({ "deleted": job.id })))
}
