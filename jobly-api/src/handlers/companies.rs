use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use jobly_database::{
    CompaniesRepository, JobsRepository,
    entities::{
        companies::{CompaniesBy, CompanyFilter},
        jobs::JobsWhere,
    },
    traits::EntityRepository,
};
use serde_json::{Value, json};

use crate::{
    handlers::dto::{
        CompanyDTO, CompanyFilterDTO, CompanySummaryDTO, CreateCompanyDTO, UpdateCompanyDTO,
    },
    server::{AppState, JsonBody, PathParam, QueryParams, ServerError},
};

pub async fn create(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<CreateCompanyDTO>,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    payload.validate()?;

    let mut tx = state.pool.begin().await?;
    let company = CompaniesRepository::insert(&mut tx, payload.into()).await?;
    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "company": CompanyDTO::from(company) })),
    ))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<CompanyFilterDTO>,
) -> Result<Json<Value>, ServerError> {
    let filter = CompanyFilter::from(query);
    filter.validate()?;

    let mut tx = state.pool.begin().await?;
    let companies = CompaniesRepository::get_all(&mut tx, filter).await?;
    tx.commit().await?;

    let companies: Vec<CompanySummaryDTO> = companies.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "companies": companies })))
}

/// The company together with its jobs.
pub async fn get(
    State(state): State<Arc<AppState>>,
    PathParam(handle): PathParam<String>,
) -> Result<Json<Value>, ServerError> {
    let mut tx = state.pool.begin().await?;
    let company = CompaniesRepository::get(&mut tx, CompaniesBy::Handle(handle.clone())).await?;
    let jobs = JobsRepository::get_all(&mut tx, JobsWhere::CompanyHandle(handle)).await?;
    tx.commit().await?;

    let mut company = CompanyDTO::from(company);
    company.jobs = Some(jobs.into_iter().map(Into::into).collect());
    Ok(Json(json!({ "company": company })))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    PathParam(handle): PathParam<String>,
    JsonBody(payload): JsonBody<UpdateCompanyDTO>,
) -> Result<Json<Value>, ServerError> {
    payload.validate()?;

    let mut tx = state.pool.begin().await?;
    let company =
        CompaniesRepository::update(&mut tx, CompaniesBy::Handle(handle), payload.into()).await?;
    tx.commit().await?;

    Ok(Json(json!({ "company": CompanyDTO::from(company) })))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    PathParam(handle): PathParam<String>,
) -> Result<Json<Value>, ServerError> {
    let mut tx = state.pool.begin().await?;
    let company = CompaniesRepository::delete(&mut tx, CompaniesBy::Handle(handle)).await?;
    tx.commit().await?;

    tracing::info!(handle = %company.handle, "company deleted");
    Ok(Json(json!({ "deleted": company.handle })))
}
