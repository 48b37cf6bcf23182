pub mod auth;
pub mod companies;
pub mod dto;
pub mod jobs;
pub mod users;

use axum::http::StatusCode;

pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
