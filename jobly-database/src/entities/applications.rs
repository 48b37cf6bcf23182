pub mod postgres;

/// Join row recording that `username` applied to `job_id`.
#[derive(sqlx::FromRow, Debug, PartialEq, Eq, Clone)]
pub struct ApplicationsDAO {
    pub username: String,
    pub job_id: i32,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CreateApplicationsDAO {
    pub username: String,
    pub job_id: i32,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ApplicationsWhere {
    Username(String),
}
