use database::traits::DatabaseError;
use sqlx::{Pool, postgres::PgPoolOptions};

pub mod entities;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::entities::applications::postgres::PostgresApplicationsRepository as ApplicationsRepository;
pub use crate::entities::companies::postgres::PostgresCompaniesRepository as CompaniesRepository;
pub use crate::entities::jobs::postgres::PostgresJobsRepository as JobsRepository;
pub use crate::entities::users::postgres::PostgresUsersRepository as UsersRepository;

pub use database::*;

pub type DB = sqlx::Postgres;

pub struct JoblyDatabase;

impl JoblyDatabase {
    pub async fn connect(url: &str) -> Result<Pool<DB>, DatabaseError> {
        let pool = PgPoolOptions::new().connect(url).await?;
        tracing::info!("connected to database");
        Ok(pool)
    }

    /// Pool that opens connections on first use.
    pub fn connect_lazy(url: &str) -> Result<Pool<DB>, DatabaseError> {
        Ok(PgPoolOptions::new().connect_lazy(url)?)
    }
}
