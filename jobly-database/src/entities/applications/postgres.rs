use database::traits::{DatabaseError, EntityRepository};
use sqlx::{Postgres, Transaction};

use crate::entities::{
    applications::{ApplicationsDAO, ApplicationsWhere, CreateApplicationsDAO},
    jobs::{JobsBy, postgres::PostgresJobsRepository},
    users::{UsersBy, postgres::PostgresUsersRepository},
};

/// Applications are only created and listed.
#[derive(Debug)]
pub struct PostgresApplicationsRepository;

impl PostgresApplicationsRepository {
    /// Both the job and the user must exist; applying twice is a `Conflict`.
    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        input: CreateApplicationsDAO,
    ) -> Result<ApplicationsDAO, DatabaseError> {
        if !PostgresJobsRepository::exists(tx, JobsBy::Id(input.job_id)).await? {
            return Err(DatabaseError::NotFound(format!("No job: {}", input.job_id)));
        }
        if !PostgresUsersRepository::exists(tx, UsersBy::Username(input.username.clone())).await?
        {
            return Err(DatabaseError::NotFound(format!(
                "No username: {}",
                input.username
            )));
        }

        sqlx::query_as::<_, ApplicationsDAO>(
            "INSERT INTO applications (job_id, username) VALUES ($1, $2) RETURNING username, job_id;",
        )
        .bind(input.job_id)
        .bind(&input.username)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| match DatabaseError::from(e) {
            DatabaseError::Conflict(_) => DatabaseError::Conflict(format!(
                "Already applied: {} -> {}",
                input.username, input.job_id
            )),
            other => other,
        })
    }

    pub async fn get_all(
        tx: &mut Transaction<'_, Postgres>,
        key: ApplicationsWhere,
    ) -> Result<Vec<ApplicationsDAO>, DatabaseError> {
        match key {
            ApplicationsWhere::Username(username) => sqlx::query_as::<_, ApplicationsDAO>(
                "SELECT username, job_id FROM applications WHERE username = $1 ORDER BY job_id;",
            )
            .bind(username)
            .fetch_all(&mut **tx)
            .await
            .map_err(DatabaseError::from),
        }
    }
}
