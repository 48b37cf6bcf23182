use database::{
    sql::{bind_values, sql_for_partial_update},
    traits::{DatabaseError, EntityRepository},
};
use sqlx::{Postgres, Transaction};

use crate::entities::jobs::{CreateJobsDAO, JOB_FIELDS, JobsBy, JobsDAO, JobsWhere, UpdateJobsDAO};

const JOB_COLUMNS: &str = "id, title, salary, equity, company_handle";

fn no_job(id: i32) -> DatabaseError {
    DatabaseError::NotFound(format!("No job: {id}"))
}

#[derive(Debug)]
pub struct PostgresJobsRepository;

#[database::async_trait::async_trait]
impl EntityRepository for PostgresJobsRepository {
    type Db = Postgres;
    type Entity = JobsDAO;
    type CreateInput = CreateJobsDAO;
    type UpdateInput = UpdateJobsDAO;
    type QueryOne = JobsBy;
    type QueryMany = JobsWhere;

    /// A missing company surfaces as `ForeignKeyViolation`.
    async fn insert(
        tx: &mut Transaction<'_, Self::Db>,
        input: Self::CreateInput,
    ) -> Result<Self::Entity, DatabaseError> {
        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) VALUES ($1, $2, $3, $4) RETURNING {JOB_COLUMNS};"
        );
        sqlx::query_as::<_, Self::Entity>(&sql)
            .bind(input.title)
            .bind(input.salary)
            .bind(input.equity)
            .bind(input.company_handle)
            .fetch_one(&mut **tx)
            .await
            .map_err(DatabaseError::from)
    }

    async fn delete(
        tx: &mut Transaction<'_, Self::Db>,
        key: Self::QueryOne,
    ) -> Result<Self::Entity, DatabaseError> {
        match key {
            JobsBy::Id(id) => {
                let sql = format!("DELETE FROM jobs WHERE id = $1 RETURNING {JOB_COLUMNS};");
                sqlx::query_as::<_, Self::Entity>(&sql)
                    .bind(id)
                    .fetch_optional(&mut **tx)
                    .await?
                    .ok_or_else(|| no_job(id))
            }
        }
    }

    async fn update(
        tx: &mut Transaction<'_, Self::Db>,
        key: Self::QueryOne,
        update: Self::UpdateInput,
    ) -> Result<Self::Entity, DatabaseError> {
        let partial = sql_for_partial_update(update.into(), &JOB_FIELDS)?;

        match key {
            JobsBy::Id(id) => {
                let sql = format!(
                    "UPDATE jobs SET {} WHERE id = ${} RETURNING {JOB_COLUMNS};",
                    partial.set_clause,
                    partial.next_placeholder()
                );
                tracing::debug!(%sql, "updating job");

                bind_values(sqlx::query_as::<_, Self::Entity>(&sql), partial.values)
                    .bind(id)
                    .fetch_optional(&mut **tx)
                    .await?
                    .ok_or_else(|| no_job(id))
            }
        }
    }

    async fn get(
        tx: &mut Transaction<'_, Self::Db>,
        key: Self::QueryOne,
    ) -> Result<Self::Entity, DatabaseError> {
        let not_found = match &key {
            JobsBy::Id(id) => no_job(*id),
        };
        PostgresJobsRepository::try_get(tx, key)
            .await?
            .ok_or(not_found)
    }

    async fn try_get(
        tx: &mut Transaction<'_, Self::Db>,
        key: Self::QueryOne,
    ) -> Result<Option<Self::Entity>, DatabaseError> {
        match key {
            JobsBy::Id(id) => {
                let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1;");
                sqlx::query_as::<_, Self::Entity>(&sql)
                    .bind(id)
                    .fetch_optional(&mut **tx)
                    .await
                    .map_err(DatabaseError::from)
            }
        }
    }

    async fn get_all(
        tx: &mut Transaction<'_, Self::Db>,
        key: Self::QueryMany,
    ) -> Result<Vec<Self::Entity>, DatabaseError> {
        match key {
            JobsWhere::Filter(filter) => {
                let filter = filter.build(0)?;
                let sql = format!(
                    "SELECT {JOB_COLUMNS} FROM jobs {} ORDER BY title;",
                    filter.where_clause
                );
                tracing::debug!(%sql, "listing jobs");

                bind_values(sqlx::query_as::<_, Self::Entity>(&sql), filter.values)
                    .fetch_all(&mut **tx)
                    .await
                    .map_err(DatabaseError::from)
            }
            JobsWhere::CompanyHandle(handle) => {
                let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE company_handle = $1 ORDER BY id;");
                sqlx::query_as::<_, Self::Entity>(&sql)
                    .bind(handle)
                    .fetch_all(&mut **tx)
                    .await
                    .map_err(DatabaseError::from)
            }
        }
    }

    async fn exists(
        tx: &mut Transaction<'_, Self::Db>,
        key: Self::QueryOne,
    ) -> Result<bool, DatabaseError> {
        match key {
            JobsBy::Id(id) => {
                let (exists,) =
                    sqlx::query_as::<_, (bool,)>("SELECT EXISTS (SELECT 1 FROM jobs WHERE id = $1);")
                        .bind(id)
                        .fetch_one(&mut **tx)
                        .await?;
                Ok(exists)
            }
        }
    }
}
