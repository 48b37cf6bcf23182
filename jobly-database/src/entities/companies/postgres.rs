use database::{
    sql::{bind_values, sql_for_partial_update},
    traits::{DatabaseError, EntityRepository},
};
use sqlx::{Postgres, Transaction};

use crate::entities::companies::{
    COMPANY_FIELDS, CompaniesBy, CompaniesDAO, CompanyFilter, CreateCompaniesDAO,
    UpdateCompaniesDAO,
};

const COMPANY_COLUMNS: &str = "handle, name, description, num_employees, logo_url";
/// Primary key of `companies`; the only other unique column is `name`.
const HANDLE_KEY: &str = "companies_pkey";
const COMPANY_LISTING_COLUMNS: &str = "handle, name, description, logo_url";

fn no_company(handle: &str) -> DatabaseError {
    DatabaseError::NotFound(format!("No company: {handle}"))
}

#[derive(Debug)]
pub struct PostgresCompaniesRepository;

#[database::async_trait::async_trait]
impl EntityRepository for PostgresCompaniesRepository {
    type Db = Postgres;
    type Entity = CompaniesDAO;
    type CreateInput = CreateCompaniesDAO;
    type UpdateInput = UpdateCompaniesDAO;
    type QueryOne = CompaniesBy;
    type QueryMany = CompanyFilter;

    async fn insert(
        tx: &mut Transaction<'_, Self::Db>,
        input: Self::CreateInput,
    ) -> Result<Self::Entity, DatabaseError> {
        let duplicate = || DatabaseError::Conflict(format!("Duplicate company: {}", input.handle));

        if PostgresCompaniesRepository::exists(tx, CompaniesBy::Handle(input.handle.clone())).await? {
            return Err(duplicate());
        }

        // The pre-check races with concurrent creators; the primary key settles it.
        let sql = format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url) VALUES ($1, $2, $3, $4, $5) RETURNING {COMPANY_COLUMNS};"
        );
        sqlx::query_as::<_, Self::Entity>(&sql)
            .bind(&input.handle)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.num_employees)
            .bind(&input.logo_url)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| {
                let constraint = e
                    .as_database_error()
                    .and_then(|d| d.constraint())
                    .map(str::to_string);
                match DatabaseError::from(e) {
                    DatabaseError::Conflict(_) if constraint.as_deref() == Some(HANDLE_KEY) => {
                        duplicate()
                    }
                    DatabaseError::Conflict(_) => DatabaseError::Conflict(format!(
                        "Duplicate company name: {}",
                        input.name
                    )),
                    other => other,
                }
            })
    }

    async fn delete(
        tx: &mut Transaction<'_, Self::Db>,
        key: Self::QueryOne,
    ) -> Result<Self::Entity, DatabaseError> {
        match key {
            CompaniesBy::Handle(handle) => {
                let sql = format!("DELETE FROM companies WHERE handle = $1 RETURNING {COMPANY_COLUMNS};");
                sqlx::query_as::<_, Self::Entity>(&sql)
                    .bind(&handle)
                    .fetch_optional(&mut **tx)
                    .await?
                    .ok_or_else(|| no_company(&handle))
            }
        }
    }

    async fn update(
        tx: &mut Transaction<'_, Self::Db>,
        key: Self::QueryOne,
        update: Self::UpdateInput,
    ) -> Result<Self::Entity, DatabaseError> {
        let partial = sql_for_partial_update(update.into(), &COMPANY_FIELDS)?;

        match key {
            CompaniesBy::Handle(handle) => {
                let sql = format!(
                    "UPDATE companies SET {} WHERE handle = ${} RETURNING {COMPANY_COLUMNS};",
                    partial.set_clause,
                    partial.next_placeholder()
                );
                tracing::debug!(%sql, "updating company");

                bind_values(sqlx::query_as::<_, Self::Entity>(&sql), partial.values)
                    .bind(&handle)
                    .fetch_optional(&mut **tx)
                    .await?
                    .ok_or_else(|| no_company(&handle))
            }
        }
    }

    async fn get(
        tx: &mut Transaction<'_, Self::Db>,
        key: Self::QueryOne,
    ) -> Result<Self::Entity, DatabaseError> {
        let not_found = match &key {
            CompaniesBy::Handle(handle) => no_company(handle),
        };
        PostgresCompaniesRepository::try_get(tx, key)
            .await?
            .ok_or(not_found)
    }

    async fn try_get(
        tx: &mut Transaction<'_, Self::Db>,
        key: Self::QueryOne,
    ) -> Result<Option<Self::Entity>, DatabaseError> {
        match key {
            CompaniesBy::Handle(handle) => {
                let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE handle = $1;");
                sqlx::query_as::<_, Self::Entity>(&sql)
                    .bind(handle)
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
        let filter = key.build(0)?;
        let columns = if filter.num_employees_visible {
            COMPANY_COLUMNS
        } else {
            COMPANY_LISTING_COLUMNS
        };
        let sql = format!(
            "SELECT {columns} FROM companies {} ORDER BY name;",
            filter.where_clause
        );
        tracing::debug!(%sql, "listing companies");

        bind_values(sqlx::query_as::<_, Self::Entity>(&sql), filter.values)
            .fetch_all(&mut **tx)
            .await
            .map_err(DatabaseError::from)
    }

    async fn exists(
        tx: &mut Transaction<'_, Self::Db>,
        key: Self::QueryOne,
    ) -> Result<bool, DatabaseError> {
        match key {
            CompaniesBy::Handle(handle) => {
                let (exists,) = sqlx::query_as::<_, (bool,)>(
                    "SELECT EXISTS (SELECT 1 FROM companies WHERE handle = $1);",
                )
                .bind(handle)
                .fetch_one(&mut **tx)
                .await?;
                Ok(exists)
            }
        }
    }
}
