use database::{
    sql::{bind_values, sql_for_partial_update},
    traits::{DatabaseError, EntityRepository},
};
use sqlx::{Postgres, Transaction};

use crate::entities::users::{
    CreateUsersDAO, USER_FIELDS, UpdateUsersDAO, UsersBy, UsersDAO, UsersWhere,
};

const USER_COLUMNS: &str = "username, password, first_name, last_name, email, is_admin";

fn no_user(username: &str) -> DatabaseError {
    DatabaseError::NotFound(format!("No user: {username}"))
}

#[derive(Debug)]
pub struct PostgresUsersRepository;

#[database::async_trait::async_trait]
impl EntityRepository for PostgresUsersRepository {
    type Db = Postgres;
    type Entity = UsersDAO;
    type CreateInput = CreateUsersDAO;
    type UpdateInput = UpdateUsersDAO;
    type QueryOne = UsersBy;
    type QueryMany = UsersWhere;

    async fn insert(
        tx: &mut Transaction<'_, Self::Db>,
        input: Self::CreateInput,
    ) -> Result<Self::Entity, DatabaseError> {
        let duplicate =
            || DatabaseError::Conflict(format!("Duplicate username: {}", input.username));

        if PostgresUsersRepository::exists(tx, UsersBy::Username(input.username.clone())).await? {
            return Err(duplicate());
        }

        let sql = format!(
            "INSERT INTO users (username, password, first_name, last_name, email, is_admin) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {USER_COLUMNS};"
        );
        sqlx::query_as::<_, Self::Entity>(&sql)
            .bind(&input.username)
            .bind(&input.password)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(input.is_admin)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| match DatabaseError::from(e) {
                DatabaseError::Conflict(_) => duplicate(),
                other => other,
            })
    }

    async fn delete(
        tx: &mut Transaction<'_, Self::Db>,
        key: Self::QueryOne,
    ) -> Result<Self::Entity, DatabaseError> {
        match key {
            UsersBy::Username(username) => {
                let sql = format!("DELETE FROM users WHERE username = $1 RETURNING {USER_COLUMNS};");
                sqlx::query_as::<_, Self::Entity>(&sql)
                    .bind(&username)
                    .fetch_optional(&mut **tx)
                    .await?
                    .ok_or_else(|| no_user(&username))
            }
        }
    }

    /// `update.password` must already be hashed.
    async fn update(
        tx: &mut Transaction<'_, Self::Db>,
        key: Self::QueryOne,
        update: Self::UpdateInput,
    ) -> Result<Self::Entity, DatabaseError> {
        let partial = sql_for_partial_update(update.into(), &USER_FIELDS)?;

        match key {
            UsersBy::Username(username) => {
                let sql = format!(
                    "UPDATE users SET {} WHERE username = ${} RETURNING {USER_COLUMNS};",
                    partial.set_clause,
                    partial.next_placeholder()
                );
                tracing::debug!(%sql, "updating user");

                bind_values(sqlx::query_as::<_, Self::Entity>(&sql), partial.values)
                    .bind(&username)
                    .fetch_optional(&mut **tx)
                    .await?
                    .ok_or_else(|| no_user(&username))
            }
        }
    }

    async fn get(
        tx: &mut Transaction<'_, Self::Db>,
        key: Self::QueryOne,
    ) -> Result<Self::Entity, DatabaseError> {
        let not_found = match &key {
            UsersBy::Username(username) => no_user(username),
        };
        PostgresUsersRepository::try_get(tx, key)
            .await?
            .ok_or(not_found)
    }

    async fn try_get(
        tx: &mut Transaction<'_, Self::Db>,
        key: Self::QueryOne,
    ) -> Result<Option<Self::Entity>, DatabaseError> {
        match key {
            UsersBy::Username(username) => {
                let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1;");
                sqlx::query_as::<_, Self::Entity>(&sql)
                    .bind(username)
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
            UsersWhere::All => {
                let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY username;");
                sqlx::query_as::<_, Self::Entity>(&sql)
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
            UsersBy::Username(username) => {
                let (exists,) = sqlx::query_as::<_, (bool,)>(
                    "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1);",
                )
                .bind(username)
                .fetch_one(&mut **tx)
                .await?;
                Ok(exists)
            }
        }
    }
}
