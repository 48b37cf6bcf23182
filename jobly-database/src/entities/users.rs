pub mod postgres;

use database::sql::{FieldNameMap, UpdateSpec};

pub const USER_FIELDS: FieldNameMap = FieldNameMap::new(&[
    ("firstName", "first_name"),
    ("lastName", "last_name"),
    ("isAdmin", "is_admin"),
]);

/// `password` holds the argon2 hash, never the plain text.
#[derive(sqlx::FromRow, Debug, PartialEq, Eq, Clone)]
pub struct UsersDAO {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CreateUsersDAO {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct UpdateUsersDAO {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

impl From<UpdateUsersDAO> for UpdateSpec {
    fn from(value: UpdateUsersDAO) -> Self {
        let mut spec = UpdateSpec::new();
        if let Some(first_name) = value.first_name {
            spec.push("firstName", first_name);
        }
        if let Some(last_name) = value.last_name {
            spec.push("lastName", last_name);
        }
        if let Some(password) = value.password {
            spec.push("password", password);
        }
        if let Some(email) = value.email {
            spec.push("email", email);
        }
        spec
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum UsersBy {
    Username(String),
}

#[derive(Debug, PartialEq, Eq)]
pub enum UsersWhere {
    All,
}
