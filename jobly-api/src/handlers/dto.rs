use jobly_database::entities::{
    companies::{CompaniesDAO, CompanyFilter, CreateCompaniesDAO, UpdateCompaniesDAO},
    jobs::{CreateJobsDAO, JobFilter, JobsDAO, UpdateJobsDAO},
    users::{UpdateUsersDAO, UsersDAO},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    common::{
        MAX_LEN_HANDLE, MAX_LEN_NAME, MAX_LEN_USERNAME, hash_password, is_valid_email,
        is_valid_length, is_valid_password, is_valid_url, require,
    },
    server::ServerError,
};

/// Distinguishes an explicit `null` (`Some(None)`) from a missing key (`None`).
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

fn check_num_employees(num_employees: Option<i32>) -> Result<(), ServerError> {
    require(
        num_employees.is_none_or(|n| n >= 0),
        "numEmployees must be greater than or equal to 0",
    )
}

fn check_logo_url(logo_url: Option<&str>) -> Result<(), ServerError> {
    require(
        logo_url.map(is_valid_url).transpose()?.unwrap_or(true),
        "logoUrl must be a valid URL",
    )
}

fn check_salary(salary: Option<i32>) -> Result<(), ServerError> {
    require(
        salary.is_none_or(|s| s >= 0),
        "salary must be greater than or equal to 0",
    )
}

fn check_equity(equity: Option<Decimal>) -> Result<(), ServerError> {
    require(
        equity.is_none_or(|e| e >= Decimal::ZERO && e <= Decimal::ONE),
        "equity must be between 0 and 1",
    )
}

fn check_email(email: &str) -> Result<(), ServerError> {
    require(is_valid_email(email)?, "Invalid Email Format")
}

fn check_password(password: &str) -> Result<(), ServerError> {
    require(is_valid_password(password), "Invalid Password Format")
}

fn check_length(value: &str, field: &str, max: usize) -> Result<(), ServerError> {
    require(
        is_valid_length(value, max),
        &format!("{field} must be between 1 and {max} characters"),
    )
}

fn check_name(value: &str, field: &str) -> Result<(), ServerError> {
    check_length(value, field, MAX_LEN_NAME)
}

// Companies

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCompanyDTO {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl CreateCompanyDTO {
    pub fn validate(&self) -> Result<(), ServerError> {
        check_length(&self.handle, "handle", MAX_LEN_HANDLE)?;
        require(!self.name.is_empty(), "name must not be empty")?;
        check_num_employees(self.num_employees)?;
        check_logo_url(self.logo_url.as_deref())
    }
}

impl From<CreateCompanyDTO> for CreateCompaniesDAO {
    fn from(value: CreateCompanyDTO) -> Self {
        Self {
            handle: value.handle,
            name: value.name,
            description: value.description,
            num_employees: value.num_employees,
            logo_url: value.logo_url,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateCompanyDTO {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub num_employees: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub logo_url: Option<Option<String>>,
}

impl UpdateCompanyDTO {
    pub fn validate(&self) -> Result<(), ServerError> {
        require(
            self.name.as_deref().is_none_or(|name| !name.is_empty()),
            "name must not be empty",
        )?;
        check_num_employees(self.num_employees.flatten())?;
        check_logo_url(self.logo_url.as_ref().and_then(|url| url.as_deref()))
    }
}

impl From<UpdateCompanyDTO> for UpdateCompaniesDAO {
    fn from(value: UpdateCompanyDTO) -> Self {
        Self {
            name: value.name,
            description: value.description,
            num_employees: value.num_employees,
            logo_url: value.logo_url,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyFilterDTO {
    pub name: Option<String>,
    pub min_employees: Option<i32>,
    pub max_employees: Option<i32>,
}

impl From<CompanyFilterDTO> for CompanyFilter {
    fn from(value: CompanyFilterDTO) -> Self {
        Self {
            name: value.name,
            min_employees: value.min_employees,
            max_employees: value.max_employees,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDTO {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<Vec<CompanyJobDTO>>,
}

impl From<CompaniesDAO> for CompanyDTO {
    fn from(value: CompaniesDAO) -> Self {
        Self {
            handle: value.handle,
            name: value.name,
            description: value.description,
            num_employees: value.num_employees,
            logo_url: value.logo_url,
            jobs: None,
        }
    }
}

/// Listing entry: `numEmployees` only appears when an employee range was
/// part of the search.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummaryDTO {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl From<CompaniesDAO> for CompanySummaryDTO {
    fn from(value: CompaniesDAO) -> Self {
        Self {
            handle: value.handle,
            name: value.name,
            description: value.description,
            num_employees: value.num_employees,
            logo_url: value.logo_url,
        }
    }
}

// Jobs

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateJobDTO {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl CreateJobDTO {
    pub fn validate(&self) -> Result<(), ServerError> {
        require(!self.title.is_empty(), "title must not be empty")?;
        check_salary(self.salary)?;
        check_equity(self.equity)
    }
}

impl From<CreateJobDTO> for CreateJobsDAO {
    fn from(value: CreateJobDTO) -> Self {
        Self {
            title: value.title,
            salary: value.salary,
            equity: value.equity,
            company_handle: value.company_handle,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateJobDTO {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub salary: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub equity: Option<Option<Decimal>>,
}

impl UpdateJobDTO {
    pub fn validate(&self) -> Result<(), ServerError> {
        require(
            self.title.as_deref().is_none_or(|title| !title.is_empty()),
            "title must not be empty",
        )?;
        check_salary(self.salary.flatten())?;
        check_equity(self.equity.flatten())
    }
}

impl From<UpdateJobDTO> for UpdateJobsDAO {
    fn from(value: UpdateJobDTO) -> Self {
        Self {
            title: value.title,
            salary: value.salary,
            equity: value.equity,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobFilterDTO {
    pub title: Option<String>,
    pub min_salary: Option<i32>,
    pub has_equity: Option<bool>,
}

impl From<JobFilterDTO> for JobFilter {
    fn from(value: JobFilterDTO) -> Self {
        Self {
            title: value.title,
            min_salary: value.min_salary,
            has_equity: value.has_equity,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDTO {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl From<JobsDAO> for JobDTO {
    fn from(value: JobsDAO) -> Self {
        Self {
            id: value.id,
            title: value.title,
            salary: value.salary,
            equity: value.equity,
            company_handle: value.company_handle,
        }
    }
}

/// A job as listed under its company.
#[derive(Debug, Serialize)]
pub struct CompanyJobDTO {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
}

impl From<JobsDAO> for CompanyJobDTO {
    fn from(value: JobsDAO) -> Self {
        Self {
            id: value.id,
            title: value.title,
            salary: value.salary,
            equity: value.equity,
        }
    }
}

// Users

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenRequestDTO {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterUserDTO {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Only honoured when an admin creates the user.
    #[serde(default)]
    pub is_admin: bool,
}

impl RegisterUserDTO {
    pub fn validate(&self) -> Result<(), ServerError> {
        check_length(&self.username, "username", MAX_LEN_USERNAME)?;
        check_password(&self.password)?;
        check_name(&self.first_name, "firstName")?;
        check_name(&self.last_name, "lastName")?;
        check_email(&self.email)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserDTO {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

impl UpdateUserDTO {
    pub fn validate(&self) -> Result<(), ServerError> {
        if let Some(first_name) = &self.first_name {
            check_name(first_name, "firstName")?;
        }
        if let Some(last_name) = &self.last_name {
            check_name(last_name, "lastName")?;
        }
        if let Some(password) = &self.password {
            check_password(password)?;
        }
        if let Some(email) = &self.email {
            check_email(email)?;
        }
        Ok(())
    }

    /// Hashes the new password, if any.
    pub fn into_dao(self) -> Result<UpdateUsersDAO, ServerError> {
        Ok(UpdateUsersDAO {
            first_name: self.first_name,
            last_name: self.last_name,
            password: self.password.as_deref().map(hash_password).transpose()?,
            email: self.email,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDTO {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<Vec<i32>>,
}

impl From<UsersDAO> for UserDTO {
    fn from(value: UsersDAO) -> Self {
        Self {
            username: value.username,
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            is_admin: value.is_admin,
            jobs: None,
        }
    }
}
