pub mod filter;
pub mod postgres;

use database::sql::{FieldNameMap, UpdateSpec};
use rust_decimal::Decimal;

pub use filter::{JobFilter, JobFilterQuery};

/// Job update fields are already column names.
pub const JOB_FIELDS: FieldNameMap = FieldNameMap::identity();

#[derive(sqlx::FromRow, Debug, PartialEq, Eq, Clone)]
pub struct JobsDAO {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CreateJobsDAO {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct UpdateJobsDAO {
    pub title: Option<String>,
    pub salary: Option<Option<i32>>,
    pub equity: Option<Option<Decimal>>,
}

impl From<UpdateJobsDAO> for UpdateSpec {
    fn from(value: UpdateJobsDAO) -> Self {
        let mut spec = UpdateSpec::new();
        if let Some(title) = value.title {
            spec.push("title", title);
        }
        if let Some(salary) = value.salary {
            spec.push("salary", salary);
        }
        if let Some(equity) = value.equity {
            spec.push("equity", equity);
        }
        spec
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum JobsBy {
    Id(i32),
}

#[derive(Debug, PartialEq, Eq)]
pub enum JobsWhere {
    Filter(JobFilter),
    CompanyHandle(String),
}
