pub mod filter;
pub mod postgres;

use database::sql::{FieldNameMap, UpdateSpec};

pub use filter::{CompanyFilter, CompanyFilterQuery};

pub const COMPANY_FIELDS: FieldNameMap =
    FieldNameMap::new(&[("numEmployees", "num_employees"), ("logoUrl", "logo_url")]);

#[derive(sqlx::FromRow, Debug, PartialEq, Eq, Clone)]
pub struct CompaniesDAO {
    pub handle: String,
    pub name: String,
    pub description: String,
    /// Only selected by listings when an employee range was applied.
    #[sqlx(default)]
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CreateCompaniesDAO {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// `None` leaves a column untouched; `Some(None)` clears a nullable one.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct UpdateCompaniesDAO {
    pub name: Option<String>,
    pub description: Option<String>,
    pub num_employees: Option<Option<i32>>,
    pub logo_url: Option<Option<String>>,
}

impl From<UpdateCompaniesDAO> for UpdateSpec {
    fn from(value: UpdateCompaniesDAO) -> Self {
        let mut spec = UpdateSpec::new();
        if let Some(name) = value.name {
            spec.push("name", name);
        }
        if let Some(description) = value.description {
            spec.push("description", description);
        }
        if let Some(num_employees) = value.num_employees {
            spec.push("numEmployees", num_employees);
        }
        if let Some(logo_url) = value.logo_url {
            spec.push("logoUrl", logo_url);
        }
        spec
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum CompaniesBy {
    Handle(String),
}
