use database::{
    sql::{SqlFragment, SqlValue, WhereClause, contains_pattern},
    traits::DatabaseError,
};

/// Optional search constraints for company listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyFilter {
    pub name: Option<String>,
    pub min_employees: Option<i32>,
    pub max_employees: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyFilterQuery {
    /// Empty when no constraint applies.
    pub where_clause: String,
    pub values: Vec<SqlValue>,
    /// Whether `num_employees` belongs in the projection.
    pub num_employees_visible: bool,
}

impl CompanyFilter {
    pub fn validate(&self) -> Result<(), DatabaseError> {
        if let (Some(min), Some(max)) = (self.min_employees, self.max_employees) {
            if min > max {
                return Err(DatabaseError::Validation(
                    "maxEmployees must be greater than or equal to minEmployees".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Placeholders start at `$offset+1`.
    pub fn build(&self, offset: usize) -> Result<CompanyFilterQuery, DatabaseError> {
        self.validate()?;

        let mut clause = WhereClause::with_offset(offset);

        if let Some(name) = &self.name {
            clause.and_ilike("name", contains_pattern(name));
        }

        let num_employees_visible = match (self.min_employees, self.max_employees) {
            (Some(min), Some(max)) => {
                clause.and_between("num_employees", min, max);
                true
            }
            (Some(min), None) => {
                clause.and_gte("num_employees", min);
                true
            }
            (None, Some(max)) => {
                clause.and_lte("num_employees", max);
                true
            }
            (None, None) => false,
        };

        let SqlFragment { sql, values } = clause.build();

        Ok(CompanyFilterQuery {
            where_clause: sql,
            values,
            num_employees_visible,
        })
    }
}
