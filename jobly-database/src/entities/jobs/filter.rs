use database::{
    sql::{SqlFragment, SqlValue, WhereClause, contains_pattern},
    traits::DatabaseError,
};

/// Optional search constraints for job listings.
///
/// Title and minimum salary always take part in the query: a missing title
/// matches every job and the salary floor defaults to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub title: Option<String>,
    pub min_salary: Option<i32>,
    pub has_equity: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobFilterQuery {
    pub where_clause: String,
    pub values: Vec<SqlValue>,
}

impl JobFilter {
    pub fn min_salary(&self) -> i32 {
        self.min_salary.unwrap_or(0)
    }

    pub fn validate(&self) -> Result<(), DatabaseError> {
        if self.min_salary() < 0 {
            return Err(DatabaseError::Validation(
                "minSalary must be greater than or equal to 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn build(&self, offset: usize) -> Result<JobFilterQuery, DatabaseError> {
        self.validate()?;

        let mut clause = WhereClause::with_offset(offset);
        clause.and_ilike(
            "title",
            contains_pattern(self.title.as_deref().unwrap_or_default()),
        );
        // NULL salary counts as 0 so the default floor excludes nothing.
        clause.and_gte("COALESCE(salary, 0)", self.min_salary());
        if self.has_equity == Some(true) {
            clause.and_raw("equity > 0");
        }

        let SqlFragment { sql, values } = clause.build();
        Ok(JobFilterQuery {
            where_clause: sql,
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::testing::{FakeRow, evaluate};

    fn filter(title: Option<&str>, min_salary: Option<i32>, has_equity: Option<bool>) -> JobFilter {
        JobFilter {
            title: title.map(str::to_string),
            min_salary,
            has_equity,
        }
    }

    #[test]
    fn empty_filter_still_applies_title_and_salary() {
        let query = JobFilter::default().build(0).unwrap();
        assert_eq!(
            query.where_clause,
            "WHERE title ILIKE $1 AND COALESCE(salary, 0) >= $2"
        );
        assert_eq!(query.values, vec![SqlValue::from("%%"), SqlValue::from(0)]);
    }

    #[test]
    fn explicit_zero_salary_matches_absent_salary() {
        assert_eq!(
            filter(None, Some(0), None).build(0).unwrap(),
            filter(None, None, None).build(0).unwrap()
        );
    }

    #[test]
    fn has_equity_true_adds_equity_predicate() {
        let query = filter(Some("Dog"), Some(2000), Some(true)).build(0).unwrap();
        assert_eq!(
            query.where_clause,
            "WHERE title ILIKE $1 AND COALESCE(salary, 0) >= $2 AND equity > 0"
        );
        assert_eq!(
            query.values,
            vec![SqlValue::from("%Dog%"), SqlValue::from(2000)]
        );
    }

    #[test]
    fn has_equity_false_is_no_restriction() {
        assert_eq!(
            filter(None, None, Some(false)).build(0).unwrap(),
            filter(None, None, None).build(0).unwrap()
        );
    }

    #[test]
    fn placeholders_follow_offset() {
        let query = filter(Some("x"), None, None).build(3).unwrap();
        assert_eq!(
            query.where_clause,
            "WHERE title ILIKE $4 AND COALESCE(salary, 0) >= $5"
        );
    }

    #[test]
    fn negative_min_salary_is_rejected() {
        let err = filter(None, Some(-1), None).build(0).unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
    }

    fn jobs() -> Vec<FakeRow> {
        let job = |title: &str, salary: Option<i32>, equity: Option<&str>| {
            FakeRow::new()
                .with("title", title)
                .with("salary", salary)
                .with("equity", equity.map(|e| e.parse::<Decimal>().unwrap()))
        };
        vec![
            job("Dog walker", Some(25000), None),
            job("Hot dog vendor", Some(18000), Some("0")),
            job("Cat walker", Some(30000), Some("0.05")),
            job("Intern", None, Some("0.001")),
            job("Senior DOG groomer", Some(90000), Some("0.9")),
        ]
    }

    fn titles(filter: &JobFilter) -> Vec<String> {
        let query = filter.build(0).unwrap();
        jobs()
            .iter()
            .filter(|row| evaluate(&query.where_clause, &query.values, 0, row))
            .filter_map(|row| row.text("title"))
            .collect()
    }

    #[test]
    fn title_dog_with_zero_salary() {
        assert_eq!(
            titles(&filter(Some("Dog"), Some(0), None)),
            vec!["Dog walker", "Hot dog vendor", "Senior DOG groomer"]
        );
    }

    #[test]
    fn built_predicate_selects_same_rows_as_direct_evaluation() {
        let needles = [None, Some("dog"), Some("WALKER"), Some("intern"), Some("nothing")];
        let salaries = [None, Some(0), Some(18000), Some(25001), Some(100000)];
        let equities = [None, Some(false), Some(true)];

        for title in needles {
            for min_salary in salaries {
                for has_equity in equities {
                    let job_filter = filter(title, min_salary, has_equity);
                    let query = job_filter.build(0).unwrap();

                    for row in jobs() {
                        let row_title = row.text("title").unwrap();
                        let expected = title.is_none_or(|t| {
                            row_title.to_lowercase().contains(&t.to_lowercase())
                        }) && row.int("salary").unwrap_or(0) >= job_filter.min_salary()
                            && (has_equity != Some(true)
                                || row.decimal("equity").is_some_and(|e| e > Decimal::ZERO));

                        assert_eq!(
                            evaluate(&query.where_clause, &query.values, 0, &row),
                            expected,
                            "{job_filter:?} on {row_title}"
                        );
                    }
                }
            }
        }
    }
}
