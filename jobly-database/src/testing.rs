//! Test helpers: an in-memory evaluator for the `WHERE` fragments the filter
//! builders produce, and database setup for the `integration` feature.

use std::collections::HashMap;

use database::sql::SqlValue;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Default)]
pub struct FakeRow {
    columns: HashMap<&'static str, SqlValue>,
}

impl FakeRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &'static str, value: impl Into<SqlValue>) -> Self {
        self.columns.insert(column, value.into());
        self
    }

    pub fn text(&self, column: &str) -> Option<String> {
        match self.columns.get(column) {
            Some(SqlValue::Text(value)) => value.clone(),
            _ => None,
        }
    }

    pub fn int(&self, column: &str) -> Option<i32> {
        match self.columns.get(column) {
            Some(SqlValue::Int(value)) => *value,
            _ => None,
        }
    }

    pub fn decimal(&self, column: &str) -> Option<Decimal> {
        match self.columns.get(column) {
            Some(SqlValue::Decimal(value)) => *value,
            _ => None,
        }
    }

    fn numeric(&self, column: &str) -> Option<Decimal> {
        self.columns.get(column).and_then(numeric_value)
    }
}

fn numeric_value(value: &SqlValue) -> Option<Decimal> {
    match value {
        SqlValue::Int(v) => v.map(Decimal::from),
        SqlValue::Decimal(v) => *v,
        other => panic!("not numeric: {other:?}"),
    }
}

/// Joins `COALESCE(col,` `0)` back into one token.
fn tokenize(conditions: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut open = false;
    for word in conditions.split_whitespace() {
        if open {
            let last = tokens.last_mut().expect("open group");
            last.push(' ');
            last.push_str(word);
        } else {
            tokens.push(word.to_string());
        }
        open = tokens.last().is_some_and(|t| t.contains('(') && !t.contains(')'));
    }
    tokens
}

fn param<'a>(token: &str, values: &'a [SqlValue], offset: usize) -> &'a SqlValue {
    let index: usize = token
        .strip_prefix('$')
        .and_then(|n| n.parse().ok())
        .unwrap_or_else(|| panic!("not a placeholder: {token}"));
    &values[index - 1 - offset]
}

fn operand(token: &str, values: &[SqlValue], offset: usize) -> Option<Decimal> {
    if token.starts_with('$') {
        numeric_value(param(token, values, offset))
    } else {
        Some(token.parse().unwrap_or_else(|_| panic!("not a literal: {token}")))
    }
}

fn column_value(row: &FakeRow, expr: &str) -> Option<Decimal> {
    match expr
        .strip_prefix("COALESCE(")
        .and_then(|inner| inner.strip_suffix(')'))
    {
        Some(inner) => {
            let (column, default) = inner.split_once(", ").expect("COALESCE(col, default)");
            row.numeric(column)
                .or_else(|| default.parse().ok())
        }
        None => row.numeric(expr),
    }
}

enum LikeToken {
    Any,
    One,
    Literal(char),
}

fn like_match(text: &[char], pattern: &[LikeToken]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some((LikeToken::Any, rest)) => (0..=text.len()).any(|i| like_match(&text[i..], rest)),
        Some((LikeToken::One, rest)) => !text.is_empty() && like_match(&text[1..], rest),
        Some((LikeToken::Literal(c), rest)) => {
            text.first() == Some(c) && like_match(&text[1..], rest)
        }
    }
}

fn ilike(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.to_lowercase().chars().collect();
    let mut tokens = Vec::new();
    let mut chars = pattern.to_lowercase().chars().collect::<Vec<_>>().into_iter();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '\\' => LikeToken::Literal(chars.next().expect("dangling escape")),
            '%' => LikeToken::Any,
            '_' => LikeToken::One,
            c => LikeToken::Literal(c),
        });
    }
    like_match(&text, &tokens)
}

/// Evaluates a built `WHERE` fragment against `row` with SQL NULL semantics.
pub fn evaluate(where_clause: &str, values: &[SqlValue], offset: usize, row: &FakeRow) -> bool {
    let Some(conditions) = where_clause.strip_prefix("WHERE ") else {
        assert!(where_clause.is_empty(), "unexpected clause: {where_clause}");
        return true;
    };

    let tokens = tokenize(conditions);
    let mut tokens = tokens.iter().map(String::as_str);
    let mut result = true;

    loop {
        let column = tokens.next().expect("column");
        let op = tokens.next().expect("operator");
        let satisfied = match op {
            "ILIKE" => {
                let pattern = match param(tokens.next().expect("pattern"), values, offset) {
                    SqlValue::Text(Some(pattern)) => pattern.clone(),
                    other => panic!("ILIKE needs text, got {other:?}"),
                };
                row.text(column).is_some_and(|text| ilike(&text, &pattern))
            }
            ">" | ">=" | "<=" => {
                let rhs = operand(tokens.next().expect("operand"), values, offset);
                match (column_value(row, column), rhs) {
                    (Some(lhs), Some(rhs)) => match op {
                        ">" => lhs > rhs,
                        ">=" => lhs >= rhs,
                        _ => lhs <= rhs,
                    },
                    _ => false,
                }
            }
            "BETWEEN" => {
                let low = operand(tokens.next().expect("low"), values, offset);
                assert_eq!(tokens.next(), Some("AND"));
                let high = operand(tokens.next().expect("high"), values, offset);
                match (column_value(row, column), low, high) {
                    (Some(n), Some(low), Some(high)) => low <= n && n <= high,
                    _ => false,
                }
            }
            other => panic!("unsupported operator {other}"),
        };
        result &= satisfied;

        match tokens.next() {
            None => break,
            Some("AND") => continue,
            Some(other) => panic!("expected AND, got {other}"),
        }
    }

    result
}

#[cfg(feature = "integration")]
pub async fn setup() -> sqlx::Transaction<'static, sqlx::Postgres> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("JOBLY_DATABASE_URL")
        .expect("JOBLY_DATABASE_URL must be set for integration tests");
    let pool = sqlx::PgPool::connect(&database_url)
        .await
        .expect("Could not connect with database");

    let mut tx = pool.begin().await.expect("Could not begin transaction");
    sqlx::raw_sql(include_str!("../tests/fixtures/schema.sql"))
        .execute(&mut *tx)
        .await
        .expect("Could not load schema");
    sqlx::raw_sql(include_str!("../tests/fixtures/seed.sql"))
        .execute(&mut *tx)
        .await
        .expect("Could not load seed data");
    tx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ilike_is_case_insensitive_and_honours_escapes() {
        assert!(ilike("Dog walker", "%dog%"));
        assert!(ilike("DOG", "d_g"));
        assert!(!ilike("Dig walker", "%dog%"));
        assert!(ilike("100% cotton", "%100\\%%"));
        assert!(!ilike("1000 cotton", "%100\\%%"));
    }

    #[test]
    fn null_columns_never_satisfy_comparisons() {
        let row = FakeRow::new().with("num_employees", None::<i32>);
        let values = [SqlValue::from(0)];
        assert!(!evaluate("WHERE num_employees >= $1", &values, 0, &row));
        assert!(evaluate("WHERE COALESCE(num_employees, 0) >= $1", &values, 0, &row));
    }
}
