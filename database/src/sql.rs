//! Pieces for hand-assembled statements: typed parameter values, partial
//! `SET` fragments and `WHERE` fragments numbered with `$n` placeholders.
//!
//! Nothing in here touches storage. Callers splice the produced text into
//! their statement and bind the produced values in the same order.

use rust_decimal::Decimal;
use sqlx::{Postgres, postgres::PgArguments, query::QueryAs};

use crate::traits::DatabaseError;

/// A bindable value. NULLs keep their SQL type so they can be assigned to a
/// typed column.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(Option<i32>),
    Text(Option<String>),
    Decimal(Option<Decimal>),
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(Some(value))
    }
}

impl From<Option<i32>> for SqlValue {
    fn from(value: Option<i32>) -> Self {
        SqlValue::Int(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(Some(value))
    }
}

impl From<Option<String>> for SqlValue {
    fn from(value: Option<String>) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(Some(value.to_string()))
    }
}

impl From<Decimal> for SqlValue {
    fn from(value: Decimal) -> Self {
        SqlValue::Decimal(Some(value))
    }
}

impl From<Option<Decimal>> for SqlValue {
    fn from(value: Option<Decimal>) -> Self {
        SqlValue::Decimal(value)
    }
}

/// Ordered field → value pairs for a partial update.
///
/// Iteration order is insertion order; setting a field twice replaces the
/// earlier value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSpec {
    fields: Vec<(String, SqlValue)>,
}

impl UpdateSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.push(field, value);
        self
    }

    pub fn push(&mut self, field: impl Into<String>, value: impl Into<SqlValue>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Semantic field name → storage column. Fields without an entry map to
/// themselves.
#[derive(Debug, Clone, Copy)]
pub struct FieldNameMap {
    entries: &'static [(&'static str, &'static str)],
}

impl FieldNameMap {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    pub const fn identity() -> Self {
        Self { entries: &[] }
    }

    pub fn column<'a>(&self, field: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
            .unwrap_or(field)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdate {
    /// `"col_a"=$1, "col_b"=$2, ...`
    pub set_clause: String,
    pub values: Vec<SqlValue>,
}

impl PartialUpdate {
    /// Placeholder index for the value the caller binds after `values`,
    /// usually the row key.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }
}

/// Builds the `SET` portion of an `UPDATE` from the fields present in
/// `update`.
///
/// The fragment at position `i` reads `$i+1` and binds `values[i]`.
pub fn sql_for_partial_update(
    update: UpdateSpec,
    field_names: &FieldNameMap,
) -> Result<PartialUpdate, DatabaseError> {
    if update.is_empty() {
        return Err(DatabaseError::Validation("No data".to_string()));
    }

    let mut columns = Vec::with_capacity(update.len());
    let mut values = Vec::with_capacity(update.len());

    for (idx, (field, value)) in update.fields.into_iter().enumerate() {
        let column = quote_ident(field_names.column(&field));
        columns.push(format!("{column}=${}", idx + 1));
        values.push(value);
    }

    Ok(PartialUpdate {
        set_clause: columns.join(", "),
        values,
    })
}

pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// `%needle%` with LIKE metacharacters escaped, for substring matches.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFragment {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// Accumulates `AND`-joined conditions and their parameters.
///
/// Placeholders continue from `offset`, so a fragment can follow values the
/// caller already bound.
#[derive(Debug, Default)]
pub struct WhereClause {
    conditions: Vec<String>,
    values: Vec<SqlValue>,
    param_count: usize,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::with_offset(0)
    }

    pub fn with_offset(offset: usize) -> Self {
        Self {
            conditions: Vec::new(),
            values: Vec::new(),
            param_count: offset,
        }
    }

    pub fn param_count(&self) -> usize {
        self.param_count
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    fn placeholder(&mut self, value: SqlValue) -> String {
        self.param_count += 1;
        self.values.push(value);
        format!("${}", self.param_count)
    }

    fn add_comparison(&mut self, col: &str, op: &str, value: impl Into<SqlValue>) {
        let placeholder = self.placeholder(value.into());
        self.conditions.push(format!("{col} {op} {placeholder}"));
    }

    pub fn and_ilike(&mut self, col: &str, pattern: impl Into<SqlValue>) {
        self.add_comparison(col, "ILIKE", pattern);
    }

    pub fn and_gte(&mut self, col: &str, value: impl Into<SqlValue>) {
        self.add_comparison(col, ">=", value);
    }

    pub fn and_lte(&mut self, col: &str, value: impl Into<SqlValue>) {
        self.add_comparison(col, "<=", value);
    }

    pub fn and_between(&mut self, col: &str, from: impl Into<SqlValue>, to: impl Into<SqlValue>) {
        let from = self.placeholder(from.into());
        let to = self.placeholder(to.into());
        self.conditions.push(format!("{col} BETWEEN {from} AND {to}"));
    }

    /// Condition without parameters. Never pass caller-supplied text here.
    pub fn and_raw(&mut self, condition: &'static str) {
        self.conditions.push(condition.to_string());
    }

    /// `WHERE a AND b ...`, or an empty string when nothing was added.
    pub fn build(self) -> SqlFragment {
        let sql = if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        };

        SqlFragment {
            sql,
            values: self.values,
        }
    }
}

pub fn bind_value<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    value: SqlValue,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    match value {
        SqlValue::Int(v) => query.bind(v),
        SqlValue::Text(v) => query.bind(v),
        SqlValue::Decimal(v) => query.bind(v),
    }
}

pub fn bind_values<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    values: Vec<SqlValue>,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    values.into_iter().fold(query, bind_value)
}
