//! In-memory record store: ordered rows over a shared, named column schema.
//!
//! Tables are values. Every transforming operation borrows its input and
//! returns a new `Table`; nothing is mutated behind a caller's back.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

use crate::error::VerifyError;

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A scalar cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Text(String),
    Number(f64),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Canonical comparison text. Integral values drop their fraction so that
    /// `1042` read from a spreadsheet equals `"1042"` or `"1042.0"` read from
    /// a CSV. Leading zeros are significant: `"01042"` keeps them.
    pub fn key(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Null => None,
            Self::Text(s) => Some(Cow::Borrowed(strip_zero_fraction(s))),
            Self::Number(n) => Some(Cow::Owned(format_number(*n))),
        }
    }
}

/// `"1042.00"` -> `"1042"`; anything that is not an integer with an all-zero
/// fraction comes back unchanged.
fn strip_zero_fraction(s: &str) -> &str {
    let Some((int, frac)) = s.split_once('.') else {
        return s;
    };
    let digits = int.strip_prefix('-').unwrap_or(int);
    let integral = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && !frac.is_empty()
        && frac.bytes().all(|b| b == b'0');
    if integral {
        int
    } else {
        s
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => f.write_str(&format_number(*n)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Format nicely: integers without decimals.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

/// Borrowed view of one row, addressable by column name.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> RowRef<'a> {
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    pub fn at(&self, index: usize) -> &'a Value {
        &self.values[index]
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from literal rows. Arity is checked like `push_row`.
    pub fn from_rows(
        name: impl Into<String>,
        columns: &[&str],
        rows: Vec<Vec<Value>>,
    ) -> Result<Self, VerifyError> {
        let mut table = Self::new(name, columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row(&mut self, values: Vec<Value>) -> Result<(), VerifyError> {
        if values.len() != self.columns.len() {
            return Err(VerifyError::malformed(
                &self.name,
                None,
                format!(
                    "row {} has {} values, expected {}",
                    self.rows.len() + 1,
                    values.len(),
                    self.columns.len()
                ),
            ));
        }
        self.rows.push(values);
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Result<usize, VerifyError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| VerifyError::missing_column(&self.name, name))
    }

    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> + '_ {
        self.rows.iter().map(move |values| RowRef {
            columns: &self.columns,
            values,
        })
    }

    pub fn row(&self, index: usize) -> Option<RowRef<'_>> {
        self.rows.get(index).map(|values| RowRef {
            columns: &self.columns,
            values,
        })
    }

    pub fn column_values(&self, name: &str) -> Result<Vec<&Value>, VerifyError> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Stable filter: kept rows retain their relative order.
    pub fn filter<F>(&self, mut predicate: F) -> Table
    where
        F: FnMut(RowRef<'_>) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|values| {
                predicate(RowRef {
                    columns: &self.columns,
                    values,
                })
            })
            .cloned()
            .collect();
        Table {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Rows of `self` followed by rows of `other`. Column lists must be identical.
    pub fn concat(&self, other: &Table) -> Result<Table, VerifyError> {
        if self.columns != other.columns {
            return Err(VerifyError::SchemaMismatch {
                left: self.name.clone(),
                right: other.name.clone(),
            });
        }
        let mut rows = Vec::with_capacity(self.rows.len() + other.rows.len());
        rows.extend(self.rows.iter().cloned());
        rows.extend(other.rows.iter().cloned());
        Ok(Table {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Append a column, or overwrite it in place when it already exists.
    pub fn with_column(&self, name: &str, values: Vec<Value>) -> Result<Table, VerifyError> {
        if values.len() != self.rows.len() {
            return Err(VerifyError::malformed(
                &self.name,
                None,
                format!(
                    "column '{name}' has {} values for {} rows",
                    values.len(),
                    self.rows.len()
                ),
            ));
        }

        let mut table = self.clone();
        match table.columns.iter().position(|c| c == name) {
            Some(idx) => {
                for (row, v) in table.rows.iter_mut().zip(values) {
                    row[idx] = v;
                }
            }
            None => {
                table.columns.push(name.to_string());
                for (row, v) in table.rows.iter_mut().zip(values) {
                    row.push(v);
                }
            }
        }
        Ok(table)
    }

    /// Derive a column by mapping every row. Order and row count are preserved.
    pub fn map_column<F>(&self, name: &str, f: F) -> Result<Table, VerifyError>
    where
        F: FnMut(RowRef<'_>) -> Value,
    {
        let values: Vec<Value> = self.rows().map(f).collect();
        self.with_column(name, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            "receipts",
            &["sku", "response"],
            vec![
                vec!["A1".into(), "STORE_X".into()],
                vec!["B2".into(), Value::Null],
                vec!["C3".into(), "МАРКЕТПЛЕЙС".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn number_keys_drop_integral_fraction() {
        assert_eq!(Value::Number(123.0).key().as_deref(), Some("123"));
        assert_eq!(Value::Number(1.5).key().as_deref(), Some("1.5"));
        assert_eq!(Value::text("123").key(), Value::Number(123.0).key());
        assert_eq!(Value::Null.key(), None);
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn integral_text_keys_drop_zero_fraction() {
        assert_eq!(Value::text("1042.0").key(), Value::Number(1042.0).key());
        assert_eq!(Value::text("1042.00").key().as_deref(), Some("1042"));
        assert_eq!(Value::text("-7.0").key().as_deref(), Some("-7"));
        assert_eq!(Value::text("01042").key().as_deref(), Some("01042"));
        assert_eq!(Value::text("01042.0").key().as_deref(), Some("01042"));
        assert_eq!(Value::text("1042.5").key().as_deref(), Some("1042.5"));
        assert_eq!(Value::text("1042.").key().as_deref(), Some("1042."));
        assert_eq!(Value::text(".0").key().as_deref(), Some(".0"));
        assert_eq!(Value::text("A1.0").key().as_deref(), Some("A1.0"));
        // display keeps the text as read
        assert_eq!(Value::text("1042.0").to_string(), "1042.0");
    }

    #[test]
    fn push_row_checks_arity() {
        let mut t = Table::new("t", vec!["a".into(), "b".into()]);
        let err = t.push_row(vec![Value::Null]).unwrap_err();
        assert!(err.to_string().contains("expected 2"));
    }

    #[test]
    fn column_index_reports_table_and_column() {
        let err = sample().column_index("corr_sku").unwrap_err();
        assert_eq!(err.to_string(), "table 'receipts': missing column 'corr_sku'");
    }

    #[test]
    fn filter_is_stable() {
        let t = sample().filter(|r| r.get("response").is_some_and(|v| !v.is_null()));
        let skus: Vec<String> = t.rows().map(|r| r.get("sku").unwrap().to_string()).collect();
        assert_eq!(skus, vec!["A1", "C3"]);
    }

    #[test]
    fn concat_requires_same_schema() {
        let a = sample();
        let b = Table::new("other", vec!["sku".into()]);
        assert!(a.concat(&b).is_err());

        let doubled = a.concat(&a).unwrap();
        assert_eq!(doubled.len(), 6);
    }

    #[test]
    fn with_column_appends_then_overwrites() {
        let t = sample();
        let t = t
            .with_column("value", vec!["x".into(), "y".into(), "z".into()])
            .unwrap();
        assert_eq!(t.columns(), &["sku", "response", "value"]);

        let t = t.map_column("value", |r| r.get("sku").cloned().unwrap_or(Value::Null)).unwrap();
        assert_eq!(t.columns().len(), 3);
        assert_eq!(t.row(2).unwrap().get("value"), Some(&Value::text("C3")));
    }

    #[test]
    fn with_column_rejects_wrong_length() {
        assert!(sample().with_column("value", vec![Value::Null]).is_err());
    }
}
