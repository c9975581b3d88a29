//! Immutable, schema-aware rows.

use std::sync::Arc;

use crate::schema::{self, Columns};
use crate::value::{MISSING, Value};

/// An ordered mapping from column name to [`Value`].
///
/// A row always holds exactly one value slot per column; a column with no
/// supplied value holds [`Value::Missing`]. Rows are never modified in
/// place: `set`, `delete`, `select` and friends return a new row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Row {
    columns: Columns,
    values: Vec<Value>,
}

impl Row {
    /// Create a row from positional values.
    ///
    /// Short value lists are padded with `Missing`; extra values are ignored.
    pub fn from_values(columns: Columns, values: Vec<Value>) -> Self {
        let mut values = values;
        values.resize(columns.len(), Value::Missing);
        Self { columns, values }
    }

    /// Create a row from `(name, value)` pairs.
    ///
    /// Columns without a pair get `Missing`; pairs naming unknown columns are
    /// ignored. When a name repeats, the last pair wins.
    pub fn from_pairs<K: AsRef<str>>(
        columns: Columns,
        pairs: impl IntoIterator<Item = (K, Value)>,
    ) -> Self {
        let mut values = vec![Value::Missing; columns.len()];
        for (name, value) in pairs {
            if let Some(idx) = schema::position(&columns, name.as_ref()) {
                values[idx] = value;
            }
        }
        Self { columns, values }
    }

    /// Column names, in order.
    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// Values, in column order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn has(&self, column: &str) -> bool {
        schema::position(&self.columns, column).is_some()
    }

    /// Value for `column`, or `Missing` when the column is unknown.
    pub fn get(&self, column: &str) -> &Value {
        schema::position(&self.columns, column)
            .map(|idx| &self.values[idx])
            .unwrap_or(&MISSING)
    }

    /// A copy with `column` set to `value`. Unknown columns are appended.
    pub fn set(&self, column: &str, value: impl Into<Value>) -> Row {
        let value = value.into();
        match schema::position(&self.columns, column) {
            Some(idx) => {
                let mut values = self.values.clone();
                values[idx] = value;
                Row {
                    columns: Arc::clone(&self.columns),
                    values,
                }
            }
            None => {
                let mut values = Vec::with_capacity(self.values.len() + 1);
                values.extend(self.values.iter().cloned());
                values.push(value);
                Row {
                    columns: schema::with_column(&self.columns, column),
                    values,
                }
            }
        }
    }

    /// A copy without `column`.
    pub fn delete(&self, column: &str) -> Row {
        let Some(idx) = schema::position(&self.columns, column) else {
            return self.clone();
        };
        let mut values = self.values.clone();
        values.remove(idx);
        Row {
            columns: schema::drop_column(&self.columns, column),
            values,
        }
    }

    /// A copy holding only `columns`, in that order. Unknown names map to
    /// `Missing`.
    pub fn select<S: AsRef<str>>(&self, columns: &[S]) -> Row {
        self.restructure(&schema::columns_from(columns))
    }

    /// Re-stamp this row onto a shared column list.
    pub fn restructure(&self, columns: &Columns) -> Row {
        if schema::same_columns(&self.columns, columns) {
            return Row {
                columns: Arc::clone(columns),
                values: self.values.clone(),
            };
        }
        let values = columns.iter().map(|c| self.get(c).clone()).collect();
        Row {
            columns: Arc::clone(columns),
            values,
        }
    }

    /// A copy with column `old` renamed to `new`. A different column
    /// already named `new` is dropped.
    pub fn rename(&self, old: &str, new: &str) -> Row {
        let (columns, sources) = schema::rename_columns(&self.columns, &[(old, new)]);
        self.remap(&columns, &sources)
    }

    /// Rebuild onto `columns`, taking value `sources[i]` for column `i`.
    pub(crate) fn remap(&self, columns: &Columns, sources: &[usize]) -> Row {
        Row {
            columns: Arc::clone(columns),
            values: sources.iter().map(|&idx| self.values[idx].clone()).collect(),
        }
    }

    /// Values in schema order.
    pub fn to_array(&self) -> Vec<Value> {
        self.values.clone()
    }

    /// `(name, value)` pairs in schema order.
    pub fn to_pairs(&self) -> Vec<(String, Value)> {
        self.columns
            .iter()
            .cloned()
            .zip(self.values.iter().cloned())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}
