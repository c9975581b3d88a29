//! The `DataFrame`: an immutable, ordered sequence of rows sharing a schema.
//!
//! Every transformation returns a new frame. Rows are held behind `Arc` so
//! frames derived from one another share the rows they did not change.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{FrameError, Result};
use crate::extension::Extensions;
use crate::row::Row;
use crate::schema::{self, Columns};
use crate::value::Value;

/// Raw data a frame can be built from.
#[derive(Debug, Clone)]
pub enum FrameInput {
    /// Copy of another frame.
    Frame(DataFrame),
    /// Column name to column values. Ragged columns are padded with
    /// `Missing` up to the longest one.
    ColumnMajor(Vec<(String, Vec<Value>)>),
    /// One entry per row.
    RowMajor(Vec<RowInput>),
}

/// A single row of row-major input.
#[derive(Debug, Clone)]
pub enum RowInput {
    /// Positional values.
    Values(Vec<Value>),
    /// Named values; unnamed columns become `Missing`.
    Pairs(Vec<(String, Value)>),
}

impl From<DataFrame> for FrameInput {
    fn from(df: DataFrame) -> Self {
        FrameInput::Frame(df)
    }
}

/// An immutable table of [`Row`]s.
#[derive(Debug, Clone)]
pub struct DataFrame {
    pub(crate) columns: Columns,
    pub(crate) rows: Vec<Arc<Row>>,
    pub(crate) extensions: Extensions,
}

impl PartialEq for DataFrame {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns && self.rows == other.rows
    }
}

impl Default for DataFrame {
    fn default() -> Self {
        Self::empty()
    }
}

impl DataFrame {
    /// A frame with no columns and no rows.
    pub fn empty() -> Self {
        Self::from_parts(schema::no_columns(), Vec::new())
    }

    /// Build a frame, deriving the column list from the input.
    ///
    /// Column defaults: a frame keeps its own columns, a column-major
    /// mapping uses its key order, named rows use the first-seen union of
    /// their names, and positional rows are named `"0"`, `"1"`, ...
    pub fn new(input: FrameInput) -> Self {
        match input {
            FrameInput::Frame(df) => Self::from_parts(df.columns, df.rows),
            FrameInput::ColumnMajor(dict) => {
                let columns: Vec<&str> = dict.iter().map(|(name, _)| name.as_str()).collect();
                let columns = schema::columns_from(&columns);
                Self::from_column_major(&dict, columns)
            }
            FrameInput::RowMajor(rows) => {
                let columns = infer_row_columns(&rows);
                Self::from_row_major(rows, columns)
            }
        }
    }

    /// Build a frame stamped with an explicit column list.
    pub fn with_schema<S: AsRef<str>>(input: FrameInput, columns: &[S]) -> Self {
        let columns = schema::columns_from(columns);
        match input {
            FrameInput::Frame(df) => {
                let rows = df
                    .rows
                    .iter()
                    .map(|row| conform(row, &columns))
                    .collect();
                Self::from_parts(columns, rows)
            }
            FrameInput::ColumnMajor(dict) => Self::from_column_major(&dict, columns),
            FrameInput::RowMajor(rows) => Self::from_row_major(rows, columns),
        }
    }

    /// Shorthand for positional rows under `columns`.
    pub fn from_rows<S: AsRef<str>>(columns: &[S], rows: Vec<Vec<Value>>) -> Self {
        Self::with_schema(
            FrameInput::RowMajor(rows.into_iter().map(RowInput::Values).collect()),
            columns,
        )
    }

    /// Shorthand for a column-major mapping, keeping the mapping's order.
    pub fn from_dict(dict: Vec<(String, Vec<Value>)>) -> Self {
        Self::new(FrameInput::ColumnMajor(dict))
    }

    pub(crate) fn from_parts(columns: Columns, rows: Vec<Arc<Row>>) -> Self {
        Self {
            columns,
            rows,
            extensions: Extensions::default(),
        }
    }

    fn from_column_major(dict: &[(String, Vec<Value>)], columns: Columns) -> Self {
        let sources: Vec<&[Value]> = columns
            .iter()
            .map(|c| {
                dict.iter()
                    .find(|(name, _)| name == c)
                    .map(|(_, values)| values.as_slice())
                    .unwrap_or(&[])
            })
            .collect();
        let height = sources.iter().map(|s| s.len()).max().unwrap_or(0);
        let rows = (0..height)
            .map(|i| {
                let values = sources
                    .iter()
                    .map(|s| s.get(i).cloned().unwrap_or(Value::Missing))
                    .collect();
                Arc::new(Row::from_values(Arc::clone(&columns), values))
            })
            .collect();
        Self::from_parts(columns, rows)
    }

    fn from_row_major(rows: Vec<RowInput>, columns: Columns) -> Self {
        let rows = rows
            .into_iter()
            .map(|input| {
                let columns = Arc::clone(&columns);
                Arc::new(match input {
                    RowInput::Values(values) => Row::from_values(columns, values),
                    RowInput::Pairs(pairs) => Row::from_pairs(columns, pairs),
                })
            })
            .collect();
        Self::from_parts(columns, rows)
    }

    // ---------------------------------------------------------------------
    // Shape and access
    // ---------------------------------------------------------------------

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    /// `(rows, columns)`.
    pub fn dim(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index).map(|row| row.as_ref())
    }

    /// Rows in insertion order. Repeated iteration yields the same order.
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().map(|row| row.as_ref())
    }

    // ---------------------------------------------------------------------
    // Conversions
    // ---------------------------------------------------------------------

    /// Column-major copy of the data. Inverse of [`FrameInput::ColumnMajor`].
    pub fn to_dict(&self) -> Vec<(String, Vec<Value>)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let values = self.rows.iter().map(|row| row.values()[idx].clone()).collect();
                (name.clone(), values)
            })
            .collect()
    }

    /// Row-major values, one list per row in schema order.
    pub fn to_array(&self) -> Vec<Vec<Value>> {
        self.rows.iter().map(|row| row.to_array()).collect()
    }

    /// Row-major `(name, value)` pairs.
    pub fn to_pairs(&self) -> Vec<Vec<(String, Value)>> {
        self.rows.iter().map(|row| row.to_pairs()).collect()
    }

    /// Every value of one column, `Missing` for an unknown column.
    pub fn column_values(&self, column: &str) -> Vec<Value> {
        self.rows.iter().map(|row| row.get(column).clone()).collect()
    }

    // ---------------------------------------------------------------------
    // Slicing
    // ---------------------------------------------------------------------

    pub fn head(&self, n: usize) -> DataFrame {
        self.slice(0, n)
    }

    pub fn tail(&self, n: usize) -> DataFrame {
        let start = self.rows.len().saturating_sub(n);
        self.slice(start, self.rows.len())
    }

    /// Rows in `start..end`, clamped to the frame.
    pub fn slice(&self, start: usize, end: usize) -> DataFrame {
        let end = end.min(self.rows.len());
        let start = start.min(end);
        Self::from_parts(Arc::clone(&self.columns), self.rows[start..end].to_vec())
    }

    // ---------------------------------------------------------------------
    // Schema restructuring
    // ---------------------------------------------------------------------

    /// Keep only `columns`, in that order. Unknown names become `Missing`
    /// columns.
    pub fn select<S: AsRef<str>>(&self, columns: &[S]) -> DataFrame {
        self.restructure(&schema::columns_from(columns))
    }

    /// Re-stamp every row onto `columns`.
    pub fn restructure(&self, columns: &Columns) -> DataFrame {
        if schema::same_columns(&self.columns, columns) {
            return Self::from_parts(Arc::clone(&self.columns), self.rows.clone());
        }
        let rows = self.rows.iter().map(|row| conform(row, columns)).collect();
        Self::from_parts(Arc::clone(columns), rows)
    }

    /// Rename one column, keeping its position and values. A different
    /// column already named `new` is dropped so names stay unique.
    pub fn rename(&self, old: &str, new: &str) -> DataFrame {
        self.rename_all(&[(old, new)])
    }

    /// Rename several columns at once. Pairs are applied to the original
    /// names, so `[("a", "b"), ("b", "a")]` swaps two columns. Collisions
    /// resolve as in [`rename`](Self::rename).
    pub fn rename_all(&self, renames: &[(&str, &str)]) -> DataFrame {
        let (columns, sources) = schema::rename_columns(&self.columns, renames);
        let rows = self
            .rows
            .iter()
            .map(|row| Arc::new(row.remap(&columns, &sources)))
            .collect();
        Self::from_parts(columns, rows)
    }

    /// Remove one column.
    pub fn drop(&self, column: &str) -> DataFrame {
        self.restructure(&schema::drop_column(&self.columns, column))
    }

    /// Add or replace `column` with values computed from each row.
    /// A new column is appended at the end.
    pub fn with_column<F>(&self, column: &str, func: F) -> DataFrame
    where
        F: Fn(&Row) -> Value,
    {
        let columns = schema::with_column(&self.columns, column);
        let rows = self
            .rows
            .iter()
            .map(|row| Arc::new(row.restructure(&columns).set(column, func(row.as_ref()))))
            .collect();
        Self::from_parts(columns, rows)
    }

    /// Replace every `Missing` with `value`.
    pub fn fill_missing(&self, value: impl Into<Value>) -> DataFrame {
        let value = value.into();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                if !row.values().iter().any(Value::is_missing) {
                    return Arc::clone(row);
                }
                let values = row
                    .values()
                    .iter()
                    .map(|v| if v.is_missing() { value.clone() } else { v.clone() })
                    .collect();
                Arc::new(Row::from_values(Arc::clone(&self.columns), values))
            })
            .collect();
        Self::from_parts(Arc::clone(&self.columns), rows)
    }

    /// Drop rows holding any `Missing` value.
    pub fn drop_missing(&self) -> DataFrame {
        self.filter(|row| !row.values().iter().any(Value::is_missing))
    }

    // ---------------------------------------------------------------------
    // Row queries
    // ---------------------------------------------------------------------

    /// First row matching `predicate`.
    pub fn find<P>(&self, predicate: P) -> Option<&Row>
    where
        P: Fn(&Row) -> bool,
    {
        self.iter().find(|row| predicate(*row))
    }

    /// Fold every row into an accumulator.
    pub fn reduce<A, F>(&self, init: A, func: F) -> A
    where
        F: Fn(A, &Row) -> A,
    {
        self.iter().fold(init, func)
    }

    // ---------------------------------------------------------------------
    // Union
    // ---------------------------------------------------------------------

    /// Rows of `self` followed by rows of `other`.
    ///
    /// Both frames must have identical column lists (names and order).
    pub fn union(&self, other: &DataFrame) -> Result<DataFrame> {
        if !schema::same_columns(&self.columns, &other.columns) {
            return Err(FrameError::schema_mismatch(&self.columns, &other.columns));
        }
        let mut rows = Vec::with_capacity(self.rows.len() + other.rows.len());
        rows.extend(self.rows.iter().cloned());
        rows.extend(other.rows.iter().cloned());
        Ok(Self::from_parts(Arc::clone(&self.columns), rows))
    }
}

/// Share `row` when it already carries `columns`, re-stamp it otherwise.
pub(crate) fn conform(row: &Arc<Row>, columns: &Columns) -> Arc<Row> {
    if schema::same_columns(row.columns(), columns) {
        Arc::clone(row)
    } else {
        Arc::new(row.restructure(columns))
    }
}

/// Column names for row-major input without a declared schema.
fn infer_row_columns(rows: &[RowInput]) -> Columns {
    let mut names: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut width = 0;
    for row in rows {
        match row {
            RowInput::Values(values) => width = width.max(values.len()),
            RowInput::Pairs(pairs) => {
                for (name, _) in pairs {
                    if seen.insert(name.clone()) {
                        names.push(name.clone());
                    }
                }
            }
        }
    }
    for idx in names.len()..width {
        names.push(idx.to_string());
    }
    names.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(i: i64) -> Value {
        Value::Int(i)
    }

    fn people() -> DataFrame {
        DataFrame::from_rows(
            &["id", "name", "age"],
            vec![
                vec![v(1), "ada".into(), v(36)],
                vec![v(2), "bob".into()],
                vec![v(3), "cy".into(), v(19)],
            ],
        )
    }

    #[test]
    fn test_column_major_pads_ragged() {
        let df = DataFrame::from_dict(vec![
            ("a".to_string(), vec![v(1), v(2), v(3)]),
            ("b".to_string(), vec![v(10)]),
        ]);
        assert_eq!(df.dim(), (3, 2));
        assert_eq!(df.to_array()[2], vec![v(3), Value::Missing]);
    }

    #[test]
    fn test_column_major_with_declared_columns() {
        let dict = vec![
            ("a".to_string(), vec![v(1)]),
            ("b".to_string(), vec![v(2)]),
        ];
        let df = DataFrame::with_schema(FrameInput::ColumnMajor(dict), &["b", "z"]);
        assert_eq!(df.columns(), &["b".to_string(), "z".to_string()]);
        assert_eq!(df.to_array(), vec![vec![v(2), Value::Missing]]);
    }

    #[test]
    fn test_named_rows_infer_union_of_names() {
        let df = DataFrame::new(FrameInput::RowMajor(vec![
            RowInput::Pairs(vec![("x".to_string(), v(1))]),
            RowInput::Pairs(vec![("y".to_string(), v(2)), ("x".to_string(), v(3))]),
        ]));
        assert_eq!(df.columns(), &["x".to_string(), "y".to_string()]);
        assert_eq!(df.to_array(), vec![vec![v(1), Value::Missing], vec![v(3), v(2)]]);
    }

    #[test]
    fn test_positional_rows_get_index_names() {
        let df = DataFrame::new(FrameInput::RowMajor(vec![
            RowInput::Values(vec![v(1)]),
            RowInput::Values(vec![v(1), v(2)]),
        ]));
        assert_eq!(df.columns(), &["0".to_string(), "1".to_string()]);
    }

    #[test]
    fn test_frame_input_copies() {
        let df = people();
        let copy = DataFrame::new(df.clone().into());
        assert_eq!(copy, df);
        let narrowed = DataFrame::with_schema(df.into(), &["name"]);
        assert_eq!(narrowed.dim(), (3, 1));
    }

    #[test]
    fn test_dict_round_trip_keeps_missing() {
        let df = people();
        let rebuilt = DataFrame::with_schema(FrameInput::ColumnMajor(df.to_dict()), df.columns());
        assert_eq!(rebuilt, df);
        assert!(rebuilt.row(1).unwrap().get("age").is_missing());
    }

    #[test]
    fn test_select_all_is_identity() {
        let df = people();
        let cols = df.columns().to_vec();
        assert_eq!(df.select(&cols), df);
    }

    #[test]
    fn test_select_subset_and_unknown() {
        let df = people().select(&["age", "ghost"]);
        assert_eq!(df.columns(), &["age".to_string(), "ghost".to_string()]);
        assert_eq!(df.to_array()[0], vec![v(36), Value::Missing]);
    }

    #[test]
    fn test_head_tail_slice() {
        let df = people();
        assert_eq!(df.head(2).count(), 2);
        assert_eq!(df.tail(1).column_values("id"), vec![v(3)]);
        assert_eq!(df.slice(1, 99).count(), 2);
        assert_eq!(df.slice(5, 2).count(), 0);
    }

    #[test]
    fn test_rename_drop_with_column() {
        let df = people().rename("name", "who").drop("age");
        assert_eq!(df.columns(), &["id".to_string(), "who".to_string()]);
        assert_eq!(df.row(0).unwrap().get("who"), &Value::from("ada"));

        let doubled = df.with_column("twice", |row| {
            Value::from(row.get("id").as_i64().unwrap_or(0) * 2)
        });
        assert_eq!(doubled.columns().last().map(String::as_str), Some("twice"));
        assert_eq!(doubled.column_values("twice"), vec![v(2), v(4), v(6)]);

        let replaced = doubled.with_column("id", |_| v(0));
        assert_eq!(replaced.columns(), doubled.columns());
        assert_eq!(replaced.column_values("id"), vec![v(0), v(0), v(0)]);
    }

    #[test]
    fn test_rename_all_swaps() {
        let df = people();
        let swapped = df.rename_all(&[("id", "name"), ("name", "id")]);
        assert_eq!(swapped.columns()[..2], ["name".to_string(), "id".to_string()]);
        assert_eq!(swapped.column_values("id"), df.column_values("name"));
        assert_eq!(swapped.rename_all(&[]).to_array(), df.to_array());
    }

    #[test]
    fn test_rename_onto_existing_column_round_trips() {
        let df = people().rename("age", "name");
        assert_eq!(df.columns(), &["id", "name"]);
        assert_eq!(df.column_values("name")[0], v(36));

        let rebuilt = DataFrame::with_schema(FrameInput::ColumnMajor(df.to_dict()), df.columns());
        assert_eq!(rebuilt, df);
    }

    #[test]
    fn test_missing_handling() {
        let df = people();
        assert_eq!(df.drop_missing().count(), 2);
        let filled = df.fill_missing(0);
        assert_eq!(filled.row(1).unwrap().get("age"), &v(0));
        assert_eq!(df.row(1).unwrap().get("age"), &Value::Missing);
    }

    #[test]
    fn test_find_and_reduce() {
        let df = people();
        let found = df.find(|row| row.get("name") == &Value::from("cy")).unwrap();
        assert_eq!(found.get("id"), &v(3));
        let total = df.reduce(0, |acc, row| acc + row.get("id").as_i64().unwrap_or(0));
        assert_eq!(total, 6);
    }

    #[test]
    fn test_union_same_schema() {
        let df = people();
        let both = df.union(&df.head(1)).unwrap();
        assert_eq!(both.count(), 4);
        assert_eq!(both.row(3), df.row(0));
    }

    #[test]
    fn test_union_schema_mismatch() {
        let a = DataFrame::from_rows(&["a", "b"], vec![vec![v(1), v(2)]]);
        let c = DataFrame::from_rows(&["a", "c"], vec![vec![v(1), v(2)]]);
        let err = a.union(&c).unwrap_err();
        assert!(matches!(err, FrameError::NotTheSameSchema { .. }));

        let b = DataFrame::from_rows(&["a", "b"], vec![vec![Value::from("x")]]);
        assert!(a.union(&b).is_ok());
    }

    #[test]
    fn test_empty_frame() {
        let df = DataFrame::empty();
        assert_eq!(df.dim(), (0, 0));
        assert!(df.is_empty());
        assert!(df.to_dict().is_empty());
    }
}
