//! Row stages and the `Chain` builder.
//!
//! A stage sees one row at a time and either drops it (a predicate that
//! fails) or passes on a possibly replaced row (a mapper). A [`Chain`] is an
//! ordered list of stages run by the fused executor in a single pass.

use std::sync::Arc;

use crate::executor::{self, ChainTrace};
use crate::frame::DataFrame;
use crate::row::Row;

/// A pipeline stage that processes rows one at a time.
pub trait RowStage {
    /// Process a single row, returning it (or its replacement) to keep it,
    /// or `None` to drop it.
    fn process(&self, row: Arc<Row>) -> Option<Arc<Row>>;

    /// The display name of this stage.
    fn name(&self) -> &str;
}

/// FILTER - keeps rows for which the predicate holds.
pub struct FilterStage<F> {
    predicate: F,
}

impl<F> FilterStage<F>
where
    F: Fn(&Row) -> bool,
{
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F> RowStage for FilterStage<F>
where
    F: Fn(&Row) -> bool,
{
    fn process(&self, row: Arc<Row>) -> Option<Arc<Row>> {
        if (self.predicate)(row.as_ref()) { Some(row) } else { None }
    }

    fn name(&self) -> &str {
        "FILTER"
    }
}

/// MAP - replaces each row with the function's result.
pub struct MapStage<F> {
    func: F,
}

impl<F> MapStage<F>
where
    F: Fn(&Row) -> Row,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> RowStage for MapStage<F>
where
    F: Fn(&Row) -> Row,
{
    fn process(&self, row: Arc<Row>) -> Option<Arc<Row>> {
        Some(Arc::new((self.func)(row.as_ref())))
    }

    fn name(&self) -> &str {
        "MAP"
    }
}

/// Ordered list of row stages.
///
/// ```
/// use frames_rs::{Chain, DataFrame, Value};
///
/// let df = DataFrame::from_rows(&["n"], (1..=6).map(|i| vec![Value::from(i)]).collect());
/// let chain = Chain::new()
///     .filter(|row| row.get("n").as_i64().is_some_and(|n| n % 2 == 0))
///     .map(|row| row.set("n", row.get("n").as_i64().unwrap_or(0) * 10));
///
/// let out = df.chain(&chain);
/// assert_eq!(out.column_values("n"), vec![Value::from(20), Value::from(40), Value::from(60)]);
/// ```
#[derive(Default)]
pub struct Chain<'a> {
    stages: Vec<Box<dyn RowStage + 'a>>,
}

impl<'a> Chain<'a> {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&Row) -> bool + 'a,
    {
        self.stage(FilterStage::new(predicate))
    }

    pub fn map<F>(self, func: F) -> Self
    where
        F: Fn(&Row) -> Row + 'a,
    {
        self.stage(MapStage::new(func))
    }

    /// Append any stage implementation.
    pub fn stage(mut self, stage: impl RowStage + 'a) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn stages(&self) -> &[Box<dyn RowStage + 'a>] {
        &self.stages
    }
}

impl DataFrame {
    /// Run every stage of `chain` over each row in one pass.
    ///
    /// Produces the same rows as applying [`filter`](Self::filter) and
    /// [`map`](Self::map) once per stage, without building the
    /// intermediate frames. Each stage sees the row the previous stage
    /// returned. Columns a mapper adds are appended to the result's schema;
    /// columns it removes read as `Missing`.
    pub fn chain(&self, chain: &Chain<'_>) -> DataFrame {
        let (columns, rows) =
            executor::execute_fused(&self.rows, &self.columns, chain.stages());
        DataFrame::from_parts(columns, rows)
    }

    /// Like [`chain`](Self::chain), also reporting how many rows entered and
    /// left each stage.
    pub fn chain_traced(&self, chain: &Chain<'_>) -> (DataFrame, ChainTrace) {
        let (columns, rows, trace) =
            executor::execute_fused_traced(&self.rows, &self.columns, chain.stages());
        (DataFrame::from_parts(columns, rows), trace)
    }

    /// Keep rows for which `predicate` holds.
    pub fn filter<F>(&self, predicate: F) -> DataFrame
    where
        F: Fn(&Row) -> bool,
    {
        self.chain(&Chain::new().filter(predicate))
    }

    /// Replace each row with `func(row)`. New columns set by `func` extend
    /// the schema.
    pub fn map<F>(&self, func: F) -> DataFrame
    where
        F: Fn(&Row) -> Row,
    {
        self.chain(&Chain::new().map(func))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn numbers() -> DataFrame {
        DataFrame::from_rows(
            &["n", "tag"],
            (1..=5).map(|i| vec![Value::from(i), Value::from("x")]).collect(),
        )
    }

    fn n(row: &Row) -> i64 {
        row.get("n").as_i64().unwrap_or(0)
    }

    #[test]
    fn test_filter_stage() {
        let stage = FilterStage::new(|row: &Row| n(row) > 2);
        let df = numbers();
        assert!(stage.process(Arc::new(df.row(0).unwrap().clone())).is_none());
        assert!(stage.process(Arc::new(df.row(3).unwrap().clone())).is_some());
        assert_eq!(stage.name(), "FILTER");
    }

    #[test]
    fn test_map_stage() {
        let stage = MapStage::new(|row: &Row| row.set("n", n(row) + 100));
        let out = stage
            .process(Arc::new(numbers().row(0).unwrap().clone()))
            .unwrap();
        assert_eq!(out.get("n"), &Value::Int(101));
        assert_eq!(stage.name(), "MAP");
    }

    #[test]
    fn test_chain_builder_names() {
        let chain = Chain::new().filter(|_| true).map(|row| row.clone());
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.names(), vec!["FILTER", "MAP"]);
        assert!(Chain::new().is_empty());
    }

    #[test]
    fn test_empty_chain_keeps_everything() {
        let df = numbers();
        assert_eq!(df.chain(&Chain::new()), df);
    }

    #[test]
    fn test_filter_and_map_preserve_order() {
        let df = numbers();
        let odd = df.filter(|row| n(row) % 2 == 1);
        assert_eq!(
            odd.column_values("n"),
            vec![Value::Int(1), Value::Int(3), Value::Int(5)]
        );
        let squared = df.map(|row| row.set("n", n(row) * n(row)));
        assert_eq!(squared.column_values("n")[4], Value::Int(25));
    }

    #[test]
    fn test_short_circuit_skips_later_stages() {
        use std::cell::Cell;

        let calls = Cell::new(0);
        let chain = Chain::new().filter(|row| n(row) == 3).map(|row| {
            calls.set(calls.get() + 1);
            row.clone()
        });
        let out = numbers().chain(&chain);
        assert_eq!(out.count(), 1);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_chain_traced_matches_chain() {
        let df = numbers();
        let chain = Chain::new().filter(|row| n(row) > 1).filter(|row| n(row) < 5);
        let (out, trace) = df.chain_traced(&chain);
        assert_eq!(out, df.chain(&chain));
        assert_eq!(trace.stage_inputs, vec![5, 4]);
        assert_eq!(trace.stage_outputs, vec![4, 3]);
    }

    #[test]
    fn test_map_can_add_columns() {
        let df = numbers();
        let out = df.map(|row| row.set("extra", n(row) * 2).delete("tag"));
        assert_eq!(out.columns(), &["n", "tag", "extra"]);
        assert!(out.row(0).unwrap().get("tag").is_missing());
        assert_eq!(out.column_values("extra")[4], Value::Int(10));
    }

    #[test]
    fn test_filter_sees_column_set_by_earlier_map() {
        let df = DataFrame::from_rows(&["a"], vec![vec![Value::from(1)], vec![Value::from(2)]]);
        let chain = Chain::new()
            .map(|row| row.set("x", 1))
            .filter(|row| row.get("x") == &Value::Int(1));
        let out = df.chain(&chain);
        assert_eq!(out.count(), 2);
        assert_eq!(out.columns(), &["a", "x"]);
        let stepwise = df
            .map(|row| row.set("x", 1))
            .filter(|row| row.get("x") == &Value::Int(1));
        assert_eq!(out, stepwise);
    }
}
