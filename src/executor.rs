//! Chain executors.
//!
//! The fused executor pushes each row through the entire stage list before
//! touching the next row, stopping at the first stage that drops it. The
//! staged executor runs one stage over all rows before moving to the next,
//! materializing every intermediate sequence. Both produce the same rows for
//! any list of pure stages; the staged one is kept as the reference.
//!
//! A mapper's row is handed to the next stage as is, including columns the
//! mapper added. The output schema is the input columns followed by every
//! column a stage introduced, ordered by stage and then by first appearance.
//! Survivors are re-stamped onto that schema once, at the end.

use std::sync::Arc;

use crate::chain::RowStage;
use crate::frame::conform;
use crate::row::Row;
use crate::schema::{self, Columns};

/// Per-stage row counts captured by [`execute_fused_traced`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainTrace {
    pub stage_names: Vec<String>,
    /// Rows that reached each stage.
    pub stage_inputs: Vec<usize>,
    /// Rows that left each stage.
    pub stage_outputs: Vec<usize>,
}

/// Columns introduced by stage output, grouped by stage.
struct NewColumns<'c> {
    base: &'c Columns,
    per_stage: Vec<Vec<String>>,
}

impl<'c> NewColumns<'c> {
    fn new(base: &'c Columns, stages: usize) -> Self {
        Self {
            base,
            per_stage: vec![Vec::new(); stages],
        }
    }

    fn record(&mut self, stage: usize, row: &Row) {
        if schema::same_columns(row.columns(), self.base) {
            return;
        }
        let added = &mut self.per_stage[stage];
        for name in row.columns().iter() {
            if schema::position(self.base, name).is_none() && !added.contains(name) {
                added.push(name.clone());
            }
        }
    }

    fn finish(self) -> Columns {
        if self.per_stage.iter().all(Vec::is_empty) {
            return Arc::clone(self.base);
        }
        self.per_stage
            .iter()
            .fold(Arc::clone(self.base), |acc, added| {
                schema::union_columns(&acc, added)
            })
    }
}

fn restamp(rows: Vec<Arc<Row>>, columns: &Columns) -> Vec<Arc<Row>> {
    rows.iter().map(|row| conform(row, columns)).collect()
}

/// Push one row through the stages, handing each stage the previous
/// stage's row unchanged.
fn push_through_stages(
    row: &Arc<Row>,
    stages: &[Box<dyn RowStage + '_>],
    added: &mut NewColumns<'_>,
    mut on_stage: impl FnMut(usize, bool),
) -> Option<Arc<Row>> {
    let mut current = Arc::clone(row);
    for (idx, stage) in stages.iter().enumerate() {
        match stage.process(current) {
            Some(next) => {
                on_stage(idx, true);
                added.record(idx, &next);
                current = next;
            }
            None => {
                on_stage(idx, false);
                return None;
            }
        }
    }
    Some(current)
}

/// Execute a chain row-at-a-time into a single output buffer. Returns the
/// output schema and the re-stamped rows.
pub fn execute_fused(
    rows: &[Arc<Row>],
    columns: &Columns,
    stages: &[Box<dyn RowStage + '_>],
) -> (Columns, Vec<Arc<Row>>) {
    if stages.is_empty() {
        return (Arc::clone(columns), rows.to_vec());
    }
    let mut added = NewColumns::new(columns, stages.len());
    let output: Vec<Arc<Row>> = rows
        .iter()
        .filter_map(|row| push_through_stages(row, stages, &mut added, |_, _| {}))
        .collect();
    let columns = added.finish();
    let output = restamp(output, &columns);
    (columns, output)
}

/// Execute a chain row-at-a-time while counting rows in and out of each
/// stage.
pub fn execute_fused_traced(
    rows: &[Arc<Row>],
    columns: &Columns,
    stages: &[Box<dyn RowStage + '_>],
) -> (Columns, Vec<Arc<Row>>, ChainTrace) {
    let mut stage_inputs = vec![0; stages.len()];
    let mut stage_outputs = vec![0; stages.len()];
    let mut added = NewColumns::new(columns, stages.len());
    let mut output = Vec::new();

    for row in rows {
        let survivor = push_through_stages(row, stages, &mut added, |idx, kept| {
            stage_inputs[idx] += 1;
            if kept {
                stage_outputs[idx] += 1;
            }
        });
        output.extend(survivor);
    }

    let trace = ChainTrace {
        stage_names: stages.iter().map(|s| s.name().to_string()).collect(),
        stage_inputs,
        stage_outputs,
    };
    let columns = added.finish();
    let output = restamp(output, &columns);
    (columns, output, trace)
}

/// Execute a chain stage-at-a-time, building one sequence per stage. Each
/// intermediate sequence is re-stamped onto the schema grown so far.
pub fn execute_staged(
    rows: &[Arc<Row>],
    columns: &Columns,
    stages: &[Box<dyn RowStage + '_>],
) -> (Columns, Vec<Arc<Row>>) {
    let mut columns = Arc::clone(columns);
    let mut current = rows.to_vec();
    for stage in stages {
        let mut added = NewColumns::new(&columns, 1);
        let mut next = Vec::with_capacity(current.len());
        for row in current {
            if let Some(out) = stage.process(row) {
                added.record(0, &out);
                next.push(out);
            }
        }
        let grown = added.finish();
        current = restamp(next, &grown);
        columns = grown;
    }
    (columns, current)
}
