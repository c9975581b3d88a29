//! Distinct values and group-by partitioning.
//!
//! Groups are emitted in first-occurrence order of their key, and each group
//! keeps the source order of its rows.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::trace;

use crate::frame::DataFrame;
use crate::row::Row;
use crate::schema;
use crate::value::Value;

/// Rows sharing one key value, tagged with that key.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: Value,
    pub frame: DataFrame,
}

/// Result of [`DataFrame::group_by`]: ordered, tagged groups.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBy {
    on: String,
    groups: Vec<Group>,
}

impl GroupBy {
    /// Column the frame was grouped on.
    pub fn on(&self) -> &str {
        &self.on
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group keys, in first-occurrence order.
    pub fn keys(&self) -> Vec<&Value> {
        self.groups.iter().map(|g| &g.key).collect()
    }

    pub fn get(&self, key: &Value) -> Option<&DataFrame> {
        self.groups.iter().find(|g| &g.key == key).map(|g| &g.frame)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Group> {
        self.groups.iter()
    }

    pub fn into_groups(self) -> Vec<Group> {
        self.groups
    }

    /// Reduce each group to one value.
    ///
    /// Returns a frame with columns `[on, name]` holding one row per group,
    /// in group order.
    pub fn aggregate<F>(&self, name: &str, func: F) -> DataFrame
    where
        F: Fn(&DataFrame, &Value) -> Value,
    {
        let columns = schema::columns_from(&[self.on.as_str(), name]);
        let rows = self
            .groups
            .iter()
            .map(|g| {
                let values = vec![g.key.clone(), func(&g.frame, &g.key)];
                Arc::new(Row::from_values(Arc::clone(&columns), values))
            })
            .collect();
        DataFrame::from_parts(columns, rows)
    }
}

impl<'a> IntoIterator for &'a GroupBy {
    type Item = &'a Group;
    type IntoIter = std::slice::Iter<'a, Group>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

impl IntoIterator for GroupBy {
    type Item = Group;
    type IntoIter = std::vec::IntoIter<Group>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl DataFrame {
    /// Unique values of `column`, in first-occurrence order. `Missing` is a
    /// value like any other.
    pub fn distinct(&self, column: &str) -> Vec<Value> {
        let mut seen: HashSet<&Value> = HashSet::new();
        let mut out = Vec::new();
        for row in &self.rows {
            let value = row.get(column);
            if seen.insert(value) {
                out.push(value.clone());
            }
        }
        out
    }

    /// Alias of [`distinct`](Self::distinct).
    pub fn unique(&self, column: &str) -> Vec<Value> {
        self.distinct(column)
    }

    /// Partition rows by the value of `column`.
    pub fn group_by(&self, column: &str) -> GroupBy {
        let mut index: HashMap<&Value, usize> = HashMap::new();
        let mut buckets: Vec<(Value, Vec<Arc<Row>>)> = Vec::new();
        for row in &self.rows {
            let key = row.get(column);
            let slot = *index.entry(key).or_insert_with(|| {
                buckets.push((key.clone(), Vec::new()));
                buckets.len() - 1
            });
            buckets[slot].1.push(Arc::clone(row));
        }
        trace!(column, rows = self.rows.len(), groups = buckets.len(), "group_by");

        let groups = buckets
            .into_iter()
            .map(|(key, rows)| Group {
                key,
                frame: DataFrame::from_parts(Arc::clone(&self.columns), rows),
            })
            .collect();
        GroupBy {
            on: column.to_string(),
            groups,
        }
    }

    /// Number of rows whose `column` equals `value`.
    pub fn count_value(&self, value: &Value, column: &str) -> usize {
        self.filter(|row| row.get(column) == value).count()
    }
}
