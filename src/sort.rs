//! Sorting by a column.

use std::cmp::Ordering;

use crate::frame::DataFrame;
use crate::row::Row;

impl DataFrame {
    /// Rows ordered by the values of `column`, using the total order of
    /// [`Value`](crate::Value).
    ///
    /// The sort is stable. With `reverse` the fully sorted sequence is
    /// reversed afterwards, so rows with equal keys also swap their relative
    /// order.
    pub fn sort_by(&self, column: &str, reverse: bool) -> DataFrame {
        self.sort_with(|a, b| a.get(column).cmp(b.get(column)), reverse)
    }

    /// Rows ordered by a custom comparator (stable).
    pub fn sort_with<F>(&self, compare: F, reverse: bool) -> DataFrame
    where
        F: Fn(&Row, &Row) -> Ordering,
    {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| compare(a.as_ref(), b.as_ref()));
        if reverse {
            rows.reverse();
        }
        DataFrame::from_parts(self.columns.clone(), rows)
    }
}
