//! Set-based joins.
//!
//! Both frames are grouped on the join column. Each variant keeps a subset
//! of groups from each side according to whether the group's key appears on
//! the other side:
//!
//! | kind  | groups from left       | groups from right     |
//! |-------|------------------------|-----------------------|
//! | inner | key in right           | key in left           |
//! | full  | all                    | all                   |
//! | outer | key not in right       | key not in left       |
//! | left  | all                    | key in left           |
//! | right | key in right           | all                   |
//!
//! Kept groups are re-stamped onto the union of both column lists and
//! concatenated: every left group first, then every right group, each side
//! in group order. When no group is kept the result is a frame with no
//! columns at all.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::error::{FrameError, Result};
use crate::frame::DataFrame;
use crate::group::Group;
use crate::schema::{self, Columns};
use crate::value::Value;

/// The five join variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JoinKind {
    Inner,
    #[default]
    Full,
    Outer,
    Left,
    Right,
}

/// Which groups of one side survive a join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keep {
    All,
    Shared,
    Unshared,
}

impl JoinKind {
    pub const ALL: [JoinKind; 5] = [
        JoinKind::Inner,
        JoinKind::Full,
        JoinKind::Outer,
        JoinKind::Left,
        JoinKind::Right,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            JoinKind::Inner => "inner",
            JoinKind::Full => "full",
            JoinKind::Outer => "outer",
            JoinKind::Left => "left",
            JoinKind::Right => "right",
        }
    }

    /// Membership rule as `(left side, right side)`.
    fn rule(&self) -> (Keep, Keep) {
        match self {
            JoinKind::Inner => (Keep::Shared, Keep::Shared),
            JoinKind::Full => (Keep::All, Keep::All),
            JoinKind::Outer => (Keep::Unshared, Keep::Unshared),
            JoinKind::Left => (Keep::All, Keep::Shared),
            JoinKind::Right => (Keep::Shared, Keep::All),
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for JoinKind {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "inner" => Ok(JoinKind::Inner),
            "full" => Ok(JoinKind::Full),
            "outer" => Ok(JoinKind::Outer),
            "left" => Ok(JoinKind::Left),
            "right" => Ok(JoinKind::Right),
            _ => Err(FrameError::UnknownJoinKind(s.to_string())),
        }
    }
}

/// Groups of one side that pass `keep` against the other side's keys.
fn select_groups<'g>(
    groups: &'g [Group],
    other_keys: &HashSet<&Value>,
    keep: Keep,
) -> impl Iterator<Item = &'g Group> {
    groups.iter().filter(move |g| match keep {
        Keep::All => true,
        Keep::Shared => other_keys.contains(&g.key),
        Keep::Unshared => !other_keys.contains(&g.key),
    })
}

/// Concatenate groups into one frame under `columns`, in iteration order.
///
/// Each group is re-stamped onto `columns` before its rows are appended.
/// Returns `None` when there are no groups.
fn concat_groups<'g>(
    groups: impl Iterator<Item = &'g Group>,
    columns: &Columns,
) -> Result<Option<DataFrame>> {
    let mut rows = Vec::new();
    let mut any = false;
    for group in groups {
        let frame = group.frame.restructure(columns);
        if !schema::same_columns(&frame.columns, columns) {
            return Err(FrameError::schema_mismatch(columns, &frame.columns));
        }
        rows.extend(frame.rows);
        any = true;
    }
    Ok(any.then(|| DataFrame::from_parts(Arc::clone(columns), rows)))
}

impl DataFrame {
    /// Join `other` on `on` with the given variant.
    pub fn join(&self, other: &DataFrame, on: &str, kind: JoinKind) -> Result<DataFrame> {
        let left_groups = self.group_by(on).into_groups();
        let right_groups = other.group_by(on).into_groups();
        let left_keys: HashSet<&Value> = left_groups.iter().map(|g| &g.key).collect();
        let right_keys: HashSet<&Value> = right_groups.iter().map(|g| &g.key).collect();

        let (keep_left, keep_right) = kind.rule();
        let selected = select_groups(&left_groups, &right_keys, keep_left)
            .chain(select_groups(&right_groups, &left_keys, keep_right));

        let columns = schema::union_columns(&self.columns, &other.columns);
        let joined = concat_groups(selected, &columns)?.unwrap_or_else(DataFrame::empty);
        debug!(
            kind = kind.name(),
            on,
            left = self.count(),
            right = other.count(),
            rows = joined.count(),
            "join"
        );
        Ok(joined)
    }

    /// Join with the variant given by name. Unknown names are an error.
    pub fn join_named(&self, other: &DataFrame, on: &str, how: &str) -> Result<DataFrame> {
        self.join(other, on, how.parse()?)
    }

    pub fn inner_join(&self, other: &DataFrame, on: &str) -> Result<DataFrame> {
        self.join(other, on, JoinKind::Inner)
    }

    pub fn full_join(&self, other: &DataFrame, on: &str) -> Result<DataFrame> {
        self.join(other, on, JoinKind::Full)
    }

    pub fn outer_join(&self, other: &DataFrame, on: &str) -> Result<DataFrame> {
        self.join(other, on, JoinKind::Outer)
    }

    pub fn left_join(&self, other: &DataFrame, on: &str) -> Result<DataFrame> {
        self.join(other, on, JoinKind::Left)
    }

    pub fn right_join(&self, other: &DataFrame, on: &str) -> Result<DataFrame> {
        self.join(other, on, JoinKind::Right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(i: i64) -> Value {
        Value::Int(i)
    }

    fn left() -> DataFrame {
        DataFrame::from_rows(
            &["id", "value"],
            vec![vec![v(3), v(1)], vec![v(1), v(0)], vec![v(8), v(1)]],
        )
    }

    fn right() -> DataFrame {
        DataFrame::from_rows(
            &["id", "value2"],
            vec![
                vec![v(1), v(0)],
                vec![v(8), v(2)],
                vec![v(3), v(6)],
                vec![v(2), v(1)],
                vec![v(6), v(1)],
            ],
        )
    }

    fn ids(df: &DataFrame) -> Vec<Value> {
        df.column_values("id")
    }

    #[test]
    fn test_parse_kinds() {
        for kind in JoinKind::ALL {
            assert_eq!(kind.name().parse::<JoinKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.name());
        }
        assert_eq!("LEFT".parse::<JoinKind>().unwrap(), JoinKind::Left);
        assert_eq!(JoinKind::default(), JoinKind::Full);
    }

    #[test]
    fn test_unknown_kind_is_an_error() {
        let err = left().join_named(&right(), "id", "sideways").unwrap_err();
        assert!(matches!(err, FrameError::UnknownJoinKind(ref s) if s == "sideways"));
    }

    #[test]
    fn test_inner() {
        let df = left().inner_join(&right(), "id").unwrap();
        assert_eq!(df.columns(), &["id", "value", "value2"].map(String::from));
        assert_eq!(ids(&df), vec![v(3), v(1), v(8), v(1), v(8), v(3)]);
        // Left-side rows carry no value2, right-side rows carry no value.
        assert!(df.row(0).unwrap().get("value2").is_missing());
        assert!(df.row(3).unwrap().get("value").is_missing());
    }

    #[test]
    fn test_outer() {
        let df = left().outer_join(&right(), "id").unwrap();
        assert_eq!(ids(&df), vec![v(2), v(6)]);
        assert!(df.iter().all(|row| row.get("value").is_missing()));
    }

    #[test]
    fn test_full() {
        let df = left().full_join(&right(), "id").unwrap();
        assert_eq!(df.count(), 8);
        assert_eq!(
            ids(&df),
            vec![v(3), v(1), v(8), v(1), v(8), v(3), v(2), v(6)]
        );
    }

    #[test]
    fn test_left() {
        let df = left().left_join(&right(), "id").unwrap();
        assert_eq!(ids(&df), vec![v(3), v(1), v(8), v(1), v(8), v(3)]);
    }

    #[test]
    fn test_right() {
        let df = left().right_join(&right(), "id").unwrap();
        assert_eq!(df.count(), 8);
        assert_eq!(
            ids(&df),
            vec![v(3), v(1), v(8), v(1), v(8), v(3), v(2), v(6)]
        );
    }

    #[test]
    fn test_nothing_selected_gives_columnless_frame() {
        let df = left().inner_join(&left().filter(|_| false), "id").unwrap();
        assert_eq!(df.dim(), (0, 0));

        let same = left().outer_join(&left(), "id").unwrap();
        assert_eq!(same.dim(), (0, 0));
    }

    #[test]
    fn test_groups_stay_together() {
        let a = DataFrame::from_rows(
            &["k", "a"],
            vec![vec![v(1), v(10)], vec![v(2), v(20)], vec![v(1), v(11)]],
        );
        let b = DataFrame::from_rows(&["k", "b"], vec![vec![v(1), v(5)]]);
        let df = a.left_join(&b, "k").unwrap();
        assert_eq!(
            df.column_values("a"),
            vec![v(10), v(11), v(20), Value::Missing]
        );
    }

    #[test]
    fn test_missing_keys_match_each_other() {
        let a = DataFrame::from_rows(&["k", "a"], vec![vec![Value::Missing, v(1)]]);
        let b = DataFrame::from_rows(&["b"], vec![vec![v(2)]]);
        let df = a.inner_join(&b, "k").unwrap();
        assert_eq!(df.count(), 2);
        assert_eq!(df.columns(), &["k", "a", "b"].map(String::from));
    }
}
