//! Column-list utilities.
//!
//! A schema is an ordered list of column names. It is stored as a shared
//! `Arc<[String]>` so every row of a frame can point at the same list.

use std::collections::HashSet;
use std::sync::Arc;

/// Shared, immutable column list.
pub type Columns = Arc<[String]>;

/// Build a column list from anything string-like.
pub fn columns_from<S: AsRef<str>>(names: &[S]) -> Columns {
    names.iter().map(|s| s.as_ref().to_string()).collect()
}

/// An empty column list.
pub fn no_columns() -> Columns {
    Arc::from(Vec::<String>::new())
}

/// Index of `name` in `columns`.
pub fn position(columns: &[String], name: &str) -> Option<usize> {
    columns.iter().position(|c| c == name)
}

/// True when both lists hold the same names in the same order.
pub fn same_columns(a: &Columns, b: &Columns) -> bool {
    Arc::ptr_eq(a, b) || a[..] == b[..]
}

/// Set union of two column lists: `a`'s order first, then the names of `b`
/// that `a` lacks. Duplicates are removed on both sides.
pub fn union_columns(a: &[String], b: &[String]) -> Columns {
    let mut seen = HashSet::with_capacity(a.len() + b.len());
    a.iter()
        .chain(b.iter())
        .filter(|c| seen.insert(c.as_str()))
        .cloned()
        .collect()
}

/// Apply every `(old, new)` pair to the original names at once, so pairs
/// can swap columns. Unknown `old` names are ignored.
///
/// Names stay unique: a column that is not renamed but already holds a
/// target name is dropped, and when two columns land on one name the first
/// wins. Returns the new list and, for each new column, the index of the
/// column it came from.
pub fn rename_columns(
    columns: &[String],
    renames: &[(&str, &str)],
) -> (Columns, Vec<usize>) {
    let targets: Vec<(&str, bool)> = columns
        .iter()
        .map(|c| match renames.iter().find(|(old, _)| *old == c.as_str()) {
            Some((_, new)) => (*new, true),
            None => (c.as_str(), false),
        })
        .collect();

    let mut names: Vec<String> = Vec::with_capacity(targets.len());
    let mut sources = Vec::with_capacity(targets.len());
    for (idx, &(name, renamed)) in targets.iter().enumerate() {
        let claimed = !renamed && targets.iter().any(|&(n, r)| r && n == name);
        if claimed || names.iter().any(|n| n == name) {
            continue;
        }
        names.push(name.to_string());
        sources.push(idx);
    }
    (names.into(), sources)
}

/// Remove `name` from the list.
pub fn drop_column(columns: &[String], name: &str) -> Columns {
    columns.iter().filter(|c| *c != name).cloned().collect()
}

/// Append `name` unless it is already present.
pub fn with_column(columns: &[String], name: &str) -> Columns {
    if position(columns, name).is_some() {
        Arc::from(columns)
    } else {
        columns
            .iter()
            .cloned()
            .chain(std::iter::once(name.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_union_keeps_left_order_then_novel_right() {
        let union = union_columns(&cols(&["id", "value"]), &cols(&["value2", "id", "x"]));
        assert_eq!(&union[..], &cols(&["id", "value", "value2", "x"])[..]);
    }

    #[test]
    fn test_union_removes_inner_duplicates() {
        let union = union_columns(&cols(&["a", "a", "b"]), &cols(&["b", "c", "c"]));
        assert_eq!(&union[..], &cols(&["a", "b", "c"])[..]);
    }

    #[test]
    fn test_rename_and_drop() {
        let base = cols(&["a", "b", "c"]);
        let (renamed, sources) = rename_columns(&base, &[("b", "z")]);
        assert_eq!(&renamed[..], &cols(&["a", "z", "c"])[..]);
        assert_eq!(sources, vec![0, 1, 2]);
        assert_eq!(&rename_columns(&base, &[("q", "z")]).0[..], &base[..]);
        assert_eq!(&drop_column(&base, "a")[..], &cols(&["b", "c"])[..]);
    }

    #[test]
    fn test_rename_onto_existing_name_keeps_names_unique() {
        let base = cols(&["a", "b", "c"]);
        let (renamed, sources) = rename_columns(&base, &[("c", "a")]);
        assert_eq!(&renamed[..], &cols(&["b", "a"])[..]);
        assert_eq!(sources, vec![1, 2]);

        let (swapped, sources) = rename_columns(&base, &[("a", "b"), ("b", "a")]);
        assert_eq!(&swapped[..], &cols(&["b", "a", "c"])[..]);
        assert_eq!(sources, vec![0, 1, 2]);

        let (merged, sources) = rename_columns(&base, &[("a", "z"), ("b", "z")]);
        assert_eq!(&merged[..], &cols(&["z", "c"])[..]);
        assert_eq!(sources, vec![0, 2]);

        assert_eq!(&rename_columns(&base, &[("b", "b")]).0[..], &base[..]);
    }

    #[test]
    fn test_with_column_appends_once() {
        let base = cols(&["a"]);
        assert_eq!(&with_column(&base, "b")[..], &cols(&["a", "b"])[..]);
        assert_eq!(&with_column(&base, "a")[..], &base[..]);
    }

    #[test]
    fn test_same_columns() {
        let a = columns_from(&["x", "y"]);
        let b = columns_from(&["x", "y"]);
        let c = columns_from(&["y", "x"]);
        assert!(same_columns(&a, &a.clone()));
        assert!(same_columns(&a, &b));
        assert!(!same_columns(&a, &c));
        assert!(no_columns().is_empty());
    }
}
