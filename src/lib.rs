//! # frames-rs
//!
//! An immutable, in-memory DataFrame for lightweight tabular work without a
//! database.
//!
//! ## Overview
//!
//! - **Rows** are immutable, schema-aware mappings from column name to
//!   [`Value`]; a column without data holds [`Value::Missing`].
//! - **Frames** are ordered sequences of rows sharing one column list. Every
//!   operation returns a new frame; unchanged rows are shared, not copied.
//! - **Chains** run any list of row filters and mappers in a single pass,
//!   giving the same rows as calling `filter`/`map` one at a time.
//! - **Group-by** partitions rows by the distinct values of a column, in
//!   first-occurrence order.
//! - **Joins** (inner, full, outer, left, right) are set operations over the
//!   groups of both frames.
//!
//! ## Example
//!
//! ```
//! use frames_rs::{DataFrame, JoinKind, Value};
//!
//! let a = DataFrame::from_rows(
//!     &["id", "value"],
//!     vec![
//!         vec![Value::from(3), Value::from(1)],
//!         vec![Value::from(1), Value::from(0)],
//!     ],
//! );
//! let b = DataFrame::from_rows(
//!     &["id", "value2"],
//!     vec![
//!         vec![Value::from(1), Value::from(0)],
//!         vec![Value::from(2), Value::from(1)],
//!     ],
//! );
//!
//! let joined = a.join(&b, "id", JoinKind::Inner).unwrap();
//! assert_eq!(joined.columns(), &["id", "value", "value2"]);
//! assert_eq!(joined.count(), 2);
//! ```

pub mod chain;
pub mod error;
pub mod executor;
pub mod extension;
pub mod frame;
pub mod group;
pub mod join;
pub mod json;
pub mod row;
pub mod schema;
pub mod sort;
pub mod value;

pub use chain::{Chain, FilterStage, MapStage, RowStage};
pub use error::{FrameError, Result};
pub use executor::{ChainTrace, execute_fused, execute_fused_traced, execute_staged};
pub use extension::{Extension, ExtensionFactory, Extensions};
pub use frame::{DataFrame, FrameInput, RowInput};
pub use group::{Group, GroupBy};
pub use join::JoinKind;
pub use json::{read_json_file, write_json_file};
pub use row::Row;
pub use schema::Columns;
pub use value::Value;
