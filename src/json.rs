//! JSON format adapter.
//!
//! A JSON object is read column-major (`{"id": [1, 2], "name": ["a", "b"]}`)
//! and a JSON array row-major (`[{"id": 1}, [2, "b"]]`). Frames are written
//! back as an array of records; `Missing` cells are left out of each record.

use std::fs;
use std::path::Path;

use crate::error::{FrameError, Result};
use crate::frame::{DataFrame, FrameInput, RowInput};
use crate::value::{Value, json_kind};

const FRAME_KINDS: &[&str] = &["array of rows", "object of columns"];
const ROW_KINDS: &[&str] = &["array", "object"];

/// Turn a JSON document into frame input.
pub fn parse_input(json: &serde_json::Value) -> Result<FrameInput> {
    match json {
        serde_json::Value::Object(map) => {
            let mut columns = Vec::with_capacity(map.len());
            for (name, column) in map {
                let values = match column {
                    serde_json::Value::Array(items) => {
                        items.iter().map(Value::from_json).collect::<Result<Vec<_>>>()?
                    }
                    scalar => vec![Value::from_json(scalar)?],
                };
                columns.push((name.clone(), values));
            }
            Ok(FrameInput::ColumnMajor(columns))
        }
        serde_json::Value::Array(items) => {
            let rows = items.iter().map(parse_row).collect::<Result<Vec<_>>>()?;
            Ok(FrameInput::RowMajor(rows))
        }
        other => Err(FrameError::input_type(json_kind(other), FRAME_KINDS)),
    }
}

fn parse_row(json: &serde_json::Value) -> Result<RowInput> {
    match json {
        serde_json::Value::Array(items) => Ok(RowInput::Values(
            items.iter().map(Value::from_json).collect::<Result<Vec<_>>>()?,
        )),
        serde_json::Value::Object(map) => Ok(RowInput::Pairs(
            map.iter()
                .map(|(name, v)| Ok((name.clone(), Value::from_json(v)?)))
                .collect::<Result<Vec<_>>>()?,
        )),
        other => Err(FrameError::input_type(
            format!("{} row", json_kind(other)),
            ROW_KINDS,
        )),
    }
}

impl DataFrame {
    /// Build a frame from JSON, deriving the columns from the document.
    pub fn from_json(json: &serde_json::Value) -> Result<DataFrame> {
        Ok(DataFrame::new(parse_input(json)?))
    }

    /// Build a frame from JSON under an explicit column list.
    pub fn from_json_with_schema<S: AsRef<str>>(
        json: &serde_json::Value,
        columns: &[S],
    ) -> Result<DataFrame> {
        Ok(DataFrame::with_schema(parse_input(json)?, columns))
    }

    /// Array of records, `Missing` cells omitted.
    pub fn to_json(&self) -> serde_json::Value {
        let records = self
            .iter()
            .map(|row| {
                let record: serde_json::Map<String, serde_json::Value> = row
                    .iter()
                    .filter_map(|(name, value)| Some((name.to_string(), value.to_json()?)))
                    .collect();
                serde_json::Value::Object(record)
            })
            .collect();
        serde_json::Value::Array(records)
    }
}

/// Read a frame from a JSON file.
pub fn read_json_file(path: &Path, columns: Option<&[String]>) -> Result<DataFrame> {
    let text = fs::read_to_string(path).map_err(|source| FrameError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let json: serde_json::Value = serde_json::from_str(&text)?;
    match columns {
        Some(columns) => DataFrame::from_json_with_schema(&json, columns),
        None => DataFrame::from_json(&json),
    }
}

/// Write a frame to a JSON file as an array of records.
pub fn write_json_file(df: &DataFrame, path: &Path) -> Result<()> {
    let text = serde_json::to_string_pretty(&df.to_json())?;
    fs::write(path, text).map_err(|source| FrameError::Io {
        path: path.to_path_buf(),
        source,
    })
}
