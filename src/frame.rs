use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// An ordered set of labeled columns over an ordered sequence of rows.
///
/// Every client operation returns one of these. Cells are raw JSON values
/// because the upstream mixes numbers and strings freely; non-numeric cells
/// pass through the whole pipeline untouched. Row order is the server's,
/// and a zero-row frame is an ordinary value, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataFrame {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl DataFrame {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Builds a frame from a JSON document.
    ///
    /// Accepts a single flat object (one row) or an array of flat objects
    /// (one row per object). Columns are the union of keys in first-seen
    /// order; a key absent from some object yields a null cell in that row.
    /// Any other JSON shape fails with [`Error::MalformedResponse`].
    pub fn from_json(value: &Value) -> Result<Self> {
        let objects: Vec<&Map<String, Value>> = match value {
            Value::Object(map) => vec![map],
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Object(map) => Ok(map),
                    other => Err(Error::MalformedResponse(format!(
                        "expected an array of objects, found {}",
                        json_type(other)
                    ))),
                })
                .collect::<Result<_>>()?,
            other => {
                return Err(Error::MalformedResponse(format!(
                    "expected an object or an array of objects, found {}",
                    json_type(other)
                )));
            }
        };

        let mut columns: Vec<String> = Vec::new();
        for object in &objects {
            for key in object.keys() {
                if !columns.iter().any(|column| column == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = objects
            .iter()
            .map(|object| {
                columns
                    .iter()
                    .map(|column| object.get(column).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Column labels, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in server order, one cell per column.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the frame holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by label.
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == label)
    }

    /// Cell at (row, column label), if both exist.
    pub fn cell(&self, row: usize, label: &str) -> Option<&Value> {
        let column = self.column_index(label)?;
        self.rows.get(row)?.get(column)
    }

    /// Writes the frame as CSV, header row first.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> io::Result<()> {
        let mut out = csv::WriterBuilder::new().from_writer(writer);
        out.write_record(&self.columns).map_err(io::Error::other)?;
        for row in &self.rows {
            out.write_record(row.iter().map(cell_text))
                .map_err(io::Error::other)?;
        }
        out.flush()
    }
}

/// Validated deserialization: every row must carry exactly one cell per
/// column, the invariant the indexing paths rely on.
impl<'de> Deserialize<'de> for DataFrame {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            columns: Vec<String>,
            rows: Vec<Vec<Value>>,
        }

        let raw = Raw::deserialize(deserializer)?;
        for (index, row) in raw.rows.iter().enumerate() {
            if row.len() != raw.columns.len() {
                return Err(serde::de::Error::custom(format!(
                    "row {index} has {} cells for a {}-column frame",
                    row.len(),
                    raw.columns.len()
                )));
            }
        }
        Ok(Self {
            columns: raw.columns,
            rows: raw.rows,
        })
    }
}

/// Plain-text rendering with space-aligned columns, the closest thing a
/// terminal gets to printing the source library's frames.
impl fmt::Display for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();

        let mut widths: Vec<usize> = self
            .columns
            .iter()
            .map(|column| column.chars().count())
            .collect();
        for row in &rendered {
            for (index, cell) in row.iter().enumerate() {
                widths[index] = widths[index].max(cell.chars().count());
            }
        }

        write_row(f, self.columns.iter().map(String::as_str), &widths)?;
        for row in &rendered {
            write_row(f, row.iter().map(String::as_str), &widths)?;
        }
        Ok(())
    }
}

fn write_row<'a>(
    f: &mut fmt::Formatter<'_>,
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize],
) -> fmt::Result {
    let last = widths.len().saturating_sub(1);
    for (index, cell) in cells.enumerate() {
        if index > 0 {
            write!(f, "  ")?;
        }
        if index < last {
            write!(f, "{:<width$}", cell, width = widths[index])?;
        } else {
            write!(f, "{cell}")?;
        }
    }
    writeln!(f)
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Rounds to `decimals` places with ties to even, the IEEE-754 default.
pub(crate) fn round_half_even(value: f64, decimals: u8) -> f64 {
    let factor = 10f64.powi(i32::from(decimals));
    (value * factor).round_ties_even() / factor
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_object_becomes_one_row() {
        let frame = DataFrame::from_json(&json!({"name": "Paradise", "elevation": 5120})).unwrap();
        assert_eq!(frame.columns(), ["name", "elevation"]);
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.cell(0, "elevation"), Some(&json!(5120)));
    }

    #[test]
    fn array_columns_are_union_in_first_seen_order() {
        let frame = DataFrame::from_json(&json!([
            {"a": 1, "b": 2},
            {"b": 3, "c": 4},
        ]))
        .unwrap();
        assert_eq!(frame.columns(), ["a", "b", "c"]);
        assert_eq!(frame.rows()[0], vec![json!(1), json!(2), Value::Null]);
        assert_eq!(frame.rows()[1], vec![Value::Null, json!(3), json!(4)]);
    }

    #[test]
    fn column_order_follows_the_document_not_the_alphabet() {
        let frame = DataFrame::from_json(&json!([
            {"name": "Paradise", "elevation": 5120, "id": "679:WA:SNTL"},
            {"name": "Ghost Ridge", "elevation": 4200, "id": "680:WA:SNTL", "active": true},
        ]))
        .unwrap();
        assert_eq!(frame.columns(), ["name", "elevation", "id", "active"]);
    }

    #[test]
    fn empty_array_is_an_empty_frame() {
        let frame = DataFrame::from_json(&json!([])).unwrap();
        assert!(frame.is_empty());
        assert!(frame.columns().is_empty());
    }

    #[test]
    fn scalar_input_is_malformed() {
        let err = DataFrame::from_json(&json!(42)).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn array_of_scalars_is_malformed() {
        let err = DataFrame::from_json(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn rounding_is_half_to_even() {
        assert_eq!(round_half_even(0.125, 2), 0.12);
        assert_eq!(round_half_even(0.375, 2), 0.38);
        assert_eq!(round_half_even(2.5, 0), 2.0);
        assert_eq!(round_half_even(-121.5678, 2), -121.57);
    }

    #[test]
    fn csv_output_has_header_then_rows() {
        let frame = DataFrame::new(
            vec!["Name".to_string(), "Elevation".to_string()],
            vec![
                vec![json!("Paradise"), json!(5120)],
                vec![json!("Ghost Ridge"), Value::Null],
            ],
        );
        let mut buffer = Vec::new();
        frame.write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "Name,Elevation\nParadise,5120\nGhost Ridge,\n");
    }

    #[test]
    fn display_aligns_columns() {
        let frame = DataFrame::new(
            vec!["Name".to_string(), "Elevation".to_string()],
            vec![vec![json!("Paradise"), json!(5120)]],
        );
        let text = frame.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name      Elevation");
        assert_eq!(lines[1], "Paradise  5120");
    }

    #[test]
    fn deserialization_rejects_ragged_rows() {
        let err = serde_json::from_str::<DataFrame>(
            r#"{"columns":["Name"],"rows":[["Paradise",5120]]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("cells"));
    }

    #[test]
    fn serialization_round_trips() {
        let frame = DataFrame::new(
            vec!["Name".to_string(), "Elevation".to_string()],
            vec![vec![json!("Paradise"), json!(5120)]],
        );
        let text = serde_json::to_string(&frame).unwrap();
        let back: DataFrame = serde_json::from_str(&text).unwrap();
        assert_eq!(back, frame);
    }
}
