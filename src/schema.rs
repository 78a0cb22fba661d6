use serde_json::Value;

use crate::error::{Error, Result};
use crate::frame::{DataFrame, round_half_even};

/// One output column: the wire field that feeds it, the label it carries,
/// and an optional display rounding (decimal places, ties to even).
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub field: &'static str,
    pub label: &'static str,
    pub round: Option<u8>,
}

/// An ordered list of output columns applied to a normalized frame.
///
/// Selection is by field name: wire fields that no entry names are
/// ignored (the upstream carries at least one extraneous field per
/// endpoint), so additions on the server side cannot shift columns. A
/// named field missing from a non-empty frame is a schema mismatch, the
/// signal that the upstream contract changed.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    columns: &'static [Column],
}

impl Schema {
    pub const fn new(columns: &'static [Column]) -> Self {
        Self { columns }
    }

    /// Columns consumed from `GET /closest_stations`. Distance and the
    /// coordinates are display-rounded; elevation is served as-is.
    pub const CLOSEST_STATIONS: Schema = Schema::new(&[
        Column { field: "distance", label: "Distance (miles)", round: Some(2) },
        Column { field: "elevation", label: "Elevation (ft)", round: None },
        Column { field: "lat", label: "Lat", round: Some(2) },
        Column { field: "lng", label: "Lng", round: Some(2) },
        Column { field: "name", label: "Name", round: None },
        Column { field: "timezone", label: "Timezone", round: None },
        Column { field: "id", label: "Triplet", round: None },
    ]);

    /// Columns consumed from `GET /stations`.
    pub const ALL_STATIONS: Schema = Schema::new(&[
        Column { field: "elevation", label: "Elevation", round: None },
        Column { field: "name", label: "Name", round: None },
        Column { field: "timezone", label: "Timezone", round: None },
        Column { field: "id", label: "Triplet", round: None },
        Column { field: "lat", label: "Lat", round: Some(2) },
        Column { field: "lng", label: "Lng", round: Some(2) },
    ]);

    /// Columns consumed from the `"data"` array of `GET /station/{triplet}`.
    ///
    /// The upstream already serves display-shaped labels ("farenheit"
    /// spelling included), so the mapping is the identity and exists to pin
    /// the wire contract.
    pub const OBSERVATIONS: Schema = Schema::new(&[
        Column { field: "Date", label: "Date", round: None },
        Column {
            field: "Snow Water Equivalent (in)",
            label: "Snow Water Equivalent (in)",
            round: None,
        },
        Column {
            field: "Change In Snow Water Equivalent (in)",
            label: "Change In Snow Water Equivalent (in)",
            round: None,
        },
        Column { field: "Snow Depth (in)", label: "Snow Depth (in)", round: None },
        Column {
            field: "Change In Snow Depth (in)",
            label: "Change In Snow Depth (in)",
            round: None,
        },
        Column {
            field: "Observed Air Temperature (degrees farenheit)",
            label: "Observed Air Temperature (degrees farenheit)",
            round: None,
        },
    ]);

    /// Output labels, in order.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|column| column.label)
    }

    /// Applies the schema: select named fields, relabel, round.
    ///
    /// The output has the same row count and exactly this schema's labels
    /// in schema order. Rounding touches numeric cells only; everything
    /// else passes through unchanged. A zero-row input yields the labeled
    /// empty frame without validation, since there is nothing to misread.
    pub fn apply(&self, frame: &DataFrame) -> Result<DataFrame> {
        let labels: Vec<String> = self.labels().map(str::to_string).collect();
        if frame.is_empty() {
            return Ok(DataFrame::new(labels, Vec::new()));
        }

        let indices = self
            .columns
            .iter()
            .map(|column| {
                frame.column_index(column.field).ok_or_else(|| {
                    Error::SchemaMismatch(format!("missing field `{}` in response", column.field))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let rows = frame
            .rows()
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(&indices)
                    .map(|(column, &index)| shape_cell(&row[index], column.round))
                    .collect()
            })
            .collect();

        Ok(DataFrame::new(labels, rows))
    }
}

fn shape_cell(cell: &Value, round: Option<u8>) -> Value {
    match (round, cell.as_f64()) {
        (Some(decimals), Some(number)) => Value::from(round_half_even(number, decimals)),
        _ => cell.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SHAPE: Schema = Schema::new(&[
        Column { field: "lat", label: "Lat", round: Some(2) },
        Column { field: "name", label: "Name", round: None },
        Column { field: "elevation", label: "Elevation", round: None },
    ]);

    #[test]
    fn selects_relabels_and_rounds_in_schema_order() {
        let frame = DataFrame::from_json(&json!([
            {"name": "X", "lat": 47.1234, "elevation": 5000.456, "wind": false},
        ]))
        .unwrap();
        let shaped = SHAPE.apply(&frame).unwrap();
        assert_eq!(shaped.columns(), ["Lat", "Name", "Elevation"]);
        assert_eq!(shaped.cell(0, "Lat"), Some(&json!(47.12)));
        // Elevation has no rounding entry and must keep full precision.
        assert_eq!(shaped.cell(0, "Elevation"), Some(&json!(5000.456)));
        assert_eq!(shaped.column_index("wind"), None);
    }

    #[test]
    fn missing_named_field_is_a_schema_mismatch() {
        let frame = DataFrame::from_json(&json!([{"name": "X", "elevation": 1.0}])).unwrap();
        let err = SHAPE.apply(&frame).unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch(_)));
    }

    #[test]
    fn non_numeric_cells_pass_through_rounding() {
        let frame = DataFrame::from_json(&json!([
            {"lat": "n/a", "name": "X", "elevation": 1.0},
        ]))
        .unwrap();
        let shaped = SHAPE.apply(&frame).unwrap();
        assert_eq!(shaped.cell(0, "Lat"), Some(&json!("n/a")));
    }

    #[test]
    fn empty_frame_keeps_the_labels() {
        let shaped = SHAPE.apply(&DataFrame::from_json(&json!([])).unwrap()).unwrap();
        assert!(shaped.is_empty());
        assert_eq!(shaped.columns(), ["Lat", "Name", "Elevation"]);
    }

    #[test]
    fn observation_schema_matches_wire_labels() {
        let labels: Vec<&str> = Schema::OBSERVATIONS.labels().collect();
        assert_eq!(
            labels,
            [
                "Date",
                "Snow Water Equivalent (in)",
                "Change In Snow Water Equivalent (in)",
                "Snow Depth (in)",
                "Change In Snow Depth (in)",
                "Observed Air Temperature (degrees farenheit)",
            ]
        );
    }
}
