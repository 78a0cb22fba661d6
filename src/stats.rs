use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::frame::{DataFrame, round_half_even};

/// Output labels of [`summarize_by_region`], in order.
pub(crate) const STATS_LABELS: [&str; 4] =
    ["State", "Max Elevation", "Avg Elevation", "Station Count"];

/// Groups stations by the region code embedded in their identifier and
/// reports, per region: maximum elevation, mean elevation rounded to two
/// decimals (ties to even), and station count. One output row per region,
/// sorted ascending by code so repeated runs compare equal.
///
/// Elevations are read unrounded from the source field. An identifier
/// without a region code means the payload itself is off-contract; a
/// missing or non-numeric elevation means the schema changed.
pub(crate) fn summarize_by_region(
    frame: &DataFrame,
    id_field: &str,
    elevation_field: &str,
) -> Result<DataFrame> {
    let labels: Vec<String> = STATS_LABELS.iter().map(|label| label.to_string()).collect();
    if frame.is_empty() {
        return Ok(DataFrame::new(labels, Vec::new()));
    }

    let id_index = frame
        .column_index(id_field)
        .ok_or_else(|| Error::SchemaMismatch(format!("missing field `{id_field}` in response")))?;
    let elevation_index = frame.column_index(elevation_field).ok_or_else(|| {
        Error::SchemaMismatch(format!("missing field `{elevation_field}` in response"))
    })?;

    // BTreeMap doubles as the deterministic output order.
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for row in frame.rows() {
        let identifier = row[id_index].as_str().ok_or_else(|| {
            Error::SchemaMismatch(format!("field `{id_field}` is not a string"))
        })?;
        let region = region_code(identifier).ok_or_else(|| {
            Error::MalformedResponse(format!("no region code in identifier `{identifier}`"))
        })?;
        let elevation = row[elevation_index].as_f64().ok_or_else(|| {
            Error::SchemaMismatch(format!("field `{elevation_field}` is not numeric"))
        })?;
        groups.entry(region.to_string()).or_default().push(elevation);
    }

    let rows = groups
        .into_iter()
        .map(|(region, elevations)| {
            let max = elevations.iter().copied().fold(f64::MIN, f64::max);
            let mean = elevations.iter().sum::<f64>() / elevations.len() as f64;
            vec![
                Value::from(region),
                Value::from(max),
                Value::from(round_half_even(mean, 2)),
                Value::from(elevations.len()),
            ]
        })
        .collect();

    Ok(DataFrame::new(labels, rows))
}

/// First run of two consecutive uppercase ASCII letters in `identifier`,
/// the region-code convention of SNOTEL triplets like `1159:WA:SNTL`.
pub(crate) fn region_code(identifier: &str) -> Option<&str> {
    identifier
        .as_bytes()
        .windows(2)
        .position(|pair| pair[0].is_ascii_uppercase() && pair[1].is_ascii_uppercase())
        .map(|at| &identifier[at..at + 2])
}
