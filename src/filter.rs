use crate::error::{Error, Result};
use crate::frame::DataFrame;

/// Keeps the rows whose identifier field contains `:CODE:` exactly.
///
/// The match is case-sensitive and length-exact: filtering on `AZ` keeps
/// `1:AZ:SNTL` and drops `1:AZA:SNTL`. The surviving rows are re-indexed
/// contiguously, and zero matches is a valid empty result, not an error.
/// Runs on unrounded source values, before any display schema.
pub(crate) fn filter_by_region(frame: &DataFrame, field: &str, code: &str) -> Result<DataFrame> {
    if frame.is_empty() {
        return Ok(frame.clone());
    }

    let index = frame
        .column_index(field)
        .ok_or_else(|| Error::SchemaMismatch(format!("missing field `{field}` in response")))?;

    let needle = format!(":{code}:");
    let mut rows = Vec::new();
    for row in frame.rows() {
        let identifier = row[index].as_str().ok_or_else(|| {
            Error::SchemaMismatch(format!("field `{field}` is not a string"))
        })?;
        if identifier.contains(&needle) {
            rows.push(row.clone());
        }
    }

    Ok(DataFrame::new(frame.columns().to_vec(), rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stations() -> DataFrame {
        DataFrame::from_json(&json!([
            {"id": "1:AZ:SNTL", "elevation": 100},
            {"id": "1:AZA:SNTL", "elevation": 200},
            {"id": "2:WA:SNTL", "elevation": 300},
        ]))
        .unwrap()
    }

    #[test]
    fn match_is_exact_length() {
        let kept = filter_by_region(&stations(), "id", "AZ").unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.cell(0, "id"), Some(&json!("1:AZ:SNTL")));
    }

    #[test]
    fn no_match_is_an_empty_frame_with_columns() {
        let kept = filter_by_region(&stations(), "id", "CO").unwrap();
        assert!(kept.is_empty());
        assert_eq!(kept.columns(), ["id", "elevation"]);
    }

    #[test]
    fn match_is_case_sensitive() {
        let kept = filter_by_region(&stations(), "id", "az").unwrap();
        assert!(kept.is_empty());
    }

    #[test]
    fn missing_identifier_column_is_a_schema_mismatch() {
        let frame = DataFrame::from_json(&json!([{"elevation": 100}])).unwrap();
        let err = filter_by_region(&frame, "id", "AZ").unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch(_)));
    }

    #[test]
    fn non_string_identifier_is_a_schema_mismatch() {
        let frame = DataFrame::from_json(&json!([{"id": 17}])).unwrap();
        let err = filter_by_region(&frame, "id", "AZ").unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch(_)));
    }
}
