//! JSON export serializer.
//!
//! A pretty-printed (two-space indent) array of objects with the keys
//! `pixel_x`, `pixel_y`, `x`, `y`.

use scatterdig_pipeline::DataPoint;

use crate::ExportError;

/// Serialize points into a JSON string.
///
/// # Errors
///
/// Returns [`ExportError::Json`] if serialization fails.
pub fn to_json(points: &[DataPoint]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(points)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn objects_use_export_keys() {
        let json = to_json(&[DataPoint {
            pixel_x: 120,
            pixel_y: 340,
            data_x: 2.5,
            data_y: 7.0,
        }])
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let obj = value[0].as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["pixel_x", "pixel_y", "x", "y"]);
        assert_eq!(value[0]["pixel_x"], 120);
        assert_eq!(value[0]["y"], 7.0);
    }

    #[test]
    fn output_is_indented() {
        let json = to_json(&[DataPoint {
            pixel_x: 1,
            pixel_y: 2,
            data_x: 0.5,
            data_y: 1.0,
        }])
        .unwrap();
        assert!(json.contains("\n  {\n    \"pixel_x\": 1,"), "{json}");
    }

    #[test]
    fn empty_set_is_empty_array() {
        assert_eq!(to_json(&[]).unwrap(), "[]");
    }
}
