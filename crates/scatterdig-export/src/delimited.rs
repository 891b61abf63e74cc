//! CSV export serializer.
//!
//! One header row (`pixel_x,pixel_y,x,y`) followed by one row per
//! point, in input order. Data values keep their 0.5 granularity and
//! always carry a decimal point (`5.0`, not `5`).
//!
//! This is a pure function with no I/O -- it returns a `String`.

use scatterdig_pipeline::DataPoint;

use crate::ExportError;

const HEADER: [&str; 4] = ["pixel_x", "pixel_y", "x", "y"];

/// Serialize points into a CSV string.
///
/// An empty point set still produces the header row.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] if the writer fails.
pub fn to_csv(points: &[DataPoint]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(HEADER)?;
    for point in points {
        writer.serialize(point)?;
    }
    let bytes = writer.into_inner().map_err(|e| ExportError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}
