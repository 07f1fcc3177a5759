use serde_json::{Map, Value};

use super::ConvertError;
use crate::media::TEXT_CSV;

/// Read CSV with a header row into a JSON array with one object per record.
/// Values stay strings; no type inference is attempted.
pub fn to_json(data: &[u8]) -> Result<Vec<u8>, ConvertError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(data);
    let headers = reader
        .headers()
        .map_err(|e| ConvertError::malformed(TEXT_CSV, e))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ConvertError::malformed(TEXT_CSV, e))?;
        let row: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
            .collect();
        rows.push(Value::Object(row));
    }

    serde_json::to_vec(&Value::Array(rows)).map_err(|e| ConvertError::malformed(TEXT_CSV, e))
}
