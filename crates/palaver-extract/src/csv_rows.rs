use serde_json::{Map, Value};

use crate::error::ExtractError;
use crate::text;

/// Rows as a pretty-printed JSON array of objects keyed by the header row.
/// Short rows only carry the columns they have.
pub(crate) fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    let (text, _) = text::decode_text(bytes)?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), Value::String(v.to_string())))
            .collect();
        rows.push(Value::Object(row));
    }

    serde_json::to_string_pretty(&rows).map_err(|e| ExtractError::Csv(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_keep_header_order() {
        let json = extract(b"name,age\nalice,30\nbob,41\n").unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                { "name": "alice", "age": "30" },
                { "name": "bob", "age": "41" }
            ])
        );
        assert!(json.find("\"name\"").unwrap() < json.find("\"age\"").unwrap());
    }

    #[test]
    fn ragged_rows_are_tolerated() {
        let json = extract(b"a,b,c\n1\n1,2,3,4\n").unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0], serde_json::json!({ "a": "1" }));
        assert_eq!(value[1], serde_json::json!({ "a": "1", "b": "2", "c": "3" }));
    }

    #[test]
    fn header_only_is_empty_array() {
        let value: Value = serde_json::from_str(&extract(b"a,b\n").unwrap()).unwrap();
        assert_eq!(value, serde_json::json!([]));
    }
}
