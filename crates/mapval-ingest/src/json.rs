//! JSON and native document ingestion.

use std::io::Read;

use mapval_core::{Document, Payload, Provenance, Value};

use crate::error::IngestError;

/// Decode a JSON object body. Numbers arrive as `float64`.
pub fn load_json(bytes: &[u8]) -> Result<Payload, IngestError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(IngestError::NoData);
    }
    let json: serde_json::Value = serde_json::from_slice(bytes).map_err(|err| {
        tracing::debug!(error = %err, "rejected json body");
        IngestError::InvalidJson
    })?;
    match Value::decode_json(json) {
        Value::Object(document) => Ok(Payload::new(document, Provenance::Decoded)),
        other => {
            tracing::debug!(kind = %other.kind(), "json body is not an object");
            Err(IngestError::InvalidJson)
        }
    }
}

/// Read `reader` to the end and decode it with [`load_json`].
pub fn load_json_reader<R: Read>(mut reader: R) -> Result<Payload, IngestError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    load_json(&bytes)
}

/// Wrap a document built in code.
pub fn load_map(document: Document) -> Payload {
    Payload::native(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapval_core::Number;

    #[test]
    fn test_empty_and_malformed_are_distinct() {
        assert!(matches!(load_json(b""), Err(IngestError::NoData)));
        assert!(matches!(load_json(b"  \n"), Err(IngestError::NoData)));
        assert!(matches!(load_json(b"{\"a\":"), Err(IngestError::InvalidJson)));
        assert!(matches!(load_json(b"[1, 2]"), Err(IngestError::InvalidJson)));
        assert_eq!(load_json(b"{").unwrap_err().to_string(), "is not valid json");
        assert_eq!(load_json(b"").unwrap_err().to_string(), "no data");
    }

    #[test]
    fn test_json_numbers_are_decoded() {
        let payload = load_json(br#"{"port": 80, "name": "x"}"#).unwrap();
        assert_eq!(payload.provenance, Provenance::Decoded);
        assert_eq!(payload.document["port"], Value::Number(Number::Float64(80.0)));
    }

    #[test]
    fn test_reader() {
        let payload = load_json_reader(&b"{\"a\": true}"[..]).unwrap();
        assert_eq!(payload.document["a"], Value::Bool(true));
    }
}
