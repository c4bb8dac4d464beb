//! Reply parsing: the oracle's free text → a complete field map.
//!
//! ## Why the cleanup pass?
//!
//! Even when the prompt says "respond with ONLY valid JSON", models
//! occasionally wrap the reply in ```` ```json ```` fences or pad it with
//! whitespace. Stripping those artefacts before the strict parse recovers
//! the common failure mode without loosening the parser itself.
//!
//! ## Degrade-to-empty
//!
//! A reply that still is not valid JSON is logged verbatim at `warn` (the
//! operator's only window into a misbehaving oracle) and yields every
//! expected key mapped to the empty sentinel. One malformed reply must
//! never fail the request: the caller gets an honest all-`false`
//! confidence map instead, and a human fills the fields in.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::warn;

/// Parse an oracle reply against the expected key set.
///
/// Every key in `expected` is present in the output, mapped to the
/// (trimmed) string value from the reply or to `""` when the key is
/// absent, non-string, or the whole reply is unparseable.
pub fn parse_fields(reply: &str, expected: &[&str]) -> BTreeMap<String, String> {
    let cleaned = strip_fences(reply);

    let object = match serde_json::from_str::<serde_json::Map<String, Value>>(&cleaned) {
        Ok(object) => object,
        Err(error) => {
            warn!(%error, reply = %cleaned, "oracle reply is not valid JSON, degrading to empty fields");
            return empty_fields(expected);
        }
    };

    expected
        .iter()
        .map(|&key| {
            let value = object
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or_default();
            (key.to_string(), value.to_string())
        })
        .collect()
}

/// Every expected key mapped to the empty sentinel.
pub fn empty_fields(expected: &[&str]) -> BTreeMap<String, String> {
    expected
        .iter()
        .map(|&key| (key.to_string(), String::new()))
        .collect()
}

/// Remove markdown code-fence markers anywhere in the reply.
///
/// Both the language-tagged and bare forms, wherever they appear — models
/// have been seen fencing mid-reply, not just at the edges.
fn strip_fences(reply: &str) -> String {
    reply
        .trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}
