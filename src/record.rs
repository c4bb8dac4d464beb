//! Extracted-record types returned by the service.
//!
//! Every field is a `String` with empty string as the sentinel for "not
//! found" — never null, never an absent key. The API contract is that a
//! caller can always index all five keys.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The four fields extracted from a solicitor's letter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolicitorRecord {
    /// Case reference, e.g. `806964.001/CGN/CD`.
    pub solicitor_ref: String,
    /// Claimant's full name including middle names.
    pub name: String,
    /// Full postal address including postcode.
    pub address: String,
    /// Date of birth, canonical form `DD/MM/YYYY`.
    pub dob: String,
}

impl SolicitorRecord {
    /// The JSON keys the oracle is contracted to return for a letter.
    pub const FIELDS: [&'static str; 4] = ["solicitor_ref", "name", "address", "dob"];

    /// Build a record from a parsed field map, defaulting absent keys to
    /// the empty sentinel.
    pub fn from_fields(fields: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| fields.get(key).cloned().unwrap_or_default();
        Self {
            solicitor_ref: get("solicitor_ref"),
            name: get("name"),
            address: get("address"),
            dob: get("dob"),
        }
    }
}

/// The single field extracted from an audiogram.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudiogramRecord {
    /// Hearing-test date, canonical form `DD/MM/YY`.
    pub audiogram_date: String,
}

impl AudiogramRecord {
    /// The JSON key the oracle is contracted to return for an audiogram.
    pub const FIELDS: [&'static str; 1] = ["audiogram_date"];

    pub fn from_fields(fields: &BTreeMap<String, String>) -> Self {
        Self {
            audiogram_date: fields.get("audiogram_date").cloned().unwrap_or_default(),
        }
    }
}

/// Per-field non-emptiness flags.
///
/// Not a certainty score: `true` means only "the oracle returned something
/// for this field", nothing about whether it is correct. Kept because the
/// reviewing UI uses it to highlight fields that need manual entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfidence {
    pub solicitor_ref: bool,
    pub name: bool,
    pub address: bool,
    pub dob: bool,
    pub audiogram_date: bool,
}

/// The combined five-field result of one extraction request.
///
/// Field declaration order is the wire order: the four letter fields, the
/// audiogram date, then the confidence map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedResult {
    pub solicitor_ref: String,
    pub name: String,
    pub address: String,
    pub dob: String,
    pub audiogram_date: String,
    pub confidence: FieldConfidence,
}

impl CombinedResult {
    /// Merge the two per-document records, deriving the confidence map.
    pub fn combine(letter: SolicitorRecord, audiogram: AudiogramRecord) -> Self {
        let confidence = FieldConfidence {
            solicitor_ref: !letter.solicitor_ref.is_empty(),
            name: !letter.name.is_empty(),
            address: !letter.address.is_empty(),
            dob: !letter.dob.is_empty(),
            audiogram_date: !audiogram.audiogram_date.is_empty(),
        };
        Self {
            solicitor_ref: letter.solicitor_ref,
            name: letter.name,
            address: letter.address,
            dob: letter.dob,
            audiogram_date: audiogram.audiogram_date,
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn solicitor_record_from_complete_fields() {
        let record = SolicitorRecord::from_fields(&fields(&[
            ("solicitor_ref", "806964.001/CGN/CD"),
            ("name", "John William Landels Porter"),
            ("address", "59 Sandleford Lane, Greenham, Thatcham, RG198XQ"),
            ("dob", "10/03/1978"),
        ]));
        assert_eq!(record.solicitor_ref, "806964.001/CGN/CD");
        assert_eq!(record.dob, "10/03/1978");
    }

    #[test]
    fn absent_keys_default_to_empty() {
        let record = SolicitorRecord::from_fields(&fields(&[("name", "Jane Doe")]));
        assert_eq!(record.name, "Jane Doe");
        assert_eq!(record.solicitor_ref, "");
        assert_eq!(record.address, "");
        assert_eq!(record.dob, "");
    }

    #[test]
    fn confidence_tracks_non_emptiness() {
        let letter = SolicitorRecord {
            solicitor_ref: "REF/1".into(),
            name: String::new(),
            address: "1 High St".into(),
            dob: String::new(),
        };
        let audiogram = AudiogramRecord {
            audiogram_date: "24/08/25".into(),
        };
        let combined = CombinedResult::combine(letter, audiogram);
        assert!(combined.confidence.solicitor_ref);
        assert!(!combined.confidence.name);
        assert!(combined.confidence.address);
        assert!(!combined.confidence.dob);
        assert!(combined.confidence.audiogram_date);
    }

    #[test]
    fn combined_result_serialises_all_keys_when_empty() {
        let combined =
            CombinedResult::combine(SolicitorRecord::default(), AudiogramRecord::default());
        let json = serde_json::to_value(&combined).expect("serialises");
        // The API never omits a key, even for all-empty extractions.
        for key in ["solicitor_ref", "name", "address", "dob", "audiogram_date"] {
            assert_eq!(json[key], "", "key {key} must be present and empty");
            assert_eq!(json["confidence"][key], false);
        }
    }
}
