use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Sentinel emitted by capture tooling when a field's location was detected
/// but its content could not be read. Never treated as content.
pub const PLACEHOLDER: &str = "[bbox_present]";

/// Canonical field names the rule catalog consumes.
pub mod keys {
    pub const DOCUMENT_NUMBER: &str = "document_number";
    pub const PRIMARY_IDENTIFIER: &str = "primary_identifier";
    pub const SECONDARY_IDENTIFIER: &str = "secondary_identifier";
    pub const DATE_OF_BIRTH: &str = "date_of_birth";
    pub const DATE_OF_EXPIRY: &str = "date_of_expiry";
    pub const SEX: &str = "sex";
    pub const NATIONALITY: &str = "nationality";
    pub const ISSUING_COUNTRY: &str = "issuing_country";
    pub const MRZ_UPPER_LINE: &str = "mrz_upper_line";
    pub const MRZ_LOWER_LINE: &str = "mrz_lower_line";
}

/// One extracted field as OCR collaborators emit it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<[f32; 4]>,
}

/// Field name to raw text map that every rule reads from.
///
/// Lookups through [`FieldSet::value`] hide blank values and the
/// [`PLACEHOLDER`] sentinel, so rules uniformly see such fields as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSet(BTreeMap<String, String>);

impl FieldSet {
    pub fn new() -> FieldSet {
        FieldSet::default()
    }

    pub fn from_map(map: BTreeMap<String, String>) -> FieldSet {
        FieldSet(map)
    }

    pub fn from_extracted(fields: &[ExtractedField]) -> FieldSet {
        FieldSet(
            fields
                .iter()
                .map(|field| (field.name.clone(), field.value.clone()))
                .collect(),
        )
    }

    /// Accept any of the capture payload shapes collaborators send: a list
    /// of extracted fields under `fields`, a name/value object under
    /// `extracted_fields`, or a plain name/value object. Anything else
    /// screens as an empty capture.
    pub fn from_json(value: &Value) -> FieldSet {
        let Some(object) = value.as_object() else {
            return FieldSet::new();
        };

        if let Some(list) = object.get("fields").and_then(Value::as_array) {
            let mut set = FieldSet::new();
            for entry in list {
                let name = entry.get("name").and_then(Value::as_str);
                let value = entry.get("value").and_then(Value::as_str);
                if let (Some(name), Some(value)) = (name, value) {
                    set.insert(name, value);
                }
            }
            return set;
        }

        let plain = match object.get("extracted_fields").and_then(Value::as_object) {
            Some(inner) => inner,
            None => object,
        };

        let mut set = FieldSet::new();
        for (name, value) in plain {
            if let Some(text) = value.as_str() {
                set.insert(name, text);
            }
        }
        set
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.0.insert(name.to_string(), value.to_string());
    }

    /// Trimmed content of a field. `None` when the field is absent, blank,
    /// or holds the placeholder sentinel.
    pub fn value(&self, name: &str) -> Option<&str> {
        let trimmed = self.0.get(name)?.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(PLACEHOLDER) {
            return None;
        }
        Some(trimmed)
    }

    /// Stored text as-is, placeholder included.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
