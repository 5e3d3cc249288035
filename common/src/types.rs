//! Record model
//!
//! One JSON object per record:
//! - `identifier` / `results`: values produced upstream (required)
//! - `confirmed_identifier` / `confirmed_results`: human-reviewed overrides
//! - `identifier_image` / `result_image`: a path or `{ "data": <base64> }`
//!
//! Unknown keys are kept in `extra` so a save never drops them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub identifier: String,

    pub results: Vec<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_identifier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_results: Option<Vec<i64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier_image: Option<ImageRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_image: Option<ImageRef>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    pub fn new(identifier: impl Into<String>, results: Vec<i64>) -> Self {
        Self {
            identifier: identifier.into(),
            results,
            confirmed_identifier: None,
            confirmed_results: None,
            identifier_image: None,
            result_image: None,
            extra: Map::new(),
        }
    }

    /// Confirmed identifier, falling back to the raw one.
    pub fn confirmed_identifier_or_identifier(&self) -> &str {
        self.confirmed_identifier.as_deref().unwrap_or(&self.identifier)
    }

    /// Confirmed results, falling back to the raw ones.
    pub fn confirmed_results_or_results(&self) -> &[i64] {
        self.confirmed_results.as_deref().unwrap_or(&self.results)
    }

    /// Store both confirmed values. The raw fields are never touched.
    pub fn confirm(&mut self, identifier: String, results: Vec<i64>) {
        self.confirmed_identifier = Some(identifier);
        self.confirmed_results = Some(results);
    }
}

/// Image reference as stored in the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    /// Filesystem path, relative paths resolved against the document's folder
    Path(String),
    /// Inline base64 bytes
    Inline(InlineImage),
    /// Anything else; kept so it round-trips, rendered as a placeholder
    Unrecognized(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineImage {
    pub data: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageRef {
    /// Empty values (`""`, `{}`, `null`, ...) mean "no image".
    pub fn is_empty(&self) -> bool {
        match self {
            ImageRef::Path(path) => path.is_empty(),
            ImageRef::Inline(_) => false,
            ImageRef::Unrecognized(value) => match value {
                Value::Null => true,
                Value::Bool(b) => !b,
                Value::Number(n) => n.as_f64() == Some(0.0),
                Value::String(s) => s.is_empty(),
                Value::Array(a) => a.is_empty(),
                Value::Object(o) => o.is_empty(),
            },
        }
    }
}
