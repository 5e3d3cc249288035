//! Form projection of one record
//!
//! Front ends draw a `RecordForm` and hand back the two edited strings.

use crate::error::{Error, Result};
use crate::types::{ImageRef, Record};

/// Image area of the form
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSlot {
    Absent,
    Present(ImageRef),
}

impl ImageSlot {
    fn from_field(field: Option<&ImageRef>) -> Self {
        match field {
            Some(image) if !image.is_empty() => ImageSlot::Present(image.clone()),
            _ => ImageSlot::Absent,
        }
    }

    pub fn image(&self) -> Option<&ImageRef> {
        match self {
            ImageSlot::Absent => None,
            ImageSlot::Present(image) => Some(image),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordForm {
    pub index: usize,
    pub total: usize,
    /// read-only
    pub identifier: String,
    /// editable, seeded from the confirmed value or the raw one
    pub confirmed_identifier: String,
    pub identifier_image: ImageSlot,
    /// read-only, list form: `[1, 2]`
    pub results: String,
    /// editable, comma separated: `1, 2`
    pub confirmed_results: String,
    pub result_image: ImageSlot,
}

impl RecordForm {
    pub fn from_record(index: usize, total: usize, record: &Record) -> Self {
        Self {
            index,
            total,
            identifier: record.identifier.clone(),
            confirmed_identifier: record.confirmed_identifier_or_identifier().to_string(),
            identifier_image: ImageSlot::from_field(record.identifier_image.as_ref()),
            results: format_results_list(&record.results),
            confirmed_results: join_results(record.confirmed_results_or_results()),
            result_image: ImageSlot::from_field(record.result_image.as_ref()),
        }
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.total
    }
}

/// `[1, 2, 3]`
pub fn format_results_list(results: &[i64]) -> String {
    format!("[{}]", join_results(results))
}

/// `1, 2, 3`
pub fn join_results(results: &[i64]) -> String {
    results
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse the confirmed-results field: integers separated by commas.
///
/// Every part is trimmed; an empty part is rejected like any other
/// non-integer, so `""` and `"1,,2"` fail.
pub fn parse_confirmed_results(text: &str) -> Result<Vec<i64>> {
    text.split(',')
        .map(|part| {
            let token = part.trim();
            token.parse::<i64>().map_err(|_| Error::Validation {
                token: token.to_string(),
            })
        })
        .collect()
}
