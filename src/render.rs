//! Plain-text rendering of a record form

use std::fmt::Write as _;
use std::path::Path;

use record_confirm_common::imaging::decode_or_warn;
use record_confirm_common::{ImageSlot, RecordForm};

pub fn render_form(form: &RecordForm, base_dir: Option<&Path>, max_image_edge: u32) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Record {}/{}", form.index + 1, form.total);
    let _ = writeln!(out, "  Identifier:           {}", form.identifier);
    let _ = writeln!(out, "  Confirmed identifier: {}", form.confirmed_identifier);
    let _ = writeln!(
        out,
        "  Identifier image:     {}",
        describe_image(&form.identifier_image, base_dir, max_image_edge)
    );
    let _ = writeln!(out, "  Results:              {}", form.results);
    let _ = writeln!(out, "  Confirmed results:    {}", form.confirmed_results);
    let _ = write!(
        out,
        "  Result image:         {}",
        describe_image(&form.result_image, base_dir, max_image_edge)
    );
    out
}

fn describe_image(slot: &ImageSlot, base_dir: Option<&Path>, max_edge: u32) -> String {
    let Some(image) = slot.image() else {
        return "-".to_string();
    };
    match decode_or_warn(image, base_dir, max_edge) {
        Ok(bitmap) => format!("[{}x{}]", bitmap.width, bitmap.height),
        Err(reason) => format!("[unavailable: {reason}]"),
    }
}
