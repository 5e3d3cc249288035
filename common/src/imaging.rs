//! Image decoding for the form's image slots

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{DynamicImage, ImageReader};
use tracing::warn;

use crate::error::{Error, Result};
use crate::types::ImageRef;

/// Decoded RGBA bitmap, ready for a texture upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Bitmap {
    pub fn size(&self) -> [usize; 2] {
        [self.width as usize, self.height as usize]
    }
}

/// Decode `image`, scaled down to fit `max_edge` on its longest side.
///
/// Relative paths are tried against `base_dir` (the document's folder)
/// before being used as given.
pub fn decode(image: &ImageRef, base_dir: Option<&Path>, max_edge: u32) -> Result<Bitmap> {
    let decoded = match image {
        ImageRef::Path(path) => open_path(&resolve_path(path, base_dir))?,
        ImageRef::Inline(inline) => decode_inline(&inline.data)?,
        ImageRef::Unrecognized(_) => return Err(Error::UnrecognizedImage),
    };
    let fitted = if decoded.width() > max_edge || decoded.height() > max_edge {
        decoded.thumbnail(max_edge, max_edge)
    } else {
        decoded
    };
    let rgba = fitted.to_rgba8();
    Ok(Bitmap {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

/// Same as [`decode`], logging the failure; front ends draw a placeholder on `Err`.
pub fn decode_or_warn(
    image: &ImageRef,
    base_dir: Option<&Path>,
    max_edge: u32,
) -> std::result::Result<Bitmap, String> {
    decode(image, base_dir, max_edge).map_err(|err| {
        warn!(error = %err, "image not rendered");
        err.to_string()
    })
}

pub fn resolve_path(path: &str, base_dir: Option<&Path>) -> PathBuf {
    let path = Path::new(path);
    if path.is_relative() {
        if let Some(base) = base_dir {
            let joined = base.join(path);
            if joined.exists() {
                return joined;
            }
        }
    }
    path.to_path_buf()
}

fn open_path(path: &Path) -> Result<DynamicImage> {
    let reader = ImageReader::open(path)
        .map_err(|e| Error::Image(format!("{}: {e}", path.display())))?
        .with_guessed_format()
        .map_err(|e| Error::Image(format!("{}: {e}", path.display())))?;
    Ok(reader.decode()?)
}

fn decode_inline(data: &str) -> Result<DynamicImage> {
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;
    Ok(image::load_from_memory(&bytes)?)
}
