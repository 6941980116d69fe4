//! Academy logo loading.

use std::path::Path;

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use tracing::debug;

use crate::error::{Error, Result};

/// MIME type of an image file, judged by its extension.
#[must_use]
pub fn image_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// Encode image bytes as a `data:` URL.
#[must_use]
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", B64.encode(bytes))
}

/// Read an image file into a `data:` URL, refusing files over `max_bytes`.
///
/// # Errors
///
/// Returns a validation error for an unknown image type or an oversized
/// file, and an I/O error if the file cannot be read.
pub fn load_logo(path: &Path, max_bytes: u64) -> Result<String> {
    let mime = image_mime_type(path).ok_or_else(|| {
        Error::validation(
            "logo",
            format!("{} is not a png, jpeg, gif, webp, svg or bmp image", path.display()),
        )
    })?;

    let size = std::fs::metadata(path)?.len();
    if size > max_bytes {
        return Err(Error::validation(
            "logo",
            format!("image is {size} bytes, the limit is {max_bytes} bytes"),
        ));
    }

    let bytes = std::fs::read(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), mime, "Logo loaded");
    Ok(to_data_url(mime, &bytes))
}
