//! Writing returned image payloads to disk.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use thiserror::Error;

use crate::gemini::InlineData;

/// Base name of the cover pattern file.
pub const COVER_BASENAME: &str = "cover_pattern";
/// Prefix of each page illustration file; the zero-based page index follows.
pub const PAGE_IMAGE_PREFIX: &str = "temp_image_";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("image payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// File extension from the media type's subtype (`image/png` → `png`).
pub fn extension_for(mime_type: &str) -> &str {
    mime_type
        .rsplit('/')
        .next()
        .map(str::trim)
        .filter(|ext| !ext.is_empty())
        .unwrap_or("png")
}

pub fn cover_path(dir: &Path, mime_type: &str) -> PathBuf {
    dir.join(format!("{COVER_BASENAME}.{}", extension_for(mime_type)))
}

pub fn page_image_path(dir: &Path, index: usize, mime_type: &str) -> PathBuf {
    dir.join(format!("{PAGE_IMAGE_PREFIX}{index}.{}", extension_for(mime_type)))
}

/// Decodes `image` and writes it to `path`, returning the path on success.
pub async fn save_inline_image(image: &InlineData, path: PathBuf) -> Result<PathBuf, AssetError> {
    let bytes = BASE64.decode(image.data.as_bytes())?;
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|source| AssetError::Write {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}
