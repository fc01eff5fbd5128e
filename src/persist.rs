//! Writing images to disk and probing their metadata.

use std::path::Path;

use image::GenericImageView;
use tokio::fs;
use tracing::warn;

use crate::{ImageError, ImageInfo, Result};

/// Writes `bytes` to `path`, creating parent directories as needed, and
/// returns best-effort metadata for the saved image.
///
/// Directory creation and the write itself are fatal; the metadata probe is
/// not — a probe failure is logged and leaves the corresponding `ImageInfo`
/// fields empty.
pub async fn persist(bytes: &[u8], path: &Path) -> Result<ImageInfo> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(ImageError::Persist)?;
    }
    fs::write(path, bytes).await.map_err(ImageError::Persist)?;

    Ok(probe(bytes, path).await)
}

async fn probe(bytes: &[u8], path: &Path) -> ImageInfo {
    let mut info = ImageInfo::default();

    match image::load_from_memory(bytes) {
        Ok(img) => {
            let (width, height) = img.dimensions();
            info.width = Some(width);
            info.height = Some(height);
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not probe image dimensions");
        }
    }

    match image::guess_format(bytes) {
        Ok(format) => {
            info.format = format.extensions_str().first().map(|ext| ext.to_string());
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not probe image format");
        }
    }

    match fs::metadata(path).await {
        Ok(meta) => info.size = Some(meta.len()),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not stat saved image");
        }
    }

    info
}
