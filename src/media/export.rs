/// Saving result images (masks, enhanced scans) to disk
use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::service::ProcessError;
use crate::state::ResultImage;

/// Suggested file name, e.g. `mask-20261019-140322.png`
pub fn default_export_name(prefix: &str, received_at: DateTime<Local>) -> String {
    format!("{}-{}.png", prefix, received_at.format("%Y%m%d-%H%M%S"))
}

/// Write `image` as PNG to `path`
pub async fn export_png(image: ResultImage, path: PathBuf) -> Result<PathBuf, ProcessError> {
    // PNG re-encoding is CPU-bound
    tokio::task::spawn_blocking(move || export_png_blocking(&image, path))
        .await
        .map_err(|e| ProcessError::Io(format!("Task join error: {}", e)))?
}

fn export_png_blocking(image: &ResultImage, path: PathBuf) -> Result<PathBuf, ProcessError> {
    let png = image.to_png()?;
    std::fs::write(&path, png)?;

    log::info!("💾 Exported {}x{} image to {}", image.width, image.height, path.display());
    Ok(path)
}
