/// Loads a user-picked image file into memory
use std::path::{Path, PathBuf};

use crate::service::ProcessError;
use crate::state::SelectedImage;

/// Extensions offered by the file picker and accepted by the loader
pub const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff", "webp"];

/// MIME type for an image path, judged by extension only
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "bmp" => "image/bmp",
        "gif" => "image/gif",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        _ => return None,
    };
    Some(mime)
}

/// Read an image file for upload.
///
/// The content is not decoded here; the service decides whether it can read it.
pub async fn load_image(path: PathBuf) -> Result<SelectedImage, ProcessError> {
    let file_name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let mime = mime_for_path(&path).ok_or_else(|| ProcessError::UnsupportedFile(file_name.clone()))?;

    let bytes = tokio::fs::read(&path).await?;

    log::info!("📂 Loaded {} ({}, {} bytes)", file_name, mime, bytes.len());
    Ok(SelectedImage::new(file_name, mime, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("a/b/scan.PNG")), Some("image/png"));
        assert_eq!(mime_for_path(Path::new("scan.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_for_path(Path::new("scan.txt")), None);
        assert_eq!(mime_for_path(Path::new("scan")), None);
    }

    #[test]
    fn test_every_picker_extension_has_a_mime() {
        for ext in IMAGE_EXTENSIONS {
            let path = PathBuf::from(format!("file.{}", ext));
            assert!(mime_for_path(&path).is_some(), "no mime for {}", ext);
        }
    }

    #[tokio::test]
    async fn test_load_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fetal_head.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let image = load_image(path).await.unwrap();
        assert_eq!(image.file_name, "fetal_head.png");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(&*image.bytes, &[0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn test_load_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let err = load_image(path).await.unwrap_err();
        assert_eq!(err, ProcessError::UnsupportedFile("notes.txt".into()));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load_image(PathBuf::from("/nonexistent/scan.png")).await.unwrap_err();
        assert!(matches!(err, ProcessError::Io(_)));
    }
}
