//! Card image discovery and encoding
//!
//! Walks the configured image directory for supported formats and encodes
//! file bytes as base64 for API submission. The bytes are submitted as-is;
//! no raster re-encoding is performed.

use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::constants::SUPPORTED_IMAGE_EXTENSIONS;
use crate::{Error, Result};

/// A base64-encoded image ready for API submission
#[derive(Debug, Clone)]
pub struct EncodedImage {
    /// Basename of the source file, kept as the record's provenance tag
    pub filename: String,

    /// MIME type derived from the file extension
    pub mime_type: &'static str,

    /// Base64-encoded file bytes
    pub base64_data: String,
}

impl EncodedImage {
    /// The data URL submitted in the API request's image part
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data)
    }
}

/// Discover supported image files under a directory, sorted by path for a
/// stable processing order
pub fn discover_images(image_dir: &Path) -> Result<Vec<PathBuf>> {
    if !image_dir.exists() {
        return Err(Error::file_not_found(image_dir.display().to_string()));
    }

    let mut images = Vec::new();
    for entry in WalkDir::new(image_dir).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if is_supported_image(entry.path()) {
            images.push(entry.path().to_path_buf());
        }
    }

    images.sort();
    info!(
        "Found {} image files in {}",
        images.len(),
        image_dir.display()
    );
    Ok(images)
}

/// Read an image file and encode it for API submission
pub fn load_image(path: &Path) -> Result<EncodedImage> {
    use base64::Engine;

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| Error::image_encoding(path.display().to_string(), "no filename"))?;

    let mime_type = mime_type_for(path).ok_or_else(|| {
        Error::image_encoding(path.display().to_string(), "unsupported image format")
    })?;

    let bytes = std::fs::read(path)
        .map_err(|e| Error::image_encoding(path.display().to_string(), e.to_string()))?;

    let base64_data = base64::engine::general_purpose::STANDARD.encode(&bytes);
    debug!(
        "Encoded image {} ({} bytes -> {} base64 chars)",
        filename,
        bytes.len(),
        base64_data.len()
    );

    Ok(EncodedImage {
        filename,
        mime_type,
        base64_data,
    })
}

fn is_supported_image(path: &Path) -> bool {
    mime_type_for(path).is_some()
}

fn mime_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_string_lossy().to_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn discovers_only_supported_extensions() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("card_a.jpg"), b"jpeg bytes").unwrap();
        std::fs::write(dir.path().join("card_b.PNG"), b"png bytes").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"not an image").unwrap();
        std::fs::write(dir.path().join("scan.tiff"), b"unsupported").unwrap();

        let images = discover_images(dir.path()).unwrap();
        assert_eq!(images.len(), 2);
        assert!(images[0].ends_with("card_a.jpg"));
        assert!(images[1].ends_with("card_b.PNG"));
    }

    #[test]
    fn discovery_of_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(discover_images(&missing).is_err());
    }

    #[test]
    fn load_image_encodes_bytes_and_mime() {
        use base64::Engine;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("card.jpg");
        std::fs::write(&path, b"fake jpeg").unwrap();

        let encoded = load_image(&path).unwrap();
        assert_eq!(encoded.filename, "card.jpg");
        assert_eq!(encoded.mime_type, "image/jpeg");
        assert_eq!(
            base64::engine::general_purpose::STANDARD
                .decode(&encoded.base64_data)
                .unwrap(),
            b"fake jpeg"
        );
        assert!(encoded.data_url().starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn supported_extensions_match_constants() {
        for ext in SUPPORTED_IMAGE_EXTENSIONS {
            let path = PathBuf::from(format!("card.{}", ext));
            assert!(is_supported_image(&path), "extension {} not supported", ext);
        }
    }
}
