use crate::{error::Result, models::ImagePayload};
use std::path::Path;

/// A raw file handed over by a picker or drop event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(name, content_type_for(path), bytes))
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    pub fn into_payload(self) -> ImagePayload {
        ImagePayload::from_bytes(self.content_type, &self.bytes)
    }
}

/// Keeps image-typed files; anything else is dropped without error.
pub fn accept_images(files: Vec<InputFile>) -> Vec<InputFile> {
    files
        .into_iter()
        .filter(|file| {
            if !file.is_image() {
                log::debug!("Ignoring non-image file {} ({})", file.name, file.content_type);
            }
            file.is_image()
        })
        .collect()
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        "heif" => "image/heif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_accept_images_drops_other_types() {
        let files = vec![
            InputFile::new("a.png", "image/png", vec![1]),
            InputFile::new("notes.txt", "text/plain", vec![2]),
            InputFile::new("b.jpg", "image/jpeg", vec![3]),
        ];
        let accepted = accept_images(files);
        let names: Vec<_> = accepted.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.jpg"]);
    }

    #[test]
    fn test_into_payload_encodes_bytes() {
        let payload = InputFile::new("a.png", "image/png", b"ABC".to_vec()).into_payload();
        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(payload.data, "QUJD");
    }

    #[tokio::test]
    async fn test_from_path_infers_content_type() {
        let mut file = tempfile::Builder::new().suffix(".JPG").tempfile().unwrap();
        file.write_all(b"jpeg-bytes").unwrap();

        let input = InputFile::from_path(file.path()).await.unwrap();
        assert_eq!(input.content_type, "image/jpeg");
        assert_eq!(input.bytes, b"jpeg-bytes");
        assert!(input.is_image());
    }
}
