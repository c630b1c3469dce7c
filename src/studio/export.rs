use crate::{error::Result, models::ImagePayload};
use chrono::Utc;
use std::path::{Path, PathBuf};

const EXPORT_PREFIX: &str = "ad-studio";

/// Writes the decoded image to `dir` as `ad-studio-<millis>.<ext>`.
pub async fn export_image(image: &ImagePayload, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    let bytes = image.decode_bytes()?;
    tokio::fs::create_dir_all(dir).await?;

    let token = Utc::now().timestamp_millis();
    let mut path = dir.join(format!("{}-{}.{}", EXPORT_PREFIX, token, image.extension()));
    let mut suffix = 1;
    while tokio::fs::try_exists(&path).await? {
        path = dir.join(format!(
            "{}-{}-{}.{}",
            EXPORT_PREFIX,
            token,
            suffix,
            image.extension()
        ));
        suffix += 1;
    }

    tokio::fs::write(&path, bytes).await?;
    log::info!("Exported image to {}", path.display());
    Ok(path)
}

pub async fn export_batch(images: &[ImagePayload], dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(images.len());
    for image in images {
        paths.push(export_image(image, dir.as_ref()).await?);
    }
    Ok(paths)
}
