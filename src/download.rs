//! Saving rendered QR codes to disk

use crate::content::ContentType;
use crate::error::Result;
use crate::qr::QrArtifact;
use chrono::Utc;
use std::path::{Path, PathBuf};

/// `qrcode-<type>-<epoch-millis>.png`
pub fn file_name(content_type: ContentType, epoch_millis: i64) -> String {
    format!("qrcode-{content_type}-{epoch_millis}.png")
}

/// Write the artifact's PNG into `dir`, named after its content type and
/// the current time. Returns the written path.
pub async fn save(artifact: &QrArtifact, dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name(
        artifact.content_type,
        Utc::now().timestamp_millis(),
    ));
    tokio::fs::write(&path, &artifact.png).await?;
    tracing::info!(path = %path.display(), bytes = artifact.png.len(), "Saved QR code");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::QrRenderer;

    #[test]
    fn file_name_format() {
        assert_eq!(
            file_name(ContentType::WhatsApp, 1_700_000_000_123),
            "qrcode-whatsapp-1700000000123.png"
        );
    }

    #[tokio::test]
    async fn save_writes_png_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let png = QrRenderer::new().render_png("hello").unwrap();
        let artifact = QrArtifact {
            content_type: ContentType::Text,
            payload: "hello".into(),
            png: png.clone().into(),
            width: 300,
            created_at: Utc::now(),
        };

        let out = dir.path().join("codes");
        let path = save(&artifact, &out).await.unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("qrcode-text-"));
        assert!(name.ends_with(".png"));
        assert_eq!(std::fs::read(&path).unwrap(), png);
    }
}
