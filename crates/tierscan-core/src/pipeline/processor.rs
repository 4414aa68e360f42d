//! Per-item processing: validate → decode → classify.
//!
//! This is the item boundary. Whatever goes wrong for one file is turned
//! into a failed [`ClassificationResult`] here and never escapes.

use std::time::Instant;

use crate::config::Config;
use crate::error::PipelineResult;
use crate::types::{ClassificationResult, WorkItem};

use super::decode::{format_to_string, DecodedImage, ImageDecoder};
use super::validate::Validator;

/// Classifies individual work items.
pub struct ImageProcessor {
    decoder: ImageDecoder,
    validator: Validator,
}

impl ImageProcessor {
    /// Create a new image processor with the given configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            decoder: ImageDecoder::new(config.limits.clone(), config.processing.full_decode),
            validator: Validator::new(config.limits.clone()),
        }
    }

    /// Process one item. Always yields exactly one result.
    pub async fn process(&self, item: &WorkItem) -> ClassificationResult {
        let start = Instant::now();
        tracing::debug!("Processing: {:?}", item.source_path);

        let outcome = self.inspect(item).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(decoded) => {
                let result = ClassificationResult::succeeded(
                    item,
                    decoded.width,
                    decoded.height,
                    format_to_string(decoded.format),
                    elapsed_ms,
                );
                tracing::debug!(
                    "Classified {} as {} ({}x{}) in {}ms",
                    item.id,
                    result
                        .resolution_tier
                        .map(|t| t.label())
                        .unwrap_or_default(),
                    decoded.width,
                    decoded.height,
                    elapsed_ms
                );
                result
            }
            Err(e) => {
                tracing::error!("Failed: {:?} - {}", item.source_path, e);
                ClassificationResult::failed(item, e, elapsed_ms)
            }
        }
    }

    /// The fallible part of processing: everything up to dimensions.
    async fn inspect(&self, item: &WorkItem) -> PipelineResult<DecodedImage> {
        let validate_start = Instant::now();
        self.validator.validate(&item.source_path)?;
        tracing::trace!("  Validate: {:?}", validate_start.elapsed());

        let decode_start = Instant::now();
        let decoded = self.decoder.decode(&item.source_path).await?;
        tracing::trace!("  Decode: {:?}", decode_start.elapsed());

        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ResolutionTier;
    use crate::types::ItemStatus;
    use std::path::Path;

    fn item_for(path: &Path) -> WorkItem {
        WorkItem {
            id: path.file_name().unwrap().to_string_lossy().into_owned(),
            source_path: path.to_path_buf(),
            size_bytes: std::fs::metadata(path).map(|m| m.len()).unwrap_or(0),
        }
    }

    #[tokio::test]
    async fn test_process_valid_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.png");
        image::RgbImage::new(320, 240).save(&path).unwrap();

        let processor = ImageProcessor::new(&Config::default());
        let result = processor.process(&item_for(&path)).await;

        assert_eq!(result.status, ItemStatus::Ok);
        assert_eq!((result.width, result.height), (320, 240));
        assert_eq!(result.resolution_tier, Some(ResolutionTier::Tier240p));
        assert_eq!(result.format.as_deref(), Some("png"));
    }

    #[tokio::test]
    async fn test_process_zero_byte_file_fails_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jpg");
        std::fs::write(&path, b"").unwrap();

        let processor = ImageProcessor::new(&Config::default());
        let result = processor.process(&item_for(&path)).await;

        assert_eq!(result.status, ItemStatus::Failed);
        assert!(result.resolution_tier.is_none());
        assert!(result.error_message.as_deref().unwrap().contains("empty"));
        assert_eq!(result.source_path, path);
    }

    #[tokio::test]
    async fn test_process_vanished_file() {
        let dir = tempfile::tempdir().unwrap();
        let item = WorkItem {
            id: "gone.png".to_string(),
            source_path: dir.path().join("gone.png"),
            size_bytes: 10,
        };

        let processor = ImageProcessor::new(&Config::default());
        let result = processor.process(&item).await;

        assert_eq!(result.status, ItemStatus::Failed);
        assert!(result.error_message.unwrap().contains("not found"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_unreadable_file_fails_in_place() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locked.png");
        image::RgbImage::new(8, 8).save(&path).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not bind a privileged user
        if std::fs::File::open(&path).is_ok() {
            return;
        }
        let result = ImageProcessor::new(&Config::default())
            .process(&item_for(&path))
            .await;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        assert_eq!(result.status, ItemStatus::Failed);
        assert!(result.error_message.unwrap().contains("Cannot open"));
    }
}
