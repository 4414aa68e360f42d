//! Dimension extraction with format detection, limits, and timeout support.

use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// Image decoder with configurable limits and timeout.
pub struct ImageDecoder {
    limits: LimitsConfig,
    full_decode: bool,
}

/// Dimensions and format read from an image file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedImage {
    /// Detected image format
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageDecoder {
    /// Create a new decoder.
    ///
    /// With `full_decode` off only the header is parsed, which is enough
    /// for dimensions. With it on the whole pixel buffer is decoded so
    /// truncated bodies are reported as failures.
    pub fn new(limits: LimitsConfig, full_decode: bool) -> Self {
        Self {
            limits,
            full_decode,
        }
    }

    /// Read and decode an image file from disk.
    pub async fn decode(&self, path: &Path) -> Result<DecodedImage, PipelineError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| PipelineError::Read {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        self.decode_from_bytes(bytes, path).await
    }

    /// Decode an in-memory byte buffer on the blocking pool, under the
    /// configured timeout.
    pub async fn decode_from_bytes(
        &self,
        bytes: Vec<u8>,
        path: &Path,
    ) -> Result<DecodedImage, PipelineError> {
        let path_owned = path.to_path_buf();
        let full_decode = self.full_decode;
        let timeout_duration = Duration::from_millis(self.limits.decode_timeout_ms);

        let decode_result = timeout(
            timeout_duration,
            tokio::task::spawn_blocking(move || {
                Self::decode_bytes_sync(bytes, &path_owned, full_decode)
            }),
        )
        .await;

        match decode_result {
            Ok(Ok(Ok(decoded))) => {
                if decoded.width > self.limits.max_image_dimension
                    || decoded.height > self.limits.max_image_dimension
                {
                    return Err(PipelineError::ImageTooLarge {
                        path: path.to_path_buf(),
                        width: decoded.width,
                        height: decoded.height,
                        max_dim: self.limits.max_image_dimension,
                    });
                }
                Ok(decoded)
            }
            Ok(Ok(Err(e))) => Err(e),
            Ok(Err(e)) => Err(PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Task join error: {}", e),
            }),
            Err(_) => Err(PipelineError::Timeout {
                path: path.to_path_buf(),
                stage: "decode".to_string(),
                timeout_ms: self.limits.decode_timeout_ms,
            }),
        }
    }

    /// Synchronous decode from bytes (runs in spawn_blocking).
    fn decode_bytes_sync(
        bytes: Vec<u8>,
        path: &Path,
        full_decode: bool,
    ) -> Result<DecodedImage, PipelineError> {
        let mut reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {}", e),
            })?;
        let format = match reader.format() {
            Some(f) => f,
            None => ImageFormat::from_path(path)
                .map_err(|_| PipelineError::UnrecognizedFormat(path.to_path_buf()))?,
        };
        reader.set_format(format);

        let decode_err = |e: image::ImageError| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let (width, height) = if full_decode {
            let image = reader.decode().map_err(decode_err)?;
            (image.width(), image.height())
        } else {
            reader.into_dimensions().map_err(decode_err)?
        };

        Ok(DecodedImage {
            format,
            width,
            height,
        })
    }
}

/// Convert an ImageFormat to a string representation.
pub fn format_to_string(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::Png => "png".to_string(),
        ImageFormat::WebP => "webp".to_string(),
        ImageFormat::Gif => "gif".to_string(),
        ImageFormat::Tiff => "tiff".to_string(),
        ImageFormat::Bmp => "bmp".to_string(),
        _ => "unknown".to_string(),
    }
}
