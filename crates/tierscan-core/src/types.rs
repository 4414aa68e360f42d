//! Core data types passed between pipeline stages.
//!
//! [`WorkItem`] flows from discovery into the transform stage;
//! [`ClassificationResult`] flows from the transform stage into the report.
//! Both are immutable once built.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::classify::{pixel_count, ResolutionTier};

/// A single discovered file queued for processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Path relative to the input directory, `/`-separated.
    /// Stable across runs over an unchanged directory.
    pub id: String,

    /// Full path to the file
    pub source_path: PathBuf,

    /// File size in bytes at discovery time
    pub size_bytes: u64,
}

/// Terminal state of a processed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Ok,
    Failed,
}

impl ItemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Failed => "failed",
        }
    }
}

/// Outcome of classifying one work item.
///
/// Build through [`ClassificationResult::succeeded`] or
/// [`ClassificationResult::failed`] so `resolution_tier` is present iff the
/// status is `Ok` and `error_message` is present iff it is `Failed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub item_id: String,

    pub status: ItemStatus,

    /// Width in pixels (0 when failed)
    pub width: u32,

    /// Height in pixels (0 when failed)
    pub height: u32,

    /// `width * height`
    pub pixel_count: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_tier: Option<ResolutionTier>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    pub source_path: PathBuf,

    /// File size in bytes
    pub size_bytes: u64,

    /// Detected container format ("jpeg", "png", ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// width / height, rounded to two decimals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,

    /// Wall-clock time spent on this item
    pub processing_duration_ms: u64,
}

impl ClassificationResult {
    /// A successfully classified item.
    pub fn succeeded(
        item: &WorkItem,
        width: u32,
        height: u32,
        format: impl Into<String>,
        processing_duration_ms: u64,
    ) -> Self {
        let aspect_ratio = (height > 0).then(|| round2(f64::from(width) / f64::from(height)));
        Self {
            item_id: item.id.clone(),
            status: ItemStatus::Ok,
            width,
            height,
            pixel_count: pixel_count(width, height),
            resolution_tier: Some(ResolutionTier::classify(width, height)),
            error_message: None,
            source_path: item.source_path.clone(),
            size_bytes: item.size_bytes,
            format: Some(format.into()),
            aspect_ratio,
            processing_duration_ms,
        }
    }

    /// An item that failed somewhere between open and classify.
    pub fn failed(item: &WorkItem, error: impl ToString, processing_duration_ms: u64) -> Self {
        let mut message = error.to_string();
        if message.trim().is_empty() {
            message = "unknown error".to_string();
        }
        Self {
            item_id: item.id.clone(),
            status: ItemStatus::Failed,
            width: 0,
            height: 0,
            pixel_count: 0,
            resolution_tier: None,
            error_message: Some(message),
            source_path: item.source_path.clone(),
            size_bytes: item.size_bytes,
            format: None,
            aspect_ratio: None,
            processing_duration_ms,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ItemStatus::Ok
    }
}

/// Round to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
