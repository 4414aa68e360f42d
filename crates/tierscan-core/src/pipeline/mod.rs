//! Pipeline stages that turn a directory into classification results.
//!
//! - **discovery**: find image files and emit work items
//! - **validate**: cheap pre-decode checks (size, magic bytes)
//! - **decode**: read dimensions from image bytes
//! - **processor**: per-item validate → decode → classify, failures as data
//! - **channel**: bounded work queue and result sink
//! - **transform**: the worker pool tying it together

pub mod channel;
pub mod decode;
pub mod discovery;
pub mod processor;
pub mod transform;
pub mod validate;

// Re-exports for convenient access
pub use decode::{DecodedImage, ImageDecoder};
pub use discovery::FileDiscovery;
pub use processor::ImageProcessor;
pub use transform::TransformStage;
pub use validate::Validator;
