//! Image decoding/encoding backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations every backend must
//! support: read_tags (decode one file's metadata into a
//! [`TagBag`](crate::tags::TagBag)) and resize (re-encode to bounded
//! dimensions, preserving embedded metadata).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — pure Rust, zero
//! external dependencies. Everything is statically linked into the binary.

use super::params::ResizeParams;
use crate::tags::TagBag;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The decoder could not parse the file at all.
    #[error("Invalid image format: {0}")]
    InvalidImage(std::path::PathBuf),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of a resize operation: the encoder-reported output dimensions,
/// which may differ slightly from the plan due to aspect-ratio rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image backends.
///
/// `Sync + Send` so albums can fan out per-photo work across rayon worker
/// threads against a shared backend.
pub trait ImageBackend: Sync + Send {
    /// Decode one image file's metadata into a TagBag.
    fn read_tags(&self, path: &Path) -> Result<TagBag, BackendError>;

    /// Execute a resize, returning the actual output dimensions.
    fn resize(&self, params: &ResizeParams) -> Result<Dimensions, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::params::Quality;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock backend serving canned TagBags and recording operations.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockBackend {
        pub tag_results: Mutex<HashMap<String, TagBag>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        ReadTags(String),
        Resize {
            source: String,
            output: String,
            width: u32,
            height: u32,
            quality: u32,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Serve `tags` for any file whose leaf name is `filename`.
        pub fn with_tags(filename: &str, tags: TagBag) -> Self {
            let backend = Self::default();
            backend.add_tags(filename, tags);
            backend
        }

        pub fn add_tags(&self, filename: &str, tags: TagBag) {
            self.tag_results
                .lock()
                .unwrap()
                .insert(filename.to_string(), tags);
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        /// How many read_tags calls targeted the given leaf name.
        pub fn read_count(&self, filename: &str) -> usize {
            self.get_operations()
                .iter()
                .filter(|op| matches!(op, RecordedOp::ReadTags(p) if p.ends_with(filename)))
                .count()
        }
    }

    impl ImageBackend for MockBackend {
        fn read_tags(&self, path: &Path) -> Result<TagBag, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::ReadTags(path.to_string_lossy().to_string()));

            let leaf = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            self.tag_results
                .lock()
                .unwrap()
                .get(&leaf)
                .cloned()
                .ok_or_else(|| BackendError::InvalidImage(path.to_path_buf()))
        }

        fn resize(&self, params: &ResizeParams) -> Result<Dimensions, BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Resize {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                width: params.width,
                height: params.height,
                quality: params.quality.value(),
            });
            Ok(Dimensions {
                width: params.width,
                height: params.height,
            })
        }
    }

    #[test]
    fn mock_serves_and_records_read_tags() {
        use crate::tags::HeaderTags;

        let backend = MockBackend::with_tags(
            "image.jpg",
            TagBag {
                header: HeaderTags::generic(800, 600),
                ..Default::default()
            },
        );

        let tags = backend.read_tags(Path::new("/test/image.jpg")).unwrap();
        assert!(matches!(tags.header, HeaderTags::Generic { .. }));

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::ReadTags(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_errors_on_unknown_file() {
        let backend = MockBackend::new();
        let result = backend.read_tags(Path::new("/test/missing.jpg"));
        assert!(matches!(result, Err(BackendError::InvalidImage(_))));
    }

    #[test]
    fn mock_records_resize() {
        let backend = MockBackend::new();

        let dims = backend
            .resize(&ResizeParams {
                source: "/source.jpg".into(),
                output: "/output.jpg".into(),
                width: 800,
                height: 532,
                quality: Quality::new(80),
            })
            .unwrap();

        assert_eq!(dims.width, 800);
        assert_eq!(dims.height, 532);

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Resize {
                width: 800,
                height: 532,
                quality: 80,
                ..
            }
        ));
    }
}
