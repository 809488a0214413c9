//! Parameter types for resize operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the album-level orchestration (which decides which
//! photos to resize and where) and the [`backend`](super::backend) (which
//! does the actual pixel work). This separation allows swapping backends
//! (e.g. for testing with a mock) without changing orchestration logic.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

/// Caller-facing request to re-encode an album's photos to bounded
/// dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeRequest {
    /// Destination directory. Must differ from the album directory; created
    /// recursively if absent.
    pub dir: PathBuf,
    /// Upper bound for the longer edge, in pixels.
    pub large_side_max: u32,
    /// Upper bound for the shorter edge. When absent, `large_side_max`
    /// bounds both edges. A value above `large_side_max` has no effect:
    /// the long-side bound dominates the contain fit.
    pub small_side_max: Option<u32>,
    pub quality: Quality,
}

impl ResizeRequest {
    pub fn new(dir: impl Into<PathBuf>, large_side_max: u32) -> Self {
        Self {
            dir: dir.into(),
            large_side_max,
            small_side_max: None,
            quality: Quality::default(),
        }
    }

    pub fn with_small_side_max(mut self, value: u32) -> Self {
        self.small_side_max = Some(value);
        self
    }

    pub fn with_quality(mut self, value: u32) -> Self {
        self.quality = Quality::new(value);
        self
    }
}

/// Fully-resolved specification for one resize, handed to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Final output dimensions, already contain-fitted and clamped against
    /// enlargement.
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}
