//! A single photo file and its normalized metadata.
//!
//! [`Photo::record`] decodes the file's tags once and resolves them into a
//! [`PhotoRecord`]: capture date via the precedence chain in
//! [`date`](crate::date), dimensions via [`dimensions`](crate::dimensions),
//! and the optional id / alt fields from embedded titles and captions.
//!
//! ## id / alt resolution
//!
//! Each field is resolved independently; the first non-empty value wins:
//!
//! - **id**: XMP `dc:title` → IPTC ObjectName → None
//! - **alt**: XMP `dc:description` → IPTC Caption-Abstract → None
//!
//! Both standards represent deliberate curation in a photography tool, so
//! the publishing namespace (written last by modern software) is preferred
//! over the older wire-service record.
//!
//! ## Caching
//!
//! The computed record is cached for the lifetime of the `Photo` in a
//! single-flight cell: the first caller performs the decode, concurrent
//! callers block and share the result, and every later call returns the
//! identical cached value without touching the file again.

use crate::diag::DiagnosticSink;
use crate::imaging::{BackendError, ImageBackend};
use crate::schema::PhotoRecord;
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotoError {
    /// No recognized namespace yielded both width and height.
    #[error("Cannot determine size of {0}")]
    DimensionUnavailable(PathBuf),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One photo file inside an album directory.
#[derive(Debug)]
pub struct Photo {
    dir: PathBuf,
    name: String,
    record: OnceCell<PhotoRecord>,
}

impl Photo {
    /// `dir` is the album directory containing the photo; `name` is the
    /// on-disk filename, e.g. `IMG_1234.jpg`.
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
            record: OnceCell::new(),
        }
    }

    /// The on-disk filename, e.g. `IMG_1234.jpg`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full on-disk path, e.g. `/Volume/Photos/Album1/IMG_1234.jpg`.
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.name)
    }

    /// The photo's normalized metadata record.
    ///
    /// Computed on first call and cached; repeated calls return the same
    /// record without re-decoding the file. Concurrent first calls are
    /// single-flighted.
    pub fn record(
        &self,
        backend: &dyn ImageBackend,
        diag: &dyn DiagnosticSink,
    ) -> Result<&PhotoRecord, PhotoError> {
        self.record
            .get_or_try_init(|| self.compute_record(backend, diag))
    }

    fn compute_record(
        &self,
        backend: &dyn ImageBackend,
        diag: &dyn DiagnosticSink,
    ) -> Result<PhotoRecord, PhotoError> {
        let path = self.path();
        let tags = backend.read_tags(&path)?;

        let (width, height) = crate::dimensions::resolve(&tags)
            .map_err(|_| PhotoError::DimensionUnavailable(path.clone()))?;

        let date = crate::date::resolve(&tags, birth_time(&path)?, &path, diag);

        let id = first_non_empty(&[
            tags.xmp.title.as_ref().map(|t| t.description.as_str()),
            tags.iptc.object_name.as_ref().map(|t| t.description.as_str()),
        ]);
        let alt = first_non_empty(&[
            tags.xmp.description.as_ref().map(|t| t.description.as_str()),
            tags.iptc.caption.as_ref().map(|t| t.description.as_str()),
        ]);

        Ok(PhotoRecord::new(self.name.clone(), date, width, height, id, alt))
    }
}

/// The file's creation (birth) timestamp, falling back to mtime on
/// filesystems that don't track birth time.
fn birth_time(path: &Path) -> Result<DateTime<Utc>, PhotoError> {
    let metadata = std::fs::metadata(path)?;
    let stamp = metadata.created().or_else(|_| metadata.modified())?;
    Ok(stamp.into())
}

/// Resolve a metadata field from multiple sources.
///
/// Takes optional values in priority order and returns the first non-None,
/// non-empty value, trimmed.
fn first_non_empty(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| {
            opt.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .next()
}
