//! A directory of photos plus optional user-authored metadata.
//!
//! An [`Album`] collates normalized metadata for every photo inside one
//! directory, merges it with an optional (but recommended) JSON metadata
//! file conforming to [`AlbumMetadata`](crate::schema::AlbumMetadata), and
//! provides it all as a single [`AlbumRecord`](crate::schema::AlbumRecord).
//!
//! ## Construction is validation
//!
//! Everything that can make the whole album unusable is checked in
//! [`Album::new`], before any photo is decoded:
//!
//! - mutually exclusive options (`metadata_dir` vs `metadata_file`)
//! - strict schema validation of the metadata file (unknown fields reject)
//! - `thumb` and every `order` entry must name a photo in the album
//!
//! Per-photo failures during [`Album::record`] carry the offending
//! filename so the caller can decide whether to skip or abort; photos are
//! never silently dropped from the output.
//!
//! ## Enumeration
//!
//! Files are listed non-recursively, sorted by filename. Only files whose
//! extension is in `allowed_extensions` become photos; anything else is
//! skipped, with a warning through the diagnostic sink unless its
//! extension is in `skipped_extensions`.
//!
//! ## Concurrency
//!
//! Photo records are computed in parallel with rayon and collected in
//! enumeration order — per-photo resolution is independent and pure once
//! the tags are decoded, and each photo's cache is single-flighted.

use crate::diag::{DiagnosticSink, LogSink};
use crate::imaging::{
    ImageBackend, ResizeParams, ResizeRequest, RustBackend, contain_dimensions, plan_target,
};
use crate::photo::{Photo, PhotoError};
use crate::schema::{AlbumMetadata, AlbumRecord, PhotoRecord};
use rayon::prelude::*;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum AlbumError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The metadata file failed strict schema validation.
    #[error("Invalid album metadata in {file}: {source}")]
    MetadataValidation {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Conflicting options: {0}")]
    ConflictingOptions(String),
    /// A thumb or order entry names a file absent from the album.
    #[error("{kind} {name} not found in album {album}")]
    ReferencedFileNotFound {
        kind: &'static str,
        name: String,
        album: String,
    },
    #[error("Invalid resize request: {0}")]
    InvalidResizeRequest(String),
    /// A photo failed during bulk processing; the filename tells the
    /// caller which one.
    #[error("Photo {filename}: {source}")]
    Photo {
        filename: String,
        #[source]
        source: PhotoError,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Optional album configuration.
#[derive(Debug, Clone, Default)]
pub struct AlbumOptions {
    /// Directory containing the album's metadata file, named after the
    /// album directory (`<album name>.json`). Cannot be combined with
    /// `metadata_file`.
    pub metadata_dir: Option<PathBuf>,
    /// Name of the metadata file inside the album directory, e.g.
    /// `_metadata.json`. Cannot be combined with `metadata_dir`.
    pub metadata_file: Option<String>,
    /// Case-insensitive extensions accepted as photos.
    /// Default: jpg, jpeg, png, webp.
    pub allowed_extensions: Option<Vec<String>>,
    /// Extensions skipped without a warning. Default: json, ds_store.
    pub skipped_extensions: Option<Vec<String>>,
}

/// A local directory of photos and its collated metadata.
pub struct Album {
    dir: PathBuf,
    name: String,
    metadata: AlbumMetadata,
    photos: Vec<Photo>,
    backend: Arc<dyn ImageBackend>,
    diag: Arc<dyn DiagnosticSink>,
}

impl Album {
    /// Open an album with the production backend and `log`-backed
    /// diagnostics.
    pub fn new(path: impl Into<PathBuf>, options: AlbumOptions) -> Result<Self, AlbumError> {
        Self::with_backend(path, options, Arc::new(RustBackend::new()), Arc::new(LogSink))
    }

    /// Open an album against a specific backend and diagnostic sink.
    pub fn with_backend(
        path: impl Into<PathBuf>,
        options: AlbumOptions,
        backend: Arc<dyn ImageBackend>,
        diag: Arc<dyn DiagnosticSink>,
    ) -> Result<Self, AlbumError> {
        let dir = path.into();
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if options.metadata_dir.is_some() && options.metadata_file.is_some() {
            return Err(AlbumError::ConflictingOptions(
                "cannot specify both `metadata_dir` and `metadata_file`".into(),
            ));
        }

        let allowed = extension_set(
            options.allowed_extensions.as_deref(),
            &["jpg", "jpeg", "png", "webp"],
        );
        let skipped = extension_set(options.skipped_extensions.as_deref(), &["json", "ds_store"]);

        let metadata_path = match (&options.metadata_dir, &options.metadata_file) {
            (Some(metadata_dir), _) => Some(metadata_dir.join(format!("{name}.json"))),
            (_, Some(metadata_file)) => Some(dir.join(metadata_file)),
            _ => None,
        };
        let metadata = match metadata_path {
            Some(file) => load_metadata(&file)?,
            None => AlbumMetadata::untitled(&name),
        };

        let photos = enumerate_photos(&dir, &name, &allowed, &skipped, diag.as_ref())?;

        // Referenced files must name actual candidate photos, checked
        // before any decode work begins.
        let names: HashSet<&str> = photos.iter().map(|p| p.name()).collect();
        if let Some(thumb) = &metadata.thumb {
            if !names.contains(thumb.as_str()) {
                return Err(AlbumError::ReferencedFileNotFound {
                    kind: "Thumb",
                    name: thumb.clone(),
                    album: name.clone(),
                });
            }
        }
        for entry in metadata.order.as_deref().unwrap_or_default() {
            if !names.contains(entry.as_str()) {
                return Err(AlbumError::ReferencedFileNotFound {
                    kind: "Order entry",
                    name: entry.clone(),
                    album: name.clone(),
                });
            }
        }

        Ok(Self {
            dir,
            name,
            metadata,
            photos,
            backend,
            diag,
        })
    }

    /// The on-disk name of the album's directory.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// On-disk path to the album directory.
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Album title: the `title` metadata field, defaulting to the
    /// directory name.
    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    /// URL slug: the `slug` metadata field, defaulting to the directory
    /// name lower cased.
    pub fn slug(&self) -> String {
        self.metadata
            .slug
            .clone()
            .unwrap_or_else(|| self.name.to_lowercase())
    }

    /// The album's candidate photos, sorted by filename.
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    /// The validated input metadata.
    pub fn metadata(&self) -> &AlbumMetadata {
        &self.metadata
    }

    /// Normalized records for every photo, in enumeration order.
    ///
    /// Resolution fans out across rayon workers; results are collected in
    /// input order. The first failing photo aborts the batch with its
    /// filename attached.
    pub fn photo_records(&self) -> Result<Vec<PhotoRecord>, AlbumError> {
        self.photos
            .par_iter()
            .map(|photo| {
                photo
                    .record(self.backend.as_ref(), self.diag.as_ref())
                    .cloned()
                    .map_err(|source| AlbumError::Photo {
                        filename: photo.name().to_string(),
                        source,
                    })
            })
            .collect()
    }

    /// The full output record: metadata pass-through with defaults applied
    /// plus all photo records.
    pub fn record(&self) -> Result<AlbumRecord, AlbumError> {
        Ok(self.assemble(self.photo_records()?))
    }

    /// Write the album's record as JSON. The file is overwritten if it
    /// exists; parent directories must exist.
    pub fn save_record(&self, file: &Path) -> Result<(), AlbumError> {
        let record = self.record()?;
        std::fs::write(file, serde_json::to_string(&record)?)?;
        Ok(())
    }

    /// Re-encode every photo into `request.dir` bounded by the request's
    /// side maxima, preserving embedded metadata.
    ///
    /// The destination directory must differ from the album directory and
    /// is created (recursively) if absent — both checked once, before any
    /// write. Returns a record whose photos carry the encoder-reported
    /// output dimensions; date, id, and alt are reused from the source
    /// records.
    pub fn resize(&self, request: &ResizeRequest) -> Result<AlbumRecord, AlbumError> {
        if request.large_side_max == 0 {
            return Err(AlbumError::InvalidResizeRequest(
                "large_side_max must be positive".into(),
            ));
        }
        if is_same_dir(&self.dir, &request.dir) {
            return Err(AlbumError::ConflictingOptions(format!(
                "resize destination {} is the album directory itself",
                request.dir.display()
            )));
        }
        std::fs::create_dir_all(&request.dir)?;

        let records = self.photo_records()?;

        let resized: Vec<PhotoRecord> = self
            .photos
            .par_iter()
            .zip(records.par_iter())
            .map(|(photo, record)| {
                let source_dims = (record.width, record.height);
                let target =
                    plan_target(source_dims, request.large_side_max, request.small_side_max);

                if target.0 >= record.width && target.1 >= record.height {
                    self.diag.warn(&format!(
                        "resize target {}x{} does not shrink {} ({}x{})",
                        target.0, target.1, photo.name(), record.width, record.height
                    ));
                }

                let (width, height) = contain_dimensions(source_dims, target);
                let actual = self
                    .backend
                    .resize(&ResizeParams {
                        source: photo.path(),
                        output: request.dir.join(photo.name()),
                        width,
                        height,
                        quality: request.quality,
                    })
                    .map_err(|e| AlbumError::Photo {
                        filename: photo.name().to_string(),
                        source: PhotoError::Backend(e),
                    })?;

                Ok(record.with_dimensions(actual.width, actual.height))
            })
            .collect::<Result<_, AlbumError>>()?;

        Ok(self.assemble(resized))
    }

    fn assemble(&self, photos: Vec<PhotoRecord>) -> AlbumRecord {
        AlbumRecord {
            title: self.title().to_string(),
            description: self.metadata.description.clone(),
            thumb: self.metadata.thumb.clone(),
            slug: self.slug(),
            unlisted: self.metadata.unlisted == Some(true),
            keywords: self.metadata.keywords.clone(),
            order: self.metadata.order.clone(),
            photos,
        }
    }
}

fn extension_set(overrides: Option<&[String]>, defaults: &[&str]) -> BTreeSet<String> {
    match overrides {
        Some(extensions) => extensions.iter().map(|e| e.to_lowercase()).collect(),
        None => defaults.iter().map(|e| e.to_string()).collect(),
    }
}

fn load_metadata(file: &Path) -> Result<AlbumMetadata, AlbumError> {
    let contents = std::fs::read_to_string(file)?;
    serde_json::from_str(&contents).map_err(|source| AlbumError::MetadataValidation {
        file: file.to_path_buf(),
        source,
    })
}

/// List candidate photos: non-recursive, sorted by filename, de-duplicated.
fn enumerate_photos(
    dir: &Path,
    album_name: &str,
    allowed: &BTreeSet<String>,
    skipped: &BTreeSet<String>,
    diag: &dyn DiagnosticSink,
) -> Result<Vec<Photo>, AlbumError> {
    let mut names = BTreeSet::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() {
            names.insert(entry.file_name().to_string_lossy().to_string());
        }
    }

    let mut photos = Vec::new();
    for name in names {
        let extension = Path::new(&name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if allowed.contains(&extension) {
            photos.push(Photo::new(dir, &name));
        } else if !skipped.contains(&extension) {
            diag.warn(&format!("skipping file {name} in album {album_name}"));
        }
    }
    Ok(photos)
}

/// Whether two paths name the same directory. The destination may not
/// exist yet, in which case a plain path comparison decides.
fn is_same_dir(album: &Path, dest: &Path) -> bool {
    match (album.canonicalize(), dest.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => album == dest,
    }
}
