//! # photo-manifest
//!
//! Emit structured JSON manifests from directories of photos. Your
//! filesystem is the data source: a directory of images becomes an album
//! record, a directory of albums becomes a portfolio, and each photo's
//! embedded metadata — split across three competing tagging standards — is
//! reconciled into one normalized, presentation-ready record.
//!
//! # The Hard Part: Metadata Reconciliation
//!
//! A photo's capture date can live in EXIF (`yyyy:MM:dd HH:mm:ss` local
//! time plus sub-second and offset companion tags), XMP (ISO-8601, full or
//! partial), or IPTC (`CCYYMMDD` plus `HHMMSS±HHMM`) — and frequently in
//! several of them at once, disagreeing. [`date`] implements a fixed
//! precedence chain (EXIF → XMP → IPTC → filesystem birth time) with
//! per-standard grammar parsing, always producing a UTC instant with
//! millisecond precision. [`dimensions`] does the same for pixel size
//! across the per-container header namespaces.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`tags`] | [`TagBag`](tags::TagBag) — decoded metadata, one closed namespace per standard |
//! | [`date`] | Capture-date precedence chain and grammar parsing |
//! | [`dimensions`] | Width/height resolution from the container header |
//! | [`photo`] | One photo file; cached, single-flight record resolution |
//! | [`album`] | Directory aggregation, strict metadata validation, bounded resize |
//! | [`portfolio`] | A directory of albums; bulk record output |
//! | [`schema`] | Strict serde schemas for input metadata and output records |
//! | [`imaging`] | Decode/encode backend: EXIF/IPTC/XMP extraction, Lanczos3 resize, metadata-preserving re-encode |
//! | [`diag`] | Injectable sink for non-fatal warnings |
//!
//! # Design Decisions
//!
//! ## Closed Schemas, Both Directions
//!
//! Input album metadata and output records both use
//! `#[serde(deny_unknown_fields)]`. A typo'd field in a hand-written
//! metadata file fails validation loudly instead of being dropped on the
//! floor, and the emitted records re-validate under the same rules.
//!
//! ## Backend Behind a Trait
//!
//! All pixel and tag I/O goes through [`imaging::ImageBackend`]. The
//! production [`imaging::RustBackend`] is pure Rust — `image` for decoding
//! and resizing, `kamadak-exif` for EXIF, hand-rolled IPTC/XMP parsers,
//! `img-parts` for carrying metadata segments across a re-encode — so the
//! binary has zero system dependencies. Tests swap in a recording mock and
//! never touch an encoder.
//!
//! ## Injectable Diagnostics
//!
//! Non-fatal conditions (skipped files, dates falling back to filesystem
//! time, resizes that don't shrink) are warnings, not errors, and route
//! through one [`diag::DiagnosticSink`] instead of a global console.
//!
//! # Example
//!
//! ```no_run
//! use photo_manifest::{Portfolio, PortfolioOptions};
//!
//! let portfolio = Portfolio::new("/Volumes/Photos", PortfolioOptions::default())?;
//! portfolio.save_all(|album| {
//!     std::path::Path::new("/srv/site/data").join(format!("{}.json", album.slug()))
//! })?;
//! # Ok::<(), photo_manifest::AlbumError>(())
//! ```

pub mod album;
pub mod date;
pub mod diag;
pub mod dimensions;
pub mod imaging;
pub mod photo;
pub mod portfolio;
pub mod schema;
pub mod tags;

pub use album::{Album, AlbumError, AlbumOptions};
pub use diag::{DiagnosticSink, LogSink, MemorySink};
pub use photo::{Photo, PhotoError};
pub use portfolio::{Portfolio, PortfolioOptions};
pub use schema::{AlbumMetadata, AlbumRecord, PhotoRecord};
