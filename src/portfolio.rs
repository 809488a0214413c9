//! A directory of albums.
//!
//! [`Portfolio`] is a convenience wrapper that instantiates an
//! [`Album`] for every subdirectory of a path, sharing one backend and one
//! diagnostic sink across all of them, and writes all their records in one
//! call.

use crate::album::{Album, AlbumError, AlbumOptions};
use crate::diag::{DiagnosticSink, LogSink};
use crate::imaging::{ImageBackend, RustBackend};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// Optional Portfolio configuration. The `album` options are passed to
/// every Album instance.
#[derive(Debug, Clone, Default)]
pub struct PortfolioOptions {
    pub album: AlbumOptions,
    /// Subdirectory names inside the portfolio path to skip.
    pub skip_album_names: Vec<String>,
}

/// All albums found under one directory.
pub struct Portfolio {
    dir: PathBuf,
    albums: Vec<Album>,
}

impl Portfolio {
    /// Open every subdirectory of `path` as an album, except those named
    /// in `skip_album_names` and the metadata directory itself (when
    /// `album.metadata_dir` points inside the portfolio).
    pub fn new(path: impl Into<PathBuf>, options: PortfolioOptions) -> Result<Self, AlbumError> {
        Self::with_backend(path, options, Arc::new(RustBackend::new()), Arc::new(LogSink))
    }

    /// Open a portfolio against a specific backend and diagnostic sink.
    pub fn with_backend(
        path: impl Into<PathBuf>,
        options: PortfolioOptions,
        backend: Arc<dyn ImageBackend>,
        diag: Arc<dyn DiagnosticSink>,
    ) -> Result<Self, AlbumError> {
        let dir = path.into();

        let mut albums = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            if options.skip_album_names.contains(&name) {
                continue;
            }
            if is_metadata_dir(entry.path(), options.album.metadata_dir.as_deref()) {
                continue;
            }

            albums.push(Album::with_backend(
                entry.path(),
                options.album.clone(),
                backend.clone(),
                diag.clone(),
            )?);
        }

        Ok(Self { dir, albums })
    }

    /// The albums, in directory-name order.
    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Write every album's record to the path computed by `compute_path`.
    pub fn save_all(
        &self,
        compute_path: impl Fn(&Album) -> PathBuf,
    ) -> Result<(), AlbumError> {
        for album in &self.albums {
            album.save_record(&compute_path(album))?;
        }
        Ok(())
    }
}

fn is_metadata_dir(subdir: &Path, metadata_dir: Option<&Path>) -> bool {
    let Some(metadata_dir) = metadata_dir else {
        return false;
    };
    match (subdir.canonicalize(), metadata_dir.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => subdir == metadata_dir,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::MemorySink;
    use crate::imaging::backend::tests::MockBackend;
    use crate::schema::AlbumRecord;
    use crate::tags::{ExifTags, HeaderTags, TagBag, TagValue};
    use std::fs;
    use tempfile::TempDir;

    fn bag(width: u32, height: u32) -> TagBag {
        TagBag {
            exif: ExifTags {
                date_time_original: Some(TagValue::text("2023:01:01 00:00:01")),
                offset_time_original: Some(TagValue::text("+00:00")),
                ..Default::default()
            },
            header: HeaderTags::generic(width, height),
            ..Default::default()
        }
    }

    /// Portfolio layout: two albums plus a metadata directory.
    fn setup_portfolio(tmp: &TempDir) -> Arc<MockBackend> {
        let backend = Arc::new(MockBackend::new());
        for (album, photo) in [("Alpha", "one.jpg"), ("Beta", "two.jpg")] {
            let dir = tmp.path().join(album);
            fs::create_dir(&dir).unwrap();
            fs::write(dir.join(photo), b"fake").unwrap();
            backend.add_tags(photo, bag(90, 30));
        }
        fs::create_dir(tmp.path().join("metadata")).unwrap();
        backend
    }

    fn open(
        tmp: &TempDir,
        options: PortfolioOptions,
        backend: Arc<MockBackend>,
    ) -> Result<Portfolio, AlbumError> {
        Portfolio::with_backend(tmp.path(), options, backend, Arc::new(MemorySink::new()))
    }

    #[test]
    fn loads_every_subdirectory_as_an_album() {
        let tmp = TempDir::new().unwrap();
        let backend = setup_portfolio(&tmp);

        let portfolio = open(&tmp, PortfolioOptions::default(), backend).unwrap();
        let names: Vec<&str> = portfolio.albums().iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "metadata"]);
    }

    #[test]
    fn skip_list_excludes_albums() {
        let tmp = TempDir::new().unwrap();
        let backend = setup_portfolio(&tmp);

        let options = PortfolioOptions {
            skip_album_names: vec!["metadata".into(), "Beta".into()],
            ..Default::default()
        };
        let portfolio = open(&tmp, options, backend).unwrap();
        let names: Vec<&str> = portfolio.albums().iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["Alpha"]);
    }

    #[test]
    fn metadata_dir_is_not_an_album() {
        let tmp = TempDir::new().unwrap();
        let backend = setup_portfolio(&tmp);
        fs::write(
            tmp.path().join("metadata/Alpha.json"),
            r#"{"title": "Named Alpha"}"#,
        )
        .unwrap();
        fs::write(
            tmp.path().join("metadata/Beta.json"),
            r#"{"title": "Named Beta"}"#,
        )
        .unwrap();

        let options = PortfolioOptions {
            album: AlbumOptions {
                metadata_dir: Some(tmp.path().join("metadata")),
                ..Default::default()
            },
            ..Default::default()
        };
        let portfolio = open(&tmp, options, backend).unwrap();
        let names: Vec<&str> = portfolio.albums().iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
        assert_eq!(portfolio.albums()[0].title(), "Named Alpha");
    }

    #[test]
    fn save_all_writes_parseable_records() {
        let tmp = TempDir::new().unwrap();
        let backend = setup_portfolio(&tmp);
        let out = tmp.path().join("records-out");
        fs::create_dir(&out).unwrap();

        let options = PortfolioOptions {
            skip_album_names: vec!["metadata".into(), "records-out".into()],
            ..Default::default()
        };
        let portfolio = open(&tmp, options, backend).unwrap();
        portfolio
            .save_all(|album| out.join(format!("{}.json", album.name().to_lowercase())))
            .unwrap();

        for slug in ["alpha", "beta"] {
            let contents = fs::read_to_string(out.join(format!("{slug}.json"))).unwrap();
            let record: AlbumRecord = serde_json::from_str(&contents).unwrap();
            assert_eq!(record.slug, slug);
            assert_eq!(record.photos.len(), 1);
        }
    }

    #[test]
    fn album_construction_failure_propagates() {
        let tmp = TempDir::new().unwrap();
        let backend = setup_portfolio(&tmp);
        // invalid metadata in one album fails the whole portfolio
        fs::write(
            tmp.path().join("Alpha/_metadata.json"),
            r#"{"title": "ok", "bogus": 1}"#,
        )
        .unwrap();

        let options = PortfolioOptions {
            album: AlbumOptions {
                metadata_file: Some("_metadata.json".into()),
                ..Default::default()
            },
            skip_album_names: vec!["metadata".into()],
        };
        let result = open(&tmp, options, backend);
        assert!(matches!(result, Err(AlbumError::MetadataValidation { .. })));
    }
}
