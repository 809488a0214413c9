//! Input and output JSON schemas.
//!
//! Both directions are closed: user-authored album metadata is rejected on
//! any unrecognized field, and the emitted album/photo records deserialize
//! back under the same strict rules. Misspelled fields surface as
//! validation errors instead of silently vanishing from the output
//! document.
//!
//! | Type | Direction | Contents |
//! |------|-----------|----------|
//! | [`AlbumMetadata`] | input | user-authored album fields, `title` required |
//! | [`PhotoRecord`] | output | normalized per-photo metadata |
//! | [`AlbumRecord`] | output | metadata pass-through + ordered photo records |
//!
//! Dates are serialized as ISO-8601 UTC with millisecond precision
//! (`2024-01-01T10:00:00.000Z`), the format downstream publishing apps
//! sort and display without further parsing rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User-authored album metadata, stored as a JSON file alongside or near
/// the album directory.
///
/// Only `title` is required. The remaining fields have no meaning to this
/// library beyond validation; they are collected and passed through to the
/// output record for the publishing app.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AlbumMetadata {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Preferred album thumb image filename; must exist in the album.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
    /// URL path for the album, like `/photos/album1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// An unlisted album is published but not linked to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlisted: Option<bool>,
    /// Album-wide keywords for SEO.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    /// Image filenames for custom ordering; every entry must exist in the
    /// album. A partial ordering is allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<String>>,
}

impl AlbumMetadata {
    /// The default metadata for an album with no metadata file: just the
    /// directory name as title.
    pub fn untitled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            thumb: None,
            slug: None,
            unlisted: None,
            keywords: None,
            order: None,
        }
    }
}

/// Normalized, presentation-ready metadata for one photo.
///
/// Not full EXIF data — just enough to sort, display, and size the photo
/// and its thumbnails on a website.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PhotoRecord {
    /// On-disk leaf filename, no path.
    pub filename: String,
    #[serde(with = "iso_millis")]
    pub date: DateTime<Utc>,
    pub width: u32,
    pub height: u32,
    /// Always `width > height`; recomputed by every constructor.
    pub landscape: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl PhotoRecord {
    pub fn new(
        filename: impl Into<String>,
        date: DateTime<Utc>,
        width: u32,
        height: u32,
        id: Option<String>,
        alt: Option<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            date,
            width,
            height,
            landscape: width > height,
            id,
            alt,
        }
    }

    /// The same record with new pixel dimensions, e.g. after a resize.
    /// The landscape flag is recomputed from the new values.
    pub fn with_dimensions(&self, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            landscape: width > height,
            ..self.clone()
        }
    }
}

/// Full output metadata for an album: the input fields passed through with
/// defaults applied, plus one [`PhotoRecord`] per photo in enumeration
/// order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AlbumRecord {
    /// Defaults to the album directory name, case preserved.
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
    /// Defaults to the album directory name, lower cased.
    pub slug: String,
    /// Defaults to `false`.
    pub unlisted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<String>>,
    pub photos: Vec<PhotoRecord>,
}

/// ISO-8601 UTC with fixed millisecond precision, e.g.
/// `2009-12-09T00:33:19.000Z`.
pub(crate) mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(de)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
    }

    // =========================================================================
    // AlbumMetadata — strict input validation
    // =========================================================================

    #[test]
    fn metadata_accepts_title_only() {
        let parsed: AlbumMetadata = serde_json::from_str(r#"{"title": "My Album"}"#).unwrap();
        assert_eq!(parsed.title, "My Album");
        assert_eq!(parsed.slug, None);
    }

    #[test]
    fn metadata_accepts_the_full_field_set() {
        let parsed: AlbumMetadata = serde_json::from_str(
            r#"{
                "title": "My Album",
                "description": "An album of photos",
                "thumb": "IMG_1234.jpg",
                "slug": "my-album",
                "unlisted": false,
                "keywords": ["landscapes", "art"],
                "order": ["IMG_7890.jpg", "IMG_1234.jpg"]
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.thumb.as_deref(), Some("IMG_1234.jpg"));
        assert_eq!(parsed.order.as_deref(), Some(&["IMG_7890.jpg".to_string(), "IMG_1234.jpg".to_string()][..]));
    }

    #[test]
    fn metadata_rejects_unknown_fields() {
        let result: Result<AlbumMetadata, _> =
            serde_json::from_str(r#"{"title": "My Album", "coverArt": "x.jpg"}"#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("coverArt"), "error should name the field: {err}");
    }

    #[test]
    fn metadata_rejects_missing_title() {
        let result: Result<AlbumMetadata, _> = serde_json::from_str(r#"{"slug": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn metadata_rejects_wrong_types() {
        let result: Result<AlbumMetadata, _> =
            serde_json::from_str(r#"{"title": "ok", "unlisted": "false"}"#);
        assert!(result.is_err());
    }

    // =========================================================================
    // PhotoRecord
    // =========================================================================

    #[test]
    fn landscape_is_computed_from_dimensions() {
        let wide = PhotoRecord::new("wide.jpg", sample_date(), 90, 30, None, None);
        assert!(wide.landscape);
        let tall = PhotoRecord::new("tall.jpg", sample_date(), 1064, 1600, None, None);
        assert!(!tall.landscape);
        let square = PhotoRecord::new("sq.jpg", sample_date(), 16, 16, None, None);
        assert!(!square.landscape);
    }

    #[test]
    fn with_dimensions_recomputes_landscape() {
        let wide = PhotoRecord::new("a.jpg", sample_date(), 1600, 1064, None, None);
        assert!(wide.landscape);
        let rotated = wide.with_dimensions(532, 800);
        assert!(!rotated.landscape);
        assert_eq!(rotated.filename, "a.jpg");
        assert_eq!(rotated.date, wide.date);
    }

    #[test]
    fn date_serializes_with_millisecond_precision() {
        let record = PhotoRecord::new("a.jpg", sample_date(), 100, 50, None, None);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["date"], "2024-01-01T10:00:00.000Z");
    }

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let record = PhotoRecord::new("a.jpg", sample_date(), 100, 50, None, None);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("alt").is_none());

        let titled = PhotoRecord::new(
            "a.jpg",
            sample_date(),
            100,
            50,
            Some("Title".into()),
            Some("A caption".into()),
        );
        let json = serde_json::to_value(&titled).unwrap();
        assert_eq!(json["id"], "Title");
        assert_eq!(json["alt"], "A caption");
    }

    #[test]
    fn photo_record_round_trips() {
        let record = PhotoRecord::new("a.jpg", sample_date(), 100, 50, Some("t".into()), None);
        let json = serde_json::to_string(&record).unwrap();
        let back: PhotoRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn photo_record_rejects_unknown_fields() {
        let result: Result<PhotoRecord, _> = serde_json::from_str(
            r#"{"filename": "a.jpg", "date": "2024-01-01T10:00:00.000Z",
                "width": 1, "height": 1, "landscape": false, "exposure": "1/250"}"#,
        );
        assert!(result.is_err());
    }

    // =========================================================================
    // AlbumRecord
    // =========================================================================

    #[test]
    fn album_record_round_trips() {
        let record = AlbumRecord {
            title: "My Album".into(),
            description: Some("An album of photos".into()),
            thumb: Some("IMG_1234.jpg".into()),
            slug: "my-album".into(),
            unlisted: false,
            keywords: Some(vec!["art".into()]),
            order: None,
            photos: vec![PhotoRecord::new("IMG_2851.jpg", sample_date(), 1064, 1600, None, None)],
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: AlbumRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn album_record_rejects_unknown_fields() {
        let result: Result<AlbumRecord, _> = serde_json::from_str(
            r#"{"title": "t", "slug": "t", "unlisted": false, "photos": [], "extra": 1}"#,
        );
        assert!(result.is_err());
    }
}
