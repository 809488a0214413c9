//! Decoded image metadata, partitioned by tagging standard.
//!
//! A [`TagBag`] is the read-only result of decoding one image file. Rather
//! than an open dictionary keyed by arbitrary tag names, each standard the
//! resolvers consult is a fixed struct of optional fields — an unrecognized
//! tag is simply absent, never silently coerced.
//!
//! Three embedded standards compete for the same information:
//!
//! - **EXIF** ([`ExifTags`]): camera firmware tags. Carries the
//!   original-capture timestamp and its sub-second / timezone companions.
//! - **XMP** ([`XmpTags`]): the Adobe publishing namespace. Carries an
//!   ISO-8601 creation date plus title and description.
//! - **IPTC-IIM** ([`IptcTags`]): the press wire-service record. Carries a
//!   `CCYYMMDD` date, an `HHMMSS±HHMM` time, object name, and caption.
//!
//! A fourth namespace, [`HeaderTags`], holds dimensions read from the file
//! container itself. Exactly one header family is populated per image —
//! the enum makes a second family unrepresentable.

/// A decoded tag: the typed value plus the decoder's human-readable
/// rendering of it.
///
/// Both are kept because the standards disagree about which one matters:
/// EXIF and IPTC dates arrive as pre-formatted description strings, while
/// container dimensions are typed numbers. Date resolution reads
/// `description`; dimension resolution reads `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagValue<T = String> {
    pub value: T,
    pub description: String,
}

impl TagValue<String> {
    /// A textual tag whose value and description are the same string.
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        Self {
            description: s.clone(),
            value: s,
        }
    }
}

impl TagValue<u32> {
    /// A numeric tag; the description is the decimal rendering.
    pub fn number(n: u32) -> Self {
        Self {
            value: n,
            description: n.to_string(),
        }
    }
}

/// Camera-native (EXIF) tags.
///
/// Only the original-capture triple is modeled: the primary timestamp and
/// its two optional refinements. `date_time_original` uses the EXIF grammar
/// `yyyy:MM:dd HH:mm:ss` in unspecified local time; `subsec_time_original`
/// holds fractional-second digits; `offset_time_original` holds a `±HH:MM`
/// UTC offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExifTags {
    pub date_time_original: Option<TagValue>,
    pub subsec_time_original: Option<TagValue>,
    pub offset_time_original: Option<TagValue>,
}

/// Publishing-namespace (XMP) tags.
///
/// `create_date` is already ISO-8601, possibly partial (date-only) and
/// possibly offset-less. `title` and `description` feed the optional
/// id / alt fields of a photo record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmpTags {
    pub create_date: Option<TagValue>,
    pub title: Option<TagValue>,
    pub description: Option<TagValue>,
}

/// Wire-service (IPTC-IIM) tags from Application Record 2.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IptcTags {
    /// DateCreated (2:55), format `CCYYMMDD`.
    pub date_created: Option<TagValue>,
    /// TimeCreated (2:60), format `HHMMSS±HHMM` or offset-less `HHMMSS`.
    pub time_created: Option<TagValue>,
    /// ObjectName (2:05) — the "Title" field in most DAM software.
    pub object_name: Option<TagValue>,
    /// Caption-Abstract (2:120) — the "Caption" field.
    pub caption: Option<TagValue>,
    /// Keywords (2:25), repeatable.
    pub keywords: Vec<String>,
}

/// Dimensions read from the file container header.
///
/// Which family is populated depends on the container format, and they are
/// mutually exclusive: RIFF-based files (WebP) store dimensions in RIFF
/// chunks, PNG in its IHDR, and everything else in the generic decoded
/// header. Fields are `Option` because a malformed file can expose a
/// header without usable dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderTags {
    Riff {
        width: Option<TagValue<u32>>,
        height: Option<TagValue<u32>>,
    },
    Png {
        width: Option<TagValue<u32>>,
        height: Option<TagValue<u32>>,
    },
    Generic {
        width: Option<TagValue<u32>>,
        height: Option<TagValue<u32>>,
    },
}

impl HeaderTags {
    /// Build a fully-populated RIFF-family header.
    pub fn riff(width: u32, height: u32) -> Self {
        Self::Riff {
            width: Some(TagValue::number(width)),
            height: Some(TagValue::number(height)),
        }
    }

    /// Build a fully-populated PNG-family header.
    pub fn png(width: u32, height: u32) -> Self {
        Self::Png {
            width: Some(TagValue::number(width)),
            height: Some(TagValue::number(height)),
        }
    }

    /// Build a fully-populated generic header.
    pub fn generic(width: u32, height: u32) -> Self {
        Self::Generic {
            width: Some(TagValue::number(width)),
            height: Some(TagValue::number(height)),
        }
    }
}

impl Default for HeaderTags {
    fn default() -> Self {
        Self::Generic {
            width: None,
            height: None,
        }
    }
}

/// All decoded metadata for one image, immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagBag {
    pub exif: ExifTags,
    pub xmp: XmpTags,
    pub iptc: IptcTags,
    pub header: HeaderTags,
}
