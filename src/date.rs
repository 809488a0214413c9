//! Capture-date resolution across competing metadata standards.
//!
//! Each of the three embedded standards writes dates in its own grammar:
//!
//! | Source | Primary tag | Grammar |
//! |--------|-------------|---------|
//! | EXIF | DateTimeOriginal | `yyyy:MM:dd HH:mm:ss`, local time, optional sub-second and `±HH:MM` offset companions |
//! | XMP | CreateDate | ISO-8601, full or partial, offset optional |
//! | IPTC | DateCreated (+ TimeCreated) | `CCYYMMDD`, optionally `HHMMSS±HHMM` |
//!
//! [`resolve`] tries them strictly in that order. The first source whose
//! primary tag is present is used exclusively — once EXIF has a timestamp,
//! an XMP or IPTC date is never consulted, even if the EXIF value turns out
//! to be unparseable. When no source yields an instant, the file's on-disk
//! creation time is used and one warning naming the file goes to the sink.
//! Resolution itself never fails.
//!
//! ## Timezone caveat
//!
//! Offset-less timestamps (the overwhelmingly common case for EXIF) are
//! interpreted in the *host's* local timezone, so the same file resolves to
//! different instants on hosts configured differently. This mirrors how
//! every mainstream photo tool reads these tags; normalizing to UTC instead
//! would disagree with what the photographer's other software displays.
//! Output is always converted to UTC regardless of which branch produced it.

use crate::diag::DiagnosticSink;
use crate::tags::{ExifTags, IptcTags, TagBag, XmpTags};
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use std::path::Path;

/// The closed set of date sources, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateSource {
    CameraNative,
    Publishing,
    WireService,
}

impl DateSource {
    const PRECEDENCE: [DateSource; 3] = [
        DateSource::CameraNative,
        DateSource::Publishing,
        DateSource::WireService,
    ];

    /// Whether this source's primary tag exists in the bag. Presence alone
    /// selects the source; parseability is checked afterwards.
    fn primary_present(self, tags: &TagBag) -> bool {
        match self {
            DateSource::CameraNative => tags.exif.date_time_original.is_some(),
            DateSource::Publishing => tags.xmp.create_date.is_some(),
            DateSource::WireService => tags.iptc.date_created.is_some(),
        }
    }

    fn parse(self, tags: &TagBag) -> Option<DateTime<Utc>> {
        match self {
            DateSource::CameraNative => parse_camera_native(&tags.exif),
            DateSource::Publishing => parse_publishing(&tags.xmp),
            DateSource::WireService => parse_wire_service(&tags.iptc),
        }
    }
}

/// Resolve a single absolute instant for a photo.
///
/// `fallback` is the file's on-disk creation (birth) timestamp; it is used
/// only when no metadata source yields a date, and doing so emits one
/// diagnostic naming `file`. The result is UTC with millisecond precision.
pub fn resolve(
    tags: &TagBag,
    fallback: DateTime<Utc>,
    file: &Path,
    diag: &dyn DiagnosticSink,
) -> DateTime<Utc> {
    let selected = DateSource::PRECEDENCE
        .into_iter()
        .find(|source| source.primary_present(tags));

    match selected.and_then(|source| source.parse(tags)) {
        Some(instant) => truncate_to_millis(instant),
        None => {
            diag.warn(&format!(
                "Cannot read create date from metadata in {}, using file creation time instead",
                file.display()
            ));
            truncate_to_millis(fallback)
        }
    }
}

// ---------------------------------------------------------------------------
// Per-source grammars
// ---------------------------------------------------------------------------

/// EXIF `yyyy:MM:dd HH:mm:ss` with the sub-second and offset companions
/// merged in before parsing.
fn parse_camera_native(exif: &ExifTags) -> Option<DateTime<Utc>> {
    let primary = exif.date_time_original.as_ref()?;

    let subsec = exif
        .subsec_time_original
        .as_ref()
        .map(|tag| tag.description.as_str())
        .unwrap_or("");
    let mut stamp = format!("{}.{}", primary.description.trim(), pad_millis(subsec));

    match &exif.offset_time_original {
        Some(offset) => {
            stamp.push_str(offset.description.trim());
            DateTime::parse_from_str(&stamp, "%Y:%m:%d %H:%M:%S%.3f%:z")
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        }
        None => NaiveDateTime::parse_from_str(&stamp, "%Y:%m:%d %H:%M:%S%.3f")
            .ok()
            .map(local_to_utc),
    }
}

/// XMP CreateDate: ISO-8601, full or partial. Offset-less forms are local
/// time; a bare date is midnight local.
fn parse_publishing(xmp: &XmpTags) -> Option<DateTime<Utc>> {
    let primary = xmp.create_date.as_ref()?;
    parse_iso(primary.description.trim())
}

fn parse_iso(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Offset-bearing forms RFC 3339 rejects (minute precision, no seconds)
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(local_to_utc(naive));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|date| local_to_utc(date.and_time(NaiveTime::MIN)))
}

/// IPTC `CCYYMMDD` plus optional `HHMMSS±HHMM`, joined with a literal `T`.
fn parse_wire_service(iptc: &IptcTags) -> Option<DateTime<Utc>> {
    let date = iptc.date_created.as_ref()?;

    match &iptc.time_created {
        Some(time) => {
            let stamp = format!("{}T{}", date.description.trim(), time.description.trim());
            DateTime::parse_from_str(&stamp, "%Y%m%dT%H%M%S%z")
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
                .or_else(|| {
                    NaiveDateTime::parse_from_str(&stamp, "%Y%m%dT%H%M%S")
                        .ok()
                        .map(local_to_utc)
                })
        }
        None => NaiveDate::parse_from_str(date.description.trim(), "%Y%m%d")
            .ok()
            .map(|d| local_to_utc(d.and_time(NaiveTime::MIN))),
    }
}

// ---------------------------------------------------------------------------
// Shared pieces
// ---------------------------------------------------------------------------

/// Right-pad or truncate sub-second digits to exactly three, so `789` stays
/// `.789`, `7` becomes `.700`, and `12345` becomes `.123`.
fn pad_millis(digits: &str) -> String {
    let head: String = digits.trim().chars().take(3).collect();
    format!("{head:0<3}")
}

/// Interpret a naive timestamp in the host's local timezone and convert to
/// UTC. An ambiguous wall-clock time (DST fall-back) takes the earlier
/// mapping; a skipped one (DST spring-forward) is read as UTC.
fn local_to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

fn truncate_to_millis(instant: DateTime<Utc>) -> DateTime<Utc> {
    let sub_millis = instant.timestamp_subsec_nanos() % 1_000_000;
    instant - Duration::nanoseconds(sub_millis as i64)
}
