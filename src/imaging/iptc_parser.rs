//! Minimal IPTC-IIM parser for JPEG and TIFF payloads.
//!
//! Extracts five fields from IPTC Application Record 2:
//! - ObjectName (2:05) — title
//! - Keywords (2:25) — repeatable, collected into a Vec
//! - DateCreated (2:55) — `CCYYMMDD`
//! - TimeCreated (2:60) — `HHMMSS±HHMM`
//! - Caption-Abstract (2:120) — description
//!
//! For JPEG: reads from the APP13 marker (Photoshop 8BIM resource 0x0404).
//! For TIFF: reads from IFD tag 33723 (IPTC-NAA, raw IIM bytes), falling
//! back to tag 34377 (Photoshop resource block).
//!
//! Zero external dependencies — pure Rust.

use crate::tags::{IptcTags, TagValue};

/// Read IPTC metadata from raw JPEG bytes. Returns empty tags on any
/// parse failure.
pub fn from_jpeg(bytes: &[u8]) -> IptcTags {
    match find_jpeg_app13_iptc(bytes) {
        Some(iim) => parse_iptc_iim(iim),
        None => IptcTags::default(),
    }
}

/// Read IPTC metadata from raw TIFF bytes. Returns empty tags on any
/// parse failure.
pub fn from_tiff(bytes: &[u8]) -> IptcTags {
    read_iptc_from_tiff(bytes)
}

// ---------------------------------------------------------------------------
// IPTC-IIM record parsing
// ---------------------------------------------------------------------------

const DATASET_OBJECT_NAME: u8 = 5;
const DATASET_KEYWORDS: u8 = 25;
const DATASET_DATE_CREATED: u8 = 55;
const DATASET_TIME_CREATED: u8 = 60;
const DATASET_CAPTION: u8 = 120;

/// Parse raw IPTC-IIM bytes into structured tags.
///
/// IIM record format (each dataset):
///   Byte 0:    0x1C (tag marker)
///   Byte 1:    Record number (we want 0x02)
///   Byte 2:    Dataset number
///   Bytes 3-4: Data length (big-endian u16)
///   Bytes 5+:  Data (UTF-8/ASCII string)
fn parse_iptc_iim(data: &[u8]) -> IptcTags {
    let mut tags = IptcTags::default();
    let mut pos = 0;

    while pos + 5 <= data.len() {
        if data[pos] != 0x1C {
            pos += 1;
            continue;
        }

        let record = data[pos + 1];
        let dataset = data[pos + 2];
        let length = u16::from_be_bytes([data[pos + 3], data[pos + 4]]) as usize;
        pos += 5;

        if pos + length > data.len() {
            break;
        }

        // Only care about Record 2 (Application Record)
        if record == 2 {
            let value = String::from_utf8_lossy(&data[pos..pos + length])
                .trim()
                .to_string();

            if !value.is_empty() {
                match dataset {
                    DATASET_OBJECT_NAME => tags.object_name = Some(TagValue::text(value)),
                    DATASET_KEYWORDS => tags.keywords.push(value),
                    DATASET_DATE_CREATED => tags.date_created = Some(TagValue::text(value)),
                    DATASET_TIME_CREATED => tags.time_created = Some(TagValue::text(value)),
                    DATASET_CAPTION => tags.caption = Some(TagValue::text(value)),
                    _ => {}
                }
            }
        }

        pos += length;
    }

    tags
}

fn has_any(tags: &IptcTags) -> bool {
    tags.object_name.is_some()
        || tags.caption.is_some()
        || tags.date_created.is_some()
        || tags.time_created.is_some()
        || !tags.keywords.is_empty()
}

// ---------------------------------------------------------------------------
// JPEG: extract IPTC from APP13 / Photoshop 8BIM
// ---------------------------------------------------------------------------

const PHOTOSHOP_HEADER: &[u8] = b"Photoshop 3.0\0";
const BIM_MARKER: &[u8] = b"8BIM";
const IPTC_RESOURCE_ID: u16 = 0x0404;

/// Find the raw IPTC-IIM bytes inside a JPEG's APP13 segment.
///
/// Structure: APP13 contains "Photoshop 3.0\0" header, then 8BIM resource
/// blocks. Resource 0x0404 contains the raw IPTC-IIM data.
fn find_jpeg_app13_iptc(data: &[u8]) -> Option<&[u8]> {
    // Find APP13 marker (0xFF 0xED)
    let mut pos = 0;
    while pos + 4 < data.len() {
        if data[pos] == 0xFF && data[pos + 1] == 0xED {
            let seg_len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
            let seg_start = pos + 4;
            let seg_end = (pos + 2 + seg_len).min(data.len());
            let segment = &data[seg_start..seg_end];

            if let Some(iptc) = extract_iptc_from_8bim(segment) {
                return Some(iptc);
            }
        }

        // Advance: if 0xFF, skip marker + length; otherwise byte-by-byte
        if data[pos] == 0xFF && pos + 3 < data.len() && data[pos + 1] != 0x00 {
            let marker = data[pos + 1];
            // SOS (0xDA) means image data starts — stop scanning
            if marker == 0xDA {
                break;
            }
            // Markers without length field
            if marker == 0xD8 || marker == 0xD9 || (0xD0..=0xD7).contains(&marker) {
                pos += 2;
            } else {
                let len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
                pos += 2 + len;
            }
        } else {
            pos += 1;
        }
    }
    None
}

/// Extract IPTC-IIM bytes from a Photoshop 8BIM resource block.
///
/// Input: segment data after the JPEG marker header, starting with
/// "Photoshop 3.0\0" or directly with "8BIM" entries.
fn extract_iptc_from_8bim(segment: &[u8]) -> Option<&[u8]> {
    let data = if segment.starts_with(PHOTOSHOP_HEADER) {
        &segment[PHOTOSHOP_HEADER.len()..]
    } else {
        segment
    };

    let mut pos = 0;
    while pos + 12 <= data.len() {
        // Each resource: "8BIM" (4) + resource_id (2) + pascal_string + data_len (4) + data
        if &data[pos..pos + 4] != BIM_MARKER {
            pos += 1;
            continue;
        }
        pos += 4;

        if pos + 2 > data.len() {
            break;
        }
        let resource_id = u16::from_be_bytes([data[pos], data[pos + 1]]);
        pos += 2;

        // Pascal string: 1 byte length + string, padded to even total
        if pos >= data.len() {
            break;
        }
        let pascal_len = data[pos] as usize;
        let pascal_total = 1 + pascal_len + ((1 + pascal_len) % 2); // pad to even
        pos += pascal_total;

        if pos + 4 > data.len() {
            break;
        }
        let res_len =
            u32::from_be_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]]) as usize;
        pos += 4;

        if pos + res_len > data.len() {
            break;
        }

        if resource_id == IPTC_RESOURCE_ID {
            return Some(&data[pos..pos + res_len]);
        }

        // Advance past data, padded to even
        pos += res_len + (res_len % 2);
    }

    None
}

// ---------------------------------------------------------------------------
// TIFF: extract IPTC from IFD tags
// ---------------------------------------------------------------------------

/// Read IPTC-IIM from a TIFF file.
fn read_iptc_from_tiff(data: &[u8]) -> IptcTags {
    if data.len() < 8 {
        return IptcTags::default();
    }

    // Determine byte order
    let big_endian = match &data[0..2] {
        b"MM" => true,
        b"II" => false,
        _ => return IptcTags::default(),
    };

    let read_u16 = |offset: usize| -> u16 {
        if big_endian {
            u16::from_be_bytes([data[offset], data[offset + 1]])
        } else {
            u16::from_le_bytes([data[offset], data[offset + 1]])
        }
    };

    let read_u32 = |offset: usize| -> u32 {
        if big_endian {
            u32::from_be_bytes([
                data[offset],
                data[offset + 1],
                data[offset + 2],
                data[offset + 3],
            ])
        } else {
            u32::from_le_bytes([
                data[offset],
                data[offset + 1],
                data[offset + 2],
                data[offset + 3],
            ])
        }
    };

    // Verify TIFF magic (42)
    if read_u16(2) != 42 {
        return IptcTags::default();
    }

    let mut ifd_offset = read_u32(4) as usize;

    // TIFF type sizes: count is number of values, not bytes.
    let type_size = |typ: u16| -> usize {
        match typ {
            1 | 2 | 6 | 7 => 1, // BYTE, ASCII, SBYTE, UNDEFINED
            3 | 8 => 2,         // SHORT, SSHORT
            4 | 9 | 11 => 4,    // LONG, SLONG, FLOAT
            5 | 10 | 12 => 8,   // RATIONAL, SRATIONAL, DOUBLE
            _ => 1,
        }
    };

    // Walk IFD chain (main IFD + linked IFDs)
    while ifd_offset > 0 && ifd_offset + 2 < data.len() {
        let entry_count = read_u16(ifd_offset) as usize;
        let entries_start = ifd_offset + 2;

        for i in 0..entry_count {
            let entry_offset = entries_start + i * 12;
            if entry_offset + 12 > data.len() {
                return IptcTags::default();
            }

            let tag = read_u16(entry_offset);
            let typ = read_u16(entry_offset + 2);
            let count = read_u32(entry_offset + 4) as usize;
            let byte_len = count * type_size(typ);
            let value_offset = read_u32(entry_offset + 8) as usize;

            // Tag 33723: IPTC-NAA — raw IPTC-IIM bytes
            if tag == 33723 && value_offset + byte_len <= data.len() {
                let tags = parse_iptc_iim(&data[value_offset..value_offset + byte_len]);
                if has_any(&tags) {
                    return tags;
                }
            }

            // Tag 34377: Photoshop Image Resources — contains 8BIM blocks
            if tag == 34377 && value_offset + byte_len <= data.len() {
                let photoshop_data = &data[value_offset..value_offset + byte_len];
                if let Some(iim) = extract_iptc_from_8bim(photoshop_data) {
                    let tags = parse_iptc_iim(iim);
                    if has_any(&tags) {
                        return tags;
                    }
                }
            }
        }

        // Next IFD offset
        let next_offset_pos = entries_start + entry_count * 12;
        if next_offset_pos + 4 <= data.len() {
            ifd_offset = read_u32(next_offset_pos) as usize;
        } else {
            break;
        }
    }

    IptcTags::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(number: u8, value: &str) -> Vec<u8> {
        let mut bytes = vec![0x1C, 0x02, number, 0x00, value.len() as u8];
        bytes.extend_from_slice(value.as_bytes());
        bytes
    }

    #[test]
    fn parse_empty_returns_default() {
        assert_eq!(parse_iptc_iim(&[]), IptcTags::default());
    }

    #[test]
    fn parse_single_object_name() {
        let data = dataset(5, "Hello");
        let tags = parse_iptc_iim(&data);
        assert_eq!(tags.object_name, Some(TagValue::text("Hello")));
        assert_eq!(tags.caption, None);
        assert!(tags.keywords.is_empty());
    }

    #[test]
    fn parse_caption() {
        let data = dataset(120, "test");
        let tags = parse_iptc_iim(&data);
        assert_eq!(tags.caption, Some(TagValue::text("test")));
    }

    #[test]
    fn parse_date_and_time_created() {
        let mut data = dataset(55, "20220101");
        data.extend(dataset(60, "000001+0000"));
        let tags = parse_iptc_iim(&data);
        assert_eq!(tags.date_created, Some(TagValue::text("20220101")));
        assert_eq!(tags.time_created, Some(TagValue::text("000001+0000")));
    }

    #[test]
    fn parse_multiple_keywords() {
        let mut data = dataset(25, "snow");
        data.extend(dataset(25, "winter"));
        let tags = parse_iptc_iim(&data);
        assert_eq!(tags.keywords, vec!["snow", "winter"]);
    }

    #[test]
    fn parse_all_fields_together() {
        let mut data = dataset(5, "Title");
        data.extend(dataset(25, "art"));
        data.extend(dataset(55, "20220101"));
        data.extend(dataset(120, "A caption"));
        data.extend(dataset(25, "photo"));

        let tags = parse_iptc_iim(&data);
        assert_eq!(tags.object_name, Some(TagValue::text("Title")));
        assert_eq!(tags.caption, Some(TagValue::text("A caption")));
        assert_eq!(tags.date_created, Some(TagValue::text("20220101")));
        assert_eq!(tags.keywords, vec!["art", "photo"]);
    }

    #[test]
    fn skips_non_record2() {
        // Record 1, Dataset 5 — should be ignored
        let data = [0x1C, 0x01, 0x05, 0x00, 0x03, b'f', b'o', b'o'];
        assert_eq!(parse_iptc_iim(&data), IptcTags::default());
    }

    #[test]
    fn jpeg_without_app13_is_empty() {
        // SOI + EOI only
        assert_eq!(from_jpeg(&[0xFF, 0xD8, 0xFF, 0xD9]), IptcTags::default());
    }

    #[test]
    fn jpeg_app13_round_trip() {
        // Build a minimal JPEG: SOI + APP13(Photoshop/8BIM/IPTC) + EOI
        let iim = dataset(5, "Title");

        let mut resource = Vec::new();
        resource.extend_from_slice(PHOTOSHOP_HEADER);
        resource.extend_from_slice(BIM_MARKER);
        resource.extend_from_slice(&IPTC_RESOURCE_ID.to_be_bytes());
        resource.extend_from_slice(&[0x00, 0x00]); // empty pascal name, padded
        resource.extend_from_slice(&(iim.len() as u32).to_be_bytes());
        resource.extend_from_slice(&iim);

        let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xED];
        jpeg.extend_from_slice(&((resource.len() + 2) as u16).to_be_bytes());
        jpeg.extend_from_slice(&resource);
        jpeg.extend_from_slice(&[0xFF, 0xD9]);

        let tags = from_jpeg(&jpeg);
        assert_eq!(tags.object_name, Some(TagValue::text("Title")));
    }

    #[test]
    fn tiff_with_bad_magic_is_empty() {
        assert_eq!(from_tiff(b"XX\x00\x2A\x00\x00\x00\x08"), IptcTags::default());
    }

    #[test]
    fn tiff_iptc_naa_tag_round_trip() {
        // Little-endian TIFF with one IFD entry: tag 33723 pointing at IIM data
        let iim = dataset(55, "20220101");

        let mut tiff = Vec::new();
        tiff.extend_from_slice(b"II");
        tiff.extend_from_slice(&42u16.to_le_bytes());
        tiff.extend_from_slice(&8u32.to_le_bytes()); // IFD at offset 8

        // IFD: 1 entry
        tiff.extend_from_slice(&1u16.to_le_bytes());
        tiff.extend_from_slice(&33723u16.to_le_bytes()); // tag
        tiff.extend_from_slice(&7u16.to_le_bytes()); // type UNDEFINED
        tiff.extend_from_slice(&(iim.len() as u32).to_le_bytes()); // count
        let value_offset = 8 + 2 + 12 + 4; // after IFD + next-IFD pointer
        tiff.extend_from_slice(&(value_offset as u32).to_le_bytes());
        tiff.extend_from_slice(&0u32.to_le_bytes()); // no next IFD
        tiff.extend_from_slice(&iim);

        let tags = from_tiff(&tiff);
        assert_eq!(tags.date_created, Some(TagValue::text("20220101")));
    }
}
