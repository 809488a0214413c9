//! Pure Rust image backend — zero external dependencies.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode + dimensions (JPEG, PNG, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | EXIF tags | `kamadak-exif` (`Reader::read_from_container`) |
//! | IPTC tags | custom `iptc_parser` (JPEG APP13 + TIFF IFD) |
//! | XMP tags | custom `xmp_parser` (packet scan) |
//! | Resize | `image::imageops` with `Lanczos3` filter |
//! | Metadata pass-through on re-encode | `img-parts` (JPEG segments, PNG/WebP chunks) |
//!
//! The header-family namespace is chosen by container format: WebP files
//! report dimensions under the RIFF family, PNG under the PNG family, and
//! everything else under the generic family.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::ResizeParams;
use super::{iptc_parser, xmp_parser};
use crate::tags::{ExifTags, HeaderTags, IptcTags, TagBag, TagValue};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use img_parts::{Bytes, ImageEXIF, ImageICC};
use std::io::Cursor;
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn read_tags(&self, path: &Path) -> Result<TagBag, BackendError> {
        let bytes = std::fs::read(path)?;

        let format = image::guess_format(&bytes)
            .map_err(|_| BackendError::InvalidImage(path.to_path_buf()))?;
        let (width, height) = ImageReader::with_format(Cursor::new(&bytes), format)
            .into_dimensions()
            .map_err(|_| BackendError::InvalidImage(path.to_path_buf()))?;

        let header = match format {
            ImageFormat::WebP => HeaderTags::riff(width, height),
            ImageFormat::Png => HeaderTags::png(width, height),
            _ => HeaderTags::generic(width, height),
        };

        Ok(TagBag {
            exif: read_exif(&bytes),
            xmp: xmp_parser::from_bytes(&bytes),
            iptc: read_iptc(&bytes, format),
            header,
        })
    }

    fn resize(&self, params: &ResizeParams) -> Result<Dimensions, BackendError> {
        let source_bytes = std::fs::read(&params.source)?;

        let format = image::guess_format(&source_bytes)
            .map_err(|_| BackendError::InvalidImage(params.source.clone()))?;
        let decoded = ImageReader::with_format(Cursor::new(&source_bytes), format)
            .decode()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!(
                    "Failed to decode {}: {}",
                    params.source.display(),
                    e
                ))
            })?;

        // Contain fit; skip scaling entirely when the source already fits
        // (never enlarge).
        let resized = if decoded.width() > params.width || decoded.height() > params.height {
            decoded.resize(params.width, params.height, FilterType::Lanczos3)
        } else {
            decoded
        };

        let encoded = encode(&resized, format, params)?;
        let output_bytes = preserve_metadata(format, &source_bytes, encoded);
        std::fs::write(&params.output, &output_bytes)?;

        Ok(Dimensions {
            width: resized.width(),
            height: resized.height(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tag extraction
// ---------------------------------------------------------------------------

fn read_exif(bytes: &[u8]) -> ExifTags {
    let exif = match exif::Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => exif,
        Err(_) => return ExifTags::default(),
    };

    ExifTags {
        date_time_original: ascii_field(&exif, exif::Tag::DateTimeOriginal),
        subsec_time_original: ascii_field(&exif, exif::Tag::SubSecTimeOriginal),
        offset_time_original: ascii_field(&exif, exif::Tag::OffsetTimeOriginal),
    }
}

/// Read an ASCII EXIF field from the primary image as a trimmed string tag.
fn ascii_field(exif: &exif::Exif, tag: exif::Tag) -> Option<TagValue> {
    let field = exif.get_field(tag, exif::In::PRIMARY)?;
    let value = match &field.value {
        exif::Value::Ascii(lines) => lines
            .first()
            .map(|line| String::from_utf8_lossy(line).trim().to_string())?,
        _ => field.display_value().to_string(),
    };
    (!value.is_empty()).then(|| TagValue::text(value))
}

fn read_iptc(bytes: &[u8], format: ImageFormat) -> IptcTags {
    match format {
        ImageFormat::Jpeg => iptc_parser::from_jpeg(bytes),
        ImageFormat::Tiff => iptc_parser::from_tiff(bytes),
        _ => IptcTags::default(),
    }
}

// ---------------------------------------------------------------------------
// Re-encoding
// ---------------------------------------------------------------------------

/// Encode pixels back into the source's container format. Quality applies
/// to JPEG; PNG and WebP encodes in the `image` crate are lossless and
/// ignore it.
fn encode(
    pixels: &DynamicImage,
    format: ImageFormat,
    params: &ResizeParams,
) -> Result<Vec<u8>, BackendError> {
    let mut encoded = Vec::new();
    let failed = |e: image::ImageError| {
        BackendError::ProcessingFailed(format!(
            "Failed to encode {}: {}",
            params.output.display(),
            e
        ))
    };

    match format {
        ImageFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(pixels.to_rgb8());
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                Cursor::new(&mut encoded),
                params.quality.value() as u8,
            );
            rgb.write_with_encoder(encoder).map_err(failed)?;
        }
        _ => {
            pixels
                .write_to(&mut Cursor::new(&mut encoded), format)
                .map_err(failed)?;
        }
    }

    Ok(encoded)
}

const MARKER_APP1: u8 = 0xE1; // EXIF and XMP
const MARKER_APP2: u8 = 0xE2; // ICC profile
const MARKER_APP13: u8 = 0xED; // Photoshop / IPTC

/// Carry the source's embedded metadata over onto the re-encoded bytes.
///
/// JPEG: the APP1/APP2/APP13 segments (EXIF, XMP, ICC, IPTC) are copied
/// verbatim ahead of the encoder's own segments. PNG and WebP: the EXIF
/// and ICC payloads are carried via `img-parts`' chunk support.
///
/// A source whose structure `img-parts` cannot parse keeps its re-encoded
/// pixels and loses the metadata; resize output is never blocked on it.
fn preserve_metadata(format: ImageFormat, source: &[u8], encoded: Vec<u8>) -> Vec<u8> {
    match format {
        ImageFormat::Jpeg => preserve_jpeg_segments(source, encoded),
        ImageFormat::Png => preserve_png_chunks(source, encoded),
        ImageFormat::WebP => preserve_webp_chunks(source, encoded),
        _ => encoded,
    }
}

fn preserve_jpeg_segments(source: &[u8], encoded: Vec<u8>) -> Vec<u8> {
    use img_parts::jpeg::Jpeg;

    let Ok(source_jpeg) = Jpeg::from_bytes(Bytes::copy_from_slice(source)) else {
        return encoded;
    };
    let Ok(mut output) = Jpeg::from_bytes(Bytes::from(encoded.clone())) else {
        return encoded;
    };

    let preserved: Vec<_> = source_jpeg
        .segments()
        .iter()
        .filter(|segment| {
            matches!(segment.marker(), MARKER_APP1 | MARKER_APP2 | MARKER_APP13)
        })
        .cloned()
        .collect();

    for (index, segment) in preserved.into_iter().enumerate() {
        output.segments_mut().insert(index, segment);
    }

    output.encoder().bytes().to_vec()
}

fn preserve_png_chunks(source: &[u8], encoded: Vec<u8>) -> Vec<u8> {
    use img_parts::png::Png;

    let Ok(source_png) = Png::from_bytes(Bytes::copy_from_slice(source)) else {
        return encoded;
    };
    let Ok(mut output) = Png::from_bytes(Bytes::from(encoded.clone())) else {
        return encoded;
    };

    if let Some(exif) = source_png.exif() {
        output.set_exif(Some(exif));
    }
    if let Some(icc) = source_png.icc_profile() {
        output.set_icc_profile(Some(icc));
    }

    output.encoder().bytes().to_vec()
}

fn preserve_webp_chunks(source: &[u8], encoded: Vec<u8>) -> Vec<u8> {
    use img_parts::webp::WebP;

    let Ok(source_webp) = WebP::from_bytes(Bytes::copy_from_slice(source)) else {
        return encoded;
    };
    let Ok(mut output) = WebP::from_bytes(Bytes::from(encoded.clone())) else {
        return encoded;
    };

    if let Some(exif) = source_webp.exif() {
        output.set_exif(Some(exif));
    }
    if let Some(icc) = source_webp.icc_profile() {
        output.set_icc_profile(Some(icc));
    }

    output.encoder().bytes().to_vec()
}
