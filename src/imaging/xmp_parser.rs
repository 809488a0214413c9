//! Minimal XMP packet scanner.
//!
//! Locates the `x:xmpmeta` packet embedded in an image (JPEG APP1, PNG
//! iTXt, WebP XMP chunk — the packet body is identical everywhere) and
//! extracts the three fields the resolvers consult:
//! - `xmp:CreateDate` — ISO-8601 creation date
//! - `dc:title` — title (first `rdf:li` of the language alternative)
//! - `dc:description` — description (same structure)
//!
//! This is not an XML parser. XMP serializers emit the fields either as
//! attributes on `rdf:Description` or as child elements, and both shapes
//! are handled by plain string scanning over the packet. Anything else in
//! the packet is ignored. Zero external dependencies.

use crate::tags::{TagValue, XmpTags};

const PACKET_OPEN: &[u8] = b"<x:xmpmeta";
const PACKET_CLOSE: &[u8] = b"</x:xmpmeta>";

/// Scan raw file bytes for an XMP packet and extract the known fields.
/// Returns empty tags when no packet is present.
pub fn from_bytes(bytes: &[u8]) -> XmpTags {
    let Some(packet) = find_packet(bytes) else {
        return XmpTags::default();
    };

    XmpTags {
        create_date: field(&packet, "xmp:CreateDate").map(TagValue::text),
        title: alt_field(&packet, "dc:title").map(TagValue::text),
        description: alt_field(&packet, "dc:description").map(TagValue::text),
    }
}

fn find_packet(bytes: &[u8]) -> Option<String> {
    let start = find(bytes, PACKET_OPEN)?;
    let end = find(&bytes[start..], PACKET_CLOSE)? + start + PACKET_CLOSE.len();
    Some(String::from_utf8_lossy(&bytes[start..end]).into_owned())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// A simple field: attribute form `name="value"` or element form
/// `<name>value</name>`.
fn field(packet: &str, name: &str) -> Option<String> {
    attribute_value(packet, name)
        .or_else(|| element_text(packet, name).map(str::to_string))
        .map(|s| unescape(s.trim()))
        .filter(|s| !s.is_empty())
}

/// A language-alternative field: the value lives in the first `rdf:li`
/// inside the element. Attribute form is also accepted.
fn alt_field(packet: &str, name: &str) -> Option<String> {
    let from_alt = element_text(packet, name).and_then(|inner| element_text(inner, "rdf:li"));
    from_alt
        .map(str::to_string)
        .or_else(|| attribute_value(packet, name))
        .map(|s| unescape(s.trim()))
        .filter(|s| !s.is_empty())
}

/// Find `name="value"` or `name='value'`.
fn attribute_value(packet: &str, name: &str) -> Option<String> {
    for quote in ['"', '\''] {
        let pattern = format!("{name}={quote}");
        if let Some(start) = packet.find(&pattern) {
            let rest = &packet[start + pattern.len()..];
            if let Some(end) = rest.find(quote) {
                return Some(rest[..end].to_string());
            }
        }
    }
    None
}

/// Find the inner text of `<name ...>inner</name>`.
fn element_text<'a>(packet: &'a str, name: &str) -> Option<&'a str> {
    let open = format!("<{name}");
    let close = format!("</{name}>");

    let open_at = packet.find(&open)?;
    let after_open = &packet[open_at + open.len()..];
    // the opening tag ends at '>'; a self-closing tag has no inner text
    let tag_end = after_open.find('>')?;
    if after_open[..tag_end].ends_with('/') {
        return None;
    }
    let inner = &after_open[tag_end + 1..];
    let close_at = inner.find(&close)?;
    Some(&inner[..close_at])
}

fn unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
