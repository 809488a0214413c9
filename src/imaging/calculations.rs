//! Pure calculation functions for resize dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Compute the bounding rectangle for a resize from the side bounds.
///
/// The shorter-edge bound defaults to the longer-edge bound when absent.
/// Orientation follows the source: a landscape source gets
/// `(large, short)`, everything else (portrait or square) `(short, large)`.
///
/// # Examples
/// ```
/// # use photo_manifest::imaging::plan_target;
/// // 1600x1064 landscape bounded to 800 long / 600 short
/// assert_eq!(plan_target((1600, 1064), 800, Some(600)), (800, 600));
///
/// // portrait source flips the rectangle
/// assert_eq!(plan_target((1064, 1600), 800, Some(600)), (600, 800));
/// ```
pub fn plan_target(
    source: (u32, u32),
    large_side_max: u32,
    small_side_max: Option<u32>,
) -> (u32, u32) {
    let (width, height) = source;
    let short = small_side_max.unwrap_or(large_side_max);

    if width > height {
        (large_side_max, short)
    } else {
        (short, large_side_max)
    }
}

/// Scale source dimensions down to fit within a bounding rectangle.
///
/// Contain semantics: the true aspect ratio is preserved and the result
/// fits inside `bounds` on both axes. The image is never scaled up — if
/// the source already fits, it is returned unchanged. Either axis rounds
/// to at least 1 pixel.
pub fn contain_dimensions(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (bound_w, bound_h) = bounds;

    let scale = (bound_w as f64 / src_w as f64)
        .min(bound_h as f64 / src_h as f64)
        .min(1.0);

    let width = ((src_w as f64 * scale).round() as u32).max(1);
    let height = ((src_h as f64 * scale).round() as u32).max(1);
    (width, height)
}
