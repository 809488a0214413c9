//! Pixel-dimension resolution from container headers.
//!
//! Where an image stores its dimensions depends on the container: RIFF
//! files (WebP) carry them in RIFF chunks, PNG in its IHDR, and everything
//! else in the generic decoded file header. The decoder populates exactly
//! one [`HeaderTags`] family per image, so this is a dispatch on which
//! family is present, not a fallback chain. Values are pixels; no scaling
//! or unit conversion.

use crate::tags::{HeaderTags, TagBag, TagValue};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DimensionError {
    /// No recognized namespace yielded both width and height. The photo
    /// cannot be processed at all without dimensions.
    #[error("cannot determine image dimensions")]
    DimensionUnavailable,
}

/// Read width and height from the populated header family.
pub fn resolve(tags: &TagBag) -> Result<(u32, u32), DimensionError> {
    let (width, height) = match &tags.header {
        HeaderTags::Riff { width, height }
        | HeaderTags::Png { width, height }
        | HeaderTags::Generic { width, height } => (width, height),
    };
    both(width, height).ok_or(DimensionError::DimensionUnavailable)
}

fn both(width: &Option<TagValue<u32>>, height: &Option<TagValue<u32>>) -> Option<(u32, u32)> {
    Some((width.as_ref()?.value, height.as_ref()?.value))
}
