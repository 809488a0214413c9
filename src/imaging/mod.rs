//! Image decoding, tag extraction, and resize execution — pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Dimensions** | `image` crate header decode |
//! | **EXIF tags** | `kamadak-exif` |
//! | **IPTC tags** | custom parser (JPEG APP13 + TIFF IFD) |
//! | **XMP tags** | custom packet scanner |
//! | **Resize** | Lanczos3 + format-preserving re-encode |
//! | **Metadata pass-through** | `img-parts` segment/chunk copy |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for resize math (unit testable)
//! - **Parameters**: Data structures describing resize operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Parsers**: IPTC-IIM and XMP extraction feeding the TagBag

pub mod backend;
mod calculations;
pub(crate) mod iptc_parser;
mod params;
pub mod rust_backend;
pub(crate) mod xmp_parser;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{contain_dimensions, plan_target};
pub use params::{Quality, ResizeParams, ResizeRequest};
pub use rust_backend::RustBackend;
