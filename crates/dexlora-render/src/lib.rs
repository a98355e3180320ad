#![forbid(unsafe_code)]

//! Software rendering primitives for DexLora background effects.
//!
//! Effects draw into a flat `[PackedRgba]` buffer owned by a [`PixelSurface`];
//! the host uploads the surface to its presentation target (a 2D canvas on
//! the web, a test sink natively) through [`PixelSurface::write_rgba8`].

pub mod color;
pub mod surface;

pub use color::PackedRgba;
pub use surface::PixelSurface;
