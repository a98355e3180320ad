#![forbid(unsafe_code)]

//! Browser frontend for the DexLora site.
//!
//! On `wasm32` this crate exports [`DexloraWeb`] through `wasm-bindgen`. It
//! renders a page into a root element, then drives its background effects:
//! - `IntersectionObserver` gates each effect mount,
//! - each mount's surfaces are `<canvas>` elements painted with `ImageData`,
//! - one `requestAnimationFrame` loop runs while any effect wants frames.
//!
//! The contact form posts through the `fetch`-backed HTTP transport.

pub mod dom_event;

#[cfg(target_arch = "wasm32")]
mod canvas;
#[cfg(target_arch = "wasm32")]
mod observer;
#[cfg(target_arch = "wasm32")]
mod raf;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::DexloraWeb;

/// Native builds compile this crate as a stub so workspace checks stay green
/// on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct DexloraWeb;

#[cfg(not(target_arch = "wasm32"))]
impl DexloraWeb {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
