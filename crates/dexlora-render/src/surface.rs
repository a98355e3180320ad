#![forbid(unsafe_code)]

//! Owned pixel buffer that effects draw into.
//!
//! A [`PixelSurface`] is the "animation buffer" of a background effect: a
//! row-major `width * height` array of [`PackedRgba`]. It never reallocates
//! during a frame; [`PixelSurface::resize`] is the only operation that
//! changes its footprint.

use dexlora_core::geometry::Rect;

use crate::color::PackedRgba;

/// Row-major RGBA pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<PackedRgba>,
}

impl PixelSurface {
    /// Allocate a transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        let len = Self::len_for(width, height);
        Self {
            width,
            height,
            pixels: vec![PackedRgba::TRANSPARENT; len],
        }
    }

    #[inline]
    fn len_for(width: u32, height: u32) -> usize {
        (width as usize).saturating_mul(height as usize)
    }

    /// Width in pixels.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Surface bounds anchored at the origin.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Whether the surface holds no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Number of bytes held by the pixel buffer.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<PackedRgba>()
    }

    /// Resize, clearing contents. Returns `true` if the dimensions changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == self.width && height == self.height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels
            .resize(Self::len_for(width, height), PackedRgba::TRANSPARENT);
        #[cfg(feature = "tracing")]
        tracing::trace!(width, height, "pixel surface resized");
        true
    }

    /// Drop the backing allocation. The surface becomes `0x0`.
    pub fn release(&mut self) {
        self.width = 0;
        self.height = 0;
        self.pixels = Vec::new();
    }

    /// Fill every pixel.
    pub fn fill(&mut self, color: PackedRgba) {
        self.pixels.fill(color);
    }

    /// Read-only pixel slice.
    #[inline]
    pub fn pixels(&self) -> &[PackedRgba] {
        &self.pixels
    }

    /// Mutable pixel slice for effect rendering.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [PackedRgba] {
        &mut self.pixels
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Pixel at `(x, y)`, or `None` out of bounds.
    pub fn get(&self, x: i32, y: i32) -> Option<PackedRgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Overwrite the pixel at `(x, y)`; out-of-bounds writes are dropped.
    pub fn set(&mut self, x: i32, y: i32, color: PackedRgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Export as tightly packed `RGBA8` bytes (canvas `ImageData` layout).
    ///
    /// `out` is cleared and reused.
    pub fn write_rgba8(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.pixels.len() * 4);
        for px in &self.pixels {
            out.extend_from_slice(&[px.r(), px.g(), px.b(), px.a()]);
        }
    }
}

/// Blend helpers that operate on a raw pixel slice with known dimensions.
///
/// Effects receive `&mut [PackedRgba]` rather than a surface, so drawing
/// helpers take the slice and the dimensions explicitly.
pub mod raster {
    use super::PackedRgba;

    /// Additive soft disc centred on `(cx, cy)` with radius `r`.
    ///
    /// Falloff is quadratic toward the edge. Pixels outside the slice are skipped.
    pub fn glow_disc(
        out: &mut [PackedRgba],
        width: u32,
        height: u32,
        cx: f32,
        cy: f32,
        r: f32,
        color: PackedRgba,
    ) {
        if width == 0 || height == 0 || !(r > 0.0) || !cx.is_finite() || !cy.is_finite() {
            return;
        }
        let x0 = (cx - r).floor().max(0.0) as i64;
        let y0 = (cy - r).floor().max(0.0) as i64;
        let x1 = ((cx + r).ceil() as i64).min(width as i64 - 1);
        let y1 = ((cy + r).ceil() as i64).min(height as i64 - 1);
        let r2 = r * r;
        for y in y0..=y1 {
            let row = y as usize * width as usize;
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let d2 = dx * dx + dy * dy;
                if d2 >= r2 {
                    continue;
                }
                let falloff = 1.0 - d2 / r2;
                let idx = row + x as usize;
                if let Some(px) = out.get_mut(idx) {
                    *px = color.with_opacity(falloff * falloff).add_onto(*px);
                }
            }
        }
    }

    /// Solid disc with a one-pixel anti-aliased rim, composited over existing
    /// pixels.
    pub fn fill_disc(
        out: &mut [PackedRgba],
        width: u32,
        height: u32,
        cx: f32,
        cy: f32,
        r: f32,
        color: PackedRgba,
    ) {
        if width == 0 || height == 0 || !(r > 0.0) || !cx.is_finite() || !cy.is_finite() {
            return;
        }
        let x0 = (cx - r - 1.0).floor().max(0.0) as i64;
        let y0 = (cy - r - 1.0).floor().max(0.0) as i64;
        let x1 = ((cx + r + 1.0).ceil() as i64).min(width as i64 - 1);
        let y1 = ((cy + r + 1.0).ceil() as i64).min(height as i64 - 1);
        for y in y0..=y1 {
            let row = y as usize * width as usize;
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let coverage = (r + 0.5 - (dx * dx + dy * dy).sqrt()).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }
                if let Some(px) = out.get_mut(row + x as usize) {
                    *px = color.with_opacity(coverage).over(*px);
                }
            }
        }
    }

    /// Additive line segment of the given thickness with linear alpha taper
    /// from `start_alpha` to `end_alpha`.
    #[allow(clippy::too_many_arguments)]
    pub fn glow_line(
        out: &mut [PackedRgba],
        width: u32,
        height: u32,
        from: (f32, f32),
        to: (f32, f32),
        thickness: f32,
        color: PackedRgba,
        start_alpha: f32,
        end_alpha: f32,
    ) {
        if width == 0 || height == 0 || !(thickness > 0.0) {
            return;
        }
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let len = (dx * dx + dy * dy).sqrt();
        if !len.is_finite() {
            return;
        }
        let steps = len.ceil().clamp(1.0, 4096.0) as usize;
        let radius = thickness * 0.5;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let alpha = start_alpha + (end_alpha - start_alpha) * t;
            if alpha <= 0.0 {
                continue;
            }
            glow_disc(
                out,
                width,
                height,
                from.0 + dx * t,
                from.1 + dy * t,
                radius.max(0.75),
                color.with_opacity(alpha / steps.min(8) as f32),
            );
        }
    }

    /// Fill an axis-aligned span with `color` composited over existing pixels.
    pub fn blend_span(
        out: &mut [PackedRgba],
        width: u32,
        y: u32,
        x0: f32,
        x1: f32,
        color: PackedRgba,
    ) {
        if width == 0 {
            return;
        }
        let lo = x0.min(x1).floor().max(0.0) as u32;
        let hi = (x0.max(x1).ceil().max(0.0) as u32).min(width);
        let row = y as usize * width as usize;
        for x in lo..hi {
            if let Some(px) = out.get_mut(row + x as usize) {
                *px = color.over(*px);
            }
        }
    }
}
