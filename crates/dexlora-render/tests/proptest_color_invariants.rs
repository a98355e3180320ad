//! Property-based invariants for color blending and raster helpers.
//!
//! 1. Opaque sources replace the destination under `over`.
//! 2. `lerp` endpoints are exact.
//! 3. `add_onto` never darkens a channel.
//! 4. Raster helpers never panic and never touch pixels outside the slice.

use dexlora_render::PackedRgba;
use dexlora_render::surface::raster;
use proptest::prelude::*;

fn color_strategy() -> impl Strategy<Value = PackedRgba> {
    any::<u32>().prop_map(PackedRgba)
}

proptest! {
    #[test]
    fn opaque_over_replaces(
        r in any::<u8>(),
        g in any::<u8>(),
        b in any::<u8>(),
        dst in color_strategy(),
    ) {
        let src = PackedRgba::rgb(r, g, b);
        prop_assert_eq!(src.over(dst), src);
    }

    #[test]
    fn lerp_endpoints(a in color_strategy(), b in color_strategy()) {
        prop_assert_eq!(a.lerp(b, 0.0), a);
        prop_assert_eq!(a.lerp(b, 1.0), b);
    }

    #[test]
    fn add_onto_is_monotone(src in color_strategy(), dst in color_strategy()) {
        let out = src.add_onto(dst);
        prop_assert!(out.r() >= dst.r());
        prop_assert!(out.g() >= dst.g());
        prop_assert!(out.b() >= dst.b());
    }

    #[test]
    fn raster_is_bounded(
        w in 0u32..24,
        h in 0u32..24,
        cx in -50.0f32..50.0,
        cy in -50.0f32..50.0,
        r in -5.0f32..40.0,
    ) {
        let len = (w * h) as usize;
        let mut buf = vec![PackedRgba::BLACK; len];
        raster::glow_disc(&mut buf, w, h, cx, cy, r, PackedRgba::WHITE);
        raster::glow_line(&mut buf, w, h, (cx, cy), (cy, cx), r, PackedRgba::WHITE, 1.0, 0.0);
        prop_assert_eq!(buf.len(), len);
    }
}
