//! Property-based invariant tests for the background effects.
//!
//! 1. Rendering never panics for any size, including zero-width/height.
//! 2. Identical configs and dt sequences produce identical pixels.
//! 3. Opaque variants cover every pixel at every quality tier.
//! 4. Frame scheduling: a hidden instance never holds a frame request.

use dexlora_fx::{
    EffectConfig, EffectInstance, EffectKind, FxContext, FxQuality, HeadlessEnvironment,
    InstanceSettings, ThemeInputs,
};
use dexlora_core::event::InputEvent;
use dexlora_render::PackedRgba;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn kind_strategy() -> impl Strategy<Value = EffectKind> {
    prop_oneof![
        Just(EffectKind::Particles),
        Just(EffectKind::Hyperspeed),
        Just(EffectKind::LightPillar),
        Just(EffectKind::ColorBends),
    ]
}

fn quality_strategy() -> impl Strategy<Value = FxQuality> {
    prop_oneof![
        Just(FxQuality::Full),
        Just(FxQuality::Reduced),
        Just(FxQuality::Minimal),
        Just(FxQuality::Off),
    ]
}

fn render_sequence(
    kind: EffectKind,
    width: u32,
    height: u32,
    quality: FxQuality,
    dts: &[f64],
) -> Vec<PackedRgba> {
    let theme = ThemeInputs::default();
    let mut fx = EffectConfig::default_for(kind).build();
    fx.resize(width, height);
    let mut out = vec![PackedRgba::TRANSPARENT; width as usize * height as usize];
    let mut time = 0.0;
    for (frame, dt) in dts.iter().enumerate() {
        fx.advance(*dt);
        time += dt;
        let ctx = FxContext {
            width,
            height,
            frame: frame as u64,
            time_seconds: time,
            quality,
            theme: &theme,
        };
        fx.render(ctx, &mut out);
    }
    out
}

// ── Rendering ───────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn tiny_areas_never_panic(
        kind in kind_strategy(),
        width in 0u32..=6,
        height in 0u32..=6,
        quality in quality_strategy(),
    ) {
        let out = render_sequence(kind, width, height, quality, &[0.0, 0.016, 0.5]);
        prop_assert_eq!(out.len(), (width * height) as usize);
    }

    #[test]
    fn rendering_is_deterministic(
        kind in kind_strategy(),
        width in 1u32..=24,
        height in 1u32..=24,
        dts in prop::collection::vec(0.0f64..0.1, 1..5),
    ) {
        let a = render_sequence(kind, width, height, FxQuality::Full, &dts);
        let b = render_sequence(kind, width, height, FxQuality::Full, &dts);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn opaque_variants_cover_every_pixel(
        kind in prop_oneof![Just(EffectKind::Hyperspeed), Just(EffectKind::LightPillar)],
        width in 1u32..=20,
        height in 1u32..=20,
        quality in prop_oneof![
            Just(FxQuality::Full),
            Just(FxQuality::Reduced),
            Just(FxQuality::Minimal),
        ],
    ) {
        let out = render_sequence(kind, width, height, quality, &[0.016]);
        prop_assert!(out.iter().all(|p| p.a() == 255));
    }
}

#[test]
fn every_variant_renders_at_zero_and_one_pixel_heights() {
    let kinds = [
        EffectKind::Particles,
        EffectKind::Hyperspeed,
        EffectKind::LightPillar,
        EffectKind::ColorBends,
    ];
    for kind in kinds {
        for height in [0, 1] {
            for width in [0, 1, 7, 300] {
                let out = render_sequence(kind, width, height, FxQuality::Full, &[0.0, 0.016]);
                assert_eq!(out.len(), (width * height) as usize, "{kind:?} {width}x{height}");
            }
        }
    }
}

#[test]
fn one_pixel_tall_instance_survives_frames_and_resize() {
    for kind in [
        EffectKind::Particles,
        EffectKind::Hyperspeed,
        EffectKind::LightPillar,
        EffectKind::ColorBends,
    ] {
        let mut env = HeadlessEnvironment::new();
        let mut instance = EffectInstance::construct(
            &EffectConfig::default_for(kind),
            300,
            1,
            true,
            InstanceSettings::default(),
            &mut env,
        );
        for request in env.take_due_frames() {
            instance.on_frame(&mut env, request, 0.016);
        }
        instance.handle_input(&mut env, &InputEvent::Resize { width: 640, height: 1 });
        for request in env.take_due_frames() {
            instance.on_frame(&mut env, request, 0.016);
        }
        instance.dispose(&mut env);
        assert!(env.is_idle(), "{kind:?}");
    }
}

// ── Scheduling ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn hidden_instance_holds_no_frame(
        kind in kind_strategy(),
        toggles in prop::collection::vec(any::<bool>(), 0..12),
    ) {
        let mut env = HeadlessEnvironment::new();
        let mut instance = EffectInstance::construct(
            &EffectConfig::default_for(kind),
            8,
            8,
            true,
            InstanceSettings::default(),
            &mut env,
        );
        for visible in toggles {
            instance.set_visible(&mut env, visible);
            for request in env.take_due_frames() {
                instance.on_frame(&mut env, request, 0.016);
            }
            if instance.is_visible() {
                prop_assert_eq!(env.pending_frames(), 1);
            } else {
                prop_assert_eq!(env.pending_frames(), 0);
            }
        }
        instance.dispose(&mut env);
        prop_assert!(env.is_idle());
    }
}
