//! End-to-end lifecycle tests: software viewport → visibility gate → effect
//! host → instance, against the in-memory environment.

use dexlora_core::event::{InputEvent, ListenerKind, PointerEvent};
use dexlora_core::geometry::Rect;
use dexlora_core::visibility::{ElementId, SoftwareViewport};
use dexlora_fx::{
    EffectConfig, EffectEnvironment, EffectHost, EffectKind, EnvCall, HeadlessEnvironment,
    HostStats,
};
use pretty_assertions::assert_eq;

const HERO: ElementId = ElementId(7);

fn page() -> SoftwareViewport {
    let mut viewport = SoftwareViewport::new(Rect::new(0, 0, 1280, 720));
    // hero section sits below the fold
    viewport.set_element_rect(HERO, Rect::new(0, 1000, 1280, 600));
    viewport
}

fn pump_entries(
    viewport: &mut SoftwareViewport,
    host: &mut EffectHost,
    env: &mut HeadlessEnvironment,
) {
    let entries: Vec<_> = viewport.drain_entries().collect();
    for entry in &entries {
        host.apply_entry(entry, env);
    }
}

fn pump_frames(host: &mut EffectHost, env: &mut HeadlessEnvironment, frames: usize) -> usize {
    let mut rendered = 0;
    for _ in 0..frames {
        for request in env.take_due_frames() {
            if host.on_frame(env, request, 1.0 / 60.0) {
                rendered += 1;
            }
        }
    }
    rendered
}

#[test]
fn scroll_in_out_in_constructs_disposes_constructs() {
    let mut viewport = page();
    let mut env = HeadlessEnvironment::recording();
    let mut host = EffectHost::new(HERO, EffectConfig::contact_hero(), 64, 36);
    host.mount(&mut viewport);
    pump_entries(&mut viewport, &mut host, &mut env);
    assert!(!host.is_active());

    let mut live_history = Vec::new();
    for scroll in [900, 0, 1100] {
        viewport.scroll_to(0, scroll);
        pump_entries(&mut viewport, &mut host, &mut env);
        live_history.push(host.is_active());
        assert!(env.live_surfaces() <= 1, "two live instances at scroll {scroll}");
    }
    assert_eq!(live_history, vec![true, false, true]);
    assert_eq!(
        host.stats(),
        HostStats {
            constructed: 2,
            disposed: 1
        }
    );

    // the first surface was destroyed before the second was created
    let surface_events: Vec<_> = env
        .calls()
        .iter()
        .filter(|call| {
            matches!(
                call,
                EnvCall::CreateSurface { .. } | EnvCall::DestroySurface(_)
            )
        })
        .map(|call| matches!(call, EnvCall::CreateSurface { .. }))
        .collect();
    assert_eq!(surface_events, vec![true, false, true]);

    host.teardown(&mut viewport, &mut env);
    assert!(env.is_idle());
}

#[test]
fn active_host_animates_until_hidden() {
    let mut viewport = page();
    let mut env = HeadlessEnvironment::new();
    let mut host = EffectHost::new(HERO, EffectConfig::founders(), 48, 24);
    host.mount(&mut viewport);
    viewport.scroll_to(0, 1000);
    pump_entries(&mut viewport, &mut host, &mut env);

    assert_eq!(pump_frames(&mut host, &mut env, 5), 5);
    assert_eq!(env.presented(), 5);

    viewport.scroll_to(0, 0);
    pump_entries(&mut viewport, &mut host, &mut env);
    assert_eq!(pump_frames(&mut host, &mut env, 5), 0);
    assert_eq!(env.pending_frames(), 0);
    host.teardown(&mut viewport, &mut env);
}

#[test]
fn threshold_requires_enough_coverage() {
    let mut viewport = page();
    let mut env = HeadlessEnvironment::new();
    let mut host = EffectHost::new(HERO, EffectConfig::projects_hero(), 32, 32)
        .with_threshold(dexlora_core::visibility::Threshold::new(0.5));
    host.mount(&mut viewport);

    // 120px of a 600px section
    viewport.scroll_to(0, 400);
    pump_entries(&mut viewport, &mut host, &mut env);
    assert!(!host.is_active());

    viewport.scroll_to(0, 800);
    pump_entries(&mut viewport, &mut host, &mut env);
    assert!(host.is_active());
    host.teardown(&mut viewport, &mut env);
}

#[test]
fn pointer_press_reaches_hyperspeed_through_its_listener() {
    let mut env = HeadlessEnvironment::new();
    let mut host = EffectHost::new(HERO, EffectConfig::contact_hero(), 64, 36);
    host.enter_active(&mut env);

    let down = host
        .instance()
        .and_then(|i| {
            i.listeners()
                .iter()
                .find(|(_, kind)| *kind == ListenerKind::PointerDown)
                .map(|(id, _)| *id)
        })
        .expect("pointer-down listener registered");
    let press = InputEvent::Pointer(PointerEvent::new(ListenerKind::PointerDown, 10.0, 10.0));
    assert!(host.handle_input(&mut env, down, &press));

    let before = env.last_present();
    pump_frames(&mut host, &mut env, 2);
    assert_ne!(env.last_present(), before);
    host.exit_active(&mut env);
}

#[test]
fn resize_listener_updates_future_instances() {
    let mut env = HeadlessEnvironment::new();
    let mut host = EffectHost::new(HERO, EffectConfig::contact_backdrop(), 20, 10);
    host.enter_active(&mut env);
    let resize = host
        .instance()
        .and_then(|i| {
            i.listeners()
                .iter()
                .find(|(_, kind)| *kind == ListenerKind::Resize)
                .map(|(id, _)| *id)
        })
        .expect("resize listener registered");
    host.handle_input(&mut env, resize, &InputEvent::Resize { width: 30, height: 15 });
    host.exit_active(&mut env);

    host.enter_active(&mut env);
    let surface = host.instance().map(|i| i.surface_id()).expect("active");
    assert_eq!(env.surface_size(surface), Some((30, 15)));
    host.exit_active(&mut env);
}

#[test]
fn every_variant_releases_everything_on_dispose() {
    for kind in EffectKind::ALL {
        let mut env = HeadlessEnvironment::new();
        let mut host = EffectHost::new(HERO, EffectConfig::default_for(kind), 24, 12);
        host.enter_active(&mut env);
        pump_frames(&mut host, &mut env, 3);
        assert!(env.live_listeners() >= 1, "{kind}: no listeners registered");
        host.exit_active(&mut env);
        assert!(env.is_idle(), "{kind}: resources left after dispose");
        assert!(!host.exit_active(&mut env));
    }
}

#[test]
fn host_works_through_a_trait_object_environment() {
    let mut headless = HeadlessEnvironment::new();
    let env: &mut dyn EffectEnvironment = &mut headless;
    let mut host = EffectHost::new(HERO, EffectConfig::founders(), 16, 16);
    assert!(host.enter_active(env));
    assert!(host.exit_active(env));
    assert!(headless.is_idle());
}
