use super::*;
use crate::animation::descriptor::{AnimationDescriptor, Effect};
use crate::foundation::style::{Transform, Visibility};
use crate::session::environment::{HostCapabilities, StaticEnvironment};
use crate::surface::tween::{AnimateSupport, TweenElement, TweenSurface};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(10);

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn poll_once<F: Future>(fut: Pin<&mut F>) -> bool {
    let mut cx = Context::from_waker(futures::task::noop_waker_ref());
    matches!(fut.poll(&mut cx), Poll::Ready(_))
}

fn step(id: &str, effect: Effect, duration: u64) -> AnimationStep {
    AnimationStep::new(id, AnimationDescriptor::new(effect, ms(duration)))
}

fn target(el: &Rc<TweenElement>) -> Rc<dyn Animatable> {
    Rc::clone(el) as Rc<dyn Animatable>
}

#[test]
fn reduced_motion_applies_end_state_without_tracking() {
    let engine = Engine::new(EngineOpts {
        reduced_motion: Some(true),
        ..EngineOpts::default()
    });
    let surface = TweenSurface::new();
    let el = surface.element("a", Style::hidden());
    let s = step("a", Effect::Spin, 400);
    let mut fut = std::pin::pin!(engine.execute_animation(&s, target(&el)));
    assert!(poll_once(fut.as_mut()));
    assert!(el.style().is_at_rest());
    assert_eq!(surface.running(), 0);
    assert_eq!(engine.active_count(), 0);
}

#[test]
fn rejected_animation_resolves_with_fallback() {
    let engine = Engine::new(EngineOpts::default());
    let surface = TweenSurface::new();
    let el = surface.element("a", Style::hidden().with_transform(Transform::scale(0.0)));
    el.set_support(AnimateSupport::Rejects);
    let s = step("a", Effect::Zoom, 300);
    let mut fut = std::pin::pin!(engine.execute_animation(&s, target(&el)));
    assert!(poll_once(fut.as_mut()));
    assert!(el.style().is_at_rest());
    assert_eq!(engine.active_count(), 0);
}

#[test]
fn missing_capability_resolves_with_fallback() {
    let engine = Engine::new(EngineOpts::default());
    let surface = TweenSurface::new();
    let el = surface.element("a", Style::opacity(0.0));
    el.set_support(AnimateSupport::Unsupported);
    let s = step("a", Effect::Fade, 300);
    let mut fut = std::pin::pin!(engine.execute_animation(&s, target(&el)));
    assert!(poll_once(fut.as_mut()));
    assert!(el.style().is_at_rest());
}

#[test]
fn failure_during_playback_falls_back_after_untracking() {
    let engine = Engine::new(EngineOpts::default());
    let surface = TweenSurface::new();
    let el = surface.element("a", Style::resting());
    el.set_support(AnimateSupport::FailsOnFinish);
    let s = step("a", Effect::Bounce, 100);
    let mut fut = std::pin::pin!(engine.execute_animation(&s, target(&el)));
    assert!(!poll_once(fut.as_mut()));
    assert!(engine.is_animating(&ElementId::new("a")));
    surface.tick(ms(100));
    assert!(poll_once(fut.as_mut()));
    assert_eq!(engine.active_count(), 0);
    assert!(el.style().is_at_rest());
}

#[test]
fn completed_animation_leaves_registry() {
    let engine = Engine::new(EngineOpts::default());
    let surface = TweenSurface::new();
    let el = surface.element("a", Style::resting());
    let s = step("a", Effect::Slide, 100);
    let mut fut = std::pin::pin!(engine.execute_animation(&s, target(&el)));
    assert!(!poll_once(fut.as_mut()));
    assert!(engine.state().is_playing);
    surface.tick(ms(50));
    assert!(!poll_once(fut.as_mut()));
    surface.tick(ms(50));
    assert!(poll_once(fut.as_mut()));
    assert_eq!(engine.active_count(), 0);
    assert!(!engine.state().is_playing);
    assert!(el.style().is_at_rest());
}

#[test]
fn replaced_animation_does_not_untrack_successor() {
    let engine = Engine::new(EngineOpts::default());
    let surface = TweenSurface::new();
    let el = surface.element("a", Style::resting());
    let first = step("a", Effect::Fade, 100);
    let second = step("a", Effect::Zoom, 100);
    let id = ElementId::new("a");

    let mut f1 = std::pin::pin!(engine.execute_animation(&first, target(&el)));
    assert!(!poll_once(f1.as_mut()));
    surface.tick(ms(50));
    let mut f2 = std::pin::pin!(engine.execute_animation(&second, target(&el)));
    assert!(!poll_once(f2.as_mut()));
    assert_eq!(engine.active_count(), 1);

    // The displaced animation settles as cancelled without untracking its successor.
    assert!(poll_once(f1.as_mut()));
    assert_eq!(surface.running(), 1);
    assert!(!poll_once(f2.as_mut()));
    assert!(engine.is_animating(&id));

    surface.tick(ms(100));
    assert!(poll_once(f2.as_mut()));
    assert!(!engine.is_animating(&id));
}

#[test]
fn displaced_animation_stops_moving_and_hands_over_snapshot() {
    let engine = Engine::new(EngineOpts::default());
    let surface = TweenSurface::new();
    let el = surface.element("x", Style::opacity(0.8));
    let spin = step("x", Effect::Spin, 1000);
    let fade = step("x", Effect::Fade, 1000);

    let mut f1 = std::pin::pin!(engine.execute_animation(&spin, target(&el)));
    assert!(!poll_once(f1.as_mut()));
    surface.tick(ms(100));
    let mut f2 = std::pin::pin!(engine.execute_animation(&fade, target(&el)));
    assert!(!poll_once(f2.as_mut()));
    assert!(poll_once(f1.as_mut()));
    assert_eq!(surface.running(), 1);

    engine.pause_all_animations();
    let frozen = el.style();
    surface.tick(ms(200));
    assert_eq!(el.style(), frozen);

    engine.stop_all_animations();
    surface.tick(ms(100));
    assert_eq!(surface.running(), 0);
    let s = el.style();
    assert_eq!(s.opacity, Some(0.8));
    assert!(s.effective_transform().is_identity());
    assert!(poll_once(f2.as_mut()));
    assert_eq!(el.style(), s);
}

#[test]
fn reduced_motion_reset_reaches_displaced_animations() {
    let env = StaticEnvironment::new();
    let engine = Engine::with_environment(EngineOpts::default(), &env);
    let surface = TweenSurface::new();
    let el = surface.element("x", Style::resting());
    let spin = step("x", Effect::Spin, 1000);
    let fade = step("x", Effect::Fade, 1000);

    let mut f1 = std::pin::pin!(engine.execute_animation(&spin, target(&el)));
    assert!(!poll_once(f1.as_mut()));
    surface.tick(ms(100));
    let mut f2 = std::pin::pin!(engine.execute_animation(&fade, target(&el)));
    assert!(!poll_once(f2.as_mut()));

    env.set_visibility(HostVisibility::Background);
    env.set_reduced_motion(true);
    surface.tick(ms(100));
    assert_eq!(engine.active_count(), 0);
    assert_eq!(surface.running(), 0);
    assert!(el.style().is_at_rest());
    assert!(poll_once(f1.as_mut()));
    assert!(poll_once(f2.as_mut()));
}

#[test]
fn pause_and_resume_preserve_progress() {
    let engine = Engine::new(EngineOpts::default());
    let surface = TweenSurface::new();
    let el = surface.element("a", Style::resting());
    let s = AnimationStep::new(
        "a",
        AnimationDescriptor::new(Effect::Fade, ms(200)).with_easing("linear"),
    );
    let mut fut = std::pin::pin!(engine.execute_animation(&s, target(&el)));
    assert!(!poll_once(fut.as_mut()));
    surface.tick(ms(100));
    let halfway = el.style().effective_opacity();
    assert!((halfway - 0.5).abs() < 1e-9);

    engine.pause_all_animations();
    assert!(engine.state().is_paused);
    surface.tick(ms(500));
    assert!(!poll_once(fut.as_mut()));
    assert_eq!(el.style().effective_opacity(), halfway);

    engine.resume_all_animations();
    assert!(!engine.state().is_paused);
    surface.tick(ms(50));
    assert!((el.style().effective_opacity() - 0.75).abs() < 1e-9);
    surface.tick(ms(50));
    assert!(poll_once(fut.as_mut()));
}

#[test]
fn animations_started_while_paused_wait_for_resume() {
    let engine = Engine::new(EngineOpts::default());
    engine.pause_all_animations();
    let surface = TweenSurface::new();
    let el = surface.element("a", Style::resting());
    let s = step("a", Effect::Fade, 100);
    let mut fut = std::pin::pin!(engine.execute_animation(&s, target(&el)));
    assert!(!poll_once(fut.as_mut()));
    surface.tick(ms(300));
    assert!(!poll_once(fut.as_mut()));
    engine.resume_all_animations();
    surface.tick(ms(100));
    assert!(poll_once(fut.as_mut()));
}

#[test]
fn stop_all_restores_snapshots_and_clears_registry() {
    let engine = Engine::new(EngineOpts::default());
    let surface = TweenSurface::new();
    let a = surface.element("a", Style::resting());
    let b = surface.element("b", Style::opacity(0.4));
    let sa = step("a", Effect::Spin, 300);
    let sb = step("b", Effect::Wipe, 300);
    let mut fa = std::pin::pin!(engine.execute_animation(&sa, target(&a)));
    let mut fb = std::pin::pin!(engine.execute_animation(&sb, target(&b)));
    assert!(!poll_once(fa.as_mut()));
    assert!(!poll_once(fb.as_mut()));
    surface.tick(ms(120));
    assert_eq!(engine.active_count(), 2);

    engine.stop_all_animations();
    assert_eq!(engine.active_count(), 0);
    let state = engine.state();
    assert!(!state.is_playing);
    assert!(!state.is_paused);
    assert!(a.style().is_at_rest());
    assert_eq!(b.style().opacity, Some(0.4));
    assert!(b.style().clip.unwrap().is_open());

    // Cancelled animations resolve without applying the fallback.
    assert!(poll_once(fa.as_mut()));
    assert!(poll_once(fb.as_mut()));
    assert_eq!(b.style().opacity, Some(0.4));
}

#[test]
fn reduced_motion_toggle_stops_everything() {
    let engine = Engine::new(EngineOpts::default());
    let surface = TweenSurface::new();
    let el = surface.element("a", Style::resting());
    let s = step("a", Effect::Zoom, 300);
    let mut fut = std::pin::pin!(engine.execute_animation(&s, target(&el)));
    assert!(!poll_once(fut.as_mut()));
    surface.tick(ms(60));

    engine.set_reduced_motion(true);
    assert!(engine.state().reduced_motion);
    assert_eq!(engine.active_count(), 0);
    assert!(el.style().is_at_rest());
    assert!(poll_once(fut.as_mut()));

    let other = surface.element("b", Style::hidden());
    let s2 = step("b", Effect::Slide, 300);
    let mut f2 = std::pin::pin!(engine.execute_animation(&s2, target(&other)));
    assert!(poll_once(f2.as_mut()));
    assert!(other.style().is_at_rest());
    assert_eq!(surface.running(), 0);
}

#[test]
fn controller_operations() {
    let engine = Engine::new(EngineOpts::default());
    let surface = TweenSurface::new();
    let el = surface.element("a", Style::opacity(0.9));
    let s = AnimationStep::new(
        "a",
        AnimationDescriptor::new(Effect::Fade, ms(200))
            .with_delay(ms(200))
            .with_easing("linear"),
    );
    let id = ElementId::new("a");
    let mut fut = std::pin::pin!(engine.execute_animation(&s, target(&el)));
    assert!(!poll_once(fut.as_mut()));

    let ctl = engine.controller(&id).unwrap();
    assert!(ctl.is_active());
    ctl.seek(0.75).unwrap();
    assert!((el.style().effective_opacity() - 0.5).abs() < 1e-6);

    ctl.pause();
    surface.tick(ms(100));
    assert!((el.style().effective_opacity() - 0.5).abs() < 1e-6);
    ctl.play();

    ctl.reverse();
    surface.tick(ms(50));
    assert!((el.style().effective_opacity() - 0.25).abs() < 1e-6);

    ctl.stop();
    assert!(!ctl.is_active());
    assert_eq!(el.style().opacity, Some(0.9));
    assert!(matches!(ctl.seek(0.5), Err(MotionError::Inactive(_))));
    assert!(poll_once(fut.as_mut()));
    assert!(engine.controller(&id).is_none());
}

#[test]
fn low_tier_halves_long_animations() {
    let engine = Engine::new(EngineOpts {
        performance_mode: Some(PerformanceMode::Low),
        ..EngineOpts::default()
    });
    let surface = TweenSurface::new();
    let el = surface.element("a", Style::resting());
    let s = step("a", Effect::Fade, 1000);
    let mut fut = std::pin::pin!(engine.execute_animation(&s, target(&el)));
    assert!(!poll_once(fut.as_mut()));
    let mut elapsed = Duration::ZERO;
    while !poll_once(fut.as_mut()) {
        surface.tick(FRAME);
        elapsed += FRAME;
        assert!(elapsed <= ms(1000));
    }
    assert_eq!(elapsed, ms(500));
}

#[test]
fn environment_drives_state() {
    let env = StaticEnvironment::new().with_capabilities(HostCapabilities {
        accelerated_rendering: false,
        ..HostCapabilities::default()
    });
    let engine = Engine::with_environment(EngineOpts::default(), &env);
    assert_eq!(engine.state().performance_mode, PerformanceMode::Medium);
    assert!(!engine.state().reduced_motion);

    env.set_visibility(HostVisibility::Background);
    assert!(engine.state().is_paused);
    env.set_visibility(HostVisibility::Foreground);
    assert!(!engine.state().is_paused);

    env.set_reduced_motion(true);
    assert!(engine.state().reduced_motion);
}

#[test]
fn explicit_options_override_probes() {
    let env = StaticEnvironment::new().with_reduced_motion(true);
    let engine = Engine::with_environment(
        EngineOpts {
            reduced_motion: Some(false),
            performance_mode: Some(PerformanceMode::Low),
        },
        &env,
    );
    let state = engine.state();
    assert!(!state.reduced_motion);
    assert_eq!(state.performance_mode, PerformanceMode::Low);
}

#[test]
fn dispose_stops_and_ignores_signals() {
    let env = StaticEnvironment::new();
    let engine = Engine::with_environment(EngineOpts::default(), &env);
    let surface = TweenSurface::new();
    let el = surface.element("a", Style::resting());
    let s = step("a", Effect::Fade, 300);
    let mut fut = std::pin::pin!(engine.execute_animation(&s, target(&el)));
    assert!(!poll_once(fut.as_mut()));

    engine.dispose();
    assert!(engine.is_disposed());
    assert_eq!(engine.active_count(), 0);
    assert!(poll_once(fut.as_mut()));

    env.set_visibility(HostVisibility::Background);
    assert!(!engine.state().is_paused);

    let later = surface.element("b", Style::hidden());
    let s2 = step("b", Effect::Fade, 300);
    let mut f2 = std::pin::pin!(engine.execute_animation(&s2, target(&later)));
    assert!(poll_once(f2.as_mut()));
    assert!(later.style().is_at_rest());
    assert_eq!(later.style().visibility, Some(Visibility::Visible));
}

#[test]
fn opts_parse_from_json() {
    let opts = EngineOpts::from_json(r#"{ "performance_mode": "low" }"#).unwrap();
    assert_eq!(opts.performance_mode, Some(PerformanceMode::Low));
    assert_eq!(opts.reduced_motion, None);
    assert!(EngineOpts::from_json("[]").is_err());
}

#[test]
fn dispose_releases_environment_listeners() {
    let env = StaticEnvironment::new();
    let engine = Engine::with_environment(EngineOpts::default(), &env);
    assert_eq!(env.listener_count(), 2);
    engine.dispose();
    assert_eq!(env.listener_count(), 0);

    let dropped = Engine::with_environment(EngineOpts::default(), &env);
    assert_eq!(env.listener_count(), 2);
    drop(dropped);
    assert_eq!(env.listener_count(), 0);
}
