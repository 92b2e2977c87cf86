use super::*;
use crate::animation::descriptor::Effect;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn high_tier_keeps_duration() {
    assert_eq!(scale_duration(ms(0), PerformanceMode::High), ms(0));
    assert_eq!(scale_duration(ms(1000), PerformanceMode::High), ms(1000));
}

#[test]
fn low_tier_halves_with_floor() {
    assert_eq!(scale_duration(ms(100), PerformanceMode::Low), ms(100));
    assert_eq!(scale_duration(ms(1000), PerformanceMode::Low), ms(500));
    assert_eq!(scale_duration(ms(0), PerformanceMode::Low), ms(100));
}

#[test]
fn medium_tier_scales_with_floor() {
    assert_eq!(scale_duration(ms(1000), PerformanceMode::Medium), ms(750));
    assert_eq!(scale_duration(ms(100), PerformanceMode::Medium), ms(150));
}

#[test]
fn aliases_map_to_canonical_curves() {
    assert_eq!(normalize_easing("smooth"), smooth_easing());
    assert_eq!(
        normalize_easing("Bouncy"),
        Easing::CubicBezier(0.68, -0.55, 0.265, 1.55)
    );
    assert_eq!(normalize_easing("fast"), Easing::CubicBezier(0.4, 0.0, 1.0, 1.0));
    assert_eq!(normalize_easing("slow"), Easing::CubicBezier(0.0, 0.0, 0.2, 1.0));
    assert_eq!(normalize_easing("ease-in"), Easing::EaseIn);
}

#[test]
fn unknown_names_pass_through() {
    assert_eq!(
        normalize_easing("steps(3, jump-end)"),
        Easing::Named("steps(3, jump-end)".to_owned())
    );
}

#[test]
fn config_is_derived_per_tier() {
    let desc = AnimationDescriptor::new(Effect::Slide, ms(1000))
        .with_delay(ms(80))
        .with_easing("smooth");
    let cfg = AnimationConfig::from_animation(&desc, PerformanceMode::Low);
    assert_eq!(cfg.duration, ms(500));
    assert_eq!(cfg.delay, ms(80));
    assert_eq!(cfg.easing, smooth_easing());
    assert_eq!(cfg.direction, Direction::Left);
}
