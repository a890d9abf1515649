use super::*;
use std::f64::consts::FRAC_PI_2;

#[test]
fn defaults_match_reference_timing() {
    let p = MotionProfile::default();
    assert_eq!(p.step_duration(), Duration::from_millis(100));
    assert_eq!(p.translate_step_px, 20.0);
    assert!((p.rotate_step_rad() - 2.0_f64.to_radians()).abs() < 1e-15);
    p.validate().unwrap();
}

#[test]
fn rotation_steps_round_up() {
    let p = MotionProfile::default();
    assert_eq!(p.rotation_steps(0.0), 0);
    assert_eq!(p.rotation_steps(1.0_f64.to_radians()), 1);
    assert_eq!(p.rotation_steps(-3.0_f64.to_radians()), 2);
    assert_eq!(p.rotation_steps(4.0_f64.to_radians()), 2);
}

#[test]
fn translation_steps_round_down() {
    let p = MotionProfile::default();
    assert_eq!(p.translation_steps(0.0), 0);
    assert_eq!(p.translation_steps(19.9), 0);
    assert_eq!(p.translation_steps(200.0), 10);
    assert_eq!(p.translation_steps(215.0), 10);
}

#[test]
fn validate_rejects_non_positive_steps() {
    let bad = MotionProfile {
        translate_step_px: 0.0,
        ..MotionProfile::default()
    };
    assert!(bad.validate().is_err());

    let bad = MotionProfile {
        rotate_step_deg: f64::NAN,
        ..MotionProfile::default()
    };
    assert!(bad.validate().is_err());

    let bad = MotionProfile {
        reposition_threshold_px: -1.0,
        ..MotionProfile::default()
    };
    assert!(bad.validate().is_err());
}

#[test]
fn partial_json_fills_defaults() {
    let p: MotionProfile = serde_json::from_str(r#"{"step_ms": 0}"#).unwrap();
    assert_eq!(p.step_ms, 0);
    assert_eq!(p.translate_step_px, 20.0);
}

#[test]
fn rotation_delta_uses_raw_difference_unless_shortest_arc() {
    let up = -FRAC_PI_2;
    let down_left = 170.0_f64.to_radians();

    let p = MotionProfile::default();
    assert!(!p.shortest_arc);
    let raw = p.rotation_delta(up, down_left);
    assert!((raw.to_degrees() - 260.0).abs() < 1e-9);
    assert!(raw > 0.0);

    let short = MotionProfile {
        shortest_arc: true,
        ..MotionProfile::default()
    };
    let wrapped = short.rotation_delta(up, down_left);
    assert!((wrapped.to_degrees() + 100.0).abs() < 1e-9);
}
