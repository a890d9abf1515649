use super::*;
use std::f64::consts::PI;

#[test]
fn stage_origin_maps_to_canvas_center() {
    let c = Canvas::new(640, 480).unwrap();
    assert_eq!(c.stage_to_canvas(0.0, 0.0), Point::new(320.0, 240.0));
}

#[test]
fn stage_y_axis_is_flipped() {
    let c = Canvas::default();
    assert_eq!(c.stage_to_canvas(100.0, 100.0), Point::new(420.0, 140.0));
    assert_eq!(c.stage_to_canvas(-100.0, -100.0), Point::new(220.0, 340.0));
    assert_eq!(c.canvas_to_stage(Point::new(420.0, 140.0)), (100.0, 100.0));
}

#[test]
fn canvas_rejects_degenerate_sizes() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
}

#[test]
fn fps_tick_duration() {
    let fps = Fps::new(60, 1).unwrap();
    let d = fps.tick_duration().as_secs_f64();
    assert!((d - 1.0 / 60.0).abs() < 1e-9);
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn premultiply_opaque_is_identity() {
    assert_eq!(Rgba8::LIGHT_GREEN.premultiplied(), [0, 255, 0, 255]);
    let half = Rgba8 {
        r: 255,
        g: 0,
        b: 0,
        a: 128,
    };
    assert_eq!(half.premultiplied(), [128, 0, 0, 128]);
}

#[test]
fn wrap_angle_stays_in_half_open_range() {
    assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-12);
    assert!((wrap_angle(-PI) - PI).abs() < 1e-12);
    assert!((wrap_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-12);
    assert_eq!(wrap_angle(0.0), 0.0);
}
