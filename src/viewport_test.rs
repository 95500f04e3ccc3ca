#![allow(clippy::float_cmp)]

use super::*;

fn measured(w: f64, h: f64) -> ViewportController {
    let mut vp = ViewportController::new();
    vp.set_size(Size::new(w, h));
    vp
}

fn approx(a: Point, b: Point) -> bool {
    a.distance(b) < 1e-9
}

// =============================================================
// Bounds
// =============================================================

#[test]
fn bounds_of_nothing_is_none() {
    assert_eq!(Bounds::of_circles(Vec::new()), None);
}

#[test]
fn bounds_cover_circle_edges() {
    let b = Bounds::of_circles(vec![
        Circle::new(Point::new(0.0, 0.0), 10.0),
        Circle::new(Point::new(100.0, 50.0), 30.0),
    ])
    .unwrap();
    assert_eq!(b.min, Point::new(-10.0, -10.0));
    assert_eq!(b.max, Point::new(130.0, 80.0));
    assert_eq!(b.center(), Point::new(60.0, 35.0));
}

// =============================================================
// Measurement and conversion
// =============================================================

#[test]
fn unmeasured_conversions_are_refused() {
    let vp = ViewportController::new();
    assert!(!vp.is_measured());
    assert_eq!(vp.screen_to_canvas(Point::new(1.0, 1.0)), None);
    assert_eq!(vp.canvas_to_screen(Point::new(1.0, 1.0)), None);
}

#[test]
fn set_size_reports_change() {
    let mut vp = ViewportController::new();
    assert!(vp.set_size(Size::new(300.0, 200.0)));
    assert!(!vp.set_size(Size::new(300.0, 200.0)));
    assert!(vp.is_measured());
}

#[test]
fn conversions_round_trip_under_pan_and_zoom() {
    let mut vp = measured(400.0, 400.0);
    vp.pan_by(Point::new(30.0, -20.0));
    vp.zoom_about(Point::new(200.0, 200.0), 2.0, 0.25, 4.0);
    let canvas = Point::new(17.0, 91.0);
    let screen = vp.canvas_to_screen(canvas).unwrap();
    assert!(approx(vp.screen_to_canvas(screen).unwrap(), canvas));
}

#[test]
fn zoom_keeps_anchor_fixed_and_clamps() {
    let mut vp = measured(400.0, 400.0);
    let anchor = Point::new(120.0, 80.0);
    let before = vp.screen_to_canvas(anchor).unwrap();
    vp.zoom_about(anchor, 10.0, 0.25, 4.0);
    assert_eq!(vp.camera().scale, 4.0);
    assert!(approx(vp.screen_to_canvas(anchor).unwrap(), before));
}

#[test]
fn zoom_ignores_non_finite_scale() {
    let mut vp = measured(400.0, 400.0);
    vp.zoom_about(Point::ZERO, f64::NAN, 0.25, 4.0);
    assert_eq!(vp.camera().scale, 1.0);
}

// =============================================================
// Recenter
// =============================================================

#[test]
fn recenter_refused_while_unmeasured() {
    let mut vp = ViewportController::new();
    let b = Bounds { min: Point::ZERO, max: Point::new(10.0, 10.0) };
    assert!(!vp.begin_recenter(b, 0.0, 300.0));
    assert!(!vp.is_animating());
}

#[test]
fn recenter_lands_bounds_in_middle() {
    let mut vp = measured(300.0, 500.0);
    vp.pan_by(Point::new(-80.0, 40.0));
    let b = Bounds { min: Point::new(500.0, 500.0), max: Point::new(700.0, 600.0) };
    assert!(vp.begin_recenter(b, 1_000.0, 300.0));
    assert!(vp.step_animation(1_150.0));
    assert!(!vp.step_animation(1_300.0));
    let center = vp.canvas_to_screen(b.center()).unwrap();
    assert!(approx(center, Point::new(150.0, 250.0)));
}

#[test]
fn retarget_moves_the_landing_point() {
    let mut vp = measured(200.0, 200.0);
    let first = Bounds { min: Point::ZERO, max: Point::new(20.0, 20.0) };
    let moved = Bounds { min: Point::new(40.0, 0.0), max: Point::new(60.0, 20.0) };
    assert!(vp.begin_recenter(first, 0.0, 300.0));
    vp.step_animation(100.0);
    vp.retarget(moved);
    assert!(!vp.step_animation(300.0));
    assert_eq!(vp.camera().pan(), vp.centering_pan(moved).unwrap());
}

#[test]
fn retarget_without_animation_is_a_no_op() {
    let mut vp = measured(200.0, 200.0);
    vp.retarget(Bounds { min: Point::ZERO, max: Point::new(20.0, 20.0) });
    assert!(!vp.is_animating());
    assert_eq!(vp.camera().pan(), Point::ZERO);
}

#[test]
fn recenter_accounts_for_scale() {
    let mut vp = measured(200.0, 200.0);
    vp.zoom_about(Point::ZERO, 2.0, 0.25, 4.0);
    let b = Bounds { min: Point::new(0.0, 0.0), max: Point::new(40.0, 40.0) };
    let pan = vp.centering_pan(b).unwrap();
    assert_eq!(pan, Point::new(60.0, 60.0));
}

#[test]
fn recenter_animation_is_monotonic() {
    let mut vp = measured(200.0, 200.0);
    let b = Bounds { min: Point::new(1_000.0, 100.0), max: Point::new(1_000.0, 100.0) };
    vp.begin_recenter(b, 0.0, 300.0);
    let mut last = vp.camera().pan_x;
    for frame in 1..=20 {
        vp.step_animation(f64::from(frame) * 16.0);
        let now = vp.camera().pan_x;
        assert!(now <= last);
        last = now;
    }
    assert_eq!(last, -900.0);
}

#[test]
fn pan_interrupts_recenter() {
    let mut vp = measured(200.0, 200.0);
    let b = Bounds { min: Point::new(500.0, 500.0), max: Point::new(600.0, 600.0) };
    vp.begin_recenter(b, 0.0, 300.0);
    vp.pan_by(Point::new(5.0, 5.0));
    assert!(!vp.is_animating());
    assert!(!vp.step_animation(1_000.0));
}

#[test]
fn ease_out_cubic_endpoints() {
    assert_eq!(ease_out_cubic(0.0), 0.0);
    assert_eq!(ease_out_cubic(1.0), 1.0);
    assert!(ease_out_cubic(0.5) > 0.5);
}
