// End-to-end sessions driven by synthetic landmark sequences.
// No camera, window or detector: just snapshots in, canvas and state out.

use air_canvas::config::{Background, CoordinateSpace, InputMapping};
use air_canvas::drawing::{Brush, DrawInstruction};
use air_canvas::regions::RegionId;
use air_canvas::{CanvasConfig, Error, GestureState, Interpreter, LandmarkSnapshot, Point, Rgb, Session};

const RED: Rgb = Rgb::new(255, 0, 0);

// Pixel input, no mirroring, 10 px pinch threshold on the default 640x480 layout.
fn interpreter() -> Interpreter {
    Interpreter::new(CanvasConfig {
        input: InputMapping { space: CoordinateSpace::Pixels, mirror_x: false },
        pinch_ratio: 10.0 / 640.0,
        ..CanvasConfig::default()
    })
    .unwrap()
}

fn pinch(x: f32, y: f32) -> LandmarkSnapshot {
    LandmarkSnapshot::from_tips((x, y), (x + 1.0, y + 2.0))
}

fn open(x: f32, y: f32) -> LandmarkSnapshot {
    LandmarkSnapshot::from_tips((x, y), (x, y + 150.0))
}

fn run(it: &Interpreter, s: &mut Session, frames: &[LandmarkSnapshot]) {
    for f in frames {
        it.step(s, f);
    }
}

fn ink(s: &Session, x: i32, y: i32) -> Option<Rgb> {
    s.drawing().canvas().ink(x, y)
}

#[test]
fn hovering_red_swatch_selects_red_without_drawing() {
    let it = interpreter();
    let mut s = it.session();
    let out = it.step(&mut s, &open(45.0, 45.0));

    assert_eq!(out.gesture, GestureState::Hovering(RegionId(0)));
    assert!(out.instructions.is_empty());
    assert_eq!(s.drawing().brush, Brush::Color(RED));
    assert!(s.drawing().canvas().is_blank());
}

#[test]
fn red_line_of_thickness_five_then_a_separate_stroke() {
    let it = interpreter();
    let mut s = it.session();
    run(&it, &mut s, &[open(45.0, 45.0), pinch(100.0, 100.0), pinch(110.0, 100.0), pinch(120.0, 100.0)]);
    let out = it.step(&mut s, &open(300.0, 300.0));
    let stroke = out.finished.expect("release finishes the stroke");
    assert_eq!(stroke.points.len(), 3);
    assert_eq!((stroke.color, stroke.thickness), (RED, 5));

    for x in 100..=120 {
        for y in 98..=102 {
            assert_eq!(ink(&s, x, y), Some(RED), "({x},{y})");
        }
        assert_eq!(ink(&s, x, 97), None);
        assert_eq!(ink(&s, x, 103), None);
    }

    // A later pinch elsewhere starts fresh: nothing links it to the first line.
    let out = it.step(&mut s, &pinch(200.0, 300.0));
    assert!(matches!(out.instructions[..], [DrawInstruction::Dot { .. }]));
    it.step(&mut s, &pinch(220.0, 300.0));
    assert_eq!(ink(&s, 160, 200), None);
    assert_eq!(ink(&s, 210, 300), Some(RED));
}

#[test]
fn losing_the_hand_mid_stroke_breaks_the_line() {
    let it = interpreter();
    let mut s = it.session();
    run(&it, &mut s, &[pinch(100.0, 200.0), pinch(150.0, 200.0)]);

    let out = it.step(&mut s, &LandmarkSnapshot::empty());
    assert_eq!(out.gesture, GestureState::Idle);
    assert_eq!(out.finished.map(|st| st.points.len()), Some(2));

    run(&it, &mut s, &[pinch(150.0, 300.0), pinch(200.0, 300.0)]);
    // No segment from (150,200) down to (150,300).
    assert_eq!(ink(&s, 150, 250), None);
    assert_eq!(ink(&s, 175, 300), Some(Rgb::BLACK));
}

#[test]
fn background_toggle_keeps_committed_ink() {
    let it = interpreter();
    let mut s = it.session();
    run(&it, &mut s, &[open(45.0, 45.0), pinch(100.0, 300.0), pinch(150.0, 300.0), open(300.0, 400.0)]);
    let before = s.drawing().canvas().cells().to_vec();

    // Enter the background toggle once.
    run(&it, &mut s, &[open(525.0, 45.0), open(526.0, 45.0), open(527.0, 46.0)]);
    assert_eq!(s.drawing().background, Background::Black);
    assert_eq!(s.drawing().canvas().cells(), &before[..]);

    let canvas = s.drawing().canvas();
    assert_eq!(canvas.pixel(120, 300, Background::Black), RED);
    assert_eq!(canvas.pixel(300, 200, Background::Black), Rgb::BLACK);
}

#[test]
fn eraser_follows_the_background_in_force() {
    let it = interpreter();
    let mut s = it.session();
    run(&it, &mut s, &[open(45.0, 45.0), pinch(100.0, 300.0), pinch(150.0, 300.0), open(300.0, 400.0)]);

    // Black background, then erase over the red line.
    s.toggle_background();
    run(&it, &mut s, &[open(365.0, 45.0), pinch(120.0, 300.0), pinch(130.0, 300.0)]);
    assert_eq!(ink(&s, 125, 300), Some(Rgb::BLACK));
    assert_eq!(ink(&s, 145, 300), Some(RED));
}

#[test]
fn stroke_has_no_gaps_between_samples() {
    let it = interpreter();
    let mut s = it.session();
    let path = [(100.0, 250.0), (140.0, 330.0), (180.0, 260.0), (260.0, 420.0), (300.0, 300.0)];
    it.step(&mut s, &open(45.0, 45.0));
    for &(x, y) in &path {
        it.step(&mut s, &pinch(x, y));
    }

    for pair in path.windows(2) {
        let (a, b) = (Point::new(pair[0].0, pair[0].1), Point::new(pair[1].0, pair[1].1));
        for i in 0..=50 {
            let t = i as f32 / 50.0;
            let p = Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
            let (x, y) = p.to_pixel();
            assert_eq!(ink(&s, x, y), Some(RED), "gap at ({x},{y})");
        }
    }
}

#[test]
fn hovering_never_touches_the_canvas() {
    let it = interpreter();
    let mut s = it.session();
    let targets = [(45.0, 45.0), (365.0, 45.0), (445.0, 45.0), (570.0, 180.0), (610.0, 120.0), (300.0, 300.0)];
    for _ in 0..5 {
        for &(x, y) in &targets {
            let out = it.step(&mut s, &open(x, y));
            assert!(out.instructions.is_empty());
        }
    }
    assert!(s.drawing().canvas().is_blank());
}

#[test]
fn wheel_pick_is_deterministic() {
    let it = interpreter();
    let pick = |x: f32, y: f32| {
        let mut s = it.session();
        it.step(&mut s, &open(x, y));
        assert_eq!(s.drawing().brush, Brush::Custom);
        s.drawing().custom_color
    };
    assert_eq!(pick(560.0, 200.0), pick(560.0, 200.0));
    // Outer rim straight right of the center is pure red.
    assert_eq!(pick(590.0, 180.0), RED);
}

#[test]
fn slider_sets_the_stroke_thickness() {
    let it = interpreter();
    let mut s = it.session();
    run(&it, &mut s, &[open(610.0, 100.0), pinch(100.0, 300.0)]);
    assert_eq!(s.drawing().thickness, 20);
    // A 20 px dot reaches 10 px out from the tip.
    assert_eq!(ink(&s, 110, 300), Some(Rgb::BLACK));
    assert_eq!(ink(&s, 111, 300), None);
}

#[test]
fn pinch_over_a_control_draws_instead_of_hovering() {
    let it = interpreter();
    let mut s = it.session();
    let out = it.step(&mut s, &pinch(45.0, 45.0));
    assert_eq!(out.gesture, GestureState::Pinching);
    assert_eq!(out.highlighted, None);
    // Brush unchanged, mark made.
    assert_eq!(s.drawing().brush, Brush::Color(Rgb::BLACK));
    assert_eq!(ink(&s, 45, 45), Some(Rgb::BLACK));
}

#[test]
fn clear_blanks_the_canvas_but_keeps_the_brush() {
    let it = interpreter();
    let mut s = it.session();
    run(&it, &mut s, &[open(45.0, 45.0), pinch(100.0, 300.0), pinch(150.0, 300.0)]);
    s.clear_canvas();
    assert!(s.drawing().canvas().is_blank());
    assert_eq!(s.drawing().brush, Brush::Color(RED));
}

#[test]
fn normalized_mirrored_input_lands_on_the_canvas() {
    let it = Interpreter::new(CanvasConfig::default()).unwrap();
    let mut s = it.session();
    let out = it.step(&mut s, &LandmarkSnapshot::from_tips((0.25, 0.8), (0.25, 0.3)));
    assert_eq!(out.tip, Some(Point::new(480.0, 384.0)));
    assert_eq!(out.gesture, GestureState::Idle);
}

#[test]
fn overlapping_regions_from_json_are_rejected() {
    let config = CanvasConfig::from_json(
        r#"{
            "regions": [
                { "name": "a",
                  "shape": { "kind": "rect", "x": 0, "y": 0, "width": 50, "height": 50 },
                  "control": { "type": "eraser" } },
                { "name": "b",
                  "shape": { "kind": "annulus", "cx": 60, "cy": 60, "inner": 5, "outer": 30 },
                  "control": { "type": "color_wheel" } }
            ]
        }"#,
    )
    .unwrap();
    assert!(matches!(
        Interpreter::new(config),
        Err(Error::RegionOverlap { first, second }) if first == "a" && second == "b"
    ));
}

#[test]
fn releasing_the_pinch_straight_onto_controls() {
    let it = interpreter();
    let mut s = it.session();
    run(&it, &mut s, &[pinch(100.0, 300.0), pinch(150.0, 300.0)]);

    // Open the hand directly over the red swatch.
    let out = it.step(&mut s, &open(45.0, 45.0));
    assert_eq!(out.gesture, GestureState::Hovering(RegionId(0)));
    assert_eq!(out.finished.map(|st| st.points.len()), Some(2));
    assert!(out.instructions.is_empty());
    assert_eq!(s.drawing().brush, Brush::Color(RED));

    // Then straight onto the background toggle: one flip, however long it dwells.
    it.step(&mut s, &pinch(200.0, 350.0));
    let out = it.step(&mut s, &open(525.0, 45.0));
    assert!(out.finished.is_some());
    assert!(out.instructions.is_empty());
    run(&it, &mut s, &[open(526.0, 45.0), open(527.0, 46.0), open(525.0, 47.0)]);
    assert_eq!(s.drawing().background, Background::Black);
    assert_eq!(ink(&s, 125, 300), Some(Rgb::BLACK));
    assert_eq!(ink(&s, 200, 350), Some(RED));
}
