use engine::countries::Country;
use engine::interaction::{
    normalize_pointer, InputController, RotationTween, DRAG_SENSITIVITY, TWEEN_DURATION,
};
use engine::scene::GlobeScene;
use glam::Vec2;

fn one_country() -> Vec<Country> {
    vec![Country { name: "Testland".into(), population: 1_000_000_000, lat: 0.0, lng: 0.0 }]
}

#[test]
fn drag_accumulation_is_chunking_invariant() {
    let countries = one_country();
    let mut a = GlobeScene::build(&countries, 700.0, 500.0, 1);
    let mut b = GlobeScene::build(&countries, 700.0, 500.0, 1);
    let win = Vec2::new(700.0, 500.0);

    // One big move vs. the same distance in four steps.
    let mut ctl_a = InputController::default();
    ctl_a.pointer_down(Vec2::new(100.0, 100.0));
    ctl_a.pointer_move(Vec2::new(180.0, 60.0), win, 0.0, &mut a);

    let mut ctl_b = InputController::default();
    ctl_b.pointer_down(Vec2::new(100.0, 100.0));
    for (x, y) in [(120.0, 90.0), (140.0, 80.0), (160.0, 70.0), (180.0, 60.0)] {
        ctl_b.pointer_move(Vec2::new(x, y), win, 0.0, &mut b);
    }

    assert!((a.rotation_offset - b.rotation_offset).length() < 1e-6);
    // dx = +80, dy = -40; x axis takes dy, y axis takes dx.
    assert!((a.rotation_offset.x - (-40.0 * DRAG_SENSITIVITY)).abs() < 1e-6);
    assert!((a.rotation_offset.y - (80.0 * DRAG_SENSITIVITY)).abs() < 1e-6);
}

#[test]
fn moves_while_idle_do_not_rotate() {
    let countries = one_country();
    let mut scene = GlobeScene::build(&countries, 700.0, 500.0, 1);
    let mut ctl = InputController::default();
    let win = Vec2::new(700.0, 500.0);
    ctl.pointer_move(Vec2::new(50.0, 50.0), win, 0.0, &mut scene);
    ctl.pointer_move(Vec2::new(500.0, 400.0), win, 0.0, &mut scene);
    assert_eq!(scene.rotation_offset, Vec2::ZERO);
    assert!(ctl.pointer.ndc.is_some());
}

#[test]
fn release_ends_the_drag_unconditionally() {
    let countries = one_country();
    let mut scene = GlobeScene::build(&countries, 700.0, 500.0, 1);
    let mut ctl = InputController::default();
    let win = Vec2::new(700.0, 500.0);
    ctl.pointer_down(Vec2::new(100.0, 100.0));
    assert!(ctl.pointer.dragging);
    ctl.pointer_up();
    assert!(!ctl.pointer.dragging);
    let offset = scene.rotation_offset;
    ctl.pointer_move(Vec2::new(300.0, 300.0), win, 0.0, &mut scene);
    assert_eq!(scene.rotation_offset, offset);
}

#[test]
fn touch_drag_starts_only_over_the_globe() {
    let countries = one_country();
    let mut app = engine::app::App::new(&countries, 700.0, 500.0, 1);

    // Window corner: ray misses the sphere, no drag starts.
    app.touch_move(Vec2::new(1.0, 1.0));
    assert!(!app.input.pointer.dragging);
    assert_eq!(app.scene.rotation_offset, Vec2::ZERO);

    // Window center: ray hits the sphere, drag begins; the starting move
    // itself contributes no delta.
    app.touch_move(Vec2::new(350.0, 250.0));
    assert!(app.input.pointer.dragging);
    assert_eq!(app.scene.rotation_offset, Vec2::ZERO);

    // Subsequent moves rotate, exactly like the mouse path.
    app.touch_move(Vec2::new(370.0, 250.0));
    assert!((app.scene.rotation_offset.y - 20.0 * DRAG_SENSITIVITY).abs() < 1e-6);

    app.touch_end();
    assert!(!app.input.pointer.dragging);
}

#[test]
fn normalization_breakpoint_controls_vertical_offset() {
    let px = Vec2::new(320.0, 340.0);
    // Wide window: canvas_top is ignored.
    let wide = normalize_pointer(px, Vec2::new(1600.0, 800.0), 100.0);
    assert!((wide.x - (320.0 / 1600.0 * 2.0 - 1.0)).abs() < 1e-6);
    assert!((wide.y - (-(340.0 / 800.0) * 2.0 + 1.0)).abs() < 1e-6);
    // Narrow window: the canvas sits below other content, so y is shifted.
    let narrow = normalize_pointer(px, Vec2::new(800.0, 800.0), 100.0);
    assert!((narrow.y - (-((340.0 - 100.0) / 800.0) * 2.0 + 1.0)).abs() < 1e-6);
}

#[test]
fn tween_trails_then_converges() {
    let mut tween = RotationTween::resting(Vec2::ZERO);
    let target = Vec2::new(0.4, -0.2);
    tween.retarget(Vec2::ZERO, target);

    let quarter = tween.advance(TWEEN_DURATION / 4.0);
    assert!(quarter.length() > 0.0);
    assert!(quarter.length() < target.length());

    let half = tween.advance(TWEEN_DURATION / 4.0);
    assert!(half.length() > quarter.length());

    let done = tween.advance(TWEEN_DURATION);
    assert!((done - target).length() < 1e-6);
    // Past the duration the value stays put.
    assert!((tween.advance(1.0) - target).length() < 1e-6);
}

#[test]
fn ease_out_front_loads_the_motion() {
    let mut tween = RotationTween::resting(Vec2::ZERO);
    tween.retarget(Vec2::ZERO, Vec2::new(1.0, 0.0));
    let first_half = tween.advance(TWEEN_DURATION / 2.0).x;
    // Quadratic ease-out covers 75% of the distance in the first half.
    assert!((first_half - 0.75).abs() < 1e-5);
}
