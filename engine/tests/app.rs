use engine::app::App;
use engine::camera::DEFAULT_DISTANCE;
use engine::countries::Country;
use engine::interaction::{DRAG_SENSITIVITY, TWEEN_DURATION};
use glam::Vec2;

fn testland() -> Vec<Country> {
    vec![Country { name: "Testland".into(), population: 1_000_000_000, lat: 0.0, lng: 0.0 }]
}

#[test]
fn hover_drag_resize_session() {
    let countries = testland();
    let mut app = App::new(&countries, 700.0, 500.0, 3);
    assert!((app.scene.radius - 3.5714).abs() < 1e-6);

    // Hover the bar at the window center: tooltip appears.
    app.pointer_move(Vec2::new(350.0, 250.0));
    let out = app.frame(0.1);
    let tooltip = out.tooltip.unwrap();
    assert_eq!(tooltip.name, "Testland");
    assert_eq!(tooltip.population, "1,000,000,000");
    assert!((app.scene.bars[0].opacity - 1.0).abs() < 1e-6);

    // Drag right by 100px: yaw offset grows, animated rotation trails it.
    app.pointer_down(Vec2::new(350.0, 250.0));
    app.pointer_move(Vec2::new(450.0, 250.0));
    app.pointer_up();
    let offset = app.scene.rotation_offset;
    assert!((offset.y - 100.0 * DRAG_SENSITIVITY).abs() < 1e-6);
    app.frame(TWEEN_DURATION / 4.0);
    assert!(app.scene.rotation.y > 0.0);
    assert!(app.scene.rotation.y < offset.y);

    // Resize doubles the viewport: radius scales, offset survives, camera
    // springs back to its default distance.
    app.camera.distance = 4.0;
    app.resize(1400.0, 1000.0);
    assert!((app.scene.radius - 7.1429).abs() < 1e-4);
    assert_eq!(app.scene.rotation_offset, offset);
    assert!((app.camera.distance - DEFAULT_DISTANCE).abs() < f32::EPSILON);
    assert!((app.scene.bars[0].base.length() - app.scene.radius).abs() < 1e-3);

    // Let the tween run out: rotation settles exactly on the offset.
    app.frame(TWEEN_DURATION);
    assert!((app.scene.rotation - offset).length() < 1e-6);
}

#[test]
fn embedded_dataset_builds_a_full_scene() {
    let countries = engine::countries::embedded().unwrap();
    let app = App::new(&countries, 1280.0, 720.0, 99);
    assert_eq!(app.scene.bars.len(), countries.len());
    for bar in &app.scene.bars {
        assert!((bar.base.length() - app.scene.radius).abs() < 1e-3);
        assert!(bar.footprint >= 0.1);
        assert!(bar.extrusion > 0.0);
    }
}
