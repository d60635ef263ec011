use cgmath::{InnerSpace, Rad};
use cube_scene::{
    SceneApp, SceneConfig, TextureSlot, UiInput,
    app::PointerButton,
    controls::{orbit::OrbitGesture, transform::TransformMode},
    scene::SceneNode,
};
use winit::dpi::PhysicalPosition;

use crate::common::test_utils::{HEIGHT, WIDTH, scene_app};

mod common;

fn centre() -> PhysicalPosition<f64> {
    PhysicalPosition::new(WIDTH as f64 / 2.0, HEIGHT as f64 / 2.0)
}

#[test]
fn should_build_one_of_each_node() {
    let app = scene_app();
    let scene = app.scene();
    assert_eq!(scene.count(|n| matches!(n, SceneNode::Mesh(_))), 1);
    assert_eq!(scene.count(|n| matches!(n, SceneNode::DirectionalLight(_))), 1);
    assert_eq!(scene.count(|n| matches!(n, SceneNode::RectAreaLight(_))), 1);
    assert_eq!(scene.count(|n| matches!(n, SceneNode::RectAreaLightHelper { .. })), 1);
    assert_eq!(scene.count(|n| matches!(n, SceneNode::TransformGizmo)), 1);
    assert_eq!(scene.len(), 5);
}

#[test]
fn should_start_from_the_configured_values() {
    let app = scene_app();
    let cube = app.cube().unwrap();
    assert_eq!(cube.size, [2.0, 1.0, 1.0]);
    assert_eq!(cube.texture, TextureSlot::Primary);
    assert_eq!(app.texture_path(), "4.png");
    assert_eq!(app.camera().position, cgmath::Point3::new(0.0, 0.0, 5.0));
    assert_eq!(app.directional_light().unwrap().intensity, 3.0);
    let area = app.rect_area_light().unwrap();
    assert_eq!((area.width, area.height, area.intensity), (4.0, 4.0, 10.0));
}

#[test]
fn should_point_the_helper_at_the_rect_area_light() {
    let app = scene_app();
    let helper = app
        .scene()
        .nodes()
        .iter()
        .find_map(|n| match n {
            SceneNode::RectAreaLightHelper { light } => Some(*light),
            _ => None,
        })
        .unwrap();
    assert!(matches!(app.scene().get(helper), Some(SceneNode::RectAreaLight(_))));
}

#[test]
fn should_match_aspect_and_size_on_resize() {
    let mut app = scene_app();
    assert!(app.on_resize(1024, 512));
    assert_eq!(app.projection().aspect, 2.0);
    assert_eq!(app.surface_size(), (1024, 512));
    assert_eq!(app.transform_controls().object(), Some(app.cube_id()));
    // resizing again keeps the same attachment
    assert!(app.on_resize(300, 300));
    assert_eq!(app.transform_controls().object(), Some(app.cube_id()));
}

#[test]
fn should_ignore_zero_sized_resize() {
    let mut app = scene_app();
    assert!(!app.on_resize(0, 600));
    assert_eq!(app.surface_size(), (WIDTH, HEIGHT));
    assert_eq!(app.projection().aspect, WIDTH as f32 / HEIGHT as f32);
}

#[test]
fn should_move_camera_to_slider_distance() {
    let mut app = scene_app();
    app.apply_input(UiInput::CameraDistance(8.0));
    assert_eq!(app.camera().position.z, 8.0);
    assert_eq!(app.settings().camera_distance, 8.0);
}

#[test]
fn should_alternate_between_the_two_textures() {
    let mut app = scene_app();
    let mut seen = Vec::new();
    for _ in 0..4 {
        app.apply_input(UiInput::ToggleTexture);
        seen.push(app.texture_path().to_string());
    }
    assert_eq!(seen, ["5.png", "4.png", "5.png", "4.png"]);
    assert_eq!(app.cube().unwrap().texture, TextureSlot::Primary);
}

#[test]
fn should_only_change_the_directional_light_intensity() {
    let mut app = scene_app();
    app.apply_input(UiInput::LightIntensity(0.5));
    assert_eq!(app.directional_light().unwrap().intensity, 0.5);
    assert_eq!(app.rect_area_light().unwrap().intensity, 10.0);
}

#[test]
fn should_rotate_with_elapsed_time() {
    let mut app = scene_app();
    app.update(1000.0);
    let rotation = app.cube().unwrap().transform.rotation;
    assert_eq!(rotation[0], Rad(1.0));
    assert_eq!(rotation[1], Rad(1.0));
    app.update(2500.0);
    let rotation = app.cube().unwrap().transform.rotation;
    assert_eq!(rotation[0], Rad(2.5));
    assert_eq!(rotation[1], Rad(2.5));
    assert_eq!(rotation[2], Rad(0.0));
}

#[test]
fn should_disable_orbit_while_dragging_the_cube() {
    let mut app = scene_app();
    app.pointer_moved(centre());
    app.pointer_pressed(PointerButton::Primary, centre());
    assert!(app.transform_controls().is_dragging());
    assert!(!app.orbit().enabled);

    app.pointer_moved(PhysicalPosition::new(500.0, 300.0));
    assert!(app.cube().unwrap().transform.position.x > 0.0);
    // the camera stays where it was during the drag
    assert_eq!(app.camera().position, cgmath::Point3::new(0.0, 0.0, 5.0));

    app.pointer_released(PointerButton::Primary);
    assert!(!app.transform_controls().is_dragging());
    assert!(app.orbit().enabled);
}

#[test]
fn should_keep_dragging_when_the_other_button_is_released() {
    let mut app = scene_app();
    app.pointer_pressed(PointerButton::Primary, centre());
    assert!(app.transform_controls().is_dragging());

    app.pointer_pressed(PointerButton::Secondary, centre());
    app.pointer_released(PointerButton::Secondary);
    assert!(app.transform_controls().is_dragging());
    assert!(!app.orbit().enabled);

    app.pointer_moved(PhysicalPosition::new(500.0, 300.0));
    assert!(app.cube().unwrap().transform.position.x > 0.0);
    assert_eq!(app.camera().position, cgmath::Point3::new(0.0, 0.0, 5.0));

    app.pointer_released(PointerButton::Primary);
    assert!(!app.transform_controls().is_dragging());
    assert!(app.orbit().enabled);
}

#[test]
fn should_keep_panning_when_the_primary_button_is_released() {
    let mut app = scene_app();
    let corner = PhysicalPosition::new(10.0, 10.0);
    app.pointer_pressed(PointerButton::Secondary, corner);
    app.pointer_released(PointerButton::Primary);
    assert_eq!(app.orbit().gesture(), Some(OrbitGesture::Pan));
    app.pointer_released(PointerButton::Secondary);
    assert_eq!(app.orbit().gesture(), None);
}

#[test]
fn should_orbit_when_missing_the_cube() {
    let mut app = scene_app();
    let corner = PhysicalPosition::new(10.0, 10.0);
    app.pointer_pressed(PointerButton::Primary, corner);
    assert!(!app.transform_controls().is_dragging());
    app.pointer_moved(PhysicalPosition::new(60.0, 10.0));
    app.pointer_released(PointerButton::Primary);

    let offset = app.camera().position - app.camera().target;
    assert!(app.camera().position.x.abs() > 0.01);
    assert!((offset.magnitude() - 5.0).abs() < 1e-4);
}

#[test]
fn should_scale_in_scale_mode() {
    let mut app = scene_app();
    app.set_transform_mode(TransformMode::Scale);
    app.pointer_pressed(PointerButton::Primary, centre());
    app.pointer_moved(PhysicalPosition::new(400.0, 200.0));
    app.pointer_released(PointerButton::Primary);
    assert!((app.cube().unwrap().transform.scale.x - 2.0).abs() < 1e-5);
}

#[test]
fn should_zoom_on_scroll() {
    let mut app = scene_app();
    app.scroll(1.0);
    assert!(app.camera().position.z < 5.0);
}

#[test]
fn should_read_every_constant_from_config() {
    let mut config = SceneConfig::default();
    config.cube_size = [1.0, 1.0, 1.0];
    config.textures = ["a.png".into(), "b.png".into()];
    let mut app = SceneApp::initialize(config, 100, 100);
    assert_eq!(app.cube().unwrap().size, [1.0, 1.0, 1.0]);
    app.apply_input(UiInput::ToggleTexture);
    assert_eq!(app.texture_path(), "b.png");
}
