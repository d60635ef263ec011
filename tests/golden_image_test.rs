#[cfg(feature = "integration-tests")]
mod common;

#[cfg(feature = "integration-tests")]
const SIZE: u32 = 256;

#[cfg(feature = "integration-tests")]
fn setup() -> Option<(
    tokio::runtime::Runtime,
    common::test_utils::Headless,
    cube_scene::SceneApp,
    cube_scene::render::SceneRenderer,
)> {
    use common::test_utils::{FORMAT, headless};
    use cube_scene::{SceneApp, SceneConfig, render::SceneRenderer};

    let _ = env_logger::builder().is_test(true).try_init();
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let Some(gpu) = runtime.block_on(headless()) else {
        eprintln!("no graphics adapter, skipping");
        return None;
    };
    let app = SceneApp::initialize(SceneConfig::default(), SIZE, SIZE);
    let renderer = runtime
        .block_on(SceneRenderer::new(&gpu.device, &gpu.queue, FORMAT, &app))
        .unwrap();
    Some((runtime, gpu, app, renderer))
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_render_clear_colour_helper_and_cube() {
    use common::test_utils::{colour_to_pixel, render_offscreen};

    let Some((runtime, gpu, app, mut renderer)) = setup() else {
        return;
    };
    let clear = wgpu::Color::BLACK;
    let img = runtime
        .block_on(render_offscreen(&gpu, &mut renderer, &app, SIZE, clear))
        .unwrap();

    // the corners see nothing but the clear colour, the light helper's face
    // turns its culled back towards the camera
    for (x, y) in [(0, 0), (SIZE - 1, 0), (0, SIZE - 1), (SIZE - 1, SIZE - 1)] {
        assert_eq!(*img.get_pixel(x, y), colour_to_pixel(clear));
    }

    // the helper outline's upper edge runs along the middle rows in orange
    let helper = [SIZE / 2 - 1, SIZE / 2]
        .into_iter()
        .map(|y| *img.get_pixel(SIZE / 4, y))
        .find(|p| p[0] > 200 && p[2] < 50)
        .expect("helper outline crosses the middle rows");

    // above and below the centre, off the gizmo axes, is the lit cube
    for y in [SIZE / 2 - 10, SIZE / 2 + 10] {
        let cube = *img.get_pixel(SIZE / 2 + 12, y);
        assert_ne!(cube, colour_to_pixel(clear));
        assert_ne!(cube, helper);
    }
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_swap_texture_on_toggle() {
    use common::test_utils::render_offscreen;
    use cube_scene::UiInput;

    let Some((runtime, gpu, mut app, mut renderer)) = setup() else {
        return;
    };
    let clear = wgpu::Color::BLACK;
    let first = runtime
        .block_on(render_offscreen(&gpu, &mut renderer, &app, SIZE, clear))
        .unwrap();
    app.apply_input(UiInput::ToggleTexture);
    let second = runtime
        .block_on(render_offscreen(&gpu, &mut renderer, &app, SIZE, clear))
        .unwrap();

    // corners stay, the cube changes
    assert_eq!(first.get_pixel(0, 0), second.get_pixel(0, 0));
    assert_eq!(first.get_pixel(0, SIZE - 1), second.get_pixel(0, SIZE - 1));
    assert_ne!(first.as_raw(), second.as_raw());
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_darken_cube_when_light_is_off() {
    use common::test_utils::render_offscreen;
    use cube_scene::UiInput;

    let Some((runtime, gpu, mut app, mut renderer)) = setup() else {
        return;
    };
    let clear = wgpu::Color::BLACK;
    let (x, y) = (SIZE / 2 + 12, SIZE / 2 - 10);
    let lit = runtime
        .block_on(render_offscreen(&gpu, &mut renderer, &app, SIZE, clear))
        .unwrap();
    app.apply_input(UiInput::LightIntensity(0.0));
    let unlit = runtime
        .block_on(render_offscreen(&gpu, &mut renderer, &app, SIZE, clear))
        .unwrap();

    let brightness = |p: &image::Rgba<u8>| p.0[..3].iter().map(|&c| c as u32).sum::<u32>();
    assert!(brightness(unlit.get_pixel(x, y)) < brightness(lit.get_pixel(x, y)));
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_draw_each_frame_before_advancing_the_cube() {
    use cgmath::Rad;
    use common::test_utils::render_offscreen;
    use cube_scene::frame_loop::FrameLoop;

    let Some((runtime, gpu, mut app, mut renderer)) = setup() else {
        return;
    };
    let clear = wgpu::Color::BLACK;
    let mut frame_loop = FrameLoop::new();
    let mut frames = Vec::new();

    for _ in 0..2 {
        std::thread::sleep(std::time::Duration::from_millis(200));
        let scheduled = frame_loop
            .frame(&mut app, true, |scene| {
                let rotation = scene.cube().unwrap().transform.rotation[0];
                let img = runtime.block_on(render_offscreen(&gpu, &mut renderer, scene, SIZE, clear))?;
                frames.push((rotation, img));
                anyhow::Ok(())
            })
            .unwrap();
        assert!(scheduled);
    }

    // frame one shows the start pose, frame two the pose set after frame one
    assert_eq!(frames[0].0, Rad(0.0));
    assert!(frames[1].0 >= Rad(0.2));
    assert_ne!(frames[0].1.as_raw(), frames[1].1.as_raw());
    assert!(app.cube().unwrap().transform.rotation[0] > frames[1].0);

    frame_loop.handle().cancel();
    assert!(!frame_loop.frame(&mut app, true, |_| anyhow::Ok(())).unwrap());
}
