//! Application event loop.
//!
//! This module drives the scene with winit: it creates the window (a canvas
//! inside the configured container on the web), initialises the GPU side
//! asynchronously, routes input to [`SceneApp`] and keeps the frame loop going.
//!
//! # Lifecycle
//!
//! 1. `resumed` creates the window and starts initialisation. Natively the
//!    async setup is blocked on with tokio; on the web it is spawned and the
//!    result comes back as [`FlowEvent::Initialized`].
//! 2. UI callbacks never touch the scene. DOM inputs and the keyboard produce
//!    [`UiInput`]s that are applied on the event loop.
//! 3. Every `RedrawRequested` renders the scene, advances the animation and
//!    requests the next frame until the [`FrameLoop`] is cancelled.

use std::{fmt::Debug, sync::Arc};

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    keyboard::{Key, NamedKey},
    window::Window,
};

use crate::{
    app::{PointerButton, SceneApp},
    config::SceneConfig,
    context::Context,
    controls::transform::TransformMode,
    frame_loop::{FrameLoop, LoopHandle},
    render::SceneRenderer,
    state::UiInput,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Scroll distance in pixels that counts as one wheel notch.
const PIXELS_PER_SCROLL_STEP: f64 = 100.0;

/// Everything that exists once initialisation finished.
pub(crate) struct AppState {
    ctx: Context,
    renderer: SceneRenderer,
    scene: SceneApp,
    frame_loop: FrameLoop,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>, config: SceneConfig) -> anyhow::Result<Self> {
        let ctx = Context::new(window, config.clear_colour).await?;
        let scene = SceneApp::initialize(config, ctx.config.width, ctx.config.height);
        let renderer =
            SceneRenderer::new(&ctx.device, &ctx.queue, ctx.config.format, &scene).await?;
        Ok(Self {
            ctx,
            renderer,
            scene,
            frame_loop: FrameLoop::new(),
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.ctx.resize(width, height) {
            self.is_surface_configured = true;
            self.scene.on_resize(width, height);
        } else {
            log::warn!("surface not resized to {}x{}", width, height);
        }
    }

    /// Renders one frame, then advances the animation to the frame's time.
    ///
    /// Returns `Ok(false)` once the frame loop is cancelled.
    fn render_frame(&mut self) -> Result<bool, wgpu::SurfaceError> {
        let Self {
            ctx,
            renderer,
            scene,
            frame_loop,
            is_surface_configured,
        } = self;
        frame_loop.frame(scene, *is_surface_configured, |scene| {
            let output = ctx.surface.get_current_texture()?;
            let view = output
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default());
            renderer.render(
                &ctx.device,
                &ctx.queue,
                scene,
                &view,
                &ctx.depth_texture.view,
                ctx.clear_colour,
            );
            output.present();
            Ok(())
        })
    }
}

pub(crate) enum FlowEvent {
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    Initialized(Box<AppState>),
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    Input(UiInput),
}

impl Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(_) => f.write_str("Initialized"),
            Self::Input(input) => f.debug_tuple("Input").field(input).finish(),
        }
    }
}

/// What a key press asks for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyAction {
    Input(UiInput),
    Mode(TransformMode),
    Exit,
}

/// Keyboard equivalents of the page controls.
pub fn key_action(key: &Key, app: &SceneApp) -> Option<KeyAction> {
    let config = app.config();
    let settings = app.settings();
    let distance = app.camera().position.z;
    let action = match key {
        Key::Named(NamedKey::ArrowUp) => {
            KeyAction::Input(UiInput::CameraDistance(distance - config.distance_step))
        }
        Key::Named(NamedKey::ArrowDown) => {
            KeyAction::Input(UiInput::CameraDistance(distance + config.distance_step))
        }
        Key::Named(NamedKey::Escape) => KeyAction::Exit,
        Key::Character(c) => match c.as_str() {
            "t" | "T" => KeyAction::Input(UiInput::ToggleTexture),
            "+" | "=" => KeyAction::Input(UiInput::LightIntensity(
                settings.light_intensity + config.intensity_step,
            )),
            "-" => KeyAction::Input(UiInput::LightIntensity(
                (settings.light_intensity - config.intensity_step).max(0.0),
            )),
            "w" | "W" => KeyAction::Mode(TransformMode::Translate),
            "s" | "S" => KeyAction::Mode(TransformMode::Scale),
            _ => return None,
        },
        _ => return None,
    };
    Some(action)
}

pub(crate) struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    proxy: EventLoopProxy<FlowEvent>,
    // taken when the window is created
    config: Option<SceneConfig>,
    state: Option<AppState>,
    loop_handle: Option<LoopHandle>,
    error: Option<anyhow::Error>,
    #[cfg(target_arch = "wasm32")]
    dom_bindings: Vec<Closure<dyn FnMut(web_sys::Event)>>,
}

impl App {
    fn new(event_loop: &EventLoop<FlowEvent>, config: SceneConfig) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            proxy,
            config: Some(config),
            state: None,
            loop_handle: None,
            error: None,
            #[cfg(target_arch = "wasm32")]
            dom_bindings: Vec::new(),
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        if let Some(handle) = &self.loop_handle {
            handle.cancel();
        }
        self.error = Some(error);
        event_loop.exit();
    }

    fn start(&mut self, mut state: AppState) {
        let size = state.ctx.window.inner_size();
        state.resize(size.width, size.height);
        self.loop_handle = Some(state.frame_loop.handle());
        state.ctx.window.request_redraw();
        self.state = Some(state);
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn create_window(
        &mut self,
        event_loop: &ActiveEventLoop,
        _config: &SceneConfig,
    ) -> anyhow::Result<Arc<Window>> {
        let window_attributes = Window::default_attributes().with_title("cube-scene");
        Ok(Arc::new(event_loop.create_window(window_attributes)?))
    }

    /// Creates a canvas inside the container and binds the page controls.
    #[cfg(target_arch = "wasm32")]
    fn create_window(
        &mut self,
        event_loop: &ActiveEventLoop,
        config: &SceneConfig,
    ) -> anyhow::Result<Arc<Window>> {
        use anyhow::Context as _;
        use winit::platform::web::WindowAttributesExtWebSys;

        let document = web_sys::window()
            .and_then(|window| window.document())
            .context("no document to render into")?;
        let container = document
            .get_element_by_id(&config.elements.container)
            .with_context(|| format!("missing element #{}", config.elements.container))?;
        let canvas: web_sys::HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| anyhow::anyhow!("created element is not a canvas"))?;
        canvas.set_width(container.client_width().max(1) as u32);
        canvas.set_height(container.client_height().max(1) as u32);
        canvas
            .set_attribute("style", "display: block; width: 100%; height: 100%")
            .map_err(js_error)?;
        container.append_child(&canvas).map_err(js_error)?;

        self.dom_bindings = dom::bind_controls(&document, &config.elements, &self.proxy)?;

        let window_attributes = Window::default_attributes().with_canvas(Some(canvas));
        Ok(Arc::new(event_loop.create_window(window_attributes)?))
    }

    fn on_key(&mut self, event_loop: &ActiveEventLoop, key: &Key) {
        let Some(state) = &mut self.state else {
            return;
        };
        match key_action(key, &state.scene) {
            Some(KeyAction::Input(input)) => state.scene.apply_input(input),
            Some(KeyAction::Mode(mode)) => state.scene.set_transform_mode(mode),
            Some(KeyAction::Exit) => {
                state.frame_loop.handle().cancel();
                event_loop.exit();
            }
            None => (),
        }
    }
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(config) = self.config.take() else {
            return;
        };

        let window = match self.create_window(event_loop, &config) {
            Ok(window) => window,
            Err(e) => return self.fail(event_loop, e.context("cannot create the render window")),
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self.async_runtime.block_on(AppState::new(window, config)) {
                Ok(state) => self.start(state),
                Err(e) => self.fail(event_loop, e.context("scene initialisation failed")),
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match AppState::new(window, config).await {
                    Ok(state) => {
                        if proxy
                            .send_event(FlowEvent::Initialized(Box::new(state)))
                            .is_err()
                        {
                            log::error!("event loop closed before the scene was ready");
                        }
                    }
                    Err(e) => log::error!("scene initialisation failed: {:#}", e),
                }
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            FlowEvent::Initialized(state) => self.start(*state),
            FlowEvent::Input(input) => match &mut self.state {
                Some(state) => state.scene.apply_input(input),
                None => log::warn!("dropping {:?} before initialisation", input),
            },
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::KeyboardInput { event: key, .. } = &event {
            if key.state == ElementState::Pressed && !key.repeat {
                self.on_key(event_loop, &key.logical_key);
            }
            return;
        }

        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => {
                state.frame_loop.handle().cancel();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => match state.render_frame() {
                Ok(true) => state.ctx.window.request_redraw(),
                Ok(false) => log::info!("frame loop stopped after {} frames", state.frame_loop.frames()),
                // reconfigure the surface if it's lost or outdated
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let size = state.ctx.window.inner_size();
                    state.resize(size.width, size.height);
                    state.ctx.window.request_redraw();
                }
                Err(e) => {
                    log::error!("unable to render {}", e);
                    state.ctx.window.request_redraw();
                }
            },
            WindowEvent::CursorMoved { position, .. } => state.scene.pointer_moved(position),
            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                let pointer = state.scene.pointer();
                match (button, button_state.is_pressed()) {
                    (MouseButton::Left, true) => {
                        state.scene.pointer_pressed(PointerButton::Primary, pointer)
                    }
                    (MouseButton::Right, true) => {
                        state.scene.pointer_pressed(PointerButton::Secondary, pointer)
                    }
                    (MouseButton::Left, false) => {
                        state.scene.pointer_released(PointerButton::Primary)
                    }
                    (MouseButton::Right, false) => {
                        state.scene.pointer_released(PointerButton::Secondary)
                    }
                    _ => (),
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => {
                        (position.y / PIXELS_PER_SCROLL_STEP) as f32
                    }
                };
                state.scene.scroll(steps);
            }
            _ => {}
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn js_error(value: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", value)
}

#[cfg(target_arch = "wasm32")]
mod dom {
    use anyhow::Context as _;
    use wasm_bindgen::{JsCast, prelude::*};
    use winit::event_loop::EventLoopProxy;

    use super::{FlowEvent, js_error};
    use crate::{config::ElementIds, state::UiInput};

    type Binding = Closure<dyn FnMut(web_sys::Event)>;

    /// Binds the two sliders and the texture button.
    ///
    /// The returned closures must outlive the page controls.
    pub(super) fn bind_controls(
        document: &web_sys::Document,
        ids: &ElementIds,
        proxy: &EventLoopProxy<FlowEvent>,
    ) -> anyhow::Result<Vec<Binding>> {
        Ok(vec![
            bind_slider(document, &ids.camera_distance, UiInput::CameraDistance, proxy.clone())?,
            bind_slider(document, &ids.light_intensity, UiInput::LightIntensity, proxy.clone())?,
            bind_button(document, &ids.texture_button, proxy.clone())?,
        ])
    }

    fn element(document: &web_sys::Document, id: &str) -> anyhow::Result<web_sys::Element> {
        document
            .get_element_by_id(id)
            .with_context(|| format!("missing element #{id}"))
    }

    fn send(proxy: &EventLoopProxy<FlowEvent>, input: UiInput) {
        if proxy.send_event(FlowEvent::Input(input)).is_err() {
            log::warn!("event loop closed, dropping {:?}", input);
        }
    }

    fn bind_slider(
        document: &web_sys::Document,
        id: &str,
        make: fn(f32) -> UiInput,
        proxy: EventLoopProxy<FlowEvent>,
    ) -> anyhow::Result<Binding> {
        let input: web_sys::HtmlInputElement = element(document, id)?
            .dyn_into()
            .map_err(|_| anyhow::anyhow!("#{id} is not an input element"))?;
        let slider = input.clone();
        let name = id.to_string();
        let closure = Binding::new(move |_event: web_sys::Event| {
            match UiInput::parse_slider(&slider.value(), make) {
                Ok(ui_input) => send(&proxy, ui_input),
                Err(e) => log::warn!("ignoring #{}: {:#}", name, e),
            }
        });
        input
            .add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())
            .map_err(js_error)?;
        Ok(closure)
    }

    fn bind_button(
        document: &web_sys::Document,
        id: &str,
        proxy: EventLoopProxy<FlowEvent>,
    ) -> anyhow::Result<Binding> {
        let button = element(document, id)?;
        let closure = Binding::new(move |_event: web_sys::Event| send(&proxy, UiInput::ToggleTexture));
        button
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(js_error)?;
        Ok(closure)
    }
}

/// Opens the scene and runs it until the window closes.
pub fn run(config: SceneConfig) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        // a second start on the same page keeps the first logger
        let _ = console_log::init_with_level(log::Level::Info);
    }

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, config)?;

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::SmolStr;

    fn app() -> SceneApp {
        SceneApp::initialize(SceneConfig::default(), 800, 600)
    }

    #[test]
    fn arrows_step_the_camera_distance() {
        let app = app();
        assert_eq!(
            key_action(&Key::Named(NamedKey::ArrowUp), &app),
            Some(KeyAction::Input(UiInput::CameraDistance(4.5)))
        );
        assert_eq!(
            key_action(&Key::Named(NamedKey::ArrowDown), &app),
            Some(KeyAction::Input(UiInput::CameraDistance(5.5)))
        );
    }

    #[test]
    fn characters_map_to_page_controls() {
        let app = app();
        let key = |c: &str| Key::Character(SmolStr::new(c));
        assert_eq!(
            key_action(&key("t"), &app),
            Some(KeyAction::Input(UiInput::ToggleTexture))
        );
        assert_eq!(
            key_action(&key("+"), &app),
            Some(KeyAction::Input(UiInput::LightIntensity(3.5)))
        );
        assert_eq!(
            key_action(&key("-"), &app),
            Some(KeyAction::Input(UiInput::LightIntensity(2.5)))
        );
        assert_eq!(
            key_action(&key("s"), &app),
            Some(KeyAction::Mode(TransformMode::Scale))
        );
        assert_eq!(key_action(&key("q"), &app), None);
        assert_eq!(
            key_action(&Key::Named(NamedKey::Escape), &app),
            Some(KeyAction::Exit)
        );
    }

    #[test]
    fn intensity_never_goes_negative() {
        let mut app = app();
        app.apply_input(UiInput::LightIntensity(0.2));
        assert_eq!(
            key_action(&Key::Character(SmolStr::new("-")), &app),
            Some(KeyAction::Input(UiInput::LightIntensity(0.0)))
        );
    }
}
