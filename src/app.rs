//! The scene application.
//!
//! [`SceneApp`] owns everything that describes the scene on the CPU: the scene
//! graph, camera and projection, both control helpers and the UI settings. It
//! never touches the GPU, the renderer reads it once per frame, which keeps all
//! of the behaviour below testable without a device.

use winit::dpi::PhysicalPosition;

use crate::{
    camera::{Camera, Projection},
    config::SceneConfig,
    controls::{
        orbit::{OrbitControls, OrbitGesture},
        transform::{ControlEvent, TransformControls, TransformMode},
    },
    scene::{Cube, DirectionalLight, NodeId, RectAreaLight, Scene, SceneNode},
    state::{SceneSettings, TextureSlot, UiInput},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    /// Grabs the cube or rotates the camera.
    Primary,
    /// Pans the camera.
    Secondary,
}

#[derive(Debug)]
pub struct SceneApp {
    config: SceneConfig,
    scene: Scene,
    camera: Camera,
    projection: Projection,
    orbit: OrbitControls,
    transform: TransformControls,
    settings: SceneSettings,
    cube: NodeId,
    directional_light: NodeId,
    rect_area_light: NodeId,
    size: (u32, u32),
    pointer: PhysicalPosition<f64>,
}

impl SceneApp {
    /// Builds the scene for a container of `width` x `height` pixels.
    pub fn initialize(config: SceneConfig, width: u32, height: u32) -> Self {
        let mut scene = Scene::new();

        let cube = scene.add(SceneNode::Mesh(Cube::new(config.cube_size, TextureSlot::Primary)));

        let camera = Camera::from_config(&config.camera);
        let projection = Projection::new(
            width,
            height,
            cgmath::Deg(config.camera.fovy),
            config.camera.znear,
            config.camera.zfar,
        );

        let directional_light = scene.add(SceneNode::DirectionalLight(DirectionalLight::from(
            &config.directional_light,
        )));

        scene.add(SceneNode::TransformGizmo);
        let transform = TransformControls::new();
        let orbit = OrbitControls::new();

        let rect_area_light =
            scene.add(SceneNode::RectAreaLight(RectAreaLight::from(&config.rect_area_light)));
        scene.add(SceneNode::RectAreaLightHelper {
            light: rect_area_light,
        });

        let settings = SceneSettings {
            camera_distance: camera.position.z,
            light_intensity: config.directional_light.intensity,
            texture: TextureSlot::Primary,
        };

        let mut app = Self {
            config,
            scene,
            camera,
            projection,
            orbit,
            transform,
            settings,
            cube,
            directional_light,
            rect_area_light,
            size: (width, height),
            pointer: PhysicalPosition::new(0.0, 0.0),
        };
        app.on_resize(width, height);
        log::info!(
            "scene initialised with {} nodes at {}x{}",
            app.scene.len(),
            width,
            height
        );
        app
    }

    /// Matches camera aspect and surface size to the container and re-attaches the gizmo.
    ///
    /// Returns `false` and keeps the previous size if a dimension is zero.
    pub fn on_resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            log::warn!("ignoring resize to {}x{}", width, height);
            return false;
        }
        self.projection.resize(width, height);
        self.size = (width, height);
        self.transform.attach(self.cube);
        true
    }

    /// Advances the animation to `time_ms` milliseconds since the loop started.
    pub fn update(&mut self, time_ms: f64) {
        let angle = cgmath::Rad((time_ms * 0.001) as f32);
        if let Some(cube) = self.scene.cube_mut(self.cube) {
            cube.transform.rotation[0] = angle;
            cube.transform.rotation[1] = angle;
        }
    }

    pub fn apply_input(&mut self, input: UiInput) {
        log::debug!("ui input {:?}", input);
        self.settings.apply(input);
        match input {
            UiInput::CameraDistance(_) => self.camera.position.z = self.settings.camera_distance,
            UiInput::ToggleTexture => {
                let texture = self.settings.texture;
                if let Some(cube) = self.scene.cube_mut(self.cube) {
                    cube.texture = texture;
                }
                log::info!("cube texture is now {}", self.texture_path());
            }
            UiInput::LightIntensity(_) => {
                let intensity = self.settings.light_intensity;
                if let Some(light) = self.scene.directional_light_mut(self.directional_light) {
                    light.intensity = intensity;
                }
            }
        }
    }

    pub fn set_transform_mode(&mut self, mode: TransformMode) {
        if self.transform.is_dragging() {
            log::warn!("cannot switch the gizmo to {:?} during a drag", mode);
            return;
        }
        self.transform.mode = mode;
    }

    pub fn pointer_pressed(&mut self, button: PointerButton, position: PhysicalPosition<f64>) {
        self.pointer = position;
        match button {
            PointerButton::Primary => {
                let ray = self.camera.cast_ray_from_mouse(
                    position,
                    self.size.0 as f32,
                    self.size.1 as f32,
                    &self.projection,
                );
                let event = self.scene.cube(self.cube).and_then(|cube| {
                    self.transform.pointer_down(
                        &ray,
                        position,
                        &cube.transform,
                        cube.half_extents(),
                        self.camera.forward(),
                    )
                });
                match event {
                    Some(event) => self.on_control_event(event),
                    None => self.orbit.pointer_down(OrbitGesture::Rotate, position),
                }
            }
            PointerButton::Secondary => self.orbit.pointer_down(OrbitGesture::Pan, position),
        }
    }

    pub fn pointer_moved(&mut self, position: PhysicalPosition<f64>) {
        self.pointer = position;
        if self.transform.is_dragging() {
            let ray = self.camera.cast_ray_from_mouse(
                position,
                self.size.0 as f32,
                self.size.1 as f32,
                &self.projection,
            );
            if let Some(cube) = self.scene.cube_mut(self.cube) {
                self.transform.pointer_move(&ray, position, &mut cube.transform);
            }
        } else {
            self.orbit
                .pointer_move(position, &mut self.camera, &self.projection, self.size.1 as f32);
        }
    }

    /// Ends the gesture `button` started; the other button's gesture goes on.
    pub fn pointer_released(&mut self, button: PointerButton) {
        let gesture = match button {
            PointerButton::Primary => {
                if let Some(event) = self.transform.pointer_up() {
                    self.on_control_event(event);
                }
                OrbitGesture::Rotate
            }
            PointerButton::Secondary => OrbitGesture::Pan,
        };
        if self.orbit.gesture() == Some(gesture) {
            self.orbit.pointer_up();
        }
    }

    /// Scroll by `steps` notches, positive zooms in.
    pub fn scroll(&mut self, steps: f32) {
        self.orbit.zoom(&mut self.camera, steps);
    }

    fn on_control_event(&mut self, event: ControlEvent) {
        log::debug!("transform control {:?}", event);
        match event {
            ControlEvent::DraggingChanged(dragging) => self.orbit.set_enabled(!dragging),
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn orbit(&self) -> &OrbitControls {
        &self.orbit
    }

    pub fn transform_controls(&self) -> &TransformControls {
        &self.transform
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    pub fn surface_size(&self) -> (u32, u32) {
        self.size
    }

    pub fn pointer(&self) -> PhysicalPosition<f64> {
        self.pointer
    }

    pub fn cube_id(&self) -> NodeId {
        self.cube
    }

    pub fn cube(&self) -> Option<&Cube> {
        self.scene.cube(self.cube)
    }

    pub fn directional_light(&self) -> Option<&DirectionalLight> {
        self.scene.directional_light(self.directional_light)
    }

    pub fn rect_area_light(&self) -> Option<&RectAreaLight> {
        self.scene.rect_area_light(self.rect_area_light)
    }

    /// Asset path of the texture currently mapped on the cube.
    pub fn texture_path(&self) -> &str {
        let slot = self.cube().map(|cube| cube.texture).unwrap_or_default();
        slot.path(&self.config.textures)
    }
}
