//! Scene configuration.
//!
//! [`SceneConfig`] collects every constant the scene is built from: DOM ids,
//! texture assets, camera and light parameters, the clear colour and the step
//! sizes of the native keyboard bindings. `Default` reproduces the demo scene.

/// Ids of the DOM elements the browser build binds to.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementIds {
    pub container: String,
    pub camera_distance: String,
    pub texture_button: String,
    pub light_intensity: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            container: "webgl-container".to_string(),
            camera_distance: "camera-distance".to_string(),
            texture_button: "texture-button".to_string(),
            light_intensity: "light-intensity".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fovy: 75.0,
            znear: 0.1,
            zfar: 100.0,
            position: [0.0, 0.0, 5.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DirectionalLightConfig {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Default for DirectionalLightConfig {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity: 3.0,
            position: [-1.0, 2.0, 4.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RectAreaLightConfig {
    pub color: [f32; 3],
    pub intensity: f32,
    pub width: f32,
    pub height: f32,
    pub position: [f32; 3],
}

impl Default for RectAreaLightConfig {
    fn default() -> Self {
        Self {
            // orange, #ffa500
            color: [1.0, 165.0 / 255.0, 0.0],
            intensity: 10.0,
            width: 4.0,
            height: 4.0,
            position: [-1.0, -2.0, 4.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub elements: ElementIds,
    /// The two textures the texture button toggles between, relative to `assets/`.
    pub textures: [String; 2],
    /// Width, height and depth of the cube.
    pub cube_size: [f32; 3],
    pub camera: CameraConfig,
    pub directional_light: DirectionalLightConfig,
    pub rect_area_light: RectAreaLightConfig,
    pub clear_colour: wgpu::Color,
    /// Camera distance change per ArrowUp / ArrowDown press on native.
    pub distance_step: f32,
    /// Light intensity change per `+` / `-` press on native.
    pub intensity_step: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            elements: ElementIds::default(),
            textures: ["4.png".to_string(), "5.png".to_string()],
            cube_size: [2.0, 1.0, 1.0],
            camera: CameraConfig::default(),
            directional_light: DirectionalLightConfig::default(),
            rect_area_light: RectAreaLightConfig::default(),
            clear_colour: wgpu::Color::BLACK,
            distance_step: 0.5,
            intensity_step: 0.5,
        }
    }
}
