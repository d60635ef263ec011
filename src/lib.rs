//! cube-scene
//!
//! A small cross-platform 3D scene: a textured box spinning under a directional
//! light and an orange rect-area light, with orbit controls for the camera and
//! a transform gizmo for the box. Runs in a native window or inside a browser
//! canvas (WASM + WebGL), where three DOM inputs drive the camera distance, the
//! light intensity and the cube texture.
//!
//! High-level modules
//! - `app`: the `SceneApp` owning scene, camera, lights, controls and UI state
//! - `camera`: camera, projection, uniforms and mouse rays
//! - `config`: every constant of the scene in one `SceneConfig`
//! - `context`: GPU and window context (surface, device, queue, depth buffer)
//! - `controls`: orbit and transform helpers
//! - `data_structures`: vertices, meshes, materials, instances and textures
//! - `flow`: winit event loop, DOM bindings and the redraw loop
//! - `frame_loop`: frame clock with a cancellation token
//! - `pipelines`: render pipelines and their WGSL shaders
//! - `render`: draw batching and the `SceneRenderer`
//! - `resources`: box geometry and asset loading
//! - `scene`: the ordered scene graph
//! - `state`: typed UI inputs and settings
//!

pub mod app;
pub mod camera;
pub mod config;
pub mod context;
pub mod controls;
pub mod data_structures;
pub mod flow;
pub mod frame_loop;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;
pub mod state;

// Re-exports commonly used types for convenience in downstream code.
pub use app::SceneApp;
pub use config::SceneConfig;
pub use state::{TextureSlot, UiInput};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Browser entry point, invoked by the generated JS glue once the module is loaded.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    if let Err(e) = flow::run(SceneConfig::default()) {
        log::error!("cube-scene stopped: {e:#}");
    }
}
