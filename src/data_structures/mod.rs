//! Engine data structures: vertices, meshes, materials, instances and textures.
//!
//! - `model` contains vertex formats, meshes, materials and the draw helper
//! - `texture` contains the GPU texture wrapper and creation utilities
//! - `instance` holds per-instance transformation data

pub mod instance;
pub mod model;
pub mod texture;
