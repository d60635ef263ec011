//! Render pipelines and their shaders.
pub mod basic;
pub mod helper;
pub mod light;
