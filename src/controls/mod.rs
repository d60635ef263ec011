//! Input helpers that manipulate the camera and the cube.
//!
//! - `orbit` rotates, pans and zooms the camera around its target
//! - `transform` is the gizmo that drags the cube around or scales it

pub mod orbit;
pub mod transform;
