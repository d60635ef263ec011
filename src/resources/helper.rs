//! Geometry of the unlit helpers: the rect-area light outline and face, and
//! the axes of the transform gizmo.

use cgmath::{Point3, Vector3};

use crate::{controls::transform::TransformMode, data_structures::model::LineVertex, scene::RectAreaLight};

/// Length of a gizmo axis in world units.
pub const GIZMO_AXIS_LENGTH: f32 = 1.5;
/// Upper bound of [`gizmo_lines`] output, used to size the gizmo vertex buffer.
pub const GIZMO_MAX_VERTICES: usize = 12;

const AXIS_COLORS: [[f32; 3]; 3] = [[1.0, 0.2, 0.2], [0.2, 1.0, 0.2], [0.2, 0.4, 1.0]];
const ACTIVE_COLOR: [f32; 3] = [1.0, 1.0, 0.0];

fn vertex(p: Point3<f32>, color: [f32; 3]) -> LineVertex {
    LineVertex {
        position: p.into(),
        color,
    }
}

/// Line list tracing the light's rectangle.
pub fn rect_light_outline(light: &RectAreaLight) -> Vec<LineVertex> {
    let corners = light.corners();
    (0..4)
        .flat_map(|i| {
            [
                vertex(corners[i], light.color),
                vertex(corners[(i + 1) % 4], light.color),
            ]
        })
        .collect()
}

/// Two triangles covering the light's rectangle, wound counter-clockwise
/// when seen from the emitting side.
pub fn rect_light_fill(light: &RectAreaLight) -> Vec<LineVertex> {
    let [a, b, c, d] = light.corners();
    [a, b, c, a, c, d]
        .into_iter()
        .map(|p| vertex(p, light.color))
        .collect()
}

/// Line list of the gizmo's three axes at `origin`.
///
/// Axes turn yellow while a drag is active; scale mode adds a tick at each axis tip.
pub fn gizmo_lines(origin: Vector3<f32>, mode: TransformMode, dragging: bool) -> Vec<LineVertex> {
    let origin = Point3::new(origin.x, origin.y, origin.z);
    let axes = [Vector3::unit_x(), Vector3::unit_y(), Vector3::unit_z()];
    let mut lines = Vec::with_capacity(GIZMO_MAX_VERTICES);
    for (i, axis) in axes.iter().enumerate() {
        let color = if dragging { ACTIVE_COLOR } else { AXIS_COLORS[i] };
        let tip = origin + axis * GIZMO_AXIS_LENGTH;
        lines.push(vertex(origin, color));
        lines.push(vertex(tip, color));
        if let TransformMode::Scale = mode {
            let across = axes[(i + 1) % 3] * 0.15;
            lines.push(vertex(tip - across, color));
            lines.push(vertex(tip + across, color));
        }
    }
    lines
}
