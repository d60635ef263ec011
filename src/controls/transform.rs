//! Transform gizmo: grab the attached object with the mouse and move or scale it.
//!
//! A drag starts when the mouse ray hits the object's oriented box. Start and
//! end of a drag are reported as [`ControlEvent::DraggingChanged`], which the
//! app uses to switch the orbit controls off for the duration of the drag.

use cgmath::{EuclideanSpace, Point3, Vector3};
use winit::dpi::PhysicalPosition;

use crate::{camera::Ray, scene::{NodeId, Transform}};

/// Scale change per pixel of vertical drag.
const SCALE_PER_PIXEL: f32 = 0.01;
const MIN_SCALE: f32 = 0.01;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransformMode {
    #[default]
    Translate,
    Scale,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlEvent {
    DraggingChanged(bool),
}

#[derive(Clone, Debug)]
enum Drag {
    Translate {
        plane_point: Point3<f32>,
        plane_normal: Vector3<f32>,
        grab_offset: Vector3<f32>,
    },
    Scale {
        start_pointer: PhysicalPosition<f64>,
        start_scale: Vector3<f32>,
    },
}

#[derive(Clone, Debug, Default)]
pub struct TransformControls {
    pub mode: TransformMode,
    object: Option<NodeId>,
    drag: Option<Drag>,
}

impl TransformControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the gizmo to `object`. Attaching the same object again changes nothing.
    pub fn attach(&mut self, object: NodeId) {
        if self.object != Some(object) {
            self.object = Some(object);
            self.drag = None;
        }
    }

    pub fn detach(&mut self) -> Option<ControlEvent> {
        self.object = None;
        self.drag
            .take()
            .map(|_| ControlEvent::DraggingChanged(false))
    }

    pub fn object(&self) -> Option<NodeId> {
        self.object
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Starts a drag if `ray` hits the attached object.
    ///
    /// `view_direction` orients the translation plane so the object slides
    /// parallel to the screen.
    pub fn pointer_down(
        &mut self,
        ray: &Ray,
        pointer: PhysicalPosition<f64>,
        transform: &Transform,
        half_extents: Vector3<f32>,
        view_direction: Vector3<f32>,
    ) -> Option<ControlEvent> {
        if self.object.is_none() || self.drag.is_some() {
            return None;
        }
        let t = ray.intersect_box(transform.to_matrix(), half_extents)?;
        let drag = match self.mode {
            TransformMode::Translate => {
                let plane_point = Point3::from_vec(transform.position);
                let grab = ray
                    .intersect_plane(plane_point, view_direction)
                    .map(|t| ray.at(t))
                    .unwrap_or_else(|| ray.at(t));
                Drag::Translate {
                    plane_point,
                    plane_normal: view_direction,
                    grab_offset: transform.position - grab.to_vec(),
                }
            }
            TransformMode::Scale => Drag::Scale {
                start_pointer: pointer,
                start_scale: transform.scale,
            },
        };
        self.drag = Some(drag);
        Some(ControlEvent::DraggingChanged(true))
    }

    /// Applies the active drag to `transform`. Returns whether it changed.
    pub fn pointer_move(
        &mut self,
        ray: &Ray,
        pointer: PhysicalPosition<f64>,
        transform: &mut Transform,
    ) -> bool {
        match &self.drag {
            Some(Drag::Translate {
                plane_point,
                plane_normal,
                grab_offset,
            }) => match ray.intersect_plane(*plane_point, *plane_normal) {
                Some(t) => {
                    transform.position = ray.at(t).to_vec() + grab_offset;
                    true
                }
                None => false,
            },
            Some(Drag::Scale {
                start_pointer,
                start_scale,
            }) => {
                // dragging upwards grows the object
                let dy = (start_pointer.y - pointer.y) as f32;
                let factor = (1.0 + dy * SCALE_PER_PIXEL).max(MIN_SCALE);
                transform.scale = start_scale * factor;
                true
            }
            None => false,
        }
    }

    pub fn pointer_up(&mut self) -> Option<ControlEvent> {
        self.drag
            .take()
            .map(|_| ControlEvent::DraggingChanged(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    fn ray_from(x: f32, y: f32) -> Ray {
        Ray {
            origin: Point3::new(x, y, 5.0),
            direction: Vector3::new(0.0, 0.0, -1.0),
        }
    }

    fn half() -> Vector3<f32> {
        Vector3::new(1.0, 0.5, 0.5)
    }

    #[test]
    fn detached_gizmo_never_drags() {
        let mut controls = TransformControls::new();
        let event = controls.pointer_down(
            &ray_from(0.0, 0.0),
            (0.0, 0.0).into(),
            &Transform::default(),
            half(),
            -Vector3::unit_z(),
        );
        assert_eq!(event, None);
    }

    #[test]
    fn missing_the_object_starts_nothing() {
        let mut controls = TransformControls::new();
        controls.attach(NodeId(0));
        let event = controls.pointer_down(
            &ray_from(3.0, 0.0),
            (0.0, 0.0).into(),
            &Transform::default(),
            half(),
            -Vector3::unit_z(),
        );
        assert_eq!(event, None);
        assert!(!controls.is_dragging());
    }

    #[test]
    fn translate_drag_follows_the_ray() {
        let mut controls = TransformControls::new();
        controls.attach(NodeId(0));
        let mut transform = Transform::default();
        let started = controls.pointer_down(
            &ray_from(0.5, 0.0),
            (0.0, 0.0).into(),
            &transform,
            half(),
            -Vector3::unit_z(),
        );
        assert_eq!(started, Some(ControlEvent::DraggingChanged(true)));
        assert!(controls.pointer_move(&ray_from(1.5, 1.0), (0.0, 0.0).into(), &mut transform));
        assert!((transform.position - Vector3::new(1.0, 1.0, 0.0)).magnitude() < 1e-5);
        assert_eq!(controls.pointer_up(), Some(ControlEvent::DraggingChanged(false)));
        assert_eq!(controls.pointer_up(), None);
    }

    #[test]
    fn scale_drag_grows_upwards_and_never_vanishes() {
        let mut controls = TransformControls::new();
        controls.mode = TransformMode::Scale;
        controls.attach(NodeId(0));
        let mut transform = Transform::default();
        controls.pointer_down(&ray_from(0.0, 0.0), (10.0, 200.0).into(), &transform, half(), -Vector3::unit_z());
        controls.pointer_move(&ray_from(0.0, 0.0), (10.0, 100.0).into(), &mut transform);
        assert!((transform.scale.x - 2.0).abs() < 1e-5);
        controls.pointer_move(&ray_from(0.0, 0.0), (10.0, 10_000.0).into(), &mut transform);
        assert!((transform.scale.x - MIN_SCALE).abs() < 1e-6);
    }

    #[test]
    fn reattaching_is_idempotent() {
        let mut controls = TransformControls::new();
        controls.attach(NodeId(3));
        controls.attach(NodeId(3));
        assert_eq!(controls.object(), Some(NodeId(3)));
        assert_eq!(controls.detach(), None);
        assert_eq!(controls.object(), None);
    }
}
