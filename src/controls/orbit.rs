//! Orbit controls: rotate, pan and zoom the camera around its target.
//!
//! The spherical coordinates are recomputed from the camera position on every
//! gesture, so writes to the camera from elsewhere (the distance slider) are
//! picked up without any resynchronisation.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Vector3};
use winit::dpi::PhysicalPosition;

use crate::camera::{Camera, Projection};

const POLAR_EPSILON: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrbitGesture {
    Rotate,
    Pan,
}

#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub enabled: bool,
    pub rotate_speed: f32,
    /// Distance factor per scroll step.
    pub zoom_scale: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    gesture: Option<OrbitGesture>,
    last: Option<PhysicalPosition<f64>>,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enabled: true,
            rotate_speed: 1.0,
            zoom_scale: 0.95,
            min_distance: 0.5,
            max_distance: 50.0,
            gesture: None,
            last: None,
        }
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> Option<OrbitGesture> {
        self.gesture
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.gesture = None;
            self.last = None;
        }
    }

    pub fn pointer_down(&mut self, gesture: OrbitGesture, position: PhysicalPosition<f64>) {
        if !self.enabled {
            return;
        }
        self.gesture = Some(gesture);
        self.last = Some(position);
    }

    pub fn pointer_up(&mut self) {
        self.gesture = None;
        self.last = None;
    }

    /// Applies the active gesture. Returns whether the camera moved.
    pub fn pointer_move(
        &mut self,
        position: PhysicalPosition<f64>,
        camera: &mut Camera,
        projection: &Projection,
        viewport_height: f32,
    ) -> bool {
        let (Some(gesture), Some(last)) = (self.gesture, self.last) else {
            return false;
        };
        self.last = Some(position);
        if !self.enabled || viewport_height <= 0.0 {
            return false;
        }
        let dx = (position.x - last.x) as f32;
        let dy = (position.y - last.y) as f32;
        match gesture {
            OrbitGesture::Rotate => {
                let scale = 2.0 * PI * self.rotate_speed / viewport_height;
                self.rotate(camera, -dx * scale, -dy * scale);
            }
            OrbitGesture::Pan => self.pan(camera, projection, dx, dy, viewport_height),
        }
        true
    }

    /// Rotates the camera by `d_theta` around the vertical axis and `d_phi` towards the poles.
    pub fn rotate(&self, camera: &mut Camera, d_theta: f32, d_phi: f32) {
        let offset = camera.position - camera.target;
        let radius = offset.magnitude();
        if radius <= f32::EPSILON {
            return;
        }
        let theta = offset.x.atan2(offset.z) + d_theta;
        let phi = ((offset.y / radius).clamp(-1.0, 1.0).acos() + d_phi)
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        camera.position = camera.target + spherical_to_offset(radius, theta, phi);
    }

    fn pan(&self, camera: &mut Camera, projection: &Projection, dx: f32, dy: f32, viewport_height: f32) {
        let distance = (camera.position - camera.target).magnitude();
        let visible = distance * (projection.fovy.0 / 2.0).tan();
        let (right, up) = camera.basis();
        let shift = right * (-2.0 * dx * visible / viewport_height) + up * (2.0 * dy * visible / viewport_height);
        camera.position += shift;
        camera.target += shift;
    }

    /// Dollies towards the target by `steps` scroll steps; negative steps move away.
    pub fn zoom(&self, camera: &mut Camera, steps: f32) {
        if !self.enabled {
            return;
        }
        let offset = camera.position - camera.target;
        let radius = offset.magnitude();
        if radius <= f32::EPSILON {
            return;
        }
        let new_radius = (radius * self.zoom_scale.powf(steps)).clamp(self.min_distance, self.max_distance);
        camera.position = camera.target + offset * (new_radius / radius);
    }
}

fn spherical_to_offset(radius: f32, theta: f32, phi: f32) -> Vector3<f32> {
    Vector3::new(
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
        radius * phi.sin() * theta.cos(),
    )
}
