//! Camera, projection and the camera uniform.
//!
//! The camera always looks at its `target`; the orbit controls move both
//! around. [`Projection`] is kept separately because only resizes change it.
//! Rays cast from the mouse position are used by the transform gizmo to grab
//! and drag the cube.

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, SquareMatrix, Vector3, Vector4};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalPosition;

use crate::config::CameraConfig;

/// wgpu uses a depth range of 0..1 where cgmath builds OpenGL style -1..1 clip space.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>, T: Into<Point3<f32>>>(position: P, target: T) -> Self {
        Self {
            position: position.into(),
            target: target.into(),
            up: Vector3::unit_y(),
        }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(config.position, config.target)
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }

    /// Unit vector from the camera towards its target.
    pub fn forward(&self) -> Vector3<f32> {
        (self.target - self.position).normalize()
    }

    /// Right and up vectors of the view plane.
    pub fn basis(&self) -> (Vector3<f32>, Vector3<f32>) {
        let forward = self.forward();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward);
        (right, up)
    }

    /// Casts a ray from the camera through the given window coordinates.
    pub fn cast_ray_from_mouse(
        &self,
        coords: PhysicalPosition<f64>,
        width: f32,
        height: f32,
        projection: &Projection,
    ) -> Ray {
        let ndc_x = 2.0 * coords.x as f32 / width - 1.0;
        let ndc_y = 1.0 - 2.0 * coords.y as f32 / height;
        let half_height = (projection.fovy.0 / 2.0).tan();
        let half_width = half_height * projection.aspect;
        let (right, up) = self.basis();
        let direction =
            self.forward() + right * (ndc_x * half_width) + up * (ndc_y * half_height);
        Ray {
            origin: self.position,
            direction: direction.normalize(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }

    /// Distance along the ray to the plane through `point` with `normal`, if it lies ahead.
    pub fn intersect_plane(&self, point: Point3<f32>, normal: Vector3<f32>) -> Option<f32> {
        let denom = normal.dot(self.direction);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = (point - self.origin).dot(normal) / denom;
        (t >= 0.0).then_some(t)
    }

    /// Slab test against a box centred at the origin of `model`'s local space.
    ///
    /// Returns the entry distance in units of this ray, or `None` on a miss.
    pub fn intersect_box(&self, model: Matrix4<f32>, half_extents: Vector3<f32>) -> Option<f32> {
        let inverse = model.invert()?;
        let origin = inverse * self.origin.to_homogeneous();
        let direction = inverse * Vector4::new(self.direction.x, self.direction.y, self.direction.z, 0.0);

        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let (o, d, h) = (origin[axis], direction[axis], half_extents[axis]);
            if d.abs() < 1e-8 {
                if o < -h || o > h {
                    return None;
                }
                continue;
            }
            let t1 = (-h - o) / d;
            let t2 = (h - o) / d;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }
        if t_max < t_min.max(0.0) {
            return None;
        }
        Some(t_min.max(0.0))
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// GPU side of the camera: uniform buffer and its bind group.
#[derive(Debug)]
pub struct CameraResources {
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(device: &wgpu::Device, camera: &Camera, projection: &Projection) -> Self {
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(camera, projection);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("camera_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write(&mut self, queue: &wgpu::Queue, camera: &Camera, projection: &Projection) {
        self.uniform.update_view_proj(camera, projection);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Matrix4};

    fn projection() -> Projection {
        Projection::new(800, 600, Deg(75.0), 0.1, 100.0)
    }

    #[test]
    fn centre_ray_points_at_target() {
        let camera = Camera::new((0.0, 0.0, 5.0), (0.0, 0.0, 0.0));
        let ray = camera.cast_ray_from_mouse((400.0, 300.0).into(), 800.0, 600.0, &projection());
        assert!((ray.direction - Vector3::new(0.0, 0.0, -1.0)).magnitude() < 1e-5);
    }

    #[test]
    fn upper_left_ray_leans_left_and_up() {
        let camera = Camera::new((0.0, 0.0, 5.0), (0.0, 0.0, 0.0));
        let ray = camera.cast_ray_from_mouse((0.0, 0.0).into(), 800.0, 600.0, &projection());
        assert!(ray.direction.x < 0.0);
        assert!(ray.direction.y > 0.0);
    }

    #[test]
    fn ray_hits_box_front_face() {
        let ray = Ray {
            origin: Point3::new(0.0, 0.0, 5.0),
            direction: Vector3::new(0.0, 0.0, -1.0),
        };
        let t = ray
            .intersect_box(Matrix4::identity(), Vector3::new(1.0, 0.5, 0.5))
            .expect("ray should hit the box");
        assert!((t - 4.5).abs() < 1e-5);
    }

    #[test]
    fn ray_misses_translated_box() {
        let ray = Ray {
            origin: Point3::new(0.0, 0.0, 5.0),
            direction: Vector3::new(0.0, 0.0, -1.0),
        };
        let model = Matrix4::from_translation(Vector3::new(3.0, 0.0, 0.0));
        assert_eq!(ray.intersect_box(model, Vector3::new(1.0, 0.5, 0.5)), None);
    }

    #[test]
    fn plane_behind_ray_is_ignored() {
        let ray = Ray {
            origin: Point3::new(0.0, 0.0, 5.0),
            direction: Vector3::new(0.0, 0.0, 1.0),
        };
        assert_eq!(ray.intersect_plane(Point3::origin(), Vector3::unit_z()), None);
    }
}
