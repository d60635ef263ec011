use cgmath::EuclideanSpace;
use wgpu::util::DeviceExt;

use crate::scene::{DirectionalLight, RectAreaLight};

/// Both lights of the scene as one uniform.
///
/// Every field is a `vec4` so the layout matches WGSL without padding fields.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    /// Direction the sun light travels in.
    pub sun_direction: [f32; 4],
    /// Colour in `xyz`, intensity in `w`.
    pub sun_color: [f32; 4],
    pub area_position: [f32; 4],
    /// Colour in `xyz`, intensity in `w`.
    pub area_color: [f32; 4],
    /// Unit right vector in `xyz`, half width in `w`.
    pub area_right: [f32; 4],
    /// Unit up vector in `xyz`, half height in `w`.
    pub area_up: [f32; 4],
}

impl LightUniform {
    pub fn new(sun: &DirectionalLight, area: &RectAreaLight) -> Self {
        let direction = sun.direction();
        let [r, g, b] = sun.color;
        let [ar, ag, ab] = area.color;
        Self {
            sun_direction: [direction.x, direction.y, direction.z, 0.0],
            sun_color: [r, g, b, sun.intensity],
            area_position: area.position.to_vec().extend(1.0).into(),
            area_color: [ar, ag, ab, area.intensity],
            area_right: [1.0, 0.0, 0.0, area.width / 2.0],
            area_up: [0.0, 1.0, 0.0, area.height / 2.0],
        }
    }
}

#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device, uniform: LightUniform) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("light_bind_group"),
        });
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Uploads `uniform` if it differs from the last upload.
    pub fn write(&mut self, queue: &wgpu::Queue, uniform: LightUniform) {
        if uniform != self.uniform {
            self.uniform = uniform;
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
        }
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
        label: Some("light_bind_group_layout"),
    })
}
