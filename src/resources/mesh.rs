use cgmath::Vector3;
use wgpu::util::DeviceExt;

use crate::data_structures::model::{self, ModelVertex};

/**
 * Faces of a box as (normal, u axis, v axis) with u x v = normal, so the
 * corners below wind counter-clockwise when looking at the face from outside.
 */
const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
];

/// Vertices and indices of a box centred at the origin.
///
/// Every face gets its own four vertices so normals stay flat and each face
/// shows the whole texture, with (0, 0) in the face's upper left corner.
pub fn box_geometry(width: f32, height: f32, depth: f32) -> (Vec<ModelVertex>, Vec<u32>) {
    let half = Vector3::new(width, height, depth) / 2.0;
    // half size of the box along an axis direction
    let extent = |axis: Vector3<f32>| axis.x.abs() * half.x + axis.y.abs() * half.y + axis.z.abs() * half.z;

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in FACES {
        let (normal, u, v): (Vector3<f32>, Vector3<f32>, Vector3<f32>) = (normal.into(), u.into(), v.into());
        let centre = normal * extent(normal);
        let (du, dv) = (u * extent(u), v * extent(v));
        let base = vertices.len() as u32;
        // bottom left, bottom right, top right, top left
        let corners = [
            (centre - du - dv, [0.0, 1.0]),
            (centre + du - dv, [1.0, 1.0]),
            (centre + du + dv, [1.0, 0.0]),
            (centre - du + dv, [0.0, 0.0]),
        ];
        for (position, tex_coords) in corners {
            vertices.push(ModelVertex {
                position: position.into(),
                tex_coords,
                normal: normal.into(),
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    (vertices, indices)
}

pub fn create_box_mesh(device: &wgpu::Device, name: &str, size: [f32; 3]) -> model::Mesh {
    let (vertices, indices) = box_geometry(size[0], size[1], size[2]);

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Vertex Buffer", name)),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });

    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Index Buffer", name)),
        contents: bytemuck::cast_slice(&indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    model::Mesh {
        name: name.to_string(),
        vertex_buffer,
        index_buffer,
        num_elements: indices.len() as u32,
    }
}
