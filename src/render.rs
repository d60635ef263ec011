//! Render composition and pipeline batching.
//!
//! Each scene node is turned into a [`Render`] describing how it is drawn. The
//! renders are then sorted into one batch per pipeline, so every pipeline is
//! bound once per frame no matter how the nodes are ordered in the scene.
//!
//! # Key types
//!
//! - [`Render<'a>`] is the enum describing render operations
//! - [`Instanced<'a>`] is a mesh with its material and instance buffer
//! - [`Flat<'a>`] is unlit, pre-coloured geometry in a vertex buffer
//! - [`SceneRenderer`] owns every GPU resource of the scene and records the frame

use std::iter;

use wgpu::util::DeviceExt;

use crate::{
    app::SceneApp,
    camera::CameraResources,
    data_structures::model::{DrawModel, LineVertex, Material, Mesh},
    pipelines::{
        basic::mk_basic_pipeline,
        helper::HelperPipelines,
        light::{LightResources, LightUniform},
    },
    resources::{
        helper::{GIZMO_MAX_VERTICES, gizmo_lines, rect_light_fill, rect_light_outline},
        load_cube_materials,
        mesh::create_box_mesh,
        texture::diffuse_layout,
    },
    scene::SceneNode,
};

/// A mesh drawn with the Phong pipeline.
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub mesh: &'a Mesh,
    pub material: &'a Material,
    pub amount: usize,
}

/// Unlit geometry drawn straight from a vertex buffer.
pub struct Flat<'a> {
    pub vertex: &'a wgpu::Buffer,
    pub amount: usize,
}

/// Specifies how a scene node is rendered.
///
/// - `None` renders nothing (lights only feed the light uniform)
/// - `Mesh(Instanced)` renders a lit, textured mesh
/// - `Lines(Flat)` renders a line list
/// - `Surface(Flat)` renders triangles facing the camera
/// - `Composed(Vec<Render>)` renders all of its parts
pub enum Render<'a> {
    None,
    Mesh(Instanced<'a>),
    Lines(Flat<'a>),
    Surface(Flat<'a>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    pub(crate) fn set_pipelines(
        self,
        meshes: &mut Vec<Instanced<'a>>,
        lines: &mut Vec<Flat<'a>>,
        surfaces: &mut Vec<Flat<'a>>,
    ) {
        match self {
            Render::Mesh(instanced) => meshes.push(instanced),
            Render::Lines(flat) => lines.push(flat),
            Render::Surface(flat) => surfaces.push(flat),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(meshes, lines, surfaces)),
            Render::None => (),
        }
    }
}

struct FlatBuffer {
    buffer: wgpu::Buffer,
    amount: usize,
}

impl FlatBuffer {
    fn new(device: &wgpu::Device, label: &str, vertices: &[LineVertex]) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            buffer,
            amount: vertices.len(),
        }
    }

    fn flat(&self) -> Flat<'_> {
        Flat {
            vertex: &self.buffer,
            amount: self.amount,
        }
    }
}

/// GPU side of the scene.
///
/// Both cube materials are created up front, toggling the texture only picks
/// the other bind group.
pub struct SceneRenderer {
    camera: CameraResources,
    light: LightResources,
    phong: wgpu::RenderPipeline,
    helpers: HelperPipelines,
    cube_mesh: Mesh,
    materials: [Material; 2],
    instance_buffer: wgpu::Buffer,
    helper_outline: FlatBuffer,
    helper_fill: FlatBuffer,
    gizmo: FlatBuffer,
}

impl SceneRenderer {
    pub async fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_format: wgpu::TextureFormat,
        app: &SceneApp,
    ) -> anyhow::Result<Self> {
        let config = app.config();
        let camera = CameraResources::new(device, app.camera(), app.projection());

        let (sun, area) = match (app.directional_light(), app.rect_area_light()) {
            (Some(sun), Some(area)) => (sun, area),
            _ => anyhow::bail!("the scene has no lights to upload"),
        };
        let light = LightResources::new(device, LightUniform::new(sun, area));

        let material_layout = diffuse_layout(device);
        let materials = load_cube_materials(config, device, queue, &material_layout).await?;

        let phong = mk_basic_pipeline(
            device,
            color_format,
            &material_layout,
            &camera.bind_group_layout,
            &light.bind_group_layout,
        );
        let helpers = HelperPipelines::new(device, color_format, &camera.bind_group_layout);

        let cube_mesh = create_box_mesh(device, "cube", config.cube_size);
        let instance = app
            .cube()
            .map(|cube| cube.transform.to_instance())
            .unwrap_or_default();
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Instance Buffer"),
            contents: bytemuck::cast_slice(&[instance.to_raw()]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let helper_outline = FlatBuffer::new(device, "Rect Light Outline", &rect_light_outline(area));
        let helper_fill = FlatBuffer::new(device, "Rect Light Fill", &rect_light_fill(area));
        let gizmo = FlatBuffer::new(
            device,
            "Transform Gizmo",
            &[LineVertex {
                position: [0.0; 3],
                color: [0.0; 3],
            }; GIZMO_MAX_VERTICES],
        );

        log::info!("scene renderer ready for {:?}", color_format);
        Ok(Self {
            camera,
            light,
            phong,
            helpers,
            cube_mesh,
            materials,
            instance_buffer,
            helper_outline,
            helper_fill,
            gizmo,
        })
    }

    /// Uploads camera, lights, cube transform and gizmo for this frame.
    pub fn prepare(&mut self, queue: &wgpu::Queue, app: &SceneApp) {
        self.camera.write(queue, app.camera(), app.projection());
        if let (Some(sun), Some(area)) = (app.directional_light(), app.rect_area_light()) {
            self.light.write(queue, LightUniform::new(sun, area));
        }
        if let Some(cube) = app.cube() {
            let raw = cube.transform.to_instance().to_raw();
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&[raw]));

            let controls = app.transform_controls();
            let vertices = gizmo_lines(cube.transform.position, controls.mode, controls.is_dragging());
            queue.write_buffer(&self.gizmo.buffer, 0, bytemuck::cast_slice(&vertices));
            self.gizmo.amount = vertices.len();
        }
    }

    fn node_render(&self, app: &SceneApp, node: &SceneNode) -> Render<'_> {
        match node {
            SceneNode::Mesh(cube) => Render::Mesh(Instanced {
                instance: &self.instance_buffer,
                mesh: &self.cube_mesh,
                material: &self.materials[cube.texture.index()],
                amount: 1,
            }),
            SceneNode::RectAreaLightHelper { light } => match app.scene().get(*light) {
                Some(SceneNode::RectAreaLight(_)) => Render::Composed(vec![
                    Render::Surface(self.helper_fill.flat()),
                    Render::Lines(self.helper_outline.flat()),
                ]),
                _ => Render::None,
            },
            SceneNode::TransformGizmo if app.transform_controls().object().is_some() => {
                Render::Lines(self.gizmo.flat())
            }
            SceneNode::TransformGizmo | SceneNode::DirectionalLight(_) | SceneNode::RectAreaLight(_) => {
                Render::None
            }
        }
    }

    /// Draws the scene from the app's camera into `target`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        app: &SceneApp,
        target: &wgpu::TextureView,
        depth: &wgpu::TextureView,
        clear_colour: wgpu::Color,
    ) {
        self.prepare(queue, app);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let mut meshes: Vec<Instanced> = Vec::new();
            let mut lines: Vec<Flat> = Vec::new();
            let mut surfaces: Vec<Flat> = Vec::new();
            app.scene().nodes().iter().for_each(|node| {
                self.node_render(app, node)
                    .set_pipelines(&mut meshes, &mut lines, &mut surfaces)
            });

            render_pass.set_pipeline(&self.phong);
            for instanced in meshes {
                if instanced.amount == 0 {
                    log::warn!("skipping mesh {} without instances", instanced.mesh.name);
                    continue;
                }
                render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                render_pass.draw_mesh_instanced(
                    instanced.mesh,
                    instanced.material,
                    0..instanced.amount as u32,
                    &self.camera.bind_group,
                    &self.light.bind_group,
                );
            }

            render_pass.set_pipeline(&self.helpers.fill);
            render_pass.set_bind_group(0, &self.camera.bind_group, &[]);
            for flat in surfaces {
                render_pass.set_vertex_buffer(0, flat.vertex.slice(..));
                render_pass.draw(0..flat.amount as u32, 0..1);
            }
            render_pass.set_pipeline(&self.helpers.lines);
            for flat in lines {
                render_pass.set_vertex_buffer(0, flat.vertex.slice(..));
                render_pass.draw(0..flat.amount as u32, 0..1);
            }
        }
        queue.submit(iter::once(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composed_renders_are_batched_per_pipeline() {
        let mut meshes = Vec::new();
        let mut lines = Vec::new();
        let mut surfaces = Vec::new();
        Render::Composed(vec![Render::None, Render::Composed(vec![Render::None])])
            .set_pipelines(&mut meshes, &mut lines, &mut surfaces);
        assert!(meshes.is_empty());
        assert!(lines.is_empty());
        assert!(surfaces.is_empty());
    }
}
