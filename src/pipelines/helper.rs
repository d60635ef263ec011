use crate::{
    data_structures::{
        model::{LineVertex, Vertex},
        texture::Texture,
    },
    pipelines::basic::mk_render_pipeline,
};

/// Unlit pipelines for the light helper and the gizmo.
#[derive(Debug)]
pub struct HelperPipelines {
    pub lines: wgpu::RenderPipeline,
    pub fill: wgpu::RenderPipeline,
}

impl HelperPipelines {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Helper Pipeline Layout"),
            bind_group_layouts: &[camera_bind_group_layout],
            push_constant_ranges: &[],
        });
        let shader = || wgpu::ShaderModuleDescriptor {
            label: Some("Helper Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("helper.wgsl").into()),
        };
        let lines = mk_render_pipeline(
            device,
            &layout,
            color_format,
            Some(wgpu::BlendState::REPLACE),
            Some(Texture::DEPTH_FORMAT),
            &[LineVertex::desc()],
            wgpu::PrimitiveTopology::LineList,
            None,
            shader(),
        );
        // the light face only shows from its emitting side
        let fill = mk_render_pipeline(
            device,
            &layout,
            color_format,
            Some(wgpu::BlendState::REPLACE),
            Some(Texture::DEPTH_FORMAT),
            &[LineVertex::desc()],
            wgpu::PrimitiveTopology::TriangleList,
            Some(wgpu::Face::Back),
            shader(),
        );
        Self { lines, fill }
    }
}
