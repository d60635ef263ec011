#![allow(dead_code)]

use cube_scene::{SceneApp, SceneConfig};

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 600;

pub fn scene_app() -> SceneApp {
    SceneApp::initialize(SceneConfig::default(), WIDTH, HEIGHT)
}

/// Rounds a clear colour the way an 8 bit target stores it.
pub fn colour_to_pixel(colour: wgpu::Color) -> image::Rgba<u8> {
    let f_to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    image::Rgba([
        f_to_u8(colour.r),
        f_to_u8(colour.g),
        f_to_u8(colour.b),
        f_to_u8(colour.a),
    ])
}

#[cfg(feature = "integration-tests")]
pub use gpu::*;

#[cfg(feature = "integration-tests")]
mod gpu {
    use std::time::Duration;

    use cube_scene::{SceneApp, data_structures::texture::Texture, render::SceneRenderer};

    /// Offscreen format; sRGB like the window surface.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    pub struct Headless {
        pub device: wgpu::Device,
        pub queue: wgpu::Queue,
    }

    /// A device without a surface, or `None` on machines without an adapter.
    pub async fn headless() -> Option<Headless> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await
            .ok()?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .ok()?;
        Some(Headless { device, queue })
    }

    /// Renders `app` into a `size` x `size` texture and reads it back.
    ///
    /// `size` must be a multiple of 64 so rows need no padding.
    pub async fn render_offscreen(
        gpu: &Headless,
        renderer: &mut SceneRenderer,
        app: &SceneApp,
        size: u32,
        clear_colour: wgpu::Color,
    ) -> anyhow::Result<image::RgbaImage> {
        let extent = wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        };
        let target = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Golden Image Test Output Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FORMAT,
            usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth = Texture::create_depth_texture(&gpu.device, [size, size], "test depth");
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());

        renderer.render(&gpu.device, &gpu.queue, app, &view, &depth.view, clear_colour);

        let u32_size = std::mem::size_of::<u32>() as u32;
        let output_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            size: (u32_size * size * size) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            label: None,
            mapped_at_creation: false,
        });
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Readback Encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(u32_size * size),
                    rows_per_image: Some(size),
                },
            },
            extent,
        );
        gpu.queue.submit(std::iter::once(encoder.finish()));

        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        let buffer_slice = output_buffer.slice(..);
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            tx.send(result).ok();
        });
        gpu.device.poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: Some(Duration::from_secs(3)),
        })?;
        rx.receive()
            .await
            .ok_or_else(|| anyhow::anyhow!("buffer mapping was dropped"))??;

        let data = buffer_slice.get_mapped_range().to_vec();
        output_buffer.unmap();
        image::RgbaImage::from_raw(size, size, data)
            .ok_or_else(|| anyhow::anyhow!("readback has the wrong size"))
    }
}
