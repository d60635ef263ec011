/**
 * Everything the renderer builds from outside data: the box geometry, the
 * helper geometry and the texture assets.
 */
pub mod helper;
pub mod mesh;
pub mod texture;

use crate::{
    config::SceneConfig,
    data_structures::model::Material,
    resources::texture::load_texture,
};

/// Loads both configured textures as cube materials, indexed like `TextureSlot::index`.
pub async fn load_cube_materials(
    config: &SceneConfig,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
) -> anyhow::Result<[Material; 2]> {
    let [first, second] = &config.textures;
    let (first, second) = futures::future::try_join(
        load_texture(first, device, queue),
        load_texture(second, device, queue),
    )
    .await?;
    log::info!("loaded cube textures {:?}", config.textures);
    Ok([
        Material::new(device, &config.textures[0], first, layout),
        Material::new(device, &config.textures[1], second, layout),
    ])
}
