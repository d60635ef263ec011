use cube_scene::{SceneConfig, flow};

fn main() -> anyhow::Result<()> {
    flow::run(SceneConfig::default())
}
