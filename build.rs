use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

/// Both cube textures must ship with the binary, the texture button swaps between them.
const TEXTURES: [&str; 2] = ["4.png", "5.png"];

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets/");
    for texture in TEXTURES {
        println!("cargo:rerun-if-changed=assets/{texture}");
    }

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets_src = manifest_dir.join("assets");
    for texture in TEXTURES {
        if !assets_src.join(texture).exists() {
            println!("cargo:warning=missing texture asset assets/{texture}");
        }
    }

    if assets_src.exists() {
        let out_dir = env::var("OUT_DIR")?;
        let mut copy_options = CopyOptions::new();
        copy_options.overwrite = true;
        copy_items(&[assets_src], out_dir, &copy_options)?;
    }

    Ok(())
}
