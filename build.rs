use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

/// Level and texture files the viewer reads at runtime.
const ASSET_DIR: &str = "assets";

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed={ASSET_DIR}");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets_src = manifest_dir.join(ASSET_DIR);
    if !assets_src.exists() {
        println!("cargo:warning=no {ASSET_DIR}/ directory, the viewer will have no level to load");
        return Ok(());
    }
    if !assets_src.join("level.proc").exists() {
        println!("cargo:warning={ASSET_DIR}/level.proc is missing, pass a level explicitly");
    }

    let out_dir = env::var("OUT_DIR")?;
    let mut copy_options = CopyOptions::new();
    copy_options.overwrite = true;
    copy_items(&[assets_src], out_dir, &copy_options)?;

    Ok(())
}
