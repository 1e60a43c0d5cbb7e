use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets");
    for entry in glob::glob("assets/**/*")? {
        println!("cargo:rerun-if-changed={}", entry?.display());
    }

    let out_dir = env::var("OUT_DIR")?;
    let mut copy_options = CopyOptions::new();
    copy_options.overwrite = true;
    copy_items(&["assets/"], out_dir, &copy_options)?;

    Ok(())
}
