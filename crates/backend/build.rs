use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// target/<profile>, where the backend binary is written
fn profile_dir() -> Option<PathBuf> {
    let out_dir = PathBuf::from(env::var("OUT_DIR").ok()?);
    let profile = env::var("PROFILE").ok()?;
    out_dir
        .ancestors()
        .find(|p| p.ends_with(&profile))
        .map(Path::to_path_buf)
}

fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let Some(workspace_root) = manifest_dir.parent().and_then(Path::parent) else {
        return;
    };
    let source = workspace_root.join("config.toml");
    let Some(target) = profile_dir() else {
        println!("cargo:warning=target profile directory not found, config.toml not copied");
        return;
    };

    // The server reads config.toml from the directory of its executable
    if source.exists() {
        if let Err(e) = fs::copy(&source, target.join("config.toml")) {
            println!("cargo:warning=Failed to copy config.toml: {}", e);
        }
    } else {
        println!("cargo:warning=config.toml not found at {:?}, built-in defaults apply", source);
    }
}
