//! Generates `$OUT_DIR/app_metadata.rs` with the name, version and owner
//! the data directory is derived from. `TASKDUE_OWNER` (environment or
//! `.env`) overrides `[package.metadata] owner`.

use std::env;
use std::fs;
use std::io;
use std::path::Path;

fn package_owner() -> io::Result<String> {
    let manifest = fs::read_to_string("Cargo.toml")?;
    let manifest: toml::Table = toml::from_str(&manifest).map_err(io::Error::other)?;
    let owner = manifest
        .get("package")
        .and_then(|package| package.get("metadata"))
        .and_then(|metadata| metadata.get("owner"))
        .and_then(|owner| owner.as_str())
        .unwrap_or("taskdue");
    Ok(owner.to_string())
}

fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=TASKDUE_OWNER");

    let owner = match env::var("TASKDUE_OWNER") {
        Ok(owner) => owner,
        Err(_) => package_owner()?,
    };
    let name = env::var("CARGO_PKG_NAME").map_err(io::Error::other)?;
    let version = env::var("CARGO_PKG_VERSION").map_err(io::Error::other)?;
    let out_dir = env::var("OUT_DIR").map_err(io::Error::other)?;

    let constants = [("NAME", name), ("VERSION", version), ("OWNER", owner)]
        .iter()
        .map(|(key, value)| format!("#[allow(unused)]\npub const APP_METADATA_{}: &str = {:?};\n", key, value))
        .collect::<String>();
    fs::write(Path::new(&out_dir).join("app_metadata.rs"), constants)
}
