//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Once;

use tmx::model::{Template, Tileset};
use tmx::{Result, TmxReader};

static INIT: Once = Once::new();

/// Route library logs to the test harness. Filter with `RUST_LOG`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

pub fn read_data(name: &str) -> String {
    let path = data_dir().join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()))
}

/// Decode a `.tsx` file relative to `dir`.
pub fn load_tileset(dir: &Path, source: &str) -> Result<Tileset> {
    let xml = std::fs::read_to_string(dir.join(source))?;
    TmxReader::new().read_tileset_str(&xml)
}

/// Decode a `.tx` file relative to `dir`; its own tileset reference is
/// resolved against the same directory.
pub fn load_template(dir: &Path, source: &str) -> Result<Template> {
    let xml = std::fs::read_to_string(dir.join(source))?;
    let dir = dir.to_path_buf();
    TmxReader::new()
        .with_tileset_resolver(move |s| load_tileset(&dir, s))
        .read_template_str(&xml)
}

/// Reader resolving tilesets and templates from files under `dir`.
pub fn disk_reader(dir: &Path) -> TmxReader<'static> {
    let tilesets = dir.to_path_buf();
    let templates = dir.to_path_buf();
    TmxReader::new()
        .with_tileset_resolver(move |s| load_tileset(&tilesets, s))
        .with_template_resolver(move |s| load_template(&templates, s))
}
