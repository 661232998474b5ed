//! `pinfile list [FILE]` — print the pins of a manifest in order.

use anyhow::{Context, Result};
use pinfile::Manifest;

use crate::config::resolve_manifest_path;
use crate::output;

pub fn run(file: Option<&str>) -> Result<()> {
    let path = resolve_manifest_path(file);
    let manifest = Manifest::from_path(&path)
        .with_context(|| format!("cannot load manifest '{}'", path.display()))?;

    if output::is_json() {
        output::print_json(&json_payload(&manifest));
        return Ok(());
    }

    for pin in manifest.pins() {
        println!("{pin}");
    }
    if !output::is_quiet() {
        eprintln!("  {} pins", manifest.len());
    }
    Ok(())
}

pub fn json_payload(manifest: &Manifest) -> serde_json::Value {
    let pins: Vec<serde_json::Value> = manifest
        .pins()
        .map(|pin| serde_json::json!(pin))
        .collect();
    serde_json::json!({
        "manifest": manifest.path().map(|p| p.display().to_string()),
        "total": pins.len(),
        "pins": pins,
    })
}
