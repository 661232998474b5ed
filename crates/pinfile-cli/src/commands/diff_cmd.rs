//! `pinfile diff OLD NEW` — compare two manifests.

use std::path::Path;

use anyhow::{Context, Result};
use pinfile::diff::{compute_diff, Change, ManifestDiff};
use pinfile::Manifest;

use crate::output;

pub fn run(old_path: &str, new_path: &str) -> Result<()> {
    let old = load(old_path)?;
    let new = load(new_path)?;
    let diff = compute_diff(&old, &new);

    if output::is_json() {
        output::print_json(&json_payload(&diff, old_path, new_path));
        return Ok(());
    }

    for change in &diff.changes {
        match change {
            Change::Added { pin } => println!("+ {pin}"),
            Change::Removed { pin } => println!("- {pin}"),
            Change::Changed { name, old, new } => println!("~ {name} {old} -> {new}"),
        }
    }
    if !output::is_quiet() {
        if diff.is_empty() {
            println!("  no changes ({} pins unchanged)", diff.unchanged);
        } else {
            println!(
                "  {} changes, {} unchanged",
                diff.changes.len(),
                diff.unchanged
            );
        }
    }
    Ok(())
}

fn load(path: &str) -> Result<Manifest> {
    Manifest::from_path(Path::new(path))
        .with_context(|| format!("cannot load manifest '{path}'"))
}

pub fn json_payload(diff: &ManifestDiff, old_path: &str, new_path: &str) -> serde_json::Value {
    serde_json::json!({
        "old": old_path,
        "new": new_path,
        "unchanged": diff.unchanged,
        "total_changes": diff.changes.len(),
        "changes": &diff.changes,
    })
}
