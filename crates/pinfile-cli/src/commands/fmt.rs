//! `pinfile fmt [FILE]` — canonical rendering of a manifest.

use anyhow::{Context, Result};
use pinfile::Manifest;

use crate::config::resolve_manifest_path;
use crate::output;

/// Print the canonical rendering, or rewrite the file in place with
/// `--write`. The rewrite only touches the file when the content actually
/// changes.
pub fn run(file: Option<&str>, write: bool) -> Result<()> {
    let path = resolve_manifest_path(file);
    let src = std::fs::read_to_string(&path)
        .with_context(|| format!("cannot read manifest '{}'", path.display()))?;
    let manifest = Manifest::parse(&src)
        .with_context(|| format!("cannot parse manifest '{}'", path.display()))?;
    let rendered = manifest.render();

    if write {
        if rendered == src {
            if !output::is_quiet() {
                println!("  '{}' already canonical", path.display());
            }
        } else {
            std::fs::write(&path, &rendered)
                .with_context(|| format!("cannot write manifest '{}'", path.display()))?;
            tracing::info!(path = %path.display(), "rewrote manifest");
            if !output::is_quiet() {
                println!("  rewrote '{}'", path.display());
            }
        }
        return Ok(());
    }

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "manifest": path.display().to_string(),
            "canonical": rendered,
            "changed": rendered != src,
        }));
    } else {
        print!("{rendered}");
    }
    Ok(())
}
