//! Manifest path resolution.

use std::path::PathBuf;

/// Env var naming an explicit manifest path.
pub const MANIFEST_ENV: &str = "PINFILE_MANIFEST";

/// Default manifest filename in the working directory.
pub const DEFAULT_MANIFEST: &str = "requirements.txt";

/// Resolve the manifest path: explicit argument, then `PINFILE_MANIFEST`,
/// then `./requirements.txt`.
pub fn resolve_manifest_path(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }
    if let Ok(env_path) = std::env::var(MANIFEST_ENV) {
        return PathBuf::from(env_path);
    }
    PathBuf::from(DEFAULT_MANIFEST)
}
