//! Compare two manifests by canonical package name.

use serde::Serialize;

use crate::manifest::Manifest;
use crate::requirement::Requirement;
use crate::version::Version;

/// One change between two manifests.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    Added { pin: Requirement },
    Removed { pin: Requirement },
    Changed {
        name: String,
        old: Version,
        new: Version,
    },
}

/// The full diff: removals and version changes in old-manifest order,
/// then additions in new-manifest order.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestDiff {
    pub changes: Vec<Change>,
    pub unchanged: usize,
}

impl ManifestDiff {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Compute the diff between two manifests. Version comparison is semantic,
/// so a respelled-but-equal pin (`1.0` vs `1.0.0`) counts as unchanged.
pub fn compute_diff(old: &Manifest, new: &Manifest) -> ManifestDiff {
    let mut changes = Vec::new();
    let mut unchanged = 0;

    for pin in old.pins() {
        match new.get(&pin.canonical_name) {
            None => changes.push(Change::Removed { pin: pin.clone() }),
            Some(counterpart) if counterpart.version != pin.version => {
                changes.push(Change::Changed {
                    name: counterpart.name.clone(),
                    old: pin.version.clone(),
                    new: counterpart.version.clone(),
                });
            }
            Some(_) => unchanged += 1,
        }
    }

    for pin in new.pins() {
        if old.get(&pin.canonical_name).is_none() {
            changes.push(Change::Added { pin: pin.clone() });
        }
    }

    ManifestDiff { changes, unchanged }
}
