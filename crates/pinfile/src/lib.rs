//! Pinfile — parse, validate, and diff pinned-dependency manifests.
//!
//! A manifest is a flat text file of exact `name==version` pins, with blank
//! lines and `#` comments permitted between them.

pub mod diff;
pub mod lint;
pub mod manifest;
pub mod requirement;
pub mod types;
pub mod version;

pub use diff::{compute_diff, Change, ManifestDiff};
pub use lint::{check_source, Finding, LintCode, Report, Severity};
pub use manifest::{Line, Manifest};
pub use requirement::{canonicalize_name, Requirement};
pub use types::PinError;
pub use version::{LocalSegment, PreRelease, Version};
