//! `pinfile check [FILE]` — validate a manifest and report every finding.

use std::path::Path;

use anyhow::{bail, Context, Result};
use pinfile::lint::{self, Report, Severity};

use crate::config::resolve_manifest_path;
use crate::output;

/// Run the check command. Errors (and, with `--strict`, warnings) make the
/// command fail so CI can gate on the exit code.
pub fn run(file: Option<&str>, strict: bool) -> Result<()> {
    let path = resolve_manifest_path(file);
    let src = std::fs::read_to_string(&path)
        .with_context(|| format!("cannot read manifest '{}'", path.display()))?;

    let report = lint::check_source(&src);
    tracing::debug!(
        pins = report.pins_total,
        errors = report.errors(),
        warnings = report.warnings(),
        "checked manifest"
    );

    if output::is_json() {
        output::print_json(&json_payload(&report, &path, strict));
    } else {
        for finding in &report.findings {
            let level = match finding.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            println!("  line {}: {level}: {}", finding.line, finding.message);
        }
        if !output::is_quiet() {
            println!(
                "  {} pins checked: {} errors, {} warnings",
                report.pins_total,
                report.errors(),
                report.warnings()
            );
        }
    }

    if !report.is_valid() {
        bail!("manifest '{}' has {} error(s)", path.display(), report.errors());
    }
    if strict && report.warnings() > 0 {
        bail!(
            "manifest '{}' has {} warning(s) (strict mode)",
            path.display(),
            report.warnings()
        );
    }
    Ok(())
}

/// The machine-readable check result.
pub fn json_payload(report: &Report, path: &Path, strict: bool) -> serde_json::Value {
    let passed = report.is_valid() && !(strict && report.warnings() > 0);
    serde_json::json!({
        "manifest": path.display().to_string(),
        "valid": report.is_valid(),
        "passed": passed,
        "pins_total": report.pins_total,
        "errors": report.errors(),
        "warnings": report.warnings(),
        "findings": &report.findings,
    })
}
