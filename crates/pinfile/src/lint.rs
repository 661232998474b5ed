//! Whole-file manifest validation.
//!
//! Unlike [`Manifest::parse`], the checker walks every line and collects
//! findings instead of stopping at the first malformed one, so a single run
//! reports everything wrong with a file.

use serde::Serialize;

use crate::manifest::Manifest;
use crate::requirement::{canonicalize_name, Requirement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LintCode {
    /// Line is not a valid `name==version` pin.
    Malformed,
    /// Same package pinned more than once.
    DuplicatePackage,
    /// Version parses but is not in canonical spelling.
    NonCanonicalVersion,
    /// Name is valid but not in canonical spelling.
    NonCanonicalName,
    /// Pins are not sorted by canonical name.
    UnsortedPins,
}

/// One finding, anchored to a source line.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub line: usize,
    pub severity: Severity,
    pub code: LintCode,
    pub message: String,
}

/// The result of checking a manifest source.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub findings: Vec<Finding>,
    pub pins_total: usize,
}

impl Report {
    /// A manifest is valid iff no finding is an error.
    pub fn is_valid(&self) -> bool {
        !self
            .findings
            .iter()
            .any(|f| f.severity == Severity::Error)
    }

    pub fn errors(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count()
    }

    pub fn warnings(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count()
    }
}

/// Check manifest text, collecting all findings in line order.
pub fn check_source(src: &str) -> Report {
    let mut findings = Vec::new();
    let mut pins: Vec<(Requirement, String)> = Vec::new();

    for (idx, raw) in src.lines().enumerate() {
        let lineno = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match Requirement::parse(raw, lineno) {
            Ok(req) => pins.push((req, raw.to_string())),
            Err(e) => findings.push(Finding {
                line: lineno,
                severity: Severity::Error,
                code: LintCode::Malformed,
                message: strip_line_prefix(&e.to_string()),
            }),
        }
    }

    // Duplicates: later occurrence flagged, pointing at the earlier line.
    for (i, (req, _)) in pins.iter().enumerate() {
        if let Some((first, _)) = pins[..i]
            .iter()
            .find(|(r, _)| r.canonical_name == req.canonical_name)
        {
            findings.push(Finding {
                line: req.line,
                severity: Severity::Error,
                code: LintCode::DuplicatePackage,
                message: format!(
                    "'{}' is already pinned on line {} (as '{}')",
                    req.name, first.line, first.name
                ),
            });
        }
    }

    for (req, raw) in &pins {
        let version_spelling = req.version.to_string();
        if !raw_version_is_canonical(raw, &version_spelling) {
            findings.push(Finding {
                line: req.line,
                severity: Severity::Warning,
                code: LintCode::NonCanonicalVersion,
                message: format!("version spelled non-canonically; canonical is '{version_spelling}'"),
            });
        }
        if req.name != canonicalize_name(&req.name) {
            findings.push(Finding {
                line: req.line,
                severity: Severity::Warning,
                code: LintCode::NonCanonicalName,
                message: format!(
                    "name '{}' is not in canonical form '{}'",
                    req.name, req.canonical_name
                ),
            });
        }
    }

    // Sort order: flag the first pin that breaks canonical-name order.
    for pair in pins.windows(2) {
        let (prev, _) = &pair[0];
        let (next, _) = &pair[1];
        if next.canonical_name < prev.canonical_name {
            findings.push(Finding {
                line: next.line,
                severity: Severity::Warning,
                code: LintCode::UnsortedPins,
                message: format!(
                    "'{}' sorts before '{}'; pins are not in canonical order",
                    next.name, prev.name
                ),
            });
            break;
        }
    }

    findings.sort_by_key(|f| f.line);
    Report {
        findings,
        pins_total: pins.len(),
    }
}

/// Check a parsed manifest (no malformed lines by construction).
pub fn check_manifest(manifest: &Manifest) -> Report {
    check_source(&manifest.render())
}

/// Whether the version substring of a raw pin line matches its canonical
/// spelling exactly.
fn raw_version_is_canonical(raw: &str, canonical: &str) -> bool {
    let text = match raw.find('#') {
        Some(idx) => &raw[..idx],
        None => raw,
    };
    match text.find("==") {
        Some(idx) => text[idx + 2..].trim() == canonical,
        None => false,
    }
}

/// `PinError::Line` prefixes messages with "line N: "; the finding already
/// carries the line number, so drop the prefix for display.
fn strip_line_prefix(message: &str) -> String {
    match message.split_once(": ") {
        Some((prefix, rest)) if prefix.starts_with("line ") => rest.to_string(),
        _ => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_manifest_has_no_findings() {
        let report = check_source("# deps\nflask==2.3.3\ngunicorn==21.2.0\n");
        assert!(report.is_valid());
        assert!(report.findings.is_empty());
        assert_eq!(report.pins_total, 2);
    }

    #[test]
    fn test_malformed_lines_are_errors() {
        let report = check_source("flask==2.3.3\nrequests>=2.0\ngunicorn\n");
        assert!(!report.is_valid());
        assert_eq!(report.errors(), 2);
        assert_eq!(report.pins_total, 1);
        assert_eq!(report.findings[0].line, 2);
        assert_eq!(report.findings[0].code, LintCode::Malformed);
        assert!(!report.findings[0].message.starts_with("line "));
        assert_eq!(report.findings[1].line, 3);
    }

    #[test]
    fn test_duplicate_across_spellings() {
        let report = check_source("Flask==2.3.3\nflask==2.3.4\n");
        assert!(!report.is_valid());
        let dup = report
            .findings
            .iter()
            .find(|f| f.code == LintCode::DuplicatePackage)
            .unwrap();
        assert_eq!(dup.line, 2);
        assert!(dup.message.contains("line 1"));
    }

    #[test]
    fn test_non_canonical_version_is_warning() {
        let report = check_source("flask==v2.3.3\n");
        assert!(report.is_valid());
        assert_eq!(report.warnings(), 1);
        assert_eq!(report.findings[0].code, LintCode::NonCanonicalVersion);
        assert!(report.findings[0].message.contains("2.3.3"));
    }

    #[test]
    fn test_non_canonical_name_is_warning() {
        let report = check_source("python_dotenv==1.0.0\n");
        assert_eq!(report.warnings(), 1);
        assert_eq!(report.findings[0].code, LintCode::NonCanonicalName);
        assert!(report.findings[0].message.contains("python-dotenv"));
    }

    #[test]
    fn test_unsorted_pins_flagged_once() {
        let report = check_source("redis==5.0.1\nflask==2.3.3\ngunicorn==21.2.0\n");
        let unsorted: Vec<_> = report
            .findings
            .iter()
            .filter(|f| f.code == LintCode::UnsortedPins)
            .collect();
        assert_eq!(unsorted.len(), 1);
        assert_eq!(unsorted[0].line, 2);
        assert!(report.is_valid());
    }

    #[test]
    fn test_findings_sorted_by_line() {
        let report = check_source("zzz==1.0\nbad line here\nZZZ==2.0\n");
        let lines: Vec<usize> = report.findings.iter().map(|f| f.line).collect();
        let mut sorted = lines.clone();
        sorted.sort_unstable();
        assert_eq!(lines, sorted);
    }

    #[test]
    fn test_check_manifest_matches_source() {
        let m = Manifest::parse("flask==2.3.3\n").unwrap();
        let report = check_manifest(&m);
        assert!(report.is_valid());
        assert_eq!(report.pins_total, 1);
    }

    #[test]
    fn test_canonical_name_sorted_uppercase_input() {
        // Canonical order compares normalized names, so "Flask" then
        // "gunicorn" is sorted.
        let report = check_source("Flask==2.3.3\ngunicorn==21.2.0\n");
        assert!(report
            .findings
            .iter()
            .all(|f| f.code != LintCode::UnsortedPins));
    }
}
