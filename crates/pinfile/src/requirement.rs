//! A single pinned requirement: `name[extras]==version`.

use std::fmt;

use serde::Serialize;

use crate::types::PinError;
use crate::version::Version;

/// One exactly-pinned requirement from a manifest line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Requirement {
    /// Package name as written in the manifest.
    pub name: String,
    /// Canonical (normalized) package name, used for lookups and equality
    /// across spellings.
    pub canonical_name: String,
    /// Requested extras, as written.
    pub extras: Vec<String>,
    /// The pinned version.
    pub version: Version,
    /// 1-based source line this pin came from. 0 for synthetic pins.
    #[serde(skip_serializing_if = "is_zero")]
    pub line: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl Requirement {
    /// Parse one requirement from a manifest line. `lineno` is recorded on
    /// the pin and attached to any error.
    ///
    /// A trailing `# comment` is permitted and ignored. Anything that is not
    /// an exact `==` pin is rejected: range specifiers, environment markers,
    /// editable installs, includes, and URLs each get their own error.
    pub fn parse(line: &str, lineno: usize) -> Result<Requirement, PinError> {
        Self::parse_inner(line).map_err(|e| e.at_line(lineno)).map(|mut r| {
            r.line = lineno;
            r
        })
    }

    fn parse_inner(line: &str) -> Result<Requirement, PinError> {
        let text = strip_trailing_comment(line).trim();

        if let Some(flag) = text.strip_prefix('-') {
            let flag: String = flag.chars().take_while(|c| !c.is_whitespace()).collect();
            return Err(PinError::Syntax(format!(
                "option lines ('-{flag}') are not supported"
            )));
        }
        if text.contains("://") {
            return Err(PinError::Syntax(
                "URL requirements are not supported".to_string(),
            ));
        }
        if let Some(semi) = text.find(';') {
            return Err(PinError::Marker(text[semi + 1..].trim().to_string()));
        }

        // Name: leading run up to '[', an operator character, or whitespace.
        let name_end = text
            .find(|c: char| c == '[' || c == '=' || c == '<' || c == '>' || c == '~' || c == '!' || c.is_whitespace())
            .unwrap_or(text.len());
        let name = &text[..name_end];
        validate_name(name)?;
        let mut rest = text[name_end..].trim_start();

        // Optional extras
        let mut extras = Vec::new();
        if let Some(inner) = rest.strip_prefix('[') {
            let close = inner
                .find(']')
                .ok_or_else(|| PinError::Syntax(format!("unclosed extras in '{text}'")))?;
            for extra in inner[..close].split(',') {
                let extra = extra.trim();
                validate_name(extra)
                    .map_err(|_| PinError::Syntax(format!("invalid extra name '{extra}'")))?;
                extras.push(extra.to_string());
            }
            rest = inner[close + 1..].trim_start();
        }

        // Specifier: exactly '=='.
        let op: String = rest
            .chars()
            .take_while(|c| matches!(c, '=' | '<' | '>' | '~' | '!'))
            .collect();
        match op.as_str() {
            "==" => {}
            "" => {
                return Err(PinError::Syntax(format!(
                    "'{name}' has no version pin; every entry must be 'name==version'"
                )))
            }
            other => {
                return Err(PinError::Specifier {
                    op: other.to_string(),
                })
            }
        }
        let version_str = rest[op.len()..].trim();
        if version_str.contains(char::is_whitespace) {
            return Err(PinError::Syntax(format!(
                "unexpected trailing text after version in '{text}'"
            )));
        }
        let version = Version::parse(version_str)?;

        Ok(Requirement {
            name: name.to_string(),
            canonical_name: canonicalize_name(name),
            extras,
            version,
            line: 0,
        })
    }

    /// True if both name and version are already in canonical spelling.
    pub fn is_canonical_spelling(&self, source: &str) -> bool {
        let text = strip_trailing_comment(source).trim();
        text == self.to_string()
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.extras.is_empty() {
            write!(f, "[{}]", self.extras.join(","))?;
        }
        write!(f, "=={}", self.version)
    }
}

/// Normalize a package name per the usual registry rules: lowercase, with
/// any run of `-`, `_`, `.` collapsed to a single `-`.
pub fn canonicalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_sep = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            in_sep = true;
        } else {
            if in_sep && !out.is_empty() {
                out.push('-');
            }
            in_sep = false;
            out.push(c.to_ascii_lowercase());
        }
    }
    out
}

fn validate_name(name: &str) -> Result<(), PinError> {
    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && name.starts_with(|c: char| c.is_ascii_alphanumeric())
        && name.ends_with(|c: char| c.is_ascii_alphanumeric());
    if valid {
        Ok(())
    } else {
        Err(PinError::Name(format!("'{name}'")))
    }
}

/// Strip a ` # comment` suffix. A `#` that starts the line is the caller's
/// problem (that is a comment line, not a requirement).
fn strip_trailing_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}
