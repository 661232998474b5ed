//! The manifest file model: an ordered list of blank lines, comments, and
//! pins, preserved exactly as they appeared in the source.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::requirement::{canonicalize_name, Requirement};
use crate::types::PinError;

/// One line of a manifest.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Blank,
    /// Comment text, without the leading `#` or surrounding whitespace.
    Comment(String),
    Pin(Requirement),
}

/// A parsed manifest. Parsing is strict: the first malformed line is an
/// error. Parsing the same input always yields the same ordered pin list.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    lines: Vec<Line>,
    path: Option<PathBuf>,
}

impl Manifest {
    /// Parse manifest text.
    pub fn parse(src: &str) -> Result<Manifest, PinError> {
        let mut lines = Vec::new();
        for (idx, raw) in src.lines().enumerate() {
            lines.push(parse_line(raw, idx + 1)?);
        }
        tracing::debug!(pins = lines.iter().filter(|l| matches!(l, Line::Pin(_))).count(), "parsed manifest");
        Ok(Manifest { lines, path: None })
    }

    /// Read and parse a manifest file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Manifest, PinError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)?;
        let mut manifest = Manifest::parse(&src)?;
        manifest.path = Some(path.to_path_buf());
        Ok(manifest)
    }

    /// The file this manifest was read from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// All lines, in source order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Pins in source order.
    pub fn pins(&self) -> impl Iterator<Item = &Requirement> {
        self.lines.iter().filter_map(|l| match l {
            Line::Pin(r) => Some(r),
            _ => None,
        })
    }

    /// Number of pins.
    pub fn len(&self) -> usize {
        self.pins().count()
    }

    pub fn is_empty(&self) -> bool {
        self.pins().next().is_none()
    }

    /// Look up a pin by name. The lookup is spelling-insensitive: `Flask`,
    /// `flask` and `FLASK` all find the same pin.
    pub fn get(&self, name: &str) -> Option<&Requirement> {
        let canonical = canonicalize_name(name);
        self.pins().find(|r| r.canonical_name == canonical)
    }

    /// Render the manifest in canonical form: comments and blank lines kept
    /// in place, every pin in canonical spelling. Re-parsing the result
    /// yields the same pin list.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            match line {
                Line::Blank => {}
                Line::Comment(text) => {
                    out.push_str("# ");
                    out.push_str(text);
                }
                Line::Pin(req) => out.push_str(&req.to_string()),
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

fn parse_line(raw: &str, lineno: usize) -> Result<Line, PinError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Ok(Line::Blank)
    } else if let Some(comment) = trimmed.strip_prefix('#') {
        Ok(Line::Comment(comment.trim().to_string()))
    } else {
        Ok(Line::Pin(Requirement::parse(raw, lineno)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
# Web framework
Flask==2.3.3
flask-cors==4.0.0

# Scraping
requests==2.31.0
beautifulsoup4==4.12.2
";

    #[test]
    fn test_parse_preserves_order_and_lines() {
        let m = Manifest::parse(SAMPLE).unwrap();
        let names: Vec<&str> = m.pins().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Flask", "flask-cors", "requests", "beautifulsoup4"]
        );
        let lines: Vec<usize> = m.pins().map(|r| r.line).collect();
        assert_eq!(lines, vec![2, 3, 6, 7]);
        assert_eq!(m.len(), 4);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let a = Manifest::parse(SAMPLE).unwrap();
        let b = Manifest::parse(SAMPLE).unwrap();
        assert_eq!(a, b);
        let pins_a: Vec<_> = a.pins().collect();
        let pins_b: Vec<_> = b.pins().collect();
        assert_eq!(pins_a, pins_b);
    }

    #[test]
    fn test_parse_stops_at_first_malformed_line() {
        let src = "flask==2.3.3\nrequests>=2.0\n";
        let err = Manifest::parse(src).unwrap_err();
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_get_is_spelling_insensitive() {
        let m = Manifest::parse(SAMPLE).unwrap();
        assert!(m.get("flask").is_some());
        assert!(m.get("FLASK").is_some());
        assert!(m.get("Flask_CORS").is_some());
        assert!(m.get("django").is_none());
    }

    #[test]
    fn test_render_canonicalizes_pins() {
        let m = Manifest::parse("#  deps\nFlask == v2.3.3  # web\n\n").unwrap();
        assert_eq!(m.render(), "# deps\nFlask==2.3.3\n\n");
    }

    #[test]
    fn test_render_round_trips() {
        let m = Manifest::parse(SAMPLE).unwrap();
        let again = Manifest::parse(&m.render()).unwrap();
        let a: Vec<String> = m.pins().map(|r| r.to_string()).collect();
        let b: Vec<String> = again.pins().map(|r| r.to_string()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("requirements.txt");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(SAMPLE.as_bytes()).unwrap();

        let m = Manifest::from_path(&path).unwrap();
        assert_eq!(m.len(), 4);
        assert_eq!(m.path(), Some(path.as_path()));

        assert!(Manifest::from_path(dir.path().join("missing.txt")).is_err());
    }
}
