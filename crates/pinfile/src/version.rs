//! PEP 440-style version identifiers.
//!
//! Grammar (after lowercasing and trimming):
//! ```text
//! version := ['v'] [epoch '!'] release [pre] [post] [dev] ['+' local]
//! release := N ('.' N)*
//! pre     := sep? ('a'|'b'|'rc'|'alpha'|'beta'|'c'|'pre'|'preview') sep? N?
//! post    := sep? ('post'|'rev'|'r') sep? N?  |  '-' N
//! dev     := sep? 'dev' sep? N?
//! local   := segment (sep segment)*
//! sep     := '-' | '_' | '.'
//! ```
//!
//! Alternate spellings normalize to a single canonical form: `alpha` → `a`,
//! `c`/`pre`/`preview` → `rc`, `rev`/`r` → `post`, missing numbers → 0, local
//! separators → `.`. `Display` always emits the canonical spelling.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::PinError;

/// Pre-release phase, ordered alpha < beta < rc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreRelease {
    Alpha,
    Beta,
    Rc,
}

impl PreRelease {
    fn tag(self) -> &'static str {
        match self {
            PreRelease::Alpha => "a",
            PreRelease::Beta => "b",
            PreRelease::Rc => "rc",
        }
    }
}

/// One segment of a local version label. Numeric segments always order
/// above alphanumeric ones, which the derived Ord gives us for free.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum LocalSegment {
    Alpha(String),
    Num(u64),
}

impl fmt::Display for LocalSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalSegment::Alpha(s) => write!(f, "{s}"),
            LocalSegment::Num(n) => write!(f, "{n}"),
        }
    }
}

/// A parsed version identifier.
///
/// Equality and ordering follow the version's meaning, not its spelling:
/// `1.0` equals `1.0.0`, and `1.0-alpha1` equals `1.0a1`.
#[derive(Debug, Clone)]
pub struct Version {
    pub epoch: u32,
    pub release: Vec<u32>,
    pub pre: Option<(PreRelease, u32)>,
    pub post: Option<u32>,
    pub dev: Option<u32>,
    pub local: Vec<LocalSegment>,
}

impl Version {
    /// Parse a version identifier, accepting any normalization-equivalent
    /// spelling.
    pub fn parse(input: &str) -> Result<Version, PinError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PinError::Version("empty version string".to_string()));
        }
        let lowered = trimmed.to_lowercase();
        let mut s = Scanner::new(&lowered);

        // Optional 'v' prefix
        if s.peek() == Some('v') {
            s.advance();
        }

        // Optional epoch: digits followed by '!'
        let mut epoch = 0;
        let mark = s.pos();
        if let Some(digits) = s.eat_digits() {
            if s.peek() == Some('!') {
                s.advance();
                epoch = parse_num(&digits)?;
            } else {
                s.reset(mark);
            }
        }

        // Release: N ('.' N)*
        let mut release = Vec::new();
        let first = s
            .eat_digits()
            .ok_or_else(|| PinError::Version(format!("no release segment in '{trimmed}'")))?;
        release.push(parse_num(&first)?);
        loop {
            let mark = s.pos();
            if s.peek() != Some('.') {
                break;
            }
            s.advance();
            match s.eat_digits() {
                Some(d) => release.push(parse_num(&d)?),
                None => {
                    // Not a release segment; '.' may start ".post1" etc.
                    s.reset(mark);
                    break;
                }
            }
        }

        let pre = parse_pre(&mut s)?;
        let post = parse_post(&mut s)?;
        let dev = parse_dev(&mut s)?;

        // Optional local label
        let mut local = Vec::new();
        if s.peek() == Some('+') {
            s.advance();
            loop {
                let seg = s.eat_alnum();
                if seg.is_empty() {
                    return Err(PinError::Version(format!(
                        "empty local segment in '{trimmed}'"
                    )));
                }
                local.push(classify_local(&seg));
                if matches!(s.peek(), Some('-' | '_' | '.')) {
                    s.advance();
                } else {
                    break;
                }
            }
        }

        if let Some(c) = s.peek() {
            return Err(PinError::Version(format!(
                "unexpected character '{c}' in '{trimmed}'"
            )));
        }

        Ok(Version {
            epoch,
            release,
            pre,
            post,
            dev,
            local,
        })
    }

    /// True if `input` is already spelled in canonical form.
    pub fn is_canonical_spelling(input: &str) -> bool {
        match Version::parse(input) {
            Ok(v) => v.to_string() == input,
            Err(_) => false,
        }
    }

    /// Comparison key for the pre/post/dev phase. Orders
    /// dev-only < pre-release < final-or-post.
    fn phase_key(&self) -> (u8, u8, u32) {
        match (&self.pre, self.post, self.dev) {
            (None, None, Some(_)) => (0, 0, 0),
            (Some((kind, n)), _, _) => (1, *kind as u8, *n),
            (None, _, _) => (2, 0, 0),
        }
    }
}

impl FromStr for Version {
    type Err = PinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }
        let release: Vec<String> = self.release.iter().map(|n| n.to_string()).collect();
        write!(f, "{}", release.join("."))?;
        if let Some((kind, n)) = &self.pre {
            write!(f, "{}{n}", kind.tag())?;
        }
        if let Some(n) = self.post {
            write!(f, ".post{n}")?;
        }
        if let Some(n) = self.dev {
            write!(f, ".dev{n}")?;
        }
        if !self.local.is_empty() {
            let local: Vec<String> = self.local.iter().map(|s| s.to_string()).collect();
            write!(f, "+{}", local.join("."))?;
        }
        Ok(())
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| cmp_release(&self.release, &other.release))
            .then_with(|| self.phase_key().cmp(&other.phase_key()))
            .then_with(|| self.post.cmp(&other.post))
            .then_with(|| dev_key(self.dev).cmp(&dev_key(other.dev)))
            .then_with(|| self.local.cmp(&other.local))
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Version::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Compare release tuples with implicit zero-padding, so 1.0 == 1.0.0.
fn cmp_release(a: &[u32], b: &[u32]) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    Ordering::Equal
}

/// A missing dev number sorts after any present one.
fn dev_key(dev: Option<u32>) -> (u8, u32) {
    match dev {
        Some(n) => (0, n),
        None => (1, 0),
    }
}

fn parse_num(digits: &str) -> Result<u32, PinError> {
    digits
        .parse()
        .map_err(|_| PinError::Version(format!("numeric component too large: '{digits}'")))
}

fn classify_local(seg: &str) -> LocalSegment {
    if seg.chars().all(|c| c.is_ascii_digit()) {
        match seg.parse() {
            Ok(n) => LocalSegment::Num(n),
            Err(_) => LocalSegment::Alpha(seg.to_string()),
        }
    } else {
        LocalSegment::Alpha(seg.to_string())
    }
}

fn parse_pre(s: &mut Scanner) -> Result<Option<(PreRelease, u32)>, PinError> {
    let mark = s.pos();
    s.eat_sep();
    let word = s.eat_letters();
    let kind = match word.as_str() {
        "a" | "alpha" => PreRelease::Alpha,
        "b" | "beta" => PreRelease::Beta,
        "rc" | "c" | "pre" | "preview" => PreRelease::Rc,
        _ => {
            s.reset(mark);
            return Ok(None);
        }
    };
    s.eat_sep();
    let n = match s.eat_digits() {
        Some(d) => parse_num(&d)?,
        None => 0,
    };
    Ok(Some((kind, n)))
}

fn parse_post(s: &mut Scanner) -> Result<Option<u32>, PinError> {
    let mark = s.pos();

    // Implicit post: '-' directly followed by digits
    if s.peek() == Some('-') {
        s.advance();
        if let Some(d) = s.eat_digits() {
            return Ok(Some(parse_num(&d)?));
        }
        s.reset(mark);
    }

    s.eat_sep();
    let word = s.eat_letters();
    match word.as_str() {
        "post" | "rev" | "r" => {}
        _ => {
            s.reset(mark);
            return Ok(None);
        }
    }
    s.eat_sep();
    let n = match s.eat_digits() {
        Some(d) => parse_num(&d)?,
        None => 0,
    };
    Ok(Some(n))
}

fn parse_dev(s: &mut Scanner) -> Result<Option<u32>, PinError> {
    let mark = s.pos();
    s.eat_sep();
    let word = s.eat_letters();
    if word != "dev" {
        s.reset(mark);
        return Ok(None);
    }
    s.eat_sep();
    let n = match s.eat_digits() {
        Some(d) => parse_num(&d)?,
        None => 0,
    };
    Ok(Some(n))
}

// ── Scanner ──

struct Scanner {
    chars: Vec<char>,
    i: usize,
}

impl Scanner {
    fn new(input: &str) -> Scanner {
        Scanner {
            chars: input.chars().collect(),
            i: 0,
        }
    }

    fn pos(&self) -> usize {
        self.i
    }

    fn reset(&mut self, pos: usize) {
        self.i = pos;
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.i).copied()
    }

    fn advance(&mut self) {
        self.i += 1;
    }

    /// Consume one separator character, if present.
    fn eat_sep(&mut self) -> bool {
        if matches!(self.peek(), Some('-' | '_' | '.')) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_digits(&mut self) -> Option<String> {
        let start = self.i;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        if self.i == start {
            None
        } else {
            Some(self.chars[start..self.i].iter().collect())
        }
    }

    fn eat_letters(&mut self) -> String {
        let start = self.i;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphabetic()) {
            self.advance();
        }
        self.chars[start..self.i].iter().collect()
    }

    fn eat_alnum(&mut self) -> String {
        let start = self.i;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric()) {
            self.advance();
        }
        self.chars[start..self.i].iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_parse_plain_release() {
        let ver = v("2.3.3");
        assert_eq!(ver.epoch, 0);
        assert_eq!(ver.release, vec![2, 3, 3]);
        assert!(ver.pre.is_none());
        assert_eq!(ver.to_string(), "2.3.3");
    }

    #[test]
    fn test_parse_epoch() {
        let ver = v("1!2.0");
        assert_eq!(ver.epoch, 1);
        assert_eq!(ver.release, vec![2, 0]);
        assert_eq!(ver.to_string(), "1!2.0");
    }

    #[test]
    fn test_parse_pre_release_spellings() {
        assert_eq!(v("1.0a1"), v("1.0-alpha1"));
        assert_eq!(v("1.0a1"), v("1.0.a.1"));
        assert_eq!(v("1.0b2"), v("1.0-beta_2"));
        assert_eq!(v("1.0rc1"), v("1.0c1"));
        assert_eq!(v("1.0rc1"), v("1.0-preview-1"));
        assert_eq!(v("1.0a1").to_string(), "1.0a1");
        assert_eq!(v("1.0-preview-1").to_string(), "1.0rc1");
    }

    #[test]
    fn test_parse_post_and_dev() {
        assert_eq!(v("1.0.post1"), v("1.0-rev1"));
        assert_eq!(v("1.0.post1"), v("1.0-1"));
        assert_eq!(v("1.0.post"), v("1.0.post0"));
        assert_eq!(v("1.0.dev3").dev, Some(3));
        assert_eq!(v("1.0.post1.dev2").to_string(), "1.0.post1.dev2");
    }

    #[test]
    fn test_parse_local() {
        let ver = v("1.0+ubuntu-1");
        assert_eq!(
            ver.local,
            vec![
                LocalSegment::Alpha("ubuntu".to_string()),
                LocalSegment::Num(1)
            ]
        );
        assert_eq!(ver.to_string(), "1.0+ubuntu.1");
    }

    #[test]
    fn test_parse_v_prefix_and_case() {
        assert_eq!(v("v1.2.0"), v("1.2.0"));
        assert_eq!(v("1.0RC1"), v("1.0rc1"));
        assert_eq!(v("  1.0  "), v("1.0"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "v", "abc", "1.0.0.", "..", "1.0+", "1.0+foo..bar", "1.0 final", "1.0!2"] {
            assert!(Version::parse(bad).is_err(), "should reject: {bad:?}");
        }
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert!(Version::parse("99999999999999999999").is_err());
    }

    #[test]
    fn test_equality_ignores_spelling() {
        assert_eq!(v("1.0"), v("1.0.0"));
        assert_eq!(v("1.01"), v("1.1"));
        assert_eq!(v("1.0a1"), v("1.0.alpha.1"));
        assert_ne!(v("1.0"), v("1.0.1"));
    }

    #[test]
    fn test_ordering_chain() {
        // The canonical PEP 440 ordering example, ascending.
        let chain = [
            "1.0.dev1", "1.0a1", "1.0a2.dev1", "1.0a2", "1.0b1", "1.0rc1", "1.0",
            "1.0+local", "1.0.post1.dev1", "1.0.post1", "1.1.dev1", "1.1",
        ];
        for pair in chain.windows(2) {
            assert!(
                v(pair[0]) < v(pair[1]),
                "expected {} < {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_ordering_epoch_dominates() {
        assert!(v("1!1.0") > v("999.0"));
    }

    #[test]
    fn test_ordering_local_segments() {
        // Numeric local segments order above alphanumeric ones.
        assert!(v("1.0+abc") < v("1.0+2"));
        assert!(v("1.0+1.1") > v("1.0+1"));
        assert!(v("1.0+ubuntu.1") < v("1.0+ubuntu.2"));
    }

    #[test]
    fn test_is_canonical_spelling() {
        assert!(Version::is_canonical_spelling("1.0.0"));
        assert!(Version::is_canonical_spelling("1.0a1"));
        assert!(Version::is_canonical_spelling("2!1.0.post1"));
        assert!(!Version::is_canonical_spelling("v1.0"));
        assert!(!Version::is_canonical_spelling("1.0-alpha1"));
        assert!(!Version::is_canonical_spelling("1.0+Ubuntu-1"));
        assert!(!Version::is_canonical_spelling("not-a-version"));
    }

    #[test]
    fn test_serde_round_trip() {
        let ver = v("1!2.0rc1+build.5");
        let json = serde_json::to_string(&ver).unwrap();
        assert_eq!(json, "\"1!2.0rc1+build.5\"");
        let back: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ver);
    }
}
