//! JSON field paths
//!
//! Paths address a field inside a response body using dot segments
//! (`_links.apps.href`), bracket-quoted keys (`['api.revision']`), array
//! indices (`items[0]`) and array wildcards (`items[].name`). Keys may contain
//! any character other than `.` and `[`, so relation names such as
//! `streams/deployments/{name}` are addressed directly. Inside a quoted key a
//! backslash escapes the next character.

use crate::core::error::PathError;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// One step of a [`JsonPath`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object member
    Key(String),
    /// Array element at a fixed position
    Index(usize),
    /// Every element of an array
    Wildcard,
}

/// A parsed field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    raw: String,
    segments: Vec<Segment>,
}

impl JsonPath {
    /// Parse a path
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        Ok(Self {
            raw: raw.to_string(),
            segments: parse_segments(raw)?,
        })
    }

    /// Build a path from plain object keys, without parsing them
    ///
    /// Keys are taken verbatim, so they may contain `.` or `[`.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_segments(keys.into_iter().map(|k| Segment::Key(k.into())).collect())
    }

    /// Build a path from segments, rendering it in canonical form
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self {
            raw: render(&segments),
            segments,
        }
    }

    /// Canonical spelling of this path
    ///
    /// Two paths that designate the same field have the same canonical form:
    /// `_links['apps'].href` and `_links.apps.href` both render as the latter.
    pub fn canonical(&self) -> String {
        render(&self.segments)
    }

    /// Whether this path designates `concrete` or one of its ancestors
    ///
    /// `concrete` is a path through an actual document, so it holds keys and
    /// indices only; a wildcard here matches any index.
    pub fn covers(&self, concrete: &[Segment]) -> bool {
        self.segments.len() <= concrete.len() && self.matches_prefix(concrete)
    }

    /// Whether `concrete` is a strict ancestor of the field this path designates
    pub fn passes_through(&self, concrete: &[Segment]) -> bool {
        concrete.len() < self.segments.len() && self.matches_prefix(concrete)
    }

    fn matches_prefix(&self, concrete: &[Segment]) -> bool {
        self.segments
            .iter()
            .zip(concrete)
            .all(|(pattern, step)| match (pattern, step) {
                (Segment::Wildcard, Segment::Index(_)) => true,
                (pattern, step) => pattern == step,
            })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Resolve the path against a document
    ///
    /// Returns every value the path designates, or `None` when any step
    /// cannot be followed. A wildcard over an empty array yields no values,
    /// which callers treat as absent.
    pub fn resolve<'a>(&self, root: &'a Value) -> Option<Vec<&'a Value>> {
        let mut current = vec![root];

        for segment in &self.segments {
            let mut next = Vec::with_capacity(current.len());
            for value in current {
                match (segment, value) {
                    (Segment::Key(key), Value::Object(map)) => next.push(map.get(key)?),
                    (Segment::Index(i), Value::Array(items)) => next.push(items.get(*i)?),
                    (Segment::Wildcard, Value::Array(items)) => next.extend(items.iter()),
                    _ => return None,
                }
            }
            current = next;
        }

        Some(current)
    }
}

impl FromStr for JsonPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn render(segments: &[Segment]) -> String {
    let mut raw = String::new();
    for segment in segments {
        match segment {
            Segment::Key(key) if key.is_empty() || key.contains(['.', '[', ']', '\'', '"']) => {
                raw.push_str("[\"");
                for c in key.chars() {
                    if c == '"' || c == '\\' {
                        raw.push('\\');
                    }
                    raw.push(c);
                }
                raw.push_str("\"]");
            }
            Segment::Key(key) => {
                if !raw.is_empty() {
                    raw.push('.');
                }
                raw.push_str(key);
            }
            Segment::Index(index) => raw.push_str(&format!("[{}]", index)),
            Segment::Wildcard => raw.push_str("[]"),
        }
    }
    raw
}

/// Every leaf of a document, as a path of keys and indices
///
/// Scalars, `null`, empty objects and empty arrays are leaves. The root
/// itself is never reported.
pub fn leaf_paths(document: &Value) -> Vec<Vec<Segment>> {
    fn walk(value: &Value, prefix: &mut Vec<Segment>, out: &mut Vec<Vec<Segment>>) {
        match value {
            Value::Object(map) if !map.is_empty() => {
                for (key, child) in map {
                    prefix.push(Segment::Key(key.clone()));
                    walk(child, prefix, out);
                    prefix.pop();
                }
            }
            Value::Array(items) if !items.is_empty() => {
                for (index, child) in items.iter().enumerate() {
                    prefix.push(Segment::Index(index));
                    walk(child, prefix, out);
                    prefix.pop();
                }
            }
            _ if !prefix.is_empty() => out.push(prefix.clone()),
            _ => {}
        }
    }

    let mut out = Vec::new();
    walk(document, &mut Vec::new(), &mut out);
    out
}

fn parse_segments(raw: &str) -> Result<Vec<Segment>, PathError> {
    if raw.is_empty() {
        return Err(PathError::Empty);
    }

    let chars: Vec<char> = raw.chars().collect();
    let mut segments = Vec::new();
    let mut key = String::new();
    // A closed bracket may be followed directly by '.' or '['
    let mut after_bracket = false;
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '.' => {
                if key.is_empty() {
                    if !after_bracket {
                        return Err(PathError::EmptySegment { position: i });
                    }
                } else {
                    segments.push(Segment::Key(std::mem::take(&mut key)));
                }
                if i + 1 == chars.len() {
                    return Err(PathError::EmptySegment { position: i + 1 });
                }
                after_bracket = false;
                i += 1;
            }
            '[' => {
                if key.is_empty() && i > 0 && chars[i - 1] == '.' {
                    return Err(PathError::EmptySegment { position: i });
                }
                if !key.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut key)));
                }
                let (segment, next) = parse_bracket(&chars, i)?;
                segments.push(segment);
                after_bracket = true;
                i = next;
            }
            c => {
                if after_bracket {
                    return Err(PathError::UnexpectedCharacter {
                        position: i,
                        found: c,
                    });
                }
                key.push(c);
                i += 1;
            }
        }
    }

    if !key.is_empty() {
        segments.push(Segment::Key(key));
    }

    Ok(segments)
}

/// Parse a bracket expression starting at `start` (which holds `[`)
///
/// Returns the segment and the position just past the closing `]`.
fn parse_bracket(chars: &[char], start: usize) -> Result<(Segment, usize), PathError> {
    let unterminated = PathError::UnterminatedBracket { position: start };
    let mut i = start + 1;

    match chars.get(i) {
        Some(']') => Ok((Segment::Wildcard, i + 1)),
        Some(&quote) if quote == '\'' || quote == '"' => {
            i += 1;
            let mut name = String::new();
            loop {
                match chars.get(i) {
                    Some(&c) if c == quote => break,
                    Some('\\') => {
                        i += 1;
                        match chars.get(i) {
                            Some(&c) => name.push(c),
                            None => return Err(unterminated),
                        }
                    }
                    Some(&c) => name.push(c),
                    None => return Err(unterminated),
                }
                i += 1;
            }
            i += 1;
            if chars.get(i) != Some(&']') {
                return Err(unterminated);
            }
            if name.is_empty() {
                return Err(PathError::EmptySegment { position: start + 1 });
            }
            Ok((Segment::Key(name), i + 1))
        }
        Some(_) => {
            let mut digits = String::new();
            loop {
                match chars.get(i) {
                    Some(']') => break,
                    Some(&c) => digits.push(c),
                    None => return Err(unterminated),
                }
                i += 1;
            }
            let index = digits
                .parse::<usize>()
                .map_err(|_| PathError::InvalidIndex { index: digits })?;
            Ok((Segment::Index(index), i + 1))
        }
        None => Err(unterminated),
    }
}
