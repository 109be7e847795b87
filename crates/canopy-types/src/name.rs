use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reasons a name handed in by the grammar front end is rejected.
///
/// Every name ends up verbatim in generated source, so it must be a plain
/// identifier (or a dotted path of identifiers for construct names).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("name is empty")]
    Empty,

    #[error("empty segment in dotted name '{0}'")]
    EmptySegment(String),

    #[error("'{name}' is not a valid identifier (unexpected {ch:?})")]
    InvalidCharacter { name: String, ch: char },

    #[error("'{0}' starts with a digit")]
    LeadingDigit(String),
}

/// Check that `segment` is a single identifier: letters, digits, `_` and `$`,
/// not starting with a digit.
pub(crate) fn check_identifier(segment: &str, whole: &str) -> crate::Result<()> {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return Err(if segment == whole {
            NameError::Empty
        } else {
            NameError::EmptySegment(whole.to_string())
        });
    };
    if first.is_ascii_digit() {
        return Err(NameError::LeadingDigit(whole.to_string()));
    }
    for ch in std::iter::once(first).chain(chars) {
        if !(ch.is_alphanumeric() || ch == '_' || ch == '$') {
            return Err(NameError::InvalidCharacter {
                name: whole.to_string(),
                ch,
            });
        }
    }
    Ok(())
}

// ══════════════════════════════════════════════════════════════════════════════
// ConstructName
// ══════════════════════════════════════════════════════════════════════════════

/// A possibly dotted name for a generated construct, e.g. `CanopyJson` or
/// `Acme.Parsers.Json`.
///
/// The leading segments form the namespace path the construct is exported
/// under; the last segment is the construct's own name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConstructName {
    segments: Vec<String>,
}

impl ConstructName {
    /// Parse and validate a dotted name.
    pub fn parse(name: &str) -> crate::Result<Self> {
        if name.is_empty() {
            return Err(NameError::Empty);
        }
        let segments: Vec<String> = name.split('.').map(str::to_string).collect();
        for segment in &segments {
            check_identifier(segment, name)?;
        }
        Ok(Self { segments })
    }

    /// All path segments, namespace first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The namespace path (every segment but the last).
    pub fn namespace(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// The construct's own (last) segment.
    pub fn last(&self) -> &str {
        // `parse` guarantees at least one segment
        &self.segments[self.segments.len() - 1]
    }

    pub fn is_dotted(&self) -> bool {
        self.segments.len() > 1
    }

    /// The first `len` segments joined with dots.
    pub fn prefix(&self, len: usize) -> String {
        self.segments[..len.min(self.segments.len())].join(".")
    }
}

impl fmt::Display for ConstructName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for ConstructName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ConstructName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ConstructName> for String {
    fn from(name: ConstructName) -> Self {
        name.to_string()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// RuleName
// ══════════════════════════════════════════════════════════════════════════════

/// The name of a grammar rule. Used to derive reader method names and cache
/// table names in generated code, and to key rules in the runtime model.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleName(String);

impl RuleName {
    pub fn parse(name: &str) -> crate::Result<Self> {
        check_identifier(name, name)?;
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RuleName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RuleName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RuleName> for String {
    fn from(name: RuleName) -> Self {
        name.0
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// RuleTag
// ══════════════════════════════════════════════════════════════════════════════

/// A tag attached to a syntax node right after construction, naming the
/// rule (or rule alternative) that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleTag(String);

impl RuleTag {
    pub fn parse(tag: &str) -> crate::Result<Self> {
        check_identifier(tag, tag)?;
        Ok(Self(tag.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RuleTag {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RuleTag> for String {
    fn from(tag: RuleTag) -> Self {
        tag.0
    }
}
