//! Person records — one line of an `AUTHORS` or `CONTRIBUTORS` file.
//!
//! ```text
//! NAME [EMAIL] [https://orcid.org/ORCID] [AFFILIATION]
//! ```
//!
//! Every bracketed group is optional, but when present they must appear in
//! that order. `NAME` is a run of word characters, hyphens, spaces and commas
//! ending in a word character or hyphen.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static PERSON_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<name>[-\w\s,]*[-\w])\s*",
        r"(?:\[(?P<email>\S+@\S+)\])?\s*",
        r"(?:\[https://orcid\.org/(?P<orcid>\S+)\])?\s*",
        r"(?:\[(?P<affiliation>[^\]]+)\])?$",
    ))
    .unwrap()
});

/// A line that does not match the person-record format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not analyze line: {line}")]
pub struct ParseLineError {
    pub line: String,
}

/// The fields captured from one person line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersonRecord {
    pub name: String,
    pub email: Option<String>,
    /// The bare identifier, without the `https://orcid.org/` prefix.
    pub orcid: Option<String>,
    pub affiliation: Option<String>,
}

impl PersonRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_orcid(mut self, orcid: impl Into<String>) -> Self {
        self.orcid = Some(orcid.into());
        self
    }

    pub fn with_affiliation(mut self, affiliation: impl Into<String>) -> Self {
        self.affiliation = Some(affiliation.into());
        self
    }

    /// Parse a single line. Surrounding whitespace is ignored.
    pub fn parse(line: &str) -> Result<Self, ParseLineError> {
        let line = line.trim();
        let caps = PERSON_LINE.captures(line).ok_or_else(|| ParseLineError {
            line: line.to_string(),
        })?;
        let group = |name: &str| {
            caps.name(name)
                .map(|m| m.as_str().to_string())
                .filter(|s| !s.is_empty())
        };
        Ok(Self {
            name: caps["name"].to_string(),
            email: group("email"),
            orcid: group("orcid"),
            affiliation: group("affiliation"),
        })
    }

    /// The populated `(key, value)` pairs in the order they are written to a
    /// person entry.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("name", Some(self.name.as_str())),
            ("orcid", self.orcid.as_deref()),
            ("email", self.email.as_deref()),
            ("affiliation", self.affiliation.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
    }
}

impl FromStr for PersonRecord {
    type Err = ParseLineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PersonRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(email) = &self.email {
            write!(f, " [{email}]")?;
        }
        if let Some(orcid) = &self.orcid {
            write!(f, " [https://orcid.org/{orcid}]")?;
        }
        if let Some(affiliation) = &self.affiliation {
            write!(f, " [{affiliation}]")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Whole files
// ---------------------------------------------------------------------------

/// A line that failed to parse, with its 1-based position in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    pub line_number: usize,
    pub content: String,
}

impl fmt::Display for MalformedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line_number, self.content)
    }
}

/// Parse every non-blank line of a person list.
pub fn parse_person_list(text: &str) -> Vec<Result<PersonRecord, MalformedLine>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            PersonRecord::parse(line).map_err(|e| MalformedLine {
                line_number: i + 1,
                content: e.line,
            })
        })
        .collect()
}
