use regex_lite::Regex;
use serde::Deserialize;

/// A case-insensitive regex used to attribute a page to a known source.
#[derive(Deserialize, Debug, Clone)]
#[serde(try_from = "String")]
pub struct Pattern {
    find: Regex,
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.find.as_str() == other.find.as_str()
    }
}

impl Eq for Pattern {}

impl Pattern {
    pub fn is_match(&self, haystack: &str) -> bool {
        self.find.is_match(haystack)
    }

    /// the pattern as written, without the added case flag
    pub fn as_str(&self) -> &str {
        self.find.as_str().strip_prefix("(?i)").unwrap_or(self.find.as_str())
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.as_str().fmt(f)
    }
}

pub struct PatternError(PatternErrorInner);

enum PatternErrorInner {
    Empty,
    RegexParseError(String, regex_lite::Error),
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            PatternErrorInner::Empty => "source pattern is empty".fmt(f),
            PatternErrorInner::RegexParseError(pat, e) => {
                write!(f, "invalid source pattern `{pat}`: {e}")
            }
        }
    }
}

impl std::fmt::Debug for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

impl std::error::Error for PatternError {}

impl TryFrom<&str> for Pattern {
    type Error = PatternError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err(PatternError(PatternErrorInner::Empty));
        }
        let find = Regex::new(&format!("(?i){value}"))
            .map_err(|e| PatternError(PatternErrorInner::RegexParseError(value.to_owned(), e)))?;
        Ok(Pattern { find })
    }
}

impl TryFrom<String> for Pattern {
    type Error = PatternError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.as_str().try_into()
    }
}
