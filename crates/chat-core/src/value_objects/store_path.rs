//! Hierarchical store paths
//!
//! A path is a list of non-empty key segments, rendered as `a/b/c`.

use std::fmt;

/// Characters the realtime store does not accept inside a key
const FORBIDDEN: &[char] = &['/', '.', '#', '$', '[', ']'];

/// Path to a node of the realtime keyed store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct StorePath {
    segments: Vec<String>,
}

/// Error when building a path from an illegal key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorePathError {
    #[error("empty path segment")]
    EmptySegment,

    #[error("illegal character in path segment: {0}")]
    IllegalSegment(String),
}

impl StorePath {
    /// The store root
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a `/`-separated path; leading and trailing slashes are ignored
    pub fn parse(path: &str) -> Result<Self, StorePathError> {
        let mut parsed = Self::root();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            parsed = parsed.child(segment)?;
        }
        Ok(parsed)
    }

    /// Append one key segment
    pub fn child(&self, key: impl AsRef<str>) -> Result<Self, StorePathError> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(StorePathError::EmptySegment);
        }
        if key.contains(FORBIDDEN) {
            return Err(StorePathError::IllegalSegment(key.to_string()));
        }

        let mut segments = self.segments.clone();
        segments.push(key.to_string());
        Ok(Self { segments })
    }

    /// Path segments from the root
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Last segment, `None` for the root
    pub fn key(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Whether this is the store root
    #[inline]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether `self` equals `other` or is one of its ancestors
    pub fn contains(&self, other: &StorePath) -> bool {
        other.segments.len() >= self.segments.len()
            && self.segments.iter().zip(&other.segments).all(|(a, b)| a == b)
    }

    /// Whether one of the two paths contains the other
    pub fn overlaps(&self, other: &StorePath) -> bool {
        self.contains(other) || other.contains(self)
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl std::str::FromStr for StorePath {
    type Err = StorePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
