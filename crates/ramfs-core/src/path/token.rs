//! Case-insensitive string values.
//!
//! A [`CiString`] keeps the spelling it was created with for display, and a
//! case-folded copy that drives equality, ordering and hashing. Path segments
//! and namespace identifiers are both compared this way.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A string that compares, orders and hashes without regard to case.
#[derive(Clone)]
pub struct CiString {
    original: String,
    folded: String,
}

/// One segment of a path.
pub type PathToken = CiString;

impl CiString {
    pub fn new(s: impl Into<String>) -> Self {
        let original = s.into();
        let folded = fold(&original);
        Self { original, folded }
    }

    /// The spelling this value was created with.
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// The case-folded form used for comparison.
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Case-insensitive comparison against a plain string.
    pub fn eq_str(&self, other: &str) -> bool {
        self.folded == fold(other)
    }

    pub fn into_string(self) -> String {
        self.original
    }
}

fn fold(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

impl PartialEq for CiString {
    fn eq(&self, other: &Self) -> bool {
        self.folded == other.folded
    }
}

impl Eq for CiString {}

impl PartialOrd for CiString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CiString {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded.cmp(&other.folded)
    }
}

impl Hash for CiString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded.hash(state);
    }
}

impl fmt::Debug for CiString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.original, f)
    }
}

impl fmt::Display for CiString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl AsRef<str> for CiString {
    fn as_ref(&self) -> &str {
        &self.original
    }
}

impl From<&str> for CiString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CiString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
