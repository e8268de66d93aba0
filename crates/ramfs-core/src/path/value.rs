//! Immutable path values and their algebra.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::token::PathToken;
use crate::error::{FsError, FsResult};

/// Name separator.
pub const SEPARATOR: char = '/';

const CURRENT: &str = ".";
const PARENT: &str = "..";

/// An immutable path: a sequence of case-insensitive segments plus a flag
/// saying whether it is anchored at the root.
///
/// The root is the absolute path with no segments. The relative path with no
/// segments is the *empty path*, which is a different value. No segment is
/// ever empty.
///
/// Paths are plain values and are not tied to a filesystem instance.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FsPath {
    segments: Vec<PathToken>,
    absolute: bool,
}

impl FsPath {
    /// The root path `/`.
    pub fn root() -> Self {
        Self { segments: Vec::new(), absolute: true }
    }

    /// The empty relative path.
    pub fn empty() -> Self {
        Self { segments: Vec::new(), absolute: false }
    }

    /// Build a path from already-split segments.
    ///
    /// Empty strings are skipped so the no-empty-segment invariant holds.
    pub fn from_segments<I, S>(segments: I, absolute: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathToken>,
    {
        let segments = segments
            .into_iter()
            .map(Into::into)
            .filter(|t: &PathToken| !t.as_str().is_empty())
            .collect();
        Self { segments, absolute }
    }

    /// Parse one or more raw strings into a path.
    ///
    /// Every string is split on `/` and empty pieces are dropped, so repeated
    /// separators collapse. The result is absolute iff `first` starts with
    /// `/`.
    ///
    /// ```
    /// use ramfs_core::FsPath;
    ///
    /// let p = FsPath::parse("/foo//bar", &["baz/", "qux"]);
    /// assert_eq!(p.to_string(), "/foo/bar/baz/qux");
    /// assert!(FsPath::parse("", &[]).is_empty());
    /// ```
    pub fn parse(first: &str, more: &[&str]) -> Self {
        let absolute = first.starts_with(SEPARATOR);
        let segments = std::iter::once(first)
            .chain(more.iter().copied())
            .flat_map(|part| part.split(SEPARATOR))
            .filter(|s| !s.is_empty())
            .map(PathToken::new)
            .collect();
        Self { segments, absolute }
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub fn is_root(&self) -> bool {
        self.absolute && self.segments.is_empty()
    }

    /// True for the relative path with no segments.
    pub fn is_empty(&self) -> bool {
        !self.absolute && self.segments.is_empty()
    }

    /// Number of segments (0 for both root and the empty path).
    pub fn name_count(&self) -> usize {
        self.segments.len()
    }

    pub fn tokens(&self) -> std::slice::Iter<'_, PathToken> {
        self.segments.iter()
    }

    /// The segment at `index` as a single-segment relative path.
    pub fn name(&self, index: usize) -> FsResult<FsPath> {
        let token = self.segments.get(index).ok_or(FsError::IndexOutOfRange {
            index,
            len: self.segments.len(),
        })?;
        Ok(Self { segments: vec![token.clone()], absolute: false })
    }

    /// The last segment as a relative path, if there is one.
    pub fn file_name(&self) -> Option<FsPath> {
        self.segments
            .last()
            .map(|t| Self { segments: vec![t.clone()], absolute: false })
    }

    /// The last segment, if there is one.
    pub fn last_token(&self) -> Option<&PathToken> {
        self.segments.last()
    }

    /// Everything but the last segment.
    ///
    /// Root, the empty path and single-segment relative paths have no parent.
    /// The parent of `/a` is the root.
    pub fn parent(&self) -> Option<FsPath> {
        match self.segments.len() {
            0 => None,
            1 if !self.absolute => None,
            n => Some(Self {
                segments: self.segments[..n - 1].to_vec(),
                absolute: self.absolute,
            }),
        }
    }

    /// The root component, for absolute paths.
    pub fn root_component(&self) -> Option<FsPath> {
        self.absolute.then(Self::root)
    }

    /// Relative path over the segments `[begin, end)`.
    pub fn subpath(&self, begin: usize, end: usize) -> FsResult<FsPath> {
        let len = self.segments.len();
        if end <= begin || end > len {
            return Err(FsError::IndexOutOfRange {
                index: if end > len { end } else { begin },
                len,
            });
        }
        Ok(Self {
            segments: self.segments[begin..end].to_vec(),
            absolute: false,
        })
    }

    /// Append one raw string (which may itself contain separators).
    pub fn join(&self, segment: &str) -> FsPath {
        self.resolve(&FsPath::parse(segment, &[]).relative())
    }

    /// This path with the absolute flag cleared.
    fn relative(self) -> FsPath {
        Self { segments: self.segments, absolute: false }
    }

    pub fn starts_with(&self, other: &FsPath) -> bool {
        if self.is_root() && other.is_root() {
            return true;
        }
        if self.absolute != other.absolute || other.segments.len() > self.segments.len() {
            return false;
        }
        self.segments
            .iter()
            .zip(other.segments.iter())
            .all(|(a, b)| a == b)
    }

    pub fn ends_with(&self, other: &FsPath) -> bool {
        if self.is_root() && other.is_root() {
            return true;
        }
        if other.absolute && (!self.absolute || other.segments.len() != self.segments.len()) {
            return false;
        }
        if other.segments.len() > self.segments.len() {
            return false;
        }
        self.segments
            .iter()
            .rev()
            .zip(other.segments.iter().rev())
            .all(|(a, b)| a == b)
    }

    /// Remove `.` segments and fold `..` into the preceding segment.
    ///
    /// A `..` that has nothing to cancel is dropped on absolute paths (you
    /// cannot go above `/`) and kept on relative paths, so `../a/..` becomes
    /// `..`.
    pub fn normalize(&self) -> FsPath {
        let mut out: Vec<PathToken> = Vec::with_capacity(self.segments.len());
        for token in &self.segments {
            match token.as_str() {
                CURRENT => {}
                PARENT => match out.last() {
                    Some(prev) if prev.as_str() != PARENT => {
                        out.pop();
                    }
                    _ if self.absolute => {}
                    _ => out.push(token.clone()),
                },
                _ => out.push(token.clone()),
            }
        }
        Self { segments: out, absolute: self.absolute }
    }

    /// Resolve `other` against this path, treating this path as a directory.
    pub fn resolve(&self, other: &FsPath) -> FsPath {
        if other.absolute {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        let mut segments = Vec::with_capacity(self.segments.len() + other.segments.len());
        segments.extend(self.segments.iter().cloned());
        segments.extend(other.segments.iter().cloned());
        Self { segments, absolute: self.absolute }
    }

    /// Parse `other` and resolve it against this path.
    pub fn resolve_str(&self, other: &str) -> FsPath {
        self.resolve(&FsPath::parse(other, &[]))
    }

    /// Resolve `other` against this path's parent.
    pub fn resolve_sibling(&self, other: &FsPath) -> FsPath {
        match self.parent() {
            Some(parent) => parent.resolve(other),
            None => other.clone(),
        }
    }

    /// The relative path that leads from this path to `other`.
    ///
    /// Both paths must be absolute or both relative.
    pub fn relativize(&self, other: &FsPath) -> FsResult<FsPath> {
        if self.absolute != other.absolute {
            return Err(FsError::incompatible(self, other));
        }
        let common = self
            .segments
            .iter()
            .zip(other.segments.iter())
            .take_while(|(a, b)| a == b)
            .count();
        let ups = self.segments.len() - common;
        let segments = std::iter::repeat_n(PathToken::new(PARENT), ups)
            .chain(other.segments[common..].iter().cloned())
            .collect();
        Ok(Self { segments, absolute: false })
    }

    /// This path anchored at the root.
    pub fn to_absolute(&self) -> FsPath {
        if self.absolute {
            self.clone()
        } else {
            Self::root().resolve(self)
        }
    }

    /// Normalized and absolute: the form used to address the tree.
    pub fn to_real(&self) -> FsPath {
        self.to_absolute().normalize()
    }
}

impl Ord for FsPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments
            .cmp(&other.segments)
            .then(self.absolute.cmp(&other.absolute))
    }
}

impl PartialOrd for FsPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for FsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.absolute {
            f.write_str("/")?;
        }
        for (i, token) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(token.as_str())?;
        }
        Ok(())
    }
}

impl fmt::Debug for FsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FsPath({:?})", self.to_string())
    }
}

impl FromStr for FsPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FsPath::parse(s, &[]))
    }
}

impl From<&str> for FsPath {
    fn from(s: &str) -> Self {
        FsPath::parse(s, &[])
    }
}

impl From<&String> for FsPath {
    fn from(s: &String) -> Self {
        FsPath::parse(s, &[])
    }
}

impl From<&FsPath> for FsPath {
    fn from(path: &FsPath) -> Self {
        path.clone()
    }
}
