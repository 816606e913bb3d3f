//! Resource paths: ordered sequences of [`PathSegment`]s.
//!
//! [`ODataPath`] accepts any sequence. [`ODataExpandPath`] and
//! [`ODataSelectPath`] check their narrower grammars when constructed.

mod grammar;
mod ops;

#[cfg(test)]
mod ops_tests;

pub use grammar::{ODataExpandPath, ODataSelectPath, PathError, PathRule};
pub use ops::ResourcePathTranslator;

use crate::segment::{PathSegment, PathSegmentHandler, PathSegmentTranslator};

/// How key values are written in a resource path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyDelimiter {
    /// `People('1')`.
    #[default]
    Parentheses,
    /// `People/1`. Composite keys still use parentheses.
    Slash,
}

/// A resource path. Owns its segments; equality is segment by segment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ODataPath {
    segments: Vec<PathSegment>,
}

impl ODataPath {
    pub fn new(segments: impl IntoIterator<Item = PathSegment>) -> Self {
        Self {
            segments: segments.into_iter().collect(),
        }
    }

    pub fn first_segment(&self) -> Option<&PathSegment> {
        self.segments.first()
    }

    pub fn last_segment(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathSegment> {
        self.segments.iter()
    }

    pub fn push(&mut self, segment: impl Into<PathSegment>) {
        self.segments.push(segment.into());
    }

    /// New path with `segment` appended; `self` is unchanged.
    pub fn appended(&self, segment: impl Into<PathSegment>) -> Self {
        let mut path = self.clone();
        path.push(segment);
        path
    }

    /// Translate every segment, in order.
    pub fn walk_with<T, V>(&self, translator: &mut V) -> Vec<T>
    where
        V: PathSegmentTranslator<T> + ?Sized,
    {
        self.segments
            .iter()
            .map(|segment| segment.translate_with(translator))
            .collect()
    }

    /// Hand every segment to `handler`, in order.
    pub fn handle_with<H>(&self, handler: &mut H)
    where
        H: PathSegmentHandler + ?Sized,
    {
        for segment in &self.segments {
            segment.handle_with(handler);
        }
    }
}

impl FromIterator<PathSegment> for ODataPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl IntoIterator for ODataPath {
    type Item = PathSegment;
    type IntoIter = std::vec::IntoIter<PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

impl<'a> IntoIterator for &'a ODataPath {
    type Item = &'a PathSegment;
    type IntoIter = std::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
