//! `$expand` and `$select` path grammars.
//!
//! Expand: zero or more type segments, then exactly one navigation property
//! segment, last.
//!
//! Select: navigation property and operation segments only in last position;
//! a type segment never in last position; anything else anywhere.

use odata_edm::NavigationProperty;

use super::ODataPath;
use crate::invariants::ensure_navigation_tail;
use crate::segment::PathSegment;

/// Grammar rule an expand or select path broke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathRule {
    /// Expand paths hold only type and navigation property segments.
    ExpandSegmentKind,
    /// A navigation property segment appears before the end of an expand path.
    ExpandNavigationNotLast,
    /// An expand path does not end with a navigation property segment.
    ExpandMissingNavigation,
    /// A select path ends with a type segment.
    SelectTypeLast,
    /// A navigation property segment appears before the end of a select path.
    SelectNavigationNotLast,
    /// An operation segment appears before the end of a select path.
    SelectOperationNotLast,
}

impl std::fmt::Display for PathRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Self::ExpandSegmentKind => {
                "expand paths may only contain type and navigation property segments"
            }
            Self::ExpandNavigationNotLast => {
                "a navigation property segment must be the last segment of an expand path"
            }
            Self::ExpandMissingNavigation => {
                "an expand path must end with a navigation property segment"
            }
            Self::SelectTypeLast => "a type segment cannot be the last segment of a select path",
            Self::SelectNavigationNotLast => {
                "a navigation property segment must be the last segment of a select path"
            }
            Self::SelectOperationNotLast => {
                "an operation segment must be the last segment of a select path"
            }
        };
        f.write_str(msg)
    }
}

/// Grammar violation, naming the rule and the offending segment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("{rule}")]
    Empty { rule: PathRule },

    #[error("{rule}: found `{segment}` at position {index}")]
    Segment {
        rule: PathRule,
        segment: String,
        index: usize,
    },
}

impl PathError {
    pub fn rule(&self) -> PathRule {
        match self {
            Self::Empty { rule } | Self::Segment { rule, .. } => *rule,
        }
    }

    /// Position of the offending segment; `None` for an empty path.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Empty { .. } => None,
            Self::Segment { index, .. } => Some(*index),
        }
    }
}

fn offending(rule: PathRule, segment: &PathSegment, index: usize) -> PathError {
    let err = PathError::Segment {
        rule,
        segment: segment.identifier(),
        index,
    };
    tracing::debug!(%err, "path rejected");
    err
}

fn validate_expand(segments: &[PathSegment]) -> Result<(), PathError> {
    let last = segments.len().checked_sub(1);
    for (index, segment) in segments.iter().enumerate() {
        match segment {
            PathSegment::Type(_) => {}
            PathSegment::NavigationProperty(_) if Some(index) == last => {}
            PathSegment::NavigationProperty(_) => {
                return Err(offending(PathRule::ExpandNavigationNotLast, segment, index));
            }
            _ => return Err(offending(PathRule::ExpandSegmentKind, segment, index)),
        }
    }
    match (segments.last(), last) {
        (Some(PathSegment::NavigationProperty(_)), _) => Ok(()),
        (Some(segment), Some(index)) => Err(offending(
            PathRule::ExpandMissingNavigation,
            segment,
            index,
        )),
        _ => {
            let err = PathError::Empty {
                rule: PathRule::ExpandMissingNavigation,
            };
            tracing::debug!(%err, "path rejected");
            Err(err)
        }
    }
}

fn validate_select(segments: &[PathSegment]) -> Result<(), PathError> {
    for (index, segment) in segments.iter().enumerate() {
        let is_last = index + 1 == segments.len();
        let rule = match segment {
            PathSegment::Type(_) if is_last => PathRule::SelectTypeLast,
            PathSegment::NavigationProperty(_) if !is_last => PathRule::SelectNavigationNotLast,
            PathSegment::Operation(_) | PathSegment::OperationImport(_) if !is_last => {
                PathRule::SelectOperationNotLast
            }
            _ => continue,
        };
        return Err(offending(rule, segment, index));
    }
    Ok(())
}

fn path_string(path: &ODataPath) -> String {
    let identifiers: Vec<String> = path.iter().map(PathSegment::identifier).collect();
    identifiers.join("/")
}

/// Path of one `$expand` item: `NS.Derived/Nav`.
#[derive(Clone, Debug, PartialEq)]
pub struct ODataExpandPath {
    path: ODataPath,
}

impl ODataExpandPath {
    pub fn new(segments: impl IntoIterator<Item = PathSegment>) -> Result<Self, PathError> {
        let path = ODataPath::new(segments);
        validate_expand(path.segments())?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &ODataPath {
        &self.path
    }

    pub fn into_path(self) -> ODataPath {
        self.path
    }

    /// The navigation property being expanded.
    pub fn navigation_property(&self) -> &NavigationProperty {
        ensure_navigation_tail(&self.path).property()
    }

    /// `NS.Derived/Nav`, as written in `$expand`.
    pub fn to_path_string(&self) -> String {
        path_string(&self.path)
    }
}

impl TryFrom<ODataPath> for ODataExpandPath {
    type Error = PathError;

    fn try_from(path: ODataPath) -> Result<Self, Self::Error> {
        validate_expand(path.segments())?;
        Ok(Self { path })
    }
}

/// Path of one `$select` item: `Address/City`, `NS.Derived/Nav`, `NS.Action`.
#[derive(Clone, Debug, PartialEq)]
pub struct ODataSelectPath {
    path: ODataPath,
}

impl ODataSelectPath {
    pub fn new(segments: impl IntoIterator<Item = PathSegment>) -> Result<Self, PathError> {
        let path = ODataPath::new(segments);
        validate_select(path.segments())?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &ODataPath {
        &self.path
    }

    pub fn into_path(self) -> ODataPath {
        self.path
    }

    pub fn last_segment(&self) -> Option<&PathSegment> {
        self.path.last_segment()
    }

    /// `Address/City`, as written in `$select`.
    pub fn to_path_string(&self) -> String {
        path_string(&self.path)
    }
}

impl TryFrom<ODataPath> for ODataSelectPath {
    type Error = PathError;

    fn try_from(path: ODataPath) -> Result<Self, Self::Error> {
        validate_select(path.segments())?;
        Ok(Self { path })
    }
}
