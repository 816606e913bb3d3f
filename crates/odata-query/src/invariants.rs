//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::path::ODataPath;
use crate::segment::{NavigationPropertySegment, PathSegment};

/// Last segment of a path already validated as an expand path.
pub(crate) fn ensure_navigation_tail(path: &ODataPath) -> &NavigationPropertySegment {
    match path.last_segment() {
        Some(PathSegment::NavigationProperty(segment)) => segment,
        other => panic!(
            "ODataExpandPath: last segment is {:?}, not a navigation property \
             (expand paths are validated on construction)",
            other.map(PathSegment::kind)
        ),
    }
}
