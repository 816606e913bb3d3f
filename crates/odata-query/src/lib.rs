//! Bound query model for OData URIs.
//!
//! The binder (not part of this crate) resolves URI tokens against an
//! [`odata_edm::EdmModel`] and builds the structures defined here:
//! - `node` - filter/orderby expression tree ([`QueryNode`])
//! - `segment` - one node per resource path segment ([`PathSegment`])
//! - `path` - validated segment sequences, including `$expand` and `$select` paths
//! - `clause` - `$filter`, `$orderby`, `$search`, `$levels`, `$select`/`$expand`
//! - `alias` - lazily resolved parameter alias values
//! - `render` - `$filter`/`$orderby` text from a bound tree
//! - `uri` - the bound path and query options of one request ([`ODataUri`])
//! - `limits` - expansion depth and count limits ([`QueryLimits`])
//!
//! Everything is validated at construction time and immutable afterwards,
//! except the two [`SelectExpandClause`] assembly methods.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod alias;
pub mod clause;
mod invariants;
pub mod limits;
pub mod node;
pub mod path;
pub mod range_variable;
pub mod render;
pub mod segment;
pub mod uri;

#[cfg(test)]
mod alias_tests;
#[cfg(test)]
mod range_variable_tests;
#[cfg(test)]
mod render_tests;
#[cfg(test)]
pub mod test_utils;
#[cfg(test)]
mod uri_tests;

pub use alias::ParameterAliasValueAccessor;
pub use clause::{
    ExpandedNavigationSelectItem, ExpandedReferenceSelectItem, FilterClause, LevelsClause,
    NamespaceQualifiedWildcardSelectItem, OrderByClause, OrderByDirection, PathSelectItem,
    SearchClause, SelectExpandClause, SelectItem, SelectItemHandler, SelectItemTranslator,
};
pub use limits::{LimitError, QueryLimits};
pub use node::{NodeCategory, NodeError, QueryNode, QueryNodeKind, QueryNodeVisitor};
pub use path::{
    KeyDelimiter, ODataExpandPath, ODataPath, ODataSelectPath, PathError, PathRule,
    ResourcePathTranslator,
};
pub use range_variable::{RangeVariable, RangeVariableKind};
pub use render::{NodeToStringBuilder, filter_clause_text, order_by_clause_text};
pub use segment::{
    NavigationSourceTranslator, PathSegment, PathSegmentHandler, PathSegmentKind,
    PathSegmentTranslator, SegmentError,
};
pub use uri::ODataUri;

/// Errors raised while assembling a bound query.
///
/// Every variant is a construction-time shape violation: the input must be
/// fixed, retrying with the same values fails the same way.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Node(#[from] NodeError),

    #[error(transparent)]
    Segment(#[from] SegmentError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Limit(#[from] LimitError),

    #[error(transparent)]
    Model(#[from] odata_edm::ModelError),
}

/// Result type for query model operations.
pub type Result<T> = std::result::Result<T, Error>;
