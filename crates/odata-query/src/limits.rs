//! Service-side limits on `$expand` trees.

use serde::Deserialize;

use crate::clause::{
    ExpandedNavigationSelectItem, ExpandedReferenceSelectItem, LevelsClause,
    NamespaceQualifiedWildcardSelectItem, PathSelectItem, SelectExpandClause, SelectItemHandler,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LimitError {
    #[error("expansion depth {depth} exceeds the limit of {limit}")]
    DepthExceeded { depth: u64, limit: u64 },

    #[error("expansion count {count} exceeds the limit of {limit}")]
    CountExceeded { count: u64, limit: u64 },
}

/// Limits applied to a bound select/expand tree. Every limit defaults to
/// unbounded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryLimits {
    /// Deepest allowed chain of nested expansions.
    pub(crate) max_expansion_depth: Option<u64>,
    /// Most expanded items allowed in the whole tree.
    pub(crate) max_expansion_count: Option<u64>,
    /// Depth that `$levels=max` stands for.
    pub(crate) max_levels: Option<u64>,
}

impl QueryLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_expansion_depth(mut self, value: u64) -> Self {
        self.max_expansion_depth = Some(value);
        self
    }

    pub fn max_expansion_count(mut self, value: u64) -> Self {
        self.max_expansion_count = Some(value);
        self
    }

    pub fn max_levels(mut self, value: u64) -> Self {
        self.max_levels = Some(value);
        self
    }

    /// Depth one expanded item contributes. `$levels=n` counts as `n` (at
    /// least one); `$levels=max` counts as `max_levels`, or one when unbounded.
    pub fn levels_depth(&self, levels: Option<LevelsClause>) -> u64 {
        match levels {
            None => 1,
            Some(levels) if levels.is_max() => self.max_levels.unwrap_or(1).max(1),
            Some(levels) => levels.level().max(1),
        }
    }

    /// Walk `clause` and fail on the first limit it exceeds.
    pub fn validate_select_expand(&self, clause: &SelectExpandClause) -> Result<(), LimitError> {
        let mut walker = LimitWalker {
            limits: self,
            depth: 0,
            count: 0,
            error: None,
        };
        clause.handle_with(&mut walker);
        match walker.error {
            Some(err) => {
                tracing::debug!(%err, "select/expand rejected");
                Err(err)
            }
            None => Ok(()),
        }
    }
}

struct LimitWalker<'a> {
    limits: &'a QueryLimits,
    depth: u64,
    count: u64,
    error: Option<LimitError>,
}

impl LimitWalker<'_> {
    /// Depth and count saturate, so a huge `$levels` still reports against
    /// the limit instead of wrapping.
    fn enter(&mut self, levels: u64) {
        self.depth = self.depth.saturating_add(levels);
        self.count = self.count.saturating_add(1);
        if self.error.is_some() {
            return;
        }
        if let Some(limit) = self.limits.max_expansion_depth
            && self.depth > limit
        {
            self.error = Some(LimitError::DepthExceeded {
                depth: self.depth,
                limit,
            });
        } else if let Some(limit) = self.limits.max_expansion_count
            && self.count > limit
        {
            self.error = Some(LimitError::CountExceeded {
                count: self.count,
                limit,
            });
        }
    }
}

impl SelectItemHandler for LimitWalker<'_> {
    fn handle_wildcard(&mut self) {}

    fn handle_path(&mut self, _item: &PathSelectItem) {}

    fn handle_namespace_qualified_wildcard(
        &mut self,
        _item: &NamespaceQualifiedWildcardSelectItem,
    ) {
    }

    fn handle_expanded_navigation(&mut self, item: &ExpandedNavigationSelectItem) {
        let outer = self.depth;
        self.enter(self.limits.levels_depth(item.levels()));
        if self.error.is_none()
            && let Some(nested) = item.select_and_expand()
        {
            nested.handle_with(self);
        }
        self.depth = outer;
    }

    fn handle_expanded_reference(&mut self, _item: &ExpandedReferenceSelectItem) {
        let outer = self.depth;
        self.enter(1);
        self.depth = outer;
    }
}
