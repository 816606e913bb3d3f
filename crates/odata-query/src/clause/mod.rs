//! Query option clauses: `$filter`, `$orderby`, `$search`, `$levels`, and
//! `$select`/`$expand`.
//!
//! Each clause binds an already-built expression to the range variable it
//! iterates. Clauses are immutable once built; only [`SelectExpandClause`]
//! exposes assembly methods.

mod select_expand;

#[cfg(test)]
mod clause_tests;

use odata_edm::{EdmTypeReference, PrimitiveKind};

pub use select_expand::{
    ExpandedNavigationSelectItem, ExpandedReferenceSelectItem,
    NamespaceQualifiedWildcardSelectItem, PathSelectItem, SelectExpandClause, SelectItem,
    SelectItemHandler, SelectItemTranslator,
};

use crate::node::{NodeError, QueryNode, reject};
use crate::range_variable::RangeVariable;

/// Single-valued expression whose type, when known, is Boolean.
fn expect_predicate(clause: &'static str, expression: &QueryNode) -> Result<(), NodeError> {
    let category = expression.category();
    if !category.is_single() {
        return Err(reject(NodeError::ClauseExpression {
            clause,
            expected: "a single value",
            found: category.to_string(),
        }));
    }
    match expression.type_reference() {
        Some(ty) if ty.as_primitive() != Some(PrimitiveKind::Boolean) => {
            Err(reject(NodeError::ClauseExpression {
                clause,
                expected: "Boolean",
                found: ty.full_name(),
            }))
        }
        _ => Ok(()),
    }
}

// ============================================================================
// $filter
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct FilterClause {
    expression: QueryNode,
    range_variable: RangeVariable,
}

impl FilterClause {
    pub fn new(expression: QueryNode, range_variable: RangeVariable) -> Result<Self, NodeError> {
        expect_predicate("filter", &expression)?;
        Ok(Self {
            expression,
            range_variable,
        })
    }

    pub fn expression(&self) -> &QueryNode {
        &self.expression
    }

    pub fn range_variable(&self) -> &RangeVariable {
        &self.range_variable
    }

    /// Type of the elements being filtered.
    pub fn item_type(&self) -> Option<EdmTypeReference> {
        self.range_variable.type_reference().cloned()
    }
}

// ============================================================================
// $orderby
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OrderByDirection {
    #[default]
    Ascending,
    Descending,
}

impl OrderByDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// One `$orderby` key, linked to the key that breaks its ties.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderByClause {
    expression: QueryNode,
    direction: OrderByDirection,
    range_variable: RangeVariable,
    then_by: Option<Box<OrderByClause>>,
}

impl OrderByClause {
    pub fn new(
        expression: QueryNode,
        direction: OrderByDirection,
        range_variable: RangeVariable,
    ) -> Result<Self, NodeError> {
        let category = expression.category();
        if !category.is_single() {
            return Err(reject(NodeError::ClauseExpression {
                clause: "orderby",
                expected: "a single value",
                found: category.to_string(),
            }));
        }
        Ok(Self {
            expression,
            direction,
            range_variable,
            then_by: None,
        })
    }

    /// Set the tie-breaking successor, replacing any previous one.
    pub fn with_then_by(mut self, then_by: OrderByClause) -> Self {
        self.then_by = Some(Box::new(then_by));
        self
    }

    pub fn expression(&self) -> &QueryNode {
        &self.expression
    }

    pub fn direction(&self) -> OrderByDirection {
        self.direction
    }

    pub fn range_variable(&self) -> &RangeVariable {
        &self.range_variable
    }

    pub fn then_by(&self) -> Option<&OrderByClause> {
        self.then_by.as_deref()
    }

    pub fn item_type(&self) -> Option<EdmTypeReference> {
        self.range_variable.type_reference().cloned()
    }

    /// This clause followed by its successors.
    pub fn iter(&self) -> impl Iterator<Item = &OrderByClause> {
        std::iter::successors(Some(self), |clause| clause.then_by())
    }
}

// ============================================================================
// $search and $levels
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct SearchClause {
    expression: QueryNode,
}

impl SearchClause {
    pub fn new(expression: QueryNode) -> Result<Self, NodeError> {
        expect_predicate("search", &expression)?;
        Ok(Self { expression })
    }

    pub fn expression(&self) -> &QueryNode {
        &self.expression
    }
}

/// `$levels=n` or `$levels=max`. The level is ignored when `max` is set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LevelsClause {
    is_max: bool,
    level: u64,
}

impl LevelsClause {
    pub fn new(is_max: bool, level: u64) -> Self {
        Self { is_max, level }
    }

    pub fn max() -> Self {
        Self::new(true, 0)
    }

    pub fn finite(level: u64) -> Self {
        Self::new(false, level)
    }

    pub fn is_max(&self) -> bool {
        self.is_max
    }

    pub fn level(&self) -> u64 {
        self.level
    }
}

impl std::fmt::Display for LevelsClause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_max {
            f.write_str("max")
        } else {
            write!(f, "{}", self.level)
        }
    }
}
