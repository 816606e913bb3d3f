//! Parameter alias values (`?$filter=Name eq @p&@p='x'`).
//!
//! Raw expressions are captured up front. A value is bound only when the
//! binder dereferences its alias, so the cache never holds an alias the
//! query did not use.

use indexmap::IndexMap;

use crate::node::QueryNode;

/// Raw alias expressions plus the lazily filled cache of bound values.
///
/// Alias names include the leading `@` and are case-sensitive. Not
/// synchronized: bind first, then share read-only.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterAliasValueAccessor {
    expressions: IndexMap<String, String>,
    resolved: IndexMap<String, Option<QueryNode>>,
}

impl ParameterAliasValueAccessor {
    pub fn new<K, V>(expressions: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            expressions: expressions
                .into_iter()
                .map(|(alias, text)| (alias.into(), text.into()))
                .collect(),
            resolved: IndexMap::new(),
        }
    }

    /// Raw expression text. `None` when the URI does not define the alias.
    pub fn alias_value_expression(&self, alias: &str) -> Option<&str> {
        self.expressions.get(alias).map(String::as_str)
    }

    pub fn alias_value_expressions(&self) -> &IndexMap<String, String> {
        &self.expressions
    }

    /// Bound values, in the order the aliases were first dereferenced. An
    /// alias referenced but never defined maps to `None` (binds as null).
    pub fn resolved_nodes(&self) -> &IndexMap<String, Option<QueryNode>> {
        &self.resolved
    }

    /// Record the bound value of `alias`. The first value wins.
    pub fn cache(&mut self, alias: &str, node: Option<QueryNode>) {
        if self.resolved.contains_key(alias) {
            return;
        }
        tracing::trace!(alias, bound = node.is_some(), "alias value cached");
        self.resolved.insert(alias.to_owned(), node);
    }

    /// Bound value of `alias`, binding its raw expression with `bind` on first
    /// use. `bind` never runs for an undefined alias or a cached one.
    pub fn resolve_with<E>(
        &mut self,
        alias: &str,
        bind: impl FnOnce(&str) -> Result<QueryNode, E>,
    ) -> Result<Option<&QueryNode>, E> {
        if !self.resolved.contains_key(alias) {
            let node = match self.expressions.get(alias) {
                Some(text) => Some(bind(text)?),
                None => None,
            };
            self.cache(alias, node);
        }
        Ok(self.resolved.get(alias).and_then(Option::as_ref))
    }
}
