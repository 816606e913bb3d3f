//! Bound state of one request URI.

use crate::alias::ParameterAliasValueAccessor;
use crate::clause::{FilterClause, OrderByClause, SearchClause, SelectExpandClause};
use crate::path::{KeyDelimiter, ODataPath};

/// Resource path plus every bound query option. Nothing here is parsed;
/// the binder fills it in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ODataUri {
    service_root: Option<String>,
    path: ODataPath,
    select_expand: Option<SelectExpandClause>,
    filter: Option<FilterClause>,
    order_by: Option<OrderByClause>,
    search: Option<SearchClause>,
    top: Option<u64>,
    skip: Option<u64>,
    count: Option<bool>,
    skip_token: Option<String>,
    delta_token: Option<String>,
    custom_query_options: Vec<(String, String)>,
    parameter_aliases: ParameterAliasValueAccessor,
}

impl ODataUri {
    pub fn new(path: ODataPath) -> Self {
        Self {
            path,
            ..Self::default()
        }
    }

    pub fn with_service_root(mut self, service_root: impl Into<String>) -> Self {
        self.service_root = Some(service_root.into());
        self
    }

    pub fn with_select_expand(mut self, clause: SelectExpandClause) -> Self {
        self.select_expand = Some(clause);
        self
    }

    pub fn with_filter(mut self, clause: FilterClause) -> Self {
        self.filter = Some(clause);
        self
    }

    pub fn with_order_by(mut self, clause: OrderByClause) -> Self {
        self.order_by = Some(clause);
        self
    }

    pub fn with_search(mut self, clause: SearchClause) -> Self {
        self.search = Some(clause);
        self
    }

    pub fn with_top(mut self, top: u64) -> Self {
        self.top = Some(top);
        self
    }

    pub fn with_skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn with_count(mut self, count: bool) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_skip_token(mut self, token: impl Into<String>) -> Self {
        self.skip_token = Some(token.into());
        self
    }

    pub fn with_delta_token(mut self, token: impl Into<String>) -> Self {
        self.delta_token = Some(token.into());
        self
    }

    /// Append a non-system query option. Order is preserved.
    pub fn with_custom_query_option(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.custom_query_options.push((name.into(), value.into()));
        self
    }

    pub fn with_parameter_aliases(mut self, aliases: ParameterAliasValueAccessor) -> Self {
        self.parameter_aliases = aliases;
        self
    }

    pub fn service_root(&self) -> Option<&str> {
        self.service_root.as_deref()
    }

    pub fn path(&self) -> &ODataPath {
        &self.path
    }

    pub fn select_expand(&self) -> Option<&SelectExpandClause> {
        self.select_expand.as_ref()
    }

    pub fn filter(&self) -> Option<&FilterClause> {
        self.filter.as_ref()
    }

    pub fn order_by(&self) -> Option<&OrderByClause> {
        self.order_by.as_ref()
    }

    pub fn search(&self) -> Option<&SearchClause> {
        self.search.as_ref()
    }

    pub fn top(&self) -> Option<u64> {
        self.top
    }

    pub fn skip(&self) -> Option<u64> {
        self.skip
    }

    pub fn count(&self) -> Option<bool> {
        self.count
    }

    pub fn skip_token(&self) -> Option<&str> {
        self.skip_token.as_deref()
    }

    pub fn delta_token(&self) -> Option<&str> {
        self.delta_token.as_deref()
    }

    pub fn custom_query_options(&self) -> &[(String, String)] {
        &self.custom_query_options
    }

    pub fn parameter_aliases(&self) -> &ParameterAliasValueAccessor {
        &self.parameter_aliases
    }

    /// Binding mutates the alias cache.
    pub fn parameter_aliases_mut(&mut self) -> &mut ParameterAliasValueAccessor {
        &mut self.parameter_aliases
    }

    /// Service root joined with the resource path:
    /// `http://host/svc/People('1')/Friends`. Without a service root, just the
    /// path.
    pub fn resource_uri(&self, delimiter: KeyDelimiter) -> String {
        let path = self.path.to_resource_path_string(delimiter);
        match &self.service_root {
            Some(root) => format!("{}/{path}", root.trim_end_matches('/')),
            None => path,
        }
    }
}
