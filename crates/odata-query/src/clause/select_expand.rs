//! `$select` and `$expand` items, and the clause that collects them.

use odata_edm::{NavigationProperty, NavigationSource};

use super::{FilterClause, LevelsClause, OrderByClause, SearchClause};
use crate::path::{ODataExpandPath, ODataSelectPath};
use crate::segment::PathSegment;

// ============================================================================
// Items
// ============================================================================

/// `$select=Address/City`, `$select=Friends`, `$select=NS.Action`.
#[derive(Clone, Debug, PartialEq)]
pub struct PathSelectItem {
    path: ODataSelectPath,
}

impl PathSelectItem {
    pub fn new(path: ODataSelectPath) -> Self {
        Self { path }
    }

    pub fn selected_path(&self) -> &ODataSelectPath {
        &self.path
    }
}

/// `$select=NS.*`: every action and function in a namespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NamespaceQualifiedWildcardSelectItem {
    namespace: String,
}

impl NamespaceQualifiedWildcardSelectItem {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_owned(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

/// Setters and accessors for the query options both expand items accept.
macro_rules! expand_options {
    ($name:ident) => {
        impl $name {
            pub fn path(&self) -> &ODataExpandPath {
                &self.path
            }

            pub fn navigation_property(&self) -> &NavigationProperty {
                self.path.navigation_property()
            }

            /// Target of the expanded navigation, when the binding is known.
            pub fn navigation_source(&self) -> Option<&NavigationSource> {
                self.navigation_source.as_ref()
            }

            pub fn with_filter(mut self, filter: FilterClause) -> Self {
                self.filter = Some(filter);
                self
            }

            pub fn with_order_by(mut self, order_by: OrderByClause) -> Self {
                self.order_by = Some(order_by);
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

            pub fn with_search(mut self, search: SearchClause) -> Self {
                self.search = Some(search);
                self
            }

            pub fn filter(&self) -> Option<&FilterClause> {
                self.filter.as_ref()
            }

            pub fn order_by(&self) -> Option<&OrderByClause> {
                self.order_by.as_ref()
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

            pub fn search(&self) -> Option<&SearchClause> {
                self.search.as_ref()
            }
        }
    };
}

/// One level of `$expand=Nav(...)`. Nested options form a tree.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpandedNavigationSelectItem {
    path: ODataExpandPath,
    navigation_source: Option<NavigationSource>,
    select_and_expand: Option<SelectExpandClause>,
    filter: Option<FilterClause>,
    order_by: Option<OrderByClause>,
    top: Option<u64>,
    skip: Option<u64>,
    count: Option<bool>,
    search: Option<SearchClause>,
    levels: Option<LevelsClause>,
}

impl ExpandedNavigationSelectItem {
    pub fn new(path: ODataExpandPath, navigation_source: Option<NavigationSource>) -> Self {
        Self {
            path,
            navigation_source,
            select_and_expand: None,
            filter: None,
            order_by: None,
            top: None,
            skip: None,
            count: None,
            search: None,
            levels: None,
        }
    }

    pub fn with_select_and_expand(mut self, clause: SelectExpandClause) -> Self {
        self.select_and_expand = Some(clause);
        self
    }

    pub fn with_levels(mut self, levels: LevelsClause) -> Self {
        self.levels = Some(levels);
        self
    }

    pub fn select_and_expand(&self) -> Option<&SelectExpandClause> {
        self.select_and_expand.as_ref()
    }

    pub fn levels(&self) -> Option<LevelsClause> {
        self.levels
    }
}

expand_options!(ExpandedNavigationSelectItem);

/// `$expand=Nav/$ref`: links only, so no nested select/expand or levels.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpandedReferenceSelectItem {
    path: ODataExpandPath,
    navigation_source: Option<NavigationSource>,
    filter: Option<FilterClause>,
    order_by: Option<OrderByClause>,
    top: Option<u64>,
    skip: Option<u64>,
    count: Option<bool>,
    search: Option<SearchClause>,
}

impl ExpandedReferenceSelectItem {
    pub fn new(path: ODataExpandPath, navigation_source: Option<NavigationSource>) -> Self {
        Self {
            path,
            navigation_source,
            filter: None,
            order_by: None,
            top: None,
            skip: None,
            count: None,
            search: None,
        }
    }
}

expand_options!(ExpandedReferenceSelectItem);

/// One entry of a [`SelectExpandClause`].
#[derive(Clone, Debug, PartialEq)]
pub enum SelectItem {
    /// `$select=*`.
    Wildcard,
    Path(PathSelectItem),
    NamespaceQualifiedWildcard(NamespaceQualifiedWildcardSelectItem),
    ExpandedNavigation(ExpandedNavigationSelectItem),
    ExpandedReference(ExpandedReferenceSelectItem),
}

impl SelectItem {
    fn selected_segment(&self) -> Option<&PathSegment> {
        match self {
            Self::Path(item) => item.selected_path().last_segment(),
            _ => None,
        }
    }

    /// Selects a plain structural property.
    pub fn is_structural_selection(&self) -> bool {
        matches!(self.selected_segment(), Some(PathSegment::Property(_)))
    }

    /// Selects a plain structural or navigation property. A wildcard already
    /// covers these.
    pub fn is_structural_or_navigation_selection(&self) -> bool {
        matches!(
            self.selected_segment(),
            Some(PathSegment::Property(_) | PathSegment::NavigationProperty(_))
        )
    }

    pub fn translate_with<T, V>(&self, translator: &mut V) -> T
    where
        V: SelectItemTranslator<T> + ?Sized,
    {
        match self {
            Self::Wildcard => translator.translate_wildcard(),
            Self::Path(item) => translator.translate_path(item),
            Self::NamespaceQualifiedWildcard(item) => {
                translator.translate_namespace_qualified_wildcard(item)
            }
            Self::ExpandedNavigation(item) => translator.translate_expanded_navigation(item),
            Self::ExpandedReference(item) => translator.translate_expanded_reference(item),
        }
    }

    pub fn handle_with<H>(&self, handler: &mut H)
    where
        H: SelectItemHandler + ?Sized,
    {
        match self {
            Self::Wildcard => handler.handle_wildcard(),
            Self::Path(item) => handler.handle_path(item),
            Self::NamespaceQualifiedWildcard(item) => {
                handler.handle_namespace_qualified_wildcard(item)
            }
            Self::ExpandedNavigation(item) => handler.handle_expanded_navigation(item),
            Self::ExpandedReference(item) => handler.handle_expanded_reference(item),
        }
    }
}

impl From<PathSelectItem> for SelectItem {
    fn from(item: PathSelectItem) -> Self {
        Self::Path(item)
    }
}

impl From<NamespaceQualifiedWildcardSelectItem> for SelectItem {
    fn from(item: NamespaceQualifiedWildcardSelectItem) -> Self {
        Self::NamespaceQualifiedWildcard(item)
    }
}

impl From<ExpandedNavigationSelectItem> for SelectItem {
    fn from(item: ExpandedNavigationSelectItem) -> Self {
        Self::ExpandedNavigation(item)
    }
}

impl From<ExpandedReferenceSelectItem> for SelectItem {
    fn from(item: ExpandedReferenceSelectItem) -> Self {
        Self::ExpandedReference(item)
    }
}

// ============================================================================
// Traversal
// ============================================================================

pub trait SelectItemTranslator<T> {
    fn translate_wildcard(&mut self) -> T;
    fn translate_path(&mut self, item: &PathSelectItem) -> T;
    fn translate_namespace_qualified_wildcard(
        &mut self,
        item: &NamespaceQualifiedWildcardSelectItem,
    ) -> T;
    fn translate_expanded_navigation(&mut self, item: &ExpandedNavigationSelectItem) -> T;
    fn translate_expanded_reference(&mut self, item: &ExpandedReferenceSelectItem) -> T;
}

pub trait SelectItemHandler {
    fn handle_wildcard(&mut self);
    fn handle_path(&mut self, item: &PathSelectItem);
    fn handle_namespace_qualified_wildcard(&mut self, item: &NamespaceQualifiedWildcardSelectItem);
    fn handle_expanded_navigation(&mut self, item: &ExpandedNavigationSelectItem);
    fn handle_expanded_reference(&mut self, item: &ExpandedReferenceSelectItem);
}

// ============================================================================
// Clause
// ============================================================================

/// The combined `$select` and `$expand` of one resource.
///
/// Items keep insertion order. The selection behaves as a set union:
/// - duplicates are dropped
/// - once a wildcard is present, plain property and navigation selections
///   add nothing
/// - adding a wildcard drops earlier plain structural property selections,
///   but keeps navigation selections, operations, and expansions
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectExpandClause {
    selected_items: Vec<SelectItem>,
    all_selected: bool,
}

impl SelectExpandClause {
    pub fn new(items: impl IntoIterator<Item = SelectItem>, all_selected: bool) -> Self {
        let mut clause = Self {
            selected_items: Vec::new(),
            all_selected,
        };
        for item in items {
            clause.add_selected_item(item);
        }
        clause
    }

    pub fn selected_items(&self) -> &[SelectItem] {
        &self.selected_items
    }

    /// No explicit `$select`: every structural property is selected.
    pub fn all_selected(&self) -> bool {
        self.all_selected
    }

    pub fn has_wildcard(&self) -> bool {
        self.selected_items
            .iter()
            .any(|item| matches!(item, SelectItem::Wildcard))
    }

    /// Expansions directly under this clause, in order.
    pub fn expanded_items(&self) -> impl Iterator<Item = &ExpandedNavigationSelectItem> {
        self.selected_items.iter().filter_map(|item| match item {
            SelectItem::ExpandedNavigation(expanded) => Some(expanded),
            _ => None,
        })
    }

    /// Assembly only: merge `item` into the selection.
    pub fn add_selected_item(&mut self, item: SelectItem) {
        if self.selected_items.contains(&item) {
            return;
        }
        if self.has_wildcard() && item.is_structural_or_navigation_selection() {
            tracing::trace!(?item, "select item covered by wildcard");
            return;
        }
        if matches!(item, SelectItem::Wildcard) {
            self.selected_items
                .retain(|existing| !existing.is_structural_selection());
        }
        self.selected_items.push(item);
    }

    /// Assembly only.
    pub fn set_all_selected(&mut self, all_selected: bool) {
        self.all_selected = all_selected;
    }

    pub fn translate_with<T, V>(&self, translator: &mut V) -> Vec<T>
    where
        V: SelectItemTranslator<T> + ?Sized,
    {
        self.selected_items
            .iter()
            .map(|item| item.translate_with(translator))
            .collect()
    }

    pub fn handle_with<H>(&self, handler: &mut H)
    where
        H: SelectItemHandler + ?Sized,
    {
        for item in &self.selected_items {
            item.handle_with(handler);
        }
    }
}
