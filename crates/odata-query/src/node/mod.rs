//! Bound expression tree for `$filter`, `$orderby`, and function arguments.
//!
//! [`QueryNode`] is a closed sum type with one variant per node kind. Every
//! node is validated when constructed and never changes afterwards. Result
//! types are computed on demand from the stored fields, so repeated calls
//! always agree.
//!
//! Nodes fall into five categories (see [`NodeCategory`]). Positions that
//! accept "a single value" also accept single resources, and positions that
//! accept "a collection" also accept entity collections.

mod nodes;
mod operator;
mod visitor;


use odata_edm::{EdmTypeReference, EntityType, NavigationSource};

pub use nodes::{
    AllNode, AnyNode, BinaryOperatorNode, CollectionConstantNode, CollectionNavigationNode,
    CollectionOpenPropertyAccessNode, CollectionPropertyAccessNode, CollectionPropertyCastNode,
    ConstantNode, ConvertNode, CountNode, EntityCollectionCastNode,
    EntityCollectionFunctionCallNode, EntitySetNode, InNode, KeyLookupNode, KeyPropertyValue,
    NamedFunctionParameterNode, NonResourceRangeVariableReferenceNode, ParameterAliasNode,
    ResourceRangeVariableReferenceNode, SearchTermNode, SingleEntityFunctionCallNode,
    SingleNavigationNode, SingleResourceCastNode, SingleValueCastNode,
    SingleValueFunctionCallNode, SingleValueOpenPropertyAccessNode,
    SingleValuePropertyAccessNode, UnaryOperatorNode,
};
pub use operator::{BinaryOperatorKind, UnaryOperatorKind};
pub use visitor::QueryNodeVisitor;

use crate::range_variable::RangeVariableKind;

/// A bound expression node.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryNode {
    Constant(ConstantNode),
    CollectionConstant(CollectionConstantNode),
    Convert(ConvertNode),
    BinaryOperator(BinaryOperatorNode),
    UnaryOperator(UnaryOperatorNode),
    SingleValuePropertyAccess(SingleValuePropertyAccessNode),
    SingleValueOpenPropertyAccess(SingleValueOpenPropertyAccessNode),
    CollectionPropertyAccess(CollectionPropertyAccessNode),
    CollectionOpenPropertyAccess(CollectionOpenPropertyAccessNode),
    SingleValueCast(SingleValueCastNode),
    CollectionPropertyCast(CollectionPropertyCastNode),
    SingleResourceCast(SingleResourceCastNode),
    EntityCollectionCast(EntityCollectionCastNode),
    NonResourceRangeVariableReference(NonResourceRangeVariableReferenceNode),
    ResourceRangeVariableReference(ResourceRangeVariableReferenceNode),
    SingleNavigation(SingleNavigationNode),
    CollectionNavigation(CollectionNavigationNode),
    SingleValueFunctionCall(SingleValueFunctionCallNode),
    SingleEntityFunctionCall(SingleEntityFunctionCallNode),
    EntityCollectionFunctionCall(EntityCollectionFunctionCallNode),
    NamedFunctionParameter(NamedFunctionParameterNode),
    ParameterAlias(ParameterAliasNode),
    SearchTerm(SearchTermNode),
    KeyLookup(KeyLookupNode),
    Any(AnyNode),
    All(AllNode),
    In(InNode),
    Count(CountNode),
    /// Legacy form of an entity set reference.
    EntitySet(EntitySetNode),
}

/// Kind tag of a [`QueryNode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryNodeKind {
    Constant,
    CollectionConstant,
    Convert,
    BinaryOperator,
    UnaryOperator,
    SingleValuePropertyAccess,
    SingleValueOpenPropertyAccess,
    CollectionPropertyAccess,
    CollectionOpenPropertyAccess,
    SingleValueCast,
    CollectionPropertyCast,
    SingleResourceCast,
    EntityCollectionCast,
    NonResourceRangeVariableReference,
    ResourceRangeVariableReference,
    SingleNavigation,
    CollectionNavigation,
    SingleValueFunctionCall,
    SingleEntityFunctionCall,
    EntityCollectionFunctionCall,
    NamedFunctionParameter,
    ParameterAlias,
    SearchTerm,
    KeyLookup,
    Any,
    All,
    In,
    Count,
    EntitySet,
}

/// Cardinality and domain of a node's result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    SingleValue,
    Collection,
    SingleResource,
    CollectionResource,
    /// Named function argument; only valid inside a function call.
    Parameter,
}

impl NodeCategory {
    pub fn is_single(self) -> bool {
        matches!(self, Self::SingleValue | Self::SingleResource)
    }

    pub fn is_collection(self) -> bool {
        matches!(self, Self::Collection | Self::CollectionResource)
    }

    pub fn is_resource(self) -> bool {
        matches!(self, Self::SingleResource | Self::CollectionResource)
    }
}

impl std::fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SingleValue => "a single value",
            Self::Collection => "a collection",
            Self::SingleResource => "a single resource",
            Self::CollectionResource => "a resource collection",
            Self::Parameter => "a named parameter",
        };
        f.write_str(s)
    }
}

/// Node construction failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeError {
    #[error("{0} name must not be empty")]
    EmptyName(&'static str),

    #[error("{node:?} expects {expected} as {role}, found {found}")]
    Category {
        node: QueryNodeKind,
        role: &'static str,
        expected: &'static str,
        found: NodeCategory,
    },

    #[error("{node:?} requires a structural property, `{property}` is a navigation property")]
    NavigationProperty {
        node: QueryNodeKind,
        property: String,
    },

    #[error("{node:?} requires a collection-valued property, `{property}` is single-valued")]
    NotCollectionProperty {
        node: QueryNodeKind,
        property: String,
    },

    #[error("{node:?} requires a single-valued property, `{property}` is collection-valued")]
    CollectionProperty {
        node: QueryNodeKind,
        property: String,
    },

    #[error("{node:?} cannot navigate `{property}`: {reason}")]
    NavigationMultiplicity {
        node: QueryNodeKind,
        property: String,
        reason: &'static str,
    },

    #[error("function `{function}` cannot return `{type_name}`: {reason}")]
    ReturnType {
        function: String,
        type_name: String,
        reason: &'static str,
    },

    #[error("{node:?} requires a {expected} range variable, `{name}` is {found}")]
    RangeVariableKind {
        node: QueryNodeKind,
        name: String,
        expected: RangeVariableKind,
        found: RangeVariableKind,
    },

    #[error("range variable `{name}` cannot iterate entity type `{type_name}` as values")]
    RangeVariableType { name: String, type_name: String },

    #[error("`{0}` is not a collection type")]
    NotCollectionType(String),

    #[error("parameter alias `{0}` must be `@` followed by a name")]
    InvalidAlias(String),

    #[error("key lookup requires at least one key value")]
    EmptyKey,

    #[error("{clause} expression must be {expected}, found {found}")]
    ClauseExpression {
        clause: &'static str,
        expected: &'static str,
        found: String,
    },
}

pub(crate) fn reject(err: NodeError) -> NodeError {
    tracing::debug!(%err, "query node rejected");
    err
}

/// Ensure `operand` has the shape `node` expects in `role`.
pub(crate) fn expect_single(
    node: QueryNodeKind,
    role: &'static str,
    operand: &QueryNode,
) -> Result<(), NodeError> {
    expect(node, role, operand, NodeCategory::is_single, "a single value")
}

pub(crate) fn expect_collection(
    node: QueryNodeKind,
    role: &'static str,
    operand: &QueryNode,
) -> Result<(), NodeError> {
    expect(node, role, operand, NodeCategory::is_collection, "a collection")
}

pub(crate) fn expect_category(
    node: QueryNodeKind,
    role: &'static str,
    operand: &QueryNode,
    category: NodeCategory,
) -> Result<(), NodeError> {
    let expected = match category {
        NodeCategory::SingleValue => "a single value",
        NodeCategory::Collection => "a collection",
        NodeCategory::SingleResource => "a single resource",
        NodeCategory::CollectionResource => "a resource collection",
        NodeCategory::Parameter => "a named parameter",
    };
    expect(node, role, operand, |c| c == category, expected)
}

fn expect(
    node: QueryNodeKind,
    role: &'static str,
    operand: &QueryNode,
    accepts: impl Fn(NodeCategory) -> bool,
    expected: &'static str,
) -> Result<(), NodeError> {
    let found = operand.category();
    if accepts(found) {
        return Ok(());
    }
    Err(reject(NodeError::Category {
        node,
        role,
        expected,
        found,
    }))
}

impl QueryNode {
    pub fn kind(&self) -> QueryNodeKind {
        match self {
            Self::Constant(_) => QueryNodeKind::Constant,
            Self::CollectionConstant(_) => QueryNodeKind::CollectionConstant,
            Self::Convert(_) => QueryNodeKind::Convert,
            Self::BinaryOperator(_) => QueryNodeKind::BinaryOperator,
            Self::UnaryOperator(_) => QueryNodeKind::UnaryOperator,
            Self::SingleValuePropertyAccess(_) => QueryNodeKind::SingleValuePropertyAccess,
            Self::SingleValueOpenPropertyAccess(_) => QueryNodeKind::SingleValueOpenPropertyAccess,
            Self::CollectionPropertyAccess(_) => QueryNodeKind::CollectionPropertyAccess,
            Self::CollectionOpenPropertyAccess(_) => QueryNodeKind::CollectionOpenPropertyAccess,
            Self::SingleValueCast(_) => QueryNodeKind::SingleValueCast,
            Self::CollectionPropertyCast(_) => QueryNodeKind::CollectionPropertyCast,
            Self::SingleResourceCast(_) => QueryNodeKind::SingleResourceCast,
            Self::EntityCollectionCast(_) => QueryNodeKind::EntityCollectionCast,
            Self::NonResourceRangeVariableReference(_) => {
                QueryNodeKind::NonResourceRangeVariableReference
            }
            Self::ResourceRangeVariableReference(_) => {
                QueryNodeKind::ResourceRangeVariableReference
            }
            Self::SingleNavigation(_) => QueryNodeKind::SingleNavigation,
            Self::CollectionNavigation(_) => QueryNodeKind::CollectionNavigation,
            Self::SingleValueFunctionCall(_) => QueryNodeKind::SingleValueFunctionCall,
            Self::SingleEntityFunctionCall(_) => QueryNodeKind::SingleEntityFunctionCall,
            Self::EntityCollectionFunctionCall(_) => QueryNodeKind::EntityCollectionFunctionCall,
            Self::NamedFunctionParameter(_) => QueryNodeKind::NamedFunctionParameter,
            Self::ParameterAlias(_) => QueryNodeKind::ParameterAlias,
            Self::SearchTerm(_) => QueryNodeKind::SearchTerm,
            Self::KeyLookup(_) => QueryNodeKind::KeyLookup,
            Self::Any(_) => QueryNodeKind::Any,
            Self::All(_) => QueryNodeKind::All,
            Self::In(_) => QueryNodeKind::In,
            Self::Count(_) => QueryNodeKind::Count,
            Self::EntitySet(_) => QueryNodeKind::EntitySet,
        }
    }

    pub fn category(&self) -> NodeCategory {
        match self.kind() {
            QueryNodeKind::Constant
            | QueryNodeKind::Convert
            | QueryNodeKind::BinaryOperator
            | QueryNodeKind::UnaryOperator
            | QueryNodeKind::SingleValuePropertyAccess
            | QueryNodeKind::SingleValueOpenPropertyAccess
            | QueryNodeKind::SingleValueCast
            | QueryNodeKind::NonResourceRangeVariableReference
            | QueryNodeKind::SingleValueFunctionCall
            | QueryNodeKind::ParameterAlias
            | QueryNodeKind::SearchTerm
            | QueryNodeKind::Any
            | QueryNodeKind::All
            | QueryNodeKind::In
            | QueryNodeKind::Count => NodeCategory::SingleValue,

            QueryNodeKind::CollectionConstant
            | QueryNodeKind::CollectionPropertyAccess
            | QueryNodeKind::CollectionOpenPropertyAccess
            | QueryNodeKind::CollectionPropertyCast => NodeCategory::Collection,

            QueryNodeKind::SingleResourceCast
            | QueryNodeKind::ResourceRangeVariableReference
            | QueryNodeKind::SingleNavigation
            | QueryNodeKind::SingleEntityFunctionCall
            | QueryNodeKind::KeyLookup => NodeCategory::SingleResource,

            QueryNodeKind::EntityCollectionCast
            | QueryNodeKind::CollectionNavigation
            | QueryNodeKind::EntityCollectionFunctionCall
            | QueryNodeKind::EntitySet => NodeCategory::CollectionResource,

            QueryNodeKind::NamedFunctionParameter => NodeCategory::Parameter,
        }
    }

    /// Result type. Collections report their collection type; open
    /// properties and untyped aliases report `None`.
    pub fn type_reference(&self) -> Option<EdmTypeReference> {
        match self {
            Self::Constant(n) => n.type_reference(),
            Self::Convert(n) => Some(n.target_type().clone()),
            Self::BinaryOperator(n) => n.type_reference(),
            Self::UnaryOperator(n) => n.type_reference(),
            Self::SingleValuePropertyAccess(n) => Some(n.type_reference()),
            Self::SingleValueOpenPropertyAccess(_) => None,
            Self::SingleValueCast(n) => Some(n.type_reference()),
            Self::NonResourceRangeVariableReference(n) => n.type_reference(),
            Self::SingleValueFunctionCall(n) => n.return_type().cloned(),
            Self::ParameterAlias(n) => n.type_reference().cloned(),
            Self::SearchTerm(n) => Some(n.type_reference()),
            Self::Any(n) => Some(n.type_reference()),
            Self::All(n) => Some(n.type_reference()),
            Self::In(n) => Some(n.type_reference()),
            Self::Count(n) => Some(n.type_reference()),
            Self::SingleResourceCast(n) => Some(n.type_reference()),
            Self::ResourceRangeVariableReference(n) => n.type_reference(),
            Self::SingleNavigation(n) => Some(n.type_reference()),
            Self::SingleEntityFunctionCall(n) => Some(n.return_type().clone()),
            Self::KeyLookup(n) => n.type_reference(),
            Self::NamedFunctionParameter(n) => n.value().type_reference(),
            Self::CollectionConstant(_)
            | Self::CollectionPropertyAccess(_)
            | Self::CollectionOpenPropertyAccess(_)
            | Self::CollectionPropertyCast(_)
            | Self::EntityCollectionCast(_)
            | Self::CollectionNavigation(_)
            | Self::EntityCollectionFunctionCall(_)
            | Self::EntitySet(_) => self.collection_type(),
        }
    }

    /// Element type of a collection node. `None` for single nodes.
    pub fn item_type(&self) -> Option<EdmTypeReference> {
        match self {
            Self::CollectionConstant(n) => n.item_type(),
            Self::CollectionPropertyAccess(n) => n.item_type(),
            Self::CollectionOpenPropertyAccess(_) => None,
            Self::CollectionPropertyCast(n) => Some(n.item_type()),
            Self::EntityCollectionCast(n) => Some(n.item_type()),
            Self::CollectionNavigation(n) => Some(n.item_type()),
            Self::EntityCollectionFunctionCall(n) => n.item_type(),
            Self::EntitySet(n) => Some(n.item_type()),
            _ => None,
        }
    }

    /// `Collection(item)` for collection nodes.
    pub fn collection_type(&self) -> Option<EdmTypeReference> {
        if !self.category().is_collection() {
            return None;
        }
        self.item_type().map(EdmTypeReference::collection)
    }

    /// Entity type of a resource node, or of each element of a resource
    /// collection.
    pub fn entity_item_type(&self) -> Option<EntityType> {
        match self.category() {
            NodeCategory::SingleResource => self.type_reference()?.as_entity().cloned(),
            NodeCategory::CollectionResource => self.item_type()?.as_entity().cloned(),
            _ => None,
        }
    }

    /// Entity set or singleton the resources come from, when known.
    pub fn navigation_source(&self) -> Option<NavigationSource> {
        match self {
            Self::SingleResourceCast(n) => n.navigation_source(),
            Self::EntityCollectionCast(n) => n.navigation_source(),
            Self::ResourceRangeVariableReference(n) => n.navigation_source(),
            Self::SingleNavigation(n) => n.navigation_source().cloned(),
            Self::CollectionNavigation(n) => n.navigation_source().cloned(),
            Self::SingleEntityFunctionCall(n) => n.navigation_source().cloned(),
            Self::EntityCollectionFunctionCall(n) => n.navigation_source().cloned(),
            Self::KeyLookup(n) => n.navigation_source(),
            Self::EntitySet(n) => Some(n.navigation_source()),
            _ => None,
        }
    }

    /// Dispatch to the visitor method for this node's kind.
    pub fn accept<T, V>(&self, visitor: &mut V) -> T
    where
        V: QueryNodeVisitor<T> + ?Sized,
    {
        match self {
            Self::Constant(n) => visitor.visit_constant(n),
            Self::CollectionConstant(n) => visitor.visit_collection_constant(n),
            Self::Convert(n) => visitor.visit_convert(n),
            Self::BinaryOperator(n) => visitor.visit_binary_operator(n),
            Self::UnaryOperator(n) => visitor.visit_unary_operator(n),
            Self::SingleValuePropertyAccess(n) => visitor.visit_single_value_property_access(n),
            Self::SingleValueOpenPropertyAccess(n) => {
                visitor.visit_single_value_open_property_access(n)
            }
            Self::CollectionPropertyAccess(n) => visitor.visit_collection_property_access(n),
            Self::CollectionOpenPropertyAccess(n) => {
                visitor.visit_collection_open_property_access(n)
            }
            Self::SingleValueCast(n) => visitor.visit_single_value_cast(n),
            Self::CollectionPropertyCast(n) => visitor.visit_collection_property_cast(n),
            Self::SingleResourceCast(n) => visitor.visit_single_resource_cast(n),
            Self::EntityCollectionCast(n) => visitor.visit_entity_collection_cast(n),
            Self::NonResourceRangeVariableReference(n) => {
                visitor.visit_non_resource_range_variable_reference(n)
            }
            Self::ResourceRangeVariableReference(n) => {
                visitor.visit_resource_range_variable_reference(n)
            }
            Self::SingleNavigation(n) => visitor.visit_single_navigation(n),
            Self::CollectionNavigation(n) => visitor.visit_collection_navigation(n),
            Self::SingleValueFunctionCall(n) => visitor.visit_single_value_function_call(n),
            Self::SingleEntityFunctionCall(n) => visitor.visit_single_entity_function_call(n),
            Self::EntityCollectionFunctionCall(n) => {
                visitor.visit_entity_collection_function_call(n)
            }
            Self::NamedFunctionParameter(n) => visitor.visit_named_function_parameter(n),
            Self::ParameterAlias(n) => visitor.visit_parameter_alias(n),
            Self::SearchTerm(n) => visitor.visit_search_term(n),
            Self::KeyLookup(n) => visitor.visit_key_lookup(n),
            Self::Any(n) => visitor.visit_any(n),
            Self::All(n) => visitor.visit_all(n),
            Self::In(n) => visitor.visit_in(n),
            Self::Count(n) => visitor.visit_count(n),
            Self::EntitySet(n) => visitor.visit_entity_set(n),
        }
    }
}

macro_rules! impl_from_node {
    ($($variant:ident($node:ty)),* $(,)?) => {
        $(
            impl From<$node> for QueryNode {
                fn from(node: $node) -> Self {
                    Self::$variant(node)
                }
            }
        )*
    };
}

impl_from_node!(
    Constant(ConstantNode),
    CollectionConstant(CollectionConstantNode),
    Convert(ConvertNode),
    BinaryOperator(BinaryOperatorNode),
    UnaryOperator(UnaryOperatorNode),
    SingleValuePropertyAccess(SingleValuePropertyAccessNode),
    SingleValueOpenPropertyAccess(SingleValueOpenPropertyAccessNode),
    CollectionPropertyAccess(CollectionPropertyAccessNode),
    CollectionOpenPropertyAccess(CollectionOpenPropertyAccessNode),
    SingleValueCast(SingleValueCastNode),
    CollectionPropertyCast(CollectionPropertyCastNode),
    SingleResourceCast(SingleResourceCastNode),
    EntityCollectionCast(EntityCollectionCastNode),
    NonResourceRangeVariableReference(NonResourceRangeVariableReferenceNode),
    ResourceRangeVariableReference(ResourceRangeVariableReferenceNode),
    SingleNavigation(SingleNavigationNode),
    CollectionNavigation(CollectionNavigationNode),
    SingleValueFunctionCall(SingleValueFunctionCallNode),
    SingleEntityFunctionCall(SingleEntityFunctionCallNode),
    EntityCollectionFunctionCall(EntityCollectionFunctionCallNode),
    NamedFunctionParameter(NamedFunctionParameterNode),
    ParameterAlias(ParameterAliasNode),
    SearchTerm(SearchTermNode),
    KeyLookup(KeyLookupNode),
    Any(AnyNode),
    All(AllNode),
    In(InNode),
    Count(CountNode),
    EntitySet(EntitySetNode),
);
