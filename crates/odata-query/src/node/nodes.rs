//! Concrete node types.

use odata_edm::{
    ComplexType, EdmType, EdmTypeReference, EntitySet, EntityType, LiteralValue,
    NavigationProperty, NavigationSource, Operation, PrimitiveKind, Property, StructuralProperty,
};

use super::operator::{BinaryOperatorKind, UnaryOperatorKind};
use super::{
    NodeCategory, NodeError, QueryNode, QueryNodeKind, expect_category, expect_collection,
    expect_single, reject,
};
use crate::range_variable::{RangeVariable, RangeVariableKind};

fn check_name(what: &'static str, name: &str) -> Result<(), NodeError> {
    if name.is_empty() {
        return Err(reject(NodeError::EmptyName(what)));
    }
    Ok(())
}

/// Nullability of an operand's type; unknown types count as nullable.
fn nullable_or_unknown(node: &QueryNode) -> bool {
    node.type_reference().is_none_or(|t| t.is_nullable())
}

// ============================================================================
// Constants and conversions
// ============================================================================

/// A literal value.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstantNode {
    value: LiteralValue,
    literal_text: String,
    type_reference: Option<EdmTypeReference>,
}

impl ConstantNode {
    /// Literal text defaults to the value's URI literal form.
    pub fn new(value: LiteralValue) -> Self {
        let literal_text = value.to_uri_literal();
        Self {
            value,
            literal_text,
            type_reference: None,
        }
    }

    /// Keep the literal exactly as it was written in the URI.
    pub fn with_text(value: LiteralValue, literal_text: impl Into<String>) -> Self {
        Self {
            value,
            literal_text: literal_text.into(),
            type_reference: None,
        }
    }

    /// Explicit type, used when the binder promoted the literal (e.g. an
    /// integer written where a `Edm.Decimal` is expected).
    pub fn typed(
        value: LiteralValue,
        literal_text: impl Into<String>,
        type_reference: EdmTypeReference,
    ) -> Self {
        Self {
            value,
            literal_text: literal_text.into(),
            type_reference: Some(type_reference),
        }
    }

    pub fn value(&self) -> &LiteralValue {
        &self.value
    }

    pub fn literal_text(&self) -> &str {
        &self.literal_text
    }

    /// Explicit type, otherwise the type of the runtime value. `None` for null.
    pub fn type_reference(&self) -> Option<EdmTypeReference> {
        self.type_reference
            .clone()
            .or_else(|| self.value.type_reference())
    }
}

/// A list literal such as the right side of `in`.
#[derive(Clone, Debug, PartialEq)]
pub struct CollectionConstantNode {
    items: Vec<ConstantNode>,
    literal_text: String,
    collection_type: EdmTypeReference,
}

impl CollectionConstantNode {
    pub fn new(
        items: Vec<ConstantNode>,
        collection_type: EdmTypeReference,
    ) -> Result<Self, NodeError> {
        if !collection_type.is_collection() {
            return Err(reject(NodeError::NotCollectionType(
                collection_type.full_name(),
            )));
        }
        let texts: Vec<&str> = items.iter().map(ConstantNode::literal_text).collect();
        let literal_text = format!("({})", texts.join(","));
        Ok(Self {
            items,
            literal_text,
            collection_type,
        })
    }

    pub fn items(&self) -> &[ConstantNode] {
        &self.items
    }

    pub fn literal_text(&self) -> &str {
        &self.literal_text
    }

    pub fn item_type(&self) -> Option<EdmTypeReference> {
        self.collection_type.element_type().cloned()
    }
}

/// Implicit type promotion of a single value.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvertNode {
    source: Box<QueryNode>,
    target_type: EdmTypeReference,
}

impl ConvertNode {
    pub fn new(source: QueryNode, target_type: EdmTypeReference) -> Result<Self, NodeError> {
        expect_single(QueryNodeKind::Convert, "source", &source)?;
        Ok(Self {
            source: Box::new(source),
            target_type,
        })
    }

    pub fn source(&self) -> &QueryNode {
        &self.source
    }

    pub fn target_type(&self) -> &EdmTypeReference {
        &self.target_type
    }
}

// ============================================================================
// Operators
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct BinaryOperatorNode {
    operator: BinaryOperatorKind,
    left: Box<QueryNode>,
    right: Box<QueryNode>,
}

impl BinaryOperatorNode {
    pub fn new(
        operator: BinaryOperatorKind,
        left: QueryNode,
        right: QueryNode,
    ) -> Result<Self, NodeError> {
        expect_single(QueryNodeKind::BinaryOperator, "left operand", &left)?;
        expect_single(QueryNodeKind::BinaryOperator, "right operand", &right)?;
        Ok(Self {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn operator(&self) -> BinaryOperatorKind {
        self.operator
    }

    pub fn left(&self) -> &QueryNode {
        &self.left
    }

    pub fn right(&self) -> &QueryNode {
        &self.right
    }

    /// Boolean for logical, comparison, and `has`; the operand type for
    /// arithmetic.
    pub fn type_reference(&self) -> Option<EdmTypeReference> {
        if self.operator.is_arithmetic() {
            return self
                .left
                .type_reference()
                .or_else(|| self.right.type_reference());
        }
        let nullable = nullable_or_unknown(&self.left) || nullable_or_unknown(&self.right);
        Some(EdmTypeReference::boolean(nullable))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnaryOperatorNode {
    operator: UnaryOperatorKind,
    operand: Box<QueryNode>,
}

impl UnaryOperatorNode {
    pub fn new(operator: UnaryOperatorKind, operand: QueryNode) -> Result<Self, NodeError> {
        expect_single(QueryNodeKind::UnaryOperator, "operand", &operand)?;
        Ok(Self {
            operator,
            operand: Box::new(operand),
        })
    }

    pub fn operator(&self) -> UnaryOperatorKind {
        self.operator
    }

    pub fn operand(&self) -> &QueryNode {
        &self.operand
    }

    pub fn type_reference(&self) -> Option<EdmTypeReference> {
        match self.operator {
            UnaryOperatorKind::Not => Some(EdmTypeReference::boolean(nullable_or_unknown(
                &self.operand,
            ))),
            UnaryOperatorKind::Negate => self.operand.type_reference(),
        }
    }
}

// ============================================================================
// Property access
// ============================================================================

fn structural(node: QueryNodeKind, property: Property) -> Result<StructuralProperty, NodeError> {
    match property {
        Property::Structural(p) => Ok(p),
        Property::Navigation(p) => Err(reject(NodeError::NavigationProperty {
            node,
            property: p.name().to_owned(),
        })),
    }
}

/// Single-valued structural property of a single value or resource.
#[derive(Clone, Debug, PartialEq)]
pub struct SingleValuePropertyAccessNode {
    source: Box<QueryNode>,
    property: StructuralProperty,
}

impl SingleValuePropertyAccessNode {
    pub fn new(source: QueryNode, property: impl Into<Property>) -> Result<Self, NodeError> {
        let kind = QueryNodeKind::SingleValuePropertyAccess;
        let property = structural(kind, property.into())?;
        if property.is_collection() {
            return Err(reject(NodeError::CollectionProperty {
                node: kind,
                property: property.name().to_owned(),
            }));
        }
        expect_single(kind, "source", &source)?;
        Ok(Self {
            source: Box::new(source),
            property,
        })
    }

    pub fn source(&self) -> &QueryNode {
        &self.source
    }

    pub fn property(&self) -> &StructuralProperty {
        &self.property
    }

    pub fn type_reference(&self) -> EdmTypeReference {
        self.property.type_reference()
    }
}

/// Collection-valued structural property.
#[derive(Clone, Debug, PartialEq)]
pub struct CollectionPropertyAccessNode {
    source: Box<QueryNode>,
    property: StructuralProperty,
}

impl CollectionPropertyAccessNode {
    pub fn new(source: QueryNode, property: impl Into<Property>) -> Result<Self, NodeError> {
        let kind = QueryNodeKind::CollectionPropertyAccess;
        let property = structural(kind, property.into())?;
        if !property.is_collection() {
            return Err(reject(NodeError::NotCollectionProperty {
                node: kind,
                property: property.name().to_owned(),
            }));
        }
        expect_single(kind, "source", &source)?;
        Ok(Self {
            source: Box::new(source),
            property,
        })
    }

    pub fn source(&self) -> &QueryNode {
        &self.source
    }

    pub fn property(&self) -> &StructuralProperty {
        &self.property
    }

    pub fn item_type(&self) -> Option<EdmTypeReference> {
        self.property.type_reference().element_type().cloned()
    }
}

/// Dynamic property of an open type. Its type is unknown.
#[derive(Clone, Debug, PartialEq)]
pub struct SingleValueOpenPropertyAccessNode {
    source: Box<QueryNode>,
    name: String,
}

impl SingleValueOpenPropertyAccessNode {
    pub fn new(source: QueryNode, name: &str) -> Result<Self, NodeError> {
        check_name("open property", name)?;
        expect_single(QueryNodeKind::SingleValueOpenPropertyAccess, "source", &source)?;
        Ok(Self {
            source: Box::new(source),
            name: name.to_owned(),
        })
    }

    pub fn source(&self) -> &QueryNode {
        &self.source
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Collection-valued dynamic property of an open type.
#[derive(Clone, Debug, PartialEq)]
pub struct CollectionOpenPropertyAccessNode {
    source: Box<QueryNode>,
    name: String,
}

impl CollectionOpenPropertyAccessNode {
    pub fn new(source: QueryNode, name: &str) -> Result<Self, NodeError> {
        check_name("open property", name)?;
        expect_single(QueryNodeKind::CollectionOpenPropertyAccess, "source", &source)?;
        Ok(Self {
            source: Box::new(source),
            name: name.to_owned(),
        })
    }

    pub fn source(&self) -> &QueryNode {
        &self.source
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// Casts
// ============================================================================
//
// Relatedness between the source type and the cast target is the binder's
// responsibility.

#[derive(Clone, Debug, PartialEq)]
pub struct SingleValueCastNode {
    source: Box<QueryNode>,
    target: ComplexType,
}

impl SingleValueCastNode {
    pub fn new(source: QueryNode, target: ComplexType) -> Result<Self, NodeError> {
        expect_single(QueryNodeKind::SingleValueCast, "source", &source)?;
        Ok(Self {
            source: Box::new(source),
            target,
        })
    }

    pub fn source(&self) -> &QueryNode {
        &self.source
    }

    pub fn target(&self) -> &ComplexType {
        &self.target
    }

    pub fn type_reference(&self) -> EdmTypeReference {
        self.target
            .to_type_reference(nullable_or_unknown(&self.source))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CollectionPropertyCastNode {
    source: Box<QueryNode>,
    target: ComplexType,
}

impl CollectionPropertyCastNode {
    pub fn new(source: QueryNode, target: ComplexType) -> Result<Self, NodeError> {
        expect_category(
            QueryNodeKind::CollectionPropertyCast,
            "source",
            &source,
            NodeCategory::Collection,
        )?;
        Ok(Self {
            source: Box::new(source),
            target,
        })
    }

    pub fn source(&self) -> &QueryNode {
        &self.source
    }

    pub fn target(&self) -> &ComplexType {
        &self.target
    }

    pub fn item_type(&self) -> EdmTypeReference {
        let nullable = self.source.item_type().is_none_or(|t| t.is_nullable());
        self.target.to_type_reference(nullable)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SingleResourceCastNode {
    source: Box<QueryNode>,
    target: EntityType,
}

impl SingleResourceCastNode {
    pub fn new(source: QueryNode, target: EntityType) -> Result<Self, NodeError> {
        expect_category(
            QueryNodeKind::SingleResourceCast,
            "source",
            &source,
            NodeCategory::SingleResource,
        )?;
        Ok(Self {
            source: Box::new(source),
            target,
        })
    }

    pub fn source(&self) -> &QueryNode {
        &self.source
    }

    pub fn target(&self) -> &EntityType {
        &self.target
    }

    pub fn type_reference(&self) -> EdmTypeReference {
        let nullable = self.source.type_reference().is_some_and(|t| t.is_nullable());
        self.target.to_type_reference(nullable)
    }

    pub fn navigation_source(&self) -> Option<NavigationSource> {
        self.source.navigation_source()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EntityCollectionCastNode {
    source: Box<QueryNode>,
    target: EntityType,
}

impl EntityCollectionCastNode {
    pub fn new(source: QueryNode, target: EntityType) -> Result<Self, NodeError> {
        expect_category(
            QueryNodeKind::EntityCollectionCast,
            "source",
            &source,
            NodeCategory::CollectionResource,
        )?;
        Ok(Self {
            source: Box::new(source),
            target,
        })
    }

    pub fn source(&self) -> &QueryNode {
        &self.source
    }

    pub fn target(&self) -> &EntityType {
        &self.target
    }

    pub fn item_type(&self) -> EdmTypeReference {
        self.target.to_type_reference(false)
    }

    pub fn navigation_source(&self) -> Option<NavigationSource> {
        self.source.navigation_source()
    }
}

// ============================================================================
// Range variable references
// ============================================================================

fn expect_range_variable(
    node: QueryNodeKind,
    range_variable: &RangeVariable,
    expected: RangeVariableKind,
) -> Result<(), NodeError> {
    if range_variable.kind() == expected {
        return Ok(());
    }
    Err(reject(NodeError::RangeVariableKind {
        node,
        name: range_variable.name().to_owned(),
        expected,
        found: range_variable.kind(),
    }))
}

#[derive(Clone, Debug, PartialEq)]
pub struct NonResourceRangeVariableReferenceNode {
    range_variable: RangeVariable,
}

impl NonResourceRangeVariableReferenceNode {
    pub fn new(range_variable: RangeVariable) -> Result<Self, NodeError> {
        expect_range_variable(
            QueryNodeKind::NonResourceRangeVariableReference,
            &range_variable,
            RangeVariableKind::NonResource,
        )?;
        Ok(Self { range_variable })
    }

    pub fn name(&self) -> &str {
        self.range_variable.name()
    }

    pub fn range_variable(&self) -> &RangeVariable {
        &self.range_variable
    }

    pub fn type_reference(&self) -> Option<EdmTypeReference> {
        self.range_variable.type_reference().cloned()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResourceRangeVariableReferenceNode {
    range_variable: RangeVariable,
}

impl ResourceRangeVariableReferenceNode {
    pub fn new(range_variable: RangeVariable) -> Result<Self, NodeError> {
        expect_range_variable(
            QueryNodeKind::ResourceRangeVariableReference,
            &range_variable,
            RangeVariableKind::Resource,
        )?;
        Ok(Self { range_variable })
    }

    pub fn name(&self) -> &str {
        self.range_variable.name()
    }

    pub fn range_variable(&self) -> &RangeVariable {
        &self.range_variable
    }

    pub fn type_reference(&self) -> Option<EdmTypeReference> {
        self.range_variable.type_reference().cloned()
    }

    pub fn navigation_source(&self) -> Option<NavigationSource> {
        self.range_variable.navigation_source().cloned()
    }
}

// ============================================================================
// Navigation
// ============================================================================

fn binding_target(source: &QueryNode, property: &NavigationProperty) -> Option<NavigationSource> {
    source
        .navigation_source()?
        .find_navigation_target(property)
}

/// Single-valued navigation property.
#[derive(Clone, Debug, PartialEq)]
pub struct SingleNavigationNode {
    source: Box<QueryNode>,
    property: NavigationProperty,
    navigation_source: Option<NavigationSource>,
}

impl SingleNavigationNode {
    /// The target navigation source follows the source's binding for
    /// `property`, when there is one.
    pub fn new(source: QueryNode, property: NavigationProperty) -> Result<Self, NodeError> {
        let kind = QueryNodeKind::SingleNavigation;
        if property.is_collection() {
            return Err(reject(NodeError::NavigationMultiplicity {
                node: kind,
                property: property.name().to_owned(),
                reason: "the property is collection-valued",
            }));
        }
        expect_single(kind, "source", &source)?;
        let navigation_source = binding_target(&source, &property);
        Ok(Self {
            source: Box::new(source),
            property,
            navigation_source,
        })
    }

    /// Override the navigation source derived from bindings.
    pub fn with_navigation_source(mut self, navigation_source: Option<NavigationSource>) -> Self {
        self.navigation_source = navigation_source;
        self
    }

    pub fn source(&self) -> &QueryNode {
        &self.source
    }

    pub fn property(&self) -> &NavigationProperty {
        &self.property
    }

    pub fn navigation_source(&self) -> Option<&NavigationSource> {
        self.navigation_source.as_ref()
    }

    pub fn type_reference(&self) -> EdmTypeReference {
        self.property.type_reference()
    }
}

/// Collection-valued navigation property.
#[derive(Clone, Debug, PartialEq)]
pub struct CollectionNavigationNode {
    source: Box<QueryNode>,
    property: NavigationProperty,
    navigation_source: Option<NavigationSource>,
}

impl CollectionNavigationNode {
    pub fn new(source: QueryNode, property: NavigationProperty) -> Result<Self, NodeError> {
        let kind = QueryNodeKind::CollectionNavigation;
        if !property.is_collection() {
            return Err(reject(NodeError::NavigationMultiplicity {
                node: kind,
                property: property.name().to_owned(),
                reason: "the property is single-valued",
            }));
        }
        expect_single(kind, "source", &source)?;
        let navigation_source = binding_target(&source, &property);
        Ok(Self {
            source: Box::new(source),
            property,
            navigation_source,
        })
    }

    pub fn with_navigation_source(mut self, navigation_source: Option<NavigationSource>) -> Self {
        self.navigation_source = navigation_source;
        self
    }

    pub fn source(&self) -> &QueryNode {
        &self.source
    }

    pub fn property(&self) -> &NavigationProperty {
        &self.property
    }

    pub fn navigation_source(&self) -> Option<&NavigationSource> {
        self.navigation_source.as_ref()
    }

    pub fn item_type(&self) -> EdmTypeReference {
        self.property.target_entity_type().to_type_reference(false)
    }
}

// ============================================================================
// Function calls
// ============================================================================

fn return_type_error(
    name: &str,
    return_type: &EdmTypeReference,
    reason: &'static str,
) -> NodeError {
    reject(NodeError::ReturnType {
        function: name.to_owned(),
        type_name: return_type.full_name(),
        reason,
    })
}

/// Call returning a primitive, complex, or enum value. Built-in functions
/// (`contains`, `year`, ...) carry no operation descriptors.
#[derive(Clone, Debug, PartialEq)]
pub struct SingleValueFunctionCallNode {
    name: String,
    functions: Vec<Operation>,
    parameters: Vec<QueryNode>,
    return_type: Option<EdmTypeReference>,
    source: Option<Box<QueryNode>>,
}

impl SingleValueFunctionCallNode {
    pub fn new(
        name: &str,
        functions: Vec<Operation>,
        parameters: Vec<QueryNode>,
        return_type: Option<EdmTypeReference>,
    ) -> Result<Self, NodeError> {
        check_name("function", name)?;
        if let Some(ty) = &return_type {
            if ty.is_collection() {
                return Err(return_type_error(
                    name,
                    ty,
                    "single-value functions cannot return a collection",
                ));
            }
            if !matches!(
                ty.definition(),
                EdmType::Primitive(_) | EdmType::Complex(_) | EdmType::Enum(_)
            ) {
                return Err(return_type_error(
                    name,
                    ty,
                    "single-value functions return a primitive, complex, or enum type",
                ));
            }
        }
        Ok(Self {
            name: name.to_owned(),
            functions,
            parameters,
            return_type,
            source: None,
        })
    }

    /// Binding source of a bound function call.
    pub fn with_source(mut self, source: QueryNode) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn functions(&self) -> &[Operation] {
        &self.functions
    }

    pub fn parameters(&self) -> &[QueryNode] {
        &self.parameters
    }

    pub fn return_type(&self) -> Option<&EdmTypeReference> {
        self.return_type.as_ref()
    }

    pub fn source(&self) -> Option<&QueryNode> {
        self.source.as_deref()
    }
}

/// Call returning one entity.
#[derive(Clone, Debug, PartialEq)]
pub struct SingleEntityFunctionCallNode {
    name: String,
    functions: Vec<Operation>,
    parameters: Vec<QueryNode>,
    return_type: EdmTypeReference,
    navigation_source: Option<NavigationSource>,
    source: Option<Box<QueryNode>>,
}

impl SingleEntityFunctionCallNode {
    pub fn new(
        name: &str,
        functions: Vec<Operation>,
        parameters: Vec<QueryNode>,
        return_type: EdmTypeReference,
        navigation_source: Option<NavigationSource>,
    ) -> Result<Self, NodeError> {
        check_name("function", name)?;
        if !return_type.is_entity() {
            return Err(return_type_error(
                name,
                &return_type,
                "entity functions return an entity type",
            ));
        }
        Ok(Self {
            name: name.to_owned(),
            functions,
            parameters,
            return_type,
            navigation_source,
            source: None,
        })
    }

    pub fn with_source(mut self, source: QueryNode) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn functions(&self) -> &[Operation] {
        &self.functions
    }

    pub fn parameters(&self) -> &[QueryNode] {
        &self.parameters
    }

    pub fn return_type(&self) -> &EdmTypeReference {
        &self.return_type
    }

    pub fn navigation_source(&self) -> Option<&NavigationSource> {
        self.navigation_source.as_ref()
    }

    pub fn source(&self) -> Option<&QueryNode> {
        self.source.as_deref()
    }
}

/// Call returning a collection of entities.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityCollectionFunctionCallNode {
    name: String,
    functions: Vec<Operation>,
    parameters: Vec<QueryNode>,
    return_type: EdmTypeReference,
    navigation_source: Option<NavigationSource>,
    source: Option<Box<QueryNode>>,
}

impl EntityCollectionFunctionCallNode {
    pub fn new(
        name: &str,
        functions: Vec<Operation>,
        parameters: Vec<QueryNode>,
        return_type: EdmTypeReference,
        navigation_source: Option<NavigationSource>,
    ) -> Result<Self, NodeError> {
        check_name("function", name)?;
        let Some(element) = return_type.element_type() else {
            return Err(return_type_error(
                name,
                &return_type,
                "entity collection functions return a collection",
            ));
        };
        if !element.is_entity() {
            return Err(return_type_error(
                name,
                &return_type,
                "entity collection functions return a collection of entities",
            ));
        }
        Ok(Self {
            name: name.to_owned(),
            functions,
            parameters,
            return_type,
            navigation_source,
            source: None,
        })
    }

    pub fn with_source(mut self, source: QueryNode) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn functions(&self) -> &[Operation] {
        &self.functions
    }

    pub fn parameters(&self) -> &[QueryNode] {
        &self.parameters
    }

    pub fn return_type(&self) -> &EdmTypeReference {
        &self.return_type
    }

    pub fn navigation_source(&self) -> Option<&NavigationSource> {
        self.navigation_source.as_ref()
    }

    pub fn source(&self) -> Option<&QueryNode> {
        self.source.as_deref()
    }

    pub fn item_type(&self) -> Option<EdmTypeReference> {
        self.return_type.element_type().cloned()
    }
}

/// `name=value` argument of a function call.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedFunctionParameterNode {
    name: String,
    value: Box<QueryNode>,
}

impl NamedFunctionParameterNode {
    pub fn new(name: &str, value: QueryNode) -> Result<Self, NodeError> {
        check_name("function parameter", name)?;
        Ok(Self {
            name: name.to_owned(),
            value: Box::new(value),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &QueryNode {
        &self.value
    }
}

// ============================================================================
// Leaves
// ============================================================================

/// Reference to a parameter alias (`@p`). The type is whatever the alias
/// value resolved to, if it was resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterAliasNode {
    alias: String,
    type_reference: Option<EdmTypeReference>,
}

impl ParameterAliasNode {
    pub fn new(alias: &str, type_reference: Option<EdmTypeReference>) -> Result<Self, NodeError> {
        if alias.len() < 2 || !alias.starts_with('@') {
            return Err(reject(NodeError::InvalidAlias(alias.to_owned())));
        }
        Ok(Self {
            alias: alias.to_owned(),
            type_reference,
        })
    }

    /// Alias including the leading `@`.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn type_reference(&self) -> Option<&EdmTypeReference> {
        self.type_reference.as_ref()
    }
}

/// A `$search` term. Always boolean.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchTermNode {
    text: String,
}

impl SearchTermNode {
    pub fn new(text: &str) -> Result<Self, NodeError> {
        check_name("search term", text)?;
        Ok(Self {
            text: text.to_owned(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn type_reference(&self) -> EdmTypeReference {
        EdmTypeReference::boolean(false)
    }
}

/// Key property paired with the value it must equal.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyPropertyValue {
    pub property: StructuralProperty,
    pub value: QueryNode,
}

/// `Collection(key)`: one entity picked out of a resource collection.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyLookupNode {
    source: Box<QueryNode>,
    keys: Vec<KeyPropertyValue>,
}

impl KeyLookupNode {
    pub fn new(source: QueryNode, keys: Vec<KeyPropertyValue>) -> Result<Self, NodeError> {
        let kind = QueryNodeKind::KeyLookup;
        expect_category(kind, "source", &source, NodeCategory::CollectionResource)?;
        if keys.is_empty() {
            return Err(reject(NodeError::EmptyKey));
        }
        for key in &keys {
            expect_single(kind, "key value", &key.value)?;
        }
        Ok(Self {
            source: Box::new(source),
            keys,
        })
    }

    pub fn source(&self) -> &QueryNode {
        &self.source
    }

    pub fn keys(&self) -> &[KeyPropertyValue] {
        &self.keys
    }

    pub fn type_reference(&self) -> Option<EdmTypeReference> {
        self.source.item_type()
    }

    pub fn navigation_source(&self) -> Option<NavigationSource> {
        self.source.navigation_source()
    }
}

// ============================================================================
// Lambdas and collection predicates
// ============================================================================

macro_rules! lambda_node {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        pub struct $name {
            range_variables: Vec<RangeVariable>,
            current_range_variable: Option<RangeVariable>,
            source: Option<Box<QueryNode>>,
            body: Option<Box<QueryNode>>,
        }

        impl $name {
            /// `range_variables` are all variables in scope, outermost first;
            /// `current_range_variable` is the one this lambda introduces.
            pub fn new(
                range_variables: Vec<RangeVariable>,
                current_range_variable: Option<RangeVariable>,
            ) -> Self {
                Self {
                    range_variables,
                    current_range_variable,
                    source: None,
                    body: None,
                }
            }

            /// Collection the lambda iterates.
            pub fn with_source(mut self, source: QueryNode) -> Result<Self, NodeError> {
                expect_collection($kind, "source", &source)?;
                self.source = Some(Box::new(source));
                Ok(self)
            }

            /// Predicate evaluated per element.
            pub fn with_body(mut self, body: QueryNode) -> Result<Self, NodeError> {
                expect_single($kind, "body", &body)?;
                self.body = Some(Box::new(body));
                Ok(self)
            }

            pub fn range_variables(&self) -> &[RangeVariable] {
                &self.range_variables
            }

            pub fn current_range_variable(&self) -> Option<&RangeVariable> {
                self.current_range_variable.as_ref()
            }

            pub fn source(&self) -> Option<&QueryNode> {
                self.source.as_deref()
            }

            pub fn body(&self) -> Option<&QueryNode> {
                self.body.as_deref()
            }

            pub fn type_reference(&self) -> EdmTypeReference {
                EdmTypeReference::boolean(false)
            }
        }
    };
}

lambda_node!(
    /// `source/any(x: body)`.
    AnyNode,
    QueryNodeKind::Any
);
lambda_node!(
    /// `source/all(x: body)`.
    AllNode,
    QueryNodeKind::All
);

/// `left in right`.
#[derive(Clone, Debug, PartialEq)]
pub struct InNode {
    left: Box<QueryNode>,
    right: Box<QueryNode>,
}

impl InNode {
    pub fn new(left: QueryNode, right: QueryNode) -> Result<Self, NodeError> {
        expect_single(QueryNodeKind::In, "left operand", &left)?;
        expect_collection(QueryNodeKind::In, "right operand", &right)?;
        Ok(Self {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn left(&self) -> &QueryNode {
        &self.left
    }

    pub fn right(&self) -> &QueryNode {
        &self.right
    }

    pub fn type_reference(&self) -> EdmTypeReference {
        EdmTypeReference::boolean(false)
    }
}

/// `source/$count`.
#[derive(Clone, Debug, PartialEq)]
pub struct CountNode {
    source: Box<QueryNode>,
}

impl CountNode {
    pub fn new(source: QueryNode) -> Result<Self, NodeError> {
        expect_collection(QueryNodeKind::Count, "source", &source)?;
        Ok(Self {
            source: Box::new(source),
        })
    }

    pub fn source(&self) -> &QueryNode {
        &self.source
    }

    pub fn type_reference(&self) -> EdmTypeReference {
        EdmTypeReference::primitive(PrimitiveKind::Int64, false)
    }
}

/// Entity set as an expression root. Kept for older binders; new trees
/// start from a range variable instead.
#[derive(Clone, Debug, PartialEq)]
pub struct EntitySetNode {
    entity_set: EntitySet,
}

impl EntitySetNode {
    pub fn new(entity_set: EntitySet) -> Self {
        Self { entity_set }
    }

    pub fn entity_set(&self) -> &EntitySet {
        &self.entity_set
    }

    pub fn item_type(&self) -> EdmTypeReference {
        self.entity_set.entity_type().to_type_reference(false)
    }

    pub fn navigation_source(&self) -> NavigationSource {
        NavigationSource::EntitySet(self.entity_set.clone())
    }
}
