//! Concrete segment types.

use std::fmt::Write;
use std::sync::LazyLock;

use odata_edm::{
    EdmType, EdmTypeReference, EntitySet, EntityType, LiteralValue, NavigationProperty,
    NavigationSource, Operation, OperationImport, PrimitiveKind, Singleton, StructuralProperty,
};
use regex_automata::meta::Regex;

use super::{SegmentError, reject};
use crate::node::QueryNode;
use crate::path::KeyDelimiter;

/// Content-ID references are `$` followed by digits.
static CONTENT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$[0-9]+$").expect("content-ID pattern is valid"));

/// Percent-encode everything outside the RFC 3986 unreserved set, so a key
/// written as its own segment stays one segment.
fn escape_key_segment(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

/// Ensure `ty` (or its element type) is an entity type related to the
/// source's entity type.
fn check_related(
    segment: &'static str,
    ty: &EdmType,
    navigation_source: Option<&NavigationSource>,
) -> Result<(), SegmentError> {
    let Some(source) = navigation_source else {
        return Ok(());
    };
    let source_type = source.entity_type();
    let element = ty.element_type();
    if element
        .as_entity()
        .is_some_and(|t| t.is_related_to(&source_type))
    {
        return Ok(());
    }
    Err(reject(SegmentError::UnrelatedTypes {
        segment,
        type_name: element.full_name(),
        source_type: source_type.full_name(),
    }))
}

// ============================================================================
// Navigation sources
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct EntitySetSegment {
    entity_set: EntitySet,
}

impl EntitySetSegment {
    pub fn new(entity_set: EntitySet) -> Self {
        Self { entity_set }
    }

    pub fn entity_set(&self) -> &EntitySet {
        &self.entity_set
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SingletonSegment {
    singleton: Singleton,
}

impl SingletonSegment {
    pub fn new(singleton: Singleton) -> Self {
        Self { singleton }
    }

    pub fn singleton(&self) -> &Singleton {
        &self.singleton
    }
}

// ============================================================================
// Keys and casts
// ============================================================================

/// Key predicate selecting one entity.
#[derive(Clone, Debug, PartialEq)]
pub struct KeySegment {
    keys: Vec<(String, LiteralValue)>,
    entity_type: EntityType,
    navigation_source: Option<NavigationSource>,
}

impl KeySegment {
    /// `keys` are `(property, value)` pairs in key order. The entity type must
    /// be related to the navigation source's entity type.
    pub fn new(
        keys: Vec<(String, LiteralValue)>,
        entity_type: EntityType,
        navigation_source: Option<NavigationSource>,
    ) -> Result<Self, SegmentError> {
        if keys.is_empty() {
            return Err(reject(SegmentError::EmptyKey));
        }
        check_related(
            "key segment",
            &EdmType::Entity(entity_type.clone()),
            navigation_source.as_ref(),
        )?;
        Ok(Self {
            keys,
            entity_type,
            navigation_source,
        })
    }

    pub fn keys(&self) -> &[(String, LiteralValue)] {
        &self.keys
    }

    pub fn entity_type(&self) -> &EntityType {
        &self.entity_type
    }

    pub fn navigation_source(&self) -> Option<&NavigationSource> {
        self.navigation_source.as_ref()
    }

    /// Key text as appended to the previous segment: `('1')`, `(A=1,B='x')`,
    /// or `/1` for single keys in slash form. Slash-form keys are
    /// percent-encoded and strings lose their quotes.
    pub fn render(&self, delimiter: KeyDelimiter) -> String {
        if let [(_, value)] = self.keys.as_slice() {
            return match delimiter {
                KeyDelimiter::Parentheses => format!("({})", value.to_uri_literal()),
                KeyDelimiter::Slash => match value {
                    LiteralValue::String(s) => format!("/{}", escape_key_segment(s)),
                    other => format!("/{}", escape_key_segment(&other.to_uri_literal())),
                },
            };
        }
        let pairs: Vec<String> = self
            .keys
            .iter()
            .map(|(name, value)| format!("{name}={}", value.to_uri_literal()))
            .collect();
        format!("({})", pairs.join(","))
    }
}

/// Type cast. The target may be a collection type for casts on collections.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeSegment {
    target_type: EdmType,
    navigation_source: Option<NavigationSource>,
}

impl TypeSegment {
    pub fn new(
        target_type: EdmType,
        navigation_source: Option<NavigationSource>,
    ) -> Result<Self, SegmentError> {
        check_related("type segment", &target_type, navigation_source.as_ref())?;
        Ok(Self {
            target_type,
            navigation_source,
        })
    }

    pub fn target_type(&self) -> &EdmType {
        &self.target_type
    }

    pub fn navigation_source(&self) -> Option<&NavigationSource> {
        self.navigation_source.as_ref()
    }
}

// ============================================================================
// Properties
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct NavigationPropertySegment {
    property: NavigationProperty,
    navigation_source: Option<NavigationSource>,
}

impl NavigationPropertySegment {
    pub fn new(property: NavigationProperty, navigation_source: Option<NavigationSource>) -> Self {
        Self {
            property,
            navigation_source,
        }
    }

    pub fn property(&self) -> &NavigationProperty {
        &self.property
    }

    /// Target of the navigation, when the binding is known.
    pub fn navigation_source(&self) -> Option<&NavigationSource> {
        self.navigation_source.as_ref()
    }
}

/// `Nav/$ref`: the link itself rather than the related entity.
#[derive(Clone, Debug, PartialEq)]
pub struct NavigationPropertyLinkSegment {
    property: NavigationProperty,
    navigation_source: Option<NavigationSource>,
}

impl NavigationPropertyLinkSegment {
    pub fn new(property: NavigationProperty, navigation_source: Option<NavigationSource>) -> Self {
        Self {
            property,
            navigation_source,
        }
    }

    pub fn property(&self) -> &NavigationProperty {
        &self.property
    }

    pub fn navigation_source(&self) -> Option<&NavigationSource> {
        self.navigation_source.as_ref()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PropertySegment {
    property: StructuralProperty,
}

impl PropertySegment {
    pub fn new(property: StructuralProperty) -> Self {
        Self { property }
    }

    pub fn property(&self) -> &StructuralProperty {
        &self.property
    }
}

/// Dynamic property of an open type; its type is unknown.
#[derive(Clone, Debug, PartialEq)]
pub struct OpenPropertySegment {
    name: String,
}

impl OpenPropertySegment {
    pub fn new(name: &str) -> Result<Self, SegmentError> {
        if name.is_empty() {
            return Err(reject(SegmentError::EmptyName("open property")));
        }
        Ok(Self {
            name: name.to_owned(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// Operations
// ============================================================================

/// `name=value` argument of a function segment.
#[derive(Clone, Debug, PartialEq)]
pub struct OperationSegmentParameter {
    pub name: String,
    pub value: QueryNode,
}

impl OperationSegmentParameter {
    pub fn new(name: &str, value: QueryNode) -> Self {
        Self {
            name: name.to_owned(),
            value,
        }
    }
}

/// All overloads must agree on the return type; it is the segment's type.
fn common_return_type(
    name: &str,
    mut return_types: impl Iterator<Item = Option<EdmTypeReference>>,
) -> Result<(), SegmentError> {
    let Some(first) = return_types.next() else {
        return Ok(());
    };
    let first = first.map(EdmTypeReference::into_definition);
    if return_types.all(|t| t.map(EdmTypeReference::into_definition) == first) {
        return Ok(());
    }
    Err(reject(SegmentError::AmbiguousReturnType(name.to_owned())))
}

/// Bound function or action call, with its candidate overloads.
#[derive(Clone, Debug, PartialEq)]
pub struct OperationSegment {
    operations: Vec<Operation>,
    parameters: Vec<OperationSegmentParameter>,
    entity_set: Option<EntitySet>,
}

impl OperationSegment {
    pub fn new(
        operations: Vec<Operation>,
        entity_set: Option<EntitySet>,
    ) -> Result<Self, SegmentError> {
        let Some(first) = operations.first() else {
            return Err(reject(SegmentError::NoOperations("operation segment")));
        };
        common_return_type(
            &first.full_name(),
            operations.iter().map(Operation::return_type),
        )?;
        Ok(Self {
            operations,
            parameters: Vec::new(),
            entity_set,
        })
    }

    pub fn with_parameters(mut self, parameters: Vec<OperationSegmentParameter>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Qualified name shared by the overloads.
    pub fn name(&self) -> String {
        self.operations
            .first()
            .map(Operation::full_name)
            .unwrap_or_default()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn parameters(&self) -> &[OperationSegmentParameter] {
        &self.parameters
    }

    pub fn entity_set(&self) -> Option<&EntitySet> {
        self.entity_set.as_ref()
    }

    pub fn is_function(&self) -> bool {
        self.operations.first().is_some_and(Operation::is_function)
    }

    pub fn return_type(&self) -> Option<EdmTypeReference> {
        self.operations.first()?.return_type()
    }
}

/// Unbound function or action import called from the service root.
#[derive(Clone, Debug, PartialEq)]
pub struct OperationImportSegment {
    imports: Vec<OperationImport>,
    parameters: Vec<OperationSegmentParameter>,
    entity_set: Option<EntitySet>,
}

impl OperationImportSegment {
    /// The entity set defaults to the one declared on the first import.
    pub fn new(imports: Vec<OperationImport>) -> Result<Self, SegmentError> {
        let Some(first) = imports.first() else {
            return Err(reject(SegmentError::NoOperations("operation import segment")));
        };
        common_return_type(
            first.name(),
            imports.iter().map(|i| i.operation().return_type()),
        )?;
        let entity_set = first.entity_set();
        Ok(Self {
            imports,
            parameters: Vec::new(),
            entity_set,
        })
    }

    pub fn with_parameters(mut self, parameters: Vec<OperationSegmentParameter>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn name(&self) -> &str {
        self.imports.first().map_or("", OperationImport::name)
    }

    pub fn imports(&self) -> &[OperationImport] {
        &self.imports
    }

    pub fn parameters(&self) -> &[OperationSegmentParameter] {
        &self.parameters
    }

    pub fn entity_set(&self) -> Option<&EntitySet> {
        self.entity_set.as_ref()
    }

    pub fn is_function(&self) -> bool {
        self.imports
            .first()
            .is_some_and(|i| i.operation().is_function())
    }

    pub fn return_type(&self) -> Option<EdmTypeReference> {
        self.imports.first()?.operation().return_type()
    }
}

// ============================================================================
// System segments
// ============================================================================

/// `$value`: the raw value of a property, or the media stream of an entity.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueSegment {
    target_type: Option<EdmType>,
}

impl ValueSegment {
    /// `previous_type` is the type addressed by the preceding segment.
    /// Entities yield their stream, collections are rejected, and an unknown
    /// (open) type stays unknown.
    pub fn new(previous_type: Option<&EdmType>) -> Result<Self, SegmentError> {
        let target_type = match previous_type {
            None => None,
            Some(EdmType::Entity(_)) => Some(EdmType::Primitive(PrimitiveKind::Stream)),
            Some(ty @ EdmType::Collection(_)) => {
                return Err(reject(SegmentError::ValueOnCollection(ty.full_name())));
            }
            Some(other) => Some(other.clone()),
        };
        Ok(Self { target_type })
    }

    pub fn target_type(&self) -> Option<&EdmType> {
        self.target_type.as_ref()
    }
}

/// `$<n>` inside a batch request.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchReferenceSegment {
    content_id: String,
    target_type: EdmType,
    entity_set: Option<EntitySet>,
}

impl BatchReferenceSegment {
    pub fn new(
        content_id: &str,
        target_type: EdmType,
        entity_set: Option<EntitySet>,
    ) -> Result<Self, SegmentError> {
        if !CONTENT_ID.is_match(content_id) {
            return Err(reject(SegmentError::InvalidContentId(content_id.to_owned())));
        }
        Ok(Self {
            content_id: content_id.to_owned(),
            target_type,
            entity_set,
        })
    }

    pub fn content_id(&self) -> &str {
        &self.content_id
    }

    pub fn target_type(&self) -> &EdmType {
        &self.target_type
    }

    pub fn entity_set(&self) -> Option<&EntitySet> {
        self.entity_set.as_ref()
    }
}
