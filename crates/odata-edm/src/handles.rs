//! Handle types: a model paired with an id.
//!
//! Handles are what the query model stores. They compare by identity within
//! one model and resolve their definitions on demand.

use crate::model::{
    ComplexTypeDef, ComplexTypeId, EdmModel, EntitySetId, EntityTypeDef, EntityTypeId,
    EnumTypeDef, EnumTypeId, NavigationPropertyDef, NavigationSourceDef, OperationDef,
    OperationId, OperationImportId, OperationKind, SingletonId, StructuralPropertyDef,
    StructuredTypeId,
};
use crate::types::EdmTypeReference;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident, $id:ty) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            model: EdmModel,
            id: $id,
        }

        impl $name {
            pub(crate) fn new(model: EdmModel, id: $id) -> Self {
                Self { model, id }
            }

            pub fn id(&self) -> $id {
                self.id
            }

            pub fn model(&self) -> &EdmModel {
                &self.model
            }
        }
    };
}

handle!(
    /// Entity type handle.
    EntityType,
    EntityTypeId
);
handle!(
    /// Complex type handle.
    ComplexType,
    ComplexTypeId
);
handle!(
    /// Enum type handle.
    EnumType,
    EnumTypeId
);
handle!(
    /// Entity set handle.
    EntitySet,
    EntitySetId
);
handle!(
    /// Singleton handle.
    Singleton,
    SingletonId
);
handle!(
    /// Function or action handle.
    Operation,
    OperationId
);
handle!(
    /// Operation import handle.
    OperationImport,
    OperationImportId
);

// ============================================================================
// Structured types
// ============================================================================

impl EntityType {
    fn def(&self) -> &EntityTypeDef {
        self.model.data().ensure_entity_type(self.id)
    }

    pub fn name(&self) -> &str {
        &self.def().name
    }

    pub fn namespace(&self) -> &str {
        &self.def().namespace
    }

    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace(), self.name())
    }

    pub fn base_type(&self) -> Option<EntityType> {
        self.def()
            .base
            .map(|id| EntityType::new(self.model.clone(), id))
    }

    pub fn is_abstract(&self) -> bool {
        self.def().is_abstract
    }

    /// Open if this type or any base type is open.
    pub fn is_open(&self) -> bool {
        self.def().is_open || self.base_type().is_some_and(|b| b.is_open())
    }

    pub fn has_stream(&self) -> bool {
        self.def().has_stream
    }

    /// Self first, then each base type up to the root.
    pub fn ancestry(&self) -> impl Iterator<Item = EntityType> + '_ {
        std::iter::successors(Some(self.clone()), |t| t.base_type())
    }

    pub fn is_or_inherits_from(&self, other: &EntityType) -> bool {
        self.ancestry().any(|t| &t == other)
    }

    /// Same type, subtype, or supertype.
    pub fn is_related_to(&self, other: &EntityType) -> bool {
        self.is_or_inherits_from(other) || other.is_or_inherits_from(self)
    }

    /// Structural properties, base type members first.
    pub fn structural_properties(&self) -> Vec<StructuralProperty> {
        let chain: Vec<_> = self.ancestry().collect();
        chain
            .iter()
            .rev()
            .flat_map(|t| {
                (0..t.def().structural.len()).map(move |i| {
                    StructuralProperty::new(self.model.clone(), t.id.into(), i as u32)
                })
            })
            .collect()
    }

    /// Navigation properties, base type members first.
    pub fn navigation_properties(&self) -> Vec<NavigationProperty> {
        let chain: Vec<_> = self.ancestry().collect();
        chain
            .iter()
            .rev()
            .flat_map(|t| {
                (0..t.def().navigation.len()).map(move |i| {
                    NavigationProperty::new(self.model.clone(), t.id.into(), i as u32)
                })
            })
            .collect()
    }

    pub fn find_property(&self, name: &str) -> Option<Property> {
        for t in self.ancestry() {
            let def = t.def();
            if let Some(i) = def.structural.iter().position(|p| p.name == name) {
                return Some(Property::Structural(StructuralProperty::new(
                    self.model.clone(),
                    t.id.into(),
                    i as u32,
                )));
            }
            if let Some(i) = def.navigation.iter().position(|p| p.name == name) {
                return Some(Property::Navigation(NavigationProperty::new(
                    self.model.clone(),
                    t.id.into(),
                    i as u32,
                )));
            }
        }
        None
    }

    /// Key properties, taken from the nearest type in the chain that declares a key.
    pub fn key(&self) -> Vec<StructuralProperty> {
        let Some(declaring) = self.ancestry().find(|t| !t.def().key.is_empty()) else {
            return Vec::new();
        };
        declaring
            .def()
            .key
            .iter()
            .filter_map(|name| self.find_property(name)?.into_structural())
            .collect()
    }

    pub fn to_type_reference(&self, nullable: bool) -> EdmTypeReference {
        EdmTypeReference::entity(self.clone(), nullable)
    }
}

impl ComplexType {
    fn def(&self) -> &ComplexTypeDef {
        self.model.data().ensure_complex_type(self.id)
    }

    pub fn name(&self) -> &str {
        &self.def().name
    }

    pub fn namespace(&self) -> &str {
        &self.def().namespace
    }

    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace(), self.name())
    }

    pub fn base_type(&self) -> Option<ComplexType> {
        self.def()
            .base
            .map(|id| ComplexType::new(self.model.clone(), id))
    }

    pub fn is_abstract(&self) -> bool {
        self.def().is_abstract
    }

    pub fn is_open(&self) -> bool {
        self.def().is_open || self.base_type().is_some_and(|b| b.is_open())
    }

    pub fn ancestry(&self) -> impl Iterator<Item = ComplexType> + '_ {
        std::iter::successors(Some(self.clone()), |t| t.base_type())
    }

    pub fn is_or_inherits_from(&self, other: &ComplexType) -> bool {
        self.ancestry().any(|t| &t == other)
    }

    pub fn is_related_to(&self, other: &ComplexType) -> bool {
        self.is_or_inherits_from(other) || other.is_or_inherits_from(self)
    }

    pub fn structural_properties(&self) -> Vec<StructuralProperty> {
        let chain: Vec<_> = self.ancestry().collect();
        chain
            .iter()
            .rev()
            .flat_map(|t| {
                (0..t.def().structural.len()).map(move |i| {
                    StructuralProperty::new(self.model.clone(), t.id.into(), i as u32)
                })
            })
            .collect()
    }

    pub fn find_property(&self, name: &str) -> Option<Property> {
        for t in self.ancestry() {
            let def = t.def();
            if let Some(i) = def.structural.iter().position(|p| p.name == name) {
                return Some(Property::Structural(StructuralProperty::new(
                    self.model.clone(),
                    t.id.into(),
                    i as u32,
                )));
            }
            if let Some(i) = def.navigation.iter().position(|p| p.name == name) {
                return Some(Property::Navigation(NavigationProperty::new(
                    self.model.clone(),
                    t.id.into(),
                    i as u32,
                )));
            }
        }
        None
    }

    pub fn to_type_reference(&self, nullable: bool) -> EdmTypeReference {
        EdmTypeReference::complex(self.clone(), nullable)
    }
}

/// An entity or complex type.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum StructuredType {
    Entity(EntityType),
    Complex(ComplexType),
}

impl StructuredType {
    pub fn full_name(&self) -> String {
        match self {
            Self::Entity(t) => t.full_name(),
            Self::Complex(t) => t.full_name(),
        }
    }

    pub fn is_open(&self) -> bool {
        match self {
            Self::Entity(t) => t.is_open(),
            Self::Complex(t) => t.is_open(),
        }
    }

    pub fn find_property(&self, name: &str) -> Option<Property> {
        match self {
            Self::Entity(t) => t.find_property(name),
            Self::Complex(t) => t.find_property(name),
        }
    }

    pub fn is_related_to(&self, other: &StructuredType) -> bool {
        match (self, other) {
            (Self::Entity(a), Self::Entity(b)) => a.is_related_to(b),
            (Self::Complex(a), Self::Complex(b)) => a.is_related_to(b),
            _ => false,
        }
    }

    pub fn as_entity(&self) -> Option<&EntityType> {
        match self {
            Self::Entity(t) => Some(t),
            Self::Complex(_) => None,
        }
    }

    pub fn to_type_reference(&self, nullable: bool) -> EdmTypeReference {
        match self {
            Self::Entity(t) => t.to_type_reference(nullable),
            Self::Complex(t) => t.to_type_reference(nullable),
        }
    }

    fn from_id(model: &EdmModel, id: StructuredTypeId) -> Self {
        match id {
            StructuredTypeId::Entity(id) => Self::Entity(EntityType::new(model.clone(), id)),
            StructuredTypeId::Complex(id) => Self::Complex(ComplexType::new(model.clone(), id)),
        }
    }
}

impl EnumType {
    fn def(&self) -> &EnumTypeDef {
        self.model.data().ensure_enum_type(self.id)
    }

    pub fn name(&self) -> &str {
        &self.def().name
    }

    pub fn namespace(&self) -> &str {
        &self.def().namespace
    }

    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace(), self.name())
    }

    pub fn is_flags(&self) -> bool {
        self.def().is_flags
    }

    pub fn members(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.def().members.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn member_value(&self, name: &str) -> Option<i64> {
        self.members().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
}

// ============================================================================
// Properties
// ============================================================================

/// Structural (primitive, complex, enum, or collection-of) property.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StructuralProperty {
    model: EdmModel,
    owner: StructuredTypeId,
    index: u32,
}

impl StructuralProperty {
    pub(crate) fn new(model: EdmModel, owner: StructuredTypeId, index: u32) -> Self {
        Self {
            model,
            owner,
            index,
        }
    }

    fn def(&self) -> &StructuralPropertyDef {
        let data = self.model.data();
        let props = match self.owner {
            StructuredTypeId::Entity(id) => &data.ensure_entity_type(id).structural,
            StructuredTypeId::Complex(id) => &data.ensure_complex_type(id).structural,
        };
        &props[self.index as usize]
    }

    pub fn name(&self) -> &str {
        &self.def().name
    }

    pub fn type_reference(&self) -> EdmTypeReference {
        let def = self.def();
        EdmTypeReference::from_spec(&self.model, &def.ty, def.nullable)
    }

    pub fn is_collection(&self) -> bool {
        self.def().ty.is_collection()
    }

    pub fn declaring_type(&self) -> StructuredType {
        StructuredType::from_id(&self.model, self.owner)
    }
}

/// Navigation property to an entity type.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct NavigationProperty {
    model: EdmModel,
    owner: StructuredTypeId,
    index: u32,
}

impl NavigationProperty {
    pub(crate) fn new(model: EdmModel, owner: StructuredTypeId, index: u32) -> Self {
        Self {
            model,
            owner,
            index,
        }
    }

    fn def(&self) -> &NavigationPropertyDef {
        let data = self.model.data();
        let props = match self.owner {
            StructuredTypeId::Entity(id) => &data.ensure_entity_type(id).navigation,
            StructuredTypeId::Complex(id) => &data.ensure_complex_type(id).navigation,
        };
        &props[self.index as usize]
    }

    pub fn name(&self) -> &str {
        &self.def().name
    }

    pub fn target_entity_type(&self) -> EntityType {
        EntityType::new(self.model.clone(), self.def().target)
    }

    pub fn is_collection(&self) -> bool {
        self.def().many
    }

    pub fn contains_target(&self) -> bool {
        self.def().contains_target
    }

    /// Target entity type, wrapped in `Collection(..)` when collection-valued.
    pub fn type_reference(&self) -> EdmTypeReference {
        let def = self.def();
        let target = self.target_entity_type();
        if def.many {
            EdmTypeReference::collection(target.to_type_reference(false))
        } else {
            target.to_type_reference(def.nullable)
        }
    }

    pub fn declaring_type(&self) -> StructuredType {
        StructuredType::from_id(&self.model, self.owner)
    }
}

/// Any declared property.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Property {
    Structural(StructuralProperty),
    Navigation(NavigationProperty),
}

impl Property {
    pub fn name(&self) -> &str {
        match self {
            Self::Structural(p) => p.name(),
            Self::Navigation(p) => p.name(),
        }
    }

    pub fn type_reference(&self) -> EdmTypeReference {
        match self {
            Self::Structural(p) => p.type_reference(),
            Self::Navigation(p) => p.type_reference(),
        }
    }

    pub fn is_navigation(&self) -> bool {
        matches!(self, Self::Navigation(_))
    }

    pub fn is_collection(&self) -> bool {
        match self {
            Self::Structural(p) => p.is_collection(),
            Self::Navigation(p) => p.is_collection(),
        }
    }

    pub fn as_structural(&self) -> Option<&StructuralProperty> {
        match self {
            Self::Structural(p) => Some(p),
            Self::Navigation(_) => None,
        }
    }

    pub fn into_structural(self) -> Option<StructuralProperty> {
        match self {
            Self::Structural(p) => Some(p),
            Self::Navigation(_) => None,
        }
    }

    pub fn as_navigation(&self) -> Option<&NavigationProperty> {
        match self {
            Self::Navigation(p) => Some(p),
            Self::Structural(_) => None,
        }
    }

    pub fn into_navigation(self) -> Option<NavigationProperty> {
        match self {
            Self::Navigation(p) => Some(p),
            Self::Structural(_) => None,
        }
    }
}

impl From<StructuralProperty> for Property {
    fn from(p: StructuralProperty) -> Self {
        Self::Structural(p)
    }
}

impl From<NavigationProperty> for Property {
    fn from(p: NavigationProperty) -> Self {
        Self::Navigation(p)
    }
}

// ============================================================================
// Navigation sources
// ============================================================================

fn find_binding(
    model: &EdmModel,
    def: &NavigationSourceDef,
    nav: &NavigationProperty,
) -> Option<NavigationSource> {
    let direct = def.bindings.get(nav.name());
    let qualified = || {
        let path = format!("{}/{}", nav.declaring_type().full_name(), nav.name());
        def.bindings.get(&path).copied()
    };
    direct
        .copied()
        .or_else(qualified)
        .map(|id| model.source_handle(id))
}

impl EntitySet {
    fn def(&self) -> &NavigationSourceDef {
        self.model.data().ensure_entity_set(self.id)
    }

    pub fn name(&self) -> &str {
        &self.def().name
    }

    pub fn entity_type(&self) -> EntityType {
        EntityType::new(self.model.clone(), self.def().entity_type)
    }

    pub fn find_navigation_target(&self, nav: &NavigationProperty) -> Option<NavigationSource> {
        find_binding(&self.model, self.def(), nav)
    }
}

impl Singleton {
    fn def(&self) -> &NavigationSourceDef {
        self.model.data().ensure_singleton(self.id)
    }

    pub fn name(&self) -> &str {
        &self.def().name
    }

    pub fn entity_type(&self) -> EntityType {
        EntityType::new(self.model.clone(), self.def().entity_type)
    }

    pub fn find_navigation_target(&self, nav: &NavigationProperty) -> Option<NavigationSource> {
        find_binding(&self.model, self.def(), nav)
    }
}

/// Kind tag for [`NavigationSource`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum NavigationSourceKind {
    EntitySet,
    Singleton,
}

/// An entity set or a singleton.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum NavigationSource {
    EntitySet(EntitySet),
    Singleton(Singleton),
}

impl NavigationSource {
    pub fn kind(&self) -> NavigationSourceKind {
        match self {
            Self::EntitySet(_) => NavigationSourceKind::EntitySet,
            Self::Singleton(_) => NavigationSourceKind::Singleton,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::EntitySet(s) => s.name(),
            Self::Singleton(s) => s.name(),
        }
    }

    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::EntitySet(s) => s.entity_type(),
            Self::Singleton(s) => s.entity_type(),
        }
    }

    pub fn find_navigation_target(&self, nav: &NavigationProperty) -> Option<NavigationSource> {
        match self {
            Self::EntitySet(s) => s.find_navigation_target(nav),
            Self::Singleton(s) => s.find_navigation_target(nav),
        }
    }

    pub fn as_entity_set(&self) -> Option<&EntitySet> {
        match self {
            Self::EntitySet(s) => Some(s),
            Self::Singleton(_) => None,
        }
    }
}

impl From<EntitySet> for NavigationSource {
    fn from(s: EntitySet) -> Self {
        Self::EntitySet(s)
    }
}

impl From<Singleton> for NavigationSource {
    fn from(s: Singleton) -> Self {
        Self::Singleton(s)
    }
}

// ============================================================================
// Operations
// ============================================================================

/// Declared parameter of an operation.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct OperationParameter {
    pub name: String,
    pub type_reference: EdmTypeReference,
}

impl Operation {
    fn def(&self) -> &OperationDef {
        self.model.data().ensure_operation(self.id)
    }

    pub fn name(&self) -> &str {
        &self.def().name
    }

    pub fn namespace(&self) -> &str {
        &self.def().namespace
    }

    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace(), self.name())
    }

    pub fn kind(&self) -> OperationKind {
        self.def().kind
    }

    pub fn is_function(&self) -> bool {
        self.def().kind == OperationKind::Function
    }

    pub fn is_action(&self) -> bool {
        self.def().kind == OperationKind::Action
    }

    pub fn is_bound(&self) -> bool {
        self.def().is_bound
    }

    pub fn is_composable(&self) -> bool {
        self.def().is_composable
    }

    pub fn parameters(&self) -> Vec<OperationParameter> {
        self.def()
            .parameters
            .iter()
            .map(|p| OperationParameter {
                name: p.name.clone(),
                type_reference: EdmTypeReference::from_spec(&self.model, &p.ty, p.nullable),
            })
            .collect()
    }

    /// Type of the binding parameter for bound operations.
    pub fn binding_parameter_type(&self) -> Option<EdmTypeReference> {
        if !self.is_bound() {
            return None;
        }
        self.parameters().into_iter().next().map(|p| p.type_reference)
    }

    pub fn return_type(&self) -> Option<EdmTypeReference> {
        self.def()
            .return_type
            .as_ref()
            .map(|(ty, nullable)| EdmTypeReference::from_spec(&self.model, ty, *nullable))
    }
}

impl OperationImport {
    pub fn name(&self) -> &str {
        &self.model.data().ensure_operation_import(self.id).name
    }

    pub fn operation(&self) -> Operation {
        let def = self.model.data().ensure_operation_import(self.id);
        Operation::new(self.model.clone(), def.operation)
    }

    pub fn entity_set(&self) -> Option<EntitySet> {
        let def = self.model.data().ensure_operation_import(self.id);
        def.entity_set
            .map(|id| EntitySet::new(self.model.clone(), id))
    }
}

// ============================================================================
// Debug
// ============================================================================

macro_rules! debug_by_name {
    ($name:ident, $method:ident) => {
        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.$method())
            }
        }
    };
}

debug_by_name!(EntityType, full_name);
debug_by_name!(ComplexType, full_name);
debug_by_name!(EnumType, full_name);
debug_by_name!(EntitySet, name);
debug_by_name!(Singleton, name);
debug_by_name!(Operation, full_name);
debug_by_name!(OperationImport, name);
debug_by_name!(StructuralProperty, name);
debug_by_name!(NavigationProperty, name);
