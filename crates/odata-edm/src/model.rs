//! Schema storage and construction.
//!
//! Two layers:
//! - **Storage layer**: id-indexed definitions owned by `ModelData`
//! - **Handle layer** (`handles.rs`): cheap `(EdmModel, id)` pairs for lookups
//!
//! Navigation properties may form cycles (`Customer/Orders/Customer`), so
//! definitions refer to each other by id, never by pointer.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::handles::{
    ComplexType, EntitySet, EntityType, EnumType, NavigationSource, Operation, OperationImport,
    Singleton,
};
use crate::primitive::PrimitiveKind;
use crate::types::EdmType;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        pub struct $name(u32);

        impl $name {
            /// Raw index for debugging.
            #[inline]
            pub fn as_u32(self) -> u32 {
                self.0
            }

            #[inline]
            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            fn next(len: usize) -> Self {
                Self(len as u32)
            }
        }
    };
}

define_id!(
    /// Entity type id within one model.
    EntityTypeId
);
define_id!(
    /// Complex type id within one model.
    ComplexTypeId
);
define_id!(
    /// Enum type id within one model.
    EnumTypeId
);
define_id!(
    /// Entity set id within one model.
    EntitySetId
);
define_id!(
    /// Singleton id within one model.
    SingletonId
);
define_id!(
    /// Function or action id within one model.
    OperationId
);
define_id!(
    /// Operation import id within one model.
    OperationImportId
);

/// Declaring type of a property.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum StructuredTypeId {
    Entity(EntityTypeId),
    Complex(ComplexTypeId),
}

impl From<EntityTypeId> for StructuredTypeId {
    fn from(id: EntityTypeId) -> Self {
        Self::Entity(id)
    }
}

impl From<ComplexTypeId> for StructuredTypeId {
    fn from(id: ComplexTypeId) -> Self {
        Self::Complex(id)
    }
}

/// Target of a navigation-property binding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum NavigationSourceId {
    EntitySet(EntitySetId),
    Singleton(SingletonId),
}

impl From<EntitySetId> for NavigationSourceId {
    fn from(id: EntitySetId) -> Self {
        Self::EntitySet(id)
    }
}

impl From<SingletonId> for NavigationSourceId {
    fn from(id: SingletonId) -> Self {
        Self::Singleton(id)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum SchemaTypeId {
    Entity(EntityTypeId),
    Complex(ComplexTypeId),
    Enum(EnumTypeId),
}

/// Type of a property, parameter or return value while building a model.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum TypeSpec {
    Primitive(PrimitiveKind),
    Complex(ComplexTypeId),
    Entity(EntityTypeId),
    Enum(EnumTypeId),
    Collection(Box<TypeSpec>),
    Untyped,
}

impl TypeSpec {
    pub fn collection(element: impl Into<TypeSpec>) -> Self {
        Self::Collection(Box::new(element.into()))
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }
}

impl From<PrimitiveKind> for TypeSpec {
    fn from(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }
}

impl From<ComplexTypeId> for TypeSpec {
    fn from(id: ComplexTypeId) -> Self {
        Self::Complex(id)
    }
}

impl From<EntityTypeId> for TypeSpec {
    fn from(id: EntityTypeId) -> Self {
        Self::Entity(id)
    }
}

impl From<EnumTypeId> for TypeSpec {
    fn from(id: EnumTypeId) -> Self {
        Self::Enum(id)
    }
}

/// Function or action.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum OperationKind {
    Function,
    Action,
}

/// Errors raised while building a model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("duplicate schema element `{0}`")]
    DuplicateName(String),

    #[error("`{owner}` already has a member named `{member}`")]
    DuplicateMember { owner: String, member: String },

    #[error("key `{property}` on `{owner}` {reason}")]
    InvalidKey {
        owner: String,
        property: String,
        reason: &'static str,
    },

    #[error("`{path}` is not a navigation property of `{source_name}`")]
    UnknownNavigation { source_name: String, path: String },

    #[error("bound operation `{0}` has no binding parameter")]
    MissingBindingParameter(String),
}

// ============================================================================
// Storage Layer
// ============================================================================

#[derive(Debug, Clone)]
pub(crate) struct StructuralPropertyDef {
    pub(crate) name: String,
    pub(crate) ty: TypeSpec,
    pub(crate) nullable: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct NavigationPropertyDef {
    pub(crate) name: String,
    pub(crate) target: EntityTypeId,
    pub(crate) many: bool,
    pub(crate) nullable: bool,
    pub(crate) contains_target: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct EntityTypeDef {
    pub(crate) namespace: String,
    pub(crate) name: String,
    pub(crate) base: Option<EntityTypeId>,
    pub(crate) is_abstract: bool,
    pub(crate) is_open: bool,
    pub(crate) has_stream: bool,
    pub(crate) key: Vec<String>,
    pub(crate) structural: Vec<StructuralPropertyDef>,
    pub(crate) navigation: Vec<NavigationPropertyDef>,
}

#[derive(Debug, Clone)]
pub(crate) struct ComplexTypeDef {
    pub(crate) namespace: String,
    pub(crate) name: String,
    pub(crate) base: Option<ComplexTypeId>,
    pub(crate) is_abstract: bool,
    pub(crate) is_open: bool,
    pub(crate) structural: Vec<StructuralPropertyDef>,
    pub(crate) navigation: Vec<NavigationPropertyDef>,
}

#[derive(Debug, Clone)]
pub(crate) struct EnumTypeDef {
    pub(crate) namespace: String,
    pub(crate) name: String,
    pub(crate) is_flags: bool,
    pub(crate) members: Vec<(String, i64)>,
}

#[derive(Debug, Clone)]
pub(crate) struct NavigationSourceDef {
    pub(crate) name: String,
    pub(crate) entity_type: EntityTypeId,
    /// Binding path (`Orders` or `NS.Derived/Orders`) to target source.
    pub(crate) bindings: IndexMap<String, NavigationSourceId>,
}

#[derive(Debug, Clone)]
pub(crate) struct ParameterDef {
    pub(crate) name: String,
    pub(crate) ty: TypeSpec,
    pub(crate) nullable: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct OperationDef {
    pub(crate) namespace: String,
    pub(crate) name: String,
    pub(crate) kind: OperationKind,
    pub(crate) is_bound: bool,
    pub(crate) is_composable: bool,
    pub(crate) parameters: Vec<ParameterDef>,
    pub(crate) return_type: Option<(TypeSpec, bool)>,
}

#[derive(Debug, Clone)]
pub(crate) struct OperationImportDef {
    pub(crate) name: String,
    pub(crate) operation: OperationId,
    pub(crate) entity_set: Option<EntitySetId>,
}

#[derive(Debug, Default)]
pub(crate) struct ModelData {
    pub(crate) container: String,
    pub(crate) entity_types: Vec<EntityTypeDef>,
    pub(crate) complex_types: Vec<ComplexTypeDef>,
    pub(crate) enum_types: Vec<EnumTypeDef>,
    pub(crate) entity_sets: Vec<NavigationSourceDef>,
    pub(crate) singletons: Vec<NavigationSourceDef>,
    pub(crate) operations: Vec<OperationDef>,
    pub(crate) operation_imports: Vec<OperationImportDef>,
    types_by_name: HashMap<String, SchemaTypeId>,
    sources_by_name: HashMap<String, NavigationSourceId>,
    operations_by_name: IndexMap<String, Vec<OperationId>>,
    imports_by_name: HashMap<String, OperationImportId>,
}

// ============================================================================
// EdmModel
// ============================================================================

/// Immutable schema shared by every node that references it.
///
/// Cloning is a reference-count bump. Two models are equal only if they are
/// the same allocation.
#[derive(Clone)]
pub struct EdmModel(Arc<ModelData>);

impl EdmModel {
    pub fn builder(container: &str) -> ModelBuilder {
        ModelBuilder::new(container)
    }

    pub(crate) fn data(&self) -> &ModelData {
        &self.0
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address used for hashing handles.
    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    pub fn container_name(&self) -> &str {
        &self.0.container
    }

    pub fn entity_type(&self, qualified_name: &str) -> Option<EntityType> {
        match self.0.types_by_name.get(qualified_name)? {
            SchemaTypeId::Entity(id) => Some(EntityType::new(self.clone(), *id)),
            _ => None,
        }
    }

    pub fn complex_type(&self, qualified_name: &str) -> Option<ComplexType> {
        match self.0.types_by_name.get(qualified_name)? {
            SchemaTypeId::Complex(id) => Some(ComplexType::new(self.clone(), *id)),
            _ => None,
        }
    }

    pub fn enum_type(&self, qualified_name: &str) -> Option<EnumType> {
        match self.0.types_by_name.get(qualified_name)? {
            SchemaTypeId::Enum(id) => Some(EnumType::new(self.clone(), *id)),
            _ => None,
        }
    }

    /// Resolve any named type, including `Edm.*` primitives.
    pub fn find_type(&self, qualified_name: &str) -> Option<EdmType> {
        if let Some(kind) = qualified_name
            .strip_prefix("Edm.")
            .and_then(PrimitiveKind::from_name)
        {
            return Some(EdmType::Primitive(kind));
        }
        let ty = match self.0.types_by_name.get(qualified_name)? {
            SchemaTypeId::Entity(id) => EdmType::Entity(EntityType::new(self.clone(), *id)),
            SchemaTypeId::Complex(id) => EdmType::Complex(ComplexType::new(self.clone(), *id)),
            SchemaTypeId::Enum(id) => EdmType::Enum(EnumType::new(self.clone(), *id)),
        };
        Some(ty)
    }

    pub fn entity_set(&self, name: &str) -> Option<EntitySet> {
        match self.0.sources_by_name.get(name)? {
            NavigationSourceId::EntitySet(id) => Some(EntitySet::new(self.clone(), *id)),
            NavigationSourceId::Singleton(_) => None,
        }
    }

    pub fn singleton(&self, name: &str) -> Option<Singleton> {
        match self.0.sources_by_name.get(name)? {
            NavigationSourceId::Singleton(id) => Some(Singleton::new(self.clone(), *id)),
            NavigationSourceId::EntitySet(_) => None,
        }
    }

    pub fn navigation_source(&self, name: &str) -> Option<NavigationSource> {
        self.0
            .sources_by_name
            .get(name)
            .map(|id| self.source_handle(*id))
    }

    /// All overloads sharing a qualified name, in declaration order.
    pub fn operations(&self, qualified_name: &str) -> Vec<Operation> {
        self.0
            .operations_by_name
            .get(qualified_name)
            .map(|ids| {
                ids.iter()
                    .map(|id| Operation::new(self.clone(), *id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn operation_import(&self, name: &str) -> Option<OperationImport> {
        self.0
            .imports_by_name
            .get(name)
            .map(|id| OperationImport::new(self.clone(), *id))
    }

    pub fn entity_types(&self) -> impl Iterator<Item = EntityType> + '_ {
        (0..self.0.entity_types.len())
            .map(|i| EntityType::new(self.clone(), EntityTypeId::next(i)))
    }

    pub fn entity_sets(&self) -> impl Iterator<Item = EntitySet> + '_ {
        (0..self.0.entity_sets.len()).map(|i| EntitySet::new(self.clone(), EntitySetId::next(i)))
    }

    pub(crate) fn source_handle(&self, id: NavigationSourceId) -> NavigationSource {
        match id {
            NavigationSourceId::EntitySet(id) => {
                NavigationSource::EntitySet(EntitySet::new(self.clone(), id))
            }
            NavigationSourceId::Singleton(id) => {
                NavigationSource::Singleton(Singleton::new(self.clone(), id))
            }
        }
    }
}

impl std::fmt::Debug for EdmModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdmModel")
            .field("container", &self.0.container)
            .field("entity_types", &self.0.entity_types.len())
            .field("entity_sets", &self.0.entity_sets.len())
            .finish()
    }
}

impl PartialEq for EdmModel {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for EdmModel {}

impl std::hash::Hash for EdmModel {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Declaration of a function or action, consumed by
/// [`ModelBuilder::add_operation`].
#[derive(Clone, Debug)]
pub struct OperationDecl {
    namespace: String,
    name: String,
    kind: OperationKind,
    is_bound: bool,
    is_composable: bool,
    parameters: Vec<ParameterDef>,
    return_type: Option<(TypeSpec, bool)>,
}

impl OperationDecl {
    pub fn function(namespace: &str, name: &str) -> Self {
        Self::new(namespace, name, OperationKind::Function)
    }

    pub fn action(namespace: &str, name: &str) -> Self {
        Self::new(namespace, name, OperationKind::Action)
    }

    fn new(namespace: &str, name: &str, kind: OperationKind) -> Self {
        Self {
            namespace: namespace.to_owned(),
            name: name.to_owned(),
            kind,
            is_bound: false,
            is_composable: false,
            parameters: Vec::new(),
            return_type: None,
        }
    }

    /// Mark as bound. The first parameter is the binding parameter.
    pub fn bound(mut self) -> Self {
        self.is_bound = true;
        self
    }

    pub fn composable(mut self) -> Self {
        self.is_composable = true;
        self
    }

    pub fn parameter(mut self, name: &str, ty: impl Into<TypeSpec>, nullable: bool) -> Self {
        self.parameters.push(ParameterDef {
            name: name.to_owned(),
            ty: ty.into(),
            nullable,
        });
        self
    }

    pub fn returns(mut self, ty: impl Into<TypeSpec>, nullable: bool) -> Self {
        self.return_type = Some((ty.into(), nullable));
        self
    }
}

/// Mutable model under construction. [`finish`](Self::finish) freezes it.
#[derive(Debug)]
pub struct ModelBuilder {
    data: ModelData,
}

impl ModelBuilder {
    pub fn new(container: &str) -> Self {
        Self {
            data: ModelData {
                container: container.to_owned(),
                ..ModelData::default()
            },
        }
    }

    fn claim_type_name(&mut self, qualified: String, id: SchemaTypeId) -> Result<(), ModelError> {
        if self.data.types_by_name.contains_key(&qualified) {
            return Err(ModelError::DuplicateName(qualified));
        }
        self.data.types_by_name.insert(qualified, id);
        Ok(())
    }

    fn claim_source_name(&mut self, name: &str, id: NavigationSourceId) -> Result<(), ModelError> {
        if self.data.sources_by_name.contains_key(name)
            || self.data.imports_by_name.contains_key(name)
        {
            return Err(ModelError::DuplicateName(name.to_owned()));
        }
        self.data.sources_by_name.insert(name.to_owned(), id);
        Ok(())
    }

    pub fn add_entity_type(
        &mut self,
        namespace: &str,
        name: &str,
        base: Option<EntityTypeId>,
    ) -> Result<EntityTypeId, ModelError> {
        let id = EntityTypeId::next(self.data.entity_types.len());
        self.claim_type_name(format!("{namespace}.{name}"), SchemaTypeId::Entity(id))?;
        let inherited_stream = base.is_some_and(|b| self.entity_def(b).has_stream);
        self.data.entity_types.push(EntityTypeDef {
            namespace: namespace.to_owned(),
            name: name.to_owned(),
            base,
            is_abstract: false,
            is_open: false,
            has_stream: inherited_stream,
            key: Vec::new(),
            structural: Vec::new(),
            navigation: Vec::new(),
        });
        Ok(id)
    }

    pub fn add_complex_type(
        &mut self,
        namespace: &str,
        name: &str,
        base: Option<ComplexTypeId>,
    ) -> Result<ComplexTypeId, ModelError> {
        let id = ComplexTypeId::next(self.data.complex_types.len());
        self.claim_type_name(format!("{namespace}.{name}"), SchemaTypeId::Complex(id))?;
        self.data.complex_types.push(ComplexTypeDef {
            namespace: namespace.to_owned(),
            name: name.to_owned(),
            base,
            is_abstract: false,
            is_open: false,
            structural: Vec::new(),
            navigation: Vec::new(),
        });
        Ok(id)
    }

    pub fn add_enum_type(
        &mut self,
        namespace: &str,
        name: &str,
        members: &[(&str, i64)],
        is_flags: bool,
    ) -> Result<EnumTypeId, ModelError> {
        let id = EnumTypeId::next(self.data.enum_types.len());
        self.claim_type_name(format!("{namespace}.{name}"), SchemaTypeId::Enum(id))?;
        self.data.enum_types.push(EnumTypeDef {
            namespace: namespace.to_owned(),
            name: name.to_owned(),
            is_flags,
            members: members.iter().map(|(n, v)| ((*n).to_owned(), *v)).collect(),
        });
        Ok(id)
    }

    pub fn set_open(&mut self, owner: impl Into<StructuredTypeId>, open: bool) {
        match owner.into() {
            StructuredTypeId::Entity(id) => self.entity_def_mut(id).is_open = open,
            StructuredTypeId::Complex(id) => self.complex_def_mut(id).is_open = open,
        }
    }

    pub fn set_abstract(&mut self, owner: impl Into<StructuredTypeId>, value: bool) {
        match owner.into() {
            StructuredTypeId::Entity(id) => self.entity_def_mut(id).is_abstract = value,
            StructuredTypeId::Complex(id) => self.complex_def_mut(id).is_abstract = value,
        }
    }

    /// Mark an entity type as a media entity (`$value` addresses its stream).
    pub fn set_has_stream(&mut self, owner: EntityTypeId, value: bool) {
        self.entity_def_mut(owner).has_stream = value;
    }

    pub fn add_property(
        &mut self,
        owner: impl Into<StructuredTypeId>,
        name: &str,
        ty: impl Into<TypeSpec>,
        nullable: bool,
    ) -> Result<(), ModelError> {
        let owner = owner.into();
        self.check_member_free(owner, name)?;
        let def = StructuralPropertyDef {
            name: name.to_owned(),
            ty: ty.into(),
            nullable,
        };
        match owner {
            StructuredTypeId::Entity(id) => self.entity_def_mut(id).structural.push(def),
            StructuredTypeId::Complex(id) => self.complex_def_mut(id).structural.push(def),
        }
        Ok(())
    }

    pub fn add_navigation(
        &mut self,
        owner: impl Into<StructuredTypeId>,
        name: &str,
        target: EntityTypeId,
        many: bool,
    ) -> Result<(), ModelError> {
        self.add_navigation_with(owner, name, target, many, !many, false)
    }

    /// Navigation property with explicit nullability and containment.
    pub fn add_navigation_with(
        &mut self,
        owner: impl Into<StructuredTypeId>,
        name: &str,
        target: EntityTypeId,
        many: bool,
        nullable: bool,
        contains_target: bool,
    ) -> Result<(), ModelError> {
        let owner = owner.into();
        self.check_member_free(owner, name)?;
        let def = NavigationPropertyDef {
            name: name.to_owned(),
            target,
            many,
            nullable,
            contains_target,
        };
        match owner {
            StructuredTypeId::Entity(id) => self.entity_def_mut(id).navigation.push(def),
            StructuredTypeId::Complex(id) => self.complex_def_mut(id).navigation.push(def),
        }
        Ok(())
    }

    /// Append a declared property to the entity type's key.
    pub fn add_key(&mut self, owner: EntityTypeId, property: &str) -> Result<(), ModelError> {
        let invalid = |reason| ModelError::InvalidKey {
            owner: self.entity_qualified_name(owner),
            property: property.to_owned(),
            reason,
        };
        let Some(prop) = self.find_structural(owner, property) else {
            return Err(invalid("is not a structural property"));
        };
        if !matches!(prop.ty, TypeSpec::Primitive(_) | TypeSpec::Enum(_)) {
            return Err(invalid("must be primitive or enum typed"));
        }
        if prop.nullable {
            return Err(invalid("must not be nullable"));
        }
        if self.entity_def(owner).key.iter().any(|k| k == property) {
            return Err(invalid("is already part of the key"));
        }
        self.entity_def_mut(owner).key.push(property.to_owned());
        Ok(())
    }

    pub fn add_entity_set(
        &mut self,
        name: &str,
        entity_type: EntityTypeId,
    ) -> Result<EntitySetId, ModelError> {
        let id = EntitySetId::next(self.data.entity_sets.len());
        self.claim_source_name(name, id.into())?;
        self.data.entity_sets.push(NavigationSourceDef {
            name: name.to_owned(),
            entity_type,
            bindings: IndexMap::new(),
        });
        Ok(id)
    }

    pub fn add_singleton(
        &mut self,
        name: &str,
        entity_type: EntityTypeId,
    ) -> Result<SingletonId, ModelError> {
        let id = SingletonId::next(self.data.singletons.len());
        self.claim_source_name(name, id.into())?;
        self.data.singletons.push(NavigationSourceDef {
            name: name.to_owned(),
            entity_type,
            bindings: IndexMap::new(),
        });
        Ok(id)
    }

    /// Bind a navigation property path of `source` to `target`.
    ///
    /// The path is either a property name or `Namespace.DerivedType/Name`.
    pub fn bind_navigation(
        &mut self,
        source: impl Into<NavigationSourceId>,
        path: &str,
        target: impl Into<NavigationSourceId>,
    ) -> Result<(), ModelError> {
        let source = source.into();
        let source_def = self.source_def(source);
        let (owner, nav_name) = match path.rsplit_once('/') {
            Some((cast, nav)) => match self.data.types_by_name.get(cast) {
                Some(SchemaTypeId::Entity(id)) => (*id, nav),
                _ => (source_def.entity_type, path),
            },
            None => (source_def.entity_type, path),
        };
        if self.find_navigation(owner, nav_name).is_none() {
            return Err(ModelError::UnknownNavigation {
                source_name: source_def.name.clone(),
                path: path.to_owned(),
            });
        }
        let target = target.into();
        self.source_def_mut(source)
            .bindings
            .insert(path.to_owned(), target);
        Ok(())
    }

    pub fn add_operation(&mut self, decl: OperationDecl) -> Result<OperationId, ModelError> {
        let qualified = format!("{}.{}", decl.namespace, decl.name);
        if decl.is_bound && decl.parameters.is_empty() {
            return Err(ModelError::MissingBindingParameter(qualified));
        }
        if self.data.types_by_name.contains_key(&qualified) {
            return Err(ModelError::DuplicateName(qualified));
        }
        let id = OperationId::next(self.data.operations.len());
        self.data.operations.push(OperationDef {
            namespace: decl.namespace,
            name: decl.name,
            kind: decl.kind,
            is_bound: decl.is_bound,
            is_composable: decl.is_composable,
            parameters: decl.parameters,
            return_type: decl.return_type,
        });
        self.data
            .operations_by_name
            .entry(qualified)
            .or_default()
            .push(id);
        Ok(id)
    }

    pub fn add_operation_import(
        &mut self,
        name: &str,
        operation: OperationId,
        entity_set: Option<EntitySetId>,
    ) -> Result<OperationImportId, ModelError> {
        if self.data.sources_by_name.contains_key(name)
            || self.data.imports_by_name.contains_key(name)
        {
            return Err(ModelError::DuplicateName(name.to_owned()));
        }
        let id = OperationImportId::next(self.data.operation_imports.len());
        self.data.operation_imports.push(OperationImportDef {
            name: name.to_owned(),
            operation,
            entity_set,
        });
        self.data.imports_by_name.insert(name.to_owned(), id);
        Ok(id)
    }

    pub fn finish(self) -> EdmModel {
        EdmModel(Arc::new(self.data))
    }

    // --- internal lookups ---

    fn entity_def(&self, id: EntityTypeId) -> &EntityTypeDef {
        &self.data.entity_types[id.index()]
    }

    fn entity_def_mut(&mut self, id: EntityTypeId) -> &mut EntityTypeDef {
        &mut self.data.entity_types[id.index()]
    }

    fn complex_def_mut(&mut self, id: ComplexTypeId) -> &mut ComplexTypeDef {
        &mut self.data.complex_types[id.index()]
    }

    fn source_def(&self, id: NavigationSourceId) -> &NavigationSourceDef {
        match id {
            NavigationSourceId::EntitySet(id) => &self.data.entity_sets[id.index()],
            NavigationSourceId::Singleton(id) => &self.data.singletons[id.index()],
        }
    }

    fn source_def_mut(&mut self, id: NavigationSourceId) -> &mut NavigationSourceDef {
        match id {
            NavigationSourceId::EntitySet(id) => &mut self.data.entity_sets[id.index()],
            NavigationSourceId::Singleton(id) => &mut self.data.singletons[id.index()],
        }
    }

    fn entity_qualified_name(&self, id: EntityTypeId) -> String {
        let def = self.entity_def(id);
        format!("{}.{}", def.namespace, def.name)
    }

    fn find_structural(&self, owner: EntityTypeId, name: &str) -> Option<&StructuralPropertyDef> {
        let mut current = Some(owner);
        while let Some(id) = current {
            let def = self.entity_def(id);
            if let Some(p) = def.structural.iter().find(|p| p.name == name) {
                return Some(p);
            }
            current = def.base;
        }
        None
    }

    fn find_navigation(&self, owner: EntityTypeId, name: &str) -> Option<&NavigationPropertyDef> {
        let mut current = Some(owner);
        while let Some(id) = current {
            let def = self.entity_def(id);
            if let Some(p) = def.navigation.iter().find(|p| p.name == name) {
                return Some(p);
            }
            current = def.base;
        }
        None
    }

    /// Member names must be unique across the inheritance chain.
    fn check_member_free(&self, owner: StructuredTypeId, name: &str) -> Result<(), ModelError> {
        let (qualified, taken) = match owner {
            StructuredTypeId::Entity(id) => (
                self.entity_qualified_name(id),
                self.find_structural(id, name).is_some()
                    || self.find_navigation(id, name).is_some(),
            ),
            StructuredTypeId::Complex(id) => {
                let mut taken = false;
                let mut current = Some(id);
                while let Some(cid) = current {
                    let def = &self.data.complex_types[cid.index()];
                    taken |= def.structural.iter().any(|p| p.name == name)
                        || def.navigation.iter().any(|p| p.name == name);
                    current = def.base;
                }
                let def = &self.data.complex_types[id.index()];
                (format!("{}.{}", def.namespace, def.name), taken)
            }
        };
        if taken {
            return Err(ModelError::DuplicateMember {
                owner: qualified,
                member: name.to_owned(),
            });
        }
        Ok(())
    }
}
