//! Type descriptors and type references.

use crate::handles::{ComplexType, EntityType, EnumType};
use crate::model::{EdmModel, TypeSpec};
use crate::primitive::PrimitiveKind;

/// A schema type definition.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum EdmType {
    Primitive(PrimitiveKind),
    Complex(ComplexType),
    Entity(EntityType),
    Enum(EnumType),
    /// `Collection(T)`; the element carries its own nullability.
    Collection(Box<EdmTypeReference>),
    /// `Edm.Untyped`.
    Untyped,
}

/// Coarse classification of an [`EdmType`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum EdmTypeKind {
    Primitive,
    Complex,
    Entity,
    Enum,
    Collection,
    Untyped,
}

impl EdmType {
    pub fn kind(&self) -> EdmTypeKind {
        match self {
            Self::Primitive(_) => EdmTypeKind::Primitive,
            Self::Complex(_) => EdmTypeKind::Complex,
            Self::Entity(_) => EdmTypeKind::Entity,
            Self::Enum(_) => EdmTypeKind::Enum,
            Self::Collection(_) => EdmTypeKind::Collection,
            Self::Untyped => EdmTypeKind::Untyped,
        }
    }

    pub fn full_name(&self) -> String {
        match self {
            Self::Primitive(k) => k.full_name(),
            Self::Complex(t) => t.full_name(),
            Self::Entity(t) => t.full_name(),
            Self::Enum(t) => t.full_name(),
            Self::Collection(element) => format!("Collection({})", element.full_name()),
            Self::Untyped => "Edm.Untyped".to_owned(),
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }

    /// Element type for collections, the type itself otherwise.
    pub fn element_type(&self) -> &EdmType {
        match self {
            Self::Collection(element) => element.definition(),
            other => other,
        }
    }

    pub fn as_entity(&self) -> Option<&EntityType> {
        match self {
            Self::Entity(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_complex(&self) -> Option<&ComplexType> {
        match self {
            Self::Complex(t) => Some(t),
            _ => None,
        }
    }

    /// Same type, or one derives from the other. Collections compare their
    /// elements; primitives and enums must be identical.
    pub fn is_related_to(&self, other: &EdmType) -> bool {
        match (self, other) {
            (Self::Entity(a), Self::Entity(b)) => a.is_related_to(b),
            (Self::Complex(a), Self::Complex(b)) => a.is_related_to(b),
            (Self::Collection(a), Self::Collection(b)) => {
                a.definition().is_related_to(b.definition())
            }
            (a, b) => a == b,
        }
    }
}

impl std::fmt::Display for EdmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_name())
    }
}

/// A type plus the nullability of the slot that holds it.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct EdmTypeReference {
    definition: EdmType,
    nullable: bool,
}

impl EdmTypeReference {
    pub fn new(definition: EdmType, nullable: bool) -> Self {
        Self {
            definition,
            nullable,
        }
    }

    pub fn primitive(kind: PrimitiveKind, nullable: bool) -> Self {
        Self::new(EdmType::Primitive(kind), nullable)
    }

    pub fn boolean(nullable: bool) -> Self {
        Self::primitive(PrimitiveKind::Boolean, nullable)
    }

    pub fn entity(ty: EntityType, nullable: bool) -> Self {
        Self::new(EdmType::Entity(ty), nullable)
    }

    pub fn complex(ty: ComplexType, nullable: bool) -> Self {
        Self::new(EdmType::Complex(ty), nullable)
    }

    pub fn enumeration(ty: EnumType, nullable: bool) -> Self {
        Self::new(EdmType::Enum(ty), nullable)
    }

    /// `Collection(element)`. Collection references themselves are never null.
    pub fn collection(element: EdmTypeReference) -> Self {
        Self::new(EdmType::Collection(Box::new(element)), false)
    }

    pub fn definition(&self) -> &EdmType {
        &self.definition
    }

    pub fn into_definition(self) -> EdmType {
        self.definition
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn full_name(&self) -> String {
        self.definition.full_name()
    }

    pub fn is_collection(&self) -> bool {
        self.definition.is_collection()
    }

    pub fn element_type(&self) -> Option<&EdmTypeReference> {
        match &self.definition {
            EdmType::Collection(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self.definition {
            EdmType::Primitive(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&EntityType> {
        self.definition.as_entity()
    }

    pub fn as_complex(&self) -> Option<&ComplexType> {
        self.definition.as_complex()
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.definition, EdmType::Primitive(_))
    }

    pub fn is_complex(&self) -> bool {
        matches!(self.definition, EdmType::Complex(_))
    }

    pub fn is_entity(&self) -> bool {
        matches!(self.definition, EdmType::Entity(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.definition, EdmType::Enum(_))
    }

    pub(crate) fn from_spec(model: &EdmModel, spec: &TypeSpec, nullable: bool) -> Self {
        let definition = match spec {
            TypeSpec::Primitive(kind) => EdmType::Primitive(*kind),
            TypeSpec::Complex(id) => EdmType::Complex(ComplexType::new(model.clone(), *id)),
            TypeSpec::Entity(id) => EdmType::Entity(EntityType::new(model.clone(), *id)),
            TypeSpec::Enum(id) => EdmType::Enum(EnumType::new(model.clone(), *id)),
            TypeSpec::Collection(element) => {
                return Self::collection(Self::from_spec(model, element, nullable));
            }
            TypeSpec::Untyped => EdmType::Untyped,
        };
        Self::new(definition, nullable)
    }
}

impl std::fmt::Display for EdmTypeReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_name())?;
        if self.nullable && !self.is_collection() {
            f.write_str("?")?;
        }
        Ok(())
    }
}
