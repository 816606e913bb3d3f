//! Resource path segments.
//!
//! One [`PathSegment`] per URI path segment. `$count`, `$batch`, and
//! `$metadata` carry no data and are unit variants. Segment equality is
//! structural; model handles inside segments compare by identity.

mod segments;
mod translator;


use odata_edm::{EdmType, EdmTypeReference, NavigationSource, PrimitiveKind};

pub use segments::{
    BatchReferenceSegment, EntitySetSegment, KeySegment, NavigationPropertyLinkSegment,
    NavigationPropertySegment, OpenPropertySegment, OperationImportSegment, OperationSegment,
    OperationSegmentParameter, PropertySegment, SingletonSegment, TypeSegment, ValueSegment,
};
pub use translator::{NavigationSourceTranslator, PathSegmentHandler, PathSegmentTranslator};

use crate::path::KeyDelimiter;

#[derive(Clone, Debug, PartialEq)]
pub enum PathSegment {
    EntitySet(EntitySetSegment),
    Singleton(SingletonSegment),
    Key(KeySegment),
    NavigationProperty(NavigationPropertySegment),
    /// `Nav/$ref`.
    NavigationPropertyLink(NavigationPropertyLinkSegment),
    Type(TypeSegment),
    Property(PropertySegment),
    OpenProperty(OpenPropertySegment),
    Operation(OperationSegment),
    OperationImport(OperationImportSegment),
    Count,
    Value(ValueSegment),
    Batch,
    /// `$1`: reference to an earlier request in the same batch.
    BatchReference(BatchReferenceSegment),
    Metadata,
}

/// Kind tag of a [`PathSegment`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathSegmentKind {
    EntitySet,
    Singleton,
    Key,
    NavigationProperty,
    NavigationPropertyLink,
    Type,
    Property,
    OpenProperty,
    Operation,
    OperationImport,
    Count,
    Value,
    Batch,
    BatchReference,
    Metadata,
}

/// Segment construction failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SegmentError {
    #[error("{segment} type `{type_name}` is not related to `{source_type}`")]
    UnrelatedTypes {
        segment: &'static str,
        type_name: String,
        source_type: String,
    },

    #[error("`{0}` is not a content-ID reference")]
    InvalidContentId(String),

    #[error("`$value` cannot follow collection type `{0}`")]
    ValueOnCollection(String),

    #[error("{0} name must not be empty")]
    EmptyName(&'static str),

    #[error("key segment requires at least one key value")]
    EmptyKey,

    #[error("{0} requires at least one operation")]
    NoOperations(&'static str),

    #[error("overloads of `{0}` disagree on their return type")]
    AmbiguousReturnType(String),
}

pub(crate) fn reject(err: SegmentError) -> SegmentError {
    tracing::debug!(%err, "path segment rejected");
    err
}

impl PathSegment {
    pub fn kind(&self) -> PathSegmentKind {
        match self {
            Self::EntitySet(_) => PathSegmentKind::EntitySet,
            Self::Singleton(_) => PathSegmentKind::Singleton,
            Self::Key(_) => PathSegmentKind::Key,
            Self::NavigationProperty(_) => PathSegmentKind::NavigationProperty,
            Self::NavigationPropertyLink(_) => PathSegmentKind::NavigationPropertyLink,
            Self::Type(_) => PathSegmentKind::Type,
            Self::Property(_) => PathSegmentKind::Property,
            Self::OpenProperty(_) => PathSegmentKind::OpenProperty,
            Self::Operation(_) => PathSegmentKind::Operation,
            Self::OperationImport(_) => PathSegmentKind::OperationImport,
            Self::Count => PathSegmentKind::Count,
            Self::Value(_) => PathSegmentKind::Value,
            Self::Batch => PathSegmentKind::Batch,
            Self::BatchReference(_) => PathSegmentKind::BatchReference,
            Self::Metadata => PathSegmentKind::Metadata,
        }
    }

    /// Text this segment contributes to a path.
    pub fn identifier(&self) -> String {
        match self {
            Self::EntitySet(s) => s.entity_set().name().to_owned(),
            Self::Singleton(s) => s.singleton().name().to_owned(),
            Self::Key(s) => s.render(KeyDelimiter::Parentheses),
            Self::NavigationProperty(s) => s.property().name().to_owned(),
            Self::NavigationPropertyLink(s) => s.property().name().to_owned(),
            Self::Type(s) => s.target_type().element_type().full_name(),
            Self::Property(s) => s.property().name().to_owned(),
            Self::OpenProperty(s) => s.name().to_owned(),
            Self::Operation(s) => s.name(),
            Self::OperationImport(s) => s.name().to_owned(),
            Self::Count => "$count".to_owned(),
            Self::Value(_) => "$value".to_owned(),
            Self::Batch => "$batch".to_owned(),
            Self::BatchReference(s) => s.content_id().to_owned(),
            Self::Metadata => "$metadata".to_owned(),
        }
    }

    /// Whether the segment addresses a single item rather than a collection.
    pub fn is_single_result(&self) -> bool {
        match self {
            Self::EntitySet(_) => false,
            Self::NavigationProperty(s) => !s.property().is_collection(),
            Self::NavigationPropertyLink(s) => !s.property().is_collection(),
            Self::Type(s) => !s.target_type().is_collection(),
            Self::Property(s) => !s.property().is_collection(),
            Self::Operation(s) => !s.return_type().is_some_and(|t| t.is_collection()),
            Self::OperationImport(s) => !s.return_type().is_some_and(|t| t.is_collection()),
            Self::BatchReference(s) => !s.target_type().is_collection(),
            Self::Singleton(_)
            | Self::Key(_)
            | Self::OpenProperty(_)
            | Self::Count
            | Self::Value(_)
            | Self::Batch
            | Self::Metadata => true,
        }
    }

    /// Type addressed by the path up to and including this segment.
    pub fn target_type(&self) -> Option<EdmType> {
        match self {
            Self::EntitySet(s) => Some(EdmType::Collection(Box::new(
                s.entity_set().entity_type().to_type_reference(false),
            ))),
            Self::Singleton(s) => Some(EdmType::Entity(s.singleton().entity_type())),
            Self::Key(s) => Some(EdmType::Entity(s.entity_type().clone())),
            Self::NavigationProperty(s) => Some(s.property().type_reference().into_definition()),
            Self::NavigationPropertyLink(s) => {
                Some(s.property().type_reference().into_definition())
            }
            Self::Type(s) => Some(s.target_type().clone()),
            Self::Property(s) => Some(s.property().type_reference().into_definition()),
            Self::OpenProperty(_) => None,
            Self::Operation(s) => s.return_type().map(EdmTypeReference::into_definition),
            Self::OperationImport(s) => s.return_type().map(EdmTypeReference::into_definition),
            Self::Count => Some(EdmType::Primitive(PrimitiveKind::Int32)),
            Self::Value(s) => s.target_type().cloned(),
            Self::Batch | Self::Metadata => None,
            Self::BatchReference(s) => Some(s.target_type().clone()),
        }
    }

    /// Entity set or singleton addressed by this segment, when it has one.
    pub fn target_navigation_source(&self) -> Option<NavigationSource> {
        self.translate_with(&mut NavigationSourceTranslator)
    }

    pub fn translate_with<T, V>(&self, translator: &mut V) -> T
    where
        V: PathSegmentTranslator<T> + ?Sized,
    {
        match self {
            Self::EntitySet(s) => translator.translate_entity_set(s),
            Self::Singleton(s) => translator.translate_singleton(s),
            Self::Key(s) => translator.translate_key(s),
            Self::NavigationProperty(s) => translator.translate_navigation_property(s),
            Self::NavigationPropertyLink(s) => translator.translate_navigation_property_link(s),
            Self::Type(s) => translator.translate_type(s),
            Self::Property(s) => translator.translate_property(s),
            Self::OpenProperty(s) => translator.translate_open_property(s),
            Self::Operation(s) => translator.translate_operation(s),
            Self::OperationImport(s) => translator.translate_operation_import(s),
            Self::Count => translator.translate_count(),
            Self::Value(s) => translator.translate_value(s),
            Self::Batch => translator.translate_batch(),
            Self::BatchReference(s) => translator.translate_batch_reference(s),
            Self::Metadata => translator.translate_metadata(),
        }
    }

    pub fn handle_with<H>(&self, handler: &mut H)
    where
        H: PathSegmentHandler + ?Sized,
    {
        match self {
            Self::EntitySet(s) => handler.handle_entity_set(s),
            Self::Singleton(s) => handler.handle_singleton(s),
            Self::Key(s) => handler.handle_key(s),
            Self::NavigationProperty(s) => handler.handle_navigation_property(s),
            Self::NavigationPropertyLink(s) => handler.handle_navigation_property_link(s),
            Self::Type(s) => handler.handle_type(s),
            Self::Property(s) => handler.handle_property(s),
            Self::OpenProperty(s) => handler.handle_open_property(s),
            Self::Operation(s) => handler.handle_operation(s),
            Self::OperationImport(s) => handler.handle_operation_import(s),
            Self::Count => handler.handle_count(),
            Self::Value(s) => handler.handle_value(s),
            Self::Batch => handler.handle_batch(),
            Self::BatchReference(s) => handler.handle_batch_reference(s),
            Self::Metadata => handler.handle_metadata(),
        }
    }
}

macro_rules! impl_from_segment {
    ($($variant:ident($segment:ty)),* $(,)?) => {
        $(
            impl From<$segment> for PathSegment {
                fn from(segment: $segment) -> Self {
                    Self::$variant(segment)
                }
            }
        )*
    };
}

impl_from_segment!(
    EntitySet(EntitySetSegment),
    Singleton(SingletonSegment),
    Key(KeySegment),
    NavigationProperty(NavigationPropertySegment),
    NavigationPropertyLink(NavigationPropertyLinkSegment),
    Type(TypeSegment),
    Property(PropertySegment),
    OpenProperty(OpenPropertySegment),
    Operation(OperationSegment),
    OperationImport(OperationImportSegment),
    Value(ValueSegment),
    BatchReference(BatchReferenceSegment),
);
