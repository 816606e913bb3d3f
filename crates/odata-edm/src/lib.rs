#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Entity data model (EDM) consumed by the OData bound query model.
//!
//! Two layers:
//! - **Storage layer** (`model`): id-indexed definitions, built once by
//!   [`ModelBuilder`] and frozen into an [`EdmModel`]
//! - **Handle layer** (`handles`): cheap `(model, id)` pairs such as
//!   [`EntityType`] or [`EntitySet`] that resolve definitions on demand
//!
//! The query model never mutates a model; it stores handles and compares them
//! for relatedness (same type, subtype, or supertype).

mod handles;
mod invariants;
mod literal;
mod model;
mod primitive;
mod types;

#[cfg(test)]
mod model_tests;
#[cfg(test)]
mod types_tests;

pub use handles::{
    ComplexType, EntitySet, EntityType, EnumType, NavigationProperty, NavigationSource,
    NavigationSourceKind, Operation, OperationImport, OperationParameter, Property, Singleton,
    StructuralProperty, StructuredType,
};
pub use literal::LiteralValue;
pub use model::{
    ComplexTypeId, EdmModel, EntitySetId, EntityTypeId, EnumTypeId, ModelBuilder, ModelError,
    NavigationSourceId, OperationDecl, OperationId, OperationImportId, OperationKind,
    SingletonId, StructuredTypeId, TypeSpec,
};
pub use primitive::PrimitiveKind;
pub use types::{EdmType, EdmTypeKind, EdmTypeReference};
