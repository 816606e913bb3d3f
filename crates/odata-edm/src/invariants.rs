//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::model::{
    ComplexTypeDef, ComplexTypeId, EntitySetId, EntityTypeDef, EntityTypeId, EnumTypeDef,
    EnumTypeId, ModelData, NavigationSourceDef, OperationDef, OperationId, OperationImportDef,
    OperationImportId, SingletonId,
};

impl ModelData {
    pub(crate) fn ensure_entity_type(&self, id: EntityTypeId) -> &EntityTypeDef {
        self.entity_types.get(id.index()).unwrap_or_else(|| {
            panic!(
                "EdmModel: entity type id {} not found \
                 (handles must only be minted by the model that owns them)",
                id.as_u32()
            )
        })
    }

    pub(crate) fn ensure_complex_type(&self, id: ComplexTypeId) -> &ComplexTypeDef {
        self.complex_types.get(id.index()).unwrap_or_else(|| {
            panic!(
                "EdmModel: complex type id {} not found \
                 (handles must only be minted by the model that owns them)",
                id.as_u32()
            )
        })
    }

    pub(crate) fn ensure_enum_type(&self, id: EnumTypeId) -> &EnumTypeDef {
        self.enum_types.get(id.index()).unwrap_or_else(|| {
            panic!(
                "EdmModel: enum type id {} not found \
                 (handles must only be minted by the model that owns them)",
                id.as_u32()
            )
        })
    }

    pub(crate) fn ensure_entity_set(&self, id: EntitySetId) -> &NavigationSourceDef {
        self.entity_sets.get(id.index()).unwrap_or_else(|| {
            panic!("EdmModel: entity set id {} not found", id.as_u32())
        })
    }

    pub(crate) fn ensure_singleton(&self, id: SingletonId) -> &NavigationSourceDef {
        self.singletons.get(id.index()).unwrap_or_else(|| {
            panic!("EdmModel: singleton id {} not found", id.as_u32())
        })
    }

    pub(crate) fn ensure_operation(&self, id: OperationId) -> &OperationDef {
        self.operations.get(id.index()).unwrap_or_else(|| {
            panic!("EdmModel: operation id {} not found", id.as_u32())
        })
    }

    pub(crate) fn ensure_operation_import(&self, id: OperationImportId) -> &OperationImportDef {
        self.operation_imports.get(id.index()).unwrap_or_else(|| {
            panic!("EdmModel: operation import id {} not found", id.as_u32())
        })
    }
}
