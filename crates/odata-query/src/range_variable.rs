//! Range variables: `$it` and lambda parameters.

use odata_edm::{EdmType, EdmTypeReference, EntityType, NavigationSource};

use crate::node::NodeError;

/// Name of the implicit range variable of `$filter` and `$orderby`.
pub const IMPLICIT_RANGE_VARIABLE: &str = "$it";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RangeVariableKind {
    /// Iterates entities.
    Resource,
    /// Iterates primitive, complex, or enum values.
    NonResource,
}

impl std::fmt::Display for RangeVariableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resource => f.write_str("resource"),
            Self::NonResource => f.write_str("non-resource"),
        }
    }
}

/// An iteration variable over a collection.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeVariable {
    name: String,
    type_reference: Option<EdmTypeReference>,
    kind: RangeVariableKind,
    navigation_source: Option<NavigationSource>,
}

impl RangeVariable {
    /// Entity range variable. The navigation source, when known, is where the
    /// iterated entities live.
    pub fn resource(
        name: &str,
        entity_type: EntityType,
        navigation_source: Option<NavigationSource>,
    ) -> Result<Self, NodeError> {
        check_name(name)?;
        Ok(Self {
            name: name.to_owned(),
            type_reference: Some(entity_type.to_type_reference(false)),
            kind: RangeVariableKind::Resource,
            navigation_source,
        })
    }

    /// Value range variable. `None` type means an open (untyped) collection.
    pub fn non_resource(
        name: &str,
        type_reference: Option<EdmTypeReference>,
    ) -> Result<Self, NodeError> {
        check_name(name)?;
        if let Some(ty) = &type_reference
            && matches!(ty.definition(), EdmType::Entity(_))
        {
            let err = NodeError::RangeVariableType {
                name: name.to_owned(),
                type_name: ty.full_name(),
            };
            tracing::debug!(%err, "range variable rejected");
            return Err(err);
        }
        Ok(Self {
            name: name.to_owned(),
            type_reference,
            kind: RangeVariableKind::NonResource,
            navigation_source: None,
        })
    }

    /// The implicit `$it` over an entity set or singleton.
    pub fn implicit(navigation_source: NavigationSource) -> Self {
        Self {
            name: IMPLICIT_RANGE_VARIABLE.to_owned(),
            type_reference: Some(navigation_source.entity_type().to_type_reference(false)),
            kind: RangeVariableKind::Resource,
            navigation_source: Some(navigation_source),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_reference(&self) -> Option<&EdmTypeReference> {
        self.type_reference.as_ref()
    }

    pub fn kind(&self) -> RangeVariableKind {
        self.kind
    }

    pub fn is_implicit(&self) -> bool {
        self.name == IMPLICIT_RANGE_VARIABLE
    }

    /// Entity type iterated by a resource range variable.
    pub fn entity_type(&self) -> Option<&EntityType> {
        self.type_reference.as_ref()?.as_entity()
    }

    pub fn navigation_source(&self) -> Option<&NavigationSource> {
        self.navigation_source.as_ref()
    }
}

fn check_name(name: &str) -> Result<(), NodeError> {
    if name.is_empty() {
        let err = NodeError::EmptyName("range variable");
        tracing::debug!(%err, "range variable rejected");
        return Err(err);
    }
    Ok(())
}
