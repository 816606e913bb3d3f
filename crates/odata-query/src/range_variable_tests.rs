use odata_edm::{EdmTypeReference, PrimitiveKind};

use crate::node::NodeError;
use crate::range_variable::{IMPLICIT_RANGE_VARIABLE, RangeVariable, RangeVariableKind};
use crate::test_utils::{address, it, people_source, person, sample_model};

#[test]
fn implicit_variable_iterates_the_source() {
    let model = sample_model();
    let it = it(&model);
    assert_eq!(it.name(), IMPLICIT_RANGE_VARIABLE);
    assert!(it.is_implicit());
    assert_eq!(it.kind(), RangeVariableKind::Resource);
    assert_eq!(it.entity_type(), Some(&person(&model)));
    assert_eq!(it.navigation_source(), Some(&people_source(&model)));
    assert_eq!(
        it.type_reference(),
        Some(&person(&model).to_type_reference(false))
    );
}

#[test]
fn lambda_resource_variable() {
    let model = sample_model();
    let x = RangeVariable::resource("x", person(&model), None).unwrap();
    assert!(!x.is_implicit());
    assert_eq!(x.kind(), RangeVariableKind::Resource);
    assert_eq!(x.navigation_source(), None);

    let err = RangeVariable::resource("", person(&model), None).unwrap_err();
    assert_eq!(err, NodeError::EmptyName("range variable"));
}

#[test]
fn non_resource_variable_rejects_entity_types() {
    let model = sample_model();
    let email = RangeVariable::non_resource(
        "e",
        Some(EdmTypeReference::primitive(PrimitiveKind::String, false)),
    )
    .unwrap();
    assert_eq!(email.kind(), RangeVariableKind::NonResource);
    assert_eq!(email.entity_type(), None);

    let a =
        RangeVariable::non_resource("a", Some(address(&model).to_type_reference(true))).unwrap();
    assert_eq!(a.kind().to_string(), "non-resource");

    let untyped = RangeVariable::non_resource("o", None).unwrap();
    assert_eq!(untyped.type_reference(), None);

    let err = RangeVariable::non_resource("p", Some(person(&model).to_type_reference(false)))
        .unwrap_err();
    assert!(matches!(err, NodeError::RangeVariableType { .. }));
}
