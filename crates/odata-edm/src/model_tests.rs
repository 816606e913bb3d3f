use crate::{
    EdmModel, EdmType, ModelError, NavigationSource, OperationDecl, PrimitiveKind, Property,
    TypeSpec,
};

fn people_model() -> EdmModel {
    let mut b = EdmModel::builder("Container");
    let person = b.add_entity_type("NS", "Person", None).unwrap();
    b.add_property(person, "ID", PrimitiveKind::Int32, false).unwrap();
    b.add_property(person, "Name", PrimitiveKind::String, true).unwrap();
    b.add_key(person, "ID").unwrap();

    let employee = b.add_entity_type("NS", "Employee", Some(person)).unwrap();
    b.add_property(employee, "Salary", PrimitiveKind::Decimal, false)
        .unwrap();
    b.add_navigation(employee, "Manager", person, false).unwrap();

    b.add_navigation(person, "Friends", person, true).unwrap();

    let people = b.add_entity_set("People", person).unwrap();
    let boss = b.add_singleton("Boss", person).unwrap();
    b.bind_navigation(people, "Friends", people).unwrap();
    b.bind_navigation(people, "NS.Employee/Manager", boss).unwrap();

    b.add_operation(
        OperationDecl::function("NS", "Oldest")
            .bound()
            .parameter("bindingParameter", TypeSpec::collection(person), false)
            .returns(person, true),
    )
    .unwrap();
    b.finish()
}

#[test]
fn lookups_by_qualified_name() {
    let model = people_model();

    let person = model.entity_type("NS.Person").unwrap();
    assert_eq!(person.name(), "Person");
    assert_eq!(person.full_name(), "NS.Person");
    assert!(model.entity_type("NS.Nope").is_none());
    assert!(model.complex_type("NS.Person").is_none());
    assert_eq!(
        model.find_type("Edm.Int32"),
        Some(EdmType::Primitive(PrimitiveKind::Int32))
    );
}

#[test]
fn handles_compare_by_identity() {
    let model = people_model();
    let a = model.entity_type("NS.Person").unwrap();
    let b = model.entity_type("NS.Person").unwrap();
    assert_eq!(a, b);

    let other = people_model();
    let c = other.entity_type("NS.Person").unwrap();
    assert_ne!(a, c);
}

#[test]
fn inheritance_and_relatedness() {
    let model = people_model();
    let person = model.entity_type("NS.Person").unwrap();
    let employee = model.entity_type("NS.Employee").unwrap();

    assert_eq!(employee.base_type(), Some(person.clone()));
    assert!(employee.is_or_inherits_from(&person));
    assert!(!person.is_or_inherits_from(&employee));
    assert!(person.is_related_to(&employee));
    assert!(employee.is_related_to(&person));
}

#[test]
fn inherited_members_and_key() {
    let model = people_model();
    let employee = model.entity_type("NS.Employee").unwrap();

    let names: Vec<_> = employee
        .structural_properties()
        .iter()
        .map(|p| p.name().to_owned())
        .collect();
    assert_eq!(names, ["ID", "Name", "Salary"]);

    let key: Vec<_> = employee.key().iter().map(|p| p.name().to_owned()).collect();
    assert_eq!(key, ["ID"]);

    assert!(matches!(
        employee.find_property("Friends"),
        Some(Property::Navigation(_))
    ));
}

#[test]
fn navigation_bindings_resolve() {
    let model = people_model();
    let people = model.entity_set("People").unwrap();
    let person = model.entity_type("NS.Person").unwrap();
    let employee = model.entity_type("NS.Employee").unwrap();

    let friends = person.find_property("Friends").unwrap().into_navigation().unwrap();
    let target = people.find_navigation_target(&friends).unwrap();
    assert_eq!(target.name(), "People");

    let manager = employee.find_property("Manager").unwrap().into_navigation().unwrap();
    let target = people.find_navigation_target(&manager).unwrap();
    assert!(matches!(target, NavigationSource::Singleton(_)));
}

#[test]
fn navigation_type_reference_wraps_collections() {
    let model = people_model();
    let person = model.entity_type("NS.Person").unwrap();
    let friends = person.find_property("Friends").unwrap();

    let ty = friends.type_reference();
    assert!(ty.is_collection());
    assert_eq!(ty.full_name(), "Collection(NS.Person)");
}

#[test]
fn operations_keep_overloads_in_order() {
    let model = people_model();
    let ops = model.operations("NS.Oldest");
    assert_eq!(ops.len(), 1);
    assert!(ops[0].is_bound());
    assert!(ops[0].is_function());
    assert_eq!(
        ops[0].binding_parameter_type().unwrap().full_name(),
        "Collection(NS.Person)"
    );
    assert_eq!(ops[0].return_type().unwrap().full_name(), "NS.Person");
}

#[test]
fn duplicate_type_name_rejected() {
    let mut b = EdmModel::builder("C");
    b.add_entity_type("NS", "A", None).unwrap();
    let err = b.add_complex_type("NS", "A", None).unwrap_err();
    assert_eq!(err, ModelError::DuplicateName("NS.A".to_owned()));
}

#[test]
fn duplicate_member_across_inheritance_rejected() {
    let mut b = EdmModel::builder("C");
    let base = b.add_entity_type("NS", "Base", None).unwrap();
    b.add_property(base, "X", PrimitiveKind::Int32, false).unwrap();
    let derived = b.add_entity_type("NS", "Derived", Some(base)).unwrap();

    let err = b
        .add_property(derived, "X", PrimitiveKind::String, true)
        .unwrap_err();
    assert!(matches!(err, ModelError::DuplicateMember { .. }));
}

#[test]
fn key_must_be_non_nullable_primitive() {
    let mut b = EdmModel::builder("C");
    let t = b.add_entity_type("NS", "T", None).unwrap();
    let c = b.add_complex_type("NS", "Addr", None).unwrap();
    b.add_property(t, "Loose", PrimitiveKind::Int32, true).unwrap();
    b.add_property(t, "Address", c, false).unwrap();

    assert!(matches!(
        b.add_key(t, "Missing"),
        Err(ModelError::InvalidKey { .. })
    ));
    assert!(matches!(
        b.add_key(t, "Loose"),
        Err(ModelError::InvalidKey { .. })
    ));
    assert!(matches!(
        b.add_key(t, "Address"),
        Err(ModelError::InvalidKey { .. })
    ));
}

#[test]
fn binding_unknown_navigation_rejected() {
    let mut b = EdmModel::builder("C");
    let t = b.add_entity_type("NS", "T", None).unwrap();
    let set = b.add_entity_set("Ts", t).unwrap();

    let err = b.bind_navigation(set, "Nope", set).unwrap_err();
    assert_eq!(
        err.to_string(),
        "`Nope` is not a navigation property of `Ts`"
    );
}

#[test]
fn bound_operation_needs_binding_parameter() {
    let mut b = EdmModel::builder("C");
    let err = b
        .add_operation(OperationDecl::action("NS", "Reset").bound())
        .unwrap_err();
    assert_eq!(err, ModelError::MissingBindingParameter("NS.Reset".to_owned()));
}

#[test]
fn media_entity_flag_is_inherited() {
    let mut b = EdmModel::builder("C");
    let photo = b.add_entity_type("NS", "Photo", None).unwrap();
    b.set_has_stream(photo, true);
    let thumb = b.add_entity_type("NS", "Thumbnail", Some(photo)).unwrap();
    let model = b.finish();

    assert!(model.entity_type("NS.Photo").unwrap().has_stream());
    assert_eq!(thumb.as_u32(), 1);
    assert!(model.entity_type("NS.Thumbnail").unwrap().has_stream());
}
