use crate::{EdmModel, EdmType, EdmTypeKind, EdmTypeReference, PrimitiveKind};

#[test]
fn primitive_names_round_trip() {
    for kind in PrimitiveKind::ALL {
        assert_eq!(PrimitiveKind::from_name(&kind.full_name()), Some(kind));
        assert_eq!(PrimitiveKind::from_name(kind.name()), Some(kind));
    }
    assert_eq!(PrimitiveKind::from_name("Edm.Geography"), None);
}

#[test]
fn primitive_classification() {
    assert!(PrimitiveKind::Int64.is_integral());
    assert!(PrimitiveKind::Decimal.is_numeric());
    assert!(!PrimitiveKind::Decimal.is_integral());
    assert!(PrimitiveKind::Duration.is_temporal());
    assert!(!PrimitiveKind::String.is_numeric());
}

#[test]
fn collection_reference_exposes_element() {
    let element = EdmTypeReference::primitive(PrimitiveKind::String, true);
    let coll = EdmTypeReference::collection(element.clone());

    assert!(coll.is_collection());
    assert!(!coll.is_nullable());
    assert_eq!(coll.element_type(), Some(&element));
    assert_eq!(coll.definition().kind(), EdmTypeKind::Collection);
    assert_eq!(coll.definition().element_type(), element.definition());
    assert_eq!(coll.full_name(), "Collection(Edm.String)");
}

#[test]
fn display_marks_nullable_scalars() {
    let ty = EdmTypeReference::primitive(PrimitiveKind::Int32, true);
    assert_eq!(ty.to_string(), "Edm.Int32?");
    assert_eq!(ty.with_nullable(false).to_string(), "Edm.Int32");
}

#[test]
fn relatedness_follows_inheritance() {
    let mut b = EdmModel::builder("C");
    let animal = b.add_entity_type("NS", "Animal", None).unwrap();
    b.add_entity_type("NS", "Dog", Some(animal)).unwrap();
    b.add_entity_type("NS", "Rock", None).unwrap();
    let model = b.finish();

    let animal = EdmType::Entity(model.entity_type("NS.Animal").unwrap());
    let dog = EdmType::Entity(model.entity_type("NS.Dog").unwrap());
    let rock = EdmType::Entity(model.entity_type("NS.Rock").unwrap());

    assert!(dog.is_related_to(&animal));
    assert!(animal.is_related_to(&dog));
    assert!(!rock.is_related_to(&animal));

    let dogs = EdmType::Collection(Box::new(EdmTypeReference::new(dog, false)));
    let animals = EdmType::Collection(Box::new(EdmTypeReference::new(animal, false)));
    assert!(dogs.is_related_to(&animals));
}

#[test]
fn primitives_relate_only_to_themselves() {
    let a = EdmType::Primitive(PrimitiveKind::Int32);
    let b = EdmType::Primitive(PrimitiveKind::Int64);
    assert!(a.is_related_to(&a.clone()));
    assert!(!a.is_related_to(&b));
}
