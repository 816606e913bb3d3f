//! Shared fixtures: a small people service and a resource-path re-parser.

use odata_edm::{
    ComplexType, EdmModel, EdmType, EntitySet, EntityType, LiteralValue, NavigationProperty,
    NavigationSource, OperationDecl, PrimitiveKind, StructuralProperty, TypeSpec,
};

use crate::clause::{ExpandedNavigationSelectItem, ExpandedReferenceSelectItem};
use crate::node::{QueryNode, ResourceRangeVariableReferenceNode, SingleValuePropertyAccessNode};
use crate::path::{ODataExpandPath, ODataPath};
use crate::range_variable::RangeVariable;
use crate::segment::{
    EntitySetSegment, KeySegment, NavigationPropertySegment, PathSegment, PropertySegment,
    SingletonSegment, TypeSegment, ValueSegment,
};

/// People service:
///
/// ```text
/// NS.Person   UserName (key), Name, Age, Emails[], Address, Addresses[], Gender,
///             Friends -> Person[], BestFriend -> Person
/// NS.Employee : NS.Person   Salary, Manager -> Person
/// NS.Company  ID (key), Name
/// NS.Address  City, Street
/// NS.Gender   Male | Female
///
/// People: NS.Person, Employees: NS.Employee, Companies: NS.Company,
/// Me: NS.Person (singleton)
/// ```
pub fn sample_model() -> EdmModel {
    let mut b = EdmModel::builder("Container");

    let address = b.add_complex_type("NS", "Address", None).unwrap();
    b.add_property(address, "City", PrimitiveKind::String, true)
        .unwrap();
    b.add_property(address, "Street", PrimitiveKind::String, true)
        .unwrap();

    let gender = b
        .add_enum_type("NS", "Gender", &[("Male", 0), ("Female", 1)], false)
        .unwrap();

    let person = b.add_entity_type("NS", "Person", None).unwrap();
    b.add_property(person, "UserName", PrimitiveKind::String, false)
        .unwrap();
    b.add_property(person, "Name", PrimitiveKind::String, true)
        .unwrap();
    b.add_property(person, "Age", PrimitiveKind::Int32, true)
        .unwrap();
    b.add_property(
        person,
        "Emails",
        TypeSpec::collection(PrimitiveKind::String),
        false,
    )
    .unwrap();
    b.add_property(person, "Address", address, true).unwrap();
    b.add_property(person, "Addresses", TypeSpec::collection(address), false)
        .unwrap();
    b.add_property(person, "Gender", gender, true).unwrap();
    b.add_key(person, "UserName").unwrap();
    b.add_navigation(person, "Friends", person, true).unwrap();
    b.add_navigation(person, "BestFriend", person, false)
        .unwrap();

    let employee = b.add_entity_type("NS", "Employee", Some(person)).unwrap();
    b.add_property(employee, "Salary", PrimitiveKind::Decimal, false)
        .unwrap();
    b.add_navigation(employee, "Manager", person, false)
        .unwrap();

    let company = b.add_entity_type("NS", "Company", None).unwrap();
    b.add_property(company, "ID", PrimitiveKind::Int32, false)
        .unwrap();
    b.add_property(company, "Name", PrimitiveKind::String, true)
        .unwrap();
    b.add_key(company, "ID").unwrap();

    let people = b.add_entity_set("People", person).unwrap();
    b.add_entity_set("Employees", employee).unwrap();
    b.add_entity_set("Companies", company).unwrap();
    let me = b.add_singleton("Me", person).unwrap();
    b.bind_navigation(people, "Friends", people).unwrap();
    b.bind_navigation(people, "BestFriend", people).unwrap();
    b.bind_navigation(people, "NS.Employee/Manager", people)
        .unwrap();
    b.bind_navigation(me, "Friends", people).unwrap();

    b.add_operation(
        OperationDecl::function("NS", "GetFriendsNamed")
            .bound()
            .parameter("person", person, false)
            .parameter("name", PrimitiveKind::String, true)
            .returns(TypeSpec::collection(person), false),
    )
    .unwrap();
    b.add_operation(
        OperationDecl::function("NS", "GetAge")
            .bound()
            .parameter("person", person, false)
            .returns(PrimitiveKind::Int32, false),
    )
    .unwrap();
    b.add_operation(
        OperationDecl::action("NS", "ShareTrip")
            .bound()
            .parameter("person", person, false)
            .parameter("userName", PrimitiveKind::String, false),
    )
    .unwrap();
    let nearest = b
        .add_operation(
            OperationDecl::function("NS", "GetNearestAirport")
                .parameter("lat", PrimitiveKind::Double, false)
                .parameter("lon", PrimitiveKind::Double, false)
                .returns(PrimitiveKind::String, true),
        )
        .unwrap();
    b.add_operation_import("GetNearestAirport", nearest, None)
        .unwrap();

    b.finish()
}

pub fn person(model: &EdmModel) -> EntityType {
    model.entity_type("NS.Person").unwrap()
}

pub fn employee(model: &EdmModel) -> EntityType {
    model.entity_type("NS.Employee").unwrap()
}

pub fn company(model: &EdmModel) -> EntityType {
    model.entity_type("NS.Company").unwrap()
}

pub fn address(model: &EdmModel) -> ComplexType {
    model.complex_type("NS.Address").unwrap()
}

pub fn people(model: &EdmModel) -> EntitySet {
    model.entity_set("People").unwrap()
}

pub fn people_source(model: &EdmModel) -> NavigationSource {
    NavigationSource::EntitySet(people(model))
}

pub fn structural(ty: &EntityType, name: &str) -> StructuralProperty {
    ty.find_property(name)
        .and_then(|p| p.into_structural())
        .unwrap_or_else(|| panic!("`{name}` is not a structural property"))
}

pub fn navigation(ty: &EntityType, name: &str) -> NavigationProperty {
    ty.find_property(name)
        .and_then(|p| p.into_navigation())
        .unwrap_or_else(|| panic!("`{name}` is not a navigation property"))
}

/// `$it` over `People`.
pub fn it(model: &EdmModel) -> RangeVariable {
    RangeVariable::implicit(people_source(model))
}

pub fn it_ref(model: &EdmModel) -> QueryNode {
    ResourceRangeVariableReferenceNode::new(it(model))
        .unwrap()
        .into()
}

/// `$it/<name>` for a structural property of `NS.Person`.
pub fn it_property(model: &EdmModel, name: &str) -> QueryNode {
    SingleValuePropertyAccessNode::new(it_ref(model), structural(&person(model), name))
        .unwrap()
        .into()
}

fn expand_path(model: &EdmModel, name: &str) -> ODataExpandPath {
    let segment = NavigationPropertySegment::new(
        navigation(&person(model), name),
        Some(people_source(model)),
    );
    ODataExpandPath::new([PathSegment::from(segment)]).unwrap()
}

/// `$expand=<name>` for a navigation property of `NS.Person`, bound to `People`.
pub fn expand(model: &EdmModel, name: &str) -> ExpandedNavigationSelectItem {
    ExpandedNavigationSelectItem::new(expand_path(model, name), Some(people_source(model)))
}

/// `$expand=<name>/$ref`.
pub fn expand_reference(model: &EdmModel, name: &str) -> ExpandedReferenceSelectItem {
    ExpandedReferenceSelectItem::new(expand_path(model, name), Some(people_source(model)))
}

// ============================================================================
// Resource path re-parser
// ============================================================================

fn parse_key_value(text: &str) -> LiteralValue {
    match text.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')) {
        Some(quoted) => LiteralValue::String(quoted.replace("''", "'")),
        None => LiteralValue::Int32(text.parse().unwrap()),
    }
}

fn element_entity(path: &ODataPath) -> EntityType {
    let ty = path.edm_type().expect("path has a type");
    ty.element_type()
        .as_entity()
        .cloned()
        .unwrap_or_else(|| panic!("`{}` is not an entity type", ty.full_name()))
}

fn push_key(path: &mut ODataPath, key_text: &str) {
    let entity_type = element_entity(path);
    let key_name = entity_type.key()[0].name().to_owned();
    let key = KeySegment::new(
        vec![(key_name, parse_key_value(key_text))],
        entity_type,
        path.navigation_source(),
    )
    .unwrap();
    path.push(key);
}

fn push_member(model: &EdmModel, path: &mut ODataPath, name: &str) {
    let previous = path.edm_type().expect("path has a type");
    if name == "$count" {
        path.push(PathSegment::Count);
        return;
    }
    if name == "$value" {
        path.push(ValueSegment::new(Some(&previous)).unwrap());
        return;
    }
    if let Some(cast) = model.entity_type(name) {
        let target = if previous.is_collection() {
            EdmType::Collection(Box::new(cast.to_type_reference(false)))
        } else {
            EdmType::Entity(cast)
        };
        path.push(TypeSegment::new(target, path.navigation_source()).unwrap());
        return;
    }
    let property = match previous.element_type() {
        EdmType::Entity(ty) => ty.find_property(name),
        EdmType::Complex(ty) => ty.find_property(name),
        other => panic!("cannot look up `{name}` on `{}`", other.full_name()),
    }
    .unwrap_or_else(|| panic!("unknown property `{name}`"));
    if let Some(nav) = property.as_navigation() {
        let target = path
            .navigation_source()
            .and_then(|source| source.find_navigation_target(nav));
        path.push(NavigationPropertySegment::new(nav.clone(), target));
    } else if let Some(prop) = property.into_structural() {
        path.push(PropertySegment::new(prop));
    }
}

/// Parse a resource path such as `People('russell')/Friends` against
/// `model`. Handles entity sets, singletons, single keys, derived-type
/// casts, properties, `$count`, and `$value`; panics on anything else.
pub fn parse_resource_path(model: &EdmModel, text: &str) -> ODataPath {
    let mut path = ODataPath::default();
    for (index, part) in text.split('/').enumerate() {
        let (name, key) = match part.split_once('(') {
            Some((name, rest)) => (name, rest.strip_suffix(')')),
            None => (part, None),
        };
        if index == 0 {
            match model.navigation_source(name) {
                Some(NavigationSource::EntitySet(set)) => path.push(EntitySetSegment::new(set)),
                Some(NavigationSource::Singleton(s)) => path.push(SingletonSegment::new(s)),
                None => panic!("unknown navigation source `{name}`"),
            }
        } else {
            push_member(model, &mut path, name);
        }
        if let Some(key) = key {
            push_key(&mut path, key);
        }
    }
    path
}
