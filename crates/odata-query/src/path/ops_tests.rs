use odata_edm::{LiteralValue, NavigationSource};

use super::{KeyDelimiter, ODataPath};
use crate::node::ConstantNode;
use crate::segment::{
    KeySegment, OpenPropertySegment, OperationImportSegment, OperationSegment,
    OperationSegmentParameter, PathSegment,
};
use crate::test_utils::{parse_resource_path, people_source, person, sample_model};

fn text(path: &ODataPath) -> String {
    path.to_resource_path_string(KeyDelimiter::Parentheses)
}

fn key(model: &odata_edm::EdmModel, value: &str) -> KeySegment {
    KeySegment::new(
        vec![("UserName".to_owned(), LiteralValue::String(value.into()))],
        person(model),
        Some(people_source(model)),
    )
    .unwrap()
}

#[test]
fn resource_path_round_trips() {
    let model = sample_model();
    for input in [
        "People",
        "Me",
        "People('russell')",
        "People('russell')/Friends",
        "People('russell')/Friends('scott')/BestFriend",
        "People/NS.Employee",
        "People/NS.Employee/Manager",
        "People('russell')/NS.Employee/Manager",
        "People('russell')/Name/$value",
        "People('russell')/Address/City",
        "People('o''neil')/Emails/$count",
        "Me/Friends/$count",
        "Companies(1)/Name",
    ] {
        let path = parse_resource_path(&model, input);
        assert_eq!(text(&path), input);
    }
}

#[test]
fn slash_key_delimiter() {
    let model = sample_model();
    let path = parse_resource_path(&model, "People('russell')/Friends");
    assert_eq!(
        path.to_resource_path_string(KeyDelimiter::Slash),
        "People/russell/Friends"
    );
    let path = parse_resource_path(&model, "Companies(1)");
    assert_eq!(path.to_resource_path_string(KeyDelimiter::Slash), "Companies/1");
}

#[test]
fn slash_keys_are_percent_encoded() {
    let model = sample_model();
    let people = parse_resource_path(&model, "People");
    let slash = |value: &str| {
        people
            .add_key_segment(key(&model, value))
            .to_resource_path_string(KeyDelimiter::Slash)
    };

    assert_eq!(slash("a/b"), "People/a%2Fb");
    assert_eq!(slash("100%?#"), "People/100%25%3F%23");
    assert_eq!(slash("café au lait"), "People/caf%C3%A9%20au%20lait");
    assert_eq!(slash("a-b_c.d~e"), "People/a-b_c.d~e");

    let keyed = people.add_key_segment(key(&model, "a/b"));
    assert_eq!(
        keyed.to_resource_path_string(KeyDelimiter::Parentheses),
        "People('a/b')"
    );
    let rendered = keyed.to_resource_path_string(KeyDelimiter::Slash);
    assert_eq!(rendered.split('/').count(), 2);
}

#[test]
fn type_and_source_of_whole_path() {
    let model = sample_model();

    let friends = parse_resource_path(&model, "People('russell')/Friends");
    assert_eq!(
        friends.edm_type().map(|t| t.full_name()).as_deref(),
        Some("Collection(NS.Person)")
    );
    assert_eq!(friends.navigation_source(), Some(people_source(&model)));
    assert!(friends.is_collection());

    let one = parse_resource_path(&model, "People('russell')");
    assert!(!one.is_collection());
    assert_eq!(
        one.edm_type().map(|t| t.full_name()).as_deref(),
        Some("NS.Person")
    );

    let me = parse_resource_path(&model, "Me");
    assert!(matches!(
        me.navigation_source(),
        Some(NavigationSource::Singleton(_))
    ));

    let name = parse_resource_path(&model, "People('russell')/Name");
    assert_eq!(name.navigation_source(), None);

    assert_eq!(ODataPath::default().edm_type(), None);
    assert!(!ODataPath::default().is_collection());
}

#[test]
fn add_key_segment_goes_before_trailing_cast() {
    let model = sample_model();
    let cast = parse_resource_path(&model, "People/NS.Employee");
    let keyed = cast.add_key_segment(key(&model, "1"));
    assert_eq!(text(&keyed), "People('1')/NS.Employee");
    assert_eq!(text(&cast), "People/NS.Employee");

    let plain = parse_resource_path(&model, "People");
    assert_eq!(text(&plain.add_key_segment(key(&model, "1"))), "People('1')");
}

#[test]
fn trim_end_key_segment_looks_through_cast() {
    let model = sample_model();
    for (input, trimmed) in [
        ("People('1')/NS.Employee", "People/NS.Employee"),
        ("People('1')", "People"),
        ("People", "People"),
        ("People('1')/Friends", "People('1')/Friends"),
    ] {
        let path = parse_resource_path(&model, input);
        assert_eq!(text(&path.trim_end_key_segment()), trimmed, "{input}");
    }
}

#[test]
fn trim_ending_type_segment_drops_one_cast() {
    let model = sample_model();
    let path = parse_resource_path(&model, "People('1')/NS.Employee");
    assert_eq!(text(&path.trim_ending_type_segment()), "People('1')");
    let path = parse_resource_path(&model, "People('1')/Friends");
    assert_eq!(path.trim_ending_type_segment(), path);
}

#[test]
fn individual_property_paths() {
    let model = sample_model();
    assert!(parse_resource_path(&model, "People('1')/Name").is_individual_property());
    assert!(parse_resource_path(&model, "People('1')/Address/City").is_individual_property());
    assert!(!parse_resource_path(&model, "People('1')").is_individual_property());
    assert!(!parse_resource_path(&model, "People('1')/Friends").is_individual_property());
    assert!(!parse_resource_path(&model, "People('1')/Name/$value").is_individual_property());

    let open = parse_resource_path(&model, "People('1')")
        .appended(OpenPropertySegment::new("Nickname").unwrap());
    assert!(open.is_individual_property());
}

#[test]
fn operation_segments_render_with_arguments() {
    let model = sample_model();
    let person = parse_resource_path(&model, "People('1')");

    let named = OperationSegment::new(model.operations("NS.GetFriendsNamed"), None)
        .unwrap()
        .with_parameters(vec![OperationSegmentParameter::new(
            "name",
            ConstantNode::new(LiteralValue::String("scott".into())).into(),
        )]);
    assert_eq!(
        text(&person.appended(named)),
        "People('1')/NS.GetFriendsNamed(name='scott')"
    );

    let age = OperationSegment::new(model.operations("NS.GetAge"), None).unwrap();
    assert_eq!(text(&person.appended(age)), "People('1')/NS.GetAge()");

    let share = OperationSegment::new(model.operations("NS.ShareTrip"), None).unwrap();
    assert_eq!(text(&person.appended(share)), "People('1')/NS.ShareTrip");

    let import = model.operation_import("GetNearestAirport").unwrap();
    let nearest = OperationImportSegment::new(vec![import])
        .unwrap()
        .with_parameters(vec![
            OperationSegmentParameter::new(
                "lat",
                ConstantNode::new(LiteralValue::Double(1.5)).into(),
            ),
            OperationSegmentParameter::new(
                "lon",
                ConstantNode::new(LiteralValue::Double(-0.25)).into(),
            ),
        ]);
    assert_eq!(
        text(&ODataPath::new([PathSegment::from(nearest)])),
        "GetNearestAirport(lat=1.5,lon=-0.25)"
    );
}
