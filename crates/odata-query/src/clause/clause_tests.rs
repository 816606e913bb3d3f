use odata_edm::LiteralValue;

use super::{FilterClause, LevelsClause, OrderByClause, OrderByDirection, SearchClause};
use crate::node::{
    BinaryOperatorKind, BinaryOperatorNode, CollectionNavigationNode,
    CollectionPropertyAccessNode, ConstantNode, QueryNode, SearchTermNode, SingleNavigationNode,
    SingleValueOpenPropertyAccessNode,
};
use crate::test_utils::{it, it_property, it_ref, navigation, person, sample_model, structural};

fn name_is(model: &odata_edm::EdmModel, value: &str) -> QueryNode {
    BinaryOperatorNode::new(
        BinaryOperatorKind::Equal,
        it_property(model, "Name"),
        ConstantNode::new(LiteralValue::from(value)).into(),
    )
    .unwrap()
    .into()
}

#[test]
fn filter_takes_a_boolean_predicate() {
    let model = sample_model();
    let filter = FilterClause::new(name_is(&model, "russell"), it(&model)).unwrap();

    assert_eq!(filter.expression(), &name_is(&model, "russell"));
    assert!(filter.range_variable().is_implicit());
    assert_eq!(
        filter.item_type(),
        Some(person(&model).to_type_reference(false))
    );
}

#[test]
fn filter_accepts_untyped_single_values() {
    let model = sample_model();
    let null = ConstantNode::new(LiteralValue::Null).into();
    FilterClause::new(null, it(&model)).unwrap();

    let open = SingleValueOpenPropertyAccessNode::new(it_ref(&model), "IsActive")
        .unwrap()
        .into();
    FilterClause::new(open, it(&model)).unwrap();
}

#[test]
fn filter_rejects_non_boolean_expressions() {
    let model = sample_model();

    let err = FilterClause::new(it_property(&model, "Age"), it(&model)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "filter expression must be Boolean, found Edm.Int32"
    );

    let friends = navigation(&person(&model), "Friends");
    let friends = CollectionNavigationNode::new(it_ref(&model), friends)
        .unwrap()
        .into();
    let err = FilterClause::new(friends, it(&model)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "filter expression must be a single value, found a resource collection"
    );
}

#[test]
fn order_by_chain_iterates_in_priority_order() {
    let model = sample_model();
    let key = |name: &str, direction| {
        OrderByClause::new(it_property(&model, name), direction, it(&model)).unwrap()
    };
    let by_age = key("Age", OrderByDirection::Descending);
    let by_name = key("Name", OrderByDirection::default()).with_then_by(by_age.clone());

    assert_eq!(by_name.direction(), OrderByDirection::Ascending);
    assert_eq!(by_name.then_by(), Some(&by_age));
    assert_eq!(by_age.then_by(), None);
    assert_eq!(
        by_name.item_type(),
        Some(person(&model).to_type_reference(false))
    );

    let keywords: Vec<&str> = by_name.iter().map(|c| c.direction().keyword()).collect();
    assert_eq!(keywords, ["asc", "desc"]);
    assert_eq!(by_name.iter().count(), 2);
}

#[test]
fn order_by_replaces_then_by() {
    let model = sample_model();
    let key = |name: &str| {
        OrderByClause::new(it_property(&model, name), OrderByDirection::Ascending, it(&model))
            .unwrap()
    };
    let clause = key("Name")
        .with_then_by(key("Age"))
        .with_then_by(key("UserName"));
    assert_eq!(clause.iter().count(), 2);
    assert_eq!(clause.then_by(), Some(&key("UserName")));
}

#[test]
fn order_by_requires_a_single_expression() {
    let model = sample_model();
    let best_friend: QueryNode =
        SingleNavigationNode::new(it_ref(&model), navigation(&person(&model), "BestFriend"))
            .unwrap()
            .into();
    OrderByClause::new(best_friend, OrderByDirection::Ascending, it(&model)).unwrap();

    let emails =
        CollectionPropertyAccessNode::new(it_ref(&model), structural(&person(&model), "Emails"))
            .unwrap()
            .into();
    let err = OrderByClause::new(emails, OrderByDirection::Ascending, it(&model)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "orderby expression must be a single value, found a collection"
    );
}

#[test]
fn search_takes_a_boolean_predicate() {
    let model = sample_model();
    let term: QueryNode = SearchTermNode::new("blue").unwrap().into();
    let search = SearchClause::new(term.clone()).unwrap();
    assert_eq!(search.expression(), &term);

    let err = SearchClause::new(it_property(&model, "Name")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "search expression must be Boolean, found Edm.String"
    );
}

#[test]
fn levels() {
    let max = LevelsClause::max();
    assert!(max.is_max());
    assert_eq!(max.to_string(), "max");

    let three = LevelsClause::finite(3);
    assert!(!three.is_max());
    assert_eq!(three.level(), 3);
    assert_eq!(three.to_string(), "3");

    assert_eq!(LevelsClause::new(true, 5).to_string(), "max");
    assert_eq!(LevelsClause::new(false, 2), LevelsClause::finite(2));
}
