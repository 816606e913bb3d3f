use odata_edm::LiteralValue;

use crate::alias::ParameterAliasValueAccessor;
use crate::clause::{
    FilterClause, OrderByClause, OrderByDirection, SearchClause, SelectExpandClause,
    SelectItem,
};
use crate::node::{
    BinaryOperatorKind, BinaryOperatorNode, ConstantNode, ParameterAliasNode, QueryNode,
    SearchTermNode,
};
use crate::path::{KeyDelimiter, ODataPath};
use crate::render::filter_clause_text;
use crate::test_utils::{expand, it, it_property, parse_resource_path, sample_model};
use crate::uri::ODataUri;

#[test]
fn resource_uri_joins_root_and_path() {
    let model = sample_model();
    let path = parse_resource_path(&model, "People('1')/Friends");

    let uri = ODataUri::new(path.clone()).with_service_root("http://host/svc/");
    assert_eq!(
        uri.resource_uri(KeyDelimiter::Parentheses),
        "http://host/svc/People('1')/Friends"
    );
    assert_eq!(
        uri.resource_uri(KeyDelimiter::Slash),
        "http://host/svc/People/1/Friends"
    );

    let trimmed = ODataUri::new(path.clone()).with_service_root("http://host/svc");
    assert_eq!(
        trimmed.resource_uri(KeyDelimiter::Parentheses),
        "http://host/svc/People('1')/Friends"
    );

    let relative = ODataUri::new(path);
    assert_eq!(relative.service_root(), None);
    assert_eq!(
        relative.resource_uri(KeyDelimiter::Parentheses),
        "People('1')/Friends"
    );
}

#[test]
fn default_uri_has_no_options() {
    let uri = ODataUri::default();
    assert_eq!(uri.path(), &ODataPath::default());
    assert!(uri.select_expand().is_none());
    assert!(uri.filter().is_none());
    assert!(uri.order_by().is_none());
    assert!(uri.search().is_none());
    assert_eq!(uri.top(), None);
    assert_eq!(uri.skip(), None);
    assert_eq!(uri.count(), None);
    assert_eq!(uri.skip_token(), None);
    assert_eq!(uri.delta_token(), None);
    assert!(uri.custom_query_options().is_empty());
    assert!(uri.parameter_aliases().alias_value_expressions().is_empty());
}

#[test]
fn query_options_are_carried() {
    let model = sample_model();
    let filter = FilterClause::new(
        BinaryOperatorNode::new(
            BinaryOperatorKind::Equal,
            it_property(&model, "Name"),
            ConstantNode::new(LiteralValue::from("russell")).into(),
        )
        .unwrap()
        .into(),
        it(&model),
    )
    .unwrap();
    let order_by = OrderByClause::new(
        it_property(&model, "Age"),
        OrderByDirection::Descending,
        it(&model),
    )
    .unwrap();
    let search = SearchClause::new(SearchTermNode::new("blue").unwrap().into()).unwrap();
    let select_expand =
        SelectExpandClause::new([SelectItem::from(expand(&model, "Friends"))], true);

    let uri = ODataUri::new(parse_resource_path(&model, "People"))
        .with_select_expand(select_expand.clone())
        .with_filter(filter.clone())
        .with_order_by(order_by.clone())
        .with_search(search.clone())
        .with_top(10)
        .with_skip(20)
        .with_count(true)
        .with_skip_token("abc")
        .with_delta_token("d1");

    assert_eq!(uri.select_expand(), Some(&select_expand));
    assert_eq!(uri.filter(), Some(&filter));
    assert_eq!(uri.order_by(), Some(&order_by));
    assert_eq!(uri.search(), Some(&search));
    assert_eq!(uri.top(), Some(10));
    assert_eq!(uri.skip(), Some(20));
    assert_eq!(uri.count(), Some(true));
    assert_eq!(uri.skip_token(), Some("abc"));
    assert_eq!(uri.delta_token(), Some("d1"));
    assert_eq!(filter_clause_text(uri.filter().unwrap()), "Name eq 'russell'");
}

#[test]
fn custom_options_keep_their_order() {
    let uri = ODataUri::default()
        .with_custom_query_option("zeta", "1")
        .with_custom_query_option("alpha", "2")
        .with_custom_query_option("zeta", "3");
    let options: Vec<(&str, &str)> = uri
        .custom_query_options()
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    assert_eq!(options, [("zeta", "1"), ("alpha", "2"), ("zeta", "3")]);
}

#[test]
fn aliases_resolve_through_the_uri() {
    let model = sample_model();
    let aliases = ParameterAliasValueAccessor::new([("@name", "'russell'")]);
    let mut uri =
        ODataUri::new(parse_resource_path(&model, "People")).with_parameter_aliases(aliases);

    let resolved = uri
        .parameter_aliases_mut()
        .resolve_with("@name", |text| {
            Ok::<QueryNode, crate::node::NodeError>(
                ConstantNode::with_text(LiteralValue::from("russell"), text).into(),
            )
        })
        .unwrap()
        .cloned();
    assert_eq!(
        resolved,
        Some(QueryNode::from(ConstantNode::with_text(
            LiteralValue::from("russell"),
            "'russell'"
        )))
    );
    assert_eq!(uri.parameter_aliases().resolved_nodes().len(), 1);

    let reference: QueryNode = ParameterAliasNode::new("@name", None).unwrap().into();
    let filter = FilterClause::new(
        BinaryOperatorNode::new(
            BinaryOperatorKind::Equal,
            it_property(&model, "Name"),
            reference,
        )
        .unwrap()
        .into(),
        it(&model),
    )
    .unwrap();
    let uri = uri.with_filter(filter);
    assert_eq!(filter_clause_text(uri.filter().unwrap()), "Name eq @name");
}
