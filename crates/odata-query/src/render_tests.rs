use odata_edm::{EdmModel, EdmTypeReference, LiteralValue, PrimitiveKind};
use rust_decimal::Decimal;

use crate::clause::{FilterClause, OrderByClause, OrderByDirection};
use crate::node::{
    AllNode, AnyNode, BinaryOperatorKind, BinaryOperatorNode, CollectionConstantNode,
    CollectionNavigationNode, ConstantNode, ConvertNode, CountNode, EntitySetNode, InNode,
    KeyLookupNode, KeyPropertyValue, NamedFunctionParameterNode, ParameterAliasNode, QueryNode,
    ResourceRangeVariableReferenceNode, SearchTermNode, SingleResourceCastNode,
    SingleValueFunctionCallNode, SingleValueOpenPropertyAccessNode, SingleValuePropertyAccessNode,
    UnaryOperatorKind, UnaryOperatorNode,
};
use crate::range_variable::RangeVariable;
use crate::render::{NodeToStringBuilder, filter_clause_text, order_by_clause_text};
use crate::test_utils::{
    employee, it, it_property, it_ref, navigation, people, people_source, person, sample_model,
    structural,
};

fn text(node: &QueryNode) -> String {
    NodeToStringBuilder::new().translate(node)
}

fn lines(nodes: &[QueryNode]) -> String {
    let mut builder = NodeToStringBuilder::new();
    let rendered: Vec<String> = nodes.iter().map(|n| builder.translate(n)).collect();
    rendered.join("\n")
}

fn int(n: i32) -> QueryNode {
    ConstantNode::new(LiteralValue::Int32(n)).into()
}

fn string(s: &str) -> QueryNode {
    ConstantNode::new(LiteralValue::from(s)).into()
}

fn bin(op: BinaryOperatorKind, left: QueryNode, right: QueryNode) -> QueryNode {
    BinaryOperatorNode::new(op, left, right).unwrap().into()
}

fn name_is(model: &EdmModel, value: &str) -> QueryNode {
    bin(BinaryOperatorKind::Equal, it_property(model, "Name"), string(value))
}

fn friends(model: &EdmModel) -> QueryNode {
    CollectionNavigationNode::new(it_ref(model), navigation(&person(model), "Friends"))
        .unwrap()
        .into()
}

#[test]
fn comparisons_and_logic() {
    let model = sample_model();
    let node = bin(
        BinaryOperatorKind::And,
        name_is(&model, "russell"),
        bin(BinaryOperatorKind::GreaterThan, it_property(&model, "Age"), int(30)),
    );
    insta::assert_snapshot!(text(&node), @"Name eq 'russell' and Age gt 30");
}

#[test]
fn parentheses_follow_precedence() {
    use BinaryOperatorKind::*;

    let model = sample_model();
    let age = || it_property(&model, "Age");
    let a = || name_is(&model, "a");
    let b = || name_is(&model, "b");
    let c = || bin(LessThan, age(), int(5));

    let nodes = [
        bin(Multiply, bin(Add, age(), int(1)), int(2)),
        bin(Add, age(), bin(Multiply, int(1), int(2))),
        bin(Subtract, age(), bin(Subtract, int(1), int(2))),
        bin(Subtract, bin(Subtract, age(), int(1)), int(2)),
        bin(And, bin(Or, a(), b()), c()),
        bin(Or, a(), bin(And, b(), c())),
    ];
    insta::assert_snapshot!(lines(&nodes), @r"
    (Age add 1) mul 2
    Age add 1 mul 2
    Age sub (1 sub 2)
    Age sub 1 sub 2
    (Name eq 'a' or Name eq 'b') and Age lt 5
    Name eq 'a' or Name eq 'b' and Age lt 5
    ");
}

#[test]
fn unary_operators() {
    let model = sample_model();
    let not: QueryNode = UnaryOperatorNode::new(UnaryOperatorKind::Not, name_is(&model, "x"))
        .unwrap()
        .into();
    let negate: QueryNode =
        UnaryOperatorNode::new(UnaryOperatorKind::Negate, it_property(&model, "Age"))
            .unwrap()
            .into();
    insta::assert_snapshot!(lines(&[not, negate]), @r"
    not (Name eq 'x')
    -Age
    ");
}

#[test]
fn lambdas_name_their_variable() {
    let model = sample_model();
    let x = RangeVariable::resource("x", person(&model), Some(people_source(&model))).unwrap();
    let x_ref: QueryNode = ResourceRangeVariableReferenceNode::new(x.clone())
        .unwrap()
        .into();
    let x_age =
        SingleValuePropertyAccessNode::new(x_ref.clone(), structural(&person(&model), "Age"))
            .unwrap()
            .into();
    let x_name = SingleValuePropertyAccessNode::new(x_ref, structural(&person(&model), "Name"))
        .unwrap()
        .into();

    let any = AnyNode::new(vec![it(&model), x.clone()], Some(x.clone()))
        .with_source(friends(&model))
        .unwrap()
        .with_body(bin(BinaryOperatorKind::GreaterThan, x_age, int(30)))
        .unwrap();
    let all = AllNode::new(vec![it(&model), x.clone()], Some(x))
        .with_source(friends(&model))
        .unwrap()
        .with_body(bin(
            BinaryOperatorKind::NotEqual,
            x_name,
            ConstantNode::new(LiteralValue::Null).into(),
        ))
        .unwrap();
    let empty_any = AnyNode::new(vec![it(&model)], None)
        .with_source(friends(&model))
        .unwrap();

    insta::assert_snapshot!(lines(&[any.into(), all.into(), empty_any.into()]), @r"
    Friends/any(x:x/Age gt 30)
    Friends/all(x:x/Name ne null)
    Friends/any()
    ");
}

#[test]
fn functions_and_parameters() {
    let model = sample_model();
    let contains: QueryNode = SingleValueFunctionCallNode::new(
        "contains",
        vec![],
        vec![it_property(&model, "Name"), string("ab")],
        Some(EdmTypeReference::boolean(false)),
    )
    .unwrap()
    .into();
    let get_age: QueryNode = SingleValueFunctionCallNode::new(
        "NS.GetAge",
        model.operations("NS.GetAge"),
        vec![],
        Some(EdmTypeReference::primitive(PrimitiveKind::Int32, false)),
    )
    .unwrap()
    .with_source(it_ref(&model))
    .into();
    let named: QueryNode = NamedFunctionParameterNode::new("name", string("x"))
        .unwrap()
        .into();
    let alias = ParameterAliasNode::new("@p", None).unwrap().into();

    insta::assert_snapshot!(lines(&[
        contains,
        get_age,
        named,
        bin(BinaryOperatorKind::Equal, it_property(&model, "Name"), alias),
    ]), @r"
    contains(Name,'ab')
    NS.GetAge()
    name='x'
    Name eq @p
    ");
}

#[test]
fn collections_keys_and_casts() {
    let model = sample_model();
    let string_type = EdmTypeReference::primitive(PrimitiveKind::String, false);
    let list: QueryNode = CollectionConstantNode::new(
        vec![
            ConstantNode::new(LiteralValue::from("a")),
            ConstantNode::new(LiteralValue::from("b")),
        ],
        EdmTypeReference::collection(string_type),
    )
    .unwrap()
    .into();
    let is_in = InNode::new(it_property(&model, "Name"), list).unwrap().into();

    let count = CountNode::new(friends(&model)).unwrap().into();
    let many = bin(BinaryOperatorKind::GreaterThan, count, int(2));

    let lookup: QueryNode = KeyLookupNode::new(
        friends(&model),
        vec![KeyPropertyValue {
            property: structural(&person(&model), "UserName"),
            value: string("scott"),
        }],
    )
    .unwrap()
    .into();
    let lookup_name =
        SingleValuePropertyAccessNode::new(lookup, structural(&person(&model), "Name"))
            .unwrap()
            .into();

    let cast = SingleResourceCastNode::new(it_ref(&model), employee(&model))
        .unwrap()
        .into();
    let salary = SingleValuePropertyAccessNode::new(cast, structural(&employee(&model), "Salary"))
        .unwrap()
        .into();

    let widened = ConvertNode::new(
        it_property(&model, "Age"),
        EdmTypeReference::primitive(PrimitiveKind::Int64, true),
    )
    .unwrap()
    .into();
    let dynamic = SingleValueOpenPropertyAccessNode::new(it_ref(&model), "Nickname")
        .unwrap()
        .into();

    insta::assert_snapshot!(lines(&[
        is_in,
        many,
        lookup_name,
        salary,
        widened,
        dynamic,
        EntitySetNode::new(people(&model)).into(),
    ]), @r"
    Name in ('a','b')
    Friends/$count gt 2
    Friends('scott')/Name
    NS.Employee/Salary
    Age
    Nickname
    People
    ");
}

#[test]
fn decimal_literals_are_normalized() {
    let model = sample_model();
    let cast = SingleResourceCastNode::new(it_ref(&model), employee(&model))
        .unwrap()
        .into();
    let salary = SingleValuePropertyAccessNode::new(cast, structural(&employee(&model), "Salary"))
        .unwrap()
        .into();
    let floor = ConstantNode::new(LiteralValue::from(Decimal::new(10500, 3))).into();
    let node = bin(BinaryOperatorKind::GreaterThanOrEqual, salary, floor);
    insta::assert_snapshot!(text(&node), @"NS.Employee/Salary ge 10.5");
}

#[test]
fn search_terms_with_spaces_are_quoted() {
    let one: QueryNode = SearchTermNode::new("blue").unwrap().into();
    let phrase: QueryNode = SearchTermNode::new("blue sky").unwrap().into();
    insta::assert_snapshot!(lines(&[one, phrase]), @r#"
    blue
    "blue sky"
    "#);
}

#[test]
fn clause_text() {
    let model = sample_model();
    let filter = FilterClause::new(name_is(&model, "o'neil"), it(&model)).unwrap();
    insta::assert_snapshot!(filter_clause_text(&filter), @"Name eq 'o''neil'");

    let key = |name: &str, direction| {
        OrderByClause::new(it_property(&model, name), direction, it(&model)).unwrap()
    };
    let order_by = key("Name", OrderByDirection::Ascending)
        .with_then_by(key("Age", OrderByDirection::Descending));
    insta::assert_snapshot!(order_by_clause_text(&order_by), @"Name,Age desc");
}
