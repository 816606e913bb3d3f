//! Render bound expressions back into `$filter`/`$orderby` syntax.

use crate::clause::{FilterClause, OrderByClause, OrderByDirection};
use crate::node::{
    AllNode, AnyNode, BinaryOperatorNode, CollectionConstantNode, CollectionNavigationNode,
    CollectionOpenPropertyAccessNode, CollectionPropertyAccessNode, CollectionPropertyCastNode,
    ConstantNode, ConvertNode, CountNode, EntityCollectionCastNode,
    EntityCollectionFunctionCallNode, EntitySetNode, InNode, KeyLookupNode,
    NamedFunctionParameterNode, NonResourceRangeVariableReferenceNode, ParameterAliasNode,
    QueryNode, QueryNodeVisitor, ResourceRangeVariableReferenceNode, SearchTermNode,
    SingleEntityFunctionCallNode, SingleNavigationNode, SingleResourceCastNode,
    SingleValueCastNode, SingleValueFunctionCallNode, SingleValueOpenPropertyAccessNode,
    SingleValuePropertyAccessNode, UnaryOperatorKind, UnaryOperatorNode,
};
use crate::range_variable::IMPLICIT_RANGE_VARIABLE;

/// Whether `node` is a reference to the implicit `$it` range variable.
fn is_implicit_reference(node: &QueryNode) -> bool {
    match node {
        QueryNode::ResourceRangeVariableReference(n) => n.name() == IMPLICIT_RANGE_VARIABLE,
        QueryNode::NonResourceRangeVariableReference(n) => n.name() == IMPLICIT_RANGE_VARIABLE,
        _ => false,
    }
}

/// Binary operands bind looser than their parent need parentheses. On the
/// right, equal precedence does too, since operators associate left.
fn needs_parens(operand: &QueryNode, parent_precedence: u8, is_right: bool) -> bool {
    let QueryNode::BinaryOperator(child) = operand else {
        return false;
    };
    let precedence = child.operator().precedence();
    precedence < parent_precedence || (is_right && precedence == parent_precedence)
}

fn quote_search_term(text: &str) -> String {
    if text.chars().any(char::is_whitespace) {
        format!("\"{}\"", text.replace('"', "\\\""))
    } else {
        text.to_owned()
    }
}

/// Renders a bound expression tree as URI text.
///
/// Property paths rooted at `$it` omit it: `Address/City eq 'Oslo'`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NodeToStringBuilder;

impl NodeToStringBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn translate(&mut self, node: &QueryNode) -> String {
        node.accept(self)
    }

    fn operand(&mut self, node: &QueryNode, parent_precedence: u8, is_right: bool) -> String {
        let text = self.translate(node);
        if needs_parens(node, parent_precedence, is_right) {
            format!("({text})")
        } else {
            text
        }
    }

    /// `source/member`, or just `member` when the source is `$it`.
    fn member(&mut self, source: &QueryNode, member: &str) -> String {
        if is_implicit_reference(source) {
            return member.to_owned();
        }
        format!("{}/{member}", self.translate(source))
    }

    fn call(&mut self, source: Option<&QueryNode>, name: &str, parameters: &[QueryNode]) -> String {
        let args: Vec<String> = parameters.iter().map(|p| self.translate(p)).collect();
        let call = format!("{name}({})", args.join(","));
        match source {
            Some(source) => self.member(source, &call),
            None => call,
        }
    }

    fn lambda(
        &mut self,
        keyword: &str,
        source: Option<&QueryNode>,
        variable: Option<&str>,
        body: Option<&QueryNode>,
    ) -> String {
        let inner = match (variable, body) {
            (Some(variable), Some(body)) => format!("{variable}:{}", self.translate(body)),
            _ => String::new(),
        };
        let call = format!("{keyword}({inner})");
        match source {
            Some(source) => self.member(source, &call),
            None => call,
        }
    }
}

impl QueryNodeVisitor<String> for NodeToStringBuilder {
    fn visit_constant(&mut self, node: &ConstantNode) -> String {
        node.literal_text().to_owned()
    }

    fn visit_collection_constant(&mut self, node: &CollectionConstantNode) -> String {
        node.literal_text().to_owned()
    }

    fn visit_convert(&mut self, node: &ConvertNode) -> String {
        self.translate(node.source())
    }

    fn visit_binary_operator(&mut self, node: &BinaryOperatorNode) -> String {
        let precedence = node.operator().precedence();
        let left = self.operand(node.left(), precedence, false);
        let right = self.operand(node.right(), precedence, true);
        format!("{left} {} {right}", node.operator().keyword())
    }

    fn visit_unary_operator(&mut self, node: &UnaryOperatorNode) -> String {
        let operand = match node.operand() {
            binary @ QueryNode::BinaryOperator(_) => format!("({})", self.translate(binary)),
            other => self.translate(other),
        };
        match node.operator() {
            UnaryOperatorKind::Not => format!("not {operand}"),
            UnaryOperatorKind::Negate => format!("-{operand}"),
        }
    }

    fn visit_single_value_property_access(
        &mut self,
        node: &SingleValuePropertyAccessNode,
    ) -> String {
        self.member(node.source(), node.property().name())
    }

    fn visit_single_value_open_property_access(
        &mut self,
        node: &SingleValueOpenPropertyAccessNode,
    ) -> String {
        self.member(node.source(), node.name())
    }

    fn visit_collection_property_access(&mut self, node: &CollectionPropertyAccessNode) -> String {
        self.member(node.source(), node.property().name())
    }

    fn visit_collection_open_property_access(
        &mut self,
        node: &CollectionOpenPropertyAccessNode,
    ) -> String {
        self.member(node.source(), node.name())
    }

    fn visit_single_value_cast(&mut self, node: &SingleValueCastNode) -> String {
        self.member(node.source(), &node.target().full_name())
    }

    fn visit_collection_property_cast(&mut self, node: &CollectionPropertyCastNode) -> String {
        self.member(node.source(), &node.target().full_name())
    }

    fn visit_single_resource_cast(&mut self, node: &SingleResourceCastNode) -> String {
        self.member(node.source(), &node.target().full_name())
    }

    fn visit_entity_collection_cast(&mut self, node: &EntityCollectionCastNode) -> String {
        self.member(node.source(), &node.target().full_name())
    }

    fn visit_non_resource_range_variable_reference(
        &mut self,
        node: &NonResourceRangeVariableReferenceNode,
    ) -> String {
        node.name().to_owned()
    }

    fn visit_resource_range_variable_reference(
        &mut self,
        node: &ResourceRangeVariableReferenceNode,
    ) -> String {
        node.name().to_owned()
    }

    fn visit_single_navigation(&mut self, node: &SingleNavigationNode) -> String {
        self.member(node.source(), node.property().name())
    }

    fn visit_collection_navigation(&mut self, node: &CollectionNavigationNode) -> String {
        self.member(node.source(), node.property().name())
    }

    fn visit_single_value_function_call(&mut self, node: &SingleValueFunctionCallNode) -> String {
        self.call(node.source(), node.name(), node.parameters())
    }

    fn visit_single_entity_function_call(&mut self, node: &SingleEntityFunctionCallNode) -> String {
        self.call(node.source(), node.name(), node.parameters())
    }

    fn visit_entity_collection_function_call(
        &mut self,
        node: &EntityCollectionFunctionCallNode,
    ) -> String {
        self.call(node.source(), node.name(), node.parameters())
    }

    fn visit_named_function_parameter(&mut self, node: &NamedFunctionParameterNode) -> String {
        format!("{}={}", node.name(), self.translate(node.value()))
    }

    fn visit_parameter_alias(&mut self, node: &ParameterAliasNode) -> String {
        node.alias().to_owned()
    }

    fn visit_search_term(&mut self, node: &SearchTermNode) -> String {
        quote_search_term(node.text())
    }

    fn visit_key_lookup(&mut self, node: &KeyLookupNode) -> String {
        let source = self.translate(node.source());
        let keys: Vec<String> = match node.keys() {
            [single] => vec![self.translate(&single.value)],
            keys => keys
                .iter()
                .map(|k| format!("{}={}", k.property.name(), self.translate(&k.value)))
                .collect(),
        };
        format!("{source}({})", keys.join(","))
    }

    fn visit_any(&mut self, node: &AnyNode) -> String {
        let variable = node.current_range_variable().map(|rv| rv.name());
        self.lambda("any", node.source(), variable, node.body())
    }

    fn visit_all(&mut self, node: &AllNode) -> String {
        let variable = node.current_range_variable().map(|rv| rv.name());
        self.lambda("all", node.source(), variable, node.body())
    }

    fn visit_in(&mut self, node: &InNode) -> String {
        let left = match node.left() {
            binary @ QueryNode::BinaryOperator(_) => format!("({})", self.translate(binary)),
            other => self.translate(other),
        };
        format!("{left} in {}", self.translate(node.right()))
    }

    fn visit_count(&mut self, node: &CountNode) -> String {
        self.member(node.source(), "$count")
    }

    fn visit_entity_set(&mut self, node: &EntitySetNode) -> String {
        node.entity_set().name().to_owned()
    }
}

/// `$filter` text of a clause.
pub fn filter_clause_text(clause: &FilterClause) -> String {
    NodeToStringBuilder::new().translate(clause.expression())
}

/// `$orderby` text of a clause chain: `Name,Age desc`.
pub fn order_by_clause_text(clause: &OrderByClause) -> String {
    let mut builder = NodeToStringBuilder::new();
    let keys: Vec<String> = clause
        .iter()
        .map(|key| {
            let text = builder.translate(key.expression());
            match key.direction() {
                OrderByDirection::Ascending => text,
                OrderByDirection::Descending => format!("{text} desc"),
            }
        })
        .collect();
    keys.join(",")
}
