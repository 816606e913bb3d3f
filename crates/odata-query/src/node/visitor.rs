//! Typed visitor over [`QueryNode`](super::QueryNode).
//!
//! # Usage
//!
//! Implement one method per node kind. There are no default methods: adding
//! a node kind is a compile error in every visitor until it handles it.
//! Recurse by calling [`accept`](super::QueryNode::accept) on children.
//!
//! ```ignore
//! impl QueryNodeVisitor<usize> for Depth {
//!     fn visit_binary_operator(&mut self, node: &BinaryOperatorNode) -> usize {
//!         1 + node.left().accept(self).max(node.right().accept(self))
//!     }
//!     // ...
//! }
//! ```

use super::nodes::{
    AllNode, AnyNode, BinaryOperatorNode, CollectionConstantNode, CollectionNavigationNode,
    CollectionOpenPropertyAccessNode, CollectionPropertyAccessNode, CollectionPropertyCastNode,
    ConstantNode, ConvertNode, CountNode, EntityCollectionCastNode,
    EntityCollectionFunctionCallNode, EntitySetNode, InNode, KeyLookupNode,
    NamedFunctionParameterNode, NonResourceRangeVariableReferenceNode, ParameterAliasNode,
    ResourceRangeVariableReferenceNode, SearchTermNode, SingleEntityFunctionCallNode,
    SingleNavigationNode, SingleResourceCastNode, SingleValueCastNode,
    SingleValueFunctionCallNode, SingleValueOpenPropertyAccessNode,
    SingleValuePropertyAccessNode, UnaryOperatorNode,
};

pub trait QueryNodeVisitor<T> {
    fn visit_constant(&mut self, node: &ConstantNode) -> T;
    fn visit_collection_constant(&mut self, node: &CollectionConstantNode) -> T;
    fn visit_convert(&mut self, node: &ConvertNode) -> T;
    fn visit_binary_operator(&mut self, node: &BinaryOperatorNode) -> T;
    fn visit_unary_operator(&mut self, node: &UnaryOperatorNode) -> T;
    fn visit_single_value_property_access(&mut self, node: &SingleValuePropertyAccessNode) -> T;
    fn visit_single_value_open_property_access(
        &mut self,
        node: &SingleValueOpenPropertyAccessNode,
    ) -> T;
    fn visit_collection_property_access(&mut self, node: &CollectionPropertyAccessNode) -> T;
    fn visit_collection_open_property_access(
        &mut self,
        node: &CollectionOpenPropertyAccessNode,
    ) -> T;
    fn visit_single_value_cast(&mut self, node: &SingleValueCastNode) -> T;
    fn visit_collection_property_cast(&mut self, node: &CollectionPropertyCastNode) -> T;
    fn visit_single_resource_cast(&mut self, node: &SingleResourceCastNode) -> T;
    fn visit_entity_collection_cast(&mut self, node: &EntityCollectionCastNode) -> T;
    fn visit_non_resource_range_variable_reference(
        &mut self,
        node: &NonResourceRangeVariableReferenceNode,
    ) -> T;
    fn visit_resource_range_variable_reference(
        &mut self,
        node: &ResourceRangeVariableReferenceNode,
    ) -> T;
    fn visit_single_navigation(&mut self, node: &SingleNavigationNode) -> T;
    fn visit_collection_navigation(&mut self, node: &CollectionNavigationNode) -> T;
    fn visit_single_value_function_call(&mut self, node: &SingleValueFunctionCallNode) -> T;
    fn visit_single_entity_function_call(&mut self, node: &SingleEntityFunctionCallNode) -> T;
    fn visit_entity_collection_function_call(
        &mut self,
        node: &EntityCollectionFunctionCallNode,
    ) -> T;
    fn visit_named_function_parameter(&mut self, node: &NamedFunctionParameterNode) -> T;
    fn visit_parameter_alias(&mut self, node: &ParameterAliasNode) -> T;
    fn visit_search_term(&mut self, node: &SearchTermNode) -> T;
    fn visit_key_lookup(&mut self, node: &KeyLookupNode) -> T;
    fn visit_any(&mut self, node: &AnyNode) -> T;
    fn visit_all(&mut self, node: &AllNode) -> T;
    fn visit_in(&mut self, node: &InNode) -> T;
    fn visit_count(&mut self, node: &CountNode) -> T;
    fn visit_entity_set(&mut self, node: &EntitySetNode) -> T;
}
