use std::cell::Cell;

use odata_edm::LiteralValue;
use proptest::prelude::*;

use crate::alias::ParameterAliasValueAccessor;
use crate::node::{ConstantNode, NodeError, QueryNode, SearchTermNode};

fn bound(text: &str) -> QueryNode {
    ConstantNode::with_text(LiteralValue::from(text), text).into()
}

fn bind_ok(text: &str) -> Result<QueryNode, NodeError> {
    Ok(bound(text))
}

#[test]
fn raw_expressions_are_kept_verbatim() {
    let aliases = ParameterAliasValueAccessor::new([("@p", "'x'"), ("@q", "3")]);
    assert_eq!(aliases.alias_value_expression("@p"), Some("'x'"));
    assert_eq!(aliases.alias_value_expression("@P"), None);
    assert_eq!(aliases.alias_value_expression("p"), None);
    let names: Vec<&str> = aliases
        .alias_value_expressions()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(names, ["@p", "@q"]);
    assert!(aliases.resolved_nodes().is_empty());
}

#[test]
fn binds_once_per_alias() {
    let mut aliases = ParameterAliasValueAccessor::new([("@p", "'x'")]);
    let calls = Cell::new(0);
    let bind = |text: &str| {
        calls.set(calls.get() + 1);
        bind_ok(text)
    };

    let first = aliases.resolve_with("@p", bind).unwrap().cloned();
    let second = aliases.resolve_with("@p", bind).unwrap().cloned();
    assert_eq!(calls.get(), 1);
    assert_eq!(first, Some(bound("'x'")));
    assert_eq!(first, second);
}

#[test]
fn undefined_alias_resolves_to_null_without_binding() {
    let mut aliases = ParameterAliasValueAccessor::new([("@p", "1")]);
    let resolved = aliases
        .resolve_with("@missing", |_| -> Result<QueryNode, NodeError> {
            panic!("undefined aliases are not bound")
        })
        .unwrap();
    assert_eq!(resolved, None);
    assert_eq!(aliases.resolved_nodes().get("@missing"), Some(&None));
    assert_eq!(aliases.resolved_nodes().len(), 1);
}

#[test]
fn bind_failure_caches_nothing() {
    let mut aliases = ParameterAliasValueAccessor::new([("@s", "")]);
    let err = aliases
        .resolve_with("@s", |text| SearchTermNode::new(text).map(QueryNode::from))
        .unwrap_err();
    assert_eq!(err, NodeError::EmptyName("search term"));
    assert!(aliases.resolved_nodes().is_empty());

    let node = aliases.resolve_with("@s", bind_ok).unwrap();
    assert_eq!(node, Some(&bound("")));
}

#[test]
fn first_cached_value_wins() {
    let mut aliases = ParameterAliasValueAccessor::default();
    aliases.cache("@p", Some(bound("1")));
    aliases.cache("@p", Some(bound("2")));
    aliases.cache("@p", None);
    assert_eq!(aliases.resolved_nodes().get("@p"), Some(&Some(bound("1"))));
}

proptest! {
    #[test]
    fn only_dereferenced_aliases_are_cached(
        defined in 1usize..8,
        uses in prop::collection::vec(0usize..10, 0..12),
    ) {
        let names: Vec<String> = (0..10).map(|i| format!("@a{i}")).collect();
        let mut aliases = ParameterAliasValueAccessor::new(
            names.iter().take(defined).map(|name| (name.clone(), format!("'{name}'"))),
        );

        let mut expected: Vec<&str> = Vec::new();
        for i in &uses {
            let name = names[*i].as_str();
            let node = aliases.resolve_with(name, bind_ok).unwrap().cloned();
            prop_assert_eq!(node.is_some(), *i < defined);
            if !expected.contains(&name) {
                expected.push(name);
            }
        }

        let cached: Vec<&str> = aliases.resolved_nodes().keys().map(String::as_str).collect();
        prop_assert_eq!(cached, expected);
        prop_assert_eq!(aliases.alias_value_expressions().len(), defined);
    }
}
