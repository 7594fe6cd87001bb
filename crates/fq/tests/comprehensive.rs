//! Comprehensive tests for fq
//!
//! Collection construction from parsed documents, and the namespace
//! utilities: extend, each, is_array_like, make_array, proxy.

use std::cell::RefCell;

use fq::{
    Error, EventMethods, Key, Query, QueryConfig, each, extend, is_array, is_array_like,
    make_array, proxy, query,
};
use serde_json::{Map, Value, json};

const PAGE: &str = r#"
    <html>
        <body>
            <ul id="menu">
                <li class="item first">One</li>
                <li class="item">Two</li>
                <li class="item last">Three</li>
            </ul>
            <div class="panel"><p>Body <b>text</b></p></div>
        </body>
    </html>
"#;

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn test_selector_yields_document_order() {
    let document = fq_html::parse(PAGE).unwrap();
    let q = query(&document);

    let items = q.select("li.item").unwrap();
    assert_eq!(items.len(), 3);

    let classes: Vec<String> = items
        .iter()
        .map(|li| document.get_attribute(li, "class").unwrap())
        .collect();
    assert_eq!(classes, ["item first", "item", "item last"]);
}

#[test]
fn test_selector_with_combinators() {
    let document = fq_html::parse(PAGE).unwrap();
    let q = query(&document);

    assert_eq!(q.select("#menu > li:first-child").unwrap().len(), 1);
    assert_eq!(q.select("div.panel b").unwrap().len(), 1);
    assert_eq!(q.select("li:not(.first)").unwrap().len(), 2);
    assert!(q.select("ul > b").unwrap().is_empty());
}

#[test]
fn test_nodes_are_used_verbatim() {
    let document = fq_html::parse(PAGE).unwrap();
    let q = query(&document);
    let items = q.select("li").unwrap();

    let picked = vec![items[2], items[0], items[2]];
    let collection = q.select(picked.clone()).unwrap();
    assert_eq!(collection.nodes(), picked.as_slice());
    assert_eq!(collection.len(), 3);
}

#[test]
fn test_single_node_source() {
    let document = fq_html::parse(PAGE).unwrap();
    let q = query(&document);
    let body = q.select(document.body()).unwrap();
    assert_eq!(body.nodes(), &[document.body()]);
}

#[test]
fn test_invalid_selector_is_an_error() {
    let document = fq_html::parse(PAGE).unwrap();
    let err = query(&document).select("li::before").unwrap_err();
    assert!(matches!(err, Error::Selector(_)));
}

#[test]
fn test_has_keeps_only_matching_elements() {
    let document = fq_html::parse(PAGE).unwrap();
    let q = query(&document);
    let items = q.select("li").unwrap();

    let middle = items.has("li:not(.first):not(.last)").unwrap();
    assert_eq!(middle.nodes(), &[items[1]]);

    // Element-level test: the list itself has no `.item` class
    let menu = q.select("#menu").unwrap();
    assert!(menu.has(".item").unwrap().is_empty());
}

#[test]
fn test_cached_and_uncached_agree() {
    let document = fq_html::parse(PAGE).unwrap();
    let cached = Query::new(document.clone());
    let uncached = Query::with_config(document, QueryConfig::uncached());

    for selector in ["li", "#menu .item", "p > b", "body *"] {
        assert_eq!(
            cached.select(selector).unwrap().nodes(),
            uncached.select(selector).unwrap().nodes(),
            "{selector}"
        );
    }
}

#[test]
fn test_extend_overwrites_scalars() {
    let mut target = object(json!({"a": 1}));
    let result = extend(&mut target, &object(json!({"a": 2, "b": 3})));
    assert_eq!(Value::Object(result.clone()), json!({"a": 2, "b": 3}));
}

#[test]
fn test_extend_copies_arrays() {
    let source = object(json!({"a": [3, 4]}));
    let mut target = object(json!({"a": [1, 2]}));
    let result = extend(&mut target, &source);
    assert_eq!(result["a"], json!([3, 4]));

    if let Some(items) = result.get_mut("a").and_then(Value::as_array_mut) {
        items.clear();
    }
    assert_eq!(source["a"], json!([3, 4]));
}

#[test]
fn test_extend_creates_missing_nested_object() {
    let mut target = Map::new();
    extend(&mut target, &object(json!({"a": {"b": 1}})));
    assert_eq!(Value::Object(target), json!({"a": {"b": 1}}));
}

#[test]
fn test_each_array_and_object() {
    let list = json!(["a", "b", "c"]);
    let mut seen = Vec::new();
    let returned = each(&list, |key, value| seen.push((key, value.clone())));
    assert_eq!(
        seen,
        [
            (Key::Index(0), json!("a")),
            (Key::Index(1), json!("b")),
            (Key::Index(2), json!("c"))
        ]
    );
    assert_eq!(returned, &json!(["a", "b", "c"]));

    let map = json!({"x": 1, "y": 2});
    let mut keys = Vec::new();
    each(&map, |key, value| keys.push((key, value.clone())));
    assert_eq!(keys, [(Key::Name("x"), json!(1)), (Key::Name("y"), json!(2))]);
}

#[test]
fn test_array_likeness() {
    assert!(is_array_like(&json!([])));
    assert!(!is_array_like(&json!({"length": "x"})));
    assert!(is_array_like(&json!({"0": "a", "length": 1})));
    assert!(!is_array(&json!({"0": "a", "length": 1})));
}

#[test]
fn test_make_array() {
    assert_eq!(
        make_array(&json!({"0": "a", "1": "b", "length": 2})),
        Some(vec![json!("a"), json!("b")])
    );
    assert_eq!(make_array(&json!({})), None);
}

#[test]
fn test_proxy_binds_context() {
    let log = RefCell::new(Vec::new());
    let bound = proxy(
        |ctx: &&str, (a, b): (i32, i32)| log.borrow_mut().push(format!("{ctx}:{a}:{b}")),
        "ctx",
    );
    bound((1, 2));
    bound((3, 4));
    assert_eq!(*log.borrow(), ["ctx:1:2", "ctx:3:4"]);
}
