//! Iteration primitives
//!
//! "Array-like" is an explicit capability here: [`ArrayLike`] for typed
//! sequences, and [`Sequence`] for JSON values that are either arrays or
//! objects shaped like `{"0": .., "1": .., "length": 2}`.

use serde_json::{Map, Value};

static NULL: Value = Value::Null;

/// Ordered indexed access plus a length
pub trait ArrayLike {
    type Item;

    fn length(&self) -> usize;

    /// Item at `index`, `None` for holes and out-of-range indices
    fn item(&self, index: usize) -> Option<&Self::Item>;
}

impl<T> ArrayLike for [T] {
    type Item = T;

    fn length(&self) -> usize {
        self.len()
    }

    fn item(&self, index: usize) -> Option<&T> {
        self.get(index)
    }
}

impl<T> ArrayLike for Vec<T> {
    type Item = T;

    fn length(&self) -> usize {
        self.len()
    }

    fn item(&self, index: usize) -> Option<&T> {
        self.get(index)
    }
}

impl<T, const N: usize> ArrayLike for [T; N] {
    type Item = T;

    fn length(&self) -> usize {
        N
    }

    fn item(&self, index: usize) -> Option<&T> {
        self.get(index)
    }
}

/// Array-like view of a JSON value
#[derive(Debug, Clone, Copy)]
pub enum Sequence<'a> {
    /// A true JSON array
    Array(&'a [Value]),
    /// An object with a numeric `length` and index keys
    Indexed {
        map: &'a Map<String, Value>,
        length: usize,
    },
}

impl<'a> Sequence<'a> {
    /// Item at `index`, borrowed for the lifetime of the viewed value
    pub fn get(&self, index: usize) -> Option<&'a Value> {
        match *self {
            Sequence::Array(items) => items.get(index),
            Sequence::Indexed { map, length } if index < length => map.get(&index.to_string()),
            Sequence::Indexed { .. } => None,
        }
    }
}

impl ArrayLike for Sequence<'_> {
    type Item = Value;

    fn length(&self) -> usize {
        match *self {
            Sequence::Array(items) => items.len(),
            Sequence::Indexed { length, .. } => length,
        }
    }

    fn item(&self, index: usize) -> Option<&Value> {
        self.get(index)
    }
}

/// View `value` as array-like.
///
/// Arrays always qualify. Objects qualify when `length` is a non-negative
/// integer and either zero or `length - 1` is one of their keys. A `length`
/// larger than the object's key count is rejected: such an object is mostly
/// holes, and visiting it would cost time and memory unrelated to its size.
pub fn as_array_like(value: &Value) -> Option<Sequence<'_>> {
    match value {
        Value::Array(items) => Some(Sequence::Array(items)),
        Value::Object(map) => {
            let length = map.get("length")?.as_f64()?;
            if length < 0.0 || length.fract() != 0.0 || length > map.len() as f64 {
                return None;
            }
            let length = length as usize;
            if length > 0 && !map.contains_key(&(length - 1).to_string()) {
                return None;
            }
            Some(Sequence::Indexed { map, length })
        }
        _ => None,
    }
}

pub fn is_array_like(value: &Value) -> bool {
    as_array_like(value).is_some()
}

/// True only for real arrays, not array-like objects
pub fn is_array(value: &Value) -> bool {
    value.is_array()
}

/// Key passed to an [`each`] callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'a> {
    Index(usize),
    Name(&'a str),
}

/// Visit every entry of `value` and return it unchanged.
///
/// Array-like values are visited by ascending index (holes are passed as
/// `null`); other objects once per key in insertion order. Scalars have no
/// entries.
pub fn each<'a, F>(value: &'a Value, mut callback: F) -> &'a Value
where
    F: FnMut(Key<'a>, &'a Value),
{
    if let Some(sequence) = as_array_like(value) {
        for index in 0..sequence.length() {
            callback(Key::Index(index), sequence.get(index).unwrap_or(&NULL));
        }
    } else if let Value::Object(map) = value {
        for (key, item) in map {
            callback(Key::Name(key), item);
        }
    }
    value
}

/// Visit every item of a typed sequence by ascending index and return it
pub fn each_item<A, F>(items: &A, mut callback: F) -> &A
where
    A: ArrayLike + ?Sized,
    F: FnMut(usize, &A::Item),
{
    for index in 0..items.length() {
        if let Some(item) = items.item(index) {
            callback(index, item);
        }
    }
    items
}

/// Copy an array-like value into a new array. `None` means "not
/// array-like"; callers must check before use.
pub fn make_array(value: &Value) -> Option<Vec<Value>> {
    let sequence = as_array_like(value)?;
    let items = (0..sequence.length())
        .map(|i| sequence.get(i).cloned().unwrap_or(Value::Null))
        .collect();
    Some(items)
}

/// Copy a typed sequence into a new `Vec`
pub fn to_vec<A>(items: &A) -> Vec<A::Item>
where
    A: ArrayLike + ?Sized,
    A::Item: Clone,
{
    (0..items.length())
        .filter_map(|i| items.item(i).cloned())
        .collect()
}

/// Bind `context` as the first argument of `f`.
///
/// The returned closure forwards its argument unchanged; pass a tuple for
/// several positional arguments.
pub fn proxy<C, A, R, F>(f: F, context: C) -> impl Fn(A) -> R
where
    F: Fn(&C, A) -> R,
{
    move |args| f(&context, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_array_like() {
        assert!(is_array_like(&json!([])));
        assert!(is_array_like(&json!([1, 2])));
        assert!(is_array_like(&json!({"length": 0})));
        assert!(is_array_like(&json!({"0": "a", "1": "b", "length": 2})));

        assert!(!is_array_like(&json!({"length": "x"})));
        assert!(!is_array_like(&json!({"length": 2, "0": "a"})));
        assert!(!is_array_like(&json!({"length": 1.5, "0": "a"})));
        assert!(!is_array_like(&json!({"length": -1})));
        assert!(!is_array_like(&json!({})));
        assert!(!is_array_like(&json!("abc")));
    }

    #[test]
    fn test_length_beyond_key_count_is_rejected() {
        let sparse = json!({"length": 4_000_000_000u64, "3999999999": 0});
        assert!(!is_array_like(&sparse));
        assert_eq!(make_array(&sparse), None);

        let mut calls = 0;
        each(&sparse, |_, _| calls += 1);
        assert_eq!(calls, 2);

        // One hole per extra key is still accepted
        assert_eq!(
            make_array(&json!({"length": 2, "1": "b"})),
            Some(vec![Value::Null, json!("b")])
        );
    }

    #[test]
    fn test_is_array_excludes_array_like_objects() {
        assert!(is_array(&json!([])));
        assert!(!is_array(&json!({"0": 1, "length": 1})));
    }

    #[test]
    fn test_each_array_in_order() {
        let value = json!(["a", "b", "c"]);
        let mut seen = Vec::new();
        let returned = each(&value, |key, item| seen.push((key, item.clone())));

        assert_eq!(
            seen,
            vec![
                (Key::Index(0), json!("a")),
                (Key::Index(1), json!("b")),
                (Key::Index(2), json!("c")),
            ]
        );
        assert!(std::ptr::eq(returned, &value));
        assert_eq!(value, json!(["a", "b", "c"]));
    }

    #[test]
    fn test_each_object_keys() {
        let value = json!({"x": 1, "y": 2});
        let mut seen = Vec::new();
        each(&value, |key, item| seen.push((key, item.clone())));

        assert_eq!(seen, vec![(Key::Name("x"), json!(1)), (Key::Name("y"), json!(2))]);
    }

    #[test]
    fn test_each_array_like_object_uses_indices() {
        let value = json!({"length": 2, "0": "a", "1": "b"});
        let mut keys = Vec::new();
        each(&value, |key, _| keys.push(key));
        assert_eq!(keys, vec![Key::Index(0), Key::Index(1)]);
    }

    #[test]
    fn test_each_scalar_has_no_entries() {
        let mut calls = 0;
        each(&json!(42), |_, _| calls += 1);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_each_item_typed() {
        let items = [10, 20, 30];
        let mut seen = Vec::new();
        each_item(&items, |i, v| seen.push((i, *v)));
        assert_eq!(seen, vec![(0, 10), (1, 20), (2, 30)]);
    }

    #[test]
    fn test_make_array() {
        assert_eq!(
            make_array(&json!({"0": "a", "1": "b", "length": 2})),
            Some(vec![json!("a"), json!("b")])
        );
        assert_eq!(make_array(&json!({})), None);
        assert_eq!(make_array(&json!([])), Some(vec![]));
    }

    #[test]
    fn test_make_array_copies() {
        let source = json!([1, 2]);
        let mut copy = make_array(&source).unwrap();
        copy.push(json!(3));
        assert_eq!(source, json!([1, 2]));
    }

    #[test]
    fn test_to_vec() {
        assert_eq!(to_vec(&vec!['a', 'b']), vec!['a', 'b']);
    }

    #[test]
    fn test_proxy_binds_context() {
        let greet = proxy(|name: &String, (greeting, punct): (&str, char)| {
            format!("{greeting}, {name}{punct}")
        }, "fq".to_string());

        assert_eq!(greet(("hello", '!')), "hello, fq!");
        assert_eq!(greet(("bye", '.')), "bye, fq.");
    }
}
