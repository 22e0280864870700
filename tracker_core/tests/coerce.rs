use proptest::prelude::*;
use serde_json::{Value, json};
use tracker_core::coerce;

#[test]
fn converts_numeric_strings_and_leaves_the_rest() {
    let out = coerce(json!({"a": "1.5", "b": "x", "c": null}));
    assert_eq!(out, json!({"a": 1.5, "b": "x", "c": null}));
}

#[test]
fn recurses_into_arrays_and_objects() {
    let out = coerce(json!({"acc": {"x": "0.10", "y": "-2", "z": " 3 "}, "list": ["4", true]}));
    assert_eq!(out, json!({"acc": {"x": 0.1, "y": -2, "z": 3}, "list": [4, true]}));
}

#[test]
fn empty_string_is_not_a_number() {
    assert_eq!(coerce(json!("")), json!(""));
}

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "[a-z0-9. -]{0,8}".prop_map(Value::from),
        (-1.0e3f64..1.0e3).prop_map(|f| Value::from(format!("{f:.2}"))),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            proptest::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Same container kinds, object keys and array lengths at every level.
/// Strings may turn into numbers; every other leaf must be untouched.
fn same_shape(before: &Value, after: &Value) -> bool {
    match (before, after) {
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter().all(|(k, va)| b.get(k).is_some_and(|vb| same_shape(va, vb)))
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(va, vb)| same_shape(va, vb))
        }
        (Value::String(_), Value::String(_) | Value::Number(_)) => true,
        (a, b) => a == b,
    }
}

proptest! {
    #[test]
    fn coercion_is_idempotent(v in arb_json()) {
        let once = coerce(v);
        let twice = coerce(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn coercion_preserves_structure(v in arb_json()) {
        let out = coerce(v.clone());
        prop_assert!(same_shape(&v, &out), "{} -> {}", v, out);
    }
}
