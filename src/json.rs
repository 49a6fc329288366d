//! Plain JSON documents in and out of the tree model.
//!
//! Import never fails: objects become named tuples (key order kept), arrays
//! become array nodes, scalars become value nodes. Export is the inverse
//! wherever JSON can express it:
//! - named tuples with present, unique names become objects;
//! - other named tuples become arrays of `[name | null, value]` pairs;
//! - unnamed tuples become arrays;
//! - bytes become arrays of integers, non-finite numbers become `null`.
use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

use crate::node::{ArrayNode, DataStructureNode, Scalar};
use crate::tuple::{Realization, TupleNode};

pub fn from_json(value: &Value) -> DataStructureNode {
    match value {
        Value::Null => DataStructureNode::Null,
        Value::Bool(x) => DataStructureNode::boolean(*x),
        Value::Number(n) => match n.as_i64() {
            Some(i) => DataStructureNode::integer(i),
            None => DataStructureNode::number(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => DataStructureNode::text(s.as_str()),
        Value::Array(xs) => {
            let nodes: Vec<DataStructureNode> = xs.iter().map(from_json).collect();
            ArrayNode::of(nodes).into()
        }
        Value::Object(map) => {
            let (names, nodes): (Vec<Option<String>>, Vec<DataStructureNode>) = map
                .iter()
                .map(|(key, value)| (Some(key.clone()), from_json(value)))
                .unzip();
            // an empty object stays a named tuple so it exports back as `{}`
            TupleNode::of_named_raw(names, nodes).into()
        }
    }
}

pub fn to_json(node: &DataStructureNode) -> Value {
    match node {
        DataStructureNode::Tuple(tuple) => tuple_to_json(tuple),
        DataStructureNode::Array(array) => Value::Array(array.nodes().iter().map(to_json).collect()),
        DataStructureNode::Value(value) => scalar_to_json(value.scalar()),
        DataStructureNode::Null => Value::Null,
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn tuple_to_json(tuple: &TupleNode) -> Value {
    if tuple.realization() == Realization::Unnamed {
        return Value::Array(tuple.nodes().iter().map(to_json).collect());
    }
    match object_fields(tuple) {
        Some(fields) => Value::Object(fields.into_iter().collect::<Map<String, Value>>()),
        None => Value::Array(
            tuple
                .entries()
                .map(|(name, node)| {
                    let name = name.map_or(Value::Null, |name| Value::String(name.to_string()));
                    Value::Array(vec![name, to_json(node)])
                })
                .collect(),
        ),
    }
}

/// `None` as soon as a name is absent or repeated.
fn object_fields(tuple: &TupleNode) -> Option<IndexMap<String, Value>> {
    let mut fields = IndexMap::with_capacity(tuple.len());
    for (name, node) in tuple.entries() {
        let name = name?;
        if fields.insert(name.to_string(), to_json(node)).is_some() {
            return None;
        }
    }
    Some(fields)
}

fn scalar_to_json(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Bool(x) => Value::Bool(*x),
        Scalar::Integer(x) => Value::from(*x),
        Scalar::Number(x) => Number::from_f64(x.0).map_or(Value::Null, Value::Number),
        Scalar::Text(x) => Value::String(x.clone()),
        Scalar::Bytes(xs) => Value::Array(xs.iter().map(|&b| Value::from(b)).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn objects_import_as_named_tuples_in_key_order() {
        let node = from_json(&json!({"zeta": 1, "alpha": "x", "mid": null}));
        let tuple = node.as_tuple().unwrap();
        assert!(tuple.is_named());
        assert_eq!(
            tuple.names(),
            vec![Some("zeta".to_string()), Some("alpha".to_string()), Some("mid".to_string())]
        );
        assert_eq!(tuple.get_by_name("alpha"), Some(&DataStructureNode::text("x")));
        assert!(tuple.get_by_name("mid").unwrap().is_null());
    }

    #[test]
    fn numbers_keep_integer_vs_float() {
        assert_eq!(from_json(&json!(3)), DataStructureNode::integer(3));
        assert_eq!(from_json(&json!(-3)), DataStructureNode::integer(-3));
        assert_eq!(from_json(&json!(2.5)), DataStructureNode::number(2.5));
        assert_eq!(from_json(&json!(u64::MAX)), DataStructureNode::number(u64::MAX as f64));
    }

    #[test]
    fn nested_documents_round_trip() {
        let doc = json!({
            "name": "Acme",
            "loc": [null, [37.42, -122.08]],
            "open": true,
            "tags": ["hardware", "store"],
            "meta": {}
        });
        assert_eq!(to_json(&from_json(&doc)), doc);
    }

    #[test]
    fn named_tuples_that_cannot_be_objects_export_as_pairs() {
        let duplicated = TupleNode::builder().add_named("k", 1).add_named("k", 2).build();
        assert_eq!(to_json(&duplicated.into()), json!([["k", 1], ["k", 2]]));

        let partial = TupleNode::builder().add_named("k", 1).add(2).build();
        assert_eq!(to_json(&partial.into()), json!([["k", 1], [null, 2]]));
    }

    #[test]
    fn leaves_export_as_json_scalars() {
        assert_eq!(to_json(&TupleNode::of(vec![DataStructureNode::integer(1)]).into()), json!([1]));
        assert_eq!(to_json(&DataStructureNode::bytes(vec![7, 8])), json!([7, 8]));
        assert_eq!(to_json(&DataStructureNode::number(f64::INFINITY)), Value::Null);
    }
}
