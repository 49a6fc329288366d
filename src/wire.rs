//! Lossless serde form of a tree.
//!
//! ```json
//! {"type": "named_tuple", "names": ["id", null], "nodes": [...]}
//! {"type": "tuple", "nodes": [...]}
//! {"type": "array", "nodes": [...]}
//! {"type": "value", "value": {"text": "hi"}}
//! {"type": "null"}
//! ```
//!
//! Finite numbers encode as JSON numbers; NaN and the infinities encode as
//! the strings `"NaN"`, `"inf"` and `"-inf"`.
//!
//! Decoding applies the same checks as the tuple constructors: a record
//! missing `names` or `nodes` is rejected, and so are names/nodes of
//! different lengths. Structural errors carry the JSON path of the offending
//! member, e.g. `nodes[1].value.integer`.
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{NodeError, Result};
use crate::node::{ArrayNode, DataStructureNode, Scalar};
use crate::tuple::{Realization, TupleNode};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireRef<'a> {
    Tuple {
        nodes: &'a [DataStructureNode],
    },
    NamedTuple {
        names: Vec<Option<&'a str>>,
        nodes: &'a [DataStructureNode],
    },
    Array {
        nodes: &'a [DataStructureNode],
    },
    Value {
        value: &'a Scalar,
    },
    Null,
}

/// Location inside the document being decoded, printed the way
/// `serde_path_to_error` prints its paths.
#[derive(Debug, Default)]
struct WirePath {
    segments: Vec<WireSegment>,
}

#[derive(Debug)]
enum WireSegment {
    Key(String),
    Index(usize),
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Serialize for DataStructureNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let wire = match self {
            Self::Tuple(tuple) => match tuple.realization() {
                Realization::Unnamed => WireRef::Tuple { nodes: tuple.nodes() },
                Realization::Named => WireRef::NamedTuple {
                    names: tuple.entries().map(|(name, _)| name).collect(),
                    nodes: tuple.nodes(),
                },
            },
            Self::Array(array) => WireRef::Array { nodes: array.nodes() },
            Self::Value(value) => WireRef::Value { value: value.scalar() },
            Self::Null => WireRef::Null,
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DataStructureNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode(&value).map_err(serde::de::Error::custom)
    }
}

/// Decode an already parsed wire document.
pub fn decode(value: &Value) -> Result<DataStructureNode> {
    decode_node(value, &mut WirePath::default())
}

pub fn from_str_with_path(src: &str) -> Result<DataStructureNode> {
    let value = serde_json::from_str::<Value>(src).map_err(|err| WirePath::default().error(err))?;
    decode(&value)
}

pub fn from_slice_with_path(bytes: &[u8]) -> Result<DataStructureNode> {
    let value = serde_json::from_slice::<Value>(bytes).map_err(|err| WirePath::default().error(err))?;
    decode(&value)
}

pub fn to_string(node: &DataStructureNode) -> serde_json::Result<String> {
    serde_json::to_string(node)
}

pub fn to_string_pretty(node: &DataStructureNode) -> serde_json::Result<String> {
    serde_json::to_string_pretty(node)
}

/// `Scalar::Number` payload: plain JSON numbers, plus string forms for the
/// values JSON cannot express.
pub(crate) mod number_repr {
    use ordered_float::OrderedFloat;
    use serde::de::{Error, Unexpected};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &OrderedFloat<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        let x = value.0;
        if x.is_finite() {
            serializer.serialize_f64(x)
        } else if x.is_nan() {
            serializer.serialize_str("NaN")
        } else if x > 0.0 {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OrderedFloat<f64>, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Float(f64),
            Text(String),
        }
        match Repr::deserialize(deserializer)? {
            Repr::Float(x) => Ok(OrderedFloat(x)),
            Repr::Text(text) => match text.as_str() {
                "NaN" => Ok(OrderedFloat(f64::NAN)),
                "inf" => Ok(OrderedFloat(f64::INFINITY)),
                "-inf" => Ok(OrderedFloat(f64::NEG_INFINITY)),
                other => Err(D::Error::invalid_value(
                    Unexpected::Str(other),
                    &"a number, \"NaN\", \"inf\" or \"-inf\"",
                )),
            },
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn decode_node(value: &Value, path: &mut WirePath) -> Result<DataStructureNode> {
    let Value::Object(record) = value else {
        return Err(path.error(format!("invalid type: {}, expected a node record", describe(value))));
    };
    let tag = match record.get("type") {
        Some(Value::String(tag)) => tag.as_str(),
        Some(other) => {
            path.push_key("type");
            return Err(path.error(format!("invalid type: {}, expected a string", describe(other))));
        }
        None => return Err(path.error("missing field `type`")),
    };
    match tag {
        "tuple" => Ok(TupleNode::of(decode_children(record, path)?).into()),
        "named_tuple" => {
            let names = match record.get("names") {
                None | Some(Value::Null) => return Err(NodeError::MissingNames),
                Some(names) => {
                    path.push_key("names");
                    let names = decode_as::<Vec<Option<String>>>(names, path)?;
                    path.pop();
                    names
                }
            };
            let nodes = decode_children(record, path)?;
            Ok(TupleNode::of_named(names, nodes)?.into())
        }
        "array" => Ok(ArrayNode::of(decode_children(record, path)?).into()),
        "value" => {
            let payload = record.get("value").ok_or_else(|| path.error("missing field `value`"))?;
            path.push_key("value");
            let scalar = decode_scalar(payload, path)?;
            path.pop();
            Ok(scalar.into())
        }
        "null" => Ok(DataStructureNode::Null),
        other => {
            path.push_key("type");
            Err(path.error(format!(
                "unknown variant `{other}`, expected one of `tuple`, `named_tuple`, `array`, `value`, `null`"
            )))
        }
    }
}

fn decode_children(record: &Map<String, Value>, path: &mut WirePath) -> Result<Vec<DataStructureNode>> {
    let items = match record.get("nodes") {
        None | Some(Value::Null) => return Err(NodeError::MissingNodes),
        Some(Value::Array(items)) => items,
        Some(other) => {
            path.push_key("nodes");
            return Err(path.error(format!("invalid type: {}, expected a sequence", describe(other))));
        }
    };
    path.push_key("nodes");
    let mut nodes = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        path.push_index(index);
        nodes.push(decode_node(item, path)?);
        path.pop();
    }
    path.pop();
    Ok(nodes)
}

fn decode_scalar(payload: &Value, path: &mut WirePath) -> Result<Scalar> {
    let Value::Object(map) = payload else {
        return Err(path.error(format!("invalid type: {}, expected a scalar record", describe(payload))));
    };
    let mut entries = map.iter();
    let (Some((variant, inner)), None) = (entries.next(), entries.next()) else {
        return Err(path.error("expected a scalar record with exactly one entry"));
    };
    path.push_key(variant);
    let scalar = match variant.as_str() {
        "bool" => Scalar::Bool(decode_as(inner, path)?),
        "integer" => Scalar::Integer(decode_as(inner, path)?),
        "number" => Scalar::Number(number_repr::deserialize(inner).map_err(|err| path.error(err))?),
        "text" => Scalar::Text(decode_as(inner, path)?),
        "bytes" => Scalar::Bytes(decode_as(inner, path)?),
        other => {
            return Err(path.error(format!(
                "unknown variant `{other}`, expected one of `bool`, `integer`, `number`, `text`, `bytes`"
            )));
        }
    };
    path.pop();
    Ok(scalar)
}

/// Typed leaf decoding; the path reported below `value` is appended to `path`.
fn decode_as<T: DeserializeOwned>(value: &Value, path: &WirePath) -> Result<T> {
    serde_path_to_error::deserialize::<_, T>(value).map_err(|err| NodeError::Decode {
        path: path.join(&err.path().to_string()),
        message: err.into_inner().to_string(),
    })
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "map",
    }
}

impl WirePath {
    fn push_key(&mut self, key: &str) {
        self.segments.push(WireSegment::Key(key.to_string()));
    }
    fn push_index(&mut self, index: usize) {
        self.segments.push(WireSegment::Index(index));
    }
    fn pop(&mut self) {
        self.segments.pop();
    }

    fn error(&self, message: impl fmt::Display) -> NodeError {
        NodeError::Decode {
            path: self.to_string(),
            message: message.to_string(),
        }
    }

    /// Appends a relative `serde_path_to_error` path (`.`, `[2]`, `a.b`).
    fn join(&self, relative: &str) -> String {
        if self.segments.is_empty() || relative == "." {
            return if relative == "." { self.to_string() } else { relative.to_string() };
        }
        if relative.starts_with('[') {
            format!("{self}{relative}")
        } else {
            format!("{self}.{relative}")
        }
    }
}

impl fmt::Display for WirePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str(".");
        }
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                WireSegment::Key(key) if position == 0 => f.write_str(key)?,
                WireSegment::Key(key) => write!(f, ".{key}")?,
                WireSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
