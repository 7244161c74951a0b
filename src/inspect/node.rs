//! The inspected shape of a value.

use crate::value::{Map, Value};

/// Node is one inspected value: the name of its type plus its structural kind.
///
/// Type names are what serde reports for named types (`"Account"`,
/// `"SystemTime"`) and a coarse category for everything else (`"number"`,
/// `"str"`, `"seq"`, `"map"`, `"option"`). Two nodes are only ever compared
/// when their type names agree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub type_name: &'static str,
    pub kind: Kind,
}

/// The closed set of structural kinds the diff engine dispatches on.
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    /// A leaf compared by value equality.
    Scalar(Value),
    /// A directly-comparable named type; compared by value, never decomposed.
    Opaque(Value),
    /// One level of optional indirection.
    Optional(Option<Box<Node>>),
    /// Named fields in declaration order. Fields hidden from serialization
    /// never show up here.
    Record(Vec<(&'static str, Node)>),
    /// Positional elements.
    Sequence(Vec<Node>),
    /// Keyed entries; keys are snapshotted as values.
    Map(Vec<(Value, Node)>),
    /// An enum variant and its payload.
    Variant {
        variant: &'static str,
        payload: Box<Node>,
    },
    /// A nested value whose `Serialize` impl failed, with the error message.
    Failed(String),
}

impl Node {
    pub fn new(type_name: &'static str, kind: Kind) -> Self {
        Node { type_name, kind }
    }

    pub fn scalar(type_name: &'static str, value: Value) -> Self {
        Node::new(type_name, Kind::Scalar(value))
    }

    pub fn is_record(&self) -> bool {
        matches!(self.kind, Kind::Record(_))
    }

    /// Returns the error message when this value failed to serialize.
    pub fn failure(&self) -> Option<&str> {
        match &self.kind {
            Kind::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Returns the inner node when this is a present optional.
    pub fn some(&self) -> Option<&Node> {
        match &self.kind {
            Kind::Optional(inner) => inner.as_deref(),
            _ => None,
        }
    }

    /// Snapshots this node as a plain value.
    ///
    /// Records and maps become maps, sequences become lists, `None` becomes
    /// null and enum variants use serde's externally tagged shape. A failed
    /// value becomes null.
    pub fn to_value(&self) -> Value {
        match &self.kind {
            Kind::Scalar(v) | Kind::Opaque(v) => v.clone(),
            Kind::Optional(None) | Kind::Failed(_) => Value::Null,
            Kind::Optional(Some(inner)) => inner.to_value(),
            Kind::Record(fields) => Value::Map(
                fields
                    .iter()
                    .map(|(name, node)| (name.to_string(), node.to_value()))
                    .collect(),
            ),
            Kind::Sequence(items) => Value::List(items.iter().map(Node::to_value).collect()),
            Kind::Map(entries) => Value::Map(
                entries
                    .iter()
                    .map(|(key, node)| (key.key_string(), node.to_value()))
                    .collect(),
            ),
            Kind::Variant { variant, payload } => match &payload.kind {
                Kind::Scalar(Value::Null) if payload.type_name == UNIT => {
                    Value::String(variant.to_string())
                }
                _ => {
                    let mut map = Map::new();
                    map.set(variant.to_string(), payload.to_value());
                    Value::Map(map)
                }
            },
        }
    }
}

pub(crate) const UNIT: &str = "unit";
pub(crate) const FAILED: &str = "failed";
