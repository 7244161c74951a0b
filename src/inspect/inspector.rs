//! A serde `Serializer` that captures any `Serialize` value as a [`Node`].

use std::collections::BTreeSet;
use std::fmt;

use serde::ser::{self, Serialize};
use thiserror::Error;

use super::node::{Kind, Node, FAILED, UNIT};
use crate::value::Value;

const NUMBER: &str = "number";
const OPTION: &str = "option";

/// InspectError is raised when a value's `Serialize` impl fails, or when it
/// produces something the inspector cannot represent.
///
/// Only failures at the root of a value surface as this error. A failing
/// field, element or map value is recorded in the tree as [`Kind::Failed`]
/// and its siblings are still inspected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InspectError(String);

impl InspectError {
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl ser::Error for InspectError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        InspectError(msg.to_string())
    }
}

/// Inspector walks a value through serde and builds its [`Node`] tree.
///
/// Named types listed in `comparable` are captured as [`Kind::Opaque`]
/// instead of being decomposed.
#[derive(Debug, Clone, Copy)]
pub struct Inspector<'a> {
    comparable: &'a BTreeSet<String>,
}

impl<'a> Inspector<'a> {
    pub fn new(comparable: &'a BTreeSet<String>) -> Self {
        Inspector { comparable }
    }

    pub fn inspect<T: ?Sized + Serialize>(&self, value: &T) -> Result<Node, InspectError> {
        value.serialize(*self)
    }

    /// Inspects a value nested inside a container. A failure becomes a
    /// [`Kind::Failed`] node so the rest of the container is still captured.
    fn child<T: ?Sized + Serialize>(&self, value: &T) -> Node {
        value
            .serialize(*self)
            .unwrap_or_else(|err| Node::new(FAILED, Kind::Failed(err.0)))
    }

    fn named(&self, name: &'static str, kind: Kind) -> Node {
        let node = Node::new(name, kind);
        if self.comparable.contains(name) {
            let value = node.to_value();
            Node::new(name, Kind::Opaque(value))
        } else {
            node
        }
    }

    fn variant(&self, name: &'static str, variant: &'static str, payload: Node) -> Node {
        self.named(
            name,
            Kind::Variant {
                variant,
                payload: Box::new(payload),
            },
        )
    }
}

impl<'a> ser::Serializer for Inspector<'a> {
    type Ok = Node;
    type Error = InspectError;

    type SerializeSeq = SeqInspector<'a>;
    type SerializeTuple = SeqInspector<'a>;
    type SerializeTupleStruct = SeqInspector<'a>;
    type SerializeTupleVariant = SeqInspector<'a>;
    type SerializeMap = MapInspector<'a>;
    type SerializeStruct = RecordInspector<'a>;
    type SerializeStructVariant = RecordInspector<'a>;

    fn serialize_bool(self, v: bool) -> Result<Node, InspectError> {
        Ok(Node::scalar("bool", Value::Bool(v)))
    }

    fn serialize_i8(self, v: i8) -> Result<Node, InspectError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Node, InspectError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Node, InspectError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Node, InspectError> {
        Ok(Node::scalar(NUMBER, Value::Int(v)))
    }

    fn serialize_i128(self, v: i128) -> Result<Node, InspectError> {
        Ok(Node::scalar(NUMBER, Value::from(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<Node, InspectError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Node, InspectError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Node, InspectError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Node, InspectError> {
        Ok(Node::scalar(NUMBER, Value::from(v)))
    }

    fn serialize_u128(self, v: u128) -> Result<Node, InspectError> {
        Ok(Node::scalar(NUMBER, Value::from(v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Node, InspectError> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Node, InspectError> {
        Ok(Node::scalar(NUMBER, Value::Float(v)))
    }

    fn serialize_char(self, v: char) -> Result<Node, InspectError> {
        Ok(Node::scalar("char", Value::String(v.to_string())))
    }

    fn serialize_str(self, v: &str) -> Result<Node, InspectError> {
        Ok(Node::scalar("str", Value::String(v.to_owned())))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Node, InspectError> {
        let bytes = v.iter().map(|b| Value::Int(i64::from(*b))).collect();
        Ok(Node::scalar("bytes", Value::List(bytes)))
    }

    fn serialize_none(self) -> Result<Node, InspectError> {
        Ok(Node::new(OPTION, Kind::Optional(None)))
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Node, InspectError> {
        let inner = value.serialize(self)?;
        Ok(Node::new(OPTION, Kind::Optional(Some(Box::new(inner)))))
    }

    fn serialize_unit(self) -> Result<Node, InspectError> {
        Ok(Node::scalar(UNIT, Value::Null))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Node, InspectError> {
        Ok(self.named(name, Kind::Scalar(Value::Null)))
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Node, InspectError> {
        Ok(self.variant(name, variant, Node::scalar(UNIT, Value::Null)))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Node, InspectError> {
        // Newtypes keep their own name but take the wrapped value's shape.
        let inner = value.serialize(self)?;
        Ok(self.named(name, inner.kind))
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Node, InspectError> {
        let payload = value.serialize(self)?;
        Ok(self.variant(name, variant, payload))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqInspector<'a>, InspectError> {
        Ok(SeqInspector::new(self, "seq", None, len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqInspector<'a>, InspectError> {
        Ok(SeqInspector::new(self, "tuple", None, len))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<SeqInspector<'a>, InspectError> {
        Ok(SeqInspector::new(self, name, None, len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SeqInspector<'a>, InspectError> {
        Ok(SeqInspector::new(self, name, Some(variant), len))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapInspector<'a>, InspectError> {
        Ok(MapInspector {
            inspector: self,
            entries: Vec::with_capacity(len.unwrap_or(0)),
            pending_key: None,
        })
    }

    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<RecordInspector<'a>, InspectError> {
        Ok(RecordInspector::new(self, name, None, len))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<RecordInspector<'a>, InspectError> {
        Ok(RecordInspector::new(self, name, Some(variant), len))
    }
}

/// Collects sequences, tuples, tuple structs and tuple variants.
pub struct SeqInspector<'a> {
    inspector: Inspector<'a>,
    type_name: &'static str,
    variant: Option<&'static str>,
    items: Vec<Node>,
}

impl<'a> SeqInspector<'a> {
    fn new(
        inspector: Inspector<'a>,
        type_name: &'static str,
        variant: Option<&'static str>,
        len: usize,
    ) -> Self {
        SeqInspector {
            inspector,
            type_name,
            variant,
            items: Vec::with_capacity(len),
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), InspectError> {
        self.items.push(self.inspector.child(value));
        Ok(())
    }

    fn finish(self) -> Result<Node, InspectError> {
        let kind = Kind::Sequence(self.items);
        Ok(match self.variant {
            Some(variant) => {
                self.inspector
                    .variant(self.type_name, variant, Node::new("tuple", kind))
            }
            None => self.inspector.named(self.type_name, kind),
        })
    }
}

impl ser::SerializeSeq for SeqInspector<'_> {
    type Ok = Node;
    type Error = InspectError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), InspectError> {
        self.push(value)
    }

    fn end(self) -> Result<Node, InspectError> {
        self.finish()
    }
}

impl ser::SerializeTuple for SeqInspector<'_> {
    type Ok = Node;
    type Error = InspectError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), InspectError> {
        self.push(value)
    }

    fn end(self) -> Result<Node, InspectError> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for SeqInspector<'_> {
    type Ok = Node;
    type Error = InspectError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), InspectError> {
        self.push(value)
    }

    fn end(self) -> Result<Node, InspectError> {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for SeqInspector<'_> {
    type Ok = Node;
    type Error = InspectError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), InspectError> {
        self.push(value)
    }

    fn end(self) -> Result<Node, InspectError> {
        self.finish()
    }
}

/// Collects map entries. Keys are snapshotted as values.
///
/// Keys that snapshot to the same value are not told apart: `None` and
/// `Some(())` both become null, and the later entry shadows the earlier one
/// when maps are diffed. A key whose `Serialize` impl fails fails the whole
/// map, since there is nothing to file the entry under.
pub struct MapInspector<'a> {
    inspector: Inspector<'a>,
    entries: Vec<(Value, Node)>,
    pending_key: Option<Value>,
}

impl ser::SerializeMap for MapInspector<'_> {
    type Ok = Node;
    type Error = InspectError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), InspectError> {
        self.pending_key = Some(key.serialize(self.inspector)?.to_value());
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), InspectError> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| InspectError("map value serialized before its key".to_string()))?;
        self.entries.push((key, self.inspector.child(value)));
        Ok(())
    }

    fn end(self) -> Result<Node, InspectError> {
        Ok(self.inspector.named("map", Kind::Map(self.entries)))
    }
}

/// Collects struct and struct-variant fields.
pub struct RecordInspector<'a> {
    inspector: Inspector<'a>,
    type_name: &'static str,
    variant: Option<&'static str>,
    fields: Vec<(&'static str, Node)>,
}

impl<'a> RecordInspector<'a> {
    fn new(
        inspector: Inspector<'a>,
        type_name: &'static str,
        variant: Option<&'static str>,
        len: usize,
    ) -> Self {
        RecordInspector {
            inspector,
            type_name,
            variant,
            fields: Vec::with_capacity(len),
        }
    }

    fn push<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), InspectError> {
        self.fields.push((key, self.inspector.child(value)));
        Ok(())
    }

    fn finish(self) -> Result<Node, InspectError> {
        let kind = Kind::Record(self.fields);
        Ok(match self.variant {
            Some(variant) => {
                self.inspector
                    .variant(self.type_name, variant, Node::new(variant, kind))
            }
            None => self.inspector.named(self.type_name, kind),
        })
    }
}

impl ser::SerializeStruct for RecordInspector<'_> {
    type Ok = Node;
    type Error = InspectError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), InspectError> {
        self.push(key, value)
    }

    fn end(self) -> Result<Node, InspectError> {
        self.finish()
    }
}

impl ser::SerializeStructVariant for RecordInspector<'_> {
    type Ok = Node;
    type Error = InspectError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), InspectError> {
        self.push(key, value)
    }

    fn end(self) -> Result<Node, InspectError> {
        self.finish()
    }
}
