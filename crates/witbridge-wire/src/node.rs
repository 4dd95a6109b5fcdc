//! Value node codec: `Value` trees to and from a flat, index-addressed node array.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use witbridge_core::{Error, Result};

use crate::builder::{Cursor, SlotBuilder};
use crate::value::Value;

/// Position of a node in a flattened array.
pub type NodeIndex = i32;

/// One node of a flattened value. Composites refer to their children by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueNode {
    RecordValue(Vec<NodeIndex>),
    VariantValue {
        case_idx: u32,
        payload: Option<NodeIndex>,
    },
    EnumValue(u32),
    FlagsValue(Vec<bool>),
    TupleValue(Vec<NodeIndex>),
    ListValue(Vec<NodeIndex>),
    OptionValue(Option<NodeIndex>),
    ResultValue(std::result::Result<Option<NodeIndex>, Option<NodeIndex>>),
    PrimU8(u8),
    PrimU16(u16),
    PrimU32(u32),
    PrimU64(u64),
    PrimS8(i8),
    PrimS16(i16),
    PrimS32(i32),
    PrimS64(i64),
    PrimFloat32(f32),
    PrimFloat64(f64),
    PrimChar(char),
    PrimBool(bool),
    PrimString(String),
    Handle { uri: String, resource_id: u64 },
}

/// A flattened value. The root is node 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireValue {
    pub nodes: Vec<ValueNode>,
}

impl WireValue {
    /// Flatten a value tree in pre-order.
    pub fn from_value(value: &Value) -> Result<Self> {
        let mut builder = SlotBuilder::new();
        flatten(&mut builder, value)?;
        Ok(Self {
            nodes: builder.finish()?,
        })
    }

    /// Rebuild the value tree rooted at node 0.
    ///
    /// The array must be laid out exactly as [`Self::from_value`] lays it out: children
    /// follow their parent in pre-order, each node is referenced once, and no node is
    /// left over.
    pub fn to_value(&self) -> Result<Value> {
        let mut unflattener = Unflattener {
            nodes: &self.nodes,
            cursor: Cursor::new(self.nodes.len())?,
        };
        let value = unflattener.build(0)?;
        unflattener.cursor.finish()?;
        Ok(value)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|e| Error::Binary(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self> {
        postcard::from_bytes(bytes).map_err(|e| Error::Binary(e.to_string()))
    }

    /// One line per node, for debugging and snapshots.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = write!(out, "{i}: ");
            let _ = match node {
                ValueNode::RecordValue(fields) => write!(out, "record {fields:?}"),
                ValueNode::VariantValue { case_idx, payload } => match payload {
                    Some(p) => write!(out, "variant #{case_idx} -> {p}"),
                    None => write!(out, "variant #{case_idx}"),
                },
                ValueNode::EnumValue(case) => write!(out, "enum #{case}"),
                ValueNode::FlagsValue(flags) => write!(out, "flags {flags:?}"),
                ValueNode::TupleValue(items) => write!(out, "tuple {items:?}"),
                ValueNode::ListValue(items) => write!(out, "list {items:?}"),
                ValueNode::OptionValue(Some(inner)) => write!(out, "some -> {inner}"),
                ValueNode::OptionValue(None) => write!(out, "none"),
                ValueNode::ResultValue(Ok(Some(v))) => write!(out, "ok -> {v}"),
                ValueNode::ResultValue(Ok(None)) => write!(out, "ok"),
                ValueNode::ResultValue(Err(Some(v))) => write!(out, "err -> {v}"),
                ValueNode::ResultValue(Err(None)) => write!(out, "err"),
                ValueNode::PrimU8(v) => write!(out, "u8 {v}"),
                ValueNode::PrimU16(v) => write!(out, "u16 {v}"),
                ValueNode::PrimU32(v) => write!(out, "u32 {v}"),
                ValueNode::PrimU64(v) => write!(out, "u64 {v}"),
                ValueNode::PrimS8(v) => write!(out, "s8 {v}"),
                ValueNode::PrimS16(v) => write!(out, "s16 {v}"),
                ValueNode::PrimS32(v) => write!(out, "s32 {v}"),
                ValueNode::PrimS64(v) => write!(out, "s64 {v}"),
                ValueNode::PrimFloat32(v) => write!(out, "f32 {v}"),
                ValueNode::PrimFloat64(v) => write!(out, "f64 {v}"),
                ValueNode::PrimChar(v) => write!(out, "char {v:?}"),
                ValueNode::PrimBool(v) => write!(out, "bool {v}"),
                ValueNode::PrimString(v) => write!(out, "string {v:?}"),
                ValueNode::Handle { uri, resource_id } => {
                    write!(out, "handle {uri}#{resource_id}")
                }
            };
        }
        out
    }
}

fn flatten(builder: &mut SlotBuilder<ValueNode>, value: &Value) -> Result<NodeIndex> {
    let leaf = match value {
        Value::Bool(v) => ValueNode::PrimBool(*v),
        Value::U8(v) => ValueNode::PrimU8(*v),
        Value::U16(v) => ValueNode::PrimU16(*v),
        Value::U32(v) => ValueNode::PrimU32(*v),
        Value::U64(v) => ValueNode::PrimU64(*v),
        Value::S8(v) => ValueNode::PrimS8(*v),
        Value::S16(v) => ValueNode::PrimS16(*v),
        Value::S32(v) => ValueNode::PrimS32(*v),
        Value::S64(v) => ValueNode::PrimS64(*v),
        Value::F32(v) => ValueNode::PrimFloat32(*v),
        Value::F64(v) => ValueNode::PrimFloat64(*v),
        Value::Char(v) => ValueNode::PrimChar(*v),
        Value::String(v) => ValueNode::PrimString(v.clone()),
        Value::Enum(case) => ValueNode::EnumValue(*case),
        Value::Flags(flags) => ValueNode::FlagsValue(flags.clone()),
        Value::Handle { uri, resource_id } => ValueNode::Handle {
            uri: uri.clone(),
            resource_id: *resource_id,
        },
        composite => return flatten_composite(builder, composite),
    };
    builder.push(leaf)
}

fn flatten_composite(builder: &mut SlotBuilder<ValueNode>, value: &Value) -> Result<NodeIndex> {
    let idx = builder.reserve()?;
    let node = match value {
        Value::Record(fields) => ValueNode::RecordValue(flatten_all(builder, fields)?),
        Value::Tuple(items) => ValueNode::TupleValue(flatten_all(builder, items)?),
        Value::List(items) => ValueNode::ListValue(flatten_all(builder, items)?),
        Value::Variant {
            case_idx,
            case_value,
        } => ValueNode::VariantValue {
            case_idx: *case_idx,
            payload: flatten_opt(builder, case_value.as_deref())?,
        },
        Value::Option(inner) => ValueNode::OptionValue(flatten_opt(builder, inner.as_deref())?),
        Value::Result(Ok(v)) => ValueNode::ResultValue(Ok(flatten_opt(builder, v.as_deref())?)),
        Value::Result(Err(v)) => ValueNode::ResultValue(Err(flatten_opt(builder, v.as_deref())?)),
        leaf => {
            return Err(Error::InternalInconsistency(format!(
                "{} is not a composite value",
                leaf.kind_name()
            )));
        }
    };
    builder.fill(idx, node)?;
    Ok(idx)
}

fn flatten_all(builder: &mut SlotBuilder<ValueNode>, items: &[Value]) -> Result<Vec<NodeIndex>> {
    items.iter().map(|item| flatten(builder, item)).collect()
}

fn flatten_opt(
    builder: &mut SlotBuilder<ValueNode>,
    value: Option<&Value>,
) -> Result<Option<NodeIndex>> {
    value.map(|v| flatten(builder, v)).transpose()
}

struct Unflattener<'a> {
    nodes: &'a [ValueNode],
    cursor: Cursor,
}

impl Unflattener<'_> {
    fn child(&mut self, parent: NodeIndex, child: NodeIndex) -> Result<Value> {
        self.cursor.child(parent, child)?;
        self.build(child)
    }

    fn children(&mut self, parent: NodeIndex, children: &[NodeIndex]) -> Result<Vec<Value>> {
        children.iter().map(|&c| self.child(parent, c)).collect()
    }

    fn child_opt(
        &mut self,
        parent: NodeIndex,
        child: Option<NodeIndex>,
    ) -> Result<Option<Box<Value>>> {
        child
            .map(|c| self.child(parent, c).map(Box::new))
            .transpose()
    }

    fn build(&mut self, idx: NodeIndex) -> Result<Value> {
        self.cursor.descend()?;
        let value = self.node(idx);
        self.cursor.ascend();
        value
    }

    fn node(&mut self, idx: NodeIndex) -> Result<Value> {
        let nodes = self.nodes;
        let node = usize::try_from(idx)
            .ok()
            .and_then(|i| nodes.get(i))
            .ok_or_else(|| Error::InternalInconsistency(format!("node index {idx} out of range")))?;
        Ok(match node {
            ValueNode::RecordValue(fields) => Value::Record(self.children(idx, fields)?),
            ValueNode::TupleValue(items) => Value::Tuple(self.children(idx, items)?),
            ValueNode::ListValue(items) => Value::List(self.children(idx, items)?),
            ValueNode::VariantValue { case_idx, payload } => Value::Variant {
                case_idx: *case_idx,
                case_value: self.child_opt(idx, *payload)?,
            },
            ValueNode::EnumValue(case) => Value::Enum(*case),
            ValueNode::FlagsValue(flags) => Value::Flags(flags.clone()),
            ValueNode::OptionValue(inner) => Value::Option(self.child_opt(idx, *inner)?),
            ValueNode::ResultValue(Ok(v)) => Value::Result(Ok(self.child_opt(idx, *v)?)),
            ValueNode::ResultValue(Err(v)) => Value::Result(Err(self.child_opt(idx, *v)?)),
            ValueNode::PrimU8(v) => Value::U8(*v),
            ValueNode::PrimU16(v) => Value::U16(*v),
            ValueNode::PrimU32(v) => Value::U32(*v),
            ValueNode::PrimU64(v) => Value::U64(*v),
            ValueNode::PrimS8(v) => Value::S8(*v),
            ValueNode::PrimS16(v) => Value::S16(*v),
            ValueNode::PrimS32(v) => Value::S32(*v),
            ValueNode::PrimS64(v) => Value::S64(*v),
            ValueNode::PrimFloat32(v) => Value::F32(*v),
            ValueNode::PrimFloat64(v) => Value::F64(*v),
            ValueNode::PrimChar(v) => Value::Char(*v),
            ValueNode::PrimBool(v) => Value::Bool(*v),
            ValueNode::PrimString(v) => Value::String(v.clone()),
            ValueNode::Handle { uri, resource_id } => Value::Handle {
                uri: uri.clone(),
                resource_id: *resource_id,
            },
        })
    }
}
