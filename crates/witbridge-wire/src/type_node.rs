//! Schema node codec: schemas to and from a flat, index-addressed node array.
//!
//! Only the structural shape, names and owners cross the boundary. Host-side
//! representation tags (list repr, wide-integer flag, unit kind, option empty kind,
//! result origin, tagged-union metadata) are dropped on the way out and come back as
//! their defaults.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use witbridge_core::{
    Case, EmptyKind, EnumSchema, Error, Field, FlagsSchema, HandleSchema, IntRepr, ListRepr,
    ListSchema, OptionSchema, RecordSchema, ResourceMode, Result, ResultOrigin, ResultSchema,
    Schema, TupleSchema, TypeName, VariantSchema,
};

use crate::builder::{Cursor, SlotBuilder};
use crate::node::NodeIndex;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeNode {
    RecordType(Vec<(String, NodeIndex)>),
    VariantType(Vec<(String, Option<NodeIndex>)>),
    EnumType(Vec<String>),
    FlagsType(Vec<String>),
    TupleType(Vec<NodeIndex>),
    ListType(NodeIndex),
    OptionType(NodeIndex),
    ResultType {
        ok: Option<NodeIndex>,
        err: Option<NodeIndex>,
    },
    HandleType {
        resource_id: u64,
        mode: ResourceMode,
    },
    PrimU8Type,
    PrimU16Type,
    PrimU32Type,
    PrimU64Type,
    PrimS8Type,
    PrimS16Type,
    PrimS32Type,
    PrimS64Type,
    PrimF32Type,
    PrimF64Type,
    PrimCharType,
    PrimBoolType,
    PrimStringType,
}

/// A type node with the optional name and owner of the schema it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedTypeNode {
    pub name: Option<String>,
    pub owner: Option<String>,
    pub node: TypeNode,
}

/// A flattened schema. The root is node 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireType {
    pub nodes: Vec<NamedTypeNode>,
}

impl WireType {
    pub fn from_schema(schema: &Schema) -> Result<Self> {
        let mut builder = SlotBuilder::new();
        flatten(&mut builder, schema)?;
        Ok(Self {
            nodes: builder.finish()?,
        })
    }

    /// Rebuild the schema rooted at node 0, with host tags at their defaults.
    ///
    /// Like [`WireValue::to_value`](crate::WireValue::to_value), the array must be in
    /// canonical pre-order with every node referenced exactly once.
    pub fn to_schema(&self) -> Result<Schema> {
        let mut rebuilder = Rebuilder {
            nodes: &self.nodes,
            cursor: Cursor::new(self.nodes.len())?,
        };
        let schema = rebuilder.build(0)?;
        rebuilder.cursor.finish()?;
        Ok(schema)
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
        for (i, named) in self.nodes.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = write!(out, "{i}: ");
            if let Some(name) = &named.name {
                let _ = write!(out, "{name} = ");
            }
            let _ = match &named.node {
                TypeNode::RecordType(fields) => {
                    out.push_str("record {");
                    for (j, (name, child)) in fields.iter().enumerate() {
                        let sep = if j > 0 { "," } else { "" };
                        let _ = write!(out, "{sep} {name}: {child}");
                    }
                    write!(out, " }}")
                }
                TypeNode::VariantType(cases) => {
                    out.push_str("variant {");
                    for (j, (name, child)) in cases.iter().enumerate() {
                        let sep = if j > 0 { "," } else { "" };
                        let _ = match child {
                            Some(child) => write!(out, "{sep} {name}({child})"),
                            None => write!(out, "{sep} {name}"),
                        };
                    }
                    write!(out, " }}")
                }
                TypeNode::EnumType(cases) => write!(out, "enum {{ {} }}", cases.join(", ")),
                TypeNode::FlagsType(flags) => write!(out, "flags {{ {} }}", flags.join(", ")),
                TypeNode::TupleType(items) => write!(out, "tuple {items:?}"),
                TypeNode::ListType(element) => write!(out, "list<{element}>"),
                TypeNode::OptionType(inner) => write!(out, "option<{inner}>"),
                TypeNode::ResultType { ok, err } => {
                    let side = |s: &Option<NodeIndex>| s.map_or("_".to_owned(), |i| i.to_string());
                    write!(out, "result<{}, {}>", side(ok), side(err))
                }
                TypeNode::HandleType { resource_id, mode } => match mode {
                    ResourceMode::Owned => write!(out, "own<{resource_id}>"),
                    ResourceMode::Borrowed => write!(out, "borrow<{resource_id}>"),
                },
                prim => write!(out, "{}", prim_name(prim)),
            };
        }
        out
    }
}

struct Rebuilder<'a> {
    nodes: &'a [NamedTypeNode],
    cursor: Cursor,
}

impl Rebuilder<'_> {
    fn child(&mut self, parent: NodeIndex, child: NodeIndex) -> Result<Schema> {
        self.cursor.child(parent, child)?;
        self.build(child)
    }

    fn child_opt(
        &mut self,
        parent: NodeIndex,
        child: Option<NodeIndex>,
    ) -> Result<Option<Box<Schema>>> {
        child
            .map(|c| self.child(parent, c).map(Box::new))
            .transpose()
    }

    fn build(&mut self, idx: NodeIndex) -> Result<Schema> {
        self.cursor.descend()?;
        let schema = self.node(idx);
        self.cursor.ascend();
        schema
    }

    fn node(&mut self, idx: NodeIndex) -> Result<Schema> {
        let nodes = self.nodes;
        let named = usize::try_from(idx)
            .ok()
            .and_then(|i| nodes.get(i))
            .ok_or_else(|| Error::InternalInconsistency(format!("node index {idx} out of range")))?;
        let type_name = TypeName {
            name: named.name.clone(),
            owner: named.owner.clone(),
        };
        Ok(match &named.node {
            TypeNode::RecordType(fields) => Schema::Record(RecordSchema {
                type_name,
                fields: fields
                    .iter()
                    .map(|(name, child)| {
                        Ok(Field {
                            name: name.clone(),
                            schema: self.child(idx, *child)?,
                        })
                    })
                    .collect::<Result<_>>()?,
            }),
            TypeNode::VariantType(cases) => Schema::Variant(VariantSchema {
                type_name,
                cases: cases
                    .iter()
                    .map(|(name, child)| {
                        Ok(Case {
                            name: name.clone(),
                            payload: child.map(|c| self.child(idx, c)).transpose()?,
                        })
                    })
                    .collect::<Result<_>>()?,
                tagged: None,
            }),
            TypeNode::EnumType(cases) => Schema::Enum(EnumSchema {
                type_name,
                cases: cases.clone(),
            }),
            TypeNode::FlagsType(flags) => Schema::Flags(FlagsSchema {
                type_name,
                flags: flags.clone(),
            }),
            TypeNode::TupleType(items) => Schema::Tuple(TupleSchema {
                type_name,
                items: items
                    .iter()
                    .map(|&c| self.child(idx, c))
                    .collect::<Result<_>>()?,
                unit: None,
            }),
            TypeNode::ListType(element) => Schema::List(ListSchema {
                type_name,
                element: Box::new(self.child(idx, *element)?),
                repr: ListRepr::Plain,
            }),
            TypeNode::OptionType(inner) => Schema::Option(OptionSchema {
                type_name,
                inner: Box::new(self.child(idx, *inner)?),
                empty: EmptyKind::Undefined,
            }),
            TypeNode::ResultType { ok, err } => Schema::Result(ResultSchema {
                type_name,
                ok: self.child_opt(idx, *ok)?,
                err: self.child_opt(idx, *err)?,
                origin: ResultOrigin::Inbuilt,
            }),
            TypeNode::HandleType { resource_id, mode } => Schema::Handle(HandleSchema {
                type_name,
                resource_id: *resource_id,
                mode: *mode,
            }),
            TypeNode::PrimU8Type => Schema::U8,
            TypeNode::PrimU16Type => Schema::U16,
            TypeNode::PrimU32Type => Schema::U32,
            TypeNode::PrimU64Type => Schema::U64 {
                repr: IntRepr::Number,
            },
            TypeNode::PrimS8Type => Schema::S8,
            TypeNode::PrimS16Type => Schema::S16,
            TypeNode::PrimS32Type => Schema::S32,
            TypeNode::PrimS64Type => Schema::S64 {
                repr: IntRepr::Number,
            },
            TypeNode::PrimF32Type => Schema::F32,
            TypeNode::PrimF64Type => Schema::F64,
            TypeNode::PrimCharType => Schema::Char,
            TypeNode::PrimBoolType => Schema::Bool,
            TypeNode::PrimStringType => Schema::Str,
        })
    }
}

fn prim_name(node: &TypeNode) -> &'static str {
    match node {
        TypeNode::PrimU8Type => "u8",
        TypeNode::PrimU16Type => "u16",
        TypeNode::PrimU32Type => "u32",
        TypeNode::PrimU64Type => "u64",
        TypeNode::PrimS8Type => "s8",
        TypeNode::PrimS16Type => "s16",
        TypeNode::PrimS32Type => "s32",
        TypeNode::PrimS64Type => "s64",
        TypeNode::PrimF32Type => "f32",
        TypeNode::PrimF64Type => "f64",
        TypeNode::PrimCharType => "char",
        TypeNode::PrimBoolType => "bool",
        TypeNode::PrimStringType => "string",
        _ => "composite",
    }
}

fn named(type_name: &TypeName, node: TypeNode) -> NamedTypeNode {
    NamedTypeNode {
        name: type_name.name.clone(),
        owner: type_name.owner.clone(),
        node,
    }
}

fn unnamed(node: TypeNode) -> NamedTypeNode {
    NamedTypeNode {
        name: None,
        owner: None,
        node,
    }
}

fn flatten(builder: &mut SlotBuilder<NamedTypeNode>, schema: &Schema) -> Result<NodeIndex> {
    let leaf = match schema {
        Schema::Bool => TypeNode::PrimBoolType,
        Schema::S8 => TypeNode::PrimS8Type,
        Schema::S16 => TypeNode::PrimS16Type,
        Schema::S32 => TypeNode::PrimS32Type,
        Schema::S64 { .. } => TypeNode::PrimS64Type,
        Schema::U8 => TypeNode::PrimU8Type,
        Schema::U16 => TypeNode::PrimU16Type,
        Schema::U32 => TypeNode::PrimU32Type,
        Schema::U64 { .. } => TypeNode::PrimU64Type,
        Schema::F32 => TypeNode::PrimF32Type,
        Schema::F64 => TypeNode::PrimF64Type,
        Schema::Char => TypeNode::PrimCharType,
        Schema::Str => TypeNode::PrimStringType,
        Schema::Enum(en) => {
            return builder.push(named(&en.type_name, TypeNode::EnumType(en.cases.clone())));
        }
        Schema::Flags(flags) => {
            return builder.push(named(
                &flags.type_name,
                TypeNode::FlagsType(flags.flags.clone()),
            ));
        }
        Schema::Handle(handle) => {
            return builder.push(named(
                &handle.type_name,
                TypeNode::HandleType {
                    resource_id: handle.resource_id,
                    mode: handle.mode,
                },
            ));
        }
        composite => return flatten_composite(builder, composite),
    };
    builder.push(unnamed(leaf))
}

fn flatten_composite(
    builder: &mut SlotBuilder<NamedTypeNode>,
    schema: &Schema,
) -> Result<NodeIndex> {
    let idx = builder.reserve()?;
    let node = match schema {
        Schema::Record(record) => {
            let mut fields = Vec::with_capacity(record.fields.len());
            for field in &record.fields {
                fields.push((field.name.clone(), flatten(builder, &field.schema)?));
            }
            named(&record.type_name, TypeNode::RecordType(fields))
        }
        Schema::Variant(variant) => {
            let mut cases = Vec::with_capacity(variant.cases.len());
            for case in &variant.cases {
                let payload = case
                    .payload
                    .as_ref()
                    .map(|p| flatten(builder, p))
                    .transpose()?;
                cases.push((case.name.clone(), payload));
            }
            named(&variant.type_name, TypeNode::VariantType(cases))
        }
        Schema::Tuple(tuple) => {
            let items = tuple
                .items
                .iter()
                .map(|item| flatten(builder, item))
                .collect::<Result<_>>()?;
            named(&tuple.type_name, TypeNode::TupleType(items))
        }
        Schema::List(list) => named(
            &list.type_name,
            TypeNode::ListType(flatten(builder, &list.element)?),
        ),
        Schema::Option(option) => named(
            &option.type_name,
            TypeNode::OptionType(flatten(builder, &option.inner)?),
        ),
        Schema::Result(result) => {
            let ok = result.ok.as_deref().map(|s| flatten(builder, s)).transpose()?;
            let err = result.err.as_deref().map(|s| flatten(builder, s)).transpose()?;
            named(&result.type_name, TypeNode::ResultType { ok, err })
        }
        leaf => {
            return Err(Error::InternalInconsistency(format!(
                "{} is not a composite schema",
                leaf.kind_name()
            )));
        }
    };
    builder.fill(idx, node)?;
    Ok(idx)
}
