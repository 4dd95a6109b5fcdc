//! Union shape detection: literal unions, tagged unions and ok/err results.

use witbridge_core::schema::{INBUILT_RESULT_TAG, INBUILT_RESULT_VALUE};
use witbridge_core::{DescriptorKind, LiteralValue, Property, TypeDescriptor};

/// One member of a tagged union.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedMember<'a> {
    /// Value of the discriminant field.
    pub tag: &'a str,
    /// The member's other field, if any.
    pub payload: Option<&'a Property>,
}

/// A union whose members all share a string-literal discriminant field.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedShape<'a> {
    pub discriminant: &'a str,
    /// Members in declaration order.
    pub members: Vec<TaggedMember<'a>>,
}

/// Which side of a result a tagged member is.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultShape<'a> {
    pub discriminant: &'a str,
    pub ok: Option<&'a Property>,
    pub err: Option<&'a Property>,
}

impl<'a> TaggedShape<'a> {
    /// The two-case `ok`/`err` shape, in either declaration order.
    pub fn as_result(&self) -> Option<ResultShape<'a>> {
        let [first, second] = self.members.as_slice() else {
            return None;
        };
        let (ok, err) = match (first.tag, second.tag) {
            ("ok", "err") => (first, second),
            ("err", "ok") => (second, first),
            _ => return None,
        };
        Some(ResultShape {
            discriminant: self.discriminant,
            ok: ok.payload.filter(|p| !is_void(&p.ty)),
            err: err.payload.filter(|p| !is_void(&p.ty)),
        })
    }
}

impl ResultShape<'_> {
    /// Whether this is the built-in `{ tag, val }` shape.
    pub fn is_inbuilt(&self) -> bool {
        let is_val = |p: Option<&Property>| p.is_none_or(|p| p.name == INBUILT_RESULT_VALUE);
        self.discriminant == INBUILT_RESULT_TAG && is_val(self.ok) && is_val(self.err)
    }

    pub fn ok_field(&self) -> Option<String> {
        self.ok.map(|p| p.name.clone())
    }

    pub fn err_field(&self) -> Option<String> {
        self.err.map(|p| p.name.clone())
    }
}

pub(crate) fn is_void(ty: &TypeDescriptor) -> bool {
    matches!(ty.kind, DescriptorKind::Void)
}

fn string_literal(ty: &TypeDescriptor) -> Option<&str> {
    match &ty.kind {
        DescriptorKind::Literal {
            value: LiteralValue::String(s),
        } => Some(s),
        _ => None,
    }
}

/// Case names of a union made only of string literals.
///
/// Boolean and numeric literals never form an enum.
pub fn literal_cases(members: &[TypeDescriptor]) -> Option<Vec<String>> {
    if members.is_empty() {
        return None;
    }
    let mut cases: Vec<String> = Vec::with_capacity(members.len());
    for member in members {
        let literal = string_literal(member)?;
        if !cases.iter().any(|c| c == literal) {
            cases.push(literal.to_owned());
        }
    }
    Some(cases)
}

/// Detect a union of object shapes sharing a string-literal discriminant field.
///
/// Every member must be object-shaped and carry the discriminant as a required
/// string-literal field with a distinct value, plus at most one other field. The first
/// field of the first member that satisfies this for all members is the discriminant.
pub fn tagged_shape(members: &[TypeDescriptor]) -> Option<TaggedShape<'_>> {
    if members.len() < 2 {
        return None;
    }
    let all_props: Vec<&[Property]> = members
        .iter()
        .map(TypeDescriptor::properties)
        .collect::<Option<_>>()?;

    all_props[0]
        .iter()
        .filter(|p| !p.optional && string_literal(&p.ty).is_some())
        .find_map(|candidate| shape_for(&candidate.name, &all_props))
}

fn shape_for<'a>(discriminant: &'a str, all_props: &[&'a [Property]]) -> Option<TaggedShape<'a>> {
    let mut members: Vec<TaggedMember<'a>> = Vec::with_capacity(all_props.len());
    for props in all_props {
        if props.len() > 2 {
            return None;
        }
        let tag_prop = props.iter().find(|p| p.name == discriminant)?;
        if tag_prop.optional {
            return None;
        }
        let tag = string_literal(&tag_prop.ty)?;
        if members.iter().any(|m| m.tag == tag) {
            return None;
        }
        let payload = props.iter().find(|p| p.name != discriminant);
        members.push(TaggedMember { tag, payload });
    }
    Some(TaggedShape {
        discriminant,
        members,
    })
}
