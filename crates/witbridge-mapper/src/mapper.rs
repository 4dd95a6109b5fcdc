//! Kind-dispatch schema derivation.
//!
//! Every descriptor goes through [`TypeMapper::map_type`]: one handler per descriptor
//! kind, all recursing through the same entry point. Unions resolve in priority order:
//!
//! 1. a cached anonymous shape
//! 2. the built-in `{ tag: "ok" | "err", val }` result
//! 3. string literals only, as an enum
//! 4. a shared literal discriminant, as a custom result (ok/err) or a tagged variant
//! 5. members that are `null`/`undefined`/`void`, stripped and folded into an option
//! 6. anything else, as a plain variant with generated case names

use tracing::{debug, trace};
use witbridge_core::utils::{to_kebab_case, variant_case_name};
use witbridge_core::{
    Case, DescriptorKind, EmptyKind, Error, Field, IntRepr, LiteralValue, Property, Result,
    ResultOrigin, ResultSchema, Schema, TaggedUnion, TypeDescriptor, TypeName, TypedArrayKind,
    VariantSchema,
};

use crate::builtins::{
    UNSTRUCTURED_BINARY, UNSTRUCTURED_TEXT, binary_source, rejection_hint, text_source,
};
use crate::cache::TypeCache;
use crate::config::{CaseNaming, MapperConfig};
use crate::detect::{self, ResultShape, TaggedShape, is_void};
use crate::scope::Scope;

/// Derives interchange schemas from host type descriptors.
///
/// Anonymous unions are memoized in the borrowed [`TypeCache`], so mapping the same
/// anonymous shape from different declarations yields the same schema.
#[derive(Debug)]
pub struct TypeMapper<'c> {
    cache: &'c TypeCache,
    config: MapperConfig,
}

impl<'c> TypeMapper<'c> {
    pub fn new(cache: &'c TypeCache) -> Self {
        Self {
            cache,
            config: MapperConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MapperConfig) -> Self {
        self.config = config;
        self
    }

    pub fn cache(&self) -> &'c TypeCache {
        self.cache
    }

    /// Derive the schema of `descriptor` mapped at `scope`.
    ///
    /// If the scope or the descriptor carries a trailing optional marker, the result is
    /// wrapped in an option tagged [`EmptyKind::OptionalMarker`] unless it already is
    /// an option.
    pub fn map_type(&self, descriptor: &TypeDescriptor, scope: &Scope) -> Result<Schema> {
        Derivation {
            mapper: self,
            stack: Vec::new(),
        }
        .map(descriptor, scope)
    }

    /// Derive one schema per parameter of a method, in declaration order.
    pub fn map_parameters(&self, method_name: &str, params: &[Property]) -> Result<Vec<Field>> {
        params
            .iter()
            .map(|param| {
                let scope = Scope::method(method_name, &param.name, param.optional);
                Ok(Field {
                    name: param.name.clone(),
                    schema: self.map_type(&param.ty, &scope)?,
                })
            })
            .collect()
    }
}

/// State of one `map_type` call.
struct Derivation<'m, 'c> {
    mapper: &'m TypeMapper<'c>,
    /// Names of the object, interface and union descriptors currently being mapped.
    stack: Vec<String>,
}

impl Derivation<'_, '_> {
    fn map(&mut self, desc: &TypeDescriptor, scope: &Scope) -> Result<Schema> {
        trace!(
            kind = desc.kind_name(),
            name = desc.name(),
            field = scope.field_name(),
            "mapping descriptor"
        );
        let optional = scope.is_optional() || desc.optional;

        let entered = self.enter(desc, scope)?;
        let schema = self.dispatch(desc, scope, optional);
        if entered {
            self.stack.pop();
        }
        let schema = schema?;

        if optional && !schema.is_option() {
            return Ok(Schema::option(schema, EmptyKind::OptionalMarker));
        }
        Ok(schema)
    }

    /// Reject opaque built-ins and self-references; push named composites.
    fn enter(&mut self, desc: &TypeDescriptor, scope: &Scope) -> Result<bool> {
        let Some(name) = desc.name() else {
            return Ok(false);
        };
        let composite = matches!(
            desc.kind,
            DescriptorKind::Object { .. }
                | DescriptorKind::Interface { .. }
                | DescriptorKind::Union { .. }
        );
        if !composite && !matches!(desc.kind, DescriptorKind::Class | DescriptorKind::Other) {
            return Ok(false);
        }
        // Built-ins are opaque; a declared interface may reuse their names.
        if !composite && let Some(hint) = rejection_hint(name) {
            return Err(unsupported(desc, scope, hint));
        }
        if self.stack.iter().any(|n| n == name) {
            return Err(Error::RecursiveTypeRejected {
                name: name.to_owned(),
                context: scope.context(),
            });
        }
        if composite {
            self.stack.push(name.to_owned());
        }
        Ok(composite)
    }

    fn dispatch(&mut self, desc: &TypeDescriptor, scope: &Scope, optional: bool) -> Result<Schema> {
        let nested = scope.nested();
        match &desc.kind {
            DescriptorKind::Boolean => Ok(Schema::Bool),
            DescriptorKind::Number => Ok(Schema::F64),
            DescriptorKind::String => Ok(Schema::Str),
            DescriptorKind::BigInt => Ok(Schema::S64 {
                repr: IntRepr::BigInt,
            }),
            DescriptorKind::Null => Ok(Schema::unit(EmptyKind::Null)),
            DescriptorKind::Undefined => Ok(Schema::unit(EmptyKind::Undefined)),
            DescriptorKind::Void => Ok(Schema::unit(EmptyKind::Void)),
            DescriptorKind::Array { element } => {
                match desc.name().and_then(TypedArrayKind::from_type_name) {
                    Some(kind) => Ok(Schema::typed_list(kind)),
                    None => Ok(Schema::list(self.map(element, &nested)?)),
                }
            }
            DescriptorKind::Tuple { elements } if elements.is_empty() => {
                Ok(Schema::unit(EmptyKind::Void))
            }
            DescriptorKind::Tuple { elements } => {
                let items = elements
                    .iter()
                    .map(|e| self.map(e, &nested))
                    .collect::<Result<_>>()?;
                Ok(Schema::tuple(items))
            }
            DescriptorKind::Union { members } => self.map_union(desc, members, scope, optional),
            DescriptorKind::Object { properties } | DescriptorKind::Interface { properties } => {
                self.map_object(desc, properties, scope)
            }
            DescriptorKind::Class => Err(unsupported(
                desc,
                scope,
                "classes are nominal; describe the shape with an interface",
            )),
            DescriptorKind::Promise { inner } => self.map(inner, &nested),
            DescriptorKind::Map { key, value } => {
                let key = self.map(key, &nested)?;
                let value = self.map(value, &nested)?;
                Ok(Schema::map(key, value))
            }
            DescriptorKind::Literal { value } => self.map_literal(desc, value, scope),
            DescriptorKind::Alias { .. } => Err(unsupported(
                desc,
                scope,
                "type aliases must be resolved before mapping; inline the aliased type",
            )),
            DescriptorKind::Unresolved { .. } => Err(unsupported(
                desc,
                scope,
                "the type could not be resolved; check that it is exported",
            )),
            DescriptorKind::Other => self.map_other(desc, scope),
        }
    }

    fn type_name(&self, desc: &TypeDescriptor) -> TypeName {
        match desc.name() {
            Some(name) => TypeName {
                name: Some(to_kebab_case(name)),
                owner: self.mapper.config.owner.clone(),
            },
            None => TypeName::anonymous(),
        }
    }

    fn map_object(
        &mut self,
        desc: &TypeDescriptor,
        properties: &[Property],
        scope: &Scope,
    ) -> Result<Schema> {
        if properties.is_empty() {
            return Err(unsupported(
                desc,
                scope,
                "objects without fields have no interchange shape; add at least one field",
            ));
        }
        let owner = enclosing_name(desc, scope);
        let interface = matches!(desc.kind, DescriptorKind::Interface { .. });
        let mut fields = Vec::with_capacity(properties.len());
        for prop in properties {
            let field_scope = if interface {
                Scope::interface(owner, &prop.name, prop.optional)
            } else {
                Scope::object(owner, &prop.name, prop.optional)
            };
            fields.push(Field {
                name: prop.name.clone(),
                schema: self.map(&prop.ty, &field_scope)?,
            });
        }
        Ok(Schema::record(self.type_name(desc), fields))
    }

    fn map_literal(
        &mut self,
        desc: &TypeDescriptor,
        value: &LiteralValue,
        scope: &Scope,
    ) -> Result<Schema> {
        match value {
            LiteralValue::Boolean(_) => Ok(Schema::Bool),
            LiteralValue::String(s) => Ok(Schema::enumeration(
                self.type_name(desc),
                vec![s.clone()],
            )),
            LiteralValue::Number(_) | LiteralValue::BigInt(_) => Err(unsupported(
                desc,
                scope,
                "numeric literal types are not supported; use `number` or `bigint`",
            )),
        }
    }

    fn map_other(&mut self, desc: &TypeDescriptor, scope: &Scope) -> Result<Schema> {
        let Some(name) = desc.name() else {
            return Err(unsupported(desc, scope, "opaque types need a name"));
        };
        if name == UNSTRUCTURED_TEXT {
            return Ok(text_source());
        }
        if name == UNSTRUCTURED_BINARY {
            return Ok(binary_source());
        }
        if let Some(kind) = TypedArrayKind::from_type_name(name) {
            return Ok(Schema::typed_list(kind));
        }
        Err(unsupported(
            desc,
            scope,
            "declare the type as an interface or type literal",
        ))
    }

    fn map_union(
        &mut self,
        desc: &TypeDescriptor,
        members: &[TypeDescriptor],
        scope: &Scope,
        optional: bool,
    ) -> Result<Schema> {
        let mapper = self.mapper;
        let (cache, config) = (mapper.cache, &mapper.config);
        let anonymous = desc.name().is_none();
        if anonymous && let Some(schema) = cache.get(desc, optional, config) {
            debug!(union = %desc, "anonymous type cache hit");
            return Ok(schema);
        }

        let schema = self.derive_union(desc, members, scope, optional)?;
        if anonymous {
            debug!(union = %desc, schema = %schema, "anonymous type cached");
            return Ok(cache.insert(desc, optional, config, schema));
        }
        Ok(schema)
    }

    fn derive_union(
        &mut self,
        desc: &TypeDescriptor,
        members: &[TypeDescriptor],
        scope: &Scope,
        optional: bool,
    ) -> Result<Schema> {
        let tagged = detect::tagged_shape(members);
        let result = tagged.as_ref().and_then(TaggedShape::as_result);

        if let Some(result) = result.as_ref().filter(|r| r.is_inbuilt()) {
            return self.result_schema(desc, result, ResultOrigin::Inbuilt, scope);
        }
        if let Some(cases) = detect::literal_cases(members) {
            return Ok(Schema::enumeration(self.type_name(desc), cases));
        }
        if let Some(result) = result {
            let origin = ResultOrigin::Custom {
                discriminant: result.discriminant.to_owned(),
                ok_field: result.ok_field(),
                err_field: result.err_field(),
            };
            return self.result_schema(desc, &result, origin, scope);
        }
        if let Some(shape) = tagged {
            return self.tagged_variant(desc, &shape, scope);
        }

        let (empties, rest): (Vec<&TypeDescriptor>, Vec<&TypeDescriptor>) =
            members.iter().partition(|m| m.is_empty_kind());
        if let Some(kind) = empty_kind(&empties) {
            let nested = scope.nested();
            let inner = match rest.as_slice() {
                [] => {
                    return Err(unsupported(
                        desc,
                        scope,
                        "a union of only null, undefined or void has no interchange shape",
                    ));
                }
                [single] => self.map(single, &nested)?,
                _ => {
                    let remainder: Vec<TypeDescriptor> = rest.iter().copied().cloned().collect();
                    self.derive_union(desc, &remainder, &nested, false)?
                }
            };
            // The scope boundary wraps once, tagged as an optional marker.
            if optional {
                return Ok(inner);
            }
            return Ok(Schema::option(inner, kind));
        }

        self.plain_variant(desc, members, scope)
    }

    fn result_schema(
        &mut self,
        desc: &TypeDescriptor,
        result: &ResultShape<'_>,
        origin: ResultOrigin,
        scope: &Scope,
    ) -> Result<Schema> {
        let owner = enclosing_name(desc, scope);
        let ok = self.payload(owner, result.ok)?;
        let err = self.payload(owner, result.err)?;
        Ok(Schema::Result(ResultSchema {
            type_name: self.type_name(desc),
            ok: ok.map(Box::new),
            err: err.map(Box::new),
            origin,
        }))
    }

    fn tagged_variant(
        &mut self,
        desc: &TypeDescriptor,
        shape: &TaggedShape<'_>,
        scope: &Scope,
    ) -> Result<Schema> {
        let owner = enclosing_name(desc, scope);
        let mut cases = Vec::with_capacity(shape.members.len());
        let mut payload_fields = Vec::with_capacity(shape.members.len());
        for member in &shape.members {
            let payload_prop = member.payload.filter(|p| !is_void(&p.ty));
            cases.push(Case {
                name: member.tag.to_owned(),
                payload: self.payload(owner, payload_prop)?,
            });
            payload_fields.push(payload_prop.map(|p| p.name.clone()));
        }
        Ok(Schema::Variant(VariantSchema {
            type_name: self.type_name(desc),
            cases,
            tagged: Some(TaggedUnion {
                discriminant: shape.discriminant.to_owned(),
                payload_fields,
            }),
        }))
    }

    /// Schema of a tagged member's payload field; `None` for tag-only members.
    fn payload(&mut self, owner: &str, prop: Option<&Property>) -> Result<Option<Schema>> {
        let Some(prop) = prop.filter(|p| !is_void(&p.ty)) else {
            return Ok(None);
        };
        let scope = Scope::object(owner, &prop.name, prop.optional);
        self.map(&prop.ty, &scope).map(Some)
    }

    fn plain_variant(
        &mut self,
        desc: &TypeDescriptor,
        members: &[TypeDescriptor],
        scope: &Scope,
    ) -> Result<Schema> {
        if members.iter().all(is_boolean_like) {
            return Ok(Schema::Bool);
        }
        let nested = scope.nested();
        let mut cases: Vec<Case> = Vec::with_capacity(members.len());
        let mut has_bool_case = false;
        for member in members {
            let payload = if is_boolean_like(member) {
                if has_bool_case {
                    continue;
                }
                has_bool_case = true;
                Schema::Bool
            } else {
                self.map(member, &nested)?
            };
            cases.push(Case {
                name: self.case_name(desc, cases.len()),
                payload: Some(payload),
            });
        }
        Ok(Schema::variant(self.type_name(desc), cases))
    }

    fn case_name(&self, desc: &TypeDescriptor, index: usize) -> String {
        match self.mapper.config.case_naming {
            CaseNaming::FromUnionName => variant_case_name(desc.name(), index),
            CaseNaming::Ordinal => variant_case_name(None, index),
        }
    }
}

fn unsupported(desc: &TypeDescriptor, scope: &Scope, hint: &str) -> Error {
    Error::UnsupportedType {
        ty: desc.to_string(),
        hint: hint.to_owned(),
        context: scope.context(),
    }
}

fn enclosing_name<'a>(desc: &'a TypeDescriptor, scope: &'a Scope) -> &'a str {
    desc.name().or(scope.scope_name()).unwrap_or("object")
}

fn is_boolean_like(desc: &TypeDescriptor) -> bool {
    matches!(
        desc.kind,
        DescriptorKind::Boolean
            | DescriptorKind::Literal {
                value: LiteralValue::Boolean(_)
            }
    )
}

/// Which empty shape a union's option replaces. `undefined` wins over `null`, which
/// wins over `void`.
fn empty_kind(empties: &[&TypeDescriptor]) -> Option<EmptyKind> {
    let has = |kind: fn(&DescriptorKind) -> bool| empties.iter().any(|d| kind(&d.kind));
    if empties.is_empty() {
        None
    } else if has(|k| matches!(k, DescriptorKind::Undefined)) {
        Some(EmptyKind::Undefined)
    } else if has(|k| matches!(k, DescriptorKind::Null)) {
        Some(EmptyKind::Null)
    } else {
        Some(EmptyKind::Void)
    }
}
