//! Schema mapper: OpenAPI schema objects -> [`TypeDescriptor`] trees.
//!
//! All state of one mapping run lives in [`MapContext`]: the table being
//! built, the name registry, the in-progress resolution chain, and the
//! diagnostics. A `$ref` may be any local JSON pointer; its target is mapped
//! at most once under the pointer itself, and a `$ref` to a key already on
//! the chain returns a reference immediately, which bounds recursion by the
//! number of distinct targets.

use std::borrow::Cow;

use indexmap::{IndexMap, IndexSet};
use tracing::warn;

use super::api::Diagnostic;
use super::resolver::NameRegistry;
use super::types::{
    Additional, Literal, PrimitiveKind, Property, TypeDescriptor, TypeTable, UnionKind,
};
use super::utils::sanitize_type_name;
use crate::spec::{
    AdditionalProperties, OpenApiSpec, Schema, SchemaType, component_name, decode_pointer_segment,
    encode_pointer_segment,
};

const SCHEMAS_PREFIX: &str = "#/components/schemas/";

/// Mapping state exclusively owned by one generation run.
#[derive(Debug)]
pub struct MapContext<'a> {
    doc: &'a OpenApiSpec,
    table: TypeTable,
    names: NameRegistry,
    /// Component keys whose mapping has started, innermost last.
    chain: Vec<String>,
    mapped: IndexSet<String>,
    diagnostics: Vec<Diagnostic>,
}

/// Table key of a named component schema.
pub fn component_key(name: &str) -> String {
    format!("{SCHEMAS_PREFIX}{}", encode_pointer_segment(name))
}

impl<'a> MapContext<'a> {
    /// Create a context and register every component schema name in
    /// document order, so identifier suffixes follow the document.
    pub fn new(doc: &'a OpenApiSpec) -> Self {
        let mut names = NameRegistry::for_schemas();
        let mut table = TypeTable::new();
        if let Some(components) = &doc.components {
            for name in components.schemas.keys() {
                let key = component_key(name);
                let ident = names.resolve(&key);
                // Placeholder keeps document order; filled in when mapped.
                table.insert(key, ident, TypeDescriptor::Unknown);
            }
        }
        Self {
            doc,
            table,
            names,
            chain: Vec::new(),
            mapped: IndexSet::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn document(&self) -> &'a OpenApiSpec {
        self.doc
    }

    /// Map every component schema, in document order.
    pub fn map_components(&mut self) {
        let doc = self.doc;
        if let Some(components) = &doc.components {
            for name in components.schemas.keys() {
                self.map_ref(&component_key(name));
            }
        }
    }

    /// Map one schema node found at `pointer`.
    pub fn map(&mut self, schema: &Schema, pointer: &str) -> TypeDescriptor {
        if let Some(ref_path) = &schema.ref_path {
            return self.map_ref(ref_path);
        }
        let ty = self.map_shape(schema, pointer);
        if schema.nullable == Some(true) {
            with_null(ty)
        } else {
            ty
        }
    }

    /// Store an inline descriptor under a synthesized key and return a
    /// reference to it.
    pub fn hoist(&mut self, key: &str, base_name: &str, ty: TypeDescriptor) -> TypeDescriptor {
        let name = self.names.resolve_as(key, &sanitize_type_name(base_name));
        self.table.insert(key.to_string(), name.clone(), ty);
        self.mapped.insert(key.to_string());
        TypeDescriptor::Reference {
            key: key.to_string(),
            name,
        }
    }

    /// Reference to an entry already stored under `key`, if any.
    pub fn hoisted(&self, key: &str) -> Option<TypeDescriptor> {
        if !self.mapped.contains(key) {
            return None;
        }
        self.table.get(key).map(|entry| TypeDescriptor::Reference {
            key: entry.key.clone(),
            name: entry.name.clone(),
        })
    }

    /// Record a node that could not be mapped precisely.
    pub fn degrade(&mut self, pointer: &str, reason: impl Into<String>) -> TypeDescriptor {
        self.report(pointer, reason);
        TypeDescriptor::Unknown
    }

    /// Record a degradation that does not produce a descriptor.
    pub fn report(&mut self, pointer: &str, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(pointer, reason = %reason, "Degraded mapping.");
        self.diagnostics.push(Diagnostic {
            pointer: pointer.to_string(),
            reason,
        });
    }

    /// Finalize the table (cycle flags) and hand back what was accumulated.
    pub fn finish(mut self) -> (TypeTable, Vec<Diagnostic>) {
        self.table.mark_recursive();
        (self.table, self.diagnostics)
    }

    fn map_ref(&mut self, ref_path: &str) -> TypeDescriptor {
        let doc = self.doc;
        let (key, target) = match component_name(ref_path, "schemas") {
            Some(raw_name) => {
                let name = decode_pointer_segment(raw_name);
                (
                    component_key(&name),
                    doc.component_schema(&name).map(Cow::Borrowed),
                )
            }
            // Any other local pointer is keyed by itself.
            None => (ref_path.to_string(), doc.lookup::<Schema>(ref_path).map(Cow::Owned)),
        };

        if self.mapped.contains(&key) || self.chain.contains(&key) {
            return TypeDescriptor::Reference {
                name: self.names.resolve(&key),
                key,
            };
        }
        let Some(target) = target else {
            // Dangling; left for the emitter to report.
            let last = key.rsplit('/').next().unwrap_or(&key);
            let name = sanitize_type_name(&decode_pointer_segment(last));
            return TypeDescriptor::Reference { key, name };
        };
        let ident = self.names.resolve(&key);
        let reference = TypeDescriptor::Reference {
            key: key.clone(),
            name: ident.clone(),
        };

        self.chain.push(key.clone());
        let ty = self.map(&target, &key);
        self.chain.pop();

        self.table.insert(key.clone(), ident, ty);
        self.mapped.insert(key);
        reference
    }

    fn map_shape(&mut self, schema: &Schema, pointer: &str) -> TypeDescriptor {
        if let Some(value) = &schema.const_value {
            return match Literal::from_json(value) {
                Some(lit) => TypeDescriptor::Enum(vec![lit]),
                None => self.degrade(pointer, "non-scalar const"),
            };
        }

        if let Some(all_of) = &schema.all_of {
            let mut members = self.map_members(all_of, pointer, "allOf");
            if schema.properties.is_some() {
                members.push(self.map_object(schema, pointer));
            }
            return match members.len() {
                0 => self.degrade(pointer, "empty allOf"),
                1 => members.remove(0),
                _ => TypeDescriptor::Intersection(members),
            };
        }

        for (keyword, kind, list) in [
            ("oneOf", UnionKind::OneOf, &schema.one_of),
            ("anyOf", UnionKind::AnyOf, &schema.any_of),
        ] {
            if let Some(list) = list {
                let mut members = self.map_members(list, pointer, keyword);
                return match members.len() {
                    0 => self.degrade(pointer, format!("empty {keyword}")),
                    1 => members.remove(0),
                    _ => TypeDescriptor::Union { kind, members },
                };
            }
        }

        if let Some(values) = &schema.enum_values {
            return self.map_enum(values, pointer);
        }

        match &schema.schema_type {
            Some(SchemaType::Single(t)) => self.map_type(t, schema, pointer),
            Some(SchemaType::Multiple(types)) => {
                let mut members: Vec<TypeDescriptor> = Vec::new();
                for t in types {
                    let ty = self.map_type(t, schema, pointer);
                    if !members.contains(&ty) {
                        members.push(ty);
                    }
                }
                match members.len() {
                    0 => self.degrade(pointer, "empty type list"),
                    1 => members.remove(0),
                    _ => TypeDescriptor::Union {
                        kind: UnionKind::AnyOf,
                        members,
                    },
                }
            }
            None if schema.properties.is_some() || schema.additional_properties.is_some() => {
                self.map_object(schema, pointer)
            }
            None if schema.items.is_some() => self.map_type("array", schema, pointer),
            None if schema.not.is_some() => self.degrade(pointer, "`not` is not expressible"),
            None => self.degrade(pointer, "missing type"),
        }
    }

    fn map_members(&mut self, list: &[Schema], pointer: &str, keyword: &str) -> Vec<TypeDescriptor> {
        list.iter()
            .enumerate()
            .map(|(i, member)| self.map(member, &format!("{pointer}/{keyword}/{i}")))
            .collect()
    }

    fn map_enum(&mut self, values: &[serde_json::Value], pointer: &str) -> TypeDescriptor {
        let mut literals = Vec::new();
        for value in values {
            match Literal::from_json(value) {
                Some(lit) if !literals.contains(&lit) => literals.push(lit),
                Some(_) => {}
                None => {
                    self.degrade(&format!("{pointer}/enum"), "non-scalar enum member skipped");
                }
            }
        }
        if literals.is_empty() {
            return self.degrade(pointer, "enum without scalar values");
        }
        TypeDescriptor::Enum(literals)
    }

    fn map_type(&mut self, t: &str, schema: &Schema, pointer: &str) -> TypeDescriptor {
        let kind = match t {
            "string" => PrimitiveKind::String,
            "number" => PrimitiveKind::Number,
            "integer" => PrimitiveKind::Integer,
            "boolean" => PrimitiveKind::Boolean,
            "null" => PrimitiveKind::Null,
            "array" => {
                let item = match &schema.items {
                    Some(items) => self.map(items, &format!("{pointer}/items")),
                    None => TypeDescriptor::Unknown,
                };
                return TypeDescriptor::Array(Box::new(item));
            }
            "object" => return self.map_object(schema, pointer),
            other => return self.degrade(pointer, format!("unsupported type '{other}'")),
        };
        TypeDescriptor::Primitive {
            kind,
            format: schema.format.clone(),
        }
    }

    fn map_object(&mut self, schema: &Schema, pointer: &str) -> TypeDescriptor {
        let required: IndexSet<&str> = schema
            .required
            .iter()
            .flatten()
            .map(String::as_str)
            .collect();

        let mut properties = IndexMap::new();
        if let Some(props) = &schema.properties {
            for (name, prop) in props {
                let prop_pointer = format!("{pointer}/properties/{}", encode_pointer_segment(name));
                let ty = self.map(prop, &prop_pointer);
                properties.insert(
                    name.clone(),
                    Property {
                        ty,
                        required: required.contains(name.as_str()),
                    },
                );
            }
        }

        let additional = match &schema.additional_properties {
            Some(AdditionalProperties::Bool(false)) => Additional::Closed,
            Some(AdditionalProperties::Bool(true)) => {
                Additional::Open(Box::new(TypeDescriptor::Unknown))
            }
            Some(AdditionalProperties::Schema(value)) => Additional::Open(Box::new(
                self.map(value, &format!("{pointer}/additionalProperties")),
            )),
            None if properties.is_empty() => Additional::Open(Box::new(TypeDescriptor::Unknown)),
            None => Additional::Closed,
        };

        TypeDescriptor::Object {
            properties,
            additional,
        }
    }
}

/// `T | null`, without duplicating an existing null member.
fn with_null(ty: TypeDescriptor) -> TypeDescriptor {
    let null = TypeDescriptor::primitive(PrimitiveKind::Null);
    match ty {
        TypeDescriptor::Unknown => TypeDescriptor::Unknown,
        TypeDescriptor::Union { kind, mut members } => {
            if !members.contains(&null) {
                members.push(null);
            }
            TypeDescriptor::Union { kind, members }
        }
        TypeDescriptor::Enum(mut literals) => {
            if !literals.contains(&Literal::Null) {
                literals.push(Literal::Null);
            }
            TypeDescriptor::Enum(literals)
        }
        other if other == null => other,
        other => TypeDescriptor::Union {
            kind: UnionKind::AnyOf,
            members: vec![other, null],
        },
    }
}
