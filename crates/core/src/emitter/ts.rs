//! TypeScript AST and emission via the Emit trait.
//!
//! Each AST node implements `Emit`. Lowering from [`TypeDescriptor`] lives
//! here as well, so the type side of every backend renders identically.

use crate::ir::utils::{escape_js_string, quote_if_needed};
use crate::ir::{Additional, Literal, PrimitiveKind, TypeDescriptor};

/// Namespace holding every schema type.
pub const SCHEMAS_NAMESPACE: &str = "Schemas";

/// Trait for emitting TypeScript code from AST nodes.
pub trait Emit {
    /// Convert the AST node to its TypeScript string representation.
    fn emit(&self) -> String;
}

/// TypeScript primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsPrimitive {
    String,
    Number,
    Boolean,
    Null,
    Undefined,
    Unknown,
    Never,
}

/// TypeScript literal values
#[derive(Debug, Clone, PartialEq)]
pub enum TsLiteral {
    String(String),
    Number(f64),
    Int(i64),
    Bool(bool),
    Null,
}

/// TypeScript type expressions
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    Primitive(TsPrimitive),
    Literal(TsLiteral),
    Array(Box<TsType>),
    /// Object literal type `{ a: T; b?: U }`
    Object(Vec<TsProp>),
    /// `Record<string, T>`
    Record(Box<TsType>),
    Union(Vec<TsType>),
    Intersection(Vec<TsType>),
    /// Named type, already qualified (`Schemas.Pet`, `Endpoints.get_Pets`)
    Ref(String),
}

/// Property in an object type
#[derive(Debug, Clone, PartialEq)]
pub struct TsProp {
    pub name: String,
    pub ty: TsType,
    pub optional: bool,
}

/// `export type Name = ...;`
#[derive(Debug, Clone, PartialEq)]
pub struct TsTypeDef {
    pub name: String,
    pub ty: TsType,
}

/// `export const Name: Annotation = init;`
#[derive(Debug, Clone, PartialEq)]
pub struct TsConst {
    pub name: String,
    pub annotation: Option<String>,
    /// Already rendered initializer expression
    pub init: String,
}

/// `export namespace Name { ... }` holding type aliases only
#[derive(Debug, Clone, PartialEq)]
pub struct TsNamespace {
    pub name: String,
    pub types: Vec<TsTypeDef>,
}

/// Import statement
#[derive(Debug, Clone, PartialEq)]
pub enum TsImport {
    /// `import { a, b } from "m";`
    Named { items: Vec<String>, from: String },
    /// `import * as alias from "m";`
    Namespace { alias: String, from: String },
}

/// Top-level item of the generated file
#[derive(Debug, Clone, PartialEq)]
pub enum TsItem {
    Namespace(TsNamespace),
    Type(TsTypeDef),
    Const(TsConst),
    /// Pre-rendered block emitted as-is
    Raw(String),
}

/// A complete TypeScript module
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TsModule {
    pub imports: Vec<TsImport>,
    pub items: Vec<TsItem>,
}

// =============================================================================
// Lowering
// =============================================================================

impl From<&Literal> for TsLiteral {
    fn from(lit: &Literal) -> Self {
        match lit {
            Literal::String(s) => TsLiteral::String(s.clone()),
            Literal::Int(i) => TsLiteral::Int(*i),
            Literal::Number(n) => TsLiteral::Number(*n),
            Literal::Bool(b) => TsLiteral::Bool(*b),
            Literal::Null => TsLiteral::Null,
        }
    }
}

impl From<&TypeDescriptor> for TsType {
    fn from(ty: &TypeDescriptor) -> Self {
        match ty {
            TypeDescriptor::Primitive { kind, .. } => TsType::Primitive(match kind {
                PrimitiveKind::String => TsPrimitive::String,
                PrimitiveKind::Number | PrimitiveKind::Integer => TsPrimitive::Number,
                PrimitiveKind::Boolean => TsPrimitive::Boolean,
                PrimitiveKind::Null => TsPrimitive::Null,
            }),
            TypeDescriptor::Array(item) => TsType::Array(Box::new(item.as_ref().into())),
            TypeDescriptor::Object {
                properties,
                additional,
            } => {
                let props: Vec<TsProp> = properties
                    .iter()
                    .map(|(name, prop)| {
                        let ty = TsType::from(&prop.ty);
                        TsProp {
                            name: name.clone(),
                            ty: if prop.required {
                                ty
                            } else {
                                TsType::Union(vec![ty, TsType::Primitive(TsPrimitive::Undefined)])
                            },
                            optional: !prop.required,
                        }
                    })
                    .collect();
                match additional {
                    Additional::Closed if props.is_empty() => {
                        TsType::Record(Box::new(TsType::Primitive(TsPrimitive::Never)))
                    }
                    Additional::Closed => TsType::Object(props),
                    Additional::Open(value) if props.is_empty() => {
                        TsType::Record(Box::new(value.as_ref().into()))
                    }
                    Additional::Open(value) => TsType::Intersection(vec![
                        TsType::Object(props),
                        TsType::Record(Box::new(value.as_ref().into())),
                    ]),
                }
            }
            TypeDescriptor::Enum(literals) => {
                let mut members: Vec<TsType> = literals
                    .iter()
                    .map(|lit| TsType::Literal(lit.into()))
                    .collect();
                if members.len() == 1 {
                    members.remove(0)
                } else {
                    TsType::Union(members)
                }
            }
            TypeDescriptor::Union { members, .. } => collapse(members, TsType::Union),
            TypeDescriptor::Intersection(members) => collapse(members, TsType::Intersection),
            TypeDescriptor::Reference { name, .. } => {
                TsType::Ref(format!("{SCHEMAS_NAMESPACE}.{name}"))
            }
            TypeDescriptor::Unknown => TsType::Primitive(TsPrimitive::Unknown),
        }
    }
}

/// Single members collapse; an empty composition has no constraint.
fn collapse(members: &[TypeDescriptor], wrap: fn(Vec<TsType>) -> TsType) -> TsType {
    let mut lowered: Vec<TsType> = members.iter().map(TsType::from).collect();
    match lowered.len() {
        0 => TsType::Primitive(TsPrimitive::Unknown),
        1 => lowered.remove(0),
        _ => wrap(lowered),
    }
}

// =============================================================================
// Primitive Types
// =============================================================================

impl Emit for TsPrimitive {
    fn emit(&self) -> String {
        match self {
            TsPrimitive::String => "string".to_string(),
            TsPrimitive::Number => "number".to_string(),
            TsPrimitive::Boolean => "boolean".to_string(),
            TsPrimitive::Null => "null".to_string(),
            TsPrimitive::Undefined => "undefined".to_string(),
            TsPrimitive::Unknown => "unknown".to_string(),
            TsPrimitive::Never => "never".to_string(),
        }
    }
}

impl Emit for TsLiteral {
    fn emit(&self) -> String {
        match self {
            TsLiteral::String(s) => format!("\"{}\"", escape_js_string(s)),
            TsLiteral::Number(n) => n.to_string(),
            TsLiteral::Int(i) => i.to_string(),
            TsLiteral::Bool(b) => b.to_string(),
            TsLiteral::Null => "null".to_string(),
        }
    }
}

// =============================================================================
// Types
// =============================================================================

impl Emit for TsType {
    fn emit(&self) -> String {
        match self {
            TsType::Primitive(p) => p.emit(),
            TsType::Literal(lit) => lit.emit(),
            TsType::Array(inner) => {
                let inner_str = inner.emit();
                // Complex element types use the generic form
                if matches!(**inner, TsType::Union(_) | TsType::Intersection(_)) {
                    format!("Array<{}>", inner_str)
                } else {
                    format!("{}[]", inner_str)
                }
            }
            TsType::Object(props) => {
                if props.is_empty() {
                    "{}".to_string()
                } else {
                    let parts: Vec<_> = props.iter().map(|p| p.emit()).collect();
                    format!("{{ {} }}", parts.join("; "))
                }
            }
            TsType::Record(value) => format!("Record<string, {}>", value.emit()),
            TsType::Union(types) => types.iter().map(|t| t.emit()).collect::<Vec<_>>().join(" | "),
            TsType::Intersection(types) => types
                .iter()
                .map(|t| {
                    let s = t.emit();
                    if matches!(t, TsType::Union(_)) {
                        format!("({})", s)
                    } else {
                        s
                    }
                })
                .collect::<Vec<_>>()
                .join(" & "),
            TsType::Ref(name) => name.clone(),
        }
    }
}

impl Emit for TsProp {
    fn emit(&self) -> String {
        let key = quote_if_needed(&self.name);
        let opt = if self.optional { "?" } else { "" };
        format!("{}{}: {}", key, opt, self.ty.emit())
    }
}

// =============================================================================
// Declarations
// =============================================================================

impl TsTypeDef {
    /// Emit with specified indentation level (2 spaces per level). A
    /// top-level object type is spread over several lines.
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = "  ".repeat(indent);
        match &self.ty {
            TsType::Object(props) if !props.is_empty() => {
                let mut output = format!("{}export type {} = {{\n", prefix, self.name);
                for prop in props {
                    output.push_str(&format!("{}  {};\n", prefix, prop.emit()));
                }
                output.push_str(&format!("{}}};\n", prefix));
                output
            }
            ty => format!("{}export type {} = {};\n", prefix, self.name, ty.emit()),
        }
    }
}

impl Emit for TsTypeDef {
    fn emit(&self) -> String {
        self.emit_indented(0)
    }
}

impl Emit for TsConst {
    fn emit(&self) -> String {
        let annotation = self
            .annotation
            .as_ref()
            .map(|a| format!(": {}", a))
            .unwrap_or_default();
        format!("export const {}{} = {};\n", self.name, annotation, self.init)
    }
}

impl Emit for TsNamespace {
    fn emit(&self) -> String {
        let mut output = format!("export namespace {} {{\n", self.name);
        output.push_str(&format!("  // <{}>\n", self.name));
        for type_def in &self.types {
            output.push_str(&type_def.emit_indented(1));
        }
        output.push_str(&format!("  // </{}>\n", self.name));
        output.push_str("}\n");
        output
    }
}

// =============================================================================
// Imports
// =============================================================================

impl Emit for TsImport {
    fn emit(&self) -> String {
        match self {
            TsImport::Named { items, from } => {
                format!("import {{ {} }} from \"{}\";\n", items.join(", "), from)
            }
            TsImport::Namespace { alias, from } => {
                format!("import * as {} from \"{}\";\n", alias, from)
            }
        }
    }
}

// =============================================================================
// Module
// =============================================================================

impl Emit for TsItem {
    fn emit(&self) -> String {
        match self {
            TsItem::Namespace(ns) => ns.emit(),
            TsItem::Type(type_def) => type_def.emit(),
            TsItem::Const(constant) => constant.emit(),
            TsItem::Raw(code) => {
                let mut output = code.clone();
                if !output.ends_with('\n') {
                    output.push('\n');
                }
                output
            }
        }
    }
}

impl Emit for TsModule {
    fn emit(&self) -> String {
        let mut output = String::new();

        // Emit imports
        for import in &self.imports {
            output.push_str(&import.emit());
        }
        if !self.imports.is_empty() {
            output.push('\n');
        }

        let items: Vec<String> = self.items.iter().map(|item| item.emit()).collect();
        output.push_str(&items.join("\n"));

        output
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Property, UnionKind};
    use indexmap::IndexMap;

    fn lower(ty: &TypeDescriptor) -> String {
        TsType::from(ty).emit()
    }

    #[test]
    fn test_emit_literal() {
        assert_eq!(TsLiteral::String("hello".into()).emit(), "\"hello\"");
        assert_eq!(TsLiteral::String("say \"hi\"".into()).emit(), "\"say \\\"hi\\\"\"");
        assert_eq!(TsLiteral::Number(2.5).emit(), "2.5");
        assert_eq!(TsLiteral::Int(42).emit(), "42");
        assert_eq!(TsLiteral::Bool(true).emit(), "true");
        assert_eq!(TsLiteral::Null.emit(), "null");
    }

    #[test]
    fn test_lower_object() {
        let mut properties = IndexMap::new();
        properties.insert(
            "id".to_string(),
            Property {
                ty: TypeDescriptor::primitive(PrimitiveKind::Integer),
                required: true,
            },
        );
        properties.insert(
            "pet-tag".to_string(),
            Property {
                ty: TypeDescriptor::string(),
                required: false,
            },
        );
        let closed = TypeDescriptor::Object {
            properties: properties.clone(),
            additional: Additional::Closed,
        };
        assert_eq!(
            lower(&closed),
            "{ id: number; \"pet-tag\"?: string | undefined }"
        );

        let open = TypeDescriptor::Object {
            properties,
            additional: Additional::Open(Box::new(TypeDescriptor::string())),
        };
        assert_eq!(
            lower(&open),
            "{ id: number; \"pet-tag\"?: string | undefined } & Record<string, string>"
        );
        assert_eq!(lower(&TypeDescriptor::open_object()), "Record<string, unknown>");
    }

    #[test]
    fn test_lower_composites() {
        let union = TypeDescriptor::Union {
            kind: UnionKind::OneOf,
            members: vec![
                TypeDescriptor::string(),
                TypeDescriptor::Reference {
                    key: "#/components/schemas/Pet".into(),
                    name: "Pet".into(),
                },
            ],
        };
        assert_eq!(lower(&union), "string | Schemas.Pet");
        assert_eq!(
            lower(&TypeDescriptor::Array(Box::new(union))),
            "Array<string | Schemas.Pet>"
        );
        assert_eq!(
            lower(&TypeDescriptor::Enum(vec![
                Literal::String("a".into()),
                Literal::Int(1)
            ])),
            "\"a\" | 1"
        );
        assert_eq!(lower(&TypeDescriptor::Unknown), "unknown");
    }

    #[test]
    fn test_emit_namespace() {
        let ns = TsNamespace {
            name: "Schemas".into(),
            types: vec![TsTypeDef {
                name: "Pet".into(),
                ty: TsType::Object(vec![TsProp {
                    name: "name".into(),
                    ty: TsType::Primitive(TsPrimitive::String),
                    optional: false,
                }]),
            }],
        };
        assert_eq!(
            ns.emit(),
            "export namespace Schemas {\n  // <Schemas>\n  export type Pet = {\n    name: string;\n  };\n  // </Schemas>\n}\n"
        );
    }

    #[test]
    fn test_emit_imports() {
        let named = TsImport::Named {
            items: vec!["z".into()],
            from: "zod".into(),
        };
        assert_eq!(named.emit(), "import { z } from \"zod\";\n");
        let namespace = TsImport::Namespace {
            alias: "v".into(),
            from: "valibot".into(),
        };
        assert_eq!(namespace.emit(), "import * as v from \"valibot\";\n");
    }

    #[test]
    fn test_emit_const() {
        let constant = TsConst {
            name: "Node".into(),
            annotation: Some("z.ZodType<Schemas.Node>".into()),
            init: "z.unknown()".into(),
        };
        assert_eq!(
            constant.emit(),
            "export const Node: z.ZodType<Schemas.Node> = z.unknown();\n"
        );
    }
}
