//! ArkType definitions.
//!
//! Schema validators are plain definitions inside one `scope`, where a
//! string alias such as `"Pet"` resolves forward and cyclic references.
//! The exported scope members are `Type`s; any other standalone definition
//! is wrapped in `type(...)`.

use super::{
    Declaration, ObjectField, RefScope, RuntimeBackend, ValidatorSyntax, js_literal, js_object,
};
use crate::config::RuntimeChoice;
use crate::emitter::ts::{TsConst, TsImport, TsItem};
use crate::ir::utils::quote;
use crate::ir::{Literal, PrimitiveKind};

/// Holds every schema of the generated file.
const MODULE_NAME: &str = "__Schemas";

#[derive(Debug, Clone, Copy, Default)]
pub struct Arktype;

impl RuntimeBackend for Arktype {
    fn choice(&self) -> RuntimeChoice {
        RuntimeChoice::Arktype
    }

    fn validator(&self) -> Option<&dyn ValidatorSyntax> {
        Some(self)
    }
}

/// `[a, "|", b]` tuples, folded left.
fn fold_tuple(members: Vec<String>, operator: &str, empty: String) -> String {
    let mut iter = members.into_iter();
    let first = iter.next().unwrap_or(empty);
    iter.fold(first, |acc, next| format!("[{acc}, \"{operator}\", {next}]"))
}

/// Object key with the optional marker, e.g. `"tag?"`.
fn optional_key(key: &str) -> String {
    match key.strip_prefix('"').and_then(|k| k.strip_suffix('"')) {
        Some(inner) => format!("\"{inner}?\""),
        None => quote(&format!("{key}?")),
    }
}

impl ValidatorSyntax for Arktype {
    fn import(&self) -> TsImport {
        TsImport::Named {
            items: vec!["scope".into(), "type".into()],
            from: "arktype".into(),
        }
    }

    fn primitive(&self, kind: PrimitiveKind, format: Option<&str>) -> String {
        let keyword = match kind {
            PrimitiveKind::String => match format {
                Some("date-time") => "string.date.iso",
                Some("email") => "string.email",
                Some("uuid") => "string.uuid",
                Some("uri" | "url") => "string.url",
                _ => "string",
            },
            PrimitiveKind::Number => "number",
            PrimitiveKind::Integer => "number.integer",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Null => "null",
        };
        quote(keyword)
    }

    fn array(&self, item: String) -> String {
        format!("[{item}, \"[]\"]")
    }

    fn object(&self, fields: Vec<ObjectField>, rest: Option<String>) -> String {
        let mut entries: Vec<(String, String)> = fields
            .into_iter()
            .map(|f| {
                let key = if f.required { f.key } else { optional_key(&f.key) };
                (key, f.validator)
            })
            .collect();
        if let Some(rest) = rest {
            entries.push(("\"[string]\"".into(), rest));
        }
        js_object(entries.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    fn record(&self, value: String) -> String {
        format!("{{ \"[string]\": {value} }}")
    }

    fn literal(&self, lit: &Literal) -> String {
        match lit {
            Literal::Null => quote("null"),
            other => format!("[\"===\", {}]", js_literal(other)),
        }
    }

    fn union(&self, members: Vec<String>) -> String {
        fold_tuple(members, "|", self.unknown())
    }

    fn intersection(&self, members: Vec<String>) -> String {
        fold_tuple(members, "&", self.unknown())
    }

    fn reference(&self, name: &str, scope: RefScope) -> String {
        match scope {
            RefScope::Declaration => quote(name),
            RefScope::Endpoint => name.to_string(),
        }
    }

    fn unknown(&self) -> String {
        quote("unknown")
    }

    fn never(&self) -> String {
        quote("never")
    }

    fn recursive_annotation(&self, _name: &str) -> Option<String> {
        None
    }

    fn standalone(&self, validator: String) -> String {
        format!("type({validator})")
    }

    fn declarations(&self, decls: &[Declaration<'_>]) -> Vec<TsItem> {
        if decls.is_empty() {
            return Vec::new();
        }
        let mut module = format!("const {MODULE_NAME} = scope({{\n");
        for decl in decls {
            module.push_str(&format!("  {}: {},\n", decl.name, decl.validator));
        }
        module.push_str("}).export();\n");

        let mut items = vec![TsItem::Raw(module)];
        items.extend(decls.iter().map(|decl| {
            TsItem::Const(TsConst {
                name: decl.name.to_string(),
                annotation: None,
                init: format!("{MODULE_NAME}.{}", decl.name),
            })
        }));
        items
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::emitter::runtime::render_validator;
    use crate::emitter::ts::Emit;
    use crate::ir::{Additional, Property, TypeDescriptor, UnionKind};
    use indexmap::IndexMap;

    #[test]
    fn test_object_optional_keys_and_index() {
        let mut properties = IndexMap::new();
        properties.insert(
            "next".to_string(),
            Property {
                ty: TypeDescriptor::Reference {
                    key: "#/components/schemas/Node".into(),
                    name: "Node".into(),
                },
                required: false,
            },
        );
        properties.insert(
            "x-id".to_string(),
            Property {
                ty: TypeDescriptor::primitive(PrimitiveKind::Integer),
                required: false,
            },
        );
        properties.insert(
            "tags".to_string(),
            Property {
                ty: TypeDescriptor::Array(Box::new(TypeDescriptor::string())),
                required: true,
            },
        );
        let ty = TypeDescriptor::Object {
            properties,
            additional: Additional::Open(Box::new(TypeDescriptor::string())),
        };
        assert_eq!(
            render_validator(&Arktype, &ty, RefScope::Declaration),
            "{ \"next?\": \"Node\", \"x-id?\": \"number.integer\", tags: [\"string\", \"[]\"], \"[string]\": \"string\" }"
        );
    }

    #[test]
    fn test_union_and_literals_fold() {
        let ty = TypeDescriptor::Union {
            kind: UnionKind::OneOf,
            members: vec![
                TypeDescriptor::Enum(vec![Literal::String("a".into())]),
                TypeDescriptor::primitive(PrimitiveKind::Null),
                TypeDescriptor::Reference {
                    key: "#/components/schemas/Pet".into(),
                    name: "Pet".into(),
                },
            ],
        };
        assert_eq!(
            render_validator(&Arktype, &ty, RefScope::Endpoint),
            "[[[\"===\", \"a\"], \"|\", \"null\"], \"|\", Pet]"
        );
        assert_eq!(Arktype.standalone("\"string\"".into()), "type(\"string\")");
    }

    #[test]
    fn test_declarations_use_scope() {
        let items = Arktype.declarations(&[
            Declaration {
                name: "Node",
                validator: "{ \"next?\": \"Node\" }".into(),
                recursive: true,
            },
            Declaration {
                name: "Id",
                validator: "\"string.uuid\"".into(),
                recursive: false,
            },
        ]);
        let emitted: String = items.iter().map(|item| item.emit()).collect();
        assert_eq!(
            emitted,
            "const __Schemas = scope({\n  Node: { \"next?\": \"Node\" },\n  Id: \"string.uuid\",\n}).export();\nexport const Node = __Schemas.Node;\nexport const Id = __Schemas.Id;\n"
        );
        assert!(Arktype.declarations(&[]).is_empty());
    }
}
