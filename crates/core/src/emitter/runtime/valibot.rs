//! Valibot validators.

use super::{ObjectField, RefScope, RuntimeBackend, ValidatorSyntax, js_literal, js_object};
use crate::config::RuntimeChoice;
use crate::emitter::ts::TsImport;
use crate::ir::{Literal, PrimitiveKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct Valibot;

impl RuntimeBackend for Valibot {
    fn choice(&self) -> RuntimeChoice {
        RuntimeChoice::Valibot
    }

    fn validator(&self) -> Option<&dyn ValidatorSyntax> {
        Some(self)
    }
}

impl ValidatorSyntax for Valibot {
    fn import(&self) -> TsImport {
        TsImport::Namespace {
            alias: "v".into(),
            from: "valibot".into(),
        }
    }

    fn primitive(&self, kind: PrimitiveKind, format: Option<&str>) -> String {
        match kind {
            PrimitiveKind::String => {
                let action = match format {
                    Some("date-time") => "v.isoTimestamp()",
                    Some("date") => "v.isoDate()",
                    Some("email") => "v.email()",
                    Some("uuid") => "v.uuid()",
                    Some("uri" | "url") => "v.url()",
                    _ => return "v.string()".into(),
                };
                format!("v.pipe(v.string(), {action})")
            }
            PrimitiveKind::Number => "v.number()".into(),
            PrimitiveKind::Integer => "v.pipe(v.number(), v.integer())".into(),
            PrimitiveKind::Boolean => "v.boolean()".into(),
            PrimitiveKind::Null => "v.null()".into(),
        }
    }

    fn array(&self, item: String) -> String {
        format!("v.array({item})")
    }

    fn object(&self, fields: Vec<ObjectField>, rest: Option<String>) -> String {
        let values: Vec<String> = fields
            .iter()
            .map(|f| {
                if f.required {
                    f.validator.clone()
                } else {
                    format!("v.optional({})", f.validator)
                }
            })
            .collect();
        let entries = js_object(
            fields
                .iter()
                .zip(&values)
                .map(|(f, v)| (f.key.as_str(), v.as_str())),
        );
        match rest {
            Some(rest) => format!("v.objectWithRest({entries}, {rest})"),
            None => format!("v.object({entries})"),
        }
    }

    fn record(&self, value: String) -> String {
        format!("v.record(v.string(), {value})")
    }

    fn literal(&self, lit: &Literal) -> String {
        match lit {
            Literal::Null => "v.null()".into(),
            other => format!("v.literal({})", js_literal(other)),
        }
    }

    fn union(&self, members: Vec<String>) -> String {
        format!("v.union([{}])", members.join(", "))
    }

    fn intersection(&self, members: Vec<String>) -> String {
        format!("v.intersect([{}])", members.join(", "))
    }

    fn reference(&self, name: &str, scope: RefScope) -> String {
        match scope {
            RefScope::Declaration => format!("v.lazy(() => {name})"),
            RefScope::Endpoint => name.to_string(),
        }
    }

    fn unknown(&self) -> String {
        "v.unknown()".into()
    }

    fn never(&self) -> String {
        "v.never()".into()
    }

    fn recursive_annotation(&self, name: &str) -> Option<String> {
        Some(format!("v.GenericSchema<Schemas.{name}>"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::runtime::render_validator;
    use crate::ir::{Additional, Property, TypeDescriptor, UnionKind};
    use indexmap::IndexMap;

    #[test]
    fn test_object_and_rest() {
        let mut properties = IndexMap::new();
        properties.insert(
            "name".to_string(),
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
            render_validator(&Valibot, &closed, RefScope::Declaration),
            "v.object({ name: v.optional(v.string()) })"
        );
        let open = TypeDescriptor::Object {
            properties,
            additional: Additional::Open(Box::new(TypeDescriptor::Unknown)),
        };
        assert_eq!(
            render_validator(&Valibot, &open, RefScope::Declaration),
            "v.objectWithRest({ name: v.optional(v.string()) }, v.unknown())"
        );
        assert_eq!(
            render_validator(&Valibot, &TypeDescriptor::open_object(), RefScope::Declaration),
            "v.record(v.string(), v.unknown())"
        );
    }

    #[test]
    fn test_pipes() {
        assert_eq!(
            Valibot.primitive(PrimitiveKind::Integer, None),
            "v.pipe(v.number(), v.integer())"
        );
        assert_eq!(
            Valibot.primitive(PrimitiveKind::String, Some("email")),
            "v.pipe(v.string(), v.email())"
        );
    }

    #[test]
    fn test_union_of_reference_and_null() {
        let ty = TypeDescriptor::Union {
            kind: UnionKind::AnyOf,
            members: vec![
                TypeDescriptor::Reference {
                    key: "#/components/schemas/Pet".into(),
                    name: "Pet".into(),
                },
                TypeDescriptor::primitive(PrimitiveKind::Null),
            ],
        };
        assert_eq!(
            render_validator(&Valibot, &ty, RefScope::Declaration),
            "v.union([v.lazy(() => Pet), v.null()])"
        );
    }
}
