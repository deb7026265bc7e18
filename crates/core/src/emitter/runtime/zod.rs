//! Zod validators.

use super::{ObjectField, RefScope, RuntimeBackend, ValidatorSyntax, js_literal, js_object};
use crate::config::RuntimeChoice;
use crate::emitter::ts::TsImport;
use crate::ir::{Literal, PrimitiveKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct Zod;

impl RuntimeBackend for Zod {
    fn choice(&self) -> RuntimeChoice {
        RuntimeChoice::Zod
    }

    fn validator(&self) -> Option<&dyn ValidatorSyntax> {
        Some(self)
    }
}

impl ValidatorSyntax for Zod {
    fn import(&self) -> TsImport {
        TsImport::Named {
            items: vec!["z".into()],
            from: "zod".into(),
        }
    }

    fn primitive(&self, kind: PrimitiveKind, format: Option<&str>) -> String {
        match kind {
            PrimitiveKind::String => match format {
                Some("date-time") => "z.string().datetime()".into(),
                Some("email") => "z.string().email()".into(),
                Some("uuid") => "z.string().uuid()".into(),
                Some("uri" | "url") => "z.string().url()".into(),
                _ => "z.string()".into(),
            },
            PrimitiveKind::Number => "z.number()".into(),
            PrimitiveKind::Integer => "z.number().int()".into(),
            PrimitiveKind::Boolean => "z.boolean()".into(),
            PrimitiveKind::Null => "z.null()".into(),
        }
    }

    fn array(&self, item: String) -> String {
        format!("z.array({item})")
    }

    fn object(&self, fields: Vec<ObjectField>, rest: Option<String>) -> String {
        let values: Vec<String> = fields
            .iter()
            .map(|f| {
                if f.required {
                    f.validator.clone()
                } else {
                    format!("{}.optional()", f.validator)
                }
            })
            .collect();
        let shape = js_object(
            fields
                .iter()
                .zip(&values)
                .map(|(f, v)| (f.key.as_str(), v.as_str())),
        );
        match rest {
            Some(rest) => format!("z.object({shape}).catchall({rest})"),
            None => format!("z.object({shape})"),
        }
    }

    fn record(&self, value: String) -> String {
        format!("z.record({value})")
    }

    fn literal(&self, lit: &Literal) -> String {
        match lit {
            Literal::Null => "z.null()".into(),
            other => format!("z.literal({})", js_literal(other)),
        }
    }

    fn union(&self, members: Vec<String>) -> String {
        format!("z.union([{}])", members.join(", "))
    }

    fn intersection(&self, members: Vec<String>) -> String {
        // z.intersection is binary; fold left.
        let mut iter = members.into_iter();
        let first = iter.next().unwrap_or_else(|| self.unknown());
        iter.fold(first, |acc, next| format!("z.intersection({acc}, {next})"))
    }

    fn reference(&self, name: &str, scope: RefScope) -> String {
        match scope {
            RefScope::Declaration => format!("z.lazy(() => {name})"),
            RefScope::Endpoint => name.to_string(),
        }
    }

    fn unknown(&self) -> String {
        "z.unknown()".into()
    }

    fn never(&self) -> String {
        "z.never()".into()
    }

    fn recursive_annotation(&self, name: &str) -> Option<String> {
        Some(format!("z.ZodType<Schemas.{name}>"))
    }
}
