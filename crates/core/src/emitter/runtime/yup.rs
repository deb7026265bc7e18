//! Yup schemas.
//!
//! Yup has no union combinator, so unions validate through a `test` that
//! accepts a value when any member does. Intersections of eager schemas
//! use `concat`; a lazy member falls back to a `test` over every member.

use super::{ObjectField, RefScope, RuntimeBackend, ValidatorSyntax, js_literal, js_object};
use crate::config::RuntimeChoice;
use crate::emitter::ts::TsImport;
use crate::ir::{Literal, PrimitiveKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct Yup;

impl RuntimeBackend for Yup {
    fn choice(&self) -> RuntimeChoice {
        RuntimeChoice::Yup
    }

    fn validator(&self) -> Option<&dyn ValidatorSyntax> {
        Some(self)
    }
}

fn is_lazy(validator: &str) -> bool {
    validator.starts_with("y.lazy(")
}

/// `y.mixed()` narrowed by a predicate over `members`.
fn members_test(name: &str, message: &str, members: &[String], every: bool) -> String {
    let combinator = if every { "every" } else { "some" };
    format!(
        "y.mixed().nullable().test({}, {}, (value) => [{}].{combinator}((member) => member.isValidSync(value)))",
        js_literal(&Literal::String(name.into())),
        js_literal(&Literal::String(message.into())),
        members.join(", ")
    )
}

impl ValidatorSyntax for Yup {
    fn import(&self) -> TsImport {
        TsImport::Namespace {
            alias: "y".into(),
            from: "yup".into(),
        }
    }

    fn primitive(&self, kind: PrimitiveKind, format: Option<&str>) -> String {
        match kind {
            PrimitiveKind::String => match format {
                Some("date-time") => "y.string().datetime()".into(),
                Some("email") => "y.string().email()".into(),
                Some("uuid") => "y.string().uuid()".into(),
                Some("uri" | "url") => "y.string().url()".into(),
                _ => "y.string()".into(),
            },
            PrimitiveKind::Number => "y.number()".into(),
            PrimitiveKind::Integer => "y.number().integer()".into(),
            PrimitiveKind::Boolean => "y.boolean()".into(),
            PrimitiveKind::Null => "y.mixed().nullable().oneOf([null])".into(),
        }
    }

    fn array(&self, item: String) -> String {
        format!("y.array().of({item})")
    }

    fn object(&self, fields: Vec<ObjectField>, _rest: Option<String>) -> String {
        // Undeclared keys pass through yup objects unchecked.
        let values: Vec<String> = fields
            .iter()
            .map(|f| match (f.required, is_lazy(&f.validator)) {
                (true, true) => f.validator.clone(),
                (true, false) => format!("{}.defined()", f.validator),
                (false, _) => format!("{}.optional()", f.validator),
            })
            .collect();
        let shape = js_object(
            fields
                .iter()
                .zip(&values)
                .map(|(f, v)| (f.key.as_str(), v.as_str())),
        );
        format!("y.object({shape})")
    }

    fn record(&self, value: String) -> String {
        format!(
            "y.lazy((record) => y.object(Object.fromEntries(Object.keys(record ?? {{}}).map((key) => [key, {value}]))))"
        )
    }

    fn literal(&self, lit: &Literal) -> String {
        match lit {
            Literal::Null => self.primitive(PrimitiveKind::Null, None),
            other => format!("y.mixed().oneOf([{}])", js_literal(other)),
        }
    }

    fn union(&self, members: Vec<String>) -> String {
        members_test("union", "${path} matches no member", &members, false)
    }

    fn intersection(&self, members: Vec<String>) -> String {
        if members.iter().any(|m| is_lazy(m)) {
            return members_test("intersection", "${path} fails a member", &members, true);
        }
        let mut iter = members.into_iter();
        let first = iter.next().unwrap_or_else(|| self.unknown());
        iter.fold(first, |acc, next| format!("{acc}.concat({next})"))
    }

    fn reference(&self, name: &str, scope: RefScope) -> String {
        match scope {
            RefScope::Declaration => format!("y.lazy(() => {name})"),
            RefScope::Endpoint => name.to_string(),
        }
    }

    fn unknown(&self) -> String {
        "y.mixed().nullable()".into()
    }

    fn never(&self) -> String {
        "y.mixed().test(\"never\", \"${path} must be absent\", () => false)".into()
    }

    fn recursive_annotation(&self, name: &str) -> Option<String> {
        Some(format!("y.Schema<Schemas.{name}>"))
    }
}
