//! io-ts codecs.

use super::{ObjectField, RefScope, RuntimeBackend, ValidatorSyntax, js_literal, js_object};
use crate::config::RuntimeChoice;
use crate::emitter::ts::TsImport;
use crate::ir::{Literal, PrimitiveKind};

/// Most codecs `t.intersection` accepts in one call.
const MAX_INTERSECTION: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct IoTs;

impl RuntimeBackend for IoTs {
    fn choice(&self) -> RuntimeChoice {
        RuntimeChoice::IoTs
    }

    fn validator(&self) -> Option<&dyn ValidatorSyntax> {
        Some(self)
    }
}

impl ValidatorSyntax for IoTs {
    fn import(&self) -> TsImport {
        TsImport::Namespace {
            alias: "t".into(),
            from: "io-ts".into(),
        }
    }

    fn primitive(&self, kind: PrimitiveKind, _format: Option<&str>) -> String {
        match kind {
            PrimitiveKind::String => "t.string".into(),
            // t.Int is branded and would not match the plain `number` type.
            PrimitiveKind::Number | PrimitiveKind::Integer => "t.number".into(),
            PrimitiveKind::Boolean => "t.boolean".into(),
            PrimitiveKind::Null => "t.null".into(),
        }
    }

    fn array(&self, item: String) -> String {
        format!("t.array({item})")
    }

    fn object(&self, fields: Vec<ObjectField>, rest: Option<String>) -> String {
        let (required, optional): (Vec<_>, Vec<_>) = fields.iter().partition(|f| f.required);
        let shape = |group: &[&ObjectField]| {
            js_object(group.iter().map(|f| (f.key.as_str(), f.validator.as_str())))
        };

        let mut parts = Vec::new();
        if !required.is_empty() || optional.is_empty() {
            parts.push(format!("t.type({})", shape(&required)));
        }
        if !optional.is_empty() {
            parts.push(format!("t.partial({})", shape(&optional)));
        }
        if let Some(rest) = rest {
            parts.push(self.record(rest));
        }

        if parts.len() == 1 {
            parts.remove(0)
        } else {
            self.intersection(parts)
        }
    }

    fn record(&self, value: String) -> String {
        format!("t.record(t.string, {value})")
    }

    fn literal(&self, lit: &Literal) -> String {
        match lit {
            Literal::Null => "t.null".into(),
            other => format!("t.literal({})", js_literal(other)),
        }
    }

    fn union(&self, members: Vec<String>) -> String {
        format!("t.union([{}])", members.join(", "))
    }

    fn intersection(&self, mut members: Vec<String>) -> String {
        if members.len() > MAX_INTERSECTION {
            let rest = members.split_off(MAX_INTERSECTION - 1);
            members.push(self.intersection(rest));
        }
        format!("t.intersection([{}])", members.join(", "))
    }

    fn reference(&self, name: &str, scope: RefScope) -> String {
        match scope {
            RefScope::Declaration => format!("t.recursion(\"{name}\", () => {name})"),
            RefScope::Endpoint => name.to_string(),
        }
    }

    fn unknown(&self) -> String {
        "t.unknown".into()
    }

    fn never(&self) -> String {
        "t.never".into()
    }

    fn recursive_annotation(&self, name: &str) -> Option<String> {
        Some(format!("t.Type<Schemas.{name}>"))
    }
}
