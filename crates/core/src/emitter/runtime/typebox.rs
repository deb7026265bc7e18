//! TypeBox schemas.
//!
//! Schema validators are declared as members of one `Type.Module`, where
//! `Type.Ref` resolves forward and cyclic references. Each member is then
//! exported through `Import`, so endpoint validators can use it by name.

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
pub struct Typebox;

impl RuntimeBackend for Typebox {
    fn choice(&self) -> RuntimeChoice {
        RuntimeChoice::Typebox
    }

    fn validator(&self) -> Option<&dyn ValidatorSyntax> {
        Some(self)
    }
}

impl ValidatorSyntax for Typebox {
    fn import(&self) -> TsImport {
        TsImport::Named {
            items: vec!["Type".into()],
            from: "@sinclair/typebox".into(),
        }
    }

    fn primitive(&self, kind: PrimitiveKind, format: Option<&str>) -> String {
        match kind {
            PrimitiveKind::String => match format {
                Some(format) => format!("Type.String({{ format: {} }})", quote(format)),
                None => "Type.String()".into(),
            },
            PrimitiveKind::Number => "Type.Number()".into(),
            PrimitiveKind::Integer => "Type.Integer()".into(),
            PrimitiveKind::Boolean => "Type.Boolean()".into(),
            PrimitiveKind::Null => "Type.Null()".into(),
        }
    }

    fn array(&self, item: String) -> String {
        format!("Type.Array({item})")
    }

    fn object(&self, fields: Vec<ObjectField>, rest: Option<String>) -> String {
        let values: Vec<String> = fields
            .iter()
            .map(|f| {
                if f.required {
                    f.validator.clone()
                } else {
                    format!("Type.Optional({})", f.validator)
                }
            })
            .collect();
        let properties = js_object(
            fields
                .iter()
                .zip(&values)
                .map(|(f, v)| (f.key.as_str(), v.as_str())),
        );
        match rest {
            Some(rest) => {
                format!("Type.Object({properties}, {{ additionalProperties: {rest} }})")
            }
            None => format!("Type.Object({properties})"),
        }
    }

    fn record(&self, value: String) -> String {
        format!("Type.Record(Type.String(), {value})")
    }

    fn literal(&self, lit: &Literal) -> String {
        match lit {
            Literal::Null => "Type.Null()".into(),
            other => format!("Type.Literal({})", js_literal(other)),
        }
    }

    fn union(&self, members: Vec<String>) -> String {
        format!("Type.Union([{}])", members.join(", "))
    }

    fn intersection(&self, members: Vec<String>) -> String {
        format!("Type.Intersect([{}])", members.join(", "))
    }

    fn reference(&self, name: &str, scope: RefScope) -> String {
        match scope {
            RefScope::Declaration => format!("Type.Ref({})", quote(name)),
            RefScope::Endpoint => name.to_string(),
        }
    }

    fn unknown(&self) -> String {
        "Type.Unknown()".into()
    }

    fn never(&self) -> String {
        "Type.Never()".into()
    }

    fn recursive_annotation(&self, _name: &str) -> Option<String> {
        // Module members are inferred through Type.Ref; no annotation.
        None
    }

    fn declarations(&self, decls: &[Declaration<'_>]) -> Vec<TsItem> {
        if decls.is_empty() {
            return Vec::new();
        }
        let mut module = format!("const {MODULE_NAME} = Type.Module({{\n");
        for decl in decls {
            module.push_str(&format!("  {}: {},\n", decl.name, decl.validator));
        }
        module.push_str("});\n");

        let mut items = vec![TsItem::Raw(module)];
        items.extend(decls.iter().map(|decl| {
            TsItem::Const(TsConst {
                name: decl.name.to_string(),
                annotation: None,
                init: format!("{MODULE_NAME}.Import({})", quote(decl.name)),
            })
        }));
        items
    }
}
