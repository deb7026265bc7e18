//! Runtime backends.
//!
//! A backend decides how runtime validators are written for one library.
//! Walking the descriptor tree is shared by all of them: single-member
//! collapse, enum literal unions, lazy references and the unknown fallback
//! are handled here, so a backend only supplies syntax.
//!
//! ## Module Structure
//!
//! - `none`: types-only output, no validators
//! - `zod`, `valibot`, `io_ts`, `typebox`, `yup`, `arktype`: validator
//!   libraries

mod arktype;
mod io_ts;
mod none;
mod typebox;
mod valibot;
mod yup;
mod zod;

use crate::config::RuntimeChoice;
use crate::emitter::ts::{Emit, TsConst, TsImport, TsItem, TsLiteral};
use crate::ir::utils::quote_if_needed;
use crate::ir::{Additional, Literal, PrimitiveKind, TypeDescriptor};

pub use arktype::Arktype;
pub use io_ts::IoTs;
pub use none::TypesOnly;
pub use typebox::Typebox;
pub use valibot::Valibot;
pub use yup::Yup;
pub use zod::Zod;

/// A runtime the client can be generated for.
pub trait RuntimeBackend: Send + Sync {
    fn choice(&self) -> RuntimeChoice;

    /// Validator syntax, or `None` when only types are generated.
    fn validator(&self) -> Option<&dyn ValidatorSyntax>;
}

/// Where a reference to a schema validator is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefScope {
    /// Inside a schema validator declaration; may point forward or at itself.
    Declaration,
    /// After every schema validator has been declared.
    Endpoint,
}

/// One declared property handed to [`ValidatorSyntax::object`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectField {
    /// Property key, quoted when it is not an identifier
    pub key: String,
    pub validator: String,
    pub required: bool,
}

/// A schema validator ready to be declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration<'a> {
    pub name: &'a str,
    pub validator: String,
    pub recursive: bool,
}

/// Validator building blocks of one runtime library.
pub trait ValidatorSyntax: Send + Sync {
    fn import(&self) -> TsImport;

    fn primitive(&self, kind: PrimitiveKind, format: Option<&str>) -> String;

    fn array(&self, item: String) -> String;

    /// Object with declared properties, optionally accepting extra keys that
    /// match `rest`.
    fn object(&self, fields: Vec<ObjectField>, rest: Option<String>) -> String;

    /// String-keyed map with no declared properties.
    fn record(&self, value: String) -> String;

    fn literal(&self, lit: &Literal) -> String;

    /// At least two members.
    fn union(&self, members: Vec<String>) -> String;

    /// At least two members.
    fn intersection(&self, members: Vec<String>) -> String;

    fn reference(&self, name: &str, scope: RefScope) -> String;

    fn unknown(&self) -> String;

    fn never(&self) -> String;

    /// Type annotation required by a self-referential declaration.
    fn recursive_annotation(&self, name: &str) -> Option<String>;

    /// A validator used on its own, outside any schema declaration.
    fn standalone(&self, validator: String) -> String {
        validator
    }

    /// Render the schema validator declarations, in table order.
    fn declarations(&self, decls: &[Declaration<'_>]) -> Vec<TsItem> {
        decls
            .iter()
            .map(|decl| {
                TsItem::Const(TsConst {
                    name: decl.name.to_string(),
                    annotation: if decl.recursive {
                        self.recursive_annotation(decl.name)
                    } else {
                        None
                    },
                    init: decl.validator.clone(),
                })
            })
            .collect()
    }
}

static TYPES_ONLY: TypesOnly = TypesOnly;
static ZOD: Zod = Zod;
static VALIBOT: Valibot = Valibot;
static IO_TS: IoTs = IoTs;
static TYPEBOX: Typebox = Typebox;
static YUP: Yup = Yup;
static ARKTYPE: Arktype = Arktype;

/// The backend implementing `choice`.
pub fn backend_for(choice: RuntimeChoice) -> &'static dyn RuntimeBackend {
    match choice {
        RuntimeChoice::None => &TYPES_ONLY,
        RuntimeChoice::Zod => &ZOD,
        RuntimeChoice::Valibot => &VALIBOT,
        RuntimeChoice::IoTs => &IO_TS,
        RuntimeChoice::Typebox => &TYPEBOX,
        RuntimeChoice::Yup => &YUP,
        RuntimeChoice::Arktype => &ARKTYPE,
    }
}

/// Render a validator expression for `ty`.
pub fn render_validator(
    syntax: &dyn ValidatorSyntax,
    ty: &TypeDescriptor,
    scope: RefScope,
) -> String {
    match ty {
        TypeDescriptor::Primitive { kind, format } => syntax.primitive(*kind, format.as_deref()),
        TypeDescriptor::Array(item) => syntax.array(render_validator(syntax, item, scope)),
        TypeDescriptor::Object {
            properties,
            additional,
        } => {
            let fields: Vec<ObjectField> = properties
                .iter()
                .map(|(name, prop)| ObjectField {
                    key: quote_if_needed(name),
                    validator: render_validator(syntax, &prop.ty, scope),
                    required: prop.required,
                })
                .collect();
            match additional {
                Additional::Open(value) if fields.is_empty() => {
                    syntax.record(render_validator(syntax, value, scope))
                }
                Additional::Open(value) => {
                    syntax.object(fields, Some(render_validator(syntax, value, scope)))
                }
                Additional::Closed => syntax.object(fields, None),
            }
        }
        TypeDescriptor::Enum(literals) => {
            let mut members: Vec<String> = literals.iter().map(|l| syntax.literal(l)).collect();
            match members.len() {
                0 => syntax.never(),
                1 => members.remove(0),
                _ => syntax.union(members),
            }
        }
        TypeDescriptor::Union { members, .. } => {
            let mut rendered = render_all(syntax, members, scope);
            match rendered.len() {
                0 => syntax.unknown(),
                1 => rendered.remove(0),
                _ => syntax.union(rendered),
            }
        }
        TypeDescriptor::Intersection(members) => {
            let mut rendered = render_all(syntax, members, scope);
            match rendered.len() {
                0 => syntax.unknown(),
                1 => rendered.remove(0),
                _ => syntax.intersection(rendered),
            }
        }
        TypeDescriptor::Reference { name, .. } => syntax.reference(name, scope),
        TypeDescriptor::Unknown => syntax.unknown(),
    }
}

fn render_all(
    syntax: &dyn ValidatorSyntax,
    members: &[TypeDescriptor],
    scope: RefScope,
) -> Vec<String> {
    members
        .iter()
        .map(|member| render_validator(syntax, member, scope))
        .collect()
}

/// JavaScript source for a literal value.
pub(crate) fn js_literal(lit: &Literal) -> String {
    TsLiteral::from(lit).emit()
}

/// `{ a: x, b: y }` from already rendered entries.
pub(crate) fn js_object<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let parts: Vec<String> = entries
        .into_iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect();
    if parts.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", parts.join(", "))
    }
}
