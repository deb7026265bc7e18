//! Normalized type descriptors and the type table.
//!
//! A [`TypeDescriptor`] owns its children except through
//! [`TypeDescriptor::Reference`], which only names a [`TypeTable`] entry. That
//! is how cycles are represented without infinite trees.

use indexmap::{IndexMap, IndexSet};

/// Scalar kinds of a primitive schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

/// Literal value of an enum member or `const`.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Int(i64),
    Number(f64),
    Bool(bool),
    Null,
}

impl Literal {
    /// Convert a JSON scalar. Objects and arrays have no literal form.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => Some(Literal::Null),
            serde_json::Value::Bool(b) => Some(Literal::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Literal::Int)
                .or_else(|| n.as_f64().map(Literal::Number)),
            serde_json::Value::String(s) => Some(Literal::String(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }
}

/// Which composition keyword produced a union.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionKind {
    OneOf,
    AnyOf,
}

/// Whether an object accepts keys beyond its declared properties.
#[derive(Debug, Clone, PartialEq)]
pub enum Additional {
    Closed,
    /// Open, with every extra value matching the descriptor.
    Open(Box<TypeDescriptor>),
}

/// One declared property of an object descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub ty: TypeDescriptor,
    pub required: bool,
}

/// Normalized representation of one schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    Primitive {
        kind: PrimitiveKind,
        format: Option<String>,
    },
    Array(Box<TypeDescriptor>),
    Object {
        properties: IndexMap<String, Property>,
        additional: Additional,
    },
    Enum(Vec<Literal>),
    Union {
        kind: UnionKind,
        members: Vec<TypeDescriptor>,
    },
    Intersection(Vec<TypeDescriptor>),
    /// Named pointer into the type table.
    Reference {
        key: String,
        name: String,
    },
    /// Fallback for shapes that cannot be expressed more precisely.
    Unknown,
}

impl TypeDescriptor {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeDescriptor::Primitive { kind, format: None }
    }

    pub fn string() -> Self {
        Self::primitive(PrimitiveKind::String)
    }

    /// `Record<string, unknown>`: an object with no declared properties.
    pub fn open_object() -> Self {
        TypeDescriptor::Object {
            properties: IndexMap::new(),
            additional: Additional::Open(Box::new(TypeDescriptor::Unknown)),
        }
    }

    /// Whether the descriptor is worth its own named declaration when it
    /// appears inline in a request body or response.
    pub fn is_complex(&self) -> bool {
        match self {
            TypeDescriptor::Object { properties, .. } => !properties.is_empty(),
            TypeDescriptor::Enum(_)
            | TypeDescriptor::Union { .. }
            | TypeDescriptor::Intersection(_) => true,
            _ => false,
        }
    }

    /// Visit every reference reachable without crossing into the table.
    pub fn for_each_reference<'a>(&'a self, f: &mut impl FnMut(&'a str, &'a str)) {
        match self {
            TypeDescriptor::Reference { key, name } => f(key, name),
            TypeDescriptor::Array(item) => item.for_each_reference(f),
            TypeDescriptor::Object {
                properties,
                additional,
            } => {
                for prop in properties.values() {
                    prop.ty.for_each_reference(f);
                }
                if let Additional::Open(value) = additional {
                    value.for_each_reference(f);
                }
            }
            TypeDescriptor::Union { members, .. } | TypeDescriptor::Intersection(members) => {
                for member in members {
                    member.for_each_reference(f);
                }
            }
            TypeDescriptor::Primitive { .. } | TypeDescriptor::Enum(_) | TypeDescriptor::Unknown => {}
        }
    }
}

/// One named declaration in the type table.
#[derive(Debug, Clone)]
pub struct TypeEntry {
    pub key: String,
    pub name: String,
    pub ty: TypeDescriptor,
    /// The entry can reach itself through references.
    pub recursive: bool,
}

/// Schema key -> named descriptor, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    entries: IndexMap<String, TypeEntry>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `key`. A replaced entry keeps its
    /// original position.
    pub fn insert(&mut self, key: String, name: String, ty: TypeDescriptor) {
        self.entries.insert(
            key.clone(),
            TypeEntry {
                key,
                name,
                ty,
                recursive: false,
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<&TypeEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeEntry> {
        self.entries.values()
    }

    /// Flag every entry that participates in a reference cycle.
    pub fn mark_recursive(&mut self) {
        let edges: IndexMap<&str, Vec<&str>> = self
            .entries
            .values()
            .map(|entry| {
                let mut targets = Vec::new();
                entry.ty.for_each_reference(&mut |key, _| targets.push(key));
                (entry.key.as_str(), targets)
            })
            .collect();

        let recursive: Vec<String> = edges
            .keys()
            .filter(|start| reaches(&edges, start, start))
            .map(|key| (*key).to_string())
            .collect();

        for key in recursive {
            if let Some(entry) = self.entries.get_mut(&key) {
                entry.recursive = true;
            }
        }
    }
}

/// Whether `target` is reachable from `from` in at least one step.
fn reaches(edges: &IndexMap<&str, Vec<&str>>, from: &str, target: &str) -> bool {
    let mut seen: IndexSet<&str> = IndexSet::new();
    let mut stack: Vec<&str> = edges.get(from).cloned().unwrap_or_default();
    while let Some(next) = stack.pop() {
        if next == target {
            return true;
        }
        if seen.insert(next) {
            if let Some(out) = edges.get(next) {
                stack.extend(out.iter().copied());
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(name: &str) -> TypeDescriptor {
        TypeDescriptor::Reference {
            key: format!("#/components/schemas/{name}"),
            name: name.to_string(),
        }
    }

    fn object_with(prop: &str, ty: TypeDescriptor) -> TypeDescriptor {
        let mut properties = IndexMap::new();
        properties.insert(prop.to_string(), Property { ty, required: false });
        TypeDescriptor::Object {
            properties,
            additional: Additional::Closed,
        }
    }

    #[test]
    fn test_literal_from_json() {
        assert_eq!(
            Literal::from_json(&serde_json::json!("a")),
            Some(Literal::String("a".into()))
        );
        assert_eq!(Literal::from_json(&serde_json::json!(3)), Some(Literal::Int(3)));
        assert_eq!(
            Literal::from_json(&serde_json::json!(1.5)),
            Some(Literal::Number(1.5))
        );
        assert_eq!(Literal::from_json(&serde_json::json!(null)), Some(Literal::Null));
        assert_eq!(Literal::from_json(&serde_json::json!({})), None);
    }

    #[test]
    fn test_mark_recursive_mutual_cycle() {
        let mut table = TypeTable::new();
        table.insert(
            "#/components/schemas/A".into(),
            "A".into(),
            object_with("b", reference("B")),
        );
        table.insert(
            "#/components/schemas/B".into(),
            "B".into(),
            object_with("a", TypeDescriptor::Array(Box::new(reference("A")))),
        );
        table.insert(
            "#/components/schemas/C".into(),
            "C".into(),
            object_with("a", reference("A")),
        );
        table.mark_recursive();

        let flags: Vec<_> = table.iter().map(|e| (e.name.as_str(), e.recursive)).collect();
        assert_eq!(flags, [("A", true), ("B", true), ("C", false)]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut table = TypeTable::new();
        table.insert("a".into(), "A".into(), TypeDescriptor::Unknown);
        table.insert("b".into(), "B".into(), TypeDescriptor::Unknown);
        table.insert("a".into(), "A".into(), TypeDescriptor::string());
        let names: Vec<_> = table.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(table.get("a").map(|e| &e.ty), Some(&TypeDescriptor::string()));
    }

    #[test]
    fn test_is_complex() {
        assert!(!TypeDescriptor::string().is_complex());
        assert!(!TypeDescriptor::open_object().is_complex());
        assert!(object_with("x", TypeDescriptor::Unknown).is_complex());
        assert!(TypeDescriptor::Enum(vec![Literal::Int(1)]).is_complex());
    }
}
