//! Identifier and string helpers shared by the mapper and the emitter.

use std::collections::HashSet;
use std::sync::LazyLock;

/// TypeScript reserved words that cannot be used as identifiers.
pub static TS_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "break",
        "case",
        "catch",
        "class",
        "const",
        "continue",
        "debugger",
        "default",
        "delete",
        "do",
        "else",
        "enum",
        "export",
        "extends",
        "false",
        "finally",
        "for",
        "function",
        "if",
        "import",
        "in",
        "instanceof",
        "new",
        "null",
        "return",
        "super",
        "switch",
        "this",
        "throw",
        "true",
        "try",
        "typeof",
        "var",
        "void",
        "while",
        "with",
        "yield",
        "let",
        "static",
        "implements",
        "interface",
        "package",
        "private",
        "protected",
        "public",
        "await",
        "async",
        // Built-in type names that would shadow globals inside `Schemas`.
        "any",
        "unknown",
        "never",
        "object",
        "string",
        "number",
        "boolean",
        "symbol",
        "Array",
        "Record",
        "Promise",
        "Date",
        "Blob",
        "Object",
        "String",
        "Number",
        "Boolean",
    ]
    .into_iter()
    .collect()
});

/// Check if an identifier needs quoting when used as a property key.
///
/// Returns true if the name:
/// - Is empty
/// - Doesn't start with a letter, underscore, or dollar sign
/// - Contains characters other than alphanumeric, underscore, or dollar sign
pub fn needs_bracket_notation(name: &str) -> bool {
    name.is_empty()
        || !name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Escape a string for use in a double-quoted JavaScript string literal.
pub fn escape_js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Double-quote a string as a JavaScript literal.
pub fn quote(s: &str) -> String {
    format!("\"{}\"", escape_js_string(s))
}

/// Quote a property key only when it is not a valid identifier.
pub fn quote_if_needed(name: &str) -> String {
    if needs_bracket_notation(name) {
        quote(name)
    } else {
        name.to_string()
    }
}

/// Split on every non-alphanumeric character and join the words in
/// PascalCase. Casing inside a word is preserved (`petID` -> `PetID`).
pub fn to_pascal_case(s: &str) -> String {
    s.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(capitalize_first)
        .collect()
}

/// Capitalize the first letter of a string.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Turn an arbitrary name into a PascalCase TypeScript identifier.
/// - Prepends `_` if it starts with a digit
/// - Escapes reserved words with a `_` prefix
/// - Falls back to `_empty` when nothing usable remains
pub fn sanitize_type_name(name: &str) -> String {
    let pascal = to_pascal_case(name);
    if pascal.is_empty() {
        return "_empty".to_string();
    }
    escape_identifier(pascal)
}

/// Sanitize while keeping the `method_Name` shape used for endpoint aliases.
/// A name with nothing usable in it, such as `/`, becomes `Root`.
pub fn sanitize_alias(method: &str, name: &str) -> String {
    let pascal = to_pascal_case(name);
    if pascal.is_empty() {
        format!("{method}_Root")
    } else {
        format!("{method}_{pascal}")
    }
}

fn escape_identifier(mut ident: String) -> String {
    if ident.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if TS_RESERVED_WORDS.contains(ident.as_str()) {
        ident.insert(0, '_');
    }
    ident
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_keys_needing_quotes() {
        for key in ["petId", "_links", "$ref", "page2"] {
            assert!(!needs_bracket_notation(key), "{key}");
        }
        for key in ["", "2xx", "x-rate-limit", "application/json", "first name"] {
            assert!(needs_bracket_notation(key), "{key}");
        }
    }

    #[test]
    fn test_escape_js_string() {
        assert_eq!(escape_js_string("/pets"), "/pets");
        assert_eq!(escape_js_string("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_js_string("C:\\tmp"), "C:\\\\tmp");
        assert_eq!(escape_js_string("line\nbreak\ttab"), "line\\nbreak\\ttab");
    }

    #[test]
    fn test_quote_if_needed() {
        assert_eq!(quote_if_needed("foo"), "foo");
        assert_eq!(quote_if_needed("foo-bar"), "\"foo-bar\"");
        assert_eq!(quote_if_needed("200"), "\"200\"");
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("pet-store"), "PetStore");
        assert_eq!(to_pascal_case("pet.store"), "PetStore");
        assert_eq!(to_pascal_case("pet_store"), "PetStore");
        assert_eq!(to_pascal_case("/pets/{petId}"), "PetsPetId");
        assert_eq!(to_pascal_case("getPetByID"), "GetPetByID");
    }

    #[test]
    fn test_sanitize_type_name() {
        assert_eq!(sanitize_type_name("Pet"), "Pet");
        assert_eq!(sanitize_type_name("123abc"), "_123abc");
        assert_eq!(sanitize_type_name("Record"), "_Record");
        assert_eq!(sanitize_type_name("---"), "_empty");
    }

    #[test]
    fn test_sanitize_alias() {
        assert_eq!(sanitize_alias("get", "findPets"), "get_FindPets");
        assert_eq!(sanitize_alias("delete", "/pets/{id}"), "delete_PetsId");
        assert_eq!(sanitize_alias("get", "/"), "get_Root");
        assert_eq!(sanitize_alias("delete", "{}"), "delete_Root");
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("foo"), "Foo");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("ABC"), "ABC");
    }
}
