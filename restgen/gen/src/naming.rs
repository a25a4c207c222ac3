//! Identifier derivation for generated code.
//!
//! Declared names (API titles, resource URIs, header names like
//! `x-commit-message`) are free text. Everything that becomes a Rust
//! identifier goes through this module.
//!
//! ## Examples
//!
//! ```
//! use restgen_gen::naming::{to_pascal_case, to_snake_case};
//!
//! assert_eq!(to_pascal_case("simple api"), "SimpleApi");
//! assert_eq!(to_snake_case("x-base-commit-id"), "x_base_commit_id");
//! assert_eq!(to_snake_case("fileName"), "file_name");
//! ```

use std::collections::HashSet;

/// Strict and reserved keywords; none can be a plain identifier.
const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Splits free text into words on separators and CamelCase boundaries.
///
/// Only ASCII letters and digits survive; everything else separates words.
///
/// - "simple api" -> ["simple", "api"]
/// - "x-base-commit-id" -> ["x", "base", "commit", "id"]
/// - "HTTPClient" -> ["HTTP", "Client"]
/// - "fileName" -> ["file", "Name"]
fn split_words(s: &str) -> Vec<&str> {
    let mut words = Vec::new();

    for chunk in s.split(|c: char| !c.is_ascii_alphanumeric()) {
        if chunk.is_empty() {
            continue;
        }

        let chars: Vec<(usize, char)> = chunk.char_indices().collect();
        let mut word_start = 0;

        for i in 1..chars.len() {
            let (idx, current) = chars[i];
            let prev = chars[i - 1].1;

            // "fileName" -> "file", "Name"; "HTTPClient" -> "HTTP", "Client"
            let is_new_word = current.is_uppercase()
                && (prev.is_lowercase()
                    || prev.is_ascii_digit()
                    || (i + 1 < chars.len() && chars[i + 1].1.is_lowercase() && prev.is_uppercase()));

            if is_new_word {
                if idx > word_start {
                    words.push(&chunk[word_start..idx]);
                }
                word_start = idx;
            }
        }

        if word_start < chunk.len() {
            words.push(&chunk[word_start..]);
        }
    }

    words
}

/// Converts free text to a PascalCase type name.
///
/// A leading digit gets an underscore prefix so the result stays a valid
/// identifier.
pub fn to_pascal_case(s: &str) -> String {
    let name: String = split_words(s)
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect();

    guard_leading_digit(name)
}

/// Converts free text to a snake_case identifier.
pub fn to_snake_case(s: &str) -> String {
    let name = split_words(s)
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("_");

    guard_leading_digit(name)
}

fn guard_leading_digit(name: String) -> String {
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name
    }
}

/// Returns a snake_case identifier safe to use as a field, parameter or
/// method name. Keywords get a trailing underscore.
pub fn field_name(s: &str) -> String {
    let name = to_snake_case(s);
    if name.is_empty() {
        return "value".to_string();
    }
    if RUST_KEYWORDS.contains(&name.as_str()) {
        format!("{name}_")
    } else {
        name
    }
}

/// Field names for the wire names of one struct, in order.
///
/// Distinct wire names can map to the same identifier (`x-id`, `x_id`);
/// later ones get a numeric suffix so every field stays unique.
///
/// ```
/// use restgen_gen::naming::unique_field_names;
///
/// assert_eq!(unique_field_names(["x-id", "x_id", "limit"]), vec!["x_id", "x_id_2", "limit"]);
/// ```
pub fn unique_field_names<'a>(wire_names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut used = HashSet::new();
    wire_names
        .into_iter()
        .map(|wire_name| {
            let base = field_name(wire_name);
            let mut name = base.clone();
            let mut n = 2;
            while !used.insert(name.clone()) {
                name = format!("{base}_{n}");
                n += 1;
            }
            name
        })
        .collect()
}

/// Returns a PascalCase type name; empty input becomes `Api`.
pub fn type_name(s: &str) -> String {
    let name = to_pascal_case(s);
    if name.is_empty() {
        "Api".to_string()
    } else {
        name
    }
}

/// Name of the per-API error type (`{Title}Exception`).
pub fn exception_type_name(api_title: &str) -> String {
    format!("{}Exception", type_name(api_title))
}

/// Name of the per-API response envelope type (`{Title}Response`).
pub fn response_type_name(api_title: &str) -> String {
    format!("{}Response", type_name(api_title))
}

/// Name of the per-API root client (`{Title}Client`).
pub fn client_type_name(api_title: &str) -> String {
    format!("{}Client", type_name(api_title))
}

/// Module name for an API (`simple_api` for "Simple API"). Names of the
/// crate's fixed files get an `_api` suffix.
pub fn module_name(api_title: &str) -> String {
    let name = field_name(api_title);
    if matches!(name.as_str(), "shared" | "prelude" | "lib") {
        format!("{name}_api")
    } else {
        name
    }
}

/// Struct name for a resource, from its display name or relative URI.
///
/// `/users` -> `Users`, `/{fileName}` -> `FileName`, `/cs/login` -> `CsLogin`.
pub fn resource_type_name(display_name: Option<&str>, relative_uri: &str) -> String {
    let source = display_name.unwrap_or(relative_uri);
    let name = to_pascal_case(source);
    if name.is_empty() {
        "Root".to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_words_on_separators_and_case() {
        assert_eq!(split_words("simple api"), vec!["simple", "api"]);
        assert_eq!(split_words("x-base-commit-id"), vec!["x", "base", "commit", "id"]);
        assert_eq!(split_words("HTTPClient"), vec!["HTTP", "Client"]);
        assert_eq!(split_words("fileName"), vec!["file", "Name"]);
        assert_eq!(split_words("/{userId}/items"), vec!["user", "Id", "items"]);
        assert!(split_words("--").is_empty());
    }

    #[test]
    fn pascal_case_normalizes_acronyms() {
        assert_eq!(to_pascal_case("OpenAI"), "OpenAi");
        assert_eq!(to_pascal_case("my api"), "MyApi");
        assert_eq!(to_pascal_case("/users"), "Users");
    }

    #[test]
    fn leading_digits_are_guarded() {
        assert_eq!(to_pascal_case("3d models"), "_3dModels");
        assert_eq!(to_snake_case("2fa"), "_2fa");
    }

    #[test]
    fn keywords_get_trailing_underscore() {
        assert_eq!(field_name("type"), "type_");
        assert_eq!(field_name("match"), "match_");
        assert_eq!(field_name("types"), "types");
    }

    #[test]
    fn reserved_keywords_get_trailing_underscore() {
        for word in [
            "try", "abstract", "become", "do", "final", "macro", "override", "priv", "typeof",
            "unsized", "virtual",
        ] {
            assert_eq!(field_name(word), format!("{word}_"));
            assert!(syn::parse_str::<syn::Ident>(&field_name(word)).is_ok());
        }
    }

    #[test]
    fn non_identifier_characters_are_separators() {
        assert_eq!(field_name("x²"), "x");
        assert_eq!(field_name("größe"), "gr_e");
        assert_eq!(field_name("²"), "value");
        assert!(syn::parse_str::<syn::Ident>(&field_name("größe")).is_ok());
        assert_eq!(type_name("Café API"), "CafApi");
    }

    #[test]
    fn colliding_wire_names_get_suffixes() {
        assert_eq!(
            unique_field_names(["x-id", "x_id", "X-Id", "x_id_2"]),
            vec!["x_id", "x_id_2", "x_id_3", "x_id_2_2"]
        );
        assert_eq!(unique_field_names(["type", "type_"]), vec!["type_", "type__2"]);
    }

    #[test]
    fn empty_names_have_fallbacks() {
        assert_eq!(field_name(""), "value");
        assert_eq!(type_name("  "), "Api");
        assert_eq!(resource_type_name(None, "/"), "Root");
    }

    #[test]
    fn per_api_type_names() {
        assert_eq!(exception_type_name("Simple API"), "SimpleApiException");
        assert_eq!(response_type_name("foo"), "FooResponse");
        assert_eq!(client_type_name("foo"), "FooClient");
    }

    #[test]
    fn module_name_avoids_shared() {
        assert_eq!(module_name("Simple API"), "simple_api");
        assert_eq!(module_name("Shared"), "shared_api");
        assert_eq!(module_name("prelude"), "prelude_api");
    }

    #[test]
    fn resource_names_prefer_display_name() {
        assert_eq!(resource_type_name(None, "/{fileName}"), "FileName");
        assert_eq!(resource_type_name(Some("Login"), "/cs/login"), "Login");
        assert_eq!(resource_type_name(None, "/cs/login"), "CsLogin");
    }
}
