//! String transformation utilities for code generation

/// Uppercase the first character and leave the rest untouched.
///
/// Unlike a full camel-case conversion this keeps underscores and inner
/// capitals, so `users_Id` stays `Users_Id`.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Normalize an HTTP method for use inside an identifier (`GET` -> `Get`)
pub fn method_ident(method: &str) -> String {
    capitalize_first(&method.to_lowercase())
}

/// Strip decorations that Apifox puts into generic schema names.
///
/// `PageResult«List«User»»` becomes `PageResultListUser`, `com.acme.User`
/// becomes `comacmeUser`.
pub fn sanitize_type_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '«' | '»' | '.'))
        .collect()
}

/// Whether a property key can be written bare in a TypeScript interface
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Escape a string for use in a double-quoted TypeScript literal
pub fn escape_ts_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Quote a property key if it is not a valid identifier
pub fn quote_if_needed(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        format!("\"{}\"", escape_ts_string(name))
    }
}

/// Flatten free text into a single line that is safe inside `/** ... */`.
pub fn doc_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("*/", "*\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("users"), "Users");
        assert_eq!(capitalize_first("users_Id"), "Users_Id");
        assert_eq!(capitalize_first("userId"), "UserId");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_method_ident() {
        assert_eq!(method_ident("get"), "Get");
        assert_eq!(method_ident("DELETE"), "Delete");
    }

    #[test]
    fn test_sanitize_type_name() {
        assert_eq!(sanitize_type_name("Wrapper«Foo»"), "WrapperFoo");
        assert_eq!(
            sanitize_type_name("PageResult«List«User»»"),
            "PageResultListUser"
        );
        assert_eq!(sanitize_type_name("com.acme.User"), "comacmeUser");
    }

    #[test]
    fn test_quote_if_needed() {
        assert_eq!(quote_if_needed("userName"), "userName");
        assert_eq!(quote_if_needed("$id"), "$id");
        assert_eq!(quote_if_needed("content-type"), "\"content-type\"");
        assert_eq!(quote_if_needed("2fa"), "\"2fa\"");
        assert_eq!(quote_if_needed(""), "\"\"");
    }

    #[test]
    fn test_doc_text() {
        assert_eq!(doc_text("  line one\n\n line two "), "line one line two");
        assert_eq!(doc_text("ends */ early"), "ends *\\/ early");
    }
}
