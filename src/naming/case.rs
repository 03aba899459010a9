//! Identifier casing.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::NamingConvention;

static LEGAL_IDENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex"));

/// True if `key` can be used as an identifier in every supported target
/// without stripping or replacing characters.
pub fn is_identifier_legal(key: &str) -> bool {
    LEGAL_IDENT.is_match(key)
}

/// Split a raw JSON key into words.
///
/// Any non-alphanumeric character separates words, as do a lower/digit →
/// upper transition (`firstName`) and the last capital of an acronym run
/// (`HTTPServer` → `HTTP`, `Server`).
pub fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

impl NamingConvention {
    pub fn join<S: AsRef<str>>(self, words: &[S]) -> String {
        match self {
            NamingConvention::PascalCase => words.iter().map(|w| capitalize(w.as_ref())).collect(),
            NamingConvention::CamelCase => words
                .iter()
                .enumerate()
                .map(|(i, w)| if i == 0 { w.as_ref().to_lowercase() } else { capitalize(w.as_ref()) })
                .collect(),
            NamingConvention::SnakeCase => words
                .iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect::<Vec<_>>()
                .join("_"),
        }
    }

    pub fn apply(self, raw: &str) -> String {
        self.join(&split_words(raw))
    }

    /// Prefix for identifiers that would start with a digit.
    pub(crate) fn digit_prefix(self) -> &'static str {
        match self {
            NamingConvention::PascalCase => "N",
            NamingConvention::CamelCase => "n",
            NamingConvention::SnakeCase => "n_",
        }
    }

    /// `Value` → `Value2`, `value` → `value_2`.
    pub(crate) fn with_counter(self, base: &str, n: usize) -> String {
        match self {
            NamingConvention::SnakeCase => format!("{base}_{n}"),
            _ => format!("{base}{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use NamingConvention::*;

    #[test]
    fn splits_on_separators_and_humps() {
        assert_eq!(split_words("first_name"), ["first", "name"]);
        assert_eq!(split_words("first-name here"), ["first", "name", "here"]);
        assert_eq!(split_words("firstName"), ["first", "Name"]);
        assert_eq!(split_words("HTTPServer"), ["HTTP", "Server"]);
        assert_eq!(split_words("v2Name"), ["v2", "Name"]);
        assert_eq!(split_words("@@"), Vec::<String>::new());
    }

    #[test]
    fn conventions() {
        assert_eq!(PascalCase.apply("first_name"), "FirstName");
        assert_eq!(CamelCase.apply("first_name"), "firstName");
        assert_eq!(SnakeCase.apply("firstName"), "first_name");
        assert_eq!(PascalCase.apply("Value"), "Value");
        assert_eq!(PascalCase.apply("value"), "Value");
        assert_eq!(SnakeCase.apply("HTTPServer"), "http_server");
        assert_eq!(PascalCase.apply("1st place"), "1stPlace");
    }

    #[test]
    fn legality() {
        assert!(is_identifier_legal("first_name"));
        assert!(is_identifier_legal("_x1"));
        assert!(!is_identifier_legal("first name"));
        assert!(!is_identifier_legal("1st"));
        assert!(!is_identifier_legal("a-b"));
        assert!(!is_identifier_legal(""));
    }
}
