//! Conversion options.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Identifier casing for generated type and field names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum NamingConvention {
    #[default]
    #[serde(rename = "PascalCase", alias = "pascal")]
    #[value(name = "pascal", alias = "PascalCase")]
    PascalCase,
    #[serde(rename = "camelCase", alias = "camel")]
    #[value(name = "camel", alias = "camelCase")]
    CamelCase,
    #[serde(rename = "snake_case", alias = "snake")]
    #[value(name = "snake", alias = "snake_case")]
    SnakeCase,
}

/// Where nested object types are declared. Meaning is per backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NestedTypeStyle {
    /// Nested type declared inside (or spelled out within) its parent.
    Inline,
    /// Every object type gets its own top-level declaration.
    #[default]
    Hoisted,
}

/// Declaration keyword for targets that offer a choice (C#).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    #[default]
    Class,
    Record,
    Struct,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Config {
    /// Registry key of the backend, e.g. `csharp`, `ts`, `python`, `rust`.
    pub target_language: String,
    pub root_name: String,
    pub naming_convention: NamingConvention,
    pub nested_type_style: NestedTypeStyle,
    /// Render optional fields as nullable types rather than omittable members.
    pub emit_optional_as_nullable: bool,
    pub declaration_kind: DeclarationKind,
    /// Let structurally identical objects share one declaration.
    pub share_identical_types: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_language: "csharp".to_string(),
            root_name: "Root".to_string(),
            naming_convention: NamingConvention::default(),
            nested_type_style: NestedTypeStyle::default(),
            emit_optional_as_nullable: true,
            declaration_kind: DeclarationKind::default(),
            share_identical_types: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target_language(mut self, value: impl Into<String>) -> Self {
        self.target_language = value.into();
        self
    }

    pub fn root_name(mut self, value: impl Into<String>) -> Self {
        self.root_name = value.into();
        self
    }

    pub fn naming_convention(mut self, value: NamingConvention) -> Self {
        self.naming_convention = value;
        self
    }

    pub fn nested_type_style(mut self, value: NestedTypeStyle) -> Self {
        self.nested_type_style = value;
        self
    }

    pub fn emit_optional_as_nullable(mut self, value: bool) -> Self {
        self.emit_optional_as_nullable = value;
        self
    }

    pub fn declaration_kind(mut self, value: DeclarationKind) -> Self {
        self.declaration_kind = value;
        self
    }

    pub fn share_identical_types(mut self, value: bool) -> Self {
        self.share_identical_types = value;
        self
    }

    /// Parse a JSON config document; errors carry the offending JSON path.
    pub fn from_json_str(src: &str) -> Result<Self, ConfigError> {
        crate::path_de::from_str_with_path(src)
    }

    /// Engine-level checks. Backend-specific checks live in `Backend::validate`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.root_name.chars().any(char::is_alphanumeric) {
            return Err(ConfigError::InvalidRootName(self.root_name.clone()));
        }
        if self.share_identical_types && self.nested_type_style == NestedTypeStyle::Inline {
            return Err(ConfigError::InvalidCombination(
                "shared types need hoisted declarations".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = Config::from_json_str(r#"{"targetLanguage": "ts", "namingConvention": "camelCase"}"#)
            .unwrap();
        assert_eq!(cfg.target_language, "ts");
        assert_eq!(cfg.naming_convention, NamingConvention::CamelCase);
        assert_eq!(cfg.root_name, "Root");
        assert!(cfg.emit_optional_as_nullable);
    }

    #[test]
    fn trailing_input_is_rejected() {
        let err = Config::from_json_str("{\"rootName\": \"A\"} junk").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(Config::from_json_str("{\"rootName\": \"A\"}\n\n").is_ok());
    }

    #[test]
    fn bad_value_reports_path() {
        let err = Config::from_json_str(r#"{"nestedTypeStyle": "sideways"}"#).unwrap_err();
        let ConfigError::Parse { path, .. } = err else { panic!("expected parse error") };
        assert_eq!(path, "nestedTypeStyle");
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(Config::from_json_str(r#"{"colour": true}"#).is_err());
    }

    #[test]
    fn validation() {
        assert!(Config::new().validate().is_ok());
        assert!(matches!(
            Config::new().root_name("  ").validate(),
            Err(ConfigError::InvalidRootName(_))
        ));
        assert!(matches!(
            Config::new()
                .share_identical_types(true)
                .nested_type_style(NestedTypeStyle::Inline)
                .validate(),
            Err(ConfigError::InvalidCombination(_))
        ));
    }
}
