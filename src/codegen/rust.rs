//! Strict serde-ready Rust structs.
//!
//! Rust has no anonymous or nested structs, so every object is hoisted and
//! the inline style is rejected up front. Unions fall back to
//! `serde_json::Value`.

use crate::config::{Config, NestedTypeStyle};
use crate::error::ConfigError;
use crate::ir::PrimitiveKind;
use crate::naming::{DeclId, NamedField, NamedType, NamedTypeGraph};

use super::{indent, Backend};

const INDENT: usize = 4;

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
    "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Keywords that cannot be raw identifiers.
const NOT_RAW: &[&str] = &["crate", "self", "Self", "super"];

/// Types and paths the rendered structs refer to.
const RESERVED_TYPES: &[&str] = &[
    "String", "Vec", "Option", "Box", "Result", "Serialize", "Deserialize", "bool", "i64",
    "f64", "serde", "serde_json",
];

pub struct Rust;

impl Backend for Rust {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["rs"]
    }

    fn validate(&self, config: &Config) -> Result<(), ConfigError> {
        if config.nested_type_style == NestedTypeStyle::Inline {
            return Err(ConfigError::UnsupportedOption {
                language: "rust",
                option: "inline nested types".to_string(),
            });
        }
        Ok(())
    }

    fn escape_keyword(&self, ident: &str) -> Option<String> {
        if NOT_RAW.contains(&ident) {
            Some(format!("{ident}_"))
        } else if KEYWORDS.contains(&ident) {
            Some(format!("r#{ident}"))
        } else {
            None
        }
    }

    fn reserved_type_names(&self) -> &'static [&'static str] {
        RESERVED_TYPES
    }

    fn render(&self, graph: &NamedTypeGraph, config: &Config) -> String {
        let mut cg = Codegen::new(graph, config);
        cg.emit();
        cg.into_string()
    }
}

struct Codegen<'g> {
    graph: &'g NamedTypeGraph,
    skip_absent: bool,
    out: String,
}

impl<'g> Codegen<'g> {
    fn new(graph: &'g NamedTypeGraph, config: &Config) -> Self {
        Self { graph, skip_absent: !config.emit_optional_as_nullable, out: String::new() }
    }

    fn emit(&mut self) {
        let mut blocks = Vec::new();
        if !self.graph.declarations.is_empty() {
            blocks.push("use serde::{Deserialize, Serialize};".to_string());
        }
        for id in self.graph.ids() {
            blocks.push(self.item(id));
        }
        if super::needs_root_alias(self.graph) {
            blocks.push(format!("pub type {} = {};", self.graph.root_name, self.ty(&self.graph.root)));
        }
        self.out = blocks.join("\n\n");
    }

    fn into_string(mut self) -> String {
        self.out.push('\n');
        self.out
    }

    fn item(&self, id: DeclId) -> String {
        let decl = self.graph.decl(id);
        let mut s = String::from("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]\n");
        if decl.fields.is_empty() {
            s.push_str(&format!("pub struct {} {{}}", decl.name));
            return s;
        }
        s.push_str(&format!("pub struct {} {{\n", decl.name));
        for field in &decl.fields {
            if let Some(attr) = self.attribute(field) {
                s.push_str(&format!("{}{}\n", indent(1, INDENT), attr));
            }
            let ty = self.ty(&field.ty);
            let ty = if field.optional { option(ty) } else { ty };
            s.push_str(&format!("{}pub {}: {},\n", indent(1, INDENT), field.ident, ty));
        }
        s.push('}');
        s
    }

    fn attribute(&self, field: &NamedField) -> Option<String> {
        let mut args = Vec::new();
        if field.ident.trim_start_matches("r#") != field.key {
            args.push(format!("rename = {:?}", field.key));
        }
        if field.optional && self.skip_absent {
            args.push("default".to_string());
            args.push("skip_serializing_if = \"Option::is_none\"".to_string());
        }
        (!args.is_empty()).then(|| format!("#[serde({})]", args.join(", ")))
    }

    fn ty(&self, t: &NamedType) -> String {
        match t {
            NamedType::Unknown | NamedType::Union(_) => "serde_json::Value".to_string(),
            NamedType::Primitive(kind) => match kind {
                PrimitiveKind::Null => "serde_json::Value",
                PrimitiveKind::Bool => "bool",
                PrimitiveKind::Integer => "i64",
                PrimitiveKind::Float => "f64",
                PrimitiveKind::String => "String",
            }
            .to_string(),
            NamedType::Object(id) => self.graph.decl(*id).name.clone(),
            NamedType::Array(inner) => format!("Vec<{}>", self.ty(inner)),
            NamedType::Nullable(inner) => option(self.ty(inner)),
        }
    }
}

fn option(ty: String) -> String {
    if ty.starts_with("Option<") { ty } else { format!("Option<{ty}>") }
}

#[cfg(test)]
mod tests {
    use crate::config::{Config, NamingConvention, NestedTypeStyle};
    use crate::driver::convert;
    use crate::error::ConfigError;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn rust() -> Config {
        Config::new().target_language("rust").naming_convention(NamingConvention::SnakeCase)
    }

    #[test]
    fn structs_with_renames() {
        let v = json!({
            "userId": 1,
            "type": "admin",
            "tags": ["a", null],
            "profile": {"bio": null, "rank": 2.5},
            "any": [1, "x"]
        });
        let out = convert(&v, &rust().root_name("User")).unwrap().output;
        assert_eq!(out, indoc! {r#"
            use serde::{Deserialize, Serialize};

            #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
            pub struct user {
                #[serde(rename = "userId")]
                pub user_id: i64,
                pub r#type: String,
                pub tags: Vec<Option<String>>,
                pub profile: profile,
                pub any: Vec<serde_json::Value>,
            }

            #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
            pub struct profile {
                pub bio: serde_json::Value,
                pub rank: f64,
            }
        "#});
    }

    #[test]
    fn omitted_optionals_skip_serializing() {
        let v = json!([{"Id": 1, "Note": "x"}, {"Id": 2}]);
        let cfg = Config::new().target_language("rs").emit_optional_as_nullable(false);
        let out = convert(&v, &cfg).unwrap().output;
        assert_eq!(out, indoc! {r#"
            use serde::{Deserialize, Serialize};

            #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
            pub struct Root {
                pub Id: i64,
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub Note: Option<String>,
            }
        "#});
    }

    #[test]
    fn std_type_names_are_not_reused_for_structs() {
        let v = json!({"string": {"a": "x"}, "vec": {"b": [1]}});
        let out = convert(&v, &Config::new().target_language("rust")).unwrap().output;
        assert_eq!(out, indoc! {r#"
            use serde::{Deserialize, Serialize};

            #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
            pub struct Root {
                #[serde(rename = "string")]
                pub String: RootString,
                #[serde(rename = "vec")]
                pub Vec: RootVec,
            }

            #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
            pub struct RootString {
                #[serde(rename = "a")]
                pub A: String,
            }

            #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
            pub struct RootVec {
                #[serde(rename = "b")]
                pub B: Vec<i64>,
            }
        "#});
    }

    #[test]
    fn reserved_root_name_is_numbered() {
        let conv = convert(&json!({"a": 1}), &rust().root_name("String")).unwrap();
        assert!(conv.output.contains("pub struct string {"));
        let conv = convert(&json!({"a": 1}), &Config::new().target_language("rust").root_name("Option")).unwrap();
        assert!(conv.output.contains("pub struct Option2 {"));
        assert_eq!(conv.warnings[0].reason, crate::naming::WarningReason::Collision);
    }

    #[test]
    fn inline_is_rejected() {
        let cfg = rust().nested_type_style(NestedTypeStyle::Inline);
        let err = convert(&json!({}), &cfg).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedOption { language: "rust", .. }));
    }

    #[test]
    fn empty_object_and_scalar_roots() {
        let out = convert(&json!({}), &Config::new().target_language("rust")).unwrap().output;
        assert_eq!(out, indoc! {"
            use serde::{Deserialize, Serialize};

            #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
            pub struct Root {}
        "});
        let out = convert(&json!(3), &Config::new().target_language("rust")).unwrap().output;
        assert_eq!(out, "pub type Root = i64;\n");
    }
}
