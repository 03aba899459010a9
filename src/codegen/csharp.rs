//! C# classes, records or structs (System.Text.Json attributes).
//!
//! C# has no union type, so unions, unknowns and bare nulls fall back to
//! `object`. Optional members are always nullable; there is no separate
//! "omitted member" form.

use crate::config::{Config, DeclarationKind, NamingConvention, NestedTypeStyle};
use crate::ir::PrimitiveKind;
use crate::naming::{DeclId, NamedField, NamedType, NamedTypeGraph};

use super::{indent, top_level, Backend};

const INDENT: usize = 4;

const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

pub struct CSharp;

impl Backend for CSharp {
    fn name(&self) -> &'static str {
        "csharp"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["cs", "c#"]
    }

    fn escape_keyword(&self, ident: &str) -> Option<String> {
        KEYWORDS.contains(&ident).then(|| format!("@{ident}"))
    }

    fn reserved_type_names(&self) -> &'static [&'static str] {
        &["List", "JsonPropertyName"]
    }

    fn member_may_share_type_name(&self) -> bool {
        false
    }

    fn render(&self, graph: &NamedTypeGraph, config: &Config) -> String {
        let mut cg = Codegen::new(graph, config);
        cg.emit();
        cg.into_string()
    }
}

struct Codegen<'g> {
    graph: &'g NamedTypeGraph,
    inline: bool,
    convention: NamingConvention,
    kind: DeclarationKind,
    uses_attributes: bool,
    uses_lists: bool,
    out: String,
}

impl<'g> Codegen<'g> {
    fn new(graph: &'g NamedTypeGraph, config: &Config) -> Self {
        Self {
            graph,
            inline: config.nested_type_style == NestedTypeStyle::Inline,
            convention: config.naming_convention,
            kind: config.declaration_kind,
            uses_attributes: false,
            uses_lists: false,
            out: String::new(),
        }
    }

    fn emit(&mut self) {
        let mut blocks = Vec::new();
        for id in top_level(self.graph, self.inline) {
            blocks.push(self.declaration(id, 0));
        }
        let graph = self.graph;
        if super::needs_root_alias(graph) {
            let ty = self.ty(&graph.root);
            blocks.push(format!("// {}: {}", graph.root_name, ty));
        }

        let mut usings = Vec::new();
        if self.uses_lists {
            usings.push("using System.Collections.Generic;");
        }
        if self.uses_attributes {
            usings.push("using System.Text.Json.Serialization;");
        }
        if !usings.is_empty() {
            blocks.insert(0, usings.join("\n"));
        }
        self.out = blocks.join("\n\n");
    }

    fn into_string(mut self) -> String {
        self.out.push('\n');
        self.out
    }

    fn keyword(&self) -> &'static str {
        match self.kind {
            DeclarationKind::Class => "class",
            DeclarationKind::Record => "record",
            DeclarationKind::Struct => "struct",
        }
    }

    fn type_name(&self, id: DeclId) -> String {
        if self.inline {
            super::nested_type_name(self.graph, id, self.convention)
        } else {
            self.graph.decl(id).name.clone()
        }
    }

    fn nested(&self, id: DeclId) -> Vec<DeclId> {
        if self.inline { self.graph.children(id).collect() } else { Vec::new() }
    }

    fn declaration(&mut self, id: DeclId, depth: usize) -> String {
        match self.kind {
            DeclarationKind::Record => self.record(id, depth),
            DeclarationKind::Class | DeclarationKind::Struct => self.class(id, depth),
        }
    }

    fn class(&mut self, id: DeclId, depth: usize) -> String {
        let pad = indent(depth, INDENT);
        let inner = indent(depth + 1, INDENT);
        let graph = self.graph;
        let decl = graph.decl(id);

        let mut s = format!("{pad}public {} {}\n{pad}{{\n", self.keyword(), self.type_name(id));
        let mut members = Vec::new();
        for child in self.nested(id) {
            members.push(self.declaration(child, depth + 1));
        }
        for field in &decl.fields {
            let mut m = String::new();
            if let Some(attr) = self.attribute(field) {
                m.push_str(&format!("{inner}{attr}\n"));
            }
            m.push_str(&format!("{inner}public {} {} {{ get; set; }}", self.field_ty(field), field.ident));
            members.push(m);
        }
        // nested types are separated by a blank line, properties are not
        let nested_count = members.len() - decl.fields.len();
        for (i, m) in members.iter().enumerate() {
            if i > 0 {
                s.push('\n');
                if i <= nested_count {
                    s.push('\n');
                }
            }
            s.push_str(m);
        }
        if !members.is_empty() {
            s.push('\n');
        }
        s.push_str(&format!("{pad}}}"));
        s
    }

    fn record(&mut self, id: DeclId, depth: usize) -> String {
        let pad = indent(depth, INDENT);
        let inner = indent(depth + 1, INDENT);
        let graph = self.graph;
        let decl = graph.decl(id);

        let mut params = Vec::new();
        for field in &decl.fields {
            let attr = match self.attribute(field) {
                Some(attr) => format!("[property: {}] ", &attr[1..attr.len() - 1]),
                None => String::new(),
            };
            params.push(format!("{inner}{attr}{} {}", self.field_ty(field), field.ident));
        }
        let mut s = format!("{pad}public record {}(", self.type_name(id));
        if !params.is_empty() {
            s.push('\n');
            s.push_str(&params.join(",\n"));
            s.push('\n');
            s.push_str(&pad);
        }
        s.push(')');

        let nested = self.nested(id);
        if nested.is_empty() {
            s.push(';');
            return s;
        }
        s.push_str(&format!("\n{pad}{{\n"));
        let bodies: Vec<String> = nested.into_iter().map(|c| self.declaration(c, depth + 1)).collect();
        s.push_str(&bodies.join("\n\n"));
        s.push_str(&format!("\n{pad}}}"));
        s
    }

    /// `[JsonPropertyName("key")]` when the identifier does not spell the key.
    fn attribute(&mut self, field: &NamedField) -> Option<String> {
        if field.ident.trim_start_matches('@') == field.key {
            return None;
        }
        self.uses_attributes = true;
        Some(format!("[JsonPropertyName({})]", string_literal(&field.key)))
    }

    fn field_ty(&mut self, field: &NamedField) -> String {
        let ty = self.ty(&field.ty);
        if field.optional { nullable(ty) } else { ty }
    }

    fn ty(&mut self, t: &NamedType) -> String {
        match t {
            NamedType::Unknown | NamedType::Union(_) => "object".to_string(),
            NamedType::Primitive(kind) => match kind {
                PrimitiveKind::Null => "object?",
                PrimitiveKind::Bool => "bool",
                PrimitiveKind::Integer => "long",
                PrimitiveKind::Float => "double",
                PrimitiveKind::String => "string",
            }
            .to_string(),
            NamedType::Object(id) => self.type_name(*id),
            NamedType::Array(inner) => {
                self.uses_lists = true;
                format!("List<{}>", self.ty(inner))
            }
            NamedType::Nullable(inner) => {
                let inner = self.ty(inner);
                nullable(inner)
            }
        }
    }
}

fn nullable(ty: String) -> String {
    if ty.ends_with('?') { ty } else { format!("{ty}?") }
}

/// Regular C# string literal.
fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use crate::config::{Config, DeclarationKind, NamingConvention, NestedTypeStyle};
    use crate::driver::convert;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn hoisted_classes() {
        let v = json!({
            "id": 1,
            "first name": "Ada",
            "scores": [1, 2.5],
            "address": {"city": "x", "zip": null}
        });
        let out = convert(&v, &Config::new()).unwrap().output;
        assert_eq!(out, indoc! {r#"
            using System.Collections.Generic;
            using System.Text.Json.Serialization;

            public class Root
            {
                [JsonPropertyName("id")]
                public long Id { get; set; }
                [JsonPropertyName("first name")]
                public string FirstName { get; set; }
                [JsonPropertyName("scores")]
                public List<double> Scores { get; set; }
                [JsonPropertyName("address")]
                public Address Address { get; set; }
            }

            public class Address
            {
                [JsonPropertyName("city")]
                public string City { get; set; }
                [JsonPropertyName("zip")]
                public object? Zip { get; set; }
            }
        "#});
    }

    #[test]
    fn records_inline() {
        let v = json!([{"Name": "a", "Geo": {"Lat": 1.0}}, {"Name": "b"}]);
        let cfg = Config::new()
            .declaration_kind(DeclarationKind::Record)
            .nested_type_style(NestedTypeStyle::Inline);
        let out = convert(&v, &cfg).unwrap().output;
        assert_eq!(out, indoc! {"
            public record Root(
                string Name,
                GeoType? Geo
            )
            {
                public record GeoType(
                    double Lat
                );
            }
        "});
    }

    #[test]
    fn nested_classes_inline() {
        let v = json!({"Id": 1, "Meta": {"Tags": ["x", null]}});
        let cfg = Config::new().declaration_kind(DeclarationKind::Struct).nested_type_style(NestedTypeStyle::Inline);
        let out = convert(&v, &cfg).unwrap().output;
        assert_eq!(out, indoc! {"
            using System.Collections.Generic;

            public struct Root
            {
                public struct MetaType
                {
                    public List<string?> Tags { get; set; }
                }

                public long Id { get; set; }
                public MetaType Meta { get; set; }
            }
        "});
    }

    #[test]
    fn unions_fall_back_to_object() {
        let v = json!({"Mixed": [1, "x"], "Any": [], "Maybe": [1, "x", null]});
        let out = convert(&v, &Config::new()).unwrap().output;
        assert_eq!(out, indoc! {"
            using System.Collections.Generic;

            public class Root
            {
                public List<object> Mixed { get; set; }
                public List<object> Any { get; set; }
                public List<object?> Maybe { get; set; }
            }
        "});
    }

    #[test]
    fn member_named_like_its_class_is_numbered() {
        let conv = convert(&json!({"item": {"item": 1, "id": 2}}), &Config::new()).unwrap();
        assert_eq!(conv.output, indoc! {r#"
            using System.Text.Json.Serialization;

            public class Root
            {
                [JsonPropertyName("item")]
                public Item Item { get; set; }
            }

            public class Item
            {
                [JsonPropertyName("item")]
                public long Item2 { get; set; }
                [JsonPropertyName("id")]
                public long Id { get; set; }
            }
        "#});
        assert_eq!(conv.warnings.len(), 1);
        assert_eq!(conv.warnings[0].original_key, "item");
        assert_eq!(conv.warnings[0].sanitized_identifier, "Item2");
        assert_eq!(conv.warnings[0].reason, crate::naming::WarningReason::Collision);
    }

    #[test]
    fn property_names_are_csharp_string_literals() {
        let out = convert(&json!({"a\u{1}b": 1, "say \"hi\"\\": 2}), &Config::new()).unwrap().output;
        assert!(out.contains(r#"[JsonPropertyName("a\u0001b")]"#), "{out}");
        assert!(out.contains(r#"[JsonPropertyName("say \"hi\"\\")]"#), "{out}");
    }

    #[test]
    fn primitive_root_is_a_comment() {
        let out = convert(&json!("text"), &Config::new()).unwrap().output;
        assert_eq!(out, "// Root: string\n");
    }
}
