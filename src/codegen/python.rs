//! Python dataclasses.
//!
//! Hoisted classes follow depth-first discovery order with the root class
//! last; annotations are lazy (`from __future__ import annotations`), so a
//! class may name one defined further down. Inline style nests classes and
//! refers to them by their dotted path.

use crate::config::{Config, NamingConvention, NestedTypeStyle};
use crate::ir::PrimitiveKind;
use crate::naming::{DeclId, NamedType, NamedTypeGraph};

use super::{indent, top_level, Backend};

const INDENT: usize = 4;

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Builtins and imported names the rendered module refers to.
const RESERVED_TYPES: &[&str] = &[
    "Any", "None", "int", "float", "str", "bool", "list", "dataclass", "annotations",
];

pub struct Python;

impl Backend for Python {
    fn name(&self) -> &'static str {
        "python"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["py"]
    }

    fn escape_keyword(&self, ident: &str) -> Option<String> {
        KEYWORDS.contains(&ident).then(|| format!("{ident}_"))
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
    inline: bool,
    convention: NamingConvention,
    out: String,
}

impl<'g> Codegen<'g> {
    fn new(graph: &'g NamedTypeGraph, config: &Config) -> Self {
        Self {
            graph,
            inline: config.nested_type_style == NestedTypeStyle::Inline,
            convention: config.naming_convention,
            out: String::new(),
        }
    }

    fn emit(&mut self) {
        let mut blocks = Vec::new();
        let root = self.graph.root_decl();
        let mut ids: Vec<DeclId> =
            top_level(self.graph, self.inline).into_iter().filter(|id| Some(*id) != root).collect();
        ids.extend(root);
        for id in ids {
            blocks.push(self.class(id, 0));
        }
        if super::needs_root_alias(self.graph) {
            blocks.push(format!("{} = {}", self.graph.root_name, self.ty(&self.graph.root)));
        }

        let mut imports = vec!["from __future__ import annotations".to_string()];
        let mut typing = Vec::new();
        if !self.graph.declarations.is_empty() {
            typing.push("from dataclasses import dataclass");
        }
        if super::graph_mentions(self.graph, &|t| matches!(t, NamedType::Unknown)) {
            typing.push("from typing import Any");
        }
        if !typing.is_empty() {
            imports.push(typing.join("\n"));
        }

        self.out = format!("{}\n\n\n{}", imports.join("\n\n"), blocks.join("\n\n\n"));
    }

    fn into_string(mut self) -> String {
        self.out.push('\n');
        self.out
    }

    fn class_name(&self, id: DeclId) -> String {
        if self.inline {
            super::nested_type_name(self.graph, id, self.convention)
        } else {
            self.graph.decl(id).name.clone()
        }
    }

    /// Dotted path from the outermost class when nested.
    fn reference(&self, id: DeclId) -> String {
        if !self.inline {
            return self.class_name(id);
        }
        let mut path = vec![self.class_name(id)];
        let mut cursor = self.graph.decl(id).parent;
        while let Some(parent) = cursor {
            path.push(self.class_name(parent));
            cursor = self.graph.decl(parent).parent;
        }
        path.reverse();
        path.join(".")
    }

    fn class(&self, id: DeclId, depth: usize) -> String {
        let pad = indent(depth, INDENT);
        let inner = indent(depth + 1, INDENT);
        let decl = self.graph.decl(id);

        let mut s = format!("{pad}@dataclass(kw_only=True)\n{pad}class {}:\n", self.class_name(id));
        let mut sections = Vec::new();
        if self.inline {
            for child in self.graph.children(id) {
                sections.push(self.class(child, depth + 1));
            }
        }
        let fields: Vec<String> = decl
            .fields
            .iter()
            .map(|f| {
                let ty = self.ty(&f.ty);
                if f.optional {
                    let ty = if matches!(f.ty, NamedType::Primitive(PrimitiveKind::Null)) {
                        ty
                    } else {
                        format!("{ty} | None")
                    };
                    format!("{inner}{}: {} = None", f.ident, ty)
                } else {
                    format!("{inner}{}: {}", f.ident, ty)
                }
            })
            .collect();
        if !fields.is_empty() {
            sections.push(fields.join("\n"));
        }
        if sections.is_empty() {
            sections.push(format!("{inner}pass"));
        }
        s.push_str(&sections.join("\n\n"));
        s
    }

    fn ty(&self, t: &NamedType) -> String {
        match t {
            NamedType::Unknown => "Any".to_string(),
            NamedType::Primitive(kind) => match kind {
                PrimitiveKind::Null => "None",
                PrimitiveKind::Bool => "bool",
                PrimitiveKind::Integer => "int",
                PrimitiveKind::Float => "float",
                PrimitiveKind::String => "str",
            }
            .to_string(),
            NamedType::Object(id) => self.reference(*id),
            NamedType::Array(inner) => format!("list[{}]", self.ty(inner)),
            NamedType::Nullable(inner) => format!("{} | None", self.ty(inner)),
            NamedType::Union(arms) => arms.iter().map(|a| self.ty(a)).collect::<Vec<_>>().join(" | "),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{Config, NamingConvention, NestedTypeStyle};
    use crate::driver::convert;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn py() -> Config {
        Config::new()
            .target_language("python")
            .naming_convention(NamingConvention::SnakeCase)
            .root_name("Root")
    }

    #[test]
    fn hoisted_dependencies_first() {
        let v = json!({
            "userName": "ada",
            "from": "x",
            "address": {"city": "c", "lines": []},
            "tags": [1, "a"]
        });
        let out = convert(&v, &py()).unwrap().output;
        assert_eq!(out, indoc! {"
            from __future__ import annotations

            from dataclasses import dataclass
            from typing import Any


            @dataclass(kw_only=True)
            class address:
                city: str
                lines: list[Any]


            @dataclass(kw_only=True)
            class root:
                user_name: str
                from_: str
                address: address
                tags: list[int | str]
        "});
    }

    #[test]
    fn sibling_classes_keep_discovery_order() {
        let v = json!({"a": {"x": {"k": 1}}, "b": {"y": 1}});
        let cfg = Config::new().target_language("python");
        let out = convert(&v, &cfg).unwrap().output;
        assert_eq!(out, indoc! {"
            from __future__ import annotations

            from dataclasses import dataclass


            @dataclass(kw_only=True)
            class A:
                X: X


            @dataclass(kw_only=True)
            class X:
                K: int


            @dataclass(kw_only=True)
            class B:
                Y: int


            @dataclass(kw_only=True)
            class Root:
                A: A
                B: B
        "});
    }

    #[test]
    fn builtin_names_are_not_reused_for_classes() {
        let v = json!({"any": {"a": 1}, "tags": {"b": []}});
        let out = convert(&v, &Config::new().target_language("python")).unwrap().output;
        assert_eq!(out, indoc! {"
            from __future__ import annotations

            from dataclasses import dataclass
            from typing import Any


            @dataclass(kw_only=True)
            class RootAny:
                A: int


            @dataclass(kw_only=True)
            class Tags:
                B: list[Any]


            @dataclass(kw_only=True)
            class Root:
                Any: RootAny
                Tags: Tags
        "});

        let out = convert(&json!({"list": {"b": 1}}), &py()).unwrap().output;
        assert!(out.contains("class root_list:"));
        assert!(out.contains("    list: root_list"));
    }

    #[test]
    fn optional_fields_default_to_none() {
        let v = json!([{"a": 1, "b": 2.5}, {"a": null}]);
        let out = convert(&v, &py()).unwrap().output;
        assert_eq!(out, indoc! {"
            from __future__ import annotations

            from dataclasses import dataclass


            @dataclass(kw_only=True)
            class root:
                a: int | None = None
                b: float | None = None
        "});
    }

    #[test]
    fn inline_nested_classes_use_dotted_paths() {
        let v = json!({"Geo": {"Lat": 1.5}, "Empty": {}});
        let cfg = Config::new().target_language("py").nested_type_style(NestedTypeStyle::Inline);
        let out = convert(&v, &cfg).unwrap().output;
        assert_eq!(out, indoc! {"
            from __future__ import annotations

            from dataclasses import dataclass


            @dataclass(kw_only=True)
            class Root:
                @dataclass(kw_only=True)
                class GeoType:
                    Lat: float

                @dataclass(kw_only=True)
                class EmptyType:
                    pass

                Geo: Root.GeoType
                Empty: Root.EmptyType
        "});
    }

    #[test]
    fn scalar_root_is_an_alias() {
        let out = convert(&json!(["a", null]), &py()).unwrap().output;
        assert_eq!(out, indoc! {"
            from __future__ import annotations


            root = list[str | None]
        "});
    }
}
