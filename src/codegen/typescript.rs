//! TypeScript interfaces. Unions are native; inline style spells nested
//! objects out as object literal types.

use crate::config::{Config, NestedTypeStyle};
use crate::ir::PrimitiveKind;
use crate::naming::{DeclId, NamedType, NamedTypeGraph};

use super::{indent, top_level, Backend};

const INDENT: usize = 2;

const RESERVED: &[&str] = &[
    "any", "boolean", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for",
    "function", "if", "import", "in", "instanceof", "never", "new", "null", "number", "object",
    "return", "string", "super", "switch", "symbol", "this", "throw", "true", "try", "typeof",
    "undefined", "unknown", "var", "void", "while", "with",
];

pub struct TypeScript;

impl Backend for TypeScript {
    fn name(&self) -> &'static str {
        "typescript"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["ts"]
    }

    fn escape_keyword(&self, ident: &str) -> Option<String> {
        RESERVED.contains(&ident).then(|| format!("{ident}_"))
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
    nullable_optionals: bool,
    out: String,
}

impl<'g> Codegen<'g> {
    fn new(graph: &'g NamedTypeGraph, config: &Config) -> Self {
        Self {
            graph,
            inline: config.nested_type_style == NestedTypeStyle::Inline,
            nullable_optionals: config.emit_optional_as_nullable,
            out: String::new(),
        }
    }

    fn emit(&mut self) {
        let mut blocks = Vec::new();
        for id in top_level(self.graph, self.inline) {
            blocks.push(self.interface(id));
        }
        if super::needs_root_alias(self.graph) {
            let body = self.ty(&self.graph.root, 0);
            blocks.push(format!("export type {} = {};", self.graph.root_name, body));
        }
        self.out = blocks.join("\n\n");
    }

    fn into_string(mut self) -> String {
        self.out.push('\n');
        self.out
    }

    fn interface(&self, id: DeclId) -> String {
        format!("export interface {} {}", self.graph.decl(id).name, self.body(id, 0))
    }

    /// `{ ... }` with fields one level deeper than `depth`.
    fn body(&self, id: DeclId, depth: usize) -> String {
        let decl = self.graph.decl(id);
        let mut s = String::from("{\n");
        for field in &decl.fields {
            let mut ty = self.ty(&field.ty, depth + 1);
            let marker = match (field.optional, self.nullable_optionals) {
                (true, false) => "?",
                (true, true) => {
                    if !matches!(field.ty, NamedType::Primitive(PrimitiveKind::Null)) {
                        ty.push_str(" | null");
                    }
                    ""
                }
                (false, _) => "",
            };
            s.push_str(&format!("{}{}{}: {};\n", indent(depth + 1, INDENT), field.ident, marker, ty));
        }
        s.push_str(&indent(depth, INDENT));
        s.push('}');
        s
    }

    fn ty(&self, t: &NamedType, depth: usize) -> String {
        match t {
            NamedType::Unknown => "unknown".to_string(),
            NamedType::Primitive(kind) => match kind {
                PrimitiveKind::Null => "null",
                PrimitiveKind::Bool => "boolean",
                PrimitiveKind::Integer | PrimitiveKind::Float => "number",
                PrimitiveKind::String => "string",
            }
            .to_string(),
            NamedType::Object(id) if self.inline => self.body(*id, depth),
            NamedType::Object(id) => self.graph.decl(*id).name.clone(),
            NamedType::Array(inner) => match inner.as_ref() {
                NamedType::Union(_) | NamedType::Nullable(_) => format!("({})[]", self.ty(inner, depth)),
                _ => format!("{}[]", self.ty(inner, depth)),
            },
            NamedType::Nullable(inner) => format!("{} | null", self.ty(inner, depth)),
            NamedType::Union(arms) => arms
                .iter()
                .map(|a| self.ty(a, depth))
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }
}
