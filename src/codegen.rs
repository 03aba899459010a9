//! Backend registry: one renderer per target language.
//!
//! The table is built once on first use and never mutated, so concurrent
//! conversions can share it freely.
pub mod csharp;
pub mod python;
pub mod rust;
pub mod typescript;

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::config::{Config, NamingConvention};
use crate::error::ConfigError;
use crate::naming::{DeclId, NamedType, NamedTypeGraph};

pub trait Backend: Send + Sync {
    /// Canonical registry key.
    fn name(&self) -> &'static str;

    /// Extra registry keys.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Reject options this target cannot honor. Runs before any traversal.
    fn validate(&self, _config: &Config) -> Result<(), ConfigError> {
        Ok(())
    }

    /// `Some(escaped)` if `ident` is reserved in this language.
    fn escape_keyword(&self, ident: &str) -> Option<String>;

    /// Names the rendered output already uses for its own types or imports.
    /// Generated declarations never take one of these.
    fn reserved_type_names(&self) -> &'static [&'static str] {
        &[]
    }

    /// False if a member may not be named like its enclosing type.
    fn member_may_share_type_name(&self) -> bool {
        true
    }

    fn render(&self, graph: &NamedTypeGraph, config: &Config) -> String;
}

static BACKENDS: [&(dyn Backend); 4] = [
    &csharp::CSharp,
    &typescript::TypeScript,
    &python::Python,
    &rust::Rust,
];

static REGISTRY: Lazy<BTreeMap<&'static str, &'static dyn Backend>> = Lazy::new(|| {
    let mut table = BTreeMap::new();
    for backend in BACKENDS {
        table.insert(backend.name(), backend);
        for alias in backend.aliases() {
            table.insert(*alias, backend);
        }
    }
    table
});

/// All registered backends, in registration order.
pub fn backends() -> &'static [&'static dyn Backend] {
    &BACKENDS
}

/// Case-insensitive lookup by name or alias.
pub fn lookup(name: &str) -> Result<&'static dyn Backend, ConfigError> {
    let key = name.trim().to_ascii_lowercase();
    REGISTRY.get(key.as_str()).copied().ok_or_else(|| ConfigError::UnknownTargetLanguage {
        name: name.to_string(),
        known: BACKENDS.iter().map(|b| b.name()).collect::<Vec<_>>().join(", "),
    })
}

// ------------------------------ Shared helpers ---------------------------- //

pub(crate) fn indent(level: usize, width: usize) -> String {
    " ".repeat(level * width)
}

/// Declarations that get a top-level declaration: all of them when hoisted,
/// only parentless ones when nested types are inlined.
pub(crate) fn top_level(graph: &NamedTypeGraph, inline: bool) -> Vec<DeclId> {
    graph
        .ids()
        .filter(|id| !inline || graph.decl(*id).parent.is_none())
        .collect()
}

/// Name of a declaration nested inside its parent. A nested type may not
/// share a name with a member of the enclosing type, so such names get a
/// `Type` suffix (`Address` → `AddressType`).
pub(crate) fn nested_type_name(graph: &NamedTypeGraph, id: DeclId, convention: NamingConvention) -> String {
    let decl = graph.decl(id);
    let Some(parent) = decl.parent else {
        return decl.name.clone();
    };
    if graph.decl(parent).fields.iter().any(|f| f.ident == decl.name) {
        let mut words = crate::naming::case::split_words(&decl.name);
        words.push("type".to_string());
        convention.join(&words)
    } else {
        decl.name.clone()
    }
}

/// True if the graph needs a root alias (root is not an object declaration).
pub(crate) fn needs_root_alias(graph: &NamedTypeGraph) -> bool {
    graph.root_decl().is_none()
}

pub(crate) fn mentions(t: &NamedType, pred: &dyn Fn(&NamedType) -> bool) -> bool {
    if pred(t) {
        return true;
    }
    match t {
        NamedType::Array(inner) | NamedType::Nullable(inner) => mentions(inner, pred),
        NamedType::Union(arms) => arms.iter().any(|a| mentions(a, pred)),
        NamedType::Unknown | NamedType::Primitive(_) | NamedType::Object(_) => false,
    }
}

/// True if `pred` matches the root type or any field type in the graph.
pub(crate) fn graph_mentions(graph: &NamedTypeGraph, pred: &dyn Fn(&NamedType) -> bool) -> bool {
    mentions(&graph.root, pred)
        || graph
            .declarations
            .iter()
            .flat_map(|d| &d.fields)
            .any(|f| mentions(&f.ty, pred))
}
