//! Naming resolver: turns the anonymous type graph into declarations with
//! stable, unique, target-legal identifiers.
//!
//! Every object type reached through a field gets its own declaration named
//! after that field (no cross-path sharing unless `share_identical_types` is
//! set). Declarations are stored in depth-first discovery order, so the root
//! is first and every nested type follows the field that first referenced it.
pub mod case;

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::codegen::Backend;
use crate::config::NamingConvention;
use crate::ir::{ObjectType, PrimitiveKind, TypeNode};

// ------------------------------ Named graph ------------------------------- //

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamedType {
    Unknown,
    Primitive(PrimitiveKind),
    Object(DeclId),
    Array(Box<NamedType>),
    Nullable(Box<NamedType>),
    Union(Vec<NamedType>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedField {
    /// JSON key as observed.
    pub key: String,
    /// Identifier to emit.
    pub ident: String,
    pub ty: NamedType,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    /// Declaration whose field first referenced this one. `None` for the root.
    pub parent: Option<DeclId>,
    pub fields: Vec<NamedField>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedTypeGraph {
    /// Resolved identifier for the top-level type.
    pub root_name: String,
    pub root: NamedType,
    pub declarations: Vec<Declaration>,
}

impl NamedTypeGraph {
    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.declarations[id.0]
    }

    pub fn ids(&self) -> impl Iterator<Item = DeclId> + '_ {
        (0..self.declarations.len()).map(DeclId)
    }

    /// Declarations first referenced from `id`, in reference order.
    pub fn children(&self, id: DeclId) -> impl Iterator<Item = DeclId> + '_ {
        self.ids().filter(move |c| self.decl(*c).parent == Some(id))
    }

    /// The declaration carrying the root name, if the root (or the element
    /// of a root array) is an object.
    pub fn root_decl(&self) -> Option<DeclId> {
        fn find(t: &NamedType) -> Option<DeclId> {
            match t {
                NamedType::Object(id) => Some(*id),
                NamedType::Array(inner) | NamedType::Nullable(inner) => find(inner),
                NamedType::Union(arms) => arms.iter().find_map(find),
                NamedType::Unknown | NamedType::Primitive(_) => None,
            }
        }
        find(&self.root)
    }
}

// -------------------------------- Warnings -------------------------------- //

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningReason {
    IllegalCharacters,
    LeadingDigit,
    Keyword,
    Empty,
    Collision,
}

impl fmt::Display for WarningReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WarningReason::IllegalCharacters => "not a legal identifier",
            WarningReason::LeadingDigit => "starts with a digit",
            WarningReason::Keyword => "reserved keyword",
            WarningReason::Empty => "no identifier characters",
            WarningReason::Collision => "collides with a sibling field",
        })
    }
}

/// Non-fatal: the identifier was still produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamingWarning {
    pub original_key: String,
    pub sanitized_identifier: String,
    pub reason: WarningReason,
}

impl fmt::Display for NamingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "key {:?} emitted as `{}` ({})",
            self.original_key, self.sanitized_identifier, self.reason
        )
    }
}

// -------------------------------- Resolver -------------------------------- //

#[derive(Debug, Clone)]
pub struct Resolved {
    pub graph: NamedTypeGraph,
    pub warnings: Vec<NamingWarning>,
}

pub struct Resolver<'a> {
    convention: NamingConvention,
    backend: &'a dyn Backend,
    share_identical_types: bool,

    used_type_names: BTreeSet<String>,
    declarations: Vec<Declaration>,
    shared: Vec<(ObjectType, DeclId)>,
    warnings: Vec<NamingWarning>,
}

/// Resolve with default options.
pub fn resolve(
    root: &TypeNode,
    root_name: &str,
    convention: NamingConvention,
    backend: &dyn Backend,
) -> Resolved {
    Resolver::new(convention, backend).resolve(root, root_name)
}

impl<'a> Resolver<'a> {
    pub fn new(convention: NamingConvention, backend: &'a dyn Backend) -> Self {
        Self {
            convention,
            backend,
            share_identical_types: false,
            used_type_names: backend.reserved_type_names().iter().map(|n| n.to_string()).collect(),
            declarations: Vec::new(),
            shared: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn share_identical_types(mut self, value: bool) -> Self {
        self.share_identical_types = value;
        self
    }

    pub fn resolve(mut self, root: &TypeNode, root_name: &str) -> Resolved {
        let (mut name, mut reason) = self.sanitize(root_name, "root");
        if !self.used_type_names.insert(name.clone()) {
            name = self.numbered_type_name(&name);
            reason = Some(WarningReason::Collision);
        }
        if let Some(reason) = reason {
            self.warn(root_name, &name, reason);
        }

        let root_ty = self.name_type(root, root_name, None, Some(&name));
        Resolved {
            graph: NamedTypeGraph {
                root_name: name,
                root: root_ty,
                declarations: self.declarations,
            },
            warnings: self.warnings,
        }
    }

    /// `root_name` is `Some` until the first object on the root path claims it.
    fn name_type(
        &mut self,
        t: &TypeNode,
        key: &str,
        parent: Option<DeclId>,
        root_name: Option<&str>,
    ) -> NamedType {
        match t {
            TypeNode::Unknown => NamedType::Unknown,
            TypeNode::Primitive { of } => NamedType::Primitive(*of),
            TypeNode::Array { element } => {
                NamedType::Array(Box::new(self.name_type(element, key, parent, root_name)))
            }
            TypeNode::Nullable { inner } => {
                NamedType::Nullable(Box::new(self.name_type(inner, key, parent, root_name)))
            }
            TypeNode::Union { alternatives } => NamedType::Union(
                alternatives
                    .iter()
                    .map(|alt| self.name_type(alt, key, parent, root_name))
                    .collect(),
            ),
            TypeNode::Object(obj) => NamedType::Object(self.declare(obj, key, parent, root_name)),
        }
    }

    fn declare(
        &mut self,
        obj: &ObjectType,
        key: &str,
        parent: Option<DeclId>,
        root_name: Option<&str>,
    ) -> DeclId {
        if self.share_identical_types {
            if let Some((_, id)) = self.shared.iter().find(|(o, _)| o == obj) {
                return *id;
            }
        }

        let name = match root_name {
            Some(name) => name.to_string(),
            None => self.type_name(key, parent),
        };
        let id = DeclId(self.declarations.len());
        self.declarations.push(Declaration { name, parent, fields: Vec::new() });
        if self.share_identical_types {
            self.shared.push((obj.clone(), id));
        }

        let fields = self.name_fields(obj, id);
        self.declarations[id.0].fields = fields;
        id
    }

    fn name_fields(&mut self, obj: &ObjectType, owner: DeclId) -> Vec<NamedField> {
        let candidates: Vec<(String, Option<WarningReason>)> =
            obj.fields.iter().map(|f| self.sanitize(&f.key, "field")).collect();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for (ident, _) in &candidates {
            *counts.entry(ident.as_str()).or_default() += 1;
        }
        // e.g. C# members may not be named like their enclosing type
        let owner_name = self.declarations[owner.0].name.clone();
        let reserve_owner = !self.backend.member_may_share_type_name();

        let mut taken: HashSet<String> = candidates.iter().map(|(i, _)| i.clone()).collect();
        let mut claimed: HashSet<&str> = HashSet::new();
        if reserve_owner {
            claimed.insert(owner_name.as_str());
            taken.insert(owner_name.clone());
        }

        let mut out = Vec::with_capacity(obj.fields.len());
        for (field, (ident, reason)) in obj.fields.iter().zip(&candidates) {
            let collides = counts[ident.as_str()] > 1 || (reserve_owner && *ident == owner_name);
            let ident = if claimed.insert(ident.as_str()) {
                ident.clone()
            } else {
                let mut n = 2;
                loop {
                    let next = self.convention.with_counter(ident, n);
                    if taken.insert(next.clone()) {
                        break next;
                    }
                    n += 1;
                }
            };
            let reason = if collides { Some(WarningReason::Collision) } else { *reason };
            if let Some(reason) = reason {
                self.warn(&field.key, &ident, reason);
            }

            let ty = self.name_type(&field.ty, &field.key, Some(owner), None);
            out.push(NamedField { key: field.key.clone(), ident, ty, optional: field.optional });
        }
        out
    }

    /// Candidate from the key, then parent-prefixed, then numbered.
    fn type_name(&mut self, key: &str, parent: Option<DeclId>) -> String {
        let (base, _) = self.sanitize(key, "type");
        if self.used_type_names.insert(base.clone()) {
            return base;
        }
        if let Some(parent) = parent {
            let prefixed = format!("{} {}", self.declarations[parent.0].name, key);
            let (prefixed, _) = self.sanitize(&prefixed, "type");
            if self.used_type_names.insert(prefixed.clone()) {
                return prefixed;
            }
        }
        self.numbered_type_name(&base)
    }

    fn numbered_type_name(&mut self, base: &str) -> String {
        let mut n = 2;
        loop {
            let next = self.convention.with_counter(base, n);
            if self.used_type_names.insert(next.clone()) {
                return next;
            }
            n += 1;
        }
    }

    fn sanitize(&self, raw: &str, fallback: &str) -> (String, Option<WarningReason>) {
        let mut reason = None;
        if !case::is_identifier_legal(raw) {
            reason = Some(WarningReason::IllegalCharacters);
        }

        let mut ident = self.convention.apply(raw);
        if ident.is_empty() {
            ident = self.convention.apply(fallback);
            reason = Some(WarningReason::Empty);
        }
        if ident.starts_with(|c: char| c.is_numeric()) {
            ident = format!("{}{}", self.convention.digit_prefix(), ident);
            reason = Some(WarningReason::LeadingDigit);
        }
        if let Some(escaped) = self.backend.escape_keyword(&ident) {
            ident = escaped;
            reason = Some(WarningReason::Keyword);
        }
        (ident, reason)
    }

    fn warn(&mut self, key: &str, ident: &str, reason: WarningReason) {
        let warning = NamingWarning {
            original_key: key.to_string(),
            sanitized_identifier: ident.to_string(),
            reason,
        };
        tracing::warn!(key = %warning.original_key, ident = %warning.sanitized_identifier, "{}", warning.reason);
        self.warnings.push(warning);
    }
}

// ------------------------------- Tests ------------------------------------ //
