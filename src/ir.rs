//! Inferred type graph. No serde_json::Value here.
//!
//! Nodes are built bottom-up by `inference` and never mutated afterwards;
//! `inference::unify` always returns a fresh node.
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PrimitiveKind {
    Null,
    Bool,
    Integer,
    Float,
    String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeNode {
    /// No samples observed (empty array).
    Unknown,
    Primitive { of: PrimitiveKind },
    Object(ObjectType),
    Array { element: Box<TypeNode> },
    /// Slot-level null marker. Never wraps `Unknown`, `Null` or another `Nullable`.
    Nullable { inner: Box<TypeNode> },
    /// At most one arm per `Family`, ordered by family rank.
    Union { alternatives: Vec<TypeNode> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObjectType {
    pub fields: Vec<Field>, // first-observed order, keys unique
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub key: String,
    #[serde(rename = "type")]
    pub ty: TypeNode,
    pub optional: bool, // absent in some sibling, or null next to non-null
}

/// Union arms are bucketed by family so that numeric widening and object
/// merging still apply inside a union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Family {
    Array,
    Object,
    Number,
    String,
    Bool,
}

impl TypeNode {
    pub fn primitive(of: PrimitiveKind) -> Self {
        TypeNode::Primitive { of }
    }
    pub fn null() -> Self {
        Self::primitive(PrimitiveKind::Null)
    }
    pub fn array(element: TypeNode) -> Self {
        TypeNode::Array { element: Box::new(element) }
    }
    pub fn nullable(inner: TypeNode) -> Self {
        match inner {
            TypeNode::Unknown
            | TypeNode::Primitive { of: PrimitiveKind::Null }
            | TypeNode::Nullable { .. } => inner,
            other => TypeNode::Nullable { inner: Box::new(other) },
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TypeNode::Primitive { of: PrimitiveKind::Null })
    }

    /// `None` for nodes that never enter a union (`Unknown`, `Null`, `Nullable`, `Union`).
    pub fn family(&self) -> Option<Family> {
        match self {
            TypeNode::Array { .. } => Some(Family::Array),
            TypeNode::Object(_) => Some(Family::Object),
            TypeNode::Primitive { of } => match of {
                PrimitiveKind::Integer | PrimitiveKind::Float => Some(Family::Number),
                PrimitiveKind::String => Some(Family::String),
                PrimitiveKind::Bool => Some(Family::Bool),
                PrimitiveKind::Null => None,
            },
            TypeNode::Unknown | TypeNode::Nullable { .. } | TypeNode::Union { .. } => None,
        }
    }
}

impl ObjectType {
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }
}
