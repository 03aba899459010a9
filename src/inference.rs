//! Type graph builder and unification.
//!
//! Walk JSON samples, build one `TypeNode` per sample, and fold them together
//! with `unify` into the least type that represents every sample.
//!
//! Design goals:
//! - Unify is associative and commutative; only object field order depends
//!   on the order samples were seen (first-seen wins).
//! - Null never becomes a union arm; it marks the slot (`Nullable`) or the
//!   field (`optional`).
//! - Union is the last resort, one arm per kind family.
pub mod num;
pub mod obj;
pub mod arr;
pub mod union;

use serde_json::{Map, Value};

use crate::ir::{Field, ObjectType, TypeNode};

// ------------------------------ Build ------------------------------------ //

pub fn build(v: &Value) -> TypeNode {
    match v {
        Value::Null => TypeNode::null(),
        Value::Bool(_) => TypeNode::primitive(crate::ir::PrimitiveKind::Bool),
        Value::Number(n) => TypeNode::primitive(num::kind_of(n)),
        Value::String(_) => TypeNode::primitive(crate::ir::PrimitiveKind::String),
        Value::Array(xs) => build_array(xs),
        Value::Object(m) => build_object(m),
    }
}

fn build_array(xs: &[Value]) -> TypeNode {
    let mut element = TypeNode::Unknown;
    for el in xs {
        element = unify(&element, &build(el));
    }
    TypeNode::array(element)
}

fn build_object(map: &Map<String, Value>) -> TypeNode {
    let fields = map
        .iter()
        .map(|(k, v)| Field { key: k.clone(), ty: build(v), optional: false })
        .collect();
    TypeNode::Object(ObjectType { fields })
}

// ------------------------------ Unify ------------------------------------ //

pub fn unify(a: &TypeNode, b: &TypeNode) -> TypeNode {
    match (a, b) {
        (TypeNode::Unknown, x) | (x, TypeNode::Unknown) => return x.clone(),
        _ => {}
    }

    let (a_core, a_null) = split_nullable(a);
    let (b_core, b_null) = split_nullable(b);

    let core = match (a_core, b_core) {
        (None, None) => return TypeNode::null(),
        (Some(x), None) | (None, Some(x)) => x.clone(),
        (Some(x), Some(y)) => unify_core(x, y),
    };

    if a_null || b_null { TypeNode::nullable(core) } else { core }
}

/// `Null` → (None, true); `Nullable(x)` → (x, true); `x` → (x, false).
fn split_nullable(t: &TypeNode) -> (Option<&TypeNode>, bool) {
    match t {
        TypeNode::Nullable { inner } => (Some(inner.as_ref()), true),
        t if t.is_null() => (None, true),
        t => (Some(t), false),
    }
}

/// Both sides are non-null, non-unknown cores.
fn unify_core(a: &TypeNode, b: &TypeNode) -> TypeNode {
    match (a, b) {
        (TypeNode::Primitive { of: x }, TypeNode::Primitive { of: y }) => {
            match num::widen(*x, *y) {
                Some(kind) => TypeNode::primitive(kind),
                None => union::union_of(a, b),
            }
        }
        (TypeNode::Object(x), TypeNode::Object(y)) => TypeNode::Object(obj::merge(x, y)),
        (TypeNode::Array { element: x }, TypeNode::Array { element: y }) => arr::merge(x, y),
        _ => union::union_of(a, b),
    }
}

// ------------------------------- Front API -------------------------------- //

/// Accumulates samples of one logical root.
#[derive(Debug, Clone)]
pub struct Inference {
    state: TypeNode,
    samples: usize,
}

impl Default for Inference {
    fn default() -> Self {
        Self::new()
    }
}

impl Inference {
    pub fn new() -> Self {
        Self { state: TypeNode::Unknown, samples: 0 }
    }

    pub fn observe_value(&mut self, v: &Value) {
        let obs = build(v);
        self.state = unify(&self.state, &obs);
        self.samples += 1;
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn solve(&self) -> TypeNode {
        self.state.clone()
    }

    pub fn into_solution(self) -> TypeNode {
        self.state
    }
}

pub fn infer_from_values<'a, I>(values: I) -> TypeNode
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut inf = Inference::new();
    for v in values {
        inf.observe_value(v);
    }
    inf.into_solution()
}

// ------------------------------- Tests ------------------------------------ //
