use indexmap::IndexMap;

use crate::ir::{Field, ObjectType, TypeNode};

/// Structural merge: `a`'s keys first, then keys only `b` has. A key missing
/// on either side becomes optional; a slot that turned nullable is folded into
/// `optional` so field types never carry the null marker.
pub(super) fn merge(a: &ObjectType, b: &ObjectType) -> ObjectType {
    let mut out: IndexMap<&str, Field> = IndexMap::with_capacity(a.fields.len().max(b.fields.len()));

    // merge keys from a
    for fa in &a.fields {
        let merged = match b.field(&fa.key) {
            None => Field { optional: true, ..fa.clone() },
            Some(fb) => fold_nullable(Field {
                key: fa.key.clone(),
                ty: super::unify(&fa.ty, &fb.ty),
                optional: fa.optional || fb.optional,
            }),
        };
        out.insert(fa.key.as_str(), merged);
    }
    // add keys only in b
    for fb in &b.fields {
        if !out.contains_key(fb.key.as_str()) {
            out.insert(fb.key.as_str(), Field { optional: true, ..fb.clone() });
        }
    }

    ObjectType { fields: out.into_values().collect() }
}

fn fold_nullable(field: Field) -> Field {
    match field.ty {
        TypeNode::Nullable { inner } => Field { key: field.key, ty: *inner, optional: true },
        ty => Field { ty, ..field },
    }
}
