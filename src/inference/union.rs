use crate::ir::TypeNode;

/// Fallback join when no lossless merge exists. Arms are flattened and
/// bucketed by family; an arm whose family is already present is unified into
/// it (left operand stays left), so the result has one arm per family.
pub(super) fn union_of(a: &TypeNode, b: &TypeNode) -> TypeNode {
    let mut arms: Vec<TypeNode> = arms_of(a).to_vec();
    for incoming in arms_of(b) {
        let slot = arms.iter().position(|arm| arm.family() == incoming.family());
        match slot {
            Some(i) => arms[i] = super::unify(&arms[i], incoming),
            None => arms.push(incoming.clone()),
        }
    }
    arms.sort_by_key(|arm| arm.family());

    match arms.len() {
        1 => arms.remove(0),
        _ => TypeNode::Union { alternatives: arms },
    }
}

fn arms_of(t: &TypeNode) -> &[TypeNode] {
    match t {
        TypeNode::Union { alternatives } => alternatives,
        other => std::slice::from_ref(other),
    }
}
