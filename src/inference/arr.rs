use crate::ir::TypeNode;

/// Two array observations of the same slot: unify their element types.
/// `Unknown` elements (empty arrays) defer to the other side.
pub(super) fn merge(a: &TypeNode, b: &TypeNode) -> TypeNode {
    TypeNode::array(super::unify(a, b))
}
