use serde_json::Number;

use crate::ir::PrimitiveKind;

/// Integer iff the literal parsed without a fraction or exponent.
pub fn kind_of(n: &Number) -> PrimitiveKind {
    if n.is_i64() || n.is_u64() {
        PrimitiveKind::Integer
    } else {
        PrimitiveKind::Float
    }
}

/// Join two primitive kinds. `None` when no single kind covers both
/// (the caller falls back to a union).
pub(super) fn widen(a: PrimitiveKind, b: PrimitiveKind) -> Option<PrimitiveKind> {
    use PrimitiveKind::*;
    match (a, b) {
        (x, y) if x == y => Some(x),
        (Integer, Float) | (Float, Integer) => Some(Float),
        _ => None,
    }
}
