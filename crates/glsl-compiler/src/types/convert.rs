//! Scalar widening chain and the `hasBetterConversion` overload tie-break
//! (§4.6).

use super::kind::ScalarKind;

/// Single-step implicit widenings. `isConvertibleTo` is the reflexive-
/// transitive closure of this relation; `hasBetterConversion` prefers the
/// shortest path (exact match, distance 0, always wins).
const EDGES: &[(ScalarKind, ScalarKind)] = &[
    (ScalarKind::Int8, ScalarKind::Int16),
    (ScalarKind::Int16, ScalarKind::Int),
    (ScalarKind::Int, ScalarKind::Int64),
    (ScalarKind::UInt8, ScalarKind::UInt16),
    (ScalarKind::UInt16, ScalarKind::UInt),
    (ScalarKind::UInt, ScalarKind::UInt64),
    (ScalarKind::Int, ScalarKind::UInt),
    (ScalarKind::UInt, ScalarKind::Float),
    (ScalarKind::Int, ScalarKind::Float),
    (ScalarKind::Float16, ScalarKind::Float),
    (ScalarKind::Float, ScalarKind::Double),
];

/// Shortest number of single-step widenings from `from` to `to`, or `None`
/// if `to` is unreachable. Distance 0 means `from == to` (exact match).
fn widening_distance(from: ScalarKind, to: ScalarKind) -> Option<u32> {
    if from == to {
        return Some(0);
    }

    // Tiny fixed graph (12 nodes): plain BFS is simpler and just as fast as
    // any smarter indexed structure would be here.
    let mut frontier = vec![from];
    let mut visited = vec![from];
    let mut distance = 0;

    while !frontier.is_empty() {
        distance += 1;
        let mut next = Vec::new();
        for &node in &frontier {
            for &(src, dst) in EDGES {
                if src == node && !visited.contains(&dst) {
                    if dst == to {
                        return Some(distance);
                    }
                    visited.push(dst);
                    next.push(dst);
                }
            }
        }
        frontier = next;
    }

    None
}

pub fn is_convertible(from: ScalarKind, to: ScalarKind) -> bool {
    widening_distance(from, to).is_some()
}

/// Total order over two *non-exact* candidate conversions from the same
/// source: the conversion whose target type is reachable in fewer widening
/// steps wins. Returns `Some(true)` if `lhs` is strictly better than `rhs`,
/// `Some(false)` if `rhs` is strictly better, `None` if neither converts or
/// they tie (ambiguous).
pub fn has_better_conversion(from: ScalarKind, lhs: ScalarKind, rhs: ScalarKind) -> Option<bool> {
    let lhs_dist = widening_distance(from, lhs);
    let rhs_dist = widening_distance(from, rhs);
    match (lhs_dist, rhs_dist) {
        (Some(l), Some(r)) if l != r => Some(l < r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ScalarKind::*;

    #[test]
    fn identity_is_convertible() {
        assert!(is_convertible(Int, Int));
    }

    #[test]
    fn int_widens_to_uint_float_double() {
        assert!(is_convertible(Int, UInt));
        assert!(is_convertible(Int, Float));
        assert!(is_convertible(Int, Double));
    }

    #[test]
    fn float_does_not_narrow_to_int() {
        assert!(!is_convertible(Float, Int));
    }

    #[test]
    fn bool_converts_to_nothing() {
        assert!(!is_convertible(Bool, Int));
        assert!(!is_convertible(Int, Bool));
    }

    #[test]
    fn exact_match_beats_widening() {
        // int -> int (distance 0) beats int -> float (distance >0).
        assert_eq!(has_better_conversion(Int, Int, Float), None); // exact handled by caller before this
        assert_eq!(widening_distance(Int, Int), Some(0));
    }

    #[test]
    fn shorter_widening_wins() {
        // int -> uint (1 step) is better than int -> float (2 steps via uint, or direct edge).
        assert_eq!(has_better_conversion(Int, UInt, Double), Some(true));
    }

    #[test]
    fn unreachable_conversions_are_not_comparable() {
        assert_eq!(has_better_conversion(Bool, Int, Float), None);
    }
}
