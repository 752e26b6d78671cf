//! Function overload resolution (§3, §4.8): arity filter, convertibility
//! filter, then a best-pick using the same `hasBetterConversion` machinery
//! the type universe uses for ternary unification.

use crate::ast::DeclId;
use crate::types::{TypeContext, TypeId};

#[derive(Clone, Debug, PartialEq)]
pub enum OverloadResult {
    Resolved(DeclId),
    NoMatch,
    Ambiguous(Vec<DeclId>),
}

/// `candidates`: each overload's `(decl, param types)`. `arg_types`: the
/// call-site argument types, already deduced.
pub fn resolve_overload(
    ctx: &TypeContext,
    candidates: &[(DeclId, Vec<TypeId>)],
    arg_types: &[TypeId],
) -> OverloadResult {
    let viable: Vec<&(DeclId, Vec<TypeId>)> = candidates
        .iter()
        .filter(|(_, params)| {
            params.len() == arg_types.len()
                && params.iter().zip(arg_types).all(|(&p, &a)| ctx.is_convertible_to(a, p))
        })
        .collect();

    match viable.len() {
        0 => OverloadResult::NoMatch,
        1 => OverloadResult::Resolved(viable[0].0),
        _ => {
            let winner = viable.iter().find(|&&candidate| {
                viable
                    .iter()
                    .all(|&other| std::ptr::eq(candidate, other) || dominates(ctx, arg_types, &candidate.1, &other.1))
            });
            match winner {
                Some(w) => OverloadResult::Resolved(w.0),
                None => OverloadResult::Ambiguous(viable.iter().map(|c| c.0).collect()),
            }
        }
    }
}

/// `a` dominates `b` if it is never worse and strictly better on at least
/// one parameter; an incomparable or tied parameter (other than an exact
/// type match) means `a` does not dominate.
fn dominates(ctx: &TypeContext, arg_types: &[TypeId], a_params: &[TypeId], b_params: &[TypeId]) -> bool {
    let mut strictly_better_once = false;
    for i in 0..arg_types.len() {
        let (arg, pa, pb) = (arg_types[i], a_params[i], b_params[i]);
        if pa == pb {
            continue;
        }
        match ctx.has_better_conversion(arg, pa, pb) {
            Some(true) => strictly_better_once = true,
            Some(false) | None => return false,
        }
    }
    strictly_better_once
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScalarKind;

    fn decl(n: u32) -> DeclId {
        DeclId::from_raw(n)
    }

    #[test]
    fn exact_match_wins_over_widening_candidate() {
        let ctx = TypeContext::new();
        let int_ty = ctx.scalar(ScalarKind::Int);
        let float_ty = ctx.scalar(ScalarKind::Float);

        let candidates = vec![(decl(0), vec![int_ty]), (decl(1), vec![float_ty])];
        let result = resolve_overload(&ctx, &candidates, &[int_ty]);
        assert_eq!(result, OverloadResult::Resolved(decl(0)));
    }

    #[test]
    fn arity_mismatch_is_filtered_out() {
        let ctx = TypeContext::new();
        let int_ty = ctx.scalar(ScalarKind::Int);

        let candidates = vec![(decl(0), vec![int_ty, int_ty])];
        let result = resolve_overload(&ctx, &candidates, &[int_ty]);
        assert_eq!(result, OverloadResult::NoMatch);
    }

    #[test]
    fn no_viable_candidate_reports_no_match() {
        let ctx = TypeContext::new();
        let bool_ty = ctx.scalar(ScalarKind::Bool);
        let int_ty = ctx.scalar(ScalarKind::Int);

        let candidates = vec![(decl(0), vec![int_ty])];
        let result = resolve_overload(&ctx, &candidates, &[bool_ty]);
        assert_eq!(result, OverloadResult::NoMatch);
    }

    #[test]
    fn two_equally_good_widenings_are_ambiguous() {
        let ctx = TypeContext::new();
        let int_ty = ctx.scalar(ScalarKind::Int);
        let int64_ty = ctx.scalar(ScalarKind::Int64);
        let uint_ty = ctx.scalar(ScalarKind::UInt);

        // int -> int64 and int -> uint are both single-step widenings, so
        // neither conversion dominates the other: a real tie, not a
        // shortest-path win.
        let candidates = vec![(decl(0), vec![int64_ty]), (decl(1), vec![uint_ty])];
        let result = resolve_overload(&ctx, &candidates, &[int_ty]);
        match result {
            OverloadResult::Ambiguous(mut ids) => {
                ids.sort_by_key(|d| d.as_u32());
                assert_eq!(ids, vec![decl(0), decl(1)]);
            }
            other => panic!("expected Ambiguous, got {other:?}"),
        }
    }
}
