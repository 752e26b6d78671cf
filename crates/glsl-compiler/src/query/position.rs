//! Token-at-position, symbol-at-position with classification, and
//! declaration-of-symbol (§4.11, supplemented by `glsld/src/Declaration.cpp`).

use glsl_core::{Atom, FileId};

use super::visitor::{nodes_overlapping, OverlappingNode};
use crate::ast::expr::DeclaratorRef;
use crate::ast::{DeclId, DeclKind, ExprKind, Module, SyntaxRange};
use crate::lex_context::{LexContext, TokenIndex};

/// What a resolved name turned out to bind to, for a host that wants to
/// render a hover kind or filter completions without re-deriving it from
/// the raw `DeclKind`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SymbolClass {
    Variable,
    Parameter,
    StructField,
    BlockField,
    Function,
    Struct,
}

#[derive(Clone, Copy, Debug)]
pub struct SymbolAtPosition {
    pub name: Atom,
    pub class: SymbolClass,
    /// The declaring node; for `Function`/`Struct` this is the decl itself,
    /// for the declarator kinds it is the decl owning the named declarator.
    pub decl: DeclId,
}

/// The token whose expanded range contains (or immediately precedes) the
/// given byte position in `file`.
pub fn token_at(lex: &LexContext, file: FileId, pos: u32) -> Option<TokenIndex> {
    lex.find_token_at_position(file, pos)
}

/// The innermost name-shaped expression (`NameAccess`/`FunctionCall`)
/// covering the token at `pos`, classified by what it resolved to. Returns
/// `None` for a position that isn't over a name, or a name that never
/// resolved (§4.7's `UndeclaredName` case has nothing to hover).
pub fn symbol_at(module: &Module, lex: &LexContext, file: FileId, pos: u32) -> Option<SymbolAtPosition> {
    let token = token_at(lex, file, pos)?;
    let point = SyntaxRange::new(token.as_u32(), token.as_u32() + 1);

    let mut best: Option<(SyntaxRange, SymbolAtPosition)> = None;
    for node in nodes_overlapping(module, point) {
        let OverlappingNode::Expr(id) = node else { continue };
        let expr = module.expr(id);
        let hit = match &expr.kind {
            ExprKind::NameAccess { name, resolved: Some(declarator) } => classify_declarator(module, *name, *declarator),
            ExprKind::FunctionCall { callee, resolved: Some(decl), .. } => Some(SymbolAtPosition { name: *callee, class: SymbolClass::Function, decl: *decl }),
            _ => None,
        };
        let Some(hit) = hit else { continue };
        let replace = match &best {
            Some((current, _)) => narrower(expr.range, *current),
            None => true,
        };
        if replace {
            best = Some((expr.range, hit));
        }
    }
    best.map(|(_, hit)| hit)
}

fn narrower(candidate: SyntaxRange, current: SyntaxRange) -> bool {
    (candidate.end - candidate.start) < (current.end - current.start)
}

fn classify_declarator(module: &Module, name: Atom, declarator: DeclaratorRef) -> Option<SymbolAtPosition> {
    let class = match &module.decl(declarator.decl).kind {
        DeclKind::Variable { .. } => SymbolClass::Variable,
        DeclKind::StructField { .. } => SymbolClass::StructField,
        DeclKind::BlockField { .. } => SymbolClass::BlockField,
        DeclKind::Param { .. } => SymbolClass::Parameter,
        DeclKind::InterfaceBlock { .. } => SymbolClass::BlockField,
        _ => return None,
    };
    Some(SymbolAtPosition { name, class, decl: declarator.decl })
}

/// The syntax range of the AST node that declared `decl` — "go to
/// definition" without a second tree walk.
pub fn declaration_of(module: &Module, decl: DeclId) -> SyntaxRange {
    module.decl(decl).range
}
