//! Macro table and token substitution, including rescanning with "blue
//! paint" self-expansion suppression (§4.4 supplement).

use std::collections::HashSet;

use indexmap::IndexMap;

use glsl_core::{Atom, FileId};

use crate::lexer::{PpToken, SpelledRange, TokenKind};

#[derive(Clone, Debug, PartialEq)]
pub enum MacroBody {
    ObjectLike { replacement: Vec<PpToken> },
    FunctionLike { params: Vec<Atom>, replacement: Vec<PpToken> },
}

#[derive(Clone, Debug)]
pub struct MacroDef {
    pub body: MacroBody,
}

impl MacroDef {
    /// Replacement lists are compared ignoring the original spelled
    /// position, since two `#define`s of the same text at different source
    /// locations should count as "identical" for the redefinition rule.
    fn same_replacement_as(&self, other: &MacroDef) -> bool {
        fn texts(body: &MacroBody) -> (Option<&[Atom]>, Vec<TokenKind>) {
            match body {
                MacroBody::ObjectLike { replacement } => (None, replacement.iter().map(|t| t.kind).collect()),
                MacroBody::FunctionLike { params, replacement } => (Some(params.as_slice()), replacement.iter().map(|t| t.kind).collect()),
            }
        }
        texts(&self.body) == texts(&other.body)
    }
}

#[derive(Default)]
pub struct MacroTable {
    map: IndexMap<Atom, MacroDef>,
}

pub enum DefineOutcome {
    New,
    IdenticalRedefinition,
    ConflictingRedefinition,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_defined(&self, name: Atom) -> bool {
        self.map.contains_key(&name)
    }

    pub fn get(&self, name: Atom) -> Option<&MacroDef> {
        self.map.get(&name)
    }

    /// A redefinition with an identical token list (ignoring whitespace,
    /// which the token stream already drops) is accepted silently; a
    /// different one is a warning, not a hard error (§4.4 supplement).
    pub fn define(&mut self, name: Atom, def: MacroDef) -> DefineOutcome {
        match self.map.get(&name) {
            Some(existing) if existing.same_replacement_as(&def) => DefineOutcome::IdenticalRedefinition,
            Some(_) => {
                self.map.insert(name, def);
                DefineOutcome::ConflictingRedefinition
            }
            None => {
                self.map.insert(name, def);
                DefineOutcome::New
            }
        }
    }

    pub fn undef(&mut self, name: Atom) -> bool {
        self.map.shift_remove(&name).is_some()
    }
}

/// Fully macro-expands `input`, rescanning substituted text per the classic
/// C-preprocessor algorithm. `painted` tracks macros currently mid-expansion
/// so a macro never re-expands itself within its own replacement (§4.4
/// supplement).
pub fn expand(input: &[PpToken], table: &MacroTable, painted: &mut HashSet<Atom>) -> Vec<PpToken> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        let tok = input[i];
        let Some(name) = tok.name_atom() else {
            out.push(tok);
            i += 1;
            continue;
        };

        if painted.contains(&name) {
            out.push(tok);
            i += 1;
            continue;
        }

        let Some(def) = table.get(name) else {
            out.push(tok);
            i += 1;
            continue;
        };

        // The outermost real invocation site: a token already carrying one
        // (because it is itself a rescanned replacement token) keeps it, so
        // a chain of macros invoking macros still reports the original use.
        let site = tok.expanded_position();

        match &def.body {
            MacroBody::ObjectLike { replacement } => {
                let stamped: Vec<PpToken> = replacement.iter().map(|t| stamp_invocation(*t, site)).collect();
                painted.insert(name);
                let expanded = expand(&stamped, table, painted);
                painted.remove(&name);
                out.extend(expanded);
                i += 1;
            }
            MacroBody::FunctionLike { params, replacement } => {
                // Not immediately followed by `(`: passes through unexpanded
                // (§4.4 supplement).
                if input.get(i + 1).map(|t| t.kind) != Some(TokenKind::LParen) {
                    out.push(tok);
                    i += 1;
                    continue;
                }

                let Some((args, consumed)) = collect_call_args(&input[i + 1..]) else {
                    out.push(tok);
                    i += 1;
                    continue;
                };

                let substituted = substitute_params(replacement, params, &args, site);
                painted.insert(name);
                let expanded = expand(&substituted, table, painted);
                painted.remove(&name);
                out.extend(expanded);
                i += 1 + consumed;
            }
        }
    }
    out
}

/// Parses `(a, b, c)` starting at `tail[0] == '('`, returning the
/// comma-separated argument token lists and how many tokens (including both
/// parens) were consumed.
fn collect_call_args(tail: &[PpToken]) -> Option<(Vec<Vec<PpToken>>, usize)> {
    debug_assert_eq!(tail.first()?.kind, TokenKind::LParen);
    let mut depth = 0i32;
    let mut args: Vec<Vec<PpToken>> = vec![Vec::new()];
    let mut idx = 0;

    for (offset, tok) in tail.iter().enumerate() {
        match tok.kind {
            TokenKind::LParen => {
                depth += 1;
                if depth > 1 {
                    args.last_mut().unwrap().push(*tok);
                }
            }
            TokenKind::RParen => {
                depth -= 1;
                if depth == 0 {
                    idx = offset;
                    break;
                }
                args.last_mut().unwrap().push(*tok);
            }
            TokenKind::Comma if depth == 1 => args.push(Vec::new()),
            _ => args.last_mut().unwrap().push(*tok),
        }
    }

    if depth != 0 {
        return None;
    }
    if args.len() == 1 && args[0].is_empty() {
        args.clear();
    }
    Some((args, idx + 1))
}

/// `site` is only stamped onto the macro's own replacement-list tokens
/// (pass-through, non-parameter ones): argument tokens are real source text
/// substituted in from the call site and keep whatever position they
/// already carry.
fn substitute_params(replacement: &[PpToken], params: &[Atom], args: &[Vec<PpToken>], site: (FileId, SpelledRange)) -> Vec<PpToken> {
    let mut out = Vec::with_capacity(replacement.len());
    for tok in replacement {
        if let Some(name) = tok.name_atom() {
            if let Some(pos) = params.iter().position(|&p| p == name) {
                if let Some(arg) = args.get(pos) {
                    out.extend(arg.iter().copied());
                    continue;
                }
            }
        }
        out.push(stamp_invocation(*tok, site));
    }
    out
}

/// Marks `tok` as having arrived via macro substitution from `site`, unless
/// it already carries an invocation (a token substituted from a deeper
/// rescan keeps the outermost one it was first stamped with).
fn stamp_invocation(mut tok: PpToken, site: (FileId, SpelledRange)) -> PpToken {
    if tok.invocation.is_none() {
        tok.invocation = Some(site);
    }
    tok
}
