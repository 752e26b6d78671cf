//! Parser state: integer cursor over the lex context, delimiter/initializer-
//! list depth tracking, step/recursion budgets, and the low-level token
//! operations every grammar production is built from (§4.9).

use glsl_core::{AtomTable, SourceContext};

use crate::ast::builder::AstBuilder;
use crate::ast::{Module, SyntaxRange};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::lex_context::{LexContext, TokenIndex};
use crate::lexer::TokenKind;
use crate::symbols::SymbolTable;
use crate::token_set::TokenSet;
use crate::types::TypeContext;

/// How many steps (token consumptions) a parse is allowed before it's
/// treated as runaway. `None` is unlimited, the default for a real compile;
/// tests exercise small limits to prove pathological input terminates.
#[derive(Clone, Copy, Debug, Default)]
pub struct StepBudget {
    initial: Option<u32>,
    remaining: Option<u32>,
}

impl StepBudget {
    pub fn new(limit: Option<u32>) -> Self {
        Self { initial: limit, remaining: limit }
    }

    /// Returns `false` once the budget is exhausted; the caller is
    /// responsible for treating that as fatal.
    fn consume(&mut self) -> bool {
        match &mut self.remaining {
            Some(0) => false,
            Some(r) => {
                *r -= 1;
                true
            }
            None => true,
        }
    }

    pub fn consumed(&self) -> u32 {
        match (self.initial, self.remaining) {
            (Some(initial), Some(remaining)) => initial.saturating_sub(remaining),
            _ => 0,
        }
    }
}

/// Caps recursive-descent nesting (deeply parenthesized expressions, nested
/// statements) the same way `StepBudget` caps total token consumption.
#[derive(Clone, Copy, Debug, Default)]
pub struct RecursionBudget {
    limit: Option<u32>,
    depth: u32,
}

impl RecursionBudget {
    pub fn new(limit: Option<u32>) -> Self {
        Self { limit, depth: 0 }
    }

    fn enter(&mut self) -> bool {
        if let Some(limit) = self.limit {
            if self.depth >= limit {
                return false;
            }
        }
        self.depth += 1;
        true
    }

    fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

#[derive(Clone, Copy, Debug)]
pub(super) struct OpenDelimiter {
    #[allow(dead_code)] // kept for future mismatch diagnostics (e.g. `(]`)
    pub kind: TokenKind,
    pub pos: u32,
}

/// Recursive-descent parser over one lex context. Builds typed arena nodes
/// directly through [`AstBuilder`] rather than a concrete syntax tree — there
/// is no rowan-style green tree in this front-end, so there is nothing to
/// retroactively wrap the way a checkpoint/`start_node_at` pair would.
pub struct Parser<'m, 'p, 'a, 'lx> {
    pub(super) lex: &'lx LexContext,
    pub(super) source: &'lx SourceContext,
    pub(super) pos: u32,
    pub(super) builder: AstBuilder<'m, 'p, 'a>,
    pub(super) delimiter_stack: Vec<OpenDelimiter>,
    /// Stack-of-stack-lengths: `ilist_marks.last()` is the `delimiter_stack`
    /// length immediately after the innermost open initializer list pushed
    /// its own `{`, so `IListBrace` recovery knows exactly how many braces
    /// to rebalance through even when lists nest (§4.9 "remembers its brace
    /// depth").
    pub(super) ilist_marks: Vec<usize>,
    /// Maps a struct's own name to its resolved `TypeId`, so `Foo x;` can
    /// find the type `struct Foo { ... };` declared earlier. `TypeContext`
    /// only name-indexes builtins and `SymbolTable` only tracks variable and
    /// function bindings, so nothing else in the crate owns this lookup.
    pub(super) struct_types: std::collections::HashMap<glsl_core::Atom, crate::types::TypeId>,
    /// One entry per currently-open `switch`, tracking whether it has already
    /// seen a `default:` label (§4.9 duplicate-default check).
    pub(super) switch_default_seen: Vec<bool>,
    /// The compile's enabled extension set (§4.6), gating the extended-width
    /// scalar type names a builtin keyword can otherwise always name.
    pub(super) extensions: std::collections::HashSet<String>,
    last_diagnostic_pos: Option<u32>,
    debug_fuel: std::cell::Cell<u32>,
    step_budget: StepBudget,
    recursion_budget: RecursionBudget,
    pub(super) fatal: bool,
}

impl<'m, 'p, 'a, 'lx> Parser<'m, 'p, 'a, 'lx> {
    pub fn new(
        lex: &'lx LexContext,
        source: &'lx SourceContext,
        module: &'m mut Module,
        types: &'m mut TypeContext,
        symbols: &'m mut SymbolTable<'p>,
        diagnostics: &'m mut Diagnostics,
        atoms: &'a AtomTable<'a>,
        extensions: std::collections::HashSet<String>,
    ) -> Self {
        Self {
            lex,
            source,
            pos: 0,
            builder: AstBuilder::new(module, types, symbols, diagnostics, atoms, lex),
            delimiter_stack: Vec::with_capacity(8),
            ilist_marks: Vec::new(),
            struct_types: std::collections::HashMap::new(),
            switch_default_seen: Vec::new(),
            extensions,
            last_diagnostic_pos: None,
            debug_fuel: std::cell::Cell::new(256),
            step_budget: StepBudget::default(),
            recursion_budget: RecursionBudget::default(),
            fatal: false,
        }
    }

    pub fn with_step_budget(mut self, limit: Option<u32>) -> Self {
        self.step_budget = StepBudget::new(limit);
        self
    }

    pub fn with_recursion_budget(mut self, limit: Option<u32>) -> Self {
        self.recursion_budget = RecursionBudget::new(limit);
        self
    }

    /// Parses the whole token stream as a translation unit, pushing each
    /// top-level declaration's id onto the module in source order.
    pub fn parse(mut self) -> u32 {
        while !self.should_stop() {
            if self.eof() {
                break;
            }
            if !self.at(TokenKind::Semi) && !self.at_set(crate::token_set::token_sets::DECL_START) {
                self.error_unexpected("a declaration");
                self.bump();
                continue;
            }
            let ids = self.parse_declaration();
            self.builder.module.top_level.extend(ids);
        }
        self.step_budget.consumed()
    }

    fn reset_debug_fuel(&self) {
        self.debug_fuel.set(256);
    }

    fn ensure_progress(&self) {
        assert!(self.debug_fuel.get() != 0, "parser is stuck: too many lookaheads without consuming a token");
        self.debug_fuel.set(self.debug_fuel.get() - 1);
    }

    fn token_at(&self, idx: u32) -> crate::lex_context::SyntaxToken {
        self.lex.get_token(TokenIndex::from_raw(idx))
    }

    pub(super) fn current(&self) -> crate::lex_context::SyntaxToken {
        self.ensure_progress();
        self.token_at(self.pos)
    }

    pub(super) fn kind(&self) -> TokenKind {
        self.current().kind
    }

    pub(super) fn nth(&self, lookahead: u32) -> TokenKind {
        self.ensure_progress();
        self.token_at(self.pos + lookahead).kind
    }

    /// The spelled text of the token at `idx`, read straight from the
    /// source context — literals carry no atom, so this is the only way to
    /// recover an int/float literal's digits.
    pub(super) fn token_text(&self, idx: u32) -> &'lx str {
        let tok = self.token_at(idx);
        self.source.text_range(tok.spelled.file, tok.spelled.start..tok.spelled.end)
    }

    pub(super) fn current_text(&self) -> &'lx str {
        self.token_text(self.pos)
    }

    pub(super) fn eof(&self) -> bool {
        self.kind() == TokenKind::Eof
    }

    pub(super) fn should_stop(&self) -> bool {
        self.eof() || self.fatal
    }

    pub(super) fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    pub(super) fn at_nth(&self, lookahead: u32, kind: TokenKind) -> bool {
        self.nth(lookahead) == kind
    }

    pub(super) fn at_set(&self, set: TokenSet) -> bool {
        set.contains(self.kind())
    }

    /// Consumes and returns the current token. Asserts against bumping past
    /// `Eof`, matching the invariant every call site relies on: a
    /// `should_stop()` check always happens first.
    pub(super) fn bump(&mut self) -> crate::lex_context::SyntaxToken {
        assert!(!self.eof(), "bump called at EOF");
        self.reset_debug_fuel();
        let tok = self.token_at(self.pos);
        if !self.step_budget.consume() {
            self.fatal = true;
        }
        self.pos += 1;
        tok
    }

    pub(super) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// On mismatch: reports but does not consume, so the caller's own
    /// recovery decides what happens to the unexpected token.
    pub(super) fn expect(&mut self, kind: TokenKind, what: &str) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error_expected(what);
        false
    }

    /// The permissive-semicolon rule (§4.9): report if missing, but never
    /// consume in its place — typing-in-progress must not eat the next
    /// token.
    pub(super) fn expect_semi(&mut self) {
        if !self.eat(TokenKind::Semi) {
            self.error_expected("`;`");
        }
    }

    fn report(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let pos = self.pos;
        if self.last_diagnostic_pos == Some(pos) {
            return;
        }
        self.last_diagnostic_pos = Some(pos);
        let range = self.lex.expanded_range(TokenIndex::from_raw(pos));
        self.builder.diagnostics.error(kind, range, message);
    }

    pub(super) fn error_expected(&mut self, what: &str) {
        self.report(DiagnosticKind::ExpectedToken, format!("expected {what}"));
    }

    pub(super) fn error_unexpected(&mut self, what: &str) {
        self.report(DiagnosticKind::UnexpectedToken, format!("unexpected {what}"));
    }

    pub(super) fn current_range(&self) -> SyntaxRange {
        SyntaxRange::new(self.pos, self.pos + 1)
    }

    pub(super) fn range_from(&self, start: u32) -> SyntaxRange {
        SyntaxRange::new(start, self.pos)
    }

    pub(super) fn enter_recursion(&mut self) -> bool {
        if !self.recursion_budget.enter() {
            self.fatal = true;
            return false;
        }
        self.reset_debug_fuel();
        true
    }

    pub(super) fn exit_recursion(&mut self) {
        self.recursion_budget.exit();
        self.reset_debug_fuel();
    }

    pub(super) fn push_delimiter(&mut self, kind: TokenKind) {
        self.delimiter_stack.push(OpenDelimiter { kind, pos: self.pos });
    }

    pub(super) fn pop_delimiter(&mut self) -> Option<OpenDelimiter> {
        self.delimiter_stack.pop()
    }

    /// Resolves a type-name atom (builtin keyword or previously declared
    /// struct) to its `TypeId`, or `None` if the name isn't a type at all.
    /// A builtin that names an extended-width scalar (§4.6) whose extension
    /// isn't enabled reports `DisabledExtension` and resolves to the error
    /// type rather than falling through to the caller's unknown-name path.
    pub(super) fn resolve_type_name(&mut self, name: glsl_core::Atom) -> Option<crate::types::TypeId> {
        if let Some(&id) = self.struct_types.get(&name) {
            return Some(id);
        }
        let text = self.builder.atoms.resolve(name);
        let id = self.builder.types.get_builtin(text)?;
        if let Some(required) = self.builder.types.get(id).scalar_kind().and_then(|k| k.required_extension()) {
            if !self.extensions.contains(required) {
                let range = self.lex.expanded_range_of(self.current_range());
                self.builder.diagnostics.error(
                    DiagnosticKind::DisabledExtension,
                    range,
                    format!("`{text}` requires extension `{required}`, which is not enabled"),
                );
                return Some(self.builder.types.error_type());
            }
        }
        Some(id)
    }

    /// Any atom interned anywhere in this token stream, used as a last
    /// resort for a purely cosmetic `QualType::base_name` slot that has no
    /// natural atom of its own (e.g. `void` as a return type looked up
    /// before the function name is parsed). Only reached for a genuinely
    /// degenerate program with no identifiers at all.
    pub(super) fn any_atom_in_source(&self) -> Option<glsl_core::Atom> {
        let range = SyntaxRange::new(0, self.lex.len() as u32);
        self.lex.iter_range(range).find_map(|t| t.name)
    }
}
