//! The preprocessor: consumes the raw lexed token stream for one file and
//! produces the expanded token stream the lex context owns, resolving
//! directives, macro expansion, and conditional compilation along the way
//! (§4.4).

pub mod directive;
pub mod eval;
pub mod macros;

use directive::{DirectiveKind, ExtensionBehavior, VersionProfile};
use eval::Evaluator;
use macros::{DefineOutcome, MacroBody, MacroDef, MacroTable};

use std::collections::HashSet;

use glsl_core::{Atom, AtomTable, FileId, SourceContext};

use crate::diagnostics::{Diagnostics, DiagnosticKind, ExpandedRange};
use crate::lexer::{self, PpToken, TokenKind};

/// Abstracts over where `#include` reads its bytes from. The concrete
/// filesystem-backed implementation is a host concern, not this crate's.
pub trait FileProvider {
    fn read(&self, path: &str) -> Option<String>;
}

/// A `FileProvider` that never finds anything, for compiles that don't use
/// `#include` (most test and query-layer use).
#[derive(Default)]
pub struct NoIncludes;

impl FileProvider for NoIncludes {
    fn read(&self, _path: &str) -> Option<String> {
        None
    }
}

#[derive(Clone, Copy, Debug)]
struct ConditionalFrame {
    active: bool,
    seen_active_branch: bool,
    seen_else: bool,
}

/// Result of a version pre-scan (§4.4 "version-scanning mode").
#[derive(Clone, Debug, Default)]
pub struct VersionInfo {
    pub version: Option<i64>,
    pub profile: Option<VersionProfile>,
    pub extensions: Vec<(Atom, ExtensionBehavior)>,
}

/// One translation unit's worth of preprocessing state: the macro table and
/// conditional stack. Shared across a `#include` chain via nested
/// instances created per include (one per file, not one global stack).
pub struct Preprocessor {
    macros: MacroTable,
    conditional_stack: Vec<ConditionalFrame>,
}

/// Bounds and inputs for `#include` resolution, supplied by the compile
/// configuration rather than hardcoded here.
pub struct IncludeOptions<'a> {
    pub search_paths: &'a [String],
    pub max_depth: u32,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self {
            macros: MacroTable::new(),
            conditional_stack: Vec::new(),
        }
    }

    /// Seed predefined macros (e.g. `__VERSION__`, vendor-specific defines
    /// from the compile configuration) before running.
    pub fn define(&mut self, name: Atom, def: MacroDef) -> DefineOutcome {
        self.macros.define(name, def)
    }

    /// Full preprocessing pass: lexes `source`, resolves all directives and
    /// macro expansion, and returns the final active token stream (trivia
    /// and directive lines already stripped).
    #[allow(clippy::too_many_arguments)]
    pub fn run(
        &mut self,
        file: FileId,
        source: &str,
        src: &mut SourceContext,
        atoms: &mut AtomTable,
        diagnostics: &mut Diagnostics,
        provider: &dyn FileProvider,
        include: &IncludeOptions,
    ) -> Vec<PpToken> {
        self.run_at_depth(file, source, src, atoms, diagnostics, provider, include, 0)
    }

    #[allow(clippy::too_many_arguments)]
    fn run_at_depth(
        &mut self,
        file: FileId,
        source: &str,
        src: &mut SourceContext,
        atoms: &mut AtomTable,
        diagnostics: &mut Diagnostics,
        provider: &dyn FileProvider,
        include: &IncludeOptions,
        depth: u32,
    ) -> Vec<PpToken> {
        let tokens = lexer::lex(file, source, atoms);
        let mut out = Vec::with_capacity(tokens.len());
        let mut pending: Vec<PpToken> = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            let tok = tokens[i];
            if tok.kind == TokenKind::Eof {
                self.flush_pending(&mut pending, &mut out);
                out.push(tok);
                break;
            }

            if tok.kind == TokenKind::Hash && tok.first_on_line {
                self.flush_pending(&mut pending, &mut out);
                let line_end = Self::line_end(&tokens, i + 1);
                let tail = &tokens[i + 1..line_end];
                self.handle_directive(tail, tok, source, src, atoms, diagnostics, provider, include, depth, &mut out);
                i = line_end;
                continue;
            }

            if self.active() {
                pending.push(tok);
            }
            i += 1;
        }

        out
    }

    /// A cheap pre-pass that processes only `#version`/`#extension`
    /// directives and stops at the first non-directive token (§4.4).
    pub fn scan_version(file: FileId, source: &str, atoms: &mut AtomTable) -> VersionInfo {
        let tokens = lexer::lex(file, source, atoms);
        let mut info = VersionInfo::default();
        let mut i = 0;
        while i < tokens.len() {
            let tok = tokens[i];
            if tok.kind == TokenKind::Eof {
                break;
            }
            if tok.kind == TokenKind::Hash && tok.first_on_line {
                let line_end = Self::line_end(&tokens, i + 1);
                let tail = &tokens[i + 1..line_end];
                if let Some(name_tok) = tail.first() {
                    if let Some(name) = name_tok.name_atom().map(|a| atoms.resolve(a)) {
                        match DirectiveKind::from_name(name) {
                            Some(DirectiveKind::Version) => Self::scan_version_tail(&tail[1..], source, atoms, &mut info),
                            Some(DirectiveKind::Extension) => Self::scan_extension_tail(&tail[1..], atoms, &mut info),
                            _ => {}
                        }
                    }
                }
                i = line_end;
                continue;
            }
            // First real token: halt.
            break;
        }
        info
    }

    fn scan_version_tail(tail: &[PpToken], source: &str, atoms: &AtomTable, info: &mut VersionInfo) {
        let Some(num_tok) = tail.first() else { return };
        let version: i64 = num_tok.text(source).parse().unwrap_or(0);
        let profile = tail
            .get(1)
            .and_then(|t| t.name_atom())
            .and_then(|a| VersionProfile::from_name(atoms.resolve(a)))
            .unwrap_or_else(|| VersionProfile::default_for_version(version));
        info.version = Some(version);
        info.profile = Some(profile);
    }

    fn scan_extension_tail(tail: &[PpToken], atoms: &AtomTable, info: &mut VersionInfo) {
        let Some(name_tok) = tail.first() else { return };
        let Some(name) = name_tok.name_atom() else { return };
        let behavior = tail
            .get(2)
            .and_then(|t| t.name_atom())
            .and_then(|a| ExtensionBehavior::from_name(atoms.resolve(a)))
            .unwrap_or(ExtensionBehavior::Warn);
        info.extensions.push((name, behavior));
    }

    fn flush_pending(&self, pending: &mut Vec<PpToken>, out: &mut Vec<PpToken>) {
        if pending.is_empty() {
            return;
        }
        let mut painted = HashSet::new();
        out.extend(macros::expand(pending, &self.macros, &mut painted));
        pending.clear();
    }

    fn line_end(tokens: &[PpToken], start: usize) -> usize {
        let mut i = start;
        while i < tokens.len() && !tokens[i].first_on_line && tokens[i].kind != TokenKind::Eof {
            i += 1;
        }
        i
    }

    fn active(&self) -> bool {
        self.conditional_stack.last().map(|f| f.active).unwrap_or(true)
    }

    fn parent_active(&self) -> bool {
        let len = self.conditional_stack.len();
        if len >= 2 {
            self.conditional_stack[len - 2].active
        } else {
            true
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_directive(
        &mut self,
        tail: &[PpToken],
        hash_tok: PpToken,
        source: &str,
        src: &mut SourceContext,
        atoms: &mut AtomTable,
        diagnostics: &mut Diagnostics,
        provider: &dyn FileProvider,
        include: &IncludeOptions,
        depth: u32,
        out: &mut Vec<PpToken>,
    ) {
        let Some(name_tok) = tail.first() else {
            // Bare `#` on its own line is a no-op (null directive).
            return;
        };
        let Some(name_atom) = name_tok.name_atom() else {
            if self.active() {
                diagnostics.report(DiagnosticKind::UnknownDirective, range(*name_tok, source), "expected a directive name after `#`");
            }
            return;
        };
        let name = atoms.resolve(name_atom).to_owned();
        let Some(kind) = DirectiveKind::from_name(&name) else {
            if self.active() {
                diagnostics.report(DiagnosticKind::UnknownDirective, range(*name_tok, source), format!("unknown directive `#{name}`"));
            }
            return;
        };

        if !self.active() && !kind.processed_while_inactive() {
            return;
        }

        let rest = &tail[1..];
        match kind {
            DirectiveKind::Define => self.handle_define(rest, source, atoms, diagnostics),
            DirectiveKind::Undef => self.handle_undef(rest, source, atoms, diagnostics),
            DirectiveKind::If => {
                let cond = self.evaluate_condition(rest, source, atoms, hash_tok, diagnostics);
                self.push_if(cond);
            }
            DirectiveKind::Ifdef => {
                let defined = rest.first().and_then(|t| t.name_atom()).map(|a| self.macros.is_defined(a)).unwrap_or(false);
                self.push_if(defined);
            }
            DirectiveKind::Ifndef => {
                let defined = rest.first().and_then(|t| t.name_atom()).map(|a| self.macros.is_defined(a)).unwrap_or(false);
                self.push_if(!defined);
            }
            DirectiveKind::Elif => {
                let cond = self.evaluate_condition(rest, source, atoms, hash_tok, diagnostics);
                self.handle_elif(cond, hash_tok, source, diagnostics);
            }
            DirectiveKind::Else => self.handle_else(hash_tok, source, diagnostics),
            DirectiveKind::Endif => self.handle_endif(hash_tok, source, diagnostics),
            DirectiveKind::Include => self.handle_include(rest, source, src, atoms, diagnostics, provider, include, depth, out),
            DirectiveKind::Line => {
                // Accepted but not honored: we don't remap reported line
                // numbers through a `#line` directive.
            }
            DirectiveKind::Error => {
                let message: String = rest.iter().map(|t| t.text(source)).collect::<Vec<_>>().join(" ");
                diagnostics.error(DiagnosticKind::UserError, range(hash_tok, source), message);
            }
            DirectiveKind::Pragma => {}
            DirectiveKind::Extension => {
                // Recorded by `scan_version`; the full run only needs to
                // validate the behavior keyword exists.
                if let Some(behavior_tok) = rest.get(2) {
                    if behavior_tok.name_atom().and_then(|a| ExtensionBehavior::from_name(atoms.resolve(a))).is_none() {
                        diagnostics.report(DiagnosticKind::MalformedDefine, range(*behavior_tok, source), "unrecognized extension behavior");
                    }
                }
            }
            DirectiveKind::Version => {}
        }
    }

    fn handle_define(&mut self, rest: &[PpToken], source: &str, atoms: &AtomTable, diagnostics: &mut Diagnostics) {
        let Some(name_tok) = rest.first() else {
            diagnostics.error(DiagnosticKind::MalformedDefine, range(dummy(), source), "#define requires a macro name");
            return;
        };
        let Some(name) = name_tok.name_atom() else {
            diagnostics.error(DiagnosticKind::MalformedDefine, range(*name_tok, source), "#define requires a macro name");
            return;
        };

        let after_name = &rest[1..];
        let body = if after_name.first().map(|t| t.kind) == Some(TokenKind::LParen) && !after_name[0].has_leading_whitespace {
            let Some((params, param_count)) = Self::parse_params(after_name, atoms) else {
                diagnostics.error(DiagnosticKind::MalformedDefine, range(*name_tok, source), "malformed macro parameter list");
                return;
            };
            MacroBody::FunctionLike { params, replacement: after_name[param_count..].to_vec() }
        } else {
            MacroBody::ObjectLike { replacement: after_name.to_vec() }
        };

        match self.macros.define(name, MacroDef { body }) {
            DefineOutcome::ConflictingRedefinition => {
                diagnostics.report(DiagnosticKind::RedefinedBuiltinMacro, range(*name_tok, source), format!("`{}` redefined with a different body", atoms.resolve(name)));
            }
            DefineOutcome::New | DefineOutcome::IdenticalRedefinition => {}
        }
    }

    /// Parses `(a, b, c)` starting at `after_name[0] == '('`, returning the
    /// parameter atoms and how many tokens (including both parens) were
    /// consumed. Variadic (`...`) parameters are explicitly rejected by
    /// simply never recognizing the token, which falls through as malformed.
    fn parse_params(after_name: &[PpToken], atoms: &AtomTable) -> Option<(Vec<Atom>, usize)> {
        let mut params = Vec::new();
        let mut i = 1;
        if after_name.get(i).map(|t| t.kind) == Some(TokenKind::RParen) {
            return Some((params, i + 1));
        }
        loop {
            let tok = after_name.get(i)?;
            let name = tok.name_atom()?;
            let _ = atoms.resolve(name);
            params.push(name);
            i += 1;
            match after_name.get(i)?.kind {
                TokenKind::Comma => i += 1,
                TokenKind::RParen => return Some((params, i + 1)),
                _ => return None,
            }
        }
    }

    fn handle_undef(&mut self, rest: &[PpToken], source: &str, atoms: &AtomTable, diagnostics: &mut Diagnostics) {
        let Some(name_tok) = rest.first().and_then(|t| t.name_atom().map(|a| (t, a))) else {
            diagnostics.error(DiagnosticKind::MalformedDefine, range(dummy(), source), "#undef requires a macro name");
            return;
        };
        let (tok, name) = name_tok;
        if !self.macros.undef(name) {
            diagnostics.warning(DiagnosticKind::RedefinedBuiltinMacro, range(*tok, source), format!("`{}` was not defined", atoms.resolve(name)));
        }
    }

    fn evaluate_condition(&self, rest: &[PpToken], source: &str, atoms: &mut AtomTable, at: PpToken, diagnostics: &mut Diagnostics) -> bool {
        let resolved = self.resolve_defined_operator(rest, atoms);
        let mut painted = HashSet::new();
        let expanded = macros::expand(&resolved, &self.macros, &mut painted);
        let mut evaluator = Evaluator::new(&expanded, source);
        let truthy = evaluator.eval();
        if evaluator.div_by_zero {
            diagnostics.warning(DiagnosticKind::MalformedDefine, range(at, source), "division or modulo by zero in constant expression");
        }
        truthy
    }

    /// Replaces `defined X` / `defined(X)` with an already-resolved literal
    /// token before macro expansion runs, per §4.4.
    fn resolve_defined_operator(&self, tail: &[PpToken], atoms: &AtomTable) -> Vec<PpToken> {
        let mut out = Vec::with_capacity(tail.len());
        let mut i = 0;
        while i < tail.len() {
            let tok = tail[i];
            let is_defined_kw = tok.name_atom().map(|a| atoms.resolve(a) == "defined").unwrap_or(false);
            if is_defined_kw {
                let (operand_idx, consumed) = if tail.get(i + 1).map(|t| t.kind) == Some(TokenKind::LParen) {
                    (i + 2, 3)
                } else {
                    (i + 1, 2)
                };
                if let Some(operand) = tail.get(operand_idx) {
                    let value = operand.name_atom().map(|a| self.macros.is_defined(a)).unwrap_or(false);
                    let mut synthetic = *operand;
                    synthetic.kind = TokenKind::IntLiteral;
                    synthetic.resolved_value = Some(value as i64);
                    out.push(synthetic);
                    i += consumed;
                    continue;
                }
            }
            out.push(tok);
            i += 1;
        }
        out
    }

    fn push_if(&mut self, cond: bool) {
        let active = self.active() && cond;
        self.conditional_stack.push(ConditionalFrame { active, seen_active_branch: active, seen_else: false });
    }

    fn handle_elif(&mut self, cond: bool, at: PpToken, source: &str, diagnostics: &mut Diagnostics) {
        let parent = self.parent_active();
        let Some(frame) = self.conditional_stack.last_mut() else {
            diagnostics.report(DiagnosticKind::StrayElse, range(at, source), "#elif without matching #if");
            return;
        };
        if frame.seen_else {
            diagnostics.report(DiagnosticKind::ElifAfterElse, range(at, source), "#elif after #else");
        }
        frame.active = parent && !frame.seen_active_branch && cond;
        if frame.active {
            frame.seen_active_branch = true;
        }
    }

    fn handle_else(&mut self, at: PpToken, source: &str, diagnostics: &mut Diagnostics) {
        let parent = self.parent_active();
        let Some(frame) = self.conditional_stack.last_mut() else {
            diagnostics.report(DiagnosticKind::StrayElse, range(at, source), "#else without matching #if");
            return;
        };
        if frame.seen_else {
            diagnostics.report(DiagnosticKind::StrayElse, range(at, source), "duplicate #else");
        }
        frame.active = parent && !frame.seen_active_branch;
        frame.seen_else = true;
        if frame.active {
            frame.seen_active_branch = true;
        }
    }

    fn handle_endif(&mut self, at: PpToken, source: &str, diagnostics: &mut Diagnostics) {
        if self.conditional_stack.pop().is_none() {
            diagnostics.report(DiagnosticKind::StrayElse, range(at, source), "#endif without matching #if");
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_include(
        &mut self,
        rest: &[PpToken],
        source: &str,
        src: &mut SourceContext,
        atoms: &mut AtomTable,
        diagnostics: &mut Diagnostics,
        provider: &dyn FileProvider,
        include: &IncludeOptions,
        depth: u32,
        out: &mut Vec<PpToken>,
    ) {
        let Some(path_tok) = rest.first() else {
            diagnostics.error(DiagnosticKind::BadIncludePath, range(dummy(), source), "#include requires a path");
            return;
        };
        let raw = path_tok.text(source);
        let path = raw.trim_matches(|c| c == '"' || c == '<' || c == '>');

        if depth >= include.max_depth {
            diagnostics.error(DiagnosticKind::IncludeDepthExceeded, range(*path_tok, source), "maximum #include depth exceeded");
            return;
        }

        let resolved = include
            .search_paths
            .iter()
            .find_map(|dir| {
                let candidate = format!("{dir}/{path}");
                provider.read(&candidate).map(|content| (candidate, content))
            })
            .or_else(|| provider.read(path).map(|content| (path.to_string(), content)));

        let Some((resolved_path, content)) = resolved else {
            // §4.4 supplement: a missing include is one diagnostic, and the
            // enclosing translation unit continues as if it were a no-op.
            diagnostics.error(DiagnosticKind::BadIncludePath, range(*path_tok, source), format!("cannot find include file `{path}`"));
            return;
        };

        // The included buffer gets its own `FileId` via `SourceContext::
        // add_file`, so its tokens' spelled ranges address its own text
        // rather than borrowing the `#include` site's file id over content
        // they don't belong to.
        let included_file = src.add_file(&resolved_path, &content);
        // `add_file` may have normalized CRLF to LF; lex the stored text back
        // out rather than the raw bytes so spans always address what
        // `src.content` will later hand back for this file.
        let included_source = src.content(included_file).to_string();

        let mut nested = Preprocessor { macros: std::mem::take(&mut self.macros), conditional_stack: Vec::new() };
        let tokens = nested.run_at_depth(included_file, &included_source, src, atoms, diagnostics, provider, include, depth + 1);
        self.macros = nested.macros;
        out.extend(tokens.into_iter().filter(|t| t.kind != TokenKind::Eof));
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

fn range(tok: PpToken, _source: &str) -> ExpandedRange {
    ExpandedRange { file: tok.file, start: tok.span.start, end: tok.span.end }
}

/// A zero-length sentinel token used only to anchor diagnostics when a
/// directive is missing a token entirely (e.g. `#define` with nothing
/// after it).
fn dummy() -> PpToken {
    PpToken {
        kind: TokenKind::Eof,
        name: None,
        file: FileId::default(),
        span: crate::lexer::SpelledRange::new(0, 0),
        first_on_line: false,
        has_leading_whitespace: false,
        resolved_value: None,
        invocation: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glsl_core::Arena;

    fn run(source: &str) -> (Vec<PpToken>, Diagnostics) {
        let (tokens, diagnostics, _src, _file) = run_with(source, &NoIncludes);
        (tokens, diagnostics)
    }

    fn run_with(source: &str, provider: &dyn FileProvider) -> (Vec<PpToken>, Diagnostics, SourceContext, FileId) {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let mut diagnostics = Diagnostics::new();
        let mut pp = Preprocessor::new();
        let include = IncludeOptions { search_paths: &[], max_depth: 8 };
        let mut src = SourceContext::new();
        let file = src.add_buffer("<test>", source);
        let main_source = src.content(file).to_string();
        let tokens = pp.run(file, &main_source, &mut src, &mut atoms, &mut diagnostics, provider, &include);
        (tokens, diagnostics, src, file)
    }

    /// A `FileProvider` that serves one fixed body for any path, so tests can
    /// exercise a successful `#include` without touching the real filesystem.
    struct FixedInclude(&'static str);

    impl FileProvider for FixedInclude {
        fn read(&self, _path: &str) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    fn non_eof_kinds(tokens: &[PpToken]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).filter(|k| *k != TokenKind::Eof).collect()
    }

    #[test]
    fn object_like_macro_expands_in_source() {
        let (tokens, diagnostics) = run("#define N 4\nint x = N;");
        assert!(diagnostics.is_empty());
        assert_eq!(non_eof_kinds(&tokens), vec![TokenKind::KwTypeName, TokenKind::Ident, TokenKind::Eq, TokenKind::IntLiteral, TokenKind::Semi]);
    }

    #[test]
    fn inactive_if_branch_drops_its_tokens() {
        let (tokens, _) = run("#if 0\nint dropped;\n#endif\nint kept;");
        let kinds = non_eof_kinds(&tokens);
        assert_eq!(kinds, vec![TokenKind::KwTypeName, TokenKind::Ident, TokenKind::Semi]);
    }

    #[test]
    fn else_branch_taken_when_if_is_false() {
        let (tokens, _) = run("#if 0\nint a;\n#else\nint b;\n#endif");
        assert_eq!(non_eof_kinds(&tokens), vec![TokenKind::KwTypeName, TokenKind::Ident, TokenKind::Semi]);
    }

    #[test]
    fn elif_chain_picks_first_true_branch() {
        let (tokens, _) = run("#if 0\nint a;\n#elif 1\nint b;\n#else\nint c;\n#endif");
        assert_eq!(non_eof_kinds(&tokens), vec![TokenKind::KwTypeName, TokenKind::Ident, TokenKind::Semi]);
    }

    #[test]
    fn ifdef_checks_macro_table() {
        let (tokens, _) = run("#define FOO\n#ifdef FOO\nint yes;\n#endif\n#ifndef FOO\nint no_;\n#endif");
        assert_eq!(non_eof_kinds(&tokens), vec![TokenKind::KwTypeName, TokenKind::Ident, TokenKind::Semi]);
    }

    #[test]
    fn defined_operator_resolves_before_expansion() {
        let (tokens, _) = run("#define FOO 1\n#if defined(FOO)\nint yes;\n#endif\n#if defined(BAR)\nint no_;\n#endif");
        assert_eq!(non_eof_kinds(&tokens), vec![TokenKind::KwTypeName, TokenKind::Ident, TokenKind::Semi]);
    }

    #[test]
    fn stray_else_is_a_warning_not_a_panic() {
        let (_, diagnostics) = run("#else\nint x;");
        assert!(diagnostics.iter().any(|d| d.kind == DiagnosticKind::StrayElse));
    }

    #[test]
    fn function_like_macro_substitutes_arguments() {
        let (tokens, _) = run("#define ADD(a, b) a + b\nint x = ADD(1, 2);");
        let kinds = non_eof_kinds(&tokens);
        assert_eq!(
            kinds,
            vec![
                TokenKind::KwTypeName,
                TokenKind::Ident,
                TokenKind::Eq,
                TokenKind::IntLiteral,
                TokenKind::Plus,
                TokenKind::IntLiteral,
                TokenKind::Semi,
            ]
        );
    }

    #[test]
    fn missing_include_reports_one_diagnostic_and_continues() {
        let (tokens, diagnostics) = run("#include \"missing.glsl\"\nint x;");
        assert!(diagnostics.iter().any(|d| d.kind == DiagnosticKind::BadIncludePath));
        assert_eq!(non_eof_kinds(&tokens), vec![TokenKind::KwTypeName, TokenKind::Ident, TokenKind::Semi]);
    }

    #[test]
    fn successful_include_stamps_tokens_with_the_included_files_own_file_id() {
        let provider = FixedInclude("int included_var;");
        let (tokens, diagnostics, src, main_file) = run_with("#include \"lib.glsl\"\nint x;", &provider);
        assert!(diagnostics.is_empty());

        let included_tok = tokens.iter().find(|t| t.kind == TokenKind::Ident).expect("an identifier from the included file");
        assert_ne!(included_tok.file, main_file, "included tokens must not be stamped with the including file's id");
        assert_eq!(src.kind(included_tok.file), glsl_core::SourceKind::File("lib.glsl"));
        assert_eq!(src.text_range(included_tok.file, included_tok.span.start..included_tok.span.end), "included_var");
    }

    #[test]
    fn version_scan_halts_at_first_real_token() {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let info = Preprocessor::scan_version(FileId::default(), "#version 330 core\nint x;", &mut atoms);
        assert_eq!(info.version, Some(330));
        assert_eq!(info.profile, Some(VersionProfile::Core));
    }

    #[test]
    fn version_scan_defaults_profile_when_omitted() {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let info = Preprocessor::scan_version(FileId::default(), "#version 120\nint x;", &mut atoms);
        assert_eq!(info.profile, Some(VersionProfile::Compatibility));
    }
}
