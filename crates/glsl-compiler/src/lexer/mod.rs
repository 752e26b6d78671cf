//! Table-driven lexer: turns one source file's bytes into a stream of
//! [`PpToken`]s the preprocessor consumes.

pub mod kind;

use glsl_core::{Atom, AtomTable, FileId};
use logos::Logos;

pub use kind::TokenKind;

/// Byte range within a single file, half-open. A plain `Copy` struct rather
/// than `std::ops::Range` so `PpToken` itself can be `Copy` — the
/// preprocessor copies tokens into macro-expansion buffers constantly.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SpelledRange {
    pub start: u32,
    pub end: u32,
}

impl SpelledRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A single lexed token: kind, interned atom (for identifiers and the
/// bucketed keyword kinds, which need atom text to disambiguate), spelled
/// location, and the two flags the preprocessor needs for directive
/// recognition (§3 "PPToken").
#[derive(Clone, Copy, Debug)]
pub struct PpToken {
    pub kind: TokenKind,
    pub name: Option<Atom>,
    pub file: FileId,
    pub span: SpelledRange,
    /// No non-trivia token appeared earlier on this line.
    pub first_on_line: bool,
    /// At least one whitespace/comment token preceded this one on the line.
    pub has_leading_whitespace: bool,
    /// Set only on synthetic `IntLiteral` tokens the preprocessor injects to
    /// replace an already-resolved `defined X` / `defined(X)` operator
    /// before macro expansion — the token's spelled range still points at
    /// the original operand so diagnostics keep a sensible location, but its
    /// value can't be re-derived from that text.
    pub resolved_value: Option<i64>,
    /// Set when this token reached its current position by macro
    /// substitution: the file/span of the outermost real invocation that
    /// triggered the expansion chain. `None` for a token straight off the
    /// lexer, meaning its expanded position is its own spelled position.
    pub invocation: Option<(FileId, SpelledRange)>,
}

impl PpToken {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start as usize..self.span.end as usize]
    }

    /// The interned atom for identifier-shaped tokens (`Ident`,
    /// `KwQualifier`, `KwTypeName`); `None` for everything else.
    pub fn name_atom(&self) -> Option<Atom> {
        self.name
    }

    /// Where this token's position should be reported for "jump to use"
    /// purposes: the invocation site if it arrived via macro substitution,
    /// otherwise its own spelled position.
    pub fn expanded_position(&self) -> (FileId, SpelledRange) {
        self.invocation.unwrap_or((self.file, self.span))
    }
}

fn needs_atom(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Ident | TokenKind::KwQualifier | TokenKind::KwTypeName)
}

/// Lex one file's full text into a token stream, including trivia, ending in
/// an `Eof` sentinel. The preprocessor is responsible for filtering trivia
/// out of what it forwards to the parser (while still consulting it for
/// `first_on_line`/`has_leading_whitespace`).
pub fn lex(file: FileId, source: &str, atoms: &mut AtomTable) -> Vec<PpToken> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);
    let mut first_on_line = true;
    let mut has_leading_whitespace = false;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(kind) => {
                if kind.is_trivia() {
                    if kind == TokenKind::Newline {
                        first_on_line = true;
                    }
                    has_leading_whitespace = true;
                    continue;
                }

                let name = needs_atom(kind).then(|| atoms.intern(lexer.slice()));
                tokens.push(PpToken {
                    kind,
                    name,
                    file,
                    span: SpelledRange::new(span.start as u32, span.end as u32),
                    first_on_line,
                    has_leading_whitespace,
                    resolved_value: None,
                    invocation: None,
                });
                first_on_line = false;
                has_leading_whitespace = false;
            }
            Err(()) => {
                // Coalesce adjacent unrecognized bytes into one Garbage token,
                // matching "unrecognized byte sequence" being a single error
                // token per run rather than one per byte.
                if let Some(last) = tokens.last_mut() {
                    if last.kind == TokenKind::Garbage && last.span.end == span.start as u32 {
                        last.span.end = span.end as u32;
                        continue;
                    }
                }
                tokens.push(PpToken {
                    kind: TokenKind::Garbage,
                    name: None,
                    file,
                    span: SpelledRange::new(span.start as u32, span.end as u32),
                    first_on_line,
                    has_leading_whitespace,
                    resolved_value: None,
                    invocation: None,
                });
                first_on_line = false;
                has_leading_whitespace = false;
            }
        }
    }

    let eof_at = source.len() as u32;
    tokens.push(PpToken {
        kind: TokenKind::Eof,
        name: None,
        file,
        span: SpelledRange::new(eof_at, eof_at),
        first_on_line,
        has_leading_whitespace,
        resolved_value: None,
        invocation: None,
    });

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use glsl_core::Arena;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        lex(FileId::default(), source, &mut atoms).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn skips_trivia_from_output() {
        assert_eq!(
            kinds("int x ;"),
            vec![TokenKind::KwTypeName, TokenKind::Ident, TokenKind::Semi, TokenKind::Eof]
        );
    }

    #[test]
    fn first_on_line_flag() {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let tokens = lex(FileId::default(), "int x;\nfloat y;", &mut atoms);
        let float_tok = tokens.iter().find(|t| t.kind == TokenKind::KwTypeName && t.text("int x;\nfloat y;") == "float").unwrap();
        assert!(float_tok.first_on_line);
        let x_tok = &tokens[1];
        assert!(!x_tok.first_on_line);
    }

    #[test]
    fn has_leading_whitespace_flag() {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let tokens = lex(FileId::default(), "int  x;", &mut atoms);
        assert!(!tokens[0].has_leading_whitespace);
        assert!(tokens[1].has_leading_whitespace);
    }

    #[test]
    fn unrecognized_bytes_coalesce_into_one_garbage_token() {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let tokens = lex(FileId::default(), "int $$$ x;", &mut atoms);
        let garbage: Vec<_> = tokens.iter().filter(|t| t.kind == TokenKind::Garbage).collect();
        assert_eq!(garbage.len(), 1);
        assert_eq!(garbage[0].text("int $$$ x;"), "$$$");
    }

    #[test]
    fn ends_with_eof_sentinel() {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let tokens = lex(FileId::default(), "int x;", &mut atoms);
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn identifiers_carry_an_interned_atom() {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let tokens = lex(FileId::default(), "foo foo bar", &mut atoms);
        let idents: Vec<_> = tokens.iter().filter(|t| t.kind == TokenKind::Ident).collect();
        assert_eq!(idents[0].name, idents[1].name);
        assert_ne!(idents[0].name, idents[2].name);
    }
}
