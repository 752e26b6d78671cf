//! The lex context: owns the preprocessor's final output as a flat, indexed
//! token stream and answers the position/range queries the parser and query
//! layer need over it (§4.5).

use glsl_core::{Atom, FileId};

use crate::ast::SyntaxRange;
use crate::diagnostics::ExpandedRange;
use crate::lexer::{PpToken, TokenKind};

/// A token's position in the final stream. Dense, zero-based, stable for the
/// lifetime of one compile.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TokenIndex(u32);

impl TokenIndex {
    pub fn from_raw(v: u32) -> Self {
        Self(v)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// A `PpToken`'s payload plus its expanded range and stable stream index
/// (§3 "SyntaxToken").
#[derive(Clone, Copy, Debug)]
pub struct SyntaxToken {
    pub index: TokenIndex,
    pub kind: TokenKind,
    pub name: Option<Atom>,
    pub spelled: ExpandedRange,
    /// The logical position after macro/include expansion. A token that
    /// passed through unexpanded carries its own spelled position here.
    /// A token born from macro substitution carries the outermost
    /// invocation site instead — `preprocessor::macros::expand` threads that
    /// site through rescanning, so a chain like `#define A B` / `#define B
    /// C` followed by a use of `A` still reports the use site here even
    /// though `spelled` points into `B`'s replacement list.
    pub expanded: ExpandedRange,
}

impl SyntaxToken {
    fn from_pp(index: TokenIndex, tok: PpToken) -> Self {
        let spelled = ExpandedRange { file: tok.file, start: tok.span.start, end: tok.span.end };
        let (file, span) = tok.expanded_position();
        let expanded = ExpandedRange { file, start: span.start, end: span.end };
        SyntaxToken { index, kind: tok.kind, name: tok.name, spelled, expanded }
    }
}

/// Owns the final expanded token stream for one translation unit.
pub struct LexContext {
    tokens: Vec<SyntaxToken>,
}

impl LexContext {
    /// Builds a lex context from the preprocessor's output. The caller must
    /// ensure `tokens` ends with an `Eof` sentinel, as `preprocessor::run`
    /// guarantees.
    pub fn from_pp_tokens(tokens: &[PpToken]) -> Self {
        let tokens = tokens.iter().enumerate().map(|(i, tok)| SyntaxToken::from_pp(TokenIndex::from_raw(i as u32), *tok)).collect();
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Safe lookup: an out-of-range index saturates to the last token, which
    /// is always the `Eof` sentinel for a well-formed stream.
    pub fn get_token(&self, index: TokenIndex) -> SyntaxToken {
        let i = (index.as_u32() as usize).min(self.tokens.len() - 1);
        self.tokens[i]
    }

    /// The token whose expanded range contains or immediately precedes
    /// `pos` within `file`: among tokens overlapping or ending at `pos`,
    /// the latest one (editor positions fall "between" characters).
    pub fn find_token_at_position(&self, file: FileId, pos: u32) -> Option<TokenIndex> {
        let in_file: Vec<&SyntaxToken> = self.tokens.iter().filter(|t| t.expanded.file == file).collect();
        let split = in_file.partition_point(|t| t.expanded.start <= pos);
        let candidate = split.checked_sub(1)?;
        Some(in_file[candidate].index)
    }

    pub fn spelled_range(&self, index: TokenIndex) -> ExpandedRange {
        self.get_token(index).spelled
    }

    pub fn expanded_range(&self, index: TokenIndex) -> ExpandedRange {
        self.get_token(index).expanded
    }

    /// An AST range's expanded range is the span from its first token's
    /// start to its last token's end (§4.5).
    pub fn expanded_range_of(&self, range: SyntaxRange) -> ExpandedRange {
        let first = self.get_token(TokenIndex::from_raw(range.start));
        if range.end <= range.start {
            return first.expanded;
        }
        let last = self.get_token(TokenIndex::from_raw(range.end - 1));
        ExpandedRange { file: first.expanded.file, start: first.expanded.start, end: last.expanded.end }
    }

    /// An iterator view over `[range.start, range.end)`, for visitors that
    /// walk a node's tokens without caring about the rest of the stream.
    pub fn iter_range(&self, range: SyntaxRange) -> impl Iterator<Item = &SyntaxToken> {
        let start = range.start as usize;
        let end = (range.end as usize).min(self.tokens.len());
        self.tokens[start.min(end)..end].iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::SpelledRange;

    fn pp(kind: TokenKind, file: FileId, start: u32, end: u32) -> PpToken {
        PpToken { kind, name: None, file, span: SpelledRange::new(start, end), first_on_line: false, has_leading_whitespace: false, resolved_value: None, invocation: None }
    }

    #[test]
    fn get_token_saturates_at_eof() {
        let toks = vec![pp(TokenKind::Semi, FileId::default(), 0, 1), pp(TokenKind::Eof, FileId::default(), 1, 1)];
        let ctx = LexContext::from_pp_tokens(&toks);
        let far = ctx.get_token(TokenIndex::from_raw(50));
        assert_eq!(far.kind, TokenKind::Eof);
    }

    #[test]
    fn find_token_at_position_picks_overlapping_token() {
        let file = FileId::default();
        let toks = vec![pp(TokenKind::Ident, file, 0, 3), pp(TokenKind::Semi, file, 3, 4), pp(TokenKind::Eof, file, 4, 4)];
        let ctx = LexContext::from_pp_tokens(&toks);
        let idx = ctx.find_token_at_position(file, 1).unwrap();
        assert_eq!(ctx.get_token(idx).kind, TokenKind::Ident);
    }

    #[test]
    fn find_token_at_position_picks_latest_among_ties() {
        // Position 3 sits exactly between the identifier (ending at 3) and
        // the semicolon (starting at 3): the rule picks the latest.
        let file = FileId::default();
        let toks = vec![pp(TokenKind::Ident, file, 0, 3), pp(TokenKind::Semi, file, 3, 4), pp(TokenKind::Eof, file, 4, 4)];
        let ctx = LexContext::from_pp_tokens(&toks);
        let idx = ctx.find_token_at_position(file, 3).unwrap();
        assert_eq!(ctx.get_token(idx).kind, TokenKind::Semi);
    }

    #[test]
    fn find_token_at_position_ignores_other_files() {
        let mut ctx_src = glsl_core::SourceContext::new();
        let file_a = ctx_src.add_buffer("a", "x;");
        let file_b = ctx_src.add_buffer("b", "y;");
        let toks = vec![pp(TokenKind::Ident, file_a, 0, 1), pp(TokenKind::Eof, file_a, 2, 2)];
        let ctx = LexContext::from_pp_tokens(&toks);
        assert!(ctx.find_token_at_position(file_a, 0).is_some());
        assert!(ctx.find_token_at_position(file_b, 0).is_none());
    }

    #[test]
    fn expanded_range_of_spans_first_to_last_token() {
        let file = FileId::default();
        let toks = vec![
            pp(TokenKind::KwTypeName, file, 0, 3),
            pp(TokenKind::Ident, file, 4, 5),
            pp(TokenKind::Semi, file, 5, 6),
            pp(TokenKind::Eof, file, 6, 6),
        ];
        let ctx = LexContext::from_pp_tokens(&toks);
        let range = ctx.expanded_range_of(SyntaxRange::new(0, 3));
        assert_eq!(range.start, 0);
        assert_eq!(range.end, 6);
    }

    #[test]
    fn iter_range_yields_only_the_requested_slice() {
        let file = FileId::default();
        let toks = vec![pp(TokenKind::KwTypeName, file, 0, 3), pp(TokenKind::Ident, file, 4, 5), pp(TokenKind::Semi, file, 5, 6), pp(TokenKind::Eof, file, 6, 6)];
        let ctx = LexContext::from_pp_tokens(&toks);
        let kinds: Vec<_> = ctx.iter_range(SyntaxRange::new(1, 3)).map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenKind::Ident, TokenKind::Semi]);
    }
}
