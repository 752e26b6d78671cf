//! Bitset over [`TokenKind`] for O(1) "is this token in the FIRST/recovery
//! set" checks.
//!
//! GLSL's keyword surface is wider than the 64 bits a `u64` bitset would
//! give a one-variant-per-keyword token enum; backed by `u128` instead, the
//! same const-fn shape comfortably covers every `TokenKind` variant.

use crate::lexer::kind::TokenKind;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u128);

impl TokenSet {
    pub const EMPTY: TokenSet = TokenSet(0);

    pub const fn new(kinds: &[TokenKind]) -> TokenSet {
        let mut bits: u128 = 0;
        let mut i = 0;
        while i < kinds.len() {
            bits |= 1u128 << (kinds[i] as u8);
            i += 1;
        }
        TokenSet(bits)
    }

    pub const fn single(kind: TokenKind) -> TokenSet {
        TokenSet(1u128 << (kind as u8))
    }

    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }

    pub const fn contains(self, kind: TokenKind) -> bool {
        (self.0 & (1u128 << (kind as u8))) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TokenSet({:#x})", self.0)
    }
}

/// Named FIRST/recovery sets used by the parser's grammar productions.
pub mod token_sets {
    use super::TokenSet;
    use crate::lexer::kind::TokenKind::*;

    pub const EXPR_FIRST: TokenSet = TokenSet::new(&[
        Ident, IntLiteral, FloatLiteral, KwTrue, KwFalse, LParen, Plus, Minus, Bang, Tilde,
        PlusPlus, MinusMinus, KwTypeName, KwVoid,
    ]);

    pub const STMT_FIRST: TokenSet = TokenSet::new(&[
        LBrace, KwIf, KwWhile, KwDo, KwFor, KwSwitch, KwCase, KwDefault, KwBreak, KwContinue,
        KwDiscard, KwReturn, Semi,
    ]);

    pub const TYPE_START: TokenSet = TokenSet::new(&[KwTypeName, KwVoid, KwStruct, Ident]);

    pub const QUALIFIER_START: TokenSet =
        TokenSet::new(&[KwQualifier, KwConst, KwLayout, KwPrecision]);

    pub const STMT_RECOVERY: TokenSet = TokenSet::new(&[Semi, RBrace]);
    pub const PAREN_RECOVERY: TokenSet = TokenSet::new(&[RParen]);
    pub const BRACKET_RECOVERY: TokenSet = TokenSet::new(&[RBracket]);
    pub const BRACE_RECOVERY: TokenSet = TokenSet::new(&[RBrace]);
    pub const DECL_START: TokenSet = TYPE_START.union(QUALIFIER_START);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::kind::TokenKind;

    #[test]
    fn contains_and_excludes() {
        let set = TokenSet::new(&[TokenKind::KwIf, TokenKind::KwElse]);
        assert!(set.contains(TokenKind::KwIf));
        assert!(set.contains(TokenKind::KwElse));
        assert!(!set.contains(TokenKind::KwFor));
    }

    #[test]
    fn union_combines() {
        let a = TokenSet::single(TokenKind::Semi);
        let b = TokenSet::single(TokenKind::RBrace);
        let u = a.union(b);
        assert!(u.contains(TokenKind::Semi));
        assert!(u.contains(TokenKind::RBrace));
        assert!(!u.contains(TokenKind::LBrace));
    }

    #[test]
    fn empty_is_empty() {
        assert!(TokenSet::EMPTY.is_empty());
        assert!(!TokenSet::single(TokenKind::Eof).is_empty());
    }

    #[test]
    fn high_discriminants_fit_in_u128() {
        // Garbage/Eof sit near the end of the enum, past bit 63.
        let set = TokenSet::single(TokenKind::Eof);
        assert!(set.contains(TokenKind::Eof));
        assert!(!set.contains(TokenKind::Garbage));
    }
}
