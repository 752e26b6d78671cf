//! Structured error recovery: each mode resyncs the cursor to a specific
//! token rather than skipping to the next statement boundary blindly,
//! matching the resync-target table in §4.9.

use crate::lexer::TokenKind;
use crate::parser::core::Parser;

/// Which token the parser is trying to resynchronize on after an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoveryMode {
    /// Next `;` at the current brace depth, or a closing `}` that would
    /// exit the enclosing block (stop before consuming it).
    Semi,
    /// The matching `)` at the current paren depth.
    Paren,
    /// The matching `]` at the current bracket depth.
    Bracket,
    /// The matching `}` at the current brace depth.
    Brace,
    /// The `}` that closes the innermost open initializer list, or a `;`
    /// (rebalances the brace counter back down to the list's own depth).
    IListBrace,
}

impl<'m, 'p, 'a, 'lx> Parser<'m, 'p, 'a, 'lx> {
    pub(super) fn recover(&mut self, mode: RecoveryMode) {
        match mode {
            RecoveryMode::Semi => self.recover_to_semi(),
            RecoveryMode::Paren => self.recover_to_matching(TokenKind::LParen, TokenKind::RParen),
            RecoveryMode::Bracket => self.recover_to_matching(TokenKind::LBracket, TokenKind::RBracket),
            RecoveryMode::Brace => self.recover_to_matching(TokenKind::LBrace, TokenKind::RBrace),
            RecoveryMode::IListBrace => self.recover_ilist_brace(),
        }
    }

    /// Bumps tokens, tracking brace nesting, until a `;` at the starting
    /// depth is consumed or a `}` that would close an enclosing block is
    /// reached (left unconsumed so the caller above can still see it).
    fn recover_to_semi(&mut self) {
        let mut depth: i32 = 0;
        while !self.should_stop() {
            match self.kind() {
                TokenKind::Semi if depth == 0 => {
                    self.bump();
                    return;
                }
                TokenKind::LBrace => {
                    depth += 1;
                    self.bump();
                }
                TokenKind::RBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    self.bump();
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    /// Generic nested-depth consumer for `Paren`/`Bracket`/`Brace` modes:
    /// bumps until the matching close of the delimiter type the caller just
    /// opened, counting nested opens/closes of the same kind.
    fn recover_to_matching(&mut self, open: TokenKind, close: TokenKind) {
        let mut depth: i32 = 1;
        while !self.should_stop() {
            let kind = self.kind();
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth -= 1;
                if depth == 0 {
                    self.bump();
                    return;
                }
            }
            self.bump();
        }
    }

    /// Rebalances the brace counter back down to the innermost open
    /// initializer list's own depth (tracked in `ilist_marks`), stopping at
    /// its closing `}` or at a `;` that abandons the list outright.
    fn recover_ilist_brace(&mut self) {
        let mark = match self.ilist_marks.last().copied() {
            Some(mark) => mark,
            None => return,
        };
        while !self.should_stop() {
            match self.kind() {
                TokenKind::Semi if self.delimiter_stack.len() <= mark => {
                    self.bump();
                    return;
                }
                TokenKind::LBrace => {
                    self.push_delimiter(TokenKind::LBrace);
                    self.bump();
                }
                TokenKind::RBrace => {
                    self.bump();
                    if self.pop_delimiter().is_some() && self.delimiter_stack.len() < mark {
                        return;
                    }
                    if self.delimiter_stack.len() < mark {
                        return;
                    }
                }
                _ => {
                    self.bump();
                }
            }
        }
    }
}
