//! Expression grammar: a Pratt-style cascade from loosest (comma) to
//! tightest (primary), mirroring the precedence table already used by the
//! preprocessor's constant-expression evaluator (§4.9).

use glsl_core::Atom;

use crate::ast::expr::{AssignOp, BinaryOp, UnaryOp};
use crate::ast::{ExprId, SyntaxRange};
use crate::ast::const_value::{ConstValue, Scalar};
use crate::lexer::TokenKind;
use crate::parser::core::Parser;
use crate::parser::recovery::RecoveryMode;
use crate::types::ScalarKind;

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    Some(match kind {
        TokenKind::Eq => AssignOp::Assign,
        TokenKind::PlusEq => AssignOp::Add,
        TokenKind::MinusEq => AssignOp::Sub,
        TokenKind::StarEq => AssignOp::Mul,
        TokenKind::SlashEq => AssignOp::Div,
        TokenKind::PercentEq => AssignOp::Mod,
        TokenKind::ShlEq => AssignOp::Shl,
        TokenKind::ShrEq => AssignOp::Shr,
        TokenKind::AmpEq => AssignOp::BitAnd,
        TokenKind::PipeEq => AssignOp::BitOr,
        TokenKind::CaretEq => AssignOp::BitXor,
        _ => return None,
    })
}

/// `max_prec` follows the evaluator's convention: 1 binds tightest, larger
/// numbers bind looser. `^^` (logical xor) lexes but has no `BinaryOp`
/// counterpart, so it is deliberately absent here; a stray `^^` simply
/// fails to match and falls through to the caller's own recovery.
fn binary_op(kind: TokenKind) -> Option<(BinaryOp, u8)> {
    Some(match kind {
        TokenKind::Star => (BinaryOp::Mul, 3),
        TokenKind::Slash => (BinaryOp::Div, 3),
        TokenKind::Percent => (BinaryOp::Mod, 3),
        TokenKind::Plus => (BinaryOp::Add, 4),
        TokenKind::Minus => (BinaryOp::Sub, 4),
        TokenKind::Shl => (BinaryOp::Shl, 5),
        TokenKind::Shr => (BinaryOp::Shr, 5),
        TokenKind::Lt => (BinaryOp::Lt, 6),
        TokenKind::LtEq => (BinaryOp::Le, 6),
        TokenKind::Gt => (BinaryOp::Gt, 6),
        TokenKind::GtEq => (BinaryOp::Ge, 6),
        TokenKind::EqEq => (BinaryOp::Eq, 7),
        TokenKind::NotEq => (BinaryOp::Ne, 7),
        TokenKind::Amp => (BinaryOp::BitAnd, 8),
        TokenKind::Caret => (BinaryOp::BitXor, 9),
        TokenKind::Pipe => (BinaryOp::BitOr, 10),
        TokenKind::AmpAmp => (BinaryOp::And, 11),
        TokenKind::PipePipe => (BinaryOp::Or, 12),
        _ => return None,
    })
}

impl<'m, 'p, 'a, 'lx> Parser<'m, 'p, 'a, 'lx> {
    /// Entry point used by statement/initializer contexts that just need
    /// "an expression" without caring which production produced it.
    pub(in crate::parser) fn parse_expr(&mut self) -> ExprId {
        self.parse_comma_expr()
    }

    /// `expression` in the grammar: left-associative `,` chaining over
    /// assignment-expressions.
    pub(in crate::parser) fn parse_comma_expr(&mut self) -> ExprId {
        let start = self.pos;
        let mut lhs = self.parse_assignment_expr();
        while self.at(TokenKind::Comma) {
            self.bump();
            let rhs = self.parse_assignment_expr();
            let range = self.range_from(start);
            lhs = self.builder.build_comma(lhs, rhs, range);
        }
        lhs
    }

    /// `assignment_expression`: right-associative. The left side is parsed
    /// as a conditional-expression and only reinterpreted as an lvalue if an
    /// assignment operator actually follows, matching the grammar's
    /// ambiguity resolution without a separate lvalue sub-grammar.
    pub(in crate::parser) fn parse_assignment_expr(&mut self) -> ExprId {
        let start = self.pos;
        let lhs = self.parse_conditional_expr();
        if let Some(op) = assign_op(self.kind()) {
            self.bump();
            let rhs = self.parse_assignment_expr();
            let range = self.range_from(start);
            return self.builder.build_assignment(op, lhs, rhs, range);
        }
        lhs
    }

    /// `conditional_expression`: `cond ? then : else`, right-associative in
    /// the else-branch.
    fn parse_conditional_expr(&mut self) -> ExprId {
        let start = self.pos;
        let cond = self.parse_binary_expr(13);
        if self.at(TokenKind::Question) {
            self.bump();
            let then_branch = self.parse_assignment_expr();
            self.expect(TokenKind::Colon, "`:`");
            let else_branch = self.parse_assignment_expr();
            let range = self.range_from(start);
            return self.builder.build_ternary(cond, then_branch, else_branch, range);
        }
        cond
    }

    /// Precedence-climbing over the twelve binary levels; `max_prec` is one
    /// past the loosest operator this call may consume.
    fn parse_binary_expr(&mut self, max_prec: u8) -> ExprId {
        let start = self.pos;
        let mut lhs = self.parse_unary_expr();
        loop {
            let Some((op, prec)) = binary_op(self.kind()) else { break };
            if prec >= max_prec {
                break;
            }
            self.bump();
            let rhs = self.parse_binary_expr(prec);
            let range = self.range_from(start);
            lhs = self.builder.build_binary(op, lhs, rhs, range);
        }
        lhs
    }

    /// `unary_expression`: prefix `+ - ! ~ ++ --`. Unary `+` is a no-op
    /// (GLSL defines no overload for it) so it's consumed without building
    /// a node.
    fn parse_unary_expr(&mut self) -> ExprId {
        let start = self.pos;
        let op = match self.kind() {
            TokenKind::Plus => {
                self.bump();
                return self.parse_unary_expr();
            }
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            TokenKind::PlusPlus => Some(UnaryOp::PreInc),
            TokenKind::MinusMinus => Some(UnaryOp::PreDec),
            _ => None,
        };
        let Some(op) = op else { return self.parse_postfix_expr() };
        if !self.enter_recursion() {
            return self.error_expr_here();
        }
        self.bump();
        let operand = self.parse_unary_expr();
        self.exit_recursion();
        let range = self.range_from(start);
        self.builder.build_unary(op, operand, range)
    }

    /// Postfix chain: indexing, field/swizzle access, `.length()`, and
    /// trailing `++`/`--`. Function and constructor calls are handled in
    /// `parse_primary_expr` directly after a bare name, since GLSL never
    /// calls the *result* of another postfix expression.
    fn parse_postfix_expr(&mut self) -> ExprId {
        let start = self.pos;
        let mut expr = self.parse_primary_expr();
        loop {
            match self.kind() {
                TokenKind::LBracket => {
                    self.bump();
                    self.push_delimiter(TokenKind::LBracket);
                    let index = self.parse_expr();
                    if !self.expect(TokenKind::RBracket, "`]`") {
                        self.recover(RecoveryMode::Bracket);
                    } else {
                        self.pop_delimiter();
                    }
                    let range = self.range_from(start);
                    expr = self.builder.build_index_access(expr, index, range);
                }
                TokenKind::Dot => {
                    self.bump();
                    if self.at(TokenKind::Ident) || self.at(TokenKind::KwTypeName) || self.at(TokenKind::KwQualifier) {
                        let tok = self.current();
                        let member = tok.name.expect("Ident/KwTypeName/KwQualifier always carry an atom");
                        let is_length = self.is_length_atom(member);
                        if is_length && self.at_nth(1, TokenKind::LParen) {
                            self.bump();
                            self.bump();
                            self.push_delimiter(TokenKind::LParen);
                            if !self.expect(TokenKind::RParen, "`)`") {
                                self.recover(RecoveryMode::Paren);
                            } else {
                                self.pop_delimiter();
                            }
                            let range = self.range_from(start);
                            expr = self.builder.build_length(expr, range);
                        } else {
                            self.bump();
                            let range = self.range_from(start);
                            expr = self.builder.build_member_access(expr, member, range);
                        }
                    } else {
                        self.error_expected("a field name");
                        expr = self.error_expr_here();
                    }
                }
                TokenKind::PlusPlus => {
                    self.bump();
                    let range = self.range_from(start);
                    expr = self.builder.build_unary(UnaryOp::PostInc, expr, range);
                }
                TokenKind::MinusMinus => {
                    self.bump();
                    let range = self.range_from(start);
                    expr = self.builder.build_unary(UnaryOp::PostDec, expr, range);
                }
                _ => break,
            }
        }
        expr
    }

    fn is_length_atom(&self, atom: Atom) -> bool {
        self.builder.atoms.resolve(atom) == "length"
    }

    /// Primary expressions: literals, parenthesized expressions, and
    /// identifiers/type names (the latter only meaningfully followed by a
    /// call's `(`, as a function or constructor invocation).
    fn parse_primary_expr(&mut self) -> ExprId {
        let start = self.pos;
        match self.kind() {
            TokenKind::IntLiteral => {
                let value = self.parse_int_literal_text(self.current_text());
                self.bump();
                let range = self.range_from(start);
                let (kind, scalar) = value;
                let ty = self.builder.types.scalar(kind);
                self.builder.build_literal(ConstValue::scalar(kind, scalar), ty, range)
            }
            TokenKind::FloatLiteral => {
                let value = parse_float_literal_text(self.current_text());
                self.bump();
                let range = self.range_from(start);
                let ty = self.builder.types.scalar(ScalarKind::Float);
                self.builder.build_literal(ConstValue::scalar(ScalarKind::Float, Scalar::Float(value)), ty, range)
            }
            TokenKind::KwTrue => {
                self.bump();
                let range = self.range_from(start);
                let ty = self.builder.types.scalar(ScalarKind::Bool);
                self.builder.build_literal(ConstValue::scalar(ScalarKind::Bool, Scalar::Bool(true)), ty, range)
            }
            TokenKind::KwFalse => {
                self.bump();
                let range = self.range_from(start);
                let ty = self.builder.types.scalar(ScalarKind::Bool);
                self.builder.build_literal(ConstValue::scalar(ScalarKind::Bool, Scalar::Bool(false)), ty, range)
            }
            TokenKind::LParen => {
                self.bump();
                self.push_delimiter(TokenKind::LParen);
                if !self.enter_recursion() {
                    return self.error_expr_here();
                }
                let inner = self.parse_expr();
                self.exit_recursion();
                if !self.expect(TokenKind::RParen, "`)`") {
                    self.recover(RecoveryMode::Paren);
                } else {
                    self.pop_delimiter();
                }
                inner
            }
            TokenKind::Ident | TokenKind::KwTypeName => {
                let tok = self.current();
                let name = tok.name.expect("Ident/KwTypeName always carry an atom");
                self.bump();
                if self.at(TokenKind::LParen) {
                    let args = self.parse_call_args();
                    let range = self.range_from(start);
                    self.builder.build_call(name, args, range)
                } else {
                    let range = self.range_from(start);
                    self.builder.build_name_access(name, range)
                }
            }
            _ => {
                self.error_unexpected("an expression");
                self.error_expr_here()
            }
        }
    }

    /// `(` already consumed is *not* assumed here; this expects to see the
    /// opening paren itself, since call sites always check `at(LParen)`
    /// first and want a single place that owns the delimiter bookkeeping.
    fn parse_call_args(&mut self) -> Vec<ExprId> {
        self.bump();
        self.push_delimiter(TokenKind::LParen);
        let mut args = Vec::new();
        if self.at(TokenKind::KwVoid) && self.at_nth(1, TokenKind::RParen) {
            self.bump();
        } else if !self.at(TokenKind::RParen) {
            loop {
                args.push(self.parse_assignment_expr());
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        if !self.expect(TokenKind::RParen, "`)`") {
            self.recover(RecoveryMode::Paren);
        } else {
            self.pop_delimiter();
        }
        args
    }

    /// Brace-delimited initializer lists (`{ a, b, c }`), tracked on
    /// `ilist_marks` so `IListBrace` recovery knows which nesting level to
    /// rebalance to even when lists nest inside one another.
    pub(in crate::parser) fn parse_initializer_list_expr(&mut self, target: crate::types::TypeId) -> ExprId {
        let start = self.pos;
        self.bump();
        self.push_delimiter(TokenKind::LBrace);
        self.ilist_marks.push(self.delimiter_stack.len());
        let mut elems = Vec::new();
        if !self.at(TokenKind::RBrace) {
            loop {
                if self.at(TokenKind::LBrace) {
                    elems.push(self.parse_initializer_list_expr(target));
                } else {
                    elems.push(self.parse_assignment_expr());
                }
                if !self.eat(TokenKind::Comma) {
                    break;
                }
                if self.at(TokenKind::RBrace) {
                    break;
                }
            }
        }
        self.ilist_marks.pop();
        if !self.expect(TokenKind::RBrace, "`}`") {
            self.recover(RecoveryMode::IListBrace);
        } else {
            self.pop_delimiter();
        }
        let range = self.range_from(start);
        let (id, _ty) = self.builder.build_initializer_list(target, elems, range);
        id
    }

    fn parse_int_literal_text(&self, text: &str) -> (ScalarKind, Scalar) {
        let trimmed = text.trim_end_matches(['u', 'U']);
        let is_unsigned = trimmed.len() != text.len();
        let raw: u64 = if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
            u64::from_str_radix(hex, 16).unwrap_or(0)
        } else if trimmed.len() > 1 && trimmed.starts_with('0') {
            u64::from_str_radix(&trimmed[1..], 8).unwrap_or(0)
        } else {
            trimmed.parse().unwrap_or(0)
        };
        if is_unsigned {
            (ScalarKind::UInt, Scalar::UInt(raw))
        } else {
            (ScalarKind::Int, Scalar::Int(raw as i64))
        }
    }

    /// `AstBuilder::error_expr` is private to that module; every `build_*`
    /// method already falls back to it internally on a type mismatch, but
    /// the parser needs its own error node when it never gets as far as
    /// calling a `build_*` method at all (e.g. an unexpected token where an
    /// expression was expected). `push_expr` is crate-visible for exactly
    /// this kind of direct construction.
    pub(in crate::parser) fn error_expr_here(&mut self) -> ExprId {
        let range = self.current_range();
        let error_ty = self.builder.types.error_type();
        self.builder.module.push_expr(crate::ast::ExprKind::Error, range, error_ty, false)
    }
}

fn parse_float_literal_text(text: &str) -> f64 {
    let trimmed = text.trim_end_matches(['f', 'F', 'l', 'L']);
    trimmed.parse().unwrap_or(0.0)
}
