//! `#if`/`#elif` constant expression evaluation: a precedence-climbing
//! parser over already macro-expanded tokens, computing over 64-bit signed
//! integers (§4.4).

use crate::lexer::{PpToken, TokenKind};

/// Binary operator precedence, 1 = highest binds tightest. Mirrors the
/// twelve-level table: `*` `/` `%` above `+` `-` above shifts above
/// relational above equality above `&` above `^` above `|` above `&&` above
/// `||`.
fn binary_precedence(kind: TokenKind) -> Option<u8> {
    Some(match kind {
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => 3,
        TokenKind::Plus | TokenKind::Minus => 4,
        TokenKind::Shl | TokenKind::Shr => 5,
        TokenKind::Lt | TokenKind::LtEq | TokenKind::Gt | TokenKind::GtEq => 6,
        TokenKind::EqEq | TokenKind::NotEq => 7,
        TokenKind::Amp => 8,
        TokenKind::Caret => 9,
        TokenKind::Pipe => 10,
        TokenKind::AmpAmp => 11,
        TokenKind::PipePipe => 12,
        _ => return None,
    })
}

pub struct Evaluator<'t> {
    tokens: &'t [PpToken],
    source: &'t str,
    pos: usize,
    /// Division/modulo by zero is reported once but still yields 0 so
    /// evaluation can continue (§4.4: "diagnosable").
    pub div_by_zero: bool,
}

impl<'t> Evaluator<'t> {
    pub fn new(tokens: &'t [PpToken], source: &'t str) -> Self {
        Self { tokens, source, pos: 0, div_by_zero: false }
    }

    /// Evaluates the whole token slice as one constant expression. `true`
    /// iff the final integer is non-zero.
    pub fn eval(&mut self) -> bool {
        let value = self.parse_binary(13);
        value != 0
    }

    fn peek(&self) -> TokenKind {
        self.tokens.get(self.pos).map(|t| t.kind).unwrap_or(TokenKind::Eof)
    }

    fn bump(&mut self) -> Option<&'t PpToken> {
        let tok = self.tokens.get(self.pos);
        self.pos += 1;
        tok
    }

    /// `max_prec` is one past the loosest level this call is allowed to
    /// consume; recursing with a smaller number climbs to tighter-binding
    /// operators.
    fn parse_binary(&mut self, max_prec: u8) -> i64 {
        let mut lhs = self.parse_unary();
        loop {
            let Some(prec) = binary_precedence(self.peek()) else { break };
            if prec >= max_prec {
                break;
            }
            let op = self.bump().unwrap().kind;
            let rhs = self.parse_binary(prec);
            lhs = self.apply_binary(op, lhs, rhs);
        }
        lhs
    }

    fn apply_binary(&mut self, op: TokenKind, lhs: i64, rhs: i64) -> i64 {
        match op {
            TokenKind::Star => lhs.wrapping_mul(rhs),
            TokenKind::Slash => {
                if rhs == 0 {
                    self.div_by_zero = true;
                    0
                } else {
                    lhs.wrapping_div(rhs)
                }
            }
            TokenKind::Percent => {
                if rhs == 0 {
                    self.div_by_zero = true;
                    0
                } else {
                    lhs.wrapping_rem(rhs)
                }
            }
            TokenKind::Plus => lhs.wrapping_add(rhs),
            TokenKind::Minus => lhs.wrapping_sub(rhs),
            TokenKind::Shl => lhs.wrapping_shl(rhs as u32),
            TokenKind::Shr => lhs.wrapping_shr(rhs as u32),
            TokenKind::Lt => (lhs < rhs) as i64,
            TokenKind::LtEq => (lhs <= rhs) as i64,
            TokenKind::Gt => (lhs > rhs) as i64,
            TokenKind::GtEq => (lhs >= rhs) as i64,
            TokenKind::EqEq => (lhs == rhs) as i64,
            TokenKind::NotEq => (lhs != rhs) as i64,
            TokenKind::Amp => lhs & rhs,
            TokenKind::Caret => lhs ^ rhs,
            TokenKind::Pipe => lhs | rhs,
            TokenKind::AmpAmp => ((lhs != 0) && (rhs != 0)) as i64,
            TokenKind::PipePipe => ((lhs != 0) || (rhs != 0)) as i64,
            _ => unreachable!("not a binary operator"),
        }
    }

    fn parse_unary(&mut self) -> i64 {
        match self.peek() {
            TokenKind::Plus => {
                self.bump();
                self.parse_unary()
            }
            TokenKind::Minus => {
                self.bump();
                self.parse_unary().wrapping_neg()
            }
            TokenKind::Tilde => {
                self.bump();
                !self.parse_unary()
            }
            TokenKind::Bang => {
                self.bump();
                (self.parse_unary() == 0) as i64
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> i64 {
        match self.peek() {
            TokenKind::LParen => {
                self.bump();
                let value = self.parse_binary(13);
                if self.peek() == TokenKind::RParen {
                    self.bump();
                }
                value
            }
            TokenKind::IntLiteral => {
                let tok = self.bump().unwrap();
                tok.resolved_value.unwrap_or_else(|| parse_int_literal(tok.text(self.source)))
            }
            TokenKind::Ident => {
                // An identifier that survived macro expansion (and wasn't a
                // pre-resolved `defined` form) is unknown: evaluates to 0
                // (§4.4).
                self.bump();
                0
            }
            _ => {
                self.bump();
                0
            }
        }
    }
}

/// Parses a GLSL integer literal's numeric value, ignoring any `u`/`U`
/// suffix and honoring `0x`/`0` radix prefixes.
fn parse_int_literal(text: &str) -> i64 {
    let trimmed = text.trim_end_matches(['u', 'U']);
    if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).unwrap_or(0);
    }
    if trimmed.len() > 1 && trimmed.starts_with('0') {
        return i64::from_str_radix(&trimmed[1..], 8).unwrap_or(0);
    }
    trimmed.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::SpelledRange;
    use glsl_core::FileId;

    fn tok(kind: TokenKind, start: u32, end: u32) -> PpToken {
        PpToken {
            kind,
            name: None,
            file: FileId::default(),
            span: SpelledRange::new(start, end),
            first_on_line: false,
            has_leading_whitespace: false,
            resolved_value: None,
            invocation: None,
        }
    }

    fn eval(source: &str, toks: Vec<PpToken>) -> bool {
        Evaluator::new(&toks, source).eval()
    }

    #[test]
    fn literal_zero_is_false() {
        let src = "0";
        assert!(!eval(src, vec![tok(TokenKind::IntLiteral, 0, 1)]));
    }

    #[test]
    fn arithmetic_precedence_multiply_before_add() {
        // 1 + 2 * 3 == 7 (non-zero => true)
        let src = "1+2*3";
        let toks = vec![
            tok(TokenKind::IntLiteral, 0, 1),
            tok(TokenKind::Plus, 1, 2),
            tok(TokenKind::IntLiteral, 2, 3),
            tok(TokenKind::Star, 3, 4),
            tok(TokenKind::IntLiteral, 4, 5),
        ];
        assert!(eval(src, toks));
    }

    #[test]
    fn division_by_zero_yields_zero_and_is_flagged() {
        let src = "1/0";
        let toks = vec![
            tok(TokenKind::IntLiteral, 0, 1),
            tok(TokenKind::Slash, 1, 2),
            tok(TokenKind::IntLiteral, 2, 3),
        ];
        let mut evaluator = Evaluator::new(&toks, src);
        let value = evaluator.parse_binary(13);
        assert_eq!(value, 0);
        assert!(evaluator.div_by_zero);
    }

    #[test]
    fn unknown_identifier_evaluates_to_zero() {
        let src = "UNDEFINED_NAME";
        let toks = vec![tok(TokenKind::Ident, 0, 14)];
        assert!(!eval(src, toks));
    }

    #[test]
    fn resolved_value_overrides_spelled_text() {
        // A synthetic `defined(FOO)` result: the span still points at `FOO`
        // (for diagnostics) but the value comes from resolved_value.
        let src = "FOO";
        let mut synthetic = tok(TokenKind::IntLiteral, 0, 3);
        synthetic.resolved_value = Some(1);
        assert!(eval(src, vec![synthetic]));
    }

    #[test]
    fn parenthesized_subexpression_overrides_precedence() {
        // (1 + 2) * 3 == 9
        let src = "(1+2)*3";
        let toks = vec![
            tok(TokenKind::LParen, 0, 1),
            tok(TokenKind::IntLiteral, 1, 2),
            tok(TokenKind::Plus, 2, 3),
            tok(TokenKind::IntLiteral, 3, 4),
            tok(TokenKind::RParen, 4, 5),
            tok(TokenKind::Star, 5, 6),
            tok(TokenKind::IntLiteral, 6, 7),
        ];
        assert!(eval(src, toks));
    }

    #[test]
    fn logical_and_short_circuits_to_boolean_result() {
        let src = "0&&1";
        let toks = vec![
            tok(TokenKind::IntLiteral, 0, 1),
            tok(TokenKind::AmpAmp, 1, 3),
            tok(TokenKind::IntLiteral, 3, 4),
        ];
        assert!(!eval(src, toks));
    }

    #[test]
    fn hex_and_octal_literals_parse() {
        assert_eq!(parse_int_literal("0x1F"), 31);
        assert_eq!(parse_int_literal("017"), 15);
        assert_eq!(parse_int_literal("42u"), 42);
    }
}
