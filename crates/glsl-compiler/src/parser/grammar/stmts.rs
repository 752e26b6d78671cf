//! Statement grammar (§4.9 "statement forms"). `break`/`continue`/`case`/
//! `default` placement is checked here at parse time against the scope-level
//! stack rather than deferred to the resolver, since the diagnostic only
//! needs lexical nesting, not type information.

use crate::ast::StmtKind;
use crate::lexer::TokenKind;
use crate::parser::core::Parser;
use crate::parser::recovery::RecoveryMode;
use crate::symbols::LevelKind;

impl<'m, 'p, 'a, 'lx> Parser<'m, 'p, 'a, 'lx> {
    /// A `{ ... }` block that pushes its own scope level — every nested
    /// compound statement except a function's own body (see
    /// `parse_compound_stmt_in_current_scope`).
    pub(in crate::parser) fn parse_compound_stmt(&mut self) -> crate::ast::StmtId {
        self.builder.symbols.push_level(LevelKind::Block);
        let id = self.parse_compound_stmt_in_current_scope();
        self.builder.symbols.pop_level();
        id
    }

    /// Parses `{ stmt* }` without pushing a new scope level. A function body
    /// uses this directly so its locals share the parameter scope; every
    /// other compound statement wraps this with its own `Block` level via
    /// `parse_compound_stmt`.
    pub(in crate::parser) fn parse_compound_stmt_in_current_scope(&mut self) -> crate::ast::StmtId {
        let start = self.pos;
        if !self.expect(TokenKind::LBrace, "`{`") {
            return self.builder.register_stmt(StmtKind::Error, self.range_from(start));
        }
        self.push_delimiter(TokenKind::LBrace);
        let mut stmts = Vec::new();
        while !self.should_stop() && !self.at(TokenKind::RBrace) {
            stmts.extend(self.parse_stmt());
        }
        if !self.expect(TokenKind::RBrace, "`}`") {
            self.recover(RecoveryMode::Brace);
        } else {
            self.pop_delimiter();
        }
        self.builder.register_stmt(StmtKind::Compound(stmts), self.range_from(start))
    }

    /// Returns more than one id only for a `DeclStmt` produced from a
    /// declaration that itself expanded to several decls (`struct S {} s;`).
    fn parse_stmt(&mut self) -> Vec<crate::ast::StmtId> {
        let start = self.pos;
        match self.kind() {
            TokenKind::LBrace => vec![self.parse_compound_stmt()],
            TokenKind::Semi => {
                self.bump();
                vec![self.builder.register_stmt(StmtKind::Empty, self.range_from(start))]
            }
            TokenKind::KwIf => vec![self.parse_if_stmt()],
            TokenKind::KwFor => vec![self.parse_for_stmt()],
            TokenKind::KwWhile => vec![self.parse_while_stmt()],
            TokenKind::KwDo => vec![self.parse_do_while_stmt()],
            TokenKind::KwSwitch => vec![self.parse_switch_stmt()],
            TokenKind::KwCase => vec![self.parse_case_label()],
            TokenKind::KwDefault => vec![self.parse_default_label()],
            TokenKind::KwBreak => vec![self.parse_break_stmt()],
            TokenKind::KwContinue => vec![self.parse_continue_stmt()],
            TokenKind::KwReturn => vec![self.parse_return_stmt()],
            TokenKind::KwDiscard => vec![self.parse_discard_stmt()],
            _ if self.at_local_decl_start() => self.parse_decl_stmt(),
            _ => vec![self.parse_expr_stmt()],
        }
    }

    fn parse_if_stmt(&mut self) -> crate::ast::StmtId {
        let start = self.pos;
        self.bump();
        self.expect(TokenKind::LParen, "`(`");
        self.push_delimiter(TokenKind::LParen);
        let cond = self.parse_expr();
        if !self.expect(TokenKind::RParen, "`)`") {
            self.recover(RecoveryMode::Paren);
        } else {
            self.pop_delimiter();
        }
        let then_branch = self.parse_substmt();
        let else_branch = if self.eat(TokenKind::KwElse) { Some(self.parse_substmt()) } else { None };
        self.builder.register_stmt(StmtKind::If { cond, then_branch, else_branch }, self.range_from(start))
    }

    /// A controlled statement (`if`'s then/else arm, `while`/`for`'s body)
    /// may itself be a bare statement or a compound one; either way it gets
    /// its own `Block` level so a single-statement `if (c) int x;` doesn't
    /// leak `x` past the `if`.
    fn parse_substmt(&mut self) -> crate::ast::StmtId {
        if self.at(TokenKind::LBrace) {
            self.parse_compound_stmt()
        } else {
            self.builder.symbols.push_level(LevelKind::Block);
            let ids = self.parse_stmt();
            self.builder.symbols.pop_level();
            match ids.len() {
                1 => ids.into_iter().next().unwrap(),
                _ => {
                    let range = self.range_from(self.pos);
                    self.builder.register_stmt(StmtKind::Compound(ids), range)
                }
            }
        }
    }

    fn parse_for_stmt(&mut self) -> crate::ast::StmtId {
        let start = self.pos;
        self.bump();
        self.expect(TokenKind::LParen, "`(`");
        self.push_delimiter(TokenKind::LParen);
        self.builder.symbols.push_level(LevelKind::Loop);

        let init = if self.at(TokenKind::Semi) {
            self.bump();
            None
        } else if self.at_local_decl_start() {
            let ids = self.parse_decl_stmt();
            Some(self.wrap_stmts(ids))
        } else {
            Some(self.parse_expr_stmt())
        };

        let cond = if self.at(TokenKind::Semi) { None } else { Some(self.parse_expr()) };
        self.expect_semi();

        let iter = if self.at(TokenKind::RParen) { None } else { Some(self.parse_expr()) };
        if !self.expect(TokenKind::RParen, "`)`") {
            self.recover(RecoveryMode::Paren);
        } else {
            self.pop_delimiter();
        }

        let body = self.parse_substmt();
        self.builder.symbols.pop_level();
        self.builder.register_stmt(StmtKind::For { init, cond, iter, body }, self.range_from(start))
    }

    fn parse_while_stmt(&mut self) -> crate::ast::StmtId {
        let start = self.pos;
        self.bump();
        self.expect(TokenKind::LParen, "`(`");
        self.push_delimiter(TokenKind::LParen);
        let cond = self.parse_expr();
        if !self.expect(TokenKind::RParen, "`)`") {
            self.recover(RecoveryMode::Paren);
        } else {
            self.pop_delimiter();
        }
        self.builder.symbols.push_level(LevelKind::Loop);
        let body = self.parse_substmt();
        self.builder.symbols.pop_level();
        self.builder.register_stmt(StmtKind::While { cond, body }, self.range_from(start))
    }

    fn parse_do_while_stmt(&mut self) -> crate::ast::StmtId {
        let start = self.pos;
        self.bump();
        self.builder.symbols.push_level(LevelKind::Loop);
        let body = self.parse_substmt();
        self.builder.symbols.pop_level();
        self.expect(TokenKind::KwWhile, "`while`");
        self.expect(TokenKind::LParen, "`(`");
        self.push_delimiter(TokenKind::LParen);
        let cond = self.parse_expr();
        if !self.expect(TokenKind::RParen, "`)`") {
            self.recover(RecoveryMode::Paren);
        } else {
            self.pop_delimiter();
        }
        self.expect_semi();
        self.builder.register_stmt(StmtKind::DoWhile { body, cond }, self.range_from(start))
    }

    fn parse_switch_stmt(&mut self) -> crate::ast::StmtId {
        let start = self.pos;
        self.bump();
        self.expect(TokenKind::LParen, "`(`");
        self.push_delimiter(TokenKind::LParen);
        let value = self.parse_expr();
        if !self.expect(TokenKind::RParen, "`)`") {
            self.recover(RecoveryMode::Paren);
        } else {
            self.pop_delimiter();
        }
        self.switch_default_seen.push(false);
        self.builder.symbols.push_level(LevelKind::Switch);
        let body = self.parse_compound_stmt_in_current_scope();
        self.builder.symbols.pop_level();
        self.switch_default_seen.pop();
        self.builder.register_stmt(StmtKind::Switch { value, body }, self.range_from(start))
    }

    fn parse_case_label(&mut self) -> crate::ast::StmtId {
        let start = self.pos;
        self.bump();
        let value = self.parse_expr();
        self.expect(TokenKind::Colon, "`:`");
        if !self.builder.symbols.enclosing_kind_is(LevelKind::Switch) {
            self.builder.diagnostics.error(
                crate::diagnostics::DiagnosticKind::UnexpectedToken,
                self.lex.expanded_range_of(self.range_from(start)),
                "`case` outside a `switch` statement".to_string(),
            );
        }
        self.builder.register_stmt(StmtKind::Case(value), self.range_from(start))
    }

    fn parse_default_label(&mut self) -> crate::ast::StmtId {
        let start = self.pos;
        self.bump();
        self.expect(TokenKind::Colon, "`:`");
        if !self.builder.symbols.enclosing_kind_is(LevelKind::Switch) {
            self.builder.diagnostics.error(
                crate::diagnostics::DiagnosticKind::UnexpectedToken,
                self.lex.expanded_range_of(self.range_from(start)),
                "`default` outside a `switch` statement".to_string(),
            );
        } else if let Some(seen) = self.switch_default_seen.last_mut() {
            if *seen {
                self.builder.diagnostics.error(
                    crate::diagnostics::DiagnosticKind::DuplicateDefault,
                    self.lex.expanded_range_of(self.range_from(start)),
                    "multiple `default` labels in one `switch`".to_string(),
                );
            }
            *seen = true;
        }
        self.builder.register_stmt(StmtKind::Default, self.range_from(start))
    }

    fn parse_break_stmt(&mut self) -> crate::ast::StmtId {
        let start = self.pos;
        self.bump();
        self.expect_semi();
        if !self.builder.symbols.enclosing_kind_is(LevelKind::Loop) && !self.builder.symbols.enclosing_kind_is(LevelKind::Switch) {
            self.builder.diagnostics.error(
                crate::diagnostics::DiagnosticKind::BreakOutsideLoop,
                self.lex.expanded_range_of(self.range_from(start)),
                "`break` outside a loop or `switch`".to_string(),
            );
        }
        self.builder.register_stmt(StmtKind::Break, self.range_from(start))
    }

    fn parse_continue_stmt(&mut self) -> crate::ast::StmtId {
        let start = self.pos;
        self.bump();
        self.expect_semi();
        if !self.builder.symbols.enclosing_kind_is(LevelKind::Loop) {
            self.builder.diagnostics.error(
                crate::diagnostics::DiagnosticKind::ContinueOutsideLoop,
                self.lex.expanded_range_of(self.range_from(start)),
                "`continue` outside a loop".to_string(),
            );
        }
        self.builder.register_stmt(StmtKind::Continue, self.range_from(start))
    }

    fn parse_return_stmt(&mut self) -> crate::ast::StmtId {
        let start = self.pos;
        self.bump();
        let value = if self.at(TokenKind::Semi) { None } else { Some(self.parse_expr()) };
        self.expect_semi();
        self.builder.register_stmt(StmtKind::Return(value), self.range_from(start))
    }

    fn parse_discard_stmt(&mut self) -> crate::ast::StmtId {
        let start = self.pos;
        self.bump();
        self.expect_semi();
        self.builder.register_stmt(StmtKind::Discard, self.range_from(start))
    }

    fn parse_decl_stmt(&mut self) -> Vec<crate::ast::StmtId> {
        let start = self.pos;
        self.parse_declaration()
            .into_iter()
            .map(|decl| self.builder.register_stmt(StmtKind::DeclStmt(decl), self.range_from(start)))
            .collect()
    }

    fn parse_expr_stmt(&mut self) -> crate::ast::StmtId {
        let start = self.pos;
        let expr = self.parse_expr();
        self.expect_semi();
        self.builder.register_stmt(StmtKind::ExprStmt(Some(expr)), self.range_from(start))
    }

    /// Folds a multi-id decl-statement list (from `struct S {} s;`) into one
    /// `StmtId` for contexts like a `for`-init clause that need exactly one.
    fn wrap_stmts(&mut self, ids: Vec<crate::ast::StmtId>) -> crate::ast::StmtId {
        if ids.len() == 1 {
            return ids.into_iter().next().unwrap();
        }
        let range = self.current_range();
        self.builder.register_stmt(StmtKind::Compound(ids), range)
    }
}
