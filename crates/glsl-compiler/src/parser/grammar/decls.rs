//! Declaration grammar (§4.9 "declaration forms"): precision decls,
//! struct/interface-block definitions, and the shared type-then-declarator
//! path that disambiguates a variable declaration from a function once the
//! base type and first name are in hand.

use glsl_core::Atom;

use crate::ast::aux::{ArraySpec, BlockQualifier, Initializer, QualType, StorageQualifier, TypeQualifierSeq};
use crate::ast::{Declarator, DeclId, DeclKind, DeclaratorRef, ExprKind, NodeId, StmtId, SyntaxRange};
use crate::diagnostics::DiagnosticKind;
use crate::lexer::TokenKind;
use crate::parser::core::Parser;
use crate::parser::recovery::RecoveryMode;
use crate::symbols::LevelKind;
use crate::types::TypeId;

impl<'m, 'p, 'a, 'lx> Parser<'m, 'p, 'a, 'lx> {
    fn next_decl_id(&self) -> DeclId {
        DeclId::from_raw(self.builder.module.decl_count() as u32)
    }

    fn declare(&mut self, name: Atom, decl: DeclId, index: u32, range: SyntaxRange) {
        if self.builder.symbols.declare(name, DeclaratorRef { decl, index }).is_some() {
            self.builder.diagnostics.error(
                DiagnosticKind::Redefinition,
                self.lex.expanded_range_of(range),
                format!("redefinition of `{}`", self.builder.atoms.resolve(name)),
            );
        }
    }

    /// Returns every top-level declaration produced — usually one, but a
    /// `struct S { ... } s;` pushes the struct decl and the variable decl
    /// that follows it as two distinct nodes.
    pub(in crate::parser) fn parse_declaration(&mut self) -> Vec<DeclId> {
        let start = self.pos;
        if self.eat(TokenKind::Semi) {
            return vec![self.builder.register_decl(DeclKind::Empty, self.range_from(start))];
        }
        if self.at(TokenKind::KwPrecision) {
            return vec![self.parse_precision_decl()];
        }

        let qualifiers = self.parse_qualifier_seq();

        if self.at(TokenKind::Ident) && self.at_nth(1, TokenKind::LBrace) {
            return vec![self.parse_interface_block(qualifiers, start)];
        }

        let (base_name, base_ty, struct_decl) = self.parse_type_base();
        let mut out = Vec::new();
        if let Some(id) = struct_decl {
            out.push(id);
        }

        // A lone `struct S { ... };` with no trailing declarator.
        if struct_decl.is_some() && self.at(TokenKind::Semi) {
            self.bump();
            return out;
        }

        if self.at(TokenKind::Ident) && self.at_nth(1, TokenKind::LParen) {
            out.push(self.parse_function(qualifiers, base_name, base_ty));
            return out;
        }

        out.push(self.parse_variable_decl(qualifiers, base_name, base_ty, start));
        out
    }

    fn parse_precision_decl(&mut self) -> DeclId {
        let start = self.pos;
        self.bump();
        let precision = if self.at(TokenKind::KwQualifier) {
            let tok = self.current();
            let atom = tok.name.expect("KwQualifier always carries an atom");
            self.bump();
            atom
        } else {
            self.error_expected("a precision qualifier");
            return self.builder.register_decl(DeclKind::Error, self.range_from(start));
        };
        let type_name = if self.at(TokenKind::KwTypeName) {
            let tok = self.current();
            let atom = tok.name.expect("KwTypeName always carries an atom");
            self.bump();
            atom
        } else {
            self.error_expected("a type name");
            return self.builder.register_decl(DeclKind::Error, self.range_from(start));
        };
        self.expect_semi();
        self.builder.register_decl(DeclKind::Precision { precision, type_name }, self.range_from(start))
    }

    fn parse_interface_block(&mut self, qualifiers: TypeQualifierSeq, start: u32) -> DeclId {
        let qualifier = qualifiers
            .storage
            .iter()
            .find_map(|s| match s {
                StorageQualifier::In => Some(BlockQualifier::In),
                StorageQualifier::Out => Some(BlockQualifier::Out),
                StorageQualifier::Uniform => Some(BlockQualifier::Uniform),
                StorageQualifier::Buffer => Some(BlockQualifier::Buffer),
                _ => None,
            })
            .unwrap_or(BlockQualifier::Uniform);

        let tok = self.current();
        let block_name = tok.name.expect("Ident always carries an atom");
        self.bump();

        self.expect(TokenKind::LBrace, "`{`");
        self.push_delimiter(TokenKind::LBrace);
        self.builder.symbols.push_level(LevelKind::Block);
        let mut members = Vec::new();
        while !self.should_stop() && !self.at(TokenKind::RBrace) {
            members.push(self.parse_block_field());
        }
        self.builder.symbols.pop_level();
        if !self.expect(TokenKind::RBrace, "`}`") {
            self.recover(RecoveryMode::Brace);
        } else {
            self.pop_delimiter();
        }

        let instance = if self.at(TokenKind::Ident) {
            let tok = self.current();
            let name = tok.name.expect("Ident always carries an atom");
            self.bump();
            let array_spec = self.parse_array_spec();
            Some(Declarator { name, array_spec, initializer: None, resolved_type: self.builder.types.error_type() })
        } else {
            None
        };
        self.expect_semi();

        let decl_id = self.next_decl_id();
        if let Some(d) = &instance {
            self.declare(d.name, decl_id, 0, self.range_from(start));
        } else {
            // Unnamed block: members are visible unqualified at the
            // enclosing scope (§9 open question resolution).
            for (i, &member) in members.iter().enumerate() {
                if let DeclKind::BlockField { declarators, .. } = &self.builder.module.decl(member).kind {
                    for d in declarators {
                        self.declare(d.name, member, i as u32, self.range_from(start));
                    }
                }
            }
        }

        self.builder.register_decl(DeclKind::InterfaceBlock { qualifier, block_name, members, instance }, self.range_from(start))
    }

    fn parse_block_field(&mut self) -> DeclId {
        let start = self.pos;
        let qualifiers = self.parse_qualifier_seq();
        let (base_name, base_ty, _) = self.parse_type_base();
        let declarators = self.parse_declarator_list(base_ty);
        self.expect_semi();
        let qual_type = QualType { qualifiers, base_name, resolved: base_ty };
        self.builder.register_decl(DeclKind::BlockField { qual_type, declarators }, self.range_from(start))
    }

    /// Parses the base type of a declaration: either an inline `struct`
    /// definition or a builtin/user type name. Returns the name used as
    /// `QualType::base_name` (cosmetic only — never read downstream), the
    /// resolved `TypeId`, and the struct's own `DeclId` if one was defined
    /// here.
    fn parse_type_base(&mut self) -> (Atom, TypeId, Option<DeclId>) {
        if self.at(TokenKind::KwStruct) {
            let (name, ty, decl_id) = self.parse_struct_def();
            let base_name = name.unwrap_or(self.first_field_name_or_placeholder(decl_id));
            return (base_name, ty, Some(decl_id));
        }
        if self.at(TokenKind::KwVoid) {
            self.bump();
            return (self.placeholder_atom(), self.builder.types.void_type(), None);
        }
        let tok = self.current();
        let name = tok.name.unwrap_or_else(|| self.placeholder_atom());
        let resolved = self.resolve_type_name(name).unwrap_or_else(|| {
            self.builder.diagnostics.error(
                DiagnosticKind::UndeclaredName,
                self.lex.expanded_range_of(self.current_range()),
                format!("unknown type name `{}`", self.builder.atoms.resolve(name)),
            );
            self.builder.types.error_type()
        });
        self.bump();
        (name, resolved, None)
    }

    /// Neither `void` nor an anonymous struct with no declarators carries a
    /// natural atom of its own; reuse whatever name token comes right after
    /// (the function name, or the next declarator) since it's already sitting
    /// at the cursor. Safe because `base_name` is purely cosmetic — never
    /// read by `AstBuilder` or the resolver.
    fn placeholder_atom(&self) -> Atom {
        self.current().name.or_else(|| self.any_atom_in_source()).expect("a compiled source always interns at least one atom")
    }

    fn first_field_name_or_placeholder(&self, decl_id: DeclId) -> Atom {
        if let DeclKind::Struct { fields, .. } = &self.builder.module.decl(decl_id).kind {
            if let Some(&first) = fields.first() {
                if let DeclKind::StructField { declarators, .. } = &self.builder.module.decl(first).kind {
                    if let Some(d) = declarators.first() {
                        return d.name;
                    }
                }
            }
        }
        self.placeholder_atom()
    }

    fn parse_struct_def(&mut self) -> (Option<Atom>, TypeId, DeclId) {
        let start = self.pos;
        self.bump();
        let name = if self.at(TokenKind::Ident) {
            let tok = self.current();
            let atom = tok.name.expect("Ident always carries an atom");
            self.bump();
            Some(atom)
        } else {
            None
        };

        self.expect(TokenKind::LBrace, "`{`");
        self.push_delimiter(TokenKind::LBrace);
        let mut fields = Vec::new();
        while !self.should_stop() && !self.at(TokenKind::RBrace) {
            fields.push(self.parse_struct_field());
        }
        if !self.expect(TokenKind::RBrace, "`}`") {
            self.recover(RecoveryMode::Brace);
        } else {
            self.pop_delimiter();
        }

        let mut members = Vec::new();
        for &field in &fields {
            if let DeclKind::StructField { declarators, .. } = &self.builder.module.decl(field).kind {
                for d in declarators {
                    members.push((d.name, d.resolved_type));
                }
            }
        }

        let name_text = name.map(|a| self.builder.atoms.resolve(a).to_owned()).unwrap_or_else(|| "<anonymous>".to_owned());
        let future_id = self.next_decl_id();
        let struct_ty = self.builder.types.create_struct(&name_text, members, NodeId::from(future_id));
        if let Some(n) = name {
            self.struct_types.insert(n, struct_ty);
        }
        let decl_id = self.builder.register_decl(DeclKind::Struct { name, fields, resolved_type: struct_ty }, self.range_from(start));
        debug_assert_eq!(decl_id, future_id, "struct decl must be pushed immediately after reserving its id");
        (name, struct_ty, decl_id)
    }

    fn parse_struct_field(&mut self) -> DeclId {
        let start = self.pos;
        let qualifiers = self.parse_qualifier_seq();
        let (base_name, base_ty, _) = self.parse_type_base();
        let declarators = self.parse_declarator_list(base_ty);
        self.expect_semi();
        let qual_type = QualType { qualifiers, base_name, resolved: base_ty };
        self.builder.register_decl(DeclKind::StructField { qual_type, declarators }, self.range_from(start))
    }

    fn parse_variable_decl(&mut self, qualifiers: TypeQualifierSeq, base_name: Atom, base_ty: TypeId, start: u32) -> DeclId {
        let declarators = self.parse_declarator_list(base_ty);
        self.expect_semi();
        let range = self.range_from(start);
        let decl_id = self.next_decl_id();
        for (i, d) in declarators.iter().enumerate() {
            self.declare(d.name, decl_id, i as u32, range);
        }
        let qual_type = QualType { qualifiers, base_name, resolved: base_ty };
        let id = self.builder.register_decl(DeclKind::Variable { qual_type, declarators }, range);
        debug_assert_eq!(id, decl_id);
        id
    }

    pub(in crate::parser) fn parse_declarator_list(&mut self, base: TypeId) -> Vec<Declarator> {
        let mut declarators = Vec::new();
        loop {
            match self.try_parse_declarator(base) {
                Some(d) => declarators.push(d),
                None => break,
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        declarators
    }

    fn try_parse_declarator(&mut self, base: TypeId) -> Option<Declarator> {
        if !self.at(TokenKind::Ident) {
            self.error_expected("an identifier");
            return None;
        }
        let tok = self.current();
        let name = tok.name.expect("Ident always carries an atom");
        self.bump();
        let array_spec = self.parse_array_spec();
        let resolved_type = self.resolve_array_type(base, &array_spec);
        let initializer = if self.eat(TokenKind::Eq) { Some(self.parse_initializer(resolved_type)) } else { None };
        Some(Declarator { name, array_spec, initializer, resolved_type })
    }

    pub(in crate::parser) fn parse_array_spec(&mut self) -> Option<ArraySpec> {
        if !self.at(TokenKind::LBracket) {
            return None;
        }
        let mut dims = Vec::new();
        while self.eat(TokenKind::LBracket) {
            self.push_delimiter(TokenKind::LBracket);
            let dim = if self.at(TokenKind::RBracket) { None } else { Some(self.parse_assignment_expr()) };
            if !self.expect(TokenKind::RBracket, "`]`") {
                self.recover(RecoveryMode::Bracket);
            } else {
                self.pop_delimiter();
            }
            dims.push(dim);
        }
        Some(ArraySpec { dims })
    }

    fn resolve_array_type(&mut self, base: TypeId, spec: &Option<ArraySpec>) -> TypeId {
        let Some(spec) = spec else { return base };
        let dims: Vec<u32> = spec.dims.iter().map(|d| d.map(|e| self.const_dim_size(e)).unwrap_or(0)).collect();
        self.builder.types.get_array(base, dims)
    }

    fn const_dim_size(&self, id: crate::ast::ExprId) -> u32 {
        match &self.builder.module.expr(id).kind {
            ExprKind::Literal(v) => v.as_i64().unwrap_or(0).max(0) as u32,
            _ => 0,
        }
    }

    /// A declarator's `= ...` initializer. Brace-list initializers route
    /// through `build_initializer_list`, which already performs the
    /// homogeneous-element convertibility check and unsized-array-length
    /// inference (§4.10); per-field struct initializer lists, where each
    /// element would need a different expected type, are a known scoped-out
    /// gap (`Initializer::List` is reserved for that case but unused here).
    fn parse_initializer(&mut self, target: TypeId) -> Initializer {
        if self.at(TokenKind::LBrace) {
            Initializer::Expr(self.parse_initializer_list_expr(target))
        } else {
            Initializer::Expr(self.parse_assignment_expr())
        }
    }

    fn parse_function(&mut self, qualifiers: TypeQualifierSeq, base_name: Atom, return_ty: TypeId) -> DeclId {
        let start = self.pos;
        let tok = self.current();
        let name = tok.name.expect("Ident always carries an atom");
        self.bump();

        self.expect(TokenKind::LParen, "`(`");
        self.push_delimiter(TokenKind::LParen);
        self.builder.symbols.push_level(LevelKind::Function);
        let mut params = Vec::new();
        if self.at(TokenKind::KwVoid) && self.at_nth(1, TokenKind::RParen) {
            self.bump();
        } else if !self.at(TokenKind::RParen) {
            loop {
                params.push(self.parse_param());
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

        let return_type = QualType { qualifiers, base_name, resolved: return_ty };
        let first_decl = self.builder.symbols.find_functions(name).first().copied();

        let body = if self.at(TokenKind::LBrace) {
            Some(self.parse_function_body())
        } else {
            self.expect_semi();
            None
        };
        self.builder.symbols.pop_level();

        let range = self.range_from(start);
        let decl_id = self.builder.register_decl(DeclKind::Function { return_type, name, params, body, first_decl }, range);
        self.builder.symbols.declare_function(name, decl_id);
        decl_id
    }

    fn parse_param(&mut self) -> DeclId {
        let start = self.pos;
        let qualifiers = self.parse_qualifier_seq();
        let (base_name, base_ty, _) = self.parse_type_base();
        let name = if self.at(TokenKind::Ident) {
            let tok = self.current();
            let atom = tok.name.expect("Ident always carries an atom");
            self.bump();
            Some(atom)
        } else {
            None
        };
        let array_spec = self.parse_array_spec();
        let resolved_type = self.resolve_array_type(base_ty, &array_spec);
        let qual_type = QualType { qualifiers, base_name, resolved: base_ty };
        let range = self.range_from(start);
        let decl_id = self.next_decl_id();
        if let Some(n) = name {
            self.declare(n, decl_id, 0, range);
        }
        let id = self.builder.register_decl(DeclKind::Param { qual_type, name, array_spec, resolved_type }, range);
        debug_assert_eq!(id, decl_id);
        id
    }

    /// A function body is the one compound statement that reuses its
    /// function's own scope level rather than pushing a nested block, so
    /// parameters and the body's locals live in one scope (§4.8).
    fn parse_function_body(&mut self) -> StmtId {
        self.parse_compound_stmt_in_current_scope()
    }

    /// Whether a declaration could start here, inside a statement context
    /// where a bare identifier is ambiguous between "start of a
    /// `UserStruct name;` declaration" and "start of an expression
    /// statement" (GLSL has no `typedef`, but user struct names are still
    /// plain identifiers). Qualifiers, builtin type keywords, `struct`, and
    /// `void` are unambiguous; a bare `Ident` only counts if it names a
    /// struct already declared in this translation unit.
    pub(in crate::parser) fn at_local_decl_start(&self) -> bool {
        if self.at(TokenKind::KwQualifier) || self.at(TokenKind::KwConst) || self.at(TokenKind::KwLayout) {
            return true;
        }
        match self.kind() {
            TokenKind::KwTypeName | TokenKind::KwStruct | TokenKind::KwVoid => true,
            TokenKind::Ident => self.current().name.map(|n| self.struct_types.contains_key(&n)).unwrap_or(false),
            _ => false,
        }
    }
}
