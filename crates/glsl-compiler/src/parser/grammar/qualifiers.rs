//! Qualifier-sequence and `layout(...)` clause grammar (§4.9 "qualifier
//! sequence"). Order-independent: `const highp in vec3` and
//! `in const highp vec3` parse to the same [`TypeQualifierSeq`].

use crate::ast::aux::{InterpolationQualifier, MemoryQualifier, StorageQualifier, TypeQualifierSeq};
use crate::lexer::TokenKind;
use crate::parser::core::Parser;
use crate::parser::recovery::RecoveryMode;
use crate::token_set::token_sets;

impl<'m, 'p, 'a, 'lx> Parser<'m, 'p, 'a, 'lx> {
    /// Consumes every qualifier keyword and `layout(...)` clause in front of
    /// a declaration's base type. Unrecognized `KwQualifier` spellings
    /// (`attribute`, `varying`, legacy GLSL ES 1.0 storage qualifiers with
    /// no modern equivalent) and qualifiers `TypeQualifierSeq` has no slot
    /// for (`precise`, `invariant`, `centroid`, `patch`, `sample` as an
    /// interpolation modifier) are consumed but otherwise dropped — they
    /// don't affect type resolution or the resolver's checks.
    pub(in crate::parser) fn parse_qualifier_seq(&mut self) -> TypeQualifierSeq {
        let mut seq = TypeQualifierSeq::default();
        loop {
            match self.kind() {
                TokenKind::KwConst => {
                    self.bump();
                    seq.storage.push(StorageQualifier::Const);
                }
                TokenKind::KwLayout => self.parse_layout_clause(&mut seq),
                TokenKind::KwQualifier => {
                    let tok = self.current();
                    let atom = tok.name.expect("KwQualifier always carries an atom");
                    self.bump();
                    self.apply_qualifier(&mut seq, atom);
                }
                _ => break,
            }
        }
        seq
    }

    fn apply_qualifier(&mut self, seq: &mut TypeQualifierSeq, atom: glsl_core::Atom) {
        match self.builder.atoms.resolve(atom) {
            "in" => seq.storage.push(StorageQualifier::In),
            "out" => seq.storage.push(StorageQualifier::Out),
            "inout" => seq.storage.push(StorageQualifier::InOut),
            "uniform" => seq.storage.push(StorageQualifier::Uniform),
            "buffer" => seq.storage.push(StorageQualifier::Buffer),
            "shared" => seq.storage.push(StorageQualifier::Shared),
            "flat" => seq.interpolation = Some(InterpolationQualifier::Flat),
            "smooth" => seq.interpolation = Some(InterpolationQualifier::Smooth),
            "noperspective" => seq.interpolation = Some(InterpolationQualifier::NoPerspective),
            "coherent" => seq.memory.push(MemoryQualifier::Coherent),
            "volatile" => seq.memory.push(MemoryQualifier::Volatile),
            "restrict" => seq.memory.push(MemoryQualifier::Restrict),
            "readonly" => seq.memory.push(MemoryQualifier::Readonly),
            "writeonly" => seq.memory.push(MemoryQualifier::Writeonly),
            "highp" | "mediump" | "lowp" => seq.precision = Some(atom),
            // precise, invariant, centroid, patch, sample, attribute,
            // varying: recognized by the lexer but carry no representation
            // in TypeQualifierSeq.
            _ => {}
        }
    }

    /// `layout ( id [= int] , ... )`. Each identifier/int-literal pair is
    /// recorded verbatim; the resolver, not the parser, decides which
    /// layout ids are meaningful for a given declaration.
    fn parse_layout_clause(&mut self, seq: &mut TypeQualifierSeq) {
        self.bump();
        if !self.expect(TokenKind::LParen, "`(`") {
            return;
        }
        self.push_delimiter(TokenKind::LParen);
        if !self.at(TokenKind::RParen) {
            loop {
                if self.at(TokenKind::Ident) || self.at(TokenKind::KwTypeName) || self.at(TokenKind::KwQualifier) {
                    let tok = self.current();
                    let id = tok.name.expect("layout id token always carries an atom");
                    self.bump();
                    let value = if self.eat(TokenKind::Eq) {
                        if self.at(TokenKind::IntLiteral) {
                            let text = self.current_text();
                            let v = parse_layout_int(text);
                            self.bump();
                            Some(v)
                        } else {
                            self.error_expected("an integer constant");
                            None
                        }
                    } else {
                        None
                    };
                    seq.layout.push((id, value));
                } else {
                    self.error_expected("a layout qualifier id");
                    break;
                }
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
    }

    pub(in crate::parser) fn at_qualifier_start(&self) -> bool {
        self.at_set(token_sets::QUALIFIER_START)
    }
}

fn parse_layout_int(text: &str) -> i64 {
    let trimmed = text.trim_end_matches(['u', 'U']);
    trimmed.parse().unwrap_or(0)
}
