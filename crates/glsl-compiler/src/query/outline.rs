//! Document-symbol outline (§4.11, supplemented by
//! `glsld/src/DocumentSymbol.cpp`): a flat pre-order listing of top-level
//! decls, stopping short of the original's tree-shaped grouping since
//! nested presentation is an LSP-shell concern, not a core one.

use glsl_core::Atom;

use crate::ast::{DeclId, DeclKind, Module, SyntaxRange};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SymbolKind {
    Variable,
    Function,
    Parameter,
    Struct,
    InterfaceBlock,
    Precision,
}

#[derive(Clone, Copy, Debug)]
pub struct DocumentSymbol {
    pub name: Atom,
    pub kind: SymbolKind,
    pub range: SyntaxRange,
    pub decl: DeclId,
}

/// One entry per top-level declarator, plus — for a function decl — one
/// entry per parameter, immediately following the function's own entry.
/// A multi-declarator statement (`int a, b;`) yields one entry per name,
/// all sharing the declaring statement's range.
pub fn outline(module: &Module) -> Vec<DocumentSymbol> {
    let mut out = Vec::new();
    for &id in &module.top_level {
        push_decl(module, id, &mut out);
    }
    out
}

fn push_decl(module: &Module, id: DeclId, out: &mut Vec<DocumentSymbol>) {
    let decl = module.decl(id);
    match &decl.kind {
        DeclKind::Variable { declarators, .. } => {
            for d in declarators {
                out.push(DocumentSymbol { name: d.name, kind: SymbolKind::Variable, range: decl.range, decl: id });
            }
        }
        DeclKind::Function { name, params, .. } => {
            out.push(DocumentSymbol { name: *name, kind: SymbolKind::Function, range: decl.range, decl: id });
            for &param in params {
                let param_decl = module.decl(param);
                if let DeclKind::Param { name: Some(name), .. } = &param_decl.kind {
                    out.push(DocumentSymbol { name: *name, kind: SymbolKind::Parameter, range: param_decl.range, decl: param });
                }
            }
        }
        DeclKind::Struct { name: Some(name), .. } => {
            out.push(DocumentSymbol { name: *name, kind: SymbolKind::Struct, range: decl.range, decl: id });
        }
        DeclKind::InterfaceBlock { block_name, .. } => {
            out.push(DocumentSymbol { name: *block_name, kind: SymbolKind::InterfaceBlock, range: decl.range, decl: id });
        }
        DeclKind::Precision { type_name, .. } => {
            out.push(DocumentSymbol { name: *type_name, kind: SymbolKind::Precision, range: decl.range, decl: id });
        }
        DeclKind::Struct { name: None, .. } | DeclKind::StructField { .. } | DeclKind::BlockField { .. } | DeclKind::Param { .. } | DeclKind::Empty | DeclKind::Error => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::aux::{QualType, TypeQualifierSeq};
    use crate::ast::Declarator;
    use crate::types::{ScalarKind, TypeContext};
    use glsl_core::{Arena, AtomTable};

    #[test]
    fn lists_a_function_and_its_parameters() {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let types = TypeContext::new();
        let mut module = Module::new();

        let float_ty = types.scalar(ScalarKind::Float);
        let param_name = atoms.intern("t");
        let param_qual = QualType { qualifiers: TypeQualifierSeq::default(), base_name: param_name, resolved: float_ty };
        let param = module.push_decl(DeclKind::Param { qual_type: param_qual, name: Some(param_name), array_spec: None, resolved_type: float_ty }, SyntaxRange::new(1, 2));

        let fn_name = atoms.intern("lerp");
        let return_type = QualType { qualifiers: TypeQualifierSeq::default(), base_name: fn_name, resolved: types.void_type() };
        let function = module.push_decl(DeclKind::Function { return_type, name: fn_name, params: vec![param], body: None, first_decl: None }, SyntaxRange::new(0, 3));
        module.top_level.push(function);

        let symbols = outline(&module);
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[0].name, fn_name);
        assert_eq!(symbols[0].kind, SymbolKind::Function);
        assert_eq!(symbols[1].name, param_name);
        assert_eq!(symbols[1].kind, SymbolKind::Parameter);
    }

    #[test]
    fn lists_one_entry_per_declarator_in_a_multi_declarator_statement() {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let types = TypeContext::new();
        let mut module = Module::new();

        let float_ty = types.scalar(ScalarKind::Float);
        let a_name = atoms.intern("a");
        let b_name = atoms.intern("b");
        let qual_type = QualType { qualifiers: TypeQualifierSeq::default(), base_name: a_name, resolved: float_ty };
        let a = Declarator { name: a_name, array_spec: None, initializer: None, resolved_type: float_ty };
        let b = Declarator { name: b_name, array_spec: None, initializer: None, resolved_type: float_ty };
        let decl = module.push_decl(DeclKind::Variable { qual_type, declarators: vec![a, b] }, SyntaxRange::new(0, 4));
        module.top_level.push(decl);

        let symbols = outline(&module);
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[0].name, a_name);
        assert_eq!(symbols[1].name, b_name);
    }
}
