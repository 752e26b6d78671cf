//! Grammar productions for the shader front-end, as an extension of
//! [`Parser`](crate::parser::core::Parser) — every submodule `impl`s the same
//! type rather than returning its own tree.

mod decls;
mod exprs;
mod qualifiers;
mod stmts;
