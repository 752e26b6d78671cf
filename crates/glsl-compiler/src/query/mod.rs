//! Editor query layer (§4.11): token-at-position, symbol-at-position with
//! classification, AST-nodes-overlapping-range, declaration-of-symbol, and
//! a flat document-symbol outline. Hover, go-to-definition,
//! signature-help, inlay-hints, and completion are thin adapters a host
//! builds over one to three of these primitives — none of that host-facing
//! surface lives in this crate.

mod outline;
mod position;
mod visitor;

pub use outline::{outline, DocumentSymbol, SymbolKind};
pub use position::{declaration_of, symbol_at, token_at, SymbolAtPosition, SymbolClass};
pub use visitor::{nodes_overlapping, OverlappingNode};
