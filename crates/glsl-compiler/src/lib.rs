//! GLSL front-end for an editor language service: preprocessor, lexer,
//! recursive-descent parser, and a statement-validation resolver, producing
//! a typed [`Module`](ast::Module) plus a [`Diagnostics`] sink over it.
//! Code generation, optimization, and incremental reparse are out of scope —
//! this crate answers "what does this source mean", not "how do I run it".
//!
//! # Example
//!
//! ```
//! use glsl_compiler::{compile, CompileConfig};
//!
//! let result = compile("void main() { int x = 1; }", &CompileConfig::default());
//! assert!(!result.diagnostics.has_errors());
//! ```

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod lex_context;
pub mod lexer;
pub mod preprocessor;
pub mod query;
pub mod resolver;
pub mod symbols;
mod token_set;
pub mod types;

mod parser;

pub use config::{CompileConfig, PredefinedMacro};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};

use glsl_core::{Arena, AtomTable, SourceContext};

use preprocessor::directive::VersionProfile;
use preprocessor::macros::{MacroBody, MacroDef};
use preprocessor::{FileProvider, IncludeOptions, NoIncludes, Preprocessor, VersionInfo};

use ast::Module;
use lex_context::LexContext;
use symbols::SymbolTable;
use types::TypeContext;

/// Everything produced by one [`compile`] call. Owns the arena its atoms and
/// the lex context's token text ultimately borrow from conceptually, though
/// concretely each field already owns what it needs — there is no
/// self-referential struct here, just several sibling results of the same
/// pass kept together for a caller's convenience.
pub struct CompiledModule {
    pub source: SourceContext,
    pub lex: LexContext,
    pub module: Module,
    pub types: TypeContext,
    pub diagnostics: Diagnostics,
    /// The effective `#version`/profile: whatever the source itself declares,
    /// falling back to `CompileConfig::default_version`/`default_profile`
    /// when it declares none.
    pub version: VersionInfo,
}

impl CompiledModule {
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.has_errors()
    }

    pub fn diagnostics_printer(&self) -> DiagnosticsPrinter<'_, '_> {
        DiagnosticsPrinter::new(&self.diagnostics)
    }
}

/// Compiles a preamble module (e.g. the GLSL standard-library declarations)
/// so its `SymbolTable`/`TypeContext` can be reused, read-only, as the
/// ancestor scope for any number of real translation units via
/// [`compile_with_preamble`]. A preamble never runs a preprocessor pass of
/// its own `#include`s against a real filesystem; it is always a single,
/// self-contained buffer.
pub struct Preamble {
    source: SourceContext,
    symbols: SymbolTable<'static>,
    types: TypeContext,
    atoms_arena: Arena,
}

/// Compiles `source` against an empty ambient scope: no preamble, no
/// `#include` resolution beyond whatever `config.include_search_paths` and a
/// [`NoIncludes`] provider can do (nothing).
pub fn compile(source: &str, config: &CompileConfig) -> CompiledModule {
    compile_with_provider(source, config, &NoIncludes)
}

/// Like [`compile`], but with a caller-supplied [`FileProvider`] for
/// resolving `#include` targets against a real filesystem or virtual one.
///
/// When `config.preamble_source` is set, this builds (and leaks, per
/// [`compile_preamble`]) a fresh [`Preamble`] for the call. A caller
/// compiling many translation units against the same preamble should build
/// it once with [`compile_preamble`] and call
/// [`compile_with_preamble_and_provider`] directly instead, to avoid
/// re-parsing the preamble (and leaking a new one) on every call.
pub fn compile_with_provider(source: &str, config: &CompileConfig, provider: &dyn FileProvider) -> CompiledModule {
    if let Some(preamble_source) = &config.preamble_source {
        let preamble = compile_preamble(preamble_source);
        return compile_with_preamble_and_provider(source, config, preamble, provider);
    }

    let arena = Arena::new();
    let mut atoms = AtomTable::new(&arena);
    let mut src = SourceContext::new();
    let mut diagnostics = Diagnostics::new();

    let main_file = src.add_buffer("<source>", source);
    let mut pp = Preprocessor::new();
    seed_predefined_macros(&mut pp, &mut src, &mut atoms, config);

    let version = effective_version(Preprocessor::scan_version(main_file, src.content(main_file), &mut atoms), config);

    let include = IncludeOptions { search_paths: &config.include_search_paths, max_depth: config.max_include_depth };
    let main_source = src.content(main_file).to_string();
    let tokens = pp.run(main_file, &main_source, &mut src, &mut atoms, &mut diagnostics, provider, &include);
    let lex = LexContext::from_pp_tokens(&tokens);

    let mut module = Module::new();
    let mut types = TypeContext::new();
    let mut symbols = SymbolTable::new();

    parser::Parser::new(&lex, &src, &mut module, &mut types, &mut symbols, &mut diagnostics, &atoms, config.extensions.clone()).parse();
    resolver::resolve(&module, &types, &lex, &mut diagnostics);

    CompiledModule { source: src, lex, module, types, diagnostics, version }
}

/// Compiles a shared [`Preamble`] once, so its declarations (and builtins
/// beyond the scalar/vector/matrix set seeded by every [`TypeContext`]) are
/// visible, read-only, to every subsequent real compile without re-parsing
/// them.
///
/// Returns a `'static` reference rather than an owned `Preamble`: a preamble
/// is meant to be built once and outlive every translation unit compiled
/// against it, and [`SymbolTable::with_preamble`] borrows its ancestor for
/// the same lifetime it was built with — leaking it here is how that
/// borrow ends up honestly `'static` instead of reaching for `unsafe`.
pub fn compile_preamble(source: &str) -> &'static Preamble {
    let arena = Arena::new();
    let mut atoms = AtomTable::new(&arena);
    let mut src = SourceContext::new();
    let mut diagnostics = Diagnostics::new();

    let file = src.add_buffer("<preamble>", source);
    let tokens = lexer::lex(file, src.content(file), &mut atoms);
    let lex = LexContext::from_pp_tokens(&tokens);

    let mut module = Module::new();
    let mut types = TypeContext::new();
    let mut symbols: SymbolTable<'static> = SymbolTable::new();
    parser::Parser::new(&lex, &src, &mut module, &mut types, &mut symbols, &mut diagnostics, &atoms, std::collections::HashSet::new()).parse();

    Box::leak(Box::new(Preamble { source: src, symbols, types, atoms_arena: arena }))
}

/// Compiles `source` with `preamble`'s declarations visible as an enclosing
/// scope (§4.8's layered symbol table).
pub fn compile_with_preamble(source: &str, config: &CompileConfig, preamble: &'static Preamble) -> CompiledModule {
    compile_with_preamble_and_provider(source, config, preamble, &NoIncludes)
}

pub fn compile_with_preamble_and_provider(
    source: &str,
    config: &CompileConfig,
    preamble: &'static Preamble,
    provider: &dyn FileProvider,
) -> CompiledModule {
    let arena = Arena::new();
    let mut atoms = AtomTable::new(&arena);
    let mut src = SourceContext::with_preamble(&preamble.source);
    let mut diagnostics = Diagnostics::new();

    let main_file = src.add_buffer("<source>", source);
    let mut pp = Preprocessor::new();
    seed_predefined_macros(&mut pp, &mut src, &mut atoms, config);

    let version = effective_version(Preprocessor::scan_version(main_file, src.content(main_file), &mut atoms), config);

    let include = IncludeOptions { search_paths: &config.include_search_paths, max_depth: config.max_include_depth };
    let main_source = src.content(main_file).to_string();
    let tokens = pp.run(main_file, &main_source, &mut src, &mut atoms, &mut diagnostics, provider, &include);
    let lex = LexContext::from_pp_tokens(&tokens);

    let mut module = Module::new();
    let mut types = preamble.types.clone();
    let mut symbols = SymbolTable::with_preamble(&preamble.symbols);

    parser::Parser::new(&lex, &src, &mut module, &mut types, &mut symbols, &mut diagnostics, &atoms, config.extensions.clone()).parse();
    resolver::resolve(&module, &types, &lex, &mut diagnostics);

    let _ = &preamble.atoms_arena;
    CompiledModule { source: src, lex, module, types, diagnostics, version }
}

fn seed_predefined_macros(pp: &mut Preprocessor, src: &mut SourceContext, atoms: &mut AtomTable, config: &CompileConfig) {
    for macro_def in &config.predefined_macros {
        let name = atoms.intern(&macro_def.name);
        let body_file = src.add_buffer("<predefined>", &macro_def.body);
        let replacement = lexer::lex(body_file, src.content(body_file), atoms);
        pp.define(name, MacroDef { body: MacroBody::ObjectLike { replacement } });
    }
}

/// Fills in `config`'s default version/profile when the source declared
/// neither, matching GLSL's own "no `#version` line means 110" rule.
fn effective_version(scanned: VersionInfo, config: &CompileConfig) -> VersionInfo {
    let version = scanned.version.unwrap_or(config.default_version as i64);
    let profile = scanned.profile.or_else(|| {
        config
            .default_profile
            .as_deref()
            .and_then(VersionProfile::from_name)
            .or_else(|| Some(VersionProfile::default_for_version(version)))
    });
    VersionInfo { version: Some(version), profile, extensions: scanned.extensions }
}
