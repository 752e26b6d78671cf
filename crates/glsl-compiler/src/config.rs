//! Compile configuration (§6 "`CompileConfig` record"). Round-trippable via
//! `serde` for test fixtures, not for a wire protocol — there is no JSON-RPC
//! framing at this layer.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One predefined macro seeded into the preprocessor before `#define`s in
/// the source itself run, e.g. vendor-specific `#define`s a host injects
/// ahead of the user's own source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredefinedMacro {
    pub name: String,
    pub body: String,
}

/// Everything one compile needs beyond the source text itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompileConfig {
    /// Directories searched, in order, for `#include "..."` and
    /// `#include <...>` targets a [`crate::preprocessor::FileProvider`]
    /// can't resolve relative to the including file itself.
    pub include_search_paths: Vec<String>,
    /// Caps `#include` nesting (§4.4); exceeding it is
    /// `DiagnosticKind::IncludeDepthExceeded`, not a panic.
    pub max_include_depth: u32,
    pub predefined_macros: Vec<PredefinedMacro>,
    /// A shared preamble's synthetic source, compiled once and reused as a
    /// read-only symbol-table/type-context ancestor for every real
    /// translation unit (§4.8's `with_preamble`). `None` compiles against
    /// nothing but this source's own declarations and scalar/vector/matrix
    /// builtins.
    pub preamble_source: Option<String>,
    /// `#version` number assumed when the source has no `#version` line of
    /// its own, matching GLSL's own default-version behavior.
    pub default_version: u32,
    /// Profile name (`"core"`, `"compatibility"`, `"es"`) assumed under the
    /// same condition; stored as the raw spelling rather than
    /// `preprocessor::directive::VersionProfile` so this module doesn't need
    /// that enum to carry a `serde` impl of its own.
    pub default_profile: Option<String>,
    /// The language target's enabled extension set (§4.6's "extended-width
    /// chain" supplement). A builtin type name gated by
    /// `ScalarKind::required_extension` is only accepted by the parser when
    /// its extension is present here; this is independent of any
    /// `#extension` line the source itself declares, which only affects
    /// `VersionInfo::extensions`.
    pub extensions: HashSet<String>,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            include_search_paths: Vec::new(),
            max_include_depth: 16,
            predefined_macros: Vec::new(),
            preamble_source: None,
            default_version: 110,
            default_profile: None,
            extensions: HashSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_glsl_implicit_version() {
        let config = CompileConfig::default();
        assert_eq!(config.default_version, 110);
        assert!(config.default_profile.is_none());
        assert!(config.preamble_source.is_none());
        assert!(config.extensions.is_empty());
    }

    #[test]
    fn round_trips_through_json() {
        let mut config = CompileConfig::default();
        config.include_search_paths.push("shaders/include".to_string());
        config.predefined_macros.push(PredefinedMacro { name: "MAX_LIGHTS".to_string(), body: "4".to_string() });
        config.extensions.insert("GL_EXT_shader_explicit_arithmetic_types_int8".to_string());

        let json = serde_json::to_string(&config).expect("serialize");
        let round_tripped: CompileConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(round_tripped, config);
    }
}
