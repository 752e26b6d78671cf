//! Diagnostic value types: severity, stable kind tags, fixes, related info.

use glsl_core::FileId;

/// Severity level of a diagnostic (§6: error/warning/info).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Stable identifier for a diagnostic's kind (§7's six-category taxonomy).
/// Messages built from a kind are free to change wording; the kind itself
/// does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    // 1. Preprocessor errors
    UnterminatedIf,
    BadIncludePath,
    IncludeDepthExceeded,
    MalformedDefine,
    UserError,
    UnknownDirective,
    StrayElse,
    ElifAfterElse,
    RedefinedBuiltinMacro,

    // 2. Lex errors
    UnrecognizedByte,

    // 3. Parse errors
    ExpectedToken,
    UnexpectedToken,

    // 4. Resolution errors
    UndeclaredName,
    AmbiguousOverload,
    NoViableOverload,
    MemberNotFound,
    InvalidSwizzle,
    NotIndexable,
    /// A type name exists in the builtin type universe but names an
    /// extended-width scalar (§4.6) whose gating extension isn't enabled in
    /// the compile configuration.
    DisabledExtension,

    // 5. Type errors
    IncompatibleOperands,
    NonConvertibleReturn,
    NonBoolCondition,

    // 6. Structural errors
    BreakOutsideLoop,
    ContinueOutsideLoop,
    DuplicateDefault,
    Redefinition,
}

impl DiagnosticKind {
    /// Stable string id, suitable for editor-side diagnostic codes.
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::UnterminatedIf => "pp-unterminated-if",
            DiagnosticKind::BadIncludePath => "pp-bad-include-path",
            DiagnosticKind::IncludeDepthExceeded => "pp-include-depth-exceeded",
            DiagnosticKind::MalformedDefine => "pp-malformed-define",
            DiagnosticKind::UserError => "pp-user-error",
            DiagnosticKind::UnknownDirective => "pp-unknown-directive",
            DiagnosticKind::StrayElse => "pp-stray-else",
            DiagnosticKind::ElifAfterElse => "pp-elif-after-else",
            DiagnosticKind::RedefinedBuiltinMacro => "pp-redefined-builtin-macro",
            DiagnosticKind::UnrecognizedByte => "lex-unrecognized-byte",
            DiagnosticKind::ExpectedToken => "parse-expected-token",
            DiagnosticKind::UnexpectedToken => "parse-unexpected-token",
            DiagnosticKind::UndeclaredName => "res-undeclared-name",
            DiagnosticKind::AmbiguousOverload => "res-ambiguous-overload",
            DiagnosticKind::NoViableOverload => "res-no-viable-overload",
            DiagnosticKind::MemberNotFound => "res-member-not-found",
            DiagnosticKind::InvalidSwizzle => "res-invalid-swizzle",
            DiagnosticKind::NotIndexable => "res-not-indexable",
            DiagnosticKind::DisabledExtension => "res-disabled-extension",
            DiagnosticKind::IncompatibleOperands => "type-incompatible-operands",
            DiagnosticKind::NonConvertibleReturn => "type-non-convertible-return",
            DiagnosticKind::NonBoolCondition => "type-non-bool-condition",
            DiagnosticKind::BreakOutsideLoop => "struct-break-outside-loop",
            DiagnosticKind::ContinueOutsideLoop => "struct-continue-outside-loop",
            DiagnosticKind::DuplicateDefault => "struct-duplicate-default",
            DiagnosticKind::Redefinition => "struct-redefinition",
        }
    }

    pub fn default_severity(self) -> Severity {
        match self {
            DiagnosticKind::StrayElse
            | DiagnosticKind::ElifAfterElse
            | DiagnosticKind::RedefinedBuiltinMacro => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// An expanded source range: `(FileId, byte range)`, convertible to
/// `(line, column)` by whoever owns the `SourceContext`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandedRange {
    pub file: FileId,
    pub start: u32,
    pub end: u32,
}

/// A suggested fix for a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    pub replacement: String,
    pub description: String,
}

impl Fix {
    pub fn new(replacement: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            replacement: replacement.into(),
            description: description.into(),
        }
    }
}

/// A secondary location referenced by a diagnostic (e.g. "previous
/// definition here").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub range: ExpandedRange,
    pub message: String,
}

impl RelatedInfo {
    pub fn new(range: ExpandedRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }
}

/// One compiler finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub range: ExpandedRange,
    pub message: String,
    pub fix: Option<Fix>,
    pub related: Vec<RelatedInfo>,
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] at {}..{}: {}",
            self.severity,
            self.kind.code(),
            self.range.start,
            self.range.end,
            self.message
        )
    }
}
