//! Diagnostic sink: everything the preprocessor, parser, and checker find
//! wrong with the input flows through here rather than `Result`/panic. See
//! §7 — "everything is reported to a diagnostic sink held by the compile;
//! nothing unwinds."

pub mod message;
pub mod printer;

pub use message::{Diagnostic, DiagnosticKind, ExpandedRange, Fix, RelatedInfo, Severity};
pub use printer::DiagnosticsPrinter;

/// Accumulates diagnostics for one compile.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, kind: DiagnosticKind, range: ExpandedRange, message: impl Into<String>) -> &mut Diagnostic {
        self.push(Severity::Error, kind, range, message)
    }

    pub fn warning(&mut self, kind: DiagnosticKind, range: ExpandedRange, message: impl Into<String>) -> &mut Diagnostic {
        self.push(Severity::Warning, kind, range, message)
    }

    pub fn info(&mut self, kind: DiagnosticKind, range: ExpandedRange, message: impl Into<String>) -> &mut Diagnostic {
        self.push(Severity::Info, kind, range, message)
    }

    /// Report at `kind`'s own default severity rather than naming one
    /// explicitly; used by call sites that don't care to override it.
    pub fn report(&mut self, kind: DiagnosticKind, range: ExpandedRange, message: impl Into<String>) -> &mut Diagnostic {
        self.push(kind.default_severity(), kind, range, message)
    }

    fn push(&mut self, severity: Severity, kind: DiagnosticKind, range: ExpandedRange, message: impl Into<String>) -> &mut Diagnostic {
        self.items.push(Diagnostic {
            severity,
            kind,
            range,
            message: message.into(),
            fix: None,
            related: Vec::new(),
        });
        self.items.last_mut().unwrap()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

/// Builder returned by the sink for attaching a fix or related info before
/// the diagnostic is considered final. `Diagnostics::error`/etc already
/// return `&mut Diagnostic`, so these are just convenience setters chained
/// off that reference.
pub trait DiagnosticExt {
    fn with_fix(&mut self, fix: Fix) -> &mut Self;
    fn with_related(&mut self, related: RelatedInfo) -> &mut Self;
}

impl DiagnosticExt for Diagnostic {
    fn with_fix(&mut self, fix: Fix) -> &mut Self {
        self.fix = Some(fix);
        self
    }

    fn with_related(&mut self, related: RelatedInfo) -> &mut Self {
        self.related.push(related);
        self
    }
}
