//! Builder-pattern printer for rendering diagnostics as annotated snippets.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Patch, Renderer, Snippet};

use super::{Diagnostics, Severity};

pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let Some(source) = self.source else {
            return self.format_plain(w);
        };

        if self.diagnostics.is_empty() {
            return Ok(());
        }

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in self.diagnostics.iter().enumerate() {
            let range = adjust_range(diag.range.start, diag.range.end, source.len());

            let mut snippet = Snippet::source(source)
                .line_start(1)
                .annotation(AnnotationKind::Primary.span(range.clone()).label(&diag.message));

            if let Some(p) = self.path {
                snippet = snippet.path(p);
            }

            for related in &diag.related {
                snippet = snippet.annotation(
                    AnnotationKind::Context
                        .span(adjust_range(related.range.start, related.range.end, source.len()))
                        .label(&related.message),
                );
            }

            let level = severity_to_level(diag.severity);
            let title = format!("[{}] {}", diag.kind.code(), diag.message);
            let title_group = level.primary_title(&title).element(snippet);

            let mut report: Vec<Group> = vec![title_group];

            if let Some(fix) = &diag.fix {
                report.push(
                    Level::HELP.secondary_title(&fix.description).element(
                        Snippet::source(source).line_start(1).patch(Patch::new(range, &fix.replacement)),
                    ),
                );
            }

            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", renderer.render(&report))?;
        }

        Ok(())
    }

    fn format_plain(&self, w: &mut impl Write) -> std::fmt::Result {
        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", diag)?;
        }
        Ok(())
    }
}

fn severity_to_level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
        Severity::Info => Level::NOTE,
    }
}

fn adjust_range(start: u32, end: u32, limit: usize) -> std::ops::Range<usize> {
    let start = start as usize;
    let end = end as usize;
    if start == end {
        return start..(start + 1).min(limit);
    }
    start..end
}

impl Diagnostics {
    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        DiagnosticsPrinter::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticKind, ExpandedRange};
    use glsl_core::FileId;

    #[test]
    fn plain_format_lists_all_diagnostics() {
        let mut sink = Diagnostics::new();
        sink.error(
            DiagnosticKind::UndeclaredName,
            ExpandedRange { file: FileId::default(), start: 0, end: 3 },
            "undeclared `foo`",
        );
        let rendered = sink.printer().render();
        assert!(rendered.contains("undeclared `foo`"));
    }

    #[test]
    fn source_format_includes_snippet() {
        let mut sink = Diagnostics::new();
        sink.error(
            DiagnosticKind::UndeclaredName,
            ExpandedRange { file: FileId::default(), start: 0, end: 3 },
            "undeclared `foo`",
        );
        let rendered = sink.printer().source("foo + 1;").render();
        assert!(rendered.contains("foo + 1;"));
    }

    #[test]
    fn empty_sink_renders_empty() {
        let sink = Diagnostics::new();
        assert_eq!(sink.printer().source("x").render(), "");
        assert_eq!(sink.printer().render(), "");
    }
}
