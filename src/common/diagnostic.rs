use std::fmt;

use serde::Serialize;

use crate::common::span::Span;

/// How bad a diagnostic is. `Hint` is the mildest and is
/// mostly used for children of other diagnostics, e.g. a
/// "defined here" note attached to an error.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize,
)]
pub enum Severity {
    Hint,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Hint => "hint",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}", name)
    }
}

/// A single report about a region of source code.
/// Children carry supporting locations in the order they
/// should be surfaced, e.g. the missing label name for an
/// unresolved `ret`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub span: Span,
    pub message: String,
    pub children: Vec<Diagnostic>,
}

impl Diagnostic {
    pub fn new(severity: Severity, span: Span, message: &str) -> Diagnostic {
        Diagnostic {
            severity,
            span,
            message: message.to_string(),
            children: vec![],
        }
    }

    pub fn error(span: Span, message: &str) -> Diagnostic {
        Diagnostic::new(Severity::Error, span, message)
    }

    pub fn hint(span: Span, message: &str) -> Diagnostic {
        Diagnostic::new(Severity::Hint, span, message)
    }

    /// Extend a diagnostic by attaching another child.
    pub fn with_child(mut self, child: Diagnostic) -> Diagnostic {
        self.children.push(child);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}\n --> {}", self.severity, self.message, self.span)?;
        for child in &self.children {
            write!(f, "\n  {}: {} at {}", child.severity, child.message, child.span)?;
        }
        Ok(())
    }
}

/// The append-only diagnostic channel every pass writes
/// into. Insertion order is the order surfaced to the
/// user, so callers must append in source order.
#[derive(Debug, Default)]
pub struct DiagnosticLogger {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticLogger {
    pub fn new() -> DiagnosticLogger {
        DiagnosticLogger::default()
    }

    /// Appends a diagnostic, returning a reference so the
    /// caller can keep building a multi-part report.
    pub fn append(&mut self, diagnostic: Diagnostic) -> &mut Diagnostic {
        self.diagnostics.push(diagnostic);
        // we just pushed, so the vector can't be empty
        let last = self.diagnostics.len() - 1;
        &mut self.diagnostics[last]
    }

    pub fn error(&mut self, span: Span, message: &str) {
        self.append(Diagnostic::error(span, message));
    }

    /// Appends deferred diagnostics produced while
    /// speculatively lexing lookahead tokens.
    pub fn extend(&mut self, diagnostics: Vec<Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}
