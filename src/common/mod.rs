//! Leaf types shared by every stage of the pipeline:
//! source handles, spans, the diagnostic channel, and the
//! byte reader the lexer consumes.

pub mod diagnostic;
pub mod reader;
pub mod source;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticLogger, Severity};
pub use reader::Reader;
pub use source::Source;
pub use span::{Position, Span, Spanned};
