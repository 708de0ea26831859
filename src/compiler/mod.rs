//! This module contains the three passes of the
//! front-end: lexing, parsing, and AST→HIR lowering.
//!
//! Note that more steps (e.g. ones applying typechecking
//! operations, optimization passes, etc.) may be
//! implemented in the future.

use std::rc::Rc;

pub mod lex;
pub use lex::Lexer;

pub mod parse;
pub use parse::Parser;

pub mod lower;
pub use lower::{lower_expr, lower_pat, lower_stmnt, LabelStack};

use crate::{
    common::{diagnostic::DiagnosticLogger, source::Source, span::Spanned},
    construct::{ast, hir, token::Token},
};

/// Drains a source into a token stream. Mostly useful for
/// testing; the parser pulls tokens on demand instead.
pub fn lex(source: Rc<Source>, dlogger: &mut DiagnosticLogger) -> Vec<Spanned<Token>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = vec![];
    loop {
        let token = lexer.next(dlogger);
        if token.item == Token::Eof {
            break;
        }
        tokens.push(token);
    }
    tokens
}

/// Parses a whole source into top-level statements.
pub fn parse(source: Rc<Source>, dlogger: &mut DiagnosticLogger) -> Vec<ast::Stmnt> {
    let mut parser = Parser::new(source);
    let mut stmnts = vec![];
    while let Some(stmnt) = parser.next_stmnt(dlogger) {
        stmnts.push(stmnt);
    }
    stmnts
}

/// Runs the full pipeline, lowering each statement as it
/// is parsed.
pub fn lower(source: Rc<Source>, dlogger: &mut DiagnosticLogger) -> Vec<hir::Stmnt> {
    let mut parser = Parser::new(source);
    let mut labels = LabelStack::new();
    let mut stmnts = vec![];
    while let Some(stmnt) = parser.next_stmnt(dlogger) {
        stmnts.push(lower_stmnt(&stmnt, &mut labels, dlogger));
    }
    stmnts
}
