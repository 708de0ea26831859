use std::{
    io::{self, Write},
    process::ExitCode,
};

use vireo::{
    common::{DiagnosticLogger, Source},
    compiler::Parser,
};

/// Like the `vireo` binary, but dumps the surface AST
/// without lowering it.
fn main() -> ExitCode {
    env_logger::init();

    let source = match Source::stdin() {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: could not read stdin: {}", err);
            return ExitCode::from(2);
        },
    };

    let mut dlogger = DiagnosticLogger::new();
    let mut parser = Parser::new(source);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    while let Some(stmnt) = parser.next_stmnt(&mut dlogger) {
        let line = match serde_json::to_string(&stmnt) {
            Ok(line) => line,
            Err(err) => {
                eprintln!("error: could not serialize statement: {}", err);
                return ExitCode::from(2);
            },
        };
        if writeln!(out, "{}", line).is_err() {
            return ExitCode::from(2);
        }
    }

    for diagnostic in dlogger.diagnostics() {
        eprintln!("{}", diagnostic);
    }

    if dlogger.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
