use std::{
    io::{self, Write},
    process::ExitCode,
};

use vireo::{
    common::{DiagnosticLogger, Source},
    compiler::{lower_stmnt, LabelStack, Parser},
};

/// Reads a Vireo source from stdin and writes one JSON
/// object per lowered top-level statement to stdout.
/// Diagnostics go to stderr; the exit code reflects
/// whether any of them were errors.
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
    let mut labels = LabelStack::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut count = 0usize;
    while let Some(stmnt) = parser.next_stmnt(&mut dlogger) {
        let lowered = lower_stmnt(&stmnt, &mut labels, &mut dlogger);
        let line = match serde_json::to_string(&lowered) {
            Ok(line) => line,
            Err(err) => {
                eprintln!("error: could not serialize statement: {}", err);
                return ExitCode::from(2);
            },
        };
        if writeln!(out, "{}", line).is_err() {
            return ExitCode::from(2);
        }
        count += 1;
    }

    log::info!(
        "lowered {} statements with {} diagnostics",
        count,
        dlogger.len()
    );

    for diagnostic in dlogger.diagnostics() {
        eprintln!("{}", diagnostic);
    }

    if dlogger.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
