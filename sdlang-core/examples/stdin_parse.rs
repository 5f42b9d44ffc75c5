//! Parse a file (or stdin) and print one line per token.
//!
//! Usage: cargo run --example stdin_parse [FILE]
//!
//! Exits with the error's stable code when the parse fails.

use std::fs::File;
use std::io::{self, Read};
use std::process::ExitCode;

use sdlang_core::{Parser, ReadSource, TokenPrinter};

fn main() -> ExitCode {
    let reader: Box<dyn Read> = match std::env::args().nth(1) {
        Some(path) => match File::open(&path) {
            Ok(file) => Box::new(file),
            Err(err) => {
                eprintln!("{}: {}", path, err);
                return ExitCode::FAILURE;
            }
        },
        None => Box::new(io::stdin()),
    };

    let mut source = ReadSource::new(reader);
    let mut sink = TokenPrinter::stdout();
    let result = Parser::new()
        .on_error(|kind, line| eprintln!("error: {} at line {}", kind.message(), line))
        .parse(&mut source, &mut sink);

    if let Some(err) = source.take_error() {
        eprintln!("read failed: {}", err);
        return ExitCode::FAILURE;
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => ExitCode::from(err.kind.code()),
    }
}
