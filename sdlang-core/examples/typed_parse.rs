//! Parse stdin through the typed dispatcher and print decoded values.
//!
//! Usage: echo 'server port=8080 { host "localhost" }' | cargo run --example typed_parse

use std::io;
use std::process::ExitCode;

use sdlang_core::{Parser, ReadSource, TypedDispatcher, ValueHandler};

struct PrettyPrinter {
    depth: usize,
}

impl PrettyPrinter {
    fn pad(&self) -> String {
        "  ".repeat(self.depth)
    }

    fn label(node: &str, attribute: &str) -> String {
        if attribute.is_empty() {
            node.to_string()
        } else {
            format!("{}.{}", node, attribute)
        }
    }
}

impl ValueHandler for PrettyPrinter {
    fn block_begin(&mut self, node: &str) {
        println!("{}{} {{", self.pad(), node);
        self.depth += 1;
    }

    fn block_end(&mut self) {
        // The engine only emits balanced block pairs
        self.depth -= 1;
        println!("{}}}", self.pad());
    }

    fn value_i32(&mut self, node: &str, attribute: &str, value: i32) {
        println!("{}{} = {} (i32)", self.pad(), Self::label(node, attribute), value);
    }

    fn value_i64(&mut self, node: &str, attribute: &str, value: i64) {
        println!("{}{} = {} (i64)", self.pad(), Self::label(node, attribute), value);
    }

    fn value_i128(&mut self, node: &str, attribute: &str, value: i128) {
        println!("{}{} = {} (i128)", self.pad(), Self::label(node, attribute), value);
    }

    fn value_u32(&mut self, node: &str, attribute: &str, value: u32) {
        println!("{}{} = {:#x} (u32)", self.pad(), Self::label(node, attribute), value);
    }

    fn value_u64(&mut self, node: &str, attribute: &str, value: u64) {
        println!("{}{} = {:#x} (u64)", self.pad(), Self::label(node, attribute), value);
    }

    fn value_f32(&mut self, node: &str, attribute: &str, value: f32) {
        println!("{}{} = {} (f32)", self.pad(), Self::label(node, attribute), value);
    }

    fn value_f64(&mut self, node: &str, attribute: &str, value: f64) {
        println!("{}{} = {} (f64)", self.pad(), Self::label(node, attribute), value);
    }

    fn value_string(&mut self, node: &str, attribute: &str, value: &[u8]) {
        println!(
            "{}{} = {:?} (string)",
            self.pad(),
            Self::label(node, attribute),
            String::from_utf8_lossy(value)
        );
    }

    fn value_base64(&mut self, node: &str, attribute: &str, value: &[u8]) {
        println!(
            "{}{} = {} (base64, {} bytes of text)",
            self.pad(),
            Self::label(node, attribute),
            String::from_utf8_lossy(value),
            value.len()
        );
    }

    fn value_bool(&mut self, node: &str, attribute: &str, value: bool) {
        println!("{}{} = {} (bool)", self.pad(), Self::label(node, attribute), value);
    }

    fn value_null(&mut self, node: &str, attribute: &str) {
        println!("{}{} = null", self.pad(), Self::label(node, attribute));
    }
}

fn main() -> ExitCode {
    let mut source = ReadSource::new(io::stdin());
    let mut dispatcher = TypedDispatcher::new(PrettyPrinter { depth: 0 });
    let result = Parser::new()
        .on_error(|kind, line| eprintln!("error: {} at line {}", kind.message(), line))
        .parse(&mut source, &mut dispatcher);

    if let Some(err) = source.take_error() {
        eprintln!("read failed: {}", err);
        return ExitCode::FAILURE;
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => ExitCode::from(err.kind.code()),
    }
}
