//! Test harness for running fixture cases with stochastic variations

use crate::common::{ExpectedError, ExpectedToken, Gen, TestCase};
use sdlang_core::{ErrorKind, ParseError, Parser, Token, TokenKind};

/// Result of running a test
#[derive(Debug)]
pub struct TestResult {
    pub passed: bool,
    pub input: Vec<u8>,
    pub expected: Vec<String>,
    pub actual: Vec<String>,
    pub seed: u64,
    pub errors: Vec<String>,
}

/// Collect formatted tokens plus the parse outcome
fn collect(input: &[u8]) -> (Vec<String>, Result<(), ParseError>) {
    let mut tokens = Vec::new();
    let mut sink = |t: &Token<'_>| tokens.push(format_token(t));
    let result = Parser::new().parse(input, &mut sink);
    (tokens, result)
}

/// Format token for comparison (simplified, no lines)
fn format_token(token: &Token<'_>) -> String {
    match token.kind {
        TokenKind::NodeEnd
        | TokenKind::Block
        | TokenKind::BlockEnd
        | TokenKind::True
        | TokenKind::False
        | TokenKind::Null => token.kind.name().to_string(),
        _ => format!(
            "{} {:?}",
            token.kind.name(),
            String::from_utf8_lossy(token.text)
        ),
    }
}

/// Format expected token for comparison
fn format_expected(token: &ExpectedToken) -> String {
    match token.text() {
        None => token.name().to_string(),
        Some(text) => format!("{} {:?}", token.name(), text),
    }
}

fn error_kind_name(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Grammar => "grammar",
        ErrorKind::StackOverflow => "stack-overflow",
        ErrorKind::BufferExhausted => "buffer-exhausted",
    }
}

/// Compare the parse outcome against the case's expectation
fn check_outcome(
    expected: &Option<ExpectedError>,
    actual: &Result<(), ParseError>,
    exact_line: bool,
    errors: &mut Vec<String>,
) {
    match (expected, actual) {
        (None, Ok(())) => {}
        (None, Err(e)) => errors.push(format!("Unexpected parse error: {}", e)),
        (Some(exp), Ok(())) => errors.push(format!(
            "Expected {} error at line {}, but the parse succeeded",
            exp.kind, exp.line
        )),
        (Some(exp), Err(e)) => {
            if error_kind_name(e.kind) != exp.kind {
                errors.push(format!(
                    "Error kind mismatch: expected {}, got {}",
                    exp.kind,
                    error_kind_name(e.kind)
                ));
            }
            if exact_line && e.line != exp.line {
                errors.push(format!(
                    "Error line mismatch: expected {}, got {}",
                    exp.line, e.line
                ));
            }
        }
    }
}

/// Run a single test case (canonical, no variations)
pub fn run_test(case: &TestCase) -> TestResult {
    let input = case.sdlang.as_bytes();
    let (actual, result) = collect(input);
    let expected: Vec<String> = case.tokens.iter().map(format_expected).collect();

    let mut errors = Vec::new();
    check_outcome(&case.error, &result, true, &mut errors);

    // Check token count
    if actual.len() != expected.len() {
        errors.push(format!(
            "Token count mismatch: expected {}, got {}",
            expected.len(),
            actual.len()
        ));
    }

    // Check each token
    for (i, (act, exp)) in actual.iter().zip(expected.iter()).enumerate() {
        if act != exp {
            errors.push(format!("Token {}: expected '{}', got '{}'", i, exp, act));
        }
    }

    TestResult {
        passed: errors.is_empty(),
        input: input.to_vec(),
        expected,
        actual,
        seed: 0,
        errors,
    }
}

/// Run test with stochastic variations
///
/// Applies independent variations:
/// - 40% chance of a complete statement above
/// - Geometric indent (α=0.9) on every line
/// - Random blank lines
/// - 40% chance of a complete statement below
///
/// Variations shift positions, so error cases check the kind only, and
/// token comparison is a subsequence match (wrapping statements add their
/// own tokens around the case's).
pub fn run_with_variations(case: &TestCase, gen: &mut Gen) -> TestResult {
    let mut input = Vec::new();

    // 40% chance: add a statement above
    if gen.chance(0.4) {
        input.extend(gen.sdlang_fragment(0));
    }

    // Determine indent level (geometric, α=0.9)
    let indent_level = gen.indent_level();
    let indent: Vec<u8> = vec![b' '; indent_level];

    // Add canonical test with indent and possible blank lines
    for line in case.sdlang.as_bytes().split(|&b| b == b'\n') {
        // Maybe inject blank line before
        input.extend(gen.blank_lines());

        if !line.is_empty() {
            input.extend(&indent);
            input.extend(line);
        }
        input.push(b'\n');
    }

    // 40% chance: add a statement below (only when the case parses; after
    // an error nothing more is scanned anyway)
    if case.error.is_none() && gen.chance(0.4) {
        input.extend(gen.sdlang_fragment(indent_level));
    }

    let (actual, result) = collect(&input);
    let expected: Vec<String> = case.tokens.iter().map(format_expected).collect();

    let mut errors = Vec::new();
    check_outcome(&case.error, &result, false, &mut errors);

    // Expected tokens appear in order (subsequence match) because the
    // wrapping context contributes tokens of its own
    let mut exp_idx = 0;
    for act in &actual {
        if exp_idx < expected.len() && act == &expected[exp_idx] {
            exp_idx += 1;
        }
    }

    if exp_idx < expected.len() {
        errors.push(format!(
            "Missing expected tokens starting at index {}: {:?}",
            exp_idx,
            &expected[exp_idx..]
        ));
    }

    TestResult {
        passed: errors.is_empty(),
        input,
        expected,
        actual,
        seed: gen.seed,
        errors,
    }
}

impl TestResult {
    /// Print detailed failure info
    pub fn print_failure(&self, case_id: &str) {
        eprintln!("\n=== FAILED: {} ===", case_id);
        eprintln!(
            "Seed: {} (set SDLANG_TEST_SEED={} to reproduce)",
            self.seed, self.seed
        );
        eprintln!("\nInput:");
        eprintln!("{}", String::from_utf8_lossy(&self.input));
        eprintln!("\nExpected tokens:");
        for (i, e) in self.expected.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nActual tokens:");
        for (i, e) in self.actual.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nErrors:");
        for e in &self.errors {
            eprintln!("  - {}", e);
        }
    }
}
