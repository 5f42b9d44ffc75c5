//! Fixture loading from YAML files

use serde::Deserialize;
use std::path::Path;

/// A single test case from a fixture file
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub desc: String,
    pub sdlang: String,
    #[serde(default)]
    pub tokens: Vec<ExpectedToken>,
    #[serde(default)]
    pub error: Option<ExpectedError>,
}

/// Expected token - either a bare kind name or [kind, text]
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExpectedToken {
    /// Token whose text is irrelevant (node-end, block, keywords)
    Bare(String),
    /// Token with payload text [kind, "text"]
    WithText(String, String),
}

/// Expected parse failure: a stable kind name plus the 1-based line
#[derive(Debug, Clone, Deserialize)]
pub struct ExpectedError {
    pub kind: String,
    pub line: u32,
}

impl ExpectedToken {
    pub fn name(&self) -> &str {
        match self {
            ExpectedToken::Bare(name) => name,
            ExpectedToken::WithText(name, _) => name,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            ExpectedToken::Bare(_) => None,
            ExpectedToken::WithText(_, text) => Some(text),
        }
    }
}

/// Load all test cases from a YAML fixture file
pub fn load_fixtures(path: &Path) -> Vec<TestCase> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read fixture file {:?}: {}", path, e));
    serde_yaml::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture file {:?}: {}", path, e))
}

/// Load fixtures from the standard fixtures directory
pub fn load_fixtures_by_name(name: &str) -> Vec<TestCase> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{}.yaml", name));
    load_fixtures(&path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_nodes() {
        let cases = load_fixtures_by_name("nodes");
        assert!(!cases.is_empty());
        assert!(cases.iter().any(|c| c.id == "simple_node"));
    }
}
