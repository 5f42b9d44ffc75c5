//! Stochastic content generators for test variations
//!
//! Uses seeded RNG for reproducibility. Print seed on failure for replay.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded generator for reproducible stochastic tests
pub struct Gen {
    pub rng: StdRng,
    pub seed: u64,
}

impl Gen {
    /// Create with specific seed (for reproduction)
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create from environment or random seed
    pub fn from_env_or_random() -> Self {
        let seed = std::env::var("SDLANG_TEST_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| rand::random());
        Self::new(seed)
    }

    /// Geometric distribution: count until rand > alpha
    /// Returns 0, 1, 2, ... with decreasing probability
    pub fn geometric(&mut self, alpha: f64) -> usize {
        let mut n = 0;
        while self.rng.gen::<f64>() < alpha {
            n += 1;
        }
        n
    }

    /// Poisson-like count (simplified)
    pub fn poisson(&mut self, lambda: f64) -> usize {
        let l = (-lambda).exp();
        let mut k = 0;
        let mut p = 1.0;
        loop {
            k += 1;
            p *= self.rng.gen::<f64>();
            if p <= l {
                break;
            }
        }
        k - 1
    }

    /// Random boolean with probability p
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p
    }

    /// Random identifier: letter or underscore, then the full ident set
    pub fn name(&mut self) -> Vec<u8> {
        let len = 1 + self.geometric(0.7);
        let mut name = Vec::with_capacity(len);
        name.push(self.rng.gen_range(b'a'..=b'z'));
        let chars = b"abcdefghijklmnopqrstuvwxyz0123456789-_.";
        for _ in 1..len {
            name.push(chars[self.rng.gen_range(0..chars.len())]);
        }
        name
    }

    /// Random integer literal
    pub fn integer(&mut self) -> Vec<u8> {
        let val: i32 = self.rng.gen_range(-9999..9999);
        val.to_string().into_bytes()
    }

    /// Random value literal in one of the grammar's forms
    pub fn value(&mut self) -> Vec<u8> {
        match self.rng.gen_range(0..6) {
            0 => self.integer(),
            1 => format!("{}.{}", self.rng.gen_range(0..99), self.rng.gen_range(0..99)).into_bytes(),
            2 => format!("0x{:X}", self.rng.gen::<u32>()).into_bytes(),
            3 => {
                let mut out = b"\"".to_vec();
                out.extend(self.name());
                out.push(b'"');
                out
            }
            4 => b"true".to_vec(),
            _ => b"null".to_vec(),
        }
    }

    /// Random complete statement (for context wrapping). Always ends with
    /// a newline so its tokens finish before whatever follows.
    pub fn sdlang_fragment(&mut self, base_indent: usize) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend(std::iter::repeat(b' ').take(base_indent));
        out.extend(self.name());

        // Maybe add an attribute
        if self.chance(0.3) {
            out.push(b' ');
            out.extend(self.name());
            out.push(b'=');
            out.extend(self.value());
        }

        // Maybe add plain values
        if self.chance(0.4) {
            out.push(b' ');
            out.extend(self.value());
        }

        // Maybe wrap a child in a block (balanced, so nesting depth is
        // unchanged for whatever follows)
        if self.chance(0.2) {
            out.extend(b" { ");
            out.extend(self.name());
            out.push(b' ');
            out.extend(self.integer());
            out.extend(b" }");
        }

        out.push(b'\n');
        out
    }

    /// Add random indent (geometric, α=0.9)
    pub fn indent_level(&mut self) -> usize {
        self.geometric(0.9) * 2 // 2 spaces per level
    }

    /// Inject random blank lines
    pub fn blank_lines(&mut self) -> Vec<u8> {
        let count = self.geometric(0.1); // Usually 0
        vec![b'\n'; count]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reproducibility() {
        let mut g1 = Gen::new(42);
        let mut g2 = Gen::new(42);

        for _ in 0..10 {
            assert_eq!(g1.name(), g2.name());
            assert_eq!(g1.value(), g2.value());
            assert_eq!(g1.geometric(0.9), g2.geometric(0.9));
        }
    }

    #[test]
    fn test_fragments_parse_cleanly() {
        let mut gen = Gen::new(7);
        for _ in 0..50 {
            let fragment = gen.sdlang_fragment(0);
            let mut sink = |_: &sdlang_core::Token<'_>| {};
            sdlang_core::Parser::new()
                .parse(&fragment[..], &mut sink)
                .unwrap_or_else(|e| {
                    panic!(
                        "generated fragment failed: {:?}: {}",
                        String::from_utf8_lossy(&fragment),
                        e
                    )
                });
        }
    }
}
