//! Demo payment codes.
//!
//! A payment intent carries a short numeric code that the payer echoes back
//! to confirm it. This stands in for a payment provider's confirmation
//! callback and offers no security of its own.

use rand::Rng;

pub trait PaymentCodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Uniformly random decimal codes of a fixed number of digits.
#[derive(Debug, Clone)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl PaymentCodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..self.length)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }
}

/// Always hands out the same code. Used by tests and local demos.
#[derive(Debug, Clone)]
pub struct FixedCodeGenerator {
    code: String,
}

impl FixedCodeGenerator {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

impl PaymentCodeGenerator for FixedCodeGenerator {
    fn generate(&self) -> String {
        self.code.clone()
    }
}

/// Compares without short-circuiting on the first differing byte.
pub fn codes_match(expected: &str, submitted: &str) -> bool {
    let submitted = submitted.trim();
    if expected.len() != submitted.len() {
        return false;
    }
    expected
        .bytes()
        .zip(submitted.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
