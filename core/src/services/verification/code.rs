//! Numeric one-time code generation

use rand::{rngs::OsRng, Rng};

/// Number of digits in a one-time code
pub const CODE_LENGTH: usize = 6;

/// Uniformly random six-digit code from the OS generator
pub fn generate_code() -> String {
    let value: u32 = OsRng.gen_range(100_000..1_000_000);
    value.to_string()
}

/// Exactly six ASCII digits
pub fn is_well_formed_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}
