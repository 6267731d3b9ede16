//! Password strength analysis
//!
//! Deterministic, stateless scoring of an arbitrary password string. The
//! analysis is total: every input, including the empty string, yields a
//! well-formed [`Analysis`].

mod analyzer;
mod types;

pub use analyzer::{analyze, charset_size, COMMON_PASSWORDS, SYMBOLS};
pub use types::{Analysis, CrackTime, Pattern, Strength, StrengthLevel};
