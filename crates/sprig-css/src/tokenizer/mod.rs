//! CSS tokenizer module.

/// Token stream producer per [CSS Syntax Level 3 § 4.3](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms).
pub mod scanner;
/// CSS token types per [CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod token;

pub use scanner::{CssTokenizer, tokenize};
pub use token::{CssToken, HashType, Numeric};
