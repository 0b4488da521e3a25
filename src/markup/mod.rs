//! Template markup: logos tokenizer and fragment parser.

pub mod parser;
pub mod tokenizer;

pub use parser::{parse_fragment, ParseError};
pub use tokenizer::{TagToken, TextToken};
