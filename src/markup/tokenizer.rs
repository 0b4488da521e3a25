//! logos-based markup tokenizer.
//!
//! Markup lexing is context-sensitive: between tags any run of characters is
//! text, while inside a tag angle brackets delimit names, `=`, and quoted
//! values. That is modelled as two logos token enums — [`TextToken`] for
//! content position and [`TagToken`] for inside a tag — with the parser
//! switching between them via `Lexer::morph`.
//!
//! Token priority inside each enum follows logos rules: longest match wins,
//! so `</` lexes as [`TextToken::CloseTagStart`] rather than `<` + text, and
//! `/>` as [`TagToken::SelfClose`] rather than two errors.

use logos::Logos;

/// Tokens lexed in content position (between tags).
///
/// Whitespace is NOT skipped here: it belongs to the text runs.
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum TextToken {
    /// `</` — start of a closing tag.
    #[token("</")]
    CloseTagStart,

    /// `<` — start of an opening tag.
    #[token("<")]
    TagStart,

    /// Any run of characters up to the next `<`.
    #[regex(r"[^<]+")]
    Text,
}

/// Tokens lexed inside a tag (after `<` or `</`, up to `>` or `/>`).
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum TagToken {
    /// `/>` — end of a self-closing tag.
    #[token("/>")]
    SelfClose,

    /// `>` — end of a tag.
    #[token(">")]
    Close,

    /// `=` between an attribute name and its value.
    #[token("=")]
    Equals,

    /// Double-quoted attribute value.
    #[regex(r#""[^"]*""#)]
    QuotedValue,

    /// Single-quoted attribute value.
    #[regex(r"'[^']*'")]
    QuotedValueSingle,

    /// Tag or attribute name.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_:-]*")]
    Ident,
}
