//! CSS Token types per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
//!
//! Selectors only ever see a subset of the full token vocabulary: URL,
//! unicode-range and CDO/CDC tokens never appear in a selector, so the
//! tokenizer does not produce them.

use core::fmt;

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// "A `<hash-token>` with the type flag set to 'id'... or 'unrestricted'."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashType {
    /// "id" - the hash token's value is a valid identifier
    Id,
    /// "unrestricted" - the hash token's value is not a valid identifier
    Unrestricted,
}

/// The numeric part shared by number, percentage and dimension tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Numeric {
    /// "a numeric value"
    pub value: f64,
    /// The value as an integer, when the "type flag" is "integer" and it fits.
    pub int_value: Option<i64>,
    /// Whether the source spelled an explicit `+` or `-` sign.
    ///
    /// `An+B` parsing needs this: `2n+1` tokenizes as a dimension followed
    /// by a *signed* number, `2n + 1` as a delim and an unsigned one.
    pub signed: bool,
}

impl Numeric {
    /// Integer value, if this is an integer token.
    #[must_use]
    pub const fn integer(&self) -> Option<i64> {
        self.int_value
    }
}

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
#[derive(Debug, Clone, PartialEq)]
pub enum CssToken {
    /// "`<ident-token>`"
    Ident(String),

    /// "`<function-token>`", the name without the opening parenthesis.
    Function(String),

    /// "`<at-keyword-token>`"
    AtKeyword(String),

    /// "`<hash-token>`"
    Hash {
        /// "a value composed of one or more code points"
        value: String,
        /// "a type flag set to either 'id' or 'unrestricted'"
        hash_type: HashType,
    },

    /// "`<string-token>`"
    String(String),

    /// "`<bad-string-token>`"
    BadString,

    /// "`<delim-token>`"
    Delim(char),

    /// "`<number-token>`"
    Number(Numeric),

    /// "`<percentage-token>`"
    Percentage(Numeric),

    /// "`<dimension-token>`"
    Dimension {
        /// Numeric value and flags.
        number: Numeric,
        /// "a unit"
        unit: String,
    },

    /// "`<whitespace-token>`"
    Whitespace,

    /// "`<colon-token>`"
    Colon,

    /// "`<semicolon-token>`"
    Semicolon,

    /// "`<comma-token>`"
    Comma,

    /// `<[-token>`
    LeftBracket,

    /// `<]-token>`
    RightBracket,

    /// `<(-token>`
    LeftParen,

    /// `<)-token>`
    RightParen,

    /// `<{-token>`
    LeftBrace,

    /// `<}-token>`
    RightBrace,

    /// End of input
    EOF,
}

impl CssToken {
    /// Create a new ident token.
    #[must_use]
    pub fn ident(value: impl Into<String>) -> Self {
        Self::Ident(value.into())
    }

    /// Create a new unsigned integer number token.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn integer(value: i64) -> Self {
        Self::Number(Numeric {
            value: value as f64,
            int_value: Some(value),
            signed: false,
        })
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EOF)
    }

    /// Returns true if this is a whitespace token.
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace)
    }

    /// Returns true if this is the delim token for `c`.
    #[must_use]
    pub fn is_delim(&self, c: char) -> bool {
        *self == Self::Delim(c)
    }
}

impl fmt::Display for CssToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(v) => write!(f, "<ident:{v}>"),
            Self::Function(v) => write!(f, "<function:{v}(>"),
            Self::AtKeyword(v) => write!(f, "<at-keyword:@{v}>"),
            Self::Hash { value, hash_type } => {
                let t = match hash_type {
                    HashType::Id => "id",
                    HashType::Unrestricted => "unrestricted",
                };
                write!(f, "<hash:#{value} ({t})>")
            }
            Self::String(v) => write!(f, "<string:\"{v}\">"),
            Self::BadString => write!(f, "<bad-string>"),
            Self::Delim(c) => write!(f, "<delim:{c}>"),
            Self::Number(n) => write!(f, "<number:{}>", n.value),
            Self::Percentage(n) => write!(f, "<percentage:{}%>", n.value),
            Self::Dimension { number, unit } => write!(f, "<dimension:{}{unit}>", number.value),
            Self::Whitespace => write!(f, "<whitespace>"),
            Self::Colon => write!(f, "<colon>"),
            Self::Semicolon => write!(f, "<semicolon>"),
            Self::Comma => write!(f, "<comma>"),
            Self::LeftBracket => write!(f, "<[>"),
            Self::RightBracket => write!(f, "<]>"),
            Self::LeftParen => write!(f, "<(>"),
            Self::RightParen => write!(f, "<)>"),
            Self::LeftBrace => write!(f, "<{{>"),
            Self::RightBrace => write!(f, "<}}>"),
            Self::EOF => write!(f, "<EOF>"),
        }
    }
}
