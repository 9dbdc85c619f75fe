use super::token::{CssToken, HashType, Numeric};

/// [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
///
/// CSS tokenizer following the CSS Syntax Module Level 3 specification.
pub struct CssTokenizer {
    /// The input string being tokenized
    input: Vec<char>,
    /// Current position in the input
    position: usize,
    /// Collected tokens
    tokens: Vec<CssToken>,
}

/// Tokenize `input` in one call. The result always ends with [`CssToken::EOF`].
#[must_use]
pub fn tokenize(input: &str) -> Vec<CssToken> {
    let mut tokenizer = CssTokenizer::new(input);
    tokenizer.run();
    tokenizer.into_tokens()
}

impl CssTokenizer {
    /// Create a new CSS tokenizer with the given input.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            // [§ 3.3 Preprocessing the input stream](https://www.w3.org/TR/css-syntax-3/#input-preprocessing)
            // "Replace any U+000D CARRIAGE RETURN (CR) code points, U+000C FORM FEED
            // (FF) code points, or pairs of U+000D CARRIAGE RETURN (CR) followed by
            // U+000A LINE FEED (LF) in input by a single U+000A LINE FEED (LF)
            // code point. Replace any U+0000 NULL ... with U+FFFD."
            input: input
                .replace("\r\n", "\n")
                .chars()
                .map(|c| match c {
                    '\r' | '\x0C' => '\n',
                    '\0' => '\u{FFFD}',
                    c => c,
                })
                .collect(),
            position: 0,
            tokens: Vec::new(),
        }
    }

    /// Consume tokens until EOF.
    pub fn run(&mut self) {
        loop {
            let token = self.consume_token();
            let is_eof = token.is_eof();
            self.tokens.push(token);
            if is_eof {
                break;
            }
        }
    }

    /// Return the collected tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<CssToken> {
        self.tokens
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peek(0)?;
        self.position += 1;
        Some(c)
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn consume_token(&mut self) -> CssToken {
        self.consume_comments();

        let Some(c) = self.consume() else {
            return CssToken::EOF;
        };

        match c {
            c if is_whitespace(c) => {
                while self.peek(0).is_some_and(is_whitespace) {
                    self.position += 1;
                }
                CssToken::Whitespace
            }
            '"' | '\'' => self.consume_string(c),
            '#' => {
                // "If the next input code point is an ident code point or the next
                // two input code points are a valid escape, then: ..."
                if self.peek(0).is_some_and(is_ident_char) || is_valid_escape(self.peek(0), self.peek(1)) {
                    let hash_type = if would_start_ident(self.peek(0), self.peek(1), self.peek(2)) {
                        HashType::Id
                    } else {
                        HashType::Unrestricted
                    };
                    CssToken::Hash {
                        value: self.consume_name(),
                        hash_type,
                    }
                } else {
                    CssToken::Delim('#')
                }
            }
            '(' => CssToken::LeftParen,
            ')' => CssToken::RightParen,
            '[' => CssToken::LeftBracket,
            ']' => CssToken::RightBracket,
            '{' => CssToken::LeftBrace,
            '}' => CssToken::RightBrace,
            ',' => CssToken::Comma,
            ':' => CssToken::Colon,
            ';' => CssToken::Semicolon,
            '+' | '.' => {
                if starts_number(Some(c), self.peek(0), self.peek(1)) {
                    self.position -= 1;
                    self.consume_numeric()
                } else {
                    CssToken::Delim(c)
                }
            }
            '-' => {
                if starts_number(Some(c), self.peek(0), self.peek(1)) {
                    self.position -= 1;
                    self.consume_numeric()
                } else if would_start_ident(Some(c), self.peek(0), self.peek(1)) {
                    self.position -= 1;
                    self.consume_ident_like()
                } else {
                    CssToken::Delim('-')
                }
            }
            '@' => {
                if would_start_ident(self.peek(0), self.peek(1), self.peek(2)) {
                    CssToken::AtKeyword(self.consume_name())
                } else {
                    CssToken::Delim('@')
                }
            }
            '\\' => {
                if is_valid_escape(Some(c), self.peek(0)) {
                    self.position -= 1;
                    self.consume_ident_like()
                } else {
                    // "This is a parse error. Return a <delim-token> with its value
                    // set to the current input code point."
                    CssToken::Delim('\\')
                }
            }
            c if c.is_ascii_digit() => {
                self.position -= 1;
                self.consume_numeric()
            }
            c if is_ident_start_char(c) => {
                self.position -= 1;
                self.consume_ident_like()
            }
            c => CssToken::Delim(c),
        }
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comments)
    fn consume_comments(&mut self) {
        while self.peek(0) == Some('/') && self.peek(1) == Some('*') {
            self.position += 2;
            loop {
                match self.consume() {
                    Some('*') if self.peek(0) == Some('/') => {
                        self.position += 1;
                        break;
                    }
                    Some(_) => {}
                    // "If ... EOF, this is a parse error. Return."
                    None => return,
                }
            }
        }
    }

    /// [§ 4.3.3 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric(&mut self) -> CssToken {
        let number = self.consume_number();
        if would_start_ident(self.peek(0), self.peek(1), self.peek(2)) {
            CssToken::Dimension {
                number,
                unit: self.consume_name(),
            }
        } else if self.peek(0) == Some('%') {
            self.position += 1;
            CssToken::Percentage(number)
        } else {
            CssToken::Number(number)
        }
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    fn consume_number(&mut self) -> Numeric {
        let mut repr = String::new();
        let mut integer = true;

        let signed = matches!(self.peek(0), Some('+' | '-'));
        if signed {
            repr.extend(self.consume());
        }
        self.consume_digits(&mut repr);

        if self.peek(0) == Some('.') && self.peek(1).is_some_and(|c| c.is_ascii_digit()) {
            integer = false;
            repr.extend(self.consume());
            self.consume_digits(&mut repr);
        }

        let exponent_digit_at = match (self.peek(1), self.peek(2)) {
            (Some('+' | '-'), Some(d)) if d.is_ascii_digit() => Some(2),
            (Some(d), _) if d.is_ascii_digit() => Some(1),
            _ => None,
        };
        if matches!(self.peek(0), Some('e' | 'E')) {
            if let Some(len) = exponent_digit_at {
                integer = false;
                for _ in 0..len {
                    repr.extend(self.consume());
                }
                self.consume_digits(&mut repr);
            }
        }

        Numeric {
            value: repr.parse().unwrap_or(0.0),
            int_value: if integer { repr.parse().ok() } else { None },
            signed,
        }
    }

    fn consume_digits(&mut self, repr: &mut String) {
        while self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
            repr.extend(self.consume());
        }
    }

    /// [§ 4.3.4 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like(&mut self) -> CssToken {
        let name = self.consume_name();
        if self.peek(0) == Some('(') {
            self.position += 1;
            CssToken::Function(name)
        } else {
            CssToken::Ident(name)
        }
    }

    /// [§ 4.3.5 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string(&mut self, ending: char) -> CssToken {
        let mut value = String::new();
        loop {
            match self.consume() {
                Some(c) if c == ending => return CssToken::String(value),
                // "EOF: This is a parse error. Return the <string-token>."
                None => return CssToken::String(value),
                Some('\n') => {
                    // "This is a parse error. Reconsume the current input code
                    // point, create a <bad-string-token>, and return it."
                    self.position -= 1;
                    return CssToken::BadString;
                }
                Some('\\') => match self.peek(0) {
                    None => {}
                    Some('\n') => self.position += 1,
                    Some(_) => value.push(self.consume_escape()),
                },
                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    ///
    /// Called after the backslash has been consumed.
    fn consume_escape(&mut self) -> char {
        let Some(c) = self.consume() else {
            return '\u{FFFD}';
        };
        if !c.is_ascii_hexdigit() {
            return c;
        }

        let mut hex = String::from(c);
        while hex.len() < 6 && self.peek(0).is_some_and(|c| c.is_ascii_hexdigit()) {
            hex.extend(self.consume());
        }
        if self.peek(0).is_some_and(is_whitespace) {
            self.position += 1;
        }
        // "If this number is zero, or is for a surrogate, or is greater than the
        // maximum allowed code point, return U+FFFD REPLACEMENT CHARACTER."
        u32::from_str_radix(&hex, 16)
            .ok()
            .filter(|&code| code != 0)
            .and_then(char::from_u32)
            .unwrap_or('\u{FFFD}')
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_name(&mut self) -> String {
        let mut name = String::new();
        loop {
            match self.peek(0) {
                Some(c) if is_ident_char(c) => {
                    name.push(c);
                    self.position += 1;
                }
                Some('\\') if is_valid_escape(Some('\\'), self.peek(1)) => {
                    self.position += 1;
                    name.push(self.consume_escape());
                }
                _ => return name,
            }
        }
    }
}

/// [§ 4.2 whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
/// After preprocessing only LF, tab and space remain.
const fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ')
}

/// [§ 4.2 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.2 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    is_ident_start_char(c) || c.is_ascii_digit() || c == '-'
}

/// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
fn is_valid_escape(first: Option<char>, second: Option<char>) -> bool {
    first == Some('\\') && second != Some('\n')
}

/// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
fn would_start_ident(first: Option<char>, second: Option<char>, third: Option<char>) -> bool {
    match first {
        Some('-') => {
            second.is_some_and(|c| is_ident_start_char(c) || c == '-')
                || is_valid_escape(second, third)
        }
        Some('\\') => is_valid_escape(first, second),
        Some(c) => is_ident_start_char(c),
        None => false,
    }
}

/// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
fn starts_number(first: Option<char>, second: Option<char>, third: Option<char>) -> bool {
    let is_digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());
    match first {
        Some('+' | '-') => is_digit(second) || (second == Some('.') && is_digit(third)),
        Some('.') => is_digit(second),
        c => is_digit(c),
    }
}
