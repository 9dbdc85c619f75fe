//! [CSS Syntax § 6 The An+B microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)
//!
//! "The An+B notation defines an integer step (A) and offset (B), and
//! represents the An+Bth elements in a list, for every positive integer or
//! zero value of n, with the first element in the list having index 1."
//!
//! `An+B` does not tokenize cleanly: `2n+1` is a dimension `2n` followed by
//! the signed number `+1`, `n-1` is a single ident and `-n- 1` is an ident,
//! whitespace and an unsigned number. The parser below walks every shape the
//! grammar allows.

use crate::tokenizer::{CssToken, Numeric};

/// Parse `An+B` from the argument tokens of an `nth-*` pseudo-class.
///
/// Returns `None` when the tokens do not form exactly one `An+B` value.
#[must_use]
pub fn parse_nth(arguments: &[CssToken]) -> Option<(i64, i64)> {
    let mut tokens = arguments.iter();
    let mut significant = arguments.iter().filter(|t| !t.is_whitespace());

    match significant.next()? {
        CssToken::Number(number) => {
            let b = number.integer()?;
            parse_end(significant, 0, b)
        }
        CssToken::Dimension { number, unit } => {
            let a = number.integer()?;
            match unit.to_ascii_lowercase().as_str() {
                "n" => parse_b(significant, a),
                "n-" => parse_signless_b(significant, a, -1),
                unit => parse_end(significant, a, n_dash_digits(unit)?),
            }
        }
        CssToken::Ident(ident) => match ident.to_ascii_lowercase().as_str() {
            "even" => parse_end(significant, 2, 0),
            "odd" => parse_end(significant, 2, 1),
            "n" => parse_b(significant, 1),
            "-n" => parse_b(significant, -1),
            "n-" => parse_signless_b(significant, 1, -1),
            "-n-" => parse_signless_b(significant, -1, -1),
            ident => match ident.strip_prefix('-') {
                Some(rest) => parse_end(significant, -1, n_dash_digits(rest)?),
                None => parse_end(significant, 1, n_dash_digits(ident)?),
            },
        },
        CssToken::Delim('+') => {
            // No whitespace is allowed between the '+' and the 'n'.
            let position = arguments.iter().position(|t| t.is_delim('+'))?;
            let _ = tokens.nth(position);
            let CssToken::Ident(ident) = tokens.next()? else {
                return None;
            };
            let _ = significant.next();
            match ident.to_ascii_lowercase().as_str() {
                "n" => parse_b(significant, 1),
                "n-" => parse_signless_b(significant, 1, -1),
                ident => parse_end(significant, 1, n_dash_digits(ident)?),
            }
        }
        _ => None,
    }
}

/// `n-<digits>` as the (negative) offset it spells.
fn n_dash_digits(ident: &str) -> Option<i64> {
    let digits = ident.strip_prefix("n-")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i64>().ok().map(|b| -b)
}

/// After `An`: nothing, `+ B`, `- B`, or a signed integer.
fn parse_b<'t>(mut tokens: impl Iterator<Item = &'t CssToken>, a: i64) -> Option<(i64, i64)> {
    match tokens.next() {
        None => Some((a, 0)),
        Some(CssToken::Delim('+')) => parse_signless_b(tokens, a, 1),
        Some(CssToken::Delim('-')) => parse_signless_b(tokens, a, -1),
        Some(CssToken::Number(number @ Numeric { signed: true, .. })) => {
            parse_end(tokens, a, number.integer()?)
        }
        Some(_) => None,
    }
}

/// After a sign that stands apart from `B`: an unsigned integer.
fn parse_signless_b<'t>(
    mut tokens: impl Iterator<Item = &'t CssToken>,
    a: i64,
    sign: i64,
) -> Option<(i64, i64)> {
    match tokens.next()? {
        CssToken::Number(number @ Numeric { signed: false, .. }) => {
            parse_end(tokens, a, sign * number.integer()?)
        }
        _ => None,
    }
}

fn parse_end<'t>(mut tokens: impl Iterator<Item = &'t CssToken>, a: i64, b: i64) -> Option<(i64, i64)> {
    tokens.next().is_none().then_some((a, b))
}

/// Whether an element with `x` relevant siblings before it (0-based
/// position) is selected by `An+B`, i.e. `x = A·n + (B - 1)` for some
/// integer `n ≥ 0`.
#[must_use]
pub fn nth_matches(a: i64, b: i64, x: usize) -> bool {
    let a = i128::from(a);
    let Ok(x) = i128::try_from(x) else {
        return false;
    };
    let offset = x - (i128::from(b) - 1);
    if a == 0 {
        offset == 0
    } else {
        offset.rem_euclid(a) == 0 && offset.div_euclid(a) >= 0
    }
}
