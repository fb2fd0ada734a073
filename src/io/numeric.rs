use crate::error::{FormatError, Location, Result, ValueError};

/// Characters a numeric payload may contain before conversion is attempted.
const NUMERIC_CHARSET: &str = "/eE-+.,0123456789 \r\n";

/// Rejects `text` if it contains anything outside [`NUMERIC_CHARSET`].
///
/// # Errors
///
/// Returns [`ValueError::NonDigit`] naming `what` was being read.
pub fn check_numeric_charset(text: &str, line: usize, what: &'static str) -> Result<()> {
    if text.chars().all(|c| NUMERIC_CHARSET.contains(c)) {
        Ok(())
    } else {
        Err(ValueError::NonDigit {
            at: Location::Line(line),
            what,
            text: text.to_owned(),
        }
        .into())
    }
}

/// Screens `text` and converts it into exactly three whitespace-separated numbers.
///
/// # Errors
///
/// Returns a [`ValueError`] for disallowed characters or unparsable tokens,
/// and [`FormatError::Arity`] if there are not exactly three tokens.
pub fn parse_triple(text: &str, line: usize, what: &'static str) -> Result<[f64; 3]> {
    parse_triple_with_optional(text, line, what, 0)
}

/// Like [`parse_triple`], but accepts up to `optional` further numbers
/// (such as the OBJ vertex weight). They are validated and dropped.
///
/// # Errors
///
/// Returns a [`ValueError`] for disallowed characters or unparsable tokens,
/// and [`FormatError::Arity`] for fewer than three or too many tokens.
pub fn parse_triple_with_optional(
    text: &str,
    line: usize,
    what: &'static str,
    optional: usize,
) -> Result<[f64; 3]> {
    check_numeric_charset(text, line, what)?;

    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() < 3 || tokens.len() > 3 + optional {
        return Err(FormatError::Arity {
            at: Location::Line(line),
            what,
            expected: 3,
            found: tokens.len(),
        }
        .into());
    }

    let mut out = [0.0; 3];
    for (slot, token) in out.iter_mut().zip(&tokens) {
        *slot = parse_number(token, line, what)?;
    }
    for token in &tokens[3..] {
        parse_number(token, line, what)?;
    }
    Ok(out)
}

/// Converts one token into an `f64`.
///
/// # Errors
///
/// Returns [`ValueError::InvalidNumber`] if the token is not a decimal number.
pub fn parse_number(token: &str, line: usize, what: &'static str) -> Result<f64> {
    token.parse::<f64>().map_err(|_| {
        ValueError::InvalidNumber {
            at: Location::Line(line),
            what,
            token: token.to_owned(),
        }
        .into()
    })
}

/// Converts one token into a signed index.
///
/// # Errors
///
/// Returns [`ValueError::InvalidNumber`] if the token is not an integer.
pub fn parse_index(token: &str, line: usize, what: &'static str) -> Result<i64> {
    token.parse::<i64>().map_err(|_| {
        ValueError::InvalidNumber {
            at: Location::Line(line),
            what,
            token: token.to_owned(),
        }
        .into()
    })
}
