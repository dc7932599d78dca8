//! Cooking of numeric and string literal lexemes.

use pyxc_ir::TokenKind;

use crate::lex_error::LexErrorKind;

/// Turn a number-shaped lexeme into an `Int` or `Float` token kind.
///
/// `_` is accepted as a digit separator. A second `.` or any letter makes
/// the literal malformed instead of silently truncating it.
pub(crate) fn cook_number(slice: &str) -> Result<TokenKind, LexErrorKind> {
    if slice.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(LexErrorKind::MalformedNumber {
            reason: "unexpected letter in number",
        });
    }
    if slice.ends_with('_') || slice.contains("__") {
        return Err(LexErrorKind::MalformedNumber {
            reason: "misplaced digit separator `_`",
        });
    }

    let digits: String = slice.chars().filter(|&c| c != '_').collect();
    match digits.matches('.').count() {
        0 => digits
            .parse::<u64>()
            .map(TokenKind::Int)
            .map_err(|_| LexErrorKind::NumberOverflow),
        1 => digits
            .parse::<f64>()
            .map(|f| TokenKind::Float(f.to_bits()))
            .map_err(|_| LexErrorKind::MalformedNumber {
                reason: "invalid float literal",
            }),
        _ => Err(LexErrorKind::MalformedNumber {
            reason: "more than one decimal point",
        }),
    }
}

/// Process escapes in the body of a string literal (quotes stripped).
///
/// Returns the cooked text and the byte offset (within `body`) and
/// character of every unknown escape. Unknown escapes keep the escaped
/// character.
pub(crate) fn cook_string(body: &str) -> (String, Vec<(usize, char)>) {
    let mut out = String::with_capacity(body.len());
    let mut bad = Vec::new();
    let mut chars = body.char_indices();

    while let Some((_, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some((offset, escaped)) = chars.next() else {
            break;
        };
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            other => {
                bad.push((offset - 1, other));
                out.push(other);
            }
        }
    }
    (out, bad)
}
