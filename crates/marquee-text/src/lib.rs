#![forbid(unsafe_code)]

//! Display-column measurement and circular slicing for marquee.
//!
//! Status bars allot space in terminal cells, not characters: East-Asian
//! wide and fullwidth characters occupy two columns, everything else one.
//! This crate measures strings in those columns and cuts fixed-column
//! windows out of a string treated as circular, which is all the scroll
//! engine needs to keep its output a constant visual width.
//!
//! # Example
//! ```
//! use marquee_text::{visual_slice, visual_width};
//!
//! assert_eq!(visual_width("ふ bar バズ"), 11);
//!
//! // A window that lands mid-way through a wide character renders the
//! // leftover column as a space.
//! assert_eq!(visual_slice("ふば", 0, 3), "ふ ");
//!
//! // Indices wrap, so the slice can straddle the end of the text.
//! assert_eq!(visual_slice("ふば", 1, 4), "ばふ");
//! ```

use unicode_width::UnicodeWidthChar;

/// Columns a single character occupies: 2 for East-Asian wide/fullwidth
/// characters, 1 for everything else.
///
/// Every character contributes exactly 1 or 2; combining marks and
/// control characters are counted as 1 so the scroll offset always maps
/// to a definite column position.
#[must_use]
pub fn char_width(ch: char) -> usize {
    if UnicodeWidthChar::width(ch) == Some(2) {
        2
    } else {
        1
    }
}

/// Visual width of `text` in display columns.
///
/// Additive over concatenation; the empty string measures 0.
#[must_use]
pub fn visual_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Cut a window of exactly `length` display columns out of `text`
/// treated as circular, starting at the character index `index`.
///
/// Negative indices wrap from the end (`-1` is the last character), and
/// indices past the end wrap around the front. The walk covers at most
/// one full rotation; if the rotation runs out before the column budget
/// does, the result is padded with trailing spaces so its
/// [`visual_width`] still equals `length`. When the next character is
/// double-width but only one column of budget remains, a single space is
/// emitted in its place and the walk stops — the caller is responsible
/// for holding its read position so the character is not skipped.
///
/// `length <= 0` yields the empty string.
#[must_use]
pub fn visual_slice(text: &str, index: isize, length: isize) -> String {
    if length <= 0 {
        return String::new();
    }
    let chars: Vec<char> = text.chars().collect();
    let mut budget = length;
    let mut out = String::new();
    if !chars.is_empty() {
        let start = index.rem_euclid(chars.len() as isize) as usize;
        for step in 0..chars.len() {
            if budget <= 0 {
                break;
            }
            let ch = chars[(start + step) % chars.len()];
            let width = char_width(ch) as isize;
            if width == 2 && budget == 1 {
                out.push(' ');
                return out;
            }
            out.push(ch);
            budget -= width;
        }
    }
    // Shorter than the window; pad so in-place redraws cover old output.
    for _ in 0..budget {
        out.push(' ');
    }
    out
}
