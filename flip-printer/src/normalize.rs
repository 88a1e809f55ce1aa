//! Text normalization before layout
//!
//! Unifies line endings, limits blank lines, and swaps typographic
//! punctuation for characters the device prints at half width.

/// Characters replaced before measuring and encoding
pub const SUBSTITUTIONS: &[(char, char)] = &[
    ('\u{00A0}', ' '),  // no-break space
    ('\u{2018}', '\''), // left single quote
    ('\u{2019}', '\''), // right single quote
    ('\u{201C}', '"'),  // left double quote
    ('\u{201D}', '"'),  // right double quote
    ('\u{2014}', '-'),  // em dash
    ('\u{2013}', '-'),  // en dash
];

/// Maximum run of consecutive line feeds kept (one blank line)
const MAX_NEWLINES: usize = 2;

fn substitute(c: char) -> char {
    SUBSTITUTIONS
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
        .unwrap_or(c)
}

/// Normalize raw message text
///
/// 1. `\r\n` and lone `\r` become `\n`
/// 2. Runs of three or more `\n` collapse to two
/// 3. Characters in [`SUBSTITUTIONS`] are replaced
///
/// Total and idempotent.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut newlines = 0usize;
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        let c = match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                '\n'
            }
            other => substitute(other),
        };

        if c == '\n' {
            newlines += 1;
            if newlines > MAX_NEWLINES {
                continue;
            }
        } else {
            newlines = 0;
        }
        out.push(c);
    }

    out
}
