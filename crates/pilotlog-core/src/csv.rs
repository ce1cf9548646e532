//! CSV scanner — turns decoded text into rows of string cells.
//!
//! A single left-to-right pass tracking only whether the cursor is inside a
//! quoted field. The scanner never fails: unbalanced quotes and ragged rows
//! are passed through as-is and dealt with by the normalizer.
//!
//! | Input (outside quotes) | Effect |
//! |------------------------|--------|
//! | `,` | end the current cell |
//! | `\r\n`, `\n`, `\r` | end the current row |
//! | `"` | toggle quoting, emit nothing |
//!
//! Inside quotes, `""` emits one literal `"` and the field stays quoted.

use std::iter::Peekable;
use std::str::Chars;

/// Lazy row iterator over CSV text. Single pass; not restartable.
pub struct CsvRows<'a> {
    chars: Peekable<Chars<'a>>,
    /// Empty input still yields one row holding one empty cell.
    yielded: bool,
}

impl<'a> CsvRows<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            yielded: false,
        }
    }
}

impl Iterator for CsvRows<'_> {
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Vec<String>> {
        if self.chars.peek().is_none() {
            if self.yielded {
                return None;
            }
            self.yielded = true;
            return Some(vec![String::new()]);
        }
        self.yielded = true;

        let mut row = Vec::new();
        let mut cell = String::new();
        let mut quoted = false;

        while let Some(c) = self.chars.next() {
            match c {
                '"' if quoted && self.chars.peek() == Some(&'"') => {
                    self.chars.next();
                    cell.push('"');
                }
                '"' => quoted = !quoted,
                ',' if !quoted => row.push(std::mem::take(&mut cell)),
                '\r' if !quoted => {
                    if self.chars.peek() == Some(&'\n') {
                        self.chars.next();
                    }
                    row.push(cell);
                    return Some(row);
                }
                '\n' if !quoted => {
                    row.push(cell);
                    return Some(row);
                }
                other => cell.push(other),
            }
        }

        row.push(cell);
        Some(row)
    }
}

/// Parse the whole input into a materialised grid.
pub fn parse(text: &str) -> Vec<Vec<String>> {
    CsvRows::new(text).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
