//! Delimited-text tokenizer.
//!
//! Single pass over the input with an "inside quotes" flag. Quoting follows
//! the usual spreadsheet convention: `"` opens and closes a quoted run,
//! `""` inside a quoted run is a literal quote. The tokenizer never fails;
//! an unterminated quote simply runs to the end of the input.

pub const FIELD_DELIMITER: char = ',';
pub const QUOTE: char = '"';

/// One parsed line of delimited text.
pub type Row = Vec<String>;

/// Split `text` into rows of fields.
///
/// `\n` and `\r` both end a row, but only when something was read on it, so
/// blank lines and the `\n` of a `\r\n` pair never produce empty rows.
pub fn parse_rows(text: &str) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut row: Row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == QUOTE {
                if chars.peek() == Some(&QUOTE) {
                    field.push(QUOTE);
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
            continue;
        }

        match ch {
            QUOTE => in_quotes = true,
            FIELD_DELIMITER => row.push(std::mem::take(&mut field)),
            '\n' | '\r' => {
                if !field.is_empty() || !row.is_empty() {
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
            }
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}
