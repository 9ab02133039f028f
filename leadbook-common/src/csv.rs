//! CSV reading and writing
//!
//! Dialect: `,` separator, `"` quoting with `""` as an escaped quote,
//! `\n` / `\r\n` / `\r` record terminators. Unquoted fields are trimmed;
//! quoted content is kept verbatim. Blank lines are skipped.

use std::borrow::Cow;
use std::mem::take;

use crate::error::CsvError;

const SEP: char = ',';
const QUOTE: char = '"';
const BOM: char = '\u{feff}';

/// One parsed record and the line it starts on (1-based)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub line: usize,
    pub fields: Vec<String>,
}

/* ---------------- Decoding ---------------- */

/// Bytes to text: invalid UTF-8 is replaced, a leading BOM is dropped.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(s) => Cow::Borrowed(s.strip_prefix(BOM).unwrap_or(s)),
        Cow::Owned(s) => match s.strip_prefix(BOM) {
            Some(rest) => Cow::Owned(rest.to_string()),
            None => Cow::Owned(s),
        },
    }
}

/// First line (split on `\n`) with any non-whitespace content
pub fn first_non_blank_line(text: &str) -> Option<&str> {
    text.split('\n').find(|line| !line.trim().is_empty())
}

/* ---------------- Parsing ---------------- */

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing but whitespace seen for the current field
    FieldStart,
    Unquoted,
    Quoted,
    /// Closing quote seen; only whitespace may follow before a separator
    AfterQuote,
}

struct Parser {
    rows: Vec<Row>,
    row: Vec<String>,
    field: String,
    row_quoted: bool,
    line: usize,
    row_line: usize,
}

impl Parser {
    fn new() -> Self {
        Self {
            rows: Vec::new(),
            row: Vec::new(),
            field: String::new(),
            row_quoted: false,
            line: 1,
            row_line: 1,
        }
    }

    fn end_field(&mut self, quoted: bool) {
        let value = if quoted {
            take(&mut self.field)
        } else {
            let trimmed = self.field.trim().to_string();
            self.field.clear();
            trimmed
        };
        self.row.push(value);
    }

    fn end_record(&mut self, quoted: bool) {
        self.end_field(quoted);
        let blank = !self.row_quoted && self.row.len() == 1 && self.row[0].is_empty();
        if blank {
            self.row.clear();
        } else {
            self.rows.push(Row {
                line: self.row_line,
                fields: take(&mut self.row),
            });
        }
        self.row_quoted = false;
    }

    fn next_line(&mut self) {
        self.line += 1;
        self.row_line = self.line;
    }
}

/// Parse CSV text into rows, rejecting malformed quoting.
pub fn parse_rows(text: &str) -> Result<Vec<Row>, CsvError> {
    let mut p = Parser::new();
    let mut state = State::FieldStart;
    let mut quote_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match state {
            State::FieldStart | State::Unquoted | State::AfterQuote
                if ch == '\n' || ch == '\r' =>
            {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                p.end_record(state == State::AfterQuote);
                p.next_line();
                state = State::FieldStart;
            }
            State::FieldStart | State::Unquoted | State::AfterQuote if ch == SEP => {
                p.end_field(state == State::AfterQuote);
                state = State::FieldStart;
            }
            State::FieldStart => {
                if ch == QUOTE {
                    // leading whitespace before an opening quote is dropped
                    p.field.clear();
                    p.row_quoted = true;
                    quote_line = p.line;
                    state = State::Quoted;
                } else {
                    p.field.push(ch);
                    if !ch.is_whitespace() {
                        state = State::Unquoted;
                    }
                }
            }
            State::Unquoted => {
                if ch == QUOTE {
                    return Err(CsvError::InvalidOpeningQuote { line: p.line });
                }
                p.field.push(ch);
            }
            State::Quoted => match ch {
                QUOTE => {
                    if matches!(chars.peek(), Some(&QUOTE)) {
                        chars.next();
                        p.field.push(QUOTE);
                    } else {
                        state = State::AfterQuote;
                    }
                }
                '\n' => {
                    p.line += 1;
                    p.field.push(ch);
                }
                '\r' => {
                    if !matches!(chars.peek(), Some('\n')) {
                        p.line += 1;
                    }
                    p.field.push(ch);
                }
                _ => p.field.push(ch),
            },
            State::AfterQuote => {
                if !ch.is_whitespace() {
                    return Err(CsvError::InvalidClosingQuote { line: p.line });
                }
            }
        }
    }

    match state {
        State::Quoted => return Err(CsvError::UnterminatedQuote { line: quote_line }),
        State::AfterQuote => p.end_record(true),
        State::FieldStart if p.row.is_empty() && p.field.trim().is_empty() => {}
        _ => p.end_record(false),
    }

    Ok(p.rows)
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str) -> bool {
    field.contains([SEP, QUOTE, '\n', '\r'])
}

/// Append one `\n`-terminated record to `out`.
pub fn write_row<I, S>(out: &mut String, fields: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(SEP);
        }
        let field = field.as_ref();
        if needs_quotes(field) {
            out.push(QUOTE);
            for c in field.chars() {
                if c == QUOTE {
                    out.push(QUOTE);
                }
                out.push(c);
            }
            out.push(QUOTE);
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}
