/**
Decoder for the bracketed reference lists, e.g. `['<A> is capital of <B>', "<A> located in <B>"]`.
Only a list of quoted strings is accepted: anything else is rejected with the byte offset of the
offending character. The strings follow the Python literal rules that matter for the datasets:
backslash escapes are decoded and adjacent strings are joined, so `['a' 'b']` is `["ab"]`.
*/
use std::error::Error;
use std::fmt::Display;
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralErrorKind {
    /// The text does not start with `[`.
    MissingOpeningBracket,
    /// The text ended before the closing `]` or before the end of a string.
    UnexpectedEnd,
    /// A character that is neither a quote, a comma, a bracket nor whitespace.
    UnexpectedChar(char),
    /// A `\x`, `\u`, `\U` or octal escape that does not encode a character.
    InvalidEscape,
    /// Non-whitespace content after the closing `]`.
    TrailingContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralError {
    pub kind: LiteralErrorKind,
    pub offset: usize,
}

impl Display for LiteralError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            LiteralErrorKind::MissingOpeningBracket => {
                write!(f, "List literal must start with `[` (offset {})", self.offset)
            }
            LiteralErrorKind::UnexpectedEnd => {
                write!(f, "List literal ended unexpectedly at offset {}", self.offset)
            }
            LiteralErrorKind::UnexpectedChar(c) => write!(
                f,
                "Unexpected character {:?} at offset {} in list literal",
                c, self.offset
            ),
            LiteralErrorKind::InvalidEscape => {
                write!(f, "Invalid escape sequence at offset {}", self.offset)
            }
            LiteralErrorKind::TrailingContent => write!(
                f,
                "Unexpected content after the end of the list literal at offset {}",
                self.offset
            ),
        }
    }
}

impl Error for LiteralError {}

/// Returns true if the text looks like a list of strings: it is enclosed by brackets and the
/// first non-blank character after `[` opens a string or closes the list. Templates such as
/// `[X] is the capital of [Y]` are therefore not mistaken for lists.
pub fn looks_like_string_list(text: &str) -> bool {
    if !(text.starts_with('[') && text.ends_with(']')) {
        return false;
    }
    matches!(
        text[1..].trim_start().chars().next(),
        Some('\'') | Some('"') | Some(']')
    )
}

/// Parses a list of quoted strings. Supports single and double quotes, an optional trailing
/// comma, adjacent strings (joined into one element) and the escapes `\\`, `\'`, `\"`, `\a`,
/// `\b`, `\f`, `\n`, `\r`, `\t`, `\v`, `\ooo`, `\xhh`, `\uxxxx` and `\Uxxxxxxxx`. Unknown escapes,
/// `\N{..}` included, are kept as is.
pub fn parse_string_list(text: &str) -> Result<Vec<String>, LiteralError> {
    let mut parser = ListParser {
        chars: text.char_indices().peekable(),
        len: text.len(),
    };
    parser.parse()
}

struct ListParser<'a> {
    chars: Peekable<CharIndices<'a>>,
    len: usize,
}

impl ListParser<'_> {
    fn error(&self, kind: LiteralErrorKind, offset: usize) -> LiteralError {
        LiteralError { kind, offset }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn parse(&mut self) -> Result<Vec<String>, LiteralError> {
        self.skip_whitespace();
        match self.chars.next() {
            Some((_, '[')) => {}
            Some((offset, _)) => {
                return Err(self.error(LiteralErrorKind::MissingOpeningBracket, offset))
            }
            None => return Err(self.error(LiteralErrorKind::MissingOpeningBracket, 0)),
        }
        let mut items: Vec<String> = Vec::new();
        // true right after `[` or after a `,`, where a new element (or the end) is allowed.
        let mut expecting_item = true;
        loop {
            self.skip_whitespace();
            match self.chars.next() {
                Some((_, ']')) => break,
                Some((_, quote @ ('\'' | '"'))) => {
                    let content = self.parse_string(quote)?;
                    match items.last_mut() {
                        Some(last) if !expecting_item => last.push_str(&content),
                        _ => items.push(content),
                    }
                    expecting_item = false;
                }
                Some((offset, ',')) => {
                    if expecting_item {
                        return Err(self.error(LiteralErrorKind::UnexpectedChar(','), offset));
                    }
                    expecting_item = true;
                }
                Some((offset, c)) => {
                    return Err(self.error(LiteralErrorKind::UnexpectedChar(c), offset))
                }
                None => return Err(self.error(LiteralErrorKind::UnexpectedEnd, self.len)),
            }
        }
        self.skip_whitespace();
        if let Some((offset, _)) = self.chars.next() {
            return Err(self.error(LiteralErrorKind::TrailingContent, offset));
        }
        Ok(items)
    }

    fn parse_string(&mut self, quote: char) -> Result<String, LiteralError> {
        let mut content = String::new();
        loop {
            match self.chars.next() {
                Some((_, c)) if c == quote => return Ok(content),
                Some((offset, '\\')) => self.parse_escape(offset, &mut content)?,
                Some((_, c)) => content.push(c),
                None => return Err(self.error(LiteralErrorKind::UnexpectedEnd, self.len)),
            }
        }
    }

    /// Decodes the escape starting with the backslash at `offset`.
    fn parse_escape(&mut self, offset: usize, content: &mut String) -> Result<(), LiteralError> {
        let decoded = match self.chars.next() {
            Some((_, 'a')) => '\u{07}',
            Some((_, 'b')) => '\u{08}',
            Some((_, 'f')) => '\u{0C}',
            Some((_, 'n')) => '\n',
            Some((_, 'r')) => '\r',
            Some((_, 't')) => '\t',
            Some((_, 'v')) => '\u{0B}',
            Some((_, c @ ('\\' | '\'' | '"'))) => c,
            Some((_, 'x')) => self.parse_hex(offset, 2)?,
            Some((_, 'u')) => self.parse_hex(offset, 4)?,
            Some((_, 'U')) => self.parse_hex(offset, 8)?,
            Some((_, c @ '0'..='7')) => {
                let mut code = c.to_digit(8).unwrap_or_default();
                for _ in 0..2 {
                    match self.chars.next_if(|(_, c)| c.is_digit(8)) {
                        Some((_, c)) => code = code * 8 + c.to_digit(8).unwrap_or_default(),
                        None => break,
                    }
                }
                char::from_u32(code).ok_or(self.error(LiteralErrorKind::InvalidEscape, offset))?
            }
            Some((_, c)) => {
                content.push('\\');
                c
            }
            None => return Err(self.error(LiteralErrorKind::UnexpectedEnd, self.len)),
        };
        content.push(decoded);
        Ok(())
    }

    /// Reads exactly `digits` hexadecimal digits and returns the character they encode.
    fn parse_hex(&mut self, offset: usize, digits: usize) -> Result<char, LiteralError> {
        let mut code: u32 = 0;
        for _ in 0..digits {
            match self.chars.next_if(|(_, c)| c.is_ascii_hexdigit()) {
                Some((_, c)) => code = code * 16 + c.to_digit(16).unwrap_or_default(),
                None => return Err(self.error(LiteralErrorKind::InvalidEscape, offset)),
            }
        }
        char::from_u32(code).ok_or(self.error(LiteralErrorKind::InvalidEscape, offset))
    }
}
