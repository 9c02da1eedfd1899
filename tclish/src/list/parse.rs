//! List text → elements.
//!
//! Grammar (Tcl list rules):
//!
//! | Form | Content |
//! |------|---------|
//! | `{...}` | verbatim, braces nest, `\` hides the next character from nesting |
//! | `"..."` | backslash-substituted up to the closing quote |
//! | bare word | backslash-substituted up to the next whitespace |
//!
//! A closing brace or quote must be followed by whitespace or end of input.
//! Separators are any run of space, `\t`, `\n`, `\r`, `\v`, `\f`.

use crate::error::ParseError;

/// Returns `true` for the characters that separate list elements.
#[inline]
pub fn is_list_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

/// Iterator over the elements of a list string.
///
/// Yields `Err` at most once; iteration stops after the first error.
#[derive(Debug, Clone)]
pub struct Splitter<'a> {
    src: &'a str,
    pos: usize,
    failed: bool,
}

impl<'a> Splitter<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0, failed: false }
    }

    /// Byte offset of the next unread character.
    pub fn offset(&self) -> usize {
        self.pos
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn skip_space(&mut self) {
        while let Some(c) = self.peek() {
            if !is_list_space(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn braced(&mut self) -> Result<String, ParseError> {
        let open = self.pos;
        let bytes = self.src.as_bytes();
        let mut depth = 0usize;
        let mut i = open;
        while i < bytes.len() {
            match bytes[i] {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        let content = self.src[open + 1..i].to_owned();
                        self.pos = i + 1;
                        self.expect_space_after(|offset, found| ParseError::JunkAfterBrace {
                            offset,
                            found,
                        })?;
                        return Ok(content);
                    }
                }
                // The escaped character can be multi-byte; only ASCII braces
                // matter for nesting, so skipping one byte is enough to hide
                // an escaped brace.
                b'\\' => i += 1,
                _ => {}
            }
            i += 1;
        }
        Err(ParseError::UnmatchedBrace { offset: open })
    }

    fn quoted(&mut self) -> Result<String, ParseError> {
        let open = self.pos;
        self.pos += 1;
        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err(ParseError::UnmatchedQuote { offset: open }),
                Some('"') => {
                    self.pos += 1;
                    self.expect_space_after(|offset, found| ParseError::JunkAfterQuote {
                        offset,
                        found,
                    })?;
                    return Ok(out);
                }
                Some('\\') => self.escape(&mut out)?,
                Some(c) => {
                    out.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
    }

    fn bare(&mut self) -> Result<String, ParseError> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if is_list_space(c) {
                break;
            }
            if c == '\\' {
                self.escape(&mut out)?;
            } else {
                out.push(c);
                self.pos += c.len_utf8();
            }
        }
        Ok(out)
    }

    fn escape(&mut self, out: &mut String) -> Result<(), ParseError> {
        let at = self.pos;
        match backslash(&self.src[at..]) {
            Some((subst, used)) => {
                out.push_str(&subst);
                self.pos += used;
                Ok(())
            }
            None => Err(ParseError::TrailingBackslash { offset: at }),
        }
    }

    fn expect_space_after(
        &mut self,
        junk: impl FnOnce(usize, String) -> ParseError,
    ) -> Result<(), ParseError> {
        match self.peek() {
            None => Ok(()),
            Some(c) if is_list_space(c) => Ok(()),
            Some(_) => {
                let rest = &self.src[self.pos..];
                let end = rest.find(is_list_space).unwrap_or(rest.len());
                Err(junk(self.pos, rest[..end].to_owned()))
            }
        }
    }
}

impl Iterator for Splitter<'_> {
    type Item = Result<String, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.skip_space();
        let item = match self.peek()? {
            '{' => self.braced(),
            '"' => self.quoted(),
            _ => self.bare(),
        };
        if item.is_err() {
            self.failed = true;
        }
        Some(item)
    }
}

/// Split `text` into element strings.
///
/// An empty (or all-whitespace) string yields an empty vector.
pub fn split(text: &str) -> Result<Vec<String>, ParseError> {
    Splitter::new(text).collect()
}

/// Decode one backslash sequence at the start of `s` (which begins with `\`).
///
/// Returns the substituted text and the number of bytes consumed, or `None`
/// if the backslash is the last character.
pub fn backslash(s: &str) -> Option<(String, usize)> {
    let mut chars = s.char_indices().skip(1);
    let (_, c) = chars.next()?;
    let simple = |ch: char| Some((ch.to_string(), 1 + c.len_utf8()));
    match c {
        'a' => simple('\x07'),
        'b' => simple('\x08'),
        'f' => simple('\x0c'),
        'n' => simple('\n'),
        'r' => simple('\r'),
        't' => simple('\t'),
        'v' => simple('\x0b'),
        '\n' => {
            let tail = &s[2..];
            let ws = tail
                .bytes()
                .take_while(|b| *b == b' ' || *b == b'\t')
                .count();
            Some((" ".to_owned(), 2 + ws))
        }
        'x' => Some(hex_escape(s, 'x', 2)),
        'u' => Some(hex_escape(s, 'u', 4)),
        'U' => Some(hex_escape(s, 'U', 8)),
        '0'..='7' => {
            let digits = s[1..].as_bytes();
            let mut value = u32::from(digits[0] - b'0');
            let mut used = 1;
            while used < 3 {
                match digits.get(used) {
                    // A third digit is only taken while the result stays a byte.
                    Some(d @ b'0'..=b'7') if used < 2 || value < 0o40 => {
                        value = value * 8 + u32::from(d - b'0');
                        used += 1;
                    }
                    _ => break,
                }
            }
            let ch = char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER);
            Some((ch.to_string(), 1 + used))
        }
        other => Some((other.to_string(), 1 + other.len_utf8())),
    }
}

fn hex_escape(s: &str, letter: char, max: usize) -> (String, usize) {
    let digits: Vec<u32> = s[2..]
        .chars()
        .take(max)
        .map_while(|c| c.to_digit(16))
        .collect();
    if digits.is_empty() {
        return (letter.to_string(), 2);
    }
    let value = digits.iter().fold(0u32, |acc, d| acc.wrapping_mul(16).wrapping_add(*d));
    let ch = char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER);
    (ch.to_string(), 2 + digits.len())
}
