// JSON syntax tier: a byte-position-aware validity check run before
// schema decoding, so a rule author editing raw JSON gets a precise
// line/column instead of a field-level complaint about a document
// that is not even well-formed.
//
// The scanner accepts exactly the JSON grammar over the input's UTF-8
// bytes and reports the byte offset of the first violation. Offset to
// line/column conversion is a separate pure function so the diagnostic
// does not depend on any JSON library's error shape.

use std::fmt;

/// First syntax violation found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxViolation {
    /// Byte offset of the offending character (or end of input).
    pub offset: usize,
    pub message: String,
}

impl fmt::Display for SyntaxViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.message, self.offset)
    }
}

/// Check that `text` is a single well-formed JSON value with nothing
/// trailing.
pub fn check(text: &str) -> Result<(), SyntaxViolation> {
    let mut scanner = Scanner {
        bytes: text.as_bytes(),
        pos: 0,
    };
    scanner.skip_whitespace();
    scanner.value()?;
    scanner.skip_whitespace();
    if scanner.pos < scanner.bytes.len() {
        return Err(scanner.violation("unexpected trailing characters"));
    }
    Ok(())
}

/// Convert a byte offset into a 1-based (line, column) pair by
/// scanning the bytes up to the offset and counting `\n` line breaks.
pub fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(text.len());
    let mut line = 1;
    let mut line_start = 0;
    for (i, b) in text.as_bytes()[..offset].iter().enumerate() {
        if *b == b'\n' {
            line += 1;
            line_start = i + 1;
        }
    }
    (line, offset - line_start + 1)
}

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn violation(&self, message: impl Into<String>) -> SyntaxViolation {
        SyntaxViolation {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn value(&mut self) -> Result<(), SyntaxViolation> {
        match self.peek() {
            Some(b'{') => self.object(),
            Some(b'[') => self.array(),
            Some(b'"') => self.string(),
            Some(b'-') | Some(b'0'..=b'9') => self.number(),
            Some(b't') => self.literal(b"true"),
            Some(b'f') => self.literal(b"false"),
            Some(b'n') => self.literal(b"null"),
            Some(b) => Err(self.violation(format!(
                "expected a value, found '{}'",
                char::from(b)
            ))),
            None => Err(self.violation("unexpected end of input")),
        }
    }

    fn object(&mut self) -> Result<(), SyntaxViolation> {
        self.bump(); // '{'
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.bump();
            return Ok(());
        }
        loop {
            if self.peek() != Some(b'"') {
                return Err(self.violation("expected a string object key"));
            }
            self.string()?;
            self.skip_whitespace();
            if self.peek() != Some(b':') {
                return Err(self.violation("expected ':' after object key"));
            }
            self.bump();
            self.skip_whitespace();
            self.value()?;
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.bump();
                    self.skip_whitespace();
                }
                Some(b'}') => {
                    self.bump();
                    return Ok(());
                }
                _ => return Err(self.violation("expected ',' or '}' in object")),
            }
        }
    }

    fn array(&mut self) -> Result<(), SyntaxViolation> {
        self.bump(); // '['
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.bump();
            return Ok(());
        }
        loop {
            self.value()?;
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.bump();
                    self.skip_whitespace();
                }
                Some(b']') => {
                    self.bump();
                    return Ok(());
                }
                _ => return Err(self.violation("expected ',' or ']' in array")),
            }
        }
    }

    fn string(&mut self) -> Result<(), SyntaxViolation> {
        self.bump(); // '"'
        loop {
            match self.bump() {
                None => {
                    return Err(SyntaxViolation {
                        offset: self.pos,
                        message: "unterminated string".to_string(),
                    })
                }
                Some(b'"') => return Ok(()),
                Some(b'\\') => match self.bump() {
                    Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => {}
                    Some(b'u') => {
                        for _ in 0..4 {
                            match self.bump() {
                                Some(b) if b.is_ascii_hexdigit() => {}
                                _ => {
                                    return Err(SyntaxViolation {
                                        offset: self.pos.saturating_sub(1),
                                        message: "invalid \\u escape (expected 4 hex digits)"
                                            .to_string(),
                                    })
                                }
                            }
                        }
                    }
                    _ => {
                        return Err(SyntaxViolation {
                            offset: self.pos.saturating_sub(1),
                            message: "invalid escape sequence in string".to_string(),
                        })
                    }
                },
                Some(b) if b < 0x20 => {
                    return Err(SyntaxViolation {
                        offset: self.pos - 1,
                        message: "unescaped control character in string".to_string(),
                    })
                }
                Some(_) => {}
            }
        }
    }

    fn number(&mut self) -> Result<(), SyntaxViolation> {
        if self.peek() == Some(b'-') {
            self.bump();
        }
        // Integer part: a lone zero or a nonzero-led digit run.
        match self.peek() {
            Some(b'0') => {
                self.bump();
            }
            Some(b'1'..=b'9') => {
                while matches!(self.peek(), Some(b'0'..=b'9')) {
                    self.bump();
                }
            }
            _ => return Err(self.violation("invalid number")),
        }
        if self.peek() == Some(b'.') {
            self.bump();
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.violation("expected digits after decimal point"));
            }
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.bump();
            }
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.bump();
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.bump();
            }
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.violation("expected digits in exponent"));
            }
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.bump();
            }
        }
        Ok(())
    }

    fn literal(&mut self, expected: &[u8]) -> Result<(), SyntaxViolation> {
        if self.bytes[self.pos..].starts_with(expected) {
            self.pos += expected.len();
            Ok(())
        } else {
            Err(self.violation(format!(
                "expected '{}'",
                String::from_utf8_lossy(expected)
            )))
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
