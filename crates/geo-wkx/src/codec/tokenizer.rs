//! WKT tokenization.
//!
//! The input is scanned once, eagerly, into a token vector. [`TokenStream`]
//! then walks that vector with a single cursor index and at most one token
//! of lookahead.

use crate::error::{Encountered, GeometryIoError};

/// Classification of a WKT token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of ASCII letters: kind keywords, `Z`/`M`/`ZM`, `EMPTY`.
    Word,
    /// Optionally signed decimal with optional fraction and exponent.
    Number,
    /// One of `(`, `)`, `,`.
    Punctuation,
    /// Any other single character, kept so it can be reported verbatim.
    Unrecognized,
}

/// A token borrowing its text from the source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset of the token in the source.
    pub position: usize,
}

/// Splits WKT into tokens. Whitespace separates tokens and is dropped.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let b = bytes[pos];
        let (kind, end) = if b.is_ascii_whitespace() {
            pos += 1;
            continue;
        } else if b.is_ascii_alphabetic() {
            (TokenKind::Word, scan_while(bytes, pos, |c| c.is_ascii_alphabetic()))
        } else if let Some(end) = scan_number(bytes, pos) {
            (TokenKind::Number, end)
        } else if matches!(b, b'(' | b')' | b',') {
            (TokenKind::Punctuation, pos + 1)
        } else {
            let width = input[pos..].chars().next().map_or(1, char::len_utf8);
            (TokenKind::Unrecognized, pos + width)
        };

        tokens.push(Token {
            kind,
            text: &input[pos..end],
            position: pos,
        });
        pos = end;
    }

    tokens
}

fn scan_while(bytes: &[u8], start: usize, pred: impl Fn(u8) -> bool) -> usize {
    let mut end = start;
    while end < bytes.len() && pred(bytes[end]) {
        end += 1;
    }
    end
}

fn scan_digits(bytes: &[u8], start: usize) -> Option<usize> {
    let end = scan_while(bytes, start, |c| c.is_ascii_digit());
    (end > start).then_some(end)
}

/// Returns the end of a number starting at `start`, if one does.
fn scan_number(bytes: &[u8], start: usize) -> Option<usize> {
    let mut end = start;
    if matches!(bytes.get(end), Some(b'+' | b'-')) {
        end += 1;
    }
    end = scan_digits(bytes, end)?;

    // Fraction and exponent are only taken when complete.
    if bytes.get(end) == Some(&b'.') {
        if let Some(frac_end) = scan_digits(bytes, end + 1) {
            end = frac_end;
        }
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        if let Some(exp_end) = scan_digits(bytes, exp) {
            end = exp_end;
        }
    }
    Some(end)
}

/// Cursor over the tokens of one WKT string.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    input_len: usize,
}

impl<'a> TokenStream<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            tokens: tokenize(input),
            pos: 0,
            input_len: input.len(),
        }
    }

    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self, expected: &'static str) -> Result<Token<'a>, GeometryIoError> {
        let token = *self.tokens.get(self.pos).ok_or(GeometryIoError::UnexpectedToken {
            expected,
            found: Encountered::EndOfStream,
        })?;
        self.pos += 1;
        Ok(token)
    }

    fn expect_punctuation(&mut self, punctuation: &'static str, expected: &'static str) -> Result<(), GeometryIoError> {
        let token = self.next(expected)?;
        if token.text != punctuation {
            return Err(GeometryIoError::unexpected_token(expected, token.text));
        }
        Ok(())
    }

    /// Consumes a `(`.
    pub fn expect_opener(&mut self) -> Result<(), GeometryIoError> {
        self.expect_punctuation("(", "'('")
    }

    /// Consumes a `)`.
    pub fn expect_closer(&mut self) -> Result<(), GeometryIoError> {
        self.expect_punctuation(")", "')'")
    }

    /// Consumes a word and returns its text.
    pub fn next_word(&mut self) -> Result<&'a str, GeometryIoError> {
        let token = self.next("word")?;
        if token.kind != TokenKind::Word {
            return Err(GeometryIoError::unexpected_token("word", token.text));
        }
        Ok(token.text)
    }

    /// Returns the next token's text if it is a word, without consuming it.
    pub fn peek_word(&self) -> Option<&'a str> {
        self.peek().filter(|t| t.kind == TokenKind::Word).map(|t| t.text)
    }

    /// Consumes the word returned by the last [`peek_word`](Self::peek_word).
    pub fn skip_word(&mut self) {
        if self.peek_word().is_some() {
            self.pos += 1;
        }
    }

    /// True if the next token is `(`, false if it is a word.
    pub fn peek_is_opener_or_word(&self) -> Result<bool, GeometryIoError> {
        match self.peek() {
            None => Err(GeometryIoError::UnexpectedToken {
                expected: "'(' or word",
                found: Encountered::EndOfStream,
            }),
            Some(token) if token.text == "(" => Ok(true),
            Some(token) if token.kind == TokenKind::Word => Ok(false),
            Some(token) => Err(GeometryIoError::unexpected_token("'(' or word", token.text)),
        }
    }

    /// True if the next token is `(`. Never consumes.
    pub fn peek_is_opener(&self) -> bool {
        self.peek().is_some_and(|t| t.text == "(")
    }

    /// Consumes a number.
    pub fn next_number(&mut self) -> Result<f64, GeometryIoError> {
        let token = self.next("number")?;
        if token.kind != TokenKind::Number {
            return Err(GeometryIoError::unexpected_token("number", token.text));
        }
        token
            .text
            .parse()
            .map_err(|_| GeometryIoError::unexpected_token("number", token.text))
    }

    /// Consumes a `)` or `,`. Returns true for `)`.
    pub fn next_closer_or_comma(&mut self) -> Result<bool, GeometryIoError> {
        let token = self.next("')' or ','")?;
        match token.text {
            ")" => Ok(true),
            "," => Ok(false),
            other => Err(GeometryIoError::unexpected_token("')' or ','", other)),
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Byte offset of the next token, or the input length at end of stream.
    pub fn position(&self) -> usize {
        self.peek().map_or(self.input_len, |t| t.position)
    }
}
