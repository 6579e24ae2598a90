//! Minimal PHP tokenizer.
//!
//! Only the constructs declaration discovery needs are recognised: names
//! (including namespace separators), variables, string literals, a handful of
//! punctuation tokens and the things that must be skipped wholesale
//! (comments, heredoc/nowdoc bodies, inline HTML between `?>` and `<?php`).
//! Everything else comes out as `Token::Other`. The lexer never backtracks;
//! every byte is visited at most a constant number of times.

/// A lexical token borrowed from the scanned source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// Identifier or qualified name, e.g. `class`, `Foo\Bar`, `\define`
    Name(&'a str),
    /// `$name`, without the dollar sign
    Variable(&'a str),
    /// Contents of a quoted string literal, escapes left as written
    Str(&'a str),
    /// Heredoc or nowdoc literal (contents are not needed)
    Heredoc,
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    /// `;`, also produced for a closing `?>` tag
    Semicolon,
    Comma,
    /// `::`
    DoubleColon,
    /// `->` or `?->`
    Arrow,
    Other(u8),
}

impl Token<'_> {
    /// Case-insensitive keyword check (PHP keywords ignore case)
    pub(crate) fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Name(name) if name.eq_ignore_ascii_case(keyword))
    }
}

pub(crate) struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    in_html: bool,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        // Real files open with `<?php` or leading markup; bare fragments are
        // treated as code from the first byte.
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            in_html: src.trim_start().starts_with('<'),
        }
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn starts_with(&self, needle: &str) -> bool {
        self.bytes[self.pos..].starts_with(needle.as_bytes())
    }

    fn find_from(&self, from: usize, needle: &str) -> Option<usize> {
        self.src[from..].find(needle).map(|idx| from + idx)
    }

    /// Skip inline HTML up to and including the next open tag
    fn skip_html(&mut self) {
        match self.find_from(self.pos, "<?") {
            Some(open) => {
                self.pos = open + 2;
                if self.bytes[self.pos..]
                    .get(..3)
                    .is_some_and(|tag| tag.eq_ignore_ascii_case(b"php"))
                {
                    self.pos += 3;
                } else if self.peek(0) == Some(b'=') {
                    self.pos += 1;
                }
                self.in_html = false;
            }
            None => self.pos = self.bytes.len(),
        }
    }

    /// Skip a `//` or `#` comment; it ends at a newline or a closing tag
    fn skip_line_comment(&mut self) {
        while let Some(b) = self.peek(0) {
            if b == b'\n' || (b == b'?' && self.peek(1) == Some(b'>')) {
                return;
            }
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) {
        self.pos = self
            .find_from(self.pos + 2, "*/")
            .map_or(self.bytes.len(), |end| end + 2);
    }

    /// Read a quoted literal starting at the opening quote
    fn read_quoted(&mut self, quote: u8) -> &'a str {
        let start = self.pos + 1;
        let mut i = start;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => i += 2,
                b if b == quote => {
                    self.pos = i + 1;
                    return &self.src[start..i];
                }
                _ => i += 1,
            }
        }
        // Unterminated literal runs to the end of the file.
        self.pos = self.bytes.len();
        &self.src[start.min(self.bytes.len())..]
    }

    /// Skip a heredoc/nowdoc starting at `<<<`; returns false if the opener is malformed
    fn skip_heredoc(&mut self) -> bool {
        let mut i = self.pos + 3;
        while matches!(self.bytes.get(i), Some(b' ' | b'\t')) {
            i += 1;
        }
        let quote = match self.bytes.get(i) {
            Some(&q @ (b'\'' | b'"')) => {
                i += 1;
                Some(q)
            }
            _ => None,
        };
        let label_start = i;
        while self.bytes.get(i).is_some_and(|&b| is_ident_byte(b)) {
            i += 1;
        }
        if i == label_start {
            return false;
        }
        let label = &self.src[label_start..i];
        if let Some(q) = quote {
            if self.bytes.get(i) != Some(&q) {
                return false;
            }
            i += 1;
        }
        if self.bytes.get(i) == Some(&b'\r') {
            i += 1;
        }
        if self.bytes.get(i) != Some(&b'\n') {
            return false;
        }

        // The closing label starts a line (optionally indented) and is not
        // followed by another identifier byte.
        let mut line_start = i + 1;
        while line_start < self.bytes.len() {
            let mut j = line_start;
            while matches!(self.bytes.get(j), Some(b' ' | b'\t')) {
                j += 1;
            }
            let end = j + label.len();
            if self.src.get(j..end) == Some(label)
                && !self.bytes.get(end).is_some_and(|&b| is_ident_byte(b))
            {
                self.pos = end;
                return true;
            }
            match self.find_from(line_start, "\n") {
                Some(newline) => line_start = newline + 1,
                None => break,
            }
        }
        self.pos = self.bytes.len();
        true
    }

    fn read_name(&mut self) -> &'a str {
        let start = self.pos;
        while self
            .peek(0)
            .is_some_and(|b| is_ident_byte(b) || b == b'\\')
        {
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        loop {
            if self.in_html {
                self.skip_html();
            }
            let b = self.peek(0)?;

            match b {
                b' ' | b'\t' | b'\r' | b'\n' | b'\x0c' => self.pos += 1,
                b'?' if self.peek(1) == Some(b'>') => {
                    self.pos += 2;
                    self.in_html = true;
                    return Some(Token::Semicolon);
                }
                b'?' if self.starts_with("?->") => {
                    self.pos += 3;
                    return Some(Token::Arrow);
                }
                b'<' if self.starts_with("<?php") || self.starts_with("<?PHP") => self.pos += 5,
                b'<' if self.starts_with("<?=") => self.pos += 3,
                b'<' if self.starts_with("<<<") => {
                    if self.skip_heredoc() {
                        return Some(Token::Heredoc);
                    }
                    self.pos += 3;
                    return Some(Token::Other(b'<'));
                }
                b'#' if self.peek(1) == Some(b'[') => {
                    // Attribute opener, its contents are ordinary tokens.
                    self.pos += 1;
                    return Some(Token::Other(b'#'));
                }
                b'#' => self.skip_line_comment(),
                b'/' if self.peek(1) == Some(b'/') => self.skip_line_comment(),
                b'/' if self.peek(1) == Some(b'*') => self.skip_block_comment(),
                b'\'' | b'"' | b'`' => return Some(Token::Str(self.read_quoted(b))),
                b'$' if self.peek(1).is_some_and(is_ident_start) => {
                    self.pos += 1;
                    return Some(Token::Variable(self.read_name_without_separator()));
                }
                b':' if self.peek(1) == Some(b':') => {
                    self.pos += 2;
                    return Some(Token::DoubleColon);
                }
                b'-' if self.peek(1) == Some(b'>') => {
                    self.pos += 2;
                    return Some(Token::Arrow);
                }
                b'{' => return Some(self.single(Token::OpenBrace)),
                b'}' => return Some(self.single(Token::CloseBrace)),
                b'(' => return Some(self.single(Token::OpenParen)),
                b')' => return Some(self.single(Token::CloseParen)),
                b';' => return Some(self.single(Token::Semicolon)),
                b',' => return Some(self.single(Token::Comma)),
                b if is_ident_byte(b) || b == b'\\' => return Some(Token::Name(self.read_name())),
                other => return Some(self.single(Token::Other(other))),
            }
        }
    }
}

impl<'a> Lexer<'a> {
    fn single(&mut self, token: Token<'a>) -> Token<'a> {
        self.pos += 1;
        token
    }

    fn read_name_without_separator(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek(0).is_some_and(is_ident_byte) {
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }
}

/// Identifier byte: ASCII letters, digits, `_`, or any byte of a multi-byte
/// UTF-8 sequence (PHP accepts `\x80-\xff` in names).
pub(crate) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

/// Check that `name` is a plain identifier usable as a class name
pub(crate) fn is_identifier(name: &str) -> bool {
    name.bytes().next().is_some_and(is_ident_start) && name.bytes().all(is_ident_byte)
}
