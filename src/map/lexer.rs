//! # Map tokenizer
//!
//! Splits a byte stream into whitespace delimited tokens.  Double quotes
//! group whitespace into one token (the quotes themselves are stripped),
//! `//` starts a comment that runs to the end of the line, and a comment
//! terminates any token open in front of it.  Braces and parentheses are
//! not delimiters, they only become tokens when set off by whitespace,
//! which is why the writer always spaces them out.
//!
//! The lexer remembers the line and column where the current token began
//! so that every diagnostic can point at the offending token.

use std::io::Read;
use std::fs::File;
use log::debug;
use super::Error;

const BUF_SIZE: usize = 1024;

fn is_space(c: u8) -> bool {
    matches!(c,b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

enum Scan {
    /// a complete token is in the accumulator
    Token,
    /// the buffered bytes ran out, refill and continue
    Refill,
    /// no data left and no pending token
    Eof
}

pub struct Lexer<R: Read> {
    path: String,
    reader: R,
    eof: bool,
    buf: [u8;BUF_SIZE],
    pos: usize,
    end: usize,
    /// reusable token accumulator, bytes so that arbitrary input
    /// passes through untouched
    token: Vec<u8>,
    line: usize,
    column: usize,
    tok_line: usize,
    tok_column: usize,
    last: Option<u8>,
    in_token: bool,
    in_quote: bool,
    in_comment: bool
}

impl Lexer<File> {
    pub fn open(path: &str) -> Result<Self,Error> {
        match File::open(path) {
            Ok(fp) => Ok(Self::from_reader(fp,path)),
            Err(e) => Err(Error::File { path: path.to_string(), source: e })
        }
    }
}

impl<R: Read> Lexer<R> {
    /// Tokenize any byte source.  `path` only labels diagnostics.
    pub fn from_reader(reader: R,path: &str) -> Self {
        Self {
            path: path.to_string(),
            reader,
            eof: false,
            buf: [0;BUF_SIZE],
            pos: 0,
            end: 0,
            token: Vec::new(),
            line: 1,
            column: 1,
            tok_line: 1,
            tok_column: 1,
            last: None,
            in_token: false,
            in_quote: false,
            in_comment: false
        }
    }
    pub fn path(&self) -> &str {
        &self.path
    }
    /// 1-based line and column where the most recent token began
    pub fn token_position(&self) -> (usize,usize) {
        (self.tok_line,self.tok_column)
    }
    /// Build a syntax error blaming the most recent token, or the end of
    /// the stream if `found` is None.
    pub fn err_expected(&self, expected: &str, found: Option<&str>) -> Error {
        let (line,column) = match found {
            Some(_) => (self.tok_line,self.tok_column),
            None => (self.line,self.column)
        };
        Error::Syntax {
            path: self.path.clone(),
            line,
            column,
            expected: expected.to_string(),
            found: match found {
                Some(tok) => format!("\"{}\"",tok),
                None => "EOF".to_string()
            }
        }
    }
    fn fill_buffer(&mut self) -> Result<(),Error> {
        let read = match self.reader.read(&mut self.buf) {
            Ok(n) => n,
            Err(e) => return Err(Error::File { path: self.path.clone(), source: e })
        };
        debug!("read {} bytes",read);
        if read==0 {
            self.eof = true;
        }
        self.pos = 0;
        self.end = read;
        Ok(())
    }
    /// Run the scanner over the buffered bytes, one character at a time.
    /// The rules are ordered: comments swallow everything up to the next
    /// newline, then whitespace outside a quote flushes the open token,
    /// then `//` cancels the slash already accumulated and enters comment
    /// mode (this fires even inside a quote), then an unescaped quote
    /// toggles quote mode, then anything else opens a token.
    fn scan_buffer(&mut self) -> Scan {
        while self.pos < self.end {
            let c = self.buf[self.pos];
            let mut flush = false;

            if self.in_comment {
                if c==b'\n' {
                    self.in_comment = false;
                }
            } else if is_space(c) && !self.in_quote {
                if self.in_token {
                    self.in_token = false;
                    flush = true;
                }
            } else if c==b'/' && self.last==Some(b'/') {
                self.in_comment = true;
                self.in_token = false;
                self.token.pop(); // remove the first slash
                if !self.token.is_empty() {
                    flush = true;
                }
            } else if c==b'"' && self.last!=Some(b'\\') {
                self.in_quote = !self.in_quote;
                if self.in_quote {
                    if !self.in_token {
                        self.tok_line = self.line;
                        self.tok_column = self.column;
                    }
                } else {
                    self.in_token = false;
                    flush = true;
                }
            } else if !self.in_token {
                self.in_token = true;
                if !self.in_quote {
                    self.tok_line = self.line;
                    self.tok_column = self.column;
                }
            }

            if self.in_token {
                self.token.push(c);
            }

            self.last = Some(c);
            self.pos += 1;
            if c==b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }

            if flush {
                return Scan::Token;
            }
        }

        if self.eof {
            // a pending token is still returned once
            return match self.token.is_empty() {
                false => Scan::Token,
                true => Scan::Eof
            };
        }

        Scan::Refill
    }
    /// Next token, `Ok(None)` once the stream is exhausted.
    pub fn next_token(&mut self) -> Result<Option<String>,Error> {
        self.token.clear();
        loop {
            match self.scan_buffer() {
                Scan::Token => return Ok(Some(String::from_utf8_lossy(&self.token).into_owned())),
                Scan::Eof => return Ok(None),
                Scan::Refill => self.fill_buffer()?
            }
        }
    }
    /// Next token, where the end of the stream is an error.
    /// `what` describes the expected item for diagnostics.
    pub fn require(&mut self, what: &str) -> Result<String,Error> {
        match self.next_token()? {
            Some(tok) => Ok(tok),
            None => Err(self.err_expected(what,None))
        }
    }
    /// The next token must be exactly `literal`.
    pub fn expect(&mut self, literal: &str, what: &str) -> Result<(),Error> {
        let expected = format!("{} \"{}\"",what,literal);
        match self.next_token()? {
            Some(tok) if tok==literal => Ok(()),
            Some(tok) => Err(self.err_expected(&expected,Some(&tok))),
            None => Err(self.err_expected(&expected,None))
        }
    }
    /// Like `expect`, except a clean end of the stream is legal and
    /// reported as `Ok(false)`.
    pub fn expect_or_eof(&mut self, literal: &str, what: &str) -> Result<bool,Error> {
        match self.next_token()? {
            Some(tok) if tok==literal => Ok(true),
            Some(tok) => {
                let expected = format!("{} \"{}\" or EOF",what,literal);
                Err(self.err_expected(&expected,Some(&tok)))
            },
            None => Ok(false)
        }
    }
    /// Fill `out` with the next `out.len()` tokens converted to floats.
    /// Tokens that do not parse as numbers are syntax errors.
    pub fn next_floats(&mut self, out: &mut [f32]) -> Result<(),Error> {
        for val in out.iter_mut() {
            let tok = self.require("a number")?;
            *val = match tok.parse::<f32>() {
                Ok(x) => x,
                Err(_) => return Err(self.err_expected("a number",Some(&tok)))
            };
        }
        Ok(())
    }
    /// Next token converted to a non-negative integer.
    pub fn next_usize(&mut self, what: &str) -> Result<usize,Error> {
        let tok = self.require(what)?;
        match tok.parse::<usize>() {
            Ok(val) => Ok(val),
            Err(_) => Err(self.err_expected(what,Some(&tok)))
        }
    }
}
