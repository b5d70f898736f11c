// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Path tokenizer.
//!
//! A path is a `.` separated list of segments. Each segment is an optional key
//! followed by any number of bracketed indices:
//!
//! ```text
//! path    = segment ('.' segment)*
//! segment = key? ('[' index ']')*
//! key     = any run of characters except '.' and '[', trimmed
//! index   = ASCII digits, trimmed
//! ```
//!
//! Empty segments are skipped, so `""`, `"."` and `"a..b"` are all valid.

use core::fmt;
use core::iter::Peekable;
use core::str::CharIndices;

use thiserror::Error;

/// One step of a path: a map key or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathToken {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathToken::Key(key) => f.write_str(key),
            PathToken::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Reasons a path fails to tokenize. Offsets are byte offsets into the path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("unterminated index starting at offset {offset}")]
    UnterminatedIndex { offset: usize },

    #[error("invalid index `{text}` at offset {offset}")]
    InvalidIndex { text: String, offset: usize },

    #[error("index `{text}` at offset {offset} does not fit in usize")]
    IndexOverflow { text: String, offset: usize },

    #[error("unexpected character `{ch}` at offset {offset}")]
    UnexpectedCharacter { ch: char, offset: usize },
}

struct Tokenizer<'path> {
    path: &'path str,
    iter: Peekable<CharIndices<'path>>,
    tokens: Vec<PathToken>,
}

impl<'path> Tokenizer<'path> {
    fn new(path: &'path str) -> Self {
        Self {
            path,
            iter: path.char_indices().peekable(),
            tokens: vec![],
        }
    }

    fn peek(&mut self) -> Option<(usize, char)> {
        self.iter.peek().copied()
    }

    fn offset(&mut self) -> usize {
        self.peek().map_or(self.path.len(), |(pos, _)| pos)
    }

    fn run(mut self) -> Result<Vec<PathToken>, PathError> {
        loop {
            self.read_segment()?;
            match self.iter.next() {
                Some((_, '.')) => continue,
                None => break,
                Some((offset, ch)) => return Err(PathError::UnexpectedCharacter { ch, offset }),
            }
        }
        Ok(self.tokens)
    }

    fn read_segment(&mut self) -> Result<(), PathError> {
        let path = self.path;
        let start = self.offset();
        while let Some((_, ch)) = self.peek() {
            if ch == '.' || ch == '[' {
                break;
            }
            self.iter.next();
        }
        let end = self.offset();
        let key = path[start..end].trim();
        if !key.is_empty() {
            self.tokens.push(PathToken::Key(key.to_string()));
        }

        while let Some((_, '[')) = self.peek() {
            self.read_index()?;
            self.skip_whitespace();
        }
        Ok(())
    }

    fn read_index(&mut self) -> Result<(), PathError> {
        let path = self.path;
        let open = self.offset();
        self.iter.next();
        let start = self.offset();
        loop {
            match self.iter.next() {
                Some((end, ']')) => {
                    let text = path[start..end].trim();
                    let index = parse_index(text, start)?;
                    self.tokens.push(PathToken::Index(index));
                    return Ok(());
                }
                Some(_) => (),
                None => return Err(PathError::UnterminatedIndex { offset: open }),
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some((_, ch)) = self.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.iter.next();
        }
    }
}

fn parse_index(text: &str, offset: usize) -> Result<usize, PathError> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PathError::InvalidIndex {
            text: text.to_string(),
            offset,
        });
    }
    text.parse::<usize>().map_err(|_| PathError::IndexOverflow {
        text: text.to_string(),
        offset,
    })
}

/// Split a path into its tokens.
pub fn tokenize(path: &str) -> Result<Vec<PathToken>, PathError> {
    Tokenizer::new(path).run()
}
