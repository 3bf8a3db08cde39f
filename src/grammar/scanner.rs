//! Lexer for command definition strings.

use std::iter::Enumerate;
use std::iter::Peekable;
use std::str::Chars;

use itertools::Itertools;

use crate::errors::Diagnostics;

/// The kind of a definition token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Less,
    Greater,
    Pipe,
    Star,
    Plus,
    Question,
    LParen,
    RParen,
    Colon,
    Word,
}

/// One token of a command definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// The word text; empty for punctuation tokens.
    pub value: String,
    /// Char offset in the definition where the token started.
    pub pos: usize,
}

impl Token {
    /// Length of the token in chars.
    pub fn len(&self) -> usize {
        if self.kind == TokenKind::Word {
            self.value.chars().count()
        } else {
            1
        }
    }
}

/// Scan a command definition into tokens.
///
/// Whitespace between tokens is insignificant. Any character that is neither
/// punctuation nor part of a word is recorded as a diagnostic and skipped;
/// scanning continues so that all bad characters are reported at once.
pub fn scan(input: &str) -> Result<Vec<Token>, Diagnostics> {
    let mut scanner = Scanner {
        chars: input.chars().enumerate().peekable(),
        tokens: Vec::new(),
        errors: Vec::new(),
    };
    scanner.scan_all();
    if scanner.errors.is_empty() {
        Ok(scanner.tokens)
    } else {
        Err(Diagnostics::new(scanner.errors))
    }
}

struct Scanner<'a> {
    chars: Peekable<Enumerate<Chars<'a>>>,
    tokens: Vec<Token>,
    errors: Vec<String>,
}

impl Scanner<'_> {
    fn scan_all(&mut self) {
        loop {
            self.skip_whitespace();
            let Some(&(pos, c)) = self.chars.peek() else {
                break;
            };
            match c {
                '<' => self.punct(TokenKind::Less, pos),
                '>' => self.punct(TokenKind::Greater, pos),
                '|' => self.punct(TokenKind::Pipe, pos),
                '*' => self.punct(TokenKind::Star, pos),
                '+' => self.punct(TokenKind::Plus, pos),
                '?' => self.punct(TokenKind::Question, pos),
                '(' => self.punct(TokenKind::LParen, pos),
                ')' => self.punct(TokenKind::RParen, pos),
                ':' => self.punct(TokenKind::Colon, pos),
                _ => self.word(pos, c),
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|&(_, c)| c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn punct(&mut self, kind: TokenKind, pos: usize) {
        self.chars.next();
        self.tokens.push(Token {
            kind,
            value: String::new(),
            pos,
        });
    }

    fn word(&mut self, pos: usize, c: char) {
        if !is_word_char(c) {
            // Consume the bad character and keep going.
            self.chars.next();
            self.errors
                .push(format!("Invalid character '{c}' encountered"));
            return;
        }
        let value: String = self
            .chars
            .peeking_take_while(|&(_, c)| is_word_char(c))
            .map(|(_, c)| c)
            .collect();
        self.tokens.push(Token {
            kind: TokenKind::Word,
            value,
            pos,
        });
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}
