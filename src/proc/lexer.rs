use std::{iter::Peekable, str::CharIndices};

use crate::{
    error::{Result, ViewerError},
    proc::TokenStream,
};

/// A lexical token of the `.proc` format.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// A quoted string, without the quotes.
    Str(String),
    /// A bare word: numbers and section keywords.
    Word(String),
    /// One of `{ } ( )`.
    Punct(char),
}

/// Tokenizer for `.proc` text.
///
/// `//` line comments and `/* */` block comments are skipped. The typed
/// reads of [`TokenStream`] step over punctuation, so a surface record such as
/// `{ "tex" 3 3 ( 0 0 0 0 0 0 0 1 ) ... }` can be read as a flat sequence of
/// values.
pub struct ProcLexer<'a> {
    src: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    peeked: Option<(Token, usize)>,
}

impl<'a> ProcLexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.char_indices().peekable(),
            line: 1,
            peeked: None,
        }
    }

    /// Line of the most recently returned token.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn error(&self, message: impl std::fmt::Display) -> ViewerError {
        ViewerError::malformed(format!("line {}: {}", self.line, message))
    }

    pub fn peek_token(&mut self) -> Result<Option<&Token>> {
        if self.peeked.is_none() {
            self.peeked = self.lex()?;
        }
        Ok(self.peeked.as_ref().map(|(token, _)| token))
    }

    pub fn next_token(&mut self) -> Result<Option<Token>> {
        let next = match self.peeked.take() {
            Some(peeked) => Some(peeked),
            None => self.lex()?,
        };
        Ok(next.map(|(token, line)| {
            self.line = line;
            token
        }))
    }

    /// Consumes the next token, which must be the punctuation `c`.
    pub fn expect_punct(&mut self, c: char) -> Result<()> {
        match self.next_token()? {
            Some(Token::Punct(p)) if p == c => Ok(()),
            Some(other) => Err(self.error(format!("expected `{c}`, found {other:?}"))),
            None => Err(self.error(format!("expected `{c}`, found end of input"))),
        }
    }

    /// Skips a braced block, including nested blocks. The opening `{` is
    /// consumed here.
    pub fn skip_block(&mut self) -> Result<()> {
        self.expect_punct('{')?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.next_token()? {
                Some(Token::Punct('{')) => depth += 1,
                Some(Token::Punct('}')) => depth -= 1,
                Some(_) => (),
                None => return Err(self.error("unterminated block")),
            }
        }
        Ok(())
    }

    /// Next value token, stepping over punctuation.
    fn next_value(&mut self) -> Result<Token> {
        loop {
            match self.next_token()? {
                Some(Token::Punct(_)) => continue,
                Some(token) => return Ok(token),
                None => return Err(self.error("unexpected end of input")),
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<()> {
        loop {
            match self.chars.peek().copied() {
                Some((_, '\n')) => {
                    self.line += 1;
                    self.chars.next();
                }
                Some((_, c)) if c.is_whitespace() => {
                    self.chars.next();
                }
                Some((i, '/')) => match self.src[i + 1..].chars().next() {
                    Some('/') => {
                        while let Some((_, c)) = self.chars.peek() {
                            if *c == '\n' {
                                break;
                            }
                            self.chars.next();
                        }
                    }
                    Some('*') => {
                        let start = self.line;
                        self.chars.next();
                        self.chars.next();
                        let mut closed = false;
                        while let Some((_, c)) = self.chars.next() {
                            match c {
                                '\n' => self.line += 1,
                                '*' if matches!(self.chars.peek(), Some((_, '/'))) => {
                                    self.chars.next();
                                    closed = true;
                                    break;
                                }
                                _ => (),
                            }
                        }
                        if !closed {
                            return Err(ViewerError::malformed(format!(
                                "line {start}: unterminated comment"
                            )));
                        }
                    }
                    _ => return Ok(()),
                },
                _ => return Ok(()),
            }
        }
    }

    fn lex(&mut self) -> Result<Option<(Token, usize)>> {
        self.skip_whitespace_and_comments()?;
        let line = self.line;
        let Some((start, c)) = self.chars.next() else {
            return Ok(None);
        };
        let token = match c {
            '{' | '}' | '(' | ')' => Token::Punct(c),
            '"' => {
                let mut text = String::new();
                loop {
                    match self.chars.next() {
                        Some((_, '"')) => break,
                        Some((_, '\n')) | None => {
                            return Err(ViewerError::malformed(format!(
                                "line {line}: unterminated string"
                            )));
                        }
                        Some((_, ch)) => text.push(ch),
                    }
                }
                Token::Str(text)
            }
            _ => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, ch)) = self.chars.peek() {
                    if ch.is_whitespace() || matches!(ch, '{' | '}' | '(' | ')' | '"') {
                        break;
                    }
                    end = i + ch.len_utf8();
                    self.chars.next();
                }
                Token::Word(self.src[start..end].to_string())
            }
        };
        Ok(Some((token, line)))
    }
}

impl TokenStream for ProcLexer<'_> {
    fn next_int(&mut self) -> Result<i32> {
        match self.next_value()? {
            Token::Word(word) => word
                .parse()
                .map_err(|_| self.error(format!("expected an integer, found `{word}`"))),
            other => Err(self.error(format!("expected an integer, found {other:?}"))),
        }
    }

    fn next_float(&mut self) -> Result<f32> {
        match self.next_value()? {
            Token::Word(word) => word
                .parse()
                .map_err(|_| self.error(format!("expected a number, found `{word}`"))),
            other => Err(self.error(format!("expected a number, found {other:?}"))),
        }
    }

    fn next_string(&mut self) -> Result<String> {
        match self.next_value()? {
            Token::Str(text) | Token::Word(text) => Ok(text),
            Token::Punct(_) => unreachable!("next_value skips punctuation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexes_words_strings_and_punctuation() {
        let mut lexer = ProcLexer::new(r#"model { "_area0" 2 }"#);
        assert_eq!(lexer.next_token().unwrap(), Some(Token::Word("model".into())));
        assert_eq!(lexer.next_token().unwrap(), Some(Token::Punct('{')));
        assert_eq!(lexer.next_token().unwrap(), Some(Token::Str("_area0".into())));
        assert_eq!(lexer.next_token().unwrap(), Some(Token::Word("2".into())));
        assert_eq!(lexer.next_token().unwrap(), Some(Token::Punct('}')));
        assert_eq!(lexer.next_token().unwrap(), None);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut lexer = ProcLexer::new("a b");
        assert_eq!(lexer.peek_token().unwrap(), Some(&Token::Word("a".into())));
        assert_eq!(lexer.next_token().unwrap(), Some(Token::Word("a".into())));
        assert_eq!(lexer.next_token().unwrap(), Some(Token::Word("b".into())));
    }

    #[test]
    fn tracks_lines_across_comments() {
        let mut lexer = ProcLexer::new("/* one\ntwo */\n// three\nword");
        lexer.next_token().unwrap();
        assert_eq!(lexer.line(), 4);
    }
}
