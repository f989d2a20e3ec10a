use std::{iter::Peekable, str::CharIndices};

use crate::token::{Span, Token, TokenKind};

mod error;
mod stream;

pub use error::{LexError, LexResult};
pub use stream::TokenStream;

pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    column: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            line: 1,
            column: 0,
            finished: false,
        }
    }

    /// Returns the next token. Once the input is exhausted every call yields `Eof`.
    pub fn next_token(&mut self) -> LexResult<Token<'a>> {
        self.skip_whitespace();

        let start = self.current_index();
        let line = self.line;
        let column = self.column;

        let Some(ch) = self.advance_char() else {
            return Ok(Token::new(
                TokenKind::Eof,
                Span {
                    start,
                    end: start,
                    line,
                    column,
                },
            ));
        };

        let kind = match ch {
            '\n' => TokenKind::Eol,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ';' => TokenKind::Semicolon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '=' => self.with_equal(TokenKind::EqualEqual, TokenKind::Assign),
            '>' => self.with_equal(TokenKind::GreaterEqual, TokenKind::Greater),
            '<' => self.with_equal(TokenKind::LessEqual, TokenKind::Less),
            '!' if self.consume_if('=') => TokenKind::NotEqual,
            c if c.is_ascii_alphabetic() || c == '_' => self.read_word(start),
            c if c.is_ascii_digit() => self.read_integer(start, line, column)?,
            character => {
                return Err(LexError::UnexpectedCharacter {
                    character,
                    line,
                    column,
                });
            }
        };

        Ok(Token::new(
            kind,
            Span {
                start,
                end: self.current_index(),
                line,
                column,
            },
        ))
    }

    fn with_equal(&mut self, paired: TokenKind<'a>, single: TokenKind<'a>) -> TokenKind<'a> {
        if self.consume_if('=') { paired } else { single }
    }

    fn read_word(&mut self, start: usize) -> TokenKind<'a> {
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance_char();
            } else {
                break;
            }
        }

        let word = &self.input[start..self.current_index()];
        TokenKind::keyword(word).unwrap_or(TokenKind::Identifier(word))
    }

    fn read_integer(&mut self, start: usize, line: usize, column: usize) -> LexResult<TokenKind<'a>> {
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_ascii_digit() {
                self.advance_char();
            } else {
                break;
            }
        }

        let literal = &self.input[start..self.current_index()];
        let value = literal
            .parse::<i64>()
            .map_err(|_| LexError::InvalidIntegerLiteral {
                literal: literal.to_string(),
                line,
                column,
            })?;
        Ok(TokenKind::Integer(value))
    }

    fn skip_whitespace(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if c != '\n' && c.is_whitespace() {
                self.advance_char();
            } else {
                break;
            }
        }
    }

    fn consume_if(&mut self, expected: char) -> bool {
        if self.chars.peek().is_some_and(|&(_, c)| c == expected) {
            self.advance_char();
            true
        } else {
            false
        }
    }

    fn advance_char(&mut self) -> Option<char> {
        let (_, c) = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn current_index(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = LexResult<Token<'a>>;

    /// Yields tokens through the first `Eof` or error, then stops.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        self.finished = !matches!(result, Ok(ref token) if token.kind != TokenKind::Eof);
        Some(result)
    }
}

pub fn tokenize<'a>(input: &'a str) -> LexResult<Vec<Token<'a>>> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let is_eof = matches!(token.kind, TokenKind::Eof);
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    log::trace!("tokenized {} tokens", tokens.len());
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn kinds(input: &str) -> Vec<TokenKind<'_>> {
        tokenize(input)
            .expect("tokenize should succeed")
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn test_simple_program() {
        let input = indoc! {"
            for (i = 0; i < 3; i = i + 1) {
                print i
            }
        "};
        let expected_tokens = vec![
            TokenKind::For,
            TokenKind::LParen,
            TokenKind::Identifier("i"),
            TokenKind::Assign,
            TokenKind::Integer(0),
            TokenKind::Semicolon,
            TokenKind::Identifier("i"),
            TokenKind::Less,
            TokenKind::Integer(3),
            TokenKind::Semicolon,
            TokenKind::Identifier("i"),
            TokenKind::Assign,
            TokenKind::Identifier("i"),
            TokenKind::Plus,
            TokenKind::Integer(1),
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::Eol,
            TokenKind::Print,
            TokenKind::Identifier("i"),
            TokenKind::Eol,
            TokenKind::RBrace,
            TokenKind::Eol,
            TokenKind::Eof,
        ];
        assert_eq!(kinds(input), expected_tokens);
    }

    #[test]
    fn splits_two_character_symbols() {
        assert_eq!(
            kinds("a==b!=c>=d<=e>f<g=h"),
            vec![
                TokenKind::Identifier("a"),
                TokenKind::EqualEqual,
                TokenKind::Identifier("b"),
                TokenKind::NotEqual,
                TokenKind::Identifier("c"),
                TokenKind::GreaterEqual,
                TokenKind::Identifier("d"),
                TokenKind::LessEqual,
                TokenKind::Identifier("e"),
                TokenKind::Greater,
                TokenKind::Identifier("f"),
                TokenKind::Less,
                TokenKind::Identifier("g"),
                TokenKind::Assign,
                TokenKind::Identifier("h"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keywords_need_whole_words() {
        assert_eq!(
            kinds("printer for_each print"),
            vec![
                TokenKind::Identifier("printer"),
                TokenKind::Identifier("for_each"),
                TokenKind::Print,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tracks_lines_and_columns() {
        let tokens = tokenize("x = 1\r\n  y = 22\n").expect("tokenize should succeed");
        let y = tokens
            .iter()
            .find(|token| token.kind == TokenKind::Identifier("y"))
            .expect("y token");
        assert_eq!((y.span.line, y.span.column), (2, 2));
        let literal = tokens
            .iter()
            .find(|token| token.kind == TokenKind::Integer(22))
            .expect("22 token");
        assert_eq!(literal.span.end - literal.span.start, 2);
    }

    #[test]
    fn keeps_returning_eof() {
        let mut lexer = Lexer::new("x");
        assert!(lexer.next_token().expect("x").kind.is_identifier());
        assert_eq!(lexer.next_token().expect("eof").kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().expect("eof again").kind, TokenKind::Eof);
    }

    #[test]
    fn iterator_stops_after_eof() {
        let tokens = Lexer::new("print x\n")
            .collect::<LexResult<Vec<_>>>()
            .expect("lexing should succeed");
        let kinds = tokens.into_iter().map(|token| token.kind).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Print,
                TokenKind::Identifier("x"),
                TokenKind::Eol,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn iterator_stops_after_error() {
        let mut lexer = Lexer::new("x @ y");
        assert!(lexer.next().is_some_and(|token| token.is_ok()));
        assert!(lexer.next().is_some_and(|token| token.is_err()));
        assert!(lexer.next().is_none());
    }

    #[test]
    fn errors_on_invalid_character() {
        let err = tokenize("x = 1 @ 2\n").expect_err("expected lexing failure");
        assert!(err.to_string().contains("Unexpected character '@'"));
    }

    #[test]
    fn errors_on_lone_bang() {
        let err = tokenize("x = !1").expect_err("expected lexing failure");
        assert_eq!(
            err,
            LexError::UnexpectedCharacter {
                character: '!',
                line: 1,
                column: 4,
            }
        );
    }

    #[test]
    fn errors_on_integer_overflow() {
        let err = tokenize("n = 99999999999999999999999999\n").expect_err("expected overflow");
        assert!(err.to_string().contains("Invalid integer literal"));
    }
}
