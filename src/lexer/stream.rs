use crate::token::{Span, Token, TokenKind};

/// Token source with a single slot of pushback.
///
/// `pushback` un-consumes the token most recently returned by `next`. The
/// buffer holds at most one token, so two pushbacks without a `next` in
/// between is a caller bug: it trips a debug assertion and is otherwise
/// ignored.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    tokens: Vec<Token<'a>>,
    cursor: usize,
    pushed_back: bool,
}

impl<'a> TokenStream<'a> {
    pub fn new(mut tokens: Vec<Token<'a>>) -> Self {
        if !matches!(tokens.last().map(|token| token.kind), Some(TokenKind::Eof)) {
            let end = tokens.last().map(|token| token.span).unwrap_or_default();
            tokens.push(Token::new(
                TokenKind::Eof,
                Span {
                    start: end.end,
                    end: end.end,
                    ..end
                },
            ));
        }
        Self {
            tokens,
            cursor: 0,
            pushed_back: false,
        }
    }

    /// Advances and returns the next token. `Eof` repeats once reached.
    pub fn next(&mut self) -> Token<'a> {
        self.pushed_back = false;
        let token = self.tokens[self.cursor.min(self.tokens.len() - 1)];
        if self.cursor < self.tokens.len() {
            self.cursor += 1;
        }
        log::trace!("token '{}' at {}:{}", token, token.span.line, token.span.column);
        token
    }

    pub fn pushback(&mut self) {
        debug_assert!(
            !self.pushed_back,
            "pushback called twice without an intervening next"
        );
        debug_assert!(self.cursor > 0, "pushback called before any next");
        if self.pushed_back || self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        self.pushed_back = true;
    }

    /// Tokens consumed so far, in order.
    pub fn history(&self) -> &[Token<'a>] {
        &self.tokens[..self.cursor]
    }
}
