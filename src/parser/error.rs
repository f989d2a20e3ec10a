use std::fmt::Write as _;

use thiserror::Error;

use crate::token::Token;

/// Raised the moment a grammar rule meets a token it cannot accept.
///
/// Parsing never recovers from one of these; the partially built tree is
/// dropped and the error travels straight to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{production}: {message}, instead got '{found}' at line {line}, column {column}")]
pub struct SyntaxError {
    pub production: &'static str,
    pub message: String,
    pub found: String,
    pub line: usize,
    pub column: usize,
    /// Text of every token consumed up to and including the offending one.
    pub history: Vec<String>,
}

impl SyntaxError {
    pub(super) fn new(
        production: &'static str,
        message: impl Into<String>,
        token: &Token<'_>,
        history: &[Token<'_>],
    ) -> Self {
        Self {
            production,
            message: message.into(),
            found: token.to_string(),
            line: token.span.line,
            column: token.span.column,
            history: history.iter().map(ToString::to_string).collect(),
        }
    }

    /// Full diagnostic: the error line followed by the consumed-token listing.
    pub fn report(&self) -> String {
        let mut report = format!(
            "{self}\n\nThe following is a list of tokens that have been identified up to this point.\n"
        );
        for (index, token) in self.history.iter().enumerate() {
            let _ = writeln!(report, "{index:>4}: {token}");
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Span, TokenKind};

    #[test]
    fn report_lists_consumed_tokens() {
        let span = Span {
            start: 4,
            end: 5,
            line: 1,
            column: 4,
        };
        let history = [
            Token::new(TokenKind::Identifier("x"), Span::default()),
            Token::new(TokenKind::Assign, Span::default()),
            Token::new(TokenKind::Assign, span),
        ];
        let error = SyntaxError::new(
            "arith_primary",
            "Expected a number, a name, or an open parenthesis",
            &history[2],
            &history,
        );

        assert_eq!(
            error.to_string(),
            "arith_primary: Expected a number, a name, or an open parenthesis, instead got '=' at line 1, column 4"
        );
        let report = error.report();
        assert!(report.contains("   0: x\n   1: =\n   2: =\n"));
    }
}
