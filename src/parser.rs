use anyhow::{Context, Result};

use crate::ast::{Assignment, BinaryOperator, Block, Expression, Statement};
use crate::lexer::{self, TokenStream};
use crate::token::{Token, TokenKind};

mod error;

pub use error::SyntaxError;

type ParseResult<T> = std::result::Result<T, SyntaxError>;

/// Deepest allowed nesting of parentheses and loop bodies.
pub const MAX_NESTING: usize = 200;

/// Recursive-descent parser over a [`TokenStream`].
///
/// Every lookahead is a `next` followed, when the token belongs to someone
/// else, by a single `pushback`.
pub struct Parser<'a> {
    tokens: TokenStream<'a>,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: TokenStream<'a>) -> Self {
        Self { tokens, depth: 0 }
    }

    /// Parses a whole program and requires the input to end after it.
    pub fn parse_program(mut self) -> ParseResult<Block> {
        self.skip_eols();
        let program = self.statements()?;
        self.skip_eols();
        let token = self.tokens.next();
        if token.kind != TokenKind::Eof {
            return Err(self.error("program", "Expected end of input", &token));
        }
        Ok(program)
    }

    /// `'{' [EOL] stmt-list '}' | stmt-list`
    ///
    /// Without braces the first token that cannot start a statement is left
    /// in the stream for the caller. End-of-lines after the last statement
    /// are consumed first, so `x = 1\n` leaves `Eof` next; with braces the
    /// list ends at `}` and a following end-of-line is left in place.
    pub fn statements(&mut self) -> ParseResult<Block> {
        let mut token = self.tokens.next();
        let in_scope = token.kind == TokenKind::LBrace;
        if in_scope {
            token = self.tokens.next();
            while token.kind == TokenKind::Eol {
                token = self.tokens.next();
            }
        }

        let mut statements = Vec::new();
        while token.kind.is_statement_start() {
            self.tokens.pushback();
            let statement = match token.kind {
                TokenKind::For => self.for_statement()?,
                TokenKind::Print => self.print_statement()?,
                _ => Statement::Assign(self.assign_statement()?),
            };
            log::debug!(
                "parsed statement at line {}: {}",
                token.span.line,
                statement.to_string().lines().next().unwrap_or_default()
            );
            statements.push(statement);

            token = self.tokens.next();
            if in_scope && token.kind == TokenKind::RBrace {
                return Ok(Block::new(statements));
            }
            while token.kind == TokenKind::Eol {
                token = self.tokens.next();
            }
        }

        if in_scope {
            if token.kind == TokenKind::RBrace {
                return Ok(Block::new(statements));
            }
            return Err(self.error("statements", "Expected a close brace", &token));
        }
        self.tokens.pushback();
        Ok(Block::new(statements))
    }

    /// `identifier '=' rel-expr`
    pub fn assign_statement(&mut self) -> ParseResult<Assignment> {
        let token = self.tokens.next();
        let TokenKind::Identifier(name) = token.kind else {
            return Err(self.error("assign_statement", "Expected a name token", &token));
        };
        self.expect(TokenKind::Assign, "assign_statement", "Expected an equal sign")?;
        let value = self.rel_expr()?;
        Ok(Assignment {
            target: name.to_string(),
            value,
        })
    }

    /// `'for' '(' assign-stmt ';' rel-expr ';' assign-stmt ')' statements`
    pub fn for_statement(&mut self) -> ParseResult<Statement> {
        const RULE: &str = "for_statement";
        self.expect(TokenKind::For, RULE, "Expected the 'for' keyword")?;
        self.expect(TokenKind::LParen, RULE, "Expected an open parenthesis")?;
        let init = self.assign_statement()?;
        self.expect(TokenKind::Semicolon, RULE, "Expected a semicolon")?;
        let condition = self.rel_expr()?;
        self.expect(TokenKind::Semicolon, RULE, "Expected a semicolon")?;
        let update = self.assign_statement()?;
        self.expect(TokenKind::RParen, RULE, "Expected a close parenthesis")?;
        let brace = self.expect(TokenKind::LBrace, RULE, "Expected an open brace")?;
        self.tokens.pushback();
        self.nest(RULE, &brace)?;
        let body = self.statements()?;
        self.depth -= 1;

        Ok(Statement::For {
            init,
            condition,
            update,
            body,
        })
    }

    /// `'print' identifier`
    pub fn print_statement(&mut self) -> ParseResult<Statement> {
        self.expect(TokenKind::Print, "print_statement", "Expected the 'print' keyword")?;
        let token = self.tokens.next();
        let TokenKind::Identifier(name) = token.kind else {
            return Err(self.error("print_statement", "Expected a name token", &token));
        };
        Ok(Statement::Print {
            name: name.to_string(),
        })
    }

    /// `rel-term { ('==' | '!=') rel-term }`
    pub fn rel_expr(&mut self) -> ParseResult<Expression> {
        self.left_assoc(Self::rel_term, equality_operator)
    }

    /// `arith-expr { ('>' | '>=' | '<' | '<=') arith-expr }`
    pub fn rel_term(&mut self) -> ParseResult<Expression> {
        self.left_assoc(Self::arith_expr, relational_operator)
    }

    /// `arith-term { ('+' | '-') arith-term }`
    pub fn arith_expr(&mut self) -> ParseResult<Expression> {
        self.left_assoc(Self::arith_term, additive_operator)
    }

    /// `arith-primary { ('*' | '/' | '%') arith-primary }`
    pub fn arith_term(&mut self) -> ParseResult<Expression> {
        self.left_assoc(Self::arith_primary, multiplicative_operator)
    }

    /// `number | identifier | '(' arith-expr ')'`
    pub fn arith_primary(&mut self) -> ParseResult<Expression> {
        let token = self.tokens.next();
        match token.kind {
            TokenKind::Integer(value) => Ok(Expression::Integer(value)),
            TokenKind::Identifier(name) => Ok(Expression::Variable(name.to_string())),
            TokenKind::LParen => {
                self.nest("arith_primary", &token)?;
                let expr = self.arith_expr()?;
                self.depth -= 1;
                self.expect(
                    TokenKind::RParen,
                    "arith_primary",
                    "Expected a close parenthesis",
                )?;
                Ok(expr)
            }
            _ => Err(self.error(
                "arith_primary",
                "Expected a number, a name, or an open parenthesis",
                &token,
            )),
        }
    }

    /// One precedence level: operands from the next tighter level, folded
    /// leftwards for as long as this level's operators keep appearing.
    fn left_assoc(
        &mut self,
        operand: fn(&mut Self) -> ParseResult<Expression>,
        operator: fn(&TokenKind<'_>) -> Option<BinaryOperator>,
    ) -> ParseResult<Expression> {
        let mut left = operand(self)?;
        loop {
            let token = self.tokens.next();
            let Some(op) = operator(&token.kind) else {
                self.tokens.pushback();
                return Ok(left);
            };
            let right = operand(self)?;
            left = Expression::binary(op, left, right);
        }
    }

    fn nest(&mut self, production: &'static str, token: &Token<'_>) -> ParseResult<()> {
        if self.depth >= MAX_NESTING {
            return Err(self.error(production, "Nested too deeply", token));
        }
        self.depth += 1;
        Ok(())
    }

    fn expect(
        &mut self,
        kind: TokenKind<'a>,
        production: &'static str,
        message: &str,
    ) -> ParseResult<Token<'a>> {
        let token = self.tokens.next();
        if token.kind == kind {
            Ok(token)
        } else {
            Err(self.error(production, message, &token))
        }
    }

    fn skip_eols(&mut self) {
        while self.tokens.next().kind == TokenKind::Eol {}
        self.tokens.pushback();
    }

    fn error(&self, production: &'static str, message: &str, token: &Token<'_>) -> SyntaxError {
        SyntaxError::new(production, message, token, self.tokens.history())
    }
}

fn equality_operator(kind: &TokenKind<'_>) -> Option<BinaryOperator> {
    match kind {
        TokenKind::EqualEqual => Some(BinaryOperator::Equal),
        TokenKind::NotEqual => Some(BinaryOperator::NotEqual),
        _ => None,
    }
}

fn relational_operator(kind: &TokenKind<'_>) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Greater => Some(BinaryOperator::Greater),
        TokenKind::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        TokenKind::Less => Some(BinaryOperator::Less),
        TokenKind::LessEqual => Some(BinaryOperator::LessEqual),
        _ => None,
    }
}

fn additive_operator(kind: &TokenKind<'_>) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Plus => Some(BinaryOperator::Add),
        TokenKind::Minus => Some(BinaryOperator::Sub),
        _ => None,
    }
}

fn multiplicative_operator(kind: &TokenKind<'_>) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Star => Some(BinaryOperator::Mul),
        TokenKind::Slash => Some(BinaryOperator::Div),
        TokenKind::Percent => Some(BinaryOperator::Mod),
        _ => None,
    }
}

pub fn parse_tokens(tokens: Vec<Token<'_>>) -> ParseResult<Block> {
    Parser::new(TokenStream::new(tokens)).parse_program()
}

pub fn parse(input: &str) -> Result<Block> {
    let tokens = lexer::tokenize(input).context("Tokenizing program")?;
    parse_tokens(tokens).context("Parsing program")
}
