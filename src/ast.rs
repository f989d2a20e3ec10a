//! Syntax tree built by the parser and walked by the interpreter.
//!
//! Every child node is owned by exactly one parent; a program is a [`Block`]
//! at the root. `Display` renders nodes back to source form, adding only the
//! parentheses needed to keep the tree's grouping.

use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Expression {
    Integer(i64),
    Variable(String),
    Binary {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl Expression {
    pub fn binary(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expression::Binary { op, .. } => op.precedence(),
            Expression::Integer(_) | Expression::Variable(_) => u8::MAX,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
        }
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Equal | BinaryOperator::NotEqual => 1,
            BinaryOperator::Greater
            | BinaryOperator::GreaterEqual
            | BinaryOperator::Less
            | BinaryOperator::LessEqual => 2,
            BinaryOperator::Add | BinaryOperator::Sub => 3,
            BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod => 4,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Integer(value) => write!(f, "{value}"),
            Expression::Variable(name) => f.write_str(name),
            Expression::Binary { op, left, right } => {
                let level = op.precedence();
                write_operand(f, left, left.precedence() < level)?;
                write!(f, " {op} ")?;
                write_operand(f, right, right.precedence() <= level)
            }
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expression, wrap: bool) -> fmt::Result {
    if wrap {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Assignment {
    pub target: String,
    pub value: Expression,
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.target, self.value)
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Statement {
    Assign(Assignment),
    For {
        init: Assignment,
        condition: Expression,
        update: Assignment,
        body: Block,
    },
    Print {
        name: String,
    },
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Assign(assignment) => write!(f, "{assignment}"),
            Statement::Print { name } => write!(f, "print {name}"),
            Statement::For {
                init,
                condition,
                update,
                body,
            } => {
                writeln!(f, "for ({init}; {condition}; {update}) {{")?;
                for line in body.to_string().lines() {
                    writeln!(f, "    {line}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Ordered statement sequence; the body of a loop and the root of a program.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Block {
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            writeln!(f, "{statement}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn var(name: &str) -> Expression {
        Expression::Variable(name.to_string())
    }

    #[test]
    fn renders_left_chain_without_parentheses() {
        let expr = Expression::binary(
            BinaryOperator::Sub,
            Expression::binary(BinaryOperator::Sub, var("a"), var("b")),
            var("c"),
        );
        assert_eq!(expr.to_string(), "a - b - c");
    }

    #[test]
    fn renders_grouping_that_precedence_would_lose() {
        let right_nested = Expression::binary(
            BinaryOperator::Sub,
            var("a"),
            Expression::binary(BinaryOperator::Sub, var("b"), var("c")),
        );
        assert_eq!(right_nested.to_string(), "a - (b - c)");

        let sum_times = Expression::binary(
            BinaryOperator::Mul,
            Expression::binary(BinaryOperator::Add, Expression::Integer(2), Expression::Integer(3)),
            Expression::Integer(4),
        );
        assert_eq!(sum_times.to_string(), "(2 + 3) * 4");
    }

    #[test]
    fn renders_nested_loop_with_indentation() {
        let assign = |target: &str, value: Expression| Assignment {
            target: target.to_string(),
            value,
        };
        let program = Block::new(vec![
            Statement::For {
                init: assign("i", Expression::Integer(0)),
                condition: Expression::binary(BinaryOperator::Less, var("i"), Expression::Integer(2)),
                update: assign(
                    "i",
                    Expression::binary(BinaryOperator::Add, var("i"), Expression::Integer(1)),
                ),
                body: Block::new(vec![Statement::Print {
                    name: "i".to_string(),
                }]),
            },
            Statement::Print {
                name: "i".to_string(),
            },
        ]);

        let expected = indoc! {"
            for (i = 0; i < 2; i = i + 1) {
                print i
            }
            print i
        "};
        assert_eq!(program.to_string(), expected);
    }
}
