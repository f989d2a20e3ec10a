use std::io::Write;

use crate::ast::{Assignment, BinaryOperator, Block, Expression, Statement};

mod error;
mod symbols;

pub use error::RuntimeError;
pub use symbols::SymbolTable;

/// Tree-walking executor. Statements run against the owned symbol table and
/// `print` writes straight to `output`.
pub struct Interpreter<W: Write> {
    symbols: SymbolTable,
    output: W,
}

impl<W: Write> Interpreter<W> {
    pub fn new(output: W) -> Self {
        Self::with_symbols(SymbolTable::new(), output)
    }

    pub fn with_symbols(symbols: SymbolTable, output: W) -> Self {
        Self { symbols, output }
    }

    pub fn run(&mut self, program: &Block) -> Result<(), RuntimeError> {
        let result = self.exec_block(program);
        self.output.flush()?;
        result
    }

    /// Runs every statement once, in parse order.
    pub fn exec_block(&mut self, block: &Block) -> Result<(), RuntimeError> {
        for statement in &block.statements {
            self.execute(statement)?;
        }
        Ok(())
    }

    pub fn execute(&mut self, statement: &Statement) -> Result<(), RuntimeError> {
        match statement {
            Statement::Assign(assignment) => self.assign(assignment),
            Statement::Print { name } => {
                let value = self.symbols.get(name)?;
                writeln!(self.output, "{value}")?;
                Ok(())
            }
            Statement::For {
                init,
                condition,
                update,
                body,
            } => {
                // Pre-test loop: the condition is checked before the first pass too.
                self.assign(init)?;
                let mut iterations = 0_u64;
                while self.evaluate(condition)? != 0 {
                    self.exec_block(body)?;
                    self.assign(update)?;
                    iterations += 1;
                }
                log::debug!(
                    "loop 'for ({init}; {condition}; {update})' ran {iterations} iterations"
                );
                Ok(())
            }
        }
    }

    pub fn evaluate(&self, expr: &Expression) -> Result<i64, RuntimeError> {
        evaluate(expr, &self.symbols)
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Writes every variable as `name = value`, in name order.
    pub fn dump_symbols(&mut self) -> Result<(), RuntimeError> {
        for (name, value) in self.symbols.iter() {
            writeln!(self.output, "{name} = {value}")?;
        }
        self.output.flush()?;
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn assign(&mut self, assignment: &Assignment) -> Result<(), RuntimeError> {
        let value = self.evaluate(&assignment.value)?;
        log::trace!("{} <- {value}", assignment.target);
        self.symbols.set(assignment.target.as_str(), value);
        Ok(())
    }
}

/// Evaluates `expr` against `symbols`. Both operands of a binary node are
/// always evaluated, left first; comparisons yield 1 or 0.
pub fn evaluate(expr: &Expression, symbols: &SymbolTable) -> Result<i64, RuntimeError> {
    match expr {
        Expression::Integer(value) => Ok(*value),
        Expression::Variable(name) => symbols.get(name),
        Expression::Binary { op, left, right } => {
            let left_value = evaluate(left, symbols)?;
            let right_value = evaluate(right, symbols)?;
            apply(*op, left_value, right_value).ok_or_else(|| {
                let expression = expr.to_string();
                match op {
                    BinaryOperator::Div if right_value == 0 => {
                        RuntimeError::DivisionByZero { expression }
                    }
                    BinaryOperator::Mod if right_value == 0 => {
                        RuntimeError::ModuloByZero { expression }
                    }
                    _ => RuntimeError::Overflow { expression },
                }
            })
        }
    }
}

/// `None` when the result is not representable (zero divisor or overflow).
fn apply(op: BinaryOperator, left: i64, right: i64) -> Option<i64> {
    match op {
        BinaryOperator::Add => left.checked_add(right),
        BinaryOperator::Sub => left.checked_sub(right),
        BinaryOperator::Mul => left.checked_mul(right),
        BinaryOperator::Div => left.checked_div(right),
        BinaryOperator::Mod => left.checked_rem(right),
        BinaryOperator::Equal => Some(i64::from(left == right)),
        BinaryOperator::NotEqual => Some(i64::from(left != right)),
        BinaryOperator::Greater => Some(i64::from(left > right)),
        BinaryOperator::GreaterEqual => Some(i64::from(left >= right)),
        BinaryOperator::Less => Some(i64::from(left < right)),
        BinaryOperator::LessEqual => Some(i64::from(left <= right)),
    }
}

/// Runs `program` on a fresh symbol table and returns everything it printed.
pub fn run_program(program: &Block) -> Result<String, RuntimeError> {
    let mut interpreter = Interpreter::new(Vec::new());
    interpreter.run(program)?;
    Ok(String::from_utf8_lossy(&interpreter.into_output()).into_owned())
}
