use thiserror::Error;

/// Faults raised while executing a parsed program. Each one aborts the run;
/// output already written stays written.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String },
    #[error("Division by zero in '{expression}'")]
    DivisionByZero { expression: String },
    #[error("Modulo by zero in '{expression}'")]
    ModuloByZero { expression: String },
    #[error("Integer overflow in '{expression}'")]
    Overflow { expression: String },
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
