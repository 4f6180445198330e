use crate::{
    ast::{Expression, Statement},
    environment::Environment,
    token::{Token, TokenType},
    types::{Literal, Value},
};

use std::{
    error::Error,
    fmt,
    io::Write,
};

/// Tree-walking evaluator.
///
/// Statements execute strictly in order against one [`Environment`]; the
/// first [`RuntimeError`] propagates out and aborts the remainder of the
/// run. Program output (`print`, REPL echo) goes to the injected sink so
/// the driver can pass stdout and tests can capture a buffer.
pub struct Interpreter<'a> {
    environment: Environment,
    sink: &'a mut dyn Write,
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

impl<'a> Interpreter<'a> {
    pub fn new(sink: &'a mut dyn Write) -> Self {
        Interpreter {
            environment: Environment::default(),
            sink,
        }
    }

    pub fn interpret(&mut self, statements: &[Statement]) -> RuntimeResult<()> {
        for statement in statements {
            self.execute(statement)?;
        }

        Ok(())
    }

    /// Like [`Interpreter::interpret`], but a trailing bare expression has
    /// its value echoed to the sink.
    pub fn interpret_repl(&mut self, statements: &[Statement]) -> RuntimeResult<()> {
        if let Some((last, others)) = statements.split_last() {
            self.interpret(others)?;
            match last {
                Statement::Expression(expression) => {
                    let value = self.evaluate(expression)?;
                    let _ = writeln!(self.sink, "{}", value);
                }
                _ => self.execute(last)?,
            }
        }

        Ok(())
    }

    fn execute(&mut self, statement: &Statement) -> RuntimeResult<()> {
        match statement {
            Statement::Expression(expression) => {
                self.evaluate(expression)?;
                Ok(())
            }
            Statement::Print(expression) => {
                let value = self.evaluate(expression)?;
                let _ = writeln!(self.sink, "{}", value);
                Ok(())
            }
            Statement::Var { name, initializer } => {
                let value = match initializer {
                    Some(expression) => self.evaluate(expression)?,
                    None => Value::Nil,
                };
                self.environment.define(name.lexeme.clone(), value);
                Ok(())
            }
        }
    }

    fn evaluate(&mut self, expression: &Expression) -> RuntimeResult<Value> {
        match expression {
            Expression::Assign { name, value } => {
                let value = self.evaluate(value)?;
                if !self.environment.assign(name, value.clone()) {
                    return Err(RuntimeError::new(
                        name.clone(),
                        RuntimeErrorKind::UndefinedVariable,
                    ));
                }

                // Assignment is itself an expression
                Ok(value)
            }
            Expression::Binary {
                left,
                operator,
                right,
            } => {
                // Both operands evaluate eagerly, left to right
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;

                match operator.token_type {
                    TokenType::EqualEqual => Ok(Value::Boolean(left == right)),
                    TokenType::NotEqual => Ok(Value::Boolean(left != right)),
                    TokenType::Plus => match (left, right) {
                        (Value::Number(ln), Value::Number(rn)) => Ok(Value::Number(ln + rn)),
                        (Value::String(mut ls), Value::String(rs)) => {
                            ls.push_str(&rs);
                            Ok(Value::String(ls))
                        }
                        _ => Err(RuntimeError::new(
                            operator.clone(),
                            RuntimeErrorKind::OperandsMustBeNumbersOrStrings,
                        )),
                    },
                    _ => match (left, operator.token_type, right) {
                        (Value::Number(ln), op, Value::Number(rn)) => match op {
                            TokenType::Minus => Ok(Value::Number(ln - rn)),
                            TokenType::Slash => Ok(Value::Number(ln / rn)),
                            TokenType::Star => Ok(Value::Number(ln * rn)),
                            TokenType::Greater => Ok(Value::Boolean(ln > rn)),
                            TokenType::GreaterEqual => Ok(Value::Boolean(ln >= rn)),
                            TokenType::Less => Ok(Value::Boolean(ln < rn)),
                            TokenType::LessEqual => Ok(Value::Boolean(ln <= rn)),
                            _ => Err(RuntimeError::new(
                                operator.clone(),
                                RuntimeErrorKind::InvalidBinaryExpression,
                            )),
                        },
                        _ => Err(RuntimeError::new(
                            operator.clone(),
                            RuntimeErrorKind::OperandsMustBeNumbers,
                        )),
                    },
                }
            }
            Expression::Grouping { expr } => self.evaluate(expr),
            Expression::Literal { literal } => {
                let result = match literal {
                    Literal::False => Value::Boolean(false),
                    Literal::True => Value::Boolean(true),
                    Literal::Number(n) => Value::Number(*n),
                    Literal::String(s) => Value::String(s.clone()),
                    Literal::Nil => Value::Nil,
                };

                Ok(result)
            }
            Expression::Unary { operator, expr } => {
                let right = self.evaluate(expr)?;

                match (operator.token_type, right) {
                    (TokenType::Minus, Value::Number(n)) => Ok(Value::Number(-n)),
                    (TokenType::Minus, _) => Err(RuntimeError::new(
                        operator.clone(),
                        RuntimeErrorKind::OperandMustBeNumber,
                    )),
                    (TokenType::Bang, value) => Ok(Value::Boolean(!value.is_truthy())),
                    _ => Err(RuntimeError::new(
                        operator.clone(),
                        RuntimeErrorKind::InvalidUnaryExpression,
                    )),
                }
            }
            Expression::Variable { name } => match self.environment.get(name) {
                Some(value) => Ok(value),
                None => Err(RuntimeError::new(
                    name.clone(),
                    RuntimeErrorKind::UndefinedVariable,
                )),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeError {
    token: Token,
    kind: RuntimeErrorKind,
}

impl RuntimeError {
    pub fn new(token: Token, kind: RuntimeErrorKind) -> Self {
        RuntimeError { token, kind }
    }
}

impl Error for RuntimeError {}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            RuntimeErrorKind::UndefinedVariable => write!(
                f,
                "[line {}] Undefined variable '{}'.",
                self.token.line, self.token.lexeme
            ),
            RuntimeErrorKind::OperandMustBeNumber => write!(
                f,
                "[line {}] Operand must be a number.",
                self.token.line
            ),
            RuntimeErrorKind::OperandsMustBeNumbers => write!(
                f,
                "[line {}] Operands must be numbers.",
                self.token.line
            ),
            RuntimeErrorKind::OperandsMustBeNumbersOrStrings => write!(
                f,
                "[line {}] Operands must be two numbers or two strings.",
                self.token.line
            ),
            RuntimeErrorKind::InvalidUnaryExpression => write!(
                f,
                "[line {}] Invalid unary expression '{}'.",
                self.token.line, self.token.lexeme
            ),
            RuntimeErrorKind::InvalidBinaryExpression => write!(
                f,
                "[line {}] Invalid binary expression '{}'.",
                self.token.line, self.token.lexeme
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub enum RuntimeErrorKind {
    UndefinedVariable,
    OperandMustBeNumber,
    OperandsMustBeNumbers,
    OperandsMustBeNumbersOrStrings,
    InvalidUnaryExpression,
    InvalidBinaryExpression,
}
