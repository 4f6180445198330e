use std::{error::Error, fmt, io::Write};

use log::debug;

use crate::{
    interpreter::{Interpreter, RuntimeError},
    parser::{ParseError, Parser},
    scanner::{ScanError, Scanner},
};

pub type VexResult = Result<(), VexError>;

/// Front-to-back pipeline for one source unit.
///
/// The interpreter, and with it the variable environment, lives for the
/// lifetime of the `Vex` value: a REPL session accumulates bindings across
/// `run` calls while compile diagnostics stay per-call.
pub struct Vex<'a> {
    interpreter: Interpreter<'a>,
}

impl<'a> Vex<'a> {
    pub fn new(sink: &'a mut dyn Write) -> Self {
        Vex {
            interpreter: Interpreter::new(sink),
        }
    }

    pub fn run(&mut self, source: &str, is_repl: bool) -> VexResult {
        // Scan source into tokens
        let mut scanner = Scanner::new(source.to_string());
        let tokens = scanner.scan_tokens().to_vec();
        debug!("scanned {} tokens", tokens.len());

        // Parse tokens into statements. The parse runs even when scanning
        // reported errors so a single pass surfaces lexical and syntax
        // diagnostics together
        let mut parser = Parser::new(tokens);
        let (statements, parse_errors) = if is_repl {
            parser.parse_repl()
        } else {
            parser.parse()
        };
        debug!("parsed {} statements", statements.len());

        let diagnostics: Vec<CompileError> = scanner
            .errors()
            .iter()
            .cloned()
            .map(CompileError::Scan)
            .chain(parse_errors.into_iter().map(CompileError::Parse))
            .collect();

        // Any compile error suppresses execution entirely
        if !diagnostics.is_empty() {
            return Err(VexError::Compile(diagnostics));
        }

        // Interpret statements
        if is_repl {
            self.interpreter.interpret_repl(&statements)?;
        } else {
            self.interpreter.interpret(&statements)?;
        }

        Ok(())
    }
}

#[derive(Debug)]
pub enum VexError {
    Compile(Vec<CompileError>),
    Runtime(RuntimeError),
}

impl From<RuntimeError> for VexError {
    fn from(err: RuntimeError) -> Self {
        VexError::Runtime(err)
    }
}

impl Error for VexError {}

impl fmt::Display for VexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VexError::Compile(diagnostics) => {
                for (i, diagnostic) in diagnostics.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", diagnostic)?;
                }
                Ok(())
            }
            VexError::Runtime(err) => write!(f, "{}", err),
        }
    }
}

#[derive(Debug, Clone)]
pub enum CompileError {
    Scan(ScanError),
    Parse(ParseError),
}

impl Error for CompileError {}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Scan(err) => write!(f, "{}", err),
            CompileError::Parse(err) => write!(f, "{}", err),
        }
    }
}
