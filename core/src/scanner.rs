use unicode_segmentation::UnicodeSegmentation;

use std::error::Error;
use std::fmt;

use crate::token::{Token, TokenType};
use crate::types::Literal;

/// Scans a source string into a token sequence.
///
/// Malformed input never aborts the scan: each problem is recorded as a
/// [`ScanError`] and scanning resumes on the next grapheme, so one pass
/// surfaces every independent lexical error. Callers check [`Scanner::errors`]
/// before acting on the tokens.
pub struct Scanner {
    source: String,
    tokens: Vec<Token>,
    errors: Vec<ScanError>,
    start: usize,
    current: usize,
    line: u32,
}

impl Scanner {
    pub fn new(source: String) -> Self {
        Scanner {
            source,
            tokens: Vec::new(),
            errors: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
        }
    }

    pub fn scan_tokens(&mut self) -> &[Token] {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }

        self.tokens
            .push(Token::new(TokenType::Eof, "".to_string(), None, self.line));

        self.tokens()
    }

    pub fn tokens(&self) -> &[Token] {
        self.tokens.as_slice()
    }

    pub fn errors(&self) -> &[ScanError] {
        self.errors.as_slice()
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.graphemes(true).count()
    }

    fn scan_token(&mut self) {
        match self.advance() {
            // Single character tokens
            "(" => self.add_token(TokenType::LeftParen, None),
            ")" => self.add_token(TokenType::RightParen, None),
            "{" => self.add_token(TokenType::LeftBrace, None),
            "}" => self.add_token(TokenType::RightBrace, None),
            "," => self.add_token(TokenType::Comma, None),
            "." => self.add_token(TokenType::Dot, None),
            "-" => self.add_token(TokenType::Minus, None),
            "+" => self.add_token(TokenType::Plus, None),
            ";" => self.add_token(TokenType::Semicolon, None),
            "*" => self.add_token(TokenType::Star, None),

            // One or two character tokens
            "!" => {
                if self.matches("=") {
                    self.add_token(TokenType::NotEqual, None)
                } else {
                    self.add_token(TokenType::Bang, None)
                }
            }
            "=" => {
                if self.matches("=") {
                    self.add_token(TokenType::EqualEqual, None)
                } else {
                    self.add_token(TokenType::Equal, None)
                }
            }
            ">" => {
                if self.matches("=") {
                    self.add_token(TokenType::GreaterEqual, None)
                } else {
                    self.add_token(TokenType::Greater, None)
                }
            }
            "<" => {
                if self.matches("=") {
                    self.add_token(TokenType::LessEqual, None)
                } else {
                    self.add_token(TokenType::Less, None)
                }
            }

            // Comments
            "/" => {
                if self.matches("/") {
                    while let Some(str) = self.peek() {
                        // A line comment goes until the end of the line
                        if str == "\n" || str == "\r\n" {
                            break;
                        }

                        self.advance();
                    }
                } else if self.matches("*") {
                    self.block_comment();
                } else {
                    self.add_token(TokenType::Slash, None)
                }
            }

            // Ignore whitespace
            " " | "\r" | "\t" => (),

            // Newline
            "\n" | "\r\n" => self.line += 1,

            r#"""# => self.string(),

            str => {
                if Scanner::is_digit(str) {
                    self.number()
                } else if Scanner::is_alpha(str) {
                    self.identifier()
                } else {
                    self.error(self.line, ScanErrorKind::UnexpectedCharacter)
                }
            }
        }
    }

    fn block_comment(&mut self) {
        // A block comment runs to the first "*/" and does not nest; an inner
        // "/*" has no significance
        let mut terminated = false;

        while !self.is_at_end() {
            match (self.peek(), self.peek_next()) {
                (Some("*"), Some("/")) => {
                    self.advance();
                    self.advance();
                    terminated = true;
                    break;
                }
                (Some("\n"), _) | (Some("\r\n"), _) => {
                    self.line += 1;
                    self.advance();
                }
                _ => {
                    self.advance();
                }
            }
        }

        if !terminated {
            self.error(self.line, ScanErrorKind::UnterminatedBlockComment);
        }
    }

    fn number(&mut self) {
        while let Some(str) = self.peek() {
            if !Scanner::is_digit(str) {
                break;
            }
            self.advance();
        }

        // Look for a fractional part; a "." not followed by a digit is left
        // for the next scan loop iteration to pick up as Dot
        if let Some(".") = self.peek() {
            if let Some(str) = self.peek_next() {
                if Scanner::is_digit(str) {
                    // Consume .
                    self.advance();

                    while let Some(str) = self.peek() {
                        if !Scanner::is_digit(str) {
                            break;
                        }
                        self.advance();
                    }
                }
            }
        }

        let literal_length = self.current - self.start;
        let number_literal = Literal::Number(
            self.source
                .graphemes(true)
                .skip(self.start)
                .take(literal_length)
                .collect::<String>()
                .parse::<f64>()
                .unwrap(),
        );
        self.add_token(TokenType::Number, Some(number_literal))
    }

    fn identifier(&mut self) {
        while let Some(str) = self.peek() {
            if !Scanner::is_alphanumeric(str) {
                break;
            }
            self.advance();
        }

        let identifier_length = self.current - self.start;
        let identifier = self
            .source
            .graphemes(true)
            .skip(self.start)
            .take(identifier_length)
            .collect::<String>();

        let token_type = match identifier.as_str() {
            "and" => TokenType::And,
            "class" => TokenType::Class,
            "else" => TokenType::Else,
            "false" => TokenType::False,
            "for" => TokenType::For,
            "fun" => TokenType::Fun,
            "if" => TokenType::If,
            "nil" => TokenType::Nil,
            "or" => TokenType::Or,
            "print" => TokenType::Print,
            "return" => TokenType::Return,
            "super" => TokenType::Super,
            "this" => TokenType::This,
            "true" => TokenType::True,
            "var" => TokenType::Var,
            "while" => TokenType::While,
            _ => TokenType::Identifier,
        };

        self.add_token(token_type, None)
    }

    fn is_digit(str: &str) -> bool {
        str.bytes().all(|c| c.is_ascii_digit())
    }

    fn is_alpha(str: &str) -> bool {
        str.bytes().all(|c| c.is_ascii_alphabetic()) || str == "_"
    }

    fn is_alphanumeric(str: &str) -> bool {
        str.bytes().all(|c| c.is_ascii_alphanumeric()) || str == "_"
    }

    fn string(&mut self) {
        // An unterminated string is reported at the line where it opened,
        // not where the scan ran out of input
        let opening_line = self.line;

        while let Some(str) = self.peek() {
            if str == r#"""# {
                break;
            }

            if str == "\n" || str == "\r\n" {
                self.line += 1;
            }

            self.advance();
        }

        if self.is_at_end() {
            self.error(opening_line, ScanErrorKind::UnterminatedString);
            return;
        }

        // Consume the closing "
        self.advance();

        // Trim surrounding quotes
        let literal_length = (self.current - 1) - (self.start + 1);
        let string_literal = Literal::String(
            self.source
                .graphemes(true)
                .skip(self.start + 1)
                .take(literal_length)
                .collect(),
        );
        self.add_token(TokenType::String, Some(string_literal))
    }

    fn peek(&self) -> Option<&str> {
        self.source.graphemes(true).nth(self.current)
    }

    fn peek_next(&self) -> Option<&str> {
        self.source.graphemes(true).nth(self.current + 1)
    }

    fn matches(&mut self, expected: &str) -> bool {
        if self.is_at_end() {
            return false;
        }

        if let Some(str) = self.source.graphemes(true).nth(self.current) {
            if str != expected {
                return false;
            }
        }

        self.current += 1;

        true
    }

    fn advance(&mut self) -> &str {
        // SAFETY: By construction advance() is only called after checking if is_at_end()
        let grapheme = unsafe {
            self.source
                .graphemes(true)
                .nth(self.current)
                .unwrap_unchecked()
        };
        self.current += 1;
        grapheme
    }

    fn add_token(&mut self, token_type: TokenType, literal: Option<Literal>) {
        let lexeme_length = self.current - self.start;
        let lexeme = self
            .source
            .graphemes(true)
            .skip(self.start)
            .take(lexeme_length)
            .collect();
        self.tokens
            .push(Token::new(token_type, lexeme, literal, self.line));
    }

    fn error(&mut self, line: u32, kind: ScanErrorKind) {
        self.errors.push(ScanError::new(line, kind));
    }
}

#[derive(Debug, Clone)]
pub struct ScanError {
    line: u32,
    kind: ScanErrorKind,
}

impl ScanError {
    pub fn new(line: u32, kind: ScanErrorKind) -> Self {
        ScanError { line, kind }
    }
}

impl Error for ScanError {}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error: {}", self.line, self.kind)
    }
}

#[derive(Debug, Clone)]
pub enum ScanErrorKind {
    UnexpectedCharacter,
    UnterminatedString,
    UnterminatedBlockComment,
}

impl fmt::Display for ScanErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self {
            Self::UnexpectedCharacter => write!(f, "Unexpected character."),
            Self::UnterminatedString => write!(f, "Unterminated string."),
            Self::UnterminatedBlockComment => write!(f, "Unterminated block comment."),
        }
    }
}
