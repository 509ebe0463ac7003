use crate::ast::*;
use crate::lexer::{Span, Token, TokenKind};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token: expected {expected}, found {found} at position {span:?}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },
    #[error("Unexpected end of file")]
    UnexpectedEof,
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse(source: &str) -> Result<Program, ParseError> {
        let tokens = crate::lexer::Lexer::tokenize(source);
        let mut parser = Parser::new(tokens);
        parser.parse_program()
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> TokenKind {
        self.current().map(|t| t.kind).unwrap_or(TokenKind::Eof)
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn skip_newlines_and_comments(&mut self) {
        while matches!(self.peek_kind(), TokenKind::Newline | TokenKind::Comment) {
            self.advance();
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.current() {
            Some(t) if t.kind != TokenKind::Eof => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: format!("{:?}", t.kind),
                span: t.span,
            },
            _ => ParseError::UnexpectedEof,
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        self.skip_newlines_and_comments();
        match self.current().cloned() {
            Some(t) if t.kind == kind => {
                self.advance();
                Ok(t)
            }
            _ => Err(self.unexpected(&format!("{:?}", kind))),
        }
    }

    fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut assignments = Vec::new();

        loop {
            self.skip_newlines_and_comments();

            match self.peek_kind() {
                TokenKind::Eof => break,
                TokenKind::Ident => assignments.push(self.parse_assignment()?),
                _ => return Err(self.unexpected("assignment")),
            }
        }

        Ok(Program { assignments })
    }

    fn parse_assignment(&mut self) -> Result<Assignment, ParseError> {
        let name = self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::Equals)?;
        let value = self.parse_value()?;

        // One assignment per line
        if self.peek_kind() == TokenKind::Comment {
            self.advance();
        }
        match self.peek_kind() {
            TokenKind::Newline | TokenKind::Eof => {}
            _ => return Err(self.unexpected("end of line")),
        }

        Ok(Assignment {
            span: name.span.merge(value.span()),
            name: name.text,
            value,
        })
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        self.skip_newlines_and_comments();
        match self.peek_kind() {
            TokenKind::Number => self.parse_number(),
            TokenKind::LBracket => self.parse_list(TokenKind::RBracket),
            TokenKind::LParen => self.parse_list(TokenKind::RParen),
            _ => Err(self.unexpected("number or list")),
        }
    }

    fn parse_number(&mut self) -> Result<Value, ParseError> {
        let token = self.expect(TokenKind::Number)?;
        let value: f64 = token
            .text
            .parse()
            .map_err(|_| ParseError::InvalidNumber(token.text.clone()))?;
        Ok(Value::Number {
            span: token.span,
            value,
        })
    }

    /// Comma separated values up to `close`; a trailing comma is allowed.
    fn parse_list(&mut self, close: TokenKind) -> Result<Value, ParseError> {
        let start = self.advance().map(|t| t.span).ok_or(ParseError::UnexpectedEof)?;
        let mut items = Vec::new();

        loop {
            self.skip_newlines_and_comments();
            if self.peek_kind() == close {
                break;
            }
            items.push(self.parse_value()?);

            self.skip_newlines_and_comments();
            if self.peek_kind() == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }

        let end = self.expect(close)?.span;
        Ok(Value::List {
            span: start.merge(end),
            items,
        })
    }
}
