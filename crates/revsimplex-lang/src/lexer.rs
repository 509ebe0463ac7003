use std::str::Chars;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Ident,
    Number,

    // Punctuation
    Equals,
    Comma,

    // Delimiters
    LBracket,
    RBracket,
    LParen,
    RParen,

    // Special
    Newline,
    Comment,
    Eof,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, text: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
        }
    }
}

pub struct Lexer<'a> {
    source: &'a str,
    chars: Chars<'a>,
    pos: usize,
    current: Option<char>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut chars = source.chars();
        let current = chars.next();
        Self {
            source,
            chars,
            pos: 0,
            current,
        }
    }

    pub fn tokenize(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.current;
        self.current = self.chars.next();
        if let Some(c) = c {
            self.pos += c.len_utf8();
        }
        c
    }

    fn peek(&self) -> Option<char> {
        self.current
    }

    /// The character after the current one
    fn peek_next(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn skip_line_comment(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        Token::new(
            TokenKind::Comment,
            Span::new(start, self.pos),
            &self.source[start..self.pos],
        )
    }

    fn eat_digits(&mut self) -> usize {
        let mut count = 0;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
                count += 1;
            } else {
                break;
            }
        }
        count
    }

    /// `[+-]? digits? (. digits)? ([eE] [+-]? digits)?`, with at least one mantissa digit
    fn read_number(&mut self) -> Token {
        let start = self.pos;

        if matches!(self.peek(), Some('-') | Some('+')) {
            self.advance();
        }

        let mut digits = self.eat_digits();

        if self.peek() == Some('.') {
            self.advance();
            digits += self.eat_digits();
        }

        if digits == 0 {
            return Token::new(
                TokenKind::Error,
                Span::new(start, self.pos),
                &self.source[start..self.pos],
            );
        }

        // Exponent, only when digits follow
        if matches!(self.peek(), Some('e') | Some('E')) {
            let mut chars = self.chars.clone();
            let has_exponent = match chars.next() {
                Some('+') | Some('-') => chars.next().is_some_and(|c| c.is_ascii_digit()),
                Some(c) => c.is_ascii_digit(),
                None => false,
            };
            if has_exponent {
                self.advance(); // e
                if matches!(self.peek(), Some('-') | Some('+')) {
                    self.advance();
                }
                self.eat_digits();
            }
        }

        Token::new(
            TokenKind::Number,
            Span::new(start, self.pos),
            &self.source[start..self.pos],
        )
    }

    fn read_ident(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
        Token::new(
            TokenKind::Ident,
            Span::new(start, self.pos),
            &self.source[start..self.pos],
        )
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let start = self.pos;
        self.advance();
        Token::new(kind, Span::new(start, self.pos), &self.source[start..self.pos])
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.pos;

        let Some(c) = self.peek() else {
            return Token::new(TokenKind::Eof, Span::new(start, start), "");
        };

        match c {
            '\n' => self.single(TokenKind::Newline),
            '#' => self.skip_line_comment(),
            '/' if self.peek_next() == Some('/') => self.skip_line_comment(),
            '=' => self.single(TokenKind::Equals),
            ',' => self.single(TokenKind::Comma),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '-' | '+' | '.' => self.read_number(),
            c if c.is_ascii_digit() => self.read_number(),
            c if c.is_alphabetic() || c == '_' => self.read_ident(),
            _ => self.single(TokenKind::Error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source).iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_assignment_line() {
        assert_eq!(
            kinds("c = [1, -2]"),
            vec![
                TokenKind::Ident,
                TokenKind::Equals,
                TokenKind::LBracket,
                TokenKind::Number,
                TokenKind::Comma,
                TokenKind::Number,
                TokenKind::RBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let tokens = Lexer::tokenize("100 8.5 -20 0.005 .5 1e-3 2.5E+4 +7 3.");
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["100", "8.5", "-20", "0.005", ".5", "1e-3", "2.5E+4", "+7", "3.", ""]
        );
        assert!(tokens[..9].iter().all(|t| t.kind == TokenKind::Number));
    }

    #[test]
    fn test_exponent_needs_digits() {
        let tokens = Lexer::tokenize("2e");
        assert_eq!(tokens[0].text, "2");
        assert_eq!(tokens[1].kind, TokenKind::Ident);
    }

    #[test]
    fn test_lone_sign_is_error() {
        assert_eq!(kinds("- ,"), vec![TokenKind::Error, TokenKind::Comma, TokenKind::Eof]);
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            kinds("# header\nA = [] // trailing"),
            vec![
                TokenKind::Comment,
                TokenKind::Newline,
                TokenKind::Ident,
                TokenKind::Equals,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::Comment,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_spans() {
        let tokens = Lexer::tokenize("b = [4]");
        assert_eq!(tokens[0].span, Span::new(0, 1));
        assert_eq!(tokens[2].span, Span::new(4, 5));
        assert_eq!(tokens[3].span, Span::new(5, 6));
        assert_eq!(tokens[4].span, Span::new(6, 7));
    }

    #[test]
    fn test_unknown_character() {
        let tokens = Lexer::tokenize("c = {");
        assert_eq!(tokens[2].kind, TokenKind::Error);
        assert_eq!(tokens[2].text, "{");
    }
}
