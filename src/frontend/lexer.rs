use crate::frontend::token::{lookup_ident, Token};

#[derive(Debug, Clone)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

#[derive(Debug, Clone)]
pub struct Spanned {
    pub token: Token,
    pub span: Span,
}

#[derive(Debug)]
pub struct LexerError {
    pub message: String,
    pub line: usize,
    pub col: usize,
}

impl std::fmt::Display for LexerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.col, self.message)
    }
}

impl std::error::Error for LexerError {}

pub struct Lexer {
    source: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn current(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.current();
        if ch == Some('\n') {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        self.pos += 1;
        ch
    }

    fn span(&self) -> Span {
        Span {
            line: self.line,
            col: self.col,
        }
    }

    fn error(&self, message: impl Into<String>) -> LexerError {
        LexerError {
            message: message.into(),
            line: self.line,
            col: self.col,
        }
    }

    /// Whitespace and `#` line comments carry no tokens.
    fn skip_whitespace_and_comments(&mut self) {
        while let Some(ch) = self.current() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '#' {
                while let Some(ch) = self.current() {
                    if ch == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    /// Lexes the whole input. The returned stream always ends with `Eof`.
    pub fn tokenize(&mut self) -> Result<Vec<Spanned>, LexerError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments();
            let span = self.span();

            let Some(ch) = self.current() else {
                tokens.push(Spanned {
                    token: Token::Eof,
                    span,
                });
                return Ok(tokens);
            };

            let token = match ch {
                '=' => self.either('=', Token::Eq, Token::Assign),
                '+' => self.either('=', Token::AddAssign, Token::Plus),
                '-' => self.either('=', Token::SubAssign, Token::Minus),
                '*' => self.either('=', Token::MulAssign, Token::Star),
                '/' => self.either('=', Token::DivAssign, Token::Slash),
                '!' => self.either('=', Token::NotEq, Token::Bang),
                '<' => self.either('=', Token::LtEq, Token::Lt),
                '>' => self.either('=', Token::GtEq, Token::Gt),
                '&' => self.pair('&', Token::And)?,
                '|' => self.pair('|', Token::Or)?,
                ',' => self.single(Token::Comma),
                ';' => self.single(Token::Semicolon),
                ':' => self.single(Token::Colon),
                '(' => self.single(Token::LParen),
                ')' => self.single(Token::RParen),
                '{' => self.single(Token::LBrace),
                '}' => self.single(Token::RBrace),
                '[' => self.single(Token::LBracket),
                ']' => self.single(Token::RBracket),
                '"' => self.read_string()?,
                ch if ch.is_ascii_digit() => self.read_number()?,
                ch if is_ident_char(ch) => self.read_ident(),
                other => {
                    return Err(self.error(format!("unexpected character: {:?}", other)));
                }
            };

            tokens.push(Spanned { token, span });
        }
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    /// Consumes one character, plus a second one when it matches `next`.
    fn either(&mut self, next: char, matched: Token, single: Token) -> Token {
        self.advance();
        if self.current() == Some(next) {
            self.advance();
            matched
        } else {
            single
        }
    }

    /// Consumes a two-character operator whose halves must match, like `&&`.
    fn pair(&mut self, next: char, token: Token) -> Result<Token, LexerError> {
        let first = self.current();
        self.advance();
        if self.current() == Some(next) {
            self.advance();
            Ok(token)
        } else {
            Err(self.error(format!(
                "unexpected character: {:?}",
                first.unwrap_or_default()
            )))
        }
    }

    fn read_string(&mut self) -> Result<Token, LexerError> {
        let start_line = self.line;
        let start_col = self.col;
        self.advance();

        let mut string = String::new();
        loop {
            match self.current() {
                Some('"') => {
                    self.advance();
                    return Ok(Token::Str(string));
                }
                Some('\\') => {
                    self.advance();
                    match self.current() {
                        Some('n') => string.push('\n'),
                        Some('t') => string.push('\t'),
                        Some('r') => string.push('\r'),
                        Some('\\') => string.push('\\'),
                        Some('"') => string.push('"'),
                        Some('0') => string.push('\0'),
                        Some(ch) => {
                            return Err(self.error(format!("unknown escape sequence: \\{}", ch)));
                        }
                        None => {
                            return Err(self.error("unexpected EOF in escape sequence"));
                        }
                    }
                    self.advance();
                }
                Some(ch) => {
                    string.push(ch);
                    self.advance();
                }
                None => {
                    return Err(LexerError {
                        message: "unterminated string literal".to_string(),
                        line: start_line,
                        col: start_col,
                    });
                }
            }
        }
    }

    fn read_number(&mut self) -> Result<Token, LexerError> {
        let start_line = self.line;
        let start_col = self.col;

        // Hex: 0x... or 0X...
        if self.current() == Some('0') && matches!(self.peek(), Some('x') | Some('X')) {
            self.advance();
            self.advance();

            let mut hex = String::new();
            while let Some(ch) = self.current() {
                if ch.is_ascii_hexdigit() {
                    hex.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }

            if hex.is_empty() {
                return Err(LexerError {
                    message: "expected hex digits after 0x".to_string(),
                    line: start_line,
                    col: start_col,
                });
            }

            let value = i64::from_str_radix(&hex, 16).map_err(|_| LexerError {
                message: format!("invalid hex number: 0x{}", hex),
                line: start_line,
                col: start_col,
            })?;

            return Ok(Token::Integer(value));
        }

        let mut digits = String::new();
        let mut has_dot = false;

        while let Some(ch) = self.current() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                self.advance();
            } else if ch == '.' && !has_dot {
                // A '.' only belongs to the number when a digit follows.
                if self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                    has_dot = true;
                    digits.push('.');
                    self.advance();
                } else {
                    break;
                }
            } else {
                break;
            }
        }

        if has_dot {
            let value = digits.parse::<f64>().map_err(|_| LexerError {
                message: format!("invalid float literal: {}", digits),
                line: start_line,
                col: start_col,
            })?;
            Ok(Token::Float(value))
        } else {
            let value = digits.parse::<i64>().map_err(|_| LexerError {
                message: format!("invalid integer literal: {}", digits),
                line: start_line,
                col: start_col,
            })?;
            Ok(Token::Integer(value))
        }
    }

    fn read_ident(&mut self) -> Token {
        let mut word = String::new();
        while let Some(ch) = self.current() {
            if is_ident_char(ch) || ch.is_ascii_digit() {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        lookup_ident(&word)
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}
