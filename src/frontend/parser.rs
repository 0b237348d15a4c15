use crate::frontend::lexer::{Span, Spanned};
use crate::frontend::parser_error::ParserError;
use crate::frontend::token::Token;
use crate::lang::node::{BlockStmt, Expr, Program, Stmt};

/// Binding strength, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    /// `||`
    Or,
    /// `&&`
    And,
    /// `==`, `!=`
    Equals,
    /// `<`, `>`, `<=`, `>=`
    LessGreater,
    /// `+`, `-`
    Sum,
    /// `*`, `/`
    Product,
    /// `-x`, `!x`
    Prefix,
    /// `f(x)`
    Call,
    /// `a[x]`
    Index,
}

fn precedence_of(token: &Token) -> Precedence {
    match token {
        Token::Or => Precedence::Or,
        Token::And => Precedence::And,
        Token::Eq | Token::NotEq => Precedence::Equals,
        Token::Lt | Token::Gt | Token::LtEq | Token::GtEq => Precedence::LessGreater,
        Token::Plus | Token::Minus => Precedence::Sum,
        Token::Star | Token::Slash => Precedence::Product,
        Token::LParen => Precedence::Call,
        Token::LBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

fn operator_str(token: &Token) -> &'static str {
    match token {
        Token::Plus => "+",
        Token::Minus => "-",
        Token::Star => "*",
        Token::Slash => "/",
        Token::Lt => "<",
        Token::Gt => ">",
        Token::LtEq => "<=",
        Token::GtEq => ">=",
        Token::Eq => "==",
        Token::NotEq => "!=",
        Token::And => "&&",
        Token::Or => "||",
        _ => "",
    }
}

/// Pratt parser over the lexed token stream.
///
/// Errors do not abort parsing; they accumulate in `errors` and the parser
/// resynchronizes at the next statement, so one pass reports as much as it
/// can.
pub struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    errors: Vec<ParserError>,
}

impl Parser {
    pub fn new(tokens: Vec<Spanned>) -> Self {
        let tokens = if tokens.is_empty() {
            vec![Spanned {
                token: Token::Eof,
                span: Span { line: 1, col: 1 },
            }]
        } else {
            tokens
        };

        Parser {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    pub fn errors(&self) -> &[ParserError] {
        &self.errors
    }

    fn cur(&self) -> &Token {
        &self.tokens[self.pos].token
    }

    fn peek(&self) -> &Token {
        let peek_pos = (self.pos + 1).min(self.tokens.len() - 1);
        &self.tokens[peek_pos].token
    }

    /// Advances one token, sticking at the trailing `Eof`.
    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn cur_is(&self, token: &Token) -> bool {
        self.cur() == token
    }

    fn peek_is(&self, token: &Token) -> bool {
        self.peek() == token
    }

    fn cur_precedence(&self) -> Precedence {
        precedence_of(self.cur())
    }

    fn peek_precedence(&self) -> Precedence {
        precedence_of(self.peek())
    }

    fn cur_span(&self) -> &Span {
        &self.tokens[self.pos].span
    }

    fn error_here(&mut self, message: impl Into<String>) {
        let span = self.cur_span().clone();
        self.errors.push(ParserError {
            message: message.into(),
            line: span.line,
            col: span.col,
        });
    }

    fn peek_error(&mut self, want: &str) {
        let peek_pos = (self.pos + 1).min(self.tokens.len() - 1);
        let spanned = &self.tokens[peek_pos];
        let message = format!(
            "expected next token to be {}, got {} instead",
            want, spanned.token
        );
        let span = spanned.span.clone();
        self.errors.push(ParserError {
            message,
            line: span.line,
            col: span.col,
        });
    }

    fn expect_peek(&mut self, want: &Token) -> bool {
        if self.peek_is(want) {
            self.advance();
            true
        } else {
            self.peek_error(&want.to_string());
            false
        }
    }

    fn expect_peek_ident(&mut self) -> Option<String> {
        if let Token::Ident(name) = self.peek() {
            let name = name.clone();
            self.advance();
            Some(name)
        } else {
            self.peek_error("identifier");
            None
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.cur_is(&Token::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.advance();
        }

        Program { statements }
    }

    fn parse_statement(&mut self) -> Option<Stmt> {
        match self.cur() {
            Token::Let => self.parse_let_statement(),
            Token::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Stmt> {
        let name = self.expect_peek_ident()?;

        if !self.expect_peek(&Token::Assign) {
            return None;
        }
        self.advance();

        let mut value = self.parse_expression(Precedence::Lowest)?;

        // The binding name travels with the literal so the compiler can make
        // it visible to the function's own body.
        if let Expr::Function { name: fn_name, .. } = &mut value {
            *fn_name = Some(name.clone());
        }

        while self.peek_is(&Token::Semicolon) {
            self.advance();
        }

        Some(Stmt::Let { name, value })
    }

    fn parse_return_statement(&mut self) -> Option<Stmt> {
        self.advance();

        let value = self.parse_expression(Precedence::Lowest)?;

        while self.peek_is(&Token::Semicolon) {
            self.advance();
        }

        Some(Stmt::Return(value))
    }

    /// An expression statement, or an assignment desugared into a binding:
    /// `x = e` becomes `let x = e`, `x op= e` becomes `let x = x op e`.
    fn parse_expression_statement(&mut self) -> Option<Stmt> {
        let expr = self.parse_expression(Precedence::Lowest)?;

        let compound = match self.peek() {
            Token::Assign => Some(None),
            Token::AddAssign => Some(Some("+")),
            Token::SubAssign => Some(Some("-")),
            Token::MulAssign => Some(Some("*")),
            Token::DivAssign => Some(Some("/")),
            _ => None,
        };

        if let Some(compound) = compound {
            self.advance();
            self.advance();
            let rhs = self.parse_expression(Precedence::Lowest)?;

            let name = match expr {
                Expr::Ident(name) => name,
                other => {
                    self.error_here(format!("invalid assignment target: {}", other));
                    return None;
                }
            };

            let mut value = match compound {
                Some(operator) => Expr::Infix {
                    operator: operator.to_string(),
                    left: Box::new(Expr::Ident(name.clone())),
                    right: Box::new(rhs),
                },
                None => rhs,
            };
            if let Expr::Function { name: fn_name, .. } = &mut value {
                *fn_name = Some(name.clone());
            }

            while self.peek_is(&Token::Semicolon) {
                self.advance();
            }

            return Some(Stmt::Let { name, value });
        }

        if self.peek_is(&Token::Semicolon) {
            self.advance();
        }

        Some(Stmt::Expr(expr))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        let mut left = self.parse_prefix()?;

        while !self.peek_is(&Token::Semicolon) && precedence < self.peek_precedence() {
            left = match self.peek() {
                Token::Plus
                | Token::Minus
                | Token::Star
                | Token::Slash
                | Token::Lt
                | Token::Gt
                | Token::LtEq
                | Token::GtEq
                | Token::Eq
                | Token::NotEq
                | Token::And
                | Token::Or => {
                    self.advance();
                    self.parse_infix_expression(left)?
                }
                Token::LParen => {
                    self.advance();
                    self.parse_call_expression(left)?
                }
                Token::LBracket => {
                    self.advance();
                    self.parse_index_expression(left)?
                }
                _ => return Some(left),
            };
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expr> {
        match self.cur().clone() {
            Token::Ident(name) => Some(Expr::Ident(name)),
            Token::Integer(value) => Some(Expr::Integer(value)),
            Token::Float(value) => Some(Expr::Float(value)),
            Token::Str(value) => Some(Expr::Str(value)),
            Token::True => Some(Expr::Boolean(true)),
            Token::False => Some(Expr::Boolean(false)),
            Token::Nil => Some(Expr::Nil),
            Token::Bang => self.parse_prefix_expression("!"),
            Token::Minus => self.parse_prefix_expression("-"),
            Token::LParen => self.parse_grouped_expression(),
            Token::If => self.parse_if_expression(),
            Token::Function => self.parse_function_literal(),
            Token::Macro => self.parse_macro_literal(),
            Token::LBracket => self.parse_array_literal(),
            Token::LBrace => self.parse_hash_literal(),
            other => {
                self.error_here(format!("no prefix parse function for {} found", other));
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self, operator: &str) -> Option<Expr> {
        self.advance();

        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expr::Prefix {
            operator: operator.to_string(),
            right: Box::new(right),
        })
    }

    fn parse_infix_expression(&mut self, left: Expr) -> Option<Expr> {
        let operator = operator_str(self.cur());
        let precedence = self.cur_precedence();
        self.advance();

        let right = self.parse_expression(precedence)?;
        Some(Expr::Infix {
            operator: operator.to_string(),
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expr> {
        self.advance();

        let expr = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(&Token::RParen) {
            return None;
        }

        Some(expr)
    }

    fn parse_if_expression(&mut self) -> Option<Expr> {
        if !self.expect_peek(&Token::LParen) {
            return None;
        }
        self.advance();

        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(&Token::RParen) {
            return None;
        }
        if !self.expect_peek(&Token::LBrace) {
            return None;
        }

        let consequence = self.parse_block_statement();

        let alternative = if self.peek_is(&Token::Else) {
            self.advance();

            if !self.expect_peek(&Token::LBrace) {
                return None;
            }
            Some(self.parse_block_statement())
        } else {
            None
        };

        Some(Expr::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_block_statement(&mut self) -> BlockStmt {
        let mut statements = Vec::new();
        self.advance();

        while !self.cur_is(&Token::RBrace) && !self.cur_is(&Token::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.advance();
        }

        if self.cur_is(&Token::Eof) {
            self.error_here("unterminated block, expected }");
        }

        BlockStmt { statements }
    }

    fn parse_function_literal(&mut self) -> Option<Expr> {
        if !self.expect_peek(&Token::LParen) {
            return None;
        }

        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(&Token::LBrace) {
            return None;
        }

        let body = self.parse_block_statement();

        Some(Expr::Function {
            name: None,
            parameters,
            body,
        })
    }

    fn parse_macro_literal(&mut self) -> Option<Expr> {
        if !self.expect_peek(&Token::LParen) {
            return None;
        }

        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(&Token::LBrace) {
            return None;
        }

        let body = self.parse_block_statement();

        Some(Expr::Macro { parameters, body })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<String>> {
        let mut parameters = Vec::new();

        if self.peek_is(&Token::RParen) {
            self.advance();
            return Some(parameters);
        }
        self.advance();

        parameters.push(self.cur_ident()?);

        while self.peek_is(&Token::Comma) {
            self.advance();
            self.advance();
            parameters.push(self.cur_ident()?);
        }

        if !self.expect_peek(&Token::RParen) {
            return None;
        }

        Some(parameters)
    }

    fn cur_ident(&mut self) -> Option<String> {
        if let Token::Ident(name) = self.cur() {
            Some(name.clone())
        } else {
            let got = self.cur().to_string();
            self.error_here(format!("expected parameter name, got {}", got));
            None
        }
    }

    fn parse_call_expression(&mut self, function: Expr) -> Option<Expr> {
        let arguments = self.parse_expression_list(Token::RParen)?;
        Some(Expr::Call {
            function: Box::new(function),
            arguments,
        })
    }

    fn parse_index_expression(&mut self, left: Expr) -> Option<Expr> {
        self.advance();

        let index = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(&Token::RBracket) {
            return None;
        }

        Some(Expr::Index {
            left: Box::new(left),
            index: Box::new(index),
        })
    }

    fn parse_array_literal(&mut self) -> Option<Expr> {
        let elements = self.parse_expression_list(Token::RBracket)?;
        Some(Expr::Array(elements))
    }

    fn parse_expression_list(&mut self, end: Token) -> Option<Vec<Expr>> {
        let mut list = Vec::new();

        if self.peek_is(&end) {
            self.advance();
            return Some(list);
        }
        self.advance();

        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(&Token::Comma) {
            self.advance();
            self.advance();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(&end) {
            return None;
        }

        Some(list)
    }

    fn parse_hash_literal(&mut self) -> Option<Expr> {
        let mut pairs = Vec::new();

        while !self.peek_is(&Token::RBrace) {
            self.advance();
            let key = self.parse_expression(Precedence::Lowest)?;

            if !self.expect_peek(&Token::Colon) {
                return None;
            }
            self.advance();

            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));

            if !self.peek_is(&Token::RBrace) && !self.expect_peek(&Token::Comma) {
                return None;
            }
        }

        if !self.expect_peek(&Token::RBrace) {
            return None;
        }

        Some(Expr::Hash(pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer::Lexer;

    fn parse(input: &str) -> Program {
        let tokens = Lexer::new(input).tokenize().expect("lexer error");
        let mut parser = Parser::new(tokens);
        let program = parser.parse_program();
        assert!(
            parser.errors().is_empty(),
            "parser errors for {:?}: {:?}",
            input,
            parser.errors()
        );
        program
    }

    fn parse_single_expr(input: &str) -> Expr {
        let mut program = parse(input);
        assert_eq!(program.statements.len(), 1, "for {:?}", input);
        match program.statements.remove(0) {
            Stmt::Expr(expr) => expr,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_let_statements() {
        let tests = vec![
            ("let x = 5;", "x", "5"),
            ("let y = true;", "y", "true"),
            ("let foobar = y;", "foobar", "y"),
            ("let n = nil;", "n", "nil"),
        ];

        for (input, want_name, want_value) in tests {
            let program = parse(input);
            assert_eq!(program.statements.len(), 1);

            match &program.statements[0] {
                Stmt::Let { name, value } => {
                    assert_eq!(name, want_name);
                    assert_eq!(value.to_string(), want_value);
                }
                other => panic!("expected let statement, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_let_statement_errors() {
        let tokens = Lexer::new("let x 5; let = 10;").tokenize().unwrap();
        let mut parser = Parser::new(tokens);
        parser.parse_program();

        let errors = parser.errors();
        assert!(errors.len() >= 2, "expected errors, got {:?}", errors);
        assert!(errors[0]
            .message
            .contains("expected next token to be ="));
        assert!(errors[1]
            .message
            .contains("expected next token to be identifier"));
    }

    #[test]
    fn test_return_statements() {
        let program = parse("return 5; return 10; return 993322;");
        assert_eq!(program.statements.len(), 3);

        for stmt in &program.statements {
            assert!(matches!(stmt, Stmt::Return(_)), "got {:?}", stmt);
        }
    }

    #[test]
    fn test_literal_expressions() {
        assert_eq!(parse_single_expr("foobar;"), Expr::Ident("foobar".to_string()));
        assert_eq!(parse_single_expr("5;"), Expr::Integer(5));
        assert_eq!(parse_single_expr("5.5;"), Expr::Float(5.5));
        assert_eq!(
            parse_single_expr("\"hello world\";"),
            Expr::Str("hello world".to_string())
        );
        assert_eq!(parse_single_expr("true;"), Expr::Boolean(true));
        assert_eq!(parse_single_expr("false;"), Expr::Boolean(false));
        assert_eq!(parse_single_expr("nil;"), Expr::Nil);
    }

    #[test]
    fn test_prefix_expressions() {
        let tests = vec![
            ("!5;", "!", "5"),
            ("-15;", "-", "15"),
            ("!true;", "!", "true"),
        ];

        for (input, want_op, want_right) in tests {
            match parse_single_expr(input) {
                Expr::Prefix { operator, right } => {
                    assert_eq!(operator, want_op);
                    assert_eq!(right.to_string(), want_right);
                }
                other => panic!("expected prefix expression, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_infix_expressions() {
        let operators = vec![
            "+", "-", "*", "/", "<", ">", "<=", ">=", "==", "!=", "&&", "||",
        ];

        for op in operators {
            let input = format!("5 {} 5;", op);
            let tokens = Lexer::new(&input).tokenize().unwrap();
            let mut parser = Parser::new(tokens);
            let mut program = parser.parse_program();
            assert!(parser.errors().is_empty(), "errors for {:?}", input);

            match program.statements.remove(0) {
                Stmt::Expr(Expr::Infix {
                    operator,
                    left,
                    right,
                }) => {
                    assert_eq!(operator, op);
                    assert_eq!(*left, Expr::Integer(5));
                    assert_eq!(*right, Expr::Integer(5));
                }
                other => panic!("expected infix expression, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_operator_precedence() {
        let tests = vec![
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b / c", "(a + (b / c))"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("3 + 4; -5 * 5", "(3 + 4)((-5) * 5)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5",
                "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
            ),
            ("true", "true"),
            ("3 > 5 == false", "((3 > 5) == false)"),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("2 / (5 + 5)", "(2 / (5 + 5))"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            (
                "add(a + b + c * d / f + g)",
                "add((((a + b) + ((c * d) / f)) + g))",
            ),
            (
                "a * [1, 2, 3, 4][b * c] * d",
                "((a * ([1, 2, 3, 4][(b * c)])) * d)",
            ),
            (
                "add(a * b[2], b[1], 2 * [1, 2][1])",
                "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))",
            ),
            ("a || b && c", "(a || (b && c))"),
            ("a == b && c != d", "((a == b) && (c != d))"),
            ("a && b || c && d", "((a && b) || (c && d))"),
            ("1 <= 2 == true", "((1 <= 2) == true)"),
            ("1 >= 2 || 2 >= 1", "((1 >= 2) || (2 >= 1))"),
        ];

        for (input, want) in tests {
            let program = parse(input);
            assert_eq!(program.to_string(), want, "for {:?}", input);
        }
    }

    #[test]
    fn test_if_expression() {
        match parse_single_expr("if (x < y) { x }") {
            Expr::If {
                condition,
                consequence,
                alternative,
            } => {
                assert_eq!(condition.to_string(), "(x < y)");
                assert_eq!(consequence.statements.len(), 1);
                assert!(alternative.is_none());
            }
            other => panic!("expected if expression, got {:?}", other),
        }
    }

    #[test]
    fn test_if_else_expression() {
        match parse_single_expr("if (x < y) { x } else { y }") {
            Expr::If { alternative, .. } => {
                let alternative = alternative.expect("expected alternative block");
                assert_eq!(alternative.statements.len(), 1);
                assert_eq!(alternative.statements[0].to_string(), "y");
            }
            other => panic!("expected if expression, got {:?}", other),
        }
    }

    #[test]
    fn test_function_literal() {
        match parse_single_expr("fn(x, y) { x + y; }") {
            Expr::Function {
                name,
                parameters,
                body,
            } => {
                assert!(name.is_none());
                assert_eq!(parameters, vec!["x".to_string(), "y".to_string()]);
                assert_eq!(body.statements.len(), 1);
                assert_eq!(body.statements[0].to_string(), "(x + y)");
            }
            other => panic!("expected function literal, got {:?}", other),
        }
    }

    #[test]
    fn test_function_parameters() {
        let tests = vec![
            ("fn() {};", vec![]),
            ("fn(x) {};", vec!["x"]),
            ("fn(x, y, z) {};", vec!["x", "y", "z"]),
        ];

        for (input, want) in tests {
            match parse_single_expr(input) {
                Expr::Function { parameters, .. } => {
                    let want: Vec<String> = want.into_iter().map(String::from).collect();
                    assert_eq!(parameters, want, "for {:?}", input);
                }
                other => panic!("expected function literal, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_call_expression() {
        match parse_single_expr("add(1, 2 * 3, 4 + 5);") {
            Expr::Call {
                function,
                arguments,
            } => {
                assert_eq!(function.to_string(), "add");
                assert_eq!(arguments.len(), 3);
                assert_eq!(arguments[0].to_string(), "1");
                assert_eq!(arguments[1].to_string(), "(2 * 3)");
                assert_eq!(arguments[2].to_string(), "(4 + 5)");
            }
            other => panic!("expected call expression, got {:?}", other),
        }
    }

    #[test]
    fn test_array_literals() {
        match parse_single_expr("[1, 2 * 2, 3 + 3]") {
            Expr::Array(elements) => {
                assert_eq!(elements.len(), 3);
                assert_eq!(elements[1].to_string(), "(2 * 2)");
            }
            other => panic!("expected array literal, got {:?}", other),
        }

        assert_eq!(parse_single_expr("[]"), Expr::Array(vec![]));
    }

    #[test]
    fn test_index_expressions() {
        match parse_single_expr("myArray[1 + 1]") {
            Expr::Index { left, index } => {
                assert_eq!(left.to_string(), "myArray");
                assert_eq!(index.to_string(), "(1 + 1)");
            }
            other => panic!("expected index expression, got {:?}", other),
        }
    }

    #[test]
    fn test_hash_literals() {
        match parse_single_expr("{\"one\": 1, \"two\": 2, \"three\": 3}") {
            Expr::Hash(pairs) => {
                assert_eq!(pairs.len(), 3);
                // Source order is preserved; the compiler sorts later.
                assert_eq!(pairs[0].0.to_string(), "one");
                assert_eq!(pairs[2].1.to_string(), "3");
            }
            other => panic!("expected hash literal, got {:?}", other),
        }

        assert_eq!(parse_single_expr("{}"), Expr::Hash(vec![]));

        match parse_single_expr("{1: 0 + 1, 2: 10 - 8}") {
            Expr::Hash(pairs) => {
                assert_eq!(pairs[0].1.to_string(), "(0 + 1)");
                assert_eq!(pairs[1].1.to_string(), "(10 - 8)");
            }
            other => panic!("expected hash literal, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment_desugars_to_binding() {
        let program = parse("x = 5;");
        assert_eq!(program.statements.len(), 1);
        assert_eq!(program.statements[0].to_string(), "let x = 5;");

        let program = parse("x += 1;");
        assert_eq!(program.statements[0].to_string(), "let x = (x + 1);");

        let program = parse("x -= 1; x *= 2; x /= 3;");
        assert_eq!(program.statements[0].to_string(), "let x = (x - 1);");
        assert_eq!(program.statements[1].to_string(), "let x = (x * 2);");
        assert_eq!(program.statements[2].to_string(), "let x = (x / 3);");
    }

    #[test]
    fn test_bound_functions_carry_their_name() {
        let program = parse("let f = fn(x) { x };");
        match &program.statements[0] {
            Stmt::Let { value, .. } => match value {
                Expr::Function { name, .. } => assert_eq!(name.as_deref(), Some("f")),
                other => panic!("expected function literal, got {:?}", other),
            },
            other => panic!("expected let statement, got {:?}", other),
        }

        let program = parse("g = fn() { 1 };");
        match &program.statements[0] {
            Stmt::Let { value, .. } => match value {
                Expr::Function { name, .. } => assert_eq!(name.as_deref(), Some("g")),
                other => panic!("expected function literal, got {:?}", other),
            },
            other => panic!("expected let statement, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_assignment_target() {
        let tokens = Lexer::new("a[0] = 5;").tokenize().unwrap();
        let mut parser = Parser::new(tokens);
        parser.parse_program();

        assert!(parser
            .errors()
            .iter()
            .any(|e| e.message.contains("invalid assignment target")));
    }

    #[test]
    fn test_macro_literal() {
        match parse_single_expr("macro(x, y) { x + y; }") {
            Expr::Macro { parameters, body } => {
                assert_eq!(parameters, vec!["x".to_string(), "y".to_string()]);
                assert_eq!(body.statements.len(), 1);
                assert_eq!(body.statements[0].to_string(), "(x + y)");
            }
            other => panic!("expected macro literal, got {:?}", other),
        }
    }

    #[test]
    fn test_errors_accumulate() {
        let tokens = Lexer::new("let x 5; let = 10; 838383;").tokenize().unwrap();
        let mut parser = Parser::new(tokens);
        let program = parser.parse_program();

        assert!(parser.errors().len() >= 2);
        // The valid trailing statement still parses.
        assert!(program
            .statements
            .iter()
            .any(|s| s.to_string() == "838383"));
    }
}
