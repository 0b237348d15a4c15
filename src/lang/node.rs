use std::fmt;

/// A complete parsed program: a sequence of top-level statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// A `{ ... }` block as used by `if` arms and function bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `let name = value;` — also produced by the parser for bare
    /// assignments and compound assignments, which desugar to bindings.
    Let { name: String, value: Expr },
    Return(Expr),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    Integer(i64),
    Float(f64),
    Str(String),
    Boolean(bool),
    Nil,
    Prefix {
        operator: String,
        right: Box<Expr>,
    },
    Infix {
        operator: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    If {
        condition: Box<Expr>,
        consequence: BlockStmt,
        alternative: Option<BlockStmt>,
    },
    /// `fn(params) { body }`. `name` is filled in by the parser when the
    /// literal is the right-hand side of a binding, so the compiler can make
    /// the binding visible to the body.
    Function {
        name: Option<String>,
        parameters: Vec<String>,
        body: BlockStmt,
    },
    Call {
        function: Box<Expr>,
        arguments: Vec<Expr>,
    },
    Array(Vec<Expr>),
    /// Pairs in source order; the compiler sorts by printed key form.
    Hash(Vec<(Expr, Expr)>),
    Index {
        left: Box<Expr>,
        index: Box<Expr>,
    },
    /// `macro(params) { body }` — consumed by the macro expander, rejected
    /// by the bytecode compiler.
    Macro {
        parameters: Vec<String>,
        body: BlockStmt,
    },
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

impl fmt::Display for BlockStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Let { name, value } => write!(f, "let {} = {};", name, value),
            Stmt::Return(value) => write!(f, "return {};", value),
            Stmt::Expr(expr) => write!(f, "{}", expr),
        }
    }
}

impl fmt::Display for Expr {
    /// Prints an expression in a canonical, fully parenthesized form.
    ///
    /// The compiler relies on this form being deterministic: hash literal
    /// keys are sorted by their printed representation before emission.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(name) => write!(f, "{}", name),
            Expr::Integer(value) => write!(f, "{}", value),
            Expr::Float(value) => write!(f, "{}", value),
            Expr::Str(value) => write!(f, "{}", value),
            Expr::Boolean(value) => write!(f, "{}", value),
            Expr::Nil => write!(f, "nil"),
            Expr::Prefix { operator, right } => write!(f, "({}{})", operator, right),
            Expr::Infix {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
            Expr::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if{} {}", condition, consequence)?;
                if let Some(alt) = alternative {
                    write!(f, "else {}", alt)?;
                }
                Ok(())
            }
            Expr::Function {
                name,
                parameters,
                body,
            } => {
                write!(f, "fn")?;
                if let Some(name) = name {
                    write!(f, "<{}>", name)?;
                }
                write!(f, "({}) {}", parameters.join(", "), body)
            }
            Expr::Call {
                function,
                arguments,
            } => {
                let args: Vec<String> = arguments.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", function, args.join(", "))
            }
            Expr::Array(elements) => {
                let elems: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", elems.join(", "))
            }
            Expr::Hash(pairs) => {
                let pairs: Vec<String> =
                    pairs.iter().map(|(k, v)| format!("{}:{}", k, v)).collect();
                write!(f, "{{{}}}", pairs.join(", "))
            }
            Expr::Index { left, index } => write!(f, "({}[{}])", left, index),
            Expr::Macro { parameters, body } => {
                write!(f, "macro({}) {}", parameters.join(", "), body)
            }
        }
    }
}
