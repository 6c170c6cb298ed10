//! Recursive-descent parser for inline handler bodies.
//!
//! The accepted language is the statement subset inline handlers are
//! usually written in: expression statements, `return`, `throw`, `if` and
//! blocks, with assignment, calls, member access, `!`, `typeof`, unary and
//! binary `+`/`-`, `===`/`!==`, `&&` and `||`.
//!
//! Anything outside that subset (`==`, relational operators, `var`,
//! loops, function literals) is a syntax error here even though it is
//! valid ECMAScript. Embedders that need the full language inject a real
//! engine through [`ScriptCompiler`](crate::ScriptCompiler) and this
//! parser is never consulted.

use crate::compiler::CompileError;
use crate::script::lexer::{Lexeme, Token, tokenize};

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
    Undefined,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Negate,
    TypeOf,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    StrictEquals,
    StrictNotEquals,
    And,
    Or,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MemberProperty {
    Named(String),
    Computed(Box<Expression>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Literal(Literal),
    Identifier(String),
    This,
    Member {
        object: Box<Expression>,
        property: MemberProperty,
    },
    Call {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<Expression>,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Assign {
        target: Box<Expression>,
        value: Box<Expression>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Empty,
    Expression(Expression),
    Return(Option<Expression>),
    Throw(Expression),
    If {
        test: Expression,
        consequent: Box<Statement>,
        alternate: Option<Box<Statement>>,
    },
    Block(Vec<Statement>),
}

/// Words that can never be identifiers. Those without a rule here are
/// reported as unsupported syntax.
const RESERVED: [&str; 32] = [
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "false", "finally", "for", "function", "if", "in", "instanceof", "let", "new", "null",
    "return", "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with",
];

/// Deepest allowed nesting of statements and expressions.
const MAX_NESTING: usize = 128;

struct Parser {
    lexemes: Vec<Lexeme>,
    position: usize,
    depth: usize,
}

impl Parser {
    fn current(&self) -> &Token {
        self.lexemes
            .get(self.position)
            .map_or(&Token::End, |lexeme| &lexeme.token)
    }

    fn newline_before_current(&self) -> bool {
        self.lexemes
            .get(self.position)
            .is_some_and(|lexeme| lexeme.newline_before)
    }

    fn bump(&mut self) -> Token {
        let token = self.current().clone();
        if self.position < self.lexemes.len() {
            self.position = self.position.saturating_add(1);
        }
        token
    }

    fn is_punctuator(&self, punctuator: &str) -> bool {
        matches!(self.current(), Token::Punctuator(found) if *found == punctuator)
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self.current(), Token::Identifier(name) if name == keyword)
    }

    fn eat_punctuator(&mut self, punctuator: &str) -> bool {
        if self.is_punctuator(punctuator) {
            self.bump();
            return true;
        }
        false
    }

    fn unexpected(&self) -> CompileError {
        let offset = self.lexemes.get(self.position).map_or(0, |lexeme| lexeme.offset);
        CompileError::syntax(format!(
            "Unexpected {} (at offset {offset})",
            self.current().describe()
        ))
    }

    fn expect_punctuator(&mut self, punctuator: &str) -> Result<(), CompileError> {
        if self.eat_punctuator(punctuator) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// Statement terminator: `;`, or an implied one before `}`, the end of
    /// input, or a line break.
    fn consume_semicolon(&mut self) -> Result<(), CompileError> {
        if self.eat_punctuator(";")
            || self.is_punctuator("}")
            || *self.current() == Token::End
            || self.newline_before_current()
        {
            return Ok(());
        }
        Err(self.unexpected())
    }

    /// Run `parse` one nesting level deeper, failing past [`MAX_NESTING`].
    fn nested<T>(&mut self, parse: fn(&mut Self) -> Result<T, CompileError>) -> Result<T, CompileError> {
        if self.depth >= MAX_NESTING {
            return Err(CompileError::syntax("Maximum nesting depth exceeded"));
        }
        self.depth = self.depth.saturating_add(1);
        let result = parse(self);
        self.depth = self.depth.saturating_sub(1);
        result
    }

    fn statement(&mut self) -> Result<Statement, CompileError> {
        self.nested(Self::bare_statement)
    }

    fn bare_statement(&mut self) -> Result<Statement, CompileError> {
        if self.eat_punctuator(";") {
            return Ok(Statement::Empty);
        }
        if self.eat_punctuator("{") {
            let mut body = Vec::new();
            while !self.eat_punctuator("}") {
                if *self.current() == Token::End {
                    return Err(self.unexpected());
                }
                body.push(self.statement()?);
            }
            return Ok(Statement::Block(body));
        }
        if self.is_keyword("return") {
            self.bump();
            let value = if self.is_punctuator(";")
                || self.is_punctuator("}")
                || *self.current() == Token::End
                || self.newline_before_current()
            {
                None
            } else {
                Some(self.expression()?)
            };
            self.consume_semicolon()?;
            return Ok(Statement::Return(value));
        }
        if self.is_keyword("throw") {
            self.bump();
            if self.newline_before_current() {
                return Err(CompileError::syntax("Illegal newline after throw"));
            }
            let value = self.expression()?;
            self.consume_semicolon()?;
            return Ok(Statement::Throw(value));
        }
        if self.is_keyword("if") {
            self.bump();
            self.expect_punctuator("(")?;
            let test = self.expression()?;
            self.expect_punctuator(")")?;
            let consequent = Box::new(self.statement()?);
            let alternate = if self.is_keyword("else") {
                self.bump();
                Some(Box::new(self.statement()?))
            } else {
                None
            };
            return Ok(Statement::If {
                test,
                consequent,
                alternate,
            });
        }
        let expression = self.expression()?;
        self.consume_semicolon()?;
        Ok(Statement::Expression(expression))
    }

    fn expression(&mut self) -> Result<Expression, CompileError> {
        self.nested(Self::assignment)
    }

    fn assignment(&mut self) -> Result<Expression, CompileError> {
        let target = self.logical_or()?;
        if !self.is_punctuator("=") {
            return Ok(target);
        }
        if !matches!(target, Expression::Identifier(_) | Expression::Member { .. }) {
            return Err(CompileError::syntax("Invalid left-hand side in assignment"));
        }
        self.bump();
        let value = self.expression()?;
        Ok(Expression::Assign {
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    fn binary_level(
        &mut self,
        operators: &[(&str, BinaryOperator)],
        next: fn(&mut Self) -> Result<Expression, CompileError>,
    ) -> Result<Expression, CompileError> {
        let mut left = next(self)?;
        'operators: loop {
            for (punctuator, operator) in operators {
                if self.eat_punctuator(punctuator) {
                    let right = next(self)?;
                    left = Expression::Binary {
                        operator: *operator,
                        left: Box::new(left),
                        right: Box::new(right),
                    };
                    continue 'operators;
                }
            }
            return Ok(left);
        }
    }

    fn logical_or(&mut self) -> Result<Expression, CompileError> {
        self.binary_level(&[("||", BinaryOperator::Or)], Self::logical_and)
    }

    fn logical_and(&mut self) -> Result<Expression, CompileError> {
        self.binary_level(&[("&&", BinaryOperator::And)], Self::equality)
    }

    fn equality(&mut self) -> Result<Expression, CompileError> {
        self.binary_level(
            &[
                ("===", BinaryOperator::StrictEquals),
                ("!==", BinaryOperator::StrictNotEquals),
            ],
            Self::additive,
        )
    }

    fn additive(&mut self) -> Result<Expression, CompileError> {
        self.binary_level(
            &[("+", BinaryOperator::Add), ("-", BinaryOperator::Subtract)],
            Self::unary,
        )
    }

    fn unary(&mut self) -> Result<Expression, CompileError> {
        let operator = if self.is_punctuator("!") {
            UnaryOperator::Not
        } else if self.is_punctuator("-") {
            UnaryOperator::Negate
        } else if self.is_keyword("typeof") {
            UnaryOperator::TypeOf
        } else {
            return self.postfix();
        };
        self.bump();
        let operand = self.nested(Self::unary)?;
        Ok(Expression::Unary {
            operator,
            operand: Box::new(operand),
        })
    }

    fn postfix(&mut self) -> Result<Expression, CompileError> {
        let mut expression = self.primary()?;
        loop {
            if self.eat_punctuator(".") {
                let Token::Identifier(name) = self.bump() else {
                    return Err(CompileError::syntax("Unexpected token after '.'"));
                };
                expression = Expression::Member {
                    object: Box::new(expression),
                    property: MemberProperty::Named(name),
                };
            } else if self.eat_punctuator("[") {
                let property = self.expression()?;
                self.expect_punctuator("]")?;
                expression = Expression::Member {
                    object: Box::new(expression),
                    property: MemberProperty::Computed(Box::new(property)),
                };
            } else if self.eat_punctuator("(") {
                let mut arguments = Vec::new();
                if !self.eat_punctuator(")") {
                    loop {
                        arguments.push(self.expression()?);
                        if self.eat_punctuator(")") {
                            break;
                        }
                        self.expect_punctuator(",")?;
                    }
                }
                expression = Expression::Call {
                    callee: Box::new(expression),
                    arguments,
                };
            } else {
                return Ok(expression);
            }
        }
    }

    fn primary(&mut self) -> Result<Expression, CompileError> {
        if self.eat_punctuator("(") {
            let inner = self.expression()?;
            self.expect_punctuator(")")?;
            return Ok(inner);
        }
        let expression = match self.current() {
            Token::Number(value) => Expression::Literal(Literal::Number(*value)),
            Token::String(text) => Expression::Literal(Literal::String(text.clone())),
            Token::Identifier(name) => match name.as_str() {
                "true" => Expression::Literal(Literal::Boolean(true)),
                "false" => Expression::Literal(Literal::Boolean(false)),
                "null" => Expression::Literal(Literal::Null),
                "undefined" => Expression::Literal(Literal::Undefined),
                "this" => Expression::This,
                reserved if RESERVED.contains(&reserved) => {
                    return Err(CompileError::syntax(format!("Unexpected token '{reserved}'")));
                }
                identifier => Expression::Identifier(identifier.to_owned()),
            },
            Token::Punctuator(_) | Token::End => return Err(self.unexpected()),
        };
        self.bump();
        Ok(expression)
    }
}

/// A parsed handler body.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub body: Vec<Statement>,
}

/// Parse `source` as a function body.
pub fn parse(source: &str) -> Result<Program, CompileError> {
    let mut parser = Parser {
        lexemes: tokenize(source)?,
        position: 0,
        depth: 0,
    };
    let mut body = Vec::new();
    while *parser.current() != Token::End {
        body.push(parser.statement()?);
    }
    Ok(Program { body })
}
