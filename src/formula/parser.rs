use super::lexer::Token;
use crate::error::ScoringError;

/// Deepest nesting of parentheses and unary minus the parser will follow.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Symbol(String),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

pub fn parse(tokens: &[Token]) -> Result<Expr, ScoringError> {
    if tokens.is_empty() {
        return Err(ScoringError::MalformedFormula(
            "formula is empty".to_string(),
        ));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expr()?;
    if let Some(token) = parser.peek() {
        return Err(ScoringError::MalformedFormula(format!(
            "unexpected {} after end of expression",
            token.describe()
        )));
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expr(&mut self) -> Result<Expr, ScoringError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn term(&mut self) -> Result<Expr, ScoringError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn unary(&mut self) -> Result<Expr, ScoringError> {
        if matches!(self.peek(), Some(Token::Minus)) {
            self.pos += 1;
            self.descend()?;
            let operand = self.unary()?;
            self.depth -= 1;
            return Ok(Expr::Neg(Box::new(operand)));
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<Expr, ScoringError> {
        match self.next() {
            Some(Token::Number(value)) => Ok(Expr::Number(*value)),
            Some(Token::Ident(name)) => Ok(Expr::Symbol(name.clone())),
            Some(Token::LParen) => {
                self.descend()?;
                let inner = self.expr()?;
                self.depth -= 1;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    Some(token) => Err(ScoringError::MalformedFormula(format!(
                        "expected ')' but found {}",
                        token.describe()
                    ))),
                    None => Err(ScoringError::MalformedFormula(
                        "unbalanced parentheses: missing ')'".to_string(),
                    )),
                }
            }
            Some(token) => Err(ScoringError::MalformedFormula(format!(
                "expected a number, identifier or '(' but found {}",
                token.describe()
            ))),
            None => Err(ScoringError::MalformedFormula(
                "unexpected end of formula".to_string(),
            )),
        }
    }

    fn descend(&mut self) -> Result<(), ScoringError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ScoringError::MalformedFormula(format!(
                "formula nests deeper than {MAX_DEPTH} levels"
            )));
        }
        Ok(())
    }
}
