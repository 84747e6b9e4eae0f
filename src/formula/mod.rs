//! Arithmetic formula evaluation over a symbol table.
//!
//! Only numeric literals, identifiers, `+ - * /`, parentheses and unary minus
//! are understood. Anything else is a `MalformedFormula`.

pub mod lexer;
pub mod parser;

use crate::error::ScoringError;
use parser::{BinaryOp, Expr};
use std::collections::{BTreeSet, HashMap};

pub type SymbolTable = HashMap<String, f64>;

pub fn compile(expression: &str) -> Result<Expr, ScoringError> {
    let tokens = lexer::tokenize(expression)?;
    parser::parse(&tokens)
}

pub fn evaluate(expression: &str, symbols: &SymbolTable) -> Result<f64, ScoringError> {
    compile(expression)?.evaluate(symbols)
}

impl Expr {
    pub fn evaluate(&self, symbols: &SymbolTable) -> Result<f64, ScoringError> {
        match self {
            Expr::Number(value) => Ok(*value),
            Expr::Symbol(name) => symbols
                .get(name)
                .copied()
                .ok_or_else(|| ScoringError::UnknownSymbol(name.clone())),
            Expr::Neg(operand) => Ok(-operand.evaluate(symbols)?),
            Expr::Binary { op, lhs, rhs } => {
                let left = lhs.evaluate(symbols)?;
                let right = rhs.evaluate(symbols)?;
                let value = match op {
                    BinaryOp::Add => left + right,
                    BinaryOp::Sub => left - right,
                    BinaryOp::Mul => left * right,
                    BinaryOp::Div if right == 0.0 => return Err(ScoringError::DivisionByZero),
                    BinaryOp::Div => left / right,
                };
                if !value.is_finite() {
                    return Err(ScoringError::NonFiniteResult);
                }
                Ok(value)
            }
        }
    }

    /// Identifiers referenced by the expression, sorted.
    pub fn symbols(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Expr::Number(_) => {}
            Expr::Symbol(name) => {
                out.insert(name.as_str());
            }
            Expr::Neg(operand) => operand.collect_symbols(out),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_symbols(out);
                rhs.collect_symbols(out);
            }
        }
    }
}
