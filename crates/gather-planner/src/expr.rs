//! Expression language for DSL steps.
//!
//! An expression reads the current element `x`, optionally applies one
//! arithmetic operation with a literal, and optionally compares the result
//! with a literal:
//!
//! ```text
//! x [(+|-|*|/|%) literal] [(==|!=|<|<=|>|>=) literal]
//! ```
//!
//! `map` uses transforms (no comparison); predicate steps require one.
//! Integer `/` and `%` are Euclidean, so `x % 2 == 1` holds for every odd `x`.

use std::cmp::Ordering;
use std::fmt;

use gather_core::Number;
use thiserror::Error;

use crate::error::PlanError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Runtime evaluation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("integer division by zero")]
    DivisionByZero,
    #[error("integer overflow")]
    Overflow,
    /// A float result of infinity or NaN; JSON has no spelling for either.
    #[error("non-finite float result")]
    NonFinite,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    arith: Option<(ArithOp, Number)>,
    cmp: Option<(CmpOp, Number)>,
}

impl Expr {
    pub fn parse(src: &str) -> Result<Self, PlanError> {
        let tokens = tokenize(src)?;
        let mut it = tokens.into_iter().peekable();

        match it.next() {
            Some(Token::Var) => {}
            _ => return Err(PlanError::expr(src, "must start with 'x'")),
        }

        let mut arith = None;
        if let Some(Token::Arith(op)) = it.peek().copied() {
            it.next();
            let lit = expect_literal(src, it.next())?;
            arith = Some((op, lit));
        }

        let mut cmp = None;
        if let Some(Token::Cmp(op)) = it.peek().copied() {
            it.next();
            let lit = expect_literal(src, it.next())?;
            cmp = Some((op, lit));
        }

        if let Some(tok) = it.next() {
            return Err(PlanError::expr(src, format!("unexpected {tok}")));
        }
        Ok(Self { arith, cmp })
    }

    /// Parse an expression that yields a number.
    pub fn parse_transform(src: &str) -> Result<Self, PlanError> {
        let e = Self::parse(src)?;
        if e.is_predicate() {
            return Err(PlanError::expr(src, "a transform must not compare"));
        }
        Ok(e)
    }

    /// Parse an expression that yields a boolean.
    pub fn parse_predicate(src: &str) -> Result<Self, PlanError> {
        let e = Self::parse(src)?;
        if !e.is_predicate() {
            return Err(PlanError::expr(src, "a predicate needs a comparison"));
        }
        Ok(e)
    }

    pub fn is_predicate(&self) -> bool {
        self.cmp.is_some()
    }

    /// Arithmetic part only.
    pub fn apply(&self, x: Number) -> Result<Number, EvalError> {
        match self.arith {
            None => Ok(x),
            Some((op, rhs)) => arith(op, x, rhs),
        }
    }

    /// Arithmetic then comparison. Without a comparison every element passes.
    pub fn test(&self, x: Number) -> Result<bool, EvalError> {
        let v = self.apply(x)?;
        Ok(match self.cmp {
            None => true,
            Some((op, rhs)) => op.holds(v.total_cmp(&rhs)),
        })
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("x")?;
        if let Some((op, lit)) = self.arith {
            write!(f, " {op} {lit}")?;
        }
        if let Some((op, lit)) = self.cmp {
            write!(f, " {op} {lit}")?;
        }
        Ok(())
    }
}

impl CmpOp {
    fn holds(self, ord: Ordering) -> bool {
        match self {
            CmpOp::Eq => ord == Ordering::Equal,
            CmpOp::Ne => ord != Ordering::Equal,
            CmpOp::Lt => ord == Ordering::Less,
            CmpOp::Le => ord != Ordering::Greater,
            CmpOp::Gt => ord == Ordering::Greater,
            CmpOp::Ge => ord != Ordering::Less,
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Rem => "%",
        })
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        })
    }
}

fn arith(op: ArithOp, lhs: Number, rhs: Number) -> Result<Number, EvalError> {
    match (lhs, rhs) {
        (Number::Int(a), Number::Int(b)) => {
            if b == 0 && matches!(op, ArithOp::Div | ArithOp::Rem) {
                return Err(EvalError::DivisionByZero);
            }
            let v = match op {
                ArithOp::Add => a.checked_add(b),
                ArithOp::Sub => a.checked_sub(b),
                ArithOp::Mul => a.checked_mul(b),
                ArithOp::Div => a.checked_div_euclid(b),
                ArithOp::Rem => a.checked_rem_euclid(b),
            };
            v.map(Number::Int).ok_or(EvalError::Overflow)
        }
        (a, b) => {
            let (a, b) = (a.as_f64(), b.as_f64());
            let v = match op {
                ArithOp::Add => a + b,
                ArithOp::Sub => a - b,
                ArithOp::Mul => a * b,
                ArithOp::Div => a / b,
                ArithOp::Rem => a.rem_euclid(b),
            };
            if !v.is_finite() {
                return Err(EvalError::NonFinite);
            }
            Ok(Number::Float(v))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Var,
    Lit(Number),
    Arith(ArithOp),
    Cmp(CmpOp),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Var => f.write_str("'x'"),
            Token::Lit(n) => write!(f, "literal {n}"),
            Token::Arith(op) => write!(f, "'{op}'"),
            Token::Cmp(op) => write!(f, "'{op}'"),
        }
    }
}

fn expect_literal(src: &str, tok: Option<Token>) -> Result<Number, PlanError> {
    match tok {
        Some(Token::Lit(n)) => Ok(n),
        Some(other) => Err(PlanError::expr(src, format!("expected a literal, got {other}"))),
        None => Err(PlanError::expr(src, "expected a literal, got end of input")),
    }
}

fn tokenize(src: &str) -> Result<Vec<Token>, PlanError> {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // A '-' directly before a digit is a sign when a literal is expected.
        let expects_literal = matches!(tokens.last(), Some(Token::Arith(_) | Token::Cmp(_)));
        let signed = c == '-'
            && expects_literal
            && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit() || *n == '.');

        if c.is_ascii_digit() || c == '.' || signed {
            let start = i;
            i += 1;
            while i < chars.len() {
                let d = chars[i];
                let exp_sign = (d == '-' || d == '+') && matches!(chars[i - 1], 'e' | 'E');
                if d.is_ascii_digit() || d == '.' || d == 'e' || d == 'E' || exp_sign {
                    i += 1;
                } else {
                    break;
                }
            }
            let text: String = chars[start..i].iter().collect();
            tokens.push(Token::Lit(parse_literal(src, &text)?));
            continue;
        }

        let next = chars.get(i + 1).copied();
        let (tok, width) = match (c, next) {
            ('x', _) => (Token::Var, 1),
            ('=', Some('=')) => (Token::Cmp(CmpOp::Eq), 2),
            ('!', Some('=')) => (Token::Cmp(CmpOp::Ne), 2),
            ('<', Some('=')) => (Token::Cmp(CmpOp::Le), 2),
            ('>', Some('=')) => (Token::Cmp(CmpOp::Ge), 2),
            ('<', _) => (Token::Cmp(CmpOp::Lt), 1),
            ('>', _) => (Token::Cmp(CmpOp::Gt), 1),
            ('+', _) => (Token::Arith(ArithOp::Add), 1),
            ('-', _) => (Token::Arith(ArithOp::Sub), 1),
            ('*', _) => (Token::Arith(ArithOp::Mul), 1),
            ('/', _) => (Token::Arith(ArithOp::Div), 1),
            ('%', _) => (Token::Arith(ArithOp::Rem), 1),
            _ => return Err(PlanError::expr(src, format!("unexpected character '{c}'"))),
        };
        tokens.push(tok);
        i += width;
    }
    Ok(tokens)
}

fn parse_literal(src: &str, text: &str) -> Result<Number, PlanError> {
    let bad = || PlanError::expr(src, format!("bad literal '{text}'"));
    if text.contains(['.', 'e', 'E']) {
        text.parse::<f64>().map(Number::Float).map_err(|_| bad())
    } else {
        text.parse::<i64>().map(Number::Int).map_err(|_| bad())
    }
}
