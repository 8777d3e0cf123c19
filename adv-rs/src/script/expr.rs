//! Expression AST and evaluator.
//!
//! Operator precedence is expressed as a priority number where *lower binds
//! tighter*:
//!
//! | priority | operators |
//! |---|---|
//! | 1 | unary `+ - not` |
//! | 2 | `^` |
//! | 3 | `* / % div mod` |
//! | 4 | `+ -` |
//! | 5 | `..` |
//! | 6 | `< > <= >=` |
//! | 7 | `= <>` |
//! | 8 | `and` |
//! | 9 | `xor` |
//! | 10 | `or` |

use super::builtins::Builtin;
use super::error::{RuntimeError, ScriptError};
use super::value::Value;

// ── EvalContext ───────────────────────────────────────────────────────────────

/// Dependency-injection interface used by the evaluator.
///
/// [`Interpreter`](super::interp::Interpreter) implements this over the
/// game and the play context.
pub trait EvalContext {
    /// Read a variable; unknown names read as the default value.
    fn get_var(&self, name: &str) -> Value;

    fn set_var(&mut self, name: &str, value: Value);

    /// Invoke a built-in.  Arguments arrive unevaluated because some
    /// built-ins take a bare identifier as a name.
    fn call_fn(&mut self, func: Builtin, args: &[Expr]) -> Result<Value, ScriptError>;
}

// ── Operators ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Neg,
    Not,
}

impl UnaryOp {
    pub const PRIORITY: u8 = 1;

    pub fn from_token(tok: &str) -> Option<Self> {
        match tok {
            "+" => Some(UnaryOp::Plus),
            "-" => Some(UnaryOp::Neg),
            "not" => Some(UnaryOp::Not),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Pow,
    Mul,
    Div,
    Rem,
    IntDiv,
    Mod,
    Add,
    Sub,
    Range,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    And,
    Xor,
    Or,
}

impl BinOp {
    pub fn from_token(tok: &str) -> Option<Self> {
        Some(match tok {
            "^" => BinOp::Pow,
            "*" => BinOp::Mul,
            "/" => BinOp::Div,
            "%" => BinOp::Rem,
            "div" => BinOp::IntDiv,
            "mod" => BinOp::Mod,
            "+" => BinOp::Add,
            "-" => BinOp::Sub,
            ".." => BinOp::Range,
            "<" => BinOp::Lt,
            ">" => BinOp::Gt,
            "<=" => BinOp::Le,
            ">=" => BinOp::Ge,
            "=" => BinOp::Eq,
            "<>" => BinOp::Ne,
            "and" => BinOp::And,
            "xor" => BinOp::Xor,
            "or" => BinOp::Or,
            _ => return None,
        })
    }

    pub fn priority(self) -> u8 {
        match self {
            BinOp::Pow => 2,
            BinOp::Mul | BinOp::Div | BinOp::Rem | BinOp::IntDiv | BinOp::Mod => 3,
            BinOp::Add | BinOp::Sub => 4,
            BinOp::Range => 5,
            BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => 6,
            BinOp::Eq | BinOp::Ne => 7,
            BinOp::And => 8,
            BinOp::Xor => 9,
            BinOp::Or => 10,
        }
    }
}

// ── AST ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Var(String),
    Call(Builtin, Vec<Expr>),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary(op, Box::new(operand))
    }

    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }
}

// ── Evaluator ─────────────────────────────────────────────────────────────────

pub fn eval_expr(expr: &Expr, ctx: &mut dyn EvalContext) -> Result<Value, ScriptError> {
    match expr {
        Expr::Literal(v) => Ok(v.clone()),
        Expr::Var(name) => Ok(ctx.get_var(name)),
        Expr::Call(func, args) => ctx.call_fn(*func, args),
        Expr::Unary(op, operand) => {
            let v = eval_expr(operand, ctx)?;
            Ok(match op {
                UnaryOp::Plus => v,
                UnaryOp::Neg => v.arith_neg(),
                UnaryOp::Not => Value::Bool(!v.as_bool()),
            })
        }
        Expr::Binary(op, lhs, rhs) => {
            // Both sides are always evaluated: `and`/`or` do not short-circuit.
            let l = eval_expr(lhs, ctx)?;
            let r = eval_expr(rhs, ctx)?;
            eval_binary(*op, &l, &r)
        }
    }
}

fn eval_binary(op: BinOp, l: &Value, r: &Value) -> Result<Value, ScriptError> {
    use std::cmp::Ordering::*;

    let by_zero = || ScriptError::from(RuntimeError::DivisionByZero);
    let ord = || l.cmp_value(r);
    Ok(match op {
        BinOp::Pow => l.arith_pow(r),
        BinOp::Mul => l.arith_mul(r),
        BinOp::Div => l.arith_div(r).ok_or_else(by_zero)?,
        BinOp::Rem => l.arith_rem(r).ok_or_else(by_zero)?,
        BinOp::IntDiv => l.int_div(r).ok_or_else(by_zero)?,
        BinOp::Mod => l.int_rem(r).ok_or_else(by_zero)?,
        BinOp::Add => l.arith_add(r),
        BinOp::Sub => l.arith_sub(r),
        // Parsed with a precedence but has no meaning yet.
        BinOp::Range => Value::default(),
        BinOp::Lt => Value::Bool(ord() == Some(Less)),
        BinOp::Gt => Value::Bool(ord() == Some(Greater)),
        BinOp::Le => Value::Bool(matches!(ord(), Some(Less | Equal))),
        BinOp::Ge => Value::Bool(matches!(ord(), Some(Greater | Equal))),
        BinOp::Eq => Value::Bool(ord() == Some(Equal)),
        BinOp::Ne => Value::Bool(ord() != Some(Equal)),
        BinOp::And => Value::Bool(l.as_bool() && r.as_bool()),
        BinOp::Xor => Value::Bool(l.as_bool() ^ r.as_bool()),
        BinOp::Or => Value::Bool(l.as_bool() || r.as_bool()),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
