//! Statement AST and block execution.
//!
//! Every statement produces a value: `let` yields what it stored, `if`
//! yields the last value of the block it ran, and loops yield the default.
//! Event handlers ignore these values, but they make `if` usable as the
//! tail of a block.

use super::builtins::Builtin;
use super::error::ScriptError;
use super::expr::{eval_expr, EvalContext, Expr};
use super::value::Value;

/// Loop direction, fixed by `to` or `downto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Let { name: String, value: Expr },
    /// `if` / `else if` arms in source order, then the optional `else`.
    If { branches: Vec<(Expr, Vec<Stmt>)>, otherwise: Option<Vec<Stmt>> },
    While { cond: Expr, body: Vec<Stmt> },
    For { var: String, start: Expr, end: Expr, direction: Direction, body: Vec<Stmt> },
    Call(Builtin, Vec<Expr>),
}

/// Run `block` and return the value of its last statement.
pub fn exec_block(block: &[Stmt], ctx: &mut dyn EvalContext) -> Result<Value, ScriptError> {
    let mut last = Value::default();
    for stmt in block {
        last = exec_stmt(stmt, ctx)?;
    }
    Ok(last)
}

pub fn exec_stmt(stmt: &Stmt, ctx: &mut dyn EvalContext) -> Result<Value, ScriptError> {
    match stmt {
        Stmt::Let { name, value } => {
            let v = eval_expr(value, ctx)?;
            ctx.set_var(name, v.clone());
            Ok(v)
        }

        Stmt::If { branches, otherwise } => {
            for (cond, body) in branches {
                if eval_expr(cond, ctx)?.as_bool() {
                    return exec_block(body, ctx);
                }
            }
            match otherwise {
                Some(body) => exec_block(body, ctx),
                None => Ok(Value::default()),
            }
        }

        Stmt::While { cond, body } => {
            while eval_expr(cond, ctx)?.as_bool() {
                exec_block(body, ctx)?;
            }
            Ok(Value::default())
        }

        Stmt::For { var, start, end, direction, body } => {
            let start = eval_expr(start, ctx)?.as_int();
            let end = eval_expr(end, ctx)?.as_int();
            ctx.set_var(var, Value::Int(start));
            loop {
                // The body may assign the counter; the stored value is what
                // gets tested and stepped.
                let mut counter = ctx.get_var(var);
                let n = counter.as_int();
                let inside = match direction {
                    Direction::Up => n <= end,
                    Direction::Down => n >= end,
                };
                if !inside {
                    break;
                }
                exec_block(body, ctx)?;
                counter = ctx.get_var(var);
                let n = counter.as_int();
                let next = match direction {
                    Direction::Up => n.checked_add(1),
                    Direction::Down => n.checked_sub(1),
                };
                let Some(next) = next else { break };
                counter.set_int(next);
                ctx.set_var(var, counter);
            }
            Ok(Value::default())
        }

        Stmt::Call(func, args) => ctx.call_fn(*func, args),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
