//! Script parser: tokens to [`Game`].
//!
//! Three levels, all recursive descent over the token vector:
//!
//! * declarations: `room <name> : <events> end`, `object <name> : <events> end`
//! * events and statement blocks (`if`, `while`, `for`, `let`, calls)
//! * expressions, by operator precedence with an operator stack and a value
//!   stack
//!
//! Statements inside a block are separated by `,`; a block ends at `end`
//! or `else`.  The first error aborts the whole parse.

use crate::world::{ActionPattern, Entity, EntityKind, Event, Game, Trigger};

use super::builtins::Builtin;
use super::error::ScriptError;
use super::expr::{BinOp, Expr, UnaryOp};
use super::lexer::tokenize;
use super::stmt::{Direction, Stmt};
use super::symbol;
use super::value::Value;

/// Tokens of context quoted in statement-level error messages.
const WINDOW: usize = 8;

/// Parse a whole script.
#[tracing::instrument(level = "trace", skip_all, fields(len = text.len()))]
pub fn parse_script(text: &str) -> Result<Game, ScriptError> {
    let tokens: Vec<String> = tokenize(text)?
        .into_iter()
        .filter(|t| !symbol::is_comment(t))
        .map(|t| if symbol::is_string(&t) { t } else { t.to_lowercase() })
        .collect();

    let mut parser = Parser { tokens: &tokens, pos: 0 };
    let mut game = Game::new();
    while parser.pos < tokens.len() {
        let kind = match parser.next()? {
            "room" => EntityKind::Room,
            "object" => EntityKind::Object,
            other => return Err(syntax("invalid declaration", other)),
        };
        game.add(parser.entity(kind)?);
    }
    tracing::debug!(rooms = game.rooms().count(), objects = game.objects().count(), "script parsed");
    Ok(game)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn syntax(message: impl Into<String>, window: impl Into<String>) -> ScriptError {
    ScriptError::Syntax { entity: None, message: message.into(), window: window.into() }
}

fn semantic(message: impl Into<String>) -> ScriptError {
    ScriptError::Semantic { entity: None, message: message.into() }
}

fn joined(tokens: &[String]) -> String {
    tokens.join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    End,
    Else,
}

// ── Declarations and statements ───────────────────────────────────────────────

struct Parser<'t> {
    tokens: &'t [String],
    pos: usize,
}

impl<'t> Parser<'t> {
    fn next(&mut self) -> Result<&'t str, ScriptError> {
        let tok = self
            .tokens
            .get(self.pos)
            .ok_or_else(|| syntax("unexpected end of script", self.recent()))?;
        self.pos += 1;
        Ok(tok.as_str())
    }

    fn peek(&self) -> Option<&'t str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    /// The last few tokens consumed, for error messages.
    fn recent(&self) -> String {
        let end = self.pos.min(self.tokens.len());
        joined(&self.tokens[end.saturating_sub(WINDOW)..end])
    }

    fn expect(&mut self, want: &str, message: &str) -> Result<(), ScriptError> {
        if self.next()? == want {
            Ok(())
        } else {
            Err(syntax(message, self.recent()))
        }
    }

    /// Consume tokens up to (and including) the first one accepted by
    /// `stop`.  Returns the tokens before it and the stop token.
    fn until(&mut self, stop: impl Fn(&str) -> bool) -> Result<(&'t [String], &'t str), ScriptError> {
        let start = self.pos;
        loop {
            let tok = self.next()?;
            if stop(tok) {
                return Ok((&self.tokens[start..self.pos - 1], tok));
            }
        }
    }

    /// Tokens up to the end of a simple statement: a `,` (consumed), or
    /// `end` / `else` (left for the enclosing block).
    fn statement_window(&mut self) -> Result<&'t [String], ScriptError> {
        let start = self.pos;
        loop {
            match self.peek() {
                None => return Err(syntax("unexpected end of script", self.recent())),
                Some(",") => {
                    let window = &self.tokens[start..self.pos];
                    self.pos += 1;
                    return Ok(window);
                }
                Some("end" | "else") => return Ok(&self.tokens[start..self.pos]),
                Some(_) => self.pos += 1,
            }
        }
    }

    fn entity(&mut self, kind: EntityKind) -> Result<Entity, ScriptError> {
        let name = self.next()?;
        if !symbol::is_identifier(name) {
            return Err(syntax("invalid name", name));
        }
        self.entity_body(kind, name).map_err(|e| e.in_entity(name))
    }

    fn entity_body(&mut self, kind: EntityKind, name: &str) -> Result<Entity, ScriptError> {
        self.expect(":", "missing colon after the name")?;
        let mut entity = Entity::new(kind, name);
        loop {
            match self.next()? {
                "on" => entity = entity.with_event(self.event()?),
                "end" => return Ok(entity),
                other => return Err(syntax("invalid declaration", other)),
            }
        }
    }

    fn event(&mut self) -> Result<Event, ScriptError> {
        let trigger = match self.next()? {
            "enter" => Trigger::Enter,
            "exit" => Trigger::Exit,
            tok if symbol::is_string(tok) => Trigger::Action(ActionPattern::new(&normalize_string(tok)?)),
            other => return Err(syntax("invalid event type", other)),
        };
        self.expect(":", "missing colon after the event type")?;
        // An event body may be closed by `else` as well as `end`.
        let (body, _) = self.block()?;
        Ok(Event::new(trigger, body))
    }

    fn block(&mut self) -> Result<(Vec<Stmt>, Terminator), ScriptError> {
        let mut stmts = Vec::new();
        loop {
            let tok = self.next()?;
            let stmt = match tok {
                "end" => return Ok((stmts, Terminator::End)),
                "else" => return Ok((stmts, Terminator::Else)),
                "," => continue,
                "if" => self.if_stmt()?,
                "while" => self.while_stmt()?,
                "for" => self.for_stmt()?,
                "let" => self.let_stmt()?,
                _ => match Builtin::from_name(tok) {
                    Some(func) => Stmt::Call(func, parse_parameters(self.statement_window()?)?),
                    None => return Err(syntax("invalid statement", self.recent())),
                },
            };
            stmts.push(stmt);
        }
    }

    /// A block that must be closed by `end`.
    fn closed_block(&mut self) -> Result<Vec<Stmt>, ScriptError> {
        match self.block()? {
            (body, Terminator::End) => Ok(body),
            (_, Terminator::Else) => Err(syntax("unexpected else", self.recent())),
        }
    }

    fn condition(&mut self) -> Result<Expr, ScriptError> {
        let (tokens, _) = self.until(|t| t == ":")?;
        if tokens.is_empty() {
            return Err(syntax("missing condition", self.recent()));
        }
        parse_expression(tokens)
    }

    fn if_stmt(&mut self) -> Result<Stmt, ScriptError> {
        let cond = self.condition()?;
        let (body, mut term) = self.block()?;
        let mut branches = vec![(cond, body)];
        let mut otherwise = None;
        while term == Terminator::Else {
            match self.next()? {
                ":" => {
                    otherwise = Some(self.closed_block()?);
                    break;
                }
                "if" => {
                    let cond = self.condition()?;
                    let (body, next) = self.block()?;
                    branches.push((cond, body));
                    term = next;
                }
                _ => return Err(syntax("invalid else", self.recent())),
            }
        }
        Ok(Stmt::If { branches, otherwise })
    }

    fn while_stmt(&mut self) -> Result<Stmt, ScriptError> {
        let cond = self.condition()?;
        let body = self.closed_block()?;
        Ok(Stmt::While { cond, body })
    }

    fn for_stmt(&mut self) -> Result<Stmt, ScriptError> {
        let var = self.variable_name()?;
        self.expect("in", "missing `in` after the loop variable")?;
        let (tokens, stop) = self.until(|t| matches!(t, "to" | ".." | "downto"))?;
        if tokens.is_empty() {
            return Err(syntax("missing start expression", self.recent()));
        }
        let start = parse_expression(tokens)?;
        let direction = if stop == "downto" { Direction::Down } else { Direction::Up };
        let (tokens, _) = self.until(|t| t == ":")?;
        if tokens.is_empty() {
            return Err(syntax("missing end expression", self.recent()));
        }
        let end = parse_expression(tokens)?;
        let body = self.closed_block()?;
        Ok(Stmt::For { var, start, end, direction, body })
    }

    fn let_stmt(&mut self) -> Result<Stmt, ScriptError> {
        let name = self.variable_name()?;
        self.expect("=", "missing `=` after the variable name")?;
        let tokens = self.statement_window()?;
        if tokens.is_empty() {
            return Err(syntax("missing expression to assign", self.recent()));
        }
        Ok(Stmt::Let { name, value: parse_expression(tokens)? })
    }

    fn variable_name(&mut self) -> Result<String, ScriptError> {
        let tok = self.next()?;
        if symbol::is_identifier(tok) && !symbol::is_reserved(tok) && !symbol::is_word_operator(tok) {
            Ok(tok.to_owned())
        } else {
            Err(syntax("invalid variable name", tok))
        }
    }
}

// ── Expressions ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Pending {
    Unary(UnaryOp),
    Binary(BinOp),
}

impl Pending {
    fn priority(self) -> u8 {
        match self {
            Pending::Unary(_) => UnaryOp::PRIORITY,
            Pending::Binary(op) => op.priority(),
        }
    }
}

/// Index of the `)` closing the `(` at `open`.
fn matching_paren(tokens: &[String], open: usize) -> Result<usize, ScriptError> {
    let mut depth = 0usize;
    for (i, tok) in tokens.iter().enumerate().skip(open) {
        match tok.as_str() {
            "(" => depth += 1,
            ")" => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    Err(syntax("unmatched parenthesis", joined(tokens)))
}

/// Parse an expression from a token window.
///
/// Lower priority numbers bind tighter.  A binary operator first reduces
/// every pending operator that binds at least as tightly, so equal
/// priorities associate to the left.  A function name takes the rest of the
/// window as its parameters.
pub fn parse_expression(tokens: &[String]) -> Result<Expr, ScriptError> {
    if tokens.is_empty() {
        return Err(syntax("empty expression", ""));
    }
    let mut ops: Vec<Pending> = Vec::new();
    let mut values: Vec<Expr> = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let tok = tokens[i].as_str();
        match tok {
            "(" => {
                let close = matching_paren(tokens, i)?;
                values.push(parse_expression(&tokens[i + 1..close])?);
                i = close + 1;
                continue;
            }
            ")" => return Err(syntax("unmatched parenthesis", joined(tokens))),
            _ => {}
        }
        if let Some(func) = Builtin::from_name(tok) {
            values.push(Expr::Call(func, parse_parameters(&tokens[i + 1..])?));
            break;
        }
        if symbol::is_operator(tok) {
            let after_operand = i > 0 && !symbol::is_operator(&tokens[i - 1]);
            let op = if tok == "not" && after_operand {
                return Err(semantic("`not` used as a binary operator"));
            } else if after_operand {
                BinOp::from_token(tok)
                    .map(Pending::Binary)
                    .ok_or_else(|| semantic(format!("`{tok}` is not a binary operator")))?
            } else {
                UnaryOp::from_token(tok)
                    .map(Pending::Unary)
                    .ok_or_else(|| semantic(format!("`{tok}` is not a unary operator")))?
            };
            if let Pending::Binary(_) = op {
                while ops.last().is_some_and(|top| top.priority() <= op.priority()) {
                    reduce(&mut ops, &mut values, tokens)?;
                }
            }
            ops.push(op);
        } else {
            values.push(parse_operand(tok)?);
        }
        i += 1;
    }
    while !ops.is_empty() {
        reduce(&mut ops, &mut values, tokens)?;
    }
    match (values.pop(), values.is_empty()) {
        (Some(expr), true) => Ok(expr),
        _ => Err(syntax("malformed expression", joined(tokens))),
    }
}

fn reduce(ops: &mut Vec<Pending>, values: &mut Vec<Expr>, tokens: &[String]) -> Result<(), ScriptError> {
    let missing = || syntax("missing operand", joined(tokens));
    match ops.pop() {
        Some(Pending::Unary(op)) => {
            let operand = values.pop().ok_or_else(missing)?;
            values.push(Expr::unary(op, operand));
        }
        Some(Pending::Binary(op)) => {
            let rhs = values.pop().ok_or_else(missing)?;
            let lhs = values.pop().ok_or_else(missing)?;
            values.push(Expr::binary(op, lhs, rhs));
        }
        None => {}
    }
    Ok(())
}

/// Parameters of a call: every top-level token is one parameter, and a
/// parenthesised group is one parameter.
pub fn parse_parameters(tokens: &[String]) -> Result<Vec<Expr>, ScriptError> {
    let mut args = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        match tokens[i].as_str() {
            "(" => {
                let close = matching_paren(tokens, i)?;
                args.push(parse_expression(&tokens[i + 1..close])?);
                i = close + 1;
            }
            ")" => return Err(syntax("unmatched parenthesis", joined(tokens))),
            tok => {
                args.push(parse_operand(tok)?);
                i += 1;
            }
        }
    }
    Ok(args)
}

/// A single-token operand: literal or variable.
fn parse_operand(tok: &str) -> Result<Expr, ScriptError> {
    if symbol::is_identifier(tok) {
        if symbol::is_boolean(tok) {
            Ok(Expr::Literal(Value::Bool(tok == "true")))
        } else if symbol::is_reserved(tok) || symbol::is_word_operator(tok) {
            Err(semantic(format!("reserved word `{tok}` used as a value")))
        } else {
            Ok(Expr::Var(tok.to_owned()))
        }
    } else if symbol::is_string(tok) {
        Ok(Expr::Literal(Value::Str(normalize_string(tok)?)))
    } else if symbol::is_integer(tok) || symbol::is_float(tok) {
        Ok(Expr::Literal(Value::from_literal(tok)))
    } else {
        Err(syntax("invalid expression", tok))
    }
}

/// Strip the quotes from a string literal and resolve its escapes.
pub fn normalize_string(tok: &str) -> Result<String, ScriptError> {
    let invalid = || ScriptError::Lexical { token: tok.to_owned() };
    let mut chars = tok.chars();
    let quote = chars.next().ok_or_else(invalid)?;
    if chars.next_back() != Some(quote) {
        return Err(invalid());
    }
    let mut out = String::with_capacity(tok.len());
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        out.push(match chars.next() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('b') => '\u{8}',
            Some('"') => '"',
            Some('\'') => '\'',
            Some('\\') => '\\',
            Some('0') => '\0',
            _ => return Err(invalid()),
        });
    }
    Ok(out)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
