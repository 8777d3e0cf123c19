//! Built-in functions.
//!
//! | name | effect | returns |
//! |---|---|---|
//! | `write`, `writeln` | print text; numbers before a string pick its colors | default |
//! | `goto room` | queue a room change | default |
//! | `finish` | end the game; a key press restarts it | default |
//! | `setdefmsg msg` | message for unmatched input | default |
//! | `invadd obj`, `invrem obj` | inventory add / remove first | default |
//! | `invhas obj` | inventory test | boolean |
//! | `reset` | restart at the next update | default |
//! | `roomname`, `lastroom` | current / previous room name | string |
//! | `setrunfst`, `setrunall` | event dispatch policy | default |
//! | `setfgcolor n`, `setbgcolor n` | current palette colors | default |
//! | `clear` | clear the screen | default |
//! | `exit` | leave the application | default |

use crate::context::ScriptAction;
use crate::device::ColorSpan;
use crate::palette::Color;

use super::error::ScriptError;
use super::expr::{eval_expr, Expr};
use super::interp::Interpreter;
use super::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Write,
    WriteLn,
    Goto,
    Finish,
    SetDefMsg,
    InvAdd,
    InvRem,
    InvHas,
    Reset,
    RoomName,
    LastRoom,
    SetRunFirst,
    SetRunAll,
    SetFgColor,
    SetBgColor,
    Clear,
    Exit,
}

impl Builtin {
    pub const ALL: [Builtin; 17] = [
        Builtin::Write,
        Builtin::WriteLn,
        Builtin::Goto,
        Builtin::Finish,
        Builtin::SetDefMsg,
        Builtin::InvAdd,
        Builtin::InvRem,
        Builtin::InvHas,
        Builtin::Reset,
        Builtin::RoomName,
        Builtin::LastRoom,
        Builtin::SetRunFirst,
        Builtin::SetRunAll,
        Builtin::SetFgColor,
        Builtin::SetBgColor,
        Builtin::Clear,
        Builtin::Exit,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Write => "write",
            Builtin::WriteLn => "writeln",
            Builtin::Goto => "goto",
            Builtin::Finish => "finish",
            Builtin::SetDefMsg => "setdefmsg",
            Builtin::InvAdd => "invadd",
            Builtin::InvRem => "invrem",
            Builtin::InvHas => "invhas",
            Builtin::Reset => "reset",
            Builtin::RoomName => "roomname",
            Builtin::LastRoom => "lastroom",
            Builtin::SetRunFirst => "setrunfst",
            Builtin::SetRunAll => "setrunall",
            Builtin::SetFgColor => "setfgcolor",
            Builtin::SetBgColor => "setbgcolor",
            Builtin::Clear => "clear",
            Builtin::Exit => "exit",
        }
    }
}

/// Run `func` with unevaluated `args`.
pub(crate) fn call_builtin(
    interp: &mut Interpreter<'_>,
    func: Builtin,
    args: &[Expr],
) -> Result<Value, ScriptError> {
    tracing::trace!(func = func.name(), argc = args.len(), "call");
    match func {
        Builtin::Write => write(interp, args, false)?,
        Builtin::WriteLn => write(interp, args, true)?,
        Builtin::Goto => {
            if let Some(name) = name_arg(interp, args)? {
                let game = interp.game;
                interp.ctx.set_next_room(game, &name);
            }
        }
        Builtin::Finish => interp.ctx.finished = true,
        Builtin::SetDefMsg => {
            if let Some(first) = args.first() {
                let msg = eval_expr(first, interp)?.as_string();
                interp.ctx.default_message = Some(msg);
            }
        }
        Builtin::InvAdd => {
            if let Some(name) = name_arg(interp, args)? {
                let game = interp.game;
                interp.ctx.add_to_inventory(game, &name);
            }
        }
        Builtin::InvRem => {
            if let Some(name) = name_arg(interp, args)? {
                interp.ctx.remove_from_inventory(&name);
            }
        }
        Builtin::InvHas => {
            let has = match name_arg(interp, args)? {
                Some(name) => interp.ctx.has_in_inventory(&name),
                None => false,
            };
            return Ok(Value::Bool(has));
        }
        Builtin::Reset => interp.ctx.reset = true,
        Builtin::RoomName => return Ok(Value::Str(interp.ctx.room_name().to_owned())),
        Builtin::LastRoom => return Ok(Value::Str(interp.ctx.last_room().to_owned())),
        Builtin::SetRunFirst => interp.ctx.run_all = false,
        Builtin::SetRunAll => interp.ctx.run_all = true,
        Builtin::SetFgColor => {
            if let Some(first) = args.first() {
                let n = eval_expr(first, interp)?.as_int();
                interp.out.set_foreground(Color::from_index_or(n, Color::FOREGROUND));
            }
        }
        Builtin::SetBgColor => {
            if let Some(first) = args.first() {
                let n = eval_expr(first, interp)?.as_int();
                interp.out.set_background(Color::from_index_or(n, Color::BACKGROUND));
            }
        }
        Builtin::Clear => interp.out.clear(),
        Builtin::Exit => interp.ctx.push_action(ScriptAction::Exit),
    }
    Ok(Value::default())
}

/// The first argument as a name: a bare identifier is taken literally
/// (`goto cellar`), anything else is evaluated (`goto ("cel" + "lar")`).
fn name_arg(interp: &mut Interpreter<'_>, args: &[Expr]) -> Result<Option<String>, ScriptError> {
    match args.first() {
        None => Ok(None),
        Some(Expr::Var(name)) => Ok(Some(name.clone())),
        Some(expr) => Ok(Some(eval_expr(expr, interp)?.as_string())),
    }
}

/// `write` / `writeln`.
///
/// Strings are printed.  Other values waiting in front of a string choose
/// its colors: the first is the foreground index, the last of the rest the
/// background index.  Values with no string after them are printed as text.
fn write(interp: &mut Interpreter<'_>, args: &[Expr], newline: bool) -> Result<(), ScriptError> {
    let mut spans = Vec::new();
    let mut held: Vec<Value> = Vec::new();
    for arg in args {
        match eval_expr(arg, interp)? {
            Value::Str(text) => {
                let fg = held
                    .first()
                    .map_or(interp.out.foreground(), |v| Color::from_index_or(v.as_int(), Color::FOREGROUND));
                let bg = held
                    .get(1..)
                    .and_then(<[Value]>::last)
                    .map_or(interp.out.background(), |v| Color::from_index_or(v.as_int(), Color::BACKGROUND));
                spans.push(ColorSpan::new(text, fg, bg));
                held.clear();
            }
            other => held.push(other),
        }
    }
    let (fg, bg) = (interp.out.foreground(), interp.out.background());
    spans.extend(held.iter().map(|v| ColorSpan::new(v.to_string(), fg, bg)));
    interp.out.write_spans(&spans, newline);
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
