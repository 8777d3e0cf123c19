//! The adventure scripting language.
//!
//! Scripts declare rooms and objects whose events (`on enter`, `on exit`,
//! `on "<action>"`) hold imperative statements over dynamically typed
//! values:
//!
//! - [`lexer`] splits text into string tokens, [`symbol`] classifies them
//! - [`parser`] builds a [`Game`](crate::world::Game) of entities whose
//!   events carry [`stmt`] / [`expr`] trees
//! - [`interp`] walks those trees against a [`Context`](crate::context::Context),
//!   calling the [`builtins`] for side effects
//!
//! # Quick start
//!
//! ```rust
//! use adv::context::Context;
//! use adv::device::MemoryOutput;
//! use adv::script::{parse_script, Interpreter};
//!
//! let game = parse_script(r#"
//!     room main :
//!       on enter : let n = 6 * 7, writeln "answer: " n end
//!     end
//! "#).unwrap();
//! let mut ctx = Context::new();
//! let mut out = MemoryOutput::new();
//! Interpreter::new(&game, &mut ctx, &mut out).change_room("main").unwrap();
//! assert_eq!(out.lines, vec!["answer: 42"]);
//! ```

pub mod builtins;
pub mod error;
pub mod expr;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod stmt;
pub mod symbol;
pub mod value;

// Re-exports for convenience.
pub use error::{RuntimeError, ScriptError};
pub use expr::EvalContext;
pub use interp::Interpreter;
pub use parser::parse_script;
pub use value::Value;
