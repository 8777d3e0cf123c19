//! A text adventure engine: a small scripting language for rooms and
//! objects, an interpreter that dispatches player input to their events,
//! and a terminal player.

pub mod cli;
pub mod config;
pub mod context;
pub mod device;
pub mod embedded;
pub mod event_loop;
pub mod input;
pub mod logging;
pub mod palette;
pub mod script;
pub mod session;
pub mod terminal;
pub mod world;
