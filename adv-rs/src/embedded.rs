//! Adventures baked into the binary.
//!
//! Played when no script is named on the command line or in the config
//! file, so a bare `adv` always has something to run.

/// A script compiled into the binary.
pub struct EmbeddedScript {
    pub name: &'static str,
    pub source: &'static str,
}

pub static EMBEDDED_SCRIPTS: &[EmbeddedScript] = &[EmbeddedScript {
    name: "cave.adv",
    source: include_str!("../scripts/cave.adv"),
}];

/// The adventure played by default.
pub fn demo() -> &'static EmbeddedScript {
    &EMBEDDED_SCRIPTS[0]
}

/// Look up an embedded script by file name.
pub fn get_embedded(name: &str) -> Option<&'static EmbeddedScript> {
    EMBEDDED_SCRIPTS.iter().find(|s| s.name == name)
}
