//! Error types for loading and running adventure scripts.
//!
//! Loading stops at the first [`ScriptError`]; there is no partial game.
//! Evaluation errors ([`RuntimeError`]) abort the statement batch that
//! raised them.

use thiserror::Error;

/// Any failure while tokenizing, parsing, or evaluating a script.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScriptError {
    /// A character sequence that cannot form a token.
    #[error("lexical error: invalid token `{token}`")]
    Lexical { token: String },

    /// Malformed declaration, event, statement, or expression.
    #[error("syntax error in {}: {message} (at `{window}`)", .entity.as_deref().unwrap_or("script"))]
    Syntax {
        /// Room or object being parsed, if any.
        entity: Option<String>,
        message: String,
        /// The offending token, or token window, joined by spaces.
        window: String,
    },

    /// Well-formed tokens used in a meaningless way.
    #[error("semantic error in {}: {message}", .entity.as_deref().unwrap_or("script"))]
    Semantic { entity: Option<String>, message: String },

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Failures raised while evaluating a parsed script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("runtime error: integer division by zero")]
    DivisionByZero,
}

impl ScriptError {
    /// Attach the enclosing entity name to a syntax or semantic error that
    /// does not carry one yet.
    pub fn in_entity(self, name: &str) -> Self {
        match self {
            ScriptError::Syntax { entity: None, message, window } => {
                ScriptError::Syntax { entity: Some(name.to_owned()), message, window }
            }
            ScriptError::Semantic { entity: None, message } => {
                ScriptError::Semantic { entity: Some(name.to_owned()), message }
            }
            other => other,
        }
    }
}
