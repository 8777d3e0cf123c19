//! Token classification.
//!
//! Tokens are plain strings; their class is recomputed on demand by the
//! predicates in this module.  The lexer uses the *prefix* predicates to
//! decide whether a character may extend the pending token, and the parser
//! uses the complete-token predicates to decide what a token means.  Both
//! sides read the same tables, so an operator the lexer accepts always has
//! a precedence in the parser.

// ── Tables ────────────────────────────────────────────────────────────────────

/// Grammar keywords.
pub const KEYWORDS: &[&str] = &[
    "room", "object", "on", "enter", "exit", "if", "else", "while", "for", "in", "to",
    "downto", "let", "end", "true", "false",
];

/// Names of the built-in functions callable from scripts.
pub const FUNCTIONS: &[&str] = &[
    "writeln", "write", "goto", "finish", "setdefmsg", "invadd", "invrem", "invhas",
    "reset", "roomname", "lastroom", "setrunfst", "setrunall", "setfgcolor",
    "setbgcolor", "clear", "exit",
];

/// Operators spelled as words.  Lexically these are identifiers.
pub const WORD_OPERATORS: &[&str] = &["not", "and", "or", "xor", "div", "mod"];

/// Operators made of symbol characters.
pub const SYMBOL_OPERATORS: &[&str] =
    &["+", "-", "*", "/", "^", "%", "=", "<", ">", "<=", ">=", "<>", ".."];

const BRACKETS: &[char] = &['(', ')', '[', ']', '{', '}'];
const SEPARATORS: &[char] = &['.', ':', ';', ','];

// ── Characters ────────────────────────────────────────────────────────────────

pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

// ── Complete tokens ───────────────────────────────────────────────────────────

/// Letters, digits and underscores, not starting with a digit.
pub fn is_identifier(token: &str) -> bool {
    match token.chars().next() {
        Some(first) if !is_digit(first) => token.chars().all(is_identifier_char),
        _ => false,
    }
}

pub fn is_boolean(token: &str) -> bool {
    token == "true" || token == "false"
}

pub fn is_integer(token: &str) -> bool {
    !token.is_empty() && token.chars().all(is_digit)
}

pub fn is_float(token: &str) -> bool {
    matches!(
        scan_float(token),
        Some(FloatState::Integer | FloatState::Exponent) | Some(FloatState::Mantissa)
    ) && !token.ends_with('.')
}

pub fn is_bracket(token: &str) -> bool {
    single_char(token).is_some_and(|c| BRACKETS.contains(&c))
}

pub fn is_separator(token: &str) -> bool {
    single_char(token).is_some_and(|c| SEPARATORS.contains(&c))
}

/// Symbol operators and word operators alike.
pub fn is_operator(token: &str) -> bool {
    SYMBOL_OPERATORS.contains(&token) || WORD_OPERATORS.contains(&token)
}

pub fn is_word_operator(token: &str) -> bool {
    WORD_OPERATORS.contains(&token)
}

/// Quoted with matching `"` or `'` on both ends.
pub fn is_string(token: &str) -> bool {
    let mut chars = token.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) => is_quote(open) && open == close,
        _ => false,
    }
}

pub fn is_comment(token: &str) -> bool {
    token.starts_with('#')
}

pub fn is_keyword(token: &str) -> bool {
    KEYWORDS.contains(&token)
}

pub fn is_function(token: &str) -> bool {
    FUNCTIONS.contains(&token)
}

/// Keywords and function names cannot be used as variable names.
pub fn is_reserved(token: &str) -> bool {
    is_keyword(token) || is_function(token)
}

/// A token the lexer may emit from the normal state.
pub fn is_token(token: &str) -> bool {
    is_identifier(token)
        || is_integer(token)
        || is_float(token)
        || is_bracket(token)
        || SYMBOL_OPERATORS.contains(&token)
        || is_separator(token)
}

// ── Prefixes ──────────────────────────────────────────────────────────────────

/// True if `token` is a valid token or can still grow into one.
pub fn is_token_prefix(token: &str) -> bool {
    is_identifier(token)
        || is_float_prefix(token)
        || is_bracket(token)
        || is_separator(token)
        || SYMBOL_OPERATORS.iter().any(|op| op.starts_with(token))
}

/// Integer or float text, possibly still missing its fraction or exponent
/// digits (`1.`, `1e`, `1e-`).
pub fn is_float_prefix(token: &str) -> bool {
    scan_float(token).is_some()
}

// ── Float scanner ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FloatState {
    Integer,
    Mantissa,
    ExponentSign,
    Exponent,
}

/// Run the float state machine, returning the state after the last
/// character, or `None` if some character was rejected.
fn scan_float(token: &str) -> Option<FloatState> {
    let mut chars = token.chars();
    if !chars.next().is_some_and(is_digit) {
        return None;
    }
    let mut state = FloatState::Integer;
    let mut prev = '0';
    for c in chars {
        state = match (state, c) {
            (FloatState::Integer, c) if is_digit(c) => FloatState::Integer,
            (FloatState::Integer, '.') => FloatState::Mantissa,
            (FloatState::Integer | FloatState::Mantissa, 'e' | 'E') => FloatState::ExponentSign,
            (FloatState::Mantissa, c) if is_digit(c) => FloatState::Mantissa,
            (FloatState::ExponentSign, '+' | '-') if matches!(prev, 'e' | 'E') => {
                FloatState::ExponentSign
            }
            (FloatState::ExponentSign | FloatState::Exponent, c) if is_digit(c) => {
                FloatState::Exponent
            }
            _ => return None,
        };
        prev = c;
    }
    Some(state)
}

fn single_char(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(is_identifier("room"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a-b"));
    }

    #[test]
    fn numbers() {
        assert!(is_integer("0042"));
        assert!(!is_integer("4.2"));
        assert!(is_float("4.2"));
        assert!(is_float("42"));
        assert!(is_float("1e5"));
        assert!(is_float("1.5E-3"));
        assert!(!is_float("1."));
        assert!(!is_float("1e"));
        assert!(!is_float("1e-"));
        assert!(!is_float(".5"));
        assert!(!is_float("1.2.3"));
        assert!(!is_float("1e+-3"));
    }

    #[test]
    fn float_prefixes() {
        assert!(is_float_prefix("1."));
        assert!(is_float_prefix("1e"));
        assert!(is_float_prefix("1e-"));
        assert!(!is_float_prefix("1.."));
        assert!(!is_float_prefix("e1"));
    }

    #[test]
    fn operators_and_punctuation() {
        for op in ["<=", ">=", "<>", "..", "^", "mod", "xor"] {
            assert!(is_operator(op), "{op}");
        }
        assert!(!is_operator("=="));
        assert!(is_bracket("("));
        assert!(!is_bracket("(("));
        assert!(is_separator(":"));
        assert!(is_separator("."));
    }

    #[test]
    fn token_prefixes() {
        assert!(is_token_prefix("<"));
        assert!(is_token_prefix("."));
        assert!(is_token_prefix(".."));
        assert!(!is_token_prefix("..."));
        assert!(!is_token_prefix("@"));
        assert!(!is_token_prefix("a("));
    }

    #[test]
    fn strings_and_comments() {
        assert!(is_string("\"hi\""));
        assert!(is_string("''"));
        assert!(!is_string("\"hi'"));
        assert!(!is_string("\""));
        assert!(is_comment("# note"));
    }

    #[test]
    fn reserved_words() {
        assert!(is_reserved("room"));
        assert!(is_reserved("writeln"));
        assert!(is_reserved("exit"));
        assert!(!is_reserved("lamp"));
        assert!(is_boolean("true"));
        assert!(!is_boolean("True"));
    }
}
