use proptest::prelude::*;

use adv::context::Context;
use adv::device::MemoryOutput;
use adv::embedded;
use adv::script::lexer::tokenize;
use adv::script::parser::{parse_expression, parse_script};
use adv::script::{Interpreter, Value};
use adv::world::ActionPattern;

/// The embedded adventure must always load.
#[test]
fn parse_embedded_scripts() {
    for script in embedded::EMBEDDED_SCRIPTS {
        if let Err(e) = parse_script(script.source) {
            panic!("{}: {e}", script.name);
        }
    }
}

proptest! {
    /// Tokenizing arbitrary text returns Ok or Err but never panics.
    #[test]
    fn lexer_does_not_panic(s in "\\PC*") {
        let _ = tokenize(&s);
    }

    /// Same for the whole loader.
    #[test]
    fn parser_does_not_panic(s in "\\PC*") {
        let _ = parse_script(&s);
    }

    /// Script-shaped noise: keywords, operators and literals in any order.
    #[test]
    fn parser_survives_token_soup(
        words in prop::collection::vec(
            prop::sample::select(vec![
                "room", "object", "on", "enter", "exit", ":", "end", "else", "if",
                "while", "for", "in", "to", "downto", "..", "let", "=", ",", "(", ")",
                "+", "-", "*", "not", "and", "writeln", "goto", "invhas", "x", "1",
                "2.5", "true", "\"s\"",
            ]),
            0..40,
        )
    ) {
        let _ = parse_script(&words.join(" "));
    }

    /// Every integer reads back from its own text.
    #[test]
    fn integer_literals_round_trip(n in any::<i32>()) {
        prop_assert_eq!(Value::from_literal(&n.to_string()), Value::Int(n));
    }

    /// Booleans display as `true`/`false` and read back.
    #[test]
    fn bool_literals_round_trip(b in any::<bool>()) {
        prop_assert_eq!(Value::from_literal(&Value::Bool(b).to_string()), Value::Bool(b));
    }

    /// Coercions are total.
    #[test]
    fn coercions_never_fail(s in "\\PC*", n in any::<i32>(), x in any::<f32>()) {
        for v in [Value::from(s.as_str()), Value::Int(n), Value::Float(x)] {
            let _ = v.as_bool();
            let _ = v.as_int();
            let _ = v.as_float();
            let _ = v.as_string();
        }
    }

    /// Integer addition in scripts wraps rather than panicking.
    #[test]
    fn integer_addition_matches_wrapping_add(a in (i32::MIN + 1)..=i32::MAX, b in 0..i32::MAX) {
        let tokens = tokenize(&format!("{a} + {b}")).unwrap();
        let expr = parse_expression(&tokens).unwrap();
        let game = parse_script("").unwrap();
        let mut ctx = Context::new();
        let mut out = MemoryOutput::new();
        let v = Interpreter::new(&game, &mut ctx, &mut out).eval(&expr).unwrap();
        prop_assert_eq!(v, Value::Int(a.wrapping_add(b)));
    }

    /// A pattern always matches its own text, whatever the case.
    #[test]
    fn pattern_matches_itself(words in prop::collection::vec("[a-z]{1,8}", 1..4)) {
        let text = words.join(" ");
        prop_assert!(ActionPattern::new(&text).matches(&text.to_uppercase()));
    }
}
