//! Runtime value type for adventure scripts.
//!
//! Scripts are weakly typed: every value converts to every other kind on
//! demand, and a failed numeric conversion quietly yields zero.  The
//! variant only matters when choosing how an operator behaves.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use super::symbol;

/// A script runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Float(f32),
    Str(String),
    Bool(bool),
}

/// `Int(0)`, the value of unset variables and of statements that produce
/// nothing.
impl Default for Value {
    fn default() -> Self {
        Value::Int(0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            // Shortest text that reads back to the same f32: `1`, `0.1`, `3.5`.
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl Value {
    /// Infer a value from literal text: integer, then float, then boolean,
    /// then string.  A leading `-` is accepted on numbers so that every
    /// integer reads back from its own text.
    pub fn from_literal(text: &str) -> Self {
        let unsigned = text.strip_prefix('-').unwrap_or(text);
        if symbol::is_integer(unsigned) {
            Value::Int(text.parse().unwrap_or(0))
        } else if symbol::is_float(unsigned) {
            Value::Float(text.parse().unwrap_or(0.0))
        } else if symbol::is_boolean(text) {
            Value::Bool(text == "true")
        } else {
            Value::Str(text.to_owned())
        }
    }

    /// Truthiness.  Every string except a case-insensitive `false` is true,
    /// including `""` and `"0"`.
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Float(x) => *x != 0.0,
            Value::Str(s) => !s.eq_ignore_ascii_case("false"),
            Value::Bool(b) => *b,
        }
    }

    /// Coerce to `i32`.  Floats truncate toward zero; unparsable strings
    /// give 0.
    pub fn as_int(&self) -> i32 {
        match self {
            Value::Int(n) => *n,
            Value::Float(x) => *x as i32,
            Value::Str(s) => s.trim().parse().unwrap_or(0),
            Value::Bool(b) => i32::from(*b),
        }
    }

    /// Coerce to `f32`; unparsable strings give 0.0.
    pub fn as_float(&self) -> f32 {
        match self {
            Value::Int(n) => *n as f32,
            Value::Float(x) => *x,
            Value::Str(s) => s.trim().parse().unwrap_or(0.0),
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Coerce to a string.
    pub fn as_string(&self) -> String {
        self.to_string()
    }

    /// Overwrite the value with `n`, keeping the variant.  Loop counters
    /// are advanced this way.
    pub fn set_int(&mut self, n: i32) {
        *self = match self {
            Value::Int(_) => Value::Int(n),
            Value::Float(_) => Value::Float(n as f32),
            Value::Str(_) => Value::Str(n.to_string()),
            Value::Bool(_) => Value::Bool(n != 0),
        };
    }

    pub fn is_str(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    // ── Arithmetic helpers ────────────────────────────────────────────────────

    fn either_float(a: &Value, b: &Value) -> bool {
        a.is_float() || b.is_float()
    }

    /// `^`, computed in double precision.  Integer results saturate.
    pub fn arith_pow(&self, rhs: &Value) -> Value {
        if Self::either_float(self, rhs) {
            let p = f64::from(self.as_float()).powf(f64::from(rhs.as_float()));
            Value::Float(p as f32)
        } else {
            let p = f64::from(self.as_int()).powf(f64::from(rhs.as_int()));
            Value::Int(p as i32)
        }
    }

    /// `+` concatenates when either side is a string.
    pub fn arith_add(&self, rhs: &Value) -> Value {
        if self.is_str() || rhs.is_str() {
            Value::Str(format!("{self}{rhs}"))
        } else if Self::either_float(self, rhs) {
            Value::Float(self.as_float() + rhs.as_float())
        } else {
            Value::Int(self.as_int().wrapping_add(rhs.as_int()))
        }
    }

    pub fn arith_sub(&self, rhs: &Value) -> Value {
        if Self::either_float(self, rhs) {
            Value::Float(self.as_float() - rhs.as_float())
        } else {
            Value::Int(self.as_int().wrapping_sub(rhs.as_int()))
        }
    }

    pub fn arith_mul(&self, rhs: &Value) -> Value {
        if Self::either_float(self, rhs) {
            Value::Float(self.as_float() * rhs.as_float())
        } else {
            Value::Int(self.as_int().wrapping_mul(rhs.as_int()))
        }
    }

    /// Float division when either side is a float, integer division
    /// otherwise.  `None` on integer division by zero.
    pub fn arith_div(&self, rhs: &Value) -> Option<Value> {
        if Self::either_float(self, rhs) {
            Some(Value::Float(self.as_float() / rhs.as_float()))
        } else {
            self.int_div(rhs)
        }
    }

    /// `%`: float remainder when either side is a float.
    pub fn arith_rem(&self, rhs: &Value) -> Option<Value> {
        if Self::either_float(self, rhs) {
            Some(Value::Float(self.as_float() % rhs.as_float()))
        } else {
            self.int_rem(rhs)
        }
    }

    /// `div`: always integer division.
    pub fn int_div(&self, rhs: &Value) -> Option<Value> {
        match rhs.as_int() {
            0 => None,
            d => Some(Value::Int(self.as_int().wrapping_div(d))),
        }
    }

    /// `mod`: always integer remainder.
    pub fn int_rem(&self, rhs: &Value) -> Option<Value> {
        match rhs.as_int() {
            0 => None,
            d => Some(Value::Int(self.as_int().wrapping_rem(d))),
        }
    }

    /// Unary minus: floats stay floats, everything else becomes an integer.
    pub fn arith_neg(&self) -> Value {
        match self {
            Value::Float(x) => Value::Float(-x),
            other => Value::Int(other.as_int().wrapping_neg()),
        }
    }

    /// Compare as strings if either side is a string, else as floats if
    /// either is a float, else as integers.  `None` only for NaN.
    pub fn cmp_value(&self, rhs: &Value) -> Option<std::cmp::Ordering> {
        if self.is_str() || rhs.is_str() {
            Some(self.as_string().cmp(&rhs.as_string()))
        } else if Self::either_float(self, rhs) {
            self.as_float().partial_cmp(&rhs.as_float())
        } else {
            Some(self.as_int().cmp(&rhs.as_int()))
        }
    }
}

impl FromStr for Value {
    type Err = Infallible;

    /// Same as [`Value::from_literal`]; never fails.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Value::from_literal(s))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
