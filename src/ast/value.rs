//! Opaque field payloads.
//!
//! Non-child node attributes hold a [`Value`]: a name, a flag, a literal's
//! numeric value, and so on. Values are copied, compared, and hashed by the
//! generic node machinery but never traversed.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Interned keyword strings used as field values (storage classes, integer
/// literal formats). A `Kw` compares and hashes equal to a `Str` with the
/// same text, so hand-built nodes holding plain strings match parsed ones;
/// keywords render without quotes in [`dump`](crate::ast::Ast::dump)
/// output.
pub mod kw {
    pub const TYPEDEF: &str = "typedef";
    pub const EXTERN: &str = "extern";
    pub const STATIC: &str = "static";
    pub const AUTO: &str = "auto";
    pub const REGISTER: &str = "register";

    pub const DEC: &str = "dec";
    pub const HEX: &str = "hex";
    pub const OCT: &str = "oct";
}

/// The value of a non-child attribute.
#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Kw(&'static str),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (None, None) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            // string and interned keyword compare by text
            (Str(a), Str(b)) => a == b,
            (Kw(a), Kw(b)) => a == b,
            (Str(a), Kw(b)) | (Kw(b), Str(a)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Reads this value as a flag. `None` counts as unset.
    ///
    /// # Panics
    ///
    /// Panics if the value is set but not a `Bool`.
    pub fn as_bool(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            other => panic!("value is not a bool: {:?}", other),
        }
    }

    /// # Panics
    ///
    /// Panics if the value is not an `Int`.
    pub fn as_int(&self) -> i64 {
        match self {
            Value::Int(n) => *n,
            other => panic!("value is not an int: {:?}", other),
        }
    }

    /// Returns the string or keyword payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::Kw(s) => Some(s),
            _ => None,
        }
    }

    /// Feeds this value into a hasher. `Float` hashes by bit pattern, so
    /// equal non-NaN floats hash equally.
    pub(crate) fn hash_into<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::None => 0u8.hash(state),
            Value::Bool(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            Value::Int(n) => {
                2u8.hash(state);
                n.hash(state);
            }
            Value::Float(x) => {
                3u8.hash(state);
                x.to_bits().hash(state);
            }
            // one discriminant for both string flavors, matching equality
            Value::Str(s) => {
                4u8.hash(state);
                s.hash(state);
            }
            Value::Kw(s) => {
                4u8.hash(state);
                s.hash(state);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
            Value::Kw(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(v: &Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        v.hash_into(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_keyword_equals_string_with_same_text() {
        assert_eq!(Value::Kw(kw::STATIC), Value::Str("static".to_owned()));
        assert_eq!(Value::Str("hex".to_owned()), Value::Kw(kw::HEX));
        assert_ne!(Value::Kw(kw::STATIC), Value::Str("extern".to_owned()));
        assert_eq!(
            hash_of(&Value::Kw(kw::STATIC)),
            hash_of(&Value::Str("static".to_owned()))
        );
    }

    #[test]
    fn test_cross_variant_values_unequal() {
        assert_ne!(Value::Int(1), Value::Bool(true));
        assert_ne!(Value::Int(0), Value::None);
        assert_ne!(Value::Str("1".to_owned()), Value::Int(1));
    }
}
