//! Script values and the conversions that never run script code.
//!
//! Conversions that may call back into script (`ToPrimitive` on objects,
//! and therefore `ToString`/`ToNumber` of objects) live on the interpreter.

use crate::interpreter::object::{ObjectKind, ObjectRef};
use std::fmt;
use std::rc::Rc;

/// A script value.
///
/// Objects are shared and interior-mutable; every other variant is an
/// immutable primitive.
#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(Rc<str>),
    Object(ObjectRef),
}

impl Value {
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Rc::from(s.as_ref()))
    }

    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// `undefined` or `null`
    #[inline]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Whether the value can be called.
    pub fn is_callable(&self) -> bool {
        self.as_object()
            .is_some_and(|obj| matches!(obj.borrow().kind, ObjectKind::Function(_)))
    }

    /// ToBoolean
    pub fn to_boolean(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => !(n.is_nan() || *n == 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Object(_) => true,
        }
    }

    /// ToNumber for primitives. Objects must be converted to a primitive first.
    pub fn primitive_to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::String(s) => string_to_number(s),
            Value::Object(_) => f64::NAN,
        }
    }

    /// ToString for primitives. Objects must be converted to a primitive first.
    pub fn primitive_to_string(&self) -> Rc<str> {
        match self {
            Value::Undefined => Rc::from("undefined"),
            Value::Null => Rc::from("null"),
            Value::Boolean(true) => Rc::from("true"),
            Value::Boolean(false) => Rc::from("false"),
            Value::Number(n) => Rc::from(number_to_string(*n)),
            Value::String(s) => s.clone(),
            Value::Object(_) => Rc::from("[object Object]"),
        }
    }

    /// The `typeof` operator.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Object(_) if self.is_callable() => "function",
            Value::Object(_) => "object",
        }
    }

    /// The `===` operator.
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// `===`, except that `NaN` equals itself. Used by `assertEquals`.
    pub fn same_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) if a.is_nan() && b.is_nan() => true,
            _ => self.strict_equals(other),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", number_to_string(*n)),
            Value::String(s) => write!(f, "{:?}", s),
            // Objects can be cyclic; never recurse into them
            Value::Object(obj) => match obj.try_borrow() {
                Ok(object) => write!(f, "[object {}]", object.class_name()),
                Err(_) => write!(f, "[object]"),
            },
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

/// Number to string, following the script rules: integers print without a
/// fraction, very large and very small magnitudes use exponent notation.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == 0.0 {
        // Covers -0
        return "0".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        // f64's Display already omits a zero fraction
        format!("{}", n)
    } else {
        // Rust prints `1e21`; scripts expect `1e+21`
        let formatted = format!("{:e}", n);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        }
    }
}

/// ToNumber applied to a string.
pub fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let (sign, unsigned) = match trimmed.as_bytes()[0] {
        b'-' => (-1.0, &trimmed[1..]),
        b'+' => (1.0, &trimmed[1..]),
        _ => (1.0, trimmed),
    };

    if unsigned == "Infinity" {
        return sign * f64::INFINITY;
    }

    // Radix prefixes are not signed
    if sign == 1.0 && unsigned.len() == trimmed.len() {
        for (prefix, radix) in [("0x", 16), ("0X", 16), ("0b", 2), ("0B", 2), ("0o", 8), ("0O", 8)] {
            if let Some(digits) = unsigned.strip_prefix(prefix) {
                return parse_radix(digits, radix);
            }
        }
    }

    // f64::from_str also accepts "inf" and "nan"; scripts do not
    let well_formed = unsigned
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !well_formed {
        return f64::NAN;
    }

    unsigned.parse::<f64>().map(|n| sign * n).unwrap_or(f64::NAN)
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits.chars().try_fold(0.0, |acc, c| c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)).unwrap_or(f64::NAN)
}

/// ToInt32
pub fn to_int32(n: f64) -> i32 {
    to_uint32(n) as i32
}

/// ToUint32
pub fn to_uint32(n: f64) -> u32 {
    if !n.is_finite() {
        return 0;
    }
    let n = n.trunc().rem_euclid(4_294_967_296.0);
    n as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_to_string() {
        assert_eq!(number_to_string(42.0), "42");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(0.5), "0.5");
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(1.5e-7), "1.5e-7");
        assert_eq!(number_to_string(243.0), "243");
    }

    #[test]
    fn test_string_to_number() {
        assert_eq!(string_to_number(""), 0.0);
        assert_eq!(string_to_number("  12  "), 12.0);
        assert_eq!(string_to_number("-3.5"), -3.5);
        assert_eq!(string_to_number("0x1F"), 31.0);
        assert_eq!(string_to_number("-Infinity"), f64::NEG_INFINITY);
        assert!(string_to_number("inf").is_nan());
        assert!(string_to_number("12px").is_nan());
    }

    #[test]
    fn test_to_boolean() {
        assert!(!Value::Number(f64::NAN).to_boolean());
        assert!(!Value::string("").to_boolean());
        assert!(Value::string("0").to_boolean());
        assert!(!Value::Null.to_boolean());
    }

    #[test]
    fn test_strict_equality() {
        assert!(Value::string("a").strict_equals(&Value::string("a")));
        assert!(!Value::Number(f64::NAN).strict_equals(&Value::Number(f64::NAN)));
        assert!(Value::Number(f64::NAN).same_value(&Value::Number(f64::NAN)));
        assert!(!Value::Null.strict_equals(&Value::Undefined));
    }

    #[test]
    fn test_int32_wrapping() {
        assert_eq!(to_int32(4_294_967_295.0), -1);
        assert_eq!(to_uint32(-1.0), 4_294_967_295);
        assert_eq!(to_int32(f64::NAN), 0);
    }
}
