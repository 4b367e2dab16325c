//! Field value types for representing form data in a widget-agnostic way.
//!
//! The [`Value`] enum is the universal payload type used throughout the form
//! layer: field values, initial values, and the values snapshot handed to
//! the submit action. It covers the payloads form inputs produce (strings,
//! booleans, numbers, multi-select lists) and provides conversions from
//! standard Rust types.

use std::fmt;

/// A widget-agnostic representation of a form field value.
///
/// `Value` is the universal type used to pass data between fields, the form
/// state store, and the external submit action. An unset or cleared field
/// holds [`Value::Null`].
///
/// # Examples
///
/// ```
/// use formflow_core::value::Value;
///
/// let v = Value::from("hello");
/// assert_eq!(v, Value::String("hello".to_string()));
///
/// let v = Value::from(true);
/// assert_eq!(v, Value::Bool(true));
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    /// No value (unset or cleared field).
    Null,
    /// A boolean value (checkboxes, switches).
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// A list of values (multi-select inputs).
    List(Vec<Value>),
}

impl Value {
    /// Returns `true` if this value counts as empty for validation purposes.
    ///
    /// `Null`, the empty string, and the empty list are empty; every other
    /// value (including `Bool(false)` and `Int(0)`) is not.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Bool(_) | Self::Int(_) | Self::Float(_) => false,
        }
    }

    /// Returns the string contents if this is a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` if this is [`Value::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns this value with leading/trailing whitespace removed from
    /// string payloads. Non-string values are returned unchanged.
    #[must_use]
    pub fn trimmed(self) -> Self {
        match self {
            Self::String(s) => Self::String(s.trim().to_string()),
            other => other,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, ""),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s}"),
            Self::List(vals) => {
                write!(f, "[")?;
                for (i, v) in vals.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
        }
    }
}

// ── From implementations ───────────────────────────────────────────────

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
