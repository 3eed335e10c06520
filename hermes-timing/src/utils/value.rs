use std::fmt::{Display, Formatter};

/// A property value carried by keyframes and written to targets.
///
/// The engine never inspects values: they are held as declared and handed over to the
/// [`Target`](crate::targets::Target) as-is.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(arr) => {
                let elements = arr
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<String>>()
                    .join(" ");
                write!(f, "{}", elements)
            }
        }
    }
}

// **********************************************
// Extractors: get the value inside Value.
// **********************************************
impl Value {
    pub fn is_null(&self) -> bool {
        *self == Value::Null
    }

    /// Extracts the boolean value (truthiness for other kinds).
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Integer(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
        }
    }

    /// Extracts the numeric value as a float (0.0 for non numeric kinds).
    pub fn as_float(&self) -> f64 {
        match *self {
            Value::Boolean(b) => f64::from(b),
            Value::Integer(i) => i as f64,
            Value::Float(f) => f,
            _ => 0.0,
        }
    }

    /// Extracts the &str of this value if it is a string.
    pub fn as_str(&self) -> &str {
        match self {
            Value::String(ref s) => s,
            _ => "",
        }
    }
}

// **********************************************
// Converters: set a value inside Value.
// **********************************************

macro_rules! impl_from_converter {
    ($variant:ident : $T:ty) => {
        impl From<$T> for Value {
            #[inline]
            fn from(val: $T) -> Value {
                Value::$variant(val.into())
            }
        }
    };
}

impl_from_converter!(String: String);
impl_from_converter!(String: &str);
impl_from_converter!(Integer: u8);
impl_from_converter!(Integer: u16);
impl_from_converter!(Integer: u32);
impl_from_converter!(Integer: i8);
impl_from_converter!(Integer: i16);
impl_from_converter!(Integer: i32);
impl_from_converter!(Integer: i64);
impl_from_converter!(Float: f32);
impl_from_converter!(Float: f64);
impl_from_converter!(Boolean: bool);

impl<T: Into<Value>> From<Vec<T>> for Value {
    /// Convert a `Vec` to `Value::Array`.
    fn from(f: Vec<T>) -> Self {
        Value::Array(f.into_iter().map(Into::into).collect())
    }
}
