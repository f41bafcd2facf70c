use std::any::Any;
use std::collections::BTreeMap;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use crate::Handler;

/// The semantic kind of a handler parameter or an emitted argument.
///
/// Kinds are compared, never concrete types: every `Arc<T>` is [`Kind::Opaque`]
/// and every list is [`Kind::List`], whatever they hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    String,
    List,
    Map,
    Opaque,
    Func,
}

impl Kind {
    /// Lowercase name of the kind, as used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Char => "char",
            Kind::I8 => "i8",
            Kind::I16 => "i16",
            Kind::I32 => "i32",
            Kind::I64 => "i64",
            Kind::Isize => "isize",
            Kind::U8 => "u8",
            Kind::U16 => "u16",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::Usize => "usize",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::String => "string",
            Kind::List => "list",
            Kind::Map => "map",
            Kind::Opaque => "opaque",
            Kind::Func => "func",
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A dynamically kinded argument value passed through the emitter.
///
/// # Example
/// ```
/// use rs_topics::{Kind, Value};
///
/// let value = Value::from("ready");
/// assert_eq!(value.kind(), Kind::String);
/// assert_eq!(Value::from(7u64).kind(), Kind::U64);
/// ```
#[derive(Clone)]
pub enum Value {
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    F32(f32),
    F64(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Opaque(Arc<dyn Any + Send + Sync>),
    Func(Handler),
}

impl Value {
    /// Wraps any shareable value as an [`Kind::Opaque`] argument.
    ///
    /// # Example
    /// ```
    /// use rs_topics::{Kind, Value};
    ///
    /// struct Thing { id: u32 }
    /// let value = Value::opaque(Thing { id: 1 });
    /// assert_eq!(value.kind(), Kind::Opaque);
    /// ```
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Value::Opaque(Arc::new(value))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::Char(_) => Kind::Char,
            Value::I8(_) => Kind::I8,
            Value::I16(_) => Kind::I16,
            Value::I32(_) => Kind::I32,
            Value::I64(_) => Kind::I64,
            Value::Isize(_) => Kind::Isize,
            Value::U8(_) => Kind::U8,
            Value::U16(_) => Kind::U16,
            Value::U32(_) => Kind::U32,
            Value::U64(_) => Kind::U64,
            Value::Usize(_) => Kind::Usize,
            Value::F32(_) => Kind::F32,
            Value::F64(_) => Kind::F64,
            Value::String(_) => Kind::String,
            Value::List(_) => Kind::List,
            Value::Map(_) => Kind::Map,
            Value::Opaque(_) => Kind::Opaque,
            Value::Func(_) => Kind::Func,
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "Bool({v})"),
            Value::Char(v) => write!(f, "Char({v:?})"),
            Value::I8(v) => write!(f, "I8({v})"),
            Value::I16(v) => write!(f, "I16({v})"),
            Value::I32(v) => write!(f, "I32({v})"),
            Value::I64(v) => write!(f, "I64({v})"),
            Value::Isize(v) => write!(f, "Isize({v})"),
            Value::U8(v) => write!(f, "U8({v})"),
            Value::U16(v) => write!(f, "U16({v})"),
            Value::U32(v) => write!(f, "U32({v})"),
            Value::U64(v) => write!(f, "U64({v})"),
            Value::Usize(v) => write!(f, "Usize({v})"),
            Value::F32(v) => write!(f, "F32({v})"),
            Value::F64(v) => write!(f, "F64({v})"),
            Value::String(v) => write!(f, "String({v:?})"),
            Value::List(v) => f.debug_tuple("List").field(v).finish(),
            Value::Map(v) => f.debug_tuple("Map").field(v).finish(),
            Value::Opaque(_) => f.write_str("Opaque(..)"),
            Value::Func(handler) => write!(f, "Func{}", handler.params()),
        }
    }
}

/// A Rust type usable as a typed handler parameter.
///
/// `KIND` is what the emitter records in a topic's signature; `from_value`
/// recovers the concrete value at invocation time.
pub trait Arg: Sized + Send + 'static {
    const KIND: Kind;

    fn into_value(self) -> Value;

    /// Returns `None` when `value` does not hold this concrete type.
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_arg {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Arg for $ty {
                const KIND: Kind = Kind::$variant;

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(inner) => Some(inner.clone()),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

impl_arg! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    String => String,
    Vec<Value> => List,
    BTreeMap<String, Value> => Map,
    Handler => Func,
}

impl<T: Any + Send + Sync> Arg for Arc<T> {
    const KIND: Kind = Kind::Opaque;

    fn into_value(self) -> Value {
        Value::Opaque(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Opaque(inner) => Arc::clone(inner).downcast::<T>().ok(),
            _ => None,
        }
    }
}

impl<T: Any + Send + Sync> From<Arc<T>> for Value {
    fn from(value: Arc<T>) -> Self {
        Value::Opaque(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}
