use crate::serde::TypedArray;

mod convert;
mod deser;
mod ser;
pub use deser::*;
pub use ser::*;

#[derive(PartialEq, Clone, Debug)]
pub enum Datum {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Bytes(Vec<u8>),
    Str(String),
    List(Vec<Datum>),
    Array(TypedArray),
}

impl Datum {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for Datum {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}
impl From<i64> for Datum {
    fn from(i: i64) -> Self {
        Self::I64(i)
    }
}
impl From<u64> for Datum {
    fn from(u: u64) -> Self {
        Self::U64(u)
    }
}
impl From<f64> for Datum {
    fn from(f: f64) -> Self {
        Self::F64(f)
    }
}
impl From<&str> for Datum {
    fn from(s: &str) -> Self {
        Self::Str(String::from(s))
    }
}
impl From<String> for Datum {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}
impl From<Vec<Datum>> for Datum {
    fn from(members: Vec<Datum>) -> Self {
        Self::List(members)
    }
}
impl From<TypedArray> for Datum {
    fn from(arr: TypedArray) -> Self {
        Self::Array(arr)
    }
}
impl<T> From<Option<T>> for Datum
where
    T: Into<Datum>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            None => Self::Null,
            Some(t) => t.into(),
        }
    }
}
