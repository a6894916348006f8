use crate::serde::Datum;
use anyhow::{anyhow, Result};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};
use std::mem;

/// The element representation of a [`TypedArray`], as encoded on the wire.
#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum ArrayType {
    Bool = 0,
    I8 = 1,
    I16 = 2,
    I32 = 3,
    I64 = 4,
    U8 = 5,
    U16 = 6,
    U32 = 7,
    U64 = 8,
    F32 = 9,
    F64 = 10,
    Str = 11,
}
impl ArrayType {
    pub fn to_int(self) -> u8 {
        self.to_u8().unwrap_or_default()
    }
    pub fn from_int(int: u8) -> Result<Self> {
        Self::from_u8(int).ok_or(anyhow!("Unknown array_type {}", int))
    }
}

/// A homogeneous, owned, contiguous buffer.
///
/// The element representation is part of the value; it is not inferred from the contents.
#[derive(Clone, Debug)]
pub enum TypedArray {
    Bool(Vec<bool>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    Str(Vec<String>),
}

/// Dispatches `$body` over every variant, binding the inner `Vec` to `$v`.
macro_rules! with_vec {
    ($arr:expr, $v:ident => $body:expr) => {
        match $arr {
            TypedArray::Bool($v) => $body,
            TypedArray::I8($v) => $body,
            TypedArray::I16($v) => $body,
            TypedArray::I32($v) => $body,
            TypedArray::I64($v) => $body,
            TypedArray::U8($v) => $body,
            TypedArray::U16($v) => $body,
            TypedArray::U32($v) => $body,
            TypedArray::U64($v) => $body,
            TypedArray::F32($v) => $body,
            TypedArray::F64($v) => $body,
            TypedArray::Str($v) => $body,
        }
    };
}

impl TypedArray {
    pub fn empty(array_type: ArrayType) -> Self {
        match array_type {
            ArrayType::Bool => Self::Bool(vec![]),
            ArrayType::I8 => Self::I8(vec![]),
            ArrayType::I16 => Self::I16(vec![]),
            ArrayType::I32 => Self::I32(vec![]),
            ArrayType::I64 => Self::I64(vec![]),
            ArrayType::U8 => Self::U8(vec![]),
            ArrayType::U16 => Self::U16(vec![]),
            ArrayType::U32 => Self::U32(vec![]),
            ArrayType::U64 => Self::U64(vec![]),
            ArrayType::F32 => Self::F32(vec![]),
            ArrayType::F64 => Self::F64(vec![]),
            ArrayType::Str => Self::Str(vec![]),
        }
    }

    pub fn array_type(&self) -> ArrayType {
        match self {
            Self::Bool(_) => ArrayType::Bool,
            Self::I8(_) => ArrayType::I8,
            Self::I16(_) => ArrayType::I16,
            Self::I32(_) => ArrayType::I32,
            Self::I64(_) => ArrayType::I64,
            Self::U8(_) => ArrayType::U8,
            Self::U16(_) => ArrayType::U16,
            Self::U32(_) => ArrayType::U32,
            Self::U64(_) => ArrayType::U64,
            Self::F32(_) => ArrayType::F32,
            Self::F64(_) => ArrayType::F64,
            Self::Str(_) => ArrayType::Str,
        }
    }

    pub fn len(&self) -> usize {
        with_vec!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element at `i`, widened to the nearest [`Datum`] scalar.
    pub fn get(&self, i: usize) -> Option<Datum> {
        let dat = match self {
            Self::Bool(v) => Datum::Bool(*v.get(i)?),
            Self::I8(v) => Datum::I64(*v.get(i)? as i64),
            Self::I16(v) => Datum::I64(*v.get(i)? as i64),
            Self::I32(v) => Datum::I64(*v.get(i)? as i64),
            Self::I64(v) => Datum::I64(*v.get(i)?),
            Self::U8(v) => Datum::U64(*v.get(i)? as u64),
            Self::U16(v) => Datum::U64(*v.get(i)? as u64),
            Self::U32(v) => Datum::U64(*v.get(i)? as u64),
            Self::U64(v) => Datum::U64(*v.get(i)?),
            Self::F32(v) => Datum::F64(*v.get(i)? as f64),
            Self::F64(v) => Datum::F64(*v.get(i)?),
            Self::Str(v) => Datum::Str(v.get(i)?.clone()),
        };
        Some(dat)
    }

    /// Resets the elements at masked positions to the element type's zero value.
    pub fn zero_masked(&mut self, mask: &[bool]) {
        with_vec!(self, v => {
            for (elem, masked) in v.iter_mut().zip(mask.iter()) {
                if *masked {
                    *elem = Default::default();
                }
            }
        })
    }

    /// Widens a signed integer array to `i64`s. `None` for any other element type.
    pub fn to_i64s(&self) -> Option<Vec<i64>> {
        let ints = match self {
            Self::I8(v) => v.iter().map(|i| *i as i64).collect(),
            Self::I16(v) => v.iter().map(|i| *i as i64).collect(),
            Self::I32(v) => v.iter().map(|i| *i as i64).collect(),
            Self::I64(v) => v.clone(),
            _ => return None,
        };
        Some(ints)
    }
}

/* Floats compare equal when both are NaN, so that arrays compare by observable content. */
impl PartialEq for TypedArray {
    fn eq(&self, other: &TypedArray) -> bool {
        match (self, other) {
            (Self::F32(slf), Self::F32(oth)) => {
                slf.len() == oth.len()
                    && slf
                        .iter()
                        .zip(oth.iter())
                        .all(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
            }
            (Self::F64(slf), Self::F64(oth)) => {
                slf.len() == oth.len()
                    && slf
                        .iter()
                        .zip(oth.iter())
                        .all(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
            }
            (Self::Bool(slf), Self::Bool(oth)) => slf == oth,
            (Self::I8(slf), Self::I8(oth)) => slf == oth,
            (Self::I16(slf), Self::I16(oth)) => slf == oth,
            (Self::I32(slf), Self::I32(oth)) => slf == oth,
            (Self::I64(slf), Self::I64(oth)) => slf == oth,
            (Self::U8(slf), Self::U8(oth)) => slf == oth,
            (Self::U16(slf), Self::U16(oth)) => slf == oth,
            (Self::U32(slf), Self::U32(oth)) => slf == oth,
            (Self::U64(slf), Self::U64(oth)) => slf == oth,
            (Self::Str(slf), Self::Str(oth)) => slf == oth,
            _ => false,
        }
    }
}

/// A fixed-width element, packed little-endian on the wire.
pub(crate) trait FixedWidth: Sized + Copy {
    const WIDTH: usize;
    fn put_le(self, out: &mut Vec<u8>);
    fn take_le(chunk: &[u8]) -> Self;
}

macro_rules! impl_fixed_width {
    ($($t:ty),*) => {
        $(
            impl FixedWidth for $t {
                const WIDTH: usize = mem::size_of::<$t>();
                fn put_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }
                fn take_le(chunk: &[u8]) -> Self {
                    let mut buf = [0u8; mem::size_of::<$t>()];
                    buf.copy_from_slice(chunk);
                    <$t>::from_le_bytes(buf)
                }
            }
        )*
    };
}
impl_fixed_width!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);
