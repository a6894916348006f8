use crate::buffers::Array;
use crate::error::FrameError;
use anyhow::Result;
use safeframe_types::serde::{Datum, TypedArray};
use std::collections::HashSet;
use std::hash::Hash;

/// The code of a missing element.
pub const MISSING_CODE: i64 = -1;

/// Values drawn from a fixed set of categories, stored as positions into it.
#[derive(Clone, PartialEq, Debug)]
pub struct Categorical {
    categories: Array,
    codes: Vec<i64>,
    ordered: bool,
}

impl Categorical {
    /// Categories must be unique. Every code must be [`MISSING_CODE`] or a
    /// position into `categories`.
    pub fn new(categories: Array, codes: Vec<i64>, ordered: bool) -> Result<Self> {
        if let Some(at) = first_duplicate(categories.data()) {
            let value = categories
                .get(at)
                .map_or_else(String::new, |dat| format!("{:?}", dat));
            return Err(FrameError::DuplicateCategory { at, value }.into());
        }
        let n = categories.len();
        for &code in codes.iter() {
            let valid = code == MISSING_CODE || (0 <= code && (code as u64) < n as u64);
            if !valid {
                return Err(FrameError::InvalidCode {
                    code,
                    categories: n,
                }
                .into());
            }
        }
        Ok(Self {
            categories,
            codes,
            ordered,
        })
    }

    /// Encodes `values` against `categories`. A value that is `None`, or not
    /// among the categories, becomes missing.
    pub fn from_values(
        values: &[Option<Datum>],
        categories: Array,
        ordered: bool,
    ) -> Result<Self> {
        let cats = (0..categories.len())
            .filter_map(|i| categories.get(i))
            .collect::<Vec<_>>();
        let codes = values
            .iter()
            .map(|val| {
                val.as_ref()
                    .and_then(|val| cats.iter().position(|cat| cat == val))
                    .map_or(MISSING_CODE, |pos| pos as i64)
            })
            .collect();
        Self::new(categories, codes, ordered)
    }

    pub fn categories(&self) -> &Array {
        &self.categories
    }

    pub fn codes(&self) -> &[i64] {
        &self.codes
    }

    pub fn ordered(&self) -> bool {
        self.ordered
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// `None` where the element is missing, or `i` is out of range.
    pub fn get(&self, i: usize) -> Option<Datum> {
        let code = *self.codes.get(i)?;
        if code == MISSING_CODE {
            return None;
        }
        self.categories.get(code as usize)
    }

    /// The codes in the narrowest signed width that holds every category position.
    pub fn codes_array(&self) -> TypedArray {
        let n = self.categories.len();
        if n <= i8::MAX as usize {
            TypedArray::I8(self.codes.iter().map(|&c| c as i8).collect())
        } else if n <= i16::MAX as usize {
            TypedArray::I16(self.codes.iter().map(|&c| c as i16).collect())
        } else if n <= i32::MAX as usize {
            TypedArray::I32(self.codes.iter().map(|&c| c as i32).collect())
        } else {
            TypedArray::I64(self.codes.clone())
        }
    }
}

/// Position of the first element equal to an earlier one.
/// Floats compare by value, so `0.0` and `-0.0` collide.
fn first_duplicate(data: &TypedArray) -> Option<usize> {
    fn position<K: Hash + Eq>(mut keys: impl Iterator<Item = K>) -> Option<usize> {
        let mut seen = HashSet::new();
        keys.position(|key| !seen.insert(key))
    }

    match data {
        TypedArray::Bool(v) => position(v.iter()),
        TypedArray::I8(v) => position(v.iter()),
        TypedArray::I16(v) => position(v.iter()),
        TypedArray::I32(v) => position(v.iter()),
        TypedArray::I64(v) => position(v.iter()),
        TypedArray::U8(v) => position(v.iter()),
        TypedArray::U16(v) => position(v.iter()),
        TypedArray::U32(v) => position(v.iter()),
        TypedArray::U64(v) => position(v.iter()),
        TypedArray::F32(v) => position(v.iter().map(|f| (f + 0.0).to_bits())),
        TypedArray::F64(v) => position(v.iter().map(|f| (f + 0.0).to_bits())),
        TypedArray::Str(v) => position(v.iter()),
    }
}
