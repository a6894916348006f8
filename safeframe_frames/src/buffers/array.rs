use crate::dtype::PrimitiveType;
use crate::error::FrameError;
use anyhow::Result;
use safeframe_types::serde::{Datum, TypedArray};

/// A non-nullable array under a [`PrimitiveType`] tag.
///
/// The storage always matches the tag's [`PrimitiveType::storage`].
#[derive(Clone, PartialEq, Debug)]
pub struct Array {
    dtype: PrimitiveType,
    data: TypedArray,
}

impl Array {
    pub fn new(dtype: PrimitiveType, data: TypedArray) -> Result<Self> {
        if data.array_type() != dtype.storage() {
            return Err(FrameError::StorageMismatch {
                tag: dtype.tag(),
                found: data.array_type(),
            }
            .into());
        }
        Ok(Self { dtype, data })
    }

    pub fn from_bools(v: Vec<bool>) -> Self {
        Self {
            dtype: PrimitiveType::Bool,
            data: TypedArray::Bool(v),
        }
    }

    pub fn from_i64s(v: Vec<i64>) -> Self {
        Self {
            dtype: PrimitiveType::Int64,
            data: TypedArray::I64(v),
        }
    }

    pub fn from_f64s(v: Vec<f64>) -> Self {
        Self {
            dtype: PrimitiveType::Float64,
            data: TypedArray::F64(v),
        }
    }

    pub fn from_strs<S: Into<String>>(v: impl IntoIterator<Item = S>) -> Self {
        Self {
            dtype: PrimitiveType::Str,
            data: TypedArray::Str(v.into_iter().map(Into::into).collect()),
        }
    }

    /// Nanoseconds since the epoch. With a `tz`, the instants are UTC.
    pub fn from_datetimes(nanos: Vec<i64>, tz: Option<&str>) -> Result<Self> {
        let dtype = match tz {
            None => PrimitiveType::DateTime,
            Some(tz) => PrimitiveType::datetime_tz(tz)?,
        };
        Ok(Self {
            dtype,
            data: TypedArray::I64(nanos),
        })
    }

    pub fn from_timedeltas(nanos: Vec<i64>) -> Self {
        Self {
            dtype: PrimitiveType::TimeDelta,
            data: TypedArray::I64(nanos),
        }
    }

    pub fn dtype(&self) -> &PrimitiveType {
        &self.dtype
    }

    pub fn data(&self) -> &TypedArray {
        &self.data
    }

    pub fn into_parts(self) -> (PrimitiveType, TypedArray) {
        (self.dtype, self.data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<Datum> {
        self.data.get(i)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn storage_must_match_tag() {
        assert!(Array::new(PrimitiveType::Int32, TypedArray::I32(vec![1])).is_ok());
        assert!(Array::new(PrimitiveType::DateTime, TypedArray::I64(vec![1])).is_ok());

        let err = Array::new(PrimitiveType::Int32, TypedArray::I64(vec![1])).unwrap_err();
        assert!(matches!(
            FrameError::of(&err),
            Some(FrameError::StorageMismatch { .. })
        ));
    }

    #[test]
    fn datetimes() -> Result<()> {
        let arr = Array::from_datetimes(vec![0], Some("Europe/Berlin"))?;
        assert_eq!(Some("Europe/Berlin"), arr.dtype().tz());
        assert!(Array::from_datetimes(vec![0], Some("")).is_err());
        Ok(())
    }
}
