use crate::dtype::NullableType;
use crate::error::FrameError;
use anyhow::{anyhow, Result};
use num_traits::NumCast;
use safeframe_types::serde::{Datum, TypedArray};
use std::any;

/// A nullable array: a backing primitive buffer plus a mask, `true` where the value is missing.
///
/// Backing values at masked positions carry no meaning. They are reset to the
/// storage type's zero value on construction, so two arrays with equal masks
/// and equal unmasked values compare equal.
#[derive(Clone, PartialEq, Debug)]
pub struct NullableArray {
    dtype: NullableType,
    values: TypedArray,
    mask: Vec<bool>,
}

impl NullableArray {
    pub fn new(dtype: NullableType, mut values: TypedArray, mask: Vec<bool>) -> Result<Self> {
        if values.array_type() != dtype.storage() {
            return Err(FrameError::StorageMismatch {
                tag: String::from(dtype.tag()),
                found: values.array_type(),
            }
            .into());
        }
        if values.len() != mask.len() {
            return Err(FrameError::LengthMismatch {
                what: "nullable mask",
                expected: values.len(),
                found: mask.len(),
            }
            .into());
        }
        values.zero_masked(&mask);
        Ok(Self {
            dtype,
            values,
            mask,
        })
    }

    pub fn from_bools(vals: &[Option<bool>]) -> Self {
        let mask = vals.iter().map(Option::is_none).collect();
        let values = vals.iter().map(|v| v.unwrap_or_default()).collect();
        Self {
            dtype: NullableType::Boolean,
            values: TypedArray::Bool(values),
            mask,
        }
    }

    /// Fails if `dtype` is not an integer type, or if a value does not fit it.
    pub fn from_ints<S>(dtype: NullableType, vals: &[Option<S>]) -> Result<Self>
    where
        S: NumCast + Copy + std::fmt::Display,
    {
        let values = match dtype {
            NullableType::Int8 => TypedArray::I8(cast_all(vals)?),
            NullableType::Int16 => TypedArray::I16(cast_all(vals)?),
            NullableType::Int32 => TypedArray::I32(cast_all(vals)?),
            NullableType::Int64 => TypedArray::I64(cast_all(vals)?),
            NullableType::UInt8 => TypedArray::U8(cast_all(vals)?),
            NullableType::UInt16 => TypedArray::U16(cast_all(vals)?),
            NullableType::UInt32 => TypedArray::U32(cast_all(vals)?),
            NullableType::UInt64 => TypedArray::U64(cast_all(vals)?),
            _ => return Err(anyhow!("{} is not an integer type", dtype.tag())),
        };
        let mask = vals.iter().map(Option::is_none).collect();
        Self::new(dtype, values, mask)
    }

    /// NaN values are kept as values; only `None` is missing.
    pub fn from_floats(dtype: NullableType, vals: &[Option<f64>]) -> Result<Self> {
        let values = match dtype {
            NullableType::Float32 => TypedArray::F32(cast_all(vals)?),
            NullableType::Float64 => TypedArray::F64(cast_all(vals)?),
            _ => return Err(anyhow!("{} is not a float type", dtype.tag())),
        };
        let mask = vals.iter().map(Option::is_none).collect();
        Self::new(dtype, values, mask)
    }

    pub fn dtype(&self) -> NullableType {
        self.dtype
    }

    pub fn values(&self) -> &TypedArray {
        &self.values
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    pub fn len(&self) -> usize {
        self.mask.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }

    pub fn is_missing(&self, i: usize) -> bool {
        self.mask.get(i).copied().unwrap_or(false)
    }

    /// `None` where the value is missing, or `i` is out of range.
    pub fn get(&self, i: usize) -> Option<Datum> {
        if self.is_missing(i) {
            return None;
        }
        self.values.get(i)
    }

    pub fn to_options(&self) -> Vec<Option<Datum>> {
        (0..self.len()).map(|i| self.get(i)).collect()
    }
}

fn cast_all<S, T>(vals: &[Option<S>]) -> Result<Vec<T>>
where
    S: NumCast + Copy + std::fmt::Display,
    T: NumCast + Default,
{
    vals.iter()
        .map(|v| match v {
            None => Ok(T::default()),
            Some(v) => <T as NumCast>::from(*v)
                .ok_or_else(|| anyhow!("{} does not fit {}", v, any::type_name::<T>())),
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn masked_filler_is_zeroed() -> Result<()> {
        let arr = NullableArray::new(
            NullableType::Int64,
            TypedArray::I64(vec![1, 2, 999, 4]),
            vec![false, false, true, false],
        )?;
        assert_eq!(&TypedArray::I64(vec![1, 2, 0, 4]), arr.values());
        assert_eq!(
            arr,
            NullableArray::from_ints(NullableType::Int64, &[Some(1), Some(2), None, Some(4)])?
        );
        assert_eq!(None, arr.get(2));
        assert_eq!(Some(Datum::I64(4)), arr.get(3));
        Ok(())
    }

    #[test]
    fn invalid() {
        assert!(NullableArray::new(
            NullableType::Int32,
            TypedArray::I64(vec![1]),
            vec![false]
        )
        .is_err());
        assert!(NullableArray::new(NullableType::Int64, TypedArray::I64(vec![1]), vec![]).is_err());
        assert!(NullableArray::from_ints(NullableType::UInt8, &[Some(256)]).is_err());
        assert!(NullableArray::from_ints(NullableType::UInt32, &[Some(-1)]).is_err());
        assert!(NullableArray::from_ints(NullableType::Float32, &[Some(1)]).is_err());
        assert!(NullableArray::from_ints(NullableType::Int64, &[Some(u64::MAX)]).is_err());
    }

    #[test]
    fn wide_unsigned() -> Result<()> {
        let arr = NullableArray::from_ints(NullableType::UInt64, &[Some(u64::MAX), None])?;
        assert_eq!(&TypedArray::U64(vec![u64::MAX, 0]), arr.values());
        assert_eq!(vec![Some(Datum::U64(u64::MAX)), None], arr.to_options());
        Ok(())
    }

    #[test]
    fn floats() -> Result<()> {
        let arr = NullableArray::from_floats(NullableType::Float32, &[Some(3.5), None, Some(2.0)])?;
        assert_eq!(
            vec![Some(Datum::F64(3.5)), None, Some(Datum::F64(2.0))],
            arr.to_options()
        );
        Ok(())
    }
}
