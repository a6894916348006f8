use crate::serde::{Datum, DatumType, TypedArray};
use anyhow::{anyhow, Error, Result};
use std::any;

fn unexpected<T>(dat: &Datum) -> Error {
    anyhow!(
        "Expected {}, found {:?} datum",
        any::type_name::<T>(),
        DatumType::from(dat)
    )
}

macro_rules! impl_try_from_datum {
    ($t:ty, $variant:ident) => {
        impl TryFrom<Datum> for $t {
            type Error = Error;
            fn try_from(dat: Datum) -> Result<Self> {
                match dat {
                    Datum::$variant(inner) => Ok(inner),
                    _ => Err(unexpected::<Self>(&dat)),
                }
            }
        }
    };
}
impl_try_from_datum!(bool, Bool);
impl_try_from_datum!(i64, I64);
impl_try_from_datum!(u64, U64);
impl_try_from_datum!(f64, F64);
impl_try_from_datum!(String, Str);
impl_try_from_datum!(Vec<Datum>, List);
impl_try_from_datum!(TypedArray, Array);

impl TryFrom<Datum> for usize {
    type Error = Error;
    fn try_from(dat: Datum) -> Result<Self> {
        let u = u64::try_from(dat)?;
        Ok(usize::try_from(u)?)
    }
}

/// A string or a null.
impl TryFrom<Datum> for Option<String> {
    type Error = Error;
    fn try_from(dat: Datum) -> Result<Self> {
        match dat {
            Datum::Null => Ok(None),
            Datum::Str(s) => Ok(Some(s)),
            _ => Err(unexpected::<Self>(&dat)),
        }
    }
}
