use crate::serde::Datum;
use anyhow::{anyhow, Result};
use derive_more::{Deref, From};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};
use std::any;

#[derive(From, Deref, Clone, Copy, PartialEq, Eq, Debug)]
pub struct DatumTypeInt(u8);
impl From<DatumType> for DatumTypeInt {
    fn from(dat_type: DatumType) -> Self {
        // Every member has an explicit u8 discriminant.
        Self(dat_type.to_u8().unwrap_or_default())
    }
}

/// We manually map enum members to datum_type integers because:
/// - Rust does not support specifying discriminants on an enum containing non-simple members.
/// - One member, Ext, is outside the Datum enum. Its body is owned by whoever registered the extension.
/// - An automatic discriminant may change w/ enum definition change or compilation, according to [`std::mem::discriminant()`] doc.
#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum DatumType {
    Null = 0,
    Bool = 1,
    I64 = 2,
    U64 = 3,
    F64 = 4,
    Bytes = 5,
    Str = 6,
    List = 7,
    Array = 8,
    Ext = 9,
}
impl TryFrom<DatumTypeInt> for DatumType {
    type Error = anyhow::Error;
    fn try_from(int: DatumTypeInt) -> Result<Self> {
        DatumType::from_u8(int.0).ok_or(anyhow!(
            "Unknown {} {}",
            any::type_name::<DatumTypeInt>(),
            int.0
        ))
    }
}
impl From<&Datum> for DatumType {
    fn from(dat: &Datum) -> Self {
        match dat {
            Datum::Null => DatumType::Null,
            Datum::Bool(_) => DatumType::Bool,
            Datum::I64(_) => DatumType::I64,
            Datum::U64(_) => DatumType::U64,
            Datum::F64(_) => DatumType::F64,
            Datum::Bytes(_) => DatumType::Bytes,
            Datum::Str(_) => DatumType::Str,
            Datum::List(_) => DatumType::List,
            Datum::Array(_) => DatumType::Array,
        }
    }
}

/// Identifies the kind of an extension record.
/// The kernel only frames it; the mapping to record kinds is owned by the extension's author.
#[derive(From, Deref, Clone, Copy, PartialEq, Eq, Debug)]
pub struct ExtTypeInt(u8);
