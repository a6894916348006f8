//! Row labels.
//!
//! ```text
//! struct Index {
//!     datum_type:     u8,     // Ext
//!     ext_type:       u8,     // ExtType::{Range,Generic,Categorical,Interval}Index
//!     payload:        ...,    // per variant; see each variant's module
//! }
//! ```
//!
//! Every variant carries its level names as a [`LabelSequence`] record.

use crate::buffers::Array;
use crate::dtype::PrimitiveType;
use crate::error::FrameError;
use crate::labels::LabelSequence;
use crate::registry::{self, ExtType, Value};
use anyhow::Result;
use safeframe_types::serde::{Datum, DatumReader, DatumWriter, ReadResult, TypedArray, WriteLen};
use safeframe_types::types::{Deser, Ser};
use std::io::{Read, Write};
use tracing::trace;

mod categorical;
mod generic;
mod interval;
mod range;

pub use categorical::CategoricalIndex;
pub use generic::GenericIndex;
pub use interval::IntervalIndex;
pub use range::RangeIndex;

pub(crate) use categorical::{deser_categorical, ser_categorical};

#[derive(Clone, PartialEq, Debug)]
pub enum Index {
    Range(RangeIndex),
    Generic(GenericIndex),
    Categorical(CategoricalIndex),
    Interval(IntervalIndex),
}

impl Index {
    pub fn len(&self) -> usize {
        match self {
            Self::Range(idx) => idx.len(),
            Self::Generic(idx) => idx.len(),
            Self::Categorical(idx) => idx.len(),
            Self::Interval(idx) => idx.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The label at `i`. `None` if out of range, or if a categorical label is missing.
    pub fn get(&self, i: usize) -> Option<Datum> {
        match self {
            Self::Range(idx) => idx.get(i).map(Datum::I64),
            Self::Generic(idx) => idx.get(i),
            Self::Categorical(idx) => idx.get(i),
            Self::Interval(idx) => idx.get(i),
        }
    }

    pub fn names(&self) -> &LabelSequence {
        match self {
            Self::Range(idx) => idx.names(),
            Self::Generic(idx) => idx.names(),
            Self::Categorical(idx) => idx.names(),
            Self::Interval(idx) => idx.names(),
        }
    }

    fn ext_type(&self) -> ExtType {
        match self {
            Self::Range(_) => ExtType::RangeIndex,
            Self::Generic(_) => ExtType::GenericIndex,
            Self::Categorical(_) => ExtType::CategoricalIndex,
            Self::Interval(_) => ExtType::IntervalIndex,
        }
    }
}

impl From<RangeIndex> for Index {
    fn from(idx: RangeIndex) -> Self {
        Self::Range(idx)
    }
}
impl From<GenericIndex> for Index {
    fn from(idx: GenericIndex) -> Self {
        Self::Generic(idx)
    }
}
impl From<CategoricalIndex> for Index {
    fn from(idx: CategoricalIndex) -> Self {
        Self::Categorical(idx)
    }
}
impl From<IntervalIndex> for Index {
    fn from(idx: IntervalIndex) -> Self {
        Self::Interval(idx)
    }
}

pub fn encode_index<W: Write>(idx: &Index, w: &mut DatumWriter<W>) -> Result<WriteLen> {
    idx.validate()?;
    registry::ser_record(w, idx.ext_type(), |w| match idx {
        Index::Range(idx) => range::ser_payload(idx, w),
        Index::Generic(idx) => generic::ser_payload(idx, w),
        Index::Categorical(idx) => categorical::ser_payload(idx, w),
        Index::Interval(idx) => interval::ser_payload(idx, w),
    })
}

pub fn decode_index<R: Read>(r: &mut DatumReader<R>) -> Result<Index> {
    registry::read_record(r, Value::INDEX, is_index, deser_payload)
}

fn is_index(ext_type: ExtType) -> bool {
    ext_type.kind() == Value::INDEX
}

pub(crate) fn deser_payload<R: Read>(r: &mut DatumReader<R>, ext_type: ExtType) -> Result<Index> {
    trace!(?ext_type, "decoding index");
    let idx = match ext_type {
        ExtType::RangeIndex => Index::Range(range::deser_payload(r)?),
        ExtType::GenericIndex => Index::Generic(generic::deser_payload(r)?),
        ExtType::CategoricalIndex => Index::Categorical(categorical::deser_payload(r)?),
        ExtType::IntervalIndex => Index::Interval(interval::deser_payload(r)?),
        _ => {
            return Err(FrameError::UnexpectedRecord {
                expected: Value::INDEX,
                found: ext_type.kind(),
            }
            .into())
        }
    };
    Ok(idx)
}

impl Index {
    /// Everything `encode_index` would refuse, checked before the first byte is written.
    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            Self::Range(_) => (),
            Self::Generic(idx) => check_array_tag(idx.values())?,
            Self::Categorical(idx) => check_array_tag(idx.values().categories())?,
            Self::Interval(idx) => check_array_tag(idx.left())?,
        }
        self.names()
            .iter()
            .try_for_each(crate::labels::check_label)
    }
}

impl Ser for Index {
    fn ser<W: Write>(&self, w: &mut DatumWriter<W>) -> Result<WriteLen> {
        encode_index(self, w)
    }
}
impl Deser for Index {
    fn deser<R: Read>(r: &mut DatumReader<R>) -> Result<ReadResult<Self>> {
        registry::deser_record(r, Value::INDEX, is_index, deser_payload)
    }
}

/* payload helpers shared with columns */

/// A hand built [`PrimitiveType::DateTimeTz`] may carry a zone name that would not parse back.
pub(crate) fn check_array_tag(arr: &Array) -> Result<()> {
    let tag = arr.dtype().tag();
    match PrimitiveType::parse(&tag) {
        Some(_) => Ok(()),
        None => Err(FrameError::DisallowedElementType(tag).into()),
    }
}

pub(crate) fn read_primitive_tag<R: Read>(r: &mut DatumReader<R>) -> Result<PrimitiveType> {
    let tag = r.read_as::<String>()?;
    PrimitiveType::parse(&tag).ok_or_else(|| FrameError::DisallowedElementType(tag).into())
}

/// Reads an array whose storage must be that of `dtype`.
pub(crate) fn read_array<R: Read>(r: &mut DatumReader<R>, dtype: PrimitiveType) -> Result<Array> {
    let data = r.read_as::<TypedArray>()?;
    Array::new(dtype, data)
}
