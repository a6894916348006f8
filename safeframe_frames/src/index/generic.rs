use crate::buffers::Array;
use crate::error::FrameError;
use crate::index::{read_array, read_primitive_tag};
use crate::labels::{self, LabelSequence};
use anyhow::Result;
use safeframe_types::serde::{Datum, DatumReader, DatumWriter, WriteLen};
use std::io::{Read, Write};

/// Materialized labels.
///
/// ```text
/// struct GenericIndex::payload {
///     tag:        Datum::Str,
///     tag:        Datum::Str,     // must equal the above
///     names:      Labels,
///     values:     Datum::Array,
/// }
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct GenericIndex {
    values: Array,
    names: LabelSequence,
}

impl GenericIndex {
    pub fn new(values: Array) -> Self {
        Self {
            values,
            names: LabelSequence::unnamed(),
        }
    }

    pub fn with_names(mut self, names: LabelSequence) -> Self {
        self.names = names;
        self
    }

    pub fn values(&self) -> &Array {
        &self.values
    }

    pub fn names(&self) -> &LabelSequence {
        &self.names
    }

    pub fn into_values(self) -> Array {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<Datum> {
        self.values.get(i)
    }
}

pub(super) fn ser_payload<W: Write>(idx: &GenericIndex, w: &mut DatumWriter<W>) -> Result<WriteLen> {
    ser_parts(&idx.values, &idx.names, w)
}

pub(super) fn ser_parts<W: Write>(
    values: &Array,
    names: &LabelSequence,
    w: &mut DatumWriter<W>,
) -> Result<WriteLen> {
    let tag = values.dtype().tag();
    let mut w_len = w.ser_str(&tag)?;
    w_len += w.ser_str(&tag)?;
    w_len += labels::encode_labels(names, w)?;
    w_len += w.ser_array(values.data())?;
    Ok(w_len)
}

pub(super) fn deser_payload<R: Read>(r: &mut DatumReader<R>) -> Result<GenericIndex> {
    let dtype = read_primitive_tag(r)?;
    let dtype_again = read_primitive_tag(r)?;
    if dtype != dtype_again {
        return Err(FrameError::DisallowedElementType(format!(
            "{} (declared as {})",
            dtype_again.tag(),
            dtype.tag()
        ))
        .into());
    }
    let names = labels::decode_labels(r)?;
    let values = read_array(r, dtype)?;
    Ok(GenericIndex { values, names })
}
