use crate::buffers::Array;
use crate::dtype::Closed;
use crate::error::FrameError;
use crate::index::{read_array, read_primitive_tag};
use crate::labels::{self, LabelSequence};
use anyhow::{anyhow, Result};
use safeframe_types::serde::{Datum, DatumReader, DatumWriter, WriteLen};
use std::io::{Read, Write};

/// Intervals `(left[i], right[i])`, all closed on the same side.
///
/// ```text
/// struct IntervalIndex::payload {
///     tag:        Datum::Str,     // of both boundary arrays
///     closed:     Datum::Str,     // left | right | both | neither
///     names:      Labels,
///     left:       Datum::Array,
///     right:      Datum::Array,
/// }
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct IntervalIndex {
    left: Array,
    right: Array,
    closed: Closed,
    names: LabelSequence,
}

impl IntervalIndex {
    pub fn new(left: Array, right: Array, closed: Closed) -> Result<Self> {
        if left.dtype() != right.dtype() {
            return Err(anyhow!(
                "Interval boundaries differ in type: {} and {}",
                left.dtype().tag(),
                right.dtype().tag()
            ));
        }
        if left.len() != right.len() {
            return Err(FrameError::LengthMismatch {
                what: "interval boundaries",
                expected: left.len(),
                found: right.len(),
            }
            .into());
        }
        Ok(Self {
            left,
            right,
            closed,
            names: LabelSequence::unnamed(),
        })
    }

    pub fn with_names(mut self, names: LabelSequence) -> Self {
        self.names = names;
        self
    }

    pub fn left(&self) -> &Array {
        &self.left
    }

    pub fn right(&self) -> &Array {
        &self.right
    }

    pub fn closed(&self) -> Closed {
        self.closed
    }

    pub fn names(&self) -> &LabelSequence {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// A two member list, `[left, right]`.
    pub fn get(&self, i: usize) -> Option<Datum> {
        Some(Datum::List(vec![self.left.get(i)?, self.right.get(i)?]))
    }
}

pub(super) fn ser_payload<W: Write>(idx: &IntervalIndex, w: &mut DatumWriter<W>) -> Result<WriteLen> {
    let mut w_len = w.ser_str(&idx.left.dtype().tag())?;
    w_len += w.ser_str(idx.closed.as_str())?;
    w_len += labels::encode_labels(&idx.names, w)?;
    w_len += w.ser_array(idx.left.data())?;
    w_len += w.ser_array(idx.right.data())?;
    Ok(w_len)
}

pub(super) fn deser_payload<R: Read>(r: &mut DatumReader<R>) -> Result<IntervalIndex> {
    let dtype = read_primitive_tag(r)?;
    let closed = r.read_as::<String>()?;
    let closed = Closed::parse(&closed).ok_or(anyhow!("Invalid interval side {:?}", closed))?;
    let names = labels::decode_labels(r)?;
    let left = read_array(r, dtype.clone())?;
    let right = read_array(r, dtype)?;
    Ok(IntervalIndex::new(left, right, closed)?.with_names(names))
}
