use crate::buffers::Array;
use crate::error::FrameError;
use crate::labels::{self, LabelSequence};
use anyhow::Result;
use safeframe_types::serde::{DatumReader, DatumWriter, WriteLen};
use std::io::{Read, Write};

/// `start, start + step, ...` up to but excluding `stop`. Elements are computed on access.
///
/// ```text
/// struct RangeIndex::payload {
///     start:      Datum::I64,
///     stop:       Datum::I64,
///     step:       Datum::I64,
///     names:      Labels,
/// }
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct RangeIndex {
    start: i64,
    stop: i64,
    step: i64,
    names: LabelSequence,
}

impl RangeIndex {
    pub fn new(start: i64, stop: i64, step: i64) -> Result<Self> {
        if step == 0 {
            return Err(FrameError::InvalidRange { start, stop }.into());
        }
        Ok(Self {
            start,
            stop,
            step,
            names: LabelSequence::unnamed(),
        })
    }

    pub fn with_names(mut self, names: LabelSequence) -> Self {
        self.names = names;
        self
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn stop(&self) -> i64 {
        self.stop
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    pub fn names(&self) -> &LabelSequence {
        &self.names
    }

    /// `max(0, ceil((stop - start) / step))`
    pub fn len(&self) -> usize {
        let span = self.stop as i128 - self.start as i128;
        let step = self.step as i128;
        // Same sign as `step`, and nonzero.
        let len = (span + step - step.signum()) / step;
        usize::try_from(len.max(0)).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, i: usize) -> Option<i64> {
        if i >= self.len() {
            return None;
        }
        let val = self.start as i128 + i as i128 * self.step as i128;
        i64::try_from(val).ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        (0..self.len()).map_while(|i| self.get(i))
    }

    /// The labels as an `int64` [`Array`].
    pub fn to_array(&self) -> Array {
        Array::from_i64s(self.iter().collect())
    }
}

pub(super) fn ser_payload<W: Write>(idx: &RangeIndex, w: &mut DatumWriter<W>) -> Result<WriteLen> {
    let mut w_len = w.ser_i64(idx.start)?;
    w_len += w.ser_i64(idx.stop)?;
    w_len += w.ser_i64(idx.step)?;
    w_len += labels::encode_labels(&idx.names, w)?;
    Ok(w_len)
}

pub(super) fn deser_payload<R: Read>(r: &mut DatumReader<R>) -> Result<RangeIndex> {
    let start = r.read_as::<i64>()?;
    let stop = r.read_as::<i64>()?;
    let step = r.read_as::<i64>()?;
    let names = labels::decode_labels(r)?;
    Ok(RangeIndex::new(start, stop, step)?.with_names(names))
}
