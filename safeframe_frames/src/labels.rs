use crate::error::FrameError;
use crate::registry::{self, ExtType, Value};
use anyhow::Result;
use derive_more::{Deref, From};
use safeframe_types::serde::{Datum, DatumReader, DatumWriter, ReadResult, WriteLen};
use safeframe_types::types::{Deser, Ser};
use std::io::{Read, Write};

/// An ordered list of labels: the names of an index's levels, for example.
///
/// A label is any [`Datum`] other than an array. [`Datum::Null`] stands for "unnamed".
#[derive(From, Deref, PartialEq, Clone, Debug)]
pub struct LabelSequence(Vec<Datum>);

impl LabelSequence {
    /// One unnamed level.
    pub fn unnamed() -> Self {
        Self(vec![Datum::Null])
    }

    pub fn single(name: impl Into<Datum>) -> Self {
        Self(vec![name.into()])
    }

    pub fn into_inner(self) -> Vec<Datum> {
        self.0
    }
}

impl Default for LabelSequence {
    fn default() -> Self {
        Self::unnamed()
    }
}

pub fn check_label(label: &Datum) -> Result<()> {
    match label {
        Datum::Array(_) => Err(FrameError::InvalidLabel(format!("{:?}", label)).into()),
        Datum::List(members) => members.iter().try_for_each(check_label),
        _ => Ok(()),
    }
}

/// ```text
/// struct Labels {
///     datum_type:     u8,     // Ext
///     ext_type:       u8,     // ExtType::Labels
///     labels:         Datum::List,
/// }
/// ```
pub fn encode_labels<W: Write>(labels: &LabelSequence, w: &mut DatumWriter<W>) -> Result<WriteLen> {
    labels.iter().try_for_each(check_label)?;
    registry::ser_record(w, ExtType::Labels, |w| w.ser_list(labels))
}

pub fn decode_labels<R: Read>(r: &mut DatumReader<R>) -> Result<LabelSequence> {
    registry::read_record(r, Value::LABELS, is_labels, |r, _| deser_payload(r))
}

fn is_labels(ext_type: ExtType) -> bool {
    ext_type == ExtType::Labels
}

pub(crate) fn deser_payload<R: Read>(r: &mut DatumReader<R>) -> Result<LabelSequence> {
    let labels = r.read_as::<Vec<Datum>>()?;
    labels.iter().try_for_each(check_label)?;
    Ok(LabelSequence(labels))
}

impl Ser for LabelSequence {
    fn ser<W: Write>(&self, w: &mut DatumWriter<W>) -> Result<WriteLen> {
        encode_labels(self, w)
    }
}
impl Deser for LabelSequence {
    fn deser<R: Read>(r: &mut DatumReader<R>) -> Result<ReadResult<Self>> {
        registry::deser_record(r, Value::LABELS, is_labels, |r, _| deser_payload(r))
    }
}
