use crate::registry::{self, ExtType, Value};
use anyhow::Result;
use safeframe_types::serde::{DatumReader, DatumWriter, ReadResult, WriteLen};
use safeframe_types::types::{Deser, Ser};
use std::io::{Read, Write};

const VERSION: u8 = 1;

/// The host's "value absent" sentinel. There is exactly one.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
pub struct Missing;

/// ```text
/// struct Missing {
///     datum_type:     u8,     // Ext
///     ext_type:       u8,     // ExtType::Missing
///     version:        u8,
/// }
/// ```
pub fn encode_missing<W: Write>(w: &mut DatumWriter<W>) -> Result<WriteLen> {
    registry::ser_record(w, ExtType::Missing, |w| registry::ser_version(w, VERSION))
}

pub fn decode_missing<R: Read>(r: &mut DatumReader<R>) -> Result<Missing> {
    registry::read_record(r, Value::MISSING, is_missing, |r, _| deser_payload(r))
}

fn is_missing(ext_type: ExtType) -> bool {
    ext_type == ExtType::Missing
}

pub(crate) fn deser_payload<R: Read>(r: &mut DatumReader<R>) -> Result<Missing> {
    registry::check_version(r, Value::MISSING, VERSION)?;
    Ok(Missing)
}

impl Ser for Missing {
    fn ser<W: Write>(&self, w: &mut DatumWriter<W>) -> Result<WriteLen> {
        encode_missing(w)
    }
}
impl Deser for Missing {
    fn deser<R: Read>(r: &mut DatumReader<R>) -> Result<ReadResult<Self>> {
        registry::deser_record(r, Value::MISSING, is_missing, |r, _| deser_payload(r))
    }
}
