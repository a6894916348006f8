//! # Extension records
//!
//! Every entity of this crate travels as a kernel extension record:
//!
//! ```text
//! struct Record {
//!     datum_type:     u8,     // Ext
//!     ext_type:       u8,     // ExtType
//!     payload:        ...,    // owned by the entity's adapter
//! }
//! ```
//!
//! Dispatch over `ext_type` is a closed `match`; there is no runtime registration.

use crate::column::{self, Column};
use crate::error::FrameError;
use crate::index::{self, Index};
use crate::labels::{self, LabelSequence};
use crate::missing::{self, Missing};
use crate::table::{self, Table};
use anyhow::{anyhow, Result};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};
use safeframe_types::serde::{
    Datum, DatumReader, DatumType, DatumWriter, ExtTypeInt, ReadResult, WriteLen,
};
use std::io::{Read, Write};
use tracing::trace;

#[derive(FromPrimitive, ToPrimitive, PartialEq, Eq, Clone, Copy, Debug)]
#[repr(u8)]
pub enum ExtType {
    Missing = 0,
    Labels = 1,
    RangeIndex = 2,
    GenericIndex = 3,
    CategoricalIndex = 4,
    IntervalIndex = 5,
    Column = 6,
    Table = 7,
}
impl From<ExtType> for ExtTypeInt {
    fn from(ext_type: ExtType) -> ExtTypeInt {
        let int = ext_type.to_u8().unwrap_or_default();
        ExtTypeInt::from(int)
    }
}
impl TryFrom<ExtTypeInt> for ExtType {
    type Error = anyhow::Error;
    fn try_from(int: ExtTypeInt) -> Result<Self> {
        ExtType::from_u8(*int).ok_or(anyhow!("Unknown extension type {}", *int))
    }
}
impl ExtType {
    /// The kind of entity a record of this type holds.
    pub fn kind(self) -> &'static str {
        match self {
            Self::Missing => Value::MISSING,
            Self::Labels => Value::LABELS,
            Self::RangeIndex
            | Self::GenericIndex
            | Self::CategoricalIndex
            | Self::IntervalIndex => Value::INDEX,
            Self::Column => Value::COLUMN,
            Self::Table => Value::TABLE,
        }
    }
}

/// Any value that can be found at the top of a stream.
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
    Datum(Datum),
    Missing(Missing),
    Labels(LabelSequence),
    Index(Index),
    Column(Column),
    Table(Table),
}

impl Value {
    pub(crate) const DATUM: &'static str = "Datum";
    pub(crate) const MISSING: &'static str = "Missing";
    pub(crate) const LABELS: &'static str = "Labels";
    pub(crate) const INDEX: &'static str = "Index";
    pub(crate) const COLUMN: &'static str = "Column";
    pub(crate) const TABLE: &'static str = "Table";

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Datum(_) => Self::DATUM,
            Self::Missing(_) => Self::MISSING,
            Self::Labels(_) => Self::LABELS,
            Self::Index(_) => Self::INDEX,
            Self::Column(_) => Self::COLUMN,
            Self::Table(_) => Self::TABLE,
        }
    }
}

pub fn encode_value<W: Write>(value: &Value, w: &mut DatumWriter<W>) -> Result<WriteLen> {
    match value {
        Value::Datum(dat) => w.ser_datum(dat),
        Value::Missing(_) => missing::encode_missing(w),
        Value::Labels(labels) => labels::encode_labels(labels, w),
        Value::Index(idx) => index::encode_index(idx, w),
        Value::Column(col) => column::encode_column(col, w),
        Value::Table(tbl) => table::encode_table(tbl, w),
    }
}

pub fn decode_value<R: Read>(r: &mut DatumReader<R>) -> Result<Value> {
    deser_value(r)?.required(Value::DATUM)
}

/// Like [`decode_value`], but a clean EOF before the first byte is [`ReadResult::EOF`].
pub fn deser_value<R: Read>(r: &mut DatumReader<R>) -> Result<ReadResult<Value>> {
    let r_len_before = r.r_len();
    let dtype = match r.deser_type()? {
        ReadResult::EOF => return Ok(ReadResult::EOF),
        ReadResult::Some(_, dtype) => dtype,
    };
    let value = if dtype == DatumType::Ext {
        let ext_type = ExtType::try_from(r.deser_ext_type()?)?;
        deser_payload(r, ext_type)?
    } else {
        Value::Datum(r.deser_body(dtype)?)
    };
    Ok(ReadResult::Some(r.r_len() - r_len_before, value))
}

fn deser_payload<R: Read>(r: &mut DatumReader<R>, ext_type: ExtType) -> Result<Value> {
    trace!(?ext_type, "decoding record payload");
    r.nest(|r| {
        let value = match ext_type {
            ExtType::Missing => Value::Missing(missing::deser_payload(r)?),
            ExtType::Labels => Value::Labels(labels::deser_payload(r)?),
            ExtType::RangeIndex
            | ExtType::GenericIndex
            | ExtType::CategoricalIndex
            | ExtType::IntervalIndex => Value::Index(index::deser_payload(r, ext_type)?),
            ExtType::Column => Value::Column(column::deser_payload(r)?),
            ExtType::Table => Value::Table(table::deser_payload(r)?),
        };
        Ok(value)
    })
}

/// Writes a record header, then the payload inside it.
pub(crate) fn ser_record<W: Write>(
    w: &mut DatumWriter<W>,
    ext_type: ExtType,
    ser_payload: impl FnOnce(&mut DatumWriter<W>) -> Result<WriteLen>,
) -> Result<WriteLen> {
    let mut w_len = w.ser_ext_header(ext_type.into())?;
    w_len += ser_payload(w)?;
    Ok(w_len)
}

/// Reads one record whose header must satisfy `accept`, and decodes its payload.
///
/// The header is checked before any payload byte is read.
pub(crate) fn deser_record<R: Read, T>(
    r: &mut DatumReader<R>,
    expected: &'static str,
    accept: impl Fn(ExtType) -> bool,
    deser_payload: impl FnOnce(&mut DatumReader<R>, ExtType) -> Result<T>,
) -> Result<ReadResult<T>> {
    let r_len_before = r.r_len();
    let dtype = match r.deser_type()? {
        ReadResult::EOF => return Ok(ReadResult::EOF),
        ReadResult::Some(_, dtype) => dtype,
    };
    if dtype != DatumType::Ext {
        return Err(FrameError::UnexpectedRecord {
            expected,
            found: Value::DATUM,
        }
        .into());
    }
    let ext_type = ExtType::try_from(r.deser_ext_type()?)?;
    if !accept(ext_type) {
        return Err(FrameError::UnexpectedRecord {
            expected,
            found: ext_type.kind(),
        }
        .into());
    }
    let t = r.nest(|r| deser_payload(r, ext_type))?;
    Ok(ReadResult::Some(r.r_len() - r_len_before, t))
}

pub(crate) fn read_record<R: Read, T>(
    r: &mut DatumReader<R>,
    expected: &'static str,
    accept: impl Fn(ExtType) -> bool,
    deser_payload: impl FnOnce(&mut DatumReader<R>, ExtType) -> Result<T>,
) -> Result<T> {
    deser_record(r, expected, accept, deser_payload)?.required(expected)
}

/* versions */

pub(crate) fn ser_version<W: Write>(w: &mut DatumWriter<W>, version: u8) -> Result<WriteLen> {
    w.ser_raw_u8(version)
}

pub(crate) fn check_version<R: Read>(
    r: &mut DatumReader<R>,
    entity: &'static str,
    expected: u8,
) -> Result<()> {
    let found = r.read_raw_u8()?;
    if found != expected {
        return Err(FrameError::VersionMismatch {
            entity,
            expected,
            found,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::buffers::Array;
    use crate::index::RangeIndex;
    use std::io::Cursor;

    #[test]
    fn ext_type_ints() -> Result<()> {
        for int in 0..=7u8 {
            let ext_type = ExtType::try_from(ExtTypeInt::from(int))?;
            assert_eq!(ExtTypeInt::from(int), ExtTypeInt::from(ext_type));
        }
        assert!(ExtType::try_from(ExtTypeInt::from(8)).is_err());
        Ok(())
    }

    #[test]
    fn stream_of_values() -> Result<()> {
        let values = vec![
            Value::Datum(Datum::from("x")),
            Value::Missing(Missing),
            Value::Labels(LabelSequence::single("a")),
            Value::Index(Index::Range(RangeIndex::new(0, 3, 1)?)),
            Value::Column(Column::plain("c", Array::from_i64s(vec![1, 2, 3]))),
            Value::Datum(Datum::Null),
        ];

        let mut w = DatumWriter::new(vec![]);
        let mut w_len = WriteLen::default();
        for value in values.iter() {
            w_len += encode_value(value, &mut w)?;
        }
        let buf = w.into_inner();
        assert_eq!(buf.len(), *w_len);

        let mut r = DatumReader::new(Cursor::new(&buf));
        for value in values.iter() {
            let actual = decode_value(&mut r)?;
            assert_eq!(value.kind(), actual.kind());
            assert_eq!(value, &actual);
        }
        assert_eq!(ReadResult::EOF, deser_value(&mut r)?);
        Ok(())
    }

    #[test]
    fn unknown_ext_type() {
        let buf = [9u8, 200];
        let mut r = DatumReader::new(Cursor::new(&buf[..]));
        assert!(decode_value(&mut r).is_err());
    }

    #[test]
    fn wrong_record_kind() -> Result<()> {
        let mut w = DatumWriter::new(vec![]);
        missing::encode_missing(&mut w)?;
        let buf = w.into_inner();

        let mut r = DatumReader::new(Cursor::new(&buf));
        let err = column::decode_column(&mut r).unwrap_err();
        assert_eq!(
            Some(&FrameError::UnexpectedRecord {
                expected: "Column",
                found: "Missing"
            }),
            FrameError::of(&err)
        );
        Ok(())
    }
}
