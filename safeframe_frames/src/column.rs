//! # Column record
//!
//! ```text
//! struct Column {
//!     datum_type:     u8,             // Ext
//!     ext_type:       u8,             // ExtType::Column
//!     version:        u8,
//!     name:           Datum::*,       // Null if unnamed
//!     tag:            Datum::Str,     // element type
//!     values:         ...,            // by tag, below
//! }
//!
//! "string"        Datum::List of Datum::Str or Datum::Null
//! NULLABLE tags   mask: Datum::Array<Bool>, then values: Datum::Array
//! "category"      Categorical (see the categorical index)
//! PRIMITIVE tags  values: Datum::Array
//! ```

use crate::buffers::{Array, Categorical, NullableArray};
use crate::dtype::ElementType;
use crate::error::FrameError;
use crate::index::{check_array_tag, deser_categorical, read_array, ser_categorical};
use crate::labels::check_label;
use crate::registry::{self, ExtType, Value};
use anyhow::{anyhow, Result};
use safeframe_types::serde::{Datum, DatumReader, DatumWriter, ReadResult, TypedArray, WriteLen};
use safeframe_types::types::{Deser, Ser};
use std::io::{Read, Write};
use tracing::{debug, trace};

const VERSION: u8 = 1;

#[derive(Clone, PartialEq, Debug)]
pub enum ColumnValues {
    Plain(Array),
    Nullable(NullableArray),
    Categorical(Categorical),
    Strings(Vec<Option<String>>),
    /// Values under an element type that has no encoding. Encoding such a column fails.
    Opaque { tag: String, values: Vec<Datum> },
}

impl ColumnValues {
    pub fn tag(&self) -> String {
        match self {
            Self::Plain(arr) => arr.dtype().tag(),
            Self::Nullable(arr) => String::from(arr.dtype().tag()),
            Self::Categorical(_) => String::from(crate::dtype::CATEGORY_TAG),
            Self::Strings(_) => String::from(crate::dtype::STRING_TAG),
            Self::Opaque { tag, .. } => tag.clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Plain(arr) => arr.len(),
            Self::Nullable(arr) => arr.len(),
            Self::Categorical(cat) => cat.len(),
            Self::Strings(strs) => strs.len(),
            Self::Opaque { values, .. } => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `None` where the value is missing, or `i` is out of range.
    pub fn get(&self, i: usize) -> Option<Datum> {
        match self {
            Self::Plain(arr) => arr.get(i),
            Self::Nullable(arr) => arr.get(i),
            Self::Categorical(cat) => cat.get(i),
            Self::Strings(strs) => strs.get(i)?.as_deref().map(Datum::from),
            Self::Opaque { values, .. } => values.get(i).filter(|v| !v.is_null()).cloned(),
        }
    }
}

/// A named sequence of values under one element type.
#[derive(Clone, PartialEq, Debug)]
pub struct Column {
    name: Datum,
    values: ColumnValues,
}

impl Column {
    /// `name` is any label; [`Datum::Null`] for an unnamed column.
    pub fn new(name: impl Into<Datum>, values: ColumnValues) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn plain(name: impl Into<Datum>, values: Array) -> Self {
        Self::new(name, ColumnValues::Plain(values))
    }

    pub fn nullable(name: impl Into<Datum>, values: NullableArray) -> Self {
        Self::new(name, ColumnValues::Nullable(values))
    }

    pub fn categorical(name: impl Into<Datum>, values: Categorical) -> Self {
        Self::new(name, ColumnValues::Categorical(values))
    }

    pub fn strings(name: impl Into<Datum>, values: Vec<Option<String>>) -> Self {
        Self::new(name, ColumnValues::Strings(values))
    }

    pub fn name(&self) -> &Datum {
        &self.name
    }

    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    pub fn into_parts(self) -> (Datum, ColumnValues) {
        (self.name, self.values)
    }

    pub fn tag(&self) -> String {
        self.values.tag()
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

    /// Everything `encode_column` would refuse, checked before the first byte is written.
    pub(crate) fn validate(&self) -> Result<String> {
        let tag = self.tag();
        match &self.values {
            ColumnValues::Opaque { .. } => {
                // Parsing fails with DisallowedElementType for a tag outside the allow-lists.
                ElementType::parse(&tag)?;
                return Err(FrameError::UnimplementedElementType(tag).into());
            }
            ColumnValues::Plain(arr) => check_array_tag(arr)?,
            ColumnValues::Categorical(cat) => check_array_tag(cat.categories())?,
            ColumnValues::Nullable(_) | ColumnValues::Strings(_) => (),
        }
        check_label(&self.name)?;
        Ok(tag)
    }
}

pub fn encode_column<W: Write>(col: &Column, w: &mut DatumWriter<W>) -> Result<WriteLen> {
    let tag = col.validate()?;
    debug!(%tag, len = col.len(), "encoding column");
    registry::ser_record(w, ExtType::Column, |w| {
        let mut w_len = registry::ser_version(w, VERSION)?;
        w_len += w.ser_datum(&col.name)?;
        w_len += w.ser_str(&tag)?;
        w_len += ser_values(&col.values, w)?;
        Ok(w_len)
    })
}

fn ser_values<W: Write>(values: &ColumnValues, w: &mut DatumWriter<W>) -> Result<WriteLen> {
    match values {
        ColumnValues::Strings(strs) => {
            trace!("string branch");
            w.ser_opt_str_list(strs.iter().map(Option::as_deref))
        }
        ColumnValues::Nullable(arr) => {
            trace!("nullable branch");
            let mut w_len = w.ser_array(&TypedArray::Bool(arr.mask().to_vec()))?;
            w_len += w.ser_array(arr.values())?;
            Ok(w_len)
        }
        ColumnValues::Categorical(cat) => {
            trace!("categorical branch");
            ser_categorical(cat, w)
        }
        ColumnValues::Plain(arr) => {
            trace!("plain branch");
            w.ser_array(arr.data())
        }
        ColumnValues::Opaque { tag, .. } => {
            Err(FrameError::UnimplementedElementType(tag.clone()).into())
        }
    }
}

pub fn decode_column<R: Read>(r: &mut DatumReader<R>) -> Result<Column> {
    registry::read_record(r, Value::COLUMN, is_column, |r, _| deser_payload(r))
}

fn is_column(ext_type: ExtType) -> bool {
    ext_type == ExtType::Column
}

pub(crate) fn deser_payload<R: Read>(r: &mut DatumReader<R>) -> Result<Column> {
    registry::check_version(r, Value::COLUMN, VERSION)?;
    let name = r.read_datum()?;
    check_label(&name)?;
    let tag = r.read_as::<String>()?;
    let values = match ElementType::parse(&tag)? {
        ElementType::String => {
            trace!("string branch");
            let strs = r
                .read_as::<Vec<Datum>>()?
                .into_iter()
                .map(Option::<String>::try_from)
                .collect::<Result<Vec<_>>>()?;
            ColumnValues::Strings(strs)
        }
        ElementType::Nullable(dtype) => {
            trace!("nullable branch");
            let mask = match r.read_as::<TypedArray>()? {
                TypedArray::Bool(mask) => mask,
                other => return Err(anyhow!("Mask must be bools, found {:?}", other.array_type())),
            };
            let values = r.read_as::<TypedArray>()?;
            ColumnValues::Nullable(NullableArray::new(dtype, values, mask)?)
        }
        ElementType::Category => {
            trace!("categorical branch");
            ColumnValues::Categorical(deser_categorical(r)?)
        }
        ElementType::Primitive(dtype) => {
            trace!("plain branch");
            ColumnValues::Plain(read_array(r, dtype)?)
        }
        ElementType::Interval(..) => return Err(FrameError::UnimplementedElementType(tag).into()),
    };
    let col = Column { name, values };
    debug!(%tag, len = col.len(), "decoded column");
    Ok(col)
}

impl Ser for Column {
    fn ser<W: Write>(&self, w: &mut DatumWriter<W>) -> Result<WriteLen> {
        encode_column(self, w)
    }
}
impl Deser for Column {
    fn deser<R: Read>(r: &mut DatumReader<R>) -> Result<ReadResult<Self>> {
        registry::deser_record(r, Value::COLUMN, is_column, |r, _| deser_payload(r))
    }
}
