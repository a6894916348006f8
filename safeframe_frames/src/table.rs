//! # Table record
//!
//! ```text
//! struct Table {
//!     datum_type:     u8,             // Ext
//!     ext_type:       u8,             // ExtType::Table
//!     version:        u8,
//!     rows:           Datum::U64,
//!     cols:           Datum::U64,
//!     index:          Index,          // `rows` labels
//!     columns:        [Column; cols], // in position order
//! }
//! ```

use crate::column::{self, Column};
use crate::error::FrameError;
use crate::index::{self, Index};
use crate::labels::check_label;
use crate::registry::{self, ExtType, Value};
use anyhow::Result;
use safeframe_types::serde::{Datum, DatumReader, DatumWriter, ReadResult, WriteLen};
use safeframe_types::types::{Deser, Ser};
use std::io::{Read, Write};
use tracing::debug;

const VERSION: u8 = 1;

/// Columns beyond this many are allocated as they are decoded.
const PREALLOC_COLUMNS: usize = 64;

/// Columns of equal length, with one row label per row.
///
/// A table may carry presentation labels for its columns. They are a display
/// overlay: they are not encoded, and never change a column's own name.
#[derive(Clone, Debug)]
pub struct Table {
    index: Index,
    columns: Vec<Column>,
    labels: Option<Vec<Datum>>,
}

impl Table {
    pub fn new(index: Index, columns: Vec<Column>) -> Result<Self> {
        let rows = index.len();
        for col in columns.iter() {
            if col.len() != rows {
                return Err(FrameError::LengthMismatch {
                    what: "column",
                    expected: rows,
                    found: col.len(),
                }
                .into());
            }
        }
        Ok(Self {
            index,
            columns,
            labels: None,
        })
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn into_parts(self) -> (Index, Vec<Column>) {
        (self.index, self.columns)
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.index.len(), self.columns.len())
    }

    /// The presentation labels if set, else the columns' names.
    pub fn column_labels(&self) -> Vec<&Datum> {
        match &self.labels {
            Some(labels) => labels.iter().collect(),
            None => self.columns.iter().map(Column::name).collect(),
        }
    }

    pub fn set_column_labels(&mut self, labels: Vec<Datum>) -> Result<()> {
        if labels.len() != self.columns.len() {
            return Err(FrameError::LengthMismatch {
                what: "column labels",
                expected: self.columns.len(),
                found: labels.len(),
            }
            .into());
        }
        labels.iter().try_for_each(check_label)?;
        self.labels = Some(labels);
        Ok(())
    }

    pub fn clear_column_labels(&mut self) {
        self.labels = None;
    }
}

/// Presentation labels do not take part.
impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.columns == other.columns
    }
}

pub fn encode_table<W: Write>(tbl: &Table, w: &mut DatumWriter<W>) -> Result<WriteLen> {
    tbl.index.validate()?;
    for col in tbl.columns.iter() {
        col.validate()?;
    }
    let (rows, cols) = tbl.shape();
    debug!(rows, cols, "encoding table");
    registry::ser_record(w, ExtType::Table, |w| {
        let mut w_len = registry::ser_version(w, VERSION)?;
        w_len += w.ser_usize(rows)?;
        w_len += w.ser_usize(cols)?;
        w_len += index::encode_index(&tbl.index, w)?;
        for col in tbl.columns.iter() {
            w_len += column::encode_column(col, w)?;
        }
        Ok(w_len)
    })
}

pub fn decode_table<R: Read>(r: &mut DatumReader<R>) -> Result<Table> {
    registry::read_record(r, Value::TABLE, is_table, |r, _| deser_payload(r))
}

fn is_table(ext_type: ExtType) -> bool {
    ext_type == ExtType::Table
}

pub(crate) fn deser_payload<R: Read>(r: &mut DatumReader<R>) -> Result<Table> {
    registry::check_version(r, Value::TABLE, VERSION)?;
    let rows = r.read_as::<usize>()?;
    let cols = r.read_as::<usize>()?;
    r.limits().check_collection_len(u32::try_from(cols)?)?;
    debug!(rows, cols, "decoding table");

    let index = index::decode_index(r)?;
    let mut columns = Vec::with_capacity(cols.min(PREALLOC_COLUMNS));
    for _ in 0..cols {
        columns.push(column::decode_column(r)?);
    }

    let mismatched = columns.iter().map(Column::len).find(|len| *len != index.len());
    if let Some(len) = mismatched {
        return Err(FrameError::ShapeMismatch {
            expected: (index.len(), cols),
            found: (len, cols),
        }
        .into());
    }
    let tbl = Table::new(index, columns)?;
    if tbl.shape() != (rows, cols) {
        return Err(FrameError::ShapeMismatch {
            expected: (rows, cols),
            found: tbl.shape(),
        }
        .into());
    }
    Ok(tbl)
}

impl Ser for Table {
    fn ser<W: Write>(&self, w: &mut DatumWriter<W>) -> Result<WriteLen> {
        encode_table(self, w)
    }
}
impl Deser for Table {
    fn deser<R: Read>(r: &mut DatumReader<R>) -> Result<ReadResult<Self>> {
        registry::deser_record(r, Value::TABLE, is_table, |r, _| deser_payload(r))
    }
}
