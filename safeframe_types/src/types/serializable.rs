use crate::serde::{Datum, DatumReader, DatumWriter, ReadResult, WriteLen};
use anyhow::{anyhow, Result};
use std::any;
use std::io::{Cursor, Read, Write};

pub trait Ser {
    fn ser<W: Write>(&self, w: &mut DatumWriter<W>) -> Result<WriteLen>;

    fn ser_solo(&self) -> Result<Vec<u8>> {
        let mut buf = vec![];
        self.ser(&mut DatumWriter::new(&mut buf))?;
        Ok(buf)
    }
}
pub trait Deser: Sized {
    fn deser<R: Read>(r: &mut DatumReader<R>) -> Result<ReadResult<Self>>;

    /// Deserializes exactly one `Self` spanning the whole of `buf`.
    fn deser_solo(buf: &[u8]) -> Result<Self> {
        let mut r = DatumReader::new(Cursor::new(buf));
        let moi = Self::deser(&mut r)?.required(any::type_name::<Self>())?;
        if r.r_len() != buf.len() {
            return Err(anyhow!(
                "{} trailing bytes after {}",
                buf.len() - r.r_len(),
                any::type_name::<Self>()
            ));
        }
        Ok(moi)
    }
}

impl Ser for Datum {
    fn ser<W: Write>(&self, w: &mut DatumWriter<W>) -> Result<WriteLen> {
        w.ser_datum(self)
    }
}
impl Deser for Datum {
    fn deser<R: Read>(r: &mut DatumReader<R>) -> Result<ReadResult<Self>> {
        r.deser_datum()
    }
}

/* trait Serializable */
pub trait Serializable: Ser + Deser {}

impl Serializable for Datum {}
