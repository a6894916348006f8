use crate::serde::{
    Datum, DatumBodyLen, DatumType, DatumTypeInt, ExtTypeInt, FixedWidth, MembersCount,
    TypedArray,
};
use anyhow::Result;
use derive_more::{Add, AddAssign, Deref};
use std::io::Write;

#[derive(Deref, Add, AddAssign, Default, Clone, Copy, PartialEq, Eq, Debug)]
pub struct WriteLen(usize);
impl WriteLen {
    pub fn new_manual(i: usize) -> Self {
        Self(i)
    }
}

/// Writes [`Datum`]s, and the framing of extension records, to `W`.
///
/// The `ser_*` methods take borrowed data so that callers need not build a
/// [`Datum`] only to serialize it.
pub struct DatumWriter<W> {
    w: W,
}

impl<W: Write> DatumWriter<W> {
    pub fn new(w: W) -> Self {
        Self { w }
    }

    pub fn into_inner(self) -> W {
        self.w
    }

    fn put(&mut self, buf: &[u8]) -> Result<WriteLen> {
        self.w.write_all(buf)?;
        Ok(WriteLen(buf.len()))
    }

    fn put_type(&mut self, dtype: DatumType) -> Result<WriteLen> {
        self.put(&DatumTypeInt::from(dtype).to_le_bytes())
    }

    fn put_dynalen_body(&mut self, buf: &[u8]) -> Result<WriteLen> {
        let dbody_len = DatumBodyLen::from_dynalen_body(buf)?;
        let mut w_len = self.put(&dbody_len.to_le_bytes())?;
        w_len += self.put(buf)?;
        Ok(w_len)
    }

    pub fn ser_datum(&mut self, dat: &Datum) -> Result<WriteLen> {
        match dat {
            Datum::Null => self.ser_null(),
            Datum::Bool(b) => self.ser_bool(*b),
            Datum::I64(i) => self.ser_i64(*i),
            Datum::U64(u) => self.ser_u64(*u),
            Datum::F64(f) => self.ser_f64(*f),
            Datum::Bytes(b) => self.ser_bytes(b),
            Datum::Str(s) => self.ser_str(s),
            Datum::List(members) => self.ser_list(members),
            Datum::Array(arr) => self.ser_array(arr),
        }
    }

    pub fn ser_null(&mut self) -> Result<WriteLen> {
        self.put_type(DatumType::Null)
    }

    pub fn ser_bool(&mut self, b: bool) -> Result<WriteLen> {
        let mut w_len = self.put_type(DatumType::Bool)?;
        w_len += self.put(&[b as u8])?;
        Ok(w_len)
    }

    pub fn ser_i64(&mut self, i: i64) -> Result<WriteLen> {
        let mut w_len = self.put_type(DatumType::I64)?;
        w_len += self.put(&i.to_le_bytes())?;
        Ok(w_len)
    }

    pub fn ser_u64(&mut self, u: u64) -> Result<WriteLen> {
        let mut w_len = self.put_type(DatumType::U64)?;
        w_len += self.put(&u.to_le_bytes())?;
        Ok(w_len)
    }

    /// Lengths and counts go on the wire as `U64`.
    pub fn ser_usize(&mut self, u: usize) -> Result<WriteLen> {
        self.ser_u64(u64::try_from(u)?)
    }

    pub fn ser_f64(&mut self, f: f64) -> Result<WriteLen> {
        let mut w_len = self.put_type(DatumType::F64)?;
        w_len += self.put(&f.to_le_bytes())?;
        Ok(w_len)
    }

    pub fn ser_bytes(&mut self, b: &[u8]) -> Result<WriteLen> {
        let mut w_len = self.put_type(DatumType::Bytes)?;
        w_len += self.put_dynalen_body(b)?;
        Ok(w_len)
    }

    pub fn ser_str(&mut self, s: &str) -> Result<WriteLen> {
        let mut w_len = self.put_type(DatumType::Str)?;
        w_len += self.put_dynalen_body(s.as_bytes())?;
        Ok(w_len)
    }

    /// `None` is written as [`Datum::Null`].
    pub fn ser_opt_str(&mut self, s: Option<&str>) -> Result<WriteLen> {
        match s {
            None => self.ser_null(),
            Some(s) => self.ser_str(s),
        }
    }

    pub fn ser_list(&mut self, members: &[Datum]) -> Result<WriteLen> {
        let mut w_len = self.put_type(DatumType::List)?;
        w_len += self.put(&MembersCount::from_len(members.len())?.to_le_bytes())?;
        for member in members {
            w_len += self.ser_datum(member)?;
        }
        Ok(w_len)
    }

    /// Writes a list whose members are strings or nulls.
    pub fn ser_opt_str_list<'a>(
        &mut self,
        members: impl ExactSizeIterator<Item = Option<&'a str>>,
    ) -> Result<WriteLen> {
        let mut w_len = self.put_type(DatumType::List)?;
        w_len += self.put(&MembersCount::from_len(members.len())?.to_le_bytes())?;
        for member in members {
            w_len += self.ser_opt_str(member)?;
        }
        Ok(w_len)
    }

    pub fn ser_array(&mut self, arr: &TypedArray) -> Result<WriteLen> {
        let mut w_len = self.put_type(DatumType::Array)?;
        w_len += self.put(&[arr.array_type().to_int()])?;
        w_len += self.put(&MembersCount::from_len(arr.len())?.to_le_bytes())?;
        w_len += match arr {
            TypedArray::Bool(v) => {
                let buf = v.iter().map(|b| *b as u8).collect::<Vec<_>>();
                self.put(&buf)?
            }
            TypedArray::I8(v) => self.put_packed(v)?,
            TypedArray::I16(v) => self.put_packed(v)?,
            TypedArray::I32(v) => self.put_packed(v)?,
            TypedArray::I64(v) => self.put_packed(v)?,
            TypedArray::U8(v) => self.put(v)?,
            TypedArray::U16(v) => self.put_packed(v)?,
            TypedArray::U32(v) => self.put_packed(v)?,
            TypedArray::U64(v) => self.put_packed(v)?,
            TypedArray::F32(v) => self.put_packed(v)?,
            TypedArray::F64(v) => self.put_packed(v)?,
            TypedArray::Str(v) => {
                let mut delta = WriteLen::default();
                for s in v {
                    delta += self.put_dynalen_body(s.as_bytes())?;
                }
                delta
            }
        };
        Ok(w_len)
    }

    fn put_packed<T: FixedWidth>(&mut self, elems: &[T]) -> Result<WriteLen> {
        let mut buf = Vec::with_capacity(elems.len() * T::WIDTH);
        for elem in elems.iter().copied() {
            elem.put_le(&mut buf);
        }
        self.put(&buf)
    }

    /// Begins an extension record. The caller writes the payload right after.
    pub fn ser_ext_header(&mut self, ext_type: ExtTypeInt) -> Result<WriteLen> {
        let mut w_len = self.put_type(DatumType::Ext)?;
        w_len += self.put(&ext_type.to_le_bytes())?;
        Ok(w_len)
    }

    /// A bare byte, outside of any datum framing. Used for record versions.
    pub fn ser_raw_u8(&mut self, b: u8) -> Result<WriteLen> {
        self.put(&[b])
    }
}

impl Datum {
    pub fn ser(&self, w: &mut impl Write) -> Result<WriteLen> {
        DatumWriter::new(w).ser_datum(self)
    }
}
