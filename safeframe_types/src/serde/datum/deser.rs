use crate::limits::ReadLimits;
use crate::serde::{
    ArrayType, Datum, DatumBodyLen, DatumType, DatumTypeInt, ExtTypeInt, FixedWidth, MembersCount,
    TypedArray,
};
use anyhow::{anyhow, Result};
use std::any;
use std::io::{self, ErrorKind, Read};
use std::mem;

/// Preallocation cap. Collections longer than this grow as their bytes actually arrive.
const PREALLOC_CAP: usize = 4096;

#[derive(PartialEq, Eq, Debug)]
pub enum ReadResult<T> {
    EOF,
    Some(usize, T),
}
impl<T> ReadResult<T> {
    /// For reads where a clean EOF is still a truncation.
    pub fn required(self, what: &str) -> Result<T> {
        match self {
            ReadResult::EOF => Err(anyhow!("EOF while reading {}.", what)),
            ReadResult::Some(_r_len, t) => Ok(t),
        }
    }
}

/// Reads [`Datum`]s, and the framing of extension records, from `R`.
///
/// Every length prefix is checked against [`ReadLimits`] before memory is reserved for it.
/// Nested reads go through [`DatumReader::nest`], which enforces the depth limit.
pub struct DatumReader<R> {
    r: R,
    limits: ReadLimits,
    depth: u16,
    r_len: usize,
}

impl<R: Read> DatumReader<R> {
    pub fn new(r: R) -> Self {
        Self::with_limits(r, ReadLimits::default())
    }

    pub fn with_limits(r: R, limits: ReadLimits) -> Self {
        Self {
            r,
            limits,
            depth: 0,
            r_len: 0,
        }
    }

    pub fn into_inner(self) -> R {
        self.r
    }

    /// Count of bytes consumed so far.
    pub fn r_len(&self) -> usize {
        self.r_len
    }

    pub fn limits(&self) -> &ReadLimits {
        &self.limits
    }

    fn take_exact(&mut self, buf: &mut [u8]) -> Result<(), io::Error> {
        self.r.read_exact(buf)?;
        self.r_len += buf.len();
        Ok(())
    }

    /// Reads exactly `len` bytes without reserving `len` up front.
    fn take_body(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(len.min(PREALLOC_CAP));
        let got = (&mut self.r).take(len as u64).read_to_end(&mut buf)?;
        self.r_len += got;
        if got != len {
            return Err(anyhow!(io::Error::from(ErrorKind::UnexpectedEof)));
        }
        Ok(buf)
    }

    /// Runs `f` one nesting level deeper.
    pub fn nest<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= self.limits.max_depth {
            return Err(anyhow!(
                "Nesting depth exceeds limit {}",
                self.limits.max_depth
            ));
        }
        self.depth += 1;
        let res = f(self);
        self.depth -= 1;
        res
    }

    /// Reads a `datum_type`. A clean EOF here is reported as [`ReadResult::EOF`].
    pub fn deser_type(&mut self) -> Result<ReadResult<DatumType>> {
        let mut buf = [0u8; mem::size_of::<u8>()];
        match self.r.read_exact(&mut buf) {
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(ReadResult::EOF),
            Err(e) => return Err(anyhow!(e)),
            Ok(()) => self.r_len += buf.len(),
        }
        let dtype = DatumType::try_from(DatumTypeInt::from(buf[0]))?;
        Ok(ReadResult::Some(buf.len(), dtype))
    }

    pub fn deser_datum(&mut self) -> Result<ReadResult<Datum>> {
        let r_len_before = self.r_len;
        let dtype = match self.deser_type()? {
            ReadResult::EOF => return Ok(ReadResult::EOF),
            ReadResult::Some(_, dtype) => dtype,
        };
        let dat = self.deser_body(dtype)?;
        Ok(ReadResult::Some(self.r_len - r_len_before, dat))
    }

    /// Reads a datum where one must be present.
    pub fn read_datum(&mut self) -> Result<Datum> {
        self.deser_datum()?.required(any::type_name::<Datum>())
    }

    /// Reads the body that follows an already consumed `datum_type`.
    pub fn deser_body(&mut self, dtype: DatumType) -> Result<Datum> {
        let dat = match dtype {
            DatumType::Null => Datum::Null,
            DatumType::Bool => {
                let mut buf = [0u8; 1];
                self.take_exact(&mut buf)?;
                Datum::Bool(decode_bool(buf[0])?)
            }
            DatumType::I64 => {
                let mut buf = [0u8; mem::size_of::<i64>()];
                self.take_exact(&mut buf)?;
                Datum::I64(i64::from_le_bytes(buf))
            }
            DatumType::U64 => {
                let mut buf = [0u8; mem::size_of::<u64>()];
                self.take_exact(&mut buf)?;
                Datum::U64(u64::from_le_bytes(buf))
            }
            DatumType::F64 => {
                let mut buf = [0u8; mem::size_of::<f64>()];
                self.take_exact(&mut buf)?;
                Datum::F64(f64::from_le_bytes(buf))
            }
            DatumType::Bytes => Datum::Bytes(self.deser_dynalen_body()?),
            DatumType::Str => Datum::Str(String::from_utf8(self.deser_dynalen_body()?)?),
            DatumType::List => self.nest(|r| r.deser_list_body())?,
            DatumType::Array => Datum::Array(self.deser_array_body()?),
            DatumType::Ext => {
                return Err(anyhow!(
                    "Extension record where a plain {} is expected.",
                    any::type_name::<Datum>()
                ))
            }
        };
        Ok(dat)
    }

    fn deser_members_count(&mut self) -> Result<usize> {
        let (delta_r_len, membs_ct) = MembersCount::deser(&mut self.r)?;
        self.r_len += delta_r_len;
        self.limits.check_collection_len(*membs_ct)?;
        Ok(*membs_ct as usize)
    }

    fn deser_dynalen_body(&mut self) -> Result<Vec<u8>> {
        let (delta_r_len, dbody_len) = DatumBodyLen::deser(&mut self.r)?;
        self.r_len += delta_r_len;
        self.limits.check_body_len(*dbody_len)?;
        self.take_body(*dbody_len as usize)
    }

    fn deser_list_body(&mut self) -> Result<Datum> {
        let membs_ct = self.deser_members_count()?;
        let mut members = Vec::with_capacity(membs_ct.min(PREALLOC_CAP));
        for _ in 0..membs_ct {
            let member = self
                .deser_datum()?
                .required("List member")?;
            members.push(member);
        }
        Ok(Datum::List(members))
    }

    fn deser_array_body(&mut self) -> Result<TypedArray> {
        let mut buf = [0u8; 1];
        self.take_exact(&mut buf)?;
        let array_type = ArrayType::from_int(buf[0])?;
        let membs_ct = self.deser_members_count()?;

        let arr = match array_type {
            ArrayType::Bool => {
                let body = self.take_body(membs_ct)?;
                let bools = body
                    .into_iter()
                    .map(decode_bool)
                    .collect::<Result<Vec<_>>>()?;
                TypedArray::Bool(bools)
            }
            ArrayType::I8 => TypedArray::I8(self.take_packed(membs_ct)?),
            ArrayType::I16 => TypedArray::I16(self.take_packed(membs_ct)?),
            ArrayType::I32 => TypedArray::I32(self.take_packed(membs_ct)?),
            ArrayType::I64 => TypedArray::I64(self.take_packed(membs_ct)?),
            ArrayType::U8 => TypedArray::U8(self.take_body(membs_ct)?),
            ArrayType::U16 => TypedArray::U16(self.take_packed(membs_ct)?),
            ArrayType::U32 => TypedArray::U32(self.take_packed(membs_ct)?),
            ArrayType::U64 => TypedArray::U64(self.take_packed(membs_ct)?),
            ArrayType::F32 => TypedArray::F32(self.take_packed(membs_ct)?),
            ArrayType::F64 => TypedArray::F64(self.take_packed(membs_ct)?),
            ArrayType::Str => {
                let mut strs = Vec::with_capacity(membs_ct.min(PREALLOC_CAP));
                for _ in 0..membs_ct {
                    strs.push(String::from_utf8(self.deser_dynalen_body()?)?);
                }
                TypedArray::Str(strs)
            }
        };
        Ok(arr)
    }

    fn take_packed<T: FixedWidth>(&mut self, membs_ct: usize) -> Result<Vec<T>> {
        let body_len = membs_ct
            .checked_mul(T::WIDTH)
            .ok_or(anyhow!("Array of {} members overflows", membs_ct))?;
        let body = self.take_body(body_len)?;
        let elems = body.chunks_exact(T::WIDTH).map(T::take_le).collect();
        Ok(elems)
    }

    /// Reads the `ext_type` that follows an already consumed [`DatumType::Ext`].
    pub fn deser_ext_type(&mut self) -> Result<ExtTypeInt> {
        let mut buf = [0u8; 1];
        self.take_exact(&mut buf)?;
        Ok(ExtTypeInt::from(buf[0]))
    }

    /// A bare byte, outside of any datum framing.
    pub fn read_raw_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.take_exact(&mut buf)?;
        Ok(buf[0])
    }

    /// Reads a datum and converts it into `T`, failing if the datum is of another type.
    pub fn read_as<T>(&mut self) -> Result<T>
    where
        T: TryFrom<Datum, Error = anyhow::Error>,
    {
        let dat = self.deser_datum()?.required(any::type_name::<T>())?;
        T::try_from(dat)
    }
}

fn decode_bool(byte: u8) -> Result<bool> {
    match byte {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(anyhow!("Invalid bool byte {}", byte)),
    }
}

impl Datum {
    pub fn deser(r: &mut impl Read) -> Result<ReadResult<Self>> {
        DatumReader::new(r).deser_datum()
    }
}
