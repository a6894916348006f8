use crate::buffers::Categorical;
use crate::error::FrameError;
use crate::index::{check_array_tag, decode_index, generic, Index};
use crate::labels::{self, LabelSequence};
use crate::registry::{self, ExtType};
use anyhow::{anyhow, Result};
use safeframe_types::serde::{Datum, DatumReader, DatumWriter, TypedArray, WriteLen};
use std::io::{Read, Write};

/// Labels drawn from a fixed set of categories.
///
/// ```text
/// struct CategoricalIndex::payload {
///     names:      Labels,
///     values:     Categorical,
/// }
///
/// struct Categorical {
///     categories: GenericIndex,   // unnamed; a RangeIndex is accepted on read
///     codes:      Datum::Array,   // i8, i16, i32 or i64; -1 is missing
///     ordered:    Datum::Bool,
/// }
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct CategoricalIndex {
    values: Categorical,
    names: LabelSequence,
}

impl CategoricalIndex {
    pub fn new(values: Categorical) -> Self {
        Self {
            values,
            names: LabelSequence::unnamed(),
        }
    }

    pub fn with_names(mut self, names: LabelSequence) -> Self {
        self.names = names;
        self
    }

    pub fn values(&self) -> &Categorical {
        &self.values
    }

    pub fn names(&self) -> &LabelSequence {
        &self.names
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
}

pub(super) fn ser_payload<W: Write>(
    idx: &CategoricalIndex,
    w: &mut DatumWriter<W>,
) -> Result<WriteLen> {
    let mut w_len = labels::encode_labels(&idx.names, w)?;
    w_len += ser_categorical(&idx.values, w)?;
    Ok(w_len)
}

pub(super) fn deser_payload<R: Read>(r: &mut DatumReader<R>) -> Result<CategoricalIndex> {
    let names = labels::decode_labels(r)?;
    let values = deser_categorical(r)?;
    Ok(CategoricalIndex { values, names })
}

/* The categorical payload, shared with columns. */

pub(crate) fn ser_categorical<W: Write>(
    cat: &Categorical,
    w: &mut DatumWriter<W>,
) -> Result<WriteLen> {
    check_array_tag(cat.categories())?;
    let mut w_len = registry::ser_record(w, ExtType::GenericIndex, |w| {
        generic::ser_parts(cat.categories(), &LabelSequence::unnamed(), w)
    })?;
    w_len += w.ser_array(&cat.codes_array())?;
    w_len += w.ser_bool(cat.ordered())?;
    Ok(w_len)
}

pub(crate) fn deser_categorical<R: Read>(r: &mut DatumReader<R>) -> Result<Categorical> {
    let categories = match decode_index(r)? {
        Index::Generic(idx) => idx.into_values(),
        Index::Range(idx) => {
            r.limits().check_collection_len(u32::try_from(idx.len())?)?;
            idx.to_array()
        }
        Index::Categorical(_) | Index::Interval(_) => {
            return Err(FrameError::UnexpectedRecord {
                expected: "categories",
                found: "nested categorical or interval index",
            }
            .into())
        }
    };
    let codes = r.read_as::<TypedArray>()?;
    let codes = codes.to_i64s().ok_or(anyhow!(
        "Categorical codes must be signed integers, found {:?}",
        codes.array_type()
    ))?;
    let ordered = r.read_as::<bool>()?;
    Categorical::new(categories, codes, ordered)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::buffers::{Array, MISSING_CODE};
    use crate::index::{GenericIndex, RangeIndex};
    use safeframe_types::types::{Deser, Ser};

    #[test]
    fn banana() -> Result<()> {
        let vals = "banana"
            .chars()
            .map(|c| Some(Datum::from(c.to_string())))
            .collect::<Vec<_>>();
        let cat = Categorical::from_values(&vals, Array::from_strs(["n", "b", "a"]), true)?;
        let idx = Index::from(CategoricalIndex::new(cat).with_names(LabelSequence::single("fruit")));

        let actual = Index::deser_solo(&idx.ser_solo()?)?;
        assert_eq!(idx, actual);
        match &actual {
            Index::Categorical(actual) => {
                assert_eq!(&[1, 2, 0, 2, 0, 2], actual.values().codes());
                assert!(actual.values().ordered());
                assert_eq!(&Array::from_strs(["n", "b", "a"]), actual.values().categories());
            }
            _ => panic!("{:?}", actual),
        }
        Ok(())
    }

    fn payload(categories: &Index, codes: TypedArray) -> Result<Vec<u8>> {
        let mut w = DatumWriter::new(vec![]);
        crate::index::encode_index(categories, &mut w)?;
        w.ser_array(&codes)?;
        w.ser_bool(false)?;
        Ok(w.into_inner())
    }

    #[test]
    fn codes_of_any_signed_width() -> Result<()> {
        let cats = Index::from(RangeIndex::new(10, 13, 1)?);
        for codes in [
            TypedArray::I8(vec![2, -1]),
            TypedArray::I16(vec![2, -1]),
            TypedArray::I32(vec![2, -1]),
            TypedArray::I64(vec![2, -1]),
        ] {
            let buf = payload(&cats, codes)?;
            let cat = deser_categorical(&mut DatumReader::new(&buf[..]))?;
            assert_eq!(&[2, MISSING_CODE], cat.codes());
            assert_eq!(Some(Datum::I64(12)), cat.get(0));
            assert_eq!(None, cat.get(1));
        }

        let buf = payload(&cats, TypedArray::U8(vec![0]))?;
        assert!(deser_categorical(&mut DatumReader::new(&buf[..])).is_err());
        Ok(())
    }

    #[test]
    fn out_of_range_code() -> Result<()> {
        let cats = Index::from(RangeIndex::new(0, 2, 1)?);
        let buf = payload(&cats, TypedArray::I8(vec![0, 2]))?;
        let err = deser_categorical(&mut DatumReader::new(&buf[..])).unwrap_err();
        assert_eq!(
            Some(&FrameError::InvalidCode {
                code: 2,
                categories: 2
            }),
            FrameError::of(&err)
        );
        Ok(())
    }

    #[test]
    fn repeated_categories_on_read() -> Result<()> {
        let cats = Index::from(GenericIndex::new(Array::from_strs(["a", "a"])));
        let buf = payload(&cats, TypedArray::I8(vec![0, 1]))?;
        let err = deser_categorical(&mut DatumReader::new(&buf[..])).unwrap_err();
        assert_eq!(
            Some(&FrameError::DuplicateCategory {
                at: 1,
                value: String::from("Str(\"a\")")
            }),
            FrameError::of(&err)
        );
        Ok(())
    }
}
