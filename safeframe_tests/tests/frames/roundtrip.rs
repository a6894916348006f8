use super::helpers::gen;
use anyhow::Result;
use itertools::Itertools;
use safeframe_frames::buffers::{Array, Categorical, NullableArray};
use safeframe_frames::dtype::NullableType;
use safeframe_frames::index::RangeIndex;
use safeframe_frames::{
    decode_table, decode_value, encode_column, encode_table, encode_value, Column, ColumnValues,
    FrameError, Index, Table, Value,
};
use safeframe_types::serde::{Datum, DatumReader, DatumWriter, ReadResult, TypedArray};
use safeframe_types::types::{Deser, Ser};

pub fn test_scenarios() -> Result<()> {
    range_index_is_lazy()?;
    nullable_column()?;
    categorical_column()?;
    table_with_relabeled_columns()?;
    disallowed_tag()?;
    Ok(())
}

fn range_index_is_lazy() -> Result<()> {
    let idx = Index::from(RangeIndex::new(0, 10, 2)?);
    let buf = idx.ser_solo()?;
    // No Array datum anywhere in the record.
    assert!(!buf.contains(&8));

    let actual = Index::deser_solo(&buf)?;
    let labels = (0..actual.len()).map(|i| actual.get(i)).collect::<Vec<_>>();
    let expected = [0, 2, 4, 6, 8].map(|i| Some(Datum::I64(i)));
    assert_eq!(expected.to_vec(), labels);
    Ok(())
}

fn nullable_column() -> Result<()> {
    let col = Column::nullable(
        "n",
        NullableArray::from_ints(NullableType::Int64, &[Some(1), Some(2), None, Some(4)])?,
    );
    let actual = Column::deser_solo(&col.ser_solo()?)?;
    assert_eq!("Int64", actual.tag());
    match actual.values() {
        ColumnValues::Nullable(arr) => assert_eq!(&[false, false, true, false], arr.mask()),
        other => panic!("{:?}", other),
    }
    let vals = (0..actual.len()).map(|i| actual.get(i)).collect::<Vec<_>>();
    assert_eq!(
        vec![Some(Datum::I64(1)), Some(Datum::I64(2)), None, Some(Datum::I64(4))],
        vals
    );
    Ok(())
}

fn categorical_column() -> Result<()> {
    let vals = "banana"
        .chars()
        .map(|c| Some(Datum::from(c.to_string())))
        .collect::<Vec<_>>();
    let cat = Categorical::from_values(&vals, Array::from_strs(["n", "b", "a"]), true)?;
    let col = Column::categorical("fruit", cat);

    let actual = Column::deser_solo(&col.ser_solo()?)?;
    assert_eq!(col, actual);
    match actual.values() {
        ColumnValues::Categorical(cat) => {
            assert_eq!(&[1, 2, 0, 2, 0, 2], cat.codes());
            assert!(cat.ordered());
            assert_eq!(&Array::from_strs(["n", "b", "a"]), cat.categories());
        }
        other => panic!("{:?}", other),
    }
    Ok(())
}

fn table_with_relabeled_columns() -> Result<()> {
    let mut tbl = Table::new(
        RangeIndex::new(0, 3, 1)?.into(),
        vec![
            Column::plain("left", Array::from_i64s(vec![1, 2, 3])),
            Column::strings("right", vec![Some(String::from("a")), None, None]),
        ],
    )?;
    tbl.set_column_labels(vec![Datum::from("same"), Datum::from("same")])?;

    let actual = Table::deser_solo(&tbl.ser_solo()?)?;
    assert_eq!(tbl, actual);
    assert_eq!((3, 2), actual.shape());
    let names = actual.columns().iter().map(Column::name).collect::<Vec<_>>();
    assert_eq!(vec![&Datum::from("left"), &Datum::from("right")], names);
    Ok(())
}

fn disallowed_tag() -> Result<()> {
    let col = Column::new(
        "c",
        ColumnValues::Opaque {
            tag: String::from("complex128"),
            values: vec![Datum::Null],
        },
    );
    let mut w = DatumWriter::new(vec![]);
    let err = encode_column(&col, &mut w).unwrap_err();
    assert_eq!(
        Some(&FrameError::DisallowedElementType(String::from("complex128"))),
        FrameError::of(&err)
    );
    assert!(w.into_inner().is_empty());
    Ok(())
}

pub fn test_random_tables() -> Result<()> {
    let mut rng = rand::thread_rng();
    let tbls = (0..50)
        .map(|_| gen::gen_table(&mut rng))
        .collect::<Result<Vec<_>>>()?;

    for tbl in tbls.iter() {
        let buf = tbl.ser_solo()?;
        let actual = Table::deser_solo(&buf)?;
        assert_eq!(tbl, &actual);
        assert_eq!(tbl.shape(), actual.shape());
        // Encoding is deterministic, so decode then encode reproduces the bytes.
        assert_eq!(buf, actual.ser_solo()?);
    }

    /* Several tables back to back on one stream. */
    for chunk in tbls.iter().chunks(4).into_iter() {
        let chunk = chunk.collect::<Vec<_>>();
        let mut w = DatumWriter::new(vec![]);
        for tbl in chunk.iter() {
            encode_table(tbl, &mut w)?;
        }
        let buf = w.into_inner();
        let mut r = DatumReader::new(&buf[..]);
        for tbl in chunk.iter() {
            assert_eq!(*tbl, &decode_table(&mut r)?);
        }
        assert_eq!(ReadResult::EOF, Table::deser(&mut r)?);
    }

    /* Mixed kinds through the dispatcher. */
    let values = vec![
        Value::Table(tbls[0].clone()),
        Value::Datum(Datum::Array(TypedArray::U8(vec![1, 2]))),
        Value::Column(gen::gen_column(&mut rng, 5)?),
        Value::Index(gen::gen_index(&mut rng, 5)?),
        Value::Missing(safeframe_frames::Missing),
    ];
    for perm in values.iter().permutations(values.len()).take(20) {
        let mut w = DatumWriter::new(vec![]);
        for value in perm.iter() {
            encode_value(value, &mut w)?;
        }
        let buf = w.into_inner();
        let mut r = DatumReader::new(&buf[..]);
        for value in perm.iter() {
            assert_eq!(*value, &decode_value(&mut r)?);
        }
    }
    Ok(())
}
