use super::helpers::gen;
use anyhow::Result;
use rand::Rng;
use safeframe_frames::buffers::Array;
use safeframe_frames::index::{GenericIndex, RangeIndex};
use safeframe_frames::{decode_table, decode_value, Column, FrameError, Index, Table};
use safeframe_types::limits::ReadLimits;
use safeframe_types::serde::{DatumReader, DatumWriter};
use safeframe_types::types::{Deser, Ser};

pub fn test_hostile_streams() -> Result<()> {
    truncated_tables()?;
    corrupted_tables()?;
    limits()?;
    disallowed_index_tag()?;
    Ok(())
}

fn sample_table() -> Result<Table> {
    Table::new(
        GenericIndex::new(Array::from_strs(["a", "b"])).into(),
        vec![
            Column::plain("x", Array::from_i64s(vec![1, 2])),
            Column::strings("y", vec![None, Some(String::from("z"))]),
        ],
    )
}

/// Every proper prefix of a record fails. None yields a partial table.
fn truncated_tables() -> Result<()> {
    let mut rng = rand::thread_rng();
    for _ in 0..10 {
        let buf = gen::gen_table(&mut rng)?.ser_solo()?;
        for cut in 1..buf.len() {
            let mut r = DatumReader::new(&buf[..cut]);
            assert!(decode_table(&mut r).is_err(), "cut at {}", cut);
        }
    }
    Ok(())
}

/// Random corruption is an error or a value, never a panic.
fn corrupted_tables() -> Result<()> {
    let mut rng = rand::thread_rng();
    let buf = sample_table()?.ser_solo()?;
    for _ in 0..500 {
        let mut corrupt = buf.clone();
        let at = rng.gen_range(0..corrupt.len());
        corrupt[at] = rng.gen();
        let mut r = DatumReader::new(&corrupt[..]);
        let _ = decode_value(&mut r);
    }
    Ok(())
}

fn limits() -> Result<()> {
    let buf = sample_table()?.ser_solo()?;

    let shallow = ReadLimits {
        max_depth: 2,
        ..ReadLimits::default()
    };
    let mut r = DatumReader::with_limits(&buf[..], shallow);
    assert!(decode_table(&mut r).is_err());

    let narrow = ReadLimits {
        max_collection_len: 1,
        ..ReadLimits::default()
    };
    let mut r = DatumReader::with_limits(&buf[..], narrow);
    assert!(decode_table(&mut r).is_err());

    let mut r = DatumReader::with_limits(&buf[..], ReadLimits::default());
    assert_eq!(sample_table()?, decode_table(&mut r)?);

    /* A column count far beyond what the stream holds. */
    let mut w = DatumWriter::new(vec![9, 7, 1]);
    w.ser_usize(0)?;
    w.ser_usize(u32::MAX as usize)?;
    safeframe_frames::encode_index(&RangeIndex::new(0, 0, 1)?.into(), &mut w)?;
    let buf = w.into_inner();
    assert!(Table::deser_solo(&buf).is_err());
    Ok(())
}

fn disallowed_index_tag() -> Result<()> {
    let buf = Index::from(GenericIndex::new(Array::from_i64s(vec![1]))).ser_solo()?;
    let mut relabeled = buf.clone();
    for at in 0..buf.len().saturating_sub(4) {
        if &buf[at..at + 5] == b"int64" {
            relabeled[at + 4] = b'5';
        }
    }
    assert_ne!(buf, relabeled);
    let err = Index::deser_solo(&relabeled).unwrap_err();
    assert_eq!(
        Some(&FrameError::DisallowedElementType(String::from("int65"))),
        FrameError::of(&err)
    );
    Ok(())
}
