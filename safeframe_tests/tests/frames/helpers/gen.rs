use anyhow::Result;
use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;
use safeframe_frames::buffers::{Array, Categorical, NullableArray};
use safeframe_frames::dtype::{Closed, NullableType, NAT};
use safeframe_frames::index::{CategoricalIndex, GenericIndex, IntervalIndex, RangeIndex};
use safeframe_frames::{Column, Index, LabelSequence, Table};
use safeframe_types::serde::Datum;

const TIMEZONES: &[&str] = &["UTC", "Europe/Berlin", "America/Argentina/Buenos_Aires", "+05:30"];

pub fn gen_str(rng: &mut impl Rng, max_len: usize) -> String {
    let len = rng.gen_range(0..=max_len);
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn gen_label(rng: &mut impl Rng) -> Datum {
    match rng.gen_range(0..4) {
        0 => Datum::Null,
        1 => Datum::I64(rng.gen()),
        _ => Datum::from(gen_str(rng, 8)),
    }
}

fn gen_opt<R: Rng, T>(rng: &mut R, f: impl FnOnce(&mut R) -> T) -> Option<T> {
    if rng.gen_bool(0.25) {
        None
    } else {
        Some(f(rng))
    }
}

fn gen_nanos(rng: &mut impl Rng, rows: usize) -> Vec<i64> {
    (0..rows)
        .map(|_| {
            if rng.gen_bool(0.1) {
                NAT
            } else {
                rng.gen_range(-1_000_000_000_000_000_000..1_000_000_000_000_000_000)
            }
        })
        .collect()
}

fn gen_categorical(rng: &mut impl Rng, rows: usize) -> Result<Categorical> {
    let cats_ct = rng.gen_range(1..=5);
    let cats = (0..cats_ct)
        .map(|i| format!("{}{}", i, gen_str(rng, 3)))
        .collect::<Vec<_>>();
    let vals = (0..rows)
        .map(|_| {
            gen_opt(rng, |rng| {
                Datum::from(cats.choose(rng).cloned().unwrap_or_default())
            })
        })
        .collect::<Vec<_>>();
    Categorical::from_values(&vals, Array::from_strs(cats), rng.gen())
}

pub fn gen_index(rng: &mut impl Rng, rows: usize) -> Result<Index> {
    let idx = match rng.gen_range(0..4) {
        0 => {
            let start = rng.gen_range(-100..100);
            let step = *[-3, -1, 1, 2, 7].choose(rng).unwrap_or(&1);
            let stop = start + rows as i64 * step;
            RangeIndex::new(start, stop, step)?.into()
        }
        1 => {
            let labels = (0..rows).map(|i| format!("row{}", i)).collect::<Vec<_>>();
            GenericIndex::new(Array::from_strs(labels))
                .with_names(LabelSequence::single(gen_label(rng)))
                .into()
        }
        2 => CategoricalIndex::new(gen_categorical(rng, rows)?).into(),
        _ => {
            let left = (0..rows as i64).collect::<Vec<_>>();
            let right = left.iter().map(|l| l + 1).collect::<Vec<_>>();
            let closed = *[Closed::Left, Closed::Right, Closed::Both, Closed::Neither]
                .choose(rng)
                .unwrap_or(&Closed::Right);
            IntervalIndex::new(Array::from_i64s(left), Array::from_i64s(right), closed)?.into()
        }
    };
    Ok(idx)
}

pub fn gen_column(rng: &mut impl Rng, rows: usize) -> Result<Column> {
    let name = gen_label(rng);
    let col = match rng.gen_range(0..9) {
        0 => Column::plain(name, Array::from_i64s((0..rows).map(|_| rng.gen()).collect())),
        1 => Column::plain(name, Array::from_f64s((0..rows).map(|_| rng.gen()).collect())),
        2 => Column::plain(name, Array::from_bools((0..rows).map(|_| rng.gen()).collect())),
        3 => {
            let tz = TIMEZONES.choose(rng).copied();
            Column::plain(name, Array::from_datetimes(gen_nanos(rng, rows), tz)?)
        }
        4 => Column::plain(name, Array::from_timedeltas(gen_nanos(rng, rows))),
        5 => {
            let dtype = *[NullableType::Int8, NullableType::UInt16, NullableType::Int64]
                .choose(rng)
                .unwrap_or(&NullableType::Int64);
            let vals = (0..rows)
                .map(|_| gen_opt(rng, |rng| rng.gen_range(0..100i64)))
                .collect::<Vec<_>>();
            Column::nullable(name, NullableArray::from_ints(dtype, &vals)?)
        }
        6 => {
            let vals = (0..rows)
                .map(|_| gen_opt(rng, |rng| rng.gen::<f64>()))
                .collect::<Vec<_>>();
            Column::nullable(name, NullableArray::from_floats(NullableType::Float64, &vals)?)
        }
        7 => Column::categorical(name, gen_categorical(rng, rows)?),
        _ => {
            let vals = (0..rows)
                .map(|_| gen_opt(rng, |rng| gen_str(rng, 12)))
                .collect::<Vec<_>>();
            Column::strings(name, vals)
        }
    };
    Ok(col)
}

pub fn gen_table(rng: &mut impl Rng) -> Result<Table> {
    let rows = rng.gen_range(0..20);
    let cols = rng.gen_range(0..6);
    let index = gen_index(rng, rows)?;
    let columns = (0..cols)
        .map(|_| gen_column(rng, rows))
        .collect::<Result<Vec<_>>>()?;
    Table::new(index, columns)
}
