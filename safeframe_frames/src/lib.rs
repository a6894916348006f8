//! Adapters that encode tables, their indices and columns as kernel extension records,
//! and decode them back without trusting any element type outside the allow-lists.

pub mod buffers;
pub mod column;
pub mod dtype;
pub mod error;
pub mod index;
pub mod labels;
pub mod missing;
pub mod registry;
pub mod table;

pub use column::{decode_column, encode_column, Column, ColumnValues};
pub use error::FrameError;
pub use index::{decode_index, encode_index, Index};
pub use labels::{decode_labels, encode_labels, LabelSequence};
pub use missing::{decode_missing, encode_missing, Missing};
pub use registry::{decode_value, deser_value, encode_value, ExtType, Value};
pub use table::{decode_table, encode_table, Table};
