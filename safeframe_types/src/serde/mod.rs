//! # Serialization format
//!
//! The primitive de/serializable type is [`Datum`].
//!
//! The below pseudocode depicts its serialized representations.
//! All integers are little-endian.
//!
//! They all start with `datum_type`, which is encoded in `u8`.
//! In case we need to deprecate supported datum_types over time, this allows us
//! `(pow(2, 8) - count_of_active_datum_types)` deprecations, before rolling over to zero.
//!
//! Some `Datum` types have fixed body lengths; these lengths are not encoded.
//! For other `Datum` types, which have dynamic body lengths, these lengths
//! (or member counts) are encoded following `datum_type`.
//!
//! ```text
//! struct Datum::Null {
//!     datum_type:     u8,
//! }
//!
//! struct Datum::Bool {
//!     datum_type:     u8,
//!     datum_body:     u8,     // 0 or 1
//! }
//!
//! struct Datum::I64 or Datum::U64 or Datum::F64 {
//!     datum_type:     u8,
//!     datum_body:     [u8; 8],
//! }
//!
//! struct Datum::Bytes or Datum::Str {
//!     datum_type:         u8,
//!     datum_body_len:     u32,
//!     datum_body:         [u8; datum_body_len],
//! }
//!
//! struct Datum::List {
//!     datum_type:         u8,
//!     members_count:      u32,
//!     member_0:           Datum::*,
//!     ...
//! }
//!
//! struct Datum::Array {
//!     datum_type:         u8,
//!     array_type:         u8,
//!     members_count:      u32,
//!     // Fixed-width elements are packed. Bool elements take one byte each.
//!     // Str elements are each { len: u32, body: [u8; len] }.
//!     members:            ...,
//! }
//!
//! // Not a Datum. The payload is owned by the extension's author.
//! struct Ext {
//!     datum_type:         u8,
//!     ext_type:           u8,
//!     payload:            ...,
//! }
//! ```

mod array;
mod datum;
mod datum_type;
mod lengths;

pub use array::*;
pub use datum::*;
pub use datum_type::*;
use lengths::*;
