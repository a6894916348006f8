//! Typed element buffers: an element-type tag together with owned, contiguous storage.

mod array;
mod categorical;
mod nullable;

pub use array::*;
pub use categorical::*;
pub use nullable::*;
