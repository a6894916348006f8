pub mod limits;
pub mod serde;
pub mod types;
