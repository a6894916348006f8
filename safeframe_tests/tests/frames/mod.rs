mod helpers;
pub mod hostile;
pub mod roundtrip;
