//! Library half of the `csvgate` binary.

pub mod logging;
pub mod pairing;
pub mod tasks;
