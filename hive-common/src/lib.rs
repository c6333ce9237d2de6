//! hive-clock Common Types
//!
//! Wire types shared by the clock client and anything that speaks to it.

pub mod protocol;

pub use protocol::{ClientMessage, Envelope, CLOCK_TYPE};
