//! Wire-level objects for the pick'em display pipeline.
//!
//! Producers publish these payloads to the bus; the display service decodes
//! them back out. Everything in this crate is plain data plus serde, with
//! no I/O and no persistence types.

pub mod objects;

pub use objects::{CreatedStatus, PickWin};
