#![warn(clippy::perf)]
#![warn(clippy::unwrap_used)]

//! Multiplayer Wordle for chat channels: one shared puzzle per channel,
//! anyone can guess, and points go to whoever finishes it.

pub mod cli;
pub mod config;
pub mod console;
pub mod errors;
pub mod ids;
pub mod logging;
pub mod storage;
pub mod wordle;

pub use errors::{Error, TracingError};
