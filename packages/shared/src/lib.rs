//! Utilities shared by the Haven relay binaries and their tests.

pub mod logger;
pub mod time;
