//! EmergencyNotifier implementations.

pub mod log;

pub use log::LogEmergencyNotifier;
