//! Haven safety chat relay.
//!
//! An in-memory presence and message broadcast relay: clients connect over
//! WebSocket, register a presence, exchange messages and alerts, and receive
//! presence updates. State lives for the lifetime of the process.

pub mod config;
pub mod domain;
pub mod hub;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
