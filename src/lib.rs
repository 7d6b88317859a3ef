//! LINE Messaging API webhook echo service.
//!
//! Verifies each delivery's signature, classifies every message event by
//! content kind, and replies through the reply API. Events in a batch are
//! dispatched concurrently and an authenticated delivery is always
//! acknowledged with a success-range status.

pub mod config;
pub mod dispatch;
pub mod line;
pub mod server;
pub mod signature;
pub mod types;
