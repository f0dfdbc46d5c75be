//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs` — Domain types
//! - `wire.rs` — Raw serde structs matching backend responses
//! - `convert.rs` — `From` conversions from wire to domain types
//! - `state.rs` — State containers with update methods
//! - `client.rs` — Sub-client that talks to the exchange and updates state

pub mod order;
pub mod ticker;
