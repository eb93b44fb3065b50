//! Developer-network backend library.
//!
//! The crate is organised hexagonally: `domain` holds the model, ports and
//! coordination services, `inbound` the HTTP adapter and `outbound` the
//! storage adapters. `server` wires the three together.

pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;
