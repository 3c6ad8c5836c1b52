//! Clients and their per-client progress record.
//!
//! - [`ClientId`] / [`ClientIds`] identity and the atomic id generator
//! - [`Client`] required task kinds, completed set, remaining count;
//!   [`Client::with_required`] builds a client that needs only some kinds
//!
//! A `Client` is owned by exactly one worker for its whole life, so its record
//! needs no synchronization.

mod id;
mod record;

pub use id::{ClientId, ClientIds};
pub use record::Client;
