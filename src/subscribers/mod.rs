//! # Event subscribers for the service center.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and the built-in sinks for events broadcast through the [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//!   ClientActor ── publish(Event) ──► Bus ──► center listener
//!                                                  │
//!                                                  └──► SubscriberSet::emit
//!                                                          ├──► LogWriter
//!                                                          └──► custom ...
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use stationvisor::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct WaitCounter;
//!
//! #[async_trait]
//! impl Subscribe for WaitCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::ClientWaiting {
//!             // increment a contention counter
//!         }
//!     }
//! }
//! ```

mod log;
mod set;
mod subscribe;

pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;

pub(crate) use set::panic_message;
