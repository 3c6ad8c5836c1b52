//! Admission retry policies.
//!
//! These knobs control **how long** a client waits after a scan that found no
//! free slot at any eligible station.
//!
//! ## Contents
//! - [`BackoffPolicy`] how retry delays evolve (first / factor / max + jitter)
//! - [`JitterPolicy`]  randomization strategy to spread out re-scans
//!
//! ## Quick wiring
//! ```text
//! Config { backoff: BackoffPolicy, .. }
//!      └─► core::admission::ClientActor uses:
//!           - backoff.next(attempt) after each failed scan
//!           - attempt resets to 0 after every admission
//! ```
//!
//! ## Defaults
//! - `BackoffPolicy::default()` → first=100ms, factor=1.0 (fixed interval), max=2s, jitter=None.
//! - `JitterPolicy::None` by default; `Equal` helps when many clients wait on one station.

mod backoff;
mod jitter;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
