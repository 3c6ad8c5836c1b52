//! Runtime core: admission, service, and lifecycle.
//!
//! The public entry point is [`ServiceCenter`], built with
//! [`ServiceCenterBuilder`] and driven by an [`ArrivalSource`].
//!
//! Internal modules:
//! - [`admission`]: one client's first-fit scan, backoff wait and release wake-up;
//! - [`runner`]: serves one task at an occupied station and releases it;
//! - [`center`]: spawns clients, forwards events, handles shutdown;
//! - [`progress`]: live state of in-flight clients;
//! - [`arrival`]: closed and open client sources;
//! - [`shutdown`]: cross-platform termination signals.

mod admission;
mod arrival;
mod builder;
mod center;
mod progress;
mod report;
mod runner;
mod shutdown;

pub use admission::ClientActor;
pub use arrival::ArrivalSource;
pub use builder::ServiceCenterBuilder;
pub use center::ServiceCenter;
pub use progress::{ClientState, ProgressTracker};
pub use report::{RunReport, StationStats};
