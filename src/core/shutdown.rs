//! # OS termination signals.
//!
//! [`wait_for_shutdown_signal`] completes with the name of the first termination
//! signal the process receives; the name becomes the `reason` of the
//! `ShutdownRequested` event.
//!
//! **Unix:** `SIGINT` (Ctrl-C), `SIGTERM`, `SIGQUIT`.
//! **Other platforms:** Ctrl-C via [`tokio::signal::ctrl_c`].

use std::io;

/// Waits for a termination signal.
///
/// Listeners are registered on every call. Registration failure is returned as
/// `Err` immediately and is fatal to the caller.
#[cfg(unix)]
pub(crate) async fn wait_for_shutdown_signal() -> io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    let name = tokio::select! {
        _ = sigint.recv()  => "SIGINT",
        _ = sigterm.recv() => "SIGTERM",
        _ = sigquit.recv() => "SIGQUIT",
    };
    Ok(name)
}

#[cfg(not(unix))]
pub(crate) async fn wait_for_shutdown_signal() -> io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl-c")
}

/// Resolves on a termination signal when `enabled`, never otherwise.
pub(crate) async fn os_signal(enabled: bool) -> io::Result<&'static str> {
    if enabled {
        wait_for_shutdown_signal().await
    } else {
        std::future::pending().await
    }
}
