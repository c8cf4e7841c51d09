//! OS signal handling.
//!
//! # Signals
//! **Unix platforms:**
//! - `SIGINT` (Ctrl-C in terminal)
//! - `SIGQUIT` (quit signal)
//! - `SIGTERM` (default kill signal, used by systemd/Kubernetes)
//!
//! `SIGKILL` cannot be caught by a process and is not part of the set.
//!
//! **Windows platforms:**
//! - `Ctrl-C` via [`tokio::signal::ctrl_c`]

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

/// Source of OS shutdown requests.
///
/// Called once per run; the returned future resolves with the name of the
/// signal received, or an error if listeners could not be installed.
pub type SignalSource =
    dyn Fn() -> BoxFuture<'static, std::io::Result<&'static str>> + Send + Sync;

/// The default [`SignalSource`]: real process signals.
pub fn os_signals() -> BoxFuture<'static, std::io::Result<&'static str>> {
    wait_for_shutdown_signal().boxed()
}

/// Waits for a termination signal.
///
/// Each call creates independent signal listeners, one per signal.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigquit = signal(SignalKind::quit())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    let name = tokio::select! {
        _ = sigint.recv()  => "SIGINT",
        _ = sigquit.recv() => "SIGQUIT",
        _ = sigterm.recv() => "SIGTERM",
    };
    Ok(name)
}

/// Waits for a termination signal.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl-c")
}
