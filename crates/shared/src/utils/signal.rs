use futures::stream::{self, Stream, StreamExt};
use std::task::Poll;
use tokio::{
    io,
    signal::unix::{signal, SignalKind},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

/// Exit status used when a second signal forces shutdown (128 + SIGINT).
pub const FORCED_EXIT_CODE: i32 = 130;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// The token was cancelled elsewhere or the signal source closed.
    Released,
    /// A second signal arrived while in-flight work was still draining.
    Forced,
}

/// Cancels `token` on the first request from `signals` and returns
/// [`Shutdown::Forced`] on the second.
pub async fn watch_shutdown<S>(token: CancellationToken, mut signals: S) -> Shutdown
where
    S: Stream<Item = &'static str> + Unpin,
{
    tokio::select! {
        received = signals.next() => match received {
            Some(name) => {
                log::warn!(
                    "Received {name} signal, finishing in-flight wallets (send again to exit now)"
                );
                token.cancel();
            }
            None => return Shutdown::Released,
        },
        _ = token.cancelled() => return Shutdown::Released,
    }

    match signals.next().await {
        Some(name) => {
            log::warn!("Received second {name} signal, exiting without saving");
            Shutdown::Forced
        }
        None => Shutdown::Released,
    }
}

// Cancels `token` on the first SIGINT or SIGTERM and exits the process on the second.
pub fn cancel_on_shutdown_signal(token: CancellationToken) -> io::Result<JoinHandle<()>> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let signals = stream::poll_fn(move |cx| {
        if let Poll::Ready(Some(())) = sigterm.poll_recv(cx) {
            return Poll::Ready(Some("termination"));
        }
        if let Poll::Ready(Some(())) = sigint.poll_recv(cx) {
            return Poll::Ready(Some("interrupt"));
        }
        Poll::Pending
    });

    let handle = tokio::spawn(async move {
        if watch_shutdown(token, signals).await == Shutdown::Forced {
            std::process::exit(FORCED_EXIT_CODE);
        }
    });

    Ok(handle)
}
