//! Deferred work produced by the controller.
//!
//! The controller never awaits anything itself. Every suspension point
//! (next frame, row fetch, transition delay) is returned as a [`Command`]
//! whose futures each resolve to a message that the host feeds back into
//! `Viewport::update`.

use futures::future::BoxFuture;
use tokio::sync::mpsc;

/// A batch of futures that each produce a message.
pub struct Command<M> {
    futures: Vec<BoxFuture<'static, M>>,
}

impl<M> Command<M> {
    /// Create an empty command (no async work).
    pub fn none() -> Self {
        Self {
            futures: Vec::new(),
        }
    }

    /// Create a command from a future.
    pub fn perform<F>(future: F) -> Self
    where
        F: Future<Output = M> + Send + 'static,
    {
        Self {
            futures: vec![Box::pin(future)],
        }
    }

    /// Batch multiple commands together.
    pub fn batch(commands: impl IntoIterator<Item = Command<M>>) -> Self {
        Self {
            futures: commands.into_iter().flat_map(|c| c.futures).collect(),
        }
    }

    /// Check if this command has no work to do.
    pub fn is_empty(&self) -> bool {
        self.futures.is_empty()
    }

    /// Number of pending futures.
    pub fn len(&self) -> usize {
        self.futures.len()
    }

    /// Take the futures out of this command.
    pub fn into_futures(self) -> Vec<BoxFuture<'static, M>> {
        self.futures
    }
}

impl<M: Send + 'static> Command<M> {
    /// Spawn every future on the tokio runtime, forwarding results to `tx`.
    ///
    /// Messages whose receiver has gone away are dropped.
    pub fn spawn(self, tx: &mpsc::UnboundedSender<M>) {
        for future in self.futures {
            let tx = tx.clone();
            tokio::spawn(async move {
                let _ = tx.send(future.await);
            });
        }
    }
}

impl<M> Default for Command<M> {
    fn default() -> Self {
        Self::none()
    }
}

impl<M> std::fmt::Debug for Command<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("futures", &self.futures.len())
            .finish()
    }
}
