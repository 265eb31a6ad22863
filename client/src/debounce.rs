//! Trailing-edge debounce on the tokio timer.
//!
//! Each [`Debouncer::call`] aborts the pending timer and starts a new one with
//! the latest argument. Once a timer elapses the callback is detached onto its
//! own task, so a later call never cancels work already in flight.

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};
use tokio::task::JoinHandle;

type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type Callback<A> = Arc<dyn Fn(A) -> BoxFuture + Send + Sync>;

pub struct Debouncer<A> {
    delay: Duration,
    callback: Callback<A>,
    pending: Option<JoinHandle<()>>,
}

impl<A: Send + 'static> Debouncer<A> {
    pub fn new<F, Fut>(delay: Duration, callback: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let callback: Callback<A> = Arc::new(move |arg: A| -> BoxFuture { Box::pin(callback(arg)) });
        Self {
            delay,
            callback,
            pending: None,
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn call(&mut self, arg: A) {
        self.cancel();

        let callback = Arc::clone(&self.callback);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(callback(arg));
        }));
    }
}

impl<A> Debouncer<A> {
    /// Drops the scheduled call, if it has not fired yet.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<A> Drop for Debouncer<A> {
    fn drop(&mut self) {
        self.cancel();
    }
}
