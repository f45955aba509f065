// ABOUTME: Deferred single-value computation
// ABOUTME: Captures work as a thunk that runs only when explicitly activated or awaited

use crate::Result;
use futures_util::future::BoxFuture;
use std::fmt;
use std::future::IntoFuture;

/// Work captured now, performed later
///
/// Nothing happens until [`Deferred::run`] is called or the value is
/// awaited. Dropping a `Deferred` without activating it has no side effects.
#[must_use = "deferred computations do nothing unless run or awaited"]
pub struct Deferred<T> {
    thunk: Box<dyn FnOnce() -> Result<T> + Send + 'static>,
}

impl<T: Send + 'static> Deferred<T> {
    /// Capture `work` without running it
    pub fn new<F>(work: F) -> Self
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        Self {
            thunk: Box::new(work),
        }
    }

    /// Run the captured work on the current thread
    pub fn run(self) -> Result<T> {
        (self.thunk)()
    }

    /// Transform the eventual value, still without running anything
    pub fn map<U, F>(self, f: F) -> Deferred<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        Deferred::new(move || self.run().map(f))
    }

    /// Chain another deferred computation that depends on this one's value
    pub fn and_then<U, F>(self, f: F) -> Deferred<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Deferred<U> + Send + 'static,
    {
        Deferred::new(move || self.run().and_then(|value| f(value).run()))
    }
}

impl<T: Send + 'static> IntoFuture for Deferred<T> {
    type Output = Result<T>;
    type IntoFuture = BoxFuture<'static, Result<T>>;

    fn into_future(self) -> Self::IntoFuture {
        // The thunk runs on first poll, not here
        Box::pin(async move { self.run() })
    }
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred").finish_non_exhaustive()
    }
}
