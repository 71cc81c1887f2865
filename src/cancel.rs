//! Cancellation and deadlines for a resolution.
//!
//! A [`CancelHandle`] is held by whoever may abort the work (Ctrl-C handler,
//! server shutdown). The matching [`Interrupt`] is threaded through every
//! blocking step; [`Interrupt::guard`] races a step against cancellation and
//! the deadline and drops the step when either fires.

use crate::error::{Result, UndertekstError};
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Handle for cancelling in-flight resolutions.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    tx: std::sync::Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Create a handle and the first interrupt bound to it.
    pub fn new() -> (Self, Interrupt) {
        let (tx, rx) = watch::channel(false);
        let handle = Self {
            tx: std::sync::Arc::new(tx),
        };
        (handle, Interrupt::from_receiver(rx))
    }

    /// Request cancellation. Steps in progress return [`UndertekstError::Cancelled`].
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Cancellation signal plus optional deadline, observed by each step.
#[derive(Clone, Debug)]
pub struct Interrupt {
    cancelled: Option<watch::Receiver<bool>>,
    deadline: Option<(Instant, Duration)>,
}

impl Interrupt {
    /// An interrupt that never fires.
    pub fn none() -> Self {
        Self {
            cancelled: None,
            deadline: None,
        }
    }

    fn from_receiver(rx: watch::Receiver<bool>) -> Self {
        Self {
            cancelled: Some(rx),
            deadline: None,
        }
    }

    /// Add a deadline measured from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some((Instant::now() + timeout, timeout));
        self
    }

    /// Add a deadline when one is configured.
    pub fn with_optional_timeout(self, timeout: Option<Duration>) -> Self {
        match timeout {
            Some(t) => self.with_timeout(t),
            None => self,
        }
    }

    /// Whether cancellation was already requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Run `step` unless cancellation or the deadline comes first.
    pub async fn guard<T, F>(&self, step: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.is_cancelled() {
            return Err(UndertekstError::Cancelled);
        }

        let mut cancelled = self.cancelled.clone();
        let cancel = async move {
            match cancelled.as_mut() {
                // A dropped handle can no longer cancel
                Some(rx) => {
                    let closed = rx.wait_for(|c| *c).await.is_err();
                    if closed {
                        std::future::pending::<()>().await;
                    }
                }
                None => std::future::pending::<()>().await,
            }
        };

        let deadline = self.deadline;
        let expire = async move {
            match deadline {
                Some((at, _)) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            result = step => result,
            _ = cancel => Err(UndertekstError::Cancelled),
            _ = expire => Err(UndertekstError::TimedOut(
                deadline.map(|(_, t)| t).unwrap_or_default(),
            )),
        }
    }
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::none()
    }
}
