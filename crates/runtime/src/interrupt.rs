//! Cooperative cancellation flag.
//!
//! An [`InterruptSignal`] never stops anything by itself. Actions poll it at
//! their own safe points with [`InterruptSignal::check`] (usually via `?`), or
//! race a long wait against [`InterruptSignal::cancelled`]. An action that
//! never looks at its signal runs to completion.
//!
//! Repeated calls to [`InterruptSignal::interrupt`] keep the first reason:
//! whoever stopped the work first is the one reported back to the caller.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Notify;

/// Raised by [`InterruptSignal::check`] once the signal has been tripped.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("interrupted: {reason}")]
pub struct Interrupted {
    pub reason: String,
}

/// Shared, cloneable cancellation flag with a reason.
///
/// Clones observe the same flag. Use [`InterruptSignal::new`] for an
/// independent one.
#[derive(Clone, Default)]
pub struct InterruptSignal {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    interrupted: AtomicBool,
    reason: Mutex<Option<String>>,
    notify: Notify,
}

impl InterruptSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests interruption.
    ///
    /// Returns `true` if this call tripped the signal, `false` if it was
    /// already interrupted (the earlier reason is kept).
    pub fn interrupt(&self, reason: impl Into<String>) -> bool {
        let mut slot = self
            .inner
            .reason
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.inner.interrupted.load(Ordering::Acquire) {
            return false;
        }
        *slot = Some(reason.into());
        self.inner.interrupted.store(true, Ordering::Release);
        drop(slot);

        self.inner.notify.notify_waiters();
        true
    }

    pub fn is_interrupted(&self) -> bool {
        self.inner.interrupted.load(Ordering::Acquire)
    }

    /// Reason recorded by the first successful [`interrupt`](Self::interrupt).
    pub fn reason(&self) -> Option<String> {
        self.inner
            .reason
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Poll point: `Err` once interrupted.
    pub fn check(&self) -> Result<(), Interrupted> {
        if !self.is_interrupted() {
            return Ok(());
        }
        Err(Interrupted {
            reason: self.reason().unwrap_or_default(),
        })
    }

    /// Resolves once the signal is interrupted (immediately if it already is).
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register before re-checking so a concurrent interrupt is not missed.
            notified.as_mut().enable();
            if self.is_interrupted() {
                return;
            }
            notified.await;
        }
    }

    /// Re-arms the signal. Only the process-wide signal is ever cleared.
    pub(crate) fn clear(&self) {
        let mut slot = self
            .inner
            .reason
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = None;
        self.inner.interrupted.store(false, Ordering::Release);
    }

    /// True if both handles point at the same underlying flag.
    pub fn same_signal(&self, other: &InterruptSignal) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for InterruptSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterruptSignal")
            .field("interrupted", &self.is_interrupted())
            .field("reason", &self.reason())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn interrupt_sets_flag_and_reason() {
        let signal = InterruptSignal::new();
        assert!(!signal.is_interrupted());
        assert!(signal.check().is_ok());

        assert!(signal.interrupt("player asked to stop"));
        assert!(signal.is_interrupted());
        assert_eq!(signal.reason().as_deref(), Some("player asked to stop"));

        let err = signal.check().unwrap_err();
        assert_eq!(err.reason, "player asked to stop");
    }

    #[test]
    fn first_reason_wins() {
        let signal = InterruptSignal::new();
        assert!(signal.interrupt("first"));
        assert!(!signal.interrupt("second"));
        assert_eq!(signal.reason().as_deref(), Some("first"));
    }

    #[test]
    fn independent_signals_do_not_interfere() {
        let a = InterruptSignal::new();
        let b = InterruptSignal::new();
        a.interrupt("stop a");

        assert!(a.check().is_err());
        assert!(b.check().is_ok());
        assert!(!a.same_signal(&b));
        assert!(a.same_signal(&a.clone()));
    }

    #[test]
    fn clear_rearms_the_signal() {
        let signal = InterruptSignal::new();
        signal.interrupt("pause");
        signal.clear();

        assert!(!signal.is_interrupted());
        assert_eq!(signal.reason(), None);
        assert!(signal.interrupt("again"));
        assert_eq!(signal.reason().as_deref(), Some("again"));
    }

    #[tokio::test]
    async fn cancelled_wakes_waiters() {
        let signal = InterruptSignal::new();
        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.cancelled().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        signal.interrupt("wake up");

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should finish")
            .expect("waiter should not panic");
    }

    #[tokio::test]
    async fn cancelled_returns_immediately_when_already_interrupted() {
        let signal = InterruptSignal::new();
        signal.interrupt("done");
        tokio::time::timeout(Duration::from_millis(100), signal.cancelled())
            .await
            .expect("should not wait");
    }
}
