//! Display-configuration change notifications.
//!
//! Callbacks may run on any thread. Whoever subscribes gets a
//! [`SubscriptionToken`] and must hand that same token back to unsubscribe.
//!
//! # Example
//!
//! ```no_run
//! use screenkeep::notify::{DisplayChangeNotifier, system_notifier};
//!
//! let notifier = system_notifier();
//! let token = notifier
//!     .subscribe(Box::new(|| println!("display configuration changed")))
//!     .expect("Failed to subscribe");
//!
//! // ...
//!
//! notifier.unsubscribe(token).unwrap();
//! ```

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

/// Callback invoked on every display-configuration change.
pub type ChangeCallback = Box<dyn Fn() + Send + Sync>;

/// Identifies one registered callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

impl SubscriptionToken {
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A source of display-configuration change notifications.
pub trait DisplayChangeNotifier: Send + Sync {
    /// Register a callback.
    fn subscribe(&self, callback: ChangeCallback) -> Result<SubscriptionToken>;

    /// Remove the callback registered under `token`.
    fn unsubscribe(&self, token: SubscriptionToken) -> Result<()>;
}

/// Token-keyed callback registry.
///
/// Platform watchers call [`notify`](Self::notify); tests and hosts without a
/// native change source can call it directly.
#[derive(Default)]
pub struct DisplayChangeHub {
    next_id: AtomicU64,
    subscribers: Mutex<HashMap<SubscriptionToken, Arc<dyn Fn() + Send + Sync>>>,
}

impl DisplayChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoke every registered callback.
    ///
    /// The registry lock is released before callbacks run, so a callback may
    /// subscribe or unsubscribe.
    pub fn notify(&self) {
        let callbacks: Vec<_> = match self.subscribers.lock() {
            Ok(subscribers) => subscribers.values().cloned().collect(),
            Err(_) => {
                log::warn!("display change registry poisoned, dropping notification");
                return;
            }
        };
        log::debug!("display change, notifying {} subscribers", callbacks.len());
        for callback in callbacks {
            callback();
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl DisplayChangeNotifier for DisplayChangeHub {
    fn subscribe(&self, callback: ChangeCallback) -> Result<SubscriptionToken> {
        let token = SubscriptionToken(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.subscribers
            .lock()
            .map_err(|_| Error::ThreadError("mutex poisoned".into()))?
            .insert(token, Arc::from(callback));
        Ok(token)
    }

    fn unsubscribe(&self, token: SubscriptionToken) -> Result<()> {
        self.subscribers
            .lock()
            .map_err(|_| Error::ThreadError("mutex poisoned".into()))?
            .remove(&token)
            .map(|_| ())
            .ok_or(Error::UnknownSubscription(token.0))
    }
}

/// Process-wide notifier fed by the platform's display-change source.
///
/// The native watcher starts on the first subscription. Platforms without one
/// still accept subscriptions; they only fire through [`Self::hub`].
pub struct SystemNotifier {
    hub: DisplayChangeHub,
    watching: AtomicBool,
}

impl SystemNotifier {
    /// The registry behind this notifier.
    pub fn hub(&self) -> &DisplayChangeHub {
        &self.hub
    }

    fn ensure_watching(&self) {
        if self.watching.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Err(e) = crate::platform::start_display_watch() {
            log::warn!("no native display change source: {}", e);
        }
    }
}

impl DisplayChangeNotifier for SystemNotifier {
    fn subscribe(&self, callback: ChangeCallback) -> Result<SubscriptionToken> {
        self.ensure_watching();
        self.hub.subscribe(callback)
    }

    fn unsubscribe(&self, token: SubscriptionToken) -> Result<()> {
        self.hub.unsubscribe(token)
    }
}

/// The process-wide [`SystemNotifier`].
pub fn system_notifier() -> Arc<SystemNotifier> {
    static NOTIFIER: OnceLock<Arc<SystemNotifier>> = OnceLock::new();
    NOTIFIER
        .get_or_init(|| {
            Arc::new(SystemNotifier {
                hub: DisplayChangeHub::new(),
                watching: AtomicBool::new(false),
            })
        })
        .clone()
}

// ============================================================================
// Tokio async support (behind feature flag)
// ============================================================================

#[cfg(feature = "tokio")]
pub use tokio_channel::*;

#[cfg(feature = "tokio")]
mod tokio_channel {
    use super::*;
    use tokio::sync::mpsc as tokio_mpsc;

    /// Unsubscribes its token when dropped.
    pub struct SubscriptionGuard {
        notifier: Arc<dyn DisplayChangeNotifier>,
        token: Option<SubscriptionToken>,
    }

    impl SubscriptionGuard {
        pub fn token(&self) -> Option<SubscriptionToken> {
            self.token
        }

        /// Unsubscribe now instead of on drop.
        pub fn cancel(mut self) -> Result<()> {
            self.cancel_inner()
        }

        fn cancel_inner(&mut self) -> Result<()> {
            match self.token.take() {
                Some(token) => self.notifier.unsubscribe(token),
                None => Ok(()),
            }
        }
    }

    impl Drop for SubscriptionGuard {
        fn drop(&mut self) {
            let _ = self.cancel_inner();
        }
    }

    /// Receive display changes on a tokio channel.
    ///
    /// Notifications that arrive while the channel is full are dropped; one
    /// queued message is enough to trigger a re-check.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use screenkeep::notify::{display_change_channel, DisplayChangeHub};
    /// use std::sync::Arc;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let hub = Arc::new(DisplayChangeHub::new());
    ///     let (_guard, mut rx) = display_change_channel(hub, 8).unwrap();
    ///     while rx.recv().await.is_some() {
    ///         println!("display configuration changed");
    ///     }
    /// }
    /// ```
    pub fn display_change_channel(
        notifier: Arc<dyn DisplayChangeNotifier>,
        capacity: usize,
    ) -> Result<(SubscriptionGuard, tokio_mpsc::Receiver<()>)> {
        let (sender, receiver) = tokio_mpsc::channel(capacity);
        let token = notifier.subscribe(Box::new(move || {
            let _ = sender.try_send(());
        }))?;
        let guard = SubscriptionGuard {
            notifier,
            token: Some(token),
        };
        Ok((guard, receiver))
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, ChangeCallback) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = count.clone();
        (
            count,
            Box::new(move || {
                inner.fetch_add(1, Ordering::SeqCst);
            }),
        )
    }

    #[test]
    fn test_notify_reaches_subscribers() {
        let hub = DisplayChangeHub::new();
        let (a, cb_a) = counter();
        let (b, cb_b) = counter();
        hub.subscribe(cb_a).unwrap();
        hub.subscribe(cb_b).unwrap();

        hub.notify();
        hub.notify();
        assert_eq!(a.load(Ordering::SeqCst), 2);
        assert_eq!(b.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unsubscribe_removes_only_that_token() {
        let hub = DisplayChangeHub::new();
        let (a, cb_a) = counter();
        let (b, cb_b) = counter();
        let token_a = hub.subscribe(cb_a).unwrap();
        hub.subscribe(cb_b).unwrap();

        hub.unsubscribe(token_a).unwrap();
        hub.notify();
        assert_eq!(a.load(Ordering::SeqCst), 0);
        assert_eq!(b.load(Ordering::SeqCst), 1);
        assert_eq!(hub.subscriber_count(), 1);
    }

    #[test]
    fn test_unsubscribe_twice_fails() {
        let hub = DisplayChangeHub::new();
        let (_, cb) = counter();
        let token = hub.subscribe(cb).unwrap();
        hub.unsubscribe(token).unwrap();
        assert!(matches!(
            hub.unsubscribe(token),
            Err(Error::UnknownSubscription(id)) if id == token.id()
        ));
    }

    #[test]
    fn test_tokens_are_distinct() {
        let hub = DisplayChangeHub::new();
        let (_, cb_a) = counter();
        let (_, cb_b) = counter();
        assert_ne!(hub.subscribe(cb_a).unwrap(), hub.subscribe(cb_b).unwrap());
    }

    #[test]
    fn test_callback_may_unsubscribe_itself() {
        let hub = Arc::new(DisplayChangeHub::new());
        let slot: Arc<Mutex<Option<SubscriptionToken>>> = Arc::new(Mutex::new(None));
        let (hub_ref, slot_ref) = (hub.clone(), slot.clone());
        let token = hub
            .subscribe(Box::new(move || {
                if let Some(token) = slot_ref.lock().unwrap().take() {
                    hub_ref.unsubscribe(token).unwrap();
                }
            }))
            .unwrap();
        *slot.lock().unwrap() = Some(token);

        hub.notify();
        assert_eq!(hub.subscriber_count(), 0);
    }
}
