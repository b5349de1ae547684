//! New-message notification dispatch.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

use sigrelay_protocols::{MessageObserver, NewMessage};

/// Capacity of the notification channel.
pub const DEFAULT_CAPACITY: usize = 256;

type Observers = Arc<RwLock<Vec<Arc<dyn MessageObserver>>>>;

/// Delivers [`NewMessage`] events to registered observers.
///
/// Events go through a bounded channel drained by a single dispatch task, so
/// [`publish`](Self::publish) never waits on an observer. When the channel is
/// full the event is dropped with a warning.
pub struct Notifier {
    observers: Observers,
    tx: mpsc::Sender<NewMessage>,
    /// Taken by the first registration, which starts the dispatch task.
    rx: Mutex<Option<mpsc::Receiver<NewMessage>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            observers: Arc::new(RwLock::new(Vec::new())),
            tx,
            rx: Mutex::new(Some(rx)),
        }
    }

    /// Add an observer.
    ///
    /// The first call spawns the dispatch task and must happen inside a Tokio runtime.
    pub fn register(&self, observer: Arc<dyn MessageObserver>) {
        info!(observer = observer.name(), "Registered message observer");
        self.observers.write().push(observer);

        if let Some(rx) = self.rx.lock().take() {
            tokio::spawn(dispatch(rx, self.observers.clone()));
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.read().len()
    }

    /// Queue an event for the observers. No-op without observers.
    pub fn publish(&self, event: NewMessage) {
        if self.observers.read().is_empty() {
            return;
        }

        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!("Notification channel full, dropping new-message event");
            }
            Err(TrySendError::Closed(_)) => {
                warn!("Notification dispatcher stopped, dropping new-message event");
            }
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

async fn dispatch(mut rx: mpsc::Receiver<NewMessage>, observers: Observers) {
    while let Some(event) = rx.recv().await {
        let current: Vec<_> = observers.read().clone();
        for observer in current {
            if let Err(e) = observer.on_message(&event).await {
                warn!(observer = observer.name(), error = %e, "Observer failed");
            }
        }
    }
    debug!("Notification dispatcher finished");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use sigrelay_protocols::{Message, MessageType, NotifyError};
    use tokio::sync::mpsc::UnboundedSender;

    use super::*;

    struct Forward {
        tx: UnboundedSender<String>,
        fail: bool,
    }

    #[async_trait]
    impl MessageObserver for Forward {
        fn name(&self) -> &str {
            "forward"
        }

        async fn on_message(&self, event: &NewMessage) -> Result<(), NotifyError> {
            let _ = self.tx.send(event.message.account.clone());
            if self.fail {
                return Err(NotifyError::PublishFailed("boom".to_string()));
            }
            Ok(())
        }
    }

    struct Stuck;

    #[async_trait]
    impl MessageObserver for Stuck {
        fn name(&self) -> &str {
            "stuck"
        }

        async fn on_message(&self, _event: &NewMessage) -> Result<(), NotifyError> {
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    fn event(account: &str) -> NewMessage {
        let message = Message {
            account: account.to_string(),
            ..Default::default()
        };
        NewMessage::new(message, vec![MessageType::Data])
    }

    #[tokio::test]
    async fn test_publish_without_observers_is_noop() {
        let notifier = Notifier::with_capacity(1);
        notifier.publish(event("a"));
        notifier.publish(event("b"));
        assert_eq!(notifier.observer_count(), 0);
    }

    #[tokio::test]
    async fn test_observers_receive_events_in_order() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let notifier = Notifier::new();
        notifier.register(Arc::new(Forward { tx, fail: false }));

        notifier.publish(event("a"));
        notifier.publish(event("b"));

        assert_eq!(rx.recv().await.unwrap(), "a");
        assert_eq!(rx.recv().await.unwrap(), "b");
    }

    #[tokio::test]
    async fn test_failing_observer_does_not_stop_dispatch() {
        let (tx1, mut rx1) = tokio::sync::mpsc::unbounded_channel();
        let (tx2, mut rx2) = tokio::sync::mpsc::unbounded_channel();
        let notifier = Notifier::new();
        notifier.register(Arc::new(Forward { tx: tx1, fail: true }));
        notifier.register(Arc::new(Forward { tx: tx2, fail: false }));

        notifier.publish(event("a"));
        notifier.publish(event("b"));

        assert_eq!(rx1.recv().await.unwrap(), "a");
        assert_eq!(rx2.recv().await.unwrap(), "a");
        assert_eq!(rx1.recv().await.unwrap(), "b");
        assert_eq!(rx2.recv().await.unwrap(), "b");
    }

    #[tokio::test]
    async fn test_publish_never_blocks_on_slow_observer() {
        let notifier = Notifier::with_capacity(2);
        notifier.register(Arc::new(Stuck));

        let publish_all = async {
            for i in 0..100 {
                notifier.publish(event(&i.to_string()));
            }
        };
        tokio::time::timeout(Duration::from_secs(1), publish_all)
            .await
            .expect("publish must not block");
    }
}
