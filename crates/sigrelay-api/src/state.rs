//! Delivery state and the repeat-last policy.

use std::sync::Arc;

use parking_lot::Mutex;

use sigrelay_protocols::{Message, MessageSource};

/// State shared by the delivery handlers.
pub struct DeliveryState {
    source: Arc<dyn MessageSource>,
    repeat_last: bool,
    /// Most recently delivered message; only kept with repeat-last.
    last: Mutex<Option<Message>>,
}

impl DeliveryState {
    pub fn new(source: Arc<dyn MessageSource>, repeat_last: bool) -> Self {
        Self {
            source,
            repeat_last,
            last: Mutex::new(None),
        }
    }

    pub fn repeat_last(&self) -> bool {
        self.repeat_last
    }

    /// Oldest queued message, else the last delivered one when repeat-last is on.
    pub fn pop(&self) -> Option<Message> {
        if !self.repeat_last {
            return self.source.pop();
        }

        // Held across the dequeue so the cache always matches the newest hand-out.
        let mut last = self.last.lock();
        match self.source.pop() {
            Some(message) => {
                *last = Some(message.clone());
                Some(message)
            }
            None => last.clone(),
        }
    }

    /// Every queued message, oldest first. A non-empty batch updates the cache.
    pub fn flush(&self) -> Vec<Message> {
        if !self.repeat_last {
            return self.source.flush();
        }

        let mut last = self.last.lock();
        let messages = self.source.flush();
        if let Some(newest) = messages.last() {
            *last = Some(newest.clone());
        }
        messages
    }
}
