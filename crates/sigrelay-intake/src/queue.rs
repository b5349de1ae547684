//! In-memory message buffer.

use std::collections::VecDeque;

use parking_lot::Mutex;

use sigrelay_protocols::Message;

/// FIFO queue shared between the intake reader and delivery handlers.
///
/// Every operation holds the lock only for the push or the take, so a
/// message is handed out at most once even under concurrent pop/flush.
#[derive(Debug, Default)]
pub struct MessageQueue {
    inner: Mutex<VecDeque<Message>>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, message: Message) {
        self.inner.lock().push_back(message);
    }

    /// Remove and return the oldest message.
    pub fn pop(&self) -> Option<Message> {
        self.inner.lock().pop_front()
    }

    /// Remove and return everything, oldest first.
    pub fn flush(&self) -> Vec<Message> {
        let drained = std::mem::take(&mut *self.inner.lock());
        Vec::from(drained)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;

    fn msg(account: &str) -> Message {
        Message {
            account: account.to_string(),
            ..Default::default()
        }
    }

    fn accounts(messages: &[Message]) -> Vec<&str> {
        messages.iter().map(|m| m.account.as_str()).collect()
    }

    #[test]
    fn test_pop_in_insertion_order() {
        let queue = MessageQueue::new();
        for a in ["a", "b", "c"] {
            queue.enqueue(msg(a));
        }

        assert_eq!(queue.pop().unwrap().account, "a");
        assert_eq!(queue.pop().unwrap().account, "b");
        assert_eq!(queue.pop().unwrap().account, "c");
        assert!(queue.pop().is_none());
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_flush_drains_in_order() {
        let queue = MessageQueue::new();
        for a in ["a", "b", "c"] {
            queue.enqueue(msg(a));
        }

        let flushed = queue.flush();
        assert_eq!(accounts(&flushed), vec!["a", "b", "c"]);
        assert!(queue.is_empty());
        assert!(queue.flush().is_empty());
    }

    #[test]
    fn test_pop_then_flush() {
        let queue = MessageQueue::new();
        for a in ["a", "b", "c"] {
            queue.enqueue(msg(a));
        }

        assert_eq!(queue.pop().unwrap().account, "a");
        assert_eq!(accounts(&queue.flush()), vec!["b", "c"]);
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_concurrent_consumers_never_duplicate() {
        let queue = Arc::new(MessageQueue::new());
        let total = 1000;

        let producer = {
            let queue = queue.clone();
            std::thread::spawn(move || {
                for i in 0..total {
                    queue.enqueue(msg(&i.to_string()));
                }
            })
        };

        let consumers: Vec<_> = (0..4)
            .map(|n| {
                let queue = queue.clone();
                std::thread::spawn(move || {
                    let mut seen = Vec::new();
                    for _ in 0..500 {
                        if n % 2 == 0 {
                            seen.extend(queue.pop());
                        } else {
                            seen.extend(queue.flush());
                        }
                    }
                    seen
                })
            })
            .collect();

        producer.join().unwrap();
        let mut seen: Vec<Message> = consumers
            .into_iter()
            .flat_map(|c| c.join().unwrap())
            .collect();
        seen.extend(queue.flush());

        let unique: HashSet<_> = seen.iter().map(|m| m.account.clone()).collect();
        assert_eq!(seen.len(), total);
        assert_eq!(unique.len(), total);
    }
}
