use std::collections::VecDeque;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tenant_context_sdk::{Queue, QueueManager, QueueRef};

/// Unbounded in-memory FIFO.
pub struct InMemoryQueue {
    name: String,
    items: Mutex<VecDeque<serde_json::Value>>,
}

impl InMemoryQueue {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Mutex::new(VecDeque::new()),
        }
    }
}

impl Queue for InMemoryQueue {
    fn name(&self) -> &str {
        &self.name
    }

    fn push(&self, item: serde_json::Value) {
        self.items.lock().push_back(item);
    }

    fn pop(&self) -> Option<serde_json::Value> {
        self.items.lock().pop_front()
    }

    fn len(&self) -> usize {
        self.items.lock().len()
    }
}

/// Process-wide named queues; a queue is created the first time its name is used.
#[derive(Default)]
pub struct InMemoryQueueManager {
    queues: DashMap<String, Arc<InMemoryQueue>>,
}

impl InMemoryQueueManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queues created so far.
    #[must_use]
    pub fn queue_count(&self) -> usize {
        self.queues.len()
    }
}

impl QueueManager for InMemoryQueueManager {
    fn queue(&self, name: &str) -> QueueRef {
        self.queues
            .entry(name.to_owned())
            .or_insert_with(|| {
                tracing::debug!(queue = name, "queue created");
                Arc::new(InMemoryQueue::new(name))
            })
            .clone()
    }
}
