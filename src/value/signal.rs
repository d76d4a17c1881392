use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

/// Something that rotates its state when a [`Signal`] fires.
pub trait Advance: Send + Sync {
    fn advance(&self);
}

/// A named barrier placed into a pipeline.
///
/// Layers carry `Tick` steps referencing a signal; the executor fires the signal when
/// it reaches that position, and every subscriber advances. This keeps provider
/// rotation separate from the processors that mutate layers.
pub struct Signal {
    name: String,
    subscribers: Mutex<Vec<Arc<dyn Advance>>>,
}

impl Signal {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subscribe(&self, target: Arc<dyn Advance>) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(target);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn fire(&self) {
        // Advance outside the lock so subscribers may touch the signal themselves.
        let subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        tracing::trace!(signal = %self.name, subscribers = subscribers.len(), "tick");
        for s in subscribers {
            s.advance();
        }
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("name", &self.name)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
