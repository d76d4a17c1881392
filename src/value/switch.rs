use std::sync::{Arc, Mutex, PoisonError};

use crate::value::{
    provider::{Value, ValueProvider},
    signal::{Advance, Signal},
};

/// Hold-until-advanced provider.
///
/// The first pull after construction or after an advance takes one value from the
/// source; every later pull returns that value until the next advance.
pub struct Switcher<T> {
    source: Value<T>,
    held: Mutex<Option<T>>,
}

impl<T: Clone + Send + Sync + 'static> Switcher<T> {
    pub fn new(source: Value<T>) -> Arc<Self> {
        Arc::new(Self {
            source,
            held: Mutex::new(None),
        })
    }

    /// Creates a switcher that advances whenever `signal` fires.
    pub fn on(signal: &Signal, source: Value<T>) -> Arc<Self> {
        let switcher = Self::new(source);
        signal.subscribe(switcher.clone());
        switcher
    }

    /// A provider handle reading through this switcher.
    pub fn value(self: &Arc<Self>) -> Value<T> {
        Value::from_arc(self.clone())
    }
}

impl<T: Clone + Send + Sync + 'static> ValueProvider<T> for Switcher<T> {
    fn next(&self) -> T {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        match &*held {
            Some(v) => v.clone(),
            None => {
                let v = self.source.next();
                *held = Some(v.clone());
                v
            }
        }
    }
}

impl<T: Send + Sync> Advance for Switcher<T> {
    fn advance(&self) {
        *self.held.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Source-switching provider.
///
/// Like [`Switcher`], but what is held is a whole provider drawn from a provider of
/// providers; pulls in between advances go to the held provider.
pub struct Selector<T> {
    sources: Value<Value<T>>,
    current: Mutex<Option<Value<T>>>,
}

impl<T: 'static> Selector<T> {
    pub fn new(sources: Value<Value<T>>) -> Arc<Self> {
        Arc::new(Self {
            sources,
            current: Mutex::new(None),
        })
    }

    pub fn on(signal: &Signal, sources: Value<Value<T>>) -> Arc<Self> {
        let selector = Self::new(sources);
        signal.subscribe(selector.clone());
        selector
    }

    pub fn value(self: &Arc<Self>) -> Value<T> {
        Value::from_arc(self.clone())
    }
}

impl<T: 'static> ValueProvider<T> for Selector<T> {
    fn next(&self) -> T {
        let source = {
            let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
            current.get_or_insert_with(|| self.sources.next()).clone()
        };
        source.next()
    }
}

impl<T: 'static> Advance for Selector<T> {
    fn advance(&self) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/value/switch.rs"]
mod tests;
