use std::{
    fmt,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};

use crate::foundation::error::{CaptchaError, CaptchaResult};

/// A lazy, possibly stateful generator of parameter values.
///
/// Providers are shared by every generation of a mixer, so implementations that keep
/// state across calls must synchronize it themselves.
pub trait ValueProvider<T>: Send + Sync {
    fn next(&self) -> T;
}

/// Shared handle to a [`ValueProvider`].
///
/// Cloning the handle shares the provider (and its state); it does not copy it.
pub struct Value<T>(Arc<dyn ValueProvider<T>>);

impl<T> Clone for Value<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Value")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

impl<T: 'static> Value<T> {
    pub fn new(provider: impl ValueProvider<T> + 'static) -> Self {
        Self(Arc::new(provider))
    }

    pub fn from_arc(provider: Arc<dyn ValueProvider<T>>) -> Self {
        Self(provider)
    }

    /// Pulls the next value.
    pub fn next(&self) -> T {
        self.0.next()
    }

    /// Converter: forwards exactly one pull to `self` per call and maps the result.
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + Send + Sync + 'static) -> Value<U> {
        Value::new(Converter {
            source: self,
            f: Box::new(f),
        })
    }
}

impl<T: Clone + Send + Sync + 'static> Value<T> {
    pub fn constant(value: T) -> Self {
        Self::new(Constant(value))
    }

    /// Cyclic sequence: call `i` returns `values[i % values.len()]`.
    pub fn carousel(values: Vec<T>) -> CaptchaResult<Self> {
        if values.is_empty() {
            return Err(CaptchaError::config("carousel needs at least one value"));
        }
        Ok(Self::new(Carousel {
            values,
            cursor: AtomicUsize::new(0),
        }))
    }

    /// Repeater: pulls from `self` on every `period`-th call and holds the value in between.
    pub fn repeat(self, period: u32) -> CaptchaResult<Self> {
        if period == 0 {
            return Err(CaptchaError::config("repeater period must be >= 1"));
        }
        Ok(Self::new(Repeater {
            source: self,
            period: u64::from(period),
            state: Mutex::new(RepeaterState {
                calls: 0,
                held: None,
            }),
        }))
    }
}

struct Constant<T>(T);

impl<T: Clone + Send + Sync> ValueProvider<T> for Constant<T> {
    fn next(&self) -> T {
        self.0.clone()
    }
}

struct Carousel<T> {
    values: Vec<T>,
    cursor: AtomicUsize,
}

impl<T: Clone + Send + Sync> ValueProvider<T> for Carousel<T> {
    fn next(&self) -> T {
        let i = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.values[i % self.values.len()].clone()
    }
}

struct Converter<T, U> {
    source: Value<T>,
    f: Box<dyn Fn(T) -> U + Send + Sync>,
}

impl<T: 'static, U> ValueProvider<U> for Converter<T, U> {
    fn next(&self) -> U {
        (self.f)(self.source.next())
    }
}

struct RepeaterState<T> {
    calls: u64,
    held: Option<T>,
}

struct Repeater<T> {
    source: Value<T>,
    period: u64,
    state: Mutex<RepeaterState<T>>,
}

impl<T: Clone + Send + Sync + 'static> ValueProvider<T> for Repeater<T> {
    fn next(&self) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let pull = state.calls % self.period == 0;
        state.calls = state.calls.wrapping_add(1);
        match (&state.held, pull) {
            (Some(v), false) => v.clone(),
            _ => {
                let v = self.source.next();
                state.held = Some(v.clone());
                v
            }
        }
    }
}

/// Closures are providers, which keeps one-off generators cheap to write.
impl<T, F> ValueProvider<T> for F
where
    F: Fn() -> T + Send + Sync,
{
    fn next(&self) -> T {
        self()
    }
}

macro_rules! impl_from_constant {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Value<$t> {
                fn from(v: $t) -> Self {
                    Value::constant(v)
                }
            }
        )*
    };
}

impl_from_constant!(bool, u8, u32, u64, usize, i32, i64, f32, f64, char, String);

#[cfg(test)]
#[path = "../../tests/unit/value/provider.rs"]
mod tests;
