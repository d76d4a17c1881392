use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use rand::{
    Rng, SeedableRng,
    distr::{Distribution, Uniform, uniform::SampleUniform},
    rngs::StdRng,
};

use crate::{
    foundation::error::{CaptchaError, CaptchaResult},
    value::provider::{Value, ValueProvider},
};

/// Where random providers draw from.
///
/// `Thread` is non-deterministic. `Seeded` is one generator shared by every provider
/// holding a clone of the source, so results are reproducible as long as the pull
/// order is.
#[derive(Clone, Debug, Default)]
pub enum RandomSource {
    #[default]
    Thread,
    Seeded(Arc<Mutex<StdRng>>),
}

impl RandomSource {
    pub fn thread() -> Self {
        Self::Thread
    }

    pub fn seeded(seed: u64) -> Self {
        Self::Seeded(Arc::new(Mutex::new(StdRng::seed_from_u64(seed))))
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or(Self::Thread, Self::seeded)
    }

    /// Uniform draw from the inclusive range `lo..=hi`.
    pub fn range<T>(&self, lo: T, hi: T) -> T
    where
        T: SampleUniform + PartialOrd + Copy,
    {
        match self {
            Self::Thread => rand::rng().random_range(lo..=hi),
            Self::Seeded(rng) => rng
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .random_range(lo..=hi),
        }
    }

    /// One draw from `distribution`.
    pub fn sample<T, D: Distribution<T>>(&self, distribution: &D) -> T {
        match self {
            Self::Thread => rand::rng().sample(distribution),
            Self::Seeded(rng) => rng
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .sample(distribution),
        }
    }

    pub fn chance(&self, probability: f64) -> bool {
        match self {
            Self::Thread => rand::rng().random_bool(probability),
            Self::Seeded(rng) => rng
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .random_bool(probability),
        }
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn index(&self, len: usize) -> usize {
        self.range(0, len - 1)
    }
}

struct RandomRange<T: SampleUniform> {
    uniform: Uniform<T>,
    source: RandomSource,
}

impl<T> ValueProvider<T> for RandomRange<T>
where
    T: SampleUniform + Send + Sync,
    T::Sampler: Send + Sync,
{
    fn next(&self) -> T {
        self.source.sample(&self.uniform)
    }
}

struct RandomBool {
    probability: f64,
    source: RandomSource,
}

impl ValueProvider<bool> for RandomBool {
    fn next(&self) -> bool {
        self.source.chance(self.probability)
    }
}

struct Choose<T> {
    values: Vec<T>,
    source: RandomSource,
}

impl<T: Clone + Send + Sync> ValueProvider<T> for Choose<T> {
    fn next(&self) -> T {
        self.values[self.source.index(self.values.len())].clone()
    }
}

impl<T> Value<T>
where
    T: SampleUniform + Copy + fmt::Debug + Send + Sync + 'static,
    T::Sampler: Send + Sync,
{
    /// Uniform draw from `min..=max` per call, from the thread-local generator.
    pub fn random_range(min: T, max: T) -> CaptchaResult<Self> {
        Self::random_range_with(RandomSource::thread(), min, max)
    }

    pub fn random_range_with(source: RandomSource, min: T, max: T) -> CaptchaResult<Self> {
        // Rejects inverted, NaN or infinite bounds and float spans that overflow.
        let uniform = Uniform::new_inclusive(min, max).map_err(|e| {
            CaptchaError::config(format!("invalid random range {min:?}..={max:?}: {e}"))
        })?;
        Ok(Self::new(RandomRange { uniform, source }))
    }
}

impl Value<bool> {
    /// `true` with the given probability.
    pub fn random_bool(probability: f64, source: RandomSource) -> CaptchaResult<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(CaptchaError::config(format!(
                "probability must be within [0, 1], got {probability}"
            )));
        }
        Ok(Self::new(RandomBool {
            probability,
            source,
        }))
    }
}

impl<T: Clone + Send + Sync + 'static> Value<T> {
    /// Uniform pick from `values` per call.
    pub fn choose(values: Vec<T>, source: RandomSource) -> CaptchaResult<Self> {
        if values.is_empty() {
            return Err(CaptchaError::config("choose needs at least one value"));
        }
        Ok(Self::new(Choose { values, source }))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/value/random.rs"]
mod tests;
