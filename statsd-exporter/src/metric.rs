//! Metric objects created by the registry and read by the exposition side.
//!
//! Every object is a cheaply cloneable handle: the registry keeps one clone to apply events and
//! the [`Collection`](crate::Collection) keeps another to render current values.
use std::sync::atomic::Ordering;
use std::sync::Arc;

use metrics::{atomics::AtomicU64, GaugeFn};
use metrics_util::storage::{Histogram, Summary};
use metrics_util::{parse_quantiles, Quantile};
use parking_lot::Mutex;
use thiserror::Error;

/// A counter was asked to decrease.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
#[error("counter cannot decrease in value (delta was {0})")]
pub struct DecreasingCounterError(pub f64);

/// A monotonic, floating-point counter.
#[derive(Clone, Debug)]
pub struct Counter {
    inner: Arc<AtomicU64>,
}

impl Counter {
    /// Creates a counter starting at zero.
    pub fn new() -> Counter {
        Counter { inner: Arc::new(AtomicU64::new(0.0f64.to_bits())) }
    }

    /// Adds `delta` to the counter.
    ///
    /// # Errors
    ///
    /// If `delta` is negative, or NaN, the counter is left untouched and an error is returned.
    pub fn increment(&self, delta: f64) -> Result<(), DecreasingCounterError> {
        if delta < 0.0 || delta.is_nan() {
            return Err(DecreasingCounterError(delta));
        }

        GaugeFn::increment(&*self.inner, delta);
        Ok(())
    }

    /// Adds a whole number of occurrences to the counter.
    pub fn increment_by(&self, count: u64) {
        GaugeFn::increment(&*self.inner, count as f64);
    }

    /// Gets the current value.
    pub fn get(&self) -> f64 {
        f64::from_bits(self.inner.load(Ordering::Acquire))
    }
}

impl Default for Counter {
    fn default() -> Self {
        Counter::new()
    }
}

/// A floating-point gauge.
#[derive(Clone, Debug)]
pub struct Gauge {
    inner: Arc<AtomicU64>,
}

impl Gauge {
    /// Creates a gauge starting at zero.
    pub fn new() -> Gauge {
        Gauge { inner: Arc::new(AtomicU64::new(0.0f64.to_bits())) }
    }

    /// Sets the gauge to `value`.
    pub fn set(&self, value: f64) {
        GaugeFn::set(&*self.inner, value);
    }

    /// Adds `delta`, which may be negative, to the gauge.
    pub fn add(&self, delta: f64) {
        GaugeFn::increment(&*self.inner, delta);
    }

    /// Gets the current value.
    pub fn get(&self) -> f64 {
        f64::from_bits(self.inner.load(Ordering::Acquire))
    }
}

impl Default for Gauge {
    fn default() -> Self {
        Gauge::new()
    }
}

/// Distribution type.
#[derive(Clone)]
pub enum Distribution {
    /// A Prometheus histogram, with cumulative bucket counts.
    Histogram(Histogram),
    /// A Prometheus summary: the sketch, the quantiles to expose, and the running sum.
    Summary(Summary, Arc<Vec<Quantile>>, f64),
}

impl Distribution {
    /// Creates a histogram distribution.
    ///
    /// Returns `None` if `buckets` is empty.
    pub fn new_histogram(buckets: &[f64]) -> Option<Distribution> {
        Histogram::new(buckets).map(Distribution::Histogram)
    }

    /// Creates a summary distribution.
    pub fn new_summary(quantiles: Arc<Vec<Quantile>>) -> Distribution {
        Distribution::Summary(Summary::with_defaults(), quantiles, 0.0)
    }

    /// Records a single sample.
    pub fn record(&mut self, sample: f64) {
        match self {
            Distribution::Histogram(hist) => hist.record(sample),
            Distribution::Summary(summary, _, sum) => {
                summary.add(sample);
                *sum += sample;
            }
        }
    }
}

/// A shared handle to a [`Distribution`].
#[derive(Clone)]
pub struct Timer {
    inner: Arc<Mutex<Distribution>>,
}

impl Timer {
    /// Wraps the given distribution.
    pub fn new(distribution: Distribution) -> Timer {
        Timer { inner: Arc::new(Mutex::new(distribution)) }
    }

    /// Observes `value`, in seconds.
    pub fn observe(&self, value: f64) {
        self.inner.lock().record(value);
    }

    /// Runs `f` against a consistent view of the distribution.
    pub fn with_distribution<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&Distribution) -> T,
    {
        f(&self.inner.lock())
    }
}

/// Builds the distributions backing timers, based on the configured defaults.
#[derive(Debug)]
pub(crate) struct DistributionBuilder {
    buckets: Vec<f64>,
    quantiles: Arc<Vec<Quantile>>,
}

impl DistributionBuilder {
    pub fn new(buckets: Vec<f64>, quantiles: &[f64]) -> DistributionBuilder {
        DistributionBuilder { buckets, quantiles: Arc::new(parse_quantiles(quantiles)) }
    }

    /// Creates a histogram, using `buckets` if given and non-empty, or the defaults otherwise.
    pub fn histogram(&self, buckets: Option<&[f64]>) -> Timer {
        let distribution = buckets
            .and_then(Distribution::new_histogram)
            .or_else(|| Distribution::new_histogram(&self.buckets))
            .unwrap_or_else(|| Distribution::new_summary(self.quantiles.clone()));
        Timer::new(distribution)
    }

    /// Creates a summary, using `quantiles` if given, or the defaults otherwise.
    pub fn summary(&self, quantiles: Option<&[f64]>) -> Timer {
        let quantiles = match quantiles {
            Some(quantiles) => Arc::new(parse_quantiles(quantiles)),
            None => self.quantiles.clone(),
        };
        Timer::new(Distribution::new_summary(quantiles))
    }
}

/// A metric object of any type.
#[derive(Clone)]
pub enum Metric {
    /// A counter.
    Counter(Counter),
    /// A gauge.
    Gauge(Gauge),
    /// A timer exposed as a histogram.
    Histogram(Timer),
    /// A timer exposed as a summary.
    Summary(Timer),
}

impl Metric {
    /// Gets the Prometheus type name of this metric.
    pub fn type_name(&self) -> &'static str {
        match self {
            Metric::Counter(_) => "counter",
            Metric::Gauge(_) => "gauge",
            Metric::Histogram(_) => "histogram",
            Metric::Summary(_) => "summary",
        }
    }
}
