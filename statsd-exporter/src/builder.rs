use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::collection::Collection;
use crate::exporter::Exporter;
use crate::mapper::{Mapper, NoopMapper, TimerType};
use crate::metric::DistributionBuilder;
use crate::registry::Registry;
use crate::telemetry::Telemetry;

/// Default histogram buckets, in seconds.
pub const DEFAULT_BUCKETS: [f64; 11] =
    [0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Default summary quantiles.
pub const DEFAULT_QUANTILES: [f64; 3] = [0.5, 0.9, 0.99];

const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Errors that could occur while building or installing the exporter.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Bucket bounds or quantiles were empty.
    #[error("bucket bounds/quantiles cannot be empty")]
    EmptyBucketsOrQuantiles,

    /// The event channel capacity was zero.
    #[error("event channel capacity cannot be zero")]
    ZeroChannelCapacity,

    /// There was an issue when creating the HTTP listener.
    #[error("failed to create HTTP listener: {0}")]
    FailedToCreateHTTPListener(String),
}

/// Builder for creating an [`Exporter`].
pub struct ExporterBuilder {
    mapper: Arc<dyn Mapper>,
    cleanup_interval: Option<Duration>,
    default_ttl: Option<Duration>,
    timer_type: TimerType,
    buckets: Vec<f64>,
    quantiles: Vec<f64>,
    channel_capacity: usize,
}

impl ExporterBuilder {
    /// Creates a new [`ExporterBuilder`].
    pub fn new() -> Self {
        Self {
            mapper: Arc::new(NoopMapper),
            cleanup_interval: None,
            default_ttl: None,
            timer_type: TimerType::default(),
            buckets: DEFAULT_BUCKETS.to_vec(),
            quantiles: DEFAULT_QUANTILES.to_vec(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Sets the mapper consulted for every event.
    ///
    /// Defaults to [`NoopMapper`], which leaves names and labels as they were received.
    #[must_use]
    pub fn with_mapper<M>(mut self, mapper: M) -> Self
    where
        M: Mapper + 'static,
    {
        self.mapper = Arc::new(mapper);
        self
    }

    /// Enables the periodic removal of metrics that have outlived their time-to-live.
    ///
    /// Every `interval`, the consolidation loop scans all metrics and removes those that have not
    /// received an event within their time-to-live.  Metrics without a time-to-live are kept.
    ///
    /// A zero `interval` disables cleanup, like [`without_metrics_cleanup`](Self::without_metrics_cleanup).
    ///
    /// Defaults to disabled.
    #[must_use]
    pub fn with_metrics_cleanup(mut self, interval: Duration) -> Self {
        self.cleanup_interval = if interval.is_zero() { None } else { Some(interval) };
        self
    }

    /// Disables the periodic removal of stale metrics.
    #[must_use]
    pub fn without_metrics_cleanup(mut self) -> Self {
        self.cleanup_interval = None;
        self
    }

    /// Sets the time-to-live given to metrics whose mapping does not set one.
    ///
    /// A zero time-to-live is the same as none: such metrics are never removed.
    ///
    /// Defaults to none.
    #[must_use]
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Sets how timers are exposed when their mapping does not say.
    ///
    /// Defaults to [`TimerType::Histogram`].
    #[must_use]
    pub fn with_timer_type(mut self, timer_type: TimerType) -> Self {
        self.timer_type = timer_type;
        self
    }

    /// Sets the buckets used for histograms, in seconds.
    ///
    /// Defaults to the Prometheus client defaults, from 5 milliseconds to 10 seconds.
    ///
    /// ## Errors
    ///
    /// If `values` is empty, an error variant will be thrown.
    pub fn set_buckets(mut self, values: &[f64]) -> Result<Self, BuildError> {
        if values.is_empty() {
            return Err(BuildError::EmptyBucketsOrQuantiles);
        }

        self.buckets = values.to_vec();
        Ok(self)
    }

    /// Sets the quantiles exposed by summaries.
    ///
    /// Defaults to 0.5, 0.9 and 0.99.
    ///
    /// ## Errors
    ///
    /// If `quantiles` is empty, an error variant will be thrown.
    pub fn set_quantiles(mut self, quantiles: &[f64]) -> Result<Self, BuildError> {
        if quantiles.is_empty() {
            return Err(BuildError::EmptyBucketsOrQuantiles);
        }

        self.quantiles = quantiles.to_vec();
        Ok(self)
    }

    /// Sets the number of event batches that can be buffered between the listeners and the
    /// consolidation loop.
    ///
    /// Once the buffer is full, listeners wait for room, applying backpressure to their peers.
    ///
    /// Defaults to 1024.
    #[must_use]
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Builds the exporter.
    ///
    /// ## Errors
    ///
    /// If the channel capacity is zero, an error variant will be returned.
    pub fn build(self) -> Result<Exporter, BuildError> {
        if self.channel_capacity == 0 {
            return Err(BuildError::ZeroChannelCapacity);
        }

        let telemetry = Arc::new(Telemetry::new());
        let collection = Collection::new();
        telemetry.register(&collection);
        let registry = Registry::new(
            collection.clone(),
            telemetry.clone(),
            DistributionBuilder::new(self.buckets, &self.quantiles),
            self.default_ttl,
            self.timer_type,
        );

        Ok(Exporter::new(
            registry,
            self.mapper,
            self.cleanup_interval,
            self.channel_capacity,
            collection,
            telemetry,
        ))
    }
}

impl Default for ExporterBuilder {
    fn default() -> Self {
        ExporterBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{BuildError, ExporterBuilder};
    use crate::event::Labels;
    use crate::hash::hash_name_and_labels;
    use crate::mapper::TimerType;
    use crate::parser::parse_packet;

    #[test]
    fn test_invalid_settings() {
        assert!(matches!(
            ExporterBuilder::new().set_buckets(&[]),
            Err(BuildError::EmptyBucketsOrQuantiles)
        ));
        assert!(matches!(
            ExporterBuilder::new().set_quantiles(&[]),
            Err(BuildError::EmptyBucketsOrQuantiles)
        ));
        assert!(matches!(
            ExporterBuilder::new().with_channel_capacity(0).build(),
            Err(BuildError::ZeroChannelCapacity)
        ));
    }

    #[test]
    fn test_zero_cleanup_interval_disables_cleanup() {
        let builder = ExporterBuilder::new().with_metrics_cleanup(Duration::from_secs(1));
        assert_eq!(builder.cleanup_interval, Some(Duration::from_secs(1)));

        let builder = builder.with_metrics_cleanup(Duration::ZERO);
        assert_eq!(builder.cleanup_interval, None);
        assert!(builder.build().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_cleanup_interval_keeps_stale_metrics() {
        let mut exporter = ExporterBuilder::new()
            .with_metrics_cleanup(Duration::ZERO)
            .with_default_ttl(Duration::from_millis(10))
            .build()
            .unwrap();
        let (tx, rx) = exporter.channel();

        let producer = tokio::spawn(async move {
            tx.send(parse_packet(b"stale:1|c")).await.unwrap();
            tokio::time::sleep(Duration::from_secs(60)).await;
        });

        exporter.listen(rx).await;
        producer.await.unwrap();

        assert_eq!(exporter.registry().counters_len(), 1);
        assert_eq!(exporter.telemetry().metrics_evicted(), 0);
    }

    #[test]
    fn test_timer_settings_are_applied() {
        let mut exporter = ExporterBuilder::new()
            .with_timer_type(TimerType::Summary)
            .set_quantiles(&[0.25])
            .unwrap()
            .build()
            .unwrap();
        exporter.handle_events(parse_packet(b"latency:300|ms"));

        let key = hash_name_and_labels("latency", &Labels::new());
        assert!(exporter.registry().summary(&key).is_some());

        let rendered = exporter.collection().render();
        assert!(rendered.contains("latency{quantile=\"0.25\"} "));
        assert!(rendered.contains("latency_sum 0.3\n"));
    }

    #[test]
    fn test_custom_buckets() {
        let mut exporter = ExporterBuilder::new().set_buckets(&[0.1, 1.0]).unwrap().build().unwrap();
        exporter.handle_events(parse_packet(b"latency:300|ms"));

        let rendered = exporter.collection().render();
        assert!(rendered.contains("latency_bucket{le=\"0.1\"} 0\n"));
        assert!(rendered.contains("latency_bucket{le=\"1\"} 1\n"));
    }
}
