//! The consolidated metric state.
//!
//! The registry holds one map per metric type, keyed by [`MetricKey`].  It is owned by the
//! consolidation loop and is never shared: every entry it creates is also registered with the
//! [`Collection`], which is the only part scrapes can see.
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

use crate::collection::Collection;
use crate::event::{Event, Labels};
use crate::formatting::{sanitize_label_key, sanitize_metric_name};
use crate::hash::{hash_name_and_labels, MetricKey};
use crate::mapper::{Mapper, TimerType};
use crate::metric::{Counter, DistributionBuilder, Gauge, Metric, Timer};
use crate::telemetry::Telemetry;

/// Description given to every metric whose mapping does not provide one.
pub const DEFAULT_HELP: &str = "Metric autogenerated by statsd_exporter.";

/// Errors that can occur while applying an event to the registry.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ApplyError {
    /// A counter event carried a negative value.
    #[error("counter {name:?} cannot be decremented (value was {value})")]
    NegativeCounter {
        /// Sanitized metric name.
        name: String,
        /// The offending value.
        value: f64,
    },

    /// The metric name was empty once mapped and sanitized.
    #[error("metric name {raw:?} is empty after mapping")]
    EmptyName {
        /// The raw name carried by the event.
        raw: String,
    },

    /// Other series with the same name already have a different type.
    #[error("metric {name:?} is a {existing}, not a {received}")]
    TypeConflict {
        /// Sanitized metric name.
        name: String,
        /// Type of the series already registered under `name`.
        existing: &'static str,
        /// Type the event would have created.
        received: &'static str,
    },

    /// The name belongs to one of the exporter's own metrics.
    #[error("metric name {name:?} is reserved for exporter telemetry")]
    ReservedName {
        /// Sanitized metric name.
        name: String,
    },
}

impl ApplyError {
    /// Every value [`ApplyError::reason`] can return.
    pub const REASONS: [&'static str; 4] =
        ["illegal_negative_counter", "empty_name", "type_conflict", "reserved_name"];

    /// Gets a short, stable reason string for this error, suitable as a label value.
    pub fn reason(&self) -> &'static str {
        match self {
            ApplyError::NegativeCounter { .. } => "illegal_negative_counter",
            ApplyError::EmptyName { .. } => "empty_name",
            ApplyError::TypeConflict { .. } => "type_conflict",
            ApplyError::ReservedName { .. } => "reserved_name",
        }
    }
}

/// A single consolidated time series.
#[derive(Debug)]
pub struct RegistryEntry<M> {
    name: String,
    metric: M,
    last_touched: Instant,
    ttl: Option<Duration>,
}

impl<M> RegistryEntry<M> {
    fn new(name: String, metric: M, now: Instant, ttl: Option<Duration>) -> RegistryEntry<M> {
        RegistryEntry { name, metric, last_touched: now, ttl }
    }

    /// Gets the metric object.
    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Whether or not this entry has outlived its time-to-live at `now`.
    ///
    /// Entries without a time-to-live, or with a zero one, never expire.
    pub fn is_expired(&self, now: Instant) -> bool {
        match self.ttl {
            Some(ttl) if !ttl.is_zero() => now.saturating_duration_since(self.last_touched) > ttl,
            _ => false,
        }
    }

    fn touch(&mut self, now: Instant, ttl: Option<Duration>) {
        self.last_touched = now;
        self.ttl = ttl;
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum MapKind {
    Counter,
    Gauge,
    Histogram,
    Summary,
}

impl MapKind {
    fn type_name(self) -> &'static str {
        match self {
            MapKind::Counter => "counter",
            MapKind::Gauge => "gauge",
            MapKind::Histogram => "histogram",
            MapKind::Summary => "summary",
        }
    }
}

/// Every series registered under one name.
#[derive(Debug)]
struct Family {
    kind: MapKind,
    series: usize,
}

/// Per-type maps of consolidated time series.
pub struct Registry {
    counters: HashMap<MetricKey, RegistryEntry<Counter>>,
    gauges: HashMap<MetricKey, RegistryEntry<Gauge>>,
    histograms: HashMap<MetricKey, RegistryEntry<Timer>>,
    summaries: HashMap<MetricKey, RegistryEntry<Timer>>,
    families: HashMap<String, Family>,
    collection: Collection,
    distributions: DistributionBuilder,
    default_ttl: Option<Duration>,
    default_timer_type: TimerType,
    telemetry: Arc<Telemetry>,
}

impl Registry {
    pub(crate) fn new(
        collection: Collection,
        telemetry: Arc<Telemetry>,
        distributions: DistributionBuilder,
        default_ttl: Option<Duration>,
        default_timer_type: TimerType,
    ) -> Registry {
        Registry {
            counters: HashMap::new(),
            gauges: HashMap::new(),
            histograms: HashMap::new(),
            summaries: HashMap::new(),
            families: HashMap::new(),
            collection,
            distributions,
            default_ttl,
            default_timer_type,
            telemetry,
        }
    }

    /// Applies a single event.
    ///
    /// The event is mapped, its final name sanitized and hashed together with its labels, and the
    /// resulting entry created if needed before the type rule is applied and the entry refreshed.
    ///
    /// # Errors
    ///
    /// If the event cannot be applied, the registry is left untouched and an error is returned.
    pub fn apply(&mut self, event: &Event, mapper: &dyn Mapper, now: Instant) -> Result<(), ApplyError> {
        let mapping = mapper.map(event.name(), event.kind(), event.labels());

        let name = sanitize_metric_name(&mapping.name);
        if name.is_empty() {
            return Err(ApplyError::EmptyName { raw: event.name().to_string() });
        }
        if Telemetry::is_reserved(&name) {
            return Err(ApplyError::ReservedName { name });
        }

        let labels = mapping
            .labels
            .into_iter()
            .map(|(key, value)| (sanitize_label_key(&key), value))
            .collect::<Labels>();
        let key = hash_name_and_labels(&name, &labels);
        let ttl = mapping.ttl.or(self.default_ttl);
        let help = mapping.help.as_deref().unwrap_or(DEFAULT_HELP);
        let timer_type = mapping.timer_type.unwrap_or(self.default_timer_type);

        let kind = match event {
            Event::Counter { .. } => MapKind::Counter,
            Event::Gauge { .. } => MapKind::Gauge,
            Event::Timer { .. } => match timer_type {
                TimerType::Histogram => MapKind::Histogram,
                TimerType::Summary => MapKind::Summary,
            },
        };
        self.check_family(&name, key, kind)?;

        match event {
            Event::Counter { value, .. } => {
                // Validate before touching anything, so a bad event never creates an entry.
                if *value < 0.0 || value.is_nan() {
                    return Err(ApplyError::NegativeCounter { name, value: *value });
                }

                self.evict_conflicting(key, kind);
                let collection = &self.collection;
                let families = &mut self.families;
                let entry = self.counters.entry(key).or_insert_with(|| {
                    let counter = Counter::new();
                    track(families, &name, kind);
                    collection.register(
                        key,
                        name.clone(),
                        labels.clone(),
                        help.to_string(),
                        Metric::Counter(counter.clone()),
                    );
                    RegistryEntry::new(name.clone(), counter, now, ttl)
                });
                entry
                    .metric
                    .increment(*value)
                    .map_err(|e| ApplyError::NegativeCounter { name: name.clone(), value: e.0 })?;
                entry.touch(now, ttl);
            }
            Event::Gauge { value, relative, .. } => {
                self.evict_conflicting(key, kind);
                let collection = &self.collection;
                let families = &mut self.families;
                let entry = self.gauges.entry(key).or_insert_with(|| {
                    let gauge = Gauge::new();
                    track(families, &name, kind);
                    collection.register(
                        key,
                        name.clone(),
                        labels.clone(),
                        help.to_string(),
                        Metric::Gauge(gauge.clone()),
                    );
                    RegistryEntry::new(name.clone(), gauge, now, ttl)
                });
                if *relative {
                    entry.metric.add(*value);
                } else {
                    entry.metric.set(*value);
                }
                entry.touch(now, ttl);
            }
            Event::Timer { value, .. } => {
                self.evict_conflicting(key, kind);

                let collection = &self.collection;
                let families = &mut self.families;
                let distributions = &self.distributions;
                let map = match timer_type {
                    TimerType::Histogram => &mut self.histograms,
                    TimerType::Summary => &mut self.summaries,
                };
                let entry = map.entry(key).or_insert_with(|| {
                    let (timer, metric) = match timer_type {
                        TimerType::Histogram => {
                            let timer = distributions.histogram(mapping.buckets.as_deref());
                            (timer.clone(), Metric::Histogram(timer))
                        }
                        TimerType::Summary => {
                            let timer = distributions.summary(mapping.quantiles.as_deref());
                            (timer.clone(), Metric::Summary(timer))
                        }
                    };
                    track(families, &name, kind);
                    collection.register(key, name.clone(), labels.clone(), help.to_string(), metric);
                    RegistryEntry::new(name.clone(), timer, now, ttl)
                });

                // Timers arrive in milliseconds, and are exposed in seconds.
                entry.metric.observe(*value / 1000.0);
                entry.touch(now, ttl);
            }
        }

        Ok(())
    }

    /// Removes every entry that has outlived its time-to-live, unregistering it from the
    /// collection.
    ///
    /// Returns the number of entries removed.
    pub fn remove_stale_metrics(&mut self, now: Instant) -> usize {
        let collection = &self.collection;
        let families = &mut self.families;
        let evicted = remove_expired(&mut self.counters, collection, families, now)
            + remove_expired(&mut self.gauges, collection, families, now)
            + remove_expired(&mut self.histograms, collection, families, now)
            + remove_expired(&mut self.summaries, collection, families, now);

        if evicted > 0 {
            self.telemetry.increment_metrics_evicted(evicted as u64);
        }
        evicted
    }

    /// Removes every entry, unregistering all of them from the collection.
    pub fn clear(&mut self) {
        let keys = self
            .counters
            .drain()
            .map(|(key, _)| key)
            .chain(self.gauges.drain().map(|(key, _)| key))
            .chain(self.histograms.drain().map(|(key, _)| key))
            .chain(self.summaries.drain().map(|(key, _)| key));
        for key in keys {
            self.collection.unregister(&key);
        }
        self.families.clear();
    }

    /// Gets the counter entry for `key`, if any.
    pub fn counter(&self, key: &MetricKey) -> Option<&RegistryEntry<Counter>> {
        self.counters.get(key)
    }

    /// Gets the gauge entry for `key`, if any.
    pub fn gauge(&self, key: &MetricKey) -> Option<&RegistryEntry<Gauge>> {
        self.gauges.get(key)
    }

    /// Gets the histogram entry for `key`, if any.
    pub fn histogram(&self, key: &MetricKey) -> Option<&RegistryEntry<Timer>> {
        self.histograms.get(key)
    }

    /// Gets the summary entry for `key`, if any.
    pub fn summary(&self, key: &MetricKey) -> Option<&RegistryEntry<Timer>> {
        self.summaries.get(key)
    }

    /// Gets the number of counter entries.
    pub fn counters_len(&self) -> usize {
        self.counters.len()
    }

    /// Gets the total number of entries across all types.
    pub fn len(&self) -> usize {
        self.counters.len() + self.gauges.len() + self.histograms.len() + self.summaries.len()
    }

    /// Whether or not the registry holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks that an entry of `kind` may exist under `name`.
    ///
    /// A name holds series of a single type.  The only exception is the entry for `key` itself
    /// when it is the sole series of its name: it is replaced by [`Registry::evict_conflicting`].
    fn check_family(&self, name: &str, key: MetricKey, kind: MapKind) -> Result<(), ApplyError> {
        let Some(family) = self.families.get(name) else {
            return Ok(());
        };
        if family.kind == kind || (family.series == 1 && self.contains_key(&key)) {
            return Ok(());
        }

        Err(ApplyError::TypeConflict {
            name: name.to_string(),
            existing: family.kind.type_name(),
            received: kind.type_name(),
        })
    }

    fn contains_key(&self, key: &MetricKey) -> bool {
        self.counters.contains_key(key)
            || self.gauges.contains_key(key)
            || self.histograms.contains_key(key)
            || self.summaries.contains_key(key)
    }

    /// Removes the entry for `key` from every map but the one of `keep`.
    ///
    /// Only acts when `key` is absent from its own map, i.e. when an entry is about to be
    /// created, so repeated events for an existing entry never pay for it.
    fn evict_conflicting(&mut self, key: MetricKey, keep: MapKind) {
        let present = match keep {
            MapKind::Counter => self.counters.contains_key(&key),
            MapKind::Gauge => self.gauges.contains_key(&key),
            MapKind::Histogram => self.histograms.contains_key(&key),
            MapKind::Summary => self.summaries.contains_key(&key),
        };
        if present {
            return;
        }

        let mut removed = None;
        if keep != MapKind::Counter {
            removed = removed.or(self.counters.remove(&key).map(|entry| entry.name));
        }
        if keep != MapKind::Gauge {
            removed = removed.or(self.gauges.remove(&key).map(|entry| entry.name));
        }
        if keep != MapKind::Histogram {
            removed = removed.or(self.histograms.remove(&key).map(|entry| entry.name));
        }
        if keep != MapKind::Summary {
            removed = removed.or(self.summaries.remove(&key).map(|entry| entry.name));
        }

        if let Some(name) = removed {
            untrack(&mut self.families, &name);
            self.collection.unregister(&key);
            self.telemetry.increment_type_conflicts();
        }
    }
}

fn track(families: &mut HashMap<String, Family>, name: &str, kind: MapKind) {
    families.entry(name.to_string()).or_insert(Family { kind, series: 0 }).series += 1;
}

fn untrack(families: &mut HashMap<String, Family>, name: &str) {
    if let Some(family) = families.get_mut(name) {
        family.series = family.series.saturating_sub(1);
        if family.series == 0 {
            families.remove(name);
        }
    }
}

fn remove_expired<M>(
    map: &mut HashMap<MetricKey, RegistryEntry<M>>,
    collection: &Collection,
    families: &mut HashMap<String, Family>,
    now: Instant,
) -> usize {
    let before = map.len();
    map.retain(|key, entry| {
        if entry.is_expired(now) {
            collection.unregister(key);
            untrack(families, &entry.name);
            false
        } else {
            true
        }
    });
    before - map.len()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::Instant;

    use super::{ApplyError, Registry, DEFAULT_HELP};
    use crate::collection::Collection;
    use crate::event::{Event, Labels};
    use crate::hash::hash_name_and_labels;
    use crate::mapper::{MappingRule, Matcher, MatcherMapper, NoopMapper, TimerType};
    use crate::metric::{Distribution, DistributionBuilder};
    use crate::telemetry::Telemetry;

    fn registry(default_ttl: Option<Duration>) -> (Registry, Collection) {
        let collection = Collection::new();
        let registry = Registry::new(
            collection.clone(),
            Arc::new(Telemetry::new()),
            DistributionBuilder::new(vec![0.1, 0.5, 1.0], &[0.5]),
            default_ttl,
            TimerType::Histogram,
        );
        (registry, collection)
    }

    fn labels(pairs: &[(&str, &str)]) -> Labels {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn counter(name: &str, value: f64) -> Event {
        Event::Counter { name: name.into(), value, labels: Labels::new() }
    }

    fn timer(name: &str, value: f64) -> Event {
        Event::Timer { name: name.into(), value, labels: Labels::new() }
    }

    #[test]
    fn test_negative_counter_is_rejected_without_side_effects() {
        let (mut registry, collection) = registry(None);
        let now = Instant::now();

        let result = registry.apply(&counter("foo", -1.0), &NoopMapper, now);
        assert_eq!(result, Err(ApplyError::NegativeCounter { name: "foo".into(), value: -1.0 }));
        assert!(registry.is_empty());
        assert!(collection.is_empty());

        registry.apply(&counter("foo", 3.0), &NoopMapper, now).unwrap();
        assert!(registry.apply(&counter("foo", -2.0), &NoopMapper, now).is_err());

        let key = hash_name_and_labels("foo", &Labels::new());
        assert_eq!(registry.counter(&key).map(|e| e.metric().get()), Some(3.0));
    }

    #[test]
    fn test_timer_converted_to_seconds() {
        let (mut registry, _) = registry(None);
        registry.apply(&timer("latency", 300.0), &NoopMapper, Instant::now()).unwrap();

        let key = hash_name_and_labels("latency", &Labels::new());
        let entry = registry.histogram(&key).unwrap();
        entry.metric().with_distribution(|distribution| match distribution {
            Distribution::Histogram(hist) => {
                assert_eq!(hist.sum(), 0.3);
                assert_eq!(hist.count(), 1);
            }
            Distribution::Summary(..) => panic!("expected a histogram"),
        });
    }

    #[test]
    fn test_gauge_rules() {
        let (mut registry, _) = registry(None);
        let now = Instant::now();
        let gauge = |value, relative| Event::Gauge {
            name: "g".into(),
            value,
            relative,
            labels: Labels::new(),
        };

        registry.apply(&gauge(-4.0, true), &NoopMapper, now).unwrap();
        let key = hash_name_and_labels("g", &Labels::new());
        assert_eq!(registry.gauge(&key).map(|e| e.metric().get()), Some(-4.0));

        registry.apply(&gauge(10.0, false), &NoopMapper, now).unwrap();
        registry.apply(&gauge(2.5, true), &NoopMapper, now).unwrap();
        assert_eq!(registry.gauge(&key).map(|e| e.metric().get()), Some(12.5));
    }

    #[test]
    fn test_names_are_sanitized_before_hashing() {
        let (mut registry, collection) = registry(None);
        registry.apply(&counter("with.dot", 1.0), &NoopMapper, Instant::now()).unwrap();

        let key = hash_name_and_labels("with_dot", &Labels::new());
        assert!(registry.counter(&key).is_some());
        assert!(collection.render().contains(&format!("# HELP with_dot {}\n", DEFAULT_HELP)));
    }

    #[test]
    fn test_empty_mapped_name_is_rejected() {
        let (mut registry, _) = registry(None);
        let mapper = MatcherMapper::new().with_rule(MappingRule::new(Matcher::Full("x".into())).with_name(""));
        let result = registry.apply(&counter("x", 1.0), &mapper, Instant::now());
        assert_eq!(result, Err(ApplyError::EmptyName { raw: "x".into() }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_type_change_replaces_entry() {
        let collection = Collection::new();
        let telemetry = Arc::new(Telemetry::new());
        let mut registry = Registry::new(
            collection.clone(),
            telemetry.clone(),
            DistributionBuilder::new(vec![0.1, 0.5, 1.0], &[0.5]),
            None,
            TimerType::Histogram,
        );
        let now = Instant::now();
        let key = hash_name_and_labels("latency", &Labels::new());

        registry.apply(&timer("latency", 100.0), &NoopMapper, now).unwrap();
        assert!(registry.histogram(&key).is_some());

        let mapper = MatcherMapper::new().with_rule(
            MappingRule::new(Matcher::Full("latency".into())).with_timer_type(TimerType::Summary),
        );
        registry.apply(&timer("latency", 100.0), &mapper, now).unwrap();
        assert!(registry.histogram(&key).is_none());
        assert!(registry.summary(&key).is_some());
        assert_eq!(registry.len(), 1);
        assert!(collection.render().contains("# TYPE latency summary\n"));
        assert_eq!(telemetry.type_conflicts(), 1);
    }

    #[test]
    fn test_conflicting_type_under_same_name_is_rejected() {
        let (mut registry, collection) = registry(None);
        let now = Instant::now();
        let tagged = Event::Counter { name: "foo".into(), value: 5.0, labels: labels(&[("a", "1")]) };
        let gauge = Event::Gauge { name: "foo".into(), value: 7.0, relative: false, labels: Labels::new() };

        registry.apply(&tagged, &NoopMapper, now).unwrap();
        let result = registry.apply(&gauge, &NoopMapper, now);
        assert_eq!(
            result,
            Err(ApplyError::TypeConflict { name: "foo".into(), existing: "counter", received: "gauge" })
        );
        assert_eq!(registry.len(), 1);

        // Same type, other labels: joins the family.
        registry.apply(&counter("foo", 2.0), &NoopMapper, now).unwrap();
        assert_eq!(registry.len(), 2);

        let rendered = collection.render();
        assert!(rendered.contains("# TYPE foo counter\n"));
        assert!(rendered.contains("foo 2\n"));
        assert!(rendered.contains("foo{a=\"1\"} 5\n"));
        assert!(!rendered.contains("foo 7"));
    }

    #[test]
    fn test_type_change_with_siblings_is_rejected() {
        let (mut registry, _) = registry(None);
        let now = Instant::now();
        registry.apply(&timer("latency", 100.0), &NoopMapper, now).unwrap();
        let tagged = Event::Timer { name: "latency".into(), value: 1.0, labels: labels(&[("a", "1")]) };
        registry.apply(&tagged, &NoopMapper, now).unwrap();

        let mapper = MatcherMapper::new().with_rule(
            MappingRule::new(Matcher::Full("latency".into())).with_timer_type(TimerType::Summary),
        );
        let result = registry.apply(&timer("latency", 100.0), &mapper, now);
        assert!(matches!(result, Err(ApplyError::TypeConflict { existing: "histogram", .. })));
        assert!(registry.histogram(&hash_name_and_labels("latency", &Labels::new())).is_some());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_evicted_family_frees_its_name() {
        let ttl = Duration::from_millis(50);
        let (mut registry, collection) = registry(Some(ttl));
        let start = Instant::now();

        registry.apply(&counter("foo", 1.0), &NoopMapper, start).unwrap();
        let later = start + Duration::from_millis(60);
        assert_eq!(registry.remove_stale_metrics(later), 1);

        let gauge = Event::Gauge { name: "foo".into(), value: 3.0, relative: false, labels: Labels::new() };
        registry.apply(&gauge, &NoopMapper, later).unwrap();
        assert!(collection.render().contains("# TYPE foo gauge\nfoo 3\n"));
    }

    #[test]
    fn test_telemetry_names_are_reserved() {
        let (mut registry, collection) = registry(None);
        let result =
            registry.apply(&counter("statsd_exporter_udp_packets_total", 1.0), &NoopMapper, Instant::now());
        assert_eq!(
            result,
            Err(ApplyError::ReservedName { name: "statsd_exporter_udp_packets_total".into() })
        );
        assert!(registry.is_empty());
        assert!(collection.is_empty());
    }

    #[test]
    fn test_expired_entries_are_removed() {
        let ttl = Duration::from_millis(50);
        let (mut registry, collection) = registry(Some(ttl));
        let start = Instant::now();

        registry.apply(&counter("foo", 1.0), &NoopMapper, start).unwrap();
        registry.apply(&counter("bar", 1.0), &NoopMapper, start).unwrap();
        assert_eq!(registry.remove_stale_metrics(start + ttl), 0);

        let later = start + Duration::from_millis(60);
        registry.apply(&counter("foo", 1.0), &NoopMapper, later).unwrap();
        assert_eq!(registry.remove_stale_metrics(later), 1);

        assert_eq!(registry.counters_len(), 1);
        assert!(registry.counter(&hash_name_and_labels("foo", &Labels::new())).is_some());
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_zero_ttl_never_expires() {
        let mapper = MatcherMapper::new()
            .with_rule(MappingRule::new(Matcher::Full("forever".into())).with_ttl(Duration::ZERO));
        let (mut registry, _) = registry(Some(Duration::from_millis(1)));
        let start = Instant::now();

        registry.apply(&counter("forever", 1.0), &mapper, start).unwrap();
        assert_eq!(registry.remove_stale_metrics(start + Duration::from_secs(3600)), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_clear_unregisters_everything() {
        let (mut registry, collection) = registry(None);
        let now = Instant::now();
        registry.apply(&counter("a", 1.0), &NoopMapper, now).unwrap();
        registry.apply(&timer("b", 1.0), &NoopMapper, now).unwrap();
        assert_eq!(collection.len(), 2);

        registry.clear();
        assert!(registry.is_empty());
        assert!(collection.is_empty());
    }
}
