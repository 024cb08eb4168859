//! Mapping of raw StatsD names onto Prometheus metric names, labels and per-metric settings.
use std::time::Duration;

use crate::event::{EventKind, Labels};

/// How timers are exposed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TimerType {
    /// A Prometheus histogram.
    ///
    /// Exposes "bucketed" values to Prometheus, counting the number of samples below a given
    /// threshold i.e. 100 requests faster than 20ms, 1000 requests faster than 50ms, etc.
    #[default]
    Histogram,
    /// A Prometheus summary.
    ///
    /// Computes and exposes value quantiles directly to Prometheus i.e. 50% of requests were
    /// faster than 200ms, and 99% of requests were faster than 1000ms, etc.
    Summary,
}

/// The result of mapping a single event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricMapping {
    /// Final metric name.  It is sanitized after mapping, so it may still contain any character.
    pub name: String,
    /// Final label set.
    pub labels: Labels,
    /// Time-to-live overriding the exporter's default.  A zero TTL disables eviction.
    pub ttl: Option<Duration>,
    /// Timer type overriding the exporter's default.  Ignored for counters and gauges.
    pub timer_type: Option<TimerType>,
    /// Histogram buckets overriding the exporter's default, in seconds.
    pub buckets: Option<Vec<f64>>,
    /// Summary quantiles overriding the exporter's default.
    pub quantiles: Option<Vec<f64>>,
    /// Help text overriding the default description.
    pub help: Option<String>,
}

impl MetricMapping {
    /// Creates a mapping that passes the given name and labels through untouched.
    pub fn unmapped(name: &str, labels: &Labels) -> MetricMapping {
        MetricMapping { name: name.to_string(), labels: labels.clone(), ..Default::default() }
    }
}

/// Rewrites events before they are consolidated.
///
/// The exporter calls [`Mapper::map`] once per event, from the consolidation loop only.
pub trait Mapper: Send + Sync {
    /// Maps a raw name, event kind and labels to the final metric identity and settings.
    fn map(&self, name: &str, kind: EventKind, labels: &Labels) -> MetricMapping;
}

/// A mapper that leaves every event as it is.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopMapper;

impl Mapper for NoopMapper {
    fn map(&self, name: &str, _kind: EventKind, labels: &Labels) -> MetricMapping {
        MetricMapping::unmapped(name, labels)
    }
}

/// Matches a metric name in a specific way.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Matcher {
    /// Matches the entire metric name.
    Full(String),
    /// Matches the beginning of the metric name.
    Prefix(String),
    /// Matches the end of the metric name.
    Suffix(String),
}

impl Matcher {
    /// Checks if the given name matches this matcher.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Matcher::Prefix(prefix) => name.starts_with(prefix),
            Matcher::Suffix(suffix) => name.ends_with(suffix),
            Matcher::Full(full) => name == full,
        }
    }
}

/// A single rule of a [`MatcherMapper`].
#[derive(Clone, Debug)]
pub struct MappingRule {
    matcher: Matcher,
    kind: Option<EventKind>,
    name: Option<String>,
    labels: Labels,
    ttl: Option<Duration>,
    timer_type: Option<TimerType>,
    buckets: Option<Vec<f64>>,
    quantiles: Option<Vec<f64>>,
    help: Option<String>,
}

impl MappingRule {
    /// Creates a rule that applies to every event whose raw name matches `matcher`.
    pub fn new(matcher: Matcher) -> MappingRule {
        MappingRule {
            matcher,
            kind: None,
            name: None,
            labels: Labels::new(),
            ttl: None,
            timer_type: None,
            buckets: None,
            quantiles: None,
            help: None,
        }
    }

    /// Restricts the rule to events of the given kind.
    #[must_use]
    pub fn for_kind(mut self, kind: EventKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Renames matching events.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a label to matching events, overriding a tag with the same key.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Sets the time-to-live of matching metrics.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Sets how matching timers are exposed.
    #[must_use]
    pub fn with_timer_type(mut self, timer_type: TimerType) -> Self {
        self.timer_type = Some(timer_type);
        self
    }

    /// Sets the histogram buckets of matching timers.
    #[must_use]
    pub fn with_buckets(mut self, buckets: &[f64]) -> Self {
        self.buckets = Some(buckets.to_vec());
        self
    }

    /// Sets the summary quantiles of matching timers.
    #[must_use]
    pub fn with_quantiles(mut self, quantiles: &[f64]) -> Self {
        self.quantiles = Some(quantiles.to_vec());
        self
    }

    /// Sets the help text of matching metrics.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn matches(&self, name: &str, kind: EventKind) -> bool {
        self.kind.map_or(true, |k| k == kind) && self.matcher.matches(name)
    }

    fn apply(&self, name: &str, labels: &Labels) -> MetricMapping {
        let mut mapped_labels = labels.clone();
        mapped_labels.extend(self.labels.iter().map(|(k, v)| (k.clone(), v.clone())));

        MetricMapping {
            name: self.name.clone().unwrap_or_else(|| name.to_string()),
            labels: mapped_labels,
            ttl: self.ttl,
            timer_type: self.timer_type,
            buckets: self.buckets.clone(),
            quantiles: self.quantiles.clone(),
            help: self.help.clone(),
        }
    }
}

/// A mapper driven by an ordered list of [`MappingRule`]s.
///
/// The first rule that matches an event is applied; events matching no rule pass through.
#[derive(Clone, Debug, Default)]
pub struct MatcherMapper {
    rules: Vec<MappingRule>,
}

impl MatcherMapper {
    /// Creates an empty `MatcherMapper`.
    pub fn new() -> MatcherMapper {
        MatcherMapper::default()
    }

    /// Appends a rule.  Rules are evaluated in the order they were added.
    #[must_use]
    pub fn with_rule(mut self, rule: MappingRule) -> Self {
        self.rules.push(rule);
        self
    }
}

impl Mapper for MatcherMapper {
    fn map(&self, name: &str, kind: EventKind, labels: &Labels) -> MetricMapping {
        self.rules
            .iter()
            .find(|rule| rule.matches(name, kind))
            .map_or_else(|| MetricMapping::unmapped(name, labels), |rule| rule.apply(name, labels))
    }
}
