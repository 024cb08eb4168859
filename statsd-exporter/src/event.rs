use std::collections::BTreeMap;
use std::fmt;

/// A set of labels attached to a metric.
///
/// Labels are kept sorted by key, so two label sets with the same content always iterate in the
/// same order regardless of the order the tags arrived in.
pub type Labels = BTreeMap<String, String>;

/// All events decoded from a single packet, or a single line of a TCP stream.
pub type Events = Vec<Event>;

/// The kind of a StatsD event.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EventKind {
    /// A counter increment (`c`).
    Counter,
    /// A gauge update (`g`).
    Gauge,
    /// A timer observation in milliseconds (`ms`, `h`, `d`).
    Timer,
}

impl EventKind {
    /// Gets the kind as a static string, suitable for labels and logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Counter => "counter",
            EventKind::Gauge => "gauge",
            EventKind::Timer => "timer",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single metric event decoded from the StatsD wire format.
///
/// Names are raw: they have been neither mapped nor sanitized.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Increments a counter by `value`.
    Counter {
        /// Raw metric name.
        name: String,
        /// Increment, already scaled by the inverse of the sample rate.
        value: f64,
        /// Labels parsed from the tag extension.
        labels: Labels,
    },
    /// Sets or adjusts a gauge.
    Gauge {
        /// Raw metric name.
        name: String,
        /// New value, or the delta to apply when `relative` is set.
        value: f64,
        /// Whether `value` is a delta (`+`/`-` prefixed) rather than an absolute value.
        relative: bool,
        /// Labels parsed from the tag extension.
        labels: Labels,
    },
    /// Records a timing, in milliseconds.
    Timer {
        /// Raw metric name.
        name: String,
        /// Observed duration in milliseconds.
        value: f64,
        /// Labels parsed from the tag extension.
        labels: Labels,
    },
}

impl Event {
    /// Gets the name of this event.
    pub fn name(&self) -> &str {
        match self {
            Event::Counter { name, .. } | Event::Gauge { name, .. } | Event::Timer { name, .. } => {
                name
            }
        }
    }

    /// Gets the value of this event.
    pub fn value(&self) -> f64 {
        match self {
            Event::Counter { value, .. } | Event::Gauge { value, .. } | Event::Timer { value, .. } => {
                *value
            }
        }
    }

    /// Gets the labels of this event.
    pub fn labels(&self) -> &Labels {
        match self {
            Event::Counter { labels, .. }
            | Event::Gauge { labels, .. }
            | Event::Timer { labels, .. } => labels,
        }
    }

    /// Gets the kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Counter { .. } => EventKind::Counter,
            Event::Gauge { .. } => EventKind::Gauge,
            Event::Timer { .. } => EventKind::Timer,
        }
    }
}
