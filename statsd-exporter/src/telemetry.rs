use std::collections::HashMap;

use crate::collection::Collection;
use crate::event::{EventKind, Labels};
use crate::hash::hash_name_and_labels;
use crate::metric::{Counter, Metric};
use crate::parser::ParseError;
use crate::registry::ApplyError;

const EVENTS: &str = "statsd_exporter_events_total";
const SAMPLE_ERRORS: &str = "statsd_exporter_sample_errors_total";
const EVENT_ERRORS: &str = "statsd_exporter_event_errors_total";
const UDP_PACKETS: &str = "statsd_exporter_udp_packets_total";
const TCP_CONNECTIONS: &str = "statsd_exporter_tcp_connections_total";
const TCP_CONNECTION_ERRORS: &str = "statsd_exporter_tcp_connection_errors_total";
const TCP_TOO_LONG_LINES: &str = "statsd_exporter_tcp_too_long_lines_total";
const METRICS_EVICTED: &str = "statsd_exporter_metrics_evicted_total";
const TYPE_CONFLICTS: &str = "statsd_exporter_metric_type_conflicts_total";

/// Exporter telemetry.
///
/// `Telemetry` counts what the exporter itself is doing: packets and connections handled, events
/// consolidated, and input that had to be dropped.  It is shared between the listeners and the
/// consolidation loop, and its counters are registered with the [`Collection`] like any bridged
/// metric.
#[derive(Debug)]
pub struct Telemetry {
    counter_events: Counter,
    gauge_events: Counter,
    timer_events: Counter,
    udp_packets: Counter,
    tcp_connections: Counter,
    tcp_connection_errors: Counter,
    tcp_too_long_lines: Counter,
    metrics_evicted: Counter,
    type_conflicts: Counter,
    sample_errors: HashMap<&'static str, Counter>,
    event_errors: HashMap<&'static str, Counter>,
}

impl Telemetry {
    /// Creates a `Telemetry` instance with every counter at zero.
    pub fn new() -> Telemetry {
        Telemetry {
            counter_events: Counter::new(),
            gauge_events: Counter::new(),
            timer_events: Counter::new(),
            udp_packets: Counter::new(),
            tcp_connections: Counter::new(),
            tcp_connection_errors: Counter::new(),
            tcp_too_long_lines: Counter::new(),
            metrics_evicted: Counter::new(),
            type_conflicts: Counter::new(),
            sample_errors: ParseError::REASONS.iter().map(|r| (*r, Counter::new())).collect(),
            event_errors: ApplyError::REASONS.iter().map(|r| (*r, Counter::new())).collect(),
        }
    }

    /// Whether or not `name` is the name of one of the telemetry metric families.
    pub fn is_reserved(name: &str) -> bool {
        [
            EVENTS,
            SAMPLE_ERRORS,
            EVENT_ERRORS,
            UDP_PACKETS,
            TCP_CONNECTIONS,
            TCP_CONNECTION_ERRORS,
            TCP_TOO_LONG_LINES,
            METRICS_EVICTED,
            TYPE_CONFLICTS,
        ]
        .contains(&name)
    }

    /// Registers every telemetry counter with `collection`, under fixed keys.
    pub(crate) fn register(&self, collection: &Collection) {
        let events_help = "The total number of StatsD events seen.";
        let mut series = vec![
            (EVENTS, events_help, Some(("type", "counter")), &self.counter_events),
            (EVENTS, events_help, Some(("type", "gauge")), &self.gauge_events),
            (EVENTS, events_help, Some(("type", "timer")), &self.timer_events),
            (
                UDP_PACKETS,
                "The total number of StatsD packets received over UDP.",
                None,
                &self.udp_packets,
            ),
            (
                TCP_CONNECTIONS,
                "The total number of TCP connections handled.",
                None,
                &self.tcp_connections,
            ),
            (
                TCP_CONNECTION_ERRORS,
                "The number of errors encountered reading from TCP.",
                None,
                &self.tcp_connection_errors,
            ),
            (
                TCP_TOO_LONG_LINES,
                "The number of lines discarded due to being too long.",
                None,
                &self.tcp_too_long_lines,
            ),
            (
                METRICS_EVICTED,
                "The total number of metrics removed for exceeding their time-to-live.",
                None,
                &self.metrics_evicted,
            ),
            (
                TYPE_CONFLICTS,
                "The total number of metrics replaced because an event changed their type.",
                None,
                &self.type_conflicts,
            ),
        ];
        series.extend(self.sample_errors.iter().map(|(reason, counter)| {
            (
                SAMPLE_ERRORS,
                "The total number of errors parsing StatsD samples.",
                Some(("reason", *reason)),
                counter,
            )
        }));
        series.extend(self.event_errors.iter().map(|(reason, counter)| {
            (
                EVENT_ERRORS,
                "The total number of StatsD events that could not be consolidated.",
                Some(("reason", *reason)),
                counter,
            )
        }));

        for (name, help, label, counter) in series {
            let labels = label
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .into_iter()
                .collect::<Labels>();
            collection.register(
                hash_name_and_labels(name, &labels),
                name.to_string(),
                labels,
                help.to_string(),
                Metric::Counter(counter.clone()),
            );
        }
    }

    pub(crate) fn increment_events(&self, kind: EventKind) {
        let counter = match kind {
            EventKind::Counter => &self.counter_events,
            EventKind::Gauge => &self.gauge_events,
            EventKind::Timer => &self.timer_events,
        };
        counter.increment_by(1);
    }

    pub(crate) fn increment_udp_packets(&self) {
        self.udp_packets.increment_by(1);
    }

    pub(crate) fn increment_tcp_connections(&self) {
        self.tcp_connections.increment_by(1);
    }

    pub(crate) fn increment_tcp_connection_errors(&self) {
        self.tcp_connection_errors.increment_by(1);
    }

    pub(crate) fn increment_tcp_too_long_lines(&self) {
        self.tcp_too_long_lines.increment_by(1);
    }

    pub(crate) fn increment_metrics_evicted(&self, count: u64) {
        self.metrics_evicted.increment_by(count);
    }

    pub(crate) fn increment_type_conflicts(&self) {
        self.type_conflicts.increment_by(1);
    }

    pub(crate) fn increment_sample_errors(&self, reason: &'static str) {
        if let Some(counter) = self.sample_errors.get(reason) {
            counter.increment_by(1);
        }
    }

    pub(crate) fn increment_event_errors(&self, reason: &'static str) {
        if let Some(counter) = self.event_errors.get(reason) {
            counter.increment_by(1);
        }
    }

    /// Gets the number of sample errors recorded for `reason`.
    pub fn sample_errors(&self, reason: &str) -> u64 {
        self.sample_errors.get(reason).map_or(0, |counter| counter.get() as u64)
    }

    /// Gets the number of event errors recorded for `reason`.
    pub fn event_errors(&self, reason: &str) -> u64 {
        self.event_errors.get(reason).map_or(0, |counter| counter.get() as u64)
    }

    /// Gets the number of metrics evicted for exceeding their time-to-live.
    pub fn metrics_evicted(&self) -> u64 {
        self.metrics_evicted.get() as u64
    }

    /// Gets the number of metrics replaced because an event changed their type.
    pub fn type_conflicts(&self) -> u64 {
        self.type_conflicts.get() as u64
    }
}

impl Default for Telemetry {
    fn default() -> Self {
        Telemetry::new()
    }
}
