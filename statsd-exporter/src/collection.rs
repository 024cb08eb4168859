use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::event::Labels;
use crate::formatting::{format_value, write_help_line, write_metric_line, write_type_line};
use crate::hash::MetricKey;
use crate::metric::{Distribution, Metric};

struct Collected {
    name: String,
    labels: Labels,
    help: String,
    metric: Metric,
}

/// The set of metrics visible to scrapes.
///
/// The consolidation loop registers a metric object here when it creates a registry entry, and
/// unregisters it when the entry is evicted.  Everything else only ever reads from it.
#[derive(Clone, Default)]
pub struct Collection {
    metrics: Arc<RwLock<HashMap<MetricKey, Collected>>>,
}

impl Collection {
    /// Creates an empty `Collection`.
    pub fn new() -> Collection {
        Collection::default()
    }

    /// Registers a metric object, replacing any object already registered under `key`.
    pub fn register(&self, key: MetricKey, name: String, labels: Labels, help: String, metric: Metric) {
        self.metrics.write().insert(key, Collected { name, labels, help, metric });
    }

    /// Unregisters the metric object under `key`, returning `true` if there was one.
    pub fn unregister(&self, key: &MetricKey) -> bool {
        self.metrics.write().remove(key).is_some()
    }

    /// Gets the number of registered metric objects.
    pub fn len(&self) -> usize {
        self.metrics.read().len()
    }

    /// Whether or not any metric objects are registered.
    pub fn is_empty(&self) -> bool {
        self.metrics.read().is_empty()
    }

    /// Renders every registered metric in the Prometheus text exposition format.
    ///
    /// The registry never lets two types share a name, but objects registered directly may: only
    /// the series matching the type of a family's first series are rendered.
    pub fn render(&self) -> String {
        let mut output = String::new();

        let metrics = self.metrics.read();
        let mut by_name: BTreeMap<&str, Vec<&Collected>> = BTreeMap::new();
        for collected in metrics.values() {
            by_name.entry(collected.name.as_str()).or_default().push(collected);
        }

        for (name, mut series) in by_name {
            series.sort_by(|a, b| a.labels.cmp(&b.labels));

            let first = series[0];
            let metric_type = first.metric.type_name();
            write_help_line(&mut output, name, &first.help);
            write_type_line(&mut output, name, metric_type);

            for collected in series {
                if collected.metric.type_name() != metric_type {
                    debug!(
                        metric_name = name,
                        expected = metric_type,
                        actual = collected.metric.type_name(),
                        "Skipping series whose type conflicts with its metric family."
                    );
                    continue;
                }
                render_series(&mut output, name, &collected.labels, &collected.metric);
            }
            output.push('\n');
        }

        output
    }
}

fn render_series(output: &mut String, name: &str, labels: &Labels, metric: &Metric) {
    match metric {
        Metric::Counter(counter) => {
            write_metric_line(output, name, None, labels, None, &format_value(counter.get()));
        }
        Metric::Gauge(gauge) => {
            write_metric_line(output, name, None, labels, None, &format_value(gauge.get()));
        }
        Metric::Histogram(timer) | Metric::Summary(timer) => {
            timer.with_distribution(|distribution| {
                render_distribution(output, name, labels, distribution);
            });
        }
    }
}

fn render_distribution(output: &mut String, name: &str, labels: &Labels, distribution: &Distribution) {
    let (sum, count) = match distribution {
        Distribution::Summary(summary, quantiles, sum) => {
            for quantile in quantiles.iter() {
                let value = summary.quantile(quantile.value()).unwrap_or(0.0);
                write_metric_line(
                    output,
                    name,
                    None,
                    labels,
                    Some(("quantile", format_value(quantile.value()).as_str())),
                    &format_value(value),
                );
            }

            (*sum, summary.count() as u64)
        }
        Distribution::Histogram(histogram) => {
            for (le, count) in histogram.buckets() {
                write_metric_line(
                    output,
                    name,
                    Some("bucket"),
                    labels,
                    Some(("le", format_value(le).as_str())),
                    &count.to_string(),
                );
            }
            write_metric_line(
                output,
                name,
                Some("bucket"),
                labels,
                Some(("le", "+Inf")),
                &histogram.count().to_string(),
            );

            (histogram.sum(), histogram.count())
        }
    };

    write_metric_line(output, name, Some("sum"), labels, None, &format_value(sum));
    write_metric_line(output, name, Some("count"), labels, None, &count.to_string());
}
