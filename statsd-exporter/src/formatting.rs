//! Helpers for sanitizing names and rendering metrics in the Prometheus exposition format.

use crate::event::Labels;

/// Writes a help (description) line in the Prometheus [exposition format].
///
/// [exposition format]: https://github.com/prometheus/docs/blob/main/content/docs/instrumenting/exposition_formats.md#text-format-details
pub fn write_help_line(buffer: &mut String, name: &str, desc: &str) {
    buffer.push_str("# HELP ");
    buffer.push_str(name);
    buffer.push(' ');
    buffer.push_str(&sanitize_description(desc));
    buffer.push('\n');
}

/// Writes a metric type line in the Prometheus [exposition format].
///
/// [exposition format]: https://github.com/prometheus/docs/blob/main/content/docs/instrumenting/exposition_formats.md#text-format-details
pub fn write_type_line(buffer: &mut String, name: &str, metric_type: &str) {
    buffer.push_str("# TYPE ");
    buffer.push_str(name);
    buffer.push(' ');
    buffer.push_str(metric_type);
    buffer.push('\n');
}

/// Writes a metric in the Prometheus [exposition format].
///
/// When `suffix` is specified, it is appended to the `name`, which is useful for writing summary
/// statistics such as the sum or count of a histogram or summary.  Likewise, `additional_label`
/// would typically be used to specify a data type-specific label, such as `le` for histograms, or
/// `quantile` for summaries.
///
/// [exposition format]: https://github.com/prometheus/docs/blob/main/content/docs/instrumenting/exposition_formats.md#text-format-details
pub fn write_metric_line(
    buffer: &mut String,
    name: &str,
    suffix: Option<&'static str>,
    labels: &Labels,
    additional_label: Option<(&'static str, &str)>,
    value: &str,
) {
    buffer.push_str(name);
    if let Some(suffix) = suffix {
        buffer.push('_');
        buffer.push_str(suffix);
    }

    if !labels.is_empty() || additional_label.is_some() {
        buffer.push('{');

        let mut first = true;
        for (key, value) in labels {
            if first {
                first = false;
            } else {
                buffer.push(',');
            }
            buffer.push_str(key);
            buffer.push_str("=\"");
            buffer.push_str(&sanitize_label_value(value));
            buffer.push('"');
        }

        if let Some((name, value)) = additional_label {
            if !first {
                buffer.push(',');
            }
            buffer.push_str(name);
            buffer.push_str("=\"");
            buffer.push_str(value);
            buffer.push('"');
        }

        buffer.push('}');
    }

    buffer.push(' ');
    buffer.push_str(value);
    buffer.push('\n');
}

/// Formats a floating-point value the way Prometheus expects to read it.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() { "+Inf" } else { "-Inf" }.to_string()
    } else {
        value.to_string()
    }
}

/// Sanitizes a metric name to be valid under the Prometheus [data model].
///
/// Every character outside of `[a-zA-Z0-9_:]` is replaced with a single underscore, one per
/// character, so runs of invalid characters are not collapsed.  A name starting with a digit is
/// prefixed with an underscore rather than having the digit replaced.
///
/// [data model]: https://prometheus.io/docs/concepts/data_model/#metric-names-and-labels
pub fn sanitize_metric_name(name: &str) -> String {
    sanitize_with(name, valid_metric_name_character)
}

/// Sanitizes a label key to be valid under the Prometheus [data model].
///
/// Follows the same rules as [`sanitize_metric_name`], except that colons are also replaced.
///
/// [data model]: https://prometheus.io/docs/concepts/data_model/#metric-names-and-labels
pub fn sanitize_label_key(key: &str) -> String {
    sanitize_with(key, valid_label_key_character)
}

fn sanitize_with(input: &str, valid: fn(char) -> bool) -> String {
    let mut sanitized = String::with_capacity(input.len() + 1);
    if input.starts_with(|c: char| c.is_ascii_digit()) {
        sanitized.push('_');
    }
    sanitized.extend(input.chars().map(|c| if valid(c) { c } else { '_' }));
    sanitized
}

/// Sanitizes a label value to be valid under the Prometheus [data model].
///
/// [data model]: https://prometheus.io/docs/concepts/data_model/#metric-names-and-labels
pub fn sanitize_label_value(value: &str) -> String {
    sanitize_label_value_or_description(value, false)
}

/// Sanitizes a metric description to be valid under the Prometheus [exposition format].
///
/// [exposition format]: https://github.com/prometheus/docs/blob/main/content/docs/instrumenting/exposition_formats.md#text-format-details
pub fn sanitize_description(value: &str) -> String {
    sanitize_label_value_or_description(value, true)
}

fn sanitize_label_value_or_description(value: &str, is_desc: bool) -> String {
    // Backslashes and line feeds are escaped everywhere, double quotes only in label values.
    let mut sanitized = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\n' => sanitized.push_str("\\n"),
            '\\' => sanitized.push_str("\\\\"),
            '"' if !is_desc => sanitized.push_str("\\\""),
            c => sanitized.push(c),
        }
    }
    sanitized
}

#[inline]
fn valid_metric_name_character(c: char) -> bool {
    // Essentially, needs to match the regex pattern of [a-zA-Z0-9_:].
    c.is_ascii_alphanumeric() || c == '_' || c == ':'
}

#[inline]
fn valid_label_key_character(c: char) -> bool {
    // Essentially, needs to match the regex pattern of [a-zA-Z0-9_].
    c.is_ascii_alphanumeric() || c == '_'
}
