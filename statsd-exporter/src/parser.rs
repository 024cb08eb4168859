//! Decoding of the StatsD line protocol, including the DogStatsD tag extension.
//!
//! A packet holds one or more newline-delimited statements of the form:
//!
//! ```text
//! <name>:<value>|<type>[|@<sample rate>][|#<tag>:<value>,<tag>:<value>]
//! ```
//!
//! Parsing is lenient: a statement that cannot be decoded is dropped on its own and never affects
//! the other statements in the same packet.
use thiserror::Error;
use tracing::debug;

use crate::event::{Event, Events, Labels};
use crate::formatting::sanitize_label_key;

/// Upper bound on the number of observations a single sampled timer statement can expand into.
const MAX_TIMER_MULTIPLIER: f64 = 1000.0;

/// Errors that can occur while decoding a statement.
///
/// Some errors only degrade a statement (a malformed tag is skipped, a bad sample rate falls back
/// to 1) while others discard it entirely.  [`ParseError::discards_sample`] tells them apart.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParseError {
    /// The line was not valid UTF-8.
    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    /// The line did not have the `<name>:<sample>` shape.
    #[error("malformed line {line:?}")]
    MalformedLine {
        /// The offending line.
        line: String,
    },

    /// A sample did not have the `<value>|<type>[|...]` shape.
    #[error("malformed sample {sample:?} in line {line:?}")]
    MalformedComponent {
        /// The offending line.
        line: String,
        /// The offending sample.
        sample: String,
    },

    /// The sample value was not a number.
    #[error("invalid value {value:?} in line {line:?}")]
    InvalidValue {
        /// The offending line.
        line: String,
        /// The offending value.
        value: String,
    },

    /// The metric type code was not recognised.
    #[error("unknown metric type {kind:?} in line {line:?}")]
    UnknownType {
        /// The offending line.
        line: String,
        /// The metric type code.
        kind: String,
    },

    /// The metric type code is valid StatsD but cannot be bridged.
    #[error("unsupported metric type {kind:?} in line {line:?}")]
    UnsupportedType {
        /// The offending line.
        line: String,
        /// The metric type code.
        kind: String,
    },

    /// A single tag was malformed and was skipped.
    #[error("malformed tag {tag:?} in line {line:?}")]
    MalformedTag {
        /// The offending line.
        line: String,
        /// The offending tag.
        tag: String,
    },

    /// A sample rate was given for a metric type that does not support one, and was ignored.
    #[error("sample rate not allowed for metric type {kind:?} in line {line:?}")]
    IllegalSampleRate {
        /// The offending line.
        line: String,
        /// The metric type code.
        kind: String,
    },

    /// A sample rate could not be parsed, and a rate of 1 was used instead.
    #[error("invalid sample rate {rate:?} in line {line:?}")]
    InvalidSampleRate {
        /// The offending line.
        line: String,
        /// The offending sample rate.
        rate: String,
    },

    /// A trailing section was neither a sample rate nor a tag list, and was ignored.
    #[error("unknown section {component:?} in line {line:?}")]
    UnknownComponent {
        /// The offending line.
        line: String,
        /// The offending section.
        component: String,
    },
}

impl ParseError {
    /// Every value [`ParseError::reason`] can return.
    pub const REASONS: [&'static str; 10] = [
        "invalid_utf8",
        "malformed_line",
        "malformed_component",
        "malformed_value",
        "illegal_event",
        "unsupported_type",
        "malformed_tag",
        "illegal_sample_factor",
        "invalid_sample_factor",
        "unknown_component",
    ];

    /// Whether or not this error caused a sample to be dropped.
    ///
    /// When `false`, the sample was still decoded, minus the part that caused the error.
    pub fn discards_sample(&self) -> bool {
        !matches!(
            self,
            ParseError::MalformedTag { .. }
                | ParseError::IllegalSampleRate { .. }
                | ParseError::InvalidSampleRate { .. }
                | ParseError::UnknownComponent { .. }
        )
    }

    /// Gets a short, stable reason string for this error, suitable as a label value.
    pub fn reason(&self) -> &'static str {
        match self {
            ParseError::InvalidUtf8 => "invalid_utf8",
            ParseError::MalformedLine { .. } => "malformed_line",
            ParseError::MalformedComponent { .. } => "malformed_component",
            ParseError::InvalidValue { .. } => "malformed_value",
            ParseError::UnknownType { .. } => "illegal_event",
            ParseError::UnsupportedType { .. } => "unsupported_type",
            ParseError::MalformedTag { .. } => "malformed_tag",
            ParseError::IllegalSampleRate { .. } => "illegal_sample_factor",
            ParseError::InvalidSampleRate { .. } => "invalid_sample_factor",
            ParseError::UnknownComponent { .. } => "unknown_component",
        }
    }
}

/// Parses a packet into events, logging and discarding anything malformed.
pub fn parse_packet(packet: &[u8]) -> Events {
    parse_packet_with(packet, |error| debug!(%error, "Discarding malformed StatsD input."))
}

/// Parses a packet into events, handing every parse error to `on_error`.
///
/// Lines are parsed independently: an error on one line never affects another.
pub fn parse_packet_with<F>(packet: &[u8], mut on_error: F) -> Events
where
    F: FnMut(ParseError),
{
    let mut events = Vec::new();
    for line in packet.split(|b| *b == b'\n') {
        parse_line_with(line, &mut events, &mut on_error);
    }
    events
}

/// Parses a single line, appending any resulting events to `events`.
///
/// Empty lines are skipped silently.  A trailing carriage return is ignored.
pub fn parse_line_with<F>(line: &[u8], events: &mut Events, on_error: &mut F)
where
    F: FnMut(ParseError),
{
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    if line.is_empty() {
        return;
    }

    let line = match std::str::from_utf8(line) {
        Ok(line) => line,
        Err(_) => return on_error(ParseError::InvalidUtf8),
    };

    let (name, rest) = match line.split_once(':') {
        Some((name, rest)) if !name.is_empty() && !rest.is_empty() => (name, rest),
        _ => return on_error(ParseError::MalformedLine { line: line.to_string() }),
    };

    // Tag values may contain colons, so multi-value lines are only supported without tags.
    if rest.contains("|#") {
        parse_sample(line, name, rest, events, on_error);
    } else {
        for sample in rest.split(':') {
            parse_sample(line, name, sample, events, on_error);
        }
    }
}

fn parse_sample<F>(line: &str, name: &str, sample: &str, events: &mut Events, on_error: &mut F)
where
    F: FnMut(ParseError),
{
    let components = sample.split('|').collect::<Vec<_>>();
    if components.len() < 2 || components.len() > 4 || components[2..].iter().any(|c| c.is_empty())
    {
        return on_error(ParseError::MalformedComponent {
            line: line.to_string(),
            sample: sample.to_string(),
        });
    }

    let (raw_value, kind) = (components[0], components[1]);
    let mut value = match raw_value.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            return on_error(ParseError::InvalidValue {
                line: line.to_string(),
                value: raw_value.to_string(),
            })
        }
    };
    let relative = raw_value.starts_with('+') || raw_value.starts_with('-');

    let is_timer = matches!(kind, "ms" | "h" | "d");
    let mut multiplier = 1;
    let mut labels = Labels::new();
    for component in &components[2..] {
        if let Some(rate) = component.strip_prefix('@') {
            if kind != "c" && !is_timer {
                on_error(ParseError::IllegalSampleRate {
                    line: line.to_string(),
                    kind: kind.to_string(),
                });
                continue;
            }

            let rate = match rate.parse::<f64>() {
                Ok(rate) if rate > 0.0 && rate.is_finite() => rate,
                Ok(rate) if rate == 0.0 => 1.0,
                _ => {
                    on_error(ParseError::InvalidSampleRate {
                        line: line.to_string(),
                        rate: rate.to_string(),
                    });
                    1.0
                }
            };

            if is_timer {
                multiplier = (1.0 / rate).min(MAX_TIMER_MULTIPLIER).max(1.0) as usize;
            } else {
                value /= rate;
            }
        } else if let Some(tags) = component.strip_prefix('#') {
            parse_tags(line, tags, &mut labels, on_error);
        } else {
            on_error(ParseError::UnknownComponent {
                line: line.to_string(),
                component: component.to_string(),
            });
        }
    }

    let event = match kind {
        "c" => Event::Counter { name: name.to_string(), value, labels },
        "g" => Event::Gauge { name: name.to_string(), value, relative, labels },
        "ms" | "h" | "d" => Event::Timer { name: name.to_string(), value, labels },
        "s" => {
            return on_error(ParseError::UnsupportedType {
                line: line.to_string(),
                kind: kind.to_string(),
            })
        }
        _ => {
            return on_error(ParseError::UnknownType {
                line: line.to_string(),
                kind: kind.to_string(),
            })
        }
    };

    events.extend(std::iter::repeat(event).take(multiplier));
}

fn parse_tags<F>(line: &str, tags: &str, labels: &mut Labels, on_error: &mut F)
where
    F: FnMut(ParseError),
{
    for tag in tags.split(',') {
        let tag = tag.strip_prefix('#').unwrap_or(tag);
        match tag.split_once(':') {
            Some((key, value)) if !key.is_empty() && !value.is_empty() => {
                // Later occurrences of a key win.
                labels.insert(sanitize_label_key(key), value.to_string());
            }
            _ => on_error(ParseError::MalformedTag { line: line.to_string(), tag: tag.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_packet, parse_packet_with, ParseError};
    use crate::event::{Event, Labels};

    fn labels(pairs: &[(&str, &str)]) -> Labels {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn parse_collecting_errors(packet: &[u8]) -> (Vec<Event>, Vec<ParseError>) {
        let mut errors = Vec::new();
        let events = parse_packet_with(packet, |e| errors.push(e));
        (events, errors)
    }

    #[test]
    fn test_simple_types() {
        let events = parse_packet(b"foo:2|c\nbar:3.5|g\nbaz:300|ms");
        assert_eq!(
            events,
            vec![
                Event::Counter { name: "foo".into(), value: 2.0, labels: Labels::new() },
                Event::Gauge {
                    name: "bar".into(),
                    value: 3.5,
                    relative: false,
                    labels: Labels::new()
                },
                Event::Timer { name: "baz".into(), value: 300.0, labels: Labels::new() },
            ]
        );
    }

    #[test]
    fn test_relative_gauges() {
        let events = parse_packet(b"g:+5|g\ng:-3|g");
        assert_eq!(
            events,
            vec![
                Event::Gauge { name: "g".into(), value: 5.0, relative: true, labels: Labels::new() },
                Event::Gauge {
                    name: "g".into(),
                    value: -3.0,
                    relative: true,
                    labels: Labels::new()
                },
            ]
        );
    }

    #[test]
    fn test_counter_sample_rate() {
        let events = parse_packet(b"foo:1|c|@0.1");
        assert_eq!(events.len(), 1);
        assert!((events[0].value() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_sample_rate_is_ignored() {
        let events = parse_packet(b"foo:1|c|@0");
        assert_eq!(events[0].value(), 1.0);
    }

    #[test]
    fn test_timer_sample_rate_multiplies_observations() {
        let events = parse_packet(b"t:20|ms|@0.25");
        assert_eq!(events.len(), 4);
        assert!(events.iter().all(|e| e.value() == 20.0));
    }

    #[test]
    fn test_gauge_sample_rate_is_not_applied() {
        let (events, errors) = parse_collecting_errors(b"g:10|g|@0.1");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].value(), 10.0);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ParseError::IllegalSampleRate { .. }));
        assert!(!errors[0].discards_sample());
    }

    #[test]
    fn test_invalid_sample_rate_falls_back_to_one() {
        let (events, errors) = parse_collecting_errors(b"foo:3|c|@abc");
        assert_eq!(events[0].value(), 3.0);
        assert!(matches!(errors[0], ParseError::InvalidSampleRate { .. }));
    }

    #[test]
    fn test_tags() {
        let events = parse_packet(b"foo:1|c|#env:prod,host.name:web-1,#region:eu:west");
        assert_eq!(
            events[0].labels(),
            &labels(&[("env", "prod"), ("host_name", "web-1"), ("region", "eu:west")])
        );
    }

    #[test]
    fn test_tags_and_sample_rate_in_any_order() {
        let a = parse_packet(b"foo:1|c|@0.5|#env:prod");
        let b = parse_packet(b"foo:1|c|#env:prod|@0.5");
        assert_eq!(a, b);
        assert_eq!(a[0].value(), 2.0);
    }

    #[test]
    fn test_duplicate_tag_keeps_last() {
        let events = parse_packet(b"foo:1|c|#env:dev,env:prod");
        assert_eq!(events[0].labels(), &labels(&[("env", "prod")]));
    }

    #[test]
    fn test_malformed_tag_is_skipped() {
        let (events, errors) = parse_collecting_errors(b"foo:1|c|#novalue,empty:,ok:yes");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].labels(), &labels(&[("ok", "yes")]));
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| !e.discards_sample()));
    }

    #[test]
    fn test_multi_value_lines() {
        let events = parse_packet(b"foo:1|c:2|c:3|ms");
        assert_eq!(events.len(), 3);
        assert_eq!(events[2], Event::Timer { name: "foo".into(), value: 3.0, labels: Labels::new() });
    }

    #[test]
    fn test_invalid_utf8_only_drops_its_line() {
        let (events, errors) =
            parse_collecting_errors(b"bar:200|c|#tag:value\nbar:200|c|#tag:\xc3\x28invalid");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].labels(), &labels(&[("tag", "value")]));
        assert_eq!(errors, vec![ParseError::InvalidUtf8]);
    }

    #[test]
    fn test_malformed_lines_are_dropped_individually() {
        let packet = b"good:1|c\nnocolon\n:1|c\nbad:abc|c\nbad:1\nbad:1|c|\nbad:1|x\nset:1|s\nok:2|g\n";
        let (events, errors) = parse_collecting_errors(packet);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name(), "good");
        assert_eq!(events[1].name(), "ok");

        let reasons = errors.iter().map(ParseError::reason).collect::<Vec<_>>();
        assert_eq!(
            reasons,
            vec![
                "malformed_line",
                "malformed_line",
                "malformed_value",
                "malformed_component",
                "malformed_component",
                "illegal_event",
                "unsupported_type",
            ]
        );
        assert!(errors.iter().all(ParseError::discards_sample));
        assert!(reasons.iter().all(|reason| ParseError::REASONS.contains(reason)));
    }

    #[test]
    fn test_negative_counter_is_parsed() {
        // Rejecting negative counters is a consolidation concern, not a wire-format one.
        let events = parse_packet(b"foo:-1|c");
        assert_eq!(events[0].value(), -1.0);
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let events = parse_packet(b"foo:1|c\r\n\n\nbar:2|c\r\n");
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].name(), "bar");
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let (events, errors) = parse_collecting_errors(b"foo:NaN|g\nbar:inf|c");
        assert!(events.is_empty());
        assert_eq!(errors.len(), 2);
    }
}
