//! Bridges StatsD metrics into the Prometheus exposition format.
//!
//! Applications push counters, gauges and timers using the StatsD line protocol (with the
//! DogStatsD tag extension) over UDP or TCP.  This crate decodes that traffic, consolidates it
//! into long-lived metrics, and renders them for a Prometheus scrape.
//!
//! # Architecture
//!
//! - [`UdpListener`] and [`TcpListener`] read inbound traffic, decode it with the
//!   [`parser`], and push batches of [`Event`]s onto a bounded channel.
//! - A single [`Exporter`] consumes that channel.  For every event it consults the configured
//!   [`Mapper`], sanitizes the resulting name, and applies the event to its [`Registry`].  Stale
//!   metrics are evicted on the same loop.
//! - Every metric the registry creates is also registered with a [`Collection`], which is what a
//!   scrape renders.
//!
//! # Usage
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use statsd_exporter::{ExporterBuilder, UdpListener};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut exporter = ExporterBuilder::new()
//!     .with_metrics_cleanup(Duration::from_secs(60))
//!     .with_default_ttl(Duration::from_secs(300))
//!     .build()?;
//! let (tx, rx) = exporter.channel();
//!
//! let socket = tokio::net::UdpSocket::bind("0.0.0.0:9125").await?;
//! let listener = UdpListener::new(exporter.telemetry());
//! tokio::spawn(async move { listener.serve(socket, tx).await });
//!
//! exporter.listen(rx).await;
//! # Ok(())
//! # }
//! ```
//!
//! # Metric names
//!
//! Names are sanitized to `[a-zA-Z0-9_:]`, with every other character replaced by an underscore,
//! and an underscore prepended to names starting with a digit.  Timers are received in
//! milliseconds and exposed in seconds.
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
pub use self::builder::{BuildError, ExporterBuilder, DEFAULT_BUCKETS, DEFAULT_QUANTILES};

mod collection;
pub use self::collection::Collection;

mod event;
pub use self::event::{Event, EventKind, Events, Labels};

mod exporter;
pub use self::exporter::Exporter;

pub mod formatting;

mod hash;
pub use self::hash::{hash_name_and_labels, MetricKey};

#[cfg(feature = "http-listener")]
#[cfg_attr(docsrs, doc(cfg(feature = "http-listener")))]
mod http_listener;
#[cfg(feature = "http-listener")]
pub use self::http_listener::{new_http_listener, ExporterFuture};

mod listener;
pub use self::listener::{ChannelClosed, PacketHandler, TcpListener, UdpListener, MAX_LINE_LENGTH};

mod mapper;
pub use self::mapper::{Mapper, MappingRule, Matcher, MatcherMapper, MetricMapping, NoopMapper, TimerType};

pub mod metric;

pub mod parser;
pub use self::parser::ParseError;

mod registry;
pub use self::registry::{ApplyError, Registry, RegistryEntry, DEFAULT_HELP};

mod telemetry;
pub use self::telemetry::Telemetry;
