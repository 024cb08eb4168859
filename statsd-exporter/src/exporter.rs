use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, error};

use crate::collection::Collection;
use crate::event::Events;
use crate::mapper::Mapper;
use crate::registry::{ApplyError, Registry};
use crate::telemetry::Telemetry;

/// The consolidation loop.
///
/// An `Exporter` is the single consumer of the event channel and the only writer of its
/// [`Registry`].  Stale entries are evicted on the same loop, between event batches, so the
/// registry never needs to be locked.
///
/// Created by [`ExporterBuilder`](crate::ExporterBuilder).
pub struct Exporter {
    registry: Registry,
    mapper: Arc<dyn Mapper>,
    cleanup_interval: Option<Duration>,
    channel_capacity: usize,
    collection: Collection,
    telemetry: Arc<Telemetry>,
}

impl Exporter {
    pub(crate) fn new(
        registry: Registry,
        mapper: Arc<dyn Mapper>,
        cleanup_interval: Option<Duration>,
        channel_capacity: usize,
        collection: Collection,
        telemetry: Arc<Telemetry>,
    ) -> Exporter {
        Exporter { registry, mapper, cleanup_interval, channel_capacity, collection, telemetry }
    }

    /// Creates a bounded event channel with the configured capacity.
    ///
    /// Senders are handed to listeners, and the receiver to [`Exporter::listen`].
    pub fn channel(&self) -> (mpsc::Sender<Events>, mpsc::Receiver<Events>) {
        mpsc::channel(self.channel_capacity)
    }

    /// Gets a handle to the collection rendered by scrapes.
    pub fn collection(&self) -> Collection {
        self.collection.clone()
    }

    /// Gets the exporter's internal telemetry.
    pub fn telemetry(&self) -> Arc<Telemetry> {
        self.telemetry.clone()
    }

    /// Gets the consolidated state.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Consumes event batches until the channel is closed.
    ///
    /// The channel only reports being closed once every sender is gone and every buffered batch
    /// has been received, so all batches enqueued before shutdown are applied before this
    /// returns.  When metrics cleanup is enabled, stale entries are evicted on every tick.
    pub async fn listen(&mut self, mut events: mpsc::Receiver<Events>) {
        let mut ticker = self.cleanup_interval.map(|period| {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });

        loop {
            tokio::select! {
                batch = events.recv() => match batch {
                    Some(batch) => self.handle_events(batch),
                    None => break,
                },
                now = tick(&mut ticker) => {
                    let evicted = self.registry.remove_stale_metrics(now);
                    if evicted > 0 {
                        debug!(evicted, "Removed stale metrics.");
                    }
                }
            }
        }

        debug!("Event channel closed, consolidation loop exiting.");
    }

    /// Applies a batch of events, in order.
    ///
    /// An event that cannot be applied is logged and counted, and never affects the rest of the
    /// batch.
    pub fn handle_events(&mut self, events: Events) {
        for event in events {
            self.telemetry.increment_events(event.kind());

            if let Err(e) = self.registry.apply(&event, self.mapper.as_ref(), Instant::now()) {
                match &e {
                    ApplyError::NegativeCounter { name, value } => {
                        error!(metric_name = %name, value, "Counter cannot be decremented.");
                    }
                    ApplyError::EmptyName { raw } => {
                        debug!(metric_name = %raw, "Discarding event with an empty mapped name.");
                    }
                    ApplyError::TypeConflict { .. } | ApplyError::ReservedName { .. } => {
                        debug!(error = %e, "Discarding event conflicting with registered metrics.");
                    }
                }
                self.telemetry.increment_event_errors(e.reason());
            }
        }
    }

    /// Tears down the consolidated state, unregistering every metric from the collection.
    pub fn shutdown(mut self) {
        self.registry.clear();
    }
}

async fn tick(ticker: &mut Option<Interval>) -> Instant {
    match ticker {
        Some(ticker) => ticker.tick().await,
        None => std::future::pending().await,
    }
}
