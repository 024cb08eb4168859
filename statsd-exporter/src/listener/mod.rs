//! Network listeners turning inbound StatsD traffic into event batches.
//!
//! Both listeners implement [`PacketHandler`], so raw bytes can be fed to either without a socket.
use std::future::Future;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

use crate::event::Events;
use crate::parser::parse_packet_with;
use crate::telemetry::Telemetry;

mod tcp;
mod udp;

pub use self::tcp::{TcpListener, MAX_LINE_LENGTH};
pub use self::udp::UdpListener;

/// The consolidation loop is gone, and no more events can be delivered.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("event channel closed")]
pub struct ChannelClosed;

/// Turns inbound bytes into events and enqueues them.
pub trait PacketHandler {
    /// Parses `packet` and sends the resulting events, if any, as a single batch.
    ///
    /// Waits for room in the channel when it is full.
    ///
    /// # Errors
    ///
    /// If the receiving side of `events` has been dropped, [`ChannelClosed`] is returned.
    fn handle_packet(
        &self,
        packet: &[u8],
        events: &mpsc::Sender<Events>,
    ) -> impl Future<Output = Result<(), ChannelClosed>> + Send;
}

async fn parse_and_send(
    packet: &[u8],
    events: &mpsc::Sender<Events>,
    telemetry: &Telemetry,
) -> Result<(), ChannelClosed> {
    let batch = parse_packet_with(packet, |error| {
        telemetry.increment_sample_errors(error.reason());
        debug!(%error, "Discarding malformed StatsD input.");
    });
    if batch.is_empty() {
        return Ok(());
    }

    events.send(batch).await.map_err(|_| ChannelClosed)
}
