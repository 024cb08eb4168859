use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{parse_and_send, ChannelClosed, PacketHandler};
use crate::event::Events;
use crate::telemetry::Telemetry;

// Largest possible UDP payload.
const RECV_BUFFER_SIZE: usize = 65535;

/// Receives StatsD datagrams, each holding one or more newline-delimited statements.
#[derive(Clone)]
pub struct UdpListener {
    telemetry: Arc<Telemetry>,
}

impl UdpListener {
    /// Creates a new `UdpListener`.
    pub fn new(telemetry: Arc<Telemetry>) -> UdpListener {
        UdpListener { telemetry }
    }

    /// Reads datagrams from `socket` until it fails or the event channel is closed.
    pub async fn serve(&self, socket: UdpSocket, events: mpsc::Sender<Events>) {
        info!(local_address = ?socket.local_addr().ok(), "Listening for StatsD over UDP.");

        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        loop {
            let len = match socket.recv(&mut buf).await {
                Ok(len) => len,
                Err(e) => {
                    warn!(error = %e, "Error reading UDP socket. Stopping listener.");
                    return;
                }
            };

            if self.handle_packet(&buf[..len], &events).await.is_err() {
                debug!("Event channel closed. Stopping UDP listener.");
                return;
            }
        }
    }
}

impl PacketHandler for UdpListener {
    async fn handle_packet(
        &self,
        packet: &[u8],
        events: &mpsc::Sender<Events>,
    ) -> Result<(), ChannelClosed> {
        self.telemetry.increment_udp_packets();
        parse_and_send(packet, events, &self.telemetry).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::mpsc;

    use super::UdpListener;
    use crate::event::Event;
    use crate::listener::{ChannelClosed, PacketHandler};
    use crate::telemetry::Telemetry;

    #[tokio::test]
    async fn test_packet_becomes_one_batch() {
        let telemetry = Arc::new(Telemetry::new());
        let listener = UdpListener::new(telemetry.clone());
        let (tx, mut rx) = mpsc::channel(4);

        listener.handle_packet(b"a:1|c\nbogus\nb:2|g", &tx).await.unwrap();
        let batch = rx.try_recv().unwrap();
        assert_eq!(batch.len(), 2);
        assert!(matches!(batch[0], Event::Counter { .. }));
        assert!(matches!(batch[1], Event::Gauge { .. }));
        assert_eq!(telemetry.sample_errors("malformed_line"), 1);

        // Nothing valid means nothing sent.
        listener.handle_packet(b"bogus", &tx).await.unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_channel() {
        let listener = UdpListener::new(Arc::new(Telemetry::new()));
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        assert_eq!(listener.handle_packet(b"a:1|c", &tx).await, Err(ChannelClosed));
    }
}
