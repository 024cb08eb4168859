use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::net;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::{parse_and_send, ChannelClosed, PacketHandler};
use crate::event::Events;
use crate::telemetry::Telemetry;

/// Longest line accepted over TCP, excluding the newline.  Longer lines close the connection.
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Accepts StatsD connections, each carrying a stream of newline-delimited statements.
#[derive(Clone)]
pub struct TcpListener {
    telemetry: Arc<Telemetry>,
}

impl TcpListener {
    /// Creates a new `TcpListener`.
    pub fn new(telemetry: Arc<Telemetry>) -> TcpListener {
        TcpListener { telemetry }
    }

    /// Accepts connections from `listener` until accepting fails.
    ///
    /// Every connection is handled on its own task, and lives until the peer disconnects or the
    /// event channel is closed.  Connection tasks are owned by this future: dropping or aborting
    /// it closes every connection it accepted.
    pub async fn serve(&self, listener: net::TcpListener, events: mpsc::Sender<Events>) {
        info!(local_address = ?listener.local_addr().ok(), "Listening for StatsD over TCP.");

        let mut connections = JoinSet::new();
        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            warn!(error = %e, "Error accepting TCP connection. Stopping listener.");
                            return;
                        }
                    };

                    self.telemetry.increment_tcp_connections();
                    let handler = self.clone();
                    let events = events.clone();
                    connections.spawn(async move {
                        handler.handle_connection(stream, peer, events).await;
                    });
                }
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
            }
        }
    }

    async fn handle_connection(
        &self,
        stream: net::TcpStream,
        peer: SocketAddr,
        events: mpsc::Sender<Events>,
    ) {
        debug!(%peer, "Accepted StatsD connection.");
        if self.handle_stream(BufReader::new(stream), &events).await.is_err() {
            debug!(%peer, "Event channel closed. Dropping connection.");
            return;
        }
        debug!(%peer, "StatsD connection closed.");
    }

    /// Reads newline-delimited statements from `reader` until it is exhausted, sending one batch
    /// per line.
    ///
    /// A read error, or a line longer than [`MAX_LINE_LENGTH`], ends the stream early.
    ///
    /// # Errors
    ///
    /// If the event channel is closed, [`ChannelClosed`] is returned.
    pub async fn handle_stream<R>(
        &self,
        mut reader: R,
        events: &mpsc::Sender<Events>,
    ) -> Result<(), ChannelClosed>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut line = Vec::new();
        loop {
            line.clear();

            let limit = MAX_LINE_LENGTH as u64 + 1;
            match (&mut reader).take(limit).read_until(b'\n', &mut line).await {
                Ok(0) => return Ok(()),
                Ok(_) => {
                    if line.len() > MAX_LINE_LENGTH && line.last() != Some(&b'\n') {
                        self.telemetry.increment_tcp_too_long_lines();
                        warn!(
                            max_length = MAX_LINE_LENGTH,
                            "Line too long over TCP. Closing connection."
                        );
                        return Ok(());
                    }

                    parse_and_send(&line, events, &self.telemetry).await?;
                }
                Err(e) => {
                    self.telemetry.increment_tcp_connection_errors();
                    warn!(error = %e, "Error reading TCP connection. Closing connection.");
                    return Ok(());
                }
            }
        }
    }
}

impl PacketHandler for TcpListener {
    async fn handle_packet(
        &self,
        packet: &[u8],
        events: &mpsc::Sender<Events>,
    ) -> Result<(), ChannelClosed> {
        self.handle_stream(packet, events).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::mpsc;

    use super::{TcpListener, MAX_LINE_LENGTH};
    use crate::collection::Collection;
    use crate::event::{Event, Labels};
    use crate::listener::PacketHandler;
    use crate::telemetry::Telemetry;

    #[tokio::test]
    async fn test_one_batch_per_line() {
        let listener = TcpListener::new(Arc::new(Telemetry::new()));
        let (tx, mut rx) = mpsc::channel(8);

        listener.handle_packet(b"a:1|c\r\nb:2|c\nc:3|c", &tx).await.unwrap();

        let mut names = Vec::new();
        while let Ok(batch) = rx.try_recv() {
            assert_eq!(batch.len(), 1);
            names.push(batch[0].name().to_string());
        }
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_too_long_line_closes_stream() {
        let telemetry = Arc::new(Telemetry::new());
        let collection = Collection::new();
        telemetry.register(&collection);
        let listener = TcpListener::new(telemetry.clone());
        let (tx, mut rx) = mpsc::channel(8);

        let mut stream = b"before:1|c\n".to_vec();
        stream.extend(std::iter::repeat(b'x').take(MAX_LINE_LENGTH + 10));
        stream.extend_from_slice(b"\nafter:1|c\n");

        listener.handle_stream(stream.as_slice(), &tx).await.unwrap();

        let batch = rx.try_recv().unwrap();
        assert_eq!(
            batch,
            vec![Event::Counter { name: "before".into(), value: 1.0, labels: Labels::new() }]
        );
        assert!(rx.try_recv().is_err());

        let rendered = collection.render();
        assert!(rendered.contains("statsd_exporter_tcp_too_long_lines_total 1\n"));
    }

    #[tokio::test]
    async fn test_line_at_limit_is_accepted() {
        let listener = TcpListener::new(Arc::new(Telemetry::new()));
        let (tx, mut rx) = mpsc::channel(8);

        let prefix = b"n:1|c|#k:";
        let mut stream = prefix.to_vec();
        stream.extend(std::iter::repeat(b'v').take(MAX_LINE_LENGTH - prefix.len()));
        stream.push(b'\n');

        listener.handle_stream(stream.as_slice(), &tx).await.unwrap();
        assert_eq!(rx.try_recv().unwrap().len(), 1);
    }
}
