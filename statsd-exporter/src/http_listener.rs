use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;

use http_body_util::Full;
use hyper::{
    body::{Bytes, Incoming},
    server::conn::http1::Builder as HyperHttpBuilder,
    service::service_fn,
    Request, Response,
};
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

use crate::builder::BuildError;
use crate::collection::Collection;

/// Convenience type for the future driving the scrape endpoint.
pub type ExporterFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

struct HttpListeningExporter {
    collection: Collection,
}

impl HttpListeningExporter {
    async fn serve(self, listener: std::net::TcpListener) {
        let listener = match TcpListener::from_std(listener) {
            Ok(listener) => listener,
            Err(e) => {
                warn!(error = %e, "Error registering HTTP listener with the runtime.");
                return;
            }
        };
        info!(local_address = ?listener.local_addr().ok(), "Serving metrics over HTTP.");

        loop {
            let stream = match listener.accept().await {
                Ok((stream, _)) => stream,
                Err(e) => {
                    warn!("Error accepting connection. Ignoring request. Error: {:?}", e);
                    continue;
                }
            };

            self.process_stream(stream);
        }
    }

    fn process_stream(&self, stream: TcpStream) {
        let collection = self.collection.clone();
        let service = service_fn(move |req: Request<Incoming>| {
            let collection = collection.clone();
            async move { Self::handle_http_request(&collection, &req) }
        });

        tokio::spawn(async move {
            if let Err(err) =
                HyperHttpBuilder::new().serve_connection(TokioIo::new(stream), service).await
            {
                warn!("Error serving connection.  Error: {:?}", err);
            };
        });
    }

    fn handle_http_request(
        collection: &Collection,
        req: &Request<Incoming>,
    ) -> Result<Response<Full<Bytes>>, hyper::Error> {
        Ok(Response::new(match req.uri().path() {
            "/health" => "OK".into(),
            _ => collection.render().into(),
        }))
    }
}

/// Creates an [`ExporterFuture`] serving the given collection in the Prometheus text exposition
/// format.
///
/// `/health` answers `OK`; every other path renders the collection.
///
/// # Errors
///
/// Will return Err if it cannot bind to the listen address.
pub fn new_http_listener(
    collection: Collection,
    listen_address: SocketAddr,
) -> Result<ExporterFuture, BuildError> {
    let listener = std::net::TcpListener::bind(listen_address)
        .and_then(|listener| {
            listener.set_nonblocking(true)?;
            Ok(listener)
        })
        .map_err(|e| BuildError::FailedToCreateHTTPListener(e.to_string()))?;

    let exporter = HttpListeningExporter { collection };

    Ok(Box::pin(exporter.serve(listener)))
}
