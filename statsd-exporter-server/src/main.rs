use std::env;
use std::error::Error;
use std::net::SocketAddr;
use std::process;
use std::time::Duration;

use getopts::{Matches, Options};
use statsd_exporter::{new_http_listener, ExporterBuilder, TcpListener, TimerType, UdpListener};
use tokio::net;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

struct Config {
    listen_udp: Option<SocketAddr>,
    listen_tcp: Option<SocketAddr>,
    web_listen_address: SocketAddr,
    cleanup_interval: Option<Duration>,
    default_ttl: Option<Duration>,
    timer_type: TimerType,
    channel_capacity: usize,
}

fn print_usage(program: &str, opts: &Options) {
    let brief = format!("Usage: {} [options]", program);
    print!("{}", opts.usage(&brief));
}

fn opts() -> Options {
    let mut opts = Options::new();

    opts.optopt(
        "",
        "statsd.listen-udp",
        "address on which to receive StatsD over UDP, empty to disable (default :9125)",
        "ADDRESS",
    );
    opts.optopt(
        "",
        "statsd.listen-tcp",
        "address on which to receive StatsD over TCP, empty to disable (default :9125)",
        "ADDRESS",
    );
    opts.optopt(
        "",
        "web.listen-address",
        "address on which to expose metrics (default :9102)",
        "ADDRESS",
    );
    opts.optopt(
        "",
        "metrics.cleanup-interval",
        "how often to remove stale metrics, 0 to disable (default 0)",
        "DURATION",
    );
    opts.optopt(
        "",
        "metrics.default-ttl",
        "time-to-live of metrics without a mapping-specific one, 0 for none (default 0)",
        "DURATION",
    );
    opts.optopt(
        "",
        "statsd.timer-type",
        "how timers are exposed: histogram or summary (default histogram)",
        "TYPE",
    );
    opts.optopt(
        "",
        "statsd.channel-capacity",
        "number of event batches buffered ahead of consolidation (default 1024)",
        "INTEGER",
    );
    opts.optflag("h", "help", "print this help menu");

    opts
}

fn parse_address(value: &str) -> Result<Option<SocketAddr>, String> {
    if value.is_empty() {
        return Ok(None);
    }

    // Accept the bare `:port` form, binding every interface.
    let value =
        if value.starts_with(':') { format!("0.0.0.0{}", value) } else { value.to_string() };
    value.parse().map(Some).map_err(|e| format!("invalid address {:?}: {}", value, e))
}

fn parse_duration(value: &str) -> Result<Option<Duration>, String> {
    let duration = humantime::parse_duration(value)
        .map_err(|e| format!("invalid duration {:?}: {}", value, e))?;
    Ok(if duration.is_zero() { None } else { Some(duration) })
}

fn parse_config(matches: &Matches) -> Result<Config, String> {
    let opt = |name: &str, default: &str| matches.opt_str(name).unwrap_or_else(|| default.to_owned());

    let web_listen_address = parse_address(&opt("web.listen-address", ":9102"))?
        .ok_or_else(|| "web listen address cannot be empty".to_string())?;
    let timer_type = match opt("statsd.timer-type", "histogram").as_str() {
        "histogram" => TimerType::Histogram,
        "summary" => TimerType::Summary,
        other => return Err(format!("invalid timer type {:?}", other)),
    };
    let channel_capacity = opt("statsd.channel-capacity", "1024")
        .parse()
        .map_err(|e| format!("invalid channel capacity: {}", e))?;

    Ok(Config {
        listen_udp: parse_address(&opt("statsd.listen-udp", ":9125"))?,
        listen_tcp: parse_address(&opt("statsd.listen-tcp", ":9125"))?,
        web_listen_address,
        cleanup_interval: parse_duration(&opt("metrics.cleanup-interval", "0"))?,
        default_ttl: parse_duration(&opt("metrics.default-ttl", "0"))?,
        timer_type,
        channel_capacity,
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Unable to listen for shutdown signal.");
        std::future::pending::<()>().await;
    }
}

async fn run(config: Config) -> Result<(), Box<dyn Error>> {
    let mut builder = ExporterBuilder::new()
        .with_timer_type(config.timer_type)
        .with_channel_capacity(config.channel_capacity);
    if let Some(interval) = config.cleanup_interval {
        builder = builder.with_metrics_cleanup(interval);
    }
    if let Some(ttl) = config.default_ttl {
        builder = builder.with_default_ttl(ttl);
    }

    let mut exporter = builder.build()?;
    let (tx, rx) = exporter.channel();

    let mut producers = Vec::new();
    if let Some(address) = config.listen_udp {
        let socket = net::UdpSocket::bind(address).await?;
        let listener = UdpListener::new(exporter.telemetry());
        let tx = tx.clone();
        producers.push(tokio::spawn(async move { listener.serve(socket, tx).await }));
    }
    if let Some(address) = config.listen_tcp {
        let socket = net::TcpListener::bind(address).await?;
        let listener = TcpListener::new(exporter.telemetry());
        let tx = tx.clone();
        producers.push(tokio::spawn(async move { listener.serve(socket, tx).await }));
    }
    drop(tx);

    if producers.is_empty() {
        return Err("no StatsD listener configured".into());
    }

    let http = tokio::spawn(new_http_listener(exporter.collection(), config.web_listen_address)?);

    {
        let listen = exporter.listen(rx);
        tokio::pin!(listen);

        tokio::select! {
            () = &mut listen => warn!("All StatsD listeners stopped."),
            () = shutdown_signal() => {
                info!("Shutting down. Applying buffered events.");
                // Stopping the producers drops their senders, which lets the loop drain and exit.
                for producer in &producers {
                    producer.abort();
                }
                listen.await;
            }
        }
    }

    http.abort();
    exporter.shutdown();
    info!("Shutdown complete.");
    Ok(())
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    let program = &args[0];
    let opts = opts();

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(f) => {
            eprintln!("Failed to parse command line args: {}", f);
            print_usage(program, &opts);
            process::exit(2);
        }
    };

    if matches.opt_present("help") {
        print_usage(program, &opts);
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match parse_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(2);
        }
    };

    if let Err(e) = run(config).await {
        error!(error = %e, "StatsD exporter failed.");
        process::exit(1);
    }
}
