// src/main.rs
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::UdpSocket;
use tracing::info;

use ticketd::catalog::Catalog;
use ticketd::metrics::Metrics;
use ticketd::server::{self, TicketServer};

#[derive(Parser, Debug)]
#[command(name = "ticketd", version)]
struct Cli {
    /// Catalog file: alternating lines of event description and initial
    /// ticket count.
    #[arg(long, short = 'f')]
    catalog: PathBuf,

    /// UDP port to bind on all interfaces.
    #[arg(long, short = 'p', default_value_t = 2022)]
    port: u16,

    /// Reservation validity in seconds.
    #[arg(long, short = 't', default_value_t = 5,
          value_parser = clap::value_parser!(u64).range(1..=86_400))]
    timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let cli = Cli::parse();

    let catalog = Catalog::load(&cli.catalog)
        .with_context(|| format!("load catalog {}", cli.catalog.display()))?;

    let socket = UdpSocket::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, cli.port)))
        .await
        .with_context(|| format!("bind udp port {}", cli.port))?;

    info!(
        "listening on {} with {} events, timeout={}s",
        socket.local_addr().context("socket local addr")?,
        catalog.len(),
        cli.timeout
    );

    let server = TicketServer::new(catalog, cli.timeout, Arc::new(Metrics::new()));
    server::run(socket, server).await
}
