// tests/udp_e2e.rs
//! Full round trip over a real UDP socket pair: discover, reserve, redeem.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::UdpSocket;

use ticketd::catalog::Catalog;
use ticketd::metrics::Metrics;
use ticketd::server::{self, TicketServer};

async fn exchange(client: &UdpSocket, req: &[u8], buf: &mut [u8]) -> usize {
    client.send(req).await.unwrap();
    tokio::time::timeout(Duration::from_secs(5), client.recv(buf))
        .await
        .expect("server did not reply in time")
        .unwrap()
}

#[tokio::test]
async fn reserve_and_redeem_over_udp() {
    let catalog = Catalog::from_entries([("Concert".to_string(), 10)]).unwrap();
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();

    let srv = TicketServer::new(catalog, 60, Arc::new(Metrics::new()));
    tokio::spawn(async move {
        let _ = server::run(socket, srv).await;
    });

    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    client.connect(addr).await.unwrap();
    let mut buf = [0u8; 65_507];

    // discover
    let n = exchange(&client, &[1], &mut buf).await;
    assert_eq!(&buf[..n], &[2, 0, 0, 0, 0, 0, 10, 7, b'C', b'o', b'n', b'c', b'e', b'r', b't']);

    // reserve 3 tickets for event 0
    let n = exchange(&client, &[3, 0, 0, 0, 0, 0, 3], &mut buf).await;
    assert_eq!(n, 67);
    assert_eq!(buf[0], 4);
    let id_bytes: [u8; 4] = buf[1..5].try_into().unwrap();
    assert_eq!(u32::from_be_bytes(id_bytes), 1_000_000);
    let cookie: [u8; 48] = buf[11..59].try_into().unwrap();

    // malformed datagrams draw no reply; the next valid request still works
    client.send(&[3, 0, 0]).await.unwrap();
    client.send(&[9, 9, 9]).await.unwrap();

    // redeem
    let mut req = vec![5u8];
    req.extend_from_slice(&id_bytes);
    req.extend_from_slice(&cookie);
    let n = exchange(&client, &req, &mut buf).await;
    assert_eq!(buf[0], 6);
    assert_eq!(n, 7 + 3 * 7);
    assert_eq!(&buf[7..n], b"000000000000010000002");
}
