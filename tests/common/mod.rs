//! Shared fixtures: an answering UDP agent on the loopback interface.

use snmpc::Value;
use snmpc::oid::Oid;
use snmpc::transport::mock::MockAgent;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

/// Spawn a stub agent on 127.0.0.1 answering from the given objects.
///
/// Returns the bound address and the serving task.
pub async fn spawn_udp_agent(
    objects: impl IntoIterator<Item = (Oid, Value)>,
) -> (SocketAddr, JoinHandle<()>) {
    let mut agent = MockAgent::new(objects);
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();

    let task = tokio::spawn(async move {
        let mut buf = vec![0u8; 65535];
        loop {
            let Ok((len, peer)) = socket.recv_from(&mut buf).await else {
                break;
            };
            if let Some(response) = agent.respond(&buf[..len]) {
                let _ = socket.send_to(&response, peer).await;
            }
        }
    });

    (addr, task)
}
