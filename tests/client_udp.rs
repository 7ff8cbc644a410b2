//! End-to-end client tests over loopback UDP.

mod common;

use bytes::Bytes;
use common::spawn_udp_agent;
use snmpc::client::walk::{Walk, WalkOptions};
use snmpc::client::{Session, SessionConfig};
use snmpc::transport::AgentSpec;
use snmpc::{Error, Value, oid};
use std::time::Duration;

async fn connect(addr: std::net::SocketAddr, config: SessionConfig) -> Session {
    let spec = AgentSpec::parse(&format!("udp:{addr}"), 161).unwrap();
    let socket = spec.connect().await.unwrap();
    Session::new(socket, config)
}

fn quick_config() -> SessionConfig {
    SessionConfig {
        timeout: Duration::from_millis(200),
        retries: 1,
        ..Default::default()
    }
}

#[tokio::test]
async fn get_sys_descr() {
    let (addr, task) = spawn_udp_agent([(
        oid!(1, 3, 6, 1, 2, 1, 1, 1, 0),
        Value::OctetString(Bytes::from_static(b"OpenBSD")),
    )])
    .await;

    let mut session = connect(addr, quick_config()).await;
    let pdu = session.get(&[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)]).await.unwrap();

    assert_eq!(pdu.error_status, 0);
    assert_eq!(pdu.varbinds.len(), 1);
    assert_eq!(
        pdu.varbinds[0].value,
        Value::OctetString(Bytes::from_static(b"OpenBSD"))
    );

    task.abort();
}

#[tokio::test]
async fn getnext_advances() {
    let (addr, task) = spawn_udp_agent([
        (oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::Integer(1)),
        (oid!(1, 3, 6, 1, 2, 1, 1, 2, 0), Value::Integer(2)),
    ])
    .await;

    let mut session = connect(addr, quick_config()).await;
    let pdu = session.getnext(&[oid!(1, 3, 6, 1, 2, 1, 1)]).await.unwrap();
    assert_eq!(pdu.varbinds[0].oid, oid!(1, 3, 6, 1, 2, 1, 1, 1, 0));

    task.abort();
}

#[tokio::test]
async fn walk_system_subtree() {
    let (addr, task) = spawn_udp_agent([
        (
            oid!(1, 3, 6, 1, 2, 1, 1, 1, 0),
            Value::OctetString(Bytes::from_static(b"x")),
        ),
        (
            oid!(1, 3, 6, 1, 2, 1, 1, 2, 0),
            Value::OctetString(Bytes::from_static(b"y")),
        ),
        (oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::Integer(42)),
        (oid!(1, 3, 6, 1, 2, 1, 2, 1, 0), Value::Integer(7)),
    ])
    .await;

    let mut session = connect(addr, quick_config()).await;
    let walk = Walk::new(
        &mut session,
        oid!(1, 3, 6, 1, 2, 1, 1),
        WalkOptions::default(),
    );
    let varbinds = walk.collect().await.unwrap();

    assert_eq!(varbinds.len(), 3);
    assert_eq!(varbinds[2].value, Value::Integer(42));
    for pair in varbinds.windows(2) {
        assert!(pair[0].oid < pair[1].oid);
    }

    task.abort();
}

#[tokio::test]
async fn bulkwalk_covers_subtree_in_expected_round_trips() {
    let objects: Vec<_> = (1..=6)
        .map(|i| (oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 1, i), Value::Integer(i as i64)))
        .collect();
    let (addr, task) = spawn_udp_agent(objects).await;

    let mut session = connect(addr, quick_config()).await;
    let walk = Walk::new(
        &mut session,
        oid!(1, 3, 6, 1, 2, 1, 2, 2),
        WalkOptions {
            bulk: true,
            max_repetitions: 3,
            ..Default::default()
        },
    );
    let varbinds = walk.collect().await.unwrap();
    assert_eq!(varbinds.len(), 6);

    task.abort();
}

#[tokio::test]
async fn unreachable_agent_times_out() {
    // A bound socket with no reader never answers
    let dead = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = dead.local_addr().unwrap();

    let config = SessionConfig {
        timeout: Duration::from_millis(50),
        retries: 2,
        ..Default::default()
    };
    let mut session = connect(addr, config).await;

    let started = std::time::Instant::now();
    let err = session.get(&[oid!(1, 3)]).await.unwrap_err();
    assert!(matches!(err, Error::Timeout { retries: 2 }));
    // Three attempts of at least 50ms each
    assert!(started.elapsed() >= Duration::from_millis(150));
}

#[tokio::test]
async fn trap_is_fire_and_forget() {
    let receiver = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = receiver.local_addr().unwrap();

    let spec = AgentSpec::parse(&format!("{addr}"), 162).unwrap();
    let socket = spec.connect().await.unwrap();
    let mut session = Session::new(socket, quick_config());

    session
        .trap_v2(123, &oid!(1, 3, 6, 1, 6, 3, 1, 1, 5, 1), Vec::new())
        .await
        .unwrap();

    let mut buf = vec![0u8; 65535];
    let (len, _) = receiver.recv_from(&mut buf).await.unwrap();
    let message = snmpc::Message::decode(Bytes::copy_from_slice(&buf[..len])).unwrap();

    assert_eq!(message.pdu.pdu_type, snmpc::PduType::TrapV2);
    assert_eq!(message.pdu.varbinds.len(), 2);
    assert_eq!(message.pdu.varbinds[0].oid, oid!(1, 3, 6, 1, 2, 1, 1, 3, 0));
    assert_eq!(message.pdu.varbinds[0].value, Value::TimeTicks(123));
    assert_eq!(
        message.pdu.varbinds[1].value,
        Value::ObjectIdentifier(oid!(1, 3, 6, 1, 6, 3, 1, 1, 5, 1))
    );
}
