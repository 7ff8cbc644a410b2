//! Agent session and the operation layer.
//!
//! A [`Session`] owns one connected socket and serializes requests over it:
//! fresh request-id per request, retransmission on timeout, and strict
//! matching of responses by request-id, version and community. Mismatched
//! frames are discarded and the wait continues until the attempt deadline.

mod typed;
pub mod walk;

pub use typed::parse_typed_value;
pub use walk::{Walk, WalkOptions};

use crate::error::{Error, Result};
use crate::message::Message;
use crate::oid::Oid;
use crate::pdu::{Pdu, PduType};
use crate::transport::SnmpSocket;
use crate::value::Value;
use crate::varbind::VarBind;
use crate::version::Version;
use bytes::Bytes;
use std::time::Duration;
use tokio::time::Instant;

/// Session parameters.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub version: Version,
    pub community: Bytes,
    /// Per-attempt receive window.
    pub timeout: Duration,
    /// Retransmissions after the first attempt.
    pub retries: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            version: Version::V2c,
            community: Bytes::from_static(b"public"),
            timeout: Duration::from_secs(1),
            retries: 5,
        }
    }
}

/// One agent, one socket, one request in flight.
pub struct Session {
    socket: SnmpSocket,
    config: SessionConfig,
    next_request_id: i32,
}

impl Session {
    /// Create a session over a connected socket.
    pub fn new(socket: SnmpSocket, config: SessionConfig) -> Self {
        Self {
            socket,
            config,
            next_request_id: 1,
        }
    }

    /// The session's SNMP version.
    pub fn version(&self) -> Version {
        self.config.version
    }

    /// Allocate a fresh request-id: monotonically increasing, wrapping past
    /// `i32::MAX` back to 1.
    fn take_request_id(&mut self) -> i32 {
        let id = self.next_request_id;
        self.next_request_id = if id == i32::MAX { 1 } else { id + 1 };
        id
    }

    /// Send a request PDU and wait for its response.
    ///
    /// The response is returned as-is; callers interpret `error-status`.
    pub async fn request(&mut self, mut pdu: Pdu) -> Result<Pdu> {
        let request_id = self.take_request_id();
        pdu.request_id = request_id;

        let data = Message::new(
            self.config.version,
            self.config.community.clone(),
            pdu,
        )
        .encode();

        // Streams guarantee delivery: one attempt, full time budget.
        let (attempts, window) = if self.socket.is_stream() {
            (
                1u32,
                self.config.timeout * (self.config.retries + 1),
            )
        } else {
            (self.config.retries + 1, self.config.timeout)
        };

        for attempt in 0..attempts {
            if attempt > 0 {
                tracing::debug!(target: "snmpc::client", request_id, attempt, "retransmitting");
            }
            self.socket.send(&data).await?;

            let deadline = Instant::now() + window;
            loop {
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                let frame = match tokio::time::timeout_at(deadline, self.socket.recv()).await {
                    Err(_) => break,
                    Ok(Err(e)) => return Err(e),
                    Ok(Ok(frame)) => frame,
                };

                let message = Message::decode(frame)?;
                if message.pdu.request_id != request_id
                    || message.version != self.config.version
                    || message.community != self.config.community
                {
                    tracing::debug!(
                        target: "snmpc::client",
                        expected = request_id,
                        got = message.pdu.request_id,
                        "discarding unmatched response"
                    );
                    continue;
                }
                if message.pdu.pdu_type != PduType::Response {
                    tracing::debug!(
                        target: "snmpc::client",
                        pdu_type = %message.pdu.pdu_type,
                        "discarding non-response PDU"
                    );
                    continue;
                }
                return Ok(message.pdu);
            }
        }

        Err(Error::Timeout {
            retries: self.config.retries,
        })
    }

    /// GET the given OIDs.
    pub async fn get(&mut self, oids: &[Oid]) -> Result<Pdu> {
        self.request(Pdu::get_request(0, oids)).await
    }

    /// GETNEXT the given OIDs.
    pub async fn getnext(&mut self, oids: &[Oid]) -> Result<Pdu> {
        self.request(Pdu::get_next_request(0, oids)).await
    }

    /// GETBULK the given OIDs. v2c only.
    pub async fn getbulk(
        &mut self,
        oids: &[Oid],
        non_repeaters: i32,
        max_repetitions: i32,
    ) -> Result<Pdu> {
        if self.config.version == Version::V1 {
            return Err(Error::Version);
        }
        self.request(Pdu::get_bulk_request(
            0,
            oids,
            non_repeaters,
            max_repetitions,
        ))
        .await
    }

    /// Send an SNMPv2-Trap without awaiting a reply.
    ///
    /// Prepends `sysUpTime.0` and `snmpTrapOID.0` to the supplied varbinds
    /// (RFC 3416 Section 4.2.6).
    pub async fn trap_v2(
        &mut self,
        uptime_hundredths: u32,
        trap_oid: &Oid,
        varbinds: Vec<VarBind>,
    ) -> Result<()> {
        if self.config.version == Version::V1 {
            return Err(Error::Version);
        }

        let sys_uptime = Oid::from_slice(&[1, 3, 6, 1, 2, 1, 1, 3, 0]);
        let snmp_trap_oid = Oid::from_slice(&[1, 3, 6, 1, 6, 3, 1, 1, 4, 1, 0]);

        let mut all = Vec::with_capacity(varbinds.len() + 2);
        all.push(VarBind::new(sys_uptime, Value::TimeTicks(uptime_hundredths)));
        all.push(VarBind::new(
            snmp_trap_oid,
            Value::ObjectIdentifier(trap_oid.clone()),
        ));
        all.extend(varbinds);

        let request_id = self.take_request_id();
        let message = Message::new(
            self.config.version,
            self.config.community.clone(),
            Pdu::trap_v2(request_id, all),
        );
        self.socket.send(&message.encode()).await
    }
}

/// Map a non-zero `error-status` to [`Error::Snmp`], choosing the OID
/// context by `error-index` and falling back to `fallback` when the index
/// is out of range.
pub fn check_error_status(pdu: &Pdu, fallback: &str) -> Result<()> {
    if !pdu.is_error() {
        return Ok(());
    }
    let oid = pdu
        .error_oid()
        .map(|oid| oid.to_string())
        .unwrap_or_else(|| fallback.to_string());
    Err(Error::Snmp {
        status: pdu.error_status_enum(),
        oid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use crate::transport::mock::{MockAgent, MockTransport};

    fn session_over(transport: MockTransport, config: SessionConfig) -> Session {
        Session::new(SnmpSocket::Mock(transport), config)
    }

    fn quick_config() -> SessionConfig {
        SessionConfig {
            timeout: Duration::from_millis(20),
            retries: 1,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn get_matches_request_id() {
        let agent = MockAgent::new([(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::Integer(7))]);
        let mut session = session_over(agent.into_transport(), quick_config());

        let first = session.get(&[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)]).await.unwrap();
        assert_eq!(first.request_id, 1);
        assert_eq!(first.varbinds[0].value, Value::Integer(7));

        let second = session.get(&[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)]).await.unwrap();
        assert_eq!(second.request_id, 2);
    }

    #[tokio::test]
    async fn silent_agent_times_out_after_retries() {
        let mut session = session_over(MockTransport::silent(), quick_config());

        let start = std::time::Instant::now();
        let err = session.get(&[oid!(1, 3)]).await.unwrap_err();
        assert!(matches!(err, Error::Timeout { retries: 1 }));
        // Two attempts of ~20ms each
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn mismatched_request_id_is_discarded() {
        // Answers every request with a canned response for request-id 9999,
        // which never matches.
        let bogus = Message::new(
            Version::V2c,
            b"public".as_slice(),
            Pdu {
                pdu_type: PduType::Response,
                request_id: 9999,
                error_status: 0,
                error_index: 0,
                varbinds: vec![VarBind::null(oid!(1, 3))],
            },
        )
        .encode();
        let transport = MockTransport::new(move |_| vec![bogus.clone()]);

        let mut session = session_over(transport, quick_config());
        let err = session.get(&[oid!(1, 3)]).await.unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
    }

    #[tokio::test]
    async fn mismatched_community_is_discarded() {
        let transport = MockTransport::new(move |frame| {
            let mut msg = Message::decode(Bytes::copy_from_slice(frame)).unwrap();
            msg.pdu.pdu_type = PduType::Response;
            msg.community = Bytes::from_static(b"other");
            vec![msg.encode()]
        });

        let mut session = session_over(transport, quick_config());
        let err = session.get(&[oid!(1, 3)]).await.unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
    }

    #[tokio::test]
    async fn retransmit_reaches_flaky_agent() {
        // Drops the first request, answers the second
        let mut calls = 0u32;
        let transport = MockTransport::new(move |frame| {
            calls += 1;
            if calls < 2 {
                return Vec::new();
            }
            let mut msg = Message::decode(Bytes::copy_from_slice(frame)).unwrap();
            msg.pdu.pdu_type = PduType::Response;
            vec![msg.encode()]
        });

        let mut session = session_over(transport, quick_config());
        let pdu = session.get(&[oid!(1, 3)]).await.unwrap();
        // The retransmission reuses the same request-id
        assert_eq!(pdu.request_id, 1);
    }

    #[tokio::test]
    async fn getbulk_rejected_on_v1() {
        let config = SessionConfig {
            version: Version::V1,
            ..quick_config()
        };
        let mut session = session_over(MockTransport::silent(), config);
        let err = session.getbulk(&[oid!(1, 3)], 0, 10).await.unwrap_err();
        assert!(matches!(err, Error::Version));
        assert_eq!(err.to_string(), "Cannot send V2 PDU on V1 session");
    }

    #[tokio::test]
    async fn trap_v2_prepends_uptime_and_trap_oid() {
        let mut session = session_over(MockTransport::silent(), quick_config());
        session
            .trap_v2(
                4711,
                &oid!(1, 3, 6, 1, 6, 3, 1, 1, 5, 1),
                vec![VarBind::new(oid!(1, 3, 6, 1, 4, 1, 9), Value::Integer(1))],
            )
            .await
            .unwrap();

        let SnmpSocket::Mock(mock) = &session.socket else {
            unreachable!()
        };
        assert_eq!(mock.sent.len(), 1);
        let msg = Message::decode(mock.sent[0].clone()).unwrap();
        assert_eq!(msg.pdu.pdu_type, PduType::TrapV2);
        assert_eq!(msg.pdu.varbinds.len(), 3);
        assert_eq!(msg.pdu.varbinds[0].oid, oid!(1, 3, 6, 1, 2, 1, 1, 3, 0));
        assert_eq!(msg.pdu.varbinds[0].value, Value::TimeTicks(4711));
        assert_eq!(
            msg.pdu.varbinds[1].oid,
            oid!(1, 3, 6, 1, 6, 3, 1, 1, 4, 1, 0)
        );
        assert_eq!(
            msg.pdu.varbinds[1].value,
            Value::ObjectIdentifier(oid!(1, 3, 6, 1, 6, 3, 1, 1, 5, 1))
        );
    }

    #[tokio::test]
    async fn trap_rejected_on_v1() {
        let config = SessionConfig {
            version: Version::V1,
            ..quick_config()
        };
        let mut session = session_over(MockTransport::silent(), config);
        let err = session
            .trap_v2(0, &oid!(1, 3, 6, 1, 6, 3, 1, 1, 5, 1), Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Version));
    }

    #[test]
    fn request_id_wraps_to_one() {
        let mut session = session_over(MockTransport::silent(), quick_config());
        session.next_request_id = i32::MAX;
        assert_eq!(session.take_request_id(), i32::MAX);
        assert_eq!(session.take_request_id(), 1);
    }

    #[test]
    fn error_status_mapping() {
        let pdu = Pdu {
            pdu_type: PduType::Response,
            request_id: 1,
            error_status: 2,
            error_index: 1,
            varbinds: vec![VarBind::null(oid!(1, 3, 6, 1, 9))],
        };
        let err = check_error_status(&pdu, "fallback").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Can't parse oid 1.3.6.1.9: No such object"
        );

        let out_of_range = Pdu {
            error_index: 7,
            ..pdu
        };
        let err = check_error_status(&out_of_range, "fallback").unwrap_err();
        assert_eq!(err.to_string(), "Can't parse oid fallback: No such object");
    }
}
