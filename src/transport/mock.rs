//! Scripted transport for protocol tests.
//!
//! [`MockTransport`] feeds each sent message to a handler which returns the
//! frames to queue for `recv`. An empty queue makes `recv` pend forever, so
//! session timeouts are exercised for real (against short timeouts).
//!
//! [`MockAgent`] is a canned handler: a tiny in-memory agent over a
//! `BTreeMap` answering GET, GETNEXT and GETBULK through the full codec.

use crate::error::Result;
use crate::message::Message;
use crate::oid::Oid;
use crate::pdu::{Pdu, PduType};
use crate::value::Value;
use crate::varbind::VarBind;
use bytes::Bytes;
use std::collections::{BTreeMap, VecDeque};

/// Handler invoked per sent frame; returns response frames in order.
pub type Handler = Box<dyn FnMut(&[u8]) -> Vec<Bytes> + Send>;

/// A scripted in-process transport.
pub struct MockTransport {
    handler: Handler,
    queue: VecDeque<Bytes>,
    /// Every frame sent through this transport, in order.
    pub sent: Vec<Bytes>,
}

impl MockTransport {
    /// Create a transport around a handler.
    pub fn new(handler: impl FnMut(&[u8]) -> Vec<Bytes> + Send + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            queue: VecDeque::new(),
            sent: Vec::new(),
        }
    }

    /// A transport that never answers.
    pub fn silent() -> Self {
        Self::new(|_| Vec::new())
    }

    pub(crate) fn send(&mut self, data: &[u8]) -> Result<()> {
        self.sent.push(Bytes::copy_from_slice(data));
        let responses = (self.handler)(data);
        self.queue.extend(responses);
        Ok(())
    }

    pub(crate) async fn recv(&mut self) -> Result<Bytes> {
        match self.queue.pop_front() {
            Some(frame) => Ok(frame),
            // Nothing scripted: behave like a dead agent
            None => std::future::pending().await,
        }
    }
}

/// An in-memory agent answering through the real codec.
pub struct MockAgent {
    objects: BTreeMap<Oid, Value>,
}

impl MockAgent {
    /// Create an agent holding the given objects.
    pub fn new(objects: impl IntoIterator<Item = (Oid, Value)>) -> Self {
        Self {
            objects: objects.into_iter().collect(),
        }
    }

    /// Wrap this agent in a [`MockTransport`].
    pub fn into_transport(mut self) -> MockTransport {
        MockTransport::new(move |frame| {
            self.respond(frame).map(|b| vec![b]).unwrap_or_default()
        })
    }

    /// Answer one request frame, or `None` for PDUs that take no response.
    pub fn respond(&mut self, frame: &[u8]) -> Option<Bytes> {
        let request = Message::decode(Bytes::copy_from_slice(frame)).ok()?;
        let pdu = &request.pdu;

        let varbinds = match pdu.pdu_type {
            PduType::GetRequest => pdu
                .varbinds
                .iter()
                .map(|vb| self.get(&vb.oid))
                .collect::<Vec<_>>(),
            PduType::GetNextRequest => pdu
                .varbinds
                .iter()
                .map(|vb| self.next(&vb.oid))
                .collect::<Vec<_>>(),
            PduType::GetBulkRequest => {
                let non_repeaters = pdu.error_status.max(0) as usize;
                let max_repetitions = pdu.error_index.max(0) as usize;
                let mut out = Vec::new();
                for (i, vb) in pdu.varbinds.iter().enumerate() {
                    if i < non_repeaters {
                        out.push(self.next(&vb.oid));
                    } else {
                        let mut cursor = vb.oid.clone();
                        for _ in 0..max_repetitions {
                            let vb = self.next(&cursor);
                            cursor = vb.oid.clone();
                            let done = vb.value == Value::EndOfMibView;
                            out.push(vb);
                            if done {
                                break;
                            }
                        }
                    }
                }
                out
            }
            // Traps have no response
            _ => return None,
        };

        let response = Message::new(
            request.version,
            request.community.clone(),
            Pdu {
                pdu_type: PduType::Response,
                request_id: pdu.request_id,
                error_status: 0,
                error_index: 0,
                varbinds,
            },
        );
        Some(response.encode())
    }

    fn get(&self, oid: &Oid) -> VarBind {
        match self.objects.get(oid) {
            Some(value) => VarBind::new(oid.clone(), value.clone()),
            None => VarBind::new(oid.clone(), Value::NoSuchObject),
        }
    }

    fn next(&self, oid: &Oid) -> VarBind {
        use std::ops::Bound;
        match self
            .objects
            .range((Bound::Excluded(oid.clone()), Bound::Unbounded))
            .next()
        {
            Some((next_oid, value)) => VarBind::new(next_oid.clone(), value.clone()),
            None => VarBind::new(oid.clone(), Value::EndOfMibView),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use crate::version::Version;

    fn agent() -> MockAgent {
        MockAgent::new([
            (oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::Integer(1)),
            (oid!(1, 3, 6, 1, 2, 1, 1, 2, 0), Value::Integer(2)),
        ])
    }

    fn ask(transport: &mut MockTransport, pdu: Pdu) -> Pdu {
        let msg = Message::new(Version::V2c, b"public".as_slice(), pdu);
        transport.send(&msg.encode()).unwrap();
        let frame = transport.queue.pop_front().expect("response queued");
        Message::decode(frame).unwrap().pdu
    }

    #[test]
    fn answers_get() {
        let mut transport = agent().into_transport();
        let response = ask(
            &mut transport,
            Pdu::get_request(5, &[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)]),
        );
        assert_eq!(response.request_id, 5);
        assert_eq!(response.varbinds[0].value, Value::Integer(1));
    }

    #[test]
    fn answers_getnext_in_order() {
        let mut transport = agent().into_transport();
        let response = ask(
            &mut transport,
            Pdu::get_next_request(6, &[oid!(1, 3, 6, 1, 2, 1, 1)]),
        );
        assert_eq!(response.varbinds[0].oid, oid!(1, 3, 6, 1, 2, 1, 1, 1, 0));

        let response = ask(
            &mut transport,
            Pdu::get_next_request(7, &[oid!(1, 3, 6, 1, 2, 1, 1, 2, 0)]),
        );
        assert_eq!(response.varbinds[0].value, Value::EndOfMibView);
    }

    #[test]
    fn answers_getbulk_with_repetitions() {
        let mut transport = agent().into_transport();
        let response = ask(
            &mut transport,
            Pdu::get_bulk_request(8, &[oid!(1, 3, 6, 1, 2, 1, 1)], 0, 10),
        );
        // Two objects plus the endOfMibView terminator
        assert_eq!(response.varbinds.len(), 3);
        assert_eq!(response.varbinds[2].value, Value::EndOfMibView);
    }

    #[test]
    fn missing_object_is_no_such_object() {
        let mut transport = agent().into_transport();
        let response = ask(&mut transport, Pdu::get_request(9, &[oid!(1, 3, 9, 9)]));
        assert_eq!(response.varbinds[0].value, Value::NoSuchObject);
    }
}
