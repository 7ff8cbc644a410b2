//! Transport layer: agent address parsing and connected sockets.
//!
//! An agent specifier selects family and socket type:
//!
//! | Form                         | Meaning                    |
//! |------------------------------|----------------------------|
//! | `host`, `host:port`          | UDP over IPv4              |
//! | `udp:host[:port]`            | UDP over IPv4              |
//! | `tcp:host[:port]`            | TCP over IPv4              |
//! | `udp6:...` (`udpv6`, `udpipv6`) | UDP over IPv6           |
//! | `tcp6:...` (`tcpv6`, `tcpipv6`) | TCP over IPv6           |
//! | `unix:/path`                 | AF_UNIX stream             |
//!
//! IPv6 hosts use the `[addr]:port` bracket form when a port is present.
//! Sockets are always connected; stream transports (TCP, UNIX) frame each
//! message with a 2-byte big-endian length prefix, UDP does not.

#[cfg(any(test, feature = "testing"))]
pub mod mock;

use crate::error::{Error, Result};
use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket, lookup_host};

#[cfg(unix)]
use tokio::net::UnixStream;

/// Largest datagram we accept.
const MAX_DATAGRAM: usize = 65535;

/// Address family requested by the specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    V4,
    V6,
}

/// A parsed agent specifier, not yet connected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentSpec {
    /// Internet host, either datagram or stream.
    Inet {
        host: String,
        port: u16,
        family: Family,
        stream: bool,
    },
    /// UNIX-domain stream socket.
    #[cfg(unix)]
    Unix { path: String },
}

impl AgentSpec {
    /// Parse an agent specifier. `default_port` applies when the specifier
    /// does not carry one (161 for get/walk, 162 for trap).
    pub fn parse(spec: &str, default_port: u16) -> Result<AgentSpec> {
        let bad = |reason: &str| Error::AddressParse {
            spec: spec.to_string(),
            reason: reason.to_string(),
        };

        if spec.is_empty() {
            return Err(bad("empty specifier"));
        }

        let Some((head, rest)) = spec.split_once(':') else {
            // Bare hostname: UDP over IPv4 on the default port
            return Ok(AgentSpec::Inet {
                host: spec.to_string(),
                port: default_port,
                family: Family::V4,
                stream: false,
            });
        };

        let (family, stream) = match head.to_ascii_lowercase().as_str() {
            "udp" => (Family::V4, false),
            "tcp" => (Family::V4, true),
            "udp6" | "udpv6" | "udpipv6" => (Family::V6, false),
            "tcp6" | "tcpv6" | "tcpipv6" => (Family::V6, true),
            #[cfg(unix)]
            "unix" => {
                if rest.is_empty() {
                    return Err(bad("empty socket path"));
                }
                return Ok(AgentSpec::Unix {
                    path: rest.to_string(),
                });
            }
            _ => {
                // No transport specifier: `host:port` over UDP/IPv4
                let port = rest
                    .parse::<u16>()
                    .map_err(|_| bad("invalid port"))?;
                return Ok(AgentSpec::Inet {
                    host: head.to_string(),
                    port,
                    family: Family::V4,
                    stream: false,
                });
            }
        };

        if rest.is_empty() {
            return Err(bad("missing host"));
        }

        let (host, port) = match family {
            Family::V4 => match rest.split_once(':') {
                Some((h, p)) => (h, Some(p)),
                None => (rest, None),
            },
            Family::V6 => {
                if let Some(inner) = rest.strip_prefix('[') {
                    let Some((h, after)) = inner.split_once(']') else {
                        return Err(bad("unterminated '['"));
                    };
                    match after.strip_prefix(':') {
                        Some(p) => (h, Some(p)),
                        None if after.is_empty() => (h, None),
                        None => return Err(bad("garbage after ']'")),
                    }
                } else {
                    // Bare form carries no port; colons belong to the address
                    (rest, None)
                }
            }
        };

        if host.is_empty() {
            return Err(bad("missing host"));
        }
        let port = match port {
            Some(p) => p.parse::<u16>().map_err(|_| bad("invalid port"))?,
            None => default_port,
        };

        Ok(AgentSpec::Inet {
            host: host.to_string(),
            port,
            family,
            stream,
        })
    }

    /// Resolve and connect, yielding a ready socket.
    pub async fn connect(&self) -> Result<SnmpSocket> {
        match self {
            AgentSpec::Inet {
                host,
                port,
                family,
                stream,
            } => {
                let spec = self.display();
                let candidates: Vec<std::net::SocketAddr> =
                    lookup_host((host.as_str(), *port))
                        .await
                        .map_err(|e| Error::Resolve {
                            spec: spec.clone(),
                            reason: e.to_string(),
                        })?
                        .filter(|addr| match family {
                            Family::V4 => addr.is_ipv4(),
                            Family::V6 => addr.is_ipv6(),
                        })
                        .collect();

                if candidates.is_empty() {
                    return Err(Error::Resolve {
                        spec,
                        reason: "no addresses for requested family".to_string(),
                    });
                }

                let mut last_err: Option<std::io::Error> = None;
                for addr in candidates {
                    let attempt = async {
                        if *stream {
                            TcpStream::connect(addr).await.map(SnmpSocket::Tcp)
                        } else {
                            let bind = if addr.is_ipv4() {
                                std::net::SocketAddr::from((std::net::Ipv4Addr::UNSPECIFIED, 0))
                            } else {
                                std::net::SocketAddr::from((std::net::Ipv6Addr::UNSPECIFIED, 0))
                            };
                            let socket = UdpSocket::bind(bind).await?;
                            socket.connect(addr).await?;
                            Ok(SnmpSocket::Udp(socket))
                        }
                    };
                    match attempt.await {
                        Ok(socket) => {
                            tracing::debug!(target: "snmpc::transport", agent = %spec, %addr, "connected");
                            return Ok(socket);
                        }
                        Err(e) => last_err = Some(e),
                    }
                }

                Err(Error::Connect {
                    spec,
                    source: last_err
                        .unwrap_or_else(|| std::io::Error::other("no address connected")),
                })
            }
            #[cfg(unix)]
            AgentSpec::Unix { path } => {
                let stream = UnixStream::connect(path).await.map_err(|e| Error::Connect {
                    spec: format!("unix:{path}"),
                    source: e,
                })?;
                tracing::debug!(target: "snmpc::transport", path = %path, "connected");
                Ok(SnmpSocket::Unix(stream))
            }
        }
    }

    fn display(&self) -> String {
        match self {
            AgentSpec::Inet { host, port, .. } => format!("{host}:{port}"),
            #[cfg(unix)]
            AgentSpec::Unix { path } => format!("unix:{path}"),
        }
    }
}

/// A connected socket speaking whole SNMP messages.
pub enum SnmpSocket {
    Udp(UdpSocket),
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(UnixStream),
    #[cfg(any(test, feature = "testing"))]
    Mock(mock::MockTransport),
}

impl SnmpSocket {
    /// Stream transports carry the 2-byte length prefix and do not retry.
    pub fn is_stream(&self) -> bool {
        match self {
            SnmpSocket::Udp(_) => false,
            SnmpSocket::Tcp(_) => true,
            #[cfg(unix)]
            SnmpSocket::Unix(_) => true,
            #[cfg(any(test, feature = "testing"))]
            SnmpSocket::Mock(_) => false,
        }
    }

    /// Send one message to the connected peer.
    pub async fn send(&mut self, data: &[u8]) -> Result<()> {
        tracing::trace!(
            target: "snmpc::transport",
            bytes = data.len(),
            frame = %crate::format::hex::Bytes(data),
            "send"
        );
        match self {
            SnmpSocket::Udp(socket) => {
                socket.send(data).await.map_err(|e| Error::Io {
                    context: "send",
                    source: e,
                })?;
                Ok(())
            }
            SnmpSocket::Tcp(stream) => write_framed(stream, data).await,
            #[cfg(unix)]
            SnmpSocket::Unix(stream) => write_framed(stream, data).await,
            #[cfg(any(test, feature = "testing"))]
            SnmpSocket::Mock(mock) => mock.send(data),
        }
    }

    /// Receive one message from the connected peer. Blocks until a frame
    /// arrives; the caller bounds the wait with a deadline.
    pub async fn recv(&mut self) -> Result<Bytes> {
        let frame = match self {
            SnmpSocket::Udp(socket) => {
                let mut buf = vec![0u8; MAX_DATAGRAM];
                let len = socket.recv(&mut buf).await.map_err(|e| Error::Io {
                    context: "recv",
                    source: e,
                })?;
                buf.truncate(len);
                Bytes::from(buf)
            }
            SnmpSocket::Tcp(stream) => read_framed(stream).await?,
            #[cfg(unix)]
            SnmpSocket::Unix(stream) => read_framed(stream).await?,
            #[cfg(any(test, feature = "testing"))]
            SnmpSocket::Mock(mock) => mock.recv().await?,
        };
        tracing::trace!(target: "snmpc::transport", bytes = frame.len(), "recv");
        Ok(frame)
    }
}

/// Write a 2-byte big-endian length prefix followed by the message.
async fn write_framed<S>(stream: &mut S, data: &[u8]) -> Result<()>
where
    S: AsyncWriteExt + Unpin,
{
    let len = u16::try_from(data.len()).map_err(|_| {
        Error::argument(format!("message of {} bytes exceeds stream framing", data.len()))
    })?;
    let io = |source| Error::Io {
        context: "send",
        source,
    };
    stream.write_all(&len.to_be_bytes()).await.map_err(io)?;
    stream.write_all(data).await.map_err(io)?;
    stream.flush().await.map_err(io)?;
    Ok(())
}

/// Read one length-prefixed frame.
async fn read_framed<S>(stream: &mut S) -> Result<Bytes>
where
    S: AsyncReadExt + Unpin,
{
    let io = |source| Error::Io {
        context: "recv",
        source,
    };
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await.map_err(io)?;
    let len = u16::from_be_bytes(len_buf) as usize;
    let mut buf = vec![0u8; len];
    stream.read_exact(&mut buf).await.map_err(io)?;
    Ok(Bytes::from(buf))
}
