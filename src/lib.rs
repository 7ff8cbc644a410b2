//! # snmpc
//!
//! An SNMPv1/v2c client: the protocol core behind the `snmp` command-line
//! tool. GET, GETNEXT, GETBULK, subtree walks and SNMPv2 traps over UDP,
//! TCP and UNIX-domain sockets.
//!
//! ## Layout
//!
//! - [`ber`]: BER codec for the SNMP subset, including the application-class
//!   SMI types
//! - [`oid`]: OID type with the five-way MIB-order comparison
//! - [`mib`]: compiled-in symbol table with display hints and render modes
//! - [`transport`]: agent address parsing and connected sockets
//! - [`client`]: session (request-id matching, retransmission), operations
//!   and the walk engine
//! - [`format`]: DISPLAY-HINT application and value rendering helpers
//! - [`cli`]: argument lexing, the varbind printer and subcommand runners
//!
//! ## Example
//!
//! ```no_run
//! use snmpc::client::{Session, SessionConfig};
//! use snmpc::oid;
//! use snmpc::transport::AgentSpec;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> snmpc::Result<()> {
//!     let spec = AgentSpec::parse("udp:192.0.2.1:161", 161)?;
//!     let socket = spec.connect().await?;
//!     let mut session = Session::new(socket, SessionConfig::default());
//!
//!     let response = session.get(&[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)]).await?;
//!     for vb in &response.varbinds {
//!         println!("{vb}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod ber;
pub mod cli;
pub mod client;
pub mod error;
pub mod format;
pub mod message;
pub mod mib;
pub mod oid;
pub mod pdu;
pub mod transport;
pub mod value;
pub mod varbind;
pub mod version;

pub use error::{DecodeErrorKind, Error, ErrorStatus, Result};
pub use message::Message;
pub use mib::{Mib, MibNode, OidFormat};
pub use oid::{Oid, OidRelation};
pub use pdu::{Pdu, PduType};
pub use value::Value;
pub use varbind::VarBind;
pub use version::Version;
