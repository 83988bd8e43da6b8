//! Minimal remote file access over UDP datagrams.
//!
//! A client sends one-line text commands (`get`, `put`, `delete`, `ls`,
//! `exit`) to a server that applies them to its served directory and
//! answers with a status line, a single chunk of file bytes, or a listing
//! closed by a sentinel line. The transport is best effort by design:
//! no retransmission, no ordering, no acknowledgment, no authentication.

pub mod client;
pub mod error;
pub mod executor;
pub mod logging;
pub mod protocol;
pub mod server;
pub mod shutdown;
pub mod transport;
