//! Echo protocol implementation.
//!
//! Newline-delimited echo service:
//! - Client sends: any bytes terminated by `\n`
//! - Server echoes: the same bytes, delimiter included
//!
//! ## Protocol Format
//!
//! ```text
//! Request:  Hello, Server\n
//! Response: Hello, Server\n
//! ```
//!
//! Bytes are opaque. `\r` has no special meaning, so `\r\n` clients get
//! their `\r\n` back. Data after the last `\n` is never echoed; it is
//! dropped when the client closes the connection.

pub mod handler;
pub mod parser;

pub use handler::handle_connection;
