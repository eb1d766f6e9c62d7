pub mod codec;
pub mod connection;
pub mod packets;
pub mod tcp_loops;

pub use codec::*;
pub use connection::*;
pub use packets::*;

/// Separates packets sent to the server.
pub const PACKET_DELIMITER: u8 = b'\n';
