pub mod define;
pub mod digest;
pub mod errors;
pub mod handshake_server;
pub mod handshake_trait;

pub use self::handshake_server::HandshakeServer;
