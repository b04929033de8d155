pub mod amf0;
pub mod chunk;
pub mod connection;
pub mod handshake;
pub mod messages;
pub mod netconnection;
pub mod protocol_control_messages;
pub mod rtmp;
pub mod user_control_messages;

#[cfg(test)]
pub mod test_utils;
