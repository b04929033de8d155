pub mod chunk;
pub mod define;
pub mod errors;
pub mod packetizer;
pub mod unpacketizer;

pub use self::chunk::{ChunkBasicHeader, ChunkInfo, ChunkMessageHeader, ChunkStream};
