pub mod errors;
pub mod writer;

pub use self::writer::NetConnection;
