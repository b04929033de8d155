pub mod amf0_reader;
pub mod amf0_writer;
pub mod define;
pub mod errors;

pub use self::define::{amf0_markers, Amf0ValueType};
pub use self::errors::{Amf0ReadError, Amf0WriteError};
