use {
    crate::{
        amf0::errors::{Amf0ReadError, Amf0WriteError},
        chunk::errors::{PackError, UnpackError},
        handshake::errors::HandshakeError,
        messages::errors::MessageError,
        netconnection::errors::NetConnectionError,
        protocol_control_messages::errors::{
            ControlMessagesError, ProtocolControlMessageReaderError,
        },
        user_control_messages::errors::EventMessagesError,
    },
    bytesio::bytes_errors::{BytesReadError, BytesWriteError},
    failure::{Backtrace, Fail},
    std::fmt,
};

#[derive(Debug, Fail)]
pub enum ConnectionErrorValue {
    #[fail(display = "handshake error: {}", _0)]
    HandshakeError(#[cause] HandshakeError),
    #[fail(display = "unpack error: {}", _0)]
    UnpackError(#[cause] UnpackError),
    #[fail(display = "pack error: {}", _0)]
    PackError(#[cause] PackError),
    #[fail(display = "message error: {}", _0)]
    MessageError(#[cause] MessageError),
    #[fail(display = "control message error: {}", _0)]
    ControlMessagesError(#[cause] ControlMessagesError),
    #[fail(display = "control message read error: {}", _0)]
    ProtocolControlMessageReaderError(#[cause] ProtocolControlMessageReaderError),
    #[fail(display = "event messages error: {}", _0)]
    EventMessagesError(#[cause] EventMessagesError),
    #[fail(display = "net connection error: {}", _0)]
    NetConnectionError(#[cause] NetConnectionError),
    #[fail(display = "amf0 write error: {}", _0)]
    Amf0WriteError(#[cause] Amf0WriteError),
    #[fail(display = "amf0 read error: {}", _0)]
    Amf0ReadError(#[cause] Amf0ReadError),
    #[fail(display = "bytes read error: {}", _0)]
    BytesReadError(#[cause] BytesReadError),
    #[fail(display = "bytes write error: {}", _0)]
    BytesWriteError(#[cause] BytesWriteError),
}

#[derive(Debug)]
pub struct ConnectionError {
    pub value: ConnectionErrorValue,
}

impl From<HandshakeError> for ConnectionError {
    fn from(error: HandshakeError) -> Self {
        ConnectionError {
            value: ConnectionErrorValue::HandshakeError(error),
        }
    }
}

impl From<UnpackError> for ConnectionError {
    fn from(error: UnpackError) -> Self {
        ConnectionError {
            value: ConnectionErrorValue::UnpackError(error),
        }
    }
}

impl From<PackError> for ConnectionError {
    fn from(error: PackError) -> Self {
        ConnectionError {
            value: ConnectionErrorValue::PackError(error),
        }
    }
}

impl From<MessageError> for ConnectionError {
    fn from(error: MessageError) -> Self {
        ConnectionError {
            value: ConnectionErrorValue::MessageError(error),
        }
    }
}

impl From<ControlMessagesError> for ConnectionError {
    fn from(error: ControlMessagesError) -> Self {
        ConnectionError {
            value: ConnectionErrorValue::ControlMessagesError(error),
        }
    }
}

impl From<ProtocolControlMessageReaderError> for ConnectionError {
    fn from(error: ProtocolControlMessageReaderError) -> Self {
        ConnectionError {
            value: ConnectionErrorValue::ProtocolControlMessageReaderError(error),
        }
    }
}

impl From<EventMessagesError> for ConnectionError {
    fn from(error: EventMessagesError) -> Self {
        ConnectionError {
            value: ConnectionErrorValue::EventMessagesError(error),
        }
    }
}

impl From<NetConnectionError> for ConnectionError {
    fn from(error: NetConnectionError) -> Self {
        ConnectionError {
            value: ConnectionErrorValue::NetConnectionError(error),
        }
    }
}

impl From<Amf0WriteError> for ConnectionError {
    fn from(error: Amf0WriteError) -> Self {
        ConnectionError {
            value: ConnectionErrorValue::Amf0WriteError(error),
        }
    }
}

impl From<Amf0ReadError> for ConnectionError {
    fn from(error: Amf0ReadError) -> Self {
        ConnectionError {
            value: ConnectionErrorValue::Amf0ReadError(error),
        }
    }
}

impl From<BytesReadError> for ConnectionError {
    fn from(error: BytesReadError) -> Self {
        ConnectionError {
            value: ConnectionErrorValue::BytesReadError(error),
        }
    }
}

impl From<BytesWriteError> for ConnectionError {
    fn from(error: BytesWriteError) -> Self {
        ConnectionError {
            value: ConnectionErrorValue::BytesWriteError(error),
        }
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl Fail for ConnectionError {
    fn cause(&self) -> Option<&dyn Fail> {
        self.value.cause()
    }

    fn backtrace(&self) -> Option<&Backtrace> {
        self.value.backtrace()
    }
}
