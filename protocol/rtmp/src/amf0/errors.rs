use {
    bytesio::bytes_errors::{BytesReadError, BytesWriteError},
    failure::{Backtrace, Fail},
    std::{fmt, string},
};

#[derive(Debug, Fail)]
pub enum Amf0ReadErrorValue {
    #[fail(display = "bytes read error: {}", _0)]
    BytesReadError(BytesReadError),
    #[fail(display = "marker 0x{:02x} is not a value this decoder knows", _0)]
    UnexpectedMarker(u8),
    #[fail(display = "expected marker 0x{:02x}, found 0x{:02x}", expected, found)]
    TypeMismatch { expected: u8, found: u8 },
    #[fail(display = "string is not valid utf8: {}", _0)]
    InvalidUtf8(#[cause] string::FromUtf8Error),
}

#[derive(Debug)]
pub struct Amf0ReadError {
    pub value: Amf0ReadErrorValue,
}

impl From<Amf0ReadErrorValue> for Amf0ReadError {
    fn from(val: Amf0ReadErrorValue) -> Self {
        Amf0ReadError { value: val }
    }
}

impl From<BytesReadError> for Amf0ReadError {
    fn from(error: BytesReadError) -> Self {
        Amf0ReadError {
            value: Amf0ReadErrorValue::BytesReadError(error),
        }
    }
}

impl From<string::FromUtf8Error> for Amf0ReadError {
    fn from(error: string::FromUtf8Error) -> Self {
        Amf0ReadError {
            value: Amf0ReadErrorValue::InvalidUtf8(error),
        }
    }
}

#[derive(Debug, Fail)]
pub enum Amf0WriteErrorValue {
    #[fail(display = "bytes write error: {}", _0)]
    BytesWriteError(BytesWriteError),
    #[fail(display = "string of {} bytes does not fit a short string", _0)]
    StringTooLong(usize),
}

#[derive(Debug)]
pub struct Amf0WriteError {
    pub value: Amf0WriteErrorValue,
}

impl From<Amf0WriteErrorValue> for Amf0WriteError {
    fn from(val: Amf0WriteErrorValue) -> Self {
        Amf0WriteError { value: val }
    }
}

impl From<BytesWriteError> for Amf0WriteError {
    fn from(error: BytesWriteError) -> Self {
        Amf0WriteError {
            value: Amf0WriteErrorValue::BytesWriteError(error),
        }
    }
}

impl fmt::Display for Amf0ReadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl Fail for Amf0ReadError {
    fn cause(&self) -> Option<&dyn Fail> {
        self.value.cause()
    }

    fn backtrace(&self) -> Option<&Backtrace> {
        self.value.backtrace()
    }
}

impl fmt::Display for Amf0WriteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl Fail for Amf0WriteError {
    fn cause(&self) -> Option<&dyn Fail> {
        self.value.cause()
    }

    fn backtrace(&self) -> Option<&Backtrace> {
        self.value.backtrace()
    }
}
