use {
    async_trait::async_trait,
    bytes::{Bytes, BytesMut},
    bytesio::{
        bytesio::TNetIO,
        bytesio_errors::{BytesIOError, BytesIOErrorValue},
    },
    futures::{SinkExt, StreamExt},
    std::{sync::Arc, time::Duration},
    tokio::{io::DuplexStream, sync::Mutex},
    tokio_util::codec::{BytesCodec, Framed},
};

/// In-memory transport for tests: both ends of a `tokio::io::duplex` pipe
/// behind the same framing the TCP transport uses.
pub struct DuplexIO {
    stream: Framed<DuplexStream, BytesCodec>,
}

impl DuplexIO {
    pub fn pair() -> (
        Arc<Mutex<Box<dyn TNetIO + Send + Sync>>>,
        Arc<Mutex<Box<dyn TNetIO + Send + Sync>>>,
    ) {
        let (left, right) = tokio::io::duplex(1 << 20);

        let left_io: Box<dyn TNetIO + Send + Sync> = Box::new(DuplexIO {
            stream: Framed::new(left, BytesCodec::new()),
        });
        let right_io: Box<dyn TNetIO + Send + Sync> = Box::new(DuplexIO {
            stream: Framed::new(right, BytesCodec::new()),
        });

        (
            Arc::new(Mutex::new(left_io)),
            Arc::new(Mutex::new(right_io)),
        )
    }
}

#[async_trait]
impl TNetIO for DuplexIO {
    async fn write(&mut self, bytes: Bytes) -> Result<(), BytesIOError> {
        self.stream.send(bytes).await?;

        Ok(())
    }

    async fn read(&mut self) -> Result<BytesMut, BytesIOError> {
        let message = self.stream.next().await;

        match message {
            Some(data) => match data {
                Ok(bytes) => Ok(bytes),
                Err(err) => Err(BytesIOError {
                    value: BytesIOErrorValue::IOError(err),
                }),
            },
            None => Err(BytesIOError {
                value: BytesIOErrorValue::StreamClosed,
            }),
        }
    }

    async fn read_timeout(&mut self, duration: Duration) -> Result<BytesMut, BytesIOError> {
        match tokio::time::timeout(duration, self.read()).await {
            Ok(data) => data,
            Err(err) => Err(BytesIOError {
                value: BytesIOErrorValue::TimeoutError(err),
            }),
        }
    }
}
