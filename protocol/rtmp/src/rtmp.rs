use {
    crate::connection::{errors::ConnectionError, RtmpConnection},
    bytesio::bytesio::{TNetIO, TcpIO},
    std::sync::Arc,
    tokio::{net::TcpListener, sync::Mutex},
};

pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:1936";

/// Accept loop. One task per connection: handshake, then the chunk decode
/// loop until the transport closes or a codec error ends the connection.
/// The command layer above consumes the messages; a fatal error is logged
/// with the peer address and the task is dropped.
pub struct RtmpServer {
    address: String,
}

impl RtmpServer {
    pub fn new(address: String) -> Self {
        Self { address }
    }

    pub async fn run(&mut self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(&self.address).await?;
        log::info!("rtmp server start, listening on: {}", self.address);

        loop {
            let (stream, peer_addr) = listener.accept().await?;

            tokio::spawn(async move {
                let io: Arc<Mutex<Box<dyn TNetIO + Send + Sync>>> =
                    Arc::new(Mutex::new(Box::new(TcpIO::new(stream))));
                let mut connection = RtmpConnection::new(io);

                if let Err(err) = Self::serve_connection(&mut connection).await {
                    log::error!("connection {} closed: {}", peer_addr, err);
                }
            });
        }
    }

    async fn serve_connection(connection: &mut RtmpConnection) -> Result<(), ConnectionError> {
        connection.handshake().await?;

        loop {
            let message = connection.read_message().await?;
            log::trace!(
                "message received: csid {} type id {} length {}",
                message.basic_header.chunk_stream_id,
                message.message_header.msg_type_id,
                message.message_header.msg_length
            );
        }
    }
}
