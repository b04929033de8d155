pub mod define;
pub mod errors;

use {
    self::{define::ConnectionType, errors::ConnectionError},
    crate::{
        amf0::{amf0_markers, amf0_reader::Amf0Reader, Amf0ValueType},
        chunk::{
            define::{chunk_type, csid_type},
            packetizer::ChunkPacketizer,
            unpacketizer::ChunkUnpacketizer,
            ChunkInfo,
        },
        handshake::HandshakeServer,
        messages::define::msg_type_id,
        netconnection::NetConnection,
        protocol_control_messages::{
            reader::ProtocolControlMessageReader, writer::ProtocolControlMessagesWriter,
        },
        user_control_messages::writer::EventMessagesWriter,
    },
    byteorder::BigEndian,
    bytes::BytesMut,
    bytesio::{
        bytes_reader::BytesReader,
        bytes_writer::{AsyncBytesWriter, BytesWriter},
        bytesio::TNetIO,
    },
    std::sync::Arc,
    tokio::sync::Mutex,
};

/// The received counter wraps back to zero once it passes this mark.
const RECEIVED_WRAP_THRESHOLD: u32 = 0xF000_0000;

/// Bytes received before the peer expects an Acknowledgement, until a
/// WindowAcknowledgementSize message says otherwise.
const DEFAULT_REMOTE_WINDOW_ACK_SIZE: u32 = 5_000_000;

/// Per-connection protocol state. Owns the transport handle and composes
/// the handshake, both codec halves and the acknowledgement accounting.
/// One task drives the read side; writes from other tasks serialize on the
/// transport lock at message granularity.
pub struct RtmpConnection {
    io: Arc<Mutex<Box<dyn TNetIO + Send + Sync>>>,
    handshaker: HandshakeServer,
    unpacketizer: ChunkUnpacketizer,
    packetizer: ChunkPacketizer,
    netconnection: NetConnection,

    /// Publisher or subscriber; settled by the command layer above, later.
    pub conn_type: Option<ConnectionType>,

    remote_window_ack_size: u32,
    received: u32,
    ack_received: u32,
}

impl RtmpConnection {
    pub fn new(io: Arc<Mutex<Box<dyn TNetIO + Send + Sync>>>) -> Self {
        Self {
            handshaker: HandshakeServer::new(io.clone()),
            unpacketizer: ChunkUnpacketizer::new(io.clone()),
            packetizer: ChunkPacketizer::new(io.clone()),
            netconnection: NetConnection::new(io.clone()),
            io,

            conn_type: None,

            remote_window_ack_size: DEFAULT_REMOTE_WINDOW_ACK_SIZE,
            received: 0,
            ack_received: 0,
        }
    }

    /// Run the server handshake once, right after accept. Bytes the client
    /// pipelined behind C2 are carried over to the chunk decoder.
    pub async fn handshake(&mut self) -> Result<(), ConnectionError> {
        self.handshaker.handshake().await?;

        let leftover = self.handshaker.get_remaining_bytes();
        if !leftover.is_empty() {
            self.unpacketizer.extend_data(&leftover[..]);
        }

        Ok(())
    }

    /// Drive the decoder until a message completes and return it.
    /// Acknowledgement accounting and the control messages that mutate
    /// codec state are applied here, at message-completion time.
    pub async fn read_message(&mut self) -> Result<ChunkInfo, ConnectionError> {
        loop {
            let chunk_info = {
                let cs = self.unpacketizer.read_chunk().await?;
                if !cs.finish {
                    continue;
                }
                ChunkInfo::new(
                    cs.csid,
                    cs.format,
                    cs.timestamp,
                    cs.msg_length,
                    cs.msg_type_id,
                    cs.msg_stream_id,
                    cs.data.clone(),
                )
            };

            self.on_message_received(chunk_info.message_header.msg_length)
                .await?;

            match chunk_info.message_header.msg_type_id {
                msg_type_id::SET_CHUNK_SIZE => {
                    let chunk_size = ProtocolControlMessageReader::new(BytesReader::new(
                        chunk_info.payload.clone(),
                    ))
                    .read_set_chunk_size()?;
                    self.unpacketizer.update_max_chunk_size(chunk_size as usize);
                }
                msg_type_id::WIN_ACKNOWLEDGEMENT_SIZE => {
                    let size = ProtocolControlMessageReader::new(BytesReader::new(
                        chunk_info.payload.clone(),
                    ))
                    .read_window_acknowledgement_size()?;
                    self.remote_window_ack_size = size;
                }
                _ => {}
            }

            return Ok(chunk_info);
        }
    }

    async fn on_message_received(&mut self, msg_length: u32) -> Result<(), ConnectionError> {
        self.received = self.received.wrapping_add(msg_length);
        self.ack_received = self.ack_received.wrapping_add(msg_length);

        if self.received >= RECEIVED_WRAP_THRESHOLD {
            self.received = 0;
        }

        if self.ack_received >= self.remote_window_ack_size {
            log::info!("send acknowledgement, ack_received: {}", self.ack_received);
            let mut writer =
                ProtocolControlMessagesWriter::new(AsyncBytesWriter::new(self.io.clone()));
            writer.write_acknowledgement(self.ack_received).await?;
            self.ack_received = 0;
        }

        Ok(())
    }

    /// Fragment and send a logical message. SetChunkSize takes effect on
    /// the encoder before its own fragmentation; AMF0/AMF3 data payloads
    /// pass through the metadata-reform step first.
    pub async fn write_message(&mut self, chunk_info: &mut ChunkInfo) -> Result<(), ConnectionError> {
        match chunk_info.message_header.msg_type_id {
            msg_type_id::DATA_AMF0 | msg_type_id::DATA_AMF3 => {
                chunk_info.payload = metadata_reform(chunk_info.payload.clone())?;
                chunk_info.message_header.msg_length = chunk_info.payload.len() as u32;
            }
            msg_type_id::SET_CHUNK_SIZE => {
                let chunk_size = ProtocolControlMessageReader::new(BytesReader::new(
                    chunk_info.payload.clone(),
                ))
                .read_set_chunk_size()?;
                self.packetizer.update_max_chunk_size(chunk_size as usize);
            }
            _ => {}
        }

        self.packetizer.write_chunk(chunk_info).await?;
        Ok(())
    }

    /// Frame the ordered AMF0 values as a command message.
    pub async fn write_command(
        &mut self,
        csid: u32,
        msg_stream_id: u32,
        values: &[Amf0ValueType],
    ) -> Result<(), ConnectionError> {
        self.netconnection
            .write_command(csid, msg_stream_id, values)
            .await?;
        Ok(())
    }

    pub async fn write_set_chunk_size(&mut self, chunk_size: u32) -> Result<(), ConnectionError> {
        let mut writer = BytesWriter::new();
        writer.write_u32::<BigEndian>(chunk_size)?;

        let mut chunk_info = ChunkInfo::new(
            csid_type::PROTOCOL_CONTROL,
            chunk_type::TYPE_0,
            0,
            4,
            msg_type_id::SET_CHUNK_SIZE,
            0,
            writer.extract_current_bytes(),
        );

        self.write_message(&mut chunk_info).await
    }

    pub async fn write_window_acknowledgement_size(
        &mut self,
        window_size: u32,
    ) -> Result<(), ConnectionError> {
        let mut writer = ProtocolControlMessagesWriter::new(AsyncBytesWriter::new(self.io.clone()));
        writer.write_window_acknowledgement_size(window_size).await?;
        Ok(())
    }

    pub async fn write_set_peer_bandwidth(
        &mut self,
        window_size: u32,
        limit_type: u8,
    ) -> Result<(), ConnectionError> {
        let mut writer = ProtocolControlMessagesWriter::new(AsyncBytesWriter::new(self.io.clone()));
        writer.write_set_peer_bandwidth(window_size, limit_type).await?;
        Ok(())
    }

    pub async fn write_stream_begin(&mut self, stream_id: u32) -> Result<(), ConnectionError> {
        let mut writer = EventMessagesWriter::new(AsyncBytesWriter::new(self.io.clone()));
        writer.write_stream_begin(stream_id).await?;
        Ok(())
    }

    pub async fn write_stream_is_record(&mut self, stream_id: u32) -> Result<(), ConnectionError> {
        let mut writer = EventMessagesWriter::new(AsyncBytesWriter::new(self.io.clone()));
        writer.write_stream_is_record(stream_id).await?;
        Ok(())
    }
}

/// Publishers prefix their metadata with a "@setDataFrame" value that
/// players do not expect; relaying the payload means dropping it.
fn metadata_reform(payload: BytesMut) -> Result<BytesMut, ConnectionError> {
    let mut reader = Amf0Reader::new(BytesReader::new(payload.clone()));

    match reader.read_expecting(amf0_markers::STRING) {
        Ok(Amf0ValueType::UTF8String(name)) if name == "@setDataFrame" => {
            Ok(reader.extract_remaining_bytes())
        }
        _ => Ok(payload),
    }
}

#[cfg(test)]
mod tests {

    use super::RtmpConnection;
    use crate::amf0::{amf0_markers, amf0_reader::Amf0Reader, amf0_writer::Amf0Writer, Amf0ValueType};
    use crate::chunk::define::chunk_type;
    use crate::chunk::unpacketizer::ChunkUnpacketizer;
    use crate::chunk::ChunkInfo;
    use crate::messages::define::msg_type_id;
    use crate::test_utils::DuplexIO;

    use bytes::BytesMut;
    use bytesio::bytes_reader::{AsyncBytesReader, BytesReader};
    use bytesio::bytes_writer::AsyncBytesWriter;

    fn audio_message_bytes(payload_len: usize) -> Vec<u8> {
        let mut bytes = vec![
            0x04, // fmt 0, csid 4
            0x00, 0x00, 0x00, // timestamp
            0x00, (payload_len >> 8) as u8, payload_len as u8, // length
            0x08, // audio
            0x01, 0x00, 0x00, 0x00, // stream id 1
        ];
        bytes.extend(std::iter::repeat(0x5A).take(payload_len));
        bytes
    }

    #[tokio::test]
    async fn test_ack_emitted_once_window_is_reached() {
        let (server_io, client_io) = DuplexIO::pair();
        let mut conn = RtmpConnection::new(server_io);

        let mut writer = AsyncBytesWriter::new(client_io.clone());

        // window of 100 bytes, then four 30-byte audio messages
        writer
            .write(&[
                0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x04, 0x05, 0x00, 0x00, 0x00, 0x00, //
                0x00, 0x00, 0x00, 0x64,
            ])
            .unwrap();
        for _ in 0..4 {
            writer.write(&audio_message_bytes(30)).unwrap();
        }
        writer.flush().await.unwrap();

        for _ in 0..5 {
            conn.read_message().await.unwrap();
        }

        // 4 bytes of window message + 120 bytes of audio
        assert_eq!(conn.ack_received, 0);
        assert_eq!(conn.received, 124);

        let mut reader = AsyncBytesReader::new(client_io);
        let ack = reader.read_bytes(16).await.unwrap();
        assert_eq!(ack[0], 0x02);
        assert_eq!(ack[7], msg_type_id::ACKNOWLEDGEMENT);
        assert_eq!(&ack[12..16], &[0x00, 0x00, 0x00, 0x7C]);
    }

    #[tokio::test]
    async fn test_no_ack_below_the_window() {
        let (server_io, client_io) = DuplexIO::pair();
        let mut conn = RtmpConnection::new(server_io);

        let mut writer = AsyncBytesWriter::new(client_io);
        writer.write(&audio_message_bytes(30)).unwrap();
        writer.flush().await.unwrap();

        conn.read_message().await.unwrap();
        assert_eq!(conn.ack_received, 30);
    }

    #[tokio::test]
    async fn test_received_counter_wraps() {
        let (server_io, _client_io) = DuplexIO::pair();
        let mut conn = RtmpConnection::new(server_io);

        conn.received = super::RECEIVED_WRAP_THRESHOLD - 10;
        conn.on_message_received(20).await.unwrap();

        assert_eq!(conn.received, 0);
        assert_eq!(conn.ack_received, 20);
    }

    #[tokio::test]
    async fn test_inbound_set_chunk_size_applies_to_next_chunk() {
        let (server_io, client_io) = DuplexIO::pair();
        let mut conn = RtmpConnection::new(server_io);

        let mut writer = AsyncBytesWriter::new(client_io);
        writer
            .write(&[
                0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, //
                0x00, 0x00, 0x04, 0x00, // chunk size 1024
            ])
            .unwrap();
        // a 600-byte message in a single chunk, legal under the new size
        let mut media = vec![
            0x04, 0x00, 0x00, 0x00, 0x00, 0x02, 0x58, 0x08, 0x01, 0x00, 0x00, 0x00,
        ];
        media.extend(std::iter::repeat(0x77).take(600));
        writer.write(&media).unwrap();
        writer.flush().await.unwrap();

        let first = conn.read_message().await.unwrap();
        assert_eq!(first.message_header.msg_type_id, msg_type_id::SET_CHUNK_SIZE);

        let second = conn.read_message().await.unwrap();
        assert_eq!(second.message_header.msg_length, 600);
        assert_eq!(second.payload.len(), 600);
    }

    #[tokio::test]
    async fn test_outbound_set_chunk_size_applies_before_next_message() {
        let (server_io, client_io) = DuplexIO::pair();
        let mut conn = RtmpConnection::new(server_io);

        conn.write_set_chunk_size(512).await.unwrap();

        let mut payload = BytesMut::new();
        payload.extend_from_slice(&[0x99; 300]);
        let mut chunk_info = ChunkInfo::new(6, chunk_type::TYPE_0, 0, 300, 9, 1, payload);
        conn.write_message(&mut chunk_info).await.unwrap();

        let mut unpacketizer = ChunkUnpacketizer::new(client_io);

        let cs = unpacketizer.read_chunk().await.unwrap();
        assert!(cs.finish);
        assert_eq!(cs.msg_type_id, msg_type_id::SET_CHUNK_SIZE);
        let announced = BytesReader::new(cs.data.clone())
            .read_u32::<byteorder::BigEndian>()
            .unwrap();
        unpacketizer.update_max_chunk_size(announced as usize);

        // the video message must arrive whole in one 300-byte chunk
        let cs = unpacketizer.read_chunk().await.unwrap();
        assert!(cs.finish);
        assert_eq!(cs.msg_length, 300);
    }

    #[tokio::test]
    async fn test_metadata_reform_strips_set_data_frame() {
        let (server_io, client_io) = DuplexIO::pair();
        let mut conn = RtmpConnection::new(server_io);

        let mut amf_writer = Amf0Writer::new();
        amf_writer
            .write_string(&String::from("@setDataFrame"))
            .unwrap();
        amf_writer.write_string(&String::from("onMetaData")).unwrap();
        let payload = amf_writer.extract_current_bytes();

        let mut chunk_info = ChunkInfo::new(
            6,
            chunk_type::TYPE_0,
            0,
            payload.len() as u32,
            msg_type_id::DATA_AMF0,
            1,
            payload,
        );
        conn.write_message(&mut chunk_info).await.unwrap();

        let mut unpacketizer = ChunkUnpacketizer::new(client_io);
        let cs = unpacketizer.read_chunk().await.unwrap();
        assert!(cs.finish);

        let mut amf_reader = Amf0Reader::new(BytesReader::new(cs.data.clone()));
        let first = amf_reader.read_expecting(amf0_markers::STRING).unwrap();
        assert_eq!(first, Amf0ValueType::UTF8String(String::from("onMetaData")));
    }

    #[tokio::test]
    async fn test_pipelined_bytes_behind_handshake_reach_the_decoder() {
        let (server_io, client_io) = DuplexIO::pair();
        let mut conn = RtmpConnection::new(server_io);

        let server = tokio::spawn(async move {
            conn.handshake().await.unwrap();
            conn.read_message().await.unwrap()
        });

        let mut writer = AsyncBytesWriter::new(client_io.clone());
        let mut reader = AsyncBytesReader::new(client_io);

        writer.write_u8(0x03).unwrap();
        writer.write(&[0u8; 1536]).unwrap();
        writer.flush().await.unwrap();

        reader.read_bytes(1536 * 2 + 1).await.unwrap();

        // C2 and the first message leave in the same flush
        writer.write(&[0u8; 1536]).unwrap();
        writer.write(&audio_message_bytes(8)).unwrap();
        writer.flush().await.unwrap();

        let message = server.await.unwrap();
        assert_eq!(message.message_header.msg_type_id, msg_type_id::AUDIO);
        assert_eq!(message.payload.len(), 8);
    }
}
