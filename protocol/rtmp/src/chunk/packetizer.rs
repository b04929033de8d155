use {
    super::{
        chunk::ChunkInfo,
        define,
        define::{chunk_type, csid_type},
        errors::{PackError, PackErrorValue},
    },
    crate::messages::define::msg_type_id,
    byteorder::{BigEndian, LittleEndian},
    bytesio::{bytes_writer::AsyncBytesWriter, bytesio::TNetIO},
    std::{cmp, sync::Arc},
    tokio::sync::Mutex,
};

/// Chunk-stream encoder. Fragments a logical message into a fmt 0 chunk
/// followed by fmt 3 continuations under the current write chunk size, and
/// flushes the whole message in one transport write.
pub struct ChunkPacketizer {
    writer: AsyncBytesWriter,
    max_chunk_size: usize,
}

impl ChunkPacketizer {
    pub fn new(io: Arc<Mutex<Box<dyn TNetIO + Send + Sync>>>) -> Self {
        Self {
            writer: AsyncBytesWriter::new(io),
            max_chunk_size: define::INIT_CHUNK_SIZE,
        }
    }

    pub fn update_max_chunk_size(&mut self, chunk_size: usize) {
        log::info!("update write chunk size: {}", chunk_size);
        self.max_chunk_size = chunk_size;
    }

    fn write_basic_header(&mut self, fmt: u8, csid: u32) -> Result<(), PackError> {
        if csid < 64 {
            self.writer.write_u8(fmt << 6 | csid as u8)?;
        } else if csid < 64 + 256 {
            self.writer.write_u8(fmt << 6)?;
            self.writer.write_u8((csid - 64) as u8)?;
        } else if csid < 64 + 65536 {
            self.writer.write_u8(fmt << 6 | 1)?;
            self.writer.write_u16::<LittleEndian>((csid - 64) as u16)?;
        } else {
            return Err(PackError {
                value: PackErrorValue::InvalidChunkStreamId(csid),
            });
        }

        Ok(())
    }

    pub async fn write_chunk(&mut self, chunk_info: &mut ChunkInfo) -> Result<(), PackError> {
        /*the peer expects media on fixed chunk streams regardless of what
        the caller asked for*/
        match chunk_info.message_header.msg_type_id {
            msg_type_id::AUDIO => {
                chunk_info.basic_header.chunk_stream_id = csid_type::AUDIO;
            }
            msg_type_id::VIDEO | msg_type_id::DATA_AMF0 | msg_type_id::DATA_AMF3 => {
                chunk_info.basic_header.chunk_stream_id = csid_type::VIDEO_DATA_AMF0_AMF3;
            }
            _ => {}
        }

        let csid = chunk_info.basic_header.chunk_stream_id;
        let timestamp = chunk_info.message_header.timestamp;
        let msg_length = chunk_info.message_header.msg_length;

        if msg_length > define::EXTEND_TIMESTAMP {
            return Err(PackError {
                value: PackErrorValue::MessageTooLarge(msg_length),
            });
        }

        self.write_basic_header(chunk_type::TYPE_0, csid)?;

        self.writer
            .write_u24::<BigEndian>(cmp::min(timestamp, define::EXTEND_TIMESTAMP))?;
        self.writer.write_u24::<BigEndian>(msg_length)?;
        self.writer.write_u8(chunk_info.message_header.msg_type_id)?;
        self.writer
            .write_u32::<LittleEndian>(chunk_info.message_header.msg_stream_id)?;

        if timestamp >= define::EXTEND_TIMESTAMP {
            self.writer.write_u32::<BigEndian>(timestamp)?;
        }

        let payload = &chunk_info.payload;
        let mut index: usize = 0;

        while index < payload.len() {
            let size = cmp::min(self.max_chunk_size, payload.len() - index);
            self.writer.write(&payload[index..index + size])?;
            index += size;

            if index < payload.len() {
                self.write_basic_header(chunk_type::TYPE_3, csid)?;
                if timestamp >= define::EXTEND_TIMESTAMP {
                    self.writer.write_u32::<BigEndian>(timestamp)?;
                }
            }
        }

        self.writer.flush().await?;

        Ok(())
    }
}
