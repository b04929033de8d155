use {
    super::{
        chunk::ChunkStream,
        define,
        define::chunk_type,
        errors::{UnpackError, UnpackErrorValue},
    },
    byteorder::{BigEndian, LittleEndian},
    bytesio::{bytes_reader::AsyncBytesReader, bytesio::TNetIO},
    std::{cmp, collections::HashMap, sync::Arc},
    tokio::sync::Mutex,
};

/// Chunk-stream decoder. Owns the per-CSID reassembly table; each
/// `read_chunk` call consumes exactly one chunk from the transport and
/// applies it to the table entry it addresses.
pub struct ChunkUnpacketizer {
    reader: AsyncBytesReader,
    csid_2_chunk_stream: HashMap<u32, ChunkStream>,
    max_chunk_size: usize,
}

impl ChunkUnpacketizer {
    pub fn new(io: Arc<Mutex<Box<dyn TNetIO + Send + Sync>>>) -> Self {
        Self {
            reader: AsyncBytesReader::new(io),
            csid_2_chunk_stream: HashMap::new(),
            max_chunk_size: define::INIT_CHUNK_SIZE,
        }
    }

    /// Seed the decode buffer with bytes that arrived ahead of the chunk
    /// layer, such as data pipelined behind the handshake.
    pub fn extend_data(&mut self, data: &[u8]) {
        self.reader.extend_from_slice(data);
    }

    /// Applies on the next chunk boundary; mid-chunk state is untouched.
    pub fn update_max_chunk_size(&mut self, chunk_size: usize) {
        log::info!("update read chunk size: {}", chunk_size);
        self.max_chunk_size = chunk_size;
    }

    /// Read one chunk and return the reassembly context it applied to.
    /// `finish` on the returned context marks a newly completed message;
    /// the caller takes `data` before driving the next read.
    pub async fn read_chunk(&mut self) -> Result<&mut ChunkStream, UnpackError> {
        /*
         * basic header:
         *  0 1 2 3 4 5 6 7
         * +-+-+-+-+-+-+-+-+
         * |fmt|   cs id   |
         * +-+-+-+-+-+-+-+-+
         * csid 0 and 1 escape to the 2- and 3-byte forms (id - 64 follows,
         * little-endian).
         */
        let header = self.reader.read_u8().await?;
        let format = header >> 6;
        let mut csid = (header & 0x3f) as u32;

        match csid {
            0 => {
                csid = 64;
                csid += self.reader.read_u8().await? as u32;
            }
            1 => {
                csid = 64;
                csid += self.reader.read_u16::<LittleEndian>().await? as u32;
            }
            _ => {}
        }

        let cs = self
            .csid_2_chunk_stream
            .entry(csid)
            .or_insert_with(|| ChunkStream::new(csid));

        match format {
            chunk_type::TYPE_0 => {
                let timestamp = self.reader.read_u24::<BigEndian>().await?;
                cs.msg_length = self.reader.read_u24::<BigEndian>().await?;
                cs.msg_type_id = self.reader.read_u8().await?;
                cs.msg_stream_id = self.reader.read_u32::<LittleEndian>().await?;

                if timestamp == define::EXTEND_TIMESTAMP {
                    cs.timestamp = self.reader.read_u32::<BigEndian>().await?;
                    cs.use_extended_timestamp = true;
                } else {
                    cs.timestamp = timestamp;
                    cs.use_extended_timestamp = false;
                }

                cs.format = format;
                cs.init_data();
            }
            chunk_type::TYPE_1 => {
                let timestamp = self.reader.read_u24::<BigEndian>().await?;
                cs.msg_length = self.reader.read_u24::<BigEndian>().await?;
                cs.msg_type_id = self.reader.read_u8().await?;

                let time_delta = if timestamp == define::EXTEND_TIMESTAMP {
                    cs.use_extended_timestamp = true;
                    self.reader.read_u32::<BigEndian>().await?
                } else {
                    cs.use_extended_timestamp = false;
                    timestamp
                };

                cs.time_delta = time_delta;
                cs.timestamp = cs.timestamp.wrapping_add(time_delta);

                cs.format = format;
                cs.init_data();
            }
            chunk_type::TYPE_2 => {
                let timestamp = self.reader.read_u24::<BigEndian>().await?;

                let time_delta = if timestamp == define::EXTEND_TIMESTAMP {
                    cs.use_extended_timestamp = true;
                    self.reader.read_u32::<BigEndian>().await?
                } else {
                    cs.use_extended_timestamp = false;
                    timestamp
                };

                cs.time_delta = time_delta;
                cs.timestamp = cs.timestamp.wrapping_add(time_delta);

                cs.format = format;
                cs.init_data();
            }
            chunk_type::TYPE_3 => {
                if cs.remain == 0 {
                    /*a whole new message repeating the previous header*/
                    match cs.format {
                        chunk_type::TYPE_0 => {
                            if cs.use_extended_timestamp {
                                cs.timestamp = self.reader.read_u32::<BigEndian>().await?;
                            }
                        }
                        chunk_type::TYPE_1 | chunk_type::TYPE_2 => {
                            let time_delta = if cs.use_extended_timestamp {
                                self.reader.read_u32::<BigEndian>().await?
                            } else {
                                cs.time_delta
                            };
                            cs.timestamp = cs.timestamp.wrapping_add(time_delta);
                        }
                        _ => {}
                    }
                    cs.init_data();
                } else if cs.use_extended_timestamp {
                    /*continuation chunks of an extended-timestamp message
                    carry the 4-byte field again*/
                    self.reader.read_u32::<BigEndian>().await?;
                }
            }
            _ => {
                return Err(UnpackError {
                    value: UnpackErrorValue::InvalidFormat(format),
                });
            }
        }

        let size = cmp::min(cs.remain, self.max_chunk_size);
        let payload = self.reader.read_bytes(size).await?;
        cs.data.extend_from_slice(&payload[..]);

        cs.index += size;
        cs.remain -= size;
        cs.finish = cs.remain == 0;

        Ok(cs)
    }
}

#[cfg(test)]
mod tests {

    use super::ChunkUnpacketizer;
    use crate::test_utils::DuplexIO;

    #[tokio::test]
    async fn test_single_chunk_command_message() {
        let (io, _remote) = DuplexIO::pair();
        let mut unpacketizer = ChunkUnpacketizer::new(io);

        unpacketizer.extend_data(&[
            0x03, // fmt 0, csid 3
            0x00, 0x03, 0xE8, // timestamp 1000
            0x00, 0x00, 0x05, // length 5
            0x14, // type id 20
            0x00, 0x00, 0x00, 0x00, // stream id 0
            0x01, 0x02, 0x03, 0x04, 0x05,
        ]);

        let cs = unpacketizer.read_chunk().await.unwrap();
        assert!(cs.finish);
        assert_eq!(cs.csid, 3);
        assert_eq!(cs.timestamp, 1000);
        assert_eq!(cs.msg_length, 5);
        assert_eq!(cs.msg_type_id, 20);
        assert_eq!(cs.msg_stream_id, 0);
        assert_eq!(&cs.data[..], &[0x01, 0x02, 0x03, 0x04, 0x05]);
    }

    #[tokio::test]
    async fn test_interleaved_chunk_streams_complete_independently() {
        let (io, _remote) = DuplexIO::pair();
        let mut unpacketizer = ChunkUnpacketizer::new(io);
        unpacketizer.update_max_chunk_size(2);

        unpacketizer.extend_data(&[
            // csid 3, 3-byte message, first fragment
            0x03, 0x00, 0x00, 0x01, 0x00, 0x00, 0x03, 0x08, 0x01, 0x00, 0x00, 0x00, 0xA1, 0xA2,
            // csid 8, 2-byte message, first fragment
            0x08, 0x00, 0x00, 0x02, 0x00, 0x00, 0x02, 0x09, 0x01, 0x00, 0x00, 0x00, 0xB1, 0xB2,
            // csid 3 continuation
            0xC3, 0xA3, //
            // csid 8 already done? no: length 2 fits the first fragment
        ]);

        let first = unpacketizer.read_chunk().await.unwrap();
        assert_eq!(first.csid, 3);
        assert!(!first.finish);

        let second = unpacketizer.read_chunk().await.unwrap();
        assert_eq!(second.csid, 8);
        assert!(second.finish);
        assert_eq!(&second.data[..], &[0xB1, 0xB2]);

        let third = unpacketizer.read_chunk().await.unwrap();
        assert_eq!(third.csid, 3);
        assert!(third.finish);
        assert_eq!(&third.data[..], &[0xA1, 0xA2, 0xA3]);
        assert_eq!(third.timestamp, 1);
    }

    #[tokio::test]
    async fn test_extended_timestamp_is_decoded() {
        let (io, _remote) = DuplexIO::pair();
        let mut unpacketizer = ChunkUnpacketizer::new(io);

        unpacketizer.extend_data(&[
            0x04, // fmt 0, csid 4
            0xFF, 0xFF, 0xFF, // escape
            0x00, 0x00, 0x01, // length 1
            0x08, // audio
            0x01, 0x00, 0x00, 0x00, // stream id 1
            0x01, 0x00, 0x00, 0x00, // extended timestamp 0x01000000
            0xAB,
        ]);

        let cs = unpacketizer.read_chunk().await.unwrap();
        assert!(cs.finish);
        assert_eq!(cs.timestamp, 0x01000000);
        assert!(cs.use_extended_timestamp);
        assert_eq!(&cs.data[..], &[0xAB]);
    }

    #[tokio::test]
    async fn test_two_and_three_byte_basic_headers() {
        let (io, _remote) = DuplexIO::pair();
        let mut unpacketizer = ChunkUnpacketizer::new(io);

        unpacketizer.extend_data(&[
            // csid 100 = 64 + 36, 2-byte basic header
            0x00, 36, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x08, 0x00, 0x00, 0x00, 0x00, 0x11,
            // csid 400 = 64 + 336 (0x150), 3-byte basic header, little-endian
            0x01, 0x50, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x08, 0x00, 0x00, 0x00, 0x00,
            0x22,
        ]);

        let cs = unpacketizer.read_chunk().await.unwrap();
        assert_eq!(cs.csid, 100);
        assert_eq!(&cs.data[..], &[0x11]);

        let cs = unpacketizer.read_chunk().await.unwrap();
        assert_eq!(cs.csid, 400);
        assert_eq!(&cs.data[..], &[0x22]);
    }

    #[tokio::test]
    async fn test_header_mid_assembly_replaces_message() {
        let (io, _remote) = DuplexIO::pair();
        let mut unpacketizer = ChunkUnpacketizer::new(io);
        unpacketizer.update_max_chunk_size(4);

        unpacketizer.extend_data(&[
            // 8-byte message, only the first fragment ever arrives
            0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x08, 0x14, 0x00, 0x00, 0x00, 0x00, 0xDE, 0xAD,
            0xBE, 0xEF, //
            // a fresh 2-byte message on the same csid
            0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x14, 0x00, 0x00, 0x00, 0x00, 0xCA, 0xFE,
        ]);

        let cs = unpacketizer.read_chunk().await.unwrap();
        assert!(!cs.finish);
        assert_eq!(cs.remain, 4);

        let cs = unpacketizer.read_chunk().await.unwrap();
        assert!(cs.finish);
        assert_eq!(&cs.data[..], &[0xCA, 0xFE]);
    }

    #[tokio::test]
    async fn test_zero_length_message_completes_immediately() {
        let (io, _remote) = DuplexIO::pair();
        let mut unpacketizer = ChunkUnpacketizer::new(io);

        unpacketizer.extend_data(&[
            0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x14, 0x00, 0x00, 0x00, 0x00,
        ]);

        let cs = unpacketizer.read_chunk().await.unwrap();
        assert!(cs.finish);
        assert_eq!(cs.data.len(), 0);
    }

    #[tokio::test]
    async fn test_fmt3_repeat_reuses_previous_header() {
        let (io, _remote) = DuplexIO::pair();
        let mut unpacketizer = ChunkUnpacketizer::new(io);

        unpacketizer.extend_data(&[
            // fmt 1 on a fresh stream: delta 5, 1-byte audio message
            0x43, 0x00, 0x00, 0x05, 0x00, 0x00, 0x01, 0x08, 0x31, //
            // fmt 3 repeat: same length/type, delta applied again
            0xC3, 0x32, //
            0xC3, 0x33,
        ]);

        let cs = unpacketizer.read_chunk().await.unwrap();
        assert!(cs.finish);
        assert_eq!(cs.timestamp, 5);
        assert_eq!(&cs.data[..], &[0x31]);

        let cs = unpacketizer.read_chunk().await.unwrap();
        assert!(cs.finish);
        assert_eq!(cs.timestamp, 10);
        assert_eq!(&cs.data[..], &[0x32]);

        let cs = unpacketizer.read_chunk().await.unwrap();
        assert!(cs.finish);
        assert_eq!(cs.timestamp, 15);
        assert_eq!(&cs.data[..], &[0x33]);
    }
}
