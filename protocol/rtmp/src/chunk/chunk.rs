use bytes::BytesMut;

//5.3.1.1
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ChunkBasicHeader {
    pub format: u8,
    pub chunk_stream_id: u32,
}

impl ChunkBasicHeader {
    pub fn new(fmt: u8, csid: u32) -> ChunkBasicHeader {
        ChunkBasicHeader {
            format: fmt,
            chunk_stream_id: csid,
        }
    }
}

//5.3.1.2
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ChunkMessageHeader {
    pub timestamp: u32,
    pub msg_length: u32,
    pub msg_type_id: u8,
    pub msg_stream_id: u32,
}

impl ChunkMessageHeader {
    pub fn new(timestamp: u32, msg_length: u32, msg_type_id: u8, msg_stream_id: u32) -> Self {
        Self {
            timestamp,
            msg_length,
            msg_type_id,
            msg_stream_id,
        }
    }
}

/// A logical message on its way through the codec: the headers of its first
/// chunk plus the whole payload.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ChunkInfo {
    pub basic_header: ChunkBasicHeader,
    pub message_header: ChunkMessageHeader,
    pub payload: BytesMut,
}

impl ChunkInfo {
    pub fn new(
        csid: u32,
        format: u8,
        timestamp: u32,
        msg_length: u32,
        msg_type_id: u8,
        msg_stream_id: u32,
        payload: BytesMut,
    ) -> Self {
        Self {
            basic_header: ChunkBasicHeader::new(format, csid),
            message_header: ChunkMessageHeader::new(
                timestamp,
                msg_length,
                msg_type_id,
                msg_stream_id,
            ),
            payload,
        }
    }
}

/// Per-CSID reassembly context. One instance lives in the decoder table for
/// every chunk stream id ever seen on the connection; headers mutate it and
/// payload fragments accumulate in `data` until `remain` hits zero.
#[derive(Debug, Default)]
pub struct ChunkStream {
    pub csid: u32,
    /// Header type of the last fmt 0/1/2 chunk; fmt 3 repeats key off it.
    pub format: u8,
    pub timestamp: u32,
    /// Last timestamp delta, reapplied by fmt 3 message repeats after a
    /// fmt 1/2 header.
    pub time_delta: u32,
    pub msg_length: u32,
    pub msg_type_id: u8,
    pub msg_stream_id: u32,
    /// Whether the current message escaped to the 4-byte extended
    /// timestamp; holds for every continuation chunk of the message.
    pub use_extended_timestamp: bool,

    pub data: BytesMut,
    pub index: usize,
    pub remain: usize,
    pub finish: bool,
}

impl ChunkStream {
    pub fn new(csid: u32) -> Self {
        Self {
            csid,
            ..Default::default()
        }
    }

    /// Begin a new message of `msg_length` bytes. Any partially assembled
    /// payload is discarded; a compliant peer never causes that, but a
    /// header arriving mid-assembly must not corrupt the stream state.
    pub fn init_data(&mut self) {
        let length = self.msg_length as usize;
        self.data = BytesMut::with_capacity(length);
        self.index = 0;
        self.remain = length;
        self.finish = false;
    }
}
