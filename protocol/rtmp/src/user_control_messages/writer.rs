use {
    super::{define, errors::EventMessagesError},
    crate::messages::define::msg_type_id,
    byteorder::{BigEndian, LittleEndian},
    bytesio::bytes_writer::AsyncBytesWriter,
};

/// Emits user control events: a 2-byte event type followed by the event
/// data, carried on chunk stream 2 with message stream id 1.
pub struct EventMessagesWriter {
    writer: AsyncBytesWriter,
}

impl EventMessagesWriter {
    pub fn new(writer: AsyncBytesWriter) -> Self {
        Self { writer }
    }

    fn write_event_message_header(&mut self, len: u32) -> Result<(), EventMessagesError> {
        self.writer.write_u8(0x02)?; //fmt 0, csid 2
        self.writer.write_u24::<BigEndian>(0)?; //timestamp
        self.writer.write_u24::<BigEndian>(len)?; //msg length
        self.writer.write_u8(msg_type_id::USER_CONTROL_EVENT)?;
        self.writer.write_u32::<LittleEndian>(1)?; //msg stream id 1

        Ok(())
    }

    pub async fn write_stream_begin(&mut self, stream_id: u32) -> Result<(), EventMessagesError> {
        self.write_event_message_header(6)?;
        self.writer
            .write_u16::<BigEndian>(define::RTMP_EVENT_STREAM_BEGIN)?;
        self.writer.write_u32::<BigEndian>(stream_id)?;

        self.writer.flush().await?;
        Ok(())
    }

    pub async fn write_stream_is_record(&mut self, stream_id: u32) -> Result<(), EventMessagesError> {
        self.write_event_message_header(6)?;
        self.writer
            .write_u16::<BigEndian>(define::RTMP_EVENT_STREAM_IS_RECORDED)?;
        self.writer.write_u32::<BigEndian>(stream_id)?;

        self.writer.flush().await?;
        Ok(())
    }
}
