use {
    super::{
        define::{msg_type_id, RtmpMessageData},
        errors::{MessageError, MessageErrorValue},
    },
    crate::amf0::{amf0_markers, amf0_reader::Amf0Reader},
    crate::chunk::ChunkInfo,
    crate::protocol_control_messages::reader::ProtocolControlMessageReader,
    bytesio::bytes_reader::BytesReader,
};

pub struct MessageParser {
    chunk_info: ChunkInfo,
}

impl MessageParser {
    pub fn new(chunk_info: ChunkInfo) -> Self {
        Self { chunk_info }
    }

    pub fn parse(&mut self) -> Result<RtmpMessageData, MessageError> {
        let mut reader = BytesReader::new(self.chunk_info.payload.clone());

        match self.chunk_info.message_header.msg_type_id {
            msg_type_id::COMMAND_AMF0 | msg_type_id::COMMAND_AMF3 => {
                if self.chunk_info.message_header.msg_type_id == msg_type_id::COMMAND_AMF3 {
                    /*one prefix byte before the AMF0-encoded body*/
                    reader.read_u8()?;
                }
                let mut amf_reader = Amf0Reader::new(reader);

                let command_name = amf_reader.read_expecting(amf0_markers::STRING)?;
                let transaction_id = amf_reader.read_expecting(amf0_markers::NUMBER)?;

                /*the third value is an object or null*/
                let command_obj_raw = amf_reader.read_expecting(amf0_markers::OBJECT);
                let command_object = match command_obj_raw {
                    Ok(val) => val,
                    Err(_) => amf_reader.read_expecting(amf0_markers::NULL)?,
                };

                let others = amf_reader.read_all()?;

                Ok(RtmpMessageData::Amf0Command {
                    command_name,
                    transaction_id,
                    command_object,
                    others,
                })
            }

            msg_type_id::AUDIO => Ok(RtmpMessageData::AudioData {
                data: self.chunk_info.payload.clone(),
            }),
            msg_type_id::VIDEO => Ok(RtmpMessageData::VideoData {
                data: self.chunk_info.payload.clone(),
            }),

            msg_type_id::DATA_AMF0 | msg_type_id::DATA_AMF3 => Ok(RtmpMessageData::AmfData {
                raw_data: self.chunk_info.payload.clone(),
            }),

            msg_type_id::SET_CHUNK_SIZE => {
                let chunk_size = ProtocolControlMessageReader::new(reader).read_set_chunk_size()?;
                Ok(RtmpMessageData::SetChunkSize { chunk_size })
            }
            msg_type_id::ABORT => {
                let chunk_stream_id =
                    ProtocolControlMessageReader::new(reader).read_abort_message()?;
                Ok(RtmpMessageData::AbortMessage { chunk_stream_id })
            }
            msg_type_id::ACKNOWLEDGEMENT => {
                let sequence_number =
                    ProtocolControlMessageReader::new(reader).read_acknowledgement()?;
                Ok(RtmpMessageData::Acknowledgement { sequence_number })
            }
            msg_type_id::WIN_ACKNOWLEDGEMENT_SIZE => {
                let size =
                    ProtocolControlMessageReader::new(reader).read_window_acknowledgement_size()?;
                Ok(RtmpMessageData::WindowAcknowledgementSize { size })
            }
            msg_type_id::SET_PEER_BANDWIDTH => {
                let properties =
                    ProtocolControlMessageReader::new(reader).read_set_peer_bandwidth()?;
                Ok(RtmpMessageData::SetPeerBandwidth { properties })
            }

            msg_type_id::USER_CONTROL_EVENT
            | msg_type_id::SHARED_OBJ_AMF0
            | msg_type_id::SHARED_OBJ_AMF3
            | msg_type_id::AGGREGATE => Ok(RtmpMessageData::Unknow),

            unknown => Err(MessageError {
                value: MessageErrorValue::UnknowMessageType(unknown),
            }),
        }
    }
}
