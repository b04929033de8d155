use {
    super::errors::NetConnectionError,
    crate::{
        amf0::{amf0_writer::Amf0Writer, Amf0ValueType},
        chunk::{define::chunk_type, packetizer::ChunkPacketizer, ChunkInfo},
        messages::define::msg_type_id,
    },
    bytesio::bytesio::TNetIO,
    std::sync::Arc,
    tokio::sync::Mutex,
};

/// Frames AMF0 command messages. The caller supplies the ordered values
/// (name, transaction id, command object, parameters); what they mean is the
/// caller's business.
pub struct NetConnection {
    amf0_writer: Amf0Writer,
    packetizer: ChunkPacketizer,
}

impl NetConnection {
    pub fn new(io: Arc<Mutex<Box<dyn TNetIO + Send + Sync>>>) -> Self {
        Self {
            amf0_writer: Amf0Writer::new(),
            packetizer: ChunkPacketizer::new(io),
        }
    }

    pub async fn write_command(
        &mut self,
        csid: u32,
        msg_stream_id: u32,
        values: &[Amf0ValueType],
    ) -> Result<(), NetConnectionError> {
        self.amf0_writer.write_anys(values)?;

        let data = self.amf0_writer.extract_current_bytes();
        let mut chunk_info = ChunkInfo::new(
            csid,
            chunk_type::TYPE_0,
            0,
            data.len() as u32,
            msg_type_id::COMMAND_AMF0,
            msg_stream_id,
            data,
        );

        self.packetizer.write_chunk(&mut chunk_info).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use super::NetConnection;
    use crate::amf0::Amf0ValueType;
    use crate::chunk::unpacketizer::ChunkUnpacketizer;
    use crate::messages::define::{msg_type_id, RtmpMessageData};
    use crate::messages::parser::MessageParser;
    use crate::chunk::ChunkInfo;
    use crate::test_utils::DuplexIO;

    use indexmap::IndexMap;

    #[tokio::test]
    async fn test_command_round_trip() {
        let (local, remote) = DuplexIO::pair();
        let mut netconnection = NetConnection::new(local);

        let mut properties = IndexMap::new();
        properties.insert(
            String::from("fmsVer"),
            Amf0ValueType::UTF8String(String::from("FMS/3,0,1,123")),
        );

        netconnection
            .write_command(
                3,
                0,
                &[
                    Amf0ValueType::UTF8String(String::from("_result")),
                    Amf0ValueType::Number(1.0),
                    Amf0ValueType::Object(properties),
                ],
            )
            .await
            .unwrap();

        let mut unpacketizer = ChunkUnpacketizer::new(remote);
        let cs = unpacketizer.read_chunk().await.unwrap();
        assert!(cs.finish);
        assert_eq!(cs.csid, 3);
        assert_eq!(cs.msg_type_id, msg_type_id::COMMAND_AMF0);
        assert_eq!(cs.msg_stream_id, 0);

        let chunk_info = ChunkInfo::new(
            cs.csid,
            cs.format,
            cs.timestamp,
            cs.msg_length,
            cs.msg_type_id,
            cs.msg_stream_id,
            cs.data.clone(),
        );

        match MessageParser::new(chunk_info).parse().unwrap() {
            RtmpMessageData::Amf0Command {
                command_name,
                transaction_id,
                command_object,
                others,
            } => {
                assert_eq!(
                    command_name,
                    Amf0ValueType::UTF8String(String::from("_result"))
                );
                assert_eq!(transaction_id, Amf0ValueType::Number(1.0));
                match command_object {
                    Amf0ValueType::Object(obj) => {
                        assert_eq!(
                            obj.get("fmsVer"),
                            Some(&Amf0ValueType::UTF8String(String::from("FMS/3,0,1,123")))
                        );
                    }
                    _ => panic!("expected the command object"),
                }
                assert!(others.is_empty());
            }
            _ => panic!("expected an amf0 command"),
        }
    }
}
