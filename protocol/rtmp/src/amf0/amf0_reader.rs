use {
    super::{
        define::{amf0_markers, Amf0ValueType},
        errors::{Amf0ReadError, Amf0ReadErrorValue},
    },
    byteorder::BigEndian,
    bytes::BytesMut,
    bytesio::bytes_reader::BytesReader,
    indexmap::IndexMap,
};

/// AMF0 value decoder. Values are self-describing: a one-byte marker
/// followed by the marker-specific encoding.
pub struct Amf0Reader {
    reader: BytesReader,
}

impl Amf0Reader {
    pub fn new(reader: BytesReader) -> Self {
        Self { reader }
    }

    /// Decode every value remaining in the buffer, in order.
    pub fn read_all(&mut self) -> Result<Vec<Amf0ValueType>, Amf0ReadError> {
        let mut values = vec![];

        while !self.reader.is_empty() {
            values.push(self.read_any()?);
        }

        Ok(values)
    }

    /// Decode the next value, whatever its marker.
    pub fn read_any(&mut self) -> Result<Amf0ValueType, Amf0ReadError> {
        let marker = self.reader.read_u8()?;
        self.read_value(marker)
    }

    /// Decode the next value only if it carries the given marker. On a
    /// mismatch nothing is consumed, so the caller can probe for an
    /// alternative encoding.
    pub fn read_expecting(&mut self, marker: u8) -> Result<Amf0ValueType, Amf0ReadError> {
        let found = self.peek_marker()?;

        if found != marker {
            return Err(Amf0ReadError {
                value: Amf0ReadErrorValue::TypeMismatch {
                    expected: marker,
                    found,
                },
            });
        }

        self.read_any()
    }

    pub fn extract_remaining_bytes(&mut self) -> BytesMut {
        self.reader.extract_remaining_bytes()
    }

    fn peek_marker(&self) -> Result<u8, Amf0ReadError> {
        Ok(self.reader.get(0)?)
    }

    fn read_value(&mut self, marker: u8) -> Result<Amf0ValueType, Amf0ReadError> {
        let value = match marker {
            amf0_markers::NUMBER => Amf0ValueType::Number(self.reader.read_f64::<BigEndian>()?),
            amf0_markers::BOOLEAN => Amf0ValueType::Boolean(self.reader.read_u8()? != 0),
            amf0_markers::STRING => {
                let length = self.reader.read_u16::<BigEndian>()? as usize;
                Amf0ValueType::UTF8String(self.read_utf8(length)?)
            }
            amf0_markers::OBJECT => Amf0ValueType::Object(self.read_properties()?),
            amf0_markers::NULL => Amf0ValueType::Null,
            amf0_markers::ECMA_ARRAY => {
                let declared = self.reader.read_u32::<BigEndian>()?;
                let properties = self.read_properties()?;

                //some encoders put a wrong entry count here, the end marker
                //is what actually terminates the array
                if declared != properties.len() as u32 {
                    log::warn!(
                        "ecma array declared {} entries but carried {}",
                        declared,
                        properties.len()
                    );
                }

                Amf0ValueType::EcmaArray(properties)
            }
            amf0_markers::LONG_STRING => {
                let length = self.reader.read_u32::<BigEndian>()? as usize;
                Amf0ValueType::LongUTF8String(self.read_utf8(length)?)
            }
            other => {
                return Err(Amf0ReadError {
                    value: Amf0ReadErrorValue::UnexpectedMarker(other),
                });
            }
        };

        Ok(value)
    }

    /// Key/value run shared by objects and ecma arrays. The run ends with
    /// an empty key followed by the object-end marker.
    fn read_properties(&mut self) -> Result<IndexMap<String, Amf0ValueType>, Amf0ReadError> {
        let mut properties = IndexMap::new();

        loop {
            let length = self.reader.read_u16::<BigEndian>()? as usize;

            if length == 0 {
                let end = self.reader.read_u8()?;
                if end != amf0_markers::OBJECT_END {
                    return Err(Amf0ReadError {
                        value: Amf0ReadErrorValue::UnexpectedMarker(end),
                    });
                }
                break;
            }

            let key = self.read_utf8(length)?;
            let value = self.read_any()?;
            properties.insert(key, value);
        }

        Ok(properties)
    }

    fn read_utf8(&mut self, length: usize) -> Result<String, Amf0ReadError> {
        let bytes = self.reader.read_bytes(length)?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}

#[cfg(test)]
mod tests {

    use super::Amf0Reader;
    use crate::amf0::amf0_writer::Amf0Writer;
    use crate::amf0::define::{amf0_markers, Amf0ValueType};

    use bytes::BytesMut;
    use bytesio::bytes_reader::BytesReader;
    use indexmap::IndexMap;

    fn reader_over(data: &[u8]) -> Amf0Reader {
        let mut bytes_reader = BytesReader::new(BytesMut::new());
        bytes_reader.extend_from_slice(data);
        Amf0Reader::new(bytes_reader)
    }

    #[test]
    fn test_read_connect_command() {
        // "connect", transaction id 1, {app: "live", fpad: false}
        let data: [u8; 43] = [
            0x02, 0x00, 0x07, b'c', b'o', b'n', b'n', b'e', b'c', b't', //
            0x00, 0x3f, 0xf0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
            0x03, //
            0x00, 0x03, b'a', b'p', b'p', 0x02, 0x00, 0x04, b'l', b'i', b'v', b'e', //
            0x00, 0x04, b'f', b'p', b'a', b'd', 0x01, 0x00, //
            0x00, 0x00, 0x09,
        ];

        let mut amf_reader = reader_over(&data);

        let command_name = amf_reader.read_expecting(amf0_markers::STRING).unwrap();
        assert_eq!(
            command_name,
            Amf0ValueType::UTF8String(String::from("connect"))
        );

        let transaction_id = amf_reader.read_expecting(amf0_markers::NUMBER).unwrap();
        assert_eq!(transaction_id, Amf0ValueType::Number(1.0));

        let command_obj = amf_reader.read_expecting(amf0_markers::OBJECT).unwrap();

        let mut properties = IndexMap::new();
        properties.insert(
            String::from("app"),
            Amf0ValueType::UTF8String(String::from("live")),
        );
        properties.insert(String::from("fpad"), Amf0ValueType::Boolean(false));
        assert_eq!(command_obj, Amf0ValueType::Object(properties));
    }

    #[test]
    fn test_type_mismatch_does_not_consume() {
        let data: [u8; 9] = [0x00, 0x3f, 0xf0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

        let mut amf_reader = reader_over(&data);

        assert!(amf_reader.read_expecting(amf0_markers::STRING).is_err());
        // the probe must not have consumed the value
        assert_eq!(
            amf_reader.read_expecting(amf0_markers::NUMBER).unwrap(),
            Amf0ValueType::Number(1.0)
        );
    }

    #[test]
    fn test_read_ecma_array() {
        let data: [u8; 17] = [
            0x08, // ecma array
            0x00, 0x00, 0x00, 0x01, // one entry
            0x00, 0x01, b'k', 0x00, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        ];
        // termination comes from the end marker, not the count
        let mut bytes = data.to_vec();
        bytes.extend_from_slice(&[0x00, 0x00, 0x09]);

        let mut amf_reader = reader_over(&bytes);

        match amf_reader.read_any().unwrap() {
            Amf0ValueType::EcmaArray(properties) => {
                assert_eq!(properties.get("k"), Some(&Amf0ValueType::Number(2.0)));
            }
            _ => panic!("expected an ecma array"),
        }
    }

    #[test]
    fn test_writer_output_reads_back() {
        let mut writer = Amf0Writer::new();
        writer.write_string(&String::from("onStatus")).unwrap();
        writer.write_number(&0.0).unwrap();
        writer.write_null().unwrap();

        let mut properties = IndexMap::new();
        properties.insert(
            String::from("code"),
            Amf0ValueType::UTF8String(String::from("NetStream.Publish.Start")),
        );
        writer.write_object(&properties).unwrap();

        let mut bytes_reader = BytesReader::new(BytesMut::new());
        bytes_reader.extend_from_slice(&writer.extract_current_bytes()[..]);
        let mut amf_reader = Amf0Reader::new(bytes_reader);

        let values = amf_reader.read_all().unwrap();
        assert_eq!(values.len(), 4);
        assert_eq!(
            values[0],
            Amf0ValueType::UTF8String(String::from("onStatus"))
        );
        assert_eq!(values[1], Amf0ValueType::Number(0.0));
        assert_eq!(values[2], Amf0ValueType::Null);
        match &values[3] {
            Amf0ValueType::Object(obj) => {
                assert_eq!(
                    obj.get("code"),
                    Some(&Amf0ValueType::UTF8String(String::from(
                        "NetStream.Publish.Start"
                    )))
                );
            }
            _ => panic!("expected an object"),
        }
    }
}
