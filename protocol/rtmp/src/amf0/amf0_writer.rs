use {
    super::{
        define::{amf0_markers, Amf0ValueType},
        errors::{Amf0WriteError, Amf0WriteErrorValue},
    },
    byteorder::BigEndian,
    bytes::BytesMut,
    bytesio::bytes_writer::BytesWriter,
    indexmap::IndexMap,
};

/// AMF0 value encoder. Encoded values accumulate in an internal buffer
/// until the caller extracts them as a message payload.
#[derive(Default)]
pub struct Amf0Writer {
    writer: BytesWriter,
}

impl Amf0Writer {
    pub fn new() -> Self {
        Self {
            writer: BytesWriter::new(),
        }
    }

    pub fn write_anys(&mut self, values: &[Amf0ValueType]) -> Result<(), Amf0WriteError> {
        for value in values {
            self.write_any(value)?;
        }

        Ok(())
    }

    pub fn write_any(&mut self, value: &Amf0ValueType) -> Result<(), Amf0WriteError> {
        match value {
            Amf0ValueType::Number(val) => self.write_number(val),
            Amf0ValueType::Boolean(val) => self.write_bool(val),
            Amf0ValueType::UTF8String(val) => self.write_string(val),
            Amf0ValueType::Object(val) => self.write_object(val),
            Amf0ValueType::Null => self.write_null(),
            Amf0ValueType::EcmaArray(val) => self.write_ecma_array(val),
            Amf0ValueType::LongUTF8String(val) => self.write_long_string(val),
        }
    }

    pub fn write_number(&mut self, value: &f64) -> Result<(), Amf0WriteError> {
        self.writer.write_u8(amf0_markers::NUMBER)?;
        self.writer.write_f64::<BigEndian>(*value)?;
        Ok(())
    }

    pub fn write_bool(&mut self, value: &bool) -> Result<(), Amf0WriteError> {
        self.writer.write_u8(amf0_markers::BOOLEAN)?;
        self.writer.write_u8(u8::from(*value))?;
        Ok(())
    }

    pub fn write_string(&mut self, value: &str) -> Result<(), Amf0WriteError> {
        self.writer.write_u8(amf0_markers::STRING)?;
        self.write_key(value)?;
        Ok(())
    }

    pub fn write_long_string(&mut self, value: &str) -> Result<(), Amf0WriteError> {
        self.writer.write_u8(amf0_markers::LONG_STRING)?;
        self.writer.write_u32::<BigEndian>(value.len() as u32)?;
        self.writer.write(value.as_bytes())?;
        Ok(())
    }

    pub fn write_null(&mut self) -> Result<(), Amf0WriteError> {
        self.writer.write_u8(amf0_markers::NULL)?;
        Ok(())
    }

    pub fn write_object(
        &mut self,
        properties: &IndexMap<String, Amf0ValueType>,
    ) -> Result<(), Amf0WriteError> {
        self.writer.write_u8(amf0_markers::OBJECT)?;
        self.write_properties(properties)
    }

    pub fn write_ecma_array(
        &mut self,
        properties: &IndexMap<String, Amf0ValueType>,
    ) -> Result<(), Amf0WriteError> {
        self.writer.write_u8(amf0_markers::ECMA_ARRAY)?;
        self.writer
            .write_u32::<BigEndian>(properties.len() as u32)?;
        self.write_properties(properties)
    }

    /// Key/value run shared by objects and ecma arrays, closed by an empty
    /// key and the object-end marker.
    fn write_properties(
        &mut self,
        properties: &IndexMap<String, Amf0ValueType>,
    ) -> Result<(), Amf0WriteError> {
        for (key, value) in properties {
            self.write_key(key)?;
            self.write_any(value)?;
        }

        self.write_key("")?;
        self.writer.write_u8(amf0_markers::OBJECT_END)?;
        Ok(())
    }

    fn write_key(&mut self, key: &str) -> Result<(), Amf0WriteError> {
        if key.len() > u16::MAX as usize {
            return Err(Amf0WriteError {
                value: Amf0WriteErrorValue::StringTooLong(key.len()),
            });
        }

        self.writer.write_u16::<BigEndian>(key.len() as u16)?;
        self.writer.write(key.as_bytes())?;
        Ok(())
    }

    pub fn extract_current_bytes(&mut self) -> BytesMut {
        self.writer.extract_current_bytes()
    }

    pub fn get_current_bytes(&self) -> BytesMut {
        self.writer.get_current_bytes()
    }

    pub fn len(&self) -> usize {
        self.writer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
