use {
    super::{
        bytes_errors::{BytesReadError, BytesReadErrorValue},
        bytesio::TNetIO,
    },
    byteorder::{ByteOrder, ReadBytesExt},
    bytes::{BufMut, BytesMut},
    std::{io::Cursor, sync::Arc},
    tokio::sync::Mutex,
};

pub struct BytesReader {
    buffer: BytesMut,
}

impl BytesReader {
    pub fn new(input: BytesMut) -> Self {
        Self { buffer: input }
    }

    pub fn extend_from_slice(&mut self, extend: &[u8]) {
        let remaining_mut = self.buffer.remaining_mut();
        let extend_length = extend.len();

        if extend_length > remaining_mut {
            let additional = extend_length - remaining_mut;
            self.buffer.reserve(additional);
        }

        self.buffer.extend_from_slice(extend)
    }

    pub fn read_bytes(&mut self, bytes_num: usize) -> Result<BytesMut, BytesReadError> {
        if self.buffer.len() < bytes_num {
            return Err(BytesReadError {
                value: BytesReadErrorValue::NotEnoughBytes,
            });
        }
        Ok(self.buffer.split_to(bytes_num))
    }

    pub fn advance_bytes(&mut self, bytes_num: usize) -> Result<BytesMut, BytesReadError> {
        if self.buffer.len() < bytes_num {
            return Err(BytesReadError {
                value: BytesReadErrorValue::NotEnoughBytes,
            });
        }

        Ok(self.buffer.clone().split_to(bytes_num))
    }

    pub fn read_bytes_cursor(
        &mut self,
        bytes_num: usize,
    ) -> Result<Cursor<BytesMut>, BytesReadError> {
        let tmp_bytes = self.read_bytes(bytes_num)?;
        Ok(Cursor::new(tmp_bytes))
    }

    pub fn advance_bytes_cursor(
        &mut self,
        bytes_num: usize,
    ) -> Result<Cursor<BytesMut>, BytesReadError> {
        let tmp_bytes = self.advance_bytes(bytes_num)?;
        Ok(Cursor::new(tmp_bytes))
    }

    pub fn read_u8(&mut self) -> Result<u8, BytesReadError> {
        let mut cursor = self.read_bytes_cursor(1)?;
        Ok(cursor.read_u8()?)
    }

    pub fn advance_u8(&mut self) -> Result<u8, BytesReadError> {
        let mut cursor = self.advance_bytes_cursor(1)?;
        Ok(cursor.read_u8()?)
    }

    pub fn read_u16<T: ByteOrder>(&mut self) -> Result<u16, BytesReadError> {
        let mut cursor = self.read_bytes_cursor(2)?;
        Ok(cursor.read_u16::<T>()?)
    }

    pub fn read_u24<T: ByteOrder>(&mut self) -> Result<u32, BytesReadError> {
        let mut cursor = self.read_bytes_cursor(3)?;
        Ok(cursor.read_u24::<T>()?)
    }

    pub fn advance_u24<T: ByteOrder>(&mut self) -> Result<u32, BytesReadError> {
        let mut cursor = self.advance_bytes_cursor(3)?;
        Ok(cursor.read_u24::<T>()?)
    }

    pub fn read_u32<T: ByteOrder>(&mut self) -> Result<u32, BytesReadError> {
        let mut cursor = self.read_bytes_cursor(4)?;
        Ok(cursor.read_u32::<T>()?)
    }

    pub fn read_f64<T: ByteOrder>(&mut self) -> Result<f64, BytesReadError> {
        let mut cursor = self.read_bytes_cursor(8)?;
        Ok(cursor.read_f64::<T>()?)
    }

    pub fn get(&self, index: usize) -> Result<u8, BytesReadError> {
        match self.buffer.get(index) {
            Some(byte) => Ok(*byte),
            None => Err(BytesReadError {
                value: BytesReadErrorValue::IndexOutofRange,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn extract_remaining_bytes(&mut self) -> BytesMut {
        self.buffer.split_to(self.buffer.len())
    }

    pub fn get_remaining_bytes(&self) -> BytesMut {
        self.buffer.clone()
    }
}

/// Buffered reader over a network transport. Reads suspend until the
/// requested number of bytes has arrived; a closed transport surfaces as a
/// read error.
pub struct AsyncBytesReader {
    pub bytes_reader: BytesReader,
    pub io: Arc<Mutex<Box<dyn TNetIO + Send + Sync>>>,
}

impl AsyncBytesReader {
    pub fn new(io: Arc<Mutex<Box<dyn TNetIO + Send + Sync>>>) -> Self {
        Self {
            bytes_reader: BytesReader::new(BytesMut::new()),
            io,
        }
    }

    pub fn extend_from_slice(&mut self, extend: &[u8]) {
        self.bytes_reader.extend_from_slice(extend);
    }

    async fn ensure_bytes(&mut self, bytes_num: usize) -> Result<(), BytesReadError> {
        while self.bytes_reader.len() < bytes_num {
            let data = self.io.lock().await.read().await?;
            self.bytes_reader.extend_from_slice(&data[..]);
        }
        Ok(())
    }

    pub async fn read_bytes(&mut self, bytes_num: usize) -> Result<BytesMut, BytesReadError> {
        self.ensure_bytes(bytes_num).await?;
        self.bytes_reader.read_bytes(bytes_num)
    }

    pub async fn read_u8(&mut self) -> Result<u8, BytesReadError> {
        self.ensure_bytes(1).await?;
        self.bytes_reader.read_u8()
    }

    pub async fn read_u16<T: ByteOrder>(&mut self) -> Result<u16, BytesReadError> {
        self.ensure_bytes(2).await?;
        self.bytes_reader.read_u16::<T>()
    }

    pub async fn read_u24<T: ByteOrder>(&mut self) -> Result<u32, BytesReadError> {
        self.ensure_bytes(3).await?;
        self.bytes_reader.read_u24::<T>()
    }

    pub async fn read_u32<T: ByteOrder>(&mut self) -> Result<u32, BytesReadError> {
        self.ensure_bytes(4).await?;
        self.bytes_reader.read_u32::<T>()
    }

    pub fn len(&self) -> usize {
        self.bytes_reader.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes_reader.is_empty()
    }

    pub fn extract_remaining_bytes(&mut self) -> BytesMut {
        self.bytes_reader.extract_remaining_bytes()
    }
}
