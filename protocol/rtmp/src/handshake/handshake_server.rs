use {
    super::{
        define,
        define::{SchemaVersion, ServerHandshakeState},
        digest::DigestProcessor,
        errors::{HandshakeError, HandshakeErrorValue},
        handshake_trait::THandshakeServer,
    },
    byteorder::{BigEndian, ByteOrder},
    bytes::BytesMut,
    bytesio::{
        bytes_reader::{AsyncBytesReader, BytesReader},
        bytes_writer::{AsyncBytesWriter, BytesWriter},
        bytesio::TNetIO,
    },
    std::sync::Arc,
    tokio::sync::Mutex,
};

/// The byte-copy handshake used by clients whose C1 version field is zero.
/// S1 echoes C1; S2 echoes the C2 buffer as it stands at write time, which
/// is 1536 zero bytes since C2 has not been received yet.
pub struct SimpleHandshakeServer {
    reader: BytesReader,
    writer: AsyncBytesWriter,
    pub state: ServerHandshakeState,

    c1_bytes: BytesMut,
}

/// The digest handshake introduced by Flash Media Server. C1 carries an
/// HMAC-SHA256 digest that is located by schema, validated against the
/// client partial key, and answered with a signed S1 and a witnessed S2.
pub struct ComplexHandshakeServer {
    reader: BytesReader,
    writer: AsyncBytesWriter,
    pub state: ServerHandshakeState,

    c1_digest: BytesMut,
    c1_timestamp: u32,
    c1_schema: SchemaVersion,
}

impl SimpleHandshakeServer {
    pub fn new(io: Arc<Mutex<Box<dyn TNetIO + Send + Sync>>>) -> Self {
        Self {
            reader: BytesReader::new(BytesMut::new()),
            writer: AsyncBytesWriter::new(io),
            state: ServerHandshakeState::ReadC0C1,

            c1_bytes: BytesMut::new(),
        }
    }

    pub fn extend_data(&mut self, data: &[u8]) {
        self.reader.extend_from_slice(data);
    }

    pub async fn handshake(&mut self) -> Result<(), HandshakeError> {
        loop {
            match self.state {
                ServerHandshakeState::ReadC0C1 => {
                    log::info!("[ S<-C ] [simple handshake] read C0C1");
                    self.read_c0()?;
                    self.read_c1()?;
                    self.state = ServerHandshakeState::WriteS0S1S2;
                }

                ServerHandshakeState::WriteS0S1S2 => {
                    log::info!("[ S->C ] [simple handshake] write S0S1S2");
                    self.write_s0()?;
                    self.write_s1()?;
                    self.write_s2()?;
                    self.writer.flush().await?;
                    self.state = ServerHandshakeState::ReadC2;
                    break;
                }

                ServerHandshakeState::ReadC2 => {
                    log::info!("[ S<-C ] [simple handshake] read C2");
                    self.read_c2()?;
                    self.state = ServerHandshakeState::Finish;
                }

                ServerHandshakeState::Finish => {
                    log::info!("simple handshake successfully..");
                    break;
                }
            }
        }

        Ok(())
    }
}

impl THandshakeServer for SimpleHandshakeServer {
    fn read_c0(&mut self) -> Result<(), HandshakeError> {
        self.reader.read_u8()?;
        Ok(())
    }

    fn read_c1(&mut self) -> Result<(), HandshakeError> {
        self.c1_bytes = self.reader.read_bytes(define::RTMP_HANDSHAKE_SIZE)?;
        Ok(())
    }

    fn read_c2(&mut self) -> Result<(), HandshakeError> {
        self.reader.read_bytes(define::RTMP_HANDSHAKE_SIZE)?;
        Ok(())
    }

    fn write_s0(&mut self) -> Result<(), HandshakeError> {
        self.writer.write_u8(define::RTMP_VERSION)?;
        Ok(())
    }

    fn write_s1(&mut self) -> Result<(), HandshakeError> {
        self.writer.write(&self.c1_bytes.clone()[..])?;
        Ok(())
    }

    fn write_s2(&mut self) -> Result<(), HandshakeError> {
        self.writer.write(&[0u8; define::RTMP_HANDSHAKE_SIZE])?;
        Ok(())
    }
}

impl ComplexHandshakeServer {
    pub fn new(io: Arc<Mutex<Box<dyn TNetIO + Send + Sync>>>) -> Self {
        Self {
            reader: BytesReader::new(BytesMut::new()),
            writer: AsyncBytesWriter::new(io),
            state: ServerHandshakeState::ReadC0C1,

            c1_digest: BytesMut::new(),
            c1_timestamp: 0,
            c1_schema: SchemaVersion::Schema1,
        }
    }

    pub fn extend_data(&mut self, data: &[u8]) {
        self.reader.extend_from_slice(data);
    }

    pub async fn handshake(&mut self) -> Result<(), HandshakeError> {
        loop {
            match self.state {
                ServerHandshakeState::ReadC0C1 => {
                    log::info!("[ S<-C ] [complex handshake] read C0C1");
                    self.read_c0()?;
                    self.read_c1()?;
                    self.state = ServerHandshakeState::WriteS0S1S2;
                }

                ServerHandshakeState::WriteS0S1S2 => {
                    log::info!("[ S->C ] [complex handshake] write S0S1S2");
                    self.write_s0()?;
                    self.write_s1()?;
                    self.write_s2()?;
                    self.writer.flush().await?;
                    self.state = ServerHandshakeState::ReadC2;
                    break;
                }

                ServerHandshakeState::ReadC2 => {
                    log::info!("[ S<-C ] [complex handshake] read C2");
                    self.read_c2()?;
                    self.state = ServerHandshakeState::Finish;
                }

                ServerHandshakeState::Finish => {
                    log::info!("complex handshake successfully..");
                    break;
                }
            }
        }

        Ok(())
    }
}

impl THandshakeServer for ComplexHandshakeServer {
    fn read_c0(&mut self) -> Result<(), HandshakeError> {
        self.reader.read_u8()?;
        Ok(())
    }

    fn read_c1(&mut self) -> Result<(), HandshakeError> {
        let c1_bytes = self.reader.read_bytes(define::RTMP_HANDSHAKE_SIZE)?;

        self.c1_timestamp = BytesReader::new(c1_bytes.clone()).read_u32::<BigEndian>()?;

        let mut key = BytesMut::new();
        key.extend_from_slice(define::RTMP_CLIENT_KEY_FIRST_HALF.as_bytes());

        let mut digest_processor = DigestProcessor::new(c1_bytes, key);
        let (digest_content, schema) = match digest_processor.read_digest() {
            Ok(rv) => rv,
            Err(_) => {
                return Err(HandshakeError {
                    value: HandshakeErrorValue::DigestNotFound,
                });
            }
        };

        self.c1_digest = digest_content;
        self.c1_schema = schema;

        Ok(())
    }

    fn read_c2(&mut self) -> Result<(), HandshakeError> {
        // C2 is not validated; the witness the client checks rides in S2.
        self.reader.read_bytes(define::RTMP_HANDSHAKE_SIZE)?;
        Ok(())
    }

    fn write_s0(&mut self) -> Result<(), HandshakeError> {
        self.writer.write_u8(define::RTMP_VERSION)?;
        Ok(())
    }

    fn write_s1(&mut self) -> Result<(), HandshakeError> {
        let mut writer = BytesWriter::new();

        writer.write_u32::<BigEndian>(self.c1_timestamp)?;
        writer.write_u32::<BigEndian>(define::RTMP_SERVER_VERSION)?;
        writer.write_random_bytes(define::RTMP_HANDSHAKE_SIZE as u32 - 8)?;

        let mut key = BytesMut::new();
        key.extend_from_slice(define::RTMP_SERVER_KEY_FIRST_HALF.as_bytes());

        let mut digest_processor = DigestProcessor::new(writer.extract_current_bytes(), key);
        let content = digest_processor.generate_and_fill_digest(self.c1_schema)?;

        self.writer.write(&content[..])?;
        Ok(())
    }

    fn write_s2(&mut self) -> Result<(), HandshakeError> {
        let mut writer = BytesWriter::new();
        writer.write_random_bytes(define::RTMP_HANDSHAKE_SIZE as u32)?;

        /*key the witness with the validated C1 digest*/
        let mut key = BytesMut::new();
        key.extend_from_slice(&define::RTMP_SERVER_KEY);

        let mut key_processor = DigestProcessor::new(BytesMut::new(), key);
        let witness_key = key_processor.make_digest(Vec::from(&self.c1_digest[..]))?;

        let mut data = BytesMut::new();
        data.extend_from_slice(&writer.get_current_bytes()[..define::RTMP_HANDSHAKE_SIZE - 32]);

        let mut digest_processor = DigestProcessor::new(BytesMut::new(), witness_key);
        let digest = digest_processor.make_digest(Vec::from(&data[..]))?;

        let content = [data, digest].concat();

        self.writer.write(&content[..])?;

        Ok(())
    }
}

/// Front of the server handshake. Reads C0C1 once, validates the version
/// byte, and dispatches on the C1 version field: zero selects the simple
/// byte-copy variant, anything else the digest variant. A digest that
/// validates under neither schema is fatal.
pub struct HandshakeServer {
    reader: AsyncBytesReader,
    simple_handshaker: SimpleHandshakeServer,
    complex_handshaker: ComplexHandshakeServer,
    is_complex: bool,
}

impl HandshakeServer {
    pub fn new(io: Arc<Mutex<Box<dyn TNetIO + Send + Sync>>>) -> Self {
        Self {
            reader: AsyncBytesReader::new(io.clone()),
            simple_handshaker: SimpleHandshakeServer::new(io.clone()),
            complex_handshaker: ComplexHandshakeServer::new(io),
            is_complex: false,
        }
    }

    pub fn state(&self) -> ServerHandshakeState {
        if self.is_complex {
            self.complex_handshaker.state
        } else {
            self.simple_handshaker.state
        }
    }

    /// Bytes the client pipelined behind C2; they belong to the chunk layer.
    pub fn get_remaining_bytes(&mut self) -> BytesMut {
        self.reader.extract_remaining_bytes()
    }

    pub async fn handshake(&mut self) -> Result<(), HandshakeError> {
        let c0c1 = self
            .reader
            .read_bytes(define::RTMP_HANDSHAKE_SIZE + 1)
            .await?;

        if c0c1[0] != define::RTMP_VERSION {
            return Err(HandshakeError {
                value: HandshakeErrorValue::C0VersionNotCorrect,
            });
        }

        /*C1 bytes [4..8) select the variant*/
        let client_version = BigEndian::read_u32(&c0c1[5..9]);
        self.is_complex = client_version != 0;

        match self.is_complex {
            true => {
                self.complex_handshaker.extend_data(&c0c1[..]);
                self.complex_handshaker.handshake().await?;

                let c2 = self.reader.read_bytes(define::RTMP_HANDSHAKE_SIZE).await?;
                self.complex_handshaker.extend_data(&c2[..]);
                self.complex_handshaker.handshake().await?;
            }
            false => {
                self.simple_handshaker.extend_data(&c0c1[..]);
                self.simple_handshaker.handshake().await?;

                let c2 = self.reader.read_bytes(define::RTMP_HANDSHAKE_SIZE).await?;
                self.simple_handshaker.extend_data(&c2[..]);
                self.simple_handshaker.handshake().await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use super::HandshakeServer;
    use crate::handshake::define;
    use crate::handshake::define::{SchemaVersion, ServerHandshakeState};
    use crate::handshake::digest::DigestProcessor;
    use crate::test_utils::DuplexIO;

    use bytes::BytesMut;
    use bytesio::bytes_reader::AsyncBytesReader;
    use bytesio::bytes_writer::{AsyncBytesWriter, BytesWriter};

    #[tokio::test]
    async fn test_simple_handshake_echoes_c1() {
        let (server_io, client_io) = DuplexIO::pair();

        let mut handshaker = HandshakeServer::new(server_io);
        let server = tokio::spawn(async move {
            handshaker.handshake().await.unwrap();
            handshaker.state()
        });

        let mut writer = AsyncBytesWriter::new(client_io.clone());
        let mut reader = AsyncBytesReader::new(client_io);

        /*C0 + all-zero C1: the zero version field selects the simple path*/
        writer.write_u8(define::RTMP_VERSION).unwrap();
        writer.write(&[0u8; define::RTMP_HANDSHAKE_SIZE]).unwrap();
        writer.flush().await.unwrap();

        let s0s1s2 = reader
            .read_bytes(define::RTMP_HANDSHAKE_SIZE * 2 + 1)
            .await
            .unwrap();
        assert_eq!(s0s1s2[0], define::RTMP_VERSION);
        assert_eq!(
            &s0s1s2[1..define::RTMP_HANDSHAKE_SIZE + 1],
            &[0u8; define::RTMP_HANDSHAKE_SIZE][..]
        );
        assert_eq!(
            &s0s1s2[define::RTMP_HANDSHAKE_SIZE + 1..],
            &[0u8; define::RTMP_HANDSHAKE_SIZE][..]
        );

        writer.write(&[0u8; define::RTMP_HANDSHAKE_SIZE]).unwrap();
        writer.flush().await.unwrap();

        assert_eq!(server.await.unwrap(), ServerHandshakeState::Finish);
    }

    #[tokio::test]
    async fn test_complex_handshake_signs_s1_and_s2() {
        let (server_io, client_io) = DuplexIO::pair();

        let mut handshaker = HandshakeServer::new(server_io);
        let server = tokio::spawn(async move {
            handshaker.handshake().await.unwrap();
            handshaker.state()
        });

        /*craft a digest-bearing C1*/
        let mut c1_writer = BytesWriter::new();
        c1_writer.write_u32::<byteorder::BigEndian>(0).unwrap();
        c1_writer
            .write_u32::<byteorder::BigEndian>(0x80000702)
            .unwrap();
        c1_writer
            .write_random_bytes(define::RTMP_HANDSHAKE_SIZE as u32 - 8)
            .unwrap();

        let mut client_key = BytesMut::new();
        client_key.extend_from_slice(define::RTMP_CLIENT_KEY_FIRST_HALF.as_bytes());
        let mut c1_filler =
            DigestProcessor::new(c1_writer.extract_current_bytes(), client_key.clone());
        let c1 = c1_filler
            .generate_and_fill_digest(SchemaVersion::Schema1)
            .unwrap();

        let mut writer = AsyncBytesWriter::new(client_io.clone());
        let mut reader = AsyncBytesReader::new(client_io);

        writer.write_u8(define::RTMP_VERSION).unwrap();
        writer.write(&c1[..]).unwrap();
        writer.flush().await.unwrap();

        let s0s1s2 = reader
            .read_bytes(define::RTMP_HANDSHAKE_SIZE * 2 + 1)
            .await
            .unwrap();
        assert_eq!(s0s1s2[0], define::RTMP_VERSION);

        /*S1 must carry a valid digest under the server partial key, placed
        by the schema the client used*/
        let s1 = BytesMut::from(&s0s1s2[1..define::RTMP_HANDSHAKE_SIZE + 1]);
        let mut server_key = BytesMut::new();
        server_key.extend_from_slice(define::RTMP_SERVER_KEY_FIRST_HALF.as_bytes());
        let mut s1_validator = DigestProcessor::new(s1, server_key);
        let (_, schema) = s1_validator.read_digest().unwrap();
        assert_eq!(schema, SchemaVersion::Schema1);

        /*S2's trailing 32 bytes witness the validated C1 digest*/
        let s2 = &s0s1s2[define::RTMP_HANDSHAKE_SIZE + 1..];
        let mut c1_validator = DigestProcessor::new(BytesMut::from(&c1[..]), client_key);
        let (c1_digest, _) = c1_validator.read_digest().unwrap();

        let mut full_key = BytesMut::new();
        full_key.extend_from_slice(&define::RTMP_SERVER_KEY);
        let mut key_processor = DigestProcessor::new(BytesMut::new(), full_key);
        let witness_key = key_processor.make_digest(Vec::from(&c1_digest[..])).unwrap();

        let mut witness_processor = DigestProcessor::new(BytesMut::new(), witness_key);
        let expected = witness_processor
            .make_digest(Vec::from(&s2[..define::RTMP_HANDSHAKE_SIZE - 32]))
            .unwrap();
        assert_eq!(&s2[define::RTMP_HANDSHAKE_SIZE - 32..], &expected[..]);

        writer.write(&[0u8; define::RTMP_HANDSHAKE_SIZE]).unwrap();
        writer.flush().await.unwrap();

        assert_eq!(server.await.unwrap(), ServerHandshakeState::Finish);
    }

    #[tokio::test]
    async fn test_bad_version_byte_is_fatal() {
        let (server_io, client_io) = DuplexIO::pair();

        let mut handshaker = HandshakeServer::new(server_io);
        let server = tokio::spawn(async move { handshaker.handshake().await });

        let mut writer = AsyncBytesWriter::new(client_io);
        writer.write_u8(0x06).unwrap();
        writer.write(&[0u8; define::RTMP_HANDSHAKE_SIZE]).unwrap();
        writer.flush().await.unwrap();

        assert!(server.await.unwrap().is_err());
    }
}
