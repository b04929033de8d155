/// The RTMP wire version carried by C0/S0. Only 3 is spoken here.
pub const RTMP_VERSION: u8 = 3;

/// Size of each of the C1/S1 and C2/S2 handshake packets.
pub const RTMP_HANDSHAKE_SIZE: usize = 1536;

/// The HMAC-SHA256 digest embedded in C1/S1/S2 is always 32 bytes.
pub const RTMP_DIGEST_LENGTH: usize = 32;

/// Server version field of S1. Flash Media Server answers 0x04050001 and
/// clients key their digest handling off a nonzero value here.
pub const RTMP_SERVER_VERSION: u32 = 0x0405_0001;

/// First half of the client key; the part used to verify the C1 digest.
pub const RTMP_CLIENT_KEY_FIRST_HALF: &str = "Genuine Adobe Flash Player 001";

/// First half of the server key; the part used to sign the S1 digest.
pub const RTMP_SERVER_KEY_FIRST_HALF: &str = "Genuine Adobe Flash Media Server 001";

/// The full 68-byte server key: the 36-byte prefix above followed by 32
/// fixed bytes. Keys the S2 witness digest.
pub const RTMP_SERVER_KEY: [u8; 68] = [
    0x47, 0x65, 0x6e, 0x75, 0x69, 0x6e, 0x65, 0x20, 0x41, 0x64, 0x6f, 0x62, 0x65, 0x20, 0x46, 0x6c,
    0x61, 0x73, 0x68, 0x20, 0x4d, 0x65, 0x64, 0x69, 0x61, 0x20, 0x53, 0x65, 0x72, 0x76, 0x65, 0x72,
    0x20, 0x30, 0x30, 0x31, 0xf0, 0xee, 0xc2, 0x4a, 0x80, 0x68, 0xbe, 0xe8, 0x2e, 0x00, 0xd0, 0xd1,
    0x02, 0x9e, 0x7e, 0x57, 0x6e, 0xec, 0x5d, 0x2d, 0x29, 0x80, 0x6f, 0xab, 0x93, 0xb8, 0xe6, 0x36,
    0xcf, 0xeb, 0x31, 0xae,
];

/// Placement of the digest inside the 1536-byte packet. Schema 1 derives the
/// offset from the four bytes right after time+version; schema 0 from the
/// four bytes at 772. Clients may use either, the server answers in kind.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SchemaVersion {
    Schema0,
    Schema1,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ServerHandshakeState {
    ReadC0C1,
    WriteS0S1S2,
    ReadC2,
    Finish,
}
