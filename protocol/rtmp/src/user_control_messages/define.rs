pub const RTMP_EVENT_STREAM_BEGIN: u16 = 0;
pub const RTMP_EVENT_STREAM_IS_RECORDED: u16 = 4;
