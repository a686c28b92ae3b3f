#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("failed to decode audio: {0}")]
    Decode(String),

    #[error("failed to encode audio: {0}")]
    Encode(String),

    #[error(
        "audio format mismatch: expected {expected_rate} Hz / {expected_channels} ch, got {rate} Hz / {channels} ch"
    )]
    FormatMismatch {
        expected_rate: u32,
        expected_channels: u16,
        rate: u32,
        channels: u16,
    },

    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(u16),

    #[error("audio I/O error: {0}")]
    Io(#[from] std::io::Error),
}
