use crate::infrastructure::audio::AudioError;
use crate::infrastructure::repositories::SynthesisError;

#[derive(Debug, thiserror::Error)]
pub enum AudiobookError {
    #[error("input text is empty, nothing to synthesize")]
    EmptyInput,

    #[error("no cached segments found in {0}, nothing to join")]
    NothingToJoin(String),

    #[error("segment {index} synthesis failed: {source}")]
    Synthesis {
        index: usize,
        #[source]
        source: SynthesisError,
    },

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
