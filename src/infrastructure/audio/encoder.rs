use super::{AudioClip, AudioError};
use mp3lame_encoder::{max_required_buffer_size, Bitrate, Builder, DualPcm, FlushNoGap, MonoPcm, Quality};

/// Frames handed to LAME per call
const FRAMES_PER_CHUNK: usize = 1152 * 32;

/// Encode PCM to a constant bitrate MP3 stream
pub fn encode_mp3(clip: &AudioClip) -> Result<Vec<u8>, AudioError> {
    if clip.channels != 1 && clip.channels != 2 {
        return Err(AudioError::UnsupportedChannels(clip.channels));
    }

    let mut builder =
        Builder::new().ok_or_else(|| AudioError::Encode("failed to allocate LAME encoder".to_string()))?;
    builder.set_num_channels(clip.channels as u8).map_err(encode_error)?;
    builder.set_sample_rate(clip.sample_rate).map_err(encode_error)?;
    builder.set_brate(Bitrate::Kbps128).map_err(encode_error)?;
    builder.set_quality(Quality::Good).map_err(encode_error)?;
    let mut encoder = builder.build().map_err(encode_error)?;

    let channels = usize::from(clip.channels);
    let mut mp3 = Vec::new();

    // i16 conversion is per chunk, the f32 timeline is the only full copy
    for chunk in clip.samples.chunks(FRAMES_PER_CHUNK * channels) {
        if clip.channels == 1 {
            let pcm: Vec<i16> = chunk.iter().copied().map(to_i16).collect();
            mp3.reserve(max_required_buffer_size(pcm.len()));
            encoder
                .encode_to_vec(MonoPcm(&pcm), &mut mp3)
                .map_err(encode_error)?;
        } else {
            let (left, right): (Vec<i16>, Vec<i16>) = chunk
                .chunks_exact(2)
                .map(|frame| (to_i16(frame[0]), to_i16(frame[1])))
                .unzip();
            mp3.reserve(max_required_buffer_size(left.len()));
            encoder
                .encode_to_vec(
                    DualPcm {
                        left: &left,
                        right: &right,
                    },
                    &mut mp3,
                )
                .map_err(encode_error)?;
        }
    }

    mp3.reserve(max_required_buffer_size(0));
    encoder
        .flush_to_vec::<FlushNoGap>(&mut mp3)
        .map_err(encode_error)?;

    tracing::debug!(
        sample_rate = clip.sample_rate,
        channels = clip.channels,
        frames = clip.frames(),
        mp3_size = mp3.len(),
        "PCM encoded to MP3"
    );

    Ok(mp3)
}

fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16
}

fn encode_error(e: impl std::fmt::Debug) -> AudioError {
    AudioError::Encode(format!("{:?}", e))
}
