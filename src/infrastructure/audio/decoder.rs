use super::{AudioClip, AudioError};
use std::fs::File;
use std::io::{self, Cursor};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decode an in-memory MP3 into interleaved PCM
pub fn decode_mp3(bytes: Vec<u8>) -> Result<AudioClip, AudioError> {
    decode(Box::new(Cursor::new(bytes)))
}

pub fn decode_mp3_file(path: &Path) -> Result<AudioClip, AudioError> {
    let file = File::open(path)?;
    decode(Box::new(file)).map_err(|e| match e {
        AudioError::Decode(message) => {
            AudioError::Decode(format!("{}: {}", path.display(), message))
        }
        other => other,
    })
}

fn decode(source: Box<dyn MediaSource>) -> Result<AudioClip, AudioError> {
    let stream = MediaSourceStream::new(source, Default::default());

    let mut hint = Hint::new();
    hint.with_extension("mp3");

    let format_opts = FormatOptions {
        enable_gapless: true,
        ..Default::default()
    };

    let probed = symphonia::default::get_probe()
        .format(&hint, stream, &format_opts, &MetadataOptions::default())
        .map_err(|e| AudioError::Decode(e.to_string()))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AudioError::Decode("no audio track found".to_string()))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AudioError::Decode(format!("unsupported codec: {}", e)))?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(AudioError::Decode(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count() as u16;

                let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buffer.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buffer.samples());
            }
            // A corrupt frame is dropped, the rest of the stream still plays
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::warn!(error = e, "Skipping undecodable MP3 frame");
            }
            Err(e) => return Err(AudioError::Decode(e.to_string())),
        }
    }

    if sample_rate == 0 || channels == 0 {
        return Err(AudioError::Decode("stream contains no audio frames".to_string()));
    }

    Ok(AudioClip::new(sample_rate, channels, samples))
}
