use crate::domain::audiobook::VoiceGender;
use crate::infrastructure::config::Provider;
use clap::Parser;
use std::path::PathBuf;

/// Generates an audiobook from a text file with cloud text-to-speech
///
/// Example usage:
///     tts-audiobook --gender MALE -o output.mp3 textfile.txt
#[derive(Debug, Clone, Parser)]
#[command(name = "tts-audiobook", version, verbatim_doc_comment)]
pub struct Cli {
    /// Input text file
    pub textfile: PathBuf,

    /// Google application credentials file
    #[arg(short, long)]
    pub credentials: Option<PathBuf>,

    /// Gender of speech: NEUTRAL, MALE or FEMALE
    #[arg(short, long, default_value_t = VoiceGender::Neutral)]
    pub gender: VoiceGender,

    /// Text length to be converted, 0 converts everything
    #[arg(short, long, default_value_t = 0)]
    pub length: usize,

    /// Output audio filename (MP3)
    #[arg(short, long, default_value = "output.mp3")]
    pub output: PathBuf,

    /// Speech synthesis provider: google, polly or openai
    #[arg(short, long, default_value_t = Provider::Google)]
    pub provider: Provider,
}
