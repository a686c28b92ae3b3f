use crate::domain::audiobook::{AudiobookRequest, VoiceGender, DEFAULT_SILENCE_GAP};
use crate::infrastructure::cli::Cli;
use crate::infrastructure::repositories::google_tts_repository::DEFAULT_ENDPOINT;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const GOOGLE_CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

#[derive(Debug, Clone)]
pub struct Config {
    pub text_file: PathBuf,
    pub output: PathBuf,
    pub gender: VoiceGender,
    pub length: usize,
    pub provider: Provider,
    pub credentials: ProviderCredentials,
    pub google_endpoint: String,
    pub aws_region: String,
    pub openai_model: String,
    pub scratch_dir: PathBuf,
    pub silence_gap: Duration,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Polly,
    Openai,
}

/// Credentials resolved for the selected provider
#[derive(Clone)]
pub enum ProviderCredentials {
    GoogleFile(PathBuf),
    /// Resolved by the AWS default provider chain when the client is built
    AwsDefaultChain,
    OpenAiKey(String),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing {provider} credentials: {hint}")]
    MissingCredentials {
        provider: Provider,
        hint: &'static str,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Polly => "polly",
            Provider::Openai => "openai",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(Provider::Google),
            "polly" | "aws" => Ok(Provider::Polly),
            "openai" => Ok(Provider::Openai),
            other => Err(format!(
                "unknown provider '{}', expected one of google, polly, openai",
                other
            )),
        }
    }
}

impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderCredentials::GoogleFile(path) => f.debug_tuple("GoogleFile").field(path).finish(),
            ProviderCredentials::AwsDefaultChain => f.write_str("AwsDefaultChain"),
            ProviderCredentials::OpenAiKey(_) => f.write_str("OpenAiKey(<redacted>)"),
        }
    }
}

impl LogFormat {
    pub fn from_env() -> Self {
        Self::parse(env::var("LOG_FORMAT").ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Build the run configuration from parsed arguments and the process
    /// environment (plus `.env`, when present)
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_sources(cli, |key| env::var(key).ok())
    }

    /// Same as `from_cli`, reading variables through `lookup`
    pub fn from_sources(
        cli: Cli,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let credentials = match cli.provider {
            // An explicit flag wins over the environment
            Provider::Google => cli
                .credentials
                .clone()
                .or_else(|| lookup(GOOGLE_CREDENTIALS_ENV).map(PathBuf::from))
                .map(ProviderCredentials::GoogleFile)
                .ok_or(ConfigError::MissingCredentials {
                    provider: Provider::Google,
                    hint: "pass --credentials or set GOOGLE_APPLICATION_CREDENTIALS. \
                           See https://cloud.google.com/docs/authentication/getting-started",
                })?,
            Provider::Polly => ProviderCredentials::AwsDefaultChain,
            Provider::Openai => lookup("OPENAI_API_KEY")
                .filter(|key| !key.is_empty())
                .map(ProviderCredentials::OpenAiKey)
                .ok_or(ConfigError::MissingCredentials {
                    provider: Provider::Openai,
                    hint: "set OPENAI_API_KEY",
                })?,
        };

        let silence_gap = match lookup("AUDIOBOOK_SILENCE_MS") {
            Some(raw) => Duration::from_millis(raw.parse().map_err(|_| {
                ConfigError::Invalid(format!("AUDIOBOOK_SILENCE_MS must be milliseconds, got '{}'", raw))
            })?),
            None => DEFAULT_SILENCE_GAP,
        };

        Ok(Config {
            text_file: cli.textfile,
            output: cli.output,
            gender: cli.gender,
            length: cli.length,
            provider: cli.provider,
            credentials,
            google_endpoint: lookup("GOOGLE_TTS_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            aws_region: lookup("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            openai_model: lookup("OPENAI_TTS_MODEL").unwrap_or_else(|| "tts-1".to_string()),
            scratch_dir: lookup("AUDIOBOOK_SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".tmp")),
            silence_gap,
            log_format: LogFormat::parse(lookup("LOG_FORMAT").as_deref()),
        })
    }

    pub fn audiobook_request(&self) -> AudiobookRequest {
        AudiobookRequest {
            text_file: self.text_file.clone(),
            output: self.output.clone(),
            gender: self.gender,
            length: self.length,
        }
    }
}
