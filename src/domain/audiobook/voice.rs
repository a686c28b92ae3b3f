use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Language every provider is asked to speak
pub const LANGUAGE_CODE: &str = "en-US";

/// Voice gender accepted on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VoiceGender {
    Male,
    Female,
    #[default]
    Neutral,
}

impl VoiceGender {
    /// Name used by Google's `ssmlGender` field and by the CLI
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceGender::Male => "MALE",
            VoiceGender::Female => "FEMALE",
            VoiceGender::Neutral => "NEUTRAL",
        }
    }
}

impl std::fmt::Display for VoiceGender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VoiceGender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MALE" => Ok(VoiceGender::Male),
            "FEMALE" => Ok(VoiceGender::Female),
            "NEUTRAL" => Ok(VoiceGender::Neutral),
            other => Err(format!(
                "unknown gender '{}', expected one of NEUTRAL, MALE, FEMALE",
                other
            )),
        }
    }
}
