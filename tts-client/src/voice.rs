//! Voice and quality vocabulary shared between callers and backends.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TtsError};

/// Supported voice identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    Alloy,
    Echo,
    Fable,
    Onyx,
    Nova,
    Shimmer,
}

impl Voice {
    /// All supported voices, in display order.
    pub const ALL: [Voice; 6] = [
        Voice::Alloy,
        Voice::Echo,
        Voice::Fable,
        Voice::Onyx,
        Voice::Nova,
        Voice::Shimmer,
    ];

    /// Identifier sent over the wire.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Voice::Alloy => "alloy",
            Voice::Echo => "echo",
            Voice::Fable => "fable",
            Voice::Onyx => "onyx",
            Voice::Nova => "nova",
            Voice::Shimmer => "shimmer",
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Voice::Alloy => "Alloy - Neutral",
            Voice::Echo => "Echo - Male",
            Voice::Fable => "Fable - British Male",
            Voice::Onyx => "Onyx - Deep Male",
            Voice::Nova => "Nova - Female",
            Voice::Shimmer => "Shimmer - Soft Female",
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for Voice {
    type Err = TtsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "alloy" => Ok(Voice::Alloy),
            "echo" => Ok(Voice::Echo),
            "fable" => Ok(Voice::Fable),
            "onyx" => Ok(Voice::Onyx),
            "nova" => Ok(Voice::Nova),
            "shimmer" => Ok(Voice::Shimmer),
            _ => Err(TtsError::ConfigError(format!(
                "Unknown voice: {}. Choose from: alloy, echo, fable, onyx, nova, shimmer",
                s
            ))),
        }
    }
}

/// Quality tier offered by the synthesis backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Standard,
    High,
}

impl QualityTier {
    /// Model identifier sent over the wire.
    pub fn model_name(&self) -> &'static str {
        match self {
            QualityTier::Standard => "tts-1",
            QualityTier::High => "tts-1-hd",
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            QualityTier::Standard => "Standard (tts-1)",
            QualityTier::High => "High Quality (tts-1-hd)",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QualityTier::Standard => "standard",
            QualityTier::High => "high",
        };
        f.write_str(name)
    }
}

impl FromStr for QualityTier {
    type Err = TtsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "standard" | "tts-1" => Ok(QualityTier::Standard),
            "high" | "hd" | "tts-1-hd" => Ok(QualityTier::High),
            _ => Err(TtsError::ConfigError(format!(
                "Unknown quality tier: {}. Choose standard or high",
                s
            ))),
        }
    }
}

/// Opaque API secret. Redacted in debug output so it never leaks into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredential(String);

impl ApiCredential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// The raw secret, for building the authorization header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiCredential(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_from_str() {
        assert_eq!("nova".parse::<Voice>().unwrap(), Voice::Nova);
        assert_eq!("SHIMMER".parse::<Voice>().unwrap(), Voice::Shimmer);
        assert!("robot".parse::<Voice>().is_err());
    }

    #[test]
    fn test_voice_wire_names() {
        for voice in Voice::ALL {
            assert_eq!(voice.wire_name().parse::<Voice>().unwrap(), voice);
        }
    }

    #[test]
    fn test_voice_labels_distinct() {
        let labels: Vec<_> = Voice::ALL.iter().map(|v| v.label()).collect();
        let mut deduped = labels.clone();
        deduped.dedup();
        assert_eq!(labels.len(), deduped.len());
    }

    #[test]
    fn test_quality_from_str() {
        assert_eq!("standard".parse::<QualityTier>().unwrap(), QualityTier::Standard);
        assert_eq!("tts-1-hd".parse::<QualityTier>().unwrap(), QualityTier::High);
        assert!("ultra".parse::<QualityTier>().is_err());
    }

    #[test]
    fn test_quality_model_names() {
        assert_eq!(QualityTier::Standard.model_name(), "tts-1");
        assert_eq!(QualityTier::High.model_name(), "tts-1-hd");
    }

    #[test]
    fn test_voice_serde_lowercase() {
        let json = serde_json::to_string(&Voice::Fable).unwrap();
        assert_eq!(json, "\"fable\"");
        let back: Voice = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Voice::Fable);
    }

    #[test]
    fn test_credential_redacted_in_debug() {
        let credential = ApiCredential::new("sk-proj-secret");
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("secret"));
        assert_eq!(credential.expose(), "sk-proj-secret");
    }

    #[test]
    fn test_credential_empty() {
        assert!(ApiCredential::new("").is_empty());
        assert!(ApiCredential::new("   ").is_empty());
        assert!(!ApiCredential::new("sk-1").is_empty());
    }
}
