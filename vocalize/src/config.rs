//! vocalize configuration management.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tts_client::{QualityTier, Voice};

use crate::estimate::RateTable;
use crate::text::chunker::DEFAULT_MAX_CHUNK_CHARS;

// Externally supplied constants with their stock defaults
const DEFAULT_SECONDS_PER_CHUNK: u64 = 3;
const DEFAULT_STANDARD_RATE: f64 = 0.015;
const DEFAULT_HIGH_RATE: f64 = 0.030;
const DEFAULT_REQUEST_GAP_MS: u64 = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocalizeConfig {
    /// Default voice
    #[serde(default = "default_voice")]
    pub voice: Voice,

    /// Default quality tier
    #[serde(default = "default_quality")]
    pub quality: QualityTier,

    /// Maximum characters per synthesis request
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,

    /// Wall-clock seconds estimated per chunk when predicting run time
    #[serde(default = "default_seconds_per_chunk")]
    pub seconds_per_chunk: u64,

    /// Cost per 1000 characters at standard quality (USD)
    #[serde(default = "default_standard_rate")]
    pub standard_rate_per_1k: f64,

    /// Cost per 1000 characters at high quality (USD)
    #[serde(default = "default_high_rate")]
    pub high_rate_per_1k: f64,

    /// Pause between synthesis requests (milliseconds)
    #[serde(default = "default_request_gap_ms")]
    pub request_gap_ms: u64,
}

fn default_voice() -> Voice {
    Voice::Nova
}

fn default_quality() -> QualityTier {
    QualityTier::High
}

fn default_max_chunk_chars() -> usize {
    DEFAULT_MAX_CHUNK_CHARS
}

fn default_seconds_per_chunk() -> u64 {
    DEFAULT_SECONDS_PER_CHUNK
}

fn default_standard_rate() -> f64 {
    DEFAULT_STANDARD_RATE
}

fn default_high_rate() -> f64 {
    DEFAULT_HIGH_RATE
}

fn default_request_gap_ms() -> u64 {
    DEFAULT_REQUEST_GAP_MS
}

impl Default for VocalizeConfig {
    fn default() -> Self {
        Self {
            voice: default_voice(),
            quality: default_quality(),
            max_chunk_chars: default_max_chunk_chars(),
            seconds_per_chunk: default_seconds_per_chunk(),
            standard_rate_per_1k: default_standard_rate(),
            high_rate_per_1k: default_high_rate(),
            request_gap_ms: default_request_gap_ms(),
        }
    }
}

impl VocalizeConfig {
    /// Get the config file path: ~/.config/cli-programs/vocalize.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("cli-programs")
            .join("vocalize.toml"))
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: VocalizeConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// The cost-rate table for estimation.
    pub fn rates(&self) -> RateTable {
        RateTable {
            standard_per_1k: self.standard_rate_per_1k,
            high_per_1k: self.high_rate_per_1k,
        }
    }
}
