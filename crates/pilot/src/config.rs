//! Pilot configuration

use std::path::{Path, PathBuf};

use command_gate::GateConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use histogram::HistogramConfig;
use segmentation::SegmenterConfig;
use serde::{Deserialize, Serialize};
use steering::{ArbiterConfig, JudgeConfig};
use vision_primitives::RoiConfig;

use crate::PilotError;

/// Environment variable prefix; nested keys use `__`
/// (`LANE_PILOT__GATE__MIN_CONFIDENCE=0.4`)
pub const ENV_PREFIX: &str = "LANE_PILOT";

/// Everything the pipeline and replay binary need
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotConfig {
    pub roi: RoiConfig,
    pub segmenter: SegmenterConfig,
    pub histogram: HistogramConfig,
    pub judge: JudgeConfig,
    pub arbiter: ArbiterConfig,
    pub gate: GateConfig,
    /// Replay pacing in frames per second (default: 5)
    pub target_fps: f64,
    /// Directory of encoded frames to replay (default: "frames")
    pub frames_dir: PathBuf,
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self {
            roi: RoiConfig::default(),
            segmenter: SegmenterConfig::default(),
            histogram: HistogramConfig::default(),
            judge: JudgeConfig::default(),
            arbiter: ArbiterConfig::default(),
            gate: GateConfig::default(),
            target_fps: 5.0,
            frames_dir: PathBuf::from("frames"),
        }
    }
}

impl PilotConfig {
    /// Load from an optional TOML file plus `LANE_PILOT__*` overrides
    pub fn load(path: Option<&Path>) -> Result<Self, PilotError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        Self::finish(builder)
    }

    /// Load from TOML text plus environment overrides
    pub fn from_toml(text: &str) -> Result<Self, PilotError> {
        Self::finish(Config::builder().add_source(File::from_str(text, FileFormat::Toml)))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, PilotError> {
        let config: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PilotError> {
        self.segmenter.validate()?;
        self.judge.validate()?;
        self.arbiter.validate()?;
        self.gate.validate()?;

        let bottom = self.roi.bottom_start_ratio;
        let lookahead = self.roi.lookahead_start_ratio;
        if !(0.0..=1.0).contains(&bottom) || !(0.0..=bottom).contains(&lookahead) {
            return Err(PilotError::InvalidConfig(format!(
                "ROI ratios must satisfy 0 <= lookahead ({lookahead}) <= bottom ({bottom}) <= 1"
            )));
        }
        if !self.target_fps.is_finite() || self.target_fps <= 0.0 {
            return Err(PilotError::InvalidConfig(format!(
                "target_fps must be positive, got {}",
                self.target_fps
            )));
        }
        Ok(())
    }
}
