//! Deployment configuration, fixed at process start.

use serde::{Deserialize, Serialize};

use crate::error::{BmdsError, Result};

/// Environment variable selecting the desktop deployment mode.
pub const DESKTOP_ENV_VAR: &str = "BMDS_IS_DESKTOP";

/// Where the application is deployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentMode {
    /// Shared hosted deployment.
    #[default]
    Hosted,
    /// Single-user local deployment.
    Desktop,
}

impl DeploymentMode {
    /// Largest accepted options batch.
    pub fn max_options(&self) -> usize {
        match self {
            DeploymentMode::Hosted => 6,
            DeploymentMode::Desktop => 1000,
        }
    }
}

/// Configuration for bmdkit operations.
#[derive(Debug, Clone, Default)]
pub struct BmdsConfig {
    /// Deployment mode.
    pub mode: DeploymentMode,
}

impl BmdsConfig {
    pub fn new(mode: DeploymentMode) -> Self {
        Self { mode }
    }

    pub fn desktop() -> Self {
        Self::new(DeploymentMode::Desktop)
    }

    pub fn hosted() -> Self {
        Self::new(DeploymentMode::Hosted)
    }

    /// Read the deployment mode from `BMDS_IS_DESKTOP`. Unset means hosted.
    pub fn from_env() -> Result<Self> {
        let raw = std::env::var(DESKTOP_ENV_VAR).ok();
        Self::from_flag(raw.as_deref())
    }

    /// Interpret a boolean-like flag value.
    pub fn from_flag(raw: Option<&str>) -> Result<Self> {
        let Some(raw) = raw else {
            return Ok(Self::hosted());
        };
        match raw.trim().to_lowercase().as_str() {
            "" | "0" | "false" | "no" | "off" => Ok(Self::hosted()),
            "1" | "true" | "yes" | "on" => Ok(Self::desktop()),
            other => Err(BmdsError::Config(format!(
                "{} must be a boolean, got '{}'",
                DESKTOP_ENV_VAR, other
            ))),
        }
    }

    /// Largest accepted options batch for this deployment.
    pub fn max_options(&self) -> usize {
        self.mode.max_options()
    }
}
