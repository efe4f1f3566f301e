use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_fps() -> u32 {
    1
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_stall_warning_secs() -> u64 {
    10
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CaptureConfig {
    /// Frames handed to OCR per second, 1-2 is realistic
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// How long the capture thread waits on the surface per iteration
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Monitor id to mirror, primary monitor when unset
    pub monitor: Option<u32>,
    /// Warn when no frame arrived for this long
    #[serde(default = "default_stall_warning_secs")]
    pub stall_warning_secs: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            poll_interval_ms: default_poll_interval_ms(),
            monitor: None,
            stall_warning_secs: default_stall_warning_secs(),
        }
    }
}

impl CaptureConfig {
    /// Environment overrides on top of file or default values
    pub fn apply_env(&mut self) {
        if let Some(fps) = env::var("CAPTURE_FPS").ok().and_then(|v| v.parse().ok()) {
            self.fps = fps;
        }
    }

    /// Minimum time between two frames delivered downstream
    pub fn sampling_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps.max(1)))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn stall_warning(&self) -> Duration {
        Duration::from_secs(self.stall_warning_secs.max(1))
    }
}
