use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use nukus_config::Config;
use tokio::sync::RwLock;

/// Pipeline counters, readable from any task
#[derive(Debug, Default)]
pub struct PipelineStatus {
    pub frames_received: AtomicU64,
    pub cycles_unchanged: AtomicU64,
    pub cycles_rendered: AtomicU64,
    pub translation_failures: AtomicU64,
    pub cache_hits: AtomicU64,
    message: Mutex<String>,
}

impl PipelineStatus {
    pub fn bump(counter: &AtomicU64) -> u64 {
        counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn set_message(&self, message: impl Into<String>) {
        if let Ok(mut current) = self.message.lock() {
            *current = message.into();
        }
    }

    pub fn message(&self) -> String {
        self.message
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    pub fn summary(&self) -> String {
        format!(
            "frames={} unchanged={} rendered={} failures={} cache_hits={}",
            self.frames_received.load(Ordering::Relaxed),
            self.cycles_unchanged.load(Ordering::Relaxed),
            self.cycles_rendered.load(Ordering::Relaxed),
            self.translation_failures.load(Ordering::Relaxed),
            self.cache_hits.load(Ordering::Relaxed),
        )
    }
}

#[derive(Default)]
pub struct AppState {
    pub config: RwLock<Config>,
    pub status: PipelineStatus,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
            status: PipelineStatus::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_and_message() {
        let status = PipelineStatus::default();
        assert_eq!(PipelineStatus::bump(&status.frames_received), 1);
        assert_eq!(PipelineStatus::bump(&status.frames_received), 2);

        status.set_message("Overlay updated (3)");
        assert_eq!(status.message(), "Overlay updated (3)");
        assert!(status.summary().starts_with("frames=2 "));
    }
}
