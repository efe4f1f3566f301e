use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant, SystemTime};

use kanal::AsyncSender;
use nukus_config::StyleStore;
use nukus_core::AppState;
use nukus_types::AppEvent;
use tokio_util::sync::CancellationToken;

/// Tracks frame arrivals and reports a stall once per quiet period
#[derive(Debug)]
pub struct StallDetector {
    threshold: Duration,
    last_count: u64,
    last_change: Instant,
    reported: bool,
}

impl StallDetector {
    pub fn new(threshold: Duration, now: Instant) -> Self {
        Self {
            threshold,
            last_count: 0,
            last_change: now,
            reported: false,
        }
    }

    /// Idle time when a new stall begins, None otherwise
    pub fn check(&mut self, frames: u64, now: Instant) -> Option<Duration> {
        if frames != self.last_count {
            if self.reported {
                tracing::info!("Frames are arriving again");
            }
            self.last_count = frames;
            self.last_change = now;
            self.reported = false;
            return None;
        }

        let idle = now.duration_since(self.last_change);
        if idle >= self.threshold && !self.reported {
            self.reported = true;
            return Some(idle);
        }
        None
    }
}

/// Watches the style settings file and capture liveness
pub async fn watcher_io(
    state: Arc<AppState>,
    style_store: StyleStore,
    delta_time: Duration,
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let stall_threshold = state.config.read().await.capture.stall_warning();
    let mut stall = StallDetector::new(stall_threshold, Instant::now());
    let mut style_mtime: Option<SystemTime> = style_store.modified();
    let mut interval = tokio::time::interval(delta_time);

    tracing::info!("Watching {:?} for style changes", style_store.path());

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        let mtime = style_store.modified();
        if mtime != style_mtime {
            style_mtime = mtime;
            let style = style_store.load();
            if event_tx.send(AppEvent::StyleChanged(style)).await.is_err() {
                break;
            }
        }

        let frames = state.status.frames_received.load(Ordering::Relaxed);
        if let Some(idle) = stall.check(frames, Instant::now()) {
            let event = AppEvent::CaptureStalled {
                idle_secs: idle.as_secs(),
            };
            if event_tx.send(event).await.is_err() {
                break;
            }
        }
    }

    tracing::info!("Watcher stopping");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stall_is_reported_once_until_frames_resume() {
        let start = Instant::now();
        let mut detector = StallDetector::new(Duration::from_secs(10), start);

        assert_eq!(detector.check(0, start + Duration::from_secs(5)), None);
        assert_eq!(
            detector.check(0, start + Duration::from_secs(10)),
            Some(Duration::from_secs(10))
        );
        assert_eq!(detector.check(0, start + Duration::from_secs(30)), None);

        // Frames resume, then stop again
        assert_eq!(detector.check(4, start + Duration::from_secs(31)), None);
        assert_eq!(
            detector.check(4, start + Duration::from_secs(42)),
            Some(Duration::from_secs(11))
        );
    }
}
