use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::grant::CaptureGrant;
use crate::surface::{CaptureError, Frame, FrameSurface};
use crate::throttle::Throttle;

struct Session {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Throttled frame producer running on its own thread.
///
/// Owns the capture surface for the lifetime of a session. Frames arriving faster
/// than the sampling interval are discarded without reaching the callback.
pub struct FrameSource {
    interval: Duration,
    poll_interval: Duration,
    session: Option<Session>,
}

impl FrameSource {
    pub fn new(interval: Duration, poll_interval: Duration) -> Self {
        Self {
            interval,
            poll_interval,
            session: None,
        }
    }

    /// Start delivering frames to `on_frame` from the capture thread.
    ///
    /// No-op while a session is running.
    pub fn start<S, F>(
        &mut self,
        grant: CaptureGrant,
        surface: S,
        on_frame: F,
    ) -> Result<(), CaptureError>
    where
        S: FrameSurface + 'static,
        F: FnMut(Frame) + Send + 'static,
    {
        if self.is_running() {
            tracing::debug!("Capture already running, ignoring start");
            return Ok(());
        }
        // Reap a session that ended on its own
        self.stop();

        if !grant.is_valid() {
            return Err(CaptureError::Revoked);
        }

        let cancel = CancellationToken::new();
        let worker = CaptureWorker {
            surface,
            grant,
            throttle: Throttle::new(self.interval),
            poll_interval: self.poll_interval,
            cancel: cancel.clone(),
        };

        let handle = thread::Builder::new()
            .name("capture-thread".into())
            .spawn(move || worker.run(on_frame))?;

        self.session = Some(Session { cancel, handle });
        Ok(())
    }

    /// Stop capturing and release the surface, safe to call repeatedly
    pub fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        session.cancel.cancel();
        if session.handle.join().is_err() {
            tracing::error!("Capture thread panicked");
        }
    }

    /// False once stopped, including when the grant was revoked
    pub fn is_running(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| !s.handle.is_finished())
    }
}

impl Drop for FrameSource {
    fn drop(&mut self) {
        self.stop();
    }
}

struct CaptureWorker<S> {
    surface: S,
    grant: CaptureGrant,
    throttle: Throttle,
    poll_interval: Duration,
    cancel: CancellationToken,
}

impl<S: FrameSurface> CaptureWorker<S> {
    fn run<F: FnMut(Frame)>(mut self, mut on_frame: F) {
        tracing::info!(
            "Capture started (grant {}, every {:?})",
            self.grant.id(),
            self.throttle.interval()
        );
        let started = Instant::now();
        let mut delivered = 0u64;
        let mut discarded = 0u64;

        while !self.cancel.is_cancelled() {
            if !self.grant.is_valid() {
                tracing::warn!("Capture grant revoked, no more frames");
                break;
            }

            match self.surface.wait_for_frame(self.poll_interval) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(CaptureError::Revoked) => {
                    tracing::warn!("Surface reports capture permission lost");
                    break;
                }
                Err(e) => {
                    tracing::warn!("Waiting for frame failed: {}", e);
                    thread::sleep(self.poll_interval);
                    continue;
                }
            }

            if !self.throttle.admit(Instant::now()) {
                discarded += 1;
                if let Err(e) = self.surface.discard_latest() {
                    tracing::debug!("Discarding frame failed: {}", e);
                }
                continue;
            }

            match self.surface.acquire_latest() {
                Ok(Some(frame)) => {
                    delivered += 1;
                    on_frame(frame);
                }
                Ok(None) => {}
                Err(CaptureError::Revoked) => {
                    tracing::warn!("Surface reports capture permission lost");
                    break;
                }
                Err(e) => tracing::warn!("Frame acquisition failed: {}", e),
            }
        }

        self.surface.release();
        tracing::info!(
            "Capture stopped after {:?}: {} delivered, {} discarded",
            started.elapsed(),
            delivered,
            discarded
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use image::RgbaImage;

    use super::*;

    /// Publishes a frame every few milliseconds like a busy compositor
    struct FakeSurface {
        tick: Duration,
        acquired: Arc<AtomicUsize>,
        discarded: Arc<AtomicUsize>,
        released: Arc<AtomicBool>,
        revoke_after: Option<usize>,
    }

    impl FakeSurface {
        fn new(tick: Duration) -> Self {
            Self {
                tick,
                acquired: Arc::new(AtomicUsize::new(0)),
                discarded: Arc::new(AtomicUsize::new(0)),
                released: Arc::new(AtomicBool::new(false)),
                revoke_after: None,
            }
        }
    }

    impl FrameSurface for FakeSurface {
        fn wait_for_frame(&mut self, timeout: Duration) -> Result<bool, CaptureError> {
            thread::sleep(self.tick.min(timeout));
            Ok(true)
        }

        fn acquire_latest(&mut self) -> Result<Option<Frame>, CaptureError> {
            let n = self.acquired.fetch_add(1, Ordering::SeqCst);
            if self.revoke_after.is_some_and(|limit| n >= limit) {
                return Err(CaptureError::Revoked);
            }
            Ok(Some(Frame::new(RgbaImage::new(4, 4))))
        }

        fn discard_latest(&mut self) -> Result<(), CaptureError> {
            self.discarded.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn release(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    fn wait_until(deadline: Duration, mut done: impl FnMut() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < deadline {
            if done() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        done()
    }

    #[test]
    fn frames_faster_than_interval_are_discarded() {
        let surface = FakeSurface::new(Duration::from_millis(5));
        let discarded = surface.discarded.clone();
        let delivered = Arc::new(AtomicUsize::new(0));
        let counter = delivered.clone();

        let mut source = FrameSource::new(Duration::from_millis(200), Duration::from_millis(50));
        let (grant, _revoker) = CaptureGrant::issue();
        source
            .start(grant, surface, move |_frame| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        thread::sleep(Duration::from_millis(500));
        source.stop();

        let delivered = delivered.load(Ordering::SeqCst);
        assert!((2..=4).contains(&delivered), "delivered {delivered}");
        assert!(discarded.load(Ordering::SeqCst) > delivered * 5);
    }

    #[test]
    fn callback_runs_on_capture_thread() {
        let names = Arc::new(Mutex::new(Vec::new()));
        let sink = names.clone();

        let mut source = FrameSource::new(Duration::from_millis(10), Duration::from_millis(5));
        let (grant, _revoker) = CaptureGrant::issue();
        source
            .start(grant, FakeSurface::new(Duration::from_millis(1)), move |_| {
                sink.lock()
                    .unwrap()
                    .push(thread::current().name().map(str::to_string));
            })
            .unwrap();

        assert!(wait_until(Duration::from_secs(2), || !names
            .lock()
            .unwrap()
            .is_empty()));
        source.stop();

        let names = names.lock().unwrap();
        assert!(names.iter().all(|n| n.as_deref() == Some("capture-thread")));
    }

    #[test]
    fn revoked_grant_stops_silently() {
        let surface = FakeSurface::new(Duration::from_millis(2));
        let released = surface.released.clone();

        let mut source = FrameSource::new(Duration::from_millis(10), Duration::from_millis(5));
        let (grant, revoker) = CaptureGrant::issue();
        source.start(grant, surface, |_| {}).unwrap();
        assert!(source.is_running());

        revoker.revoke();
        assert!(wait_until(Duration::from_secs(2), || !source.is_running()));
        assert!(released.load(Ordering::SeqCst));

        source.stop();
    }

    #[test]
    fn surface_revocation_stops_capture() {
        let mut surface = FakeSurface::new(Duration::from_millis(1));
        surface.revoke_after = Some(2);
        let delivered = Arc::new(AtomicUsize::new(0));
        let counter = delivered.clone();

        let mut source = FrameSource::new(Duration::from_millis(1), Duration::from_millis(1));
        let (grant, _revoker) = CaptureGrant::issue();
        source
            .start(grant, surface, move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        assert!(wait_until(Duration::from_secs(2), || !source.is_running()));
        assert_eq!(delivered.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn start_with_revoked_grant_fails() {
        let mut source = FrameSource::new(Duration::from_millis(10), Duration::from_millis(5));
        let (grant, revoker) = CaptureGrant::issue();
        revoker.revoke();

        let result = source.start(grant, FakeSurface::new(Duration::from_millis(1)), |_| {});
        assert!(matches!(result, Err(CaptureError::Revoked)));
        assert!(!source.is_running());
    }

    #[test]
    fn stop_is_idempotent() {
        let mut never_started =
            FrameSource::new(Duration::from_millis(10), Duration::from_millis(5));
        never_started.stop();
        never_started.stop();

        let surface = FakeSurface::new(Duration::from_millis(1));
        let released = surface.released.clone();
        let mut source = FrameSource::new(Duration::from_millis(10), Duration::from_millis(5));
        let (grant, _revoker) = CaptureGrant::issue();
        source.start(grant, surface, |_| {}).unwrap();

        source.stop();
        source.stop();
        assert!(!source.is_running());
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn second_start_while_running_is_ignored() {
        let first = FakeSurface::new(Duration::from_millis(1));
        let second = FakeSurface::new(Duration::from_millis(1));
        let second_acquired = second.acquired.clone();

        let mut source = FrameSource::new(Duration::from_millis(5), Duration::from_millis(5));
        let (grant, _revoker) = CaptureGrant::issue();
        source.start(grant.clone(), first, |_| {}).unwrap();
        source.start(grant, second, |_| {}).unwrap();

        thread::sleep(Duration::from_millis(50));
        source.stop();
        assert_eq!(second_acquired.load(Ordering::SeqCst), 0);
    }
}
