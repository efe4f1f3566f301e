use std::sync::Arc;
use std::time::Duration;

use kanal::AsyncSender;
use nukus_capture::{CaptureError, Frame, FrameSource, FrameSurface, GrantReceiver};
use nukus_core::{AppState, PipelineStatus};
use tokio_util::sync::CancellationToken;

/// How often a running session is checked for having stopped on its own
const LIVENESS_CHECK: Duration = Duration::from_millis(500);

/// Waits for capture grants and runs a frame source for each.
///
/// Accepted frames go into `frame_tx` without waiting. While the pipeline is busy
/// the channel is full and the frame is dropped, so stale work is superseded on
/// completion rather than queued.
pub async fn capture_loop<S, F>(
    state: Arc<AppState>,
    grants: GrantReceiver,
    open_surface: F,
    frame_tx: AsyncSender<Frame>,
    cancel: CancellationToken,
) -> anyhow::Result<()>
where
    S: FrameSurface + 'static,
    F: Fn() -> Result<S, CaptureError> + Send + 'static,
{
    let (interval, poll_interval) = {
        let config = state.config.read().await;
        (
            config.capture.sampling_interval(),
            config.capture.poll_interval(),
        )
    };

    let mut source = FrameSource::new(interval, poll_interval);

    loop {
        let grant = tokio::select! {
            _ = cancel.cancelled() => break,
            grant = grants.recv() => grant,
        };
        let Some(grant) = grant else {
            tracing::info!("[CAPTURE] no more grants");
            break;
        };

        tracing::info!("[CAPTURE] grant {} received, starting capture", grant.id());
        let surface = open_surface()?;

        let tx = frame_tx.clone_sync();
        let counter_state = state.clone();
        let started = source.start(grant, surface, move |frame| {
            PipelineStatus::bump(&counter_state.status.frames_received);
            match tx.try_send(frame) {
                Ok(true) => {}
                Ok(false) => tracing::trace!("[CAPTURE] pipeline busy, frame dropped"),
                Err(_) => tracing::debug!("[CAPTURE] frame channel closed"),
            }
        });
        if let Err(e) = started {
            tracing::warn!("[CAPTURE] could not start: {}", e);
            continue;
        }

        // Run until shutdown or until the session ends by itself (revoked grant)
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(LIVENESS_CHECK) => {
                    if !source.is_running() {
                        tracing::warn!("[CAPTURE] session ended, waiting for a new grant");
                        break;
                    }
                }
            }
        }

        if cancel.is_cancelled() {
            break;
        }
    }

    // Joining the capture thread blocks for up to one poll interval
    tokio::task::spawn_blocking(move || source.stop()).await?;
    tracing::info!("[CAPTURE] stopped");
    Ok(())
}
