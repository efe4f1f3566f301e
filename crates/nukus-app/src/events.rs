use std::sync::Arc;

use kanal::AsyncReceiver;
use nukus_core::AppState;
use nukus_overlay::OverlayRenderer;
use nukus_types::{AppEvent, OCR_BLOCKS_EVENT};
use tokio_util::sync::CancellationToken;

/// App's main loop
pub async fn event_loop(
    state: Arc<AppState>,
    renderer: Arc<OverlayRenderer>,
    events_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = events_rx.recv() => match event {
                Ok(event) => event,
                Err(_) => break,
            },
        };

        if !handle_event(&state, &renderer, event) {
            tracing::info!("[EVENT_LOOP] Shutdown requested");
            cancel.cancel();
            break;
        }
    }

    tracing::info!("[EVENT_LOOP] stopped ({})", state.status.summary());
    Ok(())
}

/// Returns false when the app should stop
pub fn handle_event(state: &AppState, renderer: &OverlayRenderer, event: AppEvent) -> bool {
    match event {
        AppEvent::OcrBlocks(payload) => {
            tracing::debug!(
                ">>> [{}] {} blocks",
                OCR_BLOCKS_EVENT,
                payload.blocks.len()
            );
            if tracing::enabled!(tracing::Level::TRACE) {
                match serde_json::to_string(&payload) {
                    Ok(json) => tracing::trace!(">>> [{}] {}", OCR_BLOCKS_EVENT, json),
                    Err(e) => tracing::trace!("Failed to serialize blocks: {}", e),
                }
            }
        }
        AppEvent::StatusUpdate { status } => {
            tracing::info!("Status: {}", status);
            state.status.set_message(status);
        }
        AppEvent::OverlayUpdated { count } => {
            let status = format!("Overlay updated ({count})");
            tracing::info!("{}", status);
            state.status.set_message(status);
        }
        AppEvent::StyleChanged(style) => {
            tracing::info!(
                "Overlay style changed: {}sp {} on {} alpha {}",
                style.text_size_sp,
                style.text_color.to_hex(),
                style.bg_color.to_hex(),
                style.bg_alpha
            );
            renderer.set_style(style);
        }
        AppEvent::CaptureStalled { idle_secs } => {
            tracing::warn!(
                "No frames for {}s, screen capture permission may have been revoked",
                idle_secs
            );
            state
                .status
                .set_message(format!("No frames for {idle_secs}s"));
        }
        AppEvent::Shutdown => return false,
    }

    true
}
