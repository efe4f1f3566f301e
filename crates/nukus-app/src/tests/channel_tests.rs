use std::sync::Arc;
use std::time::Duration;

use image::RgbaImage;
use nukus_capture::Frame;
use nukus_config::Config;
use nukus_core::AppState;
use nukus_overlay::{OverlayRenderer, TracingSurface};
use nukus_types::{AppEvent, OverlayStyle};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::controller::ChannelSet;
use crate::events::{event_loop, handle_event};

fn frame() -> Frame {
    Frame::new(RgbaImage::new(2, 2))
}

fn renderer() -> Arc<OverlayRenderer> {
    Arc::new(OverlayRenderer::new(Box::new(TracingSurface::new())))
}

#[test]
fn frame_channel_drops_while_a_frame_waits() {
    let channels = ChannelSet::new();
    let tx = channels.frames.0.clone_sync();

    assert!(tx.try_send(frame()).unwrap());
    assert!(!tx.try_send(frame()).unwrap());

    let rx = channels.frames.1.clone_sync();
    assert!(rx.try_recv().unwrap().is_some());
    assert!(rx.try_recv().unwrap().is_none());
    assert!(tx.try_send(frame()).unwrap());
}

#[test]
fn status_events_update_the_message() {
    let state = AppState::new(Config::default());
    let renderer = renderer();

    assert!(handle_event(&state, &renderer, AppEvent::status("Translating: Hello...")));
    assert_eq!(state.status.message(), "Translating: Hello...");

    assert!(handle_event(&state, &renderer, AppEvent::OverlayUpdated { count: 4 }));
    assert_eq!(state.status.message(), "Overlay updated (4)");

    assert!(!handle_event(&state, &renderer, AppEvent::Shutdown));
}

#[test]
fn style_event_reaches_renderer() {
    let state = AppState::new(Config::default());
    let renderer = renderer();
    let style = OverlayStyle {
        text_size_sp: 22.0,
        ..OverlayStyle::default()
    };

    handle_event(&state, &renderer, AppEvent::StyleChanged(style));
    assert_eq!(renderer.style().text_size_sp, 22.0);
}

#[tokio::test]
async fn shutdown_event_cancels_everything() {
    let channels = ChannelSet::new();
    let state = Arc::new(AppState::new(Config::default()));
    let cancel = CancellationToken::new();
    let child = cancel.child_token();

    let task = tokio::spawn(event_loop(
        state,
        renderer(),
        channels.events.1.clone(),
        cancel.clone(),
    ));

    channels.events.0.send(AppEvent::Shutdown).await.unwrap();

    timeout(Duration::from_secs(2), child.cancelled())
        .await
        .expect("child token was not cancelled");
    timeout(Duration::from_secs(2), task)
        .await
        .expect("event loop did not stop")
        .unwrap()
        .unwrap();
}
