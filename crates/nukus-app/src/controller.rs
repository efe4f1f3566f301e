use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use nukus_capture::{CaptureError, Frame, FrameSurface, GrantReceiver};
use nukus_config::StyleStore;
use nukus_core::AppState;
use nukus_ocr::TextExtractor;
use nukus_overlay::OverlayRenderer;
use nukus_translator::Translator;
use nukus_types::AppEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::capture::capture_loop;
use crate::events::event_loop;
use crate::io::watcher_io;
use crate::pipeline::{Pipeline, pipeline_loop};

/// Centralized channel management
pub struct ChannelSet {
    pub frames: (AsyncSender<Frame>, AsyncReceiver<Frame>),
    pub events: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            frames: kanal::bounded_async(1), // one frame waiting, the rest are dropped
            events: kanal::bounded_async(256),
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the pipeline task needs besides channels
pub struct PipelineParts {
    pub extractor: TextExtractor,
    pub translator: Arc<dyn Translator>,
    pub style_store: StyleStore,
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    renderer: Arc<OverlayRenderer>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>, renderer: Arc<OverlayRenderer>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            renderer,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn events(&self) -> AsyncSender<AppEvent> {
        self.channels.events.0.clone()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Must be called inside a tokio runtime context
    pub async fn spawn_tasks<S, F>(
        &self,
        grants: GrantReceiver,
        open_surface: F,
        parts: PipelineParts,
    ) -> JoinSet<anyhow::Result<()>>
    where
        S: FrameSurface + 'static,
        F: Fn() -> Result<S, CaptureError> + Send + 'static,
    {
        let mut tasks = JoinSet::new();
        let (cache_capacity, delta_time) = {
            let config = self.state.config.read().await;
            (config.cache.capacity, config.watcher_interval())
        };

        // Capture
        tasks.spawn(capture_loop(
            self.state.clone(),
            grants,
            open_surface,
            self.channels.frames.0.clone(),
            self.cancel_token.child_token(),
        ));

        // Pipeline
        let pipeline = Pipeline::new(
            self.state.clone(),
            parts.extractor,
            parts.translator,
            self.renderer.clone(),
            self.channels.events.0.clone(),
            cache_capacity,
        );
        tasks.spawn(pipeline_loop(
            pipeline,
            self.channels.frames.1.clone(),
            self.cancel_token.child_token(),
        ));

        // Renderer
        let renderer = self.renderer.clone();
        let cancel = self.cancel_token.child_token();
        tasks.spawn(async move {
            renderer.run(cancel).await;
            Ok(())
        });

        // Event loop, cancels everything on Shutdown
        tasks.spawn(event_loop(
            self.state.clone(),
            self.renderer.clone(),
            self.channels.events.1.clone(),
            self.cancel_token.clone(),
        ));

        // Watcher IO
        tasks.spawn(watcher_io(
            self.state.clone(),
            parts.style_store,
            delta_time,
            self.cancel_token.child_token(),
            self.channels.events.0.clone(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
